/// Default share size: an 8-byte namespace followed by 248 payload bytes.
pub const DEFAULT_SHARE_SIZE: usize = 256;

/// Largest original square width supported by default. The extended width
/// (256) is the most a GF(2^8) Reed-Solomon codeword can hold.
pub const DEFAULT_MAX_ORIGINAL_WIDTH: usize = 128;

/// Parameters of square construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SquareConfig {
    /// Exact size in bytes every share must have.
    pub share_size: usize,
    /// Largest accepted original square width.
    pub max_original_width: usize,
    /// Encode quadrants and compute axis roots on the rayon pool.
    pub parallel: bool,
}

impl Default for SquareConfig {
    fn default() -> Self {
        Self {
            share_size: DEFAULT_SHARE_SIZE,
            max_original_width: DEFAULT_MAX_ORIGINAL_WIDTH,
            parallel: true,
        }
    }
}

impl SquareConfig {
    /// Same configuration with a different share size.
    pub fn with_share_size(mut self, share_size: usize) -> Self {
        self.share_size = share_size;
        self
    }

    /// Same configuration with parallelism switched on or off.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}
