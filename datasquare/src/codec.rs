//! Erasure codecs used to extend the square.

use reed_solomon_erasure::galois_8::ReedSolomon;

use crate::{Error, Result};

/// A systematic erasure code that doubles a row or column.
///
/// `encode` receives the `n` original shares of one axis and returns `n`
/// parity shares of the same size. It must be deterministic.
pub trait Codec: Send + Sync {
    /// Parity shares for `data`.
    fn encode(&self, data: &[&[u8]]) -> Result<Vec<Vec<u8>>>;

    /// Most original shares a single call can encode.
    fn max_chunks(&self) -> usize;

    fn name(&self) -> &'static str;
}

/// Reed-Solomon over GF(2^8).
///
/// A codeword holds at most 256 shards, so an axis can carry up to 128
/// original shares.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReedSolomonCodec;

impl ReedSolomonCodec {
    pub const MAX_CHUNKS: usize = 128;

    pub fn new() -> Self {
        ReedSolomonCodec
    }
}

impl Codec for ReedSolomonCodec {
    fn encode(&self, data: &[&[u8]]) -> Result<Vec<Vec<u8>>> {
        let n = data.len();
        if n == 0 || n > Self::MAX_CHUNKS {
            return Err(Error::Codec(format!(
                "cannot encode {} shards (must be 1..={})",
                n,
                Self::MAX_CHUNKS
            )));
        }
        let shard_len = data[0].len();
        if let Some(position) = data.iter().position(|s| s.len() != shard_len) {
            return Err(Error::Codec(format!(
                "shard {} is {} bytes, expected {}",
                position,
                data[position].len(),
                shard_len
            )));
        }

        let rs = ReedSolomon::new(n, n).map_err(|e| Error::Codec(format!("{:?}", e)))?;
        let mut shards: Vec<Vec<u8>> = Vec::with_capacity(2 * n);
        shards.extend(data.iter().map(|s| s.to_vec()));
        shards.extend((0..n).map(|_| vec![0u8; shard_len]));
        rs.encode(&mut shards)
            .map_err(|e| Error::Codec(format!("{:?}", e)))?;
        Ok(shards.split_off(n))
    }

    fn max_chunks(&self) -> usize {
        Self::MAX_CHUNKS
    }

    fn name(&self) -> &'static str {
        "reed-solomon-gf8"
    }
}
