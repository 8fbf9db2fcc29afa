use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{Codec, NAMESPACE_SIZE, PARITY_SHARES_NAMESPACE, ReedSolomonCodec, Share};

/// `count` random shares of `share_size` bytes, sorted by namespace.
///
/// None of them carries the parity namespace.
pub fn random_namespaced_data(count: usize, share_size: usize, seed: u64) -> Vec<Vec<u8>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut data: Vec<Vec<u8>> = (0..count)
        .map(|_| {
            let mut share = vec![0u8; share_size];
            rng.fill(&mut share[..]);
            if share[..NAMESPACE_SIZE] == *PARITY_SHARES_NAMESPACE.as_bytes() {
                share[NAMESPACE_SIZE - 1] = 0xfe;
            }
            share
        })
        .collect();
    data.sort();
    data
}

/// A row-major `width x width` square of sorted random shares.
///
/// Sorting the flattened square keeps every row and every column sorted.
pub fn random_square(width: usize, share_size: usize, seed: u64) -> Vec<Share> {
    random_namespaced_data(width * width, share_size, seed)
        .into_iter()
        .map(|bytes| Share::new(bytes).expect("share holds a namespace"))
        .collect()
}

/// `data` followed by its Reed-Solomon parity.
pub fn erasured_data(data: &[Vec<u8>]) -> Vec<Vec<u8>> {
    let refs: Vec<&[u8]> = data.iter().map(Vec::as_slice).collect();
    let parity = ReedSolomonCodec.encode(&refs).expect("encode");
    data.iter().cloned().chain(parity).collect()
}
