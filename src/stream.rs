use crate::kdf::SEED_LEN;
use sha2::{Digest, Sha512_256};

/// Counter-based expansion of a fixed seed into a deterministic
/// sequence of pseudo-random integers.
///
/// Calls are strictly sequential; one instance serves exactly one
/// generation run and is never shared across requests. The sequence is
/// derived for reproducibility, not for unpredictability once the seed
/// is known.
pub struct HashStream {
    seed: [u8; SEED_LEN],
    ctr: u64,
}

impl HashStream {
    pub fn new(seed: [u8; SEED_LEN]) -> Self {
        Self { seed, ctr: 0 }
    }

    fn next_u64(&mut self) -> u64 {
        let mut hasher = Sha512_256::new();
        hasher.update(self.seed);
        hasher.update(self.ctr.to_be_bytes());
        let digest = hasher.finalize();
        self.ctr += 1;

        let mut high = [0u8; 8];
        high.copy_from_slice(&digest[..8]);
        u64::from_be_bytes(high)
    }

    /// Next value in `[0, bound)`. A bound of zero is a defined
    /// degenerate case: returns 0 without consuming the stream.
    pub fn next(&mut self, bound: u64) -> u64 {
        if bound == 0 {
            return 0;
        }
        self.next_u64() % bound
    }
}
