use std::collections::HashMap;

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Stream used to fill the initial world.
pub const POPULATE_STREAM: &str = "populate";
/// Stream used to pick relocation targets.
pub const RELOCATE_STREAM: &str = "relocate";

/// Named, independently seeded RNG streams derived from one master seed.
///
/// A stream's seed depends only on the master seed and its name, so the order
/// streams are first requested in does not change what they produce.
pub struct RngManager {
    seed: u64,
    streams: HashMap<String, ChaCha8Rng>,
}

impl RngManager {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            streams: HashMap::new(),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn stream(&mut self, name: &str) -> SimRng<'_> {
        let seed = derive_seed(self.seed, name);
        let entry = self
            .streams
            .entry(name.to_string())
            .or_insert_with(|| ChaCha8Rng::seed_from_u64(seed));
        SimRng { inner: entry }
    }
}

fn derive_seed(master: u64, name: &str) -> u64 {
    let mut seed = master
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407);
    for byte in name.bytes() {
        seed ^= u64::from(byte);
        seed = seed.wrapping_mul(0x100000001b3);
    }
    seed.wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407)
}

pub struct SimRng<'a> {
    inner: &'a mut ChaCha8Rng,
}

impl<'a> RngCore for SimRng<'a> {
    fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.inner.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.inner.try_fill_bytes(dest)
    }
}
