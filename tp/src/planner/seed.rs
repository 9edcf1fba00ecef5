//! Seeded randomness for planner draws
//!
//! Every draw site asks for its own generator, keyed by a purpose tag and an
//! ordinal, so a draw depends only on the plan seed and where it happens.
//! Streams are HMAC-SHA256 keyed ChaCha8, so a seed replays the same plan on
//! every platform and toolchain.

use hmac::digest::Key;
use hmac::{Hmac, Mac};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Mix a plan seed with a draw site into an independent stream seed
///
/// The result is HMAC-SHA256 keyed by the little-endian plan seed over the
/// purpose bytes followed by the little-endian ordinal.
pub fn derive_seed(seed: u64, purpose: &str, ordinal: u64) -> [u8; 32] {
    // HMAC zero-pads short keys to the block size
    let mut key = Key::<HmacSha256>::default();
    key[..8].copy_from_slice(&seed.to_le_bytes());
    let mut mac = <HmacSha256 as Mac>::new(&key);
    mac.update(purpose.as_bytes());
    mac.update(&ordinal.to_le_bytes());
    let digest = mac.finalize().into_bytes();
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}

/// The seed a plan is drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSource {
    seed: u64,
}

impl SeedSource {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Use the caller's seed, or pick a fresh one
    pub fn from_request(seed: Option<u64>) -> Self {
        Self::new(seed.unwrap_or_else(rand::random))
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generator for one draw site
    pub fn rng(&self, purpose: &str, ordinal: u64) -> ChaCha8Rng {
        ChaCha8Rng::from_seed(derive_seed(self.seed, purpose, ordinal))
    }
}
