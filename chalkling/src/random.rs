//! Random sources for regeneration.
//!
//! Every randomized operation takes `&mut R where R: Rng + ?Sized`, so hosts
//! pass an OS-seeded generator and tests pass a seeded one.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Uniform draw between `lo` and `hi`, with either ordering of the bounds.
#[inline]
pub fn uniform<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if lo == hi {
        return lo;
    }
    let t: f32 = rng.random();
    lo + (hi - lo) * t
}

pub fn system_rng() -> StdRng {
    StdRng::from_os_rng()
}

pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}
