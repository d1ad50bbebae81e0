//! Lane-group layer: 8 x `i32` vectors behind a common set of traits.
//!
//! Two backends provide identical observable behavior:
//!
//! - [`avx2::i32x8::I32x8`] wraps a 256-bit `__m256i` register (x86/x86_64
//!   hosts where the build script detected AVX2),
//! - [`fallback::i32x8::I32x8`] wraps a plain `[i32; 8]` and is always compiled.
//!
//! [`Lanes`] names the backend chosen at build time; the `scalar` cargo feature
//! forces the fallback.
//!
//! The AVX2 lane operations are `#[inline(always)]` but carry no target
//! feature themselves. Kernels generic over [`LaneGroup`] are instantiated
//! inside `#[target_feature(enable = "avx2")]` entry points so the intrinsics
//! are inlined as single instructions, and those entry points are only entered
//! after [`avx2_available`] confirms the running CPU supports them.

#[cfg(all(avx2, any(target_arch = "x86", target_arch = "x86_64")))]
pub mod avx2;

pub mod fallback;

pub mod traits;

pub use traits::{LaneGroup, SimdCompare, SimdLoad, SimdShuffle, SimdSplat, SimdStore};

/// Number of `i32` lanes in a lane group (256 bits).
pub const LANE_COUNT: usize = 8;

#[cfg(all(avx2, any(target_arch = "x86", target_arch = "x86_64")))]
pub type Lanes = avx2::i32x8::I32x8;

#[cfg(not(all(avx2, any(target_arch = "x86", target_arch = "x86_64"))))]
pub type Lanes = fallback::i32x8::I32x8;

/// Portable lane group, used when AVX2 is unavailable at run time.
pub type ScalarLanes = fallback::i32x8::I32x8;

/// Whether the running CPU can execute the AVX2 backend.
#[cfg(all(avx2, any(target_arch = "x86", target_arch = "x86_64")))]
#[inline]
pub fn avx2_available() -> bool {
    is_x86_feature_detected!("avx2")
}

/// Name of the backend behind [`Lanes`].
#[cfg(all(avx2, any(target_arch = "x86", target_arch = "x86_64")))]
pub const BACKEND: &str = "avx2";

/// Name of the backend behind [`Lanes`].
#[cfg(not(all(avx2, any(target_arch = "x86", target_arch = "x86_64"))))]
pub const BACKEND: &str = "fallback";

/// Name of the backend the lane kernels actually run on in this process.
///
/// Equals [`BACKEND`] unless the binary was built with AVX2 and runs on a CPU
/// without it.
pub fn active_backend() -> &'static str {
    #[cfg(all(avx2, any(target_arch = "x86", target_arch = "x86_64")))]
    {
        if avx2_available() {
            return "avx2";
        }
    }

    "fallback"
}
