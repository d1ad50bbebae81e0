//! Portable scalar lane groups.
//!
//! Compiled on every platform. Used as [`crate::simd::Lanes`] when AVX2 is not
//! available (or the `scalar` feature is enabled), and as the reference the
//! AVX2 backend is tested against.

pub mod i32x8;
