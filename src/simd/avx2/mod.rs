//! AVX2 lane groups over 256-bit integer registers.
//!
//! # Architecture Requirements
//!
//! - **CPU Support**: Intel Haswell (2013+) or AMD Excavator (2015+)
//! - **Target Architecture**: x86 or x86_64
//! - **Detection**: the build script inspects the host CPU and emits
//!   `cfg(avx2)` only when the instruction set is present
//!
//! # Available Types
//!
//! - [`i32x8::I32x8`]: 256-bit vector containing 8 packed `i32` values
//!
//! # Conditional Compilation
//!
//! This module is only compiled when AVX2 was detected and the `scalar`
//! feature is off. Otherwise [`crate::simd::fallback`] provides the same lane
//! semantics with plain arrays.

pub mod i32x8;
