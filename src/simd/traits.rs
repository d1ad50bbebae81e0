//! Trait seams of the lane-group layer.
//!
//! Every backend exposes the same per-lane semantics through these traits, so
//! the flip and convolution kernels are written once and instantiated with
//! whichever 8 x `i32` implementation the build selected.

use std::fmt::Display;
use std::ops::{Add, BitAnd, BitOr, BitXor, Mul, Not};

use super::LANE_COUNT;

pub trait SimdLoad<T> {
    type Output;

    /// Loads `LANE_COUNT` elements from possibly unaligned memory.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reads of `LANE_COUNT` consecutive `T`s.
    unsafe fn load_unaligned(ptr: *const T) -> Self::Output;

    /// Loads the first `LANE_COUNT` elements of `slice`.
    ///
    /// # Panics
    ///
    /// Panics if the slice holds fewer than `LANE_COUNT` elements.
    fn from_slice(slice: &[T]) -> Self::Output;
}

pub trait SimdStore<T> {
    /// Stores all lanes to possibly unaligned memory.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for writes of `LANE_COUNT` consecutive `T`s.
    unsafe fn store_unaligned_at(&self, ptr: *mut T);

    /// Stores all lanes into the first `LANE_COUNT` elements of `slice`.
    ///
    /// # Panics
    ///
    /// Panics if the slice holds fewer than `LANE_COUNT` elements.
    fn store_in_slice(&self, slice: &mut [T]);
}

pub trait SimdSplat<T> {
    /// Sets every lane to `value`.
    fn splat(value: T) -> Self;
}

pub trait SimdCompare {
    /// Signed per-lane `self > rhs`; a true lane is all ones (`-1`), a false lane is zero.
    fn gt_elements(&self, rhs: Self) -> Self;
}

pub trait SimdShuffle {
    /// Reverses lane order, i.e. permutes with indices `[7, 6, 5, 4, 3, 2, 1, 0]`.
    fn reverse(&self) -> Self;
}

/// A group of `LANE_COUNT` 32-bit signed integers processed together.
///
/// `Add` and `Mul` wrap modulo 2^32 (`Mul` keeps the low half of the product),
/// `Not` is `self ^ splat(-1)`. Implementations must agree bit for bit.
pub trait LaneGroup:
    Copy
    + SimdLoad<i32, Output = Self>
    + SimdStore<i32>
    + SimdSplat<i32>
    + SimdCompare
    + SimdShuffle
    + Add<Output = Self>
    + Mul<Output = Self>
    + BitAnd<Output = Self>
    + BitOr<Output = Self>
    + BitXor<Output = Self>
    + Not<Output = Self>
    + Display
{
    fn to_array(&self) -> [i32; LANE_COUNT];

    /// Prints the lanes as comma separated decimals. Diagnostics only.
    fn debug_print(&self) {
        println!("{self}");
    }
}

/// Writes lanes as `a, b, c, ...`; shared by the backends' `Display` impls.
pub(crate) fn fmt_lanes(
    lanes: &[i32; LANE_COUNT],
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    for (i, lane) in lanes.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{lane}")?;
    }
    Ok(())
}
