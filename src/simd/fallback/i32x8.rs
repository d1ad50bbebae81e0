//! Scalar 8-lane i32 vector.
//!
//! Each operation is an unrolled loop over a `[i32; 8]`, written so that its
//! results match the AVX2 instructions lane for lane: wrapping adds, low-half
//! multiplies and all-ones compare masks.

use std::fmt;
use std::ops::{Add, BitAnd, BitOr, BitXor, Mul, Not};

use crate::simd::traits::fmt_lanes;
use crate::simd::{LaneGroup, SimdCompare, SimdLoad, SimdShuffle, SimdSplat, SimdStore, LANE_COUNT};

/// Eight packed `i32` values held in an ordinary array.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct I32x8 {
    pub elements: [i32; LANE_COUNT],
}

impl I32x8 {
    #[inline(always)]
    fn map2(self, rhs: Self, f: impl Fn(i32, i32) -> i32) -> Self {
        let mut elements = [0i32; LANE_COUNT];
        for (i, out) in elements.iter_mut().enumerate() {
            *out = f(self.elements[i], rhs.elements[i]);
        }
        Self { elements }
    }
}

impl From<[i32; LANE_COUNT]> for I32x8 {
    fn from(elements: [i32; LANE_COUNT]) -> Self {
        Self { elements }
    }
}

impl From<&[i32]> for I32x8 {
    /// Takes the first 8 elements of `slice`.
    ///
    /// # Panics
    ///
    /// Panics if the slice is shorter than 8 elements.
    fn from(slice: &[i32]) -> Self {
        Self::from_slice(slice)
    }
}

impl SimdLoad<i32> for I32x8 {
    type Output = Self;

    #[inline(always)]
    unsafe fn load_unaligned(ptr: *const i32) -> Self::Output {
        debug_assert!(!ptr.is_null(), "Pointer must not be null");

        Self {
            elements: std::ptr::read_unaligned(ptr as *const [i32; LANE_COUNT]),
        }
    }

    #[inline(always)]
    fn from_slice(slice: &[i32]) -> Self::Output {
        assert!(
            slice.len() >= LANE_COUNT,
            "Slice must hold at least {LANE_COUNT} elements, got {}",
            slice.len()
        );

        let mut elements = [0i32; LANE_COUNT];
        elements.copy_from_slice(&slice[..LANE_COUNT]);
        Self { elements }
    }
}

impl SimdStore<i32> for I32x8 {
    #[inline(always)]
    unsafe fn store_unaligned_at(&self, ptr: *mut i32) {
        debug_assert!(!ptr.is_null(), "Pointer must not be null");

        std::ptr::write_unaligned(ptr as *mut [i32; LANE_COUNT], self.elements);
    }

    #[inline(always)]
    fn store_in_slice(&self, slice: &mut [i32]) {
        assert!(
            slice.len() >= LANE_COUNT,
            "Slice must hold at least {LANE_COUNT} elements, got {}",
            slice.len()
        );

        slice[..LANE_COUNT].copy_from_slice(&self.elements);
    }
}

impl SimdSplat<i32> for I32x8 {
    #[inline(always)]
    fn splat(value: i32) -> Self {
        Self {
            elements: [value; LANE_COUNT],
        }
    }
}

impl SimdCompare for I32x8 {
    #[inline(always)]
    fn gt_elements(&self, rhs: Self) -> Self {
        self.map2(rhs, |a, b| if a > b { -1 } else { 0 })
    }
}

impl SimdShuffle for I32x8 {
    #[inline(always)]
    fn reverse(&self) -> Self {
        let mut elements = self.elements;
        elements.reverse();
        Self { elements }
    }
}

impl Add for I32x8 {
    type Output = Self;

    #[inline(always)]
    fn add(self, rhs: Self) -> Self::Output {
        self.map2(rhs, i32::wrapping_add)
    }
}

impl Mul for I32x8 {
    type Output = Self;

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self::Output {
        self.map2(rhs, i32::wrapping_mul)
    }
}

impl BitAnd for I32x8 {
    type Output = Self;

    #[inline(always)]
    fn bitand(self, rhs: Self) -> Self::Output {
        self.map2(rhs, |a, b| a & b)
    }
}

impl BitOr for I32x8 {
    type Output = Self;

    #[inline(always)]
    fn bitor(self, rhs: Self) -> Self::Output {
        self.map2(rhs, |a, b| a | b)
    }
}

impl BitXor for I32x8 {
    type Output = Self;

    #[inline(always)]
    fn bitxor(self, rhs: Self) -> Self::Output {
        self.map2(rhs, |a, b| a ^ b)
    }
}

impl Not for I32x8 {
    type Output = Self;

    #[inline(always)]
    fn not(self) -> Self::Output {
        self ^ Self::splat(-1)
    }
}

impl fmt::Display for I32x8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_lanes(&self.elements, f)
    }
}

impl LaneGroup for I32x8 {
    #[inline(always)]
    fn to_array(&self) -> [i32; LANE_COUNT] {
        self.elements
    }
}
