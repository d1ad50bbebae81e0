//! AVX2 8-lane i32 SIMD vector implementation.
//!
//! This module provides `I32x8`, a SIMD vector type that wraps Intel's AVX2 `__m256i`
//! intrinsic to operate on 8 signed 32-bit integers at once.
//!
//! # Performance Characteristics
//!
//! - **Vector Width**: 256 bits (8 × i32)
//! - **Memory Alignment**: any; aligned loads are used when the pointer happens to
//!   sit on a 32-byte boundary
//!
//! # Supported Operations
//!
//! ## Loading and Storing
//! - `From<&[i32]>` / `from_slice()` - bounds checked loading of the first 8 elements
//! - `load()`, `load_aligned()`, `load_unaligned()` - direct memory loading
//! - `store_aligned_at()`, `store_unaligned_at()`, `store_in_slice()` - storing
//!
//! ## Lane Operations
//! - `splat()` (`_mm256_set1_epi32`), `gt_elements()` (`_mm256_cmpgt_epi32`)
//! - `reverse()` (`_mm256_permutevar8x32_epi32` with indices 7..0)
//! - `+` (`_mm256_add_epi32`), `*` (`_mm256_mullo_epi32`)
//! - `&`, `|`, `^`, `!` (`_mm256_and/or/xor_si256`, `!v == v ^ splat(-1)`)

#[cfg(target_arch = "x86")]
use std::arch::x86::*;

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use std::fmt;
use std::ops::{Add, BitAnd, BitOr, BitXor, Mul, Not};

use crate::simd::traits::fmt_lanes;
use crate::simd::{LaneGroup, SimdCompare, SimdLoad, SimdShuffle, SimdSplat, SimdStore, LANE_COUNT};

/// AVX2 memory alignment requirement in bytes.
pub(crate) const AVX_ALIGNMENT: usize = 32;

/// AVX2 SIMD vector containing 8 packed i32 values.
///
/// # Usage
///
/// Reached through [`crate::simd::Lanes`] when the build selected AVX2:
///
/// ```rust
/// use simdconv::simd::{LaneGroup, Lanes, SimdLoad, SimdShuffle};
///
/// let data = [1, 2, 3, 4, 5, 6, 7, 8];
/// let vector = Lanes::from_slice(&data);
/// assert_eq!(vector.reverse().to_array(), [8, 7, 6, 5, 4, 3, 2, 1]);
/// ```
#[derive(Copy, Clone, Debug)]
pub struct I32x8 {
    /// AVX2 256-bit vector register containing 8 packed i32 values
    pub elements: __m256i,
}

impl I32x8 {
    /// Checks if a pointer sits on a 32-byte boundary.
    #[inline(always)]
    pub fn is_aligned(ptr: *const i32) -> bool {
        (ptr as usize) % AVX_ALIGNMENT == 0
    }

    /// Loads 8 elements, choosing the aligned instruction when possible.
    ///
    /// # Safety
    ///
    /// Pointer must point to at least 8 valid i32 values.
    #[inline(always)]
    pub unsafe fn load(ptr: *const i32) -> Self {
        debug_assert!(!ptr.is_null(), "Pointer must not be null");

        match I32x8::is_aligned(ptr) {
            true => Self::load_aligned(ptr),
            false => Self::load_unaligned(ptr),
        }
    }

    /// Loads 8 elements from 32-byte aligned memory.
    ///
    /// # Safety
    ///
    /// Pointer must be 32-byte aligned and point to at least 8 valid i32 values.
    #[inline(always)]
    pub unsafe fn load_aligned(ptr: *const i32) -> Self {
        Self {
            elements: _mm256_load_si256(ptr as *const __m256i),
        }
    }

    /// Stores 8 elements to 32-byte aligned memory.
    ///
    /// # Safety
    ///
    /// Pointer must be 32-byte aligned and valid for writes of 8 i32 values.
    #[inline(always)]
    pub unsafe fn store_aligned_at(&self, ptr: *mut i32) {
        _mm256_store_si256(ptr as *mut __m256i, self.elements)
    }
}

impl PartialEq for I32x8 {
    fn eq(&self, other: &Self) -> bool {
        self.to_array() == other.to_array()
    }
}

impl Eq for I32x8 {}

impl From<[i32; LANE_COUNT]> for I32x8 {
    fn from(elements: [i32; LANE_COUNT]) -> Self {
        unsafe { Self::load_unaligned(elements.as_ptr()) }
    }
}

impl From<&[i32]> for I32x8 {
    /// Creates an I32x8 vector from the first 8 elements of a slice.
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

    /// Loads 8 elements from unaligned memory with `_mm256_loadu_si256`.
    #[inline(always)]
    unsafe fn load_unaligned(ptr: *const i32) -> Self::Output {
        debug_assert!(!ptr.is_null(), "Pointer must not be null");

        Self {
            elements: _mm256_loadu_si256(ptr as *const __m256i),
        }
    }

    #[inline(always)]
    fn from_slice(slice: &[i32]) -> Self::Output {
        assert!(
            slice.len() >= LANE_COUNT,
            "Slice must hold at least {LANE_COUNT} elements, got {}",
            slice.len()
        );

        // SAFETY: the slice holds at least LANE_COUNT readable elements.
        unsafe { Self::load(slice.as_ptr()) }
    }
}

impl SimdStore<i32> for I32x8 {
    /// Stores 8 elements to unaligned memory with `_mm256_storeu_si256`.
    #[inline(always)]
    unsafe fn store_unaligned_at(&self, ptr: *mut i32) {
        debug_assert!(!ptr.is_null(), "Pointer must not be null");

        _mm256_storeu_si256(ptr as *mut __m256i, self.elements)
    }

    #[inline(always)]
    fn store_in_slice(&self, slice: &mut [i32]) {
        assert!(
            slice.len() >= LANE_COUNT,
            "Slice must hold at least {LANE_COUNT} elements, got {}",
            slice.len()
        );

        let ptr = slice.as_mut_ptr();

        // SAFETY: the slice holds at least LANE_COUNT writable elements.
        unsafe {
            match I32x8::is_aligned(ptr) {
                true => self.store_aligned_at(ptr),
                false => self.store_unaligned_at(ptr),
            }
        }
    }
}

impl SimdSplat<i32> for I32x8 {
    #[inline(always)]
    fn splat(value: i32) -> Self {
        Self {
            elements: unsafe { _mm256_set1_epi32(value) },
        }
    }
}

impl SimdCompare for I32x8 {
    #[inline(always)]
    fn gt_elements(&self, rhs: Self) -> Self {
        Self {
            elements: unsafe { _mm256_cmpgt_epi32(self.elements, rhs.elements) },
        }
    }
}

impl SimdShuffle for I32x8 {
    /// Full cross-lane reversal; a single `vpermd`.
    #[inline(always)]
    fn reverse(&self) -> Self {
        unsafe {
            let indices = _mm256_setr_epi32(7, 6, 5, 4, 3, 2, 1, 0);
            Self {
                elements: _mm256_permutevar8x32_epi32(self.elements, indices),
            }
        }
    }
}

/// Element-wise wrapping addition (`_mm256_add_epi32`).
impl Add for I32x8 {
    type Output = Self;

    #[inline(always)]
    fn add(self, rhs: Self) -> Self::Output {
        Self {
            elements: unsafe { _mm256_add_epi32(self.elements, rhs.elements) },
        }
    }
}

/// Element-wise multiplication keeping the low 32 bits (`_mm256_mullo_epi32`).
impl Mul for I32x8 {
    type Output = Self;

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self::Output {
        Self {
            elements: unsafe { _mm256_mullo_epi32(self.elements, rhs.elements) },
        }
    }
}

impl BitAnd for I32x8 {
    type Output = Self;

    #[inline(always)]
    fn bitand(self, rhs: Self) -> Self::Output {
        Self {
            elements: unsafe { _mm256_and_si256(self.elements, rhs.elements) },
        }
    }
}

impl BitOr for I32x8 {
    type Output = Self;

    #[inline(always)]
    fn bitor(self, rhs: Self) -> Self::Output {
        Self {
            elements: unsafe { _mm256_or_si256(self.elements, rhs.elements) },
        }
    }
}

impl BitXor for I32x8 {
    type Output = Self;

    #[inline(always)]
    fn bitxor(self, rhs: Self) -> Self::Output {
        Self {
            elements: unsafe { _mm256_xor_si256(self.elements, rhs.elements) },
        }
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
        fmt_lanes(&self.to_array(), f)
    }
}

impl LaneGroup for I32x8 {
    #[inline(always)]
    fn to_array(&self) -> [i32; LANE_COUNT] {
        let mut result = [0i32; LANE_COUNT];
        unsafe { self.store_unaligned_at(result.as_mut_ptr()) };
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd::fallback::i32x8::I32x8 as ScalarI32x8;
    use std::alloc::{alloc, dealloc, Layout};

    /// Helper function to create aligned memory for testing
    fn alloc_aligned(size: usize, align: usize) -> *mut i32 {
        let layout = Layout::from_size_align(size * std::mem::size_of::<i32>(), align).unwrap();
        unsafe { alloc(layout) as *mut i32 }
    }

    /// Helper function to deallocate aligned memory for testing
    fn dealloc_aligned(ptr: *mut i32, size: usize, align: usize) {
        let layout = Layout::from_size_align(size * std::mem::size_of::<i32>(), align).unwrap();
        unsafe { dealloc(ptr as *mut u8, layout) };
    }

    static INPUTS: [[i32; 8]; 4] = [
        [1, 2, 3, 4, 5, 6, 7, 8],
        [i32::MAX, i32::MIN, -1, 0, 1, 1 << 30, -(1 << 30), 123_456_789],
        [-5, 17, 0, 0, i32::MIN, i32::MAX, 42, -42],
        [0x0F0F_0F0F, -0x0F0F_0F10, 7, -7, 65_536, 65_537, -65_536, 3],
    ];

    mod alignment_tests {
        use super::*;

        #[test]
        fn test_is_aligned_32_byte_boundary() {
            let aligned_ptr = alloc_aligned(8, 32);
            assert!(I32x8::is_aligned(aligned_ptr));
            dealloc_aligned(aligned_ptr, 8, 32);
        }

        #[test]
        fn test_is_not_aligned() {
            let aligned_ptr = alloc_aligned(16, 32);
            let unaligned_ptr = unsafe { aligned_ptr.add(1) };
            assert!(!I32x8::is_aligned(unaligned_ptr));
            dealloc_aligned(aligned_ptr, 16, 32);
        }

        #[test]
        fn test_aligned_roundtrip() {
            let src = alloc_aligned(8, 32);
            let dst = alloc_aligned(8, 32);
            unsafe {
                std::ptr::copy_nonoverlapping(INPUTS[1].as_ptr(), src, 8);
                let vec = I32x8::load(src);
                vec.store_aligned_at(dst);
                assert_eq!(std::slice::from_raw_parts(dst, 8), &INPUTS[1]);
            }
            dealloc_aligned(src, 8, 32);
            dealloc_aligned(dst, 8, 32);
        }
    }

    mod load_store_tests {
        use super::*;

        #[test]
        fn test_from_slice_oversized() {
            let data = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10];
            let vec = I32x8::from(&data[2..]);
            assert_eq!(vec.to_array(), [3, 4, 5, 6, 7, 8, 9, 10]);
        }

        #[test]
        fn test_store_unaligned_offset() {
            let mut data = [0i32; 11];
            let vec = I32x8::from(INPUTS[0]);
            vec.store_in_slice(&mut data[3..]);
            assert_eq!(data, [0, 0, 0, 1, 2, 3, 4, 5, 6, 7, 8]);
        }

        #[test]
        #[should_panic(expected = "at least 8 elements")]
        fn test_from_short_slice_panics() {
            let _ = I32x8::from_slice(&[1, 2, 3, 4, 5, 6, 7]);
        }
    }

    /// Every operation must agree with the scalar backend lane for lane.
    mod parity_tests {
        use super::*;

        fn pairs() -> impl Iterator<Item = ([i32; 8], [i32; 8])> {
            INPUTS
                .iter()
                .flat_map(|a| INPUTS.iter().map(move |b| (*a, *b)))
        }

        #[test]
        fn test_binary_ops_match_scalar() {
            for (a, b) in pairs() {
                let (va, vb) = (I32x8::from(a), I32x8::from(b));
                let (sa, sb) = (ScalarI32x8::from(a), ScalarI32x8::from(b));

                assert_eq!((va + vb).to_array(), (sa + sb).to_array(), "add {a:?} {b:?}");
                assert_eq!((va * vb).to_array(), (sa * sb).to_array(), "mul {a:?} {b:?}");
                assert_eq!((va & vb).to_array(), (sa & sb).to_array(), "and {a:?} {b:?}");
                assert_eq!((va | vb).to_array(), (sa | sb).to_array(), "or {a:?} {b:?}");
                assert_eq!((va ^ vb).to_array(), (sa ^ sb).to_array(), "xor {a:?} {b:?}");
                assert_eq!(
                    va.gt_elements(vb).to_array(),
                    sa.gt_elements(sb).to_array(),
                    "cmpgt {a:?} {b:?}"
                );
            }
        }

        #[test]
        fn test_unary_ops_match_scalar() {
            for a in INPUTS {
                let (va, sa) = (I32x8::from(a), ScalarI32x8::from(a));
                assert_eq!((!va).to_array(), (!sa).to_array());
                assert_eq!(va.reverse().to_array(), sa.reverse().to_array());
                assert_eq!(va.to_string(), sa.to_string());
                assert_eq!(
                    I32x8::splat(a[1]).to_array(),
                    ScalarI32x8::splat(a[1]).to_array()
                );
            }
        }
    }
}
