//! In-place reversal of a matrix's linear element order.
//!
//! Element `i` trades places with element `n - 1 - i`. For a row-major matrix
//! this equals a 180° rotation; it is not a transpose. The bulk of the work is
//! done a lane group at a time: the front block `[x, x + 8)` and its mirror
//! `[n - x - 8, n - x)` are loaded, each is lane-reversed, and they are stored
//! into each other's place. The elements between the last whole block and the
//! midpoint are swapped one by one.

use tracing::trace;

use crate::matrix::Matrix;
use crate::simd::{self, LaneGroup, LANE_COUNT};

/// Reverses the elements of `matrix` in place with the build's lane backend.
///
/// `rows` and `cols` are unchanged.
pub fn flip(matrix: &mut Matrix) {
    flip_slice(matrix.as_mut_slice());
}

/// Reverses `data` in place with the build's lane backend.
pub fn flip_slice(data: &mut [i32]) {
    #[cfg(all(avx2, any(target_arch = "x86", target_arch = "x86_64")))]
    {
        if simd::avx2_available() {
            // SAFETY: AVX2 support was checked at runtime.
            unsafe { flip_avx2(data) };
            return;
        }
    }

    flip_with::<simd::ScalarLanes>(data);
}

#[cfg(all(avx2, any(target_arch = "x86", target_arch = "x86_64")))]
#[target_feature(enable = "avx2")]
unsafe fn flip_avx2(data: &mut [i32]) {
    flip_with::<simd::Lanes>(data);
}

/// Reverses `data` in place using the lane group `V` for whole blocks.
///
/// Always inlined, so the intrinsics of `V` are compiled with the target
/// features of the caller.
#[inline(always)]
pub fn flip_with<V: LaneGroup>(data: &mut [i32]) {
    let n = data.len();
    let half = n / 2;
    let vector_end = half / LANE_COUNT * LANE_COUNT;

    trace!(len = n, vector_end, "flip");

    {
        // `back` starts at the midpoint, so the mirror of the front block at
        // `x` begins at `back.len() - x - LANE_COUNT` and never overlaps it.
        let (front, back) = data.split_at_mut(half);
        let back_len = back.len();
        let front_ptr = front.as_mut_ptr();
        let back_ptr = back.as_mut_ptr();

        for x in (0..vector_end).step_by(LANE_COUNT) {
            let mirror = back_len - x - LANE_COUNT;

            // SAFETY: x + LANE_COUNT <= vector_end <= front.len() and
            // mirror + LANE_COUNT <= back_len, so both blocks are in bounds.
            unsafe {
                let head = V::load_unaligned(front_ptr.add(x));
                let tail = V::load_unaligned(back_ptr.add(mirror));
                tail.reverse().store_unaligned_at(front_ptr.add(x));
                head.reverse().store_unaligned_at(back_ptr.add(mirror));
            }
        }
    }

    for x in vector_end..half {
        data.swap(x, n - 1 - x);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd::fallback::i32x8::I32x8 as ScalarI32x8;

    fn reversed(data: &[i32]) -> Vec<i32> {
        data.iter().rev().copied().collect()
    }

    #[test]
    fn test_flip_trivial_sizes() {
        let mut empty: [i32; 0] = [];
        flip_slice(&mut empty);

        let mut single = [42];
        flip_slice(&mut single);
        assert_eq!(single, [42]);
    }

    #[test]
    fn test_flip_small_sizes_match_naive_reversal() {
        for n in 2..=16 {
            let original: Vec<i32> = (1..=n).collect();
            let mut data = original.clone();
            flip_slice(&mut data);
            assert_eq!(data, reversed(&original), "n = {n}");
        }
    }

    #[test]
    fn test_flip_around_block_boundaries() {
        // 16 is the first length with a whole block, 32 the first with two
        for n in [15, 16, 17, 30, 31, 32, 33, 47, 48, 49, 1000, 1001] {
            let original: Vec<i32> = (0..n).map(|i| i * 3 - 7).collect();
            let mut data = original.clone();
            flip_slice(&mut data);
            assert_eq!(data, reversed(&original), "n = {n}");
        }
    }

    #[test]
    fn test_flip_with_scalar_lanes() {
        for n in [0, 1, 7, 16, 17, 33, 64, 99] {
            let original: Vec<i32> = (0..n).collect();
            let mut data = original.clone();
            flip_with::<ScalarI32x8>(&mut data);
            assert_eq!(data, reversed(&original), "n = {n}");
        }
    }

    #[cfg(all(avx2, any(target_arch = "x86", target_arch = "x86_64")))]
    #[test]
    fn test_avx2_entry_point_matches_scalar_lanes() {
        if !simd::avx2_available() {
            return;
        }
        for n in [0, 1, 8, 16, 17, 31, 32, 33, 257, 4096, 4099] {
            let original: Vec<i32> = (0..n).map(|i| i * 7 - 1000).collect();
            let mut expected = original.clone();
            flip_with::<ScalarI32x8>(&mut expected);

            let mut data = original;
            unsafe { flip_avx2(&mut data) };
            assert_eq!(data, expected, "n = {n}");
        }
    }

    #[test]
    fn test_flip_odd_middle_untouched() {
        let mut data: Vec<i32> = (0..35).collect();
        flip_slice(&mut data);
        assert_eq!(data[17], 17);
    }

    #[test]
    fn test_flip_matrix_keeps_shape() {
        let mut m = Matrix::new(2, 2, vec![1, 2, 3, 4]).unwrap();
        flip(&mut m);
        assert_eq!(m.shape(), (2, 2));
        assert_eq!(m.as_slice(), &[4, 3, 2, 1]);
    }

    #[test]
    fn test_flip_is_involution() {
        let original = Matrix::from_fn(7, 9, |r, c| (r * 9 + c) as i32 * -11);
        let mut m = original.clone();
        flip(&mut m);
        assert_ne!(m, original);
        flip(&mut m);
        assert_eq!(m, original);
    }
}
