//! Direct "valid"-mode 2D convolution of `i32` matrices.
//!
//! For an input `A` (`Ar x Ac`) and kernel `B` (`Br x Bc`) the output has
//! `(Ar - Br + 1) x (Ac - Bc + 1)` cells, each the sum over the kernel of
//! `A[or + br][oc + bc] * flip(B)[br][bc]`. All arithmetic wraps modulo 2^32
//! exactly like the lane-group `Add`/`Mul`; there is no widening accumulator.
//!
//! The kernel is flipped *in place* before the sum is taken, which is why every
//! entry point takes it as `&mut Matrix`. After a successful call the caller's
//! kernel holds the flipped order. Use [`convolve_preserving_kernel`] when the
//! original orientation is still needed.

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::error::{dimension_error, validation_error, Result, SimdconvError};
use crate::flip::flip;
use crate::matrix::Matrix;
use crate::simd::{self, LaneGroup, LANE_COUNT};

/// Inner loop used to fill the output matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConvolveStrategy {
    /// Scalar quadruple loop, one output cell at a time.
    #[default]
    Naive,
    /// Eight adjacent output columns per lane group, scalar tail.
    Simd,
}

impl fmt::Display for ConvolveStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvolveStrategy::Naive => f.write_str("naive"),
            ConvolveStrategy::Simd => f.write_str("simd"),
        }
    }
}

impl FromStr for ConvolveStrategy {
    type Err = SimdconvError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "naive" | "scalar" => Ok(ConvolveStrategy::Naive),
            "simd" => Ok(ConvolveStrategy::Simd),
            other => Err(validation_error(format!(
                "unknown convolution strategy '{other}' (expected naive or simd)"
            ))),
        }
    }
}

/// Output shape of convolving `a` with `b`.
///
/// Fails with a dimension error when either operand is empty or `b` is larger
/// than `a` along some axis.
pub fn output_dims(a: &Matrix, b: &Matrix) -> Result<(usize, usize)> {
    if a.is_empty() || b.is_empty() || b.rows() > a.rows() || b.cols() > a.cols() {
        return Err(dimension_error(a.shape(), b.shape()));
    }

    Ok((a.rows() - b.rows() + 1, a.cols() - b.cols() + 1))
}

/// Convolves `a` with `b` using the scalar loop, flipping `b` in place.
///
/// On a dimension error `b` is left untouched; no output is produced on any
/// error.
pub fn convolve(a: &Matrix, b: &mut Matrix) -> Result<Matrix> {
    convolve_with(a, b, ConvolveStrategy::Naive)
}

/// Same contract and bit-identical result as [`convolve`], computed with lane groups.
pub fn simd_convolve(a: &Matrix, b: &mut Matrix) -> Result<Matrix> {
    convolve_with(a, b, ConvolveStrategy::Simd)
}

/// Convolves `a` with a copy of `b`, leaving `b` in its original orientation.
pub fn convolve_preserving_kernel(
    a: &Matrix,
    b: &Matrix,
    strategy: ConvolveStrategy,
) -> Result<Matrix> {
    let mut kernel = b.clone();
    convolve_with(a, &mut kernel, strategy)
}

/// Convolves `a` with `b`, flipping `b` in place, using `strategy` for the inner loop.
pub fn convolve_with(a: &Matrix, b: &mut Matrix, strategy: ConvolveStrategy) -> Result<Matrix> {
    let (out_rows, out_cols) = output_dims(a, b)?;

    flip(b);

    let mut output = Matrix::try_zeroed(out_rows, out_cols)?;

    debug!(
        a_rows = a.rows(),
        a_cols = a.cols(),
        b_rows = b.rows(),
        b_cols = b.cols(),
        %strategy,
        backend = simd::active_backend(),
        "convolve"
    );

    match strategy {
        ConvolveStrategy::Naive => naive_kernel(a, b, &mut output),
        ConvolveStrategy::Simd => lane_kernel(a, b, &mut output),
    }

    Ok(output)
}

/// Runs [`simd_kernel`] on the AVX2 lanes when the CPU has them.
fn lane_kernel(a: &Matrix, flipped: &Matrix, output: &mut Matrix) {
    #[cfg(all(avx2, any(target_arch = "x86", target_arch = "x86_64")))]
    {
        if simd::avx2_available() {
            // SAFETY: AVX2 support was checked at runtime.
            unsafe { simd_kernel_avx2(a, flipped, output) };
            return;
        }
    }

    simd_kernel::<simd::ScalarLanes>(a, flipped, output);
}

#[cfg(all(avx2, any(target_arch = "x86", target_arch = "x86_64")))]
#[target_feature(enable = "avx2")]
unsafe fn simd_kernel_avx2(a: &Matrix, flipped: &Matrix, output: &mut Matrix) {
    simd_kernel::<simd::Lanes>(a, flipped, output);
}

/// One output cell: wrapping dot product of the window at `(o_row, o_col)` with the flipped kernel.
#[inline(always)]
fn scalar_cell(a: &Matrix, flipped: &Matrix, o_row: usize, o_col: usize) -> i32 {
    let a_data = a.as_slice();
    let b_data = flipped.as_slice();
    let (a_cols, b_cols) = (a.cols(), flipped.cols());

    let mut result = 0i32;
    for b_row in 0..flipped.rows() {
        for b_col in 0..b_cols {
            let a_idx = (o_row + b_row) * a_cols + (o_col + b_col);
            let b_idx = b_row * b_cols + b_col;

            result = result.wrapping_add(a_data[a_idx].wrapping_mul(b_data[b_idx]));
        }
    }
    result
}

fn naive_kernel(a: &Matrix, flipped: &Matrix, output: &mut Matrix) {
    let out_cols = output.cols();

    for (o_row, out_row) in output.as_mut_slice().chunks_exact_mut(out_cols).enumerate() {
        for (o_col, cell) in out_row.iter_mut().enumerate() {
            *cell = scalar_cell(a, flipped, o_row, o_col);
        }
    }
}

/// Accumulates eight neighbouring output cells per step: for each kernel tap
/// the tap is broadcast and multiplied with eight consecutive `A` elements.
/// Wrapping addition is associative, so the result equals [`naive_kernel`].
#[inline(always)]
pub(crate) fn simd_kernel<V: LaneGroup>(a: &Matrix, flipped: &Matrix, output: &mut Matrix) {
    let a_data = a.as_slice();
    let b_data = flipped.as_slice();
    let (a_cols, b_rows, b_cols) = (a.cols(), flipped.rows(), flipped.cols());
    let out_cols = output.cols();
    let vector_end = out_cols / LANE_COUNT * LANE_COUNT;

    for (o_row, out_row) in output.as_mut_slice().chunks_exact_mut(out_cols).enumerate() {
        for o_col in (0..vector_end).step_by(LANE_COUNT) {
            let mut acc = V::splat(0);
            for b_row in 0..b_rows {
                let a_row = &a_data[(o_row + b_row) * a_cols..][..a_cols];
                for b_col in 0..b_cols {
                    let tap = V::splat(b_data[b_row * b_cols + b_col]);
                    // o_col + b_col + LANE_COUNT <= out_cols - 1 + b_cols <= a_cols
                    let window = V::from_slice(&a_row[o_col + b_col..]);
                    acc = acc + window * tap;
                }
            }
            acc.store_in_slice(&mut out_row[o_col..]);
        }

        for (o_col, cell) in out_row.iter_mut().enumerate().skip(vector_end) {
            *cell = scalar_cell(a, flipped, o_row, o_col);
        }
    }
}
