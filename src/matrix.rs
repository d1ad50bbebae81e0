//! Row-major `i32` matrix owning a single contiguous buffer.

use std::fmt;

use ndarray::Array2;

use crate::error::{allocation_error, validation_error, Result};

/// A `rows x cols` grid of `i32` stored row-major in one `Vec`.
///
/// `data.len() == rows * cols` holds for every value built through the public
/// constructors. The buffer is released when the matrix is dropped.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<i32>,
}

/// `rows * cols` or a validation error when the product overflows.
fn element_count(rows: usize, cols: usize) -> Result<usize> {
    rows.checked_mul(cols)
        .ok_or_else(|| validation_error(format!("{rows}x{cols} matrix is too large")))
}

impl Matrix {
    /// Wraps `data` as a `rows x cols` matrix.
    ///
    /// Fails when the buffer length does not equal `rows * cols`.
    pub fn new(rows: usize, cols: usize, data: Vec<i32>) -> Result<Self> {
        let len = element_count(rows, cols)?;
        if data.len() != len {
            return Err(validation_error(format!(
                "data length {} does not match {rows}x{cols}",
                data.len()
            )));
        }

        Ok(Self { rows, cols, data })
    }

    /// Allocates a zero-filled `rows x cols` matrix.
    ///
    /// Allocation failure is reported as an error instead of aborting the
    /// process.
    pub fn try_zeroed(rows: usize, cols: usize) -> Result<Self> {
        let len = element_count(rows, cols)?;
        let bytes = len.saturating_mul(std::mem::size_of::<i32>());

        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|err| allocation_error(bytes, err.to_string()))?;
        data.resize(len, 0);

        Ok(Self { rows, cols, data })
    }

    /// Builds a matrix by evaluating `f(row, col)` for every cell in row-major order.
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> i32) -> Self {
        let mut data = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                data.push(f(row, col));
            }
        }
        Self { rows, cols, data }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Number of elements, `rows * cols`.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[i32] {
        &self.data
    }

    /// Mutable view of the elements. The shape cannot change through it.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [i32] {
        &mut self.data
    }

    /// Row-major linear index of `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are outside the matrix.
    #[inline]
    pub fn index_of(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.rows && col < self.cols,
            "({row}, {col}) out of bounds for {}x{} matrix",
            self.rows,
            self.cols
        );
        row * self.cols + col
    }

    /// # Panics
    ///
    /// Panics if the coordinates are outside the matrix.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> i32 {
        self.data[self.index_of(row, col)]
    }

    /// # Panics
    ///
    /// Panics if the coordinates are outside the matrix.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: i32) {
        let idx = self.index_of(row, col);
        self.data[idx] = value;
    }

    /// Copies the matrix into an `ndarray` array of the same shape.
    pub fn to_array2(&self) -> Array2<i32> {
        Array2::from_shape_fn((self.rows, self.cols), |(row, col)| {
            self.data[row * self.cols + col]
        })
    }
}

impl From<Array2<i32>> for Matrix {
    fn from(array: Array2<i32>) -> Self {
        let (rows, cols) = array.dim();
        let data = array.iter().copied().collect();
        Self { rows, cols, data }
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}x{}", self.rows, self.cols)?;
        for row in self.data.chunks(self.cols.max(1)) {
            let line: Vec<String> = row.iter().map(i32::to_string).collect();
            writeln!(f, "[{}]", line.join(", "))?;
        }
        Ok(())
    }
}
