//! # simdconv
//!
//! Direct "valid" 2D convolution of `i32` matrices.
//!
//! The kernel is flipped in place (a linear element reversal, equivalent to a
//! 180° rotation for a row-major matrix) and then slid over the input; every
//! output cell is the wrapping sum of the products of the overlapping
//! elements. Both the flip and the SIMD convolution strategy work on lane
//! groups of eight `i32` values, backed by AVX2 when the build detects it and
//! by a portable scalar emulation otherwise. The two backends are bit-exact.
//!
//! ```
//! use simdconv::{convolve, Matrix};
//!
//! let a = Matrix::from_fn(3, 3, |r, c| (r * 3 + c + 1) as i32);
//! let mut b = Matrix::new(2, 2, vec![1, 2, 3, 4]).unwrap();
//!
//! let out = convolve(&a, &mut b).unwrap();
//! assert_eq!(out.as_slice(), &[23, 33, 53, 63]);
//! // the kernel was flipped in place
//! assert_eq!(b.as_slice(), &[4, 3, 2, 1]);
//! ```

pub mod convolve;
pub mod error;
pub mod flip;
pub mod io;
pub mod matrix;
pub mod simd;
pub mod task;

pub use convolve::{convolve, convolve_with, simd_convolve, ConvolveStrategy};
pub use error::{Result, SimdconvError, TaskPhase};
pub use flip::flip;
pub use io::{read_matrix, write_matrix, BinaryMatrixFile, MatrixStore};
pub use matrix::Matrix;
pub use task::{execute_task, execute_task_with, Task, TaskPaths, TaskReport};
