//! Error types for simdconv operations.
//!
//! Every fallible operation in the crate returns [`Result`], so callers can
//! tell a missing operand file from a kernel that does not fit its input
//! without parsing messages. The task orchestrator wraps the underlying error
//! in [`SimdconvError::Task`] together with the phase that failed.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Phase of a convolution task in which an error surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskPhase {
    /// Loading operand A.
    ReadA,
    /// Loading operand B (the kernel).
    ReadB,
    /// Flipping the kernel and computing the output.
    Convolve,
    /// Persisting the output matrix.
    Write,
}

impl fmt::Display for TaskPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TaskPhase::ReadA => "read-a",
            TaskPhase::ReadB => "read-b",
            TaskPhase::Convolve => "convolve",
            TaskPhase::Write => "write",
        };
        f.write_str(name)
    }
}

/// Errors that can occur during simdconv operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimdconvError {
    /// A matrix resource could not be opened, read or written.
    #[error("I/O error on {}: {message}", .path.display())]
    Io {
        /// The resource being accessed.
        path: PathBuf,
        /// Kind reported by the operating system.
        kind: io::ErrorKind,
        /// Human-readable error message.
        message: String,
    },
    /// A matrix resource was readable but its content is malformed.
    #[error("Malformed matrix file {}: {message}", .path.display())]
    Format {
        /// The offending resource.
        path: PathBuf,
        /// Human-readable error message.
        message: String,
    },
    /// The kernel does not fit inside the input along some axis.
    #[error(
        "Invalid convolution dimensions: kernel {b_rows}x{b_cols} does not fit input {a_rows}x{a_cols}"
    )]
    Dimension {
        a_rows: usize,
        a_cols: usize,
        b_rows: usize,
        b_cols: usize,
    },
    /// Memory allocation failed.
    #[error("Memory allocation failed: {message} (requested {requested_size} bytes)")]
    Allocation {
        /// The size in bytes that was requested.
        requested_size: usize,
        /// Human-readable error message.
        message: String,
    },
    /// Input validation error.
    #[error("Validation error: {message}")]
    Validation {
        /// Human-readable error message.
        message: String,
    },
    /// A task failed; `phase` names the step that produced `source`.
    #[error("Task failed during {phase}: {source}")]
    Task {
        phase: TaskPhase,
        #[source]
        source: Box<SimdconvError>,
    },
}

impl SimdconvError {
    /// Tags this error with the task phase it happened in.
    pub fn during(self, phase: TaskPhase) -> SimdconvError {
        SimdconvError::Task {
            phase,
            source: Box::new(self),
        }
    }

    /// Returns the failed phase for errors produced by the orchestrator.
    pub fn phase(&self) -> Option<TaskPhase> {
        match self {
            SimdconvError::Task { phase, .. } => Some(*phase),
            _ => None,
        }
    }
}

/// Result type alias for simdconv operations.
pub type Result<T> = std::result::Result<T, SimdconvError>;

/// Creates an I/O error for `path` from a [`std::io::Error`].
pub fn io_error(path: impl AsRef<Path>, err: &io::Error) -> SimdconvError {
    SimdconvError::Io {
        path: path.as_ref().to_path_buf(),
        kind: err.kind(),
        message: err.to_string(),
    }
}

/// Creates a format error.
pub fn format_error(path: impl AsRef<Path>, message: impl Into<String>) -> SimdconvError {
    SimdconvError::Format {
        path: path.as_ref().to_path_buf(),
        message: message.into(),
    }
}

/// Creates a dimension error from operand shapes `(rows, cols)`.
pub fn dimension_error(a: (usize, usize), b: (usize, usize)) -> SimdconvError {
    SimdconvError::Dimension {
        a_rows: a.0,
        a_cols: a.1,
        b_rows: b.0,
        b_cols: b.1,
    }
}

/// Creates an allocation error.
pub fn allocation_error(size: usize, message: impl Into<String>) -> SimdconvError {
    SimdconvError::Allocation {
        requested_size: size,
        message: message.into(),
    }
}

/// Creates a validation error.
pub fn validation_error(message: impl Into<String>) -> SimdconvError {
    SimdconvError::Validation {
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocation_error_display() {
        let error = allocation_error(1024, "out of memory");
        let display = format!("{}", error);
        assert!(display.contains("Memory allocation failed"));
        assert!(display.contains("1024 bytes"));
        assert!(display.contains("out of memory"));
    }

    #[test]
    fn test_dimension_error_display() {
        let error = dimension_error((3, 3), (4, 2));
        let display = format!("{}", error);
        assert!(display.contains("kernel 4x2"));
        assert!(display.contains("input 3x3"));
    }

    #[test]
    fn test_io_error_keeps_kind() {
        let source = io::Error::new(io::ErrorKind::NotFound, "no such file");
        let error = io_error("/tmp/missing/a.bin", &source);
        match &error {
            SimdconvError::Io { path, kind, message } => {
                assert_eq!(path, Path::new("/tmp/missing/a.bin"));
                assert_eq!(*kind, io::ErrorKind::NotFound);
                assert!(message.contains("no such file"));
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(format!("{error}").contains("/tmp/missing/a.bin"));
    }

    #[test]
    fn test_validation_error_display() {
        let error = validation_error("data length 5 does not match 2x3");
        let display = format!("{}", error);
        assert!(display.contains("Validation error"));
        assert!(display.contains("2x3"));
    }

    #[test]
    fn test_during_wraps_with_phase() {
        let error = format_error("b.bin", "truncated header").during(TaskPhase::ReadB);
        assert_eq!(error.phase(), Some(TaskPhase::ReadB));
        let display = format!("{}", error);
        assert!(display.starts_with("Task failed during read-b"));
        assert!(display.contains("truncated header"));

        let source = std::error::Error::source(&error).expect("task errors carry a source");
        assert!(source.to_string().contains("Malformed matrix file"));
    }

    #[test]
    fn test_error_equality() {
        let error1 = allocation_error(1024, "test");
        let error2 = allocation_error(1024, "test");
        let error3 = allocation_error(2048, "test");

        assert_eq!(error1, error2);
        assert_ne!(error1, error3);
        assert_eq!(error1.phase(), None);
    }
}
