//! Binary matrix files.
//!
//! Layout, all little-endian `i32`:
//!
//! ```text
//! rows | cols | rows * cols elements, row-major
//! ```
//!
//! [`read_matrix`] and [`write_matrix`] round-trip: reading a file produced by
//! `write_matrix` yields the same shape and elements.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use tracing::debug;

use crate::error::{format_error, io_error, Result};
use crate::matrix::Matrix;

const WORD: usize = std::mem::size_of::<i32>();

/// Loads and stores matrices for the task orchestrator.
pub trait MatrixStore {
    fn read(&self, path: &Path) -> Result<Matrix>;
    fn write(&self, path: &Path, matrix: &Matrix) -> Result<()>;
}

/// [`MatrixStore`] backed by the binary file format of this module.
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryMatrixFile;

impl MatrixStore for BinaryMatrixFile {
    fn read(&self, path: &Path) -> Result<Matrix> {
        read_matrix(path)
    }

    fn write(&self, path: &Path, matrix: &Matrix) -> Result<()> {
        write_matrix(path, matrix)
    }
}

/// Reads one header field, distinguishing a short file from an I/O failure.
fn read_word(reader: &mut impl Read, path: &Path, what: &str) -> Result<i32> {
    let mut buf = [0u8; WORD];
    reader.read_exact(&mut buf).map_err(|err| match err.kind() {
        std::io::ErrorKind::UnexpectedEof => format_error(path, format!("missing {what}")),
        _ => io_error(path, &err),
    })?;
    Ok(i32::from_le_bytes(buf))
}

fn dimension(value: i32, path: &Path, what: &str) -> Result<usize> {
    if value <= 0 {
        return Err(format_error(path, format!("{what} must be positive, got {value}")));
    }
    Ok(value as usize)
}

/// Parses a matrix from `path`.
///
/// Fails with an I/O error when the file cannot be opened or read, and with a
/// format error when the header is incomplete, a dimension is not positive,
/// the payload is short, or bytes remain after the last element.
pub fn read_matrix(path: impl AsRef<Path>) -> Result<Matrix> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|err| io_error(path, &err))?;
    let mut reader = BufReader::new(file);

    let rows = dimension(read_word(&mut reader, path, "row count")?, path, "row count")?;
    let cols = dimension(read_word(&mut reader, path, "column count")?, path, "column count")?;

    let len = rows
        .checked_mul(cols)
        .ok_or_else(|| format_error(path, format!("{rows}x{cols} matrix is too large")))?;
    let byte_len = len
        .checked_mul(WORD)
        .ok_or_else(|| format_error(path, format!("{rows}x{cols} matrix is too large")))?;

    let mut bytes = Vec::new();
    reader
        .by_ref()
        .take(byte_len as u64)
        .read_to_end(&mut bytes)
        .map_err(|err| io_error(path, &err))?;
    if bytes.len() != byte_len {
        return Err(format_error(
            path,
            format!(
                "expected {len} elements for {rows}x{cols}, found {}",
                bytes.len() / WORD
            ),
        ));
    }

    let mut trailing = [0u8; 1];
    let extra = reader
        .read(&mut trailing)
        .map_err(|err| io_error(path, &err))?;
    if extra != 0 {
        return Err(format_error(path, "trailing bytes after matrix data"));
    }

    let data = bytes
        .chunks_exact(WORD)
        .map(|word| i32::from_le_bytes([word[0], word[1], word[2], word[3]]))
        .collect();

    debug!(path = %path.display(), rows, cols, "read matrix");

    Matrix::new(rows, cols, data)
}

/// Serializes `matrix` to `path`, creating or truncating the file.
///
/// Dimensions that do not fit the format's `i32` header are a format error.
pub fn write_matrix(path: impl AsRef<Path>, matrix: &Matrix) -> Result<()> {
    let path = path.as_ref();

    let header_field = |dim: usize| {
        i32::try_from(dim).map_err(|_| format_error(path, format!("dimension {dim} exceeds i32")))
    };
    let rows = header_field(matrix.rows())?;
    let cols = header_field(matrix.cols())?;

    let file = File::create(path).map_err(|err| io_error(path, &err))?;
    let mut writer = BufWriter::new(file);

    let mut write_all = |bytes: &[u8]| writer.write_all(bytes).map_err(|err| io_error(path, &err));
    write_all(&rows.to_le_bytes())?;
    write_all(&cols.to_le_bytes())?;
    for value in matrix.as_slice() {
        write_all(&value.to_le_bytes())?;
    }

    writer.flush().map_err(|err| io_error(path, &err))?;

    debug!(path = %path.display(), rows, cols, "wrote matrix");

    Ok(())
}
