// Handle API: allocate / operate / release over integer handles
//
// A process-wide registry owns every matrix created through this module.
// Operations look their operands up by handle, compute under the registry
// lock, and register the result under a fresh handle. Handles are never
// reused, so a released handle (used again or released twice) reports
// `UseAfterRelease`.

use crate::core::error::Result;
use crate::core::matrix::SparseMatrix;
use crate::io::{load::LoadOptions, print::Verbosity};
use crate::ops;
use std::fmt;
use std::io::BufRead;

crate::define_handle_registry!(MATRICES, SparseMatrix<f64>);

/// Matrix handle; 0 is the null handle
pub type Handle = usize;

/// The null handle
pub const NULL_HANDLE: Handle = 0;

/// Register an existing matrix and return its handle
pub fn register(matrix: SparseMatrix<f64>) -> Handle {
    MATRICES.insert(matrix)
}

/// Allocate an empty triplet-form matrix
pub fn allocate_triplet(
    rows: usize,
    cols: usize,
    capacity_hint: usize,
    with_values: bool,
) -> Result<Handle> {
    let t = SparseMatrix::triplet(rows, cols, capacity_hint, with_values)?;
    Ok(register(t))
}

/// Allocate an `n`-by-`n` compressed identity matrix
pub fn identity(n: usize) -> Result<Handle> {
    Ok(register(SparseMatrix::identity(n)?))
}

/// Append an entry to a triplet matrix
pub fn add_entry(handle: Handle, row: i64, col: i64, value: f64) -> Result<()> {
    MATRICES.with_mut(handle, |t| t.add_entry(row, col, value))?
}

/// Compress a triplet matrix into a new compressed-column matrix
pub fn compress(handle: Handle) -> Result<Handle> {
    let c = MATRICES.with(handle, ops::compress)??;
    Ok(register(c))
}

/// Transpose into a new matrix
pub fn transpose(handle: Handle, copy_values: bool) -> Result<Handle> {
    let c = MATRICES.with(handle, |a| ops::transpose(a, copy_values))??;
    Ok(register(c))
}

/// Multiply two matrices into a new matrix
pub fn multiply(first: Handle, second: Handle) -> Result<Handle> {
    let c = MATRICES.with_pair(first, second, |a, b| ops::multiply(a, b))??;
    Ok(register(c))
}

/// Scaled sum `alpha * first + beta * second` into a new matrix
pub fn add(first: Handle, second: Handle, alpha: f64, beta: f64) -> Result<Handle> {
    let c = MATRICES.with_pair(first, second, |a, b| ops::add(a, b, alpha, beta))??;
    Ok(register(c))
}

/// 1-norm of a compressed matrix
pub fn norm1(handle: Handle) -> Result<f64> {
    MATRICES.with(handle, ops::norm1)?
}

/// Number of stored entries
pub fn nnz(handle: Handle) -> Result<usize> {
    MATRICES.with(handle, SparseMatrix::nnz)
}

/// Shape as (rows, cols)
pub fn shape(handle: Handle) -> Result<(usize, usize)> {
    MATRICES.with(handle, SparseMatrix::shape)
}

/// Deep copy of the matrix behind `handle`
pub fn snapshot(handle: Handle) -> Result<SparseMatrix<f64>> {
    MATRICES.with(handle, SparseMatrix::clone)
}

/// Load a triplet matrix from text
pub fn load<R: BufRead>(reader: R, options: &LoadOptions) -> Result<Handle> {
    Ok(register(crate::io::load(reader, options)?))
}

/// Dump the matrix behind `handle`
///
/// A null, unknown or released handle is reported as `(null)` and the
/// lookup error is returned.
pub fn print<W: fmt::Write>(out: &mut W, handle: Handle, verbosity: Verbosity) -> Result<()> {
    let written = MATRICES.with(handle, |a| {
        crate::io::write_matrix(&mut *out, Some(a), verbosity)
    });
    match written {
        Ok(result) => result,
        Err(err) => {
            // Still emit the banner and the (null) marker
            let _ = crate::io::write_matrix::<f64, W>(out, None, verbosity);
            Err(err)
        }
    }
}

/// Release a matrix; a second release fails with `UseAfterRelease`
pub fn release(handle: Handle) -> Result<()> {
    MATRICES.remove(handle)?.release();
    Ok(())
}

/// Take ownership of the matrix behind `handle`, releasing the handle
pub fn take(handle: Handle) -> Result<SparseMatrix<f64>> {
    MATRICES.remove(handle)
}

/// Whether `handle` refers to a live matrix
pub fn is_live(handle: Handle) -> bool {
    MATRICES.contains(handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::SparseError;

    #[test]
    fn test_lifecycle() {
        let t = allocate_triplet(2, 2, 0, true).unwrap();
        add_entry(t, 0, 0, 1.0).unwrap();
        add_entry(t, 1, 0, 2.0).unwrap();
        assert_eq!(add_entry(t, -1, 0, 2.0), Err(SparseError::InvalidIndex));

        let a = compress(t).unwrap();
        release(t).unwrap();
        assert_eq!(nnz(a).unwrap(), 2);

        assert_eq!(compress(t), Err(SparseError::UseAfterRelease));
        assert_eq!(release(t), Err(SparseError::UseAfterRelease));
        assert!(!is_live(t));
        release(a).unwrap();
    }

    #[test]
    fn test_null_handle() {
        assert_eq!(norm1(NULL_HANDLE), Err(SparseError::NullPointer));
        assert_eq!(release(NULL_HANDLE), Err(SparseError::NullPointer));
    }

    #[test]
    fn test_print_released_handle() {
        let eye = identity(2).unwrap();
        release(eye).unwrap();
        let mut out = String::new();
        assert_eq!(print(&mut out, eye, Verbosity::Full), Err(SparseError::UseAfterRelease));
        assert!(out.contains("(null)"));
    }

    #[test]
    fn test_same_handle_both_operands() {
        let eye = identity(3).unwrap();
        let sum = add(eye, eye, 1.0, 1.0).unwrap();
        assert_eq!(norm1(sum).unwrap(), 2.0);
        let prod = multiply(eye, eye).unwrap();
        assert_eq!(take(prod).unwrap(), SparseMatrix::identity(3).unwrap());
        assert!(!is_live(prod));
        for h in [eye, sum] {
            release(h).unwrap();
        }
    }
}
