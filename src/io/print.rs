// Diagnostic printing
//
// Human-readable dumps of triplet and compressed matrices. Printing a missing
// or structurally invalid matrix writes a marker line and returns an error.

use crate::core::error::{Result, SparseError};
use crate::core::matrix::{SparseMatrix, SparseStorage};
use crate::ops::norm::norm1;
use crate::types::SparseScalar;
use std::fmt;

/// Entries listed before a brief dump is cut off
const BRIEF_ENTRIES: usize = 20;

/// Amount of detail in a matrix dump
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Every entry
    #[default]
    Full,
    /// Header plus the first few entries
    Brief,
}

/// Write a dump of `a` (or a `(null)` marker) to `out`
pub fn write_matrix<T: SparseScalar, W: fmt::Write>(
    out: &mut W,
    a: Option<&SparseMatrix<T>>,
    verbosity: Verbosity,
) -> Result<()> {
    writeln!(out, "{} Version {}", crate::NAME, crate::VERSION)
        .map_err(|_| SparseError::InvalidValue)?;

    let a = match a {
        Some(a) => a,
        None => {
            writeln!(out, "(null)").map_err(|_| SparseError::InvalidValue)?;
            return Err(SparseError::NullPointer);
        }
    };
    if !a.is_valid() {
        writeln!(out, "(invalid)").map_err(|_| SparseError::InvalidValue)?;
        return Err(SparseError::InvalidValue);
    }
    write_body(out, a, verbosity).map_err(|_| SparseError::InvalidValue)
}

/// Print a dump of `a` to standard output
pub fn print_matrix<T: SparseScalar>(
    a: Option<&SparseMatrix<T>>,
    verbosity: Verbosity,
) -> Result<()> {
    let mut text = String::new();
    let result = write_matrix(&mut text, a, verbosity);
    print!("{}", text);
    result
}

fn write_body<T: SparseScalar, W: fmt::Write>(
    out: &mut W,
    a: &SparseMatrix<T>,
    verbosity: Verbosity,
) -> fmt::Result {
    let (m, n) = a.shape();
    let brief = verbosity == Verbosity::Brief;
    let value_at = |values: &Option<Vec<T>>, p: usize| values.as_ref().map_or(T::ONE, |x| x[p]);

    match a.storage() {
        SparseStorage::Compressed {
            col_ptrs,
            row_indices,
            values,
        } => {
            write!(
                out,
                "{}-by-{}, nzmax: {} nnz: {}",
                m,
                n,
                a.capacity(),
                a.nnz()
            )?;
            match norm1(a) {
                Ok(norm) => writeln!(out, ", 1-norm: {}", norm)?,
                Err(_) => writeln!(out)?,
            }
            for j in 0..n {
                let (start, end) = (col_ptrs[j], col_ptrs[j + 1]);
                writeln!(
                    out,
                    "    col {} : locations {} to {}",
                    j,
                    start,
                    end as isize - 1
                )?;
                for p in start..end {
                    writeln!(out, "      {} : {}", row_indices[p], value_at(values, p))?;
                    if brief && p > BRIEF_ENTRIES {
                        return writeln!(out, "  ...");
                    }
                }
            }
        }
        SparseStorage::Triplet {
            row_indices,
            col_indices,
            values,
        } => {
            writeln!(
                out,
                "triplet: {}-by-{}, nzmax: {} nnz: {}",
                m,
                n,
                a.capacity(),
                a.nnz()
            )?;
            for p in 0..row_indices.len() {
                writeln!(
                    out,
                    "    {} {} : {}",
                    row_indices[p],
                    col_indices[p],
                    value_at(values, p)
                )?;
                if brief && p > BRIEF_ENTRIES {
                    return writeln!(out, "  ...");
                }
            }
        }
    }
    Ok(())
}

impl<T: SparseScalar> fmt::Display for SparseMatrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_body(f, self, Verbosity::Brief)
    }
}
