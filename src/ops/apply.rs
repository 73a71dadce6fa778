// Apply Operations
//
// Per-entry operations on compressed matrices:
// - scale: C = alpha * A (new matrix)
// - keep: in-place compaction keeping entries that satisfy a predicate
// - drop_zeros: in-place removal of explicit zeros

use crate::core::error::{Result, SparseError};
use crate::core::matrix::SparseMatrix;
use crate::types::SparseScalar;

/// Scale every stored value: C = alpha * A
pub fn scale<T: SparseScalar>(a: &SparseMatrix<T>, alpha: T) -> Result<SparseMatrix<T>> {
    a.compressed()?;
    if !a.has_values() {
        return Err(SparseError::MissingValues);
    }
    let mut c = a.clone();
    if let Some(values) = c.values_mut() {
        values.iter_mut().for_each(|x| *x = alpha * *x);
    }
    Ok(c)
}

/// Keep only the entries for which `keep_entry(row, col, value)` is true
///
/// Compacts the matrix in place, preserving the order of kept entries, and
/// trims excess capacity. Pattern-only entries are presented with value one.
/// Returns the number of entries kept.
pub fn keep<T, F>(a: &mut SparseMatrix<T>, mut keep_entry: F) -> Result<usize>
where
    T: SparseScalar,
    F: FnMut(usize, usize, T) -> bool,
{
    let ncols = a.ncols();
    let (col_ptrs, row_indices, mut values) = a.compressed_parts_mut()?;

    let mut nz = 0;
    for j in 0..ncols {
        let start = col_ptrs[j];
        col_ptrs[j] = nz;
        for p in start..col_ptrs[j + 1] {
            let value = values.as_deref().map_or(T::ONE, |x| x[p]);
            if keep_entry(row_indices[p], j, value) {
                if let Some(x) = values.as_deref_mut() {
                    x[nz] = x[p];
                }
                row_indices[nz] = row_indices[p];
                nz += 1;
            }
        }
    }
    col_ptrs[ncols] = nz;
    row_indices.truncate(nz);
    if let Some(x) = values {
        x.truncate(nz);
    }

    a.finalize()?;
    log::trace!("Kept {} entries", nz);
    Ok(nz)
}

/// Remove explicit zeros; returns the number of entries kept
pub fn drop_zeros<T: SparseScalar>(a: &mut SparseMatrix<T>) -> Result<usize> {
    keep(a, |_, _, x| x != T::ZERO)
}
