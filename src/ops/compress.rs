// Format Conversion
//
// Triplet -> compressed-column conversion (counting sort by column followed
// by the mandatory duplicate-summation pass) and the inverse expansion.

use crate::core::buffer;
use crate::core::error::Result;
use crate::core::matrix::SparseMatrix;
use crate::types::SparseScalar;

/// Convert a triplet-form matrix to compressed-column form
///
/// Entries are bucketed by column in O(nnz + ncols); duplicate (row, col)
/// entries are then summed. Row indices within a column are left in
/// first-occurrence order, not sorted. The operand is not modified.
pub fn compress<T: SparseScalar>(t: &SparseMatrix<T>) -> Result<SparseMatrix<T>> {
    let trip = t.triplets()?;
    let (m, n, nz) = (trip.nrows, trip.ncols, trip.nnz());
    log::debug!("Compressing {}x{} triplet matrix with {} entries", m, n, nz);

    // Column counts, then column starts; `cursor` becomes the write position per column
    let mut cursor = buffer::filled(n, 0usize)?;
    for &j in trip.col_indices {
        cursor[j] += 1;
    }
    let mut col_ptrs = buffer::filled(n + 1, 0usize)?;
    buffer::cumsum(&mut col_ptrs, &mut cursor);

    let mut row_indices = buffer::filled(nz, 0usize)?;
    let mut values = trip
        .values
        .map(|_| buffer::filled(nz, T::ZERO))
        .transpose()?;

    for k in 0..nz {
        let j = trip.col_indices[k];
        let p = cursor[j];
        cursor[j] += 1;
        row_indices[p] = trip.row_indices[k];
        if let (Some(cx), Some(tx)) = (values.as_mut(), trip.values) {
            cx[p] = tx[k];
        }
    }

    sum_duplicates(m, n, &mut col_ptrs, &mut row_indices, values.as_mut())?;
    log::trace!("Compressed to {} entries after summing duplicates", col_ptrs[n]);

    let mut c = SparseMatrix::from_compressed_parts(m, n, col_ptrs, row_indices, values);
    c.finalize()?;
    Ok(c)
}

/// Sum duplicate row entries within each column, compacting in place
///
/// `last[i]` holds the position where row `i` was last written; a position
/// at or after the start of the current column means a repeat in this column.
pub(crate) fn sum_duplicates<T: SparseScalar>(
    nrows: usize,
    ncols: usize,
    col_ptrs: &mut [usize],
    row_indices: &mut Vec<usize>,
    mut values: Option<&mut Vec<T>>,
) -> Result<()> {
    let mut last: Vec<Option<usize>> = buffer::filled(nrows, None)?;
    let mut nz = 0;

    for j in 0..ncols {
        let start = nz;
        // col_ptrs[j + 1] still holds the original end of column j here
        for p in col_ptrs[j]..col_ptrs[j + 1] {
            let i = row_indices[p];
            match last[i] {
                Some(q) if q >= start => {
                    if let Some(x) = values.as_deref_mut() {
                        let v = x[p];
                        x[q] += v;
                    }
                }
                _ => {
                    last[i] = Some(nz);
                    row_indices[nz] = i;
                    if let Some(x) = values.as_deref_mut() {
                        x[nz] = x[p];
                    }
                    nz += 1;
                }
            }
        }
        col_ptrs[j] = start;
    }
    col_ptrs[ncols] = nz;

    row_indices.truncate(nz);
    if let Some(x) = values {
        x.truncate(nz);
    }
    Ok(())
}

/// Expand a compressed-column matrix back into triplet form
///
/// Entries are emitted column by column; the result owns fresh storage.
pub fn to_triplet<T: SparseScalar>(a: &SparseMatrix<T>) -> Result<SparseMatrix<T>> {
    let csc = a.compressed()?;
    let nz = csc.nnz();

    let mut row_indices = buffer::with_capacity(nz)?;
    let mut col_indices = buffer::with_capacity(nz)?;
    row_indices.extend_from_slice(&csc.row_indices[..nz]);
    for j in 0..csc.ncols {
        col_indices.extend(csc.column(j).map(|_| j));
    }
    let values = match csc.values {
        Some(ax) => {
            let mut values = buffer::with_capacity(nz)?;
            values.extend_from_slice(&ax[..nz]);
            Some(values)
        }
        None => None,
    };

    Ok(SparseMatrix::from_triplet_parts(
        csc.nrows,
        csc.ncols,
        row_indices,
        col_indices,
        values,
    ))
}
