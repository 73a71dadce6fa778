// Transpose
//
// Compressed-column transpose by counting sort over row occurrences.
// As a by-product the result has row indices sorted within every column,
// which is also how row indices get sorted on request.

use crate::core::buffer;
use crate::core::error::Result;
use crate::core::matrix::SparseMatrix;
use crate::types::SparseScalar;

/// Compute the transpose `A'`
///
/// With `copy_values == false` (or a pattern-only `A`) only the structure is
/// produced. Cost is O(nnz + nrows + ncols).
pub fn transpose<T: SparseScalar>(
    a: &SparseMatrix<T>,
    copy_values: bool,
) -> Result<SparseMatrix<T>> {
    let a = a.compressed()?;
    let (m, n, nz) = (a.nrows, a.ncols, a.nnz());
    log::debug!("Transposing {}x{} matrix ({} entries)", m, n, nz);

    // Row counts of A are column counts of A'
    let mut cursor = buffer::filled(m, 0usize)?;
    for &i in &a.row_indices[..nz] {
        cursor[i] += 1;
    }
    let mut col_ptrs = buffer::filled(m + 1, 0usize)?;
    buffer::cumsum(&mut col_ptrs, &mut cursor);

    let ax = if copy_values { a.values } else { None };
    let mut row_indices = buffer::filled(nz, 0usize)?;
    let mut values = ax.map(|_| buffer::filled(nz, T::ZERO)).transpose()?;

    for j in 0..n {
        for p in a.column(j) {
            let i = a.row_indices[p];
            let q = cursor[i];
            cursor[i] += 1;
            row_indices[q] = j;
            if let (Some(cx), Some(ax)) = (values.as_mut(), ax) {
                cx[q] = ax[p];
            }
        }
    }

    Ok(SparseMatrix::from_compressed_parts(
        n,
        m,
        col_ptrs,
        row_indices,
        values,
    ))
}

/// Return a copy of `A` with row indices sorted ascending within each column
pub fn sort_indices<T: SparseScalar>(a: &SparseMatrix<T>) -> Result<SparseMatrix<T>> {
    let at = transpose(a, true)?;
    transpose(&at, true)
}

/// Whether every column of `A` has strictly ascending row indices
pub fn is_sorted<T: SparseScalar>(a: &SparseMatrix<T>) -> Result<bool> {
    let a = a.compressed()?;
    Ok((0..a.ncols).all(|j| a.row_indices[a.column(j)].windows(2).all(|w| w[0] < w[1])))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::SparseError;
    use crate::ops::compress::compress;

    fn sample() -> SparseMatrix<f64> {
        // [1 0 2]
        // [0 3 0]
        let mut t = SparseMatrix::triplet(2, 3, 0, true).unwrap();
        t.add_entry(1, 1, 3.0).unwrap();
        t.add_entry(0, 2, 2.0).unwrap();
        t.add_entry(0, 0, 1.0).unwrap();
        compress(&t).unwrap()
    }

    #[test]
    fn test_transpose_shape_and_values() {
        let a = sample();
        let at = transpose(&a, true).unwrap();
        assert_eq!(at.shape(), (3, 2));
        assert_eq!(at.nnz(), 3);
        assert_eq!(at.get(0, 0), Some(1.0));
        assert_eq!(at.get(1, 1), Some(3.0));
        assert_eq!(at.get(2, 0), Some(2.0));
        assert_eq!(at.get(0, 1), None);
    }

    #[test]
    fn test_transpose_pattern_only() {
        let at = transpose(&sample(), false).unwrap();
        assert!(!at.has_values());
        assert_eq!(at.nnz(), 3);
    }

    #[test]
    fn test_transpose_sorts_rows() {
        let mut t = SparseMatrix::triplet(3, 1, 0, true).unwrap();
        t.add_entry(2, 0, 1.0).unwrap();
        t.add_entry(0, 0, 2.0).unwrap();
        t.add_entry(1, 0, 3.0).unwrap();
        let a = compress(&t).unwrap();
        assert!(!is_sorted(&a).unwrap());

        let sorted = sort_indices(&a).unwrap();
        assert!(is_sorted(&sorted).unwrap());
        assert_eq!(sorted.compressed().unwrap().row_indices, &[0, 1, 2]);
        assert_eq!(sorted.values().unwrap(), &[2.0, 3.0, 1.0]);
    }

    #[test]
    fn test_transpose_requires_compressed() {
        let t = SparseMatrix::<f64>::triplet(2, 2, 0, true).unwrap();
        assert_eq!(transpose(&t, true).unwrap_err(), SparseError::NotCompressed);
    }

    #[test]
    fn test_transpose_empty() {
        let t = SparseMatrix::<f64>::triplet(0, 5, 0, true).unwrap();
        let at = transpose(&compress(&t).unwrap(), true).unwrap();
        assert_eq!(at.shape(), (5, 0));
        assert_eq!(at.nnz(), 0);
    }
}
