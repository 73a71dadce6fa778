// Matrix Multiplication Operations
//
// Operations:
// - multiply: Sparse matrix-matrix product (C = A * B)
// - mxm: Product with descriptor-controlled transposes and post-processing
// - gaxpy: Sparse matrix times dense vector, accumulated (y = A * x + y)
//
// The product is computed column by column: for every entry B[k, j] the
// column A[:, k] is scattered into a generation-stamped sparse accumulator,
// whose touched rows are then flushed into C in insertion order.

use crate::core::buffer;
use crate::core::error::{Result, SparseError};
use crate::core::matrix::{CscRef, SparseMatrix};
use crate::core::workspace::Workspace;
use crate::ops::descriptor::Descriptor;
use crate::ops::transpose::transpose;
use crate::types::SparseScalar;

/// Product kernel over compressed views
fn spgemm<T: SparseScalar>(
    a: &CscRef<'_, T>,
    b: &CscRef<'_, T>,
    with_values: bool,
    ws: &mut Workspace<T>,
) -> Result<SparseMatrix<T>> {
    if a.ncols != b.nrows {
        return Err(SparseError::DimensionMismatch);
    }
    let (m, n) = (a.nrows, b.ncols);
    log::debug!(
        "Multiplying {}x{} by {}x{} (values: {})",
        a.nrows,
        a.ncols,
        b.nrows,
        b.ncols,
        with_values
    );

    ws.prepare(m)?;
    let mut col_ptrs = buffer::filled(n + 1, 0usize)?;
    // Initial guess; grows by doubling as columns are flushed
    let guess = a.nnz() + b.nnz();
    let mut row_indices = buffer::with_capacity(guess)?;
    let mut values = if with_values {
        Some(buffer::with_capacity(guess)?)
    } else {
        None
    };

    for j in 0..n {
        let nz = row_indices.len();
        // Column j of C has at most m entries
        buffer::ensure_capacity(&mut row_indices, nz + m)?;
        col_ptrs[j] = nz;

        let stamp = ws.next_generation();
        for p in b.column(j) {
            let beta = if with_values {
                b.values.map(|bx| bx[p])
            } else {
                None
            };
            ws.scatter(a, b.row_indices[p], beta, stamp, &mut row_indices);
        }
        if let Some(cx) = values.as_mut() {
            ws.gather(&row_indices[nz..], cx)?;
        }
    }
    col_ptrs[n] = row_indices.len();
    log::trace!("Product has {} entries", col_ptrs[n]);

    let mut c = SparseMatrix::from_compressed_parts(m, n, col_ptrs, row_indices, values);
    c.finalize()?;
    Ok(c)
}

/// Sparse matrix product C = A * B
///
/// Requires `A.ncols == B.nrows`, else `DimensionMismatch` and no output.
/// The result carries values only when both operands do. Row indices within
/// a result column are in insertion order, not sorted.
pub fn multiply<T: SparseScalar>(
    a: &SparseMatrix<T>,
    b: &SparseMatrix<T>,
) -> Result<SparseMatrix<T>> {
    let mut ws = Workspace::new();
    multiply_with(a, b, &mut ws)
}

/// Sparse matrix product reusing a caller-owned workspace
pub fn multiply_with<T: SparseScalar>(
    a: &SparseMatrix<T>,
    b: &SparseMatrix<T>,
    ws: &mut Workspace<T>,
) -> Result<SparseMatrix<T>> {
    let a = a.compressed()?;
    let b = b.compressed()?;
    let with_values = a.values.is_some() && b.values.is_some();
    spgemm(&a, &b, with_values, ws)
}

/// Matrix-matrix multiply with descriptor: C = op(A) * op(B)
///
/// # Arguments
/// * `a` - First input matrix
/// * `b` - Second input matrix
/// * `desc` - Optional descriptor (transposes, structure only, drop zeros, sort)
pub fn mxm<T: SparseScalar>(
    a: &SparseMatrix<T>,
    b: &SparseMatrix<T>,
    desc: Option<&Descriptor>,
) -> Result<SparseMatrix<T>> {
    let desc = desc.copied().unwrap_or_default();
    desc.validate_for_matmul()?;
    let copy_values = !desc.structure_only;

    let a_t;
    let a = if desc.transpose_first {
        a_t = transpose(a, copy_values)?;
        &a_t
    } else {
        a
    };
    let b_t;
    let b = if desc.transpose_second {
        b_t = transpose(b, copy_values)?;
        &b_t
    } else {
        b
    };

    let av = a.compressed()?;
    let bv = b.compressed()?;
    let with_values = copy_values && av.values.is_some() && bv.values.is_some();
    let mut ws = Workspace::new();
    let c = spgemm(&av, &bv, with_values, &mut ws)?;
    desc.finish(c)
}

/// Sparse matrix times dense vector: y = A * x + y
///
/// `x` must have length `A.ncols` and `y` length `A.nrows`.
pub fn gaxpy<T: SparseScalar>(a: &SparseMatrix<T>, x: &[T], y: &mut [T]) -> Result<()> {
    let a = a.compressed()?;
    if x.len() != a.ncols || y.len() != a.nrows {
        return Err(SparseError::DimensionMismatch);
    }
    let ax = a.values.ok_or(SparseError::MissingValues)?;
    for (j, &xj) in x.iter().enumerate() {
        for p in a.column(j) {
            y[a.row_indices[p]] += ax[p] * xj;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::compress::compress;

    fn from_entries(m: usize, n: usize, entries: &[(usize, usize, f64)]) -> SparseMatrix<f64> {
        let mut t = SparseMatrix::triplet(m, n, entries.len(), true).unwrap();
        for &(i, j, x) in entries {
            t.add_entry(i, j, x).unwrap();
        }
        compress(&t).unwrap()
    }

    #[test]
    fn test_multiply_small() {
        // [1 0 2]   [4 0]   [16  0]
        // [0 3 0] * [0 5] = [ 0 15]
        //           [6 0]
        let a = from_entries(2, 3, &[(0, 0, 1.0), (0, 2, 2.0), (1, 1, 3.0)]);
        let b = from_entries(3, 2, &[(0, 0, 4.0), (1, 1, 5.0), (2, 0, 6.0)]);
        let c = multiply(&a, &b).unwrap();
        assert_eq!(c.shape(), (2, 2));
        assert_eq!(c.nnz(), 2);
        assert_eq!(c.get(0, 0), Some(16.0));
        assert_eq!(c.get(1, 1), Some(15.0));
        assert_eq!(c.get(0, 1), None);
    }

    #[test]
    fn test_multiply_dimension_mismatch() {
        let a = from_entries(2, 3, &[(0, 0, 1.0)]);
        let b = from_entries(2, 2, &[(0, 0, 1.0)]);
        assert_eq!(multiply(&a, &b).unwrap_err(), SparseError::DimensionMismatch);
    }

    #[test]
    fn test_identity_product() {
        let eye = SparseMatrix::<f64>::identity(2).unwrap();
        let b = from_entries(2, 2, &[(0, 0, 1.5), (1, 0, -2.0), (0, 1, 3.0)]);
        let c = multiply(&eye, &b).unwrap();
        let mut got = c.entries();
        let mut want = b.entries();
        got.sort_by(|x, y| (x.1, x.0).cmp(&(y.1, y.0)));
        want.sort_by(|x, y| (x.1, x.0).cmp(&(y.1, y.0)));
        assert_eq!(got, want);
    }

    #[test]
    fn test_workspace_reuse_across_products() {
        let mut ws = Workspace::new();
        let a = from_entries(3, 3, &[(0, 0, 1.0), (2, 1, 2.0), (1, 2, 3.0)]);
        let first = multiply_with(&a, &a, &mut ws).unwrap();
        let second = multiply_with(&a, &a, &mut ws).unwrap();
        assert_eq!(first, second);
        assert!(ws.rows() >= 3);
    }

    #[test]
    fn test_mxm_transpose_first() {
        // A' * A for a single column [3, 4] is the 1x1 matrix [25]
        let a = from_entries(2, 1, &[(0, 0, 3.0), (1, 0, 4.0)]);
        let c = mxm(&a, &a, Some(&Descriptor::with_transpose_first())).unwrap();
        assert_eq!(c.shape(), (1, 1));
        assert_eq!(c.get(0, 0), Some(25.0));
    }

    #[test]
    fn test_mxm_structure_only() {
        let a = from_entries(2, 2, &[(0, 0, 1.0), (1, 1, 1.0)]);
        let c = mxm(&a, &a, Some(&Descriptor::with_structure_only())).unwrap();
        assert!(!c.has_values());
        assert_eq!(c.nnz(), 2);
    }

    #[test]
    fn test_mxm_drop_zeros() {
        // Row [1 1] times column [1 -1]' cancels to an explicit zero
        let a = from_entries(1, 2, &[(0, 0, 1.0), (0, 1, 1.0)]);
        let b = from_entries(2, 1, &[(0, 0, 1.0), (1, 0, -1.0)]);
        assert_eq!(multiply(&a, &b).unwrap().nnz(), 1);

        let mut desc = Descriptor::new();
        desc.set_drop_zeros(true);
        assert_eq!(mxm(&a, &b, Some(&desc)).unwrap().nnz(), 0);
    }

    #[test]
    fn test_gaxpy() {
        let a = from_entries(2, 3, &[(0, 0, 1.0), (0, 2, 2.0), (1, 1, 3.0)]);
        let x = [1.0, 2.0, 3.0];
        let mut y = [1.0, 1.0];
        gaxpy(&a, &x, &mut y).unwrap();
        assert_eq!(y, [8.0, 7.0]);

        let mut short = [0.0];
        assert_eq!(gaxpy(&a, &x, &mut short), Err(SparseError::DimensionMismatch));
    }
}
