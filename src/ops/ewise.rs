// Element-wise Operations
//
// Operations:
// - add: Scaled sum with union semantics (C = alpha * A + beta * B)
// - ewadd: Scaled sum with descriptor-controlled post-processing
//
// Each column is built by scattering alpha * A[:, j] and then beta * B[:, j]
// into the stamped accumulator; the touched rows are flushed in first-touched
// order, giving at most one entry per (row, col).

use crate::core::buffer;
use crate::core::error::{Result, SparseError};
use crate::core::matrix::{CscRef, SparseMatrix};
use crate::core::workspace::Workspace;
use crate::ops::descriptor::Descriptor;
use crate::types::SparseScalar;

/// Scaled-sum kernel over compressed views
fn spadd<T: SparseScalar>(
    a: &CscRef<'_, T>,
    b: &CscRef<'_, T>,
    alpha: T,
    beta: T,
    with_values: bool,
    ws: &mut Workspace<T>,
) -> Result<SparseMatrix<T>> {
    if a.nrows != b.nrows || a.ncols != b.ncols {
        return Err(SparseError::DimensionMismatch);
    }
    let (m, n) = (a.nrows, a.ncols);
    log::debug!(
        "Adding {}x{} matrices ({} + {} entries)",
        m,
        n,
        a.nnz(),
        b.nnz()
    );

    ws.prepare(m)?;
    // nnz(A) + nnz(B) bounds the result, so the output never regrows
    let bound = a.nnz() + b.nnz();
    let mut col_ptrs = buffer::filled(n + 1, 0usize)?;
    let mut row_indices = buffer::with_capacity(bound)?;
    let mut values = if with_values {
        Some(buffer::with_capacity(bound)?)
    } else {
        None
    };
    let (alpha, beta) = if with_values {
        (Some(alpha), Some(beta))
    } else {
        (None, None)
    };

    for j in 0..n {
        let nz = row_indices.len();
        col_ptrs[j] = nz;
        let stamp = ws.next_generation();
        ws.scatter(a, j, alpha, stamp, &mut row_indices);
        ws.scatter(b, j, beta, stamp, &mut row_indices);
        if let Some(cx) = values.as_mut() {
            ws.gather(&row_indices[nz..], cx)?;
        }
    }
    col_ptrs[n] = row_indices.len();
    log::trace!("Sum has {} entries", col_ptrs[n]);

    let mut c = SparseMatrix::from_compressed_parts(m, n, col_ptrs, row_indices, values);
    c.finalize()?;
    Ok(c)
}

/// Scaled sum C = alpha * A + beta * B
///
/// Requires equal shapes, else `DimensionMismatch` and no output. Entries
/// present in both operands are summed; cancellations are kept as explicit zeros.
pub fn add<T: SparseScalar>(
    a: &SparseMatrix<T>,
    b: &SparseMatrix<T>,
    alpha: T,
    beta: T,
) -> Result<SparseMatrix<T>> {
    let mut ws = Workspace::new();
    add_with(a, b, alpha, beta, &mut ws)
}

/// Scaled sum reusing a caller-owned workspace
pub fn add_with<T: SparseScalar>(
    a: &SparseMatrix<T>,
    b: &SparseMatrix<T>,
    alpha: T,
    beta: T,
    ws: &mut Workspace<T>,
) -> Result<SparseMatrix<T>> {
    let a = a.compressed()?;
    let b = b.compressed()?;
    let with_values = a.values.is_some() && b.values.is_some();
    spadd(&a, &b, alpha, beta, with_values, ws)
}

/// Element-wise scaled sum with descriptor
///
/// # Arguments
/// * `a` - First input matrix
/// * `b` - Second input matrix
/// * `alpha` - Scale applied to `a`
/// * `beta` - Scale applied to `b`
/// * `desc` - Optional descriptor (structure only, drop zeros, sort)
pub fn ewadd<T: SparseScalar>(
    a: &SparseMatrix<T>,
    b: &SparseMatrix<T>,
    alpha: T,
    beta: T,
    desc: Option<&Descriptor>,
) -> Result<SparseMatrix<T>> {
    let desc = desc.copied().unwrap_or_default();
    desc.validate_for_ewise()?;

    let av = a.compressed()?;
    let bv = b.compressed()?;
    let with_values = !desc.structure_only && av.values.is_some() && bv.values.is_some();
    let mut ws = Workspace::new();
    let c = spadd(&av, &bv, alpha, beta, with_values, &mut ws)?;
    desc.finish(c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::apply::drop_zeros;
    use crate::ops::compress::compress;

    fn from_entries(m: usize, n: usize, entries: &[(usize, usize, f64)]) -> SparseMatrix<f64> {
        let mut t = SparseMatrix::triplet(m, n, 0, true).unwrap();
        for &(i, j, x) in entries {
            t.add_entry(i, j, x).unwrap();
        }
        compress(&t).unwrap()
    }

    #[test]
    fn test_union_semantics() {
        let a = from_entries(2, 2, &[(0, 0, 1.0), (1, 1, 2.0)]);
        let b = from_entries(2, 2, &[(0, 0, 10.0), (1, 0, 20.0)]);
        let c = add(&a, &b, 2.0, 0.5).unwrap();
        assert_eq!(c.nnz(), 3);
        assert_eq!(c.get(0, 0), Some(7.0));
        assert_eq!(c.get(1, 0), Some(10.0));
        assert_eq!(c.get(1, 1), Some(4.0));
        assert!(c.is_valid());
    }

    #[test]
    fn test_first_touched_order() {
        let a = from_entries(3, 1, &[(2, 0, 1.0)]);
        let b = from_entries(3, 1, &[(0, 0, 1.0), (2, 0, 1.0)]);
        let c = add(&a, &b, 1.0, 1.0).unwrap();
        assert_eq!(c.compressed().unwrap().row_indices, &[2, 0]);
        assert_eq!(c.values().unwrap(), &[2.0, 1.0]);
    }

    #[test]
    fn test_self_cancellation() {
        let a = from_entries(3, 3, &[(0, 0, 1.0), (2, 1, -4.0), (1, 2, 2.5)]);
        let mut c = add(&a, &a, 1.0, -1.0).unwrap();
        assert_eq!(c.count_nonzeros(), 0);
        drop_zeros(&mut c).unwrap();
        assert_eq!(c.nnz(), 0);
    }

    #[test]
    fn test_dimension_mismatch() {
        let a = from_entries(2, 2, &[(0, 0, 1.0)]);
        let b = from_entries(2, 3, &[(0, 0, 1.0)]);
        assert_eq!(add(&a, &b, 1.0, 1.0).unwrap_err(), SparseError::DimensionMismatch);
    }

    #[test]
    fn test_ewadd_rejects_transpose() {
        let a = from_entries(2, 2, &[(0, 0, 1.0)]);
        let desc = Descriptor::with_transpose_second();
        assert_eq!(
            ewadd(&a, &a, 1.0, 1.0, Some(&desc)).unwrap_err(),
            SparseError::InvalidValue
        );
    }

    #[test]
    fn test_ewadd_drop_zeros_and_sort() {
        let a = from_entries(3, 1, &[(2, 0, 1.0), (0, 0, 1.0), (1, 0, 5.0)]);
        let b = from_entries(3, 1, &[(1, 0, 5.0)]);
        let mut desc = Descriptor::new();
        desc.set_drop_zeros(true).set_sort_indices(true);
        let c = ewadd(&a, &b, 1.0, -1.0, Some(&desc)).unwrap();
        assert_eq!(c.compressed().unwrap().row_indices, &[0, 2]);
    }
}
