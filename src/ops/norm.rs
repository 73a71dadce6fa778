// Norms

use crate::core::error::{Result, SparseError};
use crate::core::matrix::SparseMatrix;
use crate::types::SparseScalar;

/// Induced 1-norm: the largest column sum of absolute values
///
/// An empty matrix has norm zero. A NaN column sum makes the norm NaN.
/// Fails with `MissingValues` for pattern-only matrices.
pub fn norm1<T: SparseScalar>(a: &SparseMatrix<T>) -> Result<T> {
    let a = a.compressed()?;
    let ax = a.values.ok_or(SparseError::MissingValues)?;

    let mut norm = T::ZERO;
    for j in 0..a.ncols {
        let sum = a
            .column(j)
            .fold(T::ZERO, |acc, p| acc + ax[p].abs());
        if sum.is_nan() {
            return Ok(sum);
        }
        if sum > norm {
            norm = sum;
        }
    }
    Ok(norm)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_column() {
        let a = SparseMatrix::<f64>::from_csc(2, 1, vec![0, 2], vec![0, 1], Some(vec![-3.0, 4.0]))
            .unwrap();
        assert_eq!(norm1(&a).unwrap(), 7.0);
    }

    #[test]
    fn test_max_over_columns() {
        let a = SparseMatrix::<f64>::from_csc(
            2,
            3,
            vec![0, 1, 3, 4],
            vec![0, 0, 1, 1],
            Some(vec![5.0, -1.0, -2.0, 4.5]),
        )
        .unwrap();
        assert_eq!(norm1(&a).unwrap(), 5.0);
    }

    #[test]
    fn test_empty_matrix() {
        let a = SparseMatrix::<f64>::from_csc(0, 0, vec![0], vec![], Some(vec![])).unwrap();
        assert_eq!(norm1(&a).unwrap(), 0.0);
    }

    #[test]
    fn test_pattern_only_fails() {
        let a = SparseMatrix::<f64>::from_csc(1, 1, vec![0, 1], vec![0], None).unwrap();
        assert_eq!(norm1(&a), Err(SparseError::MissingValues));
    }

    #[test]
    fn test_nan_propagates() {
        let a = SparseMatrix::<f64>::from_csc(
            1,
            2,
            vec![0, 1, 2],
            vec![0, 0],
            Some(vec![f64::NAN, 1.0]),
        )
        .unwrap();
        assert!(norm1(&a).unwrap().is_nan());
    }

    #[test]
    fn test_single_precision() {
        let a = SparseMatrix::<f32>::identity(4).unwrap();
        assert_eq!(norm1(&a).unwrap(), 1.0f32);
    }
}
