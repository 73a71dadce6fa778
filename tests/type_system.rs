// Integration tests for the value type layer

use rustcsparse::ops::{add, compress, multiply, norm1, transpose};
use rustcsparse::types::{SparseScalar, TypeCode};
use rustcsparse::SparseMatrix;

#[test]
fn test_builtin_type_codes() {
    assert_eq!(f32::TYPE_CODE, TypeCode::Fp32);
    assert_eq!(f64::TYPE_CODE, TypeCode::Fp64);
    assert_eq!(TypeCode::Fp32.size(), std::mem::size_of::<f32>());
    assert_eq!(TypeCode::Fp64.size(), std::mem::size_of::<f64>());
}

#[test]
fn test_identities() {
    assert_eq!(f32::ZERO + f32::ONE, 1.0f32);
    assert_eq!(f64::ONE * f64::ONE, 1.0);
    assert!(SparseScalar::is_nan(f64::NAN));
    assert_eq!(SparseScalar::abs(-0.5f32), 0.5);
}

fn pipeline<T: SparseScalar>(values: [T; 3]) -> (SparseMatrix<T>, T) {
    let mut t = SparseMatrix::<T>::triplet(2, 2, 3, true).unwrap();
    t.add_entry(0, 0, values[0]).unwrap();
    t.add_entry(1, 0, values[1]).unwrap();
    t.add_entry(1, 1, values[2]).unwrap();
    let a = compress(&t).unwrap();
    let c = multiply(&a, &transpose(&a, true).unwrap()).unwrap();
    let d = add(&c, &SparseMatrix::identity(2).unwrap(), T::ONE, T::ONE).unwrap();
    let norm = norm1(&d).unwrap();
    (d, norm)
}

#[test]
fn test_same_pipeline_for_both_types() {
    let (d32, n32) = pipeline::<f32>([1.0, 2.0, -1.0]);
    let (d64, n64) = pipeline::<f64>([1.0, 2.0, -1.0]);

    assert_eq!(d32.type_code(), TypeCode::Fp32);
    assert_eq!(d64.type_code(), TypeCode::Fp64);
    assert_eq!(d32.nnz(), d64.nnz());
    assert_eq!(n32 as f64, n64);

    // A*A' = [[1, 2], [2, 5]], plus I
    assert_eq!(d64.get(0, 0), Some(2.0));
    assert_eq!(d64.get(1, 0), Some(2.0));
    assert_eq!(d64.get(1, 1), Some(6.0));
    assert_eq!(n64, 8.0);
}
