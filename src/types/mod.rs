// Type System: Bridge between runtime type codes and compile-time value types
//
// Sparse matrices are generic over their value type. This module provides:
// 1. TypeCode - Runtime enum representation (used by printing and the handle layer)
// 2. SparseScalar trait - Compile-time arithmetic the algorithms need

use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg};
use std::str::FromStr;

/// Runtime type code enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeCode {
    /// 32-bit floating point
    Fp32,
    /// 64-bit floating point
    Fp64,
}

impl TypeCode {
    /// Get the size in bytes for this type code
    pub fn size(&self) -> usize {
        match self {
            TypeCode::Fp32 => std::mem::size_of::<f32>(),
            TypeCode::Fp64 => std::mem::size_of::<f64>(),
        }
    }

    /// Get human-readable name for this type code
    pub fn name(&self) -> &'static str {
        match self {
            TypeCode::Fp32 => "float32",
            TypeCode::Fp64 => "float64",
        }
    }
}

/// Trait for value types that can be stored in a sparse matrix
///
/// Supplies the additive/multiplicative structure used by compression
/// (duplicate summation), multiply, add and the 1-norm.
pub trait SparseScalar:
    Copy
    + PartialEq
    + PartialOrd
    + Add<Output = Self>
    + AddAssign
    + Mul<Output = Self>
    + Neg<Output = Self>
    + FromStr
    + fmt::Display
    + fmt::Debug
    + 'static
{
    /// The runtime type code for this type
    const TYPE_CODE: TypeCode;

    /// Additive identity
    const ZERO: Self;

    /// Multiplicative identity
    const ONE: Self;

    /// Absolute value
    fn abs(self) -> Self;

    /// Whether the value is NaN
    fn is_nan(self) -> bool;

    /// Get human-readable type name
    fn type_name() -> &'static str {
        Self::TYPE_CODE.name()
    }
}

impl SparseScalar for f32 {
    const TYPE_CODE: TypeCode = TypeCode::Fp32;
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;

    fn abs(self) -> Self {
        f32::abs(self)
    }

    fn is_nan(self) -> bool {
        f32::is_nan(self)
    }
}

impl SparseScalar for f64 {
    const TYPE_CODE: TypeCode = TypeCode::Fp64;
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;

    fn abs(self) -> Self {
        f64::abs(self)
    }

    fn is_nan(self) -> bool {
        f64::is_nan(self)
    }
}
