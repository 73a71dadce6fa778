// Descriptor Support
//
// Descriptors modify the behavior of the algebraic operations.
// Descriptor fields:
// - Input transpose: transpose inputs (A, B) of a product
// - Structure only: compute the pattern, drop values
// - Drop zeros: compact explicit zeros out of the result
// - Sort indices: return row indices sorted within each column

use crate::core::error::{Result, SparseError};
use crate::core::matrix::SparseMatrix;
use crate::ops::{apply, transpose};
use crate::types::SparseScalar;

/// Descriptor for modifying operation behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Descriptor {
    /// Transpose first input (A in C=A*B)
    pub transpose_first: bool,

    /// Transpose second input (B in C=A*B)
    pub transpose_second: bool,

    /// Produce a pattern-only result
    pub structure_only: bool,

    /// Remove explicit zeros from the result
    pub drop_zeros: bool,

    /// Sort row indices within each result column
    pub sort_indices: bool,
}

impl Descriptor {
    /// Create a new descriptor with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create descriptor with first input transpose enabled
    pub fn with_transpose_first() -> Self {
        Self {
            transpose_first: true,
            ..Self::new()
        }
    }

    /// Create descriptor with second input transpose enabled
    pub fn with_transpose_second() -> Self {
        Self {
            transpose_second: true,
            ..Self::new()
        }
    }

    /// Create descriptor producing pattern-only results
    pub fn with_structure_only() -> Self {
        Self {
            structure_only: true,
            ..Self::new()
        }
    }

    /// Set transpose first
    pub fn set_transpose_first(&mut self, value: bool) -> &mut Self {
        self.transpose_first = value;
        self
    }

    /// Set transpose second
    pub fn set_transpose_second(&mut self, value: bool) -> &mut Self {
        self.transpose_second = value;
        self
    }

    /// Set structure only
    pub fn set_structure_only(&mut self, value: bool) -> &mut Self {
        self.structure_only = value;
        self
    }

    /// Set drop zeros
    pub fn set_drop_zeros(&mut self, value: bool) -> &mut Self {
        self.drop_zeros = value;
        self
    }

    /// Set sort indices
    pub fn set_sort_indices(&mut self, value: bool) -> &mut Self {
        self.sort_indices = value;
        self
    }

    /// Validate descriptor for matrix products
    pub fn validate_for_matmul(&self) -> Result<()> {
        // Pruning zeros needs values to inspect
        if self.structure_only && self.drop_zeros {
            return Err(SparseError::InvalidValue);
        }
        Ok(())
    }

    /// Validate descriptor for element-wise (scaled sum) operations
    pub fn validate_for_ewise(&self) -> Result<()> {
        // Transpose flags don't make sense for element-wise
        if self.transpose_first || self.transpose_second {
            return Err(SparseError::InvalidValue);
        }
        self.validate_for_matmul()
    }

    /// Apply the result-side flags to a freshly computed matrix
    pub(crate) fn finish<T: SparseScalar>(
        &self,
        mut c: SparseMatrix<T>,
    ) -> Result<SparseMatrix<T>> {
        if self.drop_zeros {
            apply::drop_zeros(&mut c)?;
        }
        if self.sort_indices {
            c = transpose::sort_indices(&c)?;
        }
        c.finalize()?;
        Ok(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_descriptor() {
        let desc = Descriptor::new();
        assert!(!desc.transpose_first);
        assert!(!desc.structure_only);
        assert!(desc.validate_for_ewise().is_ok());
    }

    #[test]
    fn test_builder_setters() {
        let mut desc = Descriptor::new();
        desc.set_drop_zeros(true).set_sort_indices(true);
        assert!(desc.drop_zeros);
        assert!(desc.sort_indices);
        assert!(desc.validate_for_matmul().is_ok());
    }

    #[test]
    fn test_ewise_rejects_transpose() {
        let desc = Descriptor::with_transpose_first();
        assert_eq!(desc.validate_for_ewise(), Err(SparseError::InvalidValue));
        assert!(desc.validate_for_matmul().is_ok());
    }

    #[test]
    fn test_structure_only_conflicts_with_drop_zeros() {
        let mut desc = Descriptor::with_structure_only();
        desc.set_drop_zeros(true);
        assert_eq!(desc.validate_for_matmul(), Err(SparseError::InvalidValue));
    }
}
