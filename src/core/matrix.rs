// Core Layer: Matrix implementation
//
// Dual-representation sparse matrix: triplet form while assembling,
// compressed-column form for every algebraic operation.

use crate::core::buffer;
use crate::core::error::{Result, SparseError};
use crate::types::{SparseScalar, TypeCode};
use std::ops::Range;

/// Sparse matrix storage
///
/// A matrix is in exactly one form at a time. `values` is `None` for
/// pattern-only matrices, whose entries are treated as implicit ones.
#[derive(Debug, Clone, PartialEq)]
pub enum SparseStorage<T> {
    /// Coordinate format: unordered, duplicates allowed
    Triplet {
        row_indices: Vec<usize>,
        col_indices: Vec<usize>,
        values: Option<Vec<T>>,
    },
    /// Compressed Sparse Column format
    Compressed {
        col_ptrs: Vec<usize>,
        row_indices: Vec<usize>,
        values: Option<Vec<T>>,
    },
}

impl<T> SparseStorage<T> {
    /// Get format name
    pub fn format_name(&self) -> &'static str {
        match self {
            SparseStorage::Triplet { .. } => "triplet",
            SparseStorage::Compressed { .. } => "compressed-column",
        }
    }
}

/// Borrowed view of a compressed-column matrix
///
/// Only the first `col_ptrs[ncols]` entries of `row_indices`/`values` are meaningful.
#[derive(Debug, Clone, Copy)]
pub struct CscRef<'a, T> {
    pub nrows: usize,
    pub ncols: usize,
    pub col_ptrs: &'a [usize],
    pub row_indices: &'a [usize],
    pub values: Option<&'a [T]>,
}

impl<'a, T> CscRef<'a, T> {
    /// Number of stored entries
    pub fn nnz(&self) -> usize {
        self.col_ptrs[self.ncols]
    }

    /// Range of entry positions belonging to column `j`
    pub fn column(&self, j: usize) -> Range<usize> {
        self.col_ptrs[j]..self.col_ptrs[j + 1]
    }
}

/// Borrowed view of a triplet-form matrix
#[derive(Debug, Clone, Copy)]
pub struct TripletRef<'a, T> {
    pub nrows: usize,
    pub ncols: usize,
    pub row_indices: &'a [usize],
    pub col_indices: &'a [usize],
    pub values: Option<&'a [T]>,
}

impl<'a, T> TripletRef<'a, T> {
    /// Number of stored entries
    pub fn nnz(&self) -> usize {
        self.row_indices.len()
    }
}

/// Sparse matrix
///
/// Each instance exclusively owns its backing arrays; every producing
/// operation allocates fresh storage for its result.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseMatrix<T: SparseScalar> {
    /// Shape: (number of rows, number of columns)
    shape: (usize, usize),
    /// Sparse storage format
    storage: SparseStorage<T>,
}

impl<T: SparseScalar> SparseMatrix<T> {
    /// Allocate an empty triplet-form matrix
    ///
    /// # Arguments
    /// * `nrows` - Number of rows (declared bound, never expanded)
    /// * `ncols` - Number of columns (declared bound, never expanded)
    /// * `capacity_hint` - Initial entry capacity; 0 grows from empty
    /// * `with_values` - Allocate a values array (false gives a pattern-only matrix)
    pub fn triplet(
        nrows: usize,
        ncols: usize,
        capacity_hint: usize,
        with_values: bool,
    ) -> Result<Self> {
        let values = if with_values {
            Some(buffer::with_capacity(capacity_hint)?)
        } else {
            None
        };
        Ok(Self {
            shape: (nrows, ncols),
            storage: SparseStorage::Triplet {
                row_indices: buffer::with_capacity(capacity_hint)?,
                col_indices: buffer::with_capacity(capacity_hint)?,
                values,
            },
        })
    }

    /// Create an `n`-by-`n` compressed identity matrix
    pub fn identity(n: usize) -> Result<Self> {
        let mut col_ptrs = buffer::with_capacity(n + 1)?;
        col_ptrs.extend(0..=n);
        let mut row_indices = buffer::with_capacity(n)?;
        row_indices.extend(0..n);
        let values = buffer::filled(n, T::ONE)?;
        Ok(Self::from_compressed_parts(
            n,
            n,
            col_ptrs,
            row_indices,
            Some(values),
        ))
    }

    /// Create a compressed-column matrix from raw arrays
    ///
    /// The arrays are validated: `col_ptrs` must have length `ncols + 1`, start at 0
    /// and be non-decreasing; row indices must be in bounds and unique per column.
    pub fn from_csc(
        nrows: usize,
        ncols: usize,
        col_ptrs: Vec<usize>,
        row_indices: Vec<usize>,
        values: Option<Vec<T>>,
    ) -> Result<Self> {
        validate_csc(
            nrows,
            ncols,
            &col_ptrs,
            &row_indices,
            values.as_ref().map(Vec::len),
        )?;
        Ok(Self {
            shape: (nrows, ncols),
            storage: SparseStorage::Compressed {
                col_ptrs,
                row_indices,
                values,
            },
        })
    }

    /// Assemble a compressed matrix produced by one of the kernels
    pub(crate) fn from_compressed_parts(
        nrows: usize,
        ncols: usize,
        col_ptrs: Vec<usize>,
        row_indices: Vec<usize>,
        values: Option<Vec<T>>,
    ) -> Self {
        debug_assert!(validate_csc(
            nrows,
            ncols,
            &col_ptrs,
            &row_indices,
            values.as_ref().map(Vec::len)
        )
        .is_ok());
        Self {
            shape: (nrows, ncols),
            storage: SparseStorage::Compressed {
                col_ptrs,
                row_indices,
                values,
            },
        }
    }

    /// Assemble a triplet matrix from parallel arrays produced by a kernel
    pub(crate) fn from_triplet_parts(
        nrows: usize,
        ncols: usize,
        row_indices: Vec<usize>,
        col_indices: Vec<usize>,
        values: Option<Vec<T>>,
    ) -> Self {
        debug_assert_eq!(row_indices.len(), col_indices.len());
        Self {
            shape: (nrows, ncols),
            storage: SparseStorage::Triplet {
                row_indices,
                col_indices,
                values,
            },
        }
    }

    /// Mutable access to compressed arrays for in-place compaction
    #[allow(clippy::type_complexity)]
    pub(crate) fn compressed_parts_mut(
        &mut self,
    ) -> Result<(&mut Vec<usize>, &mut Vec<usize>, Option<&mut Vec<T>>)> {
        match &mut self.storage {
            SparseStorage::Compressed {
                col_ptrs,
                row_indices,
                values,
            } => Ok((col_ptrs, row_indices, values.as_mut())),
            SparseStorage::Triplet { .. } => Err(SparseError::NotCompressed),
        }
    }

    /// Append one entry to a triplet-form matrix
    ///
    /// A compressed matrix fails with `NotTriplet` whatever the indices. Negative
    /// indices fail with `InvalidIndex`; indices at or beyond the declared
    /// bounds fail with `IndexOutOfBounds`. In all cases nothing is appended.
    /// When the backing arrays are full their capacity is doubled first.
    pub fn add_entry<I>(&mut self, row: I, col: I, value: T) -> Result<()>
    where
        I: TryInto<usize>,
    {
        let (nrows, ncols) = self.shape;
        match &mut self.storage {
            SparseStorage::Triplet {
                row_indices,
                col_indices,
                values,
            } => {
                let row: usize = row.try_into().map_err(|_| SparseError::InvalidIndex)?;
                let col: usize = col.try_into().map_err(|_| SparseError::InvalidIndex)?;
                if row >= nrows || col >= ncols {
                    return Err(SparseError::IndexOutOfBounds);
                }

                let needed = row_indices.len() + 1;
                buffer::ensure_capacity(row_indices, needed)?;
                buffer::ensure_capacity(col_indices, needed)?;
                if let Some(values) = values.as_mut() {
                    buffer::ensure_capacity(values, needed)?;
                    values.push(value);
                }
                row_indices.push(row);
                col_indices.push(col);
                Ok(())
            }
            SparseStorage::Compressed { .. } => Err(SparseError::NotTriplet),
        }
    }

    /// Get number of rows
    pub fn nrows(&self) -> usize {
        self.shape.0
    }

    /// Get number of columns
    pub fn ncols(&self) -> usize {
        self.shape.1
    }

    /// Get shape as (nrows, ncols)
    pub fn shape(&self) -> (usize, usize) {
        self.shape
    }

    /// Get type code
    pub fn type_code(&self) -> TypeCode {
        T::TYPE_CODE
    }

    /// Get number of stored entries (explicit zeros and, in triplet form, duplicates included)
    pub fn nnz(&self) -> usize {
        match &self.storage {
            SparseStorage::Triplet { row_indices, .. } => row_indices.len(),
            SparseStorage::Compressed { col_ptrs, .. } => col_ptrs[self.shape.1],
        }
    }

    /// Number of entries the backing arrays can hold without reallocating
    pub fn capacity(&self) -> usize {
        match &self.storage {
            SparseStorage::Triplet { row_indices, .. }
            | SparseStorage::Compressed { row_indices, .. } => row_indices.capacity(),
        }
    }

    /// Count entries whose stored value is not zero
    pub fn count_nonzeros(&self) -> usize {
        match self.values() {
            Some(values) => values.iter().filter(|&&v| v != T::ZERO).count(),
            None => self.nnz(),
        }
    }

    pub fn is_triplet(&self) -> bool {
        matches!(self.storage, SparseStorage::Triplet { .. })
    }

    pub fn is_compressed(&self) -> bool {
        matches!(self.storage, SparseStorage::Compressed { .. })
    }

    /// Whether numerical values are stored (false for pattern-only matrices)
    pub fn has_values(&self) -> bool {
        self.values().is_some()
    }

    /// Get reference to storage
    pub fn storage(&self) -> &SparseStorage<T> {
        &self.storage
    }

    /// Stored values, if any
    pub fn values(&self) -> Option<&[T]> {
        match &self.storage {
            SparseStorage::Triplet { values, .. } | SparseStorage::Compressed { values, .. } => {
                values.as_deref()
            }
        }
    }

    /// Mutable stored values, if any
    pub(crate) fn values_mut(&mut self) -> Option<&mut Vec<T>> {
        match &mut self.storage {
            SparseStorage::Triplet { values, .. } | SparseStorage::Compressed { values, .. } => {
                values.as_mut()
            }
        }
    }

    /// Borrow as a compressed-column view, failing with `NotCompressed` otherwise
    pub fn compressed(&self) -> Result<CscRef<'_, T>> {
        match &self.storage {
            SparseStorage::Compressed {
                col_ptrs,
                row_indices,
                values,
            } => Ok(CscRef {
                nrows: self.shape.0,
                ncols: self.shape.1,
                col_ptrs,
                row_indices,
                values: values.as_deref(),
            }),
            SparseStorage::Triplet { .. } => Err(SparseError::NotCompressed),
        }
    }

    /// Borrow as a triplet view, failing with `NotTriplet` otherwise
    pub fn triplets(&self) -> Result<TripletRef<'_, T>> {
        match &self.storage {
            SparseStorage::Triplet {
                row_indices,
                col_indices,
                values,
            } => Ok(TripletRef {
                nrows: self.shape.0,
                ncols: self.shape.1,
                row_indices,
                col_indices,
                values: values.as_deref(),
            }),
            SparseStorage::Compressed { .. } => Err(SparseError::NotTriplet),
        }
    }

    /// All stored entries as (row, col, value) in storage order
    ///
    /// Pattern-only entries report a value of one.
    pub fn entries(&self) -> Vec<(usize, usize, T)> {
        let value_at = |values: Option<&[T]>, p: usize| values.map_or(T::ONE, |x| x[p]);
        match &self.storage {
            SparseStorage::Triplet {
                row_indices,
                col_indices,
                values,
            } => (0..row_indices.len())
                .map(|p| (row_indices[p], col_indices[p], value_at(values.as_deref(), p)))
                .collect(),
            SparseStorage::Compressed {
                col_ptrs,
                row_indices,
                values,
            } => (0..self.shape.1)
                .flat_map(|j| (col_ptrs[j]..col_ptrs[j + 1]).map(move |p| (j, p)))
                .map(|(j, p)| (row_indices[p], j, value_at(values.as_deref(), p)))
                .collect(),
        }
    }

    /// Look up entry (row, col)
    ///
    /// Triplet duplicates are summed. Returns `None` when nothing is stored there.
    pub fn get(&self, row: usize, col: usize) -> Option<T> {
        if row >= self.shape.0 || col >= self.shape.1 {
            return None;
        }
        let mut found: Option<T> = None;
        for (i, j, v) in self.entries() {
            if i == row && j == col {
                found = Some(found.map_or(v, |acc| acc + v));
            }
        }
        found
    }

    /// Set the capacity of the backing arrays
    ///
    /// A `capacity` of 0 (or anything below `nnz`) shrinks them to exactly `nnz`.
    pub fn reallocate(&mut self, capacity: usize) -> Result<()> {
        let capacity = capacity.max(self.nnz());
        match &mut self.storage {
            SparseStorage::Triplet {
                row_indices,
                col_indices,
                values,
            } => {
                buffer::reallocate(row_indices, capacity)?;
                buffer::reallocate(col_indices, capacity)?;
                if let Some(values) = values {
                    buffer::reallocate(values, capacity)?;
                }
            }
            SparseStorage::Compressed {
                row_indices,
                values,
                ..
            } => {
                buffer::reallocate(row_indices, capacity)?;
                if let Some(values) = values {
                    buffer::reallocate(values, capacity)?;
                }
            }
        }
        Ok(())
    }

    /// Drop excess capacity so the result carries exactly `nnz` slots
    pub fn finalize(&mut self) -> Result<()> {
        self.reallocate(0)
    }

    /// Release the matrix and all of its backing arrays
    pub fn release(self) {
        log::trace!(
            "Releasing {} matrix {}x{} ({} entries)",
            self.storage.format_name(),
            self.shape.0,
            self.shape.1,
            self.nnz()
        );
    }

    /// Check the structural invariants of the current form
    pub fn is_valid(&self) -> bool {
        match &self.storage {
            SparseStorage::Triplet {
                row_indices,
                col_indices,
                values,
            } => {
                row_indices.len() == col_indices.len()
                    && values.as_ref().map_or(true, |v| v.len() == row_indices.len())
                    && row_indices.iter().all(|&i| i < self.shape.0)
                    && col_indices.iter().all(|&j| j < self.shape.1)
            }
            SparseStorage::Compressed {
                col_ptrs,
                row_indices,
                values,
            } => validate_csc(
                self.shape.0,
                self.shape.1,
                col_ptrs,
                row_indices,
                values.as_ref().map(Vec::len),
            )
            .is_ok(),
        }
    }
}

/// Validate compressed-column arrays
fn validate_csc(
    nrows: usize,
    ncols: usize,
    col_ptrs: &[usize],
    row_indices: &[usize],
    values_len: Option<usize>,
) -> Result<()> {
    if col_ptrs.len() != ncols + 1 || col_ptrs[0] != 0 {
        return Err(SparseError::InvalidValue);
    }
    if col_ptrs.windows(2).any(|w| w[0] > w[1]) {
        return Err(SparseError::InvalidValue);
    }
    let nnz = col_ptrs[ncols];
    if row_indices.len() != nnz || values_len.map_or(false, |len| len != nnz) {
        return Err(SparseError::InvalidValue);
    }

    // Last column (plus one) in which each row was seen
    let mut seen = vec![0usize; nrows];
    for j in 0..ncols {
        for &i in &row_indices[col_ptrs[j]..col_ptrs[j + 1]] {
            if i >= nrows {
                return Err(SparseError::IndexOutOfBounds);
            }
            if seen[i] == j + 1 {
                return Err(SparseError::InvalidValue);
            }
            seen[i] = j + 1;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triplet_growth_from_empty() {
        let mut t = SparseMatrix::<f64>::triplet(3, 3, 0, true).unwrap();
        assert_eq!(t.nnz(), 0);
        for k in 0..5 {
            t.add_entry(k % 3, (k + 1) % 3, k as f64).unwrap();
        }
        assert_eq!(t.nnz(), 5);
        assert!(t.capacity() >= 5);
        assert!(t.is_triplet());
        assert!(t.is_valid());
    }

    #[test]
    fn test_negative_index_rejected() {
        let mut t = SparseMatrix::<f64>::triplet(2, 2, 4, true).unwrap();
        assert_eq!(t.add_entry(-1, 0, 1.0), Err(SparseError::InvalidIndex));
        assert_eq!(t.add_entry(0, -3, 1.0), Err(SparseError::InvalidIndex));
        assert_eq!(t.nnz(), 0);
    }

    #[test]
    fn test_out_of_bounds_rejected() {
        let mut t = SparseMatrix::<f64>::triplet(2, 2, 4, true).unwrap();
        assert_eq!(t.add_entry(2, 0, 1.0), Err(SparseError::IndexOutOfBounds));
        assert_eq!(t.add_entry(0, 5, 1.0), Err(SparseError::IndexOutOfBounds));
        assert_eq!(t.nnz(), 0);
        assert_eq!(t.shape(), (2, 2));
    }

    #[test]
    fn test_pattern_only_triplet() {
        let mut t = SparseMatrix::<f64>::triplet(2, 2, 1, false).unwrap();
        t.add_entry(1, 1, 42.0).unwrap();
        assert!(!t.has_values());
        assert_eq!(t.get(1, 1), Some(1.0));
    }

    #[test]
    fn test_identity() {
        let eye = SparseMatrix::<f64>::identity(3).unwrap();
        assert!(eye.is_compressed());
        assert_eq!(eye.nnz(), 3);
        assert_eq!(eye.get(2, 2), Some(1.0));
        assert_eq!(eye.get(0, 2), None);
        assert!(eye.is_valid());
    }

    #[test]
    fn test_add_entry_to_compressed_fails() {
        let mut eye = SparseMatrix::<f64>::identity(2).unwrap();
        assert_eq!(eye.add_entry(0, 1, 1.0), Err(SparseError::NotTriplet));
        // The form is checked before the indices
        assert_eq!(eye.add_entry(5, 5, 1.0), Err(SparseError::NotTriplet));
        assert_eq!(eye.add_entry(-1, 0, 1.0), Err(SparseError::NotTriplet));
        assert_eq!(eye.nnz(), 2);
    }

    #[test]
    fn test_from_csc_validation() {
        let ok =
            SparseMatrix::<f64>::from_csc(2, 2, vec![0, 1, 2], vec![0, 1], Some(vec![1.0, 2.0]));
        assert!(ok.is_ok());

        let bad_ptrs = SparseMatrix::<f64>::from_csc(2, 2, vec![0, 2], vec![0, 1], None);
        assert_eq!(bad_ptrs.unwrap_err(), SparseError::InvalidValue);

        let bad_row = SparseMatrix::<f64>::from_csc(2, 1, vec![0, 1], vec![2], None);
        assert_eq!(bad_row.unwrap_err(), SparseError::IndexOutOfBounds);

        let dup_row = SparseMatrix::<f64>::from_csc(2, 1, vec![0, 2], vec![1, 1], None);
        assert_eq!(dup_row.unwrap_err(), SparseError::InvalidValue);
    }

    #[test]
    fn test_finalize_shrinks_capacity() {
        let mut t = SparseMatrix::<f64>::triplet(4, 4, 100, true).unwrap();
        t.add_entry(0, 0, 1.0).unwrap();
        t.finalize().unwrap();
        assert!(t.capacity() < 100);
        assert_eq!(t.nnz(), 1);
    }

    #[test]
    fn test_count_nonzeros_ignores_explicit_zeros() {
        let m = SparseMatrix::<f64>::from_csc(2, 1, vec![0, 2], vec![0, 1], Some(vec![0.0, 3.0]))
            .unwrap();
        assert_eq!(m.nnz(), 2);
        assert_eq!(m.count_nonzeros(), 1);
    }
}
