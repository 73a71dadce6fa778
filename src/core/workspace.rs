// Core Layer: Sparse accumulator workspace
//
// Dense per-row scratch space shared by multiply and add. A row is "seen" in
// the current output column iff its mark equals the current generation stamp,
// so moving to the next column is a single increment instead of an O(rows) clear.

use crate::core::buffer;
use crate::core::error::Result;
use crate::core::matrix::CscRef;
use crate::types::SparseScalar;

/// Reusable scratch space for the product and scaled-sum kernels
///
/// A workspace may be reused across calls and across matrices of different
/// sizes; it grows to the largest row count it has been prepared for.
#[derive(Debug, Clone)]
pub struct Workspace<T: SparseScalar> {
    /// Generation stamp per row
    marks: Vec<usize>,
    /// Dense accumulator per row, valid only where the mark is current
    values: Vec<T>,
    /// Current generation
    generation: usize,
}

impl<T: SparseScalar> Workspace<T> {
    /// Create an empty workspace
    pub fn new() -> Self {
        Self {
            marks: Vec::new(),
            values: Vec::new(),
            generation: 0,
        }
    }

    /// Create a workspace sized for matrices with `nrows` rows
    pub fn with_rows(nrows: usize) -> Result<Self> {
        let mut ws = Self::new();
        ws.prepare(nrows)?;
        Ok(ws)
    }

    /// Number of rows the workspace currently covers
    pub fn rows(&self) -> usize {
        self.marks.len()
    }

    /// Grow the workspace to cover at least `nrows` rows
    pub fn prepare(&mut self, nrows: usize) -> Result<()> {
        let len = self.marks.len();
        if nrows > len {
            self.marks.try_reserve_exact(nrows - len)?;
            self.values.try_reserve_exact(nrows - len)?;
            // New slots start at stamp 0, which no live generation uses
            self.marks.resize(nrows, 0);
            self.values.resize(nrows, T::ZERO);
        }
        Ok(())
    }

    /// Start a new output column and return its stamp
    pub fn next_generation(&mut self) -> usize {
        if self.generation == usize::MAX {
            // Stamp space exhausted: fall back to a full clear once
            self.marks.iter_mut().for_each(|m| *m = 0);
            self.generation = 0;
        }
        self.generation += 1;
        self.generation
    }

    /// Whether `row` has been touched under `stamp`
    pub fn is_marked(&self, row: usize, stamp: usize) -> bool {
        self.marks[row] == stamp
    }

    /// Scatter `beta * A[:, col]` into the accumulator
    ///
    /// Rows seen for the first time under `stamp` are appended to `touched`
    /// (in first-touched order); rows already seen are summed into.
    /// Values are accumulated only when both `beta` and `A`'s values are present.
    pub fn scatter(
        &mut self,
        a: &CscRef<'_, T>,
        col: usize,
        beta: Option<T>,
        stamp: usize,
        touched: &mut Vec<usize>,
    ) {
        let ax = a.values.zip(beta);
        for p in a.column(col) {
            let i = a.row_indices[p];
            if self.marks[i] != stamp {
                self.marks[i] = stamp;
                touched.push(i);
                if let Some((ax, beta)) = ax {
                    self.values[i] = beta * ax[p];
                }
            } else if let Some((ax, beta)) = ax {
                self.values[i] += beta * ax[p];
            }
        }
    }

    /// Append the accumulated values for `rows` to `out`
    pub fn gather(&self, rows: &[usize], out: &mut Vec<T>) -> Result<()> {
        buffer::ensure_capacity(out, out.len() + rows.len())?;
        out.extend(rows.iter().map(|&i| self.values[i]));
        Ok(())
    }
}

impl<T: SparseScalar> Default for Workspace<T> {
    fn default() -> Self {
        Self::new()
    }
}
