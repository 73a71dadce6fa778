// Text triplet loader
//
// Format: a header line `rows cols nnz`, followed by `nnz` lines of
// `row col value`. Blank lines and lines starting with `%` or `#` are ignored.
// Indices are 0-based unless `IndexBase::One` is selected.

use crate::core::error::{Result, SparseError};
use crate::core::matrix::SparseMatrix;
use crate::types::SparseScalar;
use std::io::BufRead;

/// First index value used by the input text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexBase {
    #[default]
    Zero,
    One,
}

impl IndexBase {
    fn offset(&self) -> i64 {
        match self {
            IndexBase::Zero => 0,
            IndexBase::One => 1,
        }
    }
}

/// Loader configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Index base of the row/column fields
    pub index_base: IndexBase,
    /// Read the value column (false loads a pattern-only matrix and
    /// makes the value column optional)
    pub with_values: bool,
}

impl LoadOptions {
    pub fn new() -> Self {
        Self {
            index_base: IndexBase::Zero,
            with_values: true,
        }
    }

    /// Options for 1-based input
    pub fn one_based() -> Self {
        Self {
            index_base: IndexBase::One,
            ..Self::new()
        }
    }

    pub fn set_index_base(&mut self, base: IndexBase) -> &mut Self {
        self.index_base = base;
        self
    }

    pub fn set_with_values(&mut self, value: bool) -> &mut Self {
        self.with_values = value;
        self
    }
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self::new()
    }
}

fn invalid(line: usize, msg: impl std::fmt::Display) -> SparseError {
    SparseError::InvalidInput(format!("line {}: {}", line, msg))
}

fn parse_field<F: std::str::FromStr>(field: Option<&str>, line: usize, what: &str) -> Result<F> {
    let field = field.ok_or_else(|| invalid(line, format!("missing {}", what)))?;
    field
        .parse()
        .map_err(|_| invalid(line, format!("cannot parse {} from {:?}", what, field)))
}

/// Load a triplet-form matrix from text
///
/// Entry indices outside the header's bounds are rejected with
/// `IndexOutOfBounds`; negative indices (after applying the index base)
/// with `InvalidIndex`.
pub fn load<T: SparseScalar, R: BufRead>(
    reader: R,
    options: &LoadOptions,
) -> Result<SparseMatrix<T>> {
    let mut matrix: Option<SparseMatrix<T>> = None;
    let mut expected = 0usize;
    let mut loaded = 0usize;

    for (index, line) in reader.lines().enumerate() {
        let lineno = index + 1;
        let line = line.map_err(|e| invalid(lineno, e))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('%') || trimmed.starts_with('#') {
            continue;
        }
        let mut fields = trimmed.split_whitespace();

        if matrix.is_none() {
            let rows: usize = parse_field(fields.next(), lineno, "row count")?;
            let cols: usize = parse_field(fields.next(), lineno, "column count")?;
            expected = parse_field(fields.next(), lineno, "entry count")?;
            log::debug!("Loading {}x{} matrix with {} entries", rows, cols, expected);
            matrix = Some(SparseMatrix::triplet(rows, cols, expected, options.with_values)?);
            continue;
        }
        let Some(t) = matrix.as_mut() else {
            continue;
        };

        if loaded == expected {
            return Err(invalid(lineno, "more entries than declared in header"));
        }
        let row: i64 = parse_field(fields.next(), lineno, "row index")?;
        let col: i64 = parse_field(fields.next(), lineno, "column index")?;
        let value: T = if options.with_values {
            parse_field(fields.next(), lineno, "value")?
        } else {
            T::ONE
        };
        let base = options.index_base.offset();
        let row = row.checked_sub(base).ok_or(SparseError::InvalidIndex)?;
        let col = col.checked_sub(base).ok_or(SparseError::InvalidIndex)?;
        t.add_entry(row, col, value)?;
        loaded += 1;
    }

    let matrix =
        matrix.ok_or_else(|| SparseError::InvalidInput("missing header line".to_string()))?;
    if loaded != expected {
        return Err(SparseError::InvalidInput(format!(
            "header declares {} entries, found {}",
            expected, loaded
        )));
    }
    log::trace!("Loaded {} entries", loaded);
    Ok(matrix)
}

/// Load a triplet-form matrix from a string
pub fn load_str<T: SparseScalar>(text: &str, options: &LoadOptions) -> Result<SparseMatrix<T>> {
    load(text.as_bytes(), options)
}
