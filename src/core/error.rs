// Core Layer: Rust Error Types
// Idiomatic Rust error handling for the sparse core

use std::fmt;

/// Integer status code reported across the handle boundary
pub type Status = i32;

pub const STATUS_SUCCESS: Status = 0;
pub const STATUS_NULL_POINTER: Status = -1;
pub const STATUS_INVALID_VALUE: Status = -2;
pub const STATUS_INVALID_INDEX: Status = -3;
pub const STATUS_INDEX_OUT_OF_BOUNDS: Status = -4;
pub const STATUS_DIMENSION_MISMATCH: Status = -5;
pub const STATUS_NOT_COMPRESSED: Status = -6;
pub const STATUS_MISSING_VALUES: Status = -7;
pub const STATUS_USE_AFTER_RELEASE: Status = -8;
pub const STATUS_INVALID_INPUT: Status = -9;
pub const STATUS_NOT_TRIPLET: Status = -10;
pub const STATUS_OUT_OF_MEMORY: Status = -102;

/// Rust-native sparse core error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SparseError {
    /// Handle is null (0) or was never issued
    NullPointer,
    /// Invalid parameter value
    InvalidValue,
    /// Negative row or column index
    InvalidIndex,
    /// Index beyond the declared bounds of the matrix
    IndexOutOfBounds,
    /// Dimension mismatch between operands
    DimensionMismatch,
    /// Operation requires a compressed-column matrix
    NotCompressed,
    /// Operation requires a triplet-form matrix
    NotTriplet,
    /// Operation requires numerical values but the matrix is pattern-only
    MissingValues,
    /// Handle refers to a matrix that has already been released
    UseAfterRelease,
    /// Memory allocation failed
    OutOfMemory,
    /// Malformed text input
    InvalidInput(String),
}

impl SparseError {
    /// Convert Rust error to a status code
    pub fn to_status(&self) -> Status {
        match self {
            Self::NullPointer => STATUS_NULL_POINTER,
            Self::InvalidValue => STATUS_INVALID_VALUE,
            Self::InvalidIndex => STATUS_INVALID_INDEX,
            Self::IndexOutOfBounds => STATUS_INDEX_OUT_OF_BOUNDS,
            Self::DimensionMismatch => STATUS_DIMENSION_MISMATCH,
            Self::NotCompressed => STATUS_NOT_COMPRESSED,
            Self::NotTriplet => STATUS_NOT_TRIPLET,
            Self::MissingValues => STATUS_MISSING_VALUES,
            Self::UseAfterRelease => STATUS_USE_AFTER_RELEASE,
            Self::OutOfMemory => STATUS_OUT_OF_MEMORY,
            Self::InvalidInput(_) => STATUS_INVALID_INPUT,
        }
    }

    /// Convert a status code back to a Rust error
    pub fn from_status(status: Status) -> Option<Self> {
        match status {
            STATUS_SUCCESS => None,
            STATUS_NULL_POINTER => Some(Self::NullPointer),
            STATUS_INVALID_VALUE => Some(Self::InvalidValue),
            STATUS_INVALID_INDEX => Some(Self::InvalidIndex),
            STATUS_INDEX_OUT_OF_BOUNDS => Some(Self::IndexOutOfBounds),
            STATUS_DIMENSION_MISMATCH => Some(Self::DimensionMismatch),
            STATUS_NOT_COMPRESSED => Some(Self::NotCompressed),
            STATUS_NOT_TRIPLET => Some(Self::NotTriplet),
            STATUS_MISSING_VALUES => Some(Self::MissingValues),
            STATUS_USE_AFTER_RELEASE => Some(Self::UseAfterRelease),
            STATUS_OUT_OF_MEMORY => Some(Self::OutOfMemory),
            STATUS_INVALID_INPUT => Some(Self::InvalidInput("unknown".to_string())),
            _ => Some(Self::InvalidValue),
        }
    }

    /// Whether the error aborts the whole operation chain
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::OutOfMemory)
    }
}

impl fmt::Display for SparseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NullPointer => write!(f, "Handle is null or unknown"),
            Self::InvalidValue => write!(f, "Invalid parameter value"),
            Self::InvalidIndex => write!(f, "Invalid (negative) index"),
            Self::IndexOutOfBounds => write!(f, "Index exceeds declared matrix bounds"),
            Self::DimensionMismatch => write!(f, "Dimension mismatch between operands"),
            Self::NotCompressed => write!(f, "Matrix is not in compressed-column form"),
            Self::NotTriplet => write!(f, "Matrix is not in triplet form"),
            Self::MissingValues => write!(f, "Matrix holds a pattern only, no values"),
            Self::UseAfterRelease => write!(f, "Matrix has already been released"),
            Self::OutOfMemory => write!(f, "Memory allocation failed"),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

impl std::error::Error for SparseError {}

impl From<std::collections::TryReserveError> for SparseError {
    fn from(_: std::collections::TryReserveError) -> Self {
        Self::OutOfMemory
    }
}

/// Result type for sparse core operations
pub type Result<T> = std::result::Result<T, SparseError>;
