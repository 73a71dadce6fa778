// Core Layer: Rust Implementation Module
//
// Sparse matrix entity, its storage discipline and the shared scratch space

pub mod buffer;
pub mod error;
pub mod handles;
pub mod matrix;
pub mod workspace;

// Re-export commonly used types
pub use error::{Result, SparseError};
pub use handles::HandleRegistry;
pub use matrix::{CscRef, SparseMatrix, SparseStorage, TripletRef};
pub use workspace::Workspace;
