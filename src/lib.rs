// RustCSparse: compressed-column sparse matrix core
//
// This library provides the sparse-matrix kernels that direct solvers build on:
// triplet assembly, triplet -> compressed-column conversion with duplicate
// summation, transpose, sparse product, scaled sum and the 1-norm.
//
// Architecture:
// - core: matrix entity (triplet / compressed storage), errors, workspace, handles
// - types: value types usable in a matrix
// - ops: algebraic operations; every operation returns a freshly owned matrix
// - io: text triplet loader and diagnostic printing
// - api: handle-based allocate / operate / release contract

// Public modules
pub mod api;
pub mod core;
pub mod io;
pub mod ops;
pub mod types;

// Re-export commonly used items for convenience
pub use crate::core::{Result, SparseError, SparseMatrix, Workspace};
pub use ops::Descriptor;
pub use types::{SparseScalar, TypeCode};

/// Library name used in diagnostic output
pub const NAME: &str = "RustCSparse";

/// Major version
pub const VERSION_MAJOR: u32 = 4;
/// Minor version
pub const VERSION_MINOR: u32 = 3;
/// Patch version
pub const VERSION_PATCH: u32 = 1;
/// Version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Version as [major, minor, patch]
pub const fn version() -> [u32; 3] {
    [VERSION_MAJOR, VERSION_MINOR, VERSION_PATCH]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_matches_package() {
        let [major, minor, patch] = version();
        assert_eq!(VERSION, format!("{}.{}.{}", major, minor, patch));
    }
}
