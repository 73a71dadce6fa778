// Operations Module
//
// Algebraic operations over compressed-column matrices. Every producing
// operation returns a new, independently owned matrix.

pub mod apply;
pub mod compress;
pub mod descriptor;
pub mod ewise;
pub mod matmul;
pub mod norm;
pub mod transpose;

// Re-exports
pub use apply::{drop_zeros, keep, scale};
pub use compress::{compress, to_triplet};
pub use descriptor::Descriptor;
pub use ewise::{add, add_with, ewadd};
pub use matmul::{gaxpy, multiply, multiply_with, mxm};
pub use norm::norm1;
pub use transpose::{is_sorted, sort_indices, transpose};
