// I/O Module
//
// Text triplet loading and diagnostic printing.

pub mod load;
pub mod print;

pub use load::{load, load_str, IndexBase, LoadOptions};
pub use print::{print_matrix, write_matrix, Verbosity};
