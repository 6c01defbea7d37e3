//! Symmetry-blocked matrix model and its canonical text form.

pub mod block;
pub mod render;

pub use block::{BlockView, MatrixBlock};
