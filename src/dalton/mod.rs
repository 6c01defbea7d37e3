//! Readers for the binary files written by the Dalton program.
//!
//! Both file kinds share one container: Fortran unformatted sequential
//! records ([`format::record`]), some of which are 32-byte label records
//! ([`format::label`]).
//!
//! - [`sirifc`]: the wavefunction interface file (`SIRIFC`)
//! - [`prop`]: one-electron property integrals (`AOPROPER`)
//! - [`matrix`]: the symmetry-blocked matrix both readers return

pub mod format;
pub mod matrix;
pub mod prop;
pub mod sirifc;
pub mod types;
mod utils;

pub use format::record::{Record, RecordReader, Records};
pub use matrix::{BlockView, MatrixBlock};
pub use prop::{
    Property, list_labels, list_labels_with, read_properties, read_properties_with, read_property,
    read_property_matrix, read_property_matrix_with, read_property_with,
};
pub use sirifc::InterfaceFile;
pub use types::error::{DaltonError, Result};
pub use types::models::{
    MAX_SYMMETRIES, PropertySymmetry, ReaderConfig, RecordLabel, Storage, SymmetryPartition, Width,
};
