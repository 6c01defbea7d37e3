//! # dalton-reader
//!
//! Reads the legacy binary files of the Dalton quantum chemistry program:
//! the `SIRIFC` wavefunction interface file and the `AOPROPER` property
//! integral file. Both are Fortran unformatted sequential files.
//!
//! ```no_run
//! use dalton_reader::{InterfaceFile, read_property};
//!
//! let ifc = InterfaceFile::open("SIRIFC")?;
//! println!("{}", ifc);
//! let x = read_property(ifc.nbast(), "XDIPLEN", "AOPROPER")?;
//! # Ok::<(), dalton_reader::DaltonError>(())
//! ```
pub mod dalton;

// Re-export the main types for convenience
pub use dalton::{
    BlockView,
    DaltonError,
    InterfaceFile,
    MatrixBlock,
    Property,
    PropertySymmetry,
    ReaderConfig,
    Record,
    RecordLabel,
    RecordReader,
    Records,
    Result,
    Storage,
    SymmetryPartition,
    Width,
    list_labels,
    list_labels_with,
    read_properties,
    read_properties_with,
    read_property,
    read_property_matrix,
    read_property_matrix_with,
    read_property_with,
};
