//! Core data structures shared by the record, matrix and file layers.
//!
//! This module defines:
//! - Reader configuration (marker and integer widths)
//! - Label records and property symmetry tags
//! - Matrix storage kinds and the per-symmetry partition

use super::error::{DaltonError, Result};

/// Maximum number of irreducible representations the legacy format reserves room for.
pub const MAX_SYMMETRIES: usize = 8;

/// Byte width of an on-disk number.
///
/// - `Four`: 4-byte markers / `INTEGER*4` (default builds)
/// - `Eight`: 8-byte markers / `INTEGER*8` (64-bit integer builds, old compilers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Width {
    #[default]
    Four,
    Eight,
}

impl Width {
    /// Returns the number of bytes this width occupies.
    pub fn bytes(&self) -> usize {
        match self {
            Width::Four => 4,
            Width::Eight => 8,
        }
    }
}

impl TryFrom<usize> for Width {
    type Error = DaltonError;
    fn try_from(value: usize) -> Result<Self> {
        match value {
            4 => Ok(Self::Four),
            8 => Ok(Self::Eight),
            _ => Err(DaltonError::InvalidConfig(format!(
                "Unsupported width: {} (expected 4 or 8)",
                value
            ))),
        }
    }
}

/// How the sequential files were written.
///
/// Both interface and property readers decode with the same configuration
/// that was used by the writing program; there is no autodetection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReaderConfig {
    /// Width of the length markers that frame each record.
    pub marker_width: Width,
    /// Width of integers inside record payloads.
    pub integer_width: Width,
}

impl ReaderConfig {
    pub fn new(marker_width: Width, integer_width: Width) -> Self {
        Self {
            marker_width,
            integer_width,
        }
    }
}

/// A decoded 32-byte label record: `********`, stamp, tag, label.
///
/// All text fields are stored with trailing blanks removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordLabel {
    /// Date (or other stamp) written by the producing program.
    pub stamp: String,
    /// Time for section labels, symmetry tag (`SYMMETRI`, `ANTISYMM`, `SQUARE`) for properties.
    pub tag: String,
    /// The label proper, e.g. `SIR IPH` or `XDIPLEN`.
    pub name: String,
}

impl RecordLabel {
    /// Compares the label against `other` after trimming blanks and upper-casing ASCII.
    pub fn matches(&self, other: &str) -> bool {
        normalize_label(&self.name) == normalize_label(other)
    }
}

/// Canonical form used for label comparison.
pub fn normalize_label(label: &str) -> String {
    label.trim().to_ascii_uppercase()
}

/// Storage kind of every block in a [`MatrixBlock`](crate::dalton::matrix::MatrixBlock).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Storage {
    /// Dense, row-major, `rows * cols` elements.
    Full,
    /// Lower triangle including the diagonal, row-major, `n(n+1)/2` elements.
    Triangular,
    /// Diagonal entries only, `n` elements.
    Diagonal,
}

impl Storage {
    /// Number of stored elements for a block of the given shape.
    ///
    /// Panics on overflow; use [`Storage::checked_element_count`] for shapes read from a file.
    pub fn element_count(&self, rows: usize, cols: usize) -> usize {
        match self {
            Storage::Full => rows * cols,
            Storage::Triangular => rows * (rows + 1) / 2,
            Storage::Diagonal => rows,
        }
    }

    /// Like [`Storage::element_count`], `None` if the count does not fit in `usize`.
    pub fn checked_element_count(&self, rows: usize, cols: usize) -> Option<usize> {
        match self {
            Storage::Full => rows.checked_mul(cols),
            Storage::Triangular => rows.checked_add(1)?.checked_mul(rows).map(|n| n / 2),
            Storage::Diagonal => Some(rows),
        }
    }
}

impl std::fmt::Display for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Storage::Full => write!(f, "full"),
            Storage::Triangular => write!(f, "triangular"),
            Storage::Diagonal => write!(f, "diagonal"),
        }
    }
}

/// Symmetry tag carried by a property label record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertySymmetry {
    Symmetric,
    AntiSymmetric,
    Square,
    Other(String),
}

impl From<&str> for PropertySymmetry {
    fn from(tag: &str) -> Self {
        match tag.trim() {
            "SYMMETRI" => Self::Symmetric,
            "ANTISYMM" => Self::AntiSymmetric,
            "SQUARE" => Self::Square,
            other => Self::Other(other.to_string()),
        }
    }
}

/// Per-symmetry orbital and basis counts.
///
/// Holds one entry per irreducible representation in use (`nsym` entries).
/// Construction checks that each count list sums to its declared total and
/// that every derived element count fits in `usize`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymmetryPartition {
    nbas: Vec<usize>,
    norb: Vec<usize>,
    nbast: usize,
    norbt: usize,
    nnorbt: usize,
    n2orbt: usize,
    ncmot: usize,
}

impl SymmetryPartition {
    /// Builds a partition and validates it against the totals.
    pub fn new(nbas: Vec<usize>, norb: Vec<usize>, nbast: usize, norbt: usize) -> Result<Self> {
        if nbas.len() != norb.len() {
            return Err(DaltonError::Decode(format!(
                "Symmetry partition has {} basis counts but {} orbital counts",
                nbas.len(),
                norb.len()
            )));
        }
        if nbas.len() > MAX_SYMMETRIES {
            return Err(DaltonError::Decode(format!(
                "Symmetry count {} exceeds the maximum of {}",
                nbas.len(),
                MAX_SYMMETRIES
            )));
        }
        let sum_bas = checked_sum(nbas.iter().map(|&n| Some(n)), "NBAS")?;
        if sum_bas != nbast {
            return Err(DaltonError::Decode(format!(
                "Basis counts per symmetry sum to {}, but NBAST is {}",
                sum_bas, nbast
            )));
        }
        let sum_orb = checked_sum(norb.iter().map(|&n| Some(n)), "NORB")?;
        if sum_orb != norbt {
            return Err(DaltonError::Decode(format!(
                "Orbital counts per symmetry sum to {}, but NORBT is {}",
                sum_orb, norbt
            )));
        }
        let nnorbt = checked_sum(
            norb.iter().map(|&n| Storage::Triangular.checked_element_count(n, n)),
            "NNORBT",
        )?;
        let n2orbt = checked_sum(
            norb.iter().map(|&n| Storage::Full.checked_element_count(n, n)),
            "N2ORBT",
        )?;
        let ncmot = checked_sum(
            nbas.iter().zip(&norb).map(|(&b, &o)| Storage::Full.checked_element_count(b, o)),
            "NCMOT",
        )?;
        Ok(Self {
            nbas,
            norb,
            nbast,
            norbt,
            nnorbt,
            n2orbt,
            ncmot,
        })
    }

    /// Number of symmetries in use.
    pub fn nsym(&self) -> usize {
        self.nbas.len()
    }

    /// Basis functions per symmetry.
    pub fn nbas(&self) -> &[usize] {
        &self.nbas
    }

    /// Orbitals per symmetry.
    pub fn norb(&self) -> &[usize] {
        &self.norb
    }

    pub fn nbast(&self) -> usize {
        self.nbast
    }

    pub fn norbt(&self) -> usize {
        self.norbt
    }

    /// Elements of all `norb x norb` triangles (NNORBT).
    pub fn packed_orbital_count(&self) -> usize {
        self.nnorbt
    }

    /// Elements of all `norb x norb` squares (N2ORBT).
    pub fn square_orbital_count(&self) -> usize {
        self.n2orbt
    }

    /// Elements of all `nbas x norb` coefficient blocks (NCMOT).
    pub fn coefficient_count(&self) -> usize {
        self.ncmot
    }
}

/// Sums per-symmetry terms, failing if any term or the total overflows.
fn checked_sum(mut terms: impl Iterator<Item = Option<usize>>, name: &str) -> Result<usize> {
    terms
        .try_fold(0usize, |acc, term| acc.checked_add(term?))
        .ok_or_else(|| DaltonError::Decode(format!("{} overflows the addressable size", name)))
}
