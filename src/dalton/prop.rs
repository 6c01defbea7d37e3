//! AOPROPER property file reader.
//!
//! Every property occupies two records: a label record whose tag gives the
//! matrix symmetry, then the data record.
//!
//! ```text
//! ┌──────────────────────────────────┐
//! │ ********|stamp|SYMMETRI|XDIPLEN  │ label record
//! ├──────────────────────────────────┤
//! │ n(n+1)/2 doubles                 │ packed lower triangle
//! ├──────────────────────────────────┤
//! │ ********|stamp|SYMMETRI|YDIPLEN  │
//! │ ...                              │
//! └──────────────────────────────────┘
//! ```
//!
//! Nothing is cached: every call opens the file and scans it from the start.

use std::path::Path;
use log::{debug, info, warn};

use crate::dalton::format::record::{RecordReader, Records};
use crate::dalton::matrix::MatrixBlock;
use crate::dalton::types::error::{DaltonError, Result};
use crate::dalton::types::models::{PropertySymmetry, ReaderConfig, RecordLabel, Storage, normalize_label};
use crate::dalton::utils;

/// A property matrix together with the label record that introduced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub label: RecordLabel,
    pub symmetry: PropertySymmetry,
    /// Unblocked `nbast x nbast` matrix: triangular for (anti)symmetric tags, full for `SQUARE`.
    pub matrix: MatrixBlock,
}

impl Property {
    /// Expands the matrix to full storage, honoring the antisymmetric tag.
    pub fn to_full(&self) -> Result<MatrixBlock> {
        match (&self.symmetry, self.matrix.storage()) {
            (_, Storage::Full) => Ok(self.matrix.clone()),
            (PropertySymmetry::AntiSymmetric, _) => self.matrix.unpack_antisymmetric(),
            _ => self.matrix.unpack(),
        }
    }
}

/// Number of elements in a packed `n x n` lower triangle.
pub fn packed_len(nbast: usize) -> Result<usize> {
    matrix_len(Storage::Triangular, nbast)
}

fn matrix_len(storage: Storage, nbast: usize) -> Result<usize> {
    storage.checked_element_count(nbast, nbast).ok_or_else(|| {
        DaltonError::InvalidOperation(format!("{} property of side {} is too large", storage, nbast))
    })
}

/// Reads one property as a packed lower-triangular array of length `nbast(nbast+1)/2`.
///
/// The label is compared after trimming blanks and upper-casing.
///
/// # Errors
/// - `NotFound` if no label record matches
/// - `SizeMismatch` if the data record does not hold exactly the packed length
/// - `MissingRecord` if the matching label is the last record
pub fn read_property(nbast: usize, label: &str, path: impl AsRef<Path>) -> Result<Vec<f64>> {
    read_property_with(nbast, label, path, ReaderConfig::default())
}

pub fn read_property_with(
    nbast: usize,
    label: &str,
    path: impl AsRef<Path>,
    config: ReaderConfig,
) -> Result<Vec<f64>> {
    let path = path.as_ref();
    info!("Reading property '{}' from {}", label.trim(), path.display());
    let mut records = RecordReader::with_config(path, config).records()?;
    let (_, bytes) = find_property(&mut records, label)?;
    utils::decode_f64_array(&bytes, packed_len(nbast)?, &format!("property {}", label.trim()))
}

/// Reads several properties in one scan; results follow the order of `labels`.
pub fn read_properties(nbast: usize, labels: &[&str], path: impl AsRef<Path>) -> Result<Vec<Vec<f64>>> {
    read_properties_with(nbast, labels, path, ReaderConfig::default())
}

pub fn read_properties_with(
    nbast: usize,
    labels: &[&str],
    path: impl AsRef<Path>,
    config: ReaderConfig,
) -> Result<Vec<Vec<f64>>> {
    let path = path.as_ref();
    info!("Reading {} properties from {}", labels.len(), path.display());
    let expected = packed_len(nbast)?;
    let wanted: Vec<String> = labels.iter().map(|l| normalize_label(l)).collect();
    let mut found: Vec<Option<Vec<f64>>> = vec![None; labels.len()];

    let mut records = RecordReader::with_config(path, config).records()?;
    while let Some(record) = records.next() {
        let Some(label) = record?.label() else {
            continue;
        };
        let key = normalize_label(&label.name);
        let Some(slot) = wanted.iter().position(|w| *w == key) else {
            continue;
        };
        let data = next_data_record(&mut records, &label)?;
        if found[slot].is_some() {
            warn!("Label {} appears more than once, keeping the first", label.name);
            continue;
        }
        debug!("Property {} found ({} bytes)", label.name, data.len());
        found[slot] = Some(utils::decode_f64_array(&data, expected, &format!("property {}", label.name))?);
        if found.iter().all(Option::is_some) {
            break;
        }
    }

    found
        .into_iter()
        .zip(labels)
        .map(|(values, label)| values.ok_or_else(|| DaltonError::NotFound(label.trim().to_string())))
        .collect()
}

/// Reads one property as a matrix, keeping its symmetry tag.
pub fn read_property_matrix(nbast: usize, label: &str, path: impl AsRef<Path>) -> Result<Property> {
    read_property_matrix_with(nbast, label, path, ReaderConfig::default())
}

pub fn read_property_matrix_with(
    nbast: usize,
    label: &str,
    path: impl AsRef<Path>,
    config: ReaderConfig,
) -> Result<Property> {
    let path = path.as_ref();
    info!("Reading property matrix '{}' from {}", label.trim(), path.display());
    let mut records = RecordReader::with_config(path, config).records()?;
    let (record_label, bytes) = find_property(&mut records, label)?;
    let symmetry = PropertySymmetry::from(record_label.tag.as_str());
    let context = format!("property {}", record_label.name);
    let matrix = match symmetry {
        PropertySymmetry::Square => {
            let values = utils::decode_f64_array(&bytes, matrix_len(Storage::Full, nbast)?, &context)?;
            MatrixBlock::single_column_major(values, nbast, nbast)?
        }
        _ => {
            let values = utils::decode_f64_array(&bytes, packed_len(nbast)?, &context)?;
            MatrixBlock::single(values, nbast, nbast, Storage::Triangular)?
        }
    };
    Ok(Property {
        label: record_label,
        symmetry,
        matrix,
    })
}

/// All labels in the file, in order.
pub fn list_labels(path: impl AsRef<Path>) -> Result<Vec<RecordLabel>> {
    list_labels_with(path, ReaderConfig::default())
}

pub fn list_labels_with(path: impl AsRef<Path>, config: ReaderConfig) -> Result<Vec<RecordLabel>> {
    RecordReader::with_config(path, config).labels()
}

/// Scans to the first label matching `wanted` and returns it with the following data record.
fn find_property(records: &mut Records, wanted: &str) -> Result<(RecordLabel, Vec<u8>)> {
    while let Some(record) = records.next() {
        if let Some(label) = record?.label()
            && label.matches(wanted)
        {
            let data = next_data_record(records, &label)?;
            debug!("Property {} found ({} bytes)", label.name, data.len());
            return Ok((label, data));
        }
    }
    Err(DaltonError::NotFound(wanted.trim().to_string()))
}

fn next_data_record(records: &mut Records, label: &RecordLabel) -> Result<Vec<u8>> {
    let record = records
        .next()
        .ok_or_else(|| DaltonError::MissingRecord(format!("data record after label {}", label.name)))??;
    Ok(record.bytes)
}
