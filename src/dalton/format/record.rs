//! Sequential unformatted record framing.
//!
//! Each record on disk is:
//!
//! ```text
//! [marker] payload length n (little-endian, 4 or 8 bytes)
//! [n bytes] payload
//! [marker] payload length n again
//! ```
//!
//! [`RecordReader`] only remembers the path and configuration. Every call to
//! [`RecordReader::records`] opens its own handle, so a reader can be scanned
//! any number of times and by any number of threads. The handle lives inside
//! the returned [`Records`] iterator and is dropped when the iterator is
//! exhausted, fails, or is dropped by the caller.

use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::{Path, PathBuf};
use log::{debug, trace};

use super::label;
use crate::dalton::types::error::{DaltonError, Result};
use crate::dalton::types::models::{ReaderConfig, RecordLabel};
use crate::dalton::utils;

/// One framed record: its position in the file and its raw payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Zero-based position of the record in the file.
    pub index: usize,
    /// Payload bytes, without the framing markers.
    pub bytes: Vec<u8>,
}

impl Record {
    /// Payload length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Decodes the record as a label record, if it is one.
    pub fn label(&self) -> Option<RecordLabel> {
        label::parse(&self.bytes)
    }
}

/// A restartable producer of the records of one file.
#[derive(Debug, Clone)]
pub struct RecordReader {
    path: PathBuf,
    config: ReaderConfig,
}

impl RecordReader {
    /// Creates a reader for `path` with the default framing (4-byte markers).
    ///
    /// The file is not opened until [`records`](Self::records) is called.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self::with_config(path, ReaderConfig::default())
    }

    pub fn with_config(path: impl AsRef<Path>, config: ReaderConfig) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            config,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> ReaderConfig {
        self.config
    }

    /// Opens the file and returns an iterator over its records in on-disk order.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened.
    pub fn records(&self) -> Result<Records> {
        debug!("Opening record stream: {}", self.path.display());
        let file = File::open(&self.path)?;
        Ok(Records::new(BufReader::new(file), self.config))
    }

    /// Returns the labels of all label records in file order.
    pub fn labels(&self) -> Result<Vec<RecordLabel>> {
        let mut labels = Vec::new();
        for record in self.records()? {
            if let Some(label) = record?.label() {
                labels.push(label);
            }
        }
        Ok(labels)
    }
}

/// Iterator over the records of an open file.
///
/// Yields `Result<Record>`. After the first error, or at end of file, the
/// underlying handle is released and the iterator returns `None` forever.
pub struct Records<R: Read = BufReader<File>> {
    source: Option<R>,
    config: ReaderConfig,
    index: usize,
}

impl<R: Read> Records<R> {
    /// Wraps any byte source; used directly by tests and in-memory callers.
    pub fn new(source: R, config: ReaderConfig) -> Self {
        Self {
            source: Some(source),
            config,
            index: 0,
        }
    }

    /// True while the source is still held.
    pub fn is_open(&self) -> bool {
        self.source.is_some()
    }

    fn read_record(source: &mut R, config: ReaderConfig, index: usize) -> Result<Option<Record>> {
        let width = config.marker_width;

        // A clean end of file is only allowed before a leading marker.
        let mut marker = vec![0u8; width.bytes()];
        let got = read_up_to(source, &mut marker)?;
        if got == 0 {
            return Ok(None);
        }
        if got < marker.len() {
            return Err(DaltonError::Decode(format!(
                "Record {}: truncated leading marker ({} of {} bytes)",
                index,
                got,
                marker.len()
            )));
        }
        let leading = utils::read_number(&mut marker.as_slice(), width)?;
        if leading < 0 {
            return Err(DaltonError::Decode(format!(
                "Record {}: negative length marker {} (continued records are not supported)",
                index, leading
            )));
        }

        // The marker is untrusted, so the buffer grows with what is actually read.
        let mut bytes = Vec::new();
        let got = source.by_ref().take(leading as u64).read_to_end(&mut bytes)?;
        if (got as u64) < leading as u64 {
            return Err(DaltonError::Decode(format!(
                "Record {}: declared {} bytes but only {} present",
                index, leading, got
            )));
        }

        let trailing = match utils::read_number(source, width) {
            Ok(value) => value,
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
                return Err(DaltonError::Decode(format!(
                    "Record {}: missing trailing marker",
                    index
                )));
            }
            Err(e) => return Err(e.into()),
        };
        if trailing != leading {
            return Err(DaltonError::Decode(format!(
                "Record {}: leading marker {} does not match trailing marker {}",
                index, leading, trailing
            )));
        }

        trace!("Record {}: {} bytes", index, leading);
        Ok(Some(Record { index, bytes }))
    }
}

impl<R: Read> Iterator for Records<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        let source = self.source.as_mut()?;
        match Self::read_record(source, self.config, self.index) {
            Ok(Some(record)) => {
                self.index += 1;
                Some(Ok(record))
            }
            Ok(None) => {
                trace!("End of records after {} records", self.index);
                self.source = None;
                None
            }
            Err(e) => {
                self.source = None;
                Some(Err(e))
            }
        }
    }
}

impl<R: Read> std::iter::FusedIterator for Records<R> {}

/// Fill `buf` as far as the source allows; returns the number of bytes read.
fn read_up_to<R: Read>(source: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match source.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(filled)
}
