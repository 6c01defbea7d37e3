//! Label records.
//!
//! The writing program marks the start of a logical section with a record of
//! four 8-character fields:
//!
//! ```text
//! [8] "********"
//! [8] stamp (date)
//! [8] tag   (time, or a property symmetry tag)
//! [8] label
//! ```

use crate::dalton::types::models::RecordLabel;
use crate::dalton::utils;

/// Byte length of a label record payload.
pub const LABEL_RECORD_LEN: usize = 32;

const STARS: &[u8; 8] = b"********";

/// Parses a record payload as a label record.
///
/// Returns `None` for ordinary data records.
pub fn parse(bytes: &[u8]) -> Option<RecordLabel> {
    if bytes.len() != LABEL_RECORD_LEN || !bytes.starts_with(STARS) {
        return None;
    }
    Some(RecordLabel {
        stamp: utils::decode_text(&bytes[8..16]),
        tag: utils::decode_text(&bytes[16..24]),
        name: utils::decode_text(&bytes[24..32]),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_label_record() {
        let label = parse(b"********16Oct26 SYMMETRIXDIPLEN ").unwrap();
        assert_eq!(label.stamp, "16Oct26");
        assert_eq!(label.tag, "SYMMETRI");
        assert_eq!(label.name, "XDIPLEN");
    }

    #[test]
    fn data_records_have_no_label() {
        assert!(parse(&[0u8; 32]).is_none());
        assert!(parse(b"********").is_none());
        assert!(parse(b"********16Oct26 SYMMETRIXDIPLEN  ").is_none());
    }
}
