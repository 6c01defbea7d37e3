//! Low-level byte reading utilities

use std::io::Read;
use byteorder::{ByteOrder, LittleEndian, ReadBytesExt};
use encoding_rs::WINDOWS_1252;
use super::types::error::{DaltonError, Result};
use super::types::models::Width;

/// Read a 4 or 8 byte little-endian signed number from a stream.
///
/// Used for record length markers, whose width depends on the writing compiler.
pub fn read_number(reader: &mut impl Read, width: Width) -> std::io::Result<i64> {
    match width {
        Width::Eight => reader.read_i64::<LittleEndian>(),
        Width::Four => Ok(reader.read_i32::<LittleEndian>()? as i64),
    }
}

/// Read a 4 or 8 byte little-endian integer from a payload slice and advance it.
pub fn read_int(reader: &mut &[u8], width: Width, context: &str) -> Result<i64> {
    let n = width.bytes();
    if reader.len() < n {
        return Err(DaltonError::Decode(format!(
            "Record too short while reading {}: need {} bytes, {} left",
            context,
            n,
            reader.len()
        )));
    }
    let value = match width {
        Width::Eight => LittleEndian::read_i64(&reader[..n]),
        Width::Four => LittleEndian::read_i32(&reader[..n]) as i64,
    };
    *reader = &reader[n..];
    Ok(value)
}

/// Read one little-endian double from a payload slice and advance it.
pub fn read_f64(reader: &mut &[u8], context: &str) -> Result<f64> {
    if reader.len() < 8 {
        return Err(DaltonError::Decode(format!(
            "Record too short while reading {}: need 8 bytes, {} left",
            context,
            reader.len()
        )));
    }
    let value = LittleEndian::read_f64(&reader[..8]);
    *reader = &reader[8..];
    Ok(value)
}

/// Decode a payload that must hold exactly `count` doubles.
pub fn decode_f64_array(bytes: &[u8], count: usize, context: &str) -> Result<Vec<f64>> {
    let expected = (count as u64).checked_mul(8).ok_or_else(|| {
        DaltonError::Decode(format!("{}: {} doubles overflow the record size", context, count))
    })?;
    if bytes.len() as u64 != expected {
        return Err(DaltonError::SizeMismatch {
            context: context.to_string(),
            expected,
            found: bytes.len() as u64,
        });
    }
    let mut values = vec![0.0; count];
    LittleEndian::read_f64_into(bytes, &mut values);
    Ok(values)
}

/// Decode fixed-width legacy text (single-byte, blank padded) and trim the padding.
pub fn decode_text(bytes: &[u8]) -> String {
    let (text, _, _) = WINDOWS_1252.decode(bytes);
    text.trim_end_matches([' ', '\0']).to_string()
}
