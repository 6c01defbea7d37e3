//! File format layer: record framing and label records.
//!
//! This module bridges raw file I/O and the typed readers
//! ([`InterfaceFile`](crate::dalton::sirifc::InterfaceFile) and the
//! [`prop`](crate::dalton::prop) functions).
//!
//! ```text
//! File Structure:
//! ┌─────────────────┐
//! │  Label record   │ ← label::parse()
//! ├─────────────────┤
//! │  Data record    │ ← record::Records
//! ├─────────────────┤
//! │  Data record    │
//! │  ...            │
//! └─────────────────┘
//! ```

pub mod label;
pub mod record;
