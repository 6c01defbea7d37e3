//! Canonical text form of matrices.
//!
//! Full blocks are printed in pages of five columns:
//!
//! ```text
//!
//!  (12, 12)
//!               Column   1    Column   2 ...
//!        1     -0.00052699   -0.99261439 ...
//! ```
//!
//! Triangular blocks are printed as a lower-triangle table, row `i` holding
//! `i + 1` values. Downstream tooling diffs this output, so every width here is
//! fixed.

use std::fmt::{self, Write};

use super::block::{BlockView, MatrixBlock};
use crate::dalton::types::models::Storage;

/// Columns per page of a full block.
pub const COLUMNS_PER_PAGE: usize = 5;

/// Writes the text of a full `rows x cols` block whose elements come from `get`.
pub fn write_full<W: Write>(
    out: &mut W,
    rows: usize,
    cols: usize,
    get: impl Fn(usize, usize) -> f64,
) -> fmt::Result {
    write!(out, "\n ({}, {}) \n", rows, cols)?;
    for (page, start) in (0..cols).step_by(COLUMNS_PER_PAGE).enumerate() {
        let end = (start + COLUMNS_PER_PAGE).min(cols);
        if page > 0 {
            out.write_str("\n\n")?;
        }
        out.write_str("          ")?;
        for j in start..end {
            write!(out, "    Column {:>3}", j + 1)?;
        }
        for i in 0..rows {
            // Rows that would print as all zeros are skipped.
            if (start..end).all(|j| rounds_to_zero(get(i, j))) {
                continue;
            }
            write!(out, "\n{:>8}  ", i + 1)?;
            for j in start..end {
                write!(out, "{:14.8}", get(i, j))?;
            }
        }
    }
    Ok(())
}

/// Writes the text of an `n x n` lower triangle whose elements come from `get`.
pub fn write_triangular<W: Write>(
    out: &mut W,
    n: usize,
    get: impl Fn(usize, usize) -> f64,
) -> fmt::Result {
    out.write_char('\n')?;
    for i in 0..n {
        if i > 0 {
            out.write_char('\n')?;
        }
        for j in 0..=i {
            write!(out, "{:14.8}", get(i, j))?;
        }
    }
    Ok(())
}

fn rounds_to_zero(value: f64) -> bool {
    format!("{:.8}", value.abs()) == "0.00000000"
}

impl fmt::Display for BlockView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.storage() {
            Storage::Full | Storage::Diagonal => {
                write_full(f, self.rows(), self.cols(), |i, j| self.get_unchecked(i, j))
            }
            Storage::Triangular => write_triangular(f, self.rows(), |i, j| self.get_unchecked(i, j)),
        }
    }
}

impl fmt::Display for MatrixBlock {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if !self.is_blocked() {
            return match self.blocks().next() {
                Some(block) => write!(f, "{}", block),
                None => write_full(f, 0, 0, |_, _| 0.0),
            };
        }
        let mut written = 0;
        for (i, block) in self.blocks().enumerate() {
            if block.values().is_empty() {
                continue;
            }
            if written > 0 {
                f.write_char('\n')?;
            }
            write!(f, "Block {}\n{}", i + 1, block)?;
            written += 1;
        }
        if written == 0 {
            write_full(f, 0, 0, |_, _| 0.0)?;
        }
        Ok(())
    }
}
