//! Symmetry-blocked matrices.
//!
//! A [`MatrixBlock`] owns one flat buffer holding every block back to back in
//! symmetry order, with no padding. Block `i` starts at `offsets[i]` and holds
//! `storage.element_count(rows, cols)` values. [`BlockView`] borrows one such
//! range.

use std::ops::Range;

use crate::dalton::types::error::{DaltonError, Result};
use crate::dalton::types::models::Storage;

/// A matrix partitioned into independent per-symmetry blocks.
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixBlock {
    storage: Storage,
    /// Whether the matrix is symmetry-blocked (rendered with `Block i` headers)
    /// or a single plain matrix.
    blocked: bool,
    /// `(rows, cols)` per block.
    dims: Vec<(usize, usize)>,
    /// Cumulative element offsets: `[0, n0, n0+n1, ..., data.len()]`.
    offsets: Vec<usize>,
    data: Vec<f64>,
}

impl MatrixBlock {
    /// Builds a blocked matrix of square blocks with the given sides.
    ///
    /// # Errors
    /// Fails with a size mismatch if `values.len()` differs from the sum of the
    /// storage kind's element count over all blocks.
    pub fn from_flat(values: Vec<f64>, sides: &[usize], storage: Storage) -> Result<Self> {
        let dims = sides.iter().map(|&n| (n, n)).collect();
        Self::build(values, dims, storage, true)
    }

    /// Builds a blocked full matrix of rectangular row-major blocks.
    pub fn from_flat_rect(values: Vec<f64>, rows: &[usize], cols: &[usize]) -> Result<Self> {
        Self::build(values, zip_dims(rows, cols)?, Storage::Full, true)
    }

    /// Builds a blocked full matrix from Fortran (column-major) block data.
    pub fn from_column_major(values: Vec<f64>, rows: &[usize], cols: &[usize]) -> Result<Self> {
        let dims = zip_dims(rows, cols)?;
        let expected = total_len(&dims, Storage::Full)?;
        check_len(values.len(), expected, Storage::Full)?;

        let mut data = Vec::with_capacity(values.len());
        let mut start = 0;
        for &(r, c) in &dims {
            let block = &values[start..start + r * c];
            for i in 0..r {
                for j in 0..c {
                    data.push(block[i + j * r]);
                }
            }
            start += r * c;
        }
        Self::build(data, dims, Storage::Full, true)
    }

    /// Builds an unblocked matrix (a single block, rendered without a block header).
    pub fn single(values: Vec<f64>, rows: usize, cols: usize, storage: Storage) -> Result<Self> {
        Self::build(values, vec![(rows, cols)], storage, false)
    }

    /// Builds an unblocked full matrix from column-major data.
    pub fn single_column_major(values: Vec<f64>, rows: usize, cols: usize) -> Result<Self> {
        let mut matrix = Self::from_column_major(values, &[rows], &[cols])?;
        matrix.blocked = false;
        Ok(matrix)
    }

    /// Builds a diagonal matrix.
    ///
    /// Without a partition the result is a single plain block of side
    /// `values.len()`; with one, the values are split across the blocks.
    pub fn diagonal(values: Vec<f64>, sides: Option<&[usize]>) -> Result<Self> {
        match sides {
            Some(sides) => Self::from_flat(values, sides, Storage::Diagonal),
            None => {
                let n = values.len();
                Self::single(values, n, n, Storage::Diagonal)
            }
        }
    }

    fn build(data: Vec<f64>, dims: Vec<(usize, usize)>, storage: Storage, blocked: bool) -> Result<Self> {
        if storage != Storage::Full {
            if let Some(&(r, c)) = dims.iter().find(|&&(r, c)| r != c) {
                return Err(DaltonError::InvalidOperation(format!(
                    "{} storage requires square blocks, got ({}, {})",
                    storage, r, c
                )));
            }
        }
        let total = total_len(&dims, storage)?;
        check_len(data.len(), total, storage)?;
        let mut offsets = Vec::with_capacity(dims.len() + 1);
        offsets.push(0);
        let mut cumsum = 0;
        for &(r, c) in &dims {
            cumsum += storage.element_count(r, c);
            offsets.push(cumsum);
        }
        Ok(Self {
            storage,
            blocked,
            dims,
            offsets,
            data,
        })
    }

    pub fn storage(&self) -> Storage {
        self.storage
    }

    pub fn is_blocked(&self) -> bool {
        self.blocked
    }

    pub fn num_blocks(&self) -> usize {
        self.dims.len()
    }

    /// `(rows, cols)` of every block.
    pub fn block_dims(&self) -> &[(usize, usize)] {
        &self.dims
    }

    /// The flat backing storage, all blocks concatenated.
    pub fn values(&self) -> &[f64] {
        &self.data
    }

    /// Overall `(rows, cols)`: sums of the block dimensions, `(0, 0)` without blocks.
    pub fn shape(&self) -> (usize, usize) {
        self.dims
            .iter()
            .fold((0, 0), |(r, c), &(br, bc)| (r + br, c + bc))
    }

    /// Borrows block `index`.
    ///
    /// # Errors
    /// `OutOfRange` if `index >= num_blocks()`.
    pub fn subblock(&self, index: usize) -> Result<BlockView<'_>> {
        let &(rows, cols) = self.dims.get(index).ok_or(DaltonError::OutOfRange {
            index,
            count: self.dims.len(),
        })?;
        Ok(BlockView {
            storage: self.storage,
            rows,
            cols,
            data: &self.data[self.block_range(index)],
        })
    }

    /// Iterates over all blocks in symmetry order.
    pub fn blocks(&self) -> impl Iterator<Item = BlockView<'_>> {
        (0..self.dims.len()).map(move |i| BlockView {
            storage: self.storage,
            rows: self.dims[i].0,
            cols: self.dims[i].1,
            data: &self.data[self.block_range(i)],
        })
    }

    /// Element `(row, col)` of block `block`, zero-based.
    pub fn get(&self, block: usize, row: usize, col: usize) -> Result<f64> {
        let view = self.subblock(block)?;
        view.get(row, col).ok_or_else(|| {
            DaltonError::InvalidOperation(format!(
                "Element ({}, {}) outside block {} of shape ({}, {})",
                row, col, block, view.rows, view.cols
            ))
        })
    }

    /// Diagonal entries of every (square) block, concatenated.
    pub fn diagonal_values(&self) -> Vec<f64> {
        self.blocks()
            .flat_map(|b| {
                let n = b.rows.min(b.cols);
                (0..n).filter_map(move |i| b.get(i, i))
            })
            .collect()
    }

    /// Returns the lower triangle of every block in triangular storage.
    ///
    /// # Errors
    /// `InvalidOperation` for triangular sources and for rectangular blocks.
    pub fn pack(&self) -> Result<Self> {
        if self.storage == Storage::Triangular {
            return Err(DaltonError::InvalidOperation(
                "Matrix is already in triangular storage".to_string(),
            ));
        }
        let mut data = Vec::with_capacity(
            self.dims.iter().map(|&(n, _)| Storage::Triangular.element_count(n, n)).sum(),
        );
        for block in self.blocks() {
            if block.rows != block.cols {
                return Err(DaltonError::InvalidOperation(format!(
                    "Cannot pack a rectangular ({}, {}) block",
                    block.rows, block.cols
                )));
            }
            for i in 0..block.rows {
                for j in 0..=i {
                    data.push(block.get_unchecked(i, j));
                }
            }
        }
        Self::build(data, self.dims.clone(), Storage::Triangular, self.blocked)
    }

    /// Expands triangular (symmetric) or diagonal storage to full storage.
    pub fn unpack(&self) -> Result<Self> {
        self.expand(1.0)
    }

    /// Expands triangular storage to a full antisymmetric matrix: `a[j][i] = -a[i][j]`.
    pub fn unpack_antisymmetric(&self) -> Result<Self> {
        if self.storage != Storage::Triangular {
            return Err(DaltonError::InvalidOperation(format!(
                "Antisymmetric unpacking needs triangular storage, found {}",
                self.storage
            )));
        }
        self.expand(-1.0)
    }

    fn expand(&self, upper_sign: f64) -> Result<Self> {
        if self.storage == Storage::Full {
            return Err(DaltonError::InvalidOperation(
                "Matrix is already in full storage".to_string(),
            ));
        }
        let mut data = Vec::with_capacity(self.dims.iter().map(|&(r, c)| r * c).sum());
        for block in self.blocks() {
            for i in 0..block.rows {
                for j in 0..block.cols {
                    let value = block.get_unchecked(i, j);
                    data.push(if j > i { upper_sign * value } else { value });
                }
            }
        }
        Self::build(data, self.dims.clone(), Storage::Full, self.blocked)
    }

    fn block_range(&self, index: usize) -> Range<usize> {
        self.offsets[index]..self.offsets[index + 1]
    }
}

/// A borrowed view of one block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockView<'a> {
    storage: Storage,
    rows: usize,
    cols: usize,
    data: &'a [f64],
}

impl<'a> BlockView<'a> {
    pub fn storage(&self) -> Storage {
        self.storage
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// The stored elements of this block, in the block's storage order.
    pub fn values(&self) -> &'a [f64] {
        self.data
    }

    /// Element `(row, col)`; triangular blocks read as symmetric, diagonal blocks are zero off the diagonal.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        Some(self.get_unchecked(row, col))
    }

    pub(crate) fn get_unchecked(&self, row: usize, col: usize) -> f64 {
        match self.storage {
            Storage::Full => self.data[row * self.cols + col],
            Storage::Triangular => {
                let (i, j) = if row >= col { (row, col) } else { (col, row) };
                self.data[i * (i + 1) / 2 + j]
            }
            Storage::Diagonal => {
                if row == col {
                    self.data[row]
                } else {
                    0.0
                }
            }
        }
    }

    /// Dense row-major copy of the block.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.rows)
            .map(|i| (0..self.cols).map(|j| self.get_unchecked(i, j)).collect())
            .collect()
    }
}

fn zip_dims(rows: &[usize], cols: &[usize]) -> Result<Vec<(usize, usize)>> {
    if rows.len() != cols.len() {
        return Err(DaltonError::InvalidOperation(format!(
            "Row partition has {} blocks but column partition has {}",
            rows.len(),
            cols.len()
        )));
    }
    Ok(rows.iter().copied().zip(cols.iter().copied()).collect())
}

/// Total element count over all blocks, failing if it does not fit in `usize`.
fn total_len(dims: &[(usize, usize)], storage: Storage) -> Result<usize> {
    dims.iter()
        .try_fold(0usize, |acc, &(r, c)| acc.checked_add(storage.checked_element_count(r, c)?))
        .ok_or_else(|| {
            DaltonError::InvalidOperation(format!("{} matrix element count overflows", storage))
        })
}

fn check_len(found: usize, expected: usize, storage: Storage) -> Result<()> {
    if found != expected {
        return Err(DaltonError::SizeMismatch {
            context: format!("{} matrix elements", storage),
            expected: (expected as u64).saturating_mul(8),
            found: (found as u64).saturating_mul(8),
        });
    }
    Ok(())
}
