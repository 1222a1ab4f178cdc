/*
 * SPDX-FileCopyrightText: 2026 The linkrank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/// A Compressed Sparse Row (CSR) layout for ragged rows.
///
/// It's like a `Vec<Vec<T>>` stored in two flat vectors: rows can only be
/// appended, and existing rows cannot be modified.
#[derive(Debug, Clone, PartialEq)]
pub struct CSRMatrix<T> {
    /// The first offset is always zero, and offsets contains one more element
    /// than the number of rows.
    offsets: Vec<usize>,
    values: Vec<T>,
}

impl<T> Default for CSRMatrix<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> CSRMatrix<T> {
    /// Creates a new empty CSR matrix.
    pub fn new() -> Self {
        Self::with_capacity(0, 0)
    }

    /// Creates a new empty CSR matrix with room for the given number of rows
    /// and elements.
    pub fn with_capacity(rows: usize, elements: usize) -> Self {
        let mut offsets = Vec::with_capacity(rows + 1);
        offsets.push(0);
        Self {
            offsets,
            values: Vec::with_capacity(elements),
        }
    }

    /// Appends a new row.
    pub fn push(&mut self, values: impl IntoIterator<Item = T>) {
        self.values.extend(values);
        self.offsets.push(self.values.len());
    }

    /// Returns the number of rows.
    pub fn num_rows(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Returns the total number of elements.
    pub fn num_elements(&self) -> usize {
        self.values.len()
    }

    /// Returns an iterator over the rows, in order.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[T]> + '_ {
        self.offsets
            .windows(2)
            .map(move |w| &self.values[w[0]..w[1]])
    }

    /// Returns all elements, row after row.
    pub fn values(&self) -> &[T] {
        &self.values
    }
}

impl<T> core::ops::Index<usize> for CSRMatrix<T> {
    type Output = [T];

    fn index(&self, row: usize) -> &Self::Output {
        let start = self.offsets[row];
        let end = self.offsets[row + 1];
        &self.values[start..end]
    }
}
