/*
 * SPDX-FileCopyrightText: 2026 The linkrank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/// Granularity of parallel tasks on a sparse matrix, specified transparently
/// by rows or by stored entries.
///
/// Row-parallel kernels, such as
/// [`TransitionMatrix::par_mul_vec`](crate::TransitionMatrix::par_mul_vec),
/// hand each Rayon task at least a given number of rows. On very irregular
/// matrices it is more natural to reason in terms of stored entries, as the
/// cost of a row is proportional to its length: this enum lets the caller
/// choose, and [`row_granularity`](Self::row_granularity) converts entries to
/// rows using the average number of entries per row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    /// Each task is formed by (at least) the specified number of rows.
    Rows(usize),
    /// Each task is formed by a number of rows containing, tentatively, the
    /// specified number of entries.
    Entries(u64),
}

impl core::default::Default for Granularity {
    /// Returns a default granularity of 1024 rows.
    fn default() -> Self {
        Self::Rows(1024)
    }
}

impl Granularity {
    /// Returns a row granularity for a matrix with the given number of rows
    /// and stored entries.
    ///
    /// The result is always at least one.
    pub fn row_granularity(&self, num_rows: usize, num_entries: u64) -> usize {
        match self {
            Self::Rows(n) => (*n).max(1),
            Self::Entries(n) => {
                let average = num_entries as f64 / num_rows.max(1) as f64;
                if average == 0.0 {
                    return num_rows.max(1);
                }
                (*n as f64 / average).min(usize::MAX as f64).ceil().max(1.0) as usize
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows() {
        assert_eq!(Granularity::Rows(10).row_granularity(100, 1000), 10);
        assert_eq!(Granularity::Rows(0).row_granularity(100, 1000), 1);
    }

    #[test]
    fn test_entries() {
        // 10 entries per row on average
        assert_eq!(Granularity::Entries(100).row_granularity(100, 1000), 10);
        assert_eq!(Granularity::Entries(1).row_granularity(100, 1000), 1);
        // No entries at all: one task
        assert_eq!(Granularity::Entries(100).row_granularity(50, 0), 50);
    }
}
