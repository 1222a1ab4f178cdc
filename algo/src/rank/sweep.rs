/*
 * SPDX-FileCopyrightText: 2026 The linkrank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Damping-factor sweeps.
//!
//! A [`Sweep`] loads a graph and builds its transition matrix once, and then
//! runs PageRank for each damping factor of a sequence, recording how many
//! iterations were necessary and the largest rank obtained. It is a simple
//! way to characterize how sensitive convergence is to the damping factor.

use super::pagerank::preds::{L1Norm, MaxIter};
use super::{PageRank, RankError};
use dsi_progress_logger::ProgressLog;
use linkrank::TransitionMatrix;
use linkrank::graphs::edge_list::EdgeList;
use linkrank::utils::Granularity;
use std::path::Path;

/// The outcome of a single run of a [`Sweep`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepRow {
    /// The damping factor.
    pub damping: f64,
    /// The number of iterations needed to converge.
    pub iterations: usize,
    /// The largest rank, or `None` if the graph is empty.
    pub max_rank: Option<f64>,
}

/// Runs PageRank for a sequence of damping factors.
///
/// Runs are performed in order, and the sweep stops at the first failing run.
/// The progress of each run is logged through the same progress logger.
///
/// # Examples
///
/// ```
/// use dsi_progress_logger::no_logging;
/// use linkrank::graphs::AdjacencyList;
/// use linkrank::TransitionMatrix;
/// use linkrank_algo::rank::Sweep;
///
/// let g = AdjacencyList::from_arcs([(0, 1), (1, 2), (2, 0), (2, 1)]);
/// let m = TransitionMatrix::from_adjacency(&g);
/// let rows = Sweep::default().run(&m, Sweep::default_dampings(), no_logging![])?;
/// assert_eq!(rows.len(), 5);
/// assert!(rows.windows(2).all(|w| w[0].damping < w[1].damping));
/// # Ok::<(), linkrank_algo::rank::RankError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Sweep {
    threshold: L1Norm,
    max_iter: Option<MaxIter>,
    granularity: Granularity,
}

impl Sweep {
    /// Returns the damping factors 0.75, 0.80, 0.85, 0.90 and 0.95.
    pub fn default_dampings() -> Vec<f64> {
        (0..5).map(|i| 0.75 + 0.05 * i as f64).collect()
    }

    /// Creates a new sweep stopping each run at the given threshold.
    pub fn new(threshold: L1Norm) -> Self {
        Self {
            threshold,
            ..Self::default()
        }
    }

    /// Sets the maximum number of iterations of each run.
    pub fn max_iter(&mut self, max_iter: Option<MaxIter>) -> &mut Self {
        self.max_iter = max_iter;
        self
    }

    /// Sets the parallel task granularity of each run.
    pub fn granularity(&mut self, granularity: Granularity) -> &mut Self {
        self.granularity = granularity;
        self
    }

    /// Runs PageRank on `matrix` for each damping factor, in order, logging
    /// the iterations of each run on `pl`.
    ///
    /// It is possible to specify `pl` as
    /// [`no_logging![]`](dsi_progress_logger::no_logging) to run silently.
    ///
    /// # Panics
    ///
    /// Panics if a damping factor is not in the interval [0 . . 1].
    pub fn run(
        &self,
        matrix: &TransitionMatrix,
        dampings: impl IntoIterator<Item = f64>,
        pl: &mut impl ProgressLog,
    ) -> Result<Vec<SweepRow>, RankError> {
        dampings
            .into_iter()
            .map(|damping| -> Result<SweepRow, RankError> {
                let mut pr = PageRank::new(matrix);
                pr.damping(damping).granularity(self.granularity);
                let iterations =
                    pr.run_until_converged(self.threshold, self.max_iter, pl)?;
                let max_rank = pr.rank().iter().copied().reduce(f64::max);
                log::info!("Damping factor {damping}: {iterations} iteration(s)");
                Ok(SweepRow {
                    damping,
                    iterations,
                    max_rank,
                })
            })
            .collect()
    }

    /// Loads the edge list at `path`, builds its transition matrix and runs
    /// PageRank for each damping factor, in order, logging on `pl`.
    pub fn run_file(
        &self,
        path: impl AsRef<Path>,
        dampings: impl IntoIterator<Item = f64>,
        pl: &mut impl ProgressLog,
    ) -> Result<Vec<SweepRow>, RankError> {
        let graph = EdgeList::load(path)?;
        let matrix = TransitionMatrix::from_adjacency(&graph);
        self.run(&matrix, dampings, pl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dsi_progress_logger::no_logging;
    use linkrank::graphs::AdjacencyList;

    #[test]
    fn test_default_dampings() {
        let dampings = Sweep::default_dampings();
        assert_eq!(dampings.len(), 5);
        for (d, expected) in dampings.iter().zip([0.75, 0.8, 0.85, 0.9, 0.95]) {
            assert!((d - expected).abs() < 1E-12);
        }
    }

    #[test]
    fn test_empty_graph() {
        let m = TransitionMatrix::from_adjacency(&AdjacencyList::new());
        let rows = Sweep::default().run(&m, [0.5, 0.85], no_logging![]).unwrap();
        assert_eq!(
            rows,
            vec![
                SweepRow {
                    damping: 0.5,
                    iterations: 0,
                    max_rank: None
                },
                SweepRow {
                    damping: 0.85,
                    iterations: 0,
                    max_rank: None
                },
            ]
        );
    }

    #[test]
    fn test_stops_at_first_failure() {
        let m = TransitionMatrix::from_adjacency(&AdjacencyList::from_arcs([
            (0, 1),
            (1, 0),
            (2, 0),
        ]));
        let mut sweep = Sweep::new(L1Norm::try_from(1E-9).unwrap());
        sweep.max_iter(Some(MaxIter::from(1000)));
        // 0.5 converges, 1.0 oscillates forever
        let err = sweep.run(&m, [0.5, 1.0, 0.5], no_logging![]).unwrap_err();
        assert!(matches!(
            err,
            RankError::DidNotConverge {
                iterations: 1000,
                ..
            }
        ));
    }
}
