/*
 * SPDX-FileCopyrightText: 2026 The linkrank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Ranking algorithms.

pub mod pagerank;
pub use pagerank::{PageRank, Ranking, page_rank};

pub mod sweep;
pub use sweep::{Sweep, SweepRow};

use linkrank::graphs::edge_list::LoadError;
use thiserror::Error;

/// Errors raised by rank computations.
#[derive(Error, Debug)]
pub enum RankError {
    /// The graph could not be loaded.
    #[error(transparent)]
    Load(#[from] LoadError),
    /// The iteration cap was reached before the stopping threshold.
    ///
    /// The last approximation is available in `rank`.
    #[error("No convergence after {iterations} iteration(s): norm delta is {norm_delta}")]
    DidNotConverge {
        iterations: usize,
        norm_delta: f64,
        rank: Box<[f64]>,
    },
}
