/*
 * SPDX-FileCopyrightText: 2026 The linkrank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Parallel power-iteration PageRank.
//!
//! # The formula
//!
//! If we denote with *M* the [transition matrix](TransitionMatrix) of the
//! graph (column-normalized, rows are targets, with zero columns for dangling
//! nodes), with *d* the damping factor and with *n* the number of nodes, the
//! iteration is
//!
//! > **x**⁽⁰⁾ = **1** / *n*,
//! > **x**⁽*ᵗ* ⁺ ¹⁾ = *d* *M* **x**⁽*ᵗ*⁾ + (1 − *d*) / *n* · **1**.
//!
//! The teleportation term (1 − *d*) / *n* is the same for every node and does
//! not depend on whether a node is dangling. Since dangling columns are zero,
//! the rank reaching a dangling node is _not_ redistributed: the vector
//! obtained is, in general, not stochastic (its sum may be smaller than one).
//! In the literature this vector is sometimes called _pseudorank_.
//!
//! # Parallelism and determinism
//!
//! The product *M* **x** is computed in parallel across rows using
//! [`par_mul_vec`](TransitionMatrix::par_mul_vec). Each row is accumulated
//! sequentially in a fixed order, and the ℓ₁ norm of the difference between
//! successive approximations is summed sequentially, so the result is
//! bit-identical across runs and independent of the number of threads.
//!
//! # Stopping criteria
//!
//! The [`run`](PageRank::run) method accepts a composable [`Predicate`]
//! that is evaluated after each iteration. The predicate receives the current
//! iteration number and the _norm delta_, that is, the (unscaled) ℓ₁ norm
//! ‖**x**⁽*ᵗ*⁾ − **x**⁽*ᵗ* ⁻ ¹⁾‖₁. Note that the norm delta is a total over
//! all nodes, not a per-node average, so larger graphs need larger thresholds
//! to converge in the same number of iterations.
//!
//! Without an iteration cap the computation might not terminate, for example
//! with *d* = 1 on a graph containing a cycle of even length; the
//! [`run_until_converged`](PageRank::run_until_converged) method and the
//! [`page_rank`] function report hitting the cap as
//! [`RankError::DidNotConverge`].

pub mod preds {
    //! Predicates implementing stopping conditions.
    //!
    //! The implementation of [PageRank](super::PageRank) requires a
    //! [predicate](Predicate) to stop the algorithm. This module provides a few
    //! such predicates: they evaluate to true if the computation should be
    //! stopped.
    //!
    //! You can combine the predicates using the `and` and `or` methods provided
    //! by the [`Predicate`] trait.
    //!
    //! # Examples
    //! ```
    //! # fn main() -> Result<(), Box<dyn std::error::Error>> {
    //! use predicates::prelude::*;
    //! use linkrank_algo::rank::pagerank::preds::{L1Norm, MaxIter};
    //!
    //! let mut predicate = L1Norm::try_from(1E-6)?.boxed();
    //! predicate = predicate.or(MaxIter::from(100)).boxed();
    //! #     Ok(())
    //! # }
    //! ```

    use anyhow::ensure;
    use predicates::{Predicate, reflection::PredicateReflection};
    use std::fmt::Display;

    #[doc(hidden)]
    /// This structure is passed to stopping predicates to provide the
    /// information that is needed to evaluate them.
    #[derive(Debug)]
    pub struct PredParams {
        pub iteration: usize,
        pub norm_delta: f64,
    }

    /// Stops after at most the provided number of iterations.
    ///
    /// The count is of completed iterations, and predicates are evaluated
    /// after each iteration, so at least one iteration is always performed:
    /// a maximum of zero behaves like a maximum of one.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MaxIter {
        max_iter: usize,
    }

    impl MaxIter {
        pub const DEFAULT_MAX_ITER: usize = usize::MAX;

        /// Returns the maximum number of iterations.
        pub fn max_iter(&self) -> usize {
            self.max_iter
        }
    }

    impl From<usize> for MaxIter {
        fn from(max_iter: usize) -> Self {
            MaxIter { max_iter }
        }
    }

    impl Default for MaxIter {
        fn default() -> Self {
            Self::from(Self::DEFAULT_MAX_ITER)
        }
    }

    impl Display for MaxIter {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "(max iter: {})", self.max_iter)
        }
    }

    impl PredicateReflection for MaxIter {}

    impl Predicate<PredParams> for MaxIter {
        fn eval(&self, pred_params: &PredParams) -> bool {
            pred_params.iteration >= self.max_iter
        }
    }

    /// Stops when the ℓ₁ norm of the difference between successive
    /// approximations is at most a given threshold.
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct L1Norm {
        threshold: f64,
    }

    impl L1Norm {
        pub const DEFAULT_THRESHOLD: f64 = 1E-6;

        /// Returns the threshold.
        pub fn threshold(&self) -> f64 {
            self.threshold
        }
    }

    impl TryFrom<Option<f64>> for L1Norm {
        type Error = anyhow::Error;
        fn try_from(threshold: Option<f64>) -> anyhow::Result<Self> {
            Ok(match threshold {
                Some(threshold) => {
                    ensure!(!threshold.is_nan(), "The threshold cannot be NaN");
                    ensure!(threshold > 0.0, "The threshold must be positive");
                    L1Norm { threshold }
                }
                None => Self::default(),
            })
        }
    }

    impl TryFrom<f64> for L1Norm {
        type Error = anyhow::Error;
        fn try_from(threshold: f64) -> anyhow::Result<Self> {
            Some(threshold).try_into()
        }
    }

    impl Default for L1Norm {
        fn default() -> Self {
            L1Norm {
                threshold: Self::DEFAULT_THRESHOLD,
            }
        }
    }

    impl Display for L1Norm {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "(norm: {})", self.threshold)
        }
    }

    impl PredicateReflection for L1Norm {}
    impl Predicate<PredParams> for L1Norm {
        fn eval(&self, pred_params: &PredParams) -> bool {
            pred_params.norm_delta <= self.threshold
        }
    }
}

use super::RankError;
use dsi_progress_logger::{ProgressLog, no_logging};
use kahan::KahanSum;
use linkrank::TransitionMatrix;
use linkrank::utils::Granularity;
use predicates::prelude::*;
use preds::{L1Norm, MaxIter, PredParams};
use rayon::prelude::*;

/// Computes PageRank by power iteration.
///
/// The struct is configured via setters and then executed via
/// [`run`](Self::run). After completion the rank vector is available via the
/// [`rank`](Self::rank) method.
///
/// # Examples
///
/// ```
/// use linkrank::graphs::AdjacencyList;
/// use linkrank::TransitionMatrix;
/// use linkrank_algo::rank::pagerank::{PageRank, preds};
///
/// //   0 → 1, 0 → 2, 1 → 2, 2 → 0
/// let g = AdjacencyList::from_arcs([(0, 1), (0, 2), (1, 2), (2, 0)]);
/// let m = TransitionMatrix::from_adjacency(&g);
///
/// let mut pr = PageRank::new(&m);
/// pr.damping(0.85);
/// pr.run(preds::L1Norm::try_from(1E-9).unwrap());
///
/// assert_eq!(pr.rank().len(), 3);
/// // No dangling nodes: the vector is stochastic
/// assert!((pr.rank().iter().sum::<f64>() - 1.0).abs() < 1E-6);
/// ```
pub struct PageRank<'a> {
    matrix: &'a TransitionMatrix,
    damping: f64,
    granularity: Granularity,
    norm_delta: f64,

    rank: Box<[f64]>,
    iteration: usize,
}

impl std::fmt::Debug for PageRank<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageRank")
            .field("damping", &self.damping)
            .field("granularity", &self.granularity)
            .field("norm_delta", &self.norm_delta)
            .field("iteration", &self.iteration)
            .finish_non_exhaustive()
    }
}

impl<'a> PageRank<'a> {
    pub const DEFAULT_DAMPING: f64 = 0.85;

    /// Creates a new PageRank computation on the given transition matrix.
    pub fn new(matrix: &'a TransitionMatrix) -> Self {
        let n = matrix.num_nodes();
        Self {
            matrix,
            damping: Self::DEFAULT_DAMPING,
            granularity: Granularity::default(),
            norm_delta: f64::INFINITY,
            rank: vec![0.0; n].into_boxed_slice(),
            iteration: 0,
        }
    }

    /// Sets the damping factor.
    ///
    /// A damping factor of one disables teleportation, and the computation
    /// might not converge.
    ///
    /// # Panics
    ///
    /// Panics if `damping` is not in the interval [0 . . 1].
    pub fn damping(&mut self, damping: f64) -> &mut Self {
        assert!(
            (0.0..=1.0).contains(&damping),
            "The damping factor must be in [0 . . 1], got {damping}"
        );
        self.damping = damping;
        self
    }

    /// Sets the parallel task granularity.
    ///
    /// The granularity expresses how many
    /// [rows](Granularity::row_granularity) of the transition matrix will be
    /// passed to a Rayon task at a time.
    pub fn granularity(&mut self, granularity: Granularity) -> &mut Self {
        self.granularity = granularity;
        self
    }

    /// Returns the rank vector.
    ///
    /// After calling [`run`](Self::run), this contains the computed PageRank
    /// values.
    pub fn rank(&self) -> &[f64] {
        &self.rank
    }

    /// Consumes the computation, returning the rank vector.
    pub fn into_rank(self) -> Box<[f64]> {
        self.rank
    }

    /// Returns the number of iterations performed by the last call to
    /// [`run`](Self::run).
    pub fn iterations(&self) -> usize {
        self.iteration
    }

    /// Returns the ℓ₁ norm of the difference between the last two
    /// approximations.
    pub fn norm_delta(&self) -> f64 {
        self.norm_delta
    }

    /// Runs the PageRank computation until the given predicate is satisfied.
    ///
    /// This method does not log anything.
    pub fn run(&mut self, predicate: impl Predicate<PredParams>) {
        self.iterate(predicate, no_logging![]);
    }

    /// Runs the PageRank computation until the given predicate is satisfied,
    /// logging the configuration and the norm delta of each iteration.
    ///
    /// It is possible to specify `pl` as
    /// [`no_logging![]`](dsi_progress_logger::no_logging) if you only want the
    /// configuration to be logged.
    pub fn run_with_logging(
        &mut self,
        predicate: impl Predicate<PredParams>,
        pl: &mut impl ProgressLog,
    ) {
        log::info!("Damping factor: {}", self.damping);
        log::info!("Stopping criterion: {}", predicate);
        log::info!(
            "{} nodes, {} dangling",
            self.matrix.num_nodes(),
            self.matrix.dangling_nodes().len()
        );
        self.iterate(predicate, pl);
        log::info!(
            "Completed after {} iteration(s), norm delta = {}",
            self.iteration,
            self.norm_delta
        );
    }

    /// Runs the computation until the ℓ₁ norm delta is at most the given
    /// threshold, or until `max_iter` iterations have been performed.
    ///
    /// Like [`run`](Self::run), this method logs only through `pl`.
    ///
    /// Returns the number of iterations. If the cap is reached before the
    /// threshold, returns [`RankError::DidNotConverge`] carrying a copy of the
    /// last approximation; the approximation is also still available via
    /// [`rank`](Self::rank).
    pub fn run_until_converged(
        &mut self,
        threshold: L1Norm,
        max_iter: Option<MaxIter>,
        pl: &mut impl ProgressLog,
    ) -> Result<usize, RankError> {
        let mut predicate = threshold.boxed();
        if let Some(max_iter) = max_iter {
            predicate = predicate.or(max_iter).boxed();
        }
        self.iterate(predicate, pl);

        if self.norm_delta <= threshold.threshold() {
            Ok(self.iteration)
        } else {
            Err(RankError::DidNotConverge {
                iterations: self.iteration,
                norm_delta: self.norm_delta,
                rank: self.rank.clone(),
            })
        }
    }

    fn iterate(&mut self, predicate: impl Predicate<PredParams>, pl: &mut impl ProgressLog) {
        let n = self.matrix.num_nodes();
        self.iteration = 0;
        if n == 0 {
            self.norm_delta = 0.0;
            return;
        }

        self.rank.fill(1.0 / n as f64);
        let mut next = vec![0.0; n].into_boxed_slice();
        let damping = self.damping;
        let teleport = (1.0 - damping) / n as f64;
        let min_rows = self
            .granularity
            .row_granularity(n, self.matrix.num_entries() as u64);

        pl.item_name("iteration");
        pl.expected_updates(None);
        pl.start(format!(
            "Computing PageRank (damping={damping}, granularity={min_rows})..."
        ));

        loop {
            self.matrix.par_mul_vec(&self.rank, &mut next, min_rows);
            next.par_iter_mut()
                .with_min_len(min_rows)
                .for_each(|x| *x = damping * *x + teleport);

            let mut norm_delta: KahanSum<f64> = KahanSum::new();
            for (new, old) in next.iter().zip(self.rank.iter()) {
                norm_delta += (new - old).abs();
            }
            self.norm_delta = norm_delta.sum();

            std::mem::swap(&mut self.rank, &mut next);
            self.iteration += 1;

            pl.info(format_args!(
                "Iteration {}: norm delta = {}",
                self.iteration, self.norm_delta
            ));
            pl.update_and_display();

            if predicate.eval(&PredParams {
                iteration: self.iteration,
                norm_delta: self.norm_delta,
            }) {
                break;
            }
        }

        pl.done();
    }
}

/// The result of a converged PageRank computation.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranking {
    /// The rank of each node.
    pub rank: Box<[f64]>,
    /// The number of iterations performed, including the last one.
    pub iterations: usize,
}

/// Computes PageRank with the given damping factor, stopping when the ℓ₁
/// norm delta is at most `threshold`.
///
/// If `max_iter` is specified and the threshold is not met within `max_iter`
/// iterations, returns [`RankError::DidNotConverge`]. With an empty matrix
/// the result is an empty vector after zero iterations.
///
/// # Examples
///
/// ```
/// use linkrank::graphs::AdjacencyList;
/// use linkrank::TransitionMatrix;
/// use linkrank_algo::rank::{page_rank, pagerank::preds::L1Norm};
///
/// // A single node without links keeps only the teleportation mass
/// let m = TransitionMatrix::from_adjacency(&AdjacencyList::empty(1));
/// let ranking = page_rank(&m, 0.85, L1Norm::try_from(1E-6)?, None)?;
/// assert!((ranking.rank[0] - 0.15).abs() < 1E-12);
/// assert_eq!(ranking.iterations, 2);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
///
/// # Panics
///
/// Panics if `damping` is not in the interval [0 . . 1].
pub fn page_rank(
    matrix: &TransitionMatrix,
    damping: f64,
    threshold: L1Norm,
    max_iter: Option<MaxIter>,
) -> Result<Ranking, RankError> {
    let mut pr = PageRank::new(matrix);
    pr.damping(damping);
    let iterations = pr.run_until_converged(threshold, max_iter, no_logging![])?;
    Ok(Ranking {
        rank: pr.into_rank(),
        iterations,
    })
}
