/*
 * SPDX-FileCopyrightText: 2026 The linkrank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Sparse transition operators.
//!
//! The transition operator *M* of a graph with *n* nodes is the *n* × *n*
//! matrix with *M*\[*t*, *s*\] = *k* / *d*(*s*), where *d*(*s*) is the
//! outdegree of *s* and *k* the number of times the arc *s* → *t* appears in
//! the successor list of *s*. Every column of a non-dangling node sums to
//! one, whereas columns of dangling nodes are identically zero: no
//! compensating term is stored in the matrix, so rank flowing into a dangling
//! node is not redistributed by *M*.
//!
//! Rows are targets and columns are sources, so that the product *M* **x**
//! gathers, for each node, the rank flowing in from its predecessors.

use crate::graphs::AdjacencyList;
use crate::utils::CSRMatrix;
use itertools::Itertools;
use rayon::prelude::*;

/// A column-normalized transition matrix in compressed-sparse-row form.
///
/// Each row is a list of `(source, weight)` pairs sorted by source, with
/// repeated arcs already summed into a single entry.
///
/// The matrix is built once by
/// [`from_adjacency`](TransitionMatrix::from_adjacency) and never modified
/// afterwards. The order in which weights are accumulated is fixed, so
/// building twice from the same graph yields bit-identical matrices, and the
/// sequential and parallel products yield bit-identical vectors.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionMatrix {
    rows: CSRMatrix<(usize, f64)>,
    dangling: Vec<usize>,
    num_arcs: usize,
}

impl TransitionMatrix {
    /// Builds the transition matrix of a graph.
    ///
    /// # Panics
    ///
    /// Panics if a successor is not a node of the graph. This cannot happen
    /// with an [`AdjacencyList`], which creates nodes as arcs are added, and
    /// it is thus an internal consistency fault.
    pub fn from_adjacency(graph: &AdjacencyList) -> Self {
        let n = graph.num_nodes();
        let mut triples = Vec::with_capacity(graph.num_arcs());
        let mut dangling = Vec::new();

        for (s, succ) in graph.iter() {
            if succ.is_empty() {
                dangling.push(s);
                continue;
            }
            let w = 1.0 / succ.len() as f64;
            for &t in succ {
                assert!(
                    t < n,
                    "Index out of range: arc ({s}, {t}) in a graph with {n} nodes"
                );
                triples.push((t, s, w));
            }
        }

        // Stable, so repeated arcs are summed in successor-list order
        triples.sort_by_key(|&(t, s, _)| (t, s));

        let mut entries = triples
            .into_iter()
            .coalesce(|(t0, s0, w0), (t1, s1, w1)| {
                if (t0, s0) == (t1, s1) {
                    Ok((t0, s0, w0 + w1))
                } else {
                    Err(((t0, s0, w0), (t1, s1, w1)))
                }
            })
            .peekable();

        let mut rows = CSRMatrix::with_capacity(n, graph.num_arcs());
        for t in 0..n {
            rows.push(
                entries
                    .peeking_take_while(|&(row, _, _)| row == t)
                    .map(|(_, s, w)| (s, w)),
            );
        }
        debug_assert!(entries.next().is_none());

        log::debug!(
            "Built a {n}×{n} transition matrix with {} entries and {} dangling columns",
            rows.num_elements(),
            dangling.len()
        );

        Self {
            rows,
            dangling,
            num_arcs: graph.num_arcs(),
        }
    }

    /// Returns the number of nodes, that is, the number of rows (and columns).
    #[inline(always)]
    pub fn num_nodes(&self) -> usize {
        self.rows.num_rows()
    }

    /// Returns the number of stored entries.
    ///
    /// This is the number of distinct arcs, which is smaller than the
    /// [number of arcs](Self::num_arcs) when some arcs are repeated.
    #[inline(always)]
    pub fn num_entries(&self) -> usize {
        self.rows.num_elements()
    }

    /// Returns the number of arcs of the original graph, with multiplicity.
    #[inline(always)]
    pub fn num_arcs(&self) -> usize {
        self.num_arcs
    }

    /// Returns row `t`, that is, the `(source, weight)` pairs of the
    /// predecessors of `t`, sorted by source.
    #[inline(always)]
    pub fn row(&self, t: usize) -> &[(usize, f64)] {
        &self.rows[t]
    }

    /// Returns the entry *M*\[`t`, `s`\], which is zero if `s` has no arc
    /// towards `t`.
    pub fn get(&self, t: usize, s: usize) -> f64 {
        let row = self.row(t);
        match row.binary_search_by_key(&s, |&(source, _)| source) {
            Ok(pos) => row[pos].1,
            Err(_) => 0.0,
        }
    }

    /// Returns the dangling nodes (those with an all-zero column) in
    /// increasing order.
    pub fn dangling_nodes(&self) -> &[usize] {
        &self.dangling
    }

    /// Returns the sum of each column.
    ///
    /// Sums are one (up to rounding) for nodes with outgoing arcs and zero for
    /// dangling nodes.
    pub fn column_sums(&self) -> Vec<f64> {
        let mut sums = vec![0.0; self.num_nodes()];
        for &(s, w) in self.rows.values() {
            sums[s] += w;
        }
        sums
    }

    /// Computes *y* = *M* *x*.
    ///
    /// # Panics
    ///
    /// Panics if the lengths of `x` or `y` differ from the number of nodes.
    pub fn mul_vec(&self, x: &[f64], y: &mut [f64]) {
        self.check_dims(x, y);
        for (y_t, row) in y.iter_mut().zip(self.rows.rows()) {
            *y_t = dot(row, x);
        }
    }

    /// Computes *y* = *M* *x* in parallel, passing at least `min_rows` rows to
    /// each Rayon task.
    ///
    /// Each row is accumulated sequentially in the same order as
    /// [`mul_vec`](Self::mul_vec), so the result is bit-identical to the
    /// sequential one independently of the number of threads.
    ///
    /// # Panics
    ///
    /// Panics if the lengths of `x` or `y` differ from the number of nodes.
    pub fn par_mul_vec(&self, x: &[f64], y: &mut [f64], min_rows: usize) {
        self.check_dims(x, y);
        y.par_iter_mut()
            .enumerate()
            .with_min_len(min_rows.max(1))
            .for_each(|(t, y_t)| *y_t = dot(&self.rows[t], x));
    }

    fn check_dims(&self, x: &[f64], y: &[f64]) {
        let n = self.num_nodes();
        assert_eq!(x.len(), n, "Input vector length ({}) != {n}", x.len());
        assert_eq!(y.len(), n, "Output vector length ({}) != {n}", y.len());
    }
}

#[inline(always)]
fn dot(row: &[(usize, f64)], x: &[f64]) -> f64 {
    row.iter().fold(0.0, |acc, &(s, w)| acc + w * x[s])
}
