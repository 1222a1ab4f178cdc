/*
 * SPDX-FileCopyrightText: 2026 The linkrank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/// An adjacency relation based on a vector of vectors.
///
/// Node indices are dense: a graph with `n` nodes has an entry, possibly
/// empty, for every index in `0..n`. Adding an arc towards (or from) a node
/// that does not exist yet grows the node set, so that every node that has
/// been mentioned, even only as a successor, has its own (possibly empty)
/// list.
///
/// Successor lists keep the insertion order and are _not_ deduplicated: an
/// arc added twice counts twice in the [outdegree](Self::outdegree) of its
/// source.
///
/// By setting the feature `serde`, this struct can be serialized using
/// [serde](https://crates.io/crates/serde).
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AdjacencyList {
    /// The number of arcs in the graph.
    num_arcs: usize,
    /// For each node, its list of successors.
    succ: Vec<Vec<usize>>,
}

impl AdjacencyList {
    /// Creates a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new graph with `n` isolated nodes.
    pub fn empty(n: usize) -> Self {
        Self {
            num_arcs: 0,
            succ: vec![Vec::new(); n],
        }
    }

    /// Creates a graph from a sequence of arcs.
    ///
    /// The number of nodes is one plus the largest node index appearing in
    /// the arcs.
    pub fn from_arcs(arcs: impl IntoIterator<Item = (usize, usize)>) -> Self {
        let mut g = Self::new();
        g.add_arcs(arcs);
        g
    }

    /// Adds an isolated node to the graph and returns true if it is a new node.
    ///
    /// All nodes with a smaller index that do not exist yet are added, too.
    ///
    /// # Panics
    ///
    /// Panics if `node` is `usize::MAX`, as the number of nodes would not be
    /// representable.
    pub fn add_node(&mut self, node: usize) -> bool {
        let len = self.succ.len();
        if node >= len {
            let n = node
                .checked_add(1)
                .unwrap_or_else(|| panic!("Node index {node} is too large"));
            self.succ.resize_with(n, Vec::new);
        }
        len <= node
    }

    /// Adds an arc to the graph, creating its endpoints if necessary.
    pub fn add_arc(&mut self, u: usize, v: usize) {
        self.add_node(u.max(v));
        self.succ[u].push(v);
        self.num_arcs += 1;
    }

    /// Adds arcs from an iterator.
    pub fn add_arcs(&mut self, arcs: impl IntoIterator<Item = (usize, usize)>) {
        for (u, v) in arcs {
            self.add_arc(u, v);
        }
    }

    /// Replaces the successors of `u` with the given list.
    ///
    /// Nodes that do not exist yet are created, including all successors.
    pub fn set_successors(&mut self, u: usize, succ: impl IntoIterator<Item = usize>) {
        let succ: Vec<usize> = succ.into_iter().collect();
        let max = succ.iter().copied().fold(u, usize::max);
        self.add_node(max);
        self.num_arcs -= self.succ[u].len();
        self.num_arcs += succ.len();
        self.succ[u] = succ;
    }

    /// Returns the number of nodes.
    #[inline(always)]
    pub fn num_nodes(&self) -> usize {
        self.succ.len()
    }

    /// Returns the number of arcs, counting repeated arcs with multiplicity.
    #[inline(always)]
    pub fn num_arcs(&self) -> usize {
        self.num_arcs
    }

    /// Returns the successors of `u` in insertion order.
    ///
    /// # Panics
    ///
    /// Panics if `u` is not a node of the graph.
    #[inline(always)]
    pub fn successors(&self, u: usize) -> &[usize] {
        &self.succ[u]
    }

    /// Returns the outdegree of `u`.
    #[inline(always)]
    pub fn outdegree(&self, u: usize) -> usize {
        self.succ[u].len()
    }

    /// Returns true if `u` has no outgoing arcs.
    #[inline(always)]
    pub fn is_dangling(&self, u: usize) -> bool {
        self.succ[u].is_empty()
    }

    /// Returns an iterator over pairs `(node, successors)`, in node order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (usize, &[usize])> + '_ {
        self.succ.iter().map(Vec::as_slice).enumerate()
    }

    /// Returns an iterator over the dangling nodes, in increasing order.
    pub fn dangling_nodes(&self) -> impl Iterator<Item = usize> + '_ {
        self.iter()
            .filter(|(_, succ)| succ.is_empty())
            .map(|(node, _)| node)
    }
}
