/*
 * SPDX-FileCopyrightText: 2026 The linkrank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Graph representations and loaders.
//!
//! An [`AdjacencyList`] maps each node index in `0..n` to the ordered list of
//! its successors. The [`edge_list`] module fills one from the line-oriented
//! text format used by this crate.

pub mod adjacency;
pub mod edge_list;

pub use adjacency::AdjacencyList;
