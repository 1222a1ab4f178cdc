/*
 * SPDX-FileCopyrightText: 2026 The linkrank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Loading graphs from line-oriented edge lists.
//!
//! Each line of the input declares the outgoing links of a node:
//!
//! ```text
//! <node_id>[:<target_id>[,<target_id>]*]
//! ```
//!
//! A line without a colon, or with nothing after the colon, declares a node
//! without outgoing links. Nodes appearing only as targets need not have a
//! line of their own. The number of nodes of the resulting graph is one plus
//! the largest identifier appearing anywhere in the input, so gaps in the
//! numbering become isolated (dangling) nodes.
//!
//! If the same node is declared twice, the later line replaces the earlier
//! one.

use super::AdjacencyList;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading an edge list.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The input could not be opened or read.
    #[error("Could not read {}", describe(.path))]
    Io {
        /// The path of the input, if it was loaded from a file.
        path: Option<PathBuf>,
        source: std::io::Error,
    },
    /// A line does not follow the `id[:id,id,...]` grammar.
    #[error("Malformed line {line_num} ({line:?}): {reason}")]
    MalformedLine {
        /// The line number, starting from 1.
        line_num: usize,
        /// The offending line.
        line: String,
        /// What went wrong.
        reason: String,
    },
}

fn describe(path: &Option<PathBuf>) -> String {
    match path {
        Some(path) => path.display().to_string(),
        None => "the input".to_owned(),
    }
}

/// The edge-list loader.
///
/// # Examples
///
/// ```
/// use linkrank::graphs::edge_list::EdgeList;
///
/// let g = EdgeList::parse("0:1,2\n1:\n5:0\n".as_bytes())?;
/// assert_eq!(g.num_nodes(), 6);
/// assert_eq!(g.successors(0), &[1, 2]);
/// assert!(g.is_dangling(3));
/// # Ok::<(), linkrank::graphs::edge_list::LoadError>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeList;

impl EdgeList {
    /// The largest node identifier accepted in the input.
    ///
    /// Nodes are stored densely, so an identifier implies as many nodes; the
    /// bound keeps the number of nodes within 32 bits.
    pub const MAX_NODE_ID: usize = u32::MAX as usize - 1;

    /// Loads a graph from the file at `path`.
    ///
    /// The file is read once, sequentially, and closed before returning,
    /// whatever the outcome.
    pub fn load(path: impl AsRef<Path>) -> Result<AdjacencyList, LoadError> {
        let path = path.as_ref();
        log::info!("Loading edge list from {}", path.display());
        let file = File::open(path).map_err(|source| LoadError::Io {
            path: Some(path.to_owned()),
            source,
        })?;
        let graph = Self::parse(BufReader::new(file)).map_err(|err| match err {
            LoadError::Io { path: None, source } => LoadError::Io {
                path: Some(path.to_owned()),
                source,
            },
            err => err,
        })?;
        log::info!(
            "Loaded {} nodes and {} arcs",
            graph.num_nodes(),
            graph.num_arcs()
        );
        Ok(graph)
    }

    /// Parses a graph from a reader.
    ///
    /// Parsing stops at the first malformed line, and no partial graph is
    /// returned.
    pub fn parse(reader: impl BufRead) -> Result<AdjacencyList, LoadError> {
        let mut graph = AdjacencyList::new();
        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|source| LoadError::Io { path: None, source })?;
            let (node, succ) = Self::parse_line(&line).map_err(|reason| {
                LoadError::MalformedLine {
                    line_num: line_num + 1,
                    line: line.clone(),
                    reason,
                }
            })?;
            graph.set_successors(node, succ);
        }
        Ok(graph)
    }

    /// Parses a single line into a node and its successors.
    fn parse_line(line: &str) -> Result<(usize, Vec<usize>), String> {
        let line = line.trim();
        let (node, tail) = match line.split_once(':') {
            Some((node, tail)) => (node, Some(tail.trim())),
            None => (line, None),
        };
        let node = parse_id(node, "node")?;
        let succ = match tail {
            None | Some("") => Vec::new(),
            Some(tail) => tail
                .split(',')
                .map(|target| parse_id(target, "target"))
                .collect::<Result<_, _>>()?,
        };
        Ok((node, succ))
    }
}

fn parse_id(token: &str, what: &str) -> Result<usize, String> {
    let token = token.trim();
    let id = token
        .parse::<usize>()
        .map_err(|err| format!("invalid {what} identifier {token:?}: {err}"))?;
    if id > EdgeList::MAX_NODE_ID {
        return Err(format!(
            "{what} identifier {id} exceeds the maximum {}",
            EdgeList::MAX_NODE_ID
        ));
    }
    Ok(id)
}
