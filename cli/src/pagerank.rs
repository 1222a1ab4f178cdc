/*
 * SPDX-FileCopyrightText: 2026 The linkrank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::{
    GlobalArgs, GranularityArgs, NumThreadsArg, StoppingArgs, build_info, check_damping,
    get_thread_pool, pretty_print_elapsed, write_ranks,
};
use anyhow::{Context, Result};
use clap::Parser;
use dsi_progress_logger::{ProgressLog, progress_logger};
use linkrank::prelude::*;
use linkrank_algo::prelude::*;
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "linkrank",
    about = "Computes PageRank by power iteration on an edge-list file.",
    long_about = None
)]
pub struct CliArgs {
    /// The edge-list file; each line has the form
    /// <node>[:<target>[,<target>]*].
    pub input: PathBuf,

    /// The damping factor (must be in the interval [0 . . 1]).
    pub damping: f64,

    #[clap(flatten)]
    pub stopping: StoppingArgs,

    #[arg(short, long, default_value_t = 10)]
    /// Decimal digits to which ranks are rounded.
    pub precision: usize,

    #[clap(flatten)]
    pub num_threads: NumThreadsArg,

    #[clap(flatten)]
    pub granularity: GranularityArgs,
}

#[derive(Parser, Debug)]
#[command(name = "linkrank", version=build_info::version_string())]
/// Computes PageRank by power iteration on an edge-list file and prints the
/// rank of each node, one per line, in node order.
#[doc = include_str!("common_env.txt")]
pub struct Cli {
    #[clap(flatten)]
    pub args: GlobalArgs,
    #[clap(flatten)]
    pub rank: CliArgs,
}

/// Computes PageRank and writes the ranks to `writer`.
///
/// Nothing is written unless the computation succeeds.
pub fn main(global_args: GlobalArgs, args: CliArgs, writer: impl Write) -> Result<()> {
    check_damping(args.damping)?;
    let threshold = L1Norm::try_from(args.stopping.tolerance)?;
    let max_iter = args.stopping.max_iter.map(MaxIter::from);

    let mut pl = progress_logger![];
    pl.display_memory(true);
    if let Some(log_interval) = global_args.log_interval {
        pl.log_interval(log_interval);
    }

    let thread_pool = get_thread_pool(args.num_threads.num_threads)?;

    let graph = EdgeList::load(&args.input)?;
    let matrix = TransitionMatrix::from_adjacency(&graph);
    log::info!(
        "{} nodes, {} arcs, {} dangling",
        matrix.num_nodes(),
        matrix.num_arcs(),
        matrix.dangling_nodes().len()
    );

    let mut pr = PageRank::new(&matrix);
    pr.damping(args.damping)
        .granularity(args.granularity.into_granularity());

    let iterations = thread_pool
        .install(|| pr.run_until_converged(threshold, max_iter, &mut pl))
        .with_context(|| format!("Could not compute PageRank on {}", args.input.display()))?;

    log::info!(
        "Completed after {} iteration(s), norm delta = {}",
        iterations,
        pr.norm_delta()
    );

    write_ranks(writer, pr.rank(), args.precision).context("Could not write the ranks")
}

pub fn cli_main<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let start = std::time::Instant::now();
    let cli = Cli::parse_from(args);
    main(cli.args, cli.rank, std::io::stdout().lock())?;

    log::info!(
        "The command took {}",
        pretty_print_elapsed(start.elapsed().as_secs_f64())
    );

    Ok(())
}
