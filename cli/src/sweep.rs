/*
 * SPDX-FileCopyrightText: 2026 The linkrank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::{
    GlobalArgs, GranularityArgs, NumThreadsArg, StoppingArgs, build_info, check_damping,
    get_thread_pool, pretty_print_elapsed,
};
use anyhow::{Context, Result};
use clap::Parser;
use dsi_progress_logger::{ProgressLog, progress_logger};
use linkrank_algo::prelude::*;
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "linkrank-sweep",
    about = "Runs PageRank on an edge-list file for a sequence of damping factors.",
    long_about = None
)]
pub struct CliArgs {
    /// The edge-list file; each line has the form
    /// <node>[:<target>[,<target>]*].
    pub input: PathBuf,

    /// The damping factors, each in the interval [0 . . 1] (default: 0.75,
    /// 0.80, 0.85, 0.90 and 0.95).
    pub dampings: Vec<f64>,

    #[clap(flatten)]
    pub stopping: StoppingArgs,

    #[arg(long)]
    /// Print the results as a JSON array.
    pub json: bool,

    #[clap(flatten)]
    pub num_threads: NumThreadsArg,

    #[clap(flatten)]
    pub granularity: GranularityArgs,
}

#[derive(Parser, Debug)]
#[command(name = "linkrank-sweep", version=build_info::version_string())]
/// Runs PageRank on an edge-list file for a sequence of damping factors,
/// reporting for each the number of iterations and the largest rank.
#[doc = include_str!("common_env.txt")]
pub struct Cli {
    #[clap(flatten)]
    pub args: GlobalArgs,
    #[clap(flatten)]
    pub sweep: CliArgs,
}

/// Runs the sweep and writes a report to `writer`.
///
/// Nothing is written unless all runs succeed.
pub fn main(global_args: GlobalArgs, args: CliArgs, mut writer: impl Write) -> Result<()> {
    let dampings = if args.dampings.is_empty() {
        Sweep::default_dampings()
    } else {
        args.dampings
    };
    for &damping in &dampings {
        check_damping(damping)?;
    }

    let mut sweep = Sweep::new(L1Norm::try_from(args.stopping.tolerance)?);
    sweep
        .max_iter(args.stopping.max_iter.map(MaxIter::from))
        .granularity(args.granularity.into_granularity());

    let mut pl = progress_logger![];
    pl.display_memory(true);
    if let Some(log_interval) = global_args.log_interval {
        pl.log_interval(log_interval);
    }

    let thread_pool = get_thread_pool(args.num_threads.num_threads)?;
    let rows = thread_pool
        .install(|| sweep.run_file(&args.input, dampings, &mut pl))
        .with_context(|| format!("Sweep on {} failed", args.input.display()))?;

    if args.json {
        serde_json::to_writer(&mut writer, &rows)?;
        writeln!(writer)?;
    } else {
        for row in &rows {
            match row.max_rank {
                Some(max_rank) => writeln!(
                    writer,
                    "Damping factor: {}, iterations: {}, top rank: {}",
                    row.damping, row.iterations, max_rank
                )?,
                None => writeln!(
                    writer,
                    "Damping factor: {}, iterations: {}, top rank: none",
                    row.damping, row.iterations
                )?,
            }
        }
    }
    writer.flush()?;
    Ok(())
}

pub fn cli_main<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let start = std::time::Instant::now();
    let cli = Cli::parse_from(args);
    main(cli.args, cli.sweep, std::io::stdout().lock())?;

    log::info!(
        "The command took {}",
        pretty_print_elapsed(start.elapsed().as_secs_f64())
    );

    Ok(())
}
