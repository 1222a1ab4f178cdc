/*
 * SPDX-FileCopyrightText: 2026 The linkrank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

#![doc = include_str!("../README.md")]
#![deny(unstable_features)]
#![deny(trivial_casts)]
#![deny(unconditional_recursion)]
#![deny(clippy::empty_loop)]
#![deny(unreachable_code)]
#![deny(unreachable_pub)]
#![deny(unreachable_patterns)]
#![deny(unused_macro_rules)]
#![deny(unused_doc_comments)]

use anyhow::{Context, Result, anyhow, bail, ensure};
use clap::Args;
use linkrank::utils::Granularity;
use std::io::Write;
use std::time::{Duration, SystemTime};

pub mod pagerank;
pub mod sweep;

pub mod build_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));

    pub fn version_string() -> String {
        format!(
            "{}
git info: {} {} {}
build info: built on {} for {} with {}",
            PKG_VERSION,
            GIT_VERSION.unwrap_or(""),
            GIT_COMMIT_HASH.unwrap_or(""),
            match GIT_DIRTY {
                None => "",
                Some(true) => "(dirty)",
                Some(false) => "(clean)",
            },
            BUILD_DATE,
            TARGET,
            RUSTC_VERSION
        )
    }
}

/// Parses the number of threads from a string.
///
/// This function is meant to be used with `#[arg(...,  value_parser =
/// num_threads_parser)]`.
pub fn num_threads_parser(arg: &str) -> Result<usize> {
    let num_threads = arg.parse::<usize>()?;
    ensure!(num_threads > 0, "Number of threads must be greater than 0");
    Ok(num_threads)
}

/// Shared CLI arguments for commands that specify a number of threads.
#[derive(Args, Debug)]
pub struct NumThreadsArg {
    #[arg(short = 'j', long = "threads", default_value_t = rayon::current_num_threads().max(1), value_parser = num_threads_parser)]
    /// The number of threads to use.
    pub num_threads: usize,
}

/// Shared CLI arguments for commands that specify a granularity.
#[derive(Args, Debug)]
pub struct GranularityArgs {
    #[arg(long, conflicts_with("row_granularity"))]
    /// The tentative number of matrix entries used to define the size of a
    /// parallel job (advanced option).
    pub entry_granularity: Option<u64>,

    #[arg(long, conflicts_with("entry_granularity"))]
    /// The tentative number of matrix rows used to define the size of a
    /// parallel job (advanced option).
    pub row_granularity: Option<usize>,
}

impl GranularityArgs {
    pub fn into_granularity(&self) -> Granularity {
        match (self.entry_granularity, self.row_granularity) {
            (Some(_), Some(_)) => unreachable!(),
            (Some(entry_granularity), None) => Granularity::Entries(entry_granularity),
            (None, Some(row_granularity)) => Granularity::Rows(row_granularity),
            (None, None) => Granularity::default(),
        }
    }
}

/// Shared CLI arguments for commands that accept a stopping criterion.
#[derive(Args, Debug)]
pub struct StoppingArgs {
    #[arg(short, long, default_value_t = 1E-6)]
    /// The ℓ₁ norm delta between successive approximations at which to stop.
    pub tolerance: f64,

    #[arg(long, value_parser = max_iter_parser)]
    /// The maximum number of iterations (at least one); reaching it before
    /// the tolerance is an error.
    pub max_iter: Option<usize>,
}

/// Parses a maximum number of iterations from a string.
pub fn max_iter_parser(arg: &str) -> Result<usize> {
    let max_iter = arg.parse::<usize>()?;
    ensure!(max_iter > 0, "The maximum number of iterations must be greater than 0");
    Ok(max_iter)
}

/// Checks that a damping factor is in the interval [0 . . 1].
pub fn check_damping(damping: f64) -> Result<()> {
    ensure!(
        (0.0..=1.0).contains(&damping),
        "The damping factor must be in [0 . . 1], got {}",
        damping
    );
    Ok(())
}

/// Creates a [`ThreadPool`](rayon::ThreadPool) with the given number of threads.
pub fn get_thread_pool(num_threads: usize) -> Result<rayon::ThreadPool> {
    let thread_pool = rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build()
        .context("Failed to create thread pool")?;
    log::info!("Using {} threads", thread_pool.current_num_threads());
    Ok(thread_pool)
}

/// Rounds `value` to the given number of decimal digits.
///
/// Values whose scaled form is not finite are returned unchanged.
pub fn round_to_digits(value: f64, digits: usize) -> f64 {
    let scale = 10_f64.powi(digits.min(i32::MAX as usize) as i32);
    let scaled = value * scale;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / scale
}

/// Writes ranks to `writer`, one per line, rounded to `digits` decimal
/// digits and formatted in the shortest form that parses back to the
/// rounded value.
pub fn write_ranks(mut writer: impl Write, ranks: &[f64], digits: usize) -> Result<()> {
    let mut buf = zmij::Buffer::new();
    for &rank in ranks {
        writeln!(writer, "{}", buf.format(round_to_digits(rank, digits)))?;
    }
    writer.flush()?;
    Ok(())
}

/// Parses a duration from a string.
///
/// If no suffix is given, the value is assumed to be in milliseconds.
/// You can use suffixes, the available ones are:
/// - `s` for seconds
/// - `m` for minutes
/// - `h` for hours
/// - `d` for days
///
/// Example: `1d2h3m4s567` is parsed as 1 day, 2 hours, 3 minutes, 4 seconds,
/// and 567 milliseconds.
fn parse_duration(value: &str) -> Result<Duration> {
    if value.is_empty() {
        bail!("Empty duration string, if you want every 0 milliseconds use `0`.");
    }
    let mut duration = Duration::from_secs(0);
    let mut acc = String::new();
    for c in value.chars() {
        if c.is_ascii_digit() {
            acc.push(c);
        } else if c.is_whitespace() {
            continue;
        } else {
            let dur = acc.parse::<u64>()?;
            match c {
                's' => duration += Duration::from_secs(dur),
                'm' => duration += Duration::from_secs(dur * 60),
                'h' => duration += Duration::from_secs(dur * 60 * 60),
                'd' => duration += Duration::from_secs(dur * 60 * 60 * 24),
                _ => return Err(anyhow!("Invalid duration suffix: {}", c)),
            }
            acc.clear();
        }
    }
    if !acc.is_empty() {
        let dur = acc.parse::<u64>()?;
        duration += Duration::from_millis(dur);
    }
    Ok(duration)
}

/// Initializes the `env_logger` logger with a custom format including
/// timestamps with elapsed time since initialization.
///
/// Logs go to standard error, so they never mix with the results printed on
/// standard output.
pub fn init_env_logger() -> Result<()> {
    use jiff::fmt::friendly::{Designator, Spacing, SpanPrinter};
    use jiff::SpanRound;

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));

    let start = std::time::Instant::now();
    let printer = SpanPrinter::new()
        .spacing(Spacing::None)
        .designator(Designator::Compact);
    let span_round = SpanRound::new()
        .largest(jiff::Unit::Day)
        .smallest(jiff::Unit::Millisecond)
        .days_are_24_hours();

    builder.format(move |buf, record| {
        let Ok(ts) = jiff::Timestamp::try_from(SystemTime::now()) else {
            return Err(std::io::Error::other("Failed to get timestamp"));
        };
        let style = buf.default_level_style(record.level());
        let elapsed = start.elapsed();
        let span = jiff::Span::new()
            .seconds(elapsed.as_secs() as i64)
            .milliseconds(elapsed.subsec_millis() as i64);
        let span = span.round(span_round).map_err(std::io::Error::other)?;
        writeln!(
            buf,
            "{} {} {style}{}{style:#} [{:?}] {} - {}",
            ts.strftime("%F %T%.3f"),
            printer.span_to_string(&span),
            record.level(),
            std::thread::current().id(),
            record.target(),
            record.args()
        )
    });
    builder.init();
    Ok(())
}

#[derive(Args, Debug, Default)]
pub struct GlobalArgs {
    #[arg(long, value_parser = parse_duration, global=true, display_order = 1000)]
    /// How often to log progress. Default is 10s. You can use the suffixes "s"
    /// for seconds, "m" for minutes, "h" for hours, and "d" for days. If no
    /// suffix is provided it is assumed to be in milliseconds.
    /// Example: "1d2h3m4s567" is parsed as 1 day + 2 hours + 3 minutes + 4
    /// seconds + 567 milliseconds = 93784567 milliseconds.
    pub log_interval: Option<Duration>,
}

/// Pretty-prints seconds in a human-readable format.
fn pretty_print_elapsed(elapsed: f64) -> String {
    let mut result = String::new();
    let mut elapsed_seconds = elapsed as u64;
    let weeks = elapsed_seconds / (60 * 60 * 24 * 7);
    elapsed_seconds %= 60 * 60 * 24 * 7;
    let days = elapsed_seconds / (60 * 60 * 24);
    elapsed_seconds %= 60 * 60 * 24;
    let hours = elapsed_seconds / (60 * 60);
    elapsed_seconds %= 60 * 60;
    let minutes = elapsed_seconds / 60;

    for (amount, unit) in [(weeks, "week"), (days, "day"), (hours, "hour"), (minutes, "minute")] {
        match amount {
            0 => {}
            1 => result.push_str(&format!("1 {unit} ")),
            _ => result.push_str(&format!("{amount} {unit}s ")),
        }
    }

    result.push_str(&format!("{:.3} seconds ({}s)", elapsed % 60.0, elapsed));
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_num_threads_parser() {
        assert_eq!(num_threads_parser("4").unwrap(), 4);
        assert!(num_threads_parser("0").is_err());
        assert!(num_threads_parser("-1").is_err());
        assert!(num_threads_parser("many").is_err());
    }

    #[test]
    fn test_max_iter_parser() {
        assert_eq!(max_iter_parser("1").unwrap(), 1);
        assert_eq!(max_iter_parser("100").unwrap(), 100);
        assert!(max_iter_parser("0").is_err());
        assert!(max_iter_parser("-3").is_err());
    }

    #[test]
    fn test_check_damping() {
        assert!(check_damping(0.0).is_ok());
        assert!(check_damping(0.85).is_ok());
        assert!(check_damping(1.0).is_ok());
        assert!(check_damping(-0.1).is_err());
        assert!(check_damping(1.5).is_err());
        assert!(check_damping(f64::NAN).is_err());
    }

    #[test]
    fn test_round_to_digits() {
        assert_eq!(round_to_digits(0.15000000000000002, 10), 0.15);
        assert_eq!(round_to_digits(1.0 / 3.0, 10), 0.3333333333);
        assert_eq!(round_to_digits(0.123456, 2), 0.12);
        assert_eq!(round_to_digits(0.7, 0), 1.0);
        // Scaling overflows: the value is kept as is
        assert_eq!(round_to_digits(0.1, 400), 0.1);
    }

    #[test]
    fn test_write_ranks() -> Result<()> {
        let mut out = Vec::new();
        write_ranks(&mut out, &[0.15000000000000002, 1.0 / 3.0, 0.0], 10)?;
        let text = String::from_utf8(out)?;
        let lines: Vec<f64> = text
            .lines()
            .map(|line| line.parse())
            .collect::<Result<_, _>>()?;
        assert_eq!(lines, vec![0.15, 0.3333333333, 0.0]);
        assert!(text.starts_with("0.15\n0.3333333333\n"));
        Ok(())
    }

    #[test]
    fn test_write_no_ranks() -> Result<()> {
        let mut out = Vec::new();
        write_ranks(&mut out, &[], 10)?;
        assert!(out.is_empty());
        Ok(())
    }

    #[test]
    fn test_parse_duration() -> Result<()> {
        assert_eq!(parse_duration("250")?, Duration::from_millis(250));
        assert_eq!(parse_duration("2m")?, Duration::from_secs(120));
        assert_eq!(
            parse_duration("1d2h3m4s567")?,
            Duration::from_millis(93784567)
        );
        assert!(parse_duration("").is_err());
        assert!(parse_duration("3x").is_err());
        Ok(())
    }

    #[test]
    fn test_pretty_print_elapsed() {
        assert_eq!(pretty_print_elapsed(1.5), "1.500 seconds (1.5s)");
        assert_eq!(
            pretty_print_elapsed(3725.0),
            "1 hour 2 minutes 5.000 seconds (3725s)"
        );
    }

    #[test]
    fn test_granularity_args() {
        let args = GranularityArgs {
            entry_granularity: None,
            row_granularity: None,
        };
        assert_eq!(args.into_granularity(), Granularity::default());
        let args = GranularityArgs {
            entry_granularity: Some(1000),
            row_granularity: None,
        };
        assert_eq!(args.into_granularity(), Granularity::Entries(1000));
    }
}
