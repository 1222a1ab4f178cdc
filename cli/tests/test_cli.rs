/*
 * SPDX-FileCopyrightText: 2026 The linkrank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use anyhow::Result;
use clap::Parser;
use linkrank_cli::{GlobalArgs, pagerank, sweep};
use std::io::Write;

fn write_graph(content: &str) -> Result<tempfile::NamedTempFile> {
    let mut file = tempfile::NamedTempFile::new()?;
    file.write_all(content.as_bytes())?;
    file.flush()?;
    Ok(file)
}

fn run_pagerank(args: &[&str]) -> (Result<()>, String) {
    let mut out = Vec::new();
    let args = pagerank::CliArgs::parse_from(std::iter::once("linkrank").chain(args.iter().copied()));
    let result = pagerank::main(GlobalArgs::default(), args, &mut out);
    (result, String::from_utf8(out).unwrap())
}

fn run_sweep(args: &[&str]) -> (Result<()>, String) {
    let mut out = Vec::new();
    let args =
        sweep::CliArgs::parse_from(std::iter::once("linkrank-sweep").chain(args.iter().copied()));
    let result = sweep::main(GlobalArgs::default(), args, &mut out);
    (result, String::from_utf8(out).unwrap())
}

#[test]
fn test_isolated_node() -> Result<()> {
    let file = write_graph("0:\n")?;
    let path = file.path().to_str().unwrap();
    let (result, out) = run_pagerank(&[path, "0.85"]);
    result?;
    assert_eq!(out, "0.15\n");
    Ok(())
}

#[test]
fn test_cycle() -> Result<()> {
    let file = write_graph("0:1\n1:2\n2:0\n")?;
    let path = file.path().to_str().unwrap();
    let (result, out) = run_pagerank(&[path, "0.5", "--threads", "2"]);
    result?;
    assert_eq!(out, "0.3333333333\n0.3333333333\n0.3333333333\n");
    Ok(())
}

#[test]
fn test_precision() -> Result<()> {
    let file = write_graph("0:1\n1:2\n2:0\n")?;
    let path = file.path().to_str().unwrap();
    let (result, out) = run_pagerank(&[path, "0.85", "--precision", "3"]);
    result?;
    assert_eq!(out, "0.333\n0.333\n0.333\n");
    Ok(())
}

#[test]
fn test_empty_graph() -> Result<()> {
    let file = write_graph("")?;
    let path = file.path().to_str().unwrap();
    let (result, out) = run_pagerank(&[path, "0.85"]);
    result?;
    assert!(out.is_empty());
    Ok(())
}

#[test]
fn test_ranks_are_in_node_order() -> Result<()> {
    let file = write_graph("2:0\n0:1,2\n1:2\n")?;
    let path = file.path().to_str().unwrap();
    let (result, out) = run_pagerank(&[path, "0.85"]);
    result?;
    let ranks: Vec<f64> = out
        .lines()
        .map(|line| line.parse())
        .collect::<Result<_, _>>()?;
    assert_eq!(ranks, vec![0.3877897468, 0.2148105511, 0.3973997021]);
    Ok(())
}

#[test]
fn test_malformed_line() -> Result<()> {
    let file = write_graph("0:1\nabc:1,2\n")?;
    let path = file.path().to_str().unwrap();
    let (result, out) = run_pagerank(&[path, "0.85"]);
    let err = result.unwrap_err();
    assert!(format!("{err:#}").contains("abc:1,2"));
    assert!(out.is_empty());
    Ok(())
}

#[test]
fn test_missing_file() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("missing.txt");
    let (result, out) = run_pagerank(&[path.to_str().unwrap(), "0.85"]);
    let err = result.unwrap_err();
    assert!(format!("{err:#}").contains("missing.txt"));
    assert!(out.is_empty());
    Ok(())
}

#[test]
fn test_bad_damping() -> Result<()> {
    let file = write_graph("0:1\n")?;
    let path = file.path().to_str().unwrap();
    let (result, out) = run_pagerank(&[path, "1.5"]);
    assert!(result.is_err());
    assert!(out.is_empty());
    Ok(())
}

#[test]
fn test_did_not_converge() -> Result<()> {
    let file = write_graph("0:1,2\n1:2\n2:0\n")?;
    let path = file.path().to_str().unwrap();
    let (result, out) = run_pagerank(&[path, "0.85", "--max-iter", "2"]);
    let err = result.unwrap_err();
    assert!(format!("{err:#}").contains("No convergence after 2 iteration(s)"));
    assert!(out.is_empty());
    Ok(())
}

#[test]
fn test_wrong_number_of_arguments() {
    assert!(pagerank::CliArgs::try_parse_from(["linkrank", "graph.txt"]).is_err());
    assert!(pagerank::CliArgs::try_parse_from(["linkrank", "graph.txt", "0.85", "extra"]).is_err());
    assert!(pagerank::CliArgs::try_parse_from(["linkrank", "graph.txt", "high"]).is_err());
}

#[test]
fn test_zero_max_iter_is_rejected() {
    assert!(
        pagerank::CliArgs::try_parse_from(["linkrank", "graph.txt", "0.85", "--max-iter", "0"])
            .is_err()
    );
    assert!(
        sweep::CliArgs::try_parse_from(["linkrank-sweep", "graph.txt", "--max-iter", "0"])
            .is_err()
    );
    assert!(
        pagerank::CliArgs::try_parse_from(["linkrank", "graph.txt", "0.85", "--max-iter", "1"])
            .is_ok()
    );
}

#[test]
fn test_sweep_text() -> Result<()> {
    let file = write_graph("0:1,2\n1:2\n2:0\n")?;
    let path = file.path().to_str().unwrap();
    let (result, out) = run_sweep(&[path]);
    result?;
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 5);
    assert!(lines[0].starts_with("Damping factor: 0.75, iterations: "));
    assert!(lines[2].starts_with("Damping factor: 0.85, iterations: 28, top rank: 0.397"));
    Ok(())
}

#[test]
fn test_sweep_empty_graph() -> Result<()> {
    let file = write_graph("")?;
    let path = file.path().to_str().unwrap();
    let (result, out) = run_sweep(&[path, "0.5"]);
    result?;
    assert_eq!(out, "Damping factor: 0.5, iterations: 0, top rank: none\n");
    Ok(())
}

#[test]
fn test_sweep_json() -> Result<()> {
    let file = write_graph("0:1\n1:0\n")?;
    let path = file.path().to_str().unwrap();
    let (result, out) = run_sweep(&[path, "0.5", "0.9", "--json"]);
    result?;
    let rows: serde_json::Value = serde_json::from_str(&out)?;
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["damping"], 0.5);
    assert_eq!(rows[1]["damping"], 0.9);
    assert_eq!(rows[0]["iterations"], 1);
    assert_eq!(rows[0]["max_rank"], 0.5);
    Ok(())
}

#[test]
fn test_sweep_bad_damping() -> Result<()> {
    let file = write_graph("0:1\n1:0\n")?;
    let path = file.path().to_str().unwrap();
    let (result, out) = run_sweep(&[path, "0.5", "2"]);
    assert!(result.is_err());
    assert!(out.is_empty());
    Ok(())
}

#[test]
fn test_sweep_log_interval() -> Result<()> {
    let file = write_graph("0:1,2\n1:2\n2:0\n")?;
    let path = file.path().to_str().unwrap();
    let cli = sweep::Cli::try_parse_from(["linkrank-sweep", path, "0.85", "--log-interval", "1"])?;
    assert_eq!(
        cli.args.log_interval,
        Some(std::time::Duration::from_millis(1))
    );
    let mut out = Vec::new();
    sweep::main(cli.args, cli.sweep, &mut out)?;
    assert!(String::from_utf8(out)?.starts_with("Damping factor: 0.85, iterations: 28"));
    Ok(())
}
