mod input;
mod logging;
mod model;
mod pipeline;
mod report;

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::builder::RangedU64ValueParser;
use clap::{ArgAction, Args, Parser, Subcommand};
use thiserror::Error;

use crate::input::cache::DatasetStore;
use crate::input::{DEFAULT_INPUT, InputError, LoadedDataset};
use crate::pipeline::stage2_filter::distinct_positions;
use crate::pipeline::stage4_rank::{DEFAULT_TOP_N, MAX_TOP_N};
use crate::pipeline::stage5_aggregate::{DEFAULT_BINS, MAX_BINS};
use crate::pipeline::stage6_report::{ReportError, render_text, write_reports};
use crate::pipeline::{QueryOutcome, QueryParams, run_query};
use crate::report::slug;
use crate::report::text::{no_match_text, prompt_text};

#[derive(Debug, Parser)]
#[command(
    name = "talent-match",
    version,
    about = "Position-level talent match analysis over an employee assessment table"
)]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Analyse one job position.
    Run(RunArgs),
    /// Answer positions read from stdin, one per line, against one loaded dataset.
    Session(SessionArgs),
    /// List position names with their row counts.
    Positions(InputArgs),
}

#[derive(Debug, Clone, Args)]
struct InputArgs {
    /// Dataset file (.csv, or .csv.gz).
    #[arg(long, default_value = DEFAULT_INPUT)]
    input: PathBuf,

    #[arg(long, default_value_t = ',')]
    delimiter: char,
}

#[derive(Debug, Clone, Args)]
struct ReportArgs {
    /// Write report.txt, summary.json and TSV tables here.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Rows in each performer table.
    #[arg(
        long,
        default_value_t = DEFAULT_TOP_N,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..=MAX_TOP_N)
    )]
    top_n: usize,

    /// Histogram bins for the match rate distribution.
    #[arg(
        long,
        default_value_t = DEFAULT_BINS,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..=MAX_BINS as u64)
    )]
    bins: usize,
}

#[derive(Debug, Clone, Args)]
struct RunArgs {
    /// Job position, matched case-insensitively.
    #[arg(long, default_value = "")]
    position: String,

    #[command(flatten)]
    input: InputArgs,

    #[command(flatten)]
    report: ReportArgs,
}

#[derive(Debug, Clone, Args)]
struct SessionArgs {
    #[command(flatten)]
    input: InputArgs,

    #[command(flatten)]
    report: ReportArgs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputLayout {
    /// Artifacts go straight into the output directory.
    Flat,
    /// One sub-directory per query.
    PerQuery,
}

#[derive(Debug, Clone, PartialEq)]
struct RunConfig {
    input: PathBuf,
    delimiter: u8,
    out_dir: Option<PathBuf>,
    layout: OutputLayout,
    params: QueryParams,
}

#[derive(Debug, Error)]
enum AppError {
    #[error("dataset unavailable: {0}")]
    DataUnavailable(#[from] InputError),
    #[error("report failed: {0}")]
    Report(#[from] ReportError),
    #[error("output failed: {0}")]
    Output(#[from] io::Error),
    #[error("position '{0}' not found in the dataset")]
    NoMatch(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl AppError {
    fn exit_code(&self) -> u8 {
        match self {
            AppError::NoMatch(_) => 2,
            _ => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Answer {
    Prompted,
    NoMatch(String),
    Reported { rows: usize },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct SessionStats {
    queries: usize,
    reports: usize,
    no_match: usize,
    prompts: usize,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match dispatch(cli.command, &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}

fn dispatch(command: Command, out: &mut dyn Write) -> Result<(), AppError> {
    match command {
        Command::Run(args) => {
            let config = build_config(&args.input, Some(&args.report), OutputLayout::Flat)?;
            let store = DatasetStore::new(&config.input, config.delimiter);
            let dataset = store.load()?;
            match answer_query(&dataset, &args.position, &config, out)? {
                Answer::NoMatch(query) => Err(AppError::NoMatch(query)),
                Answer::Reported { rows } => {
                    tracing::info!(rows, path = %store.path().display(), "query answered");
                    Ok(())
                }
                Answer::Prompted => Ok(()),
            }
        }
        Command::Session(args) => {
            let config = build_config(&args.input, Some(&args.report), OutputLayout::PerQuery)?;
            let store = DatasetStore::new(&config.input, config.delimiter);
            let stdin = io::stdin();
            let stats = run_session(&store, &config, stdin.lock(), out)?;
            tracing::info!(
                queries = stats.queries,
                reports = stats.reports,
                no_match = stats.no_match,
                prompts = stats.prompts,
                "session finished"
            );
            Ok(())
        }
        Command::Positions(args) => {
            let config = build_config(&args, None, OutputLayout::Flat)?;
            let store = DatasetStore::new(&config.input, config.delimiter);
            let dataset = store.load()?;
            for (name, count) in distinct_positions(&dataset.table) {
                writeln!(out, "{count}\t{name}")?;
            }
            Ok(())
        }
    }
}

fn build_config(
    input: &InputArgs,
    report: Option<&ReportArgs>,
    layout: OutputLayout,
) -> Result<RunConfig, AppError> {
    if !input.delimiter.is_ascii() {
        return Err(AppError::InvalidArgument(format!(
            "--delimiter must be a single ASCII character, got {:?}",
            input.delimiter
        )));
    }
    let params = match report {
        Some(r) => QueryParams {
            top_n: r.top_n,
            bins: r.bins,
        },
        None => QueryParams::default(),
    };
    Ok(RunConfig {
        input: input.input.clone(),
        delimiter: input.delimiter as u8,
        out_dir: report.and_then(|r| r.out.clone()),
        layout,
        params,
    })
}

fn resolve_output_dir(base: &Path, query: &str, layout: OutputLayout) -> PathBuf {
    match layout {
        OutputLayout::Flat => base.to_path_buf(),
        OutputLayout::PerQuery => base.join(slug(query)),
    }
}

/// Run one query and print its outcome. A missing match is returned to the
/// caller, which decides whether it ends the run.
fn answer_query(
    dataset: &LoadedDataset,
    raw_query: &str,
    config: &RunConfig,
    out: &mut dyn Write,
) -> Result<Answer, AppError> {
    match run_query(dataset, raw_query, &config.params) {
        QueryOutcome::AwaitingInput => {
            out.write_all(prompt_text().as_bytes())?;
            Ok(Answer::Prompted)
        }
        QueryOutcome::NoMatch { query } => Ok(Answer::NoMatch(query)),
        QueryOutcome::Report(report) => {
            if let Some(base) = &config.out_dir {
                let dir = resolve_output_dir(base, &report.query, config.layout);
                write_reports(&report, &dir)?;
            }
            out.write_all(render_text(&report).as_bytes())?;
            Ok(Answer::Reported {
                rows: report.employees.len(),
            })
        }
    }
}

/// Interactive loop. The dataset is loaded before the first prompt; a load
/// failure ends the session. Per-query problems are reported and the loop
/// moves on.
fn run_session<R: BufRead>(
    store: &DatasetStore,
    config: &RunConfig,
    input: R,
    out: &mut dyn Write,
) -> Result<SessionStats, AppError> {
    let mut stats = SessionStats::default();
    if !store.is_loaded() {
        tracing::debug!(path = %store.path().display(), "loading dataset before first prompt");
    }
    store.load()?;
    out.write_all(prompt_text().as_bytes())?;
    out.flush()?;

    for line in input.lines() {
        let line = line?;
        let dataset = store.load()?;
        stats.queries += 1;
        match answer_query(&dataset, &line, config, out) {
            Ok(Answer::Prompted) => stats.prompts += 1,
            Ok(Answer::NoMatch(query)) => {
                stats.no_match += 1;
                out.write_all(no_match_text(&query).as_bytes())?;
            }
            Ok(Answer::Reported { .. }) => stats.reports += 1,
            Err(AppError::Report(err)) => {
                tracing::error!(query = %line.trim(), "could not write reports: {err}");
                writeln!(out, "Could not write reports: {err}")?;
            }
            Err(err) => return Err(err),
        }
        writeln!(out)?;
        out.flush()?;
    }

    Ok(stats)
}

#[cfg(test)]
#[path = "../tests/src_inline/main_inline.rs"]
mod tests;
