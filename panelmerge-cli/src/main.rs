use std::error::Error;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use panelmerge::{FillMode, MismatchPolicy, PanelConfig, PanelMerge, PanelSink, VerifyConfig};
use panelmerge_io::{CsvOptions, CsvSink, CsvSource, read_table};
use serde::Deserialize;

mod prompt;

use prompt::PromptReviewer;

#[derive(Parser)]
#[command(
    name = "panelmerge",
    version,
    about = "Align a monthly securities panel with quarterly fundamentals"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Merge securities and fundamentals CSV files into one panel.
    Merge {
        /// Securities (CRSP-like) CSV file.
        #[arg(long, value_name = "FILE")]
        securities: PathBuf,
        /// Fundamentals (Compustat-like) CSV file.
        #[arg(long, value_name = "FILE")]
        fundamentals: PathBuf,
        /// Output file; `.feather` or `.arrow` writes Arrow IPC when built with `feather`.
        #[arg(long, value_name = "FILE")]
        output: PathBuf,
        /// JSON configuration file.
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
        /// Fill mode for every roll-down field, overriding the configuration.
        #[arg(long, value_enum)]
        fill: Option<FillArg>,
    },
    /// Check a merged panel for identifier conflicts.
    Verify {
        /// Merged panel CSV file.
        #[arg(long, value_name = "FILE")]
        input: PathBuf,
        /// JSON configuration file.
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
        /// Mismatch policy: `all`, `first`, or a number of groups.
        #[arg(long, value_parser = parse_policy)]
        policy: Option<MismatchPolicy>,
        /// Ask after each mismatching identifier whether to continue.
        #[arg(long)]
        interactive: bool,
        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FillArg {
    Forward,
    ForwardBackward,
}

impl From<FillArg> for FillMode {
    fn from(f: FillArg) -> Self {
        match f {
            FillArg::Forward => Self::ForwardOnly,
            FillArg::ForwardBackward => Self::ForwardThenBackward,
        }
    }
}

fn parse_policy(s: &str) -> Result<MismatchPolicy, String> {
    match s {
        "all" => Ok(MismatchPolicy::CollectAll),
        "first" => Ok(MismatchPolicy::StopOnFirst),
        n => match n.parse::<usize>() {
            Ok(0) => Err("a group count must be at least 1".to_string()),
            Ok(n) => Ok(MismatchPolicy::CollectUpTo(n)),
            Err(_) => Err(format!("expected `all`, `first`, or a number, got `{n}`")),
        },
    }
}

/// On-disk configuration; both sections are optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    panel: PanelConfig,
    verify: VerifyConfig,
}

fn load_config(path: Option<&Path>) -> Result<FileConfig, Box<dyn Error>> {
    let Some(path) = path else {
        return Ok(FileConfig::default());
    };
    let file = File::open(path).map_err(|e| format!("config {}: {e}", path.display()))?;
    let cfg = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| format!("config {}: {e}", path.display()))?;
    Ok(cfg)
}

fn output_sink(path: &Path) -> Result<Box<dyn PanelSink>, Box<dyn Error>> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
    match ext {
        #[cfg(feature = "feather")]
        "feather" | "arrow" => Ok(Box::new(panelmerge_io::FeatherSink::new(path))),
        #[cfg(not(feature = "feather"))]
        "feather" | "arrow" => Err("feather output requires the `feather` feature".into()),
        _ => Ok(Box::new(CsvSink::new(path))),
    }
}

fn merge(
    securities: PathBuf,
    fundamentals: PathBuf,
    output: &Path,
    config: Option<&Path>,
    fill: Option<FillArg>,
) -> Result<(), Box<dyn Error>> {
    let cfg = load_config(config)?;
    let mut builder = PanelMerge::builder().config(cfg.panel).verify_config(cfg.verify);
    if let Some(fill) = fill {
        builder = builder.fill_mode(fill.into());
    }
    let pm = builder.build()?;

    let source = CsvSource::new(securities, fundamentals);
    let mut sink = output_sink(output)?;
    let report = pm.run(&source, sink.as_mut())?;

    for w in &report.warnings {
        tracing::warn!(warning = %w, "merge warning");
    }
    let s = report.stats;
    println!(
        "wrote {} rows to {} ({} aligned, {} outside securities dates, {} without return, {} duplicate keys, {} rows without key)",
        s.output_rows,
        output.display(),
        s.aligned_rows,
        s.dropped_foreign_dates,
        s.dropped_null_returns,
        s.duplicate_keys,
        s.skipped_keys
    );
    Ok(())
}

fn verify(
    input: &Path,
    config: Option<&Path>,
    policy: Option<MismatchPolicy>,
    interactive: bool,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    let cfg = load_config(config)?;
    let mut verify_cfg = cfg.verify;
    if let Some(policy) = policy {
        verify_cfg.policy = policy;
    }
    let pm = PanelMerge::builder()
        .config(cfg.panel)
        .verify_config(verify_cfg.clone())
        .build()?;

    let opts = CsvOptions::default()
        .with_text_column(verify_cfg.identifier.clone())
        .with_text_column(verify_cfg.field_a.clone())
        .with_text_column(verify_cfg.field_b.clone());
    let file = File::open(input).map_err(|e| format!("{}: {e}", input.display()))?;
    let table = read_table(BufReader::new(file), &opts)?;
    tracing::info!(rows = table.len(), path = %input.display(), "read successfully");

    let report = if interactive {
        let labels = (verify_cfg.identifier, verify_cfg.field_a, verify_cfg.field_b);
        let mut reviewer = PromptReviewer::new(io::stdin().lock(), io::stderr(), labels);
        pm.verify_with(&table, &mut reviewer)?
    } else {
        pm.verify(&table)?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{report}");
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();

    match Cli::parse().command {
        Command::Merge {
            securities,
            fundamentals,
            output,
            config,
            fill,
        } => merge(securities, fundamentals, &output, config.as_deref(), fill),
        Command::Verify {
            input,
            config,
            policy,
            interactive,
            json,
        } => verify(&input, config.as_deref(), policy, interactive, json),
    }
}
