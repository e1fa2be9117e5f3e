use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tabrecon::model::Side;
use tabrecon::{ReconConfig, ReconError, Reconciler, Result, Upload};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = init_logging().and_then(|()| run(cli)) {
        eprintln!("error[{}]: {error}", error.kind());
        std::process::exit(1);
    }
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| ReconError::Internal(format!("failed to initialise logging: {err}")))
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Reconcile(args) => execute_reconcile(args),
    }
}

fn execute_reconcile(args: ReconcileArgs) -> Result<()> {
    let config = args.resolve_config()?;
    let reconciler = Reconciler::new(config)?;

    let left = read_input(&args.left, Side::Left)?;
    let right = read_input(&args.right, Side::Right)?;
    let report = reconciler.run(Some(&left), Some(&right))?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&report.file_name));
    fs::write(&output, &report.bytes)?;
    info!(output = %output.display(), "report saved");

    if args.json {
        let summary = serde_json::to_string_pretty(&report.summary)
            .map_err(|err| ReconError::Internal(format!("failed to encode summary: {err}")))?;
        println!("{summary}");
    } else {
        let summary = report.summary;
        println!(
            "{} rows: {} match, {} mismatch ({} left only, {} right only) -> {}",
            summary.total(),
            summary.matched,
            summary.mismatched,
            summary.left_only,
            summary.right_only,
            output.display()
        );
    }
    Ok(())
}

fn read_input(path: &Path, side: Side) -> Result<Upload> {
    if !path.exists() {
        return Err(ReconError::MissingInput {
            side,
            path: Some(path.to_path_buf()),
        });
    }
    Upload::from_path(path)
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Reconcile two spreadsheets or CSV files into an Excel report."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Join two files on a key column and flag rows whose values differ.
    Reconcile(ReconcileArgs),
}

#[derive(clap::Args)]
struct ReconcileArgs {
    /// Left-hand input (.xlsx, .xls or .csv); its columns get the left suffix.
    #[arg(long)]
    left: PathBuf,

    /// Right-hand input (.xlsx, .xls or .csv); its columns get the right suffix.
    #[arg(long)]
    right: PathBuf,

    /// Report path. Defaults to the configured report file name.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Key column to join on.
    #[arg(long)]
    key: Option<String>,

    /// Column whose values are compared.
    #[arg(long)]
    compare: Option<String>,

    /// JSON configuration file; flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the summary as JSON.
    #[arg(long)]
    json: bool,
}

impl ReconcileArgs {
    fn resolve_config(&self) -> Result<ReconConfig> {
        let mut config = match &self.config {
            Some(path) => ReconConfig::load(path)?,
            None => ReconConfig::default(),
        };
        if let Some(key) = &self.key {
            config.key_column = key.clone();
        }
        if let Some(compare) = &self.compare {
            config.compare_column = compare.clone();
        }
        Ok(config)
    }
}
