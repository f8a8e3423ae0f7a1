use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use pipeline::{
    load_patterns, run_batch, select_candidates, BatchManifest, BuiltinRule, MatchMode,
    SelectionConfig, SelectionReport,
};
use pr_records::{parser, ChangedFilesEncoding};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::debug;

/// select-prs - Candidate pull request selection
#[derive(Parser)]
#[command(name = "select-prs")]
#[command(about = "Select closed pull requests whose changed files match domain path patterns", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Select candidate pull requests for one project
    Select(SelectArgs),

    /// Run every project listed in a manifest, in parallel
    Batch {
        /// YAML manifest listing projects and their inputs/outputs
        #[arg(long)]
        manifest: PathBuf,

        /// Number of worker threads (defaults to one per core)
        #[arg(long)]
        jobs: Option<usize>,
    },
}

#[derive(Args)]
struct SelectArgs {
    /// Closed pull request export (CSV with header); "-" reads standard input
    #[arg(long)]
    prs: PathBuf,

    /// Pattern source: CSV with a pattern column, or a .txt/.lst list
    #[arg(long)]
    patterns: PathBuf,

    /// Write selected rows to this file instead of standard output
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// YAML selection config; flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// How patterns are interpreted: auto, substring, segment, or regex
    #[arg(long)]
    match_mode: Option<MatchMode>,

    /// Ignore documentation and image files when matching
    #[arg(long)]
    exclude_docs: bool,

    /// Add a builtin rule set (repeatable): infrastructure
    #[arg(long = "builtin")]
    builtin_rules: Vec<BuiltinRule>,

    /// Keep only the first row of each pull request id
    #[arg(long)]
    dedup: bool,

    /// Treat the pattern source as a plain list, one pattern per line
    #[arg(long)]
    plain_patterns: bool,

    /// Column holding the pull request id
    #[arg(long)]
    id_column: Option<String>,

    /// Column holding the changed files
    #[arg(long)]
    files_column: Option<String>,

    /// Column holding the declared commit count
    #[arg(long)]
    commit_count_column: Option<String>,

    /// Column holding the declared changed-file count
    #[arg(long)]
    file_count_column: Option<String>,

    /// Pattern column of the pattern source
    #[arg(long)]
    pattern_column: Option<String>,

    /// Delimiter between paths in the changed-files cell
    #[arg(long, conflicts_with_all = ["repeated_rows", "diff_dir"])]
    delimiter: Option<String>,

    /// The export has one row per changed file
    #[arg(long, conflicts_with = "diff_dir")]
    repeated_rows: bool,

    /// Read changed files from <DIR>/<id>.diff instead of a column
    #[arg(long)]
    diff_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Initialize tracing; stdout is reserved for CSV output
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Select(args) => handle_select(args)?,
        Commands::Batch { manifest, jobs } => handle_batch(manifest, jobs)?,
    }

    Ok(())
}

/// Merge the config file (if any) with command-line overrides
fn build_config(args: &SelectArgs) -> Result<SelectionConfig> {
    let mut config = match &args.config {
        Some(path) => SelectionConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => SelectionConfig::default(),
    };

    let schema = &mut config.schema;
    if let Some(column) = &args.id_column {
        schema.id_column = column.clone();
    }
    if let Some(column) = &args.files_column {
        schema.changed_files_column = column.clone();
    }
    if let Some(column) = &args.commit_count_column {
        schema.commit_count_column = Some(column.clone());
    }
    if let Some(column) = &args.file_count_column {
        schema.changed_file_count_column = Some(column.clone());
    }
    if let Some(column) = &args.pattern_column {
        schema.pattern_column = column.clone();
    }
    if let Some(delimiter) = &args.delimiter {
        schema.encoding = ChangedFilesEncoding::Delimited {
            delimiter: delimiter.clone(),
        };
    }
    if args.repeated_rows {
        schema.encoding = ChangedFilesEncoding::RepeatedRows;
    }
    if let Some(dir) = &args.diff_dir {
        schema.encoding = ChangedFilesEncoding::DiffDir { dir: dir.clone() };
    }

    let matching = &mut config.matching;
    if let Some(mode) = args.match_mode {
        matching.mode = mode;
    }
    matching.exclude_docs |= args.exclude_docs;
    matching.dedup |= args.dedup;
    for rule in &args.builtin_rules {
        if !matching.builtin_rules.contains(rule) {
            matching.builtin_rules.push(*rule);
        }
    }

    config.validate().context("Invalid selection config")?;
    Ok(config)
}

/// Handle the 'select' command
fn handle_select(args: SelectArgs) -> Result<()> {
    let config = build_config(&args)?;
    let start = Instant::now();

    let table = if args.prs.as_os_str() == "-" {
        parser::read_table("<stdin>", io::stdin().lock())
    } else {
        parser::read_table_from_path(&args.prs)
    }
    .context("Failed to load pull requests")?;

    let plain = args.plain_patterns.then_some(true);
    let patterns = load_patterns(&args.patterns, &config.schema, plain)
        .with_context(|| format!("Failed to load patterns from {}", args.patterns.display()))?;

    debug!(
        "Selecting from {} with {} ({} patterns): {:?}",
        table.label, patterns.label, patterns.len(), config
    );
    let selection = select_candidates(&table, &patterns, &config)
        .with_context(|| format!("Selection failed for {}", table.label))?;

    // The selection is complete in memory; only now does anything reach the output
    match &args.output {
        Some(path) => selection
            .write_to(path)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => {
            let bytes = selection.to_csv_bytes()?;
            let mut stdout = io::stdout().lock();
            stdout.write_all(&bytes)?;
            stdout.flush()?;
        }
    }

    print_summary(&table.label, &selection.report, start.elapsed());
    Ok(())
}

/// Handle the 'batch' command
fn handle_batch(manifest_path: PathBuf, jobs: Option<usize>) -> Result<()> {
    if let Some(jobs) = jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .context("Failed to configure worker threads")?;
    }

    let manifest = BatchManifest::from_file(&manifest_path)
        .with_context(|| format!("Failed to load manifest {}", manifest_path.display()))?;
    let start = Instant::now();
    let outcomes = run_batch(&manifest)?;

    let mut failed = 0;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(report) => print_summary(&outcome.name, report, start.elapsed()),
            Err(e) => {
                failed += 1;
                eprintln!("{} {}: {}", "✗".red(), outcome.name.bold(), e);
            }
        }
    }

    if failed > 0 {
        bail!("{} of {} projects failed", failed, outcomes.len());
    }
    Ok(())
}

/// Print a one-line summary (and any warnings) to stderr
fn print_summary(label: &str, report: &SelectionReport, elapsed: Duration) {
    for warning in &report.warnings {
        eprintln!("{} {}", "!".yellow(), warning);
    }
    eprintln!(
        "{} {}: {} of {} pull requests selected ({} rows, {} rules) in {:?}",
        "✓".green(),
        label.bold(),
        report.candidates.to_string().green(),
        report.pull_requests,
        report.rows_emitted,
        report.rules,
        elapsed
    );
}
