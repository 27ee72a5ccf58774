use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pdfdiff::compare::{CompareOutcome, Launcher};
use pdfdiff::pipeline::{self, DocumentReport};
use pdfdiff::{Extractor, Normalizer, PdfDiffConfig, SystemToolLocator};

#[derive(Parser, Debug)]
#[command(name = "pdfdiff")]
#[command(about = "View the difference between two documents, or print the normalized text of one")]
#[command(long_about = "View the difference between two files, or output a normalized version \
of the text in a single file. Supported file types are: pdf, ps, txt.\n\n\
Text is rewritten one sentence per line with ligatures expanded, so line-based diff \
viewers show content changes instead of reflow noise.")]
#[command(after_help = "Known diff viewers, most preferred first: \
kdiff3, meld, tkdiff, xxdiff, gvimdiff, vimdiff, diff, opendiff")]
#[command(version)]
#[command(arg_required_else_help = true)]
struct Args {
    /// Document to normalize, or the left side of the comparison
    file1: PathBuf,

    /// Right side of the comparison
    file2: Option<PathBuf>,

    /// Use this viewer, or the first known viewer whose name starts with it
    #[arg(short = 'd', long = "diffviewer", value_name = "PREFIX")]
    diff_viewer: Option<String>,

    /// Skip viewers and print a unified diff
    #[arg(long)]
    plain: bool,

    /// TOML configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write per-document normalization stats as JSON
    #[arg(long, value_name = "PATH")]
    stats_out: Option<PathBuf>,

    /// Log progress (info level) to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();
    init_logging(&args);

    info!(?args, "Parsed CLI arguments");

    let config = PdfDiffConfig::load_or_default(args.config.as_deref()).await?;
    let tools = Arc::new(SystemToolLocator);
    let extractor = Extractor::new(config.extractor.clone(), tools.clone());
    let normalizer = Normalizer::with_config(config.normalizer.clone());

    let Some(file2) = &args.file2 else {
        // Single-input mode: stdout carries exactly the normalized text
        let (document, report) = pipeline::process_document(&extractor, &normalizer, &args.file1)
            .await
            .with_context(|| format!("Failed to process {}", args.file1.display()))?;
        write_stats(&args, &[report]).await?;
        pipeline::write_lines(tokio::io::stdout(), &document.lines)
            .await
            .context("Failed to write normalized text")?;
        return Ok(ExitCode::SUCCESS);
    };

    // Validate the viewer preference before doing any extraction work
    let mut launcher = Launcher::new(config.viewer.clone(), tools);
    if let Some(preference) = &args.diff_viewer {
        launcher = launcher.with_preference(preference.as_str())?;
    }

    let [(left, left_report), (right, right_report)] =
        pipeline::process_pair(&extractor, &normalizer, &args.file1, file2)
            .await
            .context("Failed to extract documents")?;
    write_stats(&args, &[left_report, right_report]).await?;

    let outcome = if args.plain {
        CompareOutcome::Fallback {
            diff: launcher.plain_diff(&left, &right),
        }
    } else {
        launcher.compare(&left, &right).await?
    };

    match outcome {
        CompareOutcome::Launched { viewer, status } => {
            info!("{} finished with {}", viewer, status);
        }
        CompareOutcome::Fallback { diff } => {
            print!("{diff}");
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn init_logging(args: &Args) {
    // WHY: stdout is reserved for normalized text and diffs so the tool composes in pipelines
    let default_level = if args.verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if args.log_json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn write_stats(args: &Args, reports: &[DocumentReport]) -> Result<()> {
    if let Some(path) = &args.stats_out {
        pipeline::write_reports(path, reports)
            .await
            .with_context(|| format!("Failed to write stats to {}", path.display()))?;
        info!("Stats written to {}", path.display());
    }
    Ok(())
}
