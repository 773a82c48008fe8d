//! currimap CLI - curriculum map extraction tool

use anyhow::{Context, Result};
use clap::Parser;
use currimap::{run_batch, write_json_file, BatchItem, BatchOutcome, Extractor, ExtractorBuilder};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "currimap")]
#[command(
    author,
    version,
    about = "Extract curriculum maps (grids, cell colors, box layouts) from ODS/XLSX workbooks"
)]
struct Cli {
    /// Directory the file names are resolved against
    #[arg(long, default_value = "./12_Licenciaturas_BIS")]
    source_dir: PathBuf,

    /// Directory receiving one JSON document per input
    #[arg(long, default_value = "12_Licenciaturas_PDF+PNG")]
    output_dir: PathBuf,

    /// Skip repeated row runs longer than this
    #[arg(long, default_value = "1000")]
    row_skip_threshold: u32,

    /// Expand at most this many rows of a repeated run
    #[arg(long, default_value = "500")]
    row_expand_cap: u32,

    /// Workbook file names (ods, xlsx)
    files: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.files.is_empty() {
        eprintln!("Warning: no input files given");
        return Ok(());
    }

    let extractor = ExtractorBuilder::new()
        .with_row_skip_threshold(cli.row_skip_threshold)
        .with_row_expand_cap(cli.row_expand_cap)
        .build()
        .context("Invalid extraction settings")?;

    let items = run_batch(&extractor, &cli.source_dir, &cli.files);
    let summary = export_all(&extractor, &items, &cli.output_dir);

    eprintln!(
        "Done: {} written, {} failed, {} missing, {} given",
        summary.written,
        summary.failed,
        summary.missing,
        cli.files.len()
    );
    Ok(())
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Summary {
    written: usize,
    failed: usize,
    missing: usize,
}

/// Writes one JSON per extracted document; a failed write does not stop the rest
fn export_all(extractor: &Extractor, items: &[BatchItem], output_dir: &Path) -> Summary {
    let mut summary = Summary::default();

    for item in items {
        match &item.outcome {
            BatchOutcome::Missing => {
                eprintln!("File not found: {}", item.path.display());
                summary.missing += 1;
            }
            BatchOutcome::Failed(e) => {
                eprintln!("Failed to load '{}': {}", item.path.display(), e);
                summary.failed += 1;
            }
            BatchOutcome::Extracted(document) => {
                eprintln!("--- {} ---", item.file);
                for warning in &document.warnings {
                    eprintln!("   {}", warning);
                }

                let layouts = extractor.plan(document);
                match write_json_file(document, &layouts, output_dir) {
                    Ok(path) => {
                        eprintln!("   {} sheet(s) -> {}", layouts.len(), path.display());
                        summary.written += 1;
                    }
                    Err(e) => {
                        eprintln!("Failed to write output for '{}': {}", item.file, e);
                        summary.failed += 1;
                    }
                }
            }
        }
    }

    summary
}
