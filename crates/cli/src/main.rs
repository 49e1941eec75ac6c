//! CLI tool for filling a confidence assessment slide deck from a survey
//! workbook.

use anyhow::{Context, Result};
use clap::Parser;
use confidence_core::ReportData;
use confidence_pptx::{render_report, Template};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

/// Fill a roadmap delivery confidence assessment deck from survey responses.
#[derive(Parser, Debug)]
#[command(name = "confidence-report")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Survey workbook (.xlsx), one row per response
    workbook: PathBuf,

    /// Slide deck template (.pptx) containing placeholder tokens
    template: PathBuf,

    /// Output path for the filled deck
    #[arg(
        short,
        long,
        default_value = "Roadmap Delivery Confidence Assessment.pptx"
    )]
    output: PathBuf,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let table = confidence_xlsx::load_survey(&args.workbook)
        .with_context(|| format!("Failed to load survey from {}", args.workbook.display()))?;

    if args.verbose {
        eprintln!("Loaded {} survey responses", table.len());
    }

    // The workbook filename carries the solution name.
    let workbook_name = args
        .workbook
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    let report = ReportData::derive(&table, workbook_name)
        .with_context(|| "Failed to derive report values from the survey")?;

    log::debug!(
        "Release 1: {:?} -> {}; release 2: {:?} -> {}",
        report.release_1.counts,
        report.release_1.overall,
        report.release_2.counts,
        report.release_2.overall
    );

    let mut template = Template::from_path(&args.template)
        .with_context(|| format!("Failed to open template {}", args.template.display()))?;

    render_report(&mut template, &report)
        .with_context(|| "Failed to apply report values to the template")?;

    // Created only after every substitution succeeded, so a failed run
    // leaves no partial output behind.
    let out = File::create(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;
    template
        .save(BufWriter::new(out))
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    println!("Presentation saved as: {}", args.output.display());
    Ok(())
}
