use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use colored::*;

mod batch;
mod color_image_mask;
mod composite;
mod config;
mod error;
mod helper;

use batch::{BatchReport, PairOutcome};
use config::{BatchConfig, ConfigFile, Overrides};
use error::TintError;

/// Tint every `*_overlay.png` in a folder and composite it over its base image
#[derive(Parser, Debug)]
#[command(name = "overlay_tinter")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Tint color as 0xRRGGBB (prompted for when omitted)
    #[arg(long, short)]
    color: Option<String>,

    /// Folder holding `{name}.png` and `{name}_overlay.png` pairs
    #[arg(long, short)]
    input: Option<PathBuf>,

    /// Folder receiving `{name}_{color}.png`, created if needed
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// File name ending that marks an overlay
    #[arg(long)]
    overlay_suffix: Option<String>,

    /// JSON file with input_dir, output_dir, overlay_suffix and base_extension
    #[arg(long)]
    config: Option<PathBuf>,

    /// Exit with a failure status if any pair was skipped
    #[arg(long)]
    strict: bool,
}

/// Ask for the color on stdin
fn prompt_color() -> io::Result<String> {
    print!("Enter hex color literal (example: 0x3333FF): ");
    io::stdout().flush()?;

    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "no color given",
        ));
    }
    Ok(line)
}

fn print_outcome(outcome: &PairOutcome) {
    match &outcome.result {
        Ok(path) => println!("Exported -> {}", path.display()),
        Err(e @ TintError::MissingBasePair { .. }) => eprintln!("{}", e.to_string().yellow()),
        Err(e) => eprintln!(
            "{}",
            format!("Failed to process {}: {}", outcome.overlay_name, e).red()
        ),
    }
}

fn print_summary(report: &BatchReport) {
    println!("{}", "Done.".green());

    let skipped = report.skipped();
    if !skipped.is_empty() {
        println!(
            "{}",
            format!(
                "Exported {} image(s), skipped {}:",
                report.exported(),
                skipped.len()
            )
            .red()
        );
        for s in skipped {
            println!(" - {}", s.overlay_name);
        }
        println!(
            "{}",
            "-> Check that every overlay has a matching base image of the same size".magenta()
        );
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let file = cli
        .config
        .as_deref()
        .map(ConfigFile::load)
        .transpose()
        .context("Could not load config file")?;

    let config = BatchConfig::build(
        file,
        Overrides {
            input_dir: cli.input,
            output_dir: cli.output,
            overlay_suffix: cli.overlay_suffix,
        },
    )?;

    let color = match cli.color {
        Some(color) => batch::prepare(&config, move || Ok(color)),
        None => batch::prepare(&config, prompt_color),
    }
    .context("Nothing was processed")?;

    let (r, g, b) = color.rgb;
    println!("Tinting with {} (r: {r}, g: {g}, b: {b})", color);

    let report = batch::process_all(&config, &color)
        .with_context(|| format!("Could not read pairs from {}", config.input_dir.display()))?;

    for outcome in &report.outcomes {
        print_outcome(outcome);
    }
    print_summary(&report);

    if cli.strict && !report.is_clean() {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
