//! deskplan CLI - Rule-driven duty rostering
//!
//! Command-line interface for checking roster configurations and solving
//! them into rendered schedules.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use deskplan_core::{preflight, validate, Diagnostic, DiagnosticCode, Renderer, Severity};
use deskplan_render::{HtmlRenderer, TextRenderer};
use deskplan_solver::{Engine, SolveError, SolveOptions};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;

use config::FileSource;

#[derive(Parser)]
#[command(name = "deskplan")]
#[command(author, version, about = "Rule-driven duty rostering engine", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a roster configuration and report data problems
    Check {
        /// Configuration file (TOML)
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Solve a roster and render the schedule
    Solve {
        /// Configuration file (TOML)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format (text, html, json)
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Report title
        #[arg(long, default_value = "Duty roster")]
        title: String,

        /// Solver time budget in seconds
        #[arg(long, default_value_t = 30)]
        budget: u64,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check { file } => check(&file),
        Commands::Solve {
            file,
            format,
            output,
            title,
            budget,
        } => solve(&file, &format, output.as_deref(), title, budget),
    }
}

fn check(file: &PathBuf) -> Result<()> {
    let (config, notes) = FileSource::new(file).load_with_notes()?;
    for note in &notes {
        eprintln!("{note}");
    }
    validate(&config).with_context(|| format!("{} is not a usable configuration", file.display()))?;

    let diagnostics = preflight(&config);
    for diagnostic in &diagnostics {
        println!("{diagnostic}");
    }
    let warnings = diagnostics
        .iter()
        .filter(|d| d.severity >= Severity::Warning)
        .count();
    println!(
        "{}: ok, {} ({warnings} warning(s))",
        file.display(),
        config.dimensions()
    );
    Ok(())
}

fn solve(
    file: &PathBuf,
    format: &str,
    output: Option<&std::path::Path>,
    title: String,
    budget: u64,
) -> Result<()> {
    let (config, notes) = FileSource::new(file).load_with_notes()?;
    for note in &notes {
        eprintln!("{note}");
    }

    let engine = Engine::with_options(SolveOptions {
        title,
        time_budget: Duration::from_secs(budget),
        ..SolveOptions::default()
    });
    let report = match engine.solve(&config) {
        Err(err @ SolveError::Unsatisfiable { .. }) => {
            eprintln!(
                "{}",
                Diagnostic::warning(DiagnosticCode::S003InfeasibleCore, err.to_string())
            );
            anyhow::bail!("{} has no feasible roster", file.display());
        }
        other => other?,
    };

    let rendered = match format {
        "text" => TextRenderer::new().render(&config, &report)?,
        "html" => HtmlRenderer::new().render(&config, &report)?,
        "json" => serde_json::to_string_pretty(&report).context("cannot serialize the report")?,
        other => anyhow::bail!("unknown format '{other}', expected text, html or json"),
    };

    match output {
        Some(path) => std::fs::write(path, rendered)
            .with_context(|| format!("cannot write {}", path.display()))?,
        None => print!("{rendered}"),
    }
    Ok(())
}
