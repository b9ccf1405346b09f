//! Spinbind CLI
//!
//! Inspect widget descriptions and simulate bindings against the in-memory
//! engine.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;
mod simulate;

use config::SpinbindFile;
use simulate::{parse_steps, Simulation};
use spinbind_binding::lifecycle::initial_options;
use spinbind_core::Renderer;

#[derive(Parser)]
#[command(name = "spinbind")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Spinner binding inspector and simulator", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the options an engine would be constructed with
    Options {
        /// Widget description (TOML, or JSON with a .json extension)
        file: PathBuf,
    },

    /// Drive a binding through a script of steps
    Simulate {
        /// Widget description (TOML, or JSON with a .json extension)
        file: PathBuf,

        /// Comma-separated steps (up, down, set=N, input=TEXT, value=N, free,
        /// spin-up=N, spin-down=N, renderer=NAME); overrides the file's steps
        #[arg(short, long)]
        steps: Option<String>,
    },

    /// List available renderers
    Renderers,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match cli.command {
        Commands::Options { file } => cmd_options(&file),
        Commands::Simulate { file, steps } => cmd_simulate(&file, steps.as_deref()),
        Commands::Renderers => cmd_renderers(),
    }
}

fn cmd_options(file: &Path) -> Result<()> {
    let description = SpinbindFile::load(file)?;
    let options = initial_options(&description.widget);
    println!("{}", serde_json::to_string_pretty(&options)?);
    Ok(())
}

fn cmd_simulate(file: &Path, steps: Option<&str>) -> Result<()> {
    let description = SpinbindFile::load(file)?;
    let steps = match steps {
        Some(list) => parse_steps([list])?,
        None => parse_steps(description.steps.iter().map(String::as_str))?,
    };
    if steps.is_empty() {
        anyhow::bail!("No steps given. Pass --steps or add `steps = [...]` to the file.");
    }

    info!(
        "Simulating {} ({} steps)",
        file.display(),
        steps.len()
    );

    let mut simulation = Simulation::start(description.widget)?;
    println!("{:<16} raw={:<10} {}", "mount", simulation.raw(), simulation.authority());

    for step in steps {
        let outcome = simulation.apply(step)?;
        println!(
            "{:<16} raw={:<10} {}",
            outcome.step.to_string(),
            outcome.raw,
            outcome.authority
        );
        for observed in &outcome.observed {
            println!("    {}", observed);
        }
    }

    let log = simulation.factory().log();
    debug!(
        "engine calls: {} constructed, {} set_value, {} update_settings, {} destroyed",
        log.construct_count(),
        log.set_value_count(),
        log.update_settings_count(),
        log.destroy_count()
    );
    Ok(())
}

fn cmd_renderers() -> Result<()> {
    for renderer in Renderer::ALL {
        println!("{}", renderer);
    }
    Ok(())
}
