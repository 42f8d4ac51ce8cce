//! rtfx CLI
//!
//! Command-line front end for the rtfx effects engine.

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::{debug, info};

use rtfx::cli::{commands, Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    debug!("rtfx v{}", env!("CARGO_PKG_VERSION"));

    let settings = commands::load_settings(cli.config.as_deref()).with_context(|| {
        format!(
            "failed to load settings from {}",
            cli.config
                .as_deref()
                .map(|p| p.display().to_string())
                .unwrap_or_default()
        )
    })?;

    match cli.command {
        Commands::Render {
            input,
            output,
            effects,
            format,
            tail_ms,
            json,
        } => {
            let stats = commands::render(&settings, &input, &output, &effects, format, tail_ms)
                .with_context(|| format!("failed to render {}", input.display()))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            }
            info!(
                "{} blocks, {} underruns",
                stats.blocks_rendered, stats.underruns
            );
        }
        Commands::Tone {
            output,
            frequency,
            duration,
            amplitude,
            impulse,
        } => {
            commands::tone(&settings, &output, frequency, duration, amplitude, impulse)
                .with_context(|| format!("failed to write {}", output.display()))?;
        }
        Commands::Info { json } => commands::info(&settings, json)?,
        #[cfg(feature = "live")]
        Commands::Live { effects } => {
            let stats = commands::live(&settings, &effects).context("live session failed")?;
            println!(
                "{} blocks rendered, {} underruns, {} dropped",
                stats.blocks_rendered, stats.underruns, stats.dropped_blocks
            );
        }
    }

    Ok(())
}
