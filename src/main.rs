//! chipwave - Procedural chiptune music and sound effects

use anyhow::{bail, Context, Result};
use chipwave::compositions::{self, Composition, CompositionKind};
use chipwave::config;
use chipwave::engine::Engine;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod cli;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    match cli.command {
        Commands::Render {
            names,
            themes,
            effects,
            score,
            output,
        } => {
            let mut cfg = config::load_or_default(&cli.config)?;
            if let Some(dir) = output {
                cfg.output.dir = dir;
            }

            let batch = select(&names, themes, effects, &score)?;
            std::fs::create_dir_all(&cfg.output.dir)
                .with_context(|| format!("failed to create {:?}", cfg.output.dir))?;

            println!(
                "Rendering {} composition(s) to {:?} at {} Hz...",
                batch.len(),
                cfg.output.dir,
                cfg.audio.sample_rate
            );

            let engine = Engine::new(cfg);
            let report = engine.write_all(&batch)?;

            for rendered in &report.written {
                println!(
                    "  {:<20} {:>7.2}s  {}",
                    rendered.id,
                    rendered.duration_secs,
                    rendered.path.display()
                );
            }
            for (id, e) in &report.failed {
                println!("  {:<20} FAILED: {:#}", id, e);
            }

            println!(
                "\n{} written, {} failed",
                report.written.len(),
                report.failed.len()
            );
            if !report.is_success() {
                bail!("{} composition(s) failed to render", report.failed.len());
            }
        }

        Commands::List => {
            let cfg = config::load_or_default(&cli.config)?;
            let beat = cfg.beat();

            println!("Built-in compositions:\n");
            for composition in compositions::catalog() {
                let kind = match composition.kind {
                    CompositionKind::Theme => "theme",
                    CompositionKind::Effect => "effect",
                };
                println!(
                    "  {:<20} {:<7} {} ch {:>7.2}s  {}",
                    composition.id,
                    kind,
                    composition.channels.len(),
                    composition.duration_secs(beat),
                    composition.description
                );
            }
        }

        Commands::Show { name } => {
            let composition = compositions::find(&name)?;
            print!("{}", composition.to_yaml()?);
        }

        Commands::Check => {
            println!("Checking configuration at {:?}...", cli.config);

            match config::load_config(&cli.config) {
                Ok(cfg) => {
                    println!("Configuration is valid!");
                    println!("  Sample rate: {} Hz", cfg.audio.sample_rate);
                    println!("  BPM: {}", cfg.audio.bpm);
                    println!("  Mix peak: {}", cfg.master.mix_peak);
                    println!("  Output peak: {}", cfg.master.output_peak);
                    println!("  Seed: {}", cfg.master.seed);
                    println!("  Output: {:?}", cfg.output.dir);
                }
                Err(e) => {
                    println!("Configuration is invalid: {:#}", e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Init => {
            let example_config = include_str!("../chipwave.example.yaml");

            let path = &cli.config;
            if path.exists() {
                println!("{:?} already exists. Not overwriting.", path);
            } else {
                std::fs::write(path, example_config)?;
                println!("Created {:?} with example configuration.", path);
            }
        }
    }

    Ok(())
}

/// Work out which compositions a render command asked for
fn select(
    names: &[String],
    themes: bool,
    effects: bool,
    scores: &[PathBuf],
) -> Result<Vec<Composition>> {
    let mut batch = Vec::new();

    for path in scores {
        batch.push(load_score(path)?);
    }
    for name in names {
        batch.push(compositions::find(name)?);
    }

    if batch.is_empty() {
        batch = compositions::catalog()
            .into_iter()
            .filter(|c| match c.kind {
                CompositionKind::Theme => !effects,
                CompositionKind::Effect => !themes,
            })
            .collect();
    }

    Ok(batch)
}

fn load_score(path: &Path) -> Result<Composition> {
    let yaml = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read score: {:?}", path))?;
    Composition::from_yaml(&yaml).with_context(|| format!("failed to parse score: {:?}", path))
}
