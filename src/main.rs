use thrustlab::config::Config;
use thrustlab::pipeline::Pipeline;
use thrustlab::render::{Renderer, TerminalRenderer};
use anyhow::{Context, Result};
use clap::Parser;
use std::{io, path::PathBuf};

#[derive(Debug, Parser)]
#[command(version, about)]
struct CLI {
    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of standard deviations from the mean beyond which a sample is anomalous.
    #[arg(long)]
    threshold_std: Option<f64>,

    /// Do not show the thrust plot.
    #[arg(long)]
    no_plot: bool,
}

fn main() {
    env_logger::Builder::new()
        .format_timestamp_millis()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    if let Err(error) = run_cli() {
        log::error!("{error:#?}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<()> {
    let args = CLI::parse();
    log::info!("{args:#?}");

    let mut cfg = match &args.config {
        Some(file) => Config::from_file(file).context("failed to construct cfg")?,
        None => Config::default(),
    };
    if let Some(threshold_std) = args.threshold_std {
        cfg.detection.threshold_std = threshold_std;
    }
    if args.no_plot {
        cfg.output.plot = false;
    }

    let mut renderer = None;
    if cfg.output.plot {
        if TerminalRenderer::is_available() {
            renderer = Some(TerminalRenderer);
        } else {
            log::warn!("stdout is not a terminal, skipping plot");
        }
    }

    let pipeline = Pipeline::new(cfg).context("failed to construct pipeline")?;
    pipeline
        .run(
            &mut io::stdout().lock(),
            renderer.as_mut().map(|r| r as &mut dyn Renderer),
        )
        .context("failed to run pipeline")?;

    Ok(())
}
