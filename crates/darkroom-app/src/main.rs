//! Darkroom - film photography exposure toolkit
//!
//! Entry point: live spot meter demo and one-shot darkroom calculators.

mod cli;

use anyhow::{anyhow, Result};
use cli::Command;
use darkroom_core::{format_aperture, format_shutter, Rgb8};
use darkroom_exposure::{
    format_duration, parse_ratio, DevelopmentStep, DilutionRequest, ReciprocityModel,
    StepCategory,
};
use darkroom_meter::{spawn_meter, MeterConfig, MeterSession, Scene, SyntheticSource};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    match cli::parse(std::env::args().skip(1))? {
        Command::Meter {
            config,
            ticks,
            luma,
            overlay,
        } => run_meter(config, ticks, luma, overlay).await,
        Command::Reciprocity { metered, stock } => {
            let model = match stock.parse::<f64>() {
                Ok(exponent) => ReciprocityModel::new("custom", exponent),
                Err(_) => ReciprocityModel::find(&stock)
                    .ok_or_else(|| anyhow!("unknown film stock '{}'", stock))?,
            };
            let adjusted = model.adjusted_time(metered)?;
            println!(
                "{} (p = {}): metered {} → expose {}",
                model.name,
                model.exponent,
                format_shutter(metered),
                format_shutter(adjusted)
            );
            Ok(())
        }
        Command::Develop {
            base_seconds,
            reference,
            actual,
        } => {
            let step =
                DevelopmentStep::new("Develop", StepCategory::Developer, base_seconds, reference);
            let adjusted = step.adjusted_seconds(actual)?;
            println!(
                "{} at {}°C → {} at {}°C",
                format_duration(base_seconds),
                reference,
                format_duration(adjusted),
                actual
            );
            Ok(())
        }
        Command::Dilute { total, ratio } => {
            let ratio = parse_ratio(&ratio)?;
            let d = DilutionRequest::new(total, ratio).compute()?;
            println!(
                "1+{}: {:.1} concentrate + {:.1} water = {}",
                ratio, d.concentrate, d.water, total
            );
            Ok(())
        }
        Command::Stocks => {
            for stock in ReciprocityModel::presets() {
                println!("{:<20} p = {}", stock.name, stock.exponent);
            }
            Ok(())
        }
        Command::Help => {
            println!("{}", cli::USAGE);
            Ok(())
        }
    }
}

async fn run_meter(
    config_path: Option<std::path::PathBuf>,
    ticks: u64,
    luma: u8,
    overlay: bool,
) -> Result<()> {
    let config = match config_path {
        Some(path) => {
            info!(path = %path.display(), "loading meter config");
            MeterConfig::load_from_file(&path)?
        }
        None => MeterConfig::default(),
    };

    let session = MeterSession::new(config)?;
    let source = SyntheticSource::new(1280, 720, Scene::Uniform(Rgb8::grey(luma)));
    let handle = spawn_meter(session, source);
    handle.set_zone_overlay(overlay);

    let mut readings = handle.readings();
    let mut seen = 0u64;
    while seen < ticks {
        if readings.changed().await.is_err() {
            break;
        }
        let Some(reading) = readings.borrow_and_update().clone() else {
            continue;
        };
        seen += 1;
        if seen % 30 == 0 || seen == ticks {
            info!(
                ev = %format!("{:.2}", reading.ev.smoothed),
                raw = %format!("{:.2}", reading.ev.raw),
                aperture = %format_aperture(reading.pair.aperture),
                shutter = %format_shutter(reading.pair.shutter),
                state = ?reading.state,
                overlay = reading.overlay.is_some(),
                "reading"
            );
        }
    }

    let summary = handle.stop().await?;
    info!(
        ticks = summary.ticks,
        readings = summary.readings,
        pending = summary.pending,
        skipped = summary.skipped,
        "meter finished"
    );
    Ok(())
}
