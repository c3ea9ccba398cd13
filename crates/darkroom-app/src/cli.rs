//! Command-line parsing.

use anyhow::{anyhow, bail, Context, Result};
use std::path::PathBuf;

pub const USAGE: &str = "\
usage:
  darkroom meter [--config <path>] [--ticks <n>] [--luma <0-255>] [--overlay]
  darkroom reciprocity <metered seconds> <film stock | exponent>
  darkroom develop <base seconds> <reference °C> <actual °C>
  darkroom dilute <total volume> <ratio, e.g. 1+25>
  darkroom stocks";

/// A parsed invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Meter {
        config: Option<PathBuf>,
        ticks: u64,
        luma: u8,
        overlay: bool,
    },
    Reciprocity {
        metered: f64,
        stock: String,
    },
    Develop {
        base_seconds: u32,
        reference: f64,
        actual: f64,
    },
    Dilute {
        total: f64,
        ratio: String,
    },
    Stocks,
    Help,
}

fn number<T: std::str::FromStr>(value: Option<String>, what: &str) -> Result<T> {
    let value = value.ok_or_else(|| anyhow!("missing {}", what))?;
    value
        .parse()
        .map_err(|_| anyhow!("invalid {}: '{}'", what, value))
}

/// Parse arguments, excluding the program name.
pub fn parse<I>(args: I) -> Result<Command>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let Some(sub) = args.next() else {
        return Ok(Command::Help);
    };

    match sub.as_str() {
        "meter" => {
            let mut config = None;
            let mut ticks = 120;
            let mut luma = 128;
            let mut overlay = false;
            while let Some(flag) = args.next() {
                match flag.as_str() {
                    "--config" => {
                        config = Some(PathBuf::from(
                            args.next().context("--config needs a path")?,
                        ))
                    }
                    "--ticks" => ticks = number(args.next(), "tick count")?,
                    "--luma" => luma = number(args.next(), "luma")?,
                    "--overlay" => overlay = true,
                    other => bail!("unknown meter option '{}'", other),
                }
            }
            Ok(Command::Meter {
                config,
                ticks,
                luma,
                overlay,
            })
        }
        "reciprocity" => Ok(Command::Reciprocity {
            metered: number(args.next(), "metered seconds")?,
            stock: args
                .collect::<Vec<_>>()
                .join(" ")
                .trim()
                .to_string(),
        }),
        "develop" => Ok(Command::Develop {
            base_seconds: number(args.next(), "base seconds")?,
            reference: number(args.next(), "reference temperature")?,
            actual: number(args.next(), "actual temperature")?,
        }),
        "dilute" => Ok(Command::Dilute {
            total: number(args.next(), "total volume")?,
            ratio: args.next().context("missing ratio")?,
        }),
        "stocks" => Ok(Command::Stocks),
        "help" | "--help" | "-h" => Ok(Command::Help),
        other => bail!("unknown command '{}'\n{}", other, USAGE),
    }
}
