//! Measure binary - prints the pixel width of a piece of text
//!
//! Usage:
//!   cargo run --bin measure -- "Hello world"
//!   cargo run --bin measure -- "Hello world" --font Roboto --size 14
//!   cargo run --bin measure -- "Hello world" --max 80     # also run the width check
//!   cargo run --bin measure -- "Hello world" --approximate
//!
//! Optional environment variables:
//! - FONT_DIRS (comma separated extra font directories)
//! - DEFAULT_FONT (defaults to Arial)
//! - DEFAULT_FONT_SIZE (defaults to 16)

use anyhow::{bail, Context, Result};
use crowdin_width_qa::config::Config;
use crowdin_width_qa::measurement::{detect_measurer, ApproximateMeasurer, FontSpec, TextMeasurer};
use crowdin_width_qa::qa::evaluate;
use std::sync::Arc;

struct Args {
    text: String,
    font: Option<String>,
    size: Option<u32>,
    max: Option<u32>,
    approximate: bool,
}

fn parse_args() -> Result<Args> {
    let mut args = std::env::args().skip(1);
    let mut text = None;
    let mut font = None;
    let mut size = None;
    let mut max = None;
    let mut approximate = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--font" => font = Some(args.next().context("--font needs a value")?),
            "--size" => {
                let v = args.next().context("--size needs a value")?;
                size = Some(v.parse().with_context(|| format!("Invalid --size: {}", v))?);
            }
            "--max" => {
                let v = args.next().context("--max needs a value")?;
                max = Some(v.parse().with_context(|| format!("Invalid --max: {}", v))?);
            }
            "--approximate" => approximate = true,
            _ if text.is_none() => text = Some(arg),
            other => bail!("Unexpected argument: {}", other),
        }
    }

    Ok(Args {
        text: text.context("Usage: measure <text> [--font NAME] [--size PX] [--max PX] [--approximate]")?,
        font,
        size,
        max,
        approximate,
    })
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("crowdin_width_qa=warn".parse()?),
        )
        .init();

    let args = parse_args()?;
    let config = Config::from_env()?;

    let defaults = config.default_font_spec();
    let font = FontSpec::new(
        args.font.unwrap_or(defaults.family),
        args.size.unwrap_or(defaults.size),
    );

    let measurer: Arc<dyn TextMeasurer> = if args.approximate {
        Arc::new(ApproximateMeasurer)
    } else {
        detect_measurer(&config.font_dirs)
    };

    let width = measurer.measure(&args.text, &font);
    println!("{} px ({})", width, font);

    if let Some(max) = args.max {
        let evaluation = evaluate(width, Some(max));
        match evaluation.message {
            Some(message) => {
                println!("✗ {}", message);
                std::process::exit(1);
            }
            None => println!("✓ Within maximum of {}px", max),
        }
    }

    Ok(())
}
