//! Command-line arguments for the `idxd-layout` driver.

use std::env;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::config::LayoutConfig;
use crate::geometry::LayoutBox;
use crate::scanner::DEFAULT_WORKERS;

pub const USAGE: &str = "\
Usage: idxd-layout [OPTIONS] <DIR>

Lays out the images in DIR as a justified grid and prints the rows and the
per-item render geometry.

Options:
  --width <PX>          Viewport width (default: 1280)
  --row-height <PX>     Grid row height (default: 220, env IDXD_ROW_HEIGHT)
  --gap <PX>            Gap between cells (default: 0, env IDXD_ROW_GAP)
  --justify-last-row    Stretch the last row too (env IDXD_JUSTIFY_LAST_ROW)
  --viewer <WxH>        Also fit the first item into a WxH viewer
  --workers <N>         Measuring threads (default: 4)
  --recursive           Descend into subdirectories
  -h, --help            Show this help";

pub const DEFAULT_VIEWPORT_WIDTH: f64 = 1280.0;

#[derive(Debug, Clone, PartialEq)]
pub struct CliArgs {
    pub path: PathBuf,
    pub width: f64,
    pub row_height: Option<f64>,
    pub gap: Option<f64>,
    pub justify_last_row: bool,
    pub viewer: Option<LayoutBox>,
    pub workers: usize,
    pub recursive: bool,
}

impl CliArgs {
    /// Flags take precedence over the environment.
    pub fn apply(&self, config: &mut LayoutConfig) {
        if let Some(row_height) = self.row_height {
            config.row_height = row_height;
        }
        if let Some(gap) = self.gap {
            config.gap = gap;
        }
        if self.justify_last_row {
            config.justify_last_row = true;
        }
    }
}

/// Parses the process arguments. Returns `None` when help was requested.
pub fn maybe_parse_args() -> Result<Option<CliArgs>> {
    parse_args(env::args().skip(1))
}

pub fn parse_args<I>(args: I) -> Result<Option<CliArgs>>
where
    I: IntoIterator<Item = String>,
{
    let mut path: Option<PathBuf> = None;
    let mut width = DEFAULT_VIEWPORT_WIDTH;
    let mut row_height = None;
    let mut gap = None;
    let mut justify_last_row = false;
    let mut viewer = None;
    let mut workers = DEFAULT_WORKERS;
    let mut recursive = false;

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(None),
            "--width" => {
                let value = args.next().context("Missing value for --width")?;
                width = value
                    .parse::<f64>()
                    .context("Failed to parse --width as a number")?;
            }
            "--row-height" => {
                let value = args.next().context("Missing value for --row-height")?;
                row_height = Some(
                    value
                        .parse::<f64>()
                        .context("Failed to parse --row-height as a number")?,
                );
            }
            "--gap" => {
                let value = args.next().context("Missing value for --gap")?;
                gap = Some(
                    value
                        .parse::<f64>()
                        .context("Failed to parse --gap as a number")?,
                );
            }
            "--justify-last-row" => justify_last_row = true,
            "--viewer" => {
                let value = args.next().context("Missing value for --viewer")?;
                viewer = Some(parse_box(&value)?);
            }
            "--workers" => {
                let value = args.next().context("Missing value for --workers")?;
                workers = value
                    .parse::<usize>()
                    .context("Failed to parse --workers as a positive integer")?;
            }
            "--recursive" => recursive = true,
            _ => {
                if arg.starts_with('-') {
                    bail!("Unknown argument: {}", arg);
                }
                if path.is_some() {
                    bail!("Unexpected extra path argument: {}", arg);
                }
                path = Some(PathBuf::from(arg));
            }
        }
    }

    if !(width > 0.0 && width.is_finite()) {
        bail!("--width must be greater than 0");
    }
    if workers == 0 {
        bail!("--workers must be greater than 0");
    }

    let path = path.context("Missing <DIR> argument")?;
    Ok(Some(CliArgs {
        path,
        width,
        row_height,
        gap,
        justify_last_row,
        viewer,
        workers,
        recursive,
    }))
}

fn parse_box(value: &str) -> Result<LayoutBox> {
    let (w, h) = value
        .split_once(|c: char| c == 'x' || c == 'X')
        .with_context(|| format!("Expected WxH for --viewer, got {:?}", value))?;
    let width = w
        .trim()
        .parse::<f64>()
        .context("Failed to parse --viewer width")?;
    let height = h
        .trim()
        .parse::<f64>()
        .context("Failed to parse --viewer height")?;
    Ok(LayoutBox::new(width, height))
}
