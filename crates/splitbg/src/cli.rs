use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use slicegrad::{FadeCurve, GradientSpec};

#[derive(Parser, Debug)]
#[command(
    name = "splitbg",
    author,
    version,
    about = "Split, cross-fading gradient backgrounds"
)]
pub struct Cli {
    #[command(flatten)]
    pub input: InputArgs,
    #[command(subcommand)]
    pub command: Command,
}

/// Inputs shared by every command. Flags override the config file.
#[derive(Args, Debug)]
pub struct InputArgs {
    /// Background configuration TOML file.
    #[arg(long, global = true, value_name = "FILE", env = "SPLITBG_CONFIG")]
    pub config: Option<PathBuf>,

    /// Number of slices.
    #[arg(long, global = true, value_name = "N")]
    pub slices: Option<usize>,

    /// Index of the selected slice.
    #[arg(long, global = true, value_name = "INDEX")]
    pub select: Option<usize>,

    /// Comma-separated split positions in 0..1 (e.g. `0.25,0.75`).
    #[arg(long, global = true, value_name = "LIST", value_parser = parse_splits)]
    pub splits: Option<Splits>,

    /// Gradient as `H:L,H:L` or `#hex,#hex`.
    #[arg(long, global = true, value_name = "GRADIENT", value_parser = parse_gradient, conflicts_with = "preset")]
    pub gradient: Option<GradientSpec>,

    /// Named gradient from the config's `[presets]` or the built-in set.
    #[arg(long, global = true, value_name = "NAME")]
    pub preset: Option<String>,

    /// Saturation of the selected slice, in percent.
    #[arg(long, global = true, value_name = "PERCENT")]
    pub saturated: Option<f64>,

    /// Saturation of the other slices, in percent.
    #[arg(long, global = true, value_name = "PERCENT")]
    pub desaturated: Option<f64>,

    /// Width of the soft band around each split, in percentage points.
    #[arg(long, global = true, value_name = "PERCENT", allow_negative_numbers = true)]
    pub fuzziness: Option<f64>,

    /// Cross-fade duration in seconds.
    #[arg(long, global = true, value_name = "SECONDS")]
    pub transition: Option<f64>,

    /// Cross-fade easing: `linear`, `smoothstep`, or `ease-in-out`.
    #[arg(long, global = true, value_name = "CURVE", value_parser = parse_curve)]
    pub curve: Option<FadeCurve>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the gradient description for the current layout.
    Style,
    /// Print the computed gradient stops.
    Stops {
        /// Emit JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Parse a gradient description back into stops.
    Inspect {
        #[arg(value_name = "DESCRIPTION")]
        description: String,
    },
    /// Drive the cross-fade through a sequence of steps and report each surface write.
    Simulate(SimulateArgs),
    /// Emit the two surface elements as HTML.
    Html,
    /// Map a horizontal position (0..1) to the slice it falls in.
    Pick {
        #[arg(value_name = "FRACTION", allow_negative_numbers = true)]
        fraction: f64,
    },
}

#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Steps: a slice index selects it, `sN=V` moves split N to V (e.g. `1,2,s0=0.4,0`).
    #[arg(long, value_name = "STEPS", value_delimiter = ',', value_parser = parse_step)]
    pub steps: Vec<Step>,

    /// Time between steps, in milliseconds.
    #[arg(long, value_name = "MILLISECONDS", default_value_t = 1000)]
    pub interval_ms: u64,

    /// Offset after each step at which opacities are sampled, in milliseconds.
    #[arg(long, value_name = "MILLISECONDS")]
    pub sample_ms: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Splits(pub Vec<f64>);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    Select(usize),
    MoveSplit { index: usize, value: f64 },
}

pub fn parse() -> Cli {
    Cli::parse()
}

pub fn parse_splits(value: &str) -> Result<Splits, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(Splits(Vec::new()));
    }
    trimmed
        .split(',')
        .map(|raw| {
            raw.trim()
                .parse::<f64>()
                .map_err(|_| format!("invalid split position '{}'", raw.trim()))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Splits)
}

pub fn parse_gradient(value: &str) -> Result<GradientSpec, String> {
    value.parse::<GradientSpec>().map_err(|err| err.to_string())
}

pub fn parse_curve(value: &str) -> Result<FadeCurve, String> {
    let normalized = value.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "linear" => Ok(FadeCurve::Linear),
        "smoothstep" | "ease" => Ok(FadeCurve::Smoothstep),
        "ease-in-out" | "easeinout" => Ok(FadeCurve::EaseInOut),
        other => Err(format!(
            "unknown curve '{other}'; expected linear, smoothstep, or ease-in-out"
        )),
    }
}

pub fn parse_step(value: &str) -> Result<Step, String> {
    let trimmed = value.trim();
    if let Some(rest) = trimmed.strip_prefix('s') {
        let (index, position) = rest
            .split_once('=')
            .ok_or_else(|| format!("invalid split step '{trimmed}'; expected sN=V"))?;
        let index = index
            .trim()
            .parse::<usize>()
            .map_err(|_| format!("invalid split index in '{trimmed}'"))?;
        let value = position
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("invalid split position in '{trimmed}'"))?;
        return Ok(Step::MoveSplit { index, value });
    }

    trimmed
        .parse::<usize>()
        .map(Step::Select)
        .map_err(|_| format!("invalid step '{trimmed}'; expected a slice index or sN=V"))
}
