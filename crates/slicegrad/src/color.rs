use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorError {
    #[error("invalid hex color '{0}'; expected #rgb or #rrggbb")]
    InvalidHex(String),
    #[error("invalid gradient '{0}'; expected 'H:L,H:L' or '#hex,#hex'")]
    InvalidGradient(String),
}

/// One gradient endpoint: hue in degrees and lightness in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct HueLightness {
    pub hue: f64,
    pub lightness: f64,
}

impl HueLightness {
    pub const fn new(hue: f64, lightness: f64) -> Self {
        Self { hue, lightness }
    }

    /// Converts a `#rrggbb` / `#rgb` color, rounding each HSL channel to an integer.
    pub fn from_hex(input: &str) -> Result<Self, ColorError> {
        let [r, g, b] = parse_hex(input)?;
        let [hue, _saturation, lightness] = rgb_to_hsl(r, g, b);
        Ok(Self::new(hue.round(), lightness.round()))
    }
}

impl From<[f64; 2]> for HueLightness {
    fn from([hue, lightness]: [f64; 2]) -> Self {
        Self::new(hue, lightness)
    }
}

impl From<HueLightness> for [f64; 2] {
    fn from(value: HueLightness) -> Self {
        [value.hue, value.lightness]
    }
}

/// Gradient as supplied by a caller, before normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GradientSpec {
    HueLightness([HueLightness; 2]),
    Hex([String; 2]),
}

impl GradientSpec {
    /// Resolves both endpoints to hue/lightness. Array-form input passes through untouched.
    pub fn normalize(&self) -> Result<Gradient, ColorError> {
        match self {
            GradientSpec::HueLightness([start, stop]) => Ok(Gradient::new(*start, *stop)),
            GradientSpec::Hex([start, stop]) => Ok(Gradient::new(
                HueLightness::from_hex(start)?,
                HueLightness::from_hex(stop)?,
            )),
        }
    }
}

impl Default for GradientSpec {
    fn default() -> Self {
        let gradient = Gradient::default();
        GradientSpec::HueLightness([gradient.start, gradient.stop])
    }
}

impl From<Gradient> for GradientSpec {
    fn from(gradient: Gradient) -> Self {
        GradientSpec::HueLightness([gradient.start, gradient.stop])
    }
}

impl FromStr for GradientSpec {
    type Err = ColorError;

    /// Accepts `45:76,1:73` or `#79CBCA,#E684AE`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || ColorError::InvalidGradient(value.to_string());
        let (first, second) = value.split_once(',').ok_or_else(invalid)?;
        let (first, second) = (first.trim(), second.trim());

        if first.contains(':') || second.contains(':') {
            let endpoint = |raw: &str| -> Result<HueLightness, ColorError> {
                let (hue, lightness) = raw.split_once(':').ok_or_else(invalid)?;
                let hue = hue.trim().parse::<f64>().map_err(|_| invalid())?;
                let lightness = lightness.trim().parse::<f64>().map_err(|_| invalid())?;
                Ok(HueLightness::new(hue, lightness))
            };
            return Ok(GradientSpec::HueLightness([
                endpoint(first)?,
                endpoint(second)?,
            ]));
        }

        parse_hex(first)?;
        parse_hex(second)?;
        Ok(GradientSpec::Hex([first.to_string(), second.to_string()]))
    }
}

impl fmt::Display for GradientSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GradientSpec::HueLightness([a, b]) => {
                write!(f, "{}:{},{}:{}", a.hue, a.lightness, b.hue, b.lightness)
            }
            GradientSpec::Hex([a, b]) => write!(f, "{a},{b}"),
        }
    }
}

/// A normalized gradient ready for stop computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gradient {
    pub start: HueLightness,
    pub stop: HueLightness,
}

impl Gradient {
    pub const fn new(start: HueLightness, stop: HueLightness) -> Self {
        Self { start, stop }
    }

    /// Interpolates hue and lightness. Fractions outside 0..1 extrapolate.
    pub fn lerp(&self, fraction: f64) -> HueLightness {
        HueLightness::new(
            lerp(self.start.hue, self.stop.hue, fraction),
            lerp(self.start.lightness, self.stop.lightness, fraction),
        )
    }
}

impl Default for Gradient {
    fn default() -> Self {
        Self::new(HueLightness::new(45.0, 76.0), HueLightness::new(1.0, 73.0))
    }
}

fn lerp(lower: f64, upper: f64, fraction: f64) -> f64 {
    lower + fraction * (upper - lower)
}

fn parse_hex(input: &str) -> Result<[u8; 3], ColorError> {
    let invalid = || ColorError::InvalidHex(input.to_string());
    let digits = input.trim();
    let digits = digits.strip_prefix('#').unwrap_or(digits);
    if !digits.chars().all(|ch| ch.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let expanded: String = match digits.len() {
        6 => digits.to_string(),
        3 => digits.chars().flat_map(|ch| [ch, ch]).collect(),
        _ => return Err(invalid()),
    };

    let channel = |index: usize| {
        u8::from_str_radix(&expanded[index * 2..index * 2 + 2], 16).map_err(|_| invalid())
    };
    Ok([channel(0)?, channel(1)?, channel(2)?])
}

/// Unrounded HSL with hue in `[0, 360)` and saturation/lightness in percent.
fn rgb_to_hsl(r: u8, g: u8, b: u8) -> [f64; 3] {
    let r = f64::from(r) / 255.0;
    let g = f64::from(g) / 255.0;
    let b = f64::from(b) / 255.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let mut hue = if delta == 0.0 {
        0.0
    } else if max == r {
        (g - b) / delta
    } else if max == g {
        2.0 + (b - r) / delta
    } else {
        4.0 + (r - g) / delta
    };
    hue = (hue * 60.0).min(360.0);
    if hue < 0.0 {
        hue += 360.0;
    }

    let lightness = (min + max) / 2.0;
    let saturation = if delta == 0.0 {
        0.0
    } else if lightness <= 0.5 {
        delta / (max + min)
    } else {
        delta / (2.0 - max - min)
    };

    [hue, saturation * 100.0, lightness * 100.0]
}
