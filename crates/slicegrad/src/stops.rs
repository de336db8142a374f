//! Gradient stop computation for slice-highlighted backgrounds.
//!
//! The axis is cut into `num_slices` slices. Every slice is painted with the
//! desaturated level except the selected one, and each boundary becomes a
//! pair of stops straddling the split so the change in saturation ramps over
//! a band `fuzziness` percentage points wide:
//!
//! ```text
//!   0%        lower  upper        lower  upper       100%
//!   |  slice 0  |  ~~  |  slice 1  |  ~~  |  slice 2  |
//! ```
//!
//! Nothing here clamps or sorts. Unsorted splits or a band wider than the gap
//! between splits yield out-of-order stops, and bands that poke past either
//! end extrapolate the gradient.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::Gradient;

const DESCRIPTION_PREFIX: &str = "linear-gradient(to right,";

/// A single color anchor: hue in degrees, saturation/lightness/position in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub hue: f64,
    pub saturation: f64,
    pub lightness: f64,
    pub position: f64,
}

impl fmt::Display for Stop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hsl({}, {}%, {}%) {}%",
            self.hue, self.saturation, self.lightness, self.position
        )
    }
}

/// Saturation levels for selected and unselected slices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Saturation {
    pub saturated: f64,
    pub desaturated: f64,
}

impl Saturation {
    fn for_slice(&self, slice: usize, selected: usize) -> f64 {
        if slice == selected {
            self.saturated
        } else {
            self.desaturated
        }
    }
}

/// Everything `compute_stops` needs apart from the gradient itself.
#[derive(Debug, Clone, Copy)]
pub struct StopParams<'a> {
    pub selected_slice: usize,
    pub num_slices: usize,
    pub saturation: Saturation,
    pub boundary_fuzziness: f64,
    pub splits: Option<&'a [f64]>,
}

/// Emits `2 + 2 * (num_slices - 1)` stops; a single slice yields just the two ends.
pub fn compute_stops(gradient: &Gradient, params: &StopParams<'_>) -> Vec<Stop> {
    let StopParams {
        selected_slice,
        num_slices,
        saturation,
        boundary_fuzziness,
        splits,
    } = *params;

    let boundaries = num_slices.saturating_sub(1);
    let mut stops = Vec::with_capacity(2 + 2 * boundaries);

    stops.push(Stop {
        hue: gradient.start.hue,
        saturation: saturation.for_slice(0, selected_slice),
        lightness: gradient.start.lightness,
        position: 0.0,
    });

    let half_band = boundary_fuzziness / 2.0 / 100.0;
    for index in 1..num_slices {
        let percentage = splits
            .and_then(|splits| splits.get(index - 1).copied())
            .unwrap_or(index as f64 / num_slices as f64);
        let lower = percentage - half_band;
        let upper = percentage + half_band;

        let below = gradient.lerp(lower);
        stops.push(Stop {
            hue: below.hue,
            saturation: saturation.for_slice(index - 1, selected_slice),
            lightness: below.lightness,
            position: lower * 100.0,
        });

        let above = gradient.lerp(upper);
        stops.push(Stop {
            hue: above.hue,
            saturation: saturation.for_slice(index, selected_slice),
            lightness: above.lightness,
            position: upper * 100.0,
        });
    }

    stops.push(Stop {
        hue: gradient.stop.hue,
        saturation: match num_slices.checked_sub(1) {
            Some(last) => saturation.for_slice(last, selected_slice),
            None => saturation.desaturated,
        },
        lightness: gradient.stop.lightness,
        position: 100.0,
    });

    stops
}

/// Serializes stops, in the order given, as a left-to-right CSS linear gradient.
pub fn describe(stops: &[Stop]) -> String {
    let body = stops
        .iter()
        .map(Stop::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    format!("linear-gradient(to right, {body})")
}

/// `describe(compute_stops(..))`.
pub fn background_style(gradient: &Gradient, params: &StopParams<'_>) -> String {
    describe(&compute_stops(gradient, params))
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("gradient description must start with '{DESCRIPTION_PREFIX}'")]
    MissingPrefix,
    #[error("gradient description is missing its closing parenthesis")]
    Unterminated,
    #[error("malformed stop '{0}'")]
    MalformedStop(String),
}

/// Parses a description produced by [`describe`] back into its stops.
pub fn parse_description(input: &str) -> Result<Vec<Stop>, ParseError> {
    let body = input
        .trim()
        .strip_prefix(DESCRIPTION_PREFIX)
        .ok_or(ParseError::MissingPrefix)?
        .strip_suffix(')')
        .ok_or(ParseError::Unterminated)?;

    let mut stops = Vec::new();
    let mut rest = body.trim();
    while !rest.is_empty() {
        let close = rest
            .find(')')
            .ok_or_else(|| ParseError::MalformedStop(rest.to_string()))?;
        let after = &rest[close + 1..];
        let (position, remainder) = match after.find(',') {
            Some(comma) => (&after[..comma], &after[comma + 1..]),
            None => (after, ""),
        };
        let fragment = &rest[..close + 1 + position.len()];
        stops.push(parse_stop(&rest[..=close], position).ok_or_else(|| {
            ParseError::MalformedStop(fragment.trim().to_string())
        })?);
        rest = remainder.trim();
    }

    Ok(stops)
}

fn parse_stop(color: &str, position: &str) -> Option<Stop> {
    let inner = color.trim().strip_prefix("hsl(")?.strip_suffix(')')?;
    let mut channels = inner.split(',').map(str::trim);
    let hue = channels.next()?.parse().ok()?;
    let saturation = parse_percent(channels.next()?)?;
    let lightness = parse_percent(channels.next()?)?;
    if channels.next().is_some() {
        return None;
    }
    Some(Stop {
        hue,
        saturation,
        lightness,
        position: parse_percent(position.trim())?,
    })
}

fn parse_percent(value: &str) -> Option<f64> {
    value.strip_suffix('%')?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::HueLightness;

    const SATURATION: Saturation = Saturation {
        saturated: 95.0,
        desaturated: 35.0,
    };

    fn params(selected: usize, slices: usize, fuzz: f64, splits: Option<&[f64]>) -> StopParams<'_> {
        StopParams {
            selected_slice: selected,
            num_slices: slices,
            saturation: SATURATION,
            boundary_fuzziness: fuzz,
            splits,
        }
    }

    fn hue_ramp() -> Gradient {
        Gradient::new(HueLightness::new(0.0, 50.0), HueLightness::new(100.0, 50.0))
    }

    #[test]
    fn single_slice_has_only_end_stops() {
        let stops = compute_stops(&Gradient::default(), &params(0, 1, 1.5, None));
        assert_eq!(stops.len(), 2);
        assert_eq!(stops[0].position, 0.0);
        assert_eq!(stops[1].position, 100.0);
        assert!(stops.iter().all(|stop| stop.saturation == 95.0));
    }

    #[test]
    fn stop_count_grows_with_slices() {
        for slices in 1..8 {
            let stops = compute_stops(&Gradient::default(), &params(0, slices, 1.5, None));
            assert_eq!(stops.len(), 2 + 2 * (slices - 1));
        }
    }

    #[test]
    fn zero_fuzziness_gives_hard_edges() {
        let splits = [0.5];
        let stops = compute_stops(&hue_ramp(), &params(0, 2, 0.0, Some(&splits)));
        let (lower, upper) = (stops[1], stops[2]);
        assert_eq!(lower.position, 50.0);
        assert_eq!(upper.position, 50.0);
        assert_eq!(lower.hue, 50.0);
        assert_eq!(upper.hue, 50.0);
        assert_eq!(lower.lightness, upper.lightness);
        assert_eq!(lower.saturation, 95.0);
        assert_eq!(upper.saturation, 35.0);
    }

    #[test]
    fn even_split_is_used_without_splits() {
        let stops = compute_stops(&hue_ramp(), &params(1, 4, 0.0, None));
        let positions: Vec<f64> = stops.iter().map(|stop| stop.position).collect();
        assert_eq!(positions, vec![0.0, 25.0, 25.0, 50.0, 50.0, 75.0, 75.0, 100.0]);
        let saturations: Vec<f64> = stops.iter().map(|stop| stop.saturation).collect();
        assert_eq!(
            saturations,
            vec![35.0, 35.0, 95.0, 95.0, 35.0, 35.0, 35.0, 35.0]
        );
    }

    #[test]
    fn fuzzy_band_straddles_each_split() {
        let splits = [0.25, 0.75];
        let stops = compute_stops(&hue_ramp(), &params(2, 3, 2.0, Some(&splits)));
        assert!((stops[1].position - 24.0).abs() < 1e-9);
        assert!((stops[2].position - 26.0).abs() < 1e-9);
        assert!((stops[3].position - 74.0).abs() < 1e-9);
        assert!((stops[4].position - 76.0).abs() < 1e-9);
        assert!((stops[1].hue - 24.0).abs() < 1e-9);
        assert_eq!(stops[5].saturation, 95.0);
        assert_eq!(stops[4].saturation, 95.0);
        assert_eq!(stops[3].saturation, 35.0);
    }

    #[test]
    fn sorted_splits_with_small_band_stay_ordered() {
        let splits = [0.1, 0.4, 0.45, 0.9];
        let stops = compute_stops(&Gradient::default(), &params(3, 5, 1.5, Some(&splits)));
        assert!(stops
            .windows(2)
            .all(|pair| pair[0].position <= pair[1].position));
    }

    #[test]
    fn wide_band_extrapolates_without_clamping() {
        let splits = [0.01];
        let stops = compute_stops(&hue_ramp(), &params(0, 2, 10.0, Some(&splits)));
        assert!(stops[1].position < 0.0);
        assert!(stops[1].hue < 0.0);

        let splits = [0.99];
        let stops = compute_stops(&hue_ramp(), &params(0, 2, 10.0, Some(&splits)));
        assert!((stops[2].position - 104.0).abs() < 1e-9);
        assert!((stops[2].hue - 104.0).abs() < 1e-9);
        assert_eq!(stops[3].position, 100.0);
    }

    #[test]
    fn zero_slices_leave_the_end_stop_desaturated() {
        let stops = compute_stops(&hue_ramp(), &params(0, 0, 1.5, None));
        assert_eq!(stops.len(), 2);
        assert_eq!(stops[0].saturation, 95.0);
        assert_eq!(stops[1].saturation, 35.0);
    }

    #[test]
    fn unsorted_splits_are_kept_in_input_order() {
        let splits = [0.8, 0.2];
        let stops = compute_stops(&hue_ramp(), &params(0, 3, 0.0, Some(&splits)));
        assert_eq!(stops[1].position, 80.0);
        assert_eq!(stops[3].position, 20.0);
    }

    #[test]
    fn describes_stops_as_css() {
        let stops = compute_stops(&Gradient::default(), &params(0, 1, 1.5, None));
        assert_eq!(
            describe(&stops),
            "linear-gradient(to right, hsl(45, 95%, 76%) 0%, hsl(1, 95%, 73%) 100%)"
        );
    }

    #[test]
    fn description_parses_back_to_the_same_stops() {
        let splits = [0.25, 0.75];
        let stops = compute_stops(&Gradient::default(), &params(1, 3, 2.6, Some(&splits)));
        let parsed = parse_description(&describe(&stops)).unwrap();
        assert_eq!(parsed.len(), stops.len());
        for (a, b) in parsed.iter().zip(&stops) {
            assert!((a.hue - b.hue).abs() < 1e-9);
            assert!((a.saturation - b.saturation).abs() < 1e-9);
            assert!((a.lightness - b.lightness).abs() < 1e-9);
            assert!((a.position - b.position).abs() < 1e-9);
        }
    }

    #[test]
    fn rejects_foreign_descriptions() {
        assert_eq!(
            parse_description("radial-gradient(red, blue)"),
            Err(ParseError::MissingPrefix)
        );
        assert!(matches!(
            parse_description("linear-gradient(to right, rgb(1, 2, 3) 0%)"),
            Err(ParseError::MalformedStop(_))
        ));
    }
}
