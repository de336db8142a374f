use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::color::GradientSpec;

/// Easing applied to the opacity cross-fade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FadeCurve {
    Linear,
    /// Rendered as the CSS `ease` keyword.
    #[default]
    Smoothstep,
    EaseInOut,
}

/// Style knobs for the background. Every field has a default.
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundOptions {
    /// Saturation (percent) of the selected slice.
    pub saturated_percent: f64,
    /// Saturation (percent) of every other slice.
    pub desaturated_percent: f64,
    /// Width, in percentage points, of the soft band around each split.
    pub boundary_fuzziness: f64,
    pub gradient: GradientSpec,
    /// How long the cross-fade between successive styles takes.
    pub transition_time: Duration,
    pub curve: FadeCurve,
}

impl Default for BackgroundOptions {
    fn default() -> Self {
        Self {
            saturated_percent: 95.0,
            desaturated_percent: 35.0,
            boundary_fuzziness: 1.5,
            gradient: GradientSpec::default(),
            transition_time: Duration::from_secs(1),
            curve: FadeCurve::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("a background needs at least one slice")]
    NoSlices,
    #[error("expected {expected} splits, got {got}")]
    SplitCount { expected: usize, got: usize },
    #[error("split index {index} is out of range for {count} splits")]
    SplitIndex { index: usize, count: usize },
}

/// The required inputs: how many slices there are, which one is active,
/// and optionally where the boundaries sit.
///
/// Only the shape is checked. Split ordering, split range and the selected
/// slice index are taken as given.
#[derive(Debug, Clone, PartialEq)]
pub struct SliceLayout {
    num_slices: usize,
    selected_slice: usize,
    splits: Option<Vec<f64>>,
}

impl SliceLayout {
    pub fn new(
        num_slices: usize,
        selected_slice: usize,
        splits: Option<Vec<f64>>,
    ) -> Result<Self, LayoutError> {
        if num_slices == 0 {
            return Err(LayoutError::NoSlices);
        }
        if let Some(splits) = &splits {
            if splits.len() != num_slices - 1 {
                return Err(LayoutError::SplitCount {
                    expected: num_slices - 1,
                    got: splits.len(),
                });
            }
        }
        Ok(Self {
            num_slices,
            selected_slice,
            splits,
        })
    }

    pub fn num_slices(&self) -> usize {
        self.num_slices
    }

    pub fn selected_slice(&self) -> usize {
        self.selected_slice
    }

    pub fn splits(&self) -> Option<&[f64]> {
        self.splits.as_deref()
    }

    pub fn select(&mut self, slice: usize) {
        self.selected_slice = slice;
    }

    pub fn set_split(&mut self, index: usize, value: f64) -> Result<(), LayoutError> {
        let num_slices = self.num_slices;
        let splits = self
            .splits
            .get_or_insert_with(|| even_splits(num_slices));
        match splits.get_mut(index) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(LayoutError::SplitIndex {
                index,
                count: num_slices - 1,
            }),
        }
    }

    /// Identity of the boundary geometry; changes whenever the splits do.
    pub fn splits_key(&self) -> String {
        splits_key(self.splits())
    }
}

/// `i / n` for every interior boundary.
pub fn even_splits(num_slices: usize) -> Vec<f64> {
    (1..num_slices)
        .map(|index| index as f64 / num_slices as f64)
        .collect()
}

pub fn splits_key(splits: Option<&[f64]>) -> String {
    splits
        .unwrap_or_default()
        .iter()
        .map(f64::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let options = BackgroundOptions::default();
        assert_eq!(options.saturated_percent, 95.0);
        assert_eq!(options.desaturated_percent, 35.0);
        assert_eq!(options.boundary_fuzziness, 1.5);
        assert_eq!(options.transition_time, Duration::from_secs(1));
        assert_eq!(options.gradient, GradientSpec::default());
    }

    #[test]
    fn layout_requires_a_slice() {
        assert_eq!(SliceLayout::new(0, 0, None), Err(LayoutError::NoSlices));
    }

    #[test]
    fn layout_requires_matching_split_count() {
        assert!(matches!(
            SliceLayout::new(3, 0, Some(vec![0.5])),
            Err(LayoutError::SplitCount { expected: 2, got: 1 })
        ));
        assert!(SliceLayout::new(3, 0, Some(vec![0.25, 0.75])).is_ok());
    }

    #[test]
    fn layout_accepts_out_of_range_selection() {
        let layout = SliceLayout::new(2, 7, None).unwrap();
        assert_eq!(layout.selected_slice(), 7);
    }

    #[test]
    fn moving_a_split_materializes_even_splits() {
        let mut layout = SliceLayout::new(4, 0, None).unwrap();
        assert_eq!(layout.splits_key(), "");
        layout.set_split(1, 0.6).unwrap();
        assert_eq!(layout.splits(), Some(&[0.25, 0.6, 0.75][..]));
        assert_eq!(layout.splits_key(), "0.25,0.6,0.75");
        assert!(layout.set_split(3, 0.9).is_err());
    }
}
