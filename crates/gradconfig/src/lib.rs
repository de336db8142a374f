use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use slicegrad::{BackgroundOptions, FadeCurve, GradientSpec, SliceLayout};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackgroundConfig {
    pub version: u32,
    #[serde(default = "default_num_slices")]
    pub num_slices: usize,
    #[serde(default)]
    pub selected_slice: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub splits: Option<Vec<f64>>,
    /// Name of an entry in `presets` to use as the gradient.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,
    #[serde(default)]
    pub style: Style,
    #[serde(default)]
    pub presets: BTreeMap<String, GradientSpec>,
}

/// Style overrides; anything left out falls back to `BackgroundOptions::default()`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Style {
    pub saturated_percent: Option<f64>,
    pub desaturated_percent: Option<f64>,
    pub boundary_fuzziness: Option<f64>,
    #[serde(
        default,
        deserialize_with = "deserialize_duration_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub transition_time: Option<Duration>,
    pub gradient: Option<GradientSpec>,
    pub curve: Option<FadeCurve>,
}

/// Gradients available by name without a config file.
pub fn builtin_presets() -> BTreeMap<String, GradientSpec> {
    BTreeMap::from([
        (
            "sea".to_string(),
            GradientSpec::Hex(["#79CBCA".to_string(), "#E684AE".to_string()]),
        ),
        ("sand".to_string(), GradientSpec::default()),
    ])
}

fn default_num_slices() -> usize {
    1
}

fn deserialize_duration_opt<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    struct Visitor;
    impl<'de> de::Visitor<'de> for Visitor {
        type Value = Option<Duration>;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a duration as number of seconds or human-readable string")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            humantime::parse_duration(v)
                .map(Some)
                .map_err(|err| E::custom(format!("invalid duration '{v}': {err}")))
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(Duration::from_secs(v)))
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if v < 0 {
                return Err(E::custom("duration must be non-negative"));
            }
            Ok(Some(Duration::from_secs(v as u64)))
        }

        fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if v.is_nan() || v.is_sign_negative() {
                return Err(E::custom("duration must be non-negative"));
            }
            Duration::try_from_secs_f64(v)
                .map(Some)
                .map_err(|err| E::custom(format!("invalid duration {v}s: {err}")))
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }
    }

    deserializer.deserialize_any(Visitor)
}

impl BackgroundConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let raw: BackgroundConfig = toml::from_str(input)?;
        raw.validate()?;
        Ok(raw)
    }

    /// Checks structure only. Split ordering, the selected slice index and
    /// the fuzziness sign are left to the renderer.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != 1 {
            return Err(ConfigError::Invalid(format!(
                "unsupported config version {}; expected 1",
                self.version
            )));
        }

        self.layout()?;

        if self.preset.is_some() && self.style.gradient.is_some() {
            return Err(ConfigError::Invalid(
                "set either `preset` or `style.gradient`, not both".into(),
            ));
        }

        if let Some(preset) = &self.preset {
            if self.preset(preset).is_none() {
                return Err(ConfigError::Invalid(format!(
                    "preset '{preset}' is neither defined under [presets] nor built in"
                )));
            }
        }

        for (name, gradient) in &self.presets {
            if name.trim().is_empty() {
                return Err(ConfigError::Invalid("preset name may not be empty".into()));
            }
            if let GradientSpec::Hex(_) = gradient {
                gradient.normalize().map_err(|err| {
                    ConfigError::Invalid(format!("preset '{name}': {err}"))
                })?;
            }
        }

        if let Some(gradient @ GradientSpec::Hex(_)) = &self.style.gradient {
            gradient
                .normalize()
                .map_err(|err| ConfigError::Invalid(format!("style.gradient: {err}")))?;
        }

        for (field, value) in [
            ("style.saturated_percent", self.style.saturated_percent),
            ("style.desaturated_percent", self.style.desaturated_percent),
            ("style.boundary_fuzziness", self.style.boundary_fuzziness),
        ] {
            if value.is_some_and(|v| !v.is_finite()) {
                return Err(ConfigError::Invalid(format!("{field} must be a finite number")));
            }
        }

        Ok(())
    }

    pub fn layout(&self) -> Result<SliceLayout, ConfigError> {
        SliceLayout::new(self.num_slices, self.selected_slice, self.splits.clone())
            .map_err(|err| ConfigError::Invalid(err.to_string()))
    }

    /// The gradient named by `preset`, else `style.gradient`.
    pub fn gradient(&self) -> Option<GradientSpec> {
        self.preset
            .as_deref()
            .and_then(|name| self.preset(name))
            .or_else(|| self.style.gradient.clone())
    }

    /// Looks `name` up in `[presets]`, then in [`builtin_presets`].
    pub fn preset(&self, name: &str) -> Option<GradientSpec> {
        self.presets
            .get(name)
            .cloned()
            .or_else(|| builtin_presets().remove(name))
    }

    pub fn options(&self) -> BackgroundOptions {
        let defaults = BackgroundOptions::default();
        BackgroundOptions {
            saturated_percent: self
                .style
                .saturated_percent
                .unwrap_or(defaults.saturated_percent),
            desaturated_percent: self
                .style
                .desaturated_percent
                .unwrap_or(defaults.desaturated_percent),
            boundary_fuzziness: self
                .style
                .boundary_fuzziness
                .unwrap_or(defaults.boundary_fuzziness),
            gradient: self.gradient().unwrap_or(defaults.gradient),
            transition_time: self.style.transition_time.unwrap_or(defaults.transition_time),
            curve: self.style.curve.unwrap_or(defaults.curve),
        }
    }
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            version: 1,
            num_slices: default_num_slices(),
            selected_slice: 0,
            splits: None,
            preset: None,
            style: Style::default(),
            presets: BTreeMap::new(),
        }
    }
}
