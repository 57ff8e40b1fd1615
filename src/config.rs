//! TOML-based twin configuration and preset definitions.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::forecast::{DAILY_PERIOD, MAX_STEPS};
use crate::recommend::{DEFAULT_STEPS, Recommender};
use crate::scenario::{
    DEFAULT_FRACTION, ENERGY_SAVING, MAX_FRACTION, MIN_FRACTION, NEIGHBOR_OFFLOAD, REFERENCE,
    Scenario, ScenarioParameters,
};

/// Top-level twin configuration parsed from TOML.
///
/// All fields have defaults matching the reference preset. Load from
/// TOML with [`TwinConfig::from_toml_file`] or use
/// [`TwinConfig::reference`] for the built-in default.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TwinConfig {
    /// Synthetic fleet size, horizon, and seed.
    #[serde(default)]
    pub generator: GeneratorConfig,
    /// Scenario applied on top of the baseline.
    #[serde(default)]
    pub scenario: ScenarioConfig,
    /// Forecast horizon and cycle length.
    #[serde(default)]
    pub forecast: ForecastConfig,
    /// Recommendation thresholds.
    #[serde(default)]
    pub recommender: Recommender,
}

/// Synthetic fleet parameters.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Number of stations (must be > 0).
    pub stations: usize,
    /// Hours of history per station (must be > 0).
    pub horizon_hours: usize,
    /// Random seed; identical seeds reproduce identical fleets.
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            stations: 3,
            horizon_hours: 72,
            seed: 42,
        }
    }
}

/// Scenario selection and parameters.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Scenario display name, one of [`Scenario::NAMES`].
    pub name: String,
    /// Energy-saving depth (0.05–0.30).
    pub savings_fraction: f64,
    /// Offloaded traffic share (0.05–0.30).
    pub offload_fraction: f64,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            name: REFERENCE.to_string(),
            savings_fraction: DEFAULT_FRACTION,
            offload_fraction: DEFAULT_FRACTION,
        }
    }
}

impl ScenarioConfig {
    /// Parameter map handed to the scenario engine.
    pub fn parameters(&self) -> ScenarioParameters {
        ScenarioParameters {
            savings_fraction: Some(self.savings_fraction),
            offload_fraction: Some(self.offload_fraction),
        }
    }

    /// Resolved scenario, or `None` for an unknown name.
    pub fn resolve(&self) -> Option<Scenario> {
        Scenario::from_name(&self.name, &self.parameters())
    }
}

/// Forecast parameters.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ForecastConfig {
    /// Hours to forecast (must be > 0).
    pub steps: usize,
    /// Cycle length in hours (must be > 0).
    pub seasonal_period: usize,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            steps: DEFAULT_STEPS,
            seasonal_period: DAILY_PERIOD,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"generator.stations"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl TwinConfig {
    /// Available preset names.
    pub const PRESETS: &[&str] = &["reference", "energy_saving", "neighbor_offload"];

    /// Returns the reference preset: three stations, 72 hours, no scenario.
    pub fn reference() -> Self {
        Self::default()
    }

    /// Returns the energy-saving preset: 20% savings depth.
    pub fn energy_saving() -> Self {
        Self {
            scenario: ScenarioConfig {
                name: ENERGY_SAVING.to_string(),
                savings_fraction: 0.20,
                ..ScenarioConfig::default()
            },
            ..Self::default()
        }
    }

    /// Returns the neighbor-offload preset: a larger week-long fleet
    /// moving 20% of traffic to neighbors.
    pub fn neighbor_offload() -> Self {
        Self {
            generator: GeneratorConfig {
                stations: 5,
                horizon_hours: 168,
                ..GeneratorConfig::default()
            },
            scenario: ScenarioConfig {
                name: NEIGHBOR_OFFLOAD.to_string(),
                offload_fraction: 0.20,
                ..ScenarioConfig::default()
            },
            ..Self::default()
        }
    }

    /// Loads a configuration from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "reference" => Ok(Self::reference()),
            "energy_saving" => Ok(Self::energy_saving()),
            "neighbor_offload" => Ok(Self::neighbor_offload()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("config", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let g = &self.generator;
        if g.stations == 0 {
            errors.push(ConfigError::new("generator.stations", "must be > 0"));
        }
        if g.horizon_hours == 0 {
            errors.push(ConfigError::new("generator.horizon_hours", "must be > 0"));
        }

        let s = &self.scenario;
        if !Scenario::NAMES.contains(&s.name.as_str()) {
            errors.push(ConfigError::new(
                "scenario.name",
                format!(
                    "must be one of {}, got \"{}\"",
                    Scenario::NAMES.join(", "),
                    s.name
                ),
            ));
        }
        for (field, value) in [
            ("scenario.savings_fraction", s.savings_fraction),
            ("scenario.offload_fraction", s.offload_fraction),
        ] {
            if !(MIN_FRACTION..=MAX_FRACTION).contains(&value) {
                errors.push(ConfigError::new(
                    field,
                    format!("must be in [{MIN_FRACTION}, {MAX_FRACTION}]"),
                ));
            }
        }

        let f = &self.forecast;
        if f.steps == 0 {
            errors.push(ConfigError::new("forecast.steps", "must be > 0"));
        } else if f.steps > MAX_STEPS {
            errors.push(ConfigError::new(
                "forecast.steps",
                format!("must be <= {MAX_STEPS}"),
            ));
        }
        if f.seasonal_period == 0 {
            errors.push(ConfigError::new("forecast.seasonal_period", "must be > 0"));
        }

        let r = &self.recommender;
        for (field, value) in [
            ("recommender.low_utilization", r.low_utilization),
            ("recommender.peak_utilization", r.peak_utilization),
            (
                "recommender.night_average_utilization",
                r.night_average_utilization,
            ),
        ] {
            if !(0.0..=1.0).contains(&value) {
                errors.push(ConfigError::new(field, "must be in [0.0, 1.0]"));
            }
        }
        if r.low_utilization >= r.peak_utilization {
            errors.push(ConfigError::new(
                "recommender.low_utilization",
                "must be < recommender.peak_utilization",
            ));
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_preset_valid() {
        let cfg = TwinConfig::reference();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "reference should be valid: {errors:?}");
    }

    #[test]
    fn from_preset_unknown() {
        let err = TwinConfig::from_preset("nonexistent");
        assert!(err.is_err());
        let e = err.unwrap_err();
        assert!(e.message.contains("unknown preset"));
        assert_eq!(e.field, "preset");
    }

    #[test]
    fn all_presets_are_valid() {
        for name in TwinConfig::PRESETS {
            let cfg = TwinConfig::from_preset(name);
            assert!(cfg.is_ok(), "preset \"{name}\" should load");
            let errors = cfg.as_ref().map(|c| c.validate()).unwrap_or_default();
            assert!(
                errors.is_empty(),
                "preset \"{name}\" should be valid: {errors:?}"
            );
        }
    }

    #[test]
    fn presets_resolve_to_expected_scenarios() {
        assert_eq!(
            TwinConfig::reference().scenario.resolve(),
            Some(Scenario::Reference)
        );
        assert_eq!(
            TwinConfig::energy_saving().scenario.resolve(),
            Some(Scenario::EnergySaving {
                savings_fraction: 0.20
            })
        );
        assert_eq!(
            TwinConfig::neighbor_offload().scenario.resolve(),
            Some(Scenario::NeighborOffload {
                offload_fraction: 0.20
            })
        );
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[generator]
stations = 2
horizon_hours = 48
seed = 7

[scenario]
name = "Energy-Saving Mode"
savings_fraction = 0.25
offload_fraction = 0.10

[forecast]
steps = 48
seasonal_period = 24

[recommender]
low_utilization = 0.30
peak_utilization = 0.90
night_average_utilization = 0.20
"#;
        let cfg = TwinConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.generator.stations), Some(2));
        assert_eq!(cfg.as_ref().map(|c| c.forecast.steps), Some(48));
        assert_eq!(
            cfg.as_ref().map(|c| c.recommender.peak_utilization),
            Some(0.90)
        );
        assert!(cfg.map(|c| c.validate().is_empty()).unwrap_or(false));
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[generator]
stations = 3
bogus_field = true
"#;
        assert!(TwinConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml = r#"
[generator]
seed = 99
"#;
        let cfg = TwinConfig::from_toml_str(toml).ok();
        assert_eq!(cfg.as_ref().map(|c| c.generator.seed), Some(99));
        assert_eq!(cfg.as_ref().map(|c| c.generator.horizon_hours), Some(72));
        assert_eq!(cfg.as_ref().map(|c| c.scenario.name.as_str()), Some(REFERENCE));
        assert_eq!(cfg.as_ref().map(|c| c.recommender.low_utilization), Some(0.35));
    }

    #[test]
    fn validation_catches_zero_stations() {
        let mut cfg = TwinConfig::reference();
        cfg.generator.stations = 0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "generator.stations"));
    }

    #[test]
    fn validation_catches_unknown_scenario() {
        let mut cfg = TwinConfig::reference();
        cfg.scenario.name = "Turbo Mode".to_string();
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "scenario.name"));
        assert!(cfg.scenario.resolve().is_none());
    }

    #[test]
    fn validation_catches_fraction_out_of_range() {
        let mut cfg = TwinConfig::reference();
        cfg.scenario.savings_fraction = 0.5;
        cfg.scenario.offload_fraction = 0.01;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "scenario.savings_fraction"));
        assert!(errors.iter().any(|e| e.field == "scenario.offload_fraction"));
    }

    #[test]
    fn validation_catches_inverted_thresholds() {
        let mut cfg = TwinConfig::reference();
        cfg.recommender.low_utilization = 0.9;
        let errors = cfg.validate();
        assert!(
            errors
                .iter()
                .any(|e| e.field == "recommender.low_utilization")
        );
    }

    #[test]
    fn error_display_names_field() {
        let e = ConfigError::new("forecast.steps", "must be > 0");
        assert_eq!(e.to_string(), "config error: forecast.steps: must be > 0");
    }

    #[test]
    fn forecast_steps_capped_at_four_weeks() {
        let mut cfg = TwinConfig::reference();
        cfg.forecast.steps = MAX_STEPS;
        assert!(cfg.validate().is_empty());

        cfg.forecast.steps = MAX_STEPS + 1;
        let errors = cfg.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "forecast.steps");
    }
}
