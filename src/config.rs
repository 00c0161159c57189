//! # Analysis Configuration
//!
//! Run-level options, usually written as a small YAML document:
//!
//! ```yaml
//! predictor: experimental
//! slider-precision-ms: 59
//! parallel-hands: false
//! ```
//!
//! Every key is optional. Missing keys take the defaults shown by
//! [`AnalysisConfig::default`].
//!
//! ## Related Modules
//! - `parity` - `PredictorConfig::for_kind` turns the chosen [`PredictorKind`] into constants
//! - `swing` - `SwingEngine` reads the slider precision and the parallel flag

use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};

/// Which parity heuristic to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictorKind {
    #[default]
    Generic,
    Experimental,
    Retro,
}

impl PredictorKind {
    pub const ALL: [PredictorKind; 3] = [
        PredictorKind::Generic,
        PredictorKind::Experimental,
        PredictorKind::Retro,
    ];

    /// Parse a predictor name, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "generic" => Some(PredictorKind::Generic),
            "experimental" => Some(PredictorKind::Experimental),
            "retro" => Some(PredictorKind::Retro),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PredictorKind::Generic => "generic",
            PredictorKind::Experimental => "experimental",
            PredictorKind::Retro => "retro",
        }
    }
}

/// Default largest gap between two notes of one slider.
pub const DEFAULT_SLIDER_PRECISION_MS: f64 = 59.0;

/// Options for one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct AnalysisConfig {
    pub predictor: PredictorKind,
    pub slider_precision_ms: f64,
    /// Run the two hands on separate threads. The output is identical either way.
    pub parallel_hands: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            predictor: PredictorKind::Generic,
            slider_precision_ms: DEFAULT_SLIDER_PRECISION_MS,
            parallel_hands: true,
        }
    }
}

/// Raw configuration for YAML deserialization
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct RawConfig {
    predictor: Option<String>,
    slider_precision_ms: Option<f64>,
    parallel_hands: Option<bool>,
}

impl AnalysisConfig {
    pub fn with_predictor(mut self, predictor: PredictorKind) -> Self {
        self.predictor = predictor;
        self
    }

    /// Parse a YAML configuration document. An empty document gives the defaults.
    pub fn from_yaml(content: &str) -> Result<Self, AnalysisError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let raw: RawConfig =
            serde_yaml::from_str(content).map_err(|e| AnalysisError::Config(e.to_string()))?;

        let predictor = if let Some(name) = &raw.predictor {
            PredictorKind::from_name(name).ok_or_else(|| {
                AnalysisError::Config(format!(
                    "Unknown predictor '{}' (expected generic, experimental or retro)",
                    name
                ))
            })?
        } else {
            PredictorKind::default()
        };

        let slider_precision_ms = raw
            .slider_precision_ms
            .unwrap_or(DEFAULT_SLIDER_PRECISION_MS);
        if !slider_precision_ms.is_finite() || slider_precision_ms < 0.0 {
            return Err(AnalysisError::Config(format!(
                "slider-precision-ms must be a non-negative number, got {}",
                slider_precision_ms
            )));
        }

        Ok(Self {
            predictor,
            slider_precision_ms,
            parallel_hands: raw.parallel_hands.unwrap_or(true),
        })
    }
}
