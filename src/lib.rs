//! # swing-parity
//!
//! Swing segmentation and parity prediction for two-handed rhythm game maps.
//!
//! Given the notes, bombs, walls, arcs and chains of one difficulty, the crate
//! reconstructs how a player swings through it: which notes are hit in one
//! motion, whether each swing is a forehand or a backhand, where bombs or
//! awkward rotations force a reset, and where each saber is on the 4x3 grid.
//!
//! ## Modules
//! - `model` - Events, cut directions and the validated [`DifficultyData`]
//! - `timing` - [`TimeDomain`] conversions under tempo changes
//! - `angles` - Angle-from-neutral tables
//! - `grid` - [`BombGrid`] occupancy and dodge simulation
//! - `swing` - Classifier, per-hand state and the [`SwingEngine`]
//! - `parity` - The [`ParityPredictor`] heuristics
//! - `stats` - Summary metrics over a finished run
//! - `config` - YAML run configuration
//!
//! ## Example
//! ```rust
//! use swing_parity::{
//!     analyze, CutDirection, DifficultyData, Hand, MapEvents, Note, Parity, TimeDomain,
//! };
//!
//! let time = TimeDomain::new(120.0, 0.0, &[]).unwrap();
//! let events = MapEvents {
//!     notes: vec![Note::new(1.0, 1, 0, Hand::Right, CutDirection::Up)],
//!     ..Default::default()
//! };
//! let data = DifficultyData::new(time, events).unwrap();
//! let output = analyze(&data);
//!
//! assert_eq!(output.right[0].parity, Parity::Backhand);
//! assert_eq!(output.right[0].start_pos.rotation, 0.0);
//! ```

pub mod angles;
pub mod config;
pub mod error;
pub mod grid;
pub mod model;
pub mod parity;
pub mod stats;
pub mod swing;
pub mod timing;

pub use config::{AnalysisConfig, PredictorKind};
pub use error::AnalysisError;
pub use grid::{BombGrid, GridPosition};
pub use model::{Arc, Bomb, Chain, CutDirection, DifficultyData, Hand, MapEvents, Note, Obstacle};
pub use parity::{ParityPredictor, PredictorConfig};
pub use stats::MapStats;
pub use swing::{
    Parity, Position, ResetType, SwingEngine, SwingOutput, SwingRecord, SwingType,
};
pub use timing::{TempoChange, TimeDomain};

/// Analyse a difficulty with the default configuration.
/// This is the main entry point for the library.
pub fn analyze(data: &DifficultyData) -> SwingOutput {
    analyze_with(data, &AnalysisConfig::default())
}

pub fn analyze_with(data: &DifficultyData, config: &AnalysisConfig) -> SwingOutput {
    SwingEngine::new(data, config).run()
}

/// Analyse with a YAML configuration document.
pub fn analyze_with_yaml(data: &DifficultyData, yaml: &str) -> Result<SwingOutput, AnalysisError> {
    let config = AnalysisConfig::from_yaml(yaml)?;
    Ok(analyze_with(data, &config))
}
