//! # Swing Module
//!
//! Reconstruct how each hand swings through a difficulty.
//!
//! ## Purpose
//! This module turns one hand's notes into a continuous trace of swings:
//! 1. **Segmentation** - notes struck in one motion are grouped into a candidate
//! 2. **Classification** - each group is tagged Normal, Stack, Window, Slider or Chain
//! 3. **Prediction** - the `parity` module decides forehand / backhand and resets
//! 4. **Reset filling** - an unscored swing is inserted in front of every reset
//! 5. **Merging** - both hands are combined into one chronological sequence
//!
//! ## Sub-modules
//! - `types` - SwingRecord, SwingCandidate and the parity / reset / shape enums
//! - `classifier` - Buffering state machine that closes notes into candidates
//! - `state` - Per-hand swing list, lean and lateral offsets
//! - `engine` - Orchestrates both hands and merges them
//!
//! ## Key Types
//! - [`SwingRecord`] - One finalized swing with positions, rotations and timing
//! - [`SwingOutput`] - Left, right and merged sequences plus the lean timeline
//! - [`SwingEngine`] - Entry point for a full run
//!
//! ## Example
//! ```rust
//! use swing_parity::swing::{Parity, SwingEngine};
//! use swing_parity::{
//!     AnalysisConfig, CutDirection, DifficultyData, Hand, MapEvents, Note, TimeDomain,
//! };
//!
//! let time = TimeDomain::new(120.0, 0.0, &[]).unwrap();
//! let events = MapEvents {
//!     notes: vec![
//!         Note::new(1.0, 2, 0, Hand::Right, CutDirection::Down),
//!         Note::new(2.0, 2, 0, Hand::Right, CutDirection::Up),
//!     ],
//!     ..Default::default()
//! };
//! let data = DifficultyData::new(time, events).unwrap();
//! let output = SwingEngine::new(&data, &AnalysisConfig::default()).run();
//!
//! assert_eq!(output.right.len(), 2);
//! assert_eq!(output.right[0].parity, Parity::Forehand);
//! assert_eq!(output.right[1].parity, Parity::Backhand);
//! assert!(output.left.is_empty());
//! ```
//!
//! ## Hand Independence
//!
//! Each hand only reads the shared event lists and writes its own [`SwingState`],
//! so the two pipelines can run on separate threads. The merge afterwards is a
//! stable sort, which makes the output the same whichever hand finishes first.
//!
//! ## Related Modules
//! - `parity` - Decides each swing after a hand's first
//! - `grid` - Dodge vectors used to place reset fillers
//! - `timing` - Real-time stamps and effective BPM

mod classifier;
mod engine;
mod state;
mod types;

#[cfg(test)]
mod tests;

pub use classifier::{classify, is_adjacent_chain, SwingClassifier};
pub use engine::{lean_timeline, merge, SwingEngine, SwingOutput};
pub use state::{lean_between, LateralOffsets, LeanSample, SwingState};
pub use types::{
    Parity, Position, ResetType, SwingCandidate, SwingContext, SwingOutcome, SwingRecord,
    SwingTail, SwingType,
};
