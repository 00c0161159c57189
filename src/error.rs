//! # Error Types
//!
//! This module defines all error types for the swing analyser.
//!
//! The analysis pipeline itself is pure computation over trusted input and never fails.
//! Errors only surface at the two boundaries where untrusted data enters the crate:
//! building a [`DifficultyData`](crate::model::DifficultyData) from raw event lists, and
//! loading an [`AnalysisConfig`](crate::config::AnalysisConfig) from YAML.
//!
//! ## Error Types
//! - `InvalidEvent` - An event with an out-of-grid coordinate, unknown cut direction
//!   or non-finite beat
//! - `UnorderedEvents` - An event list whose beats go backwards
//! - `InvalidTempo` - A non-positive or non-finite BPM in the tempo map
//! - `Config` - Invalid YAML analysis configuration
//!
//! ## Usage
//! ```rust
//! use swing_parity::{AnalysisError, DifficultyData, MapEvents, TimeDomain};
//!
//! let time = TimeDomain::new(120.0, 0.0, &[]).unwrap();
//! match DifficultyData::new(time, MapEvents::default()) {
//!     Ok(data) => println!("{} notes", data.notes().len()),
//!     Err(AnalysisError::InvalidEvent { kind, index, message }) => {
//!         eprintln!("Bad {} #{}: {}", kind, index, message);
//!     }
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// A single event failed range validation.
    ///
    /// # Example
    /// ```
    /// # use swing_parity::AnalysisError;
    /// let err = AnalysisError::InvalidEvent {
    ///     kind: "note",
    ///     index: 3,
    ///     message: "x = 4 is outside the 4x3 grid".to_string(),
    /// };
    /// assert_eq!(err.to_string(), "Invalid note at index 3: x = 4 is outside the 4x3 grid");
    /// ```
    #[error("Invalid {kind} at index {index}: {message}")]
    InvalidEvent {
        kind: &'static str,
        index: usize,
        message: String,
    },

    /// An event list is not sorted by beat.
    ///
    /// # Example
    /// ```
    /// # use swing_parity::AnalysisError;
    /// let err = AnalysisError::UnorderedEvents { kind: "bomb", index: 7 };
    /// assert_eq!(err.to_string(), "Bomb list is not ordered by beat at index 7");
    /// ```
    #[error("{} list is not ordered by beat at index {index}", capitalize(.kind))]
    UnorderedEvents { kind: &'static str, index: usize },

    /// A tempo entry with a BPM the time domain cannot divide by.
    #[error("Invalid tempo at beat {beat}: {bpm} BPM")]
    InvalidTempo { beat: f64, bpm: f64 },

    /// Invalid analysis configuration.
    ///
    /// # Example
    /// ```
    /// # use swing_parity::AnalysisError;
    /// let err = AnalysisError::Config("slider-precision-ms must be positive".to_string());
    /// assert_eq!(err.to_string(), "Invalid configuration: slider-precision-ms must be positive");
    /// ```
    #[error("Invalid configuration: {0}")]
    Config(String),
}

fn capitalize(kind: &str) -> String {
    let mut chars = kind.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
