//! # Time Domain
//!
//! Converts between the three time spaces a map lives in:
//!
//! - **File beats**: beat numbers as written in the map file, whose length in
//!   seconds depends on the tempo in effect.
//! - **Real time**: seconds from the start of the audio, including the song offset.
//! - **Base beats**: real time expressed in beats of the map's base BPM, so a beat
//!   always has the same length no matter how the tempo changes.
//!
//! `to_real_time` maps file beats to seconds, `to_beat_time` maps seconds to base
//! beats and `to_file_time` maps base beats back to file beats.
//!
//! ## Tempo Map
//! Built once from an ordered list of `(beat, bpm)` changes. The start time of each
//! change is accumulated from the previous change at the previous BPM and rounded
//! up to whole milliseconds, so long maps do not drift.
//!
//! ## Example
//! ```rust
//! use swing_parity::{TempoChange, TimeDomain};
//!
//! let time = TimeDomain::new(120.0, 0.0, &[TempoChange::new(16.0, 180.0)]).unwrap();
//! assert_eq!(time.to_real_time(16.0), 8.0);
//! assert_eq!(time.current_bpm(20.0), 180.0);
//! ```

use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};

/// A tempo change at a file beat.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TempoChange {
    pub beat: f64,
    pub bpm: f64,
}

impl TempoChange {
    pub fn new(beat: f64, bpm: f64) -> Self {
        Self { beat, bpm }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct TempoSegment {
    beat: f64,
    bpm: f64,
    /// Seconds from beat 0, excluding the song offset.
    start: f64,
}

/// Piecewise-constant tempo map with a song offset.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeDomain {
    base_bpm: f64,
    offset: f64,
    segments: Vec<TempoSegment>,
}

/// Round up to whole milliseconds, ignoring float noise just above a boundary.
fn ceil_millis(seconds: f64) -> f64 {
    ((seconds * 1000.0) - 1e-6).ceil() / 1000.0
}

impl TimeDomain {
    /// Build a tempo map.
    ///
    /// `changes` must be ordered by beat. Changes at negative beats are ignored.
    pub fn new(base_bpm: f64, offset: f64, changes: &[TempoChange]) -> Result<Self, AnalysisError> {
        if !base_bpm.is_finite() || base_bpm <= 0.0 {
            return Err(AnalysisError::InvalidTempo {
                beat: 0.0,
                bpm: base_bpm,
            });
        }
        let offset = if offset.is_finite() { offset } else { 0.0 };

        let mut segments: Vec<TempoSegment> = Vec::with_capacity(changes.len());
        let mut prev_beat = 0.0;
        let mut prev_bpm = base_bpm;
        let mut prev_start = 0.0;

        for change in changes {
            if !change.bpm.is_finite() || change.bpm <= 0.0 || !change.beat.is_finite() {
                return Err(AnalysisError::InvalidTempo {
                    beat: change.beat,
                    bpm: change.bpm,
                });
            }
            if change.beat < prev_beat {
                if change.beat < 0.0 {
                    continue;
                }
                return Err(AnalysisError::UnorderedEvents {
                    kind: "tempo change",
                    index: segments.len(),
                });
            }

            let elapsed = (change.beat - prev_beat) * 60.0 / prev_bpm;
            let start = ceil_millis(prev_start + elapsed);
            segments.push(TempoSegment {
                beat: change.beat,
                bpm: change.bpm,
                start,
            });

            prev_beat = change.beat;
            prev_bpm = change.bpm;
            prev_start = start;
        }

        Ok(Self {
            base_bpm,
            offset,
            segments,
        })
    }

    pub fn base_bpm(&self) -> f64 {
        self.base_bpm
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// File beat to seconds of real time.
    pub fn to_real_time(&self, beat: f64) -> f64 {
        let seconds = match self.segments.iter().rev().find(|s| s.beat <= beat) {
            Some(segment) => segment.start + (beat - segment.beat) * 60.0 / segment.bpm,
            None => beat * 60.0 / self.base_bpm,
        };
        seconds + self.offset
    }

    /// Seconds of real time to base beats.
    pub fn to_beat_time(&self, seconds: f64) -> f64 {
        (seconds - self.offset) * self.base_bpm / 60.0
    }

    /// Base beats back to file beats.
    pub fn to_file_time(&self, beat: f64) -> f64 {
        let seconds = beat * 60.0 / self.base_bpm;
        match self.segments.iter().rev().find(|s| s.start <= seconds) {
            Some(segment) => segment.beat + (seconds - segment.start) * segment.bpm / 60.0,
            None => seconds * self.base_bpm / 60.0,
        }
    }

    /// Tempo in effect at a file beat.
    pub fn current_bpm(&self, beat: f64) -> f64 {
        self.segments
            .iter()
            .rev()
            .find(|s| s.beat <= beat)
            .map(|s| s.bpm)
            .unwrap_or(self.base_bpm)
    }

    pub fn to_millis(&self, beat: f64) -> f64 {
        self.to_real_time(beat) * 1000.0
    }

    /// Real seconds elapsed between two file beats.
    pub fn seconds_between(&self, from: f64, to: f64) -> f64 {
        self.to_real_time(to) - self.to_real_time(from)
    }
}
