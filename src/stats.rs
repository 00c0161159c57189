//! # Map Statistics
//!
//! Read-only summaries folded over a finished analysis.
//!
//! ## Formulas
//! - **Notes per second**: `count / ((last.ms - first.ms) / 1000)`
//! - **Swings per second** (per hand): `count / seconds(first.start_beat, last.end_beat)`
//! - **Handedness**: `hand swings / all swings * 100`
//! - **Swing type share**: `type swings / all swings * 100`
//! - **Doubles**: share of swings whose first note is within 0.05 beats of the
//!   first note of a swing on the other hand
//!
//! Reset fillers are not counted as swings. Every ratio over an empty set is 0.
//!
//! ## Example
//! ```rust
//! use swing_parity::stats::MapStats;
//! use swing_parity::{analyze, CutDirection, DifficultyData, Hand, MapEvents, Note, TimeDomain};
//!
//! let time = TimeDomain::new(120.0, 0.0, &[]).unwrap();
//! let events = MapEvents {
//!     notes: vec![
//!         Note::new(1.0, 1, 0, Hand::Left, CutDirection::Down),
//!         Note::new(1.0, 2, 0, Hand::Right, CutDirection::Down),
//!     ],
//!     ..Default::default()
//! };
//! let data = DifficultyData::new(time, events).unwrap();
//! let stats = MapStats::from_output(&data, &analyze(&data));
//!
//! assert_eq!(stats.right_handedness, 50.0);
//! assert_eq!(stats.doubles_percentage, 100.0);
//! ```

use crate::model::{DifficultyData, Hand, Note};
use crate::swing::{ResetType, SwingOutput, SwingRecord, SwingType};
use crate::timing::TimeDomain;
use serde::Serialize;

/// Largest first-note gap, in beats, for two swings to count as a double.
pub const DOUBLES_WINDOW: f64 = 0.05;

/// Share of swings of one shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwingTypeShare {
    pub swing_type: SwingType,
    pub percentage: f64,
}

/// Summary of one analysed difficulty.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapStats {
    pub notes_per_second: f64,
    pub left_swings_per_second: f64,
    pub right_swings_per_second: f64,
    pub left_handedness: f64,
    pub right_handedness: f64,
    pub swing_types: Vec<SwingTypeShare>,
    pub bomb_resets: usize,
    pub rebounds: usize,
    pub doubles_percentage: f64,
}

impl MapStats {
    pub fn from_output(data: &DifficultyData, output: &SwingOutput) -> Self {
        let time = data.time();
        Self {
            notes_per_second: notes_per_second(data.notes()),
            left_swings_per_second: swings_per_second(&output.left, time),
            right_swings_per_second: swings_per_second(&output.right, time),
            left_handedness: handedness(output, Hand::Left),
            right_handedness: handedness(output, Hand::Right),
            swing_types: SwingType::ALL
                .iter()
                .map(|&swing_type| SwingTypeShare {
                    swing_type,
                    percentage: swing_type_percentage(&output.merged, swing_type),
                })
                .collect(),
            bomb_resets: reset_count(&output.merged, ResetType::Bomb),
            rebounds: reset_count(&output.merged, ResetType::Rebound),
            doubles_percentage: doubles_percentage(&output.merged),
        }
    }
}

fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

fn real(swings: &[SwingRecord]) -> impl Iterator<Item = &SwingRecord> {
    swings.iter().filter(|s| !s.is_filler())
}

pub fn notes_per_second(notes: &[Note]) -> f64 {
    let (Some(first), Some(last)) = (notes.first(), notes.last()) else {
        return 0.0;
    };
    let seconds = (last.ms - first.ms) / 1000.0;
    if seconds > 0.0 {
        notes.len() as f64 / seconds
    } else {
        0.0
    }
}

/// Swings per second across one hand's sequence.
pub fn swings_per_second(swings: &[SwingRecord], time: &TimeDomain) -> f64 {
    let mut swings = real(swings).peekable();
    let Some(first) = swings.peek().copied() else {
        return 0.0;
    };
    let (count, last) = swings.fold((0usize, first), |(count, _), swing| (count + 1, swing));
    let seconds = time.seconds_between(first.start_beat, last.end_beat);
    if seconds > 0.0 {
        count as f64 / seconds
    } else {
        0.0
    }
}

pub fn handedness(output: &SwingOutput, hand: Hand) -> f64 {
    let total = real(&output.left).count() + real(&output.right).count();
    percentage(real(output.hand(hand)).count(), total)
}

pub fn swing_type_percentage(swings: &[SwingRecord], swing_type: SwingType) -> f64 {
    let total = real(swings).count();
    let matching = real(swings).filter(|s| s.swing_type == swing_type).count();
    percentage(matching, total)
}

pub fn reset_count(swings: &[SwingRecord], reset_type: ResetType) -> usize {
    swings.iter().filter(|s| s.reset_type == reset_type).count()
}

/// Share of swings hit together with a swing on the other hand.
pub fn doubles_percentage(merged: &[SwingRecord]) -> f64 {
    let swings: Vec<(Hand, f64)> = real(merged)
        .filter_map(|s| s.first_note().map(|n| (s.hand, n.beat)))
        .collect();
    let doubles = swings
        .iter()
        .filter(|(hand, beat)| {
            swings.iter().any(|(other, other_beat)| {
                other != hand && (other_beat - beat).abs() <= DOUBLES_WINDOW
            })
        })
        .count();
    percentage(doubles, swings.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Bomb, CutDirection, MapEvents};
    use crate::swing::SwingEngine;
    use crate::AnalysisConfig;

    fn analysed(events: MapEvents) -> (DifficultyData, SwingOutput) {
        let time = TimeDomain::new(120.0, 0.0, &[]).unwrap();
        let data = DifficultyData::new(time, events).unwrap();
        let output = SwingEngine::new(&data, &AnalysisConfig::default()).run();
        (data, output)
    }

    #[test]
    fn test_empty_map_is_all_zero() {
        let (data, output) = analysed(MapEvents::default());
        let stats = MapStats::from_output(&data, &output);
        assert_eq!(stats.notes_per_second, 0.0);
        assert_eq!(stats.left_swings_per_second, 0.0);
        assert_eq!(stats.left_handedness, 0.0);
        assert_eq!(stats.right_handedness, 0.0);
        assert_eq!(stats.doubles_percentage, 0.0);
        assert!(stats.swing_types.iter().all(|share| share.percentage == 0.0));
    }

    #[test]
    fn test_rates() {
        let notes: Vec<Note> = (0..5)
            .map(|i| {
                let dir = if i % 2 == 0 { CutDirection::Down } else { CutDirection::Up };
                Note::new(i as f64, 2, 0, Hand::Right, dir)
            })
            .collect();
        let (data, output) = analysed(MapEvents {
            notes,
            ..Default::default()
        });
        let stats = MapStats::from_output(&data, &output);
        // 5 notes over 2 seconds
        assert_eq!(stats.notes_per_second, 2.5);
        assert_eq!(stats.right_swings_per_second, 2.5);
        assert_eq!(stats.right_handedness, 100.0);
        assert_eq!(stats.left_handedness, 0.0);
        assert_eq!(stats.doubles_percentage, 0.0);
        assert_eq!(stats.swing_types[0].swing_type, SwingType::Normal);
        assert_eq!(stats.swing_types[0].percentage, 100.0);
    }

    #[test]
    fn test_fillers_are_not_swings() {
        let (data, output) = analysed(MapEvents {
            notes: vec![
                Note::new(1.0, 2, 0, Hand::Right, CutDirection::Down),
                Note::new(3.0, 2, 0, Hand::Right, CutDirection::Down),
            ],
            bombs: vec![Bomb::new(2.0, 2, 0)],
            ..Default::default()
        });
        assert_eq!(output.right.len(), 3);
        let stats = MapStats::from_output(&data, &output);
        assert_eq!(stats.bomb_resets, 1);
        assert_eq!(stats.rebounds, 0);
        assert_eq!(swing_type_percentage(&output.merged, SwingType::Normal), 100.0);
        assert_eq!(stats.right_swings_per_second, 2.0);
    }

    #[test]
    fn test_doubles() {
        let (_, output) = analysed(MapEvents {
            notes: vec![
                Note::new(1.0, 1, 0, Hand::Left, CutDirection::Down),
                Note::new(1.02, 2, 0, Hand::Right, CutDirection::Down),
                Note::new(2.0, 2, 0, Hand::Right, CutDirection::Up),
                Note::new(3.0, 1, 0, Hand::Left, CutDirection::Up),
            ],
            ..Default::default()
        });
        assert_eq!(doubles_percentage(&output.merged), 50.0);
    }
}
