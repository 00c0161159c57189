//! Per-hand running state
//!
//! Holds the swings a hand has made so far and the lateral offset history used
//! to place the player on the grid. Lean needs both hands, so it is folded over
//! the merged sequence by the engine.

use super::types::{Position, ResetType, SwingRecord, SwingType};
use crate::grid::avoidance_vector;
use crate::model::{clamp_x, clamp_y, Hand, Obstacle};
use crate::timing::TimeDomain;
use log::debug;
use serde::Serialize;

/// Length of a reset filler swing, in beats.
const FILLER_LENGTH: f64 = 0.1;

/// Longest gap between a swing and its reset filler, in beats.
const FILLER_MAX_DELAY: f64 = 1.0;

/// Sideways steps the player takes to avoid walls, as `(beat, columns)` entries.
///
/// A wall covering only the left centre column pushes the player right (+1), one
/// covering only the right centre column pushes them left (-1). A wall over both
/// centre columns is a duck and leaves the player centred. Each wall's end beat
/// records a return to 0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LateralOffsets {
    entries: Vec<(f64, i32)>,
}

impl LateralOffsets {
    pub fn from_obstacles(obstacles: &[Obstacle]) -> Self {
        let mut entries = Vec::new();
        for obstacle in obstacles {
            let offset = match (obstacle.covers_column(1), obstacle.covers_column(2)) {
                (true, false) => 1,
                (false, true) => -1,
                (true, true) => 0,
                (false, false) => continue,
            };
            entries.push((obstacle.beat, offset));
            entries.push((obstacle.end_beat(), 0));
        }
        entries.sort_by(|a, b| a.0.total_cmp(&b.0));
        Self { entries }
    }

    /// Offset of the most recent entry at or before `beat`.
    pub fn at(&self, beat: f64) -> i32 {
        self.entries
            .iter()
            .rev()
            .find(|(start, _)| *start <= beat)
            .map_or(0, |&(_, offset)| offset)
    }
}

/// Lean after one merged swing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeanSample {
    pub beat: f64,
    pub lean: f64,
}

/// Average of the right hand's rotation and the mirrored left hand rotation.
pub fn lean_between(right_rotation: f64, left_rotation: f64) -> f64 {
    (right_rotation - left_rotation) / 2.0
}

/// Running state of one hand.
#[derive(Debug, Clone)]
pub struct SwingState {
    hand: Hand,
    swings: Vec<SwingRecord>,
    offsets: LateralOffsets,
}

impl SwingState {
    pub fn new(hand: Hand, offsets: LateralOffsets) -> Self {
        Self {
            hand,
            swings: Vec::new(),
            offsets,
        }
    }

    pub fn add(&mut self, record: SwingRecord) {
        self.swings.push(record);
    }

    /// The swing the next decision follows.
    pub fn last(&self) -> Option<&SwingRecord> {
        self.swings.last()
    }

    pub fn swings(&self) -> &[SwingRecord] {
        &self.swings
    }

    pub fn len(&self) -> usize {
        self.swings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.swings.is_empty()
    }

    pub fn lateral_offset_at(&self, beat: f64) -> i32 {
        self.offsets.at(beat)
    }

    /// Insert one filler swing in front of every reset.
    ///
    /// The filler has the parity opposite the reset swing, sits between the two
    /// real swings and is positioned where the hand would dodge to from the end
    /// of the previous swing.
    pub fn insert_reset_fillers(&mut self, time: &TimeDomain) {
        if !self.swings.iter().any(SwingRecord::is_reset) {
            return;
        }

        let swings = std::mem::take(&mut self.swings);
        let mut out = Vec::with_capacity(swings.len() * 2);
        for (i, record) in swings.iter().enumerate() {
            if i > 0 && record.is_reset() {
                let filler = reset_filler(&swings[i - 1], record, time);
                debug!(
                    "{:?} {:?} reset at beat {}: filler at beat {}",
                    self.hand, record.reset_type, record.start_beat, filler.start_beat
                );
                out.push(filler);
            }
            out.push(record.clone());
        }
        self.swings = out;
    }

    pub fn into_swings(self) -> Vec<SwingRecord> {
        self.swings
    }
}

fn reset_filler(previous: &SwingRecord, reset: &SwingRecord, time: &TimeDomain) -> SwingRecord {
    let gap = (reset.start_beat - previous.end_beat).max(0.0);
    let start_beat = (previous.end_beat + (gap / 2.0).min(FILLER_MAX_DELAY)).min(reset.start_beat);
    let end_beat = start_beat + FILLER_LENGTH;

    let (dx, dy) = avoidance_vector(previous.end_pos.x, previous.end_pos.y).unwrap_or((0, 0));
    let position = Position {
        x: clamp_x(previous.end_pos.x + dx),
        y: clamp_y(previous.end_pos.y + dy),
        rotation: (previous.end_pos.rotation + reset.start_pos.rotation) / 2.0,
    };

    SwingRecord {
        parity: reset.parity.flip(),
        swing_type: SwingType::Normal,
        reset_type: ResetType::None,
        start_beat,
        end_beat,
        start_seconds: time.to_real_time(start_beat),
        end_seconds: time.to_real_time(end_beat),
        ebpm: reset.ebpm,
        start_pos: position,
        end_pos: position,
        hand: reset.hand,
        upside_down: false,
        lateral_offset: reset.lateral_offset,
        notes: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::swing::Parity;

    fn record(
        beat: f64,
        parity: Parity,
        reset_type: ResetType,
        x: i32,
        y: i32,
        rotation: f64,
    ) -> SwingRecord {
        let pos = Position { x, y, rotation };
        SwingRecord {
            parity,
            swing_type: SwingType::Normal,
            reset_type,
            start_beat: beat,
            end_beat: beat,
            start_seconds: beat / 2.0,
            end_seconds: beat / 2.0,
            ebpm: 0.0,
            start_pos: pos,
            end_pos: pos,
            hand: Hand::Right,
            upside_down: false,
            lateral_offset: 0,
            notes: vec![crate::model::Note::new(
                beat,
                x,
                y,
                Hand::Right,
                crate::model::CutDirection::Down,
            )],
        }
    }

    #[test]
    fn test_lateral_offsets_from_walls() {
        let walls = [
            Obstacle::new(4.0, 2.0, 0, 0, 2, 5),
            Obstacle::new(10.0, 1.0, 2, 0, 1, 5),
            Obstacle::new(20.0, 1.0, 1, 2, 2, 1),
            Obstacle::new(30.0, 1.0, 3, 0, 1, 5),
        ];
        let offsets = LateralOffsets::from_obstacles(&walls);
        assert_eq!(offsets.at(0.0), 0);
        assert_eq!(offsets.at(4.0), 1);
        assert_eq!(offsets.at(5.5), 1);
        assert_eq!(offsets.at(6.0), 0);
        assert_eq!(offsets.at(10.5), -1);
        assert_eq!(offsets.at(20.5), 0);
        assert_eq!(offsets.at(30.5), 0);
    }

    #[test]
    fn test_no_fillers_without_resets() {
        let time = TimeDomain::new(120.0, 0.0, &[]).unwrap();
        let mut state = SwingState::new(Hand::Right, LateralOffsets::default());
        state.add(record(0.0, Parity::Forehand, ResetType::None, 1, 0, 0.0));
        state.add(record(1.0, Parity::Backhand, ResetType::None, 1, 0, 0.0));
        state.insert_reset_fillers(&time);
        assert_eq!(state.len(), 2);
    }

    #[test]
    fn test_filler_inserted_before_reset() {
        let time = TimeDomain::new(120.0, 0.0, &[]).unwrap();
        let mut state = SwingState::new(Hand::Right, LateralOffsets::default());
        state.add(record(1.0, Parity::Forehand, ResetType::None, 2, 0, 0.0));
        state.add(record(3.0, Parity::Forehand, ResetType::Bomb, 2, 0, 90.0));
        state.insert_reset_fillers(&time);

        let swings = state.swings();
        assert_eq!(swings.len(), 3);
        let filler = &swings[1];
        assert!(filler.is_filler());
        assert_eq!(filler.parity, Parity::Backhand);
        assert_eq!(filler.start_beat, 2.0);
        assert!((filler.end_beat - 2.1).abs() < 1e-9);
        assert_eq!((filler.end_pos.x, filler.end_pos.y), (2, 1));
        assert_eq!(filler.end_pos.rotation, 45.0);
        assert_eq!(filler.start_seconds, 1.0);
    }

    #[test]
    fn test_filler_delay_capped_at_one_beat() {
        let time = TimeDomain::new(120.0, 0.0, &[]).unwrap();
        let mut state = SwingState::new(Hand::Right, LateralOffsets::default());
        state.add(record(0.0, Parity::Forehand, ResetType::None, 1, 1, 0.0));
        state.add(record(8.0, Parity::Forehand, ResetType::Rebound, 1, 1, 0.0));
        state.insert_reset_fillers(&time);
        let filler = &state.swings()[1];
        assert_eq!(filler.start_beat, 1.0);
        // Centre cells have no dodge vector
        assert_eq!((filler.start_pos.x, filler.start_pos.y), (1, 1));
    }

    #[test]
    fn test_filler_never_starts_after_its_reset() {
        let time = TimeDomain::new(120.0, 0.0, &[]).unwrap();
        let mut state = SwingState::new(Hand::Right, LateralOffsets::default());
        let mut long = record(2.0, Parity::Forehand, ResetType::None, 1, 0, 0.0);
        long.end_beat = 3.0;
        state.add(long);
        state.add(record(2.5, Parity::Forehand, ResetType::Rebound, 1, 0, 0.0));
        state.insert_reset_fillers(&time);

        let swings = state.swings();
        assert!(swings[1].is_filler());
        assert_eq!(swings[1].start_beat, 2.5);
        assert!(swings.windows(2).all(|pair| pair[0].start_beat <= pair[1].start_beat));
    }

    #[test]
    fn test_lean_between_hands() {
        assert_eq!(lean_between(45.0, -45.0), 45.0);
        assert_eq!(lean_between(30.0, 30.0), 0.0);
    }
}
