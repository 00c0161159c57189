//! Swing type definitions
//!
//! This module defines the records the swing engine produces and the
//! candidate / context values passed between the classifier, the parity
//! predictor and the per-hand state.

use crate::angles::afn;
use crate::model::{Bomb, CutDirection, Hand, Note};
use crate::timing::TimeDomain;
use serde::Serialize;

/// Orientation of the hand for a swing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Parity {
    /// Palm leading, natural for down cuts
    Forehand,
    /// Back of the hand leading, natural for up cuts
    Backhand,
    /// Only before a hand's first swing
    Undecided,
}

impl Parity {
    pub fn flip(self) -> Self {
        match self {
            Parity::Forehand => Parity::Backhand,
            Parity::Backhand => Parity::Forehand,
            Parity::Undecided => Parity::Undecided,
        }
    }
}

/// Why a swing repeats the previous parity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResetType {
    None,
    /// Bombs forced the saber out of its resting position
    Bomb,
    /// The rotation to the next cut is too large to flip into
    Rebound,
}

/// Shape of a swing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SwingType {
    Normal,
    /// Simultaneous notes in adjacent cells
    Stack,
    /// Simultaneous notes spread across the grid
    Window,
    /// Consecutive notes close enough in time to be one motion
    Slider,
    /// A chain head and its links
    Chain,
    /// Reserved. Dot spam detection is disabled and this type is never produced.
    DotSpam,
    Undecided,
}

impl SwingType {
    pub const ALL: [SwingType; 7] = [
        SwingType::Normal,
        SwingType::Stack,
        SwingType::Window,
        SwingType::Slider,
        SwingType::Chain,
        SwingType::DotSpam,
        SwingType::Undecided,
    ];
}

/// Grid position and saber rotation at one end of a swing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub x: i32,
    pub y: i32,
    pub rotation: f64,
}

/// Point a swing extends to past its last note (an arc tail).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwingTail {
    pub beat: f64,
    pub x: i32,
    pub y: i32,
}

/// Notes believed to be struck in one continuous motion.
///
/// Always non-empty and ordered by beat.
#[derive(Debug, Clone, PartialEq)]
pub struct SwingCandidate {
    pub notes: Vec<Note>,
    pub swing_type: SwingType,
    pub tail: Option<SwingTail>,
}

impl SwingCandidate {
    pub fn new(notes: Vec<Note>, swing_type: SwingType) -> Self {
        debug_assert!(!notes.is_empty());
        Self {
            notes,
            swing_type,
            tail: None,
        }
    }

    pub fn with_tail(mut self, tail: SwingTail) -> Self {
        self.tail = Some(tail);
        self
    }

    pub fn first(&self) -> &Note {
        &self.notes[0]
    }

    pub fn last(&self) -> &Note {
        &self.notes[self.notes.len() - 1]
    }

    pub fn is_all_dots(&self) -> bool {
        self.notes.iter().all(|n| n.is_dot())
    }

    /// Direction of the first arrow note.
    pub fn first_direction(&self) -> Option<CutDirection> {
        self.notes.iter().map(|n| n.direction).find(|d| !d.is_dot())
    }

    /// Direction of the last arrow note.
    pub fn last_direction(&self) -> Option<CutDirection> {
        self.notes.iter().rev().map(|n| n.direction).find(|d| !d.is_dot())
    }

    pub fn start_beat(&self) -> f64 {
        self.first().beat
    }

    pub fn end_beat(&self) -> f64 {
        match self.tail {
            Some(tail) => tail.beat,
            None => self.last().beat,
        }
    }

    fn end_cell(&self) -> (i32, i32) {
        match self.tail {
            Some(tail) => (tail.x, tail.y),
            None => (self.last().x, self.last().y),
        }
    }
}

/// Read-only context for deciding one swing.
#[derive(Debug, Clone, Copy)]
pub struct SwingContext<'a> {
    pub hand: Hand,
    pub time: &'a TimeDomain,
    /// All bombs in the map, ordered by beat
    pub bombs: &'a [Bomb],
    /// Sideways step of the player at this swing, in columns
    pub lateral_offset: i32,
}

/// Parity decision for a candidate, before it becomes a record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwingOutcome {
    pub parity: Parity,
    pub reset_type: ResetType,
    pub upside_down: bool,
    /// Direction the swing opens with (inferred for dots)
    pub entry: CutDirection,
}

/// One finalized swing.
///
/// Reset fillers are synthetic records with no notes, inserted before a reset
/// swing to stand for the unscored motion that brings the hand back around.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwingRecord {
    pub parity: Parity,
    pub swing_type: SwingType,
    pub reset_type: ResetType,
    pub start_beat: f64,
    pub end_beat: f64,
    pub start_seconds: f64,
    pub end_seconds: f64,
    /// Swing rate implied by the gap to the previous swing on this hand
    pub ebpm: f64,
    pub start_pos: Position,
    pub end_pos: Position,
    pub hand: Hand,
    pub upside_down: bool,
    pub lateral_offset: i32,
    pub notes: Vec<Note>,
}

impl SwingRecord {
    /// Turn a decided candidate into a record.
    pub fn finalize(
        candidate: &SwingCandidate,
        outcome: SwingOutcome,
        ctx: &SwingContext<'_>,
        previous: Option<&SwingRecord>,
    ) -> Self {
        let hand = ctx.hand;
        let exit = candidate.last_direction().unwrap_or(outcome.entry);
        let first = candidate.first();
        let (end_x, end_y) = candidate.end_cell();

        let start_beat = candidate.start_beat();
        let end_beat = candidate.end_beat();
        let start_seconds = ctx.time.to_real_time(start_beat);

        let ebpm = previous
            .map(|prev| start_seconds - prev.start_seconds)
            .filter(|&delta| delta > 0.0)
            .map(|delta| 60.0 / delta / 2.0)
            .unwrap_or(0.0);

        Self {
            parity: outcome.parity,
            swing_type: candidate.swing_type,
            reset_type: outcome.reset_type,
            start_beat,
            end_beat,
            start_seconds,
            end_seconds: ctx.time.to_real_time(end_beat),
            ebpm,
            start_pos: Position {
                x: first.x,
                y: first.y,
                rotation: afn(hand, outcome.parity, outcome.entry),
            },
            end_pos: Position {
                x: end_x,
                y: end_y,
                rotation: afn(hand, outcome.parity, exit),
            },
            hand,
            upside_down: outcome.upside_down,
            lateral_offset: ctx.lateral_offset,
            notes: candidate.notes.clone(),
        }
    }

    pub fn is_reset(&self) -> bool {
        self.reset_type != ResetType::None
    }

    /// Synthetic reset filler with no source notes.
    pub fn is_filler(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn first_note(&self) -> Option<&Note> {
        self.notes.first()
    }

    pub fn last_note(&self) -> Option<&Note> {
        self.notes.last()
    }

    pub fn is_all_dots(&self) -> bool {
        self.notes.iter().all(|n| n.is_dot())
    }

    /// Direction of the first arrow note.
    pub fn first_direction(&self) -> Option<CutDirection> {
        self.notes.iter().map(|n| n.direction).find(|d| !d.is_dot())
    }
}
