//! Swing engine
//!
//! Drives both hands through classification, parity prediction and reset
//! filling, then merges them into one chronological sequence.

use super::classifier::SwingClassifier;
use super::state::{lean_between, LateralOffsets, LeanSample, SwingState};
use super::types::{
    Parity, ResetType, SwingCandidate, SwingContext, SwingOutcome, SwingRecord, SwingTail,
};
use crate::config::AnalysisConfig;
use crate::model::{CutDirection, DifficultyData, Hand, BEAT_EPSILON};
use crate::parity::ParityPredictor;
use log::info;
use serde::Serialize;

/// Everything one analysis run produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwingOutput {
    pub left: Vec<SwingRecord>,
    pub right: Vec<SwingRecord>,
    /// Both hands ordered by start beat, right hand first on ties
    pub merged: Vec<SwingRecord>,
    /// One sample per merged swing
    pub lean: Vec<LeanSample>,
}

impl SwingOutput {
    pub fn hand(&self, hand: Hand) -> &[SwingRecord] {
        match hand {
            Hand::Left => &self.left,
            Hand::Right => &self.right,
        }
    }

    /// Lean after the last swing of the map.
    pub fn final_lean(&self) -> f64 {
        self.lean.last().map_or(0.0, |sample| sample.lean)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Runs the swing pipeline over one difficulty.
#[derive(Debug, Clone)]
pub struct SwingEngine<'a> {
    data: &'a DifficultyData,
    predictor: ParityPredictor,
    slider_precision_ms: f64,
    parallel_hands: bool,
    offsets: LateralOffsets,
}

impl<'a> SwingEngine<'a> {
    pub fn new(data: &'a DifficultyData, config: &AnalysisConfig) -> Self {
        Self {
            data,
            predictor: ParityPredictor::new(config.predictor),
            slider_precision_ms: config.slider_precision_ms,
            parallel_hands: config.parallel_hands,
            offsets: LateralOffsets::from_obstacles(data.obstacles()),
        }
    }

    /// Use a predictor with adjusted constants.
    pub fn with_predictor(mut self, predictor: ParityPredictor) -> Self {
        self.predictor = predictor;
        self
    }

    pub fn run(&self) -> SwingOutput {
        let (right, left) = if self.parallel_hands {
            rayon::join(|| self.run_hand(Hand::Right), || self.run_hand(Hand::Left))
        } else {
            (self.run_hand(Hand::Right), self.run_hand(Hand::Left))
        };

        let merged = merge(right.swings(), left.swings());
        let lean = lean_timeline(&merged);

        info!(
            "Analysed {} right and {} left swings ({} resets) with the {} predictor",
            right.len(),
            left.len(),
            merged.iter().filter(|s| s.is_reset()).count(),
            self.predictor.kind().name()
        );

        SwingOutput {
            left: left.into_swings(),
            right: right.into_swings(),
            merged,
            lean,
        }
    }

    /// Full pipeline for one hand, reset fillers included.
    pub fn run_hand(&self, hand: Hand) -> SwingState {
        let candidates = self.candidates(hand);
        let time = self.data.time();
        let mut state = SwingState::new(hand, self.offsets.clone());

        for candidate in &candidates {
            let ctx = SwingContext {
                hand,
                time,
                bombs: self.data.bombs(),
                lateral_offset: state.lateral_offset_at(candidate.start_beat()),
            };
            let record = match state.last() {
                Some(last) => self.predictor.check(candidate, &ctx, last),
                None => first_swing(candidate, &ctx),
            };
            state.add(record);
        }

        state.insert_reset_fillers(time);
        state
    }

    /// Classified swings for one hand, with arc tails attached.
    fn candidates(&self, hand: Hand) -> Vec<SwingCandidate> {
        let mut classifier =
            SwingClassifier::new(hand, self.slider_precision_ms, self.data.hand_chains(hand));
        let mut candidates: Vec<SwingCandidate> = self
            .data
            .hand_notes(hand)
            .into_iter()
            .filter_map(|note| classifier.push(note))
            .collect();
        candidates.extend(classifier.finish());

        let arcs = self.data.hand_arcs(hand);
        if arcs.is_empty() {
            return candidates;
        }

        let tails: Vec<Option<SwingTail>> = candidates
            .iter()
            .enumerate()
            .map(|(i, candidate)| {
                let last = candidate.last();
                let next_start = candidates.get(i + 1).map(SwingCandidate::start_beat);
                arcs.iter()
                    .find(|arc| {
                        arc.head.same_cell(last) && (arc.head.beat - last.beat).abs() < BEAT_EPSILON
                    })
                    .filter(|arc| arc.tail_beat > last.beat)
                    .filter(|arc| next_start.map_or(true, |start| arc.tail_beat < start))
                    .map(|arc| SwingTail {
                        beat: arc.tail_beat,
                        x: arc.tail_x,
                        y: arc.tail_y,
                    })
            })
            .collect();

        candidates
            .into_iter()
            .zip(tails)
            .map(|(candidate, tail)| match tail {
                Some(tail) => candidate.with_tail(tail),
                None => candidate,
            })
            .collect()
    }
}

/// A hand's first swing takes its parity from its own opening direction.
fn first_swing(candidate: &SwingCandidate, ctx: &SwingContext<'_>) -> SwingRecord {
    let entry = candidate.first_direction().unwrap_or(CutDirection::Any);
    let parity = if entry.is_upward() {
        Parity::Backhand
    } else {
        Parity::Forehand
    };
    let outcome = SwingOutcome {
        parity,
        reset_type: ResetType::None,
        upside_down: false,
        entry,
    };
    SwingRecord::finalize(candidate, outcome, ctx, None)
}

/// Both hands in start-beat order. Sorting is stable and the right hand goes
/// in first, so it wins ties.
pub fn merge(right: &[SwingRecord], left: &[SwingRecord]) -> Vec<SwingRecord> {
    let mut merged: Vec<SwingRecord> = right.iter().chain(left).cloned().collect();
    merged.sort_by(|a, b| a.start_beat.total_cmp(&b.start_beat));
    merged
}

/// Lean after each merged swing. Zero until both hands have swung.
pub fn lean_timeline(merged: &[SwingRecord]) -> Vec<LeanSample> {
    let mut right: Option<f64> = None;
    let mut left: Option<f64> = None;
    merged
        .iter()
        .map(|swing| {
            match swing.hand {
                Hand::Right => right = Some(swing.end_pos.rotation),
                Hand::Left => left = Some(swing.end_pos.rotation),
            }
            let lean = match (right, left) {
                (Some(r), Some(l)) => lean_between(r, l),
                _ => 0.0,
            };
            LeanSample {
                beat: swing.start_beat,
                lean,
            }
        })
        .collect()
}
