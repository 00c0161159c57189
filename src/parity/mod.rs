//! # Parity Module
//!
//! Decide the hand orientation of each swing from the swing before it.
//!
//! ## Purpose
//! Every swing after a hand's first is played either forehand or backhand. Normally
//! the two alternate, but two situations make the player repeat a parity (a *reset*):
//! 1. **Bomb resets** - bombs between the swings force the resting saber out of the
//!    way, which is an unscored swing in the other parity
//! 2. **Rebounds** - the wrist rotation from one cut into the next is too large to
//!    flip into, so the player resets instead
//!
//! ## Sub-modules
//! - `bombs` - Bomb clustering and the resting-saber walk through each cluster
//!
//! ## Key Types
//! - [`ParityPredictor`] - Closed set of heuristics sharing one decision procedure
//! - [`PredictorConfig`] - Every tuned constant a heuristic uses
//!
//! ## Decision Procedure
//! 1. Resolve the previous swing's exit direction (dots read back from its rotation)
//! 2. Resolve the candidate's entry direction (dots cut against the hand's travel)
//! 3. Compare angle from neutral in the previous parity against the flipped parity
//! 4. Flag upside-down continuations
//! 5. Walk the saber through bomb clusters in the gap; a parity change is a bomb
//!    reset unless the heuristic's filter rejects it
//! 6. Otherwise flip, or rebound when the rotation change exceeds the threshold
//!
//! ## Heuristics
//!
//! | | Generic | Experimental | Retro |
//! |---|---|---|---|
//! | Bomb cluster snap (beats) | 0.05 | 0.325 | 0.05 |
//! | Rebound threshold | 270° | 270° | 135°, plus 90°/45° by parity |
//! | Upside-down check | yes | yes | no |
//! | Snap dot rotations to 45° | yes | yes | no |
//!
//! ## Related Modules
//! - `grid` - `BombGrid` path predicates and dodge vectors
//! - `angles` - AFN tables
//! - `swing` - Candidates in, records out

pub mod bombs;


use crate::angles::{afn, direction_between, direction_from_rotation, is_degenerate};
use crate::config::PredictorKind;
use crate::model::{CutDirection, Hand};
use crate::swing::{
    Parity, ResetType, SwingCandidate, SwingContext, SwingOutcome, SwingRecord,
};
use log::trace;

pub use bombs::BombSimulation;

/// How a heuristic double-checks a bomb reset before accepting it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResetFilter {
    /// Reject when the cut is less natural in the repeated parity than in the flipped one.
    PreferNatural,
    /// Always keep dense bomb gaps. Otherwise reject when the repeated parity needs
    /// at least `margin` degrees more rotation than the flipped one.
    DensityMargin { min_density: f64, margin: f64 },
    /// Reject when the repeated parity needs at least `limit` degrees of rotation.
    RotationLimit { limit: f64 },
}

/// How a dot swing's direction is guessed when the hand does not move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DotInference {
    /// The natural cut for the flipped parity: up after a forehand, down after a backhand.
    ParityDefault,
    /// The opposite of the previous swing's exit.
    OppositeExit,
}

/// Extra rebound rules keyed by the previous parity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReboundLimits {
    /// After a backhand: rotation change above this...
    pub after_backhand_change: f64,
    /// ...into a forehand cut at least this far from neutral
    pub after_backhand_afn: f64,
    pub after_forehand_change: f64,
    pub after_forehand_afn: f64,
}

/// Tuned constants of one heuristic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictorConfig {
    /// Bombs within this many beats of a cluster's first bomb share its grid
    pub bomb_snap: f64,
    /// Rotation change above which the player rebounds instead of flipping
    pub reset_threshold: f64,
    pub rebound_limits: Option<ReboundLimits>,
    /// Round dot-swing rotations to 45° before looking up a direction
    pub snap_rotation: bool,
    pub upside_down: bool,
    pub filter: ResetFilter,
    pub dot_inference: DotInference,
}

impl PredictorConfig {
    pub fn for_kind(kind: PredictorKind) -> Self {
        match kind {
            PredictorKind::Generic => Self {
                bomb_snap: 0.05,
                reset_threshold: 270.0,
                rebound_limits: None,
                snap_rotation: true,
                upside_down: true,
                filter: ResetFilter::PreferNatural,
                dot_inference: DotInference::ParityDefault,
            },
            PredictorKind::Experimental => Self {
                bomb_snap: 0.325,
                reset_threshold: 270.0,
                rebound_limits: None,
                snap_rotation: true,
                upside_down: true,
                filter: ResetFilter::DensityMargin {
                    min_density: 4.0,
                    margin: 90.0,
                },
                dot_inference: DotInference::OppositeExit,
            },
            PredictorKind::Retro => Self {
                bomb_snap: 0.05,
                reset_threshold: 135.0,
                rebound_limits: Some(ReboundLimits {
                    after_backhand_change: 90.0,
                    after_backhand_afn: 90.0,
                    after_forehand_change: 45.0,
                    after_forehand_afn: 135.0,
                }),
                snap_rotation: false,
                upside_down: false,
                filter: ResetFilter::RotationLimit { limit: 90.0 },
                dot_inference: DotInference::ParityDefault,
            },
        }
    }
}

/// A parity heuristic.
///
/// All three share [`ParityPredictor::check`]; they differ only in the constants
/// carried by their [`PredictorConfig`].
///
/// # Example
/// ```rust
/// use swing_parity::{ParityPredictor, PredictorKind};
///
/// let predictor = ParityPredictor::new(PredictorKind::Retro);
/// assert_eq!(predictor.config().reset_threshold, 135.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParityPredictor {
    Generic(PredictorConfig),
    Experimental(PredictorConfig),
    Retro(PredictorConfig),
}

impl Default for ParityPredictor {
    fn default() -> Self {
        Self::new(PredictorKind::Generic)
    }
}

impl ParityPredictor {
    pub fn new(kind: PredictorKind) -> Self {
        Self::with_config(kind, PredictorConfig::for_kind(kind))
    }

    /// A heuristic with adjusted constants.
    pub fn with_config(kind: PredictorKind, config: PredictorConfig) -> Self {
        match kind {
            PredictorKind::Generic => ParityPredictor::Generic(config),
            PredictorKind::Experimental => ParityPredictor::Experimental(config),
            PredictorKind::Retro => ParityPredictor::Retro(config),
        }
    }

    pub fn kind(&self) -> PredictorKind {
        match self {
            ParityPredictor::Generic(_) => PredictorKind::Generic,
            ParityPredictor::Experimental(_) => PredictorKind::Experimental,
            ParityPredictor::Retro(_) => PredictorKind::Retro,
        }
    }

    pub fn config(&self) -> &PredictorConfig {
        match self {
            ParityPredictor::Generic(config)
            | ParityPredictor::Experimental(config)
            | ParityPredictor::Retro(config) => config,
        }
    }

    /// Finalize a candidate that follows `last` on the same hand.
    pub fn check(
        &self,
        candidate: &SwingCandidate,
        ctx: &SwingContext<'_>,
        last: &SwingRecord,
    ) -> SwingRecord {
        let outcome = self.decide(candidate, ctx, last);
        SwingRecord::finalize(candidate, outcome, ctx, Some(last))
    }

    /// Parity, reset and upside-down flag for a candidate.
    pub fn decide(
        &self,
        candidate: &SwingCandidate,
        ctx: &SwingContext<'_>,
        last: &SwingRecord,
    ) -> SwingOutcome {
        let config = self.config();
        let hand = ctx.hand;

        let last_exit = self.exit_direction(last, hand);
        let entry = self.entry_direction(candidate, last, last_exit);

        let current_afn = afn(hand, last.parity, last_exit);
        let flipped_afn = afn(hand, last.parity.flip(), entry);
        let change = current_afn - flipped_afn;

        let upside_down =
            config.upside_down && is_upside_down(last, entry, candidate.first().is_dot());

        let simulation =
            bombs::simulate(last, last_exit, candidate.start_beat(), ctx, config.bomb_snap);
        if let Some(sim) = simulation {
            if sim.indicates_reset(last.parity)
                && self.keeps_bomb_reset(candidate, &sim, last.parity, hand, entry)
            {
                trace!(
                    "{:?} bomb reset before beat {} ({} bombs in {} clusters)",
                    hand,
                    candidate.start_beat(),
                    sim.bomb_count,
                    sim.clusters
                );
                return SwingOutcome {
                    parity: last.parity,
                    reset_type: ResetType::Bomb,
                    upside_down,
                    entry,
                };
            }
        }

        let flip = SwingOutcome {
            parity: last.parity.flip(),
            reset_type: ResetType::None,
            upside_down,
            entry,
        };
        let rebound = SwingOutcome {
            parity: last.parity,
            reset_type: ResetType::Rebound,
            ..flip
        };

        if candidate.is_all_dots() {
            return flip;
        }

        if is_degenerate(last.end_pos.rotation) {
            // Either side of the seam is the same rotation; take the gentler reading
            let seam = last.end_pos.rotation;
            let direct = seam - flipped_afn;
            let mirrored = -seam - flipped_afn;
            let change = if mirrored.abs() < direct.abs() { mirrored } else { direct };
            return if self.exceeds_threshold(change, last.parity, hand, entry) && !upside_down {
                rebound
            } else {
                flip
            };
        }

        if self.exceeds_threshold(change, last.parity, hand, entry) && !upside_down {
            rebound
        } else {
            flip
        }
    }

    /// Direction the previous swing finished travelling in.
    fn exit_direction(&self, last: &SwingRecord, hand: Hand) -> CutDirection {
        match last.first_direction() {
            Some(dir) => dir,
            None => direction_from_rotation(
                last.end_pos.rotation,
                last.parity,
                hand,
                self.config().snap_rotation,
            ),
        }
    }

    /// Direction the candidate opens with. A dot is cut against the hand's travel
    /// from the previous swing's last note.
    fn entry_direction(
        &self,
        candidate: &SwingCandidate,
        last: &SwingRecord,
        last_exit: CutDirection,
    ) -> CutDirection {
        if let Some(dir) = candidate.first_direction() {
            return dir;
        }

        let travel = last
            .last_note()
            .map(|prev| direction_between(prev, candidate.first()))
            .unwrap_or(CutDirection::Any);
        if travel != CutDirection::Any {
            return travel.opposite();
        }

        match self.config().dot_inference {
            DotInference::ParityDefault => match last.parity {
                Parity::Forehand => CutDirection::Up,
                _ => CutDirection::Down,
            },
            DotInference::OppositeExit => last_exit.opposite(),
        }
    }

    fn exceeds_threshold(
        &self,
        change: f64,
        last_parity: Parity,
        hand: Hand,
        entry: CutDirection,
    ) -> bool {
        let config = self.config();
        if change.abs() > config.reset_threshold {
            return true;
        }
        match (config.rebound_limits, last_parity) {
            (Some(limits), Parity::Backhand) => {
                change.abs() > limits.after_backhand_change
                    && afn(hand, Parity::Forehand, entry).abs() >= limits.after_backhand_afn
            }
            (Some(limits), Parity::Forehand) => {
                change.abs() > limits.after_forehand_change
                    && afn(hand, Parity::Backhand, entry).abs() >= limits.after_forehand_afn
            }
            _ => false,
        }
    }

    fn keeps_bomb_reset(
        &self,
        candidate: &SwingCandidate,
        sim: &BombSimulation,
        last_parity: Parity,
        hand: Hand,
        entry: CutDirection,
    ) -> bool {
        if candidate.is_all_dots() {
            return true;
        }
        let repeated = afn(hand, last_parity, entry).abs();
        let flipped = afn(hand, last_parity.flip(), entry).abs();

        match self.config().filter {
            ResetFilter::PreferNatural => repeated <= flipped,
            ResetFilter::DensityMargin { min_density, margin } => {
                sim.density >= min_density || repeated - flipped < margin
            }
            ResetFilter::RotationLimit { limit } => repeated < limit,
        }
    }
}

/// Whether the next cut continues from a saber left past vertical.
fn is_upside_down(last: &SwingRecord, entry: CutDirection, dot: bool) -> bool {
    let rotation = last.end_pos.rotation;
    match last.parity {
        Parity::Backhand => rotation > 0.0 && (dot || entry == CutDirection::Up),
        Parity::Forehand => rotation < 0.0 && (dot || entry == CutDirection::Down),
        Parity::Undecided => false,
    }
}
