//! Bomb cluster simulation between two swings on one hand.

use crate::grid::{BombGrid, GridPosition};
use crate::model::{Bomb, CutDirection};
use crate::swing::{Parity, SwingContext, SwingRecord};
use log::trace;

/// Where the resting saber ends up after walking through every bomb cluster in a gap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BombSimulation {
    pub position: GridPosition,
    pub parity: Parity,
    /// Cut direction the saber is travelling in after the last flip
    pub direction: CutDirection,
    pub bomb_count: usize,
    pub clusters: usize,
    /// Bombs per beat across the gap
    pub density: f64,
}

impl BombSimulation {
    /// Whether the bombs pushed the hand into the other parity.
    ///
    /// Only parity counts. A hand dodged into a new cell but flipped back to its
    /// original parity swings on normally from there.
    pub fn indicates_reset(&self, last_parity: Parity) -> bool {
        self.parity != last_parity
    }
}

/// Bombs strictly after `from` and strictly before `to`.
pub fn bombs_between(bombs: &[Bomb], from: f64, to: f64) -> Vec<&Bomb> {
    bombs
        .iter()
        .skip_while(|b| b.beat <= from)
        .take_while(|b| b.beat < to)
        .collect()
}

/// Group time-ordered bombs into clusters.
///
/// A bomb joins the current cluster while it is within `snap` beats of the
/// cluster's first bomb.
pub fn cluster_bombs(bombs: &[&Bomb], snap: f64) -> Vec<BombGrid> {
    let mut grids = Vec::new();
    let mut start = 0;
    for i in 1..=bombs.len() {
        let closes = match bombs.get(i) {
            Some(bomb) => bomb.beat - bombs[start].beat > snap,
            None => true,
        };
        if closes && start < i {
            grids.push(BombGrid::from_bombs(bombs[start..i].iter().copied()));
            start = i;
        }
    }
    grids
}

/// Walk the saber from the end of `last` through the bombs before `next_beat`.
///
/// Returns `None` when no bombs fall in the gap.
pub fn simulate(
    last: &SwingRecord,
    last_exit: CutDirection,
    next_beat: f64,
    ctx: &SwingContext<'_>,
    snap: f64,
) -> Option<BombSimulation> {
    let from = last.last_note().map_or(last.end_beat, |n| n.beat);
    let bombs = bombs_between(ctx.bombs, from, next_beat);
    if bombs.is_empty() {
        return None;
    }

    let grids = cluster_bombs(&bombs, snap);
    let mut position = GridPosition::new(last.end_pos.x, last.end_pos.y);
    let mut parity = last.parity;
    let mut direction = last_exit;

    for grid in &grids {
        let (next, flipped) =
            grid.simulate_saber_update(position, direction, parity, ctx.lateral_offset);
        if flipped {
            parity = parity.flip();
            direction = direction.opposite();
        }
        trace!(
            "{:?} bomb cluster ({} bombs): hand ({}, {}) -> ({}, {}), flipped = {}",
            ctx.hand,
            grid.bomb_count(),
            position.x,
            position.y,
            next.x,
            next.y,
            flipped
        );
        position = next;
    }

    let gap = next_beat - from;
    let density = if gap > 0.0 {
        bombs.len() as f64 / gap
    } else {
        0.0
    };

    Some(BombSimulation {
        position,
        parity,
        direction,
        bomb_count: bombs.len(),
        clusters: grids.len(),
        density,
    })
}
