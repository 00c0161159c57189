//! # Bomb Grid
//!
//! A 4x3 occupancy snapshot of one bomb cluster, used to simulate how a resting
//! saber has to move out of the way before the next swing.
//!
//! ## Purpose
//! Between two swings the saber rests near where the last swing ended. After a
//! forehand it hangs on the low side of the hand, after a backhand on the high side.
//! A bomb in that resting area forces the player to lift (or drop) the saber, which
//! is the same motion as an unscored swing in the opposite parity.
//!
//! ## Path Predicates
//! For each inferred cut direction there is one predicate deciding whether an
//! occupied cell blocks the resting saber:
//! - **Up / Down**: bombs in the hand's column on the saber side. The hand's own
//!   row counts when the parity is the natural one for the direction (forehand for
//!   down, backhand for up).
//! - **Left / Right**: bombs in the hand's row toward the side the cut travelled, or
//!   directly on the saber side of the hand.
//! - **Diagonals**: bombs on the saber side in the hand's column or the neighbouring
//!   column the cut travelled toward.
//! - **Any**: only a bomb on the hand's own cell, since a dot can be angled around the rest.
//!
//! ## Related Modules
//! - `parity` - Clusters bombs into grids and walks the hand through them
//! - `swing` - Uses the dodge table to place reset filler swings

use crate::model::{clamp_x, clamp_y, Bomb, CutDirection, GRID_HEIGHT, GRID_WIDTH};
use crate::swing::Parity;
use serde::Serialize;

/// A cell on the grid and whether a bomb occupies it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridPosition {
    pub x: i32,
    pub y: i32,
    pub has_bomb: bool,
}

impl GridPosition {
    /// A cell, clamped to the grid.
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            x: clamp_x(x),
            y: clamp_y(y),
            has_bomb: false,
        }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn same_cell(&self, other: &GridPosition) -> bool {
        self.x == other.x && self.y == other.y
    }
}

/// Direction a hand moves to get clear of a bomb in each cell, indexed `[x][y]`.
///
/// Edge cells push toward the centre. The two middle-row centre cells have no
/// entry: a hand cannot be pushed out of the middle by geometry alone.
const DODGE_VECTORS: [[Option<(i32, i32)>; 3]; 4] = [
    [Some((1, 1)), Some((1, 0)), Some((1, -1))],
    [Some((0, 1)), None, Some((0, -1))],
    [Some((0, 1)), None, Some((0, -1))],
    [Some((-1, 1)), Some((-1, 0)), Some((-1, -1))],
];

/// Dodge vector for a cell, if the table defines one.
pub fn avoidance_vector(x: i32, y: i32) -> Option<(i32, i32)> {
    DODGE_VECTORS
        .get(x as usize)
        .and_then(|column| column.get(y as usize))
        .copied()
        .flatten()
}

/// Vertical escape used for the centre cells: away from the saber side.
fn parity_escape(parity: Parity) -> (i32, i32) {
    match parity {
        Parity::Backhand => (0, -1),
        _ => (0, 1),
    }
}

/// Occupancy of one bomb cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BombGrid {
    cells: [[bool; 3]; 4],
}

impl BombGrid {
    /// Build a grid from bombs sharing one time bucket.
    pub fn from_bombs<'a>(bombs: impl IntoIterator<Item = &'a Bomb>) -> Self {
        let mut cells = [[false; 3]; 4];
        for bomb in bombs {
            cells[clamp_x(bomb.x) as usize][clamp_y(bomb.y) as usize] = true;
        }
        Self { cells }
    }

    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        if !(0..GRID_WIDTH).contains(&x) || !(0..GRID_HEIGHT).contains(&y) {
            return false;
        }
        self.cells[x as usize][y as usize]
    }

    pub fn bomb_count(&self) -> usize {
        self.cells.iter().flatten().filter(|&&occupied| occupied).count()
    }

    /// Occupied cells in row-major order, bottom row first.
    pub fn bomb_positions(&self) -> impl Iterator<Item = GridPosition> + '_ {
        (0..GRID_HEIGHT).flat_map(move |y| {
            (0..GRID_WIDTH).filter_map(move |x| {
                self.is_occupied(x, y).then_some(GridPosition {
                    x,
                    y,
                    has_bomb: true,
                })
            })
        })
    }

    /// First bomb that blocks the resting saber, if any.
    pub fn bomb_forces_path_change(
        &self,
        hand: GridPosition,
        direction: CutDirection,
        last_parity: Parity,
    ) -> Option<GridPosition> {
        self.bomb_positions()
            .find(|bomb| blocks_path(bomb, hand, direction, last_parity))
    }

    /// Move the hand through this cluster.
    ///
    /// `lateral_offset` is how far the player has stepped sideways; the hand is
    /// checked against the grid from that shifted column. Returns the new hand
    /// position and whether the hand had to flip parity to get clear.
    pub fn simulate_saber_update(
        &self,
        hand: GridPosition,
        direction: CutDirection,
        last_parity: Parity,
        lateral_offset: i32,
    ) -> (GridPosition, bool) {
        let effective = hand.offset(lateral_offset, 0);
        match self.bomb_forces_path_change(effective, direction, last_parity) {
            Some(bomb) => {
                let (dx, dy) =
                    avoidance_vector(bomb.x, bomb.y).unwrap_or_else(|| parity_escape(last_parity));
                (hand.offset(dx, dy), true)
            }
            None => (hand, false),
        }
    }
}

/// Whether a bomb lies on the saber side of the hand, vertically.
///
/// `inclusive` also counts the hand's own row.
fn on_saber_side(bomb: &GridPosition, hand: GridPosition, parity: Parity, inclusive: bool) -> bool {
    match (parity, inclusive) {
        (Parity::Backhand, true) => bomb.y >= hand.y,
        (Parity::Backhand, false) => bomb.y > hand.y,
        (_, true) => bomb.y <= hand.y,
        (_, false) => bomb.y < hand.y,
    }
}

fn saber_side_row(hand: GridPosition, parity: Parity) -> i32 {
    match parity {
        Parity::Backhand => hand.y + 1,
        _ => hand.y - 1,
    }
}

fn blocks_path(
    bomb: &GridPosition,
    hand: GridPosition,
    direction: CutDirection,
    parity: Parity,
) -> bool {
    match direction {
        CutDirection::Up => {
            bomb.x == hand.x && on_saber_side(bomb, hand, parity, parity == Parity::Backhand)
        }
        CutDirection::Down => {
            bomb.x == hand.x && on_saber_side(bomb, hand, parity, parity != Parity::Backhand)
        }
        CutDirection::Left => {
            (bomb.y == hand.y && bomb.x <= hand.x)
                || (bomb.x == hand.x && bomb.y == saber_side_row(hand, parity))
        }
        CutDirection::Right => {
            (bomb.y == hand.y && bomb.x >= hand.x)
                || (bomb.x == hand.x && bomb.y == saber_side_row(hand, parity))
        }
        CutDirection::UpLeft | CutDirection::DownLeft => {
            (bomb.x == hand.x || bomb.x == hand.x - 1) && on_saber_side(bomb, hand, parity, true)
        }
        CutDirection::UpRight | CutDirection::DownRight => {
            (bomb.x == hand.x || bomb.x == hand.x + 1) && on_saber_side(bomb, hand, parity, true)
        }
        CutDirection::Any => bomb.x == hand.x && bomb.y == hand.y,
    }
}
