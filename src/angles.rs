//! # Saber Angles
//!
//! Angle-from-neutral (AFN) tables and direction inference helpers.
//!
//! ## Angle From Neutral
//! A forehand down cut and a backhand up cut are both neutral (0°). Every other
//! cut is expressed as the wrist rotation away from neutral needed to make it.
//! The left hand mirrors the right, so its tables are the right hand's negated.
//!
//! | Direction | R fore | R back | L fore | L back |
//! |-----------|-------:|-------:|-------:|-------:|
//! | Up        | -180   | 0      | 180    | 0      |
//! | Down      | 0      | 180    | 0      | -180   |
//! | Left      | -90    | 90     | 90     | -90    |
//! | Right     | 90     | -90    | -90    | 90     |
//! | UpLeft    | -135   | 45     | 135    | -45    |
//! | UpRight   | 135    | -45    | -135   | 45     |
//! | DownLeft  | -45    | 135    | 45     | -135   |
//! | DownRight | 45     | -135   | -45    | 135    |
//! | Any       | 0      | 0      | 0      | 0      |
//!
//! A backhand cut in one direction uses the same wrist rotation as a forehand cut
//! in the opposite direction.

use crate::model::{CutDirection, Hand, Note};
use crate::swing::Parity;

/// Right hand forehand AFN, indexed by [`CutDirection::index`].
pub const RIGHT_FOREHAND: [f64; 9] = [-180.0, 0.0, -90.0, 90.0, -135.0, 135.0, -45.0, 45.0, 0.0];
pub const RIGHT_BACKHAND: [f64; 9] = [0.0, 180.0, 90.0, -90.0, 45.0, -45.0, 135.0, -135.0, 0.0];
pub const LEFT_FOREHAND: [f64; 9] = [180.0, 0.0, 90.0, -90.0, 135.0, -135.0, 45.0, -45.0, 0.0];
pub const LEFT_BACKHAND: [f64; 9] = [0.0, -180.0, -90.0, 90.0, -45.0, 45.0, -135.0, 135.0, 0.0];

/// The AFN table for a hand and parity.
///
/// `Undecided` only exists before a hand's first swing and reads as forehand.
pub fn table(hand: Hand, parity: Parity) -> &'static [f64; 9] {
    match (hand, parity) {
        (Hand::Right, Parity::Backhand) => &RIGHT_BACKHAND,
        (Hand::Right, _) => &RIGHT_FOREHAND,
        (Hand::Left, Parity::Backhand) => &LEFT_BACKHAND,
        (Hand::Left, _) => &LEFT_FOREHAND,
    }
}

/// Angle from neutral of a cut.
pub fn afn(hand: Hand, parity: Parity, direction: CutDirection) -> f64 {
    table(hand, parity)[direction.index()]
}

/// Whether a rotation sits on the ±180° seam of the tables.
pub fn is_degenerate(rotation: f64) -> bool {
    rotation.abs() == 180.0
}

/// Closest cut direction to a saber rotation.
///
/// With `snap` the rotation is first rounded to the nearest 45°. Ties go to the
/// earlier direction in table order, so a concrete direction always wins over `Any`.
pub fn direction_from_rotation(
    rotation: f64,
    parity: Parity,
    hand: Hand,
    snap: bool,
) -> CutDirection {
    let target = if snap {
        (rotation / 45.0).round() * 45.0
    } else {
        rotation
    };
    let angles = table(hand, parity);

    let mut best = CutDirection::Down;
    let mut best_distance = f64::INFINITY;
    for dir in CutDirection::ALL {
        let distance = angular_distance(angles[dir.index()], target);
        if distance < best_distance {
            best = dir;
            best_distance = distance;
        }
    }
    best
}

/// Smallest absolute difference between two angles in degrees.
pub fn angular_distance(a: f64, b: f64) -> f64 {
    let diff = (a - b).rem_euclid(360.0);
    diff.min(360.0 - diff)
}

/// Direction of travel from one note to the next, or `Any` if they share a cell.
pub fn direction_between(from: &Note, to: &Note) -> CutDirection {
    CutDirection::from_vector(to.x - from.x, to.y - from.y)
}

/// Whether two cuts can be made in one motion, judged by their AFN in either parity.
pub fn within_swing_angle(hand: Hand, a: CutDirection, b: CutDirection, limit: f64) -> bool {
    let fore = (afn(hand, Parity::Forehand, a) - afn(hand, Parity::Forehand, b)).abs();
    let back = (afn(hand, Parity::Backhand, a) - afn(hand, Parity::Backhand, b)).abs();
    fore <= limit || back <= limit
}
