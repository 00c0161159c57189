//! # Map Event Model
//!
//! This module defines the normalized event types that the swing analyser consumes.
//!
//! ## Type Hierarchy
//! ```text
//! DifficultyData
//!   ├── TimeDomain (tempo map + song offset)
//!   ├── Vec<Note>      beat, ms, x, y, hand, cut direction
//!   ├── Vec<Bomb>      beat, ms, x, y
//!   ├── Vec<Obstacle>  beat, ms, duration, x, y, width, height
//!   ├── Vec<Arc>       head Note + tail (beat, x, y) + curve shape
//!   └── Vec<Chain>     head Note + tail (beat, x, y) + slice shape
//! ```
//!
//! ## Key Concepts
//!
//! ### Grid
//! Every positioned event lives on the 4x3 grid: `x` in `0..=3` (left to right),
//! `y` in `0..=2` (bottom to top). Coordinates are validated once, here, and the
//! rest of the crate treats them as trusted.
//!
//! ### Cut Direction
//! A closed enum with the eight compass directions plus `Any` (a dot note).
//! Direction tables elsewhere in the crate are fixed-size arrays indexed by
//! [`CutDirection::index`].
//!
//! ### Time
//! Each event carries both its beat and the real time in milliseconds derived
//! from the map's [`TimeDomain`]. [`DifficultyData::new`] stamps the millisecond
//! values so callers only supply beats.
//!
//! ## Related Modules
//! - `timing` - Beat/second conversion used to stamp timestamps
//! - `swing` - Consumes these events hand by hand
//! - `error` - Validation failures are reported as `AnalysisError`

use crate::error::AnalysisError;
use crate::timing::TimeDomain;
use serde::{Deserialize, Serialize};

pub const GRID_WIDTH: i32 = 4;
pub const GRID_HEIGHT: i32 = 3;

/// Beats closer than this are treated as simultaneous.
pub const BEAT_EPSILON: f64 = 1e-4;

/// Clamp a column to the grid.
pub fn clamp_x(x: i32) -> i32 {
    x.clamp(0, GRID_WIDTH - 1)
}

/// Clamp a row to the grid.
pub fn clamp_y(y: i32) -> i32 {
    y.clamp(0, GRID_HEIGHT - 1)
}

/// Which saber hits a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hand {
    Left,
    Right,
}

/// Cut direction of a note.
///
/// The discriminants match the map format's numbering (0 = up ... 8 = any).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CutDirection {
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3,
    UpLeft = 4,
    UpRight = 5,
    DownLeft = 6,
    DownRight = 7,
    Any = 8,
}

impl CutDirection {
    pub const ALL: [CutDirection; 9] = [
        CutDirection::Up,
        CutDirection::Down,
        CutDirection::Left,
        CutDirection::Right,
        CutDirection::UpLeft,
        CutDirection::UpRight,
        CutDirection::DownLeft,
        CutDirection::DownRight,
        CutDirection::Any,
    ];

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// True for dot notes, whose swing angle has to be inferred.
    pub fn is_dot(self) -> bool {
        self == CutDirection::Any
    }

    /// Unit step on the grid in the direction of the cut (`y` grows upwards).
    pub fn vector(self) -> (i32, i32) {
        match self {
            CutDirection::Up => (0, 1),
            CutDirection::Down => (0, -1),
            CutDirection::Left => (-1, 0),
            CutDirection::Right => (1, 0),
            CutDirection::UpLeft => (-1, 1),
            CutDirection::UpRight => (1, 1),
            CutDirection::DownLeft => (-1, -1),
            CutDirection::DownRight => (1, -1),
            CutDirection::Any => (0, 0),
        }
    }

    /// Direction for a grid step, or `Any` for the zero step.
    pub fn from_vector(dx: i32, dy: i32) -> Self {
        match (dx.signum(), dy.signum()) {
            (0, 1) => CutDirection::Up,
            (0, -1) => CutDirection::Down,
            (-1, 0) => CutDirection::Left,
            (1, 0) => CutDirection::Right,
            (-1, 1) => CutDirection::UpLeft,
            (1, 1) => CutDirection::UpRight,
            (-1, -1) => CutDirection::DownLeft,
            (1, -1) => CutDirection::DownRight,
            _ => CutDirection::Any,
        }
    }

    pub fn opposite(self) -> Self {
        let (dx, dy) = self.vector();
        Self::from_vector(-dx, -dy)
    }

    /// Up, up-left and up-right: the directions a backhand naturally opens with.
    pub fn is_upward(self) -> bool {
        matches!(
            self,
            CutDirection::Up | CutDirection::UpLeft | CutDirection::UpRight
        )
    }

    pub fn is_downward(self) -> bool {
        matches!(
            self,
            CutDirection::Down | CutDirection::DownLeft | CutDirection::DownRight
        )
    }
}

/// A colour note.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub beat: f64,
    /// Real time in milliseconds, stamped by [`DifficultyData::new`].
    pub ms: f64,
    pub x: i32,
    pub y: i32,
    pub hand: Hand,
    pub direction: CutDirection,
    pub angle_offset: i32,
}

impl Note {
    pub fn new(beat: f64, x: i32, y: i32, hand: Hand, direction: CutDirection) -> Self {
        Self {
            beat,
            ms: 0.0,
            x,
            y,
            hand,
            direction,
            angle_offset: 0,
        }
    }

    pub fn with_angle_offset(mut self, angle_offset: i32) -> Self {
        self.angle_offset = angle_offset;
        self
    }

    pub fn is_dot(&self) -> bool {
        self.direction.is_dot()
    }

    pub fn same_cell(&self, other: &Note) -> bool {
        self.x == other.x && self.y == other.y
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bomb {
    pub beat: f64,
    pub ms: f64,
    pub x: i32,
    pub y: i32,
}

impl Bomb {
    pub fn new(beat: f64, x: i32, y: i32) -> Self {
        Self { beat, ms: 0.0, x, y }
    }
}

/// A wall. Only its lateral footprint matters to the analyser.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Obstacle {
    pub beat: f64,
    pub ms: f64,
    pub duration: f64,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Obstacle {
    pub fn new(beat: f64, duration: f64, x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            beat,
            ms: 0.0,
            duration,
            x,
            y,
            width,
            height,
        }
    }

    pub fn end_beat(&self) -> f64 {
        self.beat + self.duration
    }

    /// Whether the wall occupies the given column.
    pub fn covers_column(&self, column: i32) -> bool {
        column >= self.x && column < self.x + self.width
    }
}

/// An arc (slider): a curve from a head note to a tail point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Arc {
    pub head: Note,
    pub tail_beat: f64,
    pub tail_ms: f64,
    pub tail_x: i32,
    pub tail_y: i32,
    pub head_multiplier: f64,
    pub tail_multiplier: f64,
    pub mid_anchor: u8,
}

impl Arc {
    pub fn new(head: Note, tail_beat: f64, tail_x: i32, tail_y: i32) -> Self {
        Self {
            head,
            tail_beat,
            tail_ms: 0.0,
            tail_x,
            tail_y,
            head_multiplier: 1.0,
            tail_multiplier: 1.0,
            mid_anchor: 0,
        }
    }
}

/// A chain (burst slider): a head note followed by link slices up to a tail point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chain {
    pub head: Note,
    pub tail_beat: f64,
    pub tail_ms: f64,
    pub tail_x: i32,
    pub tail_y: i32,
    pub slice_count: u32,
    pub squish: f64,
}

impl Chain {
    pub fn new(head: Note, tail_beat: f64, tail_x: i32, tail_y: i32) -> Self {
        Self {
            head,
            tail_beat,
            tail_ms: 0.0,
            tail_x,
            tail_y,
            slice_count: 3,
            squish: 1.0,
        }
    }

    /// Whether this chain starts at the given note.
    pub fn starts_at(&self, note: &Note) -> bool {
        self.head.hand == note.hand
            && self.head.same_cell(note)
            && (self.head.beat - note.beat).abs() < BEAT_EPSILON
    }

    /// The link at the end of the chain, struck in the same motion as the head.
    pub fn tail_note(&self) -> Note {
        Note {
            beat: self.tail_beat,
            ms: self.tail_ms,
            x: self.tail_x,
            y: self.tail_y,
            hand: self.head.hand,
            direction: self.head.direction,
            angle_offset: self.head.angle_offset,
        }
    }
}

/// Raw event lists for one difficulty, as produced by a map loader.
#[derive(Debug, Clone, Default)]
pub struct MapEvents {
    pub notes: Vec<Note>,
    pub bombs: Vec<Bomb>,
    pub obstacles: Vec<Obstacle>,
    pub arcs: Vec<Arc>,
    pub chains: Vec<Chain>,
}

/// Validated, time-stamped input for one difficulty.
#[derive(Debug, Clone)]
pub struct DifficultyData {
    time: TimeDomain,
    notes: Vec<Note>,
    bombs: Vec<Bomb>,
    obstacles: Vec<Obstacle>,
    arcs: Vec<Arc>,
    chains: Vec<Chain>,
}

impl DifficultyData {
    /// Validate raw events and stamp their real-time values.
    ///
    /// Checks grid ranges, beat ordering and finiteness. Chain heads that have no
    /// matching colour note are added to the note list so the chain still produces a swing.
    ///
    /// # Example
    /// ```rust
    /// use swing_parity::{CutDirection, DifficultyData, Hand, MapEvents, Note, TimeDomain};
    ///
    /// let time = TimeDomain::new(120.0, 0.0, &[]).unwrap();
    /// let events = MapEvents {
    ///     notes: vec![Note::new(2.0, 1, 0, Hand::Right, CutDirection::Down)],
    ///     ..Default::default()
    /// };
    /// let data = DifficultyData::new(time, events).unwrap();
    /// assert_eq!(data.notes()[0].ms, 1000.0);
    /// ```
    pub fn new(time: TimeDomain, events: MapEvents) -> Result<Self, AnalysisError> {
        let MapEvents {
            mut notes,
            mut bombs,
            mut obstacles,
            mut arcs,
            mut chains,
        } = events;

        for (i, note) in notes.iter().enumerate() {
            validate_beat("note", i, note.beat)?;
            validate_cell("note", i, note.x, note.y)?;
        }
        check_order("note", notes.iter().map(|n| n.beat))?;

        for (i, bomb) in bombs.iter().enumerate() {
            validate_beat("bomb", i, bomb.beat)?;
            validate_cell("bomb", i, bomb.x, bomb.y)?;
        }
        check_order("bomb", bombs.iter().map(|b| b.beat))?;

        for (i, obstacle) in obstacles.iter().enumerate() {
            validate_beat("obstacle", i, obstacle.beat)?;
            if !obstacle.duration.is_finite() || obstacle.duration < 0.0 {
                return Err(AnalysisError::InvalidEvent {
                    kind: "obstacle",
                    index: i,
                    message: format!(
                        "duration {} must be a non-negative number",
                        obstacle.duration
                    ),
                });
            }
            if obstacle.width < 0 || obstacle.height < 0 {
                return Err(AnalysisError::InvalidEvent {
                    kind: "obstacle",
                    index: i,
                    message: format!(
                        "size {}x{} must not be negative",
                        obstacle.width, obstacle.height
                    ),
                });
            }
        }
        check_order("obstacle", obstacles.iter().map(|o| o.beat))?;

        for (i, arc) in arcs.iter().enumerate() {
            validate_beat("arc", i, arc.head.beat)?;
            validate_cell("arc", i, arc.head.x, arc.head.y)?;
            validate_tail("arc", i, arc.head.beat, arc.tail_beat, arc.tail_x, arc.tail_y)?;
        }

        for (i, chain) in chains.iter().enumerate() {
            validate_beat("chain", i, chain.head.beat)?;
            validate_cell("chain", i, chain.head.x, chain.head.y)?;
            validate_tail(
                "chain",
                i,
                chain.head.beat,
                chain.tail_beat,
                chain.tail_x,
                chain.tail_y,
            )?;
        }

        // A chain head is normally also present as a colour note
        let orphan_heads: Vec<Note> = chains
            .iter()
            .filter(|chain| !notes.iter().any(|note| chain.starts_at(note)))
            .map(|chain| chain.head)
            .collect();
        if !orphan_heads.is_empty() {
            notes.extend(orphan_heads);
            notes.sort_by(|a, b| a.beat.total_cmp(&b.beat));
        }

        for note in &mut notes {
            note.ms = time.to_millis(note.beat);
        }
        for bomb in &mut bombs {
            bomb.ms = time.to_millis(bomb.beat);
        }
        for obstacle in &mut obstacles {
            obstacle.ms = time.to_millis(obstacle.beat);
        }
        for arc in &mut arcs {
            arc.head.ms = time.to_millis(arc.head.beat);
            arc.tail_ms = time.to_millis(arc.tail_beat);
        }
        for chain in &mut chains {
            chain.head.ms = time.to_millis(chain.head.beat);
            chain.tail_ms = time.to_millis(chain.tail_beat);
        }
        chains.sort_by(|a, b| a.head.beat.total_cmp(&b.head.beat));
        arcs.sort_by(|a, b| a.head.beat.total_cmp(&b.head.beat));

        Ok(Self {
            time,
            notes,
            bombs,
            obstacles,
            arcs,
            chains,
        })
    }

    pub fn time(&self) -> &TimeDomain {
        &self.time
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn bombs(&self) -> &[Bomb] {
        &self.bombs
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn arcs(&self) -> &[Arc] {
        &self.arcs
    }

    pub fn chains(&self) -> &[Chain] {
        &self.chains
    }

    /// Notes struck by one hand, in beat order.
    pub fn hand_notes(&self, hand: Hand) -> Vec<Note> {
        self.notes.iter().filter(|n| n.hand == hand).copied().collect()
    }

    pub fn hand_chains(&self, hand: Hand) -> Vec<Chain> {
        self.chains
            .iter()
            .filter(|c| c.head.hand == hand)
            .copied()
            .collect()
    }

    pub fn hand_arcs(&self, hand: Hand) -> Vec<Arc> {
        self.arcs
            .iter()
            .filter(|a| a.head.hand == hand)
            .copied()
            .collect()
    }
}

fn validate_beat(kind: &'static str, index: usize, beat: f64) -> Result<(), AnalysisError> {
    if beat.is_finite() {
        Ok(())
    } else {
        Err(AnalysisError::InvalidEvent {
            kind,
            index,
            message: format!("beat {} is not a finite number", beat),
        })
    }
}

fn validate_cell(kind: &'static str, index: usize, x: i32, y: i32) -> Result<(), AnalysisError> {
    if !(0..GRID_WIDTH).contains(&x) {
        return Err(AnalysisError::InvalidEvent {
            kind,
            index,
            message: format!("x = {} is outside the 4x3 grid", x),
        });
    }
    if !(0..GRID_HEIGHT).contains(&y) {
        return Err(AnalysisError::InvalidEvent {
            kind,
            index,
            message: format!("y = {} is outside the 4x3 grid", y),
        });
    }
    Ok(())
}

fn validate_tail(
    kind: &'static str,
    index: usize,
    head_beat: f64,
    tail_beat: f64,
    tail_x: i32,
    tail_y: i32,
) -> Result<(), AnalysisError> {
    validate_beat(kind, index, tail_beat)?;
    validate_cell(kind, index, tail_x, tail_y)?;
    if tail_beat < head_beat {
        return Err(AnalysisError::InvalidEvent {
            kind,
            index,
            message: format!("tail beat {} is before head beat {}", tail_beat, head_beat),
        });
    }
    Ok(())
}

fn check_order(
    kind: &'static str,
    beats: impl Iterator<Item = f64>,
) -> Result<(), AnalysisError> {
    let mut previous = f64::NEG_INFINITY;
    for (index, beat) in beats.enumerate() {
        if beat < previous {
            return Err(AnalysisError::UnorderedEvents { kind, index });
        }
        previous = beat;
    }
    Ok(())
}
