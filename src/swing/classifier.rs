//! Swing segmentation
//!
//! Groups one hand's notes into swing candidates. Notes are pushed in time
//! order; a note joins the open swing when it is close enough in time to the
//! previous note and its cut is compatible, otherwise the open swing closes.
//!
//! A chain head holds its tail link back until the swing closes. The link is
//! placed in beat order, and dropped if the next swing starts before it.

use super::types::{SwingCandidate, SwingType};
use crate::angles::within_swing_angle;
use crate::model::{Chain, Hand, Note, BEAT_EPSILON};
use log::trace;

/// Largest AFN difference between two cuts made in one motion.
const SWING_ANGLE_LIMIT: f64 = 45.0;

/// Buffers one hand's notes and closes them into swing candidates.
#[derive(Debug, Clone)]
pub struct SwingClassifier {
    hand: Hand,
    precision_ms: f64,
    chains: Vec<Chain>,
    buffer: Vec<Note>,
    buffer_type: SwingType,
    /// Tail link of a chain whose head is buffered
    pending_tail: Option<Note>,
    /// Last note of the most recently closed swing
    previous: Option<Note>,
}

impl SwingClassifier {
    /// `precision_ms` is the largest gap between two notes of one slider.
    pub fn new(hand: Hand, precision_ms: f64, chains: Vec<Chain>) -> Self {
        Self {
            hand,
            precision_ms,
            chains,
            buffer: Vec::new(),
            buffer_type: SwingType::Undecided,
            pending_tail: None,
            previous: None,
        }
    }

    /// Feed the next note. Returns the swing it closed, if any.
    pub fn push(&mut self, note: Note) -> Option<SwingCandidate> {
        let Some(last) = self.buffer.last() else {
            self.start(note);
            return None;
        };

        if self.joins(last, &note) {
            trace!("{:?} note at beat {} joins open swing", self.hand, note.beat);
            self.buffer.push(note);
            self.seed_chain(&note);
            return None;
        }

        let closed = self.close(Some(note.beat));
        self.start(note);
        closed
    }

    /// Close whatever is still buffered.
    pub fn finish(&mut self) -> Option<SwingCandidate> {
        self.close(None)
    }

    fn start(&mut self, note: Note) {
        self.buffer.push(note);
        self.buffer_type = SwingType::Undecided;
        self.seed_chain(&note);
    }

    fn seed_chain(&mut self, note: &Note) {
        let Some(chain) = self.chains.iter().find(|c| c.starts_at(note)) else {
            return;
        };
        let tail = chain.tail_note();
        if self.pending_tail.map_or(true, |pending| tail.beat > pending.beat) {
            self.pending_tail = Some(tail);
        }
        self.buffer_type = SwingType::Chain;
    }

    fn joins(&self, last: &Note, next: &Note) -> bool {
        if next.ms - last.ms > self.precision_ms {
            return false;
        }
        last.is_dot()
            || next.is_dot()
            || last.direction == next.direction
            || within_swing_angle(self.hand, last.direction, next.direction, SWING_ANGLE_LIMIT)
    }

    /// `next_start` is the beat of the note that opens the following swing.
    fn close(&mut self, next_start: Option<f64>) -> Option<SwingCandidate> {
        if self.buffer.is_empty() {
            return None;
        }
        let mut notes = std::mem::take(&mut self.buffer);
        if is_simultaneous(&notes) && notes.len() > 1 {
            order_simultaneous(&mut notes, self.previous.as_ref());
        }

        let swing_type = if self.buffer_type == SwingType::Chain {
            if let Some(tail) = self.pending_tail.take() {
                if next_start.map_or(true, |start| tail.beat < start) {
                    let at = notes.partition_point(|n| n.beat <= tail.beat);
                    notes.insert(at, tail);
                } else {
                    trace!(
                        "{:?} chain tail at beat {} overlaps the next swing, dropped",
                        self.hand,
                        tail.beat
                    );
                }
            }
            SwingType::Chain
        } else {
            classify(&notes)
        };
        trace!(
            "{:?} swing closed at beat {} as {:?} ({} notes)",
            self.hand,
            notes[0].beat,
            swing_type,
            notes.len()
        );

        self.previous = notes.last().copied();
        self.buffer_type = SwingType::Undecided;
        self.pending_tail = None;
        Some(SwingCandidate::new(notes, swing_type))
    }
}

fn is_simultaneous(notes: &[Note]) -> bool {
    notes
        .windows(2)
        .all(|pair| (pair[1].beat - pair[0].beat).abs() < BEAT_EPSILON)
}

/// Whether every consecutive pair is within one cell on both axes.
pub fn is_adjacent_chain(notes: &[Note]) -> bool {
    notes
        .windows(2)
        .all(|pair| (pair[1].x - pair[0].x).abs() <= 1 && (pair[1].y - pair[0].y).abs() <= 1)
}

/// Shape of a closed group of notes (chains are tagged when they start).
pub fn classify(notes: &[Note]) -> SwingType {
    if notes.len() <= 1 {
        return SwingType::Normal;
    }
    if is_simultaneous(notes) {
        if is_adjacent_chain(notes) {
            SwingType::Stack
        } else {
            SwingType::Window
        }
    } else {
        SwingType::Slider
    }
}

/// Sort simultaneous notes in the order the saber passes through them.
///
/// Arrow groups are ordered along their cut direction. Dot-only groups are
/// ordered by distance from where the previous swing ended.
fn order_simultaneous(notes: &mut [Note], previous: Option<&Note>) {
    if let Some(dir) = notes.iter().map(|n| n.direction).find(|d| !d.is_dot()) {
        let (dx, dy) = dir.vector();
        notes.sort_by_key(|n| n.x * dx + n.y * dy);
    } else if let Some(prev) = previous {
        notes.sort_by_key(|n| (n.x - prev.x).pow(2) + (n.y - prev.y).pow(2));
    }
}
