use super::*;
use crate::config::{AnalysisConfig, PredictorKind};
use crate::model::{Arc, Bomb, Chain, CutDirection, DifficultyData, Hand, MapEvents, Note, Obstacle};
use crate::timing::TimeDomain;

fn data(events: MapEvents) -> DifficultyData {
    let time = TimeDomain::new(120.0, 0.0, &[]).unwrap();
    DifficultyData::new(time, events).unwrap()
}

fn notes(notes: Vec<Note>) -> MapEvents {
    MapEvents {
        notes,
        ..Default::default()
    }
}

fn right(beat: f64, x: i32, y: i32, dir: CutDirection) -> Note {
    Note::new(beat, x, y, Hand::Right, dir)
}

fn left(beat: f64, x: i32, y: i32, dir: CutDirection) -> Note {
    Note::new(beat, x, y, Hand::Left, dir)
}

fn run(data: &DifficultyData) -> SwingOutput {
    SwingEngine::new(data, &AnalysisConfig::default()).run()
}

#[test]
fn test_empty_map_produces_nothing() {
    let data = data(MapEvents::default());
    let output = run(&data);
    assert!(output.left.is_empty());
    assert!(output.right.is_empty());
    assert!(output.merged.is_empty());
    assert_eq!(output.final_lean(), 0.0);
}

#[test]
fn test_first_swing_parity_from_direction() {
    let data = data(notes(vec![
        right(1.0, 2, 0, CutDirection::UpLeft),
        left(1.0, 1, 0, CutDirection::Down),
    ]));
    let output = run(&data);
    assert_eq!(output.right[0].parity, Parity::Backhand);
    assert_eq!(output.left[0].parity, Parity::Forehand);
    assert_eq!(output.right[0].ebpm, 0.0);
}

#[test]
fn test_first_dot_swing_is_forehand() {
    let data = data(notes(vec![right(1.0, 2, 0, CutDirection::Any)]));
    let output = run(&data);
    assert_eq!(output.right[0].parity, Parity::Forehand);
    assert_eq!(output.right[0].start_pos.rotation, 0.0);
}

#[test]
fn test_alternating_stream() {
    let dirs = [CutDirection::Down, CutDirection::Up, CutDirection::Down, CutDirection::Up];
    let stream: Vec<Note> = dirs
        .iter()
        .enumerate()
        .map(|(i, &dir)| right(i as f64, 2, 0, dir))
        .collect();
    let output = run(&data(notes(stream)));
    let parities: Vec<Parity> = output.right.iter().map(|s| s.parity).collect();
    assert_eq!(
        parities,
        vec![Parity::Forehand, Parity::Backhand, Parity::Forehand, Parity::Backhand]
    );
    assert!(output.right.iter().all(|s| !s.is_reset()));
    // One beat at 120 BPM is half a second, so a forehand + backhand cycle takes a second
    assert_eq!(output.right[1].ebpm, 60.0);
}

#[test]
fn test_slider_through_engine() {
    let data = data(notes(vec![
        right(10.0, 1, 2, CutDirection::Down),
        right(10.02, 1, 1, CutDirection::Down),
    ]));
    let output = run(&data);
    assert_eq!(output.right.len(), 1);
    assert_eq!(output.right[0].swing_type, SwingType::Slider);
    assert_eq!(output.right[0].start_beat, 10.0);
    assert_eq!(output.right[0].end_beat, 10.02);
}

#[test]
fn test_bomb_reset_inserts_filler() {
    let events = MapEvents {
        notes: vec![right(1.0, 2, 0, CutDirection::Down), right(3.0, 2, 0, CutDirection::Down)],
        bombs: vec![Bomb::new(2.0, 2, 0)],
        ..Default::default()
    };
    let output = run(&data(events));
    assert_eq!(output.right.len(), 3);
    assert!(output.right[1].is_filler());
    assert_eq!(output.right[1].parity, Parity::Backhand);
    assert_eq!(output.right[2].reset_type, ResetType::Bomb);
    assert_eq!(output.right[2].parity, Parity::Forehand);
}

#[test]
fn test_chain_swing_ends_at_tail() {
    let head = right(2.0, 1, 2, CutDirection::Down);
    let events = MapEvents {
        notes: vec![head, right(4.0, 1, 0, CutDirection::Up)],
        chains: vec![Chain::new(head, 2.25, 1, 0)],
        ..Default::default()
    };
    let output = run(&data(events));
    assert_eq!(output.right.len(), 2);
    assert_eq!(output.right[0].swing_type, SwingType::Chain);
    assert_eq!(output.right[0].end_beat, 2.25);
    assert_eq!((output.right[0].end_pos.x, output.right[0].end_pos.y), (1, 0));
}

#[test]
fn test_chain_with_stacked_note_ends_at_tail() {
    let head = right(2.0, 1, 2, CutDirection::Down);
    let events = MapEvents {
        notes: vec![head, right(2.0, 2, 2, CutDirection::Down)],
        chains: vec![Chain::new(head, 2.5, 1, 0)],
        ..Default::default()
    };
    let output = run(&data(events));
    assert_eq!(output.right.len(), 1);
    let swing = &output.right[0];
    assert_eq!(swing.swing_type, SwingType::Chain);
    let beats: Vec<f64> = swing.notes.iter().map(|n| n.beat).collect();
    assert_eq!(beats, vec![2.0, 2.0, 2.5]);
    assert_eq!(swing.end_beat, 2.5);
    assert_eq!((swing.end_pos.x, swing.end_pos.y), (1, 0));
}

#[test]
fn test_chain_tail_past_next_swing_is_dropped() {
    let head = right(2.0, 2, 1, CutDirection::Left);
    let events = MapEvents {
        notes: vec![head, right(2.5, 2, 1, CutDirection::Down)],
        chains: vec![Chain::new(head, 3.0, 0, 1)],
        ..Default::default()
    };
    let data = data(events);
    for kind in PredictorKind::ALL {
        let config = AnalysisConfig::default().with_predictor(kind);
        let output = SwingEngine::new(&data, &config).run();
        let real: Vec<&SwingRecord> = output.right.iter().filter(|s| !s.is_filler()).collect();
        assert_eq!(real.len(), 2);
        assert_eq!(real[0].swing_type, SwingType::Chain);
        assert_eq!(real[0].end_beat, 2.0);
        assert!(real.windows(2).all(|pair| pair[0].end_beat <= pair[1].start_beat));
        assert!(output
            .right
            .windows(2)
            .all(|pair| pair[0].start_beat <= pair[1].start_beat));
        for (i, swing) in output.right.iter().enumerate() {
            if swing.is_reset() {
                assert!(output.right[i - 1].is_filler(), "{:?}", kind);
            }
        }
    }
}

#[test]
fn test_arc_extends_swing_end() {
    let head = right(2.0, 1, 0, CutDirection::Down);
    let events = MapEvents {
        notes: vec![head, right(4.0, 2, 2, CutDirection::Up)],
        arcs: vec![Arc::new(head, 3.0, 2, 1)],
        ..Default::default()
    };
    let output = run(&data(events));
    let first = &output.right[0];
    assert_eq!(first.end_beat, 3.0);
    assert_eq!((first.end_pos.x, first.end_pos.y), (2, 1));
    assert_eq!(first.end_seconds, 1.5);
}

#[test]
fn test_arc_past_next_swing_is_ignored() {
    let head = right(2.0, 1, 0, CutDirection::Down);
    let events = MapEvents {
        notes: vec![head, right(3.0, 2, 2, CutDirection::Up)],
        arcs: vec![Arc::new(head, 5.0, 2, 1)],
        ..Default::default()
    };
    let output = run(&data(events));
    assert_eq!(output.right[0].end_beat, 2.0);
}

#[test]
fn test_lateral_offset_recorded() {
    let events = MapEvents {
        notes: vec![right(1.0, 2, 0, CutDirection::Down), right(5.0, 2, 0, CutDirection::Up)],
        obstacles: vec![Obstacle::new(4.0, 4.0, 2, 0, 2, 5)],
        ..Default::default()
    };
    let output = run(&data(events));
    assert_eq!(output.right[0].lateral_offset, 0);
    assert_eq!(output.right[1].lateral_offset, -1);
}

#[test]
fn test_merge_orders_by_start_beat_right_first() {
    let data = data(notes(vec![
        left(1.0, 1, 0, CutDirection::Down),
        right(1.0, 2, 0, CutDirection::Down),
        left(2.0, 1, 0, CutDirection::Up),
        right(2.5, 2, 0, CutDirection::Up),
    ]));
    let output = run(&data);
    let order: Vec<(Hand, f64)> = output.merged.iter().map(|s| (s.hand, s.start_beat)).collect();
    assert_eq!(
        order,
        vec![(Hand::Right, 1.0), (Hand::Left, 1.0), (Hand::Left, 2.0), (Hand::Right, 2.5)]
    );
    assert_eq!(output.lean.len(), 4);
}

#[test]
fn test_lean_waits_for_both_hands() {
    let data = data(notes(vec![
        right(1.0, 3, 1, CutDirection::Right),
        left(2.0, 0, 1, CutDirection::Right),
    ]));
    let output = run(&data);
    // Both hands cutting right: 90 on the right hand, -90 on the mirrored left
    assert_eq!(output.lean[0].lean, 0.0);
    assert_eq!(output.lean[1].lean, 90.0);
    assert_eq!(output.final_lean(), 90.0);
}

#[test]
fn test_serial_and_parallel_agree() {
    let events = MapEvents {
        notes: vec![
            right(1.0, 2, 0, CutDirection::Down),
            left(1.0, 1, 0, CutDirection::Down),
            right(2.0, 2, 0, CutDirection::Down),
            left(2.0, 1, 2, CutDirection::Up),
            right(3.0, 3, 1, CutDirection::Any),
        ],
        bombs: vec![Bomb::new(1.5, 2, 0)],
        ..Default::default()
    };
    let data = data(events);
    let serial = AnalysisConfig {
        parallel_hands: false,
        ..AnalysisConfig::default()
    };
    for kind in PredictorKind::ALL {
        let a = SwingEngine::new(&data, &serial.clone().with_predictor(kind)).run();
        let b = SwingEngine::new(&data, &AnalysisConfig::default().with_predictor(kind)).run();
        assert_eq!(a, b);
    }
}

#[test]
fn test_output_serializes_camel_case() {
    let data = data(notes(vec![right(1.0, 2, 0, CutDirection::Down)]));
    let json = run(&data).to_json().unwrap();
    assert!(json.contains("\"startBeat\":1.0"));
    assert!(json.contains("\"resetType\":\"none\""));
    assert!(json.contains("\"swingType\":\"normal\""));
    assert!(json.contains("\"parity\":\"forehand\""));
}
