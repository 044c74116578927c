// Score mapping: deterministic placement of a cyclic score onto wire spans.

use wirescape_core::{placements_for, Bar, BarCursor, Note, ScoreTrack};

fn note(channel: u32, timing: f32) -> Note {
    Note { channel, timing, pitch: String::new() }
}

/// Four bars, one note per bar at `channel = bar index`, `timing = 0.5`.
fn one_note_per_bar() -> ScoreTrack {
    ScoreTrack::new(
        (0..4)
            .map(|i| Bar { notes: vec![note(i, 0.5)] })
            .collect(),
    )
}

#[test]
fn placements_are_pure() {
    let track = ScoreTrack::demo();
    let mut cursor = BarCursor::default();
    cursor.advance(4, track.len());
    let first = placements_for(cursor, 4, &track);
    let second = placements_for(cursor, 4, &track);
    assert_eq!(first.as_slice(), second.as_slice(), "identical inputs must map identically");
}

#[test]
fn one_note_per_bar_lands_at_quarter_offsets() {
    let track = one_note_per_bar();
    let placements = placements_for(BarCursor::default(), 4, &track);
    assert_eq!(placements.len(), 4, "one placement per bar expected");
    for (local, p) in placements.iter().enumerate() {
        assert_eq!(p.channel, local, "channel tracks the bar index");
        let expected = local as f32 * 0.25 + 0.125;
        assert!(
            (p.t - expected).abs() < 1e-6,
            "bar {local} should land at t = {expected}, got {}",
            p.t
        );
    }
}

#[test]
fn placements_wrap_around_the_score() {
    let track = one_note_per_bar();
    let mut cursor = BarCursor::default();
    cursor.advance(2, track.len());
    let placements = placements_for(cursor, 4, &track);
    let channels: Vec<usize> = placements.iter().map(|p| p.channel).collect();
    assert_eq!(channels, vec![2, 3, 0, 1], "lookup wraps modulo the score length");
}

#[test]
fn perch_parameter_stays_off_the_end_caps() {
    let track = ScoreTrack::new(vec![Bar {
        notes: vec![note(0, 0.0), note(1, 0.999)],
    }]);
    // One bar per span, so raw t would be 0.0 and 0.999.
    let placements = placements_for(BarCursor::default(), 1, &track);
    assert!((placements[0].t - 0.05).abs() < 1e-6, "t clamps up to 0.05");
    assert!((placements[1].t - 0.95).abs() < 1e-6, "t clamps down to 0.95");
}

#[test]
fn cursor_advances_modulo_score_length() {
    let mut cursor = BarCursor::default();
    for k in 1..=10 {
        cursor.advance(4, 8);
        assert_eq!(cursor.index(), (k * 4) % 8);
    }
}

#[test]
fn sanitize_clamps_channels_and_defaults_timing() {
    let mut track = ScoreTrack::new(vec![Bar {
        notes: vec![note(99, 0.25), note(1, f32::NAN), note(2, 1.5), note(0, -0.1)],
    }]);
    track.sanitize(4);
    let placements = placements_for(BarCursor::default(), 1, &track);
    assert_eq!(placements[0].channel, 3, "out-of-range channel clamps to the last channel");
    // Broken timings default to 0, which then clamps to the lower bound.
    for p in &placements[1..] {
        assert!((p.t - 0.05).abs() < 1e-6, "defaulted timing should map to the start clamp");
    }
}

#[test]
fn score_loads_from_json() {
    let text = r#"[
        [{"channel": 0, "timing": 0.0, "pitch": "C4"}, {"channel": 2, "timing": 0.5, "pitch": "C2"}],
        [],
        [{"channel": 1, "timing": 0.25, "pitch": "E4"}]
    ]"#;
    let track = ScoreTrack::from_json(text).expect("well-formed score should parse");
    assert_eq!(track.len(), 3);
    assert_eq!(track.bar(0).notes.len(), 2);
    assert!(track.bar(1).notes.is_empty());
    assert_eq!(track.bar(2).notes[0].pitch, "E4");
}

#[test]
fn missing_timing_defaults_to_zero_on_parse() {
    let track = ScoreTrack::from_json(r#"[[{"channel": 0}]]"#).expect("note without timing parses");
    assert_eq!(track.bar(0).notes[0].timing, 0.0);
}

#[test]
fn malformed_json_is_a_score_error() {
    assert!(ScoreTrack::from_json("not json").is_err());
    assert!(ScoreTrack::from_json(r#"{"bars": []}"#).is_err(), "a score is an array of bars");
}

#[test]
fn demo_track_is_well_formed() {
    let track = ScoreTrack::demo();
    assert!(!track.is_empty());
    for i in 0..track.len() {
        for n in &track.bar(i).notes {
            assert!(n.channel < 4, "demo track uses four channels");
            assert!((0.0..1.0).contains(&n.timing));
            assert!(!n.pitch.is_empty());
        }
    }
}
