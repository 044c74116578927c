use log::warn;
use serde::Deserialize;
use smallvec::SmallVec;

use crate::constants::{T_CLAMP_MAX, T_CLAMP_MIN};
use crate::error::{EngineError, Result};

/// A single note within a bar.
///
/// Fields:
/// - `channel`: which wire attachment position carries the voice
/// - `timing`: position within the bar, `[0, 1)`
/// - `pitch`: pitch name, carried through for the renderer/debugging only
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Note {
    pub channel: u32,
    #[serde(default)]
    pub timing: f32,
    #[serde(default)]
    pub pitch: String,
}

/// One bar of the score: an unordered set of notes.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Bar {
    pub notes: Vec<Note>,
}

/// Ordered, cyclic sequence of bars. Length is fixed at load; lookups wrap
/// via modulo so playback loops seamlessly.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct ScoreTrack {
    bars: Vec<Bar>,
}

impl ScoreTrack {
    pub fn new(bars: Vec<Bar>) -> Self {
        Self { bars }
    }

    /// Parse a track from its JSON form: an array of bars, each an array of
    /// `{channel, timing, pitch}` objects.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| EngineError::Score(e.to_string()))
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Bar lookup with cyclic wrap. Panics on an empty track; the streamer
    /// rejects empty scores at construction.
    pub fn bar(&self, index: usize) -> &Bar {
        &self.bars[index % self.bars.len()]
    }

    /// Clamp out-of-range channels and default broken timings in place.
    /// Malformed notes are recoverable data problems, never errors.
    pub fn sanitize(&mut self, num_channels: usize) {
        let max_channel = num_channels.saturating_sub(1) as u32;
        for (bar_index, bar) in self.bars.iter_mut().enumerate() {
            for note in &mut bar.notes {
                if note.channel > max_channel {
                    warn!(
                        "bar {bar_index}: note channel {} out of range, clamping to {max_channel}",
                        note.channel
                    );
                    note.channel = max_channel;
                }
                if !note.timing.is_finite() || !(0.0..1.0).contains(&note.timing) {
                    warn!(
                        "bar {bar_index}: note timing {} out of range, defaulting to 0",
                        note.timing
                    );
                    note.timing = 0.0;
                }
            }
        }
    }

    /// Built-in eight-bar track over four channels so the engine runs
    /// without any asset: channels 0-1 trade a pentatonic melody, 2-3 hold
    /// a sparse bass.
    pub fn demo() -> Self {
        fn n(channel: u32, timing: f32, pitch: &str) -> Note {
            Note { channel, timing, pitch: pitch.to_string() }
        }
        let bars = vec![
            Bar { notes: vec![n(0, 0.0, "C4"), n(2, 0.0, "C2")] },
            Bar { notes: vec![n(0, 0.25, "E4"), n(1, 0.75, "G4")] },
            Bar { notes: vec![n(1, 0.0, "A4"), n(3, 0.5, "G2")] },
            Bar { notes: vec![n(0, 0.5, "G4")] },
            Bar { notes: vec![n(1, 0.0, "E4"), n(2, 0.0, "A1"), n(0, 0.5, "D4")] },
            Bar { notes: vec![n(0, 0.25, "C4"), n(1, 0.75, "D4")] },
            Bar { notes: vec![n(1, 0.0, "G4"), n(3, 0.5, "E2")] },
            Bar { notes: vec![n(0, 0.0, "A4"), n(0, 0.5, "G4"), n(2, 0.5, "C2")] },
        ];
        Self { bars }
    }
}

/// Shared pointer into the cyclic score. Advances only in whole spans
/// (`bars_per_span` bars at a time) and wraps modulo the score length.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BarCursor(usize);

impl BarCursor {
    pub fn index(self) -> usize {
        self.0
    }

    pub fn advance(&mut self, bars_per_span: usize, score_len: usize) {
        self.0 = (self.0 + bars_per_span) % score_len;
    }
}

/// One bird placement produced by the score mapping: which channel's wire
/// to perch on and where along it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub channel: usize,
    /// Normalized position along the span's wires, already clamped off the
    /// end caps.
    pub t: f32,
}

/// Map `bars_per_span` consecutive bars starting at `cursor` onto perch
/// positions along one span.
///
/// Pure: identical `(cursor, bars_per_span, track)` always yields an
/// identical ordered list. Independently randomized layers rely on this to
/// stay musically synchronized while differing visually.
pub fn placements_for(
    cursor: BarCursor,
    bars_per_span: usize,
    track: &ScoreTrack,
) -> SmallVec<[Placement; 16]> {
    let mut out = SmallVec::new();
    for local in 0..bars_per_span {
        let bar = track.bar(cursor.index() + local);
        let bar_offset = local as f32 / bars_per_span as f32;
        for note in &bar.notes {
            let t = (bar_offset + note.timing / bars_per_span as f32)
                .clamp(T_CLAMP_MIN, T_CLAMP_MAX);
            out.push(Placement { channel: note.channel as usize, t });
        }
    }
    out
}
