//! Pull-based audio feature interface consumed by the engine.
//!
//! The surrounding audio subsystem owns decoding, playback, and smoothing;
//! the engine only reads a per-tick snapshot through [`AudioFeatures`]. All
//! reads are synchronous and side-effect free, so a single snapshot is
//! consistent for the duration of one tick.

/// Smoothed intensity reads from a live spectrum.
///
/// Implementations must return values in `[0, 1]`. When
/// [`is_signal_active`](AudioFeatures::is_signal_active) is false the engine
/// forces every modulation to its baseline within the same tick, so an
/// inactive source does not need to zero its own reads.
pub trait AudioFeatures {
    /// Intensity of one score channel (voice), 0 = silent, 1 = peak.
    fn channel_intensity(&self, channel: usize) -> f32;
    /// Aggregate energy over a contiguous range of spectrum bins.
    fn energy_band(&self, lo_bin: usize, hi_bin: usize) -> f32;
    /// Whether a track is currently playing and producing features.
    fn is_signal_active(&self) -> bool;
}

/// Baseline source: never active, all reads zero. Used when no audio
/// subsystem is attached; the engine keeps rendering static geometry.
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentAudio;

impl AudioFeatures for SilentAudio {
    fn channel_intensity(&self, _channel: usize) -> f32 {
        0.0
    }

    fn energy_band(&self, _lo_bin: usize, _hi_bin: usize) -> f32 {
        0.0
    }

    fn is_signal_active(&self) -> bool {
        false
    }
}

/// Deterministic synthetic source for the demo driver and tests.
///
/// Each channel follows its own sine envelope over a host-settable clock, so
/// two runs with the same clock sequence read identical features. The
/// active flag can be toggled mid-run to exercise the baseline path.
#[derive(Clone, Debug)]
pub struct ScriptedAudio {
    clock: f64,
    active: bool,
}

impl ScriptedAudio {
    pub fn new() -> Self {
        Self { clock: 0.0, active: true }
    }

    /// Advance the script to an absolute time in seconds.
    pub fn set_clock(&mut self, seconds: f64) {
        self.clock = seconds;
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}

impl Default for ScriptedAudio {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioFeatures for ScriptedAudio {
    fn channel_intensity(&self, channel: usize) -> f32 {
        if !self.active {
            return 0.0;
        }
        // Detuned per-channel envelopes so voices pulse out of phase.
        let rate = 1.3 + 0.7 * channel as f64;
        (0.5 + 0.5 * (self.clock * rate).sin()) as f32
    }

    fn energy_band(&self, lo_bin: usize, hi_bin: usize) -> f32 {
        if !self.active || hi_bin <= lo_bin {
            return 0.0;
        }
        let center = (lo_bin + hi_bin) as f64 * 0.5;
        (0.5 + 0.5 * (self.clock * 0.9 + center * 0.11).sin()) as f32
    }

    fn is_signal_active(&self) -> bool {
        self.active
    }
}
