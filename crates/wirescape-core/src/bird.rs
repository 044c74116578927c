use glam::Vec2;

use crate::audio::AudioFeatures;
use crate::constants::{
    BIRD_BASE_SCALE, BIRD_SCALE_SPAN, BLINK_RATE, CENTER_BLINK_RANGE, SWAY_AMOUNT, SWAY_RATE,
};
use crate::layer::WireId;
use crate::wire::Wire;

/// Transient per-bird visual state, recomputed every tick.
#[derive(Clone, Copy, Debug)]
pub struct BirdVisual {
    /// Perch position in the layer's plane (x, y); the layer's z offset is
    /// applied when frame state is built.
    pub world_pos: Vec2,
    /// 0 = baseline palette color, 1 = full accent.
    pub color_mix: f32,
    pub scale: f32,
    /// Current sway angle in radians.
    pub rotation: f32,
    /// Random phase so neighbouring birds don't sway in lockstep.
    pub rotation_phase: f32,
}

impl BirdVisual {
    pub fn new(rotation_phase: f32) -> Self {
        Self {
            world_pos: Vec2::ZERO,
            color_mix: 0.0,
            scale: BIRD_BASE_SCALE,
            rotation: 0.0,
            rotation_phase,
        }
    }
}

/// A bird perched on one wire. The perch is a slot id, never an owning
/// reference; the bird is destroyed in the same tick its wire is. Birds
/// never change perch or channel after creation.
#[derive(Clone, Debug)]
pub struct Bird {
    pub wire: WireId,
    /// Perch parameter along the wire's curve, clamped off the end caps.
    pub t: f32,
    pub channel: usize,
    /// Placed from a score note (true) or purely decorative (false).
    /// Only music-driven birds read their channel's intensity.
    pub music_driven: bool,
    pub visual: BirdVisual,
}

impl Bird {
    pub fn new(wire: WireId, t: f32, channel: usize, music_driven: bool, phase: f32) -> Self {
        Self { wire, t, channel, music_driven, visual: BirdVisual::new(phase) }
    }

    /// Recompute perch position and modulation for this tick.
    ///
    /// Intensity is the max of the channel read (music-driven birds only)
    /// and the center-crossing blink, a timed pulse active while the bird's
    /// world x is within the playhead zone — the "note triggers as it
    /// crosses the playhead" effect. Both are gated on signal activity, so
    /// an inactive feed leaves the bird exactly at baseline.
    pub fn update_visual(&mut self, wire: &Wire, now_sec: f64, audio: &dyn AudioFeatures) {
        self.visual.world_pos = wire.point_with_wave(self.t, now_sec);
        self.visual.rotation =
            ((now_sec as f32) * SWAY_RATE + self.visual.rotation_phase).sin() * SWAY_AMOUNT;

        let active = audio.is_signal_active();
        let music_intensity = if active && self.music_driven {
            audio.channel_intensity(self.channel).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let blink = if active && self.visual.world_pos.x.abs() < CENTER_BLINK_RANGE {
            ((now_sec as f32) * BLINK_RATE).sin().abs()
        } else {
            0.0
        };

        let intensity = music_intensity.max(blink);
        self.visual.color_mix = intensity;
        self.visual.scale = BIRD_BASE_SCALE + BIRD_SCALE_SPAN * intensity;
    }
}
