use glam::Vec2;

use crate::constants::{WAVE_GAIN, WAVE_K1, WAVE_K2};
use crate::layer::PoleId;

/// Static wire geometry: a quadratic Bezier through the two attach points
/// whose midpoint hangs `sag` below the straight line between them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WireCurve {
    start: Vec2,
    ctrl: Vec2,
    end: Vec2,
}

impl WireCurve {
    pub fn new(start: Vec2, end: Vec2, sag: f32) -> Self {
        let mid = (start + end) * 0.5;
        // Control point 2*sag below the chord midpoint puts the curve
        // exactly sag below it at t = 0.5.
        let ctrl = Vec2::new(mid.x, mid.y - 2.0 * sag);
        Self { start, ctrl, end }
    }

    /// Evaluate the curve at perch parameter `t` (0 = start pole, 1 = end pole).
    pub fn point_at(&self, t: f32) -> Vec2 {
        let u = 1.0 - t;
        self.start * (u * u) + self.ctrl * (2.0 * u * t) + self.end * (t * t)
    }

    /// Rigid horizontal shift, used when the whole world advances.
    pub fn shift_x(&mut self, dx: f32) {
        self.start.x += dx;
        self.ctrl.x += dx;
        self.end.x += dx;
    }

    pub fn start(&self) -> Vec2 {
        self.start
    }

    pub fn end(&self) -> Vec2 {
        self.end
    }
}

/// Spatial envelope for the wave overlay: zero at both attach points and
/// maximal mid-span, so the wire stays visually pinned to its poles.
pub fn envelope(t: f32) -> f32 {
    (t * std::f32::consts::PI).sin()
}

/// Audio-driven vertical offset added on top of the static curve.
///
/// `intensity` is the wire's channel intensity for this tick; the caller
/// passes exactly 0 when the audio snapshot is inactive, which forces the
/// amplitude to exactly 0 with no residual motion.
pub fn wave_amplitude(t: f32, time_sec: f64, intensity: f32) -> f32 {
    (t * WAVE_K1 + time_sec as f32 * WAVE_K2).sin() * intensity * envelope(t) * WAVE_GAIN
}

/// One wire of a span. Endpoint poles are held as slot ids, never owning
/// references; the wire lives exactly as long as both endpoints do.
#[derive(Clone, Debug)]
pub struct Wire {
    pub start_pole: PoleId,
    pub end_pole: PoleId,
    /// Fixed attachment position and score voice, 0..num_channels.
    pub channel: usize,
    pub sag: f32,
    pub curve: WireCurve,
    /// Channel intensity snapshot for the current tick; 0 while the audio
    /// feed is inactive.
    pub wave_intensity: f32,
}

impl Wire {
    /// Displaced point on the wire for the current tick: static curve plus
    /// wave overlay.
    pub fn point_with_wave(&self, t: f32, time_sec: f64) -> Vec2 {
        let p = self.curve.point_at(t);
        Vec2::new(p.x, p.y + wave_amplitude(t, time_sec, self.wave_intensity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn curve_passes_through_sagged_midpoint() {
        let curve = WireCurve::new(Vec2::new(0.0, 10.0), Vec2::new(12.0, 10.0), 1.5);
        let mid = curve.point_at(0.5);
        assert!((mid.x - 6.0).abs() < 1e-5);
        assert!((mid.y - 8.5).abs() < 1e-5, "midpoint should hang sag below the chord");
        assert!((curve.point_at(0.0) - Vec2::new(0.0, 10.0)).length() < 1e-6);
        assert!((curve.point_at(1.0) - Vec2::new(12.0, 10.0)).length() < 1e-6);
    }

    #[test]
    fn envelope_pins_endpoints() {
        assert!(envelope(0.0).abs() < 1e-6);
        assert!(envelope(1.0).abs() < 1e-4);
        assert!((envelope(0.5) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn zero_intensity_means_zero_amplitude() {
        for i in 0..=10 {
            let t = i as f32 / 10.0;
            assert_eq!(wave_amplitude(t, 123.456, 0.0), 0.0);
        }
    }
}
