use log::{debug, info};

use crate::audio::AudioFeatures;
use crate::config::EngineConfig;
use crate::constants::{
    AMBIENT_BAND_BINS, BIRD_COLORS_DARK, BIRD_COLORS_LIGHT, POLE_COLOR_DARK, POLE_COLOR_LIGHT,
    WIRE_COLOR_DARK, WIRE_COLOR_LIGHT, WIRE_SAMPLES,
};
use crate::error::{EngineError, Result};
use crate::layer::Layer;
use crate::score::{BarCursor, ScoreTrack};
use crate::state::{BirdInstance, FrameState, PoleInstance, WirePolyline, WireVertex};

/// Site theme; switching re-tints existing geometry only, never changes
/// structure.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    fn bird_baseline(self) -> [f32; 3] {
        match self {
            Theme::Dark => BIRD_COLORS_DARK[0],
            Theme::Light => BIRD_COLORS_LIGHT[0],
        }
    }

    fn bird_accent(self) -> [f32; 3] {
        match self {
            Theme::Dark => BIRD_COLORS_DARK[1],
            Theme::Light => BIRD_COLORS_LIGHT[1],
        }
    }

    fn wire_color(self) -> [f32; 3] {
        match self {
            Theme::Dark => WIRE_COLOR_DARK,
            Theme::Light => WIRE_COLOR_LIGHT,
        }
    }

    fn pole_color(self) -> [f32; 3] {
        match self {
            Theme::Dark => POLE_COLOR_DARK,
            Theme::Light => POLE_COLOR_LIGHT,
        }
    }
}

/// Orchestrates the depth layers over one shared score and bar cursor.
///
/// The host drives the engine with one `tick` per frame; there is no
/// internal scheduling, parallelism, or blocking. Within a tick the update
/// order is fixed — advance, cull, spawn, wave update, bird update — which
/// is itself a correctness guarantee: culling before spawning bounds the
/// live-object count, and visual updates after spawn make newly created
/// objects consistent in their creation frame.
///
/// Typical usage:
/// - Construct with `SceneStreamer::new(config, track, audio)`
/// - Call `tick(dt, now_sec)` once per frame
/// - Hand `frame_state()` to the renderer
/// - `pause`/`resume` gate ticking; `dispose` tears everything down
pub struct SceneStreamer<A: AudioFeatures> {
    cfg: EngineConfig,
    track: ScoreTrack,
    layers: Vec<Layer>,
    cursor: BarCursor,
    audio: A,
    theme: Theme,
    viewport: (u32, u32),
    last_now: f64,
    paused: bool,
    disposed: bool,
}

impl<A: AudioFeatures> SceneStreamer<A> {
    /// Validate configuration and score, then seed every layer so frame 0
    /// is non-empty. The audio source is injected here and read through its
    /// trait for the engine's lifetime.
    pub fn new(cfg: EngineConfig, mut track: ScoreTrack, audio: A) -> Result<Self> {
        cfg.validate()?;
        if track.is_empty() {
            return Err(EngineError::Score("score has no bars".into()));
        }
        track.sanitize(cfg.num_channels);

        let mut cursor = BarCursor::default();
        let mut layers: Vec<Layer> = cfg
            .layers
            .iter()
            .enumerate()
            .map(|(i, lc)| Layer::new(lc, mix_seed(cfg.seed, i)))
            .collect();
        for layer in &mut layers {
            layer.seed(&cfg, &mut cursor, &track);
        }
        info!(
            "scene streamer up: {} layer(s), {} bars, cursor at {}",
            layers.len(),
            track.len(),
            cursor.index()
        );

        Ok(Self {
            cfg,
            track,
            layers,
            cursor,
            audio,
            theme: Theme::default(),
            viewport: (0, 0),
            last_now: 0.0,
            paused: false,
            disposed: false,
        })
    }

    /// Advance the world by one frame. `dt` is the host's frame delta in
    /// seconds, `now_sec` its wall clock; a paused or disposed engine
    /// ignores the call, so resuming never replays missed time.
    pub fn tick(&mut self, dt: f32, now_sec: f64) {
        if self.paused || self.disposed {
            return;
        }
        self.last_now = now_sec;

        for layer in &mut self.layers {
            layer.advance(self.cfg.velocity * dt * layer.depth_scale);
        }
        for layer in &mut self.layers {
            layer.cull(&self.cfg);
        }
        for layer in &mut self.layers {
            layer.maybe_spawn(&self.cfg, &mut self.cursor, &self.track);
        }
        for layer in &mut self.layers {
            layer.update_waves(&self.audio);
        }
        for layer in &mut self.layers {
            layer.update_birds(now_sec, &self.audio);
        }
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Destroy every pole (cascading wires and birds) in every layer.
    /// Further ticks and notifications are no-ops.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        for layer in &mut self.layers {
            layer.dispose();
        }
        self.disposed = true;
        debug!("scene streamer disposed");
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// The render collaborator updates its projection from this; engine
    /// geometry never changes on resize.
    pub fn notify_resize(&mut self, width: u32, height: u32) {
        if self.disposed {
            return;
        }
        self.viewport = (width, height);
    }

    pub fn set_theme(&mut self, theme: Theme) {
        if self.disposed {
            return;
        }
        self.theme = theme;
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn bar_cursor(&self) -> BarCursor {
        self.cursor
    }

    pub fn config(&self) -> &EngineConfig {
        &self.cfg
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    /// Mutable access to the injected audio source, mainly for scripted
    /// sources in demos and tests.
    pub fn audio_mut(&mut self) -> &mut A {
        &mut self.audio
    }

    /// Snapshot of every live entity's transform and color for the
    /// renderer. Wire waves are sampled at the time of the last tick.
    pub fn frame_state(&self) -> FrameState {
        let mut frame = FrameState {
            viewport: self.viewport,
            ambient: if self.audio.is_signal_active() {
                self.audio.energy_band(0, AMBIENT_BAND_BINS).clamp(0.0, 1.0)
            } else {
                0.0
            },
            ..FrameState::default()
        };

        let pole_color = self.theme.pole_color();
        let wire_color = self.theme.wire_color();
        let baseline = self.theme.bird_baseline();
        let accent = self.theme.bird_accent();

        for layer in &self.layers {
            let z = layer.z_offset;
            for pole in layer.poles() {
                frame.poles.push(PoleInstance {
                    pos: [pole.x, 0.0, z],
                    height: pole.height,
                    lean_angle: pole.lean_angle,
                    crossarm_half_width: pole.crossarm_half_width,
                    has_transformer: if pole.has_transformer { 1.0 } else { 0.0 },
                    color_r: pole_color[0],
                    color_g: pole_color[1],
                    color_b: pole_color[2],
                    _pad: [0.0; 2],
                });
            }
            for wire in layer.wires() {
                let mut vertices = Vec::with_capacity(WIRE_SAMPLES + 1);
                for i in 0..=WIRE_SAMPLES {
                    let t = i as f32 / WIRE_SAMPLES as f32;
                    let p = wire.point_with_wave(t, self.last_now);
                    vertices.push(WireVertex { pos: [p.x, p.y, z], _pad: 0.0 });
                }
                frame.wires.push(WirePolyline {
                    channel: wire.channel as u32,
                    color: wire_color,
                    vertices,
                });
            }
            for bird in layer.birds() {
                let mix = bird.visual.color_mix;
                let color = [
                    baseline[0] + (accent[0] - baseline[0]) * mix,
                    baseline[1] + (accent[1] - baseline[1]) * mix,
                    baseline[2] + (accent[2] - baseline[2]) * mix,
                ];
                frame.birds.push(BirdInstance {
                    pos: [bird.visual.world_pos.x, bird.visual.world_pos.y, z],
                    scale: bird.visual.scale,
                    color,
                    rotation: bird.visual.rotation,
                });
            }
        }
        frame
    }
}

// Derive per-layer seeds from the base seed so layers can be randomized
// independently while staying reproducible.
fn mix_seed(seed: u64, index: usize) -> u64 {
    seed ^ (index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}
