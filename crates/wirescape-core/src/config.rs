use serde::Deserialize;

use crate::error::{EngineError, Result};

/// Static engine configuration, validated before the first tick.
///
/// Distances are in world units; the camera-aligned origin sits at `x = 0`
/// (the "playhead"), poles enter at `spawn_threshold` on the right and are
/// destroyed past `cull_threshold` on the left.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Wires per span; one channel carries one voice of the score.
    pub num_channels: usize,
    /// Horizontal distance between consecutive poles.
    pub pole_spacing: f32,
    /// World x at which new poles appear.
    pub spawn_threshold: f32,
    /// World x past which poles (and their wires and birds) are destroyed.
    pub cull_threshold: f32,
    /// Horizontal drift in world units per second; negative moves the world left.
    pub velocity: f32,
    /// Hard ceiling on live poles per layer.
    pub max_poles: usize,
    /// Poles constructed before the first tick so frame 0 is non-empty.
    pub min_seed_poles: usize,
    /// Bars of the score consumed by each wire span.
    pub bars_per_span: usize,
    /// Base PRNG seed; each layer derives an independent stream from it.
    pub seed: u64,
    /// Depth planes, front to back. Each gets its own randomization stream
    /// but all share one bar cursor.
    pub layers: Vec<LayerConfig>,
}

/// Per-depth-plane parameters.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct LayerConfig {
    /// Scales the layer's horizontal drift for parallax (1.0 = foreground).
    pub depth_scale: f32,
    /// World z of the layer's plane.
    pub z_offset: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            num_channels: 4,
            pole_spacing: 12.0,
            spawn_threshold: 40.0,
            cull_threshold: -40.0,
            velocity: -3.0,
            max_poles: 16,
            min_seed_poles: 3,
            bars_per_span: 4,
            seed: 0x57A8_71C5,
            layers: vec![
                LayerConfig { depth_scale: 1.0, z_offset: 0.0 },
                LayerConfig { depth_scale: 0.55, z_offset: -9.0 },
            ],
        }
    }
}

impl EngineConfig {
    /// Reject configurations the engine cannot run with. Called by the
    /// streamer constructor; nothing past this point is a fatal error.
    pub fn validate(&self) -> Result<()> {
        if self.num_channels == 0 {
            return Err(EngineError::Config("num_channels must be at least 1".into()));
        }
        if !(self.pole_spacing > 0.0) {
            return Err(EngineError::Config(format!(
                "pole_spacing must be positive, got {}",
                self.pole_spacing
            )));
        }
        if self.spawn_threshold <= self.cull_threshold {
            return Err(EngineError::Config(format!(
                "spawn_threshold ({}) must exceed cull_threshold ({})",
                self.spawn_threshold, self.cull_threshold
            )));
        }
        if self.min_seed_poles < 2 {
            return Err(EngineError::Config("min_seed_poles must be at least 2".into()));
        }
        if self.max_poles < self.min_seed_poles {
            return Err(EngineError::Config(format!(
                "max_poles ({}) must be at least min_seed_poles ({})",
                self.max_poles, self.min_seed_poles
            )));
        }
        if self.bars_per_span == 0 {
            return Err(EngineError::Config("bars_per_span must be at least 1".into()));
        }
        if self.layers.is_empty() {
            return Err(EngineError::Config("at least one layer is required".into()));
        }
        Ok(())
    }
}
