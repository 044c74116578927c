//! Render-facing frame state.
//!
//! The engine owns no rasterization; each tick it can be asked for a
//! [`FrameState`] snapshot of every live entity's transform and color. The
//! per-instance structs are `#[repr(C)]` + `Pod` so an external renderer can
//! upload them to instance buffers directly.

use bytemuck::{Pod, Zeroable};

/// One pole instance for the renderer.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct PoleInstance {
    /// Base position, world space (x, y, layer z).
    pub pos: [f32; 3],
    pub height: f32,
    pub lean_angle: f32,
    pub crossarm_half_width: f32,
    /// 1.0 when the pole carries a transformer drum, else 0.0.
    pub has_transformer: f32,
    pub color_r: f32,
    pub color_g: f32,
    pub color_b: f32,
    pub _pad: [f32; 2],
}

/// One polyline vertex of a sampled wire.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct WireVertex {
    pub pos: [f32; 3],
    pub _pad: f32,
}

/// A sampled wire: the static curve plus this tick's wave displacement.
#[derive(Clone, Debug)]
pub struct WirePolyline {
    pub channel: u32,
    pub color: [f32; 3],
    pub vertices: Vec<WireVertex>,
}

/// One bird instance for the renderer.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct BirdInstance {
    pub pos: [f32; 3],
    pub scale: f32,
    pub color: [f32; 3],
    /// Sway angle in radians.
    pub rotation: f32,
}

/// Everything the renderer needs for one frame.
#[derive(Clone, Debug, Default)]
pub struct FrameState {
    pub poles: Vec<PoleInstance>,
    pub wires: Vec<WirePolyline>,
    pub birds: Vec<BirdInstance>,
    /// Low-band energy read, 0 when no signal; renderers use it for ambient
    /// glow on the backdrop.
    pub ambient: f32,
    /// Viewport last reported through the resize notification.
    pub viewport: (u32, u32),
}
