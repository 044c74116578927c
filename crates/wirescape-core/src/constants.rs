// Shared tuning constants for the streaming scene. These are presentation
// parameters adjusted by eye against the reference track, not contracts.

// Wire wave overlay
pub const WAVE_K1: f32 = 6.0; // spatial frequency along the wire (radians over t in 0..1)
pub const WAVE_K2: f32 = 4.0; // temporal frequency (radians per second)
pub const WAVE_GAIN: f32 = 0.6; // world-space amplitude at full channel intensity

// Perch parameter clamp — keeps birds off the wire end caps
pub const T_CLAMP_MIN: f32 = 0.05;
pub const T_CLAMP_MAX: f32 = 0.95;

// Bird motion and the center-crossing blink
pub const SWAY_RATE: f32 = 1.5; // idle rotational sway, radians per second
pub const SWAY_AMOUNT: f32 = 0.1; // peak sway angle in radians
pub const BLINK_RATE: f32 = 10.0; // pulse frequency while crossing the playhead
pub const CENTER_BLINK_RANGE: f32 = 2.0; // world-x half-width of the playhead zone

// Bird sizing
pub const BIRD_BASE_SCALE: f32 = 1.0; // idle size
pub const BIRD_SCALE_SPAN: f32 = 0.5; // how much a full pulse enlarges a bird

// Chance of a purely decorative (non music-driven) bird per span
pub const DECOR_BIRD_CHANCE: f64 = 0.35;

// Randomized pole geometry, sampled per spawn from the layer's stream
pub const POLE_HEIGHT_RANGE: (f32, f32) = (9.0, 12.0);
pub const CROSSARM_HALF_WIDTH_RANGE: (f32, f32) = (1.2, 1.8);
pub const CROSSARM_DROP: f32 = 0.8; // attach height below the pole tip
pub const LEAN_ANGLE_RANGE: (f32, f32) = (-0.04, 0.04); // radians
pub const TRANSFORMER_CHANCE: f64 = 0.25;
pub const WIRE_SAG_RANGE: (f32, f32) = (0.6, 1.4);

// Wire polyline resolution handed to the renderer
pub const WIRE_SAMPLES: usize = 16; // segments per wire

// Spectrum bins folded into the ambient energy read
pub const AMBIENT_BAND_BINS: usize = 16;

// Default palette per theme: [baseline, accent] RGB
pub const BIRD_COLORS_DARK: [[f32; 3]; 2] = [
    [0.07, 0.07, 0.10], // near-black silhouette
    [0.95, 0.62, 0.25], // warm sodium accent
];
pub const BIRD_COLORS_LIGHT: [[f32; 3]; 2] = [
    [0.16, 0.17, 0.20],
    [0.85, 0.30, 0.18],
];
pub const WIRE_COLOR_DARK: [f32; 3] = [0.12, 0.12, 0.15];
pub const WIRE_COLOR_LIGHT: [f32; 3] = [0.25, 0.26, 0.30];
pub const POLE_COLOR_DARK: [f32; 3] = [0.10, 0.09, 0.11];
pub const POLE_COLOR_LIGHT: [f32; 3] = [0.22, 0.20, 0.19];
