//! Music-synchronized streaming scene engine: an infinite run of utility
//! poles, wires, and perched birds scrolling past a fixed viewport.
//!
//! The engine streams the world horizontally (spawn on the right, cull on
//! the left), maps a cyclic musical score deterministically onto bird
//! placements along each wire span, and modulates wires and birds from a
//! live audio-feature snapshot. Rasterization and audio playback live
//! outside: a renderer consumes [`state::FrameState`] and the audio
//! subsystem supplies an [`audio::AudioFeatures`] implementation.

pub mod audio;
pub mod bird;
pub mod config;
pub mod constants;
pub mod error;
pub mod layer;
pub mod scene;
pub mod score;
pub mod state;
pub mod wire;

pub use audio::{AudioFeatures, ScriptedAudio, SilentAudio};
pub use bird::{Bird, BirdVisual};
pub use config::{EngineConfig, LayerConfig};
pub use error::{EngineError, Result};
pub use layer::{Arena, Layer, Pole, SlotId};
pub use scene::{SceneStreamer, Theme};
pub use score::{placements_for, Bar, BarCursor, Note, Placement, ScoreTrack};
pub use state::{BirdInstance, FrameState, PoleInstance, WirePolyline, WireVertex};
pub use wire::{Wire, WireCurve};
