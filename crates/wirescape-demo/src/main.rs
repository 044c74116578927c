//! Headless driver for the wirescape engine.
//!
//! Loads a score (or falls back to the built-in demo track), constructs a
//! two-layer scene with a scripted audio-feature source, and ticks it at a
//! fixed rate, logging a summary once per simulated second. Stands in for a
//! real render frontend when developing the engine.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::info;

use wirescape_core::{EngineConfig, SceneStreamer, ScoreTrack, ScriptedAudio, Theme};

#[derive(Parser, Debug)]
#[command(about = "Tick the wirescape scene engine headlessly and log its state")]
struct Args {
    /// Path to a score JSON file (array of bars of {channel, timing, pitch}).
    #[arg(long)]
    score: Option<PathBuf>,
    /// Base PRNG seed; layers derive independent streams from it.
    #[arg(long, default_value_t = 0x57A8_71C5)]
    seed: u64,
    /// Number of frames to simulate.
    #[arg(long, default_value_t = 1800)]
    frames: u32,
    /// Simulated frames per second.
    #[arg(long, default_value_t = 60.0)]
    fps: f32,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let track = match &args.score {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading score {}", path.display()))?;
            ScoreTrack::from_json(&text).context("parsing score")?
        }
        None => ScoreTrack::demo(),
    };

    let cfg = EngineConfig { seed: args.seed, ..EngineConfig::default() };
    let mut scene = SceneStreamer::new(cfg, track, ScriptedAudio::new())
        .context("constructing scene streamer")?;

    let dt = 1.0 / args.fps;
    let per_second = args.fps.max(1.0) as u32;
    let mut now = 0.0f64;

    for frame in 0..args.frames {
        now += dt as f64;
        scene.audio_mut().set_clock(now);
        scene.tick(dt, now);

        if frame % per_second == 0 {
            log_summary(&scene, frame);
        }

        // Exercise the pause path a third of the way in: a paused engine
        // ignores ticks and resumes on current wall time.
        if frame == args.frames / 3 {
            scene.pause();
            scene.tick(dt, now);
            scene.resume();
        }
        // And a theme change halfway: re-tint only, no structural change.
        if frame == args.frames / 2 {
            scene.set_theme(Theme::Light);
        }
    }

    let frame = scene.frame_state();
    info!(
        "final frame: {} poles, {} wires, {} birds, ambient {:.2}",
        frame.poles.len(),
        frame.wires.len(),
        frame.birds.len(),
        frame.ambient
    );

    scene.dispose();
    info!("disposed; live entities: {}", scene.frame_state().poles.len());
    Ok(())
}

fn log_summary(scene: &SceneStreamer<ScriptedAudio>, frame: u32) {
    let (poles, wires, birds) = scene.layers().iter().fold((0, 0, 0), |acc, layer| {
        (
            acc.0 + layer.pole_count(),
            acc.1 + layer.wire_count(),
            acc.2 + layer.bird_count(),
        )
    });
    info!(
        "frame {frame}: {poles} poles, {wires} wires, {birds} birds, bar cursor {}",
        scene.bar_cursor().index()
    );
}
