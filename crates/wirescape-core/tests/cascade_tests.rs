// Cascade-destroy invariant under randomized schedules: no wire or bird may
// ever reference a destroyed pole or wire, and the per-layer structure
// (ordering, span counts, ceilings) must hold after every operation.

use rand::prelude::*;

use wirescape_core::{EngineConfig, Layer, SceneStreamer, ScoreTrack, ScriptedAudio, Theme};

fn assert_layer_consistent(layer: &Layer, cfg: &EngineConfig, step: usize) {
    let count = layer.pole_count();
    assert!(count <= cfg.max_poles, "step {step}: pole ceiling exceeded");

    let positions = layer.pole_positions();
    for pair in positions.windows(2) {
        assert!(pair[0] < pair[1], "step {step}: poles out of ascending order");
    }

    let expected_wires = count.saturating_sub(1) * cfg.num_channels;
    assert_eq!(layer.wire_count(), expected_wires, "step {step}: span count broken");

    for wire in layer.wires() {
        assert!(
            layer.pole(wire.start_pole).is_some(),
            "step {step}: wire references a destroyed start pole"
        );
        assert!(
            layer.pole(wire.end_pole).is_some(),
            "step {step}: wire references a destroyed end pole"
        );
        assert!(wire.channel < cfg.num_channels);
    }
    for bird in layer.birds() {
        assert!(
            layer.wire(bird.wire).is_some(),
            "step {step}: bird perched on a destroyed wire"
        );
        assert!((0.0..=1.0).contains(&bird.t));
    }
}

#[test]
fn randomized_schedules_never_leave_dangling_references() {
    // Fast drift and a tight window force constant spawn/cull churn.
    let cfg = EngineConfig {
        velocity: -30.0,
        spawn_threshold: 30.0,
        cull_threshold: -30.0,
        pole_spacing: 9.0,
        max_poles: 10,
        ..EngineConfig::default()
    };

    for seed in [1u64, 42, 0xDEAD_BEEF] {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut scene = SceneStreamer::new(
            EngineConfig { seed, ..cfg.clone() },
            ScoreTrack::demo(),
            ScriptedAudio::new(),
        )
        .unwrap();

        let mut now = 0.0f64;
        for step in 0..800 {
            match rng.gen_range(0..10) {
                0 => scene.pause(),
                1 => scene.resume(),
                2 => scene.set_theme(if rng.gen() { Theme::Light } else { Theme::Dark }),
                3 => scene.notify_resize(rng.gen_range(100..2000), rng.gen_range(100..2000)),
                4 => scene.audio_mut().set_active(rng.gen()),
                _ => {
                    let dt = rng.gen_range(0.0..0.25);
                    now += dt as f64;
                    scene.audio_mut().set_clock(now);
                    scene.tick(dt, now);
                }
            }
            for layer in scene.layers() {
                assert_layer_consistent(layer, scene.config(), step);
            }
        }

        scene.resume();
        scene.dispose();
        for layer in scene.layers() {
            assert_eq!(layer.pole_count(), 0, "dispose must destroy every pole");
            assert_eq!(layer.wire_count(), 0, "dispose must cascade to wires");
            assert_eq!(layer.bird_count(), 0, "dispose must cascade to birds");
        }
    }
}

#[test]
fn a_cull_destroys_the_whole_span_in_one_tick() {
    let cfg = EngineConfig {
        velocity: -100.0,
        ..EngineConfig::default()
    };
    let mut scene =
        SceneStreamer::new(cfg, ScoreTrack::demo(), ScriptedAudio::new()).unwrap();
    // One large tick pushes the leftmost poles past the cull line; the
    // invariants must already hold when the tick returns.
    scene.tick(0.5, 0.5);
    for layer in scene.layers() {
        assert_layer_consistent(layer, scene.config(), 0);
    }
}
