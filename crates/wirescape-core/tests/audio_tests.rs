// Audio-reactive modulation: baseline behavior when the feed is silent or
// disabled mid-run.

use wirescape_core::constants::{BIRD_BASE_SCALE, BIRD_COLORS_DARK};
use wirescape_core::{
    AudioFeatures, EngineConfig, SceneStreamer, ScoreTrack, ScriptedAudio, SilentAudio,
};

#[test]
fn scripted_audio_stays_in_range() {
    let mut audio = ScriptedAudio::new();
    assert!(audio.is_signal_active());
    for step in 0..200 {
        audio.set_clock(step as f64 * 0.037);
        for channel in 0..4 {
            let v = audio.channel_intensity(channel);
            assert!((0.0..=1.0).contains(&v), "channel intensity out of range: {v}");
        }
        let band = audio.energy_band(0, 16);
        assert!((0.0..=1.0).contains(&band));
    }
    audio.set_active(false);
    assert!(!audio.is_signal_active());
    assert_eq!(audio.channel_intensity(0), 0.0);
    assert_eq!(audio.energy_band(0, 16), 0.0);
}

#[test]
fn silent_feed_keeps_the_scene_at_baseline() {
    let mut scene =
        SceneStreamer::new(EngineConfig::default(), ScoreTrack::demo(), SilentAudio).unwrap();
    for tick in 0..120 {
        scene.tick(1.0 / 60.0, tick as f64 / 60.0);
    }
    for layer in scene.layers() {
        for wire in layer.wires() {
            assert_eq!(wire.wave_intensity, 0.0);
        }
        for bird in layer.birds() {
            assert_eq!(bird.visual.color_mix, 0.0);
            assert_eq!(bird.visual.scale, BIRD_BASE_SCALE);
        }
    }
    assert_eq!(scene.frame_state().ambient, 0.0);
}

#[test]
fn disabling_the_feed_zeroes_modulation_within_one_tick() {
    let mut scene =
        SceneStreamer::new(EngineConfig::default(), ScoreTrack::demo(), ScriptedAudio::new())
            .unwrap();
    // Run hot for a while so wires and birds carry non-baseline state.
    let mut now = 0.0;
    for _ in 0..180 {
        now += 1.0 / 60.0;
        scene.audio_mut().set_clock(now);
        scene.tick(1.0 / 60.0, now);
    }
    let had_modulation = scene
        .layers()
        .iter()
        .flat_map(|l| l.wires())
        .any(|w| w.wave_intensity > 0.0);
    assert!(had_modulation, "scripted feed should have driven the wires");

    scene.audio_mut().set_active(false);
    now += 1.0 / 60.0;
    scene.tick(1.0 / 60.0, now);

    for layer in scene.layers() {
        for wire in layer.wires() {
            assert_eq!(wire.wave_intensity, 0.0, "no residual wave after one tick");
        }
        for bird in layer.birds() {
            assert_eq!(bird.visual.color_mix, 0.0, "birds drop to baseline after one tick");
        }
    }
    // Every rendered bird color equals the baseline palette exactly.
    for bird in &scene.frame_state().birds {
        assert_eq!(bird.color, BIRD_COLORS_DARK[0]);
        assert_eq!(bird.scale, BIRD_BASE_SCALE);
    }
}

#[test]
fn only_music_driven_birds_read_their_channel() {
    let mut scene =
        SceneStreamer::new(EngineConfig::default(), ScoreTrack::demo(), ScriptedAudio::new())
            .unwrap();
    // Park the clock where every channel envelope is strictly positive and
    // tick once.
    scene.audio_mut().set_clock(0.4);
    scene.tick(1.0 / 60.0, 0.4);

    for layer in scene.layers() {
        for bird in layer.birds() {
            let in_blink_zone =
                bird.visual.world_pos.x.abs() < wirescape_core::constants::CENTER_BLINK_RANGE;
            if !bird.music_driven && !in_blink_zone {
                assert_eq!(
                    bird.visual.color_mix, 0.0,
                    "decorative birds away from the playhead stay at baseline"
                );
            }
        }
    }
}
