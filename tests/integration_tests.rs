//! Integration Tests
//!
//! End-to-end tests for the rtfx effects pipeline and render driver.

use std::sync::Arc;

use approx::assert_abs_diff_eq;
use pretty_assertions::assert_eq;
use rtfx::dsp::EffectsPipeline;
use rtfx::engine::{
    capture_chain, export_wav, generate_impulse, generate_test_tone, import_wav, render_offline,
    ConfigSnapshot, EngineSettings, EngineStats, ExportFormat, FileSource, LiveConfig,
    PlaybackEnd, RenderDriver, RenderInput, RenderOutcome,
};
use rtfx::RtfxError;
use tempfile::tempdir;

/// Settings at a low rate so delays are easy to count
fn small_settings(block_size: usize) -> EngineSettings {
    let mut settings = EngineSettings::with_sample_rate(1000);
    settings.block_size = block_size;
    settings
}

fn passthrough(settings: &EngineSettings) -> Arc<LiveConfig> {
    let config = LiveConfig::new(settings);
    config.set_lowpass_alpha(0.0);
    Arc::new(config)
}

// === Filter Bank Tests ===

#[test]
fn test_lowpass_impulse_response() {
    let settings = small_settings(4);
    let mut cfg = ConfigSnapshot::defaults_for(&settings);
    cfg.lowpass_alpha = 0.5;

    let mut pipeline = EffectsPipeline::for_format::<f32>(&settings);
    let mut block = vec![1.0f32, 0.0, 0.0, 0.0];
    pipeline.process_block(&mut block, &cfg);

    assert_eq!(block, vec![0.5, 0.25, 0.125, 0.0625]);
}

#[test]
fn test_echo_impulse_decays_geometrically() {
    let settings = small_settings(64);
    let config = passthrough(&settings);
    config.set_echo_enabled(true);
    config.set_delay_ms(50);

    let impulse = generate_impulse(400, 0.5);
    let render = render_offline(&impulse, &settings, config, 0).unwrap();
    let out = &render.samples;

    for k in 0..8 {
        let expected = 0.5 * 0.5f32.powi(k);
        assert_abs_diff_eq!(out[k as usize * 50], expected, epsilon = 1e-6);
    }
    for (n, &sample) in out.iter().enumerate() {
        if n % 50 != 0 {
            assert_eq!(sample, 0.0, "sample {} should be silent", n);
        }
    }
}

#[test]
fn test_distortion_never_leaves_range() {
    let settings = small_settings(128);
    let config = passthrough(&settings);
    config.set_distortion_enabled(true);
    config.set_distortion_gain(100.0);
    config.set_echo_enabled(true);
    config.set_reverb_enabled(true);
    config.set_delay_ms(3);

    let tone = generate_test_tone(50.0, 1.0, 1000, 1.0);
    let render = render_offline(&tone, &settings, Arc::clone(&config), 0).unwrap();
    assert!(render.samples.iter().all(|&s| (-0.8..=0.8).contains(&s)));

    let pcm: Vec<i16> = tone.iter().map(|&s| (s * 32000.0) as i16).collect();
    let render = render_offline(&pcm, &settings, config, 0).unwrap();
    assert!(render.samples.iter().any(|&s| s == i16::MAX));
    assert!(render.samples.iter().any(|&s| s == i16::MIN));
}

#[test]
fn test_full_chain_is_deterministic() {
    let settings = small_settings(100);
    let tone = generate_test_tone(30.0, 2.0, 1000, 0.6);

    let run = || {
        let config = Arc::new(LiveConfig::new(&settings));
        config.set_echo_enabled(true);
        config.set_reverb_enabled(true);
        config.set_distortion_enabled(true);
        config.set_delay_ms(120);
        config.set_lowpass_alpha(0.3);
        render_offline(&tone, &settings, config, 500).unwrap().samples
    };

    assert_eq!(run(), run());
}

#[test]
fn test_zero_and_one_sample_delay_match() {
    let settings = small_settings(16);
    let input: Vec<f32> = (0..64).map(|i| ((i * 7) % 11) as f32 / 20.0).collect();

    let run = |delay_samples| {
        let mut cfg = ConfigSnapshot::defaults_for(&settings);
        cfg.lowpass_alpha = 0.0;
        cfg.echo_enabled = true;
        cfg.reverb_enabled = true;
        cfg.delay_samples = delay_samples;
        let mut pipeline = EffectsPipeline::for_format::<f32>(&settings);
        let mut out = input.clone();
        pipeline.process_block(&mut out, &cfg);
        out
    };

    assert_eq!(run(0), run(1));
}

// === Driver Tests ===

#[test]
fn test_capture_queue_concrete_scenario() {
    let mut settings = small_settings(4);
    settings.ring_capacity = 10;
    let (feed, mut driver) = capture_chain::<i16>(&settings, passthrough(&settings)).unwrap();

    assert!(feed.push(&[1, 2, 3, 4, 5, 6]));
    let mut out = [0i16; 4];
    assert_eq!(driver.render(&mut out), RenderOutcome::Processed);
    assert_eq!(out, [1, 2, 3, 4]);
    assert_eq!(feed.ring().len(), 2);

    // 2 + 9 > 10: dropped whole, queue unchanged
    assert!(!feed.push(&[7; 9]));
    assert_eq!(feed.ring().len(), 2);

    assert_eq!(driver.render(&mut out), RenderOutcome::Underrun);
    assert_eq!(out, [0; 4]);

    let stats = driver.stats().snapshot();
    assert_eq!(stats.dropped_blocks, 1);
    assert_eq!(stats.underruns, 1);
    assert_eq!(stats.blocks_rendered, 2);
}

#[test]
fn test_live_parameter_change_between_blocks() {
    let settings = small_settings(8);
    let config = passthrough(&settings);
    let (feed, mut driver) = capture_chain::<f32>(&settings, Arc::clone(&config)).unwrap();

    let mut out = [0.0f32; 8];
    feed.push(&[0.1; 8]);
    driver.render(&mut out);
    assert_eq!(out, [0.1; 8]);

    config.set_distortion_enabled(true);
    config.set_distortion_gain(20.0);
    feed.push(&[0.1; 8]);
    driver.render(&mut out);
    assert_eq!(out, [0.8; 8]);
}

#[test]
fn test_looping_source_never_exhausts() {
    let settings = small_settings(7);
    let stats = Arc::new(EngineStats::new());
    let mut driver = RenderDriver::new(
        &settings,
        passthrough(&settings),
        RenderInput::Source(Box::new(FileSource::new(vec![1i16, 2, 3], PlaybackEnd::Loop))),
        Arc::clone(&stats),
    )
    .unwrap();

    let mut out = [0i16; 7];
    for _ in 0..10 {
        assert_eq!(driver.render(&mut out), RenderOutcome::Processed);
    }
    assert!(!stats.snapshot().source_exhausted);
    assert_eq!(stats.snapshot().frames_rendered, 70);
}

#[test]
fn test_settings_validation_blocks_driver() {
    let mut settings = small_settings(64);
    settings.ring_capacity = 10;
    let config = Arc::new(LiveConfig::new(&settings));
    let result = capture_chain::<i16>(&settings, config);
    assert!(matches!(result, Err(RtfxError::InvalidParameter { .. })));
}

// === File Round Trip ===

#[test]
fn test_wav_render_round_trip() {
    let dir = tempdir().unwrap();
    let input_path = dir.path().join("input.wav");
    let output_path = dir.path().join("output.wav");

    let settings = EngineSettings::default();
    let tone = generate_test_tone(440.0, 0.25, settings.sample_rate, 0.5);
    export_wav(&tone, &input_path, ExportFormat::float32(settings.sample_rate)).unwrap();

    let decoded = import_wav(&input_path, settings.sample_rate).unwrap();
    let config = Arc::new(LiveConfig::new(&settings));
    config.set_reverb_enabled(true);
    let tail = settings.delay_samples(config.delay_ms()) * 2;
    let render = render_offline(&decoded, &settings, config, tail).unwrap();

    export_wav(
        &render.samples,
        &output_path,
        ExportFormat::float32(settings.sample_rate),
    )
    .unwrap();
    let reloaded = import_wav(&output_path, settings.sample_rate).unwrap();

    assert_eq!(reloaded.len(), tone.len() + tail);
    assert_eq!(reloaded, render.samples);
    // Reverb keeps sounding after the tone stops
    assert!(reloaded[tone.len()..].iter().any(|&s| s.abs() > 1e-3));
}
