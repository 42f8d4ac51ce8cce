//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::path::Path;
use std::sync::Arc;

use log::info;
use serde::Serialize;

use crate::cli::{EffectArgs, Format};
use crate::dsp::EffectsPipeline;
use crate::engine::{
    export_wav, from_pcm16, generate_impulse, generate_test_tone, import_wav, render_offline,
    to_pcm16, ConfigSnapshot, EngineSettings, ExportFormat, LiveConfig, Sample, StatsSnapshot,
};
use crate::error::Result;

/// Settings from `path`, or the defaults
pub fn load_settings(path: Option<&Path>) -> Result<EngineSettings> {
    match path {
        Some(path) => EngineSettings::load(path),
        None => Ok(EngineSettings::default()),
    }
}

/// Render an input WAV through the pipeline into an output WAV.
pub fn render(
    settings: &EngineSettings,
    input: &Path,
    output: &Path,
    effects: &EffectArgs,
    format: Format,
    tail_ms: u32,
) -> Result<StatsSnapshot> {
    info!("Rendering {} -> {}", input.display(), output.display());

    let samples = import_wav(input, settings.sample_rate)?;
    let config = Arc::new(LiveConfig::new(settings));
    effects.apply(&config);
    info!("Effects: {:?}", config.snapshot());

    let tail_samples = (tail_ms as u64 * settings.sample_rate as u64 / 1000) as usize;

    let stats = match format {
        Format::Pcm16 => {
            let render = render_offline(&to_pcm16(&samples), settings, config, tail_samples)?;
            export_wav(
                &from_pcm16(&render.samples),
                output,
                ExportFormat::pcm16(settings.sample_rate),
            )?;
            render.stats
        }
        Format::Float => {
            let render = render_offline(&samples, settings, config, tail_samples)?;
            export_wav(
                &render.samples,
                output,
                ExportFormat::float32(settings.sample_rate),
            )?;
            render.stats
        }
    };

    println!(
        "Rendered {} -> {} ({} frames)",
        input.display(),
        output.display(),
        stats.frames_rendered
    );
    Ok(stats)
}

/// Write a sine or impulse test signal.
pub fn tone(
    settings: &EngineSettings,
    output: &Path,
    frequency: f32,
    duration: f32,
    amplitude: f32,
    impulse: bool,
) -> Result<()> {
    let samples = if impulse {
        let len = (duration * settings.sample_rate as f32) as usize;
        generate_impulse(len, amplitude)
    } else {
        generate_test_tone(frequency, duration, settings.sample_rate, amplitude)
    };

    export_wav(&samples, output, ExportFormat::pcm16(settings.sample_rate))?;
    println!("Wrote {} samples to {}", samples.len(), output.display());
    Ok(())
}

#[derive(Serialize)]
struct EngineInfo<'a> {
    version: &'static str,
    settings: &'a EngineSettings,
    max_delay_ms: u32,
    block_duration_ms: f64,
    defaults: ConfigSnapshot,
    chain: Vec<&'static str>,
}

/// Describe the engine settings and effect chain.
pub fn info(settings: &EngineSettings, json: bool) -> Result<()> {
    settings.validate()?;
    let pipeline = EffectsPipeline::for_format::<i16>(settings);
    let defaults = ConfigSnapshot::defaults_for(settings);

    if json {
        let info = EngineInfo {
            version: env!("CARGO_PKG_VERSION"),
            settings,
            max_delay_ms: settings.max_delay_ms(),
            block_duration_ms: settings.block_duration_ms(),
            defaults,
            chain: pipeline.effects().iter().map(|e| e.effect_type()).collect(),
        };
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("rtfx v{}", env!("CARGO_PKG_VERSION"));
    println!("{:-<60}", "");
    println!("Sample rate:     {} Hz", settings.sample_rate);
    println!(
        "Block size:      {} frames ({:.2} ms)",
        settings.block_size,
        settings.block_duration_ms()
    );
    println!("Queue capacity:  {} samples", settings.ring_capacity);
    println!(
        "History:         {} samples (delay 1..={} ms)",
        settings.max_delay_samples,
        settings.max_delay_ms()
    );
    let range = settings.output_range.unwrap_or(<i16 as Sample>::DEFAULT_RANGE);
    println!("Clip range:      [{}, {}]", range.floor(), range.ceiling());
    println!();
    println!("Effect chain:");
    for (i, effect) in pipeline.effects().iter().enumerate() {
        let state = if effect.is_enabled(&defaults) {
            "on"
        } else {
            "off"
        };
        println!("  {}. {:<12} (default {})", i + 1, effect.display_name(), state);
    }

    Ok(())
}

/// Run live until Enter is pressed.
#[cfg(feature = "live")]
pub fn live(settings: &EngineSettings, effects: &EffectArgs) -> Result<StatsSnapshot> {
    let config = Arc::new(LiveConfig::new(settings));
    effects.apply(&config);

    let mut session = crate::engine::start_live(settings, config)?;
    println!("Processing live audio. Press Enter to stop.");

    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;

    let stats = session.stats();
    session.stop();
    Ok(stats)
}
