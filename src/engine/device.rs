//! Live audio through cpal
//!
//! Opens the default input and output devices as mono 16-bit streams at the
//! engine rate and block size. The input callback pushes into the capture
//! queue; the output callback runs the render driver. Both streams stop when
//! the [`LiveSession`] is stopped or dropped.

use std::sync::Arc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{BufferSize, SampleRate, Stream, StreamConfig};
use log::{error, info};

use crate::engine::driver::{capture_chain, EngineStats, StatsSnapshot};
use crate::engine::params::LiveConfig;
use crate::engine::EngineSettings;
use crate::error::{Result, RtfxError};

/// Running capture and playback streams
pub struct LiveSession {
    input: Option<Stream>,
    output: Option<Stream>,
    stats: Arc<EngineStats>,
    config: Arc<LiveConfig>,
}

impl LiveSession {
    /// The shared parameters the control surface writes to
    pub fn config(&self) -> &Arc<LiveConfig> {
        &self.config
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    pub fn is_running(&self) -> bool {
        self.input.is_some() && self.output.is_some()
    }

    /// Stop both streams and release the devices
    pub fn stop(&mut self) {
        if let (Some(_), Some(_)) = (self.input.take(), self.output.take()) {
            let stats = self.stats.snapshot();
            info!(
                "Live session stopped: {} blocks rendered, {} underruns, {} dropped",
                stats.blocks_rendered, stats.underruns, stats.dropped_blocks
            );
        }
    }
}

impl Drop for LiveSession {
    fn drop(&mut self) {
        self.stop();
    }
}

fn device_error(context: &str, e: impl std::fmt::Display) -> RtfxError {
    RtfxError::Device {
        reason: format!("{}: {}", context, e),
    }
}

/// Open the default devices and start processing
pub fn start_live(settings: &EngineSettings, config: Arc<LiveConfig>) -> Result<LiveSession> {
    let (feed, mut driver) = capture_chain::<i16>(settings, Arc::clone(&config))?;
    let stats = Arc::clone(driver.stats());

    let host = cpal::default_host();
    let input_device = host.default_input_device().ok_or_else(|| RtfxError::Device {
        reason: "no default input device".to_string(),
    })?;
    let output_device = host
        .default_output_device()
        .ok_or_else(|| RtfxError::Device {
            reason: "no default output device".to_string(),
        })?;

    info!(
        "Input: {}, output: {}",
        input_device.name().unwrap_or_else(|_| "Unknown".to_string()),
        output_device.name().unwrap_or_else(|_| "Unknown".to_string())
    );

    let stream_config = StreamConfig {
        channels: 1,
        sample_rate: SampleRate(settings.sample_rate),
        buffer_size: BufferSize::Fixed(settings.block_size as u32),
    };

    let input = input_device
        .build_input_stream(
            &stream_config,
            move |data: &[i16], _: &cpal::InputCallbackInfo| {
                feed.push(data);
            },
            |err| error!("Input stream error: {}", err),
            None,
        )
        .map_err(|e| device_error("failed to open input stream", e))?;

    let output = output_device
        .build_output_stream(
            &stream_config,
            move |data: &mut [i16], _: &cpal::OutputCallbackInfo| {
                driver.render(data);
            },
            |err| error!("Output stream error: {}", err),
            None,
        )
        .map_err(|e| device_error("failed to open output stream", e))?;

    input
        .play()
        .map_err(|e| device_error("failed to start input stream", e))?;
    output
        .play()
        .map_err(|e| device_error("failed to start output stream", e))?;

    info!(
        "Live session started: {} Hz, {} frames (~{:.1}ms per block)",
        settings.sample_rate,
        settings.block_size,
        settings.block_duration_ms()
    );

    Ok(LiveSession {
        input: Some(input),
        output: Some(output),
        stats,
        config,
    })
}
