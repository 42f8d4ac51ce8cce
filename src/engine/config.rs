//! Engine settings
//!
//! Constants fixed when the engine starts: sample rate, block size, queue
//! capacity, history length and the fixed effect coefficients. They are
//! never renegotiated at runtime. Settings can be loaded from a JSON file;
//! live effect parameters live in [`super::params::LiveConfig`] instead.

use std::path::Path;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::engine::sample::OutputRange;
use crate::error::{Result, RtfxError};

// ============================================================================
// Defaults
// ============================================================================

/// Reference sample rate (Hz)
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

/// Frames per render period
pub const DEFAULT_BLOCK_SIZE: usize = 512;

/// Seconds of audio the capture queue can hold
pub const DEFAULT_QUEUE_SECONDS: usize = 10;

/// Seconds of echo/reverb history
pub const DEFAULT_HISTORY_SECONDS: usize = 2;

/// Fraction of the delayed echo fed back into the current sample
pub const DEFAULT_ECHO_FEEDBACK: f32 = 0.5;

/// Number of parallel reverb taps
pub const DEFAULT_REVERB_TAPS: usize = 6;

/// Weight of the first reverb tap; tap `t` uses `decay / (t + 1)`
pub const DEFAULT_REVERB_DECAY: f32 = 0.3;

/// Upper bound on reverb taps
pub const MAX_REVERB_TAPS: usize = 16;

// ============================================================================
// Settings
// ============================================================================

/// Startup configuration of the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Frames per render period
    pub block_size: usize,
    /// Capacity of the capture queue in samples
    pub ring_capacity: usize,
    /// Length of every echo/reverb history buffer in samples
    pub max_delay_samples: usize,
    /// Echo feedback coefficient, in [0, 1)
    pub echo_feedback: f32,
    /// Number of reverb taps
    pub reverb_taps: usize,
    /// Base reverb tap weight
    pub reverb_decay: f32,
    /// Distortion clipping range; `None` uses the sample format default
    pub output_range: Option<OutputRange>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self::with_sample_rate(DEFAULT_SAMPLE_RATE)
    }
}

impl EngineSettings {
    /// Default settings scaled to `sample_rate`
    pub fn with_sample_rate(sample_rate: u32) -> Self {
        let rate = sample_rate as usize;
        Self {
            sample_rate,
            block_size: DEFAULT_BLOCK_SIZE,
            ring_capacity: rate * DEFAULT_QUEUE_SECONDS,
            max_delay_samples: rate * DEFAULT_HISTORY_SECONDS,
            echo_feedback: DEFAULT_ECHO_FEEDBACK,
            reverb_taps: DEFAULT_REVERB_TAPS,
            reverb_decay: DEFAULT_REVERB_DECAY,
            output_range: None,
        }
    }

    /// Check every setting against its allowed range
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(RtfxError::invalid_parameter(
                "sample_rate",
                self.sample_rate,
                "greater than 0 Hz",
            ));
        }
        if self.block_size == 0 {
            return Err(RtfxError::invalid_parameter(
                "block_size",
                self.block_size,
                "at least 1 frame",
            ));
        }
        if self.ring_capacity < self.block_size {
            return Err(RtfxError::invalid_parameter(
                "ring_capacity",
                self.ring_capacity,
                format!("at least block_size ({})", self.block_size),
            ));
        }
        // Must cover at least 1 ms so the smallest delay fits
        let min_history = (self.sample_rate as usize / 1000).max(1) + 1;
        if self.max_delay_samples < min_history {
            return Err(RtfxError::invalid_parameter(
                "max_delay_samples",
                self.max_delay_samples,
                format!("at least {} samples", min_history),
            ));
        }
        if !(0.0..1.0).contains(&self.echo_feedback) {
            return Err(RtfxError::invalid_parameter(
                "echo_feedback",
                self.echo_feedback,
                "0.0 to below 1.0",
            ));
        }
        if !(1..=MAX_REVERB_TAPS).contains(&self.reverb_taps) {
            return Err(RtfxError::invalid_parameter(
                "reverb_taps",
                self.reverb_taps,
                format!("1 to {}", MAX_REVERB_TAPS),
            ));
        }
        if !self.reverb_decay.is_finite() || self.reverb_decay < 0.0 {
            return Err(RtfxError::invalid_parameter(
                "reverb_decay",
                self.reverb_decay,
                "finite and >= 0.0",
            ));
        }
        if let Some(range) = &self.output_range {
            range.validate()?;
        }
        Ok(())
    }

    /// Load and validate settings from a JSON file
    ///
    /// Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(RtfxError::FileNotFound {
                path: path.display().to_string(),
                source: None,
            });
        }

        let text = std::fs::read_to_string(path)?;
        let settings: EngineSettings = serde_json::from_str(&text)?;
        settings.validate()?;
        info!("Loaded engine settings from {}", path.display());
        debug!("{:?}", settings);
        Ok(settings)
    }

    /// Write settings as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        info!("Saved engine settings to {}", path.display());
        Ok(())
    }

    /// Largest delay in milliseconds whose sample delay stays below the
    /// history length
    pub fn max_delay_ms(&self) -> u32 {
        let max_samples = self.max_delay_samples.saturating_sub(1) as u64;
        let ms = max_samples * 1000 / self.sample_rate.max(1) as u64;
        ms.clamp(1, u32::MAX as u64) as u32
    }

    /// Delay in whole samples for `delay_ms`, kept below the history length
    pub fn delay_samples(&self, delay_ms: u32) -> usize {
        let samples = delay_ms as u64 * self.sample_rate as u64 / 1000;
        (samples as usize).min(self.max_delay_samples.saturating_sub(1))
    }

    /// Wall-clock length of one render period in milliseconds
    pub fn block_duration_ms(&self) -> f64 {
        self.block_size as f64 * 1000.0 / self.sample_rate.max(1) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_match_reference_behaviour() {
        let settings = EngineSettings::default();
        assert_eq!(settings.sample_rate, 44100);
        assert_eq!(settings.block_size, 512);
        assert_eq!(settings.ring_capacity, 441_000);
        assert_eq!(settings.max_delay_samples, 88_200);
        assert_eq!(settings.reverb_taps, 6);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_max_delay_ms_keeps_delay_inside_history() {
        let settings = EngineSettings::default();
        assert_eq!(settings.max_delay_ms(), 1999);
        assert!(settings.delay_samples(settings.max_delay_ms()) < settings.max_delay_samples);
        assert_eq!(settings.delay_samples(500), 22050);
        assert_eq!(settings.delay_samples(5000), settings.max_delay_samples - 1);
    }

    #[test]
    fn test_block_duration() {
        let settings = EngineSettings::default();
        assert!((settings.block_duration_ms() - 11.61).abs() < 0.01);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut settings = EngineSettings::default();
        settings.block_size = 0;
        assert!(settings.validate().is_err());

        let mut settings = EngineSettings::default();
        settings.ring_capacity = 100;
        assert!(settings.validate().is_err());

        let mut settings = EngineSettings::default();
        settings.echo_feedback = 1.0;
        assert!(settings.validate().is_err());

        let mut settings = EngineSettings::default();
        settings.reverb_taps = 0;
        assert!(settings.validate().is_err());

        let mut settings = EngineSettings::default();
        settings.max_delay_samples = 10;
        assert!(settings.validate().is_err());

        let inverted = r#"{ "output_range": { "floor": 1.0, "ceiling": -1.0 } }"#;
        assert!(serde_json::from_str::<EngineSettings>(inverted).is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let mut settings = EngineSettings::with_sample_rate(48000);
        settings.echo_feedback = 0.6;
        settings.output_range = Some(OutputRange::NORMALIZED_HEADROOM);
        settings.save(&path).unwrap();

        let loaded = EngineSettings::load(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_load_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("partial.json");
        std::fs::write(&path, r#"{ "block_size": 256 }"#).unwrap();

        let loaded = EngineSettings::load(&path).unwrap();
        assert_eq!(loaded.block_size, 256);
        assert_eq!(loaded.sample_rate, 44100);
    }

    #[test]
    fn test_load_missing_file() {
        let result = EngineSettings::load(Path::new("/nonexistent/settings.json"));
        assert!(matches!(result, Err(RtfxError::FileNotFound { .. })));
    }
}
