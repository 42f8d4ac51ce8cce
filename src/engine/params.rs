//! Live effect parameters
//!
//! Written by the control surface at arbitrary times, read by the render
//! context once per block. Each field is its own atomic, so a reader never
//! blocks and never sees a torn scalar. Fields are not read as one atomic
//! group: a block may see a mix of old and new values across fields, which
//! is at most one block of stale parameters.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::engine::config::EngineSettings;

/// Default echo state
pub const DEFAULT_ECHO_ENABLED: bool = false;

/// Default delay in milliseconds
pub const DEFAULT_DELAY_MS: u32 = 500;

/// Default low-pass smoothing coefficient
pub const DEFAULT_LOWPASS_ALPHA: f32 = 0.1;

/// Default distortion state
pub const DEFAULT_DISTORTION_ENABLED: bool = false;

/// Default distortion pre-gain
pub const DEFAULT_DISTORTION_GAIN: f32 = 2.0;

/// Default reverb state
pub const DEFAULT_REVERB_ENABLED: bool = false;

/// Largest accepted distortion gain
pub const MAX_DISTORTION_GAIN: f32 = 100.0;

/// Parameter values seen by one rendered block
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    pub echo_enabled: bool,
    pub delay_ms: u32,
    /// `delay_ms` converted to samples, below the history length
    pub delay_samples: usize,
    pub lowpass_alpha: f32,
    pub distortion_enabled: bool,
    pub distortion_gain: f32,
    pub reverb_enabled: bool,
}

impl ConfigSnapshot {
    /// Default parameters for the given engine settings
    pub fn defaults_for(settings: &EngineSettings) -> Self {
        let delay_ms = DEFAULT_DELAY_MS.min(settings.max_delay_ms());
        Self {
            echo_enabled: DEFAULT_ECHO_ENABLED,
            delay_ms,
            delay_samples: settings.delay_samples(delay_ms),
            lowpass_alpha: DEFAULT_LOWPASS_ALPHA,
            distortion_enabled: DEFAULT_DISTORTION_ENABLED,
            distortion_gain: DEFAULT_DISTORTION_GAIN,
            reverb_enabled: DEFAULT_REVERB_ENABLED,
        }
    }
}

/// Clamp alpha into [0, 1]; NaN becomes 0 (passthrough)
fn sanitize_alpha(alpha: f32) -> f32 {
    if alpha.is_nan() {
        0.0
    } else {
        alpha.clamp(0.0, 1.0)
    }
}

/// Clamp gain into [0, MAX_DISTORTION_GAIN]; NaN becomes 0
fn sanitize_gain(gain: f32) -> f32 {
    if gain.is_nan() {
        0.0
    } else {
        gain.clamp(0.0, MAX_DISTORTION_GAIN)
    }
}

/// Shared, individually atomic effect parameters
#[derive(Debug)]
pub struct LiveConfig {
    echo_enabled: AtomicBool,
    delay_ms: AtomicU32,
    lowpass_alpha: AtomicU32,
    distortion_enabled: AtomicBool,
    distortion_gain: AtomicU32,
    reverb_enabled: AtomicBool,
    sample_rate: u32,
    max_delay_samples: usize,
    max_delay_ms: u32,
}

impl LiveConfig {
    /// Parameters at their defaults, bounded by `settings`
    pub fn new(settings: &EngineSettings) -> Self {
        Self::from_snapshot(settings, ConfigSnapshot::defaults_for(settings))
    }

    /// Parameters initialised from `snapshot` (values are clamped)
    pub fn from_snapshot(settings: &EngineSettings, snapshot: ConfigSnapshot) -> Self {
        let max_delay_ms = settings.max_delay_ms();
        Self {
            echo_enabled: AtomicBool::new(snapshot.echo_enabled),
            delay_ms: AtomicU32::new(snapshot.delay_ms.clamp(1, max_delay_ms)),
            lowpass_alpha: AtomicU32::new(sanitize_alpha(snapshot.lowpass_alpha).to_bits()),
            distortion_enabled: AtomicBool::new(snapshot.distortion_enabled),
            distortion_gain: AtomicU32::new(sanitize_gain(snapshot.distortion_gain).to_bits()),
            reverb_enabled: AtomicBool::new(snapshot.reverb_enabled),
            sample_rate: settings.sample_rate,
            max_delay_samples: settings.max_delay_samples,
            max_delay_ms,
        }
    }

    // ========================================================================
    // Control surface setters
    // ========================================================================

    pub fn set_echo_enabled(&self, enabled: bool) {
        self.echo_enabled.store(enabled, Ordering::Relaxed);
    }

    /// Set the delay, clamped to `[1, max_delay_ms]`; returns the stored value
    pub fn set_delay_ms(&self, delay_ms: i64) -> u32 {
        let clamped = delay_ms.clamp(1, self.max_delay_ms as i64) as u32;
        if clamped as i64 != delay_ms {
            warn!(
                "delay_ms {} out of range, clamped to {} (1..={})",
                delay_ms, clamped, self.max_delay_ms
            );
        }
        self.delay_ms.store(clamped, Ordering::Relaxed);
        clamped
    }

    /// Set the low-pass coefficient, clamped to [0, 1]; returns the stored value
    pub fn set_lowpass_alpha(&self, alpha: f32) -> f32 {
        let clamped = sanitize_alpha(alpha);
        if clamped != alpha {
            warn!("lowpass_alpha {} out of range, clamped to {}", alpha, clamped);
        }
        self.lowpass_alpha.store(clamped.to_bits(), Ordering::Relaxed);
        clamped
    }

    pub fn set_distortion_enabled(&self, enabled: bool) {
        self.distortion_enabled.store(enabled, Ordering::Relaxed);
    }

    /// Set the distortion gain, clamped to [0, MAX_DISTORTION_GAIN]; returns
    /// the stored value
    pub fn set_distortion_gain(&self, gain: f32) -> f32 {
        let clamped = sanitize_gain(gain);
        if clamped != gain {
            warn!("distortion_gain {} out of range, clamped to {}", gain, clamped);
        }
        self.distortion_gain.store(clamped.to_bits(), Ordering::Relaxed);
        clamped
    }

    pub fn set_reverb_enabled(&self, enabled: bool) {
        self.reverb_enabled.store(enabled, Ordering::Relaxed);
    }

    // ========================================================================
    // Readers
    // ========================================================================

    pub fn echo_enabled(&self) -> bool {
        self.echo_enabled.load(Ordering::Relaxed)
    }

    pub fn delay_ms(&self) -> u32 {
        self.delay_ms.load(Ordering::Relaxed)
    }

    pub fn lowpass_alpha(&self) -> f32 {
        f32::from_bits(self.lowpass_alpha.load(Ordering::Relaxed))
    }

    pub fn distortion_enabled(&self) -> bool {
        self.distortion_enabled.load(Ordering::Relaxed)
    }

    pub fn distortion_gain(&self) -> f32 {
        f32::from_bits(self.distortion_gain.load(Ordering::Relaxed))
    }

    pub fn reverb_enabled(&self) -> bool {
        self.reverb_enabled.load(Ordering::Relaxed)
    }

    /// Largest accepted delay in milliseconds
    pub fn max_delay_ms(&self) -> u32 {
        self.max_delay_ms
    }

    /// Read every field once. Allocation- and lock-free.
    pub fn snapshot(&self) -> ConfigSnapshot {
        let delay_ms = self.delay_ms();
        let delay_samples = (delay_ms as u64 * self.sample_rate as u64 / 1000) as usize;
        ConfigSnapshot {
            echo_enabled: self.echo_enabled(),
            delay_ms,
            delay_samples: delay_samples.min(self.max_delay_samples.saturating_sub(1)),
            lowpass_alpha: self.lowpass_alpha(),
            distortion_enabled: self.distortion_enabled(),
            distortion_gain: self.distortion_gain(),
            reverb_enabled: self.reverb_enabled(),
        }
    }
}
