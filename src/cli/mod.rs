//! CLI Module
//!
//! Command-line interface for the rtfx effects engine.

pub mod commands;

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::engine::LiveConfig;

/// rtfx - real-time mono effects engine (low-pass, echo, reverb, distortion)
#[derive(Parser, Debug)]
#[command(name = "rtfx")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Engine settings file (JSON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a WAV file through the effects pipeline
    #[command(name = "render")]
    Render {
        /// Input WAV file (must match the engine sample rate)
        input: PathBuf,

        /// Output WAV file
        output: PathBuf,

        #[command(flatten)]
        effects: EffectArgs,

        /// Sample format to process and write
        #[arg(long, value_enum, default_value_t = Format::Pcm16)]
        format: Format,

        /// Silence appended so echo and reverb can ring out (ms)
        #[arg(long, default_value_t = 0)]
        tail_ms: u32,

        /// Print render statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a test signal to a WAV file
    #[command(name = "tone")]
    Tone {
        /// Output WAV file
        output: PathBuf,

        /// Sine frequency in Hz
        #[arg(long, default_value_t = 440.0)]
        frequency: f32,

        /// Length in seconds
        #[arg(long, default_value_t = 2.0)]
        duration: f32,

        /// Peak amplitude (normalized)
        #[arg(long, default_value_t = 0.5)]
        amplitude: f32,

        /// Write a single impulse instead of a sine
        #[arg(long)]
        impulse: bool,
    },

    /// Show engine settings and the effect chain
    #[command(name = "info")]
    Info {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Process the default input device to the default output device
    #[cfg(feature = "live")]
    #[command(name = "live")]
    Live {
        #[command(flatten)]
        effects: EffectArgs,
    },
}

/// Sample format used for processing and output
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    /// Signed 16-bit integer, clipped to full scale
    Pcm16,
    /// 32-bit float, clipped to +/-0.8
    Float,
}

/// Effect parameters, applied through the same clamping setters as a
/// control surface
#[derive(Args, Debug, Clone, Default)]
pub struct EffectArgs {
    /// Enable echo
    #[arg(long)]
    pub echo: bool,

    /// Echo/reverb delay in milliseconds
    #[arg(long, allow_negative_numbers = true)]
    pub delay_ms: Option<i64>,

    /// Low-pass smoothing coefficient (0 = bypass, 1 = frozen)
    #[arg(long, allow_negative_numbers = true)]
    pub alpha: Option<f32>,

    /// Enable distortion
    #[arg(long)]
    pub distortion: bool,

    /// Distortion pre-gain
    #[arg(long, allow_negative_numbers = true)]
    pub gain: Option<f32>,

    /// Enable reverb
    #[arg(long)]
    pub reverb: bool,
}

impl EffectArgs {
    /// Write the given parameters into `config`; unset values keep their
    /// defaults
    pub fn apply(&self, config: &LiveConfig) {
        config.set_echo_enabled(self.echo);
        config.set_distortion_enabled(self.distortion);
        config.set_reverb_enabled(self.reverb);
        if let Some(delay_ms) = self.delay_ms {
            config.set_delay_ms(delay_ms);
        }
        if let Some(alpha) = self.alpha {
            config.set_lowpass_alpha(alpha);
        }
        if let Some(gain) = self.gain {
            config.set_distortion_gain(gain);
        }
    }
}
