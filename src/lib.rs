//! rtfx - Real-Time Mono Audio Effects Engine
//!
//! Captured or file-sourced mono audio flows through a fixed chain of
//! per-sample effects and out to playback:
//!
//! ```text
//! capture -> ring buffer -> Low-Pass -> Echo -> Reverb -> Distortion -> output
//! ```
//!
//! # Architecture
//!
//! - [`engine`]: the capture queue, settings and live parameters, the render
//!   driver and its sources, WAV I/O and offline rendering
//! - [`dsp`]: the filters and the pipeline that runs them
//! - [`cli`]: the `rtfx-cli` front end
//!
//! The render path never allocates, logs or returns an error. Underruns
//! produce silence and are counted in [`engine::EngineStats`].

pub mod cli;
pub mod dsp;
pub mod engine;
pub mod error;

pub use error::{Result, RtfxError};
