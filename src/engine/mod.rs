//! Audio Engine Module
//!
//! Everything around the effects pipeline:
//! - Sample formats and the lock-protected capture queue
//! - Startup settings and live effect parameters
//! - Sample sources and the real-time render driver
//! - WAV I/O, offline rendering and (with `live`) device streams

pub mod config;
#[cfg(feature = "live")]
pub mod device;
pub mod driver;
pub mod io;
pub mod offline;
pub mod params;
pub mod ring_buffer;
pub mod sample;
pub mod source;

pub use config::EngineSettings;
#[cfg(feature = "live")]
pub use device::{start_live, LiveSession};
pub use driver::{
    capture_chain, CaptureFeed, EngineStats, RenderDriver, RenderInput, RenderOutcome,
    StatsSnapshot,
};
pub use io::{
    export_wav, from_pcm16, generate_impulse, generate_test_tone, import_wav, to_pcm16,
    ExportFormat,
};
pub use offline::{render_offline, OfflineRender};
pub use params::{ConfigSnapshot, LiveConfig};
pub use ring_buffer::{RingBuffer, RingStatus};
pub use sample::{OutputRange, Sample};
pub use source::{FileSource, PlaybackEnd, SampleSource, SourceRead};
