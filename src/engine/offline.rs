//! Offline rendering
//!
//! Runs a decoded sample array through the same render driver the live
//! engine uses, one block at a time, and collects the output. A silent tail
//! can be appended so echo and reverb ring out past the end of the input.

use std::sync::Arc;

use log::{debug, info};

use crate::engine::driver::{EngineStats, RenderDriver, RenderInput, RenderOutcome, StatsSnapshot};
use crate::engine::params::LiveConfig;
use crate::engine::source::{FileSource, PlaybackEnd};
use crate::engine::{EngineSettings, Sample};
use crate::error::{Result, RtfxError};

/// Output of an offline render
#[derive(Debug, Clone)]
pub struct OfflineRender<T> {
    /// Processed samples, `input length + tail` long
    pub samples: Vec<T>,
    pub stats: StatsSnapshot,
}

/// Render `samples` plus `tail_samples` of silence through the pipeline
pub fn render_offline<T: Sample>(
    samples: &[T],
    settings: &EngineSettings,
    config: Arc<LiveConfig>,
    tail_samples: usize,
) -> Result<OfflineRender<T>> {
    settings.validate()?;
    if samples.is_empty() {
        return Err(RtfxError::EmptyAudio);
    }

    let total = samples.len() + tail_samples;
    let mut padded = Vec::with_capacity(total);
    padded.extend_from_slice(samples);
    padded.resize(total, T::zero());

    let stats = Arc::new(EngineStats::new());
    let source = FileSource::new(padded, PlaybackEnd::Stop);
    let mut driver = RenderDriver::new(
        settings,
        config,
        RenderInput::Source(Box::new(source)),
        Arc::clone(&stats),
    )?;

    debug!(
        "Offline render: {} samples + {} tail, block {}",
        samples.len(),
        tail_samples,
        settings.block_size
    );

    let mut output = Vec::with_capacity(total + settings.block_size);
    let mut block = vec![T::zero(); settings.block_size];
    while driver.render(&mut block) == RenderOutcome::Processed {
        output.extend_from_slice(&block);
        if driver.is_exhausted() {
            break;
        }
    }
    output.truncate(total);

    let stats = stats.snapshot();
    info!(
        "Rendered {} samples in {} blocks",
        output.len(),
        stats.blocks_rendered
    );
    Ok(OfflineRender {
        samples: output,
        stats,
    })
}
