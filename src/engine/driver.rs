//! Real-time render driver
//!
//! The two entry points an audio backend calls every period:
//!
//! - [`CaptureFeed::push`] from the capture context, handing a block of
//!   input to the queue.
//! - [`RenderDriver::render`] from the output context, filling the output
//!   block in place.
//!
//! Neither allocates, blocks beyond the queue's short critical section, or
//! logs. Underruns and dropped blocks are counted in [`EngineStats`] and
//! recovered locally: a missing block renders as silence, a block that does
//! not fit is discarded.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;

use crate::dsp::EffectsPipeline;
use crate::engine::params::LiveConfig;
use crate::engine::ring_buffer::RingBuffer;
use crate::engine::source::SampleSource;
use crate::engine::{EngineSettings, Sample};
use crate::error::Result;

// ============================================================================
// Stats
// ============================================================================

/// Event counters shared between the real-time contexts and observers
#[derive(Debug, Default)]
pub struct EngineStats {
    blocks_rendered: AtomicU64,
    frames_rendered: AtomicU64,
    underruns: AtomicU64,
    blocks_captured: AtomicU64,
    dropped_blocks: AtomicU64,
    source_exhausted: AtomicBool,
}

/// Plain copy of [`EngineStats`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StatsSnapshot {
    pub blocks_rendered: u64,
    pub frames_rendered: u64,
    pub underruns: u64,
    pub blocks_captured: u64,
    pub dropped_blocks: u64,
    pub source_exhausted: bool,
}

impl EngineStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            blocks_rendered: self.blocks_rendered.load(Ordering::Relaxed),
            frames_rendered: self.frames_rendered.load(Ordering::Relaxed),
            underruns: self.underruns.load(Ordering::Relaxed),
            blocks_captured: self.blocks_captured.load(Ordering::Relaxed),
            dropped_blocks: self.dropped_blocks.load(Ordering::Relaxed),
            source_exhausted: self.source_exhausted.load(Ordering::Relaxed),
        }
    }

    fn record_render(&self, frames: usize) {
        self.blocks_rendered.fetch_add(1, Ordering::Relaxed);
        self.frames_rendered.fetch_add(frames as u64, Ordering::Relaxed);
    }
}

// ============================================================================
// Capture side
// ============================================================================

/// Producer handle used by the capture context
pub struct CaptureFeed<T> {
    ring: Arc<RingBuffer<T>>,
    stats: Arc<EngineStats>,
}

impl<T: Sample> CaptureFeed<T> {
    pub fn new(ring: Arc<RingBuffer<T>>, stats: Arc<EngineStats>) -> Self {
        Self { ring, stats }
    }

    /// Queue one captured block; returns false if it was dropped
    ///
    /// A block that does not fit is discarded whole. The capture device is
    /// never held back.
    pub fn push(&self, block: &[T]) -> bool {
        match self.ring.write(block) {
            Ok(()) => {
                self.stats.blocks_captured.fetch_add(1, Ordering::Relaxed);
                true
            }
            Err(_) => {
                self.stats.dropped_blocks.fetch_add(1, Ordering::Relaxed);
                false
            }
        }
    }

    pub fn ring(&self) -> &Arc<RingBuffer<T>> {
        &self.ring
    }
}

impl<T> Clone for CaptureFeed<T> {
    fn clone(&self) -> Self {
        Self {
            ring: Arc::clone(&self.ring),
            stats: Arc::clone(&self.stats),
        }
    }
}

// ============================================================================
// Render side
// ============================================================================

/// Where the render driver takes its input from
pub enum RenderInput<T: Sample> {
    /// The capture queue
    Capture(Arc<RingBuffer<T>>),
    /// A file-backed source
    Source(Box<dyn SampleSource<T>>),
}

/// What happened during one render call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// A block (possibly the partial last block of a file) was processed
    Processed,
    /// The queue held less than a block; output is silence
    Underrun,
    /// The file source has ended; output is silence
    Exhausted,
}

/// Consumer side: pulls input, runs the pipeline, fills the output block
pub struct RenderDriver<T: Sample> {
    pipeline: EffectsPipeline,
    config: Arc<LiveConfig>,
    input: RenderInput<T>,
    stats: Arc<EngineStats>,
    exhausted: bool,
}

impl<T: Sample> RenderDriver<T> {
    /// Validates `settings` before sizing the pipeline from them
    pub fn new(
        settings: &EngineSettings,
        config: Arc<LiveConfig>,
        input: RenderInput<T>,
        stats: Arc<EngineStats>,
    ) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            pipeline: EffectsPipeline::for_format::<T>(settings),
            config,
            input,
            stats,
            exhausted: false,
        })
    }

    /// Render one period into `out`
    ///
    /// `out` is always fully written: processed audio, or silence when no
    /// input is available.
    pub fn render(&mut self, out: &mut [T]) -> RenderOutcome {
        out.fill(T::zero());

        let outcome = match &mut self.input {
            RenderInput::Capture(ring) => match ring.read_into(out) {
                Ok(()) => RenderOutcome::Processed,
                Err(_) => {
                    self.stats.underruns.fetch_add(1, Ordering::Relaxed);
                    RenderOutcome::Underrun
                }
            },
            RenderInput::Source(_) if self.exhausted => RenderOutcome::Exhausted,
            RenderInput::Source(source) => {
                let read = source.read_next(out);
                if read.end_of_stream {
                    self.exhausted = true;
                    self.stats.source_exhausted.store(true, Ordering::Relaxed);
                }
                if read.frames > 0 {
                    RenderOutcome::Processed
                } else {
                    RenderOutcome::Exhausted
                }
            }
        };

        if outcome == RenderOutcome::Processed {
            let config = self.config.snapshot();
            self.pipeline.process_block(out, &config);
        }

        self.stats.record_render(out.len());
        outcome
    }

    /// Switch input; filter history carries over
    pub fn set_input(&mut self, input: RenderInput<T>) {
        self.input = input;
        self.exhausted = false;
    }

    /// True once a file source has ended
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn pipeline(&self) -> &EffectsPipeline {
        &self.pipeline
    }

    /// Clear filter history; only while the stream is stopped
    pub fn reset(&mut self) {
        self.pipeline.reset();
    }

    pub fn config(&self) -> &Arc<LiveConfig> {
        &self.config
    }

    pub fn stats(&self) -> &Arc<EngineStats> {
        &self.stats
    }
}

/// Build a capture queue with its producer and consumer ends
pub fn capture_chain<T: Sample>(
    settings: &EngineSettings,
    config: Arc<LiveConfig>,
) -> Result<(CaptureFeed<T>, RenderDriver<T>)> {
    settings.validate()?;
    let ring = Arc::new(RingBuffer::new(settings.ring_capacity)?);
    let stats = Arc::new(EngineStats::new());
    let feed = CaptureFeed::new(Arc::clone(&ring), Arc::clone(&stats));
    let driver = RenderDriver::new(settings, config, RenderInput::Capture(ring), stats)?;
    Ok((feed, driver))
}
