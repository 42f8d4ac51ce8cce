//! File-backed sample sources
//!
//! An alternate producer for the render driver. A source hands out up to
//! `N` samples per call and says when it has run dry. The decoded samples
//! are kept behind an `Arc<[T]>` so a waveform view can read them without
//! ever being able to change what is played.

use std::sync::Arc;

use crate::engine::Sample;
use crate::error::{Result, RtfxError};

/// Result of one pull from a source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceRead {
    /// Samples written to the front of the output slice
    pub frames: usize,
    /// No samples remain after this read
    pub end_of_stream: bool,
}

/// What a file source does when it reaches the end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackEnd {
    /// Report end of stream; the driver falls silent
    #[default]
    Stop,
    /// Wrap to the start and keep going
    Loop,
}

/// A producer the render driver can pull from instead of the capture queue
pub trait SampleSource<T: Sample>: Send {
    /// Copy up to `out.len()` samples into the front of `out`
    ///
    /// Must not allocate or block.
    fn read_next(&mut self, out: &mut [T]) -> SourceRead;

    /// Like [`read_next`](Self::read_next), with a dry source as an error
    ///
    /// # Errors
    /// `SourceExhausted` if no samples were available.
    fn try_read(&mut self, out: &mut [T]) -> Result<usize> {
        let read = self.read_next(out);
        if read.frames == 0 && read.end_of_stream {
            return Err(RtfxError::SourceExhausted);
        }
        Ok(read.frames)
    }
}

/// Plays back a decoded sample array
#[derive(Debug, Clone)]
pub struct FileSource<T> {
    samples: Arc<[T]>,
    position: usize,
    end: PlaybackEnd,
}

impl<T: Sample> FileSource<T> {
    pub fn new(samples: impl Into<Arc<[T]>>, end: PlaybackEnd) -> Self {
        Self {
            samples: samples.into(),
            position: 0,
            end,
        }
    }

    /// The whole decoded array, read-only
    pub fn samples(&self) -> &[T] {
        &self.samples
    }

    /// A shared handle to the decoded array for visualization
    pub fn shared_samples(&self) -> Arc<[T]> {
        Arc::clone(&self.samples)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Index of the next sample to be played
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn playback_end(&self) -> PlaybackEnd {
        self.end
    }

    /// Samples left before the end (ignores looping)
    pub fn remaining(&self) -> usize {
        self.samples.len() - self.position
    }

    /// Start again from the first sample
    pub fn rewind(&mut self) {
        self.position = 0;
    }
}

impl<T: Sample> SampleSource<T> for FileSource<T> {
    fn read_next(&mut self, out: &mut [T]) -> SourceRead {
        let total = self.samples.len();
        if total == 0 {
            return SourceRead {
                frames: 0,
                end_of_stream: true,
            };
        }

        let mut frames = 0;
        while frames < out.len() {
            if self.position == total {
                match self.end {
                    PlaybackEnd::Loop => self.position = 0,
                    PlaybackEnd::Stop => break,
                }
            }
            let n = (out.len() - frames).min(total - self.position);
            out[frames..frames + n]
                .copy_from_slice(&self.samples[self.position..self.position + n]);
            frames += n;
            self.position += n;
        }

        SourceRead {
            frames,
            end_of_stream: self.end == PlaybackEnd::Stop && self.position == total,
        }
    }
}
