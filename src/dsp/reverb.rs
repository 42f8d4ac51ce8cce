//! Multi-tap reverb
//!
//! A bank of parallel comb-style taps. Tap `t` (0-based) reads its own
//! history `D / (t + 1)` samples back, weighted by `decay / (t + 1)`, so
//! the taps get shorter and quieter as `t` grows. That approximates the
//! density of early reflections without a convolution.
//!
//! Every tap records the same pre-reverb sample, and all taps share one
//! cursor that advances once per sample.

use super::delay_line::DelayLine;
use super::effect::Effect;
use super::ring_index::RingIndex;
use crate::engine::ConfigSnapshot;

#[derive(Debug, Clone)]
struct Tap {
    line: DelayLine,
    divisor: usize,
    weight: f32,
}

#[derive(Debug, Clone)]
pub struct Reverb {
    taps: Vec<Tap>,
    cursor: RingIndex,
}

impl Reverb {
    /// Create `num_taps` taps of `history_len` samples each
    pub fn new(history_len: usize, num_taps: usize, decay: f32) -> Self {
        let taps: Vec<Tap> = (0..num_taps.max(1))
            .map(|t| Tap {
                line: DelayLine::new(history_len),
                divisor: t + 1,
                weight: decay / (t + 1) as f32,
            })
            .collect();
        let cursor = taps[0].line.cursor();
        Self { taps, cursor }
    }

    /// Add the weighted taps to `input` and record `input` in every tap
    #[inline]
    pub fn process(&mut self, input: f32, delay_samples: usize) -> f32 {
        let mut wet = 0.0;
        for tap in &mut self.taps {
            wet += tap.line.read(&self.cursor, delay_samples / tap.divisor) * tap.weight;
            tap.line.write(&self.cursor, input);
        }
        input + wet
    }

    pub fn num_taps(&self) -> usize {
        self.taps.len()
    }

    /// Per-tap delay in samples for a base delay
    pub fn tap_delays(&self, delay_samples: usize) -> impl Iterator<Item = usize> + '_ {
        self.taps.iter().map(move |t| delay_samples / t.divisor)
    }

    /// Per-tap weights
    pub fn tap_weights(&self) -> impl Iterator<Item = f32> + '_ {
        self.taps.iter().map(|t| t.weight)
    }

    /// Current write slot shared by all taps
    pub fn position(&self) -> usize {
        self.cursor.pos()
    }
}

impl Effect for Reverb {
    fn process_sample(&mut self, input: f32, config: &ConfigSnapshot) -> f32 {
        self.process(input, config.delay_samples)
    }

    fn advance(&mut self) {
        self.cursor.advance();
    }

    fn reset(&mut self) {
        for tap in &mut self.taps {
            tap.line.clear();
        }
        self.cursor.reset();
    }

    fn is_enabled(&self, config: &ConfigSnapshot) -> bool {
        config.reverb_enabled
    }

    fn effect_type(&self) -> &'static str {
        "reverb"
    }

    fn display_name(&self) -> &'static str {
        "Reverb"
    }
}
