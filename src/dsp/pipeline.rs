//! Effects pipeline
//!
//! Runs the filter bank over a block in a fixed order:
//!
//! 1. Low-Pass (always)
//! 2. Echo (if enabled)
//! 3. Reverb (if enabled)
//! 4. Distortion (if enabled)
//!
//! Echo and reverb hear the low-passed signal and distortion hears the
//! reverberated one; changing the order changes the sound. History cursors
//! advance once per sample even while their effect is disabled, so toggling
//! an effect back on resumes against a history aligned with the stream.

use super::distortion::Distortion;
use super::echo::Echo;
use super::effect::Effect;
use super::lowpass::LowPass;
use super::reverb::Reverb;
use crate::engine::{ConfigSnapshot, EngineSettings, OutputRange, Sample};

/// The fixed filter bank and its per-sample driver
///
/// All history is allocated here, once. Processing never allocates.
#[derive(Debug, Clone)]
pub struct EffectsPipeline {
    lowpass: LowPass,
    echo: Echo,
    reverb: Reverb,
    distortion: Distortion,
}

impl EffectsPipeline {
    /// Build the filter bank; distortion clips to `range`
    pub fn new(settings: &EngineSettings, range: OutputRange) -> Self {
        Self {
            lowpass: LowPass::new(),
            echo: Echo::new(settings.max_delay_samples, settings.echo_feedback),
            reverb: Reverb::new(
                settings.max_delay_samples,
                settings.reverb_taps,
                settings.reverb_decay,
            ),
            distortion: Distortion::new(range),
        }
    }

    /// Build the filter bank for sample type `T`, honouring any range
    /// override in `settings`
    pub fn for_format<T: Sample>(settings: &EngineSettings) -> Self {
        Self::new(settings, settings.output_range.unwrap_or(T::DEFAULT_RANGE))
    }

    /// Run one sample through the chain
    #[inline]
    pub fn process_sample(&mut self, input: f32, config: &ConfigSnapshot) -> f32 {
        let mut out = input;
        for effect in self.effects_mut() {
            if effect.is_enabled(config) {
                out = effect.process_sample(out, config);
            }
            effect.advance();
        }
        out
    }

    /// Process a block in place with one parameter snapshot
    pub fn process_block<T: Sample>(&mut self, block: &mut [T], config: &ConfigSnapshot) {
        for sample in block.iter_mut() {
            *sample = T::from_f32(self.process_sample(sample.to_f32(), config));
        }
    }

    /// Clear all filter history
    ///
    /// Only for use while the stream is stopped.
    pub fn reset(&mut self) {
        for effect in self.effects_mut() {
            effect.reset();
        }
    }

    /// The stages in evaluation order
    pub fn effects(&self) -> [&dyn Effect; 4] {
        [&self.lowpass, &self.echo, &self.reverb, &self.distortion]
    }

    fn effects_mut(&mut self) -> [&mut dyn Effect; 4] {
        [
            &mut self.lowpass,
            &mut self.echo,
            &mut self.reverb,
            &mut self.distortion,
        ]
    }

    /// Names of the stages that run for `config`, in evaluation order
    pub fn active_effects(&self, config: &ConfigSnapshot) -> Vec<&'static str> {
        self.effects()
            .iter()
            .filter(|e| e.is_enabled(config))
            .map(|e| e.effect_type())
            .collect()
    }

    /// Shared position of the echo and reverb cursors
    pub fn cursor_position(&self) -> usize {
        debug_assert_eq!(self.echo.position(), self.reverb.position());
        self.echo.position()
    }
}
