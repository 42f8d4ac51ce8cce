//! One-pole low-pass filter
//!
//! `y[n] = a * x[n] + (1 - a) * y[n-1]`. Always in the chain. A
//! coefficient of zero (or below) passes the input straight through rather
//! than freezing the output at silence.

use super::effect::Effect;
use crate::engine::ConfigSnapshot;

#[derive(Debug, Clone, Default)]
pub struct LowPass {
    /// Last output sample
    memory: f32,
}

impl LowPass {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter one sample with coefficient `alpha`
    #[inline]
    pub fn process(&mut self, input: f32, alpha: f32) -> f32 {
        self.memory = if alpha > 0.0 {
            alpha * input + (1.0 - alpha) * self.memory
        } else {
            input
        };
        self.memory
    }

    /// Last output sample
    pub fn memory(&self) -> f32 {
        self.memory
    }
}

impl Effect for LowPass {
    fn process_sample(&mut self, input: f32, config: &ConfigSnapshot) -> f32 {
        self.process(input, config.lowpass_alpha)
    }

    fn reset(&mut self) {
        self.memory = 0.0;
    }

    fn is_enabled(&self, _config: &ConfigSnapshot) -> bool {
        true
    }

    fn effect_type(&self) -> &'static str {
        "lowpass"
    }

    fn display_name(&self) -> &'static str {
        "Low-Pass"
    }
}
