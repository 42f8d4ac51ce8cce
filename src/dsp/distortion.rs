//! Hard-clip distortion
//!
//! Stateless: scale by the gain, then clip into the output range of the
//! sample format.

use super::effect::Effect;
use crate::engine::{ConfigSnapshot, OutputRange};

#[derive(Debug, Clone)]
pub struct Distortion {
    range: OutputRange,
}

impl Distortion {
    pub fn new(range: OutputRange) -> Self {
        Self { range }
    }

    #[inline]
    pub fn process(&self, input: f32, gain: f32) -> f32 {
        self.range.clamp(input * gain)
    }

    pub fn range(&self) -> OutputRange {
        self.range
    }
}

impl Effect for Distortion {
    fn process_sample(&mut self, input: f32, config: &ConfigSnapshot) -> f32 {
        self.process(input, config.distortion_gain)
    }

    fn reset(&mut self) {}

    fn is_enabled(&self, config: &ConfigSnapshot) -> bool {
        config.distortion_enabled
    }

    fn effect_type(&self) -> &'static str {
        "distortion"
    }

    fn display_name(&self) -> &'static str {
        "Distortion"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gain_below_ceiling() {
        let dist = Distortion::new(OutputRange::PCM16);
        assert_eq!(dist.process(1000.0, 2.0), 2000.0);
        assert_eq!(dist.process(-1000.0, 2.0), -2000.0);
    }

    #[test]
    fn test_clipping_pcm16() {
        let dist = Distortion::new(OutputRange::PCM16);
        assert_eq!(dist.process(30000.0, 10.0), 32767.0);
        assert_eq!(dist.process(-30000.0, 10.0), -32768.0);
    }

    #[test]
    fn test_output_never_leaves_range() {
        for range in [OutputRange::PCM16, OutputRange::NORMALIZED_HEADROOM] {
            let dist = Distortion::new(range);
            for &gain in &[0.0, 0.5, 1.0, 3.0, 10.0, 100.0] {
                for &x in &[-1.0e9, -32768.0, -1.0, -0.3, 0.0, 0.3, 1.0, 32767.0, 1.0e9] {
                    let y = dist.process(x, gain);
                    assert!(y >= range.floor() && y <= range.ceiling(), "{} * {} -> {}", x, gain, y);
                }
            }
        }
    }

    #[test]
    fn test_zero_gain_silences() {
        let dist = Distortion::new(OutputRange::NORMALIZED_HEADROOM);
        assert_eq!(dist.process(0.7, 0.0), 0.0);
    }
}
