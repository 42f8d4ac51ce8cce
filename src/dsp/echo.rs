//! Feedback echo
//!
//! Adds the history sample `D` steps back, scaled by the feedback
//! coefficient, to the current sample, then records the *sum*. Each round
//! trip through the line multiplies an echo by the coefficient again, so a
//! single impulse repeats every `D` samples at `f, f², f³, ...`.

use super::delay_line::DelayLine;
use super::effect::Effect;
use super::ring_index::RingIndex;
use crate::engine::ConfigSnapshot;

#[derive(Debug, Clone)]
pub struct Echo {
    line: DelayLine,
    cursor: RingIndex,
    feedback: f32,
}

impl Echo {
    /// Create an echo with `history_len` samples of history
    pub fn new(history_len: usize, feedback: f32) -> Self {
        let line = DelayLine::new(history_len);
        let cursor = line.cursor();
        Self {
            line,
            cursor,
            feedback,
        }
    }

    /// Add the echo from `delay_samples` back and record the result
    ///
    /// A delay of 0 behaves as a delay of 1 (see [`DelayLine::read`]).
    #[inline]
    pub fn process(&mut self, input: f32, delay_samples: usize) -> f32 {
        let delayed = self.line.read(&self.cursor, delay_samples);
        let output = input + delayed * self.feedback;
        self.line.write(&self.cursor, output);
        output
    }

    /// Current write slot
    pub fn position(&self) -> usize {
        self.cursor.pos()
    }
}

impl Effect for Echo {
    fn process_sample(&mut self, input: f32, config: &ConfigSnapshot) -> f32 {
        self.process(input, config.delay_samples)
    }

    fn advance(&mut self) {
        self.cursor.advance();
    }

    fn reset(&mut self) {
        self.line.clear();
        self.cursor.reset();
    }

    fn is_enabled(&self, config: &ConfigSnapshot) -> bool {
        config.echo_enabled
    }

    fn effect_type(&self) -> &'static str {
        "echo"
    }

    fn display_name(&self) -> &'static str {
        "Echo"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn run_impulse(echo: &mut Echo, delay: usize, len: usize) -> Vec<f32> {
        (0..len)
            .map(|n| {
                let x = if n == 0 { 1.0 } else { 0.0 };
                let y = echo.process(x, delay);
                echo.advance();
                y
            })
            .collect()
    }

    #[test]
    fn test_impulse_decays_geometrically() {
        let feedback = 0.5;
        let delay = 10;
        let mut echo = Echo::new(100, feedback);
        let out = run_impulse(&mut echo, delay, 61);

        for (n, &y) in out.iter().enumerate() {
            if n % delay == 0 {
                let k = (n / delay) as i32;
                assert_relative_eq!(y, feedback.powi(k), epsilon = 1e-6);
            } else {
                assert_eq!(y, 0.0, "expected silence at sample {}", n);
            }
        }
    }

    #[test]
    fn test_other_feedback_coefficient() {
        let mut echo = Echo::new(64, 0.6);
        let out = run_impulse(&mut echo, 7, 29);
        assert_relative_eq!(out[7], 0.6, epsilon = 1e-6);
        assert_relative_eq!(out[14], 0.36, epsilon = 1e-6);
        assert_relative_eq!(out[28], 0.6f32.powi(4), epsilon = 1e-6);
    }

    #[test]
    fn test_zero_delay_matches_one_sample_delay() {
        let mut a = Echo::new(32, 0.5);
        let mut b = Echo::new(32, 0.5);
        let zero = run_impulse(&mut a, 0, 8);
        let one = run_impulse(&mut b, 1, 8);
        assert_eq!(zero, one);
        // 1, 0.5, 0.25, ...
        assert_relative_eq!(zero[3], 0.125, epsilon = 1e-6);
    }

    #[test]
    fn test_cursor_wraps_over_long_runs() {
        let mut echo = Echo::new(50, 0.5);
        for _ in 0..10_000 {
            echo.process(0.0, 20);
            echo.advance();
            assert!(echo.position() < 50);
        }
    }

    #[test]
    fn test_reset() {
        let mut echo = Echo::new(16, 0.5);
        run_impulse(&mut echo, 4, 3);
        echo.reset();
        assert_eq!(echo.position(), 0);
        assert_eq!(echo.process(0.0, 4), 0.0);
    }
}
