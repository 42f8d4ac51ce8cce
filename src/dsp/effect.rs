//! Effect trait definition
//!
//! Base trait for the four per-sample filters. Effects carry their own
//! history and are driven one sample at a time by the pipeline.

use crate::engine::ConfigSnapshot;

/// A stateful per-sample transform
pub trait Effect: Send {
    /// Process one sample using the parameters of the current block
    ///
    /// Must not allocate, lock or move history cursors.
    fn process_sample(&mut self, input: f32, config: &ConfigSnapshot) -> f32;

    /// Move history cursors forward one sample
    ///
    /// Called exactly once per sample whether or not the effect is enabled.
    fn advance(&mut self) {}

    /// Clear all history; only valid while the stream is stopped
    fn reset(&mut self);

    /// Whether the effect runs for this block
    fn is_enabled(&self, config: &ConfigSnapshot) -> bool;

    /// Get the effect type identifier
    fn effect_type(&self) -> &'static str;

    /// Get human-readable display name
    fn display_name(&self) -> &'static str;
}
