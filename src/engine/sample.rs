//! Sample formats
//!
//! The engine moves either 16-bit integer or 32-bit float mono samples.
//! Effects always compute in f32; the two numeric regimes only differ in
//! the output range the distortion stage clips to.

use num_traits::Zero;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RtfxError};

/// Inclusive clipping range for processed samples
///
/// Always finite with `floor < ceiling`: the only ways to build one are
/// [`OutputRange::new`], the constants, and deserialization, which all
/// validate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawOutputRange")]
pub struct OutputRange {
    floor: f32,
    ceiling: f32,
}

/// Unchecked wire form of [`OutputRange`]
#[derive(Deserialize)]
struct RawOutputRange {
    floor: f32,
    ceiling: f32,
}

impl TryFrom<RawOutputRange> for OutputRange {
    type Error = RtfxError;

    fn try_from(raw: RawOutputRange) -> Result<Self> {
        OutputRange::new(raw.floor, raw.ceiling)
    }
}

impl OutputRange {
    /// Full scale of signed 16-bit PCM
    pub const PCM16: OutputRange = OutputRange {
        floor: -32768.0,
        ceiling: 32767.0,
    };

    /// Normalized float with 0.8 of headroom on both sides
    pub const NORMALIZED_HEADROOM: OutputRange = OutputRange {
        floor: -0.8,
        ceiling: 0.8,
    };

    /// Create a validated range (finite, floor strictly below ceiling)
    pub fn new(floor: f32, ceiling: f32) -> Result<Self> {
        let range = OutputRange { floor, ceiling };
        range.validate()?;
        Ok(range)
    }

    pub fn floor(&self) -> f32 {
        self.floor
    }

    pub fn ceiling(&self) -> f32 {
        self.ceiling
    }

    /// Check the range can be used for clamping
    pub fn validate(&self) -> Result<()> {
        if !self.floor.is_finite() || !self.ceiling.is_finite() || self.floor >= self.ceiling {
            return Err(RtfxError::invalid_parameter(
                "output_range",
                format!("[{}, {}]", self.floor, self.ceiling),
                "finite floor < ceiling",
            ));
        }
        Ok(())
    }

    /// Clamp a value into the range
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.floor, self.ceiling)
    }
}

/// A mono sample type the engine can queue and process
pub trait Sample: Copy + Zero + Send + Sync + 'static {
    /// Clipping range used when the settings do not override it
    const DEFAULT_RANGE: OutputRange;

    /// Widen to the processing domain
    fn to_f32(self) -> f32;

    /// Narrow from the processing domain
    fn from_f32(value: f32) -> Self;
}

impl Sample for i16 {
    const DEFAULT_RANGE: OutputRange = OutputRange::PCM16;

    #[inline]
    fn to_f32(self) -> f32 {
        self as f32
    }

    /// Truncates toward zero and saturates at the i16 limits
    #[inline]
    fn from_f32(value: f32) -> Self {
        value as i16
    }
}

impl Sample for f32 {
    const DEFAULT_RANGE: OutputRange = OutputRange::NORMALIZED_HEADROOM;

    #[inline]
    fn to_f32(self) -> f32 {
        self
    }

    #[inline]
    fn from_f32(value: f32) -> Self {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_i16_conversion_truncates_and_saturates() {
        assert_eq!(i16::from_f32(1.9), 1);
        assert_eq!(i16::from_f32(-1.9), -1);
        assert_eq!(i16::from_f32(40000.0), i16::MAX);
        assert_eq!(i16::from_f32(-40000.0), i16::MIN);
        assert_eq!(i16::from_f32(f32::NAN), 0);
    }

    #[test]
    fn test_output_range_validation() {
        assert!(OutputRange::new(-1.0, 1.0).is_ok());
        assert!(OutputRange::new(1.0, -1.0).is_err());
        assert!(OutputRange::new(0.5, 0.5).is_err());
        assert!(OutputRange::new(f32::NEG_INFINITY, 1.0).is_err());
        assert!(OutputRange::PCM16.validate().is_ok());
        assert!(OutputRange::NORMALIZED_HEADROOM.validate().is_ok());
    }

    #[test]
    fn test_inverted_range_rejected_on_deserialize() {
        let ok: OutputRange = serde_json::from_str(r#"{ "floor": -1.0, "ceiling": 1.0 }"#).unwrap();
        assert_eq!(ok.floor(), -1.0);
        assert_eq!(ok.ceiling(), 1.0);

        let inverted = serde_json::from_str::<OutputRange>(r#"{ "floor": 1.0, "ceiling": -1.0 }"#);
        assert!(inverted.is_err());
    }

    #[test]
    fn test_default_ranges() {
        assert_eq!(<i16 as Sample>::DEFAULT_RANGE, OutputRange::PCM16);
        assert_eq!(<f32 as Sample>::DEFAULT_RANGE.ceiling(), 0.8);
        assert_eq!(OutputRange::PCM16.clamp(1.0e6), 32767.0);
    }
}
