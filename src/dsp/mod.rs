//! DSP Effects Library
//!
//! The per-sample filter bank (low-pass, echo, reverb, distortion), the
//! delay-line primitives they are built from, and the pipeline that runs
//! them in a fixed order.

mod delay_line;
mod distortion;
mod echo;
mod effect;
mod lowpass;
mod pipeline;
mod reverb;
mod ring_index;

pub use delay_line::DelayLine;
pub use distortion::Distortion;
pub use echo::Echo;
pub use effect::Effect;
pub use lowpass::LowPass;
pub use pipeline::EffectsPipeline;
pub use reverb::Reverb;
pub use ring_index::RingIndex;
