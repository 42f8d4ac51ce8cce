//! Audio file I/O
//!
//! WAV import and export through `hound`. Everything decodes to normalized
//! mono f32 at the engine's sample rate; the file source and offline render
//! take it from there. Multi-channel files are averaged down to mono. Files
//! at another sample rate are rejected, there is no resampler.

use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use log::{debug, info};

use crate::error::{Result, RtfxError};

/// Export format configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportFormat {
    /// Sample rate written to the header (default: 44100)
    pub sample_rate: u32,
    /// Bit depth: 16 (integer) or 32 (float) (default: 16)
    pub bit_depth: u16,
}

impl Default for ExportFormat {
    fn default() -> Self {
        ExportFormat {
            sample_rate: 44100,
            bit_depth: 16,
        }
    }
}

impl ExportFormat {
    pub fn new(sample_rate: u32, bit_depth: u16) -> Self {
        ExportFormat {
            sample_rate,
            bit_depth,
        }
    }

    /// 16-bit integer PCM at `sample_rate`
    pub fn pcm16(sample_rate: u32) -> Self {
        Self::new(sample_rate, 16)
    }

    /// 32-bit float at `sample_rate`
    pub fn float32(sample_rate: u32) -> Self {
        Self::new(sample_rate, 32)
    }
}

/// Decode a WAV file to normalized mono f32
///
/// # Errors
/// * `FileNotFound` - the file does not exist
/// * `InvalidAudio` - the file is not a readable WAV file
/// * `UnsupportedFormat` - the sample rate differs from `sample_rate`, or
///   the bit depth is not 8/16/24/32
/// * `EmptyAudio` - the file holds no frames
pub fn import_wav(path: &Path, sample_rate: u32) -> Result<Vec<f32>> {
    if !path.exists() {
        return Err(RtfxError::FileNotFound {
            path: path.display().to_string(),
            source: None,
        });
    }

    let reader = WavReader::open(path).map_err(|e| RtfxError::InvalidAudio {
        reason: format!("Failed to open WAV file: {}", e),
        source: Some(Box::new(e)),
    })?;

    let spec = reader.spec();
    debug!(
        "{}: {} Hz, {} ch, {}-bit {:?}",
        path.display(),
        spec.sample_rate,
        spec.channels,
        spec.bits_per_sample,
        spec.sample_format
    );

    if spec.sample_rate != sample_rate {
        return Err(RtfxError::UnsupportedFormat {
            format: format!(
                "{} Hz audio (engine runs at {} Hz, resampling is not supported)",
                spec.sample_rate, sample_rate
            ),
        });
    }
    if spec.channels == 0 {
        return Err(RtfxError::InvalidAudio {
            reason: "WAV header declares zero channels".to_string(),
            source: None,
        });
    }

    let interleaved = read_samples_as_f32(reader, spec.bits_per_sample, spec.sample_format)?;
    let mono = downmix(&interleaved, spec.channels as usize);

    if mono.is_empty() {
        return Err(RtfxError::EmptyAudio);
    }

    info!(
        "Imported {} ({} samples, {:.2}s)",
        path.display(),
        mono.len(),
        mono.len() as f64 / sample_rate as f64
    );
    Ok(mono)
}

/// Write normalized mono f32 samples to a WAV file
///
/// 16-bit output is scaled by 32767 and clipped; 32-bit output is written
/// as float unchanged.
pub fn export_wav(samples: &[f32], path: &Path, format: ExportFormat) -> Result<()> {
    let sample_format = match format.bit_depth {
        16 => SampleFormat::Int,
        32 => SampleFormat::Float,
        other => {
            return Err(RtfxError::UnsupportedFormat {
                format: format!("{}-bit export (only 16 and 32 supported)", other),
            });
        }
    };

    let spec = WavSpec {
        channels: 1,
        sample_rate: format.sample_rate,
        bits_per_sample: format.bit_depth,
        sample_format,
    };

    let mut writer = WavWriter::create(path, spec).map_err(wav_write_error)?;

    match sample_format {
        SampleFormat::Int => {
            for &sample in samples {
                let scaled = (sample * 32767.0).clamp(-32768.0, 32767.0) as i16;
                writer.write_sample(scaled).map_err(wav_write_error)?;
            }
        }
        SampleFormat::Float => {
            for &sample in samples {
                writer.write_sample(sample).map_err(wav_write_error)?;
            }
        }
    }

    writer.finalize().map_err(wav_write_error)?;
    info!(
        "Exported {} samples to {} ({}-bit, {} Hz)",
        samples.len(),
        path.display(),
        format.bit_depth,
        format.sample_rate
    );
    Ok(())
}

/// Scale normalized f32 to 16-bit PCM values (truncating, saturating)
pub fn to_pcm16(samples: &[f32]) -> Vec<i16> {
    samples.iter().map(|&s| (s * 32768.0) as i16).collect()
}

/// Scale 16-bit PCM values to normalized f32
pub fn from_pcm16(samples: &[i16]) -> Vec<f32> {
    samples.iter().map(|&s| s as f32 / 32768.0).collect()
}

/// Generate a mono sine wave with peak `amplitude`
pub fn generate_test_tone(
    frequency: f32,
    duration_secs: f32,
    sample_rate: u32,
    amplitude: f32,
) -> Vec<f32> {
    let num_samples = (duration_secs * sample_rate as f32) as usize;
    let angular_freq = 2.0 * std::f32::consts::PI * frequency / sample_rate as f32;

    (0..num_samples)
        .map(|i| amplitude * (angular_freq * i as f32).sin())
        .collect()
}

/// A single sample of `amplitude` followed by silence
pub fn generate_impulse(len: usize, amplitude: f32) -> Vec<f32> {
    let mut samples = vec![0.0; len];
    if let Some(first) = samples.first_mut() {
        *first = amplitude;
    }
    samples
}

// ============================================================================
// Internal helper functions
// ============================================================================

fn wav_write_error(e: hound::Error) -> RtfxError {
    match e {
        hound::Error::IoError(io) => RtfxError::Io(io),
        other => RtfxError::InvalidAudio {
            reason: format!("Failed to write WAV file: {}", other),
            source: Some(Box::new(other)),
        },
    }
}

fn read_error(bits: &str) -> impl Fn(hound::Error) -> RtfxError + '_ {
    move |e| RtfxError::InvalidAudio {
        reason: format!("Failed to read {} samples: {}", bits, e),
        source: Some(Box::new(e)),
    }
}

/// Read samples from WAV reader and convert to f32
fn read_samples_as_f32<R: std::io::Read>(
    mut reader: WavReader<R>,
    bits_per_sample: u16,
    sample_format: SampleFormat,
) -> Result<Vec<f32>> {
    match sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<std::result::Result<Vec<f32>, _>>()
            .map_err(read_error("float")),
        SampleFormat::Int => match bits_per_sample {
            // hound already recentres unsigned 8-bit data around zero
            8 => reader
                .samples::<i8>()
                .map(|s| s.map(|v| v as f32 / 128.0))
                .collect::<std::result::Result<Vec<f32>, _>>()
                .map_err(read_error("8-bit")),
            16 => reader
                .samples::<i16>()
                .map(|s| s.map(|v| v as f32 / 32768.0))
                .collect::<std::result::Result<Vec<f32>, _>>()
                .map_err(read_error("16-bit")),
            24 => reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / 8388608.0))
                .collect::<std::result::Result<Vec<f32>, _>>()
                .map_err(read_error("24-bit")),
            32 => reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / 2147483648.0))
                .collect::<std::result::Result<Vec<f32>, _>>()
                .map_err(read_error("32-bit int")),
            _ => Err(RtfxError::UnsupportedFormat {
                format: format!("{}-bit integer audio", bits_per_sample),
            }),
        },
    }
}

/// Average interleaved frames down to one channel
fn downmix(samples: &[f32], channels: usize) -> Vec<f32> {
    if channels == 1 {
        return samples.to_vec();
    }
    samples
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}
