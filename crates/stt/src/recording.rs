use std::{path::Path, time::Duration};

use hound::{SampleFormat, WavReader};

/// An entire clip held in memory as interleaved 16-bit samples
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingBuffer {
    pub samples: Vec<i16>,
    pub sample_rate: u32,
    pub channels: u16,
}

impl RecordingBuffer {
    /// Read a WAV file completely
    ///
    /// Integer samples are shifted up or down to 16 bits and float samples
    /// are scaled, so any PCM WAV ends up as LINEAR16 at full scale.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is not a readable WAV
    pub fn from_wav(path: &Path) -> Result<Self, hound::Error> {
        let mut reader = WavReader::open(path)?;
        let spec = reader.spec();

        let samples = match (spec.sample_format, spec.bits_per_sample) {
            (SampleFormat::Int, 16) => reader.samples::<i16>().collect::<Result<Vec<_>, _>>()?,
            (SampleFormat::Int, bits) if bits < 16 => {
                let shift = u32::from(16 - bits);
                reader
                    .samples::<i16>()
                    .map(|s| s.map(|v| v << shift))
                    .collect::<Result<Vec<_>, _>>()?
            }
            (SampleFormat::Int, bits) => {
                let shift = u32::from(bits - 16);
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| narrow(v >> shift)))
                    .collect::<Result<Vec<_>, _>>()?
            }
            (SampleFormat::Float, _) => reader
                .samples::<f32>()
                .map(|s| s.map(float_to_i16))
                .collect::<Result<Vec<_>, _>>()?,
        };

        Ok(Self {
            samples,
            sample_rate: spec.sample_rate,
            channels: spec.channels,
        })
    }

    /// Raw little-endian PCM bytes, no header
    pub fn pcm_le_bytes(&self) -> Vec<u8> {
        self.samples.iter().flat_map(|s| s.to_le_bytes()).collect()
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn duration(&self) -> Duration {
        let frames = self.samples.len() / usize::from(self.channels.max(1));
        Duration::from_secs_f64(frames as f64 / f64::from(self.sample_rate.max(1)))
    }
}

fn narrow(value: i32) -> i16 {
    i16::try_from(value.clamp(i32::from(i16::MIN), i32::from(i16::MAX))).unwrap_or_default()
}

#[allow(clippy::cast_possible_truncation)]
fn float_to_i16(value: f32) -> i16 {
    (value.clamp(-1.0, 1.0) * f32::from(i16::MAX)) as i16
}
