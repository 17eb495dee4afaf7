//! Canonical in-memory waveform.

use std::io::Cursor;
use std::time::Duration;

/// Mono, 16 kHz, 16-bit linear PCM.
///
/// Rate and channel count are constants of the type, so every value of
/// this type has the same shape regardless of the source it was decoded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalWaveform {
    samples: Vec<i16>,
}

impl CanonicalWaveform {
    pub const SAMPLE_RATE: u32 = 16_000;
    pub const CHANNELS: u16 = 1;
    pub const BITS_PER_SAMPLE: u16 = 16;

    pub fn from_samples(samples: Vec<i16>) -> Self {
        Self { samples }
    }

    pub fn sample_rate(&self) -> u32 {
        Self::SAMPLE_RATE
    }

    pub fn channels(&self) -> u16 {
        Self::CHANNELS
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<i16> {
        self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.samples.len() as f64 / f64::from(Self::SAMPLE_RATE))
    }

    /// Raw LINEAR16 little-endian bytes, no header.
    pub fn pcm_le_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.samples.len() * 2);
        for sample in &self.samples {
            out.extend_from_slice(&sample.to_le_bytes());
        }
        out
    }

    /// Encode as a RIFF/WAVE file.
    pub fn to_wav(&self) -> Result<Vec<u8>, hound::Error> {
        let spec = hound::WavSpec {
            channels: Self::CHANNELS,
            sample_rate: Self::SAMPLE_RATE,
            bits_per_sample: Self::BITS_PER_SAMPLE,
            sample_format: hound::SampleFormat::Int,
        };

        let mut cursor = Cursor::new(Vec::with_capacity(44 + self.samples.len() * 2));
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec)?;
            for &sample in &self.samples {
                writer.write_sample(sample)?;
            }
            writer.finalize()?;
        }
        Ok(cursor.into_inner())
    }
}
