//! Audio normalization: arbitrary supported upload to canonical 16 kHz mono PCM.

pub mod decode;
pub mod resample;
pub mod waveform;

pub use decode::{decode_to_mono, DecodedAudio};
pub use waveform::CanonicalWaveform;

use crate::error::{PipelineError, Result};
use crate::intake::AudioExtension;

/// Decode, downmix, resample and quantize an upload.
///
/// Works entirely in memory. An empty payload, or one that decodes to no
/// samples, is reported as empty audio; anything the decoder rejects is
/// invalid input carrying the decoder's message.
pub fn normalize(bytes: Vec<u8>, hint: Option<AudioExtension>) -> Result<CanonicalWaveform> {
    if bytes.is_empty() {
        return Err(PipelineError::empty_audio());
    }

    let decoded = decode_to_mono(bytes, hint)?;
    if decoded.samples.is_empty() {
        return Err(PipelineError::empty_audio());
    }

    let mono = resample::resample(
        &decoded.samples,
        decoded.sample_rate,
        CanonicalWaveform::SAMPLE_RATE,
    )?;
    let waveform = CanonicalWaveform::from_samples(resample::quantize(&mono));

    tracing::debug!(
        source_rate = decoded.sample_rate,
        source_channels = decoded.source_channels,
        samples = waveform.len(),
        duration_secs = waveform.duration().as_secs_f32(),
        "normalized audio to 16kHz mono PCM"
    );

    Ok(waveform)
}
