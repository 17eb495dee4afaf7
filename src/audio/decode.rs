//! Container/codec decoding via symphonia.

use std::io::Cursor;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use super::resample::downmix;
use crate::error::PipelineError;
use crate::intake::AudioExtension;

/// Mono samples at the source's native rate.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub source_channels: usize,
}

/// Decode any supported container into mono f32 samples.
///
/// The format is detected from content; `hint` only biases the detection order.
pub fn decode_to_mono(
    bytes: Vec<u8>,
    hint: Option<AudioExtension>,
) -> Result<DecodedAudio, PipelineError> {
    let mss = MediaSourceStream::new(Box::new(Cursor::new(bytes)), Default::default());

    let mut format_hint = Hint::new();
    if let Some(ext) = hint {
        let _ = format_hint.with_extension(&ext.to_string());
    }

    let detected = symphonia::default::get_probe()
        .format(
            &format_hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(PipelineError::invalid_audio)?;

    let mut format = detected.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| PipelineError::invalid_audio("no audio track found"))?;

    let track_id = track.id;
    let codec_params = track.codec_params.clone();

    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .map_err(PipelineError::invalid_audio)?;

    let mut sample_rate = codec_params.sample_rate;
    let mut source_channels = codec_params.channels.map_or(1, |c| c.count());
    let mut samples: Vec<f32> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(p) => p,
            Err(SymphoniaError::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(PipelineError::invalid_audio(e)),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(SymphoniaError::DecodeError(e)) => {
                tracing::warn!(error = %e, "skipping corrupt audio frame");
                continue;
            }
            Err(e) => return Err(PipelineError::invalid_audio(e)),
        };

        if decoded.frames() == 0 {
            continue;
        }

        let spec = *decoded.spec();
        sample_rate = Some(spec.rate);
        source_channels = spec.channels.count();

        let mut buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
        buf.copy_interleaved_ref(decoded);
        downmix(buf.samples(), source_channels, &mut samples);
    }

    let sample_rate =
        sample_rate.ok_or_else(|| PipelineError::invalid_audio("unknown sample rate"))?;

    tracing::debug!(
        samples = samples.len(),
        sample_rate,
        source_channels,
        "decoded audio to mono"
    );

    Ok(DecodedAudio {
        samples,
        sample_rate,
        source_channels,
    })
}
