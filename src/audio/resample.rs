//! Channel downmix, sample-rate conversion and quantization.

use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};

use crate::error::PipelineError;

const CHUNK_SIZE: usize = 1024;
const MAX_FLUSH_CHUNKS: usize = 4;

/// Average interleaved frames down to one channel.
pub fn downmix(interleaved: &[f32], channels: usize, out: &mut Vec<f32>) {
    if channels <= 1 {
        out.extend_from_slice(interleaved);
        return;
    }
    for frame in interleaved.chunks_exact(channels) {
        out.push(frame.iter().sum::<f32>() / channels as f32);
    }
}

/// Resample mono audio from `from_rate` to `to_rate` with a windowed sinc filter.
///
/// Output length is `len * to_rate / from_rate`, with the filter delay removed.
pub fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>, PipelineError> {
    if from_rate == to_rate || samples.is_empty() {
        return Ok(samples.to_vec());
    }

    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    let ratio = f64::from(to_rate) / f64::from(from_rate);
    let mut resampler = SincFixedIn::<f32>::new(ratio, 2.0, params, CHUNK_SIZE, 1)
        .map_err(|e| PipelineError::internal(format!("resampler init: {e}")))?;

    let expected_len = (samples.len() as f64 * ratio).round() as usize;
    let delay = resampler.output_delay();
    let mut output = Vec::with_capacity(expected_len + delay + CHUNK_SIZE);

    for chunk in samples.chunks(CHUNK_SIZE) {
        let mut input = chunk.to_vec();
        input.resize(CHUNK_SIZE, 0.0);
        process_chunk(&mut resampler, input, &mut output)?;
    }

    // Flush the filter tail with silence.
    for _ in 0..MAX_FLUSH_CHUNKS {
        if output.len() >= expected_len + delay {
            break;
        }
        process_chunk(&mut resampler, vec![0.0; CHUNK_SIZE], &mut output)?;
    }

    let _ = output.drain(..delay.min(output.len()));
    output.truncate(expected_len);
    Ok(output)
}

fn process_chunk(
    resampler: &mut SincFixedIn<f32>,
    input: Vec<f32>,
    output: &mut Vec<f32>,
) -> Result<(), PipelineError> {
    let resampled = resampler
        .process(&[input], None)
        .map_err(|e| PipelineError::internal(format!("resample: {e}")))?;
    if let Some(channel) = resampled.first() {
        output.extend_from_slice(channel);
    }
    Ok(())
}

/// Convert normalized floats to 16-bit PCM with rounding and clamping.
pub fn quantize(samples: &[f32]) -> Vec<i16> {
    samples
        .iter()
        .map(|&s| (s * 32768.0).round().clamp(-32768.0, 32767.0) as i16)
        .collect()
}
