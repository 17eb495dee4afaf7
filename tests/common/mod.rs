//! Shared test helpers: synthetic WAV files and a mock recognition backend.
#![allow(dead_code)]

use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use hark::audio::CanonicalWaveform;
use hark::backend::{BackendError, RecognitionBackend};
use hark::intake::IntakeValidator;
use hark::pipeline::TranscriptionPipeline;

/// Encode interleaved 16-bit samples as a WAV file.
pub fn wav_bytes(sample_rate: u32, channels: u16, interleaved: &[i16]) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for &sample in interleaved {
            writer.write_sample(sample).unwrap();
        }
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}

/// A 440 Hz tone, same signal on every channel.
pub fn tone_wav(sample_rate: u32, channels: u16, seconds: f32) -> Vec<u8> {
    let frames = (sample_rate as f32 * seconds) as usize;
    let mut interleaved = Vec::with_capacity(frames * channels as usize);
    for i in 0..frames {
        let t = i as f32 / sample_rate as f32;
        let sample = ((t * 440.0 * std::f32::consts::TAU).sin() * 8_000.0) as i16;
        for _ in 0..channels {
            interleaved.push(sample);
        }
    }
    wav_bytes(sample_rate, channels, &interleaved)
}

/// Decode a WAV file back into its spec and samples.
pub fn read_wav(bytes: &[u8]) -> (hound::WavSpec, Vec<i16>) {
    let reader = hound::WavReader::new(Cursor::new(bytes.to_vec())).unwrap();
    let spec = reader.spec();
    let samples = reader.into_samples::<i16>().map(Result::unwrap).collect();
    (spec, samples)
}

/// Backend returning a fixed outcome and recording what it was sent.
pub struct MockBackend {
    outcome: Result<String, BackendError>,
    calls: AtomicUsize,
    last_waveform: Mutex<Option<CanonicalWaveform>>,
}

impl MockBackend {
    pub fn text(text: &str) -> Arc<Self> {
        Self::with_outcome(Ok(text.to_string()))
    }

    pub fn failing(error: BackendError) -> Arc<Self> {
        Self::with_outcome(Err(error))
    }

    pub fn with_outcome(outcome: Result<String, BackendError>) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            calls: AtomicUsize::new(0),
            last_waveform: Mutex::new(None),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_waveform(&self) -> Option<CanonicalWaveform> {
        self.last_waveform.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecognitionBackend for MockBackend {
    fn name(&self) -> &str {
        "mock"
    }

    async fn recognize(&self, waveform: &CanonicalWaveform) -> Result<String, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_waveform.lock().unwrap() = Some(waveform.clone());
        self.outcome.clone()
    }
}

pub fn pipeline_with(backend: Arc<MockBackend>) -> TranscriptionPipeline {
    TranscriptionPipeline::new(IntakeValidator::default(), backend)
}
