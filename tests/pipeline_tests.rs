//! End-to-end pipeline behavior against a mock recognition backend.

mod common;

use std::io::{Cursor, Read, Seek, SeekFrom, Write};
use std::sync::{Arc, Mutex};
use std::thread::ThreadId;

use hark::backend::BackendError;
use hark::error::{ErrorKind, PipelineError};
use hark::intake::{IntakeValidator, UploadedAudio, MAX_UPLOAD_BYTES};
use hark::pipeline::TranscriptionPipeline;
use hark::response::TranscriptionResponse;

use common::{pipeline_with, tone_wav, MockBackend};

#[tokio::test]
async fn valid_upload_is_transcribed() {
    let backend = MockBackend::text("hello world");
    let pipeline = pipeline_with(backend.clone());

    // The container is detected from content, so a WAV named .mp3 still decodes.
    let upload = UploadedAudio::new(tone_wav(44_100, 2, 0.5), "speech.mp3");
    let text = pipeline.transcribe(Some(upload)).await.unwrap();

    assert_eq!(text, "hello world");
    assert_eq!(backend.calls(), 1);
    let sent = backend.last_waveform().expect("backend saw a waveform");
    assert_eq!(sent.sample_rate(), 16_000);
    assert_eq!(sent.channels(), 1);
    assert_eq!(sent.len(), 8_000);
}

#[tokio::test]
async fn unsupported_extension_never_reaches_backend() {
    let backend = MockBackend::text("unused");
    let pipeline = pipeline_with(backend.clone());

    let err = pipeline
        .transcribe(Some(UploadedAudio::new(tone_wav(16_000, 1, 0.1), "clip.flac")))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::UnsupportedFormat);
    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn oversize_upload_is_rejected_before_decoding() {
    let backend = MockBackend::text("unused");
    let pipeline = pipeline_with(backend.clone());

    // Not audio at all: decoding it would fail with a different error.
    let garbage = vec![0xAB; MAX_UPLOAD_BYTES as usize + 1];
    let err = pipeline
        .transcribe(Some(UploadedAudio::new(garbage, "huge.wav")))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        PipelineError::InvalidInput("File too large (max 10MB allowed)".to_string())
    );
    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn empty_file_maps_to_bad_request() {
    let backend = MockBackend::text("unused");
    let pipeline = pipeline_with(backend.clone());

    let result = pipeline
        .transcribe(Some(UploadedAudio::new(Vec::new(), "empty.wav")))
        .await;
    let (status, body) = TranscriptionResponse::from_result(&result);

    assert_eq!(status, 400);
    assert_eq!(body.error.as_deref(), Some("Empty audio file"));
    assert!(!body.success);
    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn non_audio_content_is_invalid_input() {
    let backend = MockBackend::text("unused");
    let pipeline = pipeline_with(backend.clone());

    let mut png = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR".to_vec();
    png.extend_from_slice(&[0u8; 256]);
    let err = pipeline
        .transcribe(Some(UploadedAudio::new(png, "clip.wav")))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert!(err.to_string().starts_with("Invalid audio file: "));
    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn backend_failures_keep_their_category() {
    struct Case {
        error: BackendError,
        kind: ErrorKind,
        status: u16,
    }

    let cases = vec![
        Case {
            error: BackendError::Unintelligible,
            kind: ErrorKind::RecognitionUnintelligible,
            status: 400,
        },
        Case {
            error: BackendError::Service("HTTP 429: quota".into()),
            kind: ErrorKind::ServiceUnavailable,
            status: 503,
        },
        Case {
            error: BackendError::Timeout(60_000),
            kind: ErrorKind::ServiceUnavailable,
            status: 503,
        },
        Case {
            error: BackendError::Unexpected("bad json".into()),
            kind: ErrorKind::InternalFailure,
            status: 500,
        },
    ];

    for case in cases {
        let backend = MockBackend::failing(case.error.clone());
        let pipeline = pipeline_with(backend.clone());
        let result = pipeline
            .transcribe(Some(UploadedAudio::new(tone_wav(16_000, 1, 0.2), "a.ogg")))
            .await;

        let err = result.clone().unwrap_err();
        assert_eq!(err.kind(), case.kind, "{:?}", case.error);
        assert_eq!(TranscriptionResponse::from_result(&result).0, case.status);
        assert_eq!(backend.calls(), 1, "no retries for {:?}", case.error);
    }
}

#[tokio::test]
async fn unintelligible_message_is_user_facing() {
    let pipeline = pipeline_with(MockBackend::failing(BackendError::Unintelligible));
    let err = pipeline
        .transcribe(Some(UploadedAudio::new(tone_wav(16_000, 1, 0.2), "a.wav")))
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Could not understand audio - poor audio quality or empty recording"
    );
}

#[tokio::test]
async fn transcribe_reader_from_file() {
    let backend = MockBackend::text("from disk");
    let pipeline = pipeline_with(backend.clone());

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&tone_wav(8_000, 1, 0.5)).unwrap();

    let text = pipeline
        .transcribe_reader(file.reopen().unwrap(), Some("memo.m4a"))
        .await
        .unwrap();

    assert_eq!(text, "from disk");
    assert_eq!(backend.last_waveform().unwrap().len(), 8_000);
}

#[tokio::test]
async fn transcribe_reader_honors_custom_limit() {
    let backend = MockBackend::text("unused");
    let pipeline = TranscriptionPipeline::new(IntakeValidator::new(1024), backend.clone());

    let err = pipeline
        .transcribe_reader(Cursor::new(tone_wav(16_000, 1, 0.5)), Some("a.wav"))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "File too large (max 1024 bytes allowed)");
    assert_eq!(backend.calls(), 0);
}

/// Cursor that records which threads touched it.
struct ThreadRecordingReader {
    inner: Cursor<Vec<u8>>,
    threads: Arc<Mutex<Vec<ThreadId>>>,
}

impl ThreadRecordingReader {
    fn record(&self) {
        self.threads.lock().unwrap().push(std::thread::current().id());
    }
}

impl Read for ThreadRecordingReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.record();
        self.inner.read(buf)
    }
}

impl Seek for ThreadRecordingReader {
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        self.record();
        self.inner.seek(pos)
    }
}

#[tokio::test]
async fn transcribe_reader_reads_off_the_async_thread() {
    let backend = MockBackend::text("ok");
    let pipeline = pipeline_with(backend.clone());
    let threads = Arc::new(Mutex::new(Vec::new()));
    let reader = ThreadRecordingReader {
        inner: Cursor::new(tone_wav(16_000, 1, 0.1)),
        threads: Arc::clone(&threads),
    };

    let text = pipeline.transcribe_reader(reader, Some("a.wav")).await.unwrap();
    assert_eq!(text, "ok");

    // The current-thread runtime drives this test on the test thread.
    let test_thread = std::thread::current().id();
    let seen = threads.lock().unwrap();
    assert!(!seen.is_empty());
    assert!(seen.iter().all(|id| *id != test_thread));
}

#[tokio::test]
async fn concurrent_requests_are_independent() {
    let backend = MockBackend::text("ok");
    let pipeline = Arc::new(pipeline_with(backend.clone()));

    let mut handles = Vec::new();
    for i in 0..8 {
        let pipeline = Arc::clone(&pipeline);
        handles.push(tokio::spawn(async move {
            let upload = if i % 2 == 0 {
                UploadedAudio::new(tone_wav(22_050, 1, 0.25), format!("ok-{i}.wav"))
            } else {
                UploadedAudio::new(b"not audio".repeat(32), format!("bad-{i}.wav"))
            };
            (i, pipeline.transcribe(Some(upload)).await)
        }));
    }

    for handle in handles {
        let (i, result) = handle.await.unwrap();
        if i % 2 == 0 {
            assert_eq!(result.unwrap(), "ok");
        } else {
            assert_eq!(result.unwrap_err().kind(), ErrorKind::InvalidInput);
        }
    }
    assert_eq!(backend.calls(), 4);
}
