//! Upload intake: presence, extension and size checks before any decoding.

use std::io::{Read, Seek, SeekFrom};

use strum::{Display, EnumString};

use crate::error::{PipelineError, Result};

/// Default upload limit (10 MiB).
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// An upload as received from the transport: raw bytes plus declared filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedAudio {
    pub bytes: Vec<u8>,
    pub filename: Option<String>,
}

impl UploadedAudio {
    pub fn new(bytes: impl Into<Vec<u8>>, filename: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            filename: Some(filename.into()),
        }
    }

    pub fn unnamed(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
            filename: None,
        }
    }
}

/// Filename extensions accepted at intake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AudioExtension {
    Wav,
    Mp3,
    Ogg,
    M4a,
}

impl AudioExtension {
    pub const ALL: [AudioExtension; 4] = [
        AudioExtension::Wav,
        AudioExtension::Mp3,
        AudioExtension::Ogg,
        AudioExtension::M4a,
    ];

    /// Parse the extension of `filename`, if it is on the allow-list.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let (_, ext) = filename.rsplit_once('.')?;
        ext.parse().ok()
    }
}

/// An upload that passed every intake check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedAudio {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub extension: AudioExtension,
}

/// Cheap, decode-free checks on an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntakeValidator {
    max_bytes: u64,
}

impl Default for IntakeValidator {
    fn default() -> Self {
        Self::new(MAX_UPLOAD_BYTES)
    }
}

impl IntakeValidator {
    pub fn new(max_bytes: u64) -> Self {
        Self { max_bytes }
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Validate an upload. Check order is presence, filename, extension, size.
    ///
    /// Zero-length payloads are accepted here; the normalizer reports them
    /// as empty audio.
    pub fn validate(&self, upload: Option<UploadedAudio>) -> Result<ValidatedAudio> {
        let upload = upload.ok_or_else(no_file_uploaded)?;
        let filename = check_filename(upload.filename.as_deref())?;
        let extension = check_extension(&filename)?;
        self.check_size(upload.bytes.len() as u64)?;

        Ok(ValidatedAudio {
            bytes: upload.bytes,
            filename,
            extension,
        })
    }

    /// Validate a seekable stream, buffering it only once it is known to fit.
    ///
    /// The length is measured by seeking to the end and back, so an
    /// oversized stream is rejected without reading it.
    pub fn read_upload<R: Read + Seek>(
        &self,
        mut reader: R,
        filename: Option<&str>,
    ) -> Result<ValidatedAudio> {
        let filename = check_filename(filename)?;
        let extension = check_extension(&filename)?;

        let len = reader
            .seek(SeekFrom::End(0))
            .and_then(|len| reader.seek(SeekFrom::Start(0)).map(|_| len))
            .map_err(|e| PipelineError::internal(format!("failed to measure upload: {e}")))?;
        self.check_size(len)?;

        let mut bytes = Vec::with_capacity(len as usize);
        let _ = reader
            .read_to_end(&mut bytes)
            .map_err(|e| PipelineError::internal(format!("failed to read upload: {e}")))?;
        // The stream may have grown between the seek and the read.
        self.check_size(bytes.len() as u64)?;

        Ok(ValidatedAudio {
            bytes,
            filename,
            extension,
        })
    }

    fn check_size(&self, len: u64) -> Result<()> {
        if len > self.max_bytes {
            tracing::warn!(bytes = len, limit = self.max_bytes, "upload rejected: too large");
            return Err(PipelineError::too_large(self.max_bytes));
        }
        Ok(())
    }
}

fn no_file_uploaded() -> PipelineError {
    tracing::warn!("upload rejected: no file");
    PipelineError::InvalidInput("No file uploaded".to_string())
}

fn check_filename(filename: Option<&str>) -> Result<String> {
    match filename.map(str::trim) {
        Some(name) if !name.is_empty() => Ok(name.to_string()),
        _ => {
            tracing::warn!("upload rejected: missing filename");
            Err(PipelineError::InvalidInput("No selected file".to_string()))
        }
    }
}

fn check_extension(filename: &str) -> Result<AudioExtension> {
    AudioExtension::from_filename(filename).ok_or_else(|| {
        tracing::warn!(filename, "upload rejected: unsupported extension");
        PipelineError::UnsupportedFormat("Unsupported file type".to_string())
    })
}
