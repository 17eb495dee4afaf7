//! hark: audio transcription pipeline
//!
//! Takes an uploaded audio file of unknown encoding, validates it, normalizes
//! it to canonical 16 kHz mono 16-bit PCM and transcribes it through a remote
//! speech-recognition backend. Every failure is one of a closed set of
//! [`error::PipelineError`] variants with a fixed HTTP status.
//!
//! # Quick Start
//!
//! ```no_run
//! use hark::config::HarkConfig;
//! use hark::intake::UploadedAudio;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = HarkConfig::from_env()?.build_pipeline()?;
//! let bytes = std::fs::read("speech.mp3")?;
//! let text = pipeline
//!     .transcribe(Some(UploadedAudio::new(bytes, "speech.mp3")))
//!     .await?;
//! println!("{text}");
//! # Ok(())
//! # }
//! ```

pub mod audio;
pub mod backend;
pub mod config;
pub mod error;
pub mod intake;
pub mod pipeline;
pub mod prelude;
pub mod response;
pub mod util;

#[cfg(feature = "server")]
pub mod server;

#[cfg(feature = "cli")]
pub mod cli;
