use std::path::PathBuf;

use thiserror::Error;

use crate::shared::timeline::TimelineError;

/// Fatal pipeline failures. None of them leave partial output behind.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("failed to read script {path}: {source}")]
    ScriptRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("script is empty")]
    EmptyScript,
    #[error("failed to prepare output directory {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("speech synthesis failed: {0}")]
    Synthesis(String),
    #[error("failed to read narration audio: {0}")]
    AudioRead(String),
    #[error("transcription failed: {0}")]
    Transcription(String),
    #[error("transcription produced no words")]
    EmptyTranscript,
    #[error("narration has zero duration")]
    ZeroDuration,
    #[error("no caption could be placed on the timeline")]
    NoCaptions,
    #[error("broken timeline: {0}")]
    BrokenTimeline(#[from] TimelineError),
    #[error("rendering failed: {0}")]
    Render(String),
}
