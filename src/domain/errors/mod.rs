// Domain errors - Error types for the domain layer

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::domain::model::{Container, Encoder, VideoCodec};

/// Fatal planning failures; a plan is either complete or not produced
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanError {
    #[error("Invalid time range: {reason}")]
    InvalidTimeRange { reason: String },

    #[error("Conflicting time range: start {start}s + duration {duration}s does not match end {end}s")]
    ConflictingTimeRange { start: f64, end: f64, duration: f64 },

    #[error("Stream copy cannot be combined with: {}", fields.join(", "))]
    ConflictingModeOptions { fields: Vec<&'static str> },

    #[error("Encoder {encoder} cannot produce {codec}")]
    IncompatibleEncoder { encoder: Encoder, codec: VideoCodec },

    #[error("Encoder {encoder} is not available on this system")]
    EncoderUnavailable { encoder: Encoder },

    #[error(
        "Target size {target_size_mb} MB is too small for {duration_seconds:.3}s: \
         video would get {video_bps} bps, minimum is {min_video_bps} bps"
    )]
    TargetSizeTooSmall {
        target_size_mb: f64,
        duration_seconds: f64,
        video_bps: i64,
        min_video_bps: u64,
    },

    #[error("Subtitle stream {ordinal} not found (source has {available})")]
    SubtitleIndexNotFound { ordinal: usize, available: usize },

    #[error("Subtitle stream {ordinal} ({codec}) cannot be burned with the {method} method")]
    UnsupportedBurnMethod {
        ordinal: usize,
        codec: String,
        method: &'static str,
    },

    #[error("Container {container} cannot carry {codec} video")]
    UnsupportedContainerCodec { container: Container, codec: VideoCodec },

    #[error("Source has no video stream")]
    NoVideoStream,
}

/// Non-fatal findings attached to a successful plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlanWarning {
    /// A subtitle track had to be left out because the container cannot hold it
    UnsupportedContainerTrack {
        ordinal: usize,
        codec: String,
        container: Container,
    },
}

impl fmt::Display for PlanWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanWarning::UnsupportedContainerTrack {
                ordinal,
                codec,
                container,
            } => write!(
                f,
                "subtitle stream {} ({}) dropped: {} cannot carry it",
                ordinal, codec, container
            ),
        }
    }
}

/// Boundary validation failures for user options
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OptionsError {
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: String },

    #[error("{field} out of range: {value} (expected {expected})")]
    OutOfRange {
        field: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("{field} requires a subtitle burn to be selected")]
    RequiresBurn { field: &'static str },

    #[error("Container {container} does not match output extension .{extension}")]
    ContainerMismatch {
        container: Container,
        extension: String,
    },
}

/// Probe results that cannot describe real media
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MetadataError {
    #[error("Invalid duration: {0}")]
    InvalidDuration(f64),

    #[error("Stream {index} has invalid dimensions {width}x{height}")]
    InvalidDimensions { index: usize, width: u32, height: u32 },

    #[error("Stream {index} has invalid frame rate {frame_rate}")]
    InvalidFrameRate { index: usize, frame_rate: f64 },

    #[error("Stream {index} reports zero audio channels")]
    InvalidChannels { index: usize },
}
