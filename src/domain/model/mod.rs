// Domain models - Source metadata produced by the probe adapter

use serde::{Deserialize, Serialize};

use crate::domain::errors::MetadataError;

mod codec;

pub use codec::*;

/// Video stream information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoStreamInfo {
    pub index: usize,
    pub codec: String,
    pub width: u32,
    pub height: u32,
    pub frame_rate: f64,
    pub color_primaries: Option<String>,
    pub color_transfer: Option<String>,
}

impl VideoStreamInfo {
    /// Create new video stream info with validation
    pub fn new(
        index: usize,
        codec: impl Into<String>,
        width: u32,
        height: u32,
        frame_rate: f64,
    ) -> Result<Self, MetadataError> {
        if width == 0 || height == 0 {
            return Err(MetadataError::InvalidDimensions { index, width, height });
        }
        if !frame_rate.is_finite() || frame_rate < 0.0 {
            return Err(MetadataError::InvalidFrameRate { index, frame_rate });
        }

        Ok(Self {
            index,
            codec: codec.into(),
            width,
            height,
            frame_rate,
            color_primaries: None,
            color_transfer: None,
        })
    }

    /// Attach color characteristics as reported by the probe
    pub fn with_color(mut self, primaries: Option<String>, transfer: Option<String>) -> Self {
        self.color_primaries = primaries;
        self.color_transfer = transfer;
        self
    }

    /// Derived from the transfer function: PQ or HLG means HDR
    pub fn is_hdr(&self) -> bool {
        self.color_transfer
            .as_deref()
            .and_then(ColorTransfer::from_probe)
            .is_some()
    }

    /// Source codec mapped to our vocabulary, if it is one we know
    pub fn known_codec(&self) -> Option<VideoCodec> {
        self.codec.parse().ok()
    }
}

/// Audio stream information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioStreamInfo {
    pub index: usize,
    pub codec: String,
    pub channels: u32,
    pub bitrate_kbps: Option<u32>,
    pub language: Option<String>,
}

impl AudioStreamInfo {
    /// Create new audio stream info with validation
    pub fn new(index: usize, codec: impl Into<String>, channels: u32) -> Result<Self, MetadataError> {
        if channels == 0 {
            return Err(MetadataError::InvalidChannels { index });
        }

        Ok(Self {
            index,
            codec: codec.into(),
            channels,
            bitrate_kbps: None,
            language: None,
        })
    }

    pub fn with_bitrate_kbps(mut self, kbps: Option<u32>) -> Self {
        self.bitrate_kbps = kbps;
        self
    }

    pub fn with_language(mut self, language: Option<String>) -> Self {
        self.language = language;
        self
    }
}

/// Subtitle stream information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtitleStreamInfo {
    pub index: usize,
    pub codec: String,
    pub is_text_based: bool,
    pub language: Option<String>,
    pub title: Option<String>,
}

impl SubtitleStreamInfo {
    /// Create new subtitle stream info; text/graphic is derived from the codec
    pub fn new(index: usize, codec: impl Into<String>) -> Self {
        let codec = codec.into();
        let is_text_based = SubtitleFormat::from_codec(&codec).is_text();
        Self {
            index,
            codec,
            is_text_based,
            language: None,
            title: None,
        }
    }

    pub fn with_language(mut self, language: Option<String>) -> Self {
        self.language = language;
        self
    }

    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title;
        self
    }

    pub fn format(&self) -> SubtitleFormat {
        SubtitleFormat::from_codec(&self.codec)
    }

    /// Short label for logs, e.g. `#1 subrip (eng)`
    pub fn label(&self) -> String {
        match &self.language {
            Some(lang) => format!("#{} {} ({})", self.index, self.codec, lang),
            None => format!("#{} {}", self.index, self.codec),
        }
    }
}

/// Complete source metadata, read-only once probed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceMetadata {
    pub duration_seconds: f64,
    pub video_streams: Vec<VideoStreamInfo>,
    pub audio_streams: Vec<AudioStreamInfo>,
    pub subtitle_streams: Vec<SubtitleStreamInfo>,
    pub container: String,
}

impl SourceMetadata {
    /// Create new metadata with validation
    pub fn new(
        container: impl Into<String>,
        duration_seconds: f64,
        video_streams: Vec<VideoStreamInfo>,
        audio_streams: Vec<AudioStreamInfo>,
        subtitle_streams: Vec<SubtitleStreamInfo>,
    ) -> Result<Self, MetadataError> {
        if !duration_seconds.is_finite() || duration_seconds <= 0.0 {
            return Err(MetadataError::InvalidDuration(duration_seconds));
        }

        Ok(Self {
            duration_seconds,
            video_streams,
            audio_streams,
            subtitle_streams,
            container: container.into(),
        })
    }

    /// Get primary video stream (usually the first one)
    pub fn primary_video_stream(&self) -> Option<&VideoStreamInfo> {
        self.video_streams.first()
    }

    /// Get primary audio stream
    pub fn primary_audio_stream(&self) -> Option<&AudioStreamInfo> {
        self.audio_streams.first()
    }

    /// Subtitle stream by ordinal within the subtitle list (ffmpeg `0:s:N`)
    pub fn subtitle_stream(&self, ordinal: usize) -> Option<&SubtitleStreamInfo> {
        self.subtitle_streams.get(ordinal)
    }

    /// Get total number of streams
    pub fn total_streams(&self) -> usize {
        self.video_streams.len() + self.audio_streams.len() + self.subtitle_streams.len()
    }
}

/// What the local media engine can do, injected by the caller
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineCapabilities {
    pub hardware_encoders: Vec<Encoder>,
    pub libplacebo: bool,
}

impl EngineCapabilities {
    /// Software only, no libplacebo
    pub fn software_only() -> Self {
        Self::default()
    }

    /// Software encoders are always usable; hardware ones only when listed
    pub fn supports(&self, encoder: Encoder) -> bool {
        !encoder.is_hardware() || self.hardware_encoders.contains(&encoder)
    }
}
