// Codec, encoder and container vocabulary shared by the planner and emitter

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::errors::OptionsError;

/// Video codec families the planner can target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoCodec {
    H264,
    Hevc,
    Av1,
    Vp9,
}

impl VideoCodec {
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoCodec::H264 => "h264",
            VideoCodec::Hevc => "hevc",
            VideoCodec::Av1 => "av1",
            VideoCodec::Vp9 => "vp9",
        }
    }

    /// Hardware encoder for this family, if one exists
    pub fn hardware_encoder(&self) -> Option<Encoder> {
        match self {
            VideoCodec::H264 => Some(Encoder::H264Nvenc),
            VideoCodec::Hevc => Some(Encoder::HevcNvenc),
            VideoCodec::Av1 | VideoCodec::Vp9 => None,
        }
    }

    /// Software encoder for this family
    pub fn software_encoder(&self) -> Encoder {
        match self {
            VideoCodec::H264 => Encoder::X264,
            VideoCodec::Hevc => Encoder::X265,
            VideoCodec::Av1 => Encoder::SvtAv1,
            VideoCodec::Vp9 => Encoder::Vp9,
        }
    }
}

impl fmt::Display for VideoCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VideoCodec {
    type Err = OptionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "h264" | "avc" => Ok(VideoCodec::H264),
            "hevc" | "h265" => Ok(VideoCodec::Hevc),
            "av1" => Ok(VideoCodec::Av1),
            "vp9" => Ok(VideoCodec::Vp9),
            other => Err(OptionsError::InvalidValue {
                field: "video.codec",
                value: other.to_string(),
            }),
        }
    }
}

/// Concrete video encoders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Encoder {
    X264,
    X265,
    H264Nvenc,
    HevcNvenc,
    SvtAv1,
    Vp9,
}

impl Encoder {
    pub const ALL: [Encoder; 6] = [
        Encoder::X264,
        Encoder::X265,
        Encoder::H264Nvenc,
        Encoder::HevcNvenc,
        Encoder::SvtAv1,
        Encoder::Vp9,
    ];

    /// User-facing identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Encoder::X264 => "x264",
            Encoder::X265 => "x265",
            Encoder::H264Nvenc => "h264-nvenc",
            Encoder::HevcNvenc => "hevc-nvenc",
            Encoder::SvtAv1 => "svt-av1",
            Encoder::Vp9 => "vp9",
        }
    }

    /// Encoder name as ffmpeg knows it
    pub fn ffmpeg_name(&self) -> &'static str {
        match self {
            Encoder::X264 => "libx264",
            Encoder::X265 => "libx265",
            Encoder::H264Nvenc => "h264_nvenc",
            Encoder::HevcNvenc => "hevc_nvenc",
            Encoder::SvtAv1 => "libsvtav1",
            Encoder::Vp9 => "libvpx-vp9",
        }
    }

    /// Codec family produced by this encoder
    pub fn codec(&self) -> VideoCodec {
        match self {
            Encoder::X264 | Encoder::H264Nvenc => VideoCodec::H264,
            Encoder::X265 | Encoder::HevcNvenc => VideoCodec::Hevc,
            Encoder::SvtAv1 => VideoCodec::Av1,
            Encoder::Vp9 => VideoCodec::Vp9,
        }
    }

    pub fn is_hardware(&self) -> bool {
        matches!(self, Encoder::H264Nvenc | Encoder::HevcNvenc)
    }
}

impl fmt::Display for Encoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Encoder {
    type Err = OptionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        Encoder::ALL
            .iter()
            .copied()
            .find(|e| e.as_str() == normalized || e.ffmpeg_name().replace('_', "-") == normalized)
            .ok_or(OptionsError::InvalidValue {
                field: "video.encoder",
                value: s.to_string(),
            })
    }
}

/// Encoder preference as requested by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EncoderPreference {
    #[default]
    Auto,
    Explicit(Encoder),
}

impl FromStr for EncoderPreference {
    type Err = OptionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("auto") {
            return Ok(EncoderPreference::Auto);
        }
        s.parse().map(EncoderPreference::Explicit)
    }
}

/// Output container formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Container {
    #[default]
    Mp4,
    Mkv,
    Webm,
}

impl Container {
    pub fn as_str(&self) -> &'static str {
        match self {
            Container::Mp4 => "mp4",
            Container::Mkv => "mkv",
            Container::Webm => "webm",
        }
    }

    /// Filename extension without the dot
    pub fn extension(&self) -> &'static str {
        self.as_str()
    }

    /// Container matching a filename extension, if recognised
    pub fn from_extension(ext: &str) -> Option<Self> {
        ext.trim_start_matches('.').parse().ok()
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Container {
    type Err = OptionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mp4" => Ok(Container::Mp4),
            "mkv" | "matroska" => Ok(Container::Mkv),
            "webm" => Ok(Container::Webm),
            other => Err(OptionsError::InvalidValue {
                field: "container",
                value: other.to_string(),
            }),
        }
    }
}

/// Audio codecs used when transcoding audio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioCodec {
    Aac,
    Opus,
}

impl AudioCodec {
    /// WebM only carries Opus/Vorbis, everything else gets AAC
    pub fn for_container(container: Container) -> Self {
        match container {
            Container::Webm => AudioCodec::Opus,
            Container::Mp4 | Container::Mkv => AudioCodec::Aac,
        }
    }

    pub fn ffmpeg_name(&self) -> &'static str {
        match self {
            AudioCodec::Aac => "aac",
            AudioCodec::Opus => "libopus",
        }
    }
}

/// Output resolution targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Resolution {
    #[default]
    Original,
    P2160,
    P1440,
    P1080,
    P720,
    P480,
}

impl Resolution {
    /// Target height in pixels, `None` keeps the source height
    pub fn height(&self) -> Option<u32> {
        match self {
            Resolution::Original => None,
            Resolution::P2160 => Some(2160),
            Resolution::P1440 => Some(1440),
            Resolution::P1080 => Some(1080),
            Resolution::P720 => Some(720),
            Resolution::P480 => Some(480),
        }
    }
}

impl FromStr for Resolution {
    type Err = OptionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "original" => Ok(Resolution::Original),
            "2160p" | "4k" => Ok(Resolution::P2160),
            "1440p" => Ok(Resolution::P1440),
            "1080p" => Ok(Resolution::P1080),
            "720p" => Ok(Resolution::P720),
            "480p" => Ok(Resolution::P480),
            other => Err(OptionsError::InvalidValue {
                field: "video.resolution",
                value: other.to_string(),
            }),
        }
    }
}

/// Transfer characteristics that mark a stream as HDR
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorTransfer {
    /// SMPTE ST 2084 (PQ)
    Pq,
    /// ARIB STD-B67 (HLG)
    Hlg,
}

impl ColorTransfer {
    /// Recognise an ffprobe `color_transfer` value
    pub fn from_probe(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "smpte2084" => Some(ColorTransfer::Pq),
            "arib-std-b67" => Some(ColorTransfer::Hlg),
            _ => None,
        }
    }
}

/// How a subtitle codec is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubtitleFormat {
    /// Timed plain text (SubRip, mov_text, WebVTT)
    PlainText,
    /// Font- and style-dependent text (ASS/SSA)
    StyledText,
    /// Bitmap subtitles (PGS, VobSub, DVB)
    Graphic,
}

impl SubtitleFormat {
    /// Classify an ffprobe subtitle `codec_name`; unknown codecs are treated as graphic
    pub fn from_codec(codec: &str) -> Self {
        match codec.trim().to_lowercase().as_str() {
            "subrip" | "srt" | "mov_text" | "webvtt" | "text" => SubtitleFormat::PlainText,
            "ass" | "ssa" => SubtitleFormat::StyledText,
            _ => SubtitleFormat::Graphic,
        }
    }

    pub fn is_text(&self) -> bool {
        !matches!(self, SubtitleFormat::Graphic)
    }
}
