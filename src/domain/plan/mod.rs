// Domain plan - The immutable result of planning one clip

use serde::Serialize;

use crate::domain::errors::PlanWarning;
use crate::domain::model::{AudioCodec, Container, Encoder, SubtitleFormat, VideoCodec};

/// Complete, self-consistent description of one encode
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EncodePlan {
    pub clip_start: f64,
    pub clip_end: f64,
    /// Whether any time field was supplied; untrimmed plans emit no seek flags
    pub trimmed: bool,
    pub video: VideoAction,
    pub audio: AudioAction,
    pub subtitles: SubtitlePlan,
    pub container: Container,
    pub mapping: Vec<MappingSlot>,
    /// Present for size-targeted encodes
    pub bitrate: Option<BitrateAllocation>,
    pub rationale: Vec<String>,
    pub warnings: Vec<PlanWarning>,
}

impl EncodePlan {
    pub fn clip_duration(&self) -> f64 {
        self.clip_end - self.clip_start
    }

    pub fn is_two_pass(&self) -> bool {
        matches!(&self.video, VideoAction::Encode(e) if e.pass_count == 2)
    }

    /// Any stream copied without decoding
    pub fn copies_any_stream(&self) -> bool {
        matches!(self.video, VideoAction::Copy { .. }) || matches!(self.audio, AudioAction::Copy { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum VideoAction {
    /// Stream copy; the source codec is kept for container tagging
    Copy { source_codec: Option<VideoCodec> },
    Encode(VideoEncode),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoEncode {
    pub encoder: EncoderChoice,
    pub target_bitrate_kbps: u64,
    pub pass_count: u8,
    /// Applied in order
    pub filters: Vec<FilterStage>,
}

/// Resolved encoder and whether it came from the hardware set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EncoderChoice {
    pub encoder: Encoder,
    pub hardware: bool,
}

impl EncoderChoice {
    pub fn new(encoder: Encoder) -> Self {
        Self {
            encoder,
            hardware: encoder.is_hardware(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum AudioAction {
    Copy { budget_kbps: u32 },
    Encode {
        codec: AudioCodec,
        bitrate_kbps: u32,
        channels: Option<u32>,
    },
    Drop,
}

/// Output of the bitrate allocator, kept for reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BitrateAllocation {
    pub target_bits: u64,
    pub usable_bits: u64,
    pub duration_ms: u64,
    pub audio_bps: u64,
    pub video_bps: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TonemapMethod {
    /// zscale linearisation followed by the hable curve
    Zscale,
    /// Vulkan-backed libplacebo
    Libplacebo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum FilterStage {
    Tonemap { method: TonemapMethod },
    /// Render the burned subtitle described by `SubtitlePlan::burn`
    BurnSubtitles,
    Scale { height: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolvedBurnMethod {
    Extract,
    Inline,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubtitleBurn {
    /// Ordinal within the source subtitle streams
    pub ordinal: usize,
    pub stream_index: usize,
    pub codec: String,
    pub format: SubtitleFormat,
    pub method: ResolvedBurnMethod,
    pub delay_ms: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubtitleCodecAction {
    Copy,
    MovText,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SubtitlePlan {
    pub burn: Option<SubtitleBurn>,
    /// Source subtitle ordinals muxed into the output, in source order
    pub mux: Vec<usize>,
    pub mux_codec: Option<SubtitleCodecAction>,
}

/// Single-valued view of a subtitle plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SubtitleAction {
    None,
    BurnExtracted { ordinal: usize, delay_ms: i64 },
    BurnInline { ordinal: usize, delay_ms: i64 },
    MuxTracks(Vec<usize>),
}

impl SubtitlePlan {
    /// A burn takes precedence over muxed tracks
    pub fn action(&self) -> SubtitleAction {
        match &self.burn {
            Some(burn) => match burn.method {
                ResolvedBurnMethod::Extract => SubtitleAction::BurnExtracted {
                    ordinal: burn.ordinal,
                    delay_ms: burn.delay_ms,
                },
                ResolvedBurnMethod::Inline => SubtitleAction::BurnInline {
                    ordinal: burn.ordinal,
                    delay_ms: burn.delay_ms,
                },
            },
            None if !self.mux.is_empty() => SubtitleAction::MuxTracks(self.mux.clone()),
            None => SubtitleAction::None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamKind {
    Video,
    Audio,
    Subtitle,
}

/// One output stream, mapped from a container-wide source index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MappingSlot {
    pub kind: StreamKind,
    pub source_index: usize,
}

impl MappingSlot {
    pub fn new(kind: StreamKind, source_index: usize) -> Self {
        Self { kind, source_index }
    }
}
