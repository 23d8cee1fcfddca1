// Domain rules - Container and stream mapping policies

use crate::domain::model::*;
use crate::domain::plan::{MappingSlot, StreamKind, SubtitleCodecAction};

/// What a container can hold
pub struct ContainerRules;

/// How a subtitle format ends up in a given container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubtitleCarriage {
    Carried(SubtitleCodecAction),
    Unsupported,
}

impl ContainerRules {
    /// Whether an encoded video codec may be written into the container
    pub fn supports_video(container: Container, codec: VideoCodec) -> bool {
        match container {
            Container::Mkv => true,
            Container::Mp4 => matches!(codec, VideoCodec::H264 | VideoCodec::Hevc | VideoCodec::Av1),
            Container::Webm => matches!(codec, VideoCodec::Vp9 | VideoCodec::Av1),
        }
    }

    /// MKV takes subtitles as-is, MP4 only text converted to mov_text, WebM none
    pub fn subtitle_carriage(container: Container, format: SubtitleFormat) -> SubtitleCarriage {
        match (container, format) {
            (Container::Mkv, _) => SubtitleCarriage::Carried(SubtitleCodecAction::Copy),
            (Container::Mp4, f) if f.is_text() => {
                SubtitleCarriage::Carried(SubtitleCodecAction::MovText)
            }
            (Container::Mp4, _) | (Container::Webm, _) => SubtitleCarriage::Unsupported,
        }
    }

    /// Codec tag that keeps mp4 players happy, if any
    pub fn video_tag(container: Container, codec: VideoCodec) -> Option<&'static str> {
        match (container, codec) {
            (Container::Mp4, VideoCodec::H264) => Some("avc1"),
            (Container::Mp4, VideoCodec::Hevc) => Some("hvc1"),
            _ => None,
        }
    }
}

/// Builds the output stream mapping
pub struct StreamMapper;

impl StreamMapper {
    /// Video first, then audio, then muxed subtitles in source order
    pub fn create_mapping(
        video: &VideoStreamInfo,
        audio: Option<&AudioStreamInfo>,
        subtitles: &[&SubtitleStreamInfo],
    ) -> Vec<MappingSlot> {
        let mut mapping = vec![MappingSlot::new(StreamKind::Video, video.index)];

        if let Some(audio) = audio {
            mapping.push(MappingSlot::new(StreamKind::Audio, audio.index));
        }

        mapping.extend(
            subtitles
                .iter()
                .map(|s| MappingSlot::new(StreamKind::Subtitle, s.index)),
        );

        mapping
    }
}
