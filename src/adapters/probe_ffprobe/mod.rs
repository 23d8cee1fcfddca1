//! FFprobe adapter for media file probing
//!
//! Parses the JSON written by `ffprobe -show_format -show_streams -of json`.
//! The adapter never spawns ffprobe itself; callers hand it a saved document.

use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use crate::domain::model::*;
use crate::error::ProbeError;
use crate::ports::ProbePort;

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    format: Option<FfprobeFormat>,
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    #[serde(default)]
    format_name: Option<String>,
    #[serde(default)]
    duration: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct FfprobeDisposition {
    #[serde(default)]
    attached_pic: u8,
}

#[derive(Debug, Default, Deserialize)]
struct FfprobeTags {
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    index: usize,
    #[serde(default)]
    codec_type: Option<String>,
    #[serde(default)]
    codec_name: Option<String>,
    #[serde(default)]
    width: Option<u32>,
    #[serde(default)]
    height: Option<u32>,
    #[serde(default)]
    r_frame_rate: Option<String>,
    #[serde(default)]
    avg_frame_rate: Option<String>,
    #[serde(default)]
    color_primaries: Option<String>,
    #[serde(default)]
    color_transfer: Option<String>,
    #[serde(default)]
    channels: Option<u32>,
    #[serde(default)]
    bit_rate: Option<String>,
    #[serde(default)]
    duration: Option<String>,
    #[serde(default)]
    tags: FfprobeTags,
    #[serde(default)]
    disposition: FfprobeDisposition,
}

fn parse_frame_rate(s: &str) -> Option<f64> {
    let (num, den) = s.split_once('/')?;
    let num: f64 = num.trim().parse().ok()?;
    let den: f64 = den.trim().parse().ok()?;
    if den == 0.0 {
        return None;
    }
    Some(num / den)
}

fn parse_seconds(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|d| d.is_finite() && *d > 0.0)
}

/// Probe adapter backed by saved ffprobe JSON
#[derive(Debug, Default)]
pub struct FfprobeJsonAdapter;

impl FfprobeJsonAdapter {
    /// Create new ffprobe JSON adapter
    pub fn new() -> Self {
        Self
    }

    /// Parse an ffprobe JSON document
    pub fn parse_str(&self, json: &str) -> Result<SourceMetadata, ProbeError> {
        let output: FfprobeOutput = serde_json::from_str(json)?;

        let container = output
            .format
            .as_ref()
            .and_then(|f| f.format_name.clone())
            .unwrap_or_default();

        // Container duration first, then the longest stream
        let duration = output
            .format
            .as_ref()
            .and_then(|f| f.duration.as_deref())
            .and_then(parse_seconds)
            .or_else(|| {
                output
                    .streams
                    .iter()
                    .filter_map(|s| s.duration.as_deref().and_then(parse_seconds))
                    .reduce(f64::max)
            })
            .ok_or_else(|| ProbeError::Missing {
                field: "format.duration".to_string(),
            })?;

        let mut video_streams = Vec::new();
        let mut audio_streams = Vec::new();
        let mut subtitle_streams = Vec::new();

        for stream in output.streams {
            let codec = stream.codec_name.clone().unwrap_or_default();
            match stream.codec_type.as_deref() {
                Some("video") => {
                    if stream.disposition.attached_pic != 0 {
                        debug!("Skipping attached picture stream {}", stream.index);
                        continue;
                    }
                    let frame_rate = stream
                        .avg_frame_rate
                        .as_deref()
                        .and_then(parse_frame_rate)
                        .filter(|r| *r > 0.0)
                        .or_else(|| stream.r_frame_rate.as_deref().and_then(parse_frame_rate))
                        .unwrap_or(0.0);
                    let info = VideoStreamInfo::new(
                        stream.index,
                        codec,
                        stream.width.unwrap_or(0),
                        stream.height.unwrap_or(0),
                        frame_rate,
                    )?
                    .with_color(stream.color_primaries, stream.color_transfer);
                    video_streams.push(info);
                }
                Some("audio") => {
                    let bitrate_kbps = stream
                        .bit_rate
                        .as_deref()
                        .and_then(|b| b.trim().parse::<u64>().ok())
                        .map(|bps| (bps / 1000) as u32)
                        .filter(|kbps| *kbps > 0);
                    let info = AudioStreamInfo::new(stream.index, codec, stream.channels.unwrap_or(0))?
                        .with_bitrate_kbps(bitrate_kbps)
                        .with_language(stream.tags.language);
                    audio_streams.push(info);
                }
                Some("subtitle") => {
                    subtitle_streams.push(
                        SubtitleStreamInfo::new(stream.index, codec)
                            .with_language(stream.tags.language)
                            .with_title(stream.tags.title),
                    );
                }
                _ => debug!("Ignoring stream {} of type {:?}", stream.index, stream.codec_type),
            }
        }

        let metadata = SourceMetadata::new(
            container,
            duration,
            video_streams,
            audio_streams,
            subtitle_streams,
        )?;

        info!(
            "Probed {:.3}s source: {} video, {} audio, {} subtitle stream(s)",
            metadata.duration_seconds,
            metadata.video_streams.len(),
            metadata.audio_streams.len(),
            metadata.subtitle_streams.len()
        );
        Ok(metadata)
    }
}

impl ProbePort for FfprobeJsonAdapter {
    fn probe_media(&self, locator: &str) -> Result<SourceMetadata, ProbeError> {
        let json = std::fs::read_to_string(Path::new(locator)).map_err(|source| ProbeError::Read {
            path: locator.to_string(),
            source,
        })?;
        self.parse_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "streams": [
            {
                "index": 0,
                "codec_name": "hevc",
                "codec_type": "video",
                "width": 3840,
                "height": 2160,
                "r_frame_rate": "24000/1001",
                "avg_frame_rate": "24000/1001",
                "color_primaries": "bt2020",
                "color_transfer": "smpte2084"
            },
            {
                "index": 1,
                "codec_name": "eac3",
                "codec_type": "audio",
                "channels": 6,
                "bit_rate": "640000",
                "tags": { "language": "eng" }
            },
            {
                "index": 2,
                "codec_name": "subrip",
                "codec_type": "subtitle",
                "tags": { "language": "eng", "title": "English" }
            },
            {
                "index": 3,
                "codec_name": "hdmv_pgs_subtitle",
                "codec_type": "subtitle"
            },
            {
                "index": 4,
                "codec_name": "mjpeg",
                "codec_type": "video",
                "width": 600,
                "height": 900,
                "r_frame_rate": "90000/1",
                "disposition": { "attached_pic": 1 }
            },
            {
                "index": 5,
                "codec_name": "ttf",
                "codec_type": "attachment"
            }
        ],
        "format": {
            "format_name": "matroska,webm",
            "duration": "5423.360000"
        }
    }"#;

    #[test]
    fn test_parse_sample() {
        let metadata = FfprobeJsonAdapter::new().parse_str(SAMPLE).unwrap();

        assert_eq!(metadata.container, "matroska,webm");
        assert_eq!(metadata.duration_seconds, 5423.36);
        assert_eq!(metadata.video_streams.len(), 1);
        assert!(metadata.video_streams[0].is_hdr());
        assert!((metadata.video_streams[0].frame_rate - 23.976).abs() < 0.001);

        let audio = &metadata.audio_streams[0];
        assert_eq!(audio.channels, 6);
        assert_eq!(audio.bitrate_kbps, Some(640));
        assert_eq!(audio.language.as_deref(), Some("eng"));

        assert_eq!(metadata.subtitle_streams.len(), 2);
        assert!(metadata.subtitle_streams[0].is_text_based);
        assert_eq!(metadata.subtitle_streams[0].title.as_deref(), Some("English"));
        assert!(!metadata.subtitle_streams[1].is_text_based);
        assert_eq!(metadata.subtitle_streams[1].index, 3);
    }

    #[test]
    fn test_duration_falls_back_to_streams() {
        let json = r#"{
            "streams": [
                { "index": 0, "codec_type": "video", "codec_name": "h264",
                  "width": 1280, "height": 720, "r_frame_rate": "30/1", "duration": "12.5" },
                { "index": 1, "codec_type": "audio", "codec_name": "aac",
                  "channels": 2, "duration": "12.8" }
            ],
            "format": { "format_name": "mov,mp4,m4a,3gp,3g2,mj2" }
        }"#;
        let metadata = FfprobeJsonAdapter::new().parse_str(json).unwrap();
        assert_eq!(metadata.duration_seconds, 12.8);
    }

    #[test]
    fn test_missing_duration() {
        let json = r#"{ "streams": [], "format": {} }"#;
        assert!(matches!(
            FfprobeJsonAdapter::new().parse_str(json),
            Err(ProbeError::Missing { .. })
        ));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            FfprobeJsonAdapter::new().parse_str("not json"),
            Err(ProbeError::Parse(_))
        ));
    }

    #[test]
    fn test_probe_media_missing_file() {
        let result = FfprobeJsonAdapter::new().probe_media("/definitely/not/here.json");
        assert!(matches!(result, Err(ProbeError::Read { .. })));
    }

    #[test]
    fn test_parse_frame_rate() {
        assert_eq!(parse_frame_rate("30/1"), Some(30.0));
        assert_eq!(parse_frame_rate("0/0"), None);
        assert_eq!(parse_frame_rate("garbage"), None);
    }
}
