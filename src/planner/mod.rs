//! Encode plan construction from probe metadata and user options

use tracing::{debug, info};

use crate::domain::errors::PlanError;
use crate::domain::model::{
    AudioCodec, EncoderPreference, EngineCapabilities, Resolution, SourceMetadata,
};
use crate::domain::options::Options;
use crate::domain::plan::{AudioAction, EncodePlan, VideoAction, VideoEncode};
use crate::domain::rules::{ContainerRules, StreamMapper};

pub mod bitrate;
pub mod encoder;
pub mod filters;
pub mod subtitles;
pub mod time_range;

pub use bitrate::{allocate, audio_budget_bps, BitratePolicy};
pub use encoder::{select_encoder, DEFAULT_VIDEO_CODEC};
pub use time_range::{resolve_time_range, ResolvedRange, TIME_EPSILON_SECONDS};

/// Size-targeted encodes always run two passes
pub const SIZE_TARGET_PASSES: u8 = 2;

/// Deterministic planner; holds only policy and injected capabilities
#[derive(Debug, Clone, Default)]
pub struct EncodePlanBuilder {
    policy: BitratePolicy,
    capabilities: EngineCapabilities,
}

impl EncodePlanBuilder {
    /// Create a new builder
    pub fn new(policy: BitratePolicy, capabilities: EngineCapabilities) -> Self {
        Self {
            policy,
            capabilities,
        }
    }

    /// Derive the full plan, or the first error that prevents one
    pub fn plan(&self, metadata: &SourceMetadata, options: &Options) -> Result<EncodePlan, PlanError> {
        let mut rationale = Vec::new();
        let mut warnings = Vec::new();

        let video_stream = metadata
            .primary_video_stream()
            .ok_or(PlanError::NoVideoStream)?;

        let range = resolve_time_range(
            options.time.start,
            options.time.end,
            options.time.duration,
            metadata.duration_seconds,
        )?;
        if range.trimmed {
            rationale.push(format!(
                "Clip {:.3}s - {:.3}s ({:.3}s)",
                range.start,
                range.end,
                range.duration()
            ));
        } else {
            rationale.push(format!("Using the whole source ({:.3}s)", range.duration()));
        }
        if range.clamped {
            rationale.push(format!(
                "Requested end is past the source; clamped to {:.3}s",
                range.end
            ));
        }

        if options.video.copy {
            let conflicts = copy_conflicts(options);
            if !conflicts.is_empty() {
                return Err(PlanError::ConflictingModeOptions { fields: conflicts });
            }
        }

        let subtitles = subtitles::resolve_subtitles(
            metadata,
            &options.subtitles,
            options.container,
            &mut rationale,
            &mut warnings,
        )?;

        let audio_stream = if options.audio.include {
            metadata.primary_audio_stream()
        } else {
            None
        };
        let audio = self.audio_action(metadata, options, &mut rationale);

        let (video, bitrate) = if options.video.copy {
            rationale.push("Copying video without re-encoding".to_string());
            (
                VideoAction::Copy {
                    source_codec: video_stream.known_codec(),
                },
                None,
            )
        } else {
            let choice = select_encoder(&options.video, &self.capabilities)?;
            let codec = choice.encoder.codec();
            if !ContainerRules::supports_video(options.container, codec) {
                return Err(PlanError::UnsupportedContainerCodec {
                    container: options.container,
                    codec,
                });
            }
            rationale.push(format!(
                "Encoding {} with {}{}",
                codec,
                choice.encoder,
                match (options.video.encoder, choice.hardware) {
                    (EncoderPreference::Auto, true) => " (hardware available)",
                    (EncoderPreference::Auto, false) => " (software)",
                    (EncoderPreference::Explicit(_), _) => " (requested)",
                }
            ));

            let target_size_mb = options
                .target_size_mb
                .unwrap_or(self.policy.default_target_size_mb);
            let allocation = allocate(
                target_size_mb,
                range.duration(),
                audio_budget_bps(&audio),
                &self.policy,
            )?;
            rationale.push(format!(
                "Target {} MB over {:.3}s: video {} bps after {} bps audio and {}% overhead",
                target_size_mb,
                range.duration(),
                allocation.video_bps,
                allocation.audio_bps,
                f64::from(self.policy.overhead_margin_bp) / 100.0
            ));
            rationale.push("Two-pass encode to hit the size target".to_string());

            let filters = filters::build_filters(
                video_stream,
                options.video.resolution,
                subtitles.burn.is_some(),
                &self.capabilities,
                &mut rationale,
            );

            (
                VideoAction::Encode(VideoEncode {
                    encoder: choice,
                    target_bitrate_kbps: allocation.video_bps / 1000,
                    pass_count: SIZE_TARGET_PASSES,
                    filters,
                }),
                Some(allocation),
            )
        };

        let muxed: Vec<_> = subtitles
            .mux
            .iter()
            .filter_map(|ordinal| metadata.subtitle_stream(*ordinal))
            .collect();
        let mapped_audio = match audio {
            AudioAction::Drop => None,
            _ => audio_stream,
        };
        let mapping = StreamMapper::create_mapping(video_stream, mapped_audio, &muxed);

        info!(
            "Planned {} clip {:.3}s - {:.3}s, {} output stream(s), {} warning(s)",
            options.container,
            range.start,
            range.end,
            mapping.len(),
            warnings.len()
        );

        Ok(EncodePlan {
            clip_start: range.start,
            clip_end: range.end,
            trimmed: range.trimmed,
            video,
            audio,
            subtitles,
            container: options.container,
            mapping,
            bitrate,
            rationale,
            warnings,
        })
    }

    fn audio_action(
        &self,
        metadata: &SourceMetadata,
        options: &Options,
        rationale: &mut Vec<String>,
    ) -> AudioAction {
        if !options.audio.include {
            rationale.push("Audio excluded".to_string());
            return AudioAction::Drop;
        }

        let Some(stream) = metadata.primary_audio_stream() else {
            rationale.push("Source has no audio stream; output will be silent".to_string());
            return AudioAction::Drop;
        };

        if options.audio.copy {
            let budget_kbps = stream
                .bitrate_kbps
                .unwrap_or(self.policy.fallback_audio_kbps);
            rationale.push(match stream.bitrate_kbps {
                Some(kbps) => format!("Copying {} audio ({} kbps)", stream.codec, kbps),
                None => format!(
                    "Copying {} audio; bitrate unknown, budgeting {} kbps",
                    stream.codec, budget_kbps
                ),
            });
            if options.audio.downmix_to_stereo {
                rationale.push("Stereo downmix ignored while copying audio".to_string());
            }
            return AudioAction::Copy { budget_kbps };
        }

        let codec = AudioCodec::for_container(options.container);
        let bitrate_kbps = options.audio.kbps.unwrap_or(self.policy.default_audio_kbps);
        let channels = options.audio.downmix_to_stereo.then_some(2);
        debug!(
            "Audio {} at {} kbps, channels {:?}",
            codec.ffmpeg_name(),
            bitrate_kbps,
            channels
        );
        rationale.push(format!(
            "Encoding audio to {} at {} kbps{}",
            codec.ffmpeg_name(),
            bitrate_kbps,
            if channels.is_some() { ", downmixed to stereo" } else { "" }
        ));

        AudioAction::Encode {
            codec,
            bitrate_kbps,
            channels,
        }
    }
}

/// Options that only make sense for a re-encode
fn copy_conflicts(options: &Options) -> Vec<&'static str> {
    let mut fields = Vec::new();
    if options.video.codec.is_some() {
        fields.push("video.codec");
    }
    if matches!(options.video.encoder, EncoderPreference::Explicit(_)) {
        fields.push("video.encoder");
    }
    if matches!(options.video.resolution, Some(r) if r != Resolution::Original) {
        fields.push("video.resolution");
    }
    if options.target_size_mb.is_some() {
        fields.push("target_size_mb");
    }
    if options.subtitles.burn.is_some() {
        fields.push("subtitles.burn");
    }
    fields
}
