use clipplan_cli::domain::model::*;
use clipplan_cli::domain::options::{Options, TimeSelection};
use clipplan_cli::domain::plan::{AudioAction, FilterStage, SubtitleAction, TonemapMethod, VideoAction};
use clipplan_cli::emitter::{CommandEmitter, EmitContext, Stage};
use clipplan_cli::*;

/// Test utilities for planning scenarios
mod test_utils {
    use super::*;

    /// 10 minute 1080p source with stereo AAC and two text subtitle tracks
    pub fn source() -> SourceMetadata {
        SourceMetadata::new(
            "matroska,webm",
            600.0,
            vec![VideoStreamInfo::new(0, "h264", 1920, 1080, 23.976).unwrap()],
            vec![AudioStreamInfo::new(1, "aac", 2).unwrap().with_bitrate_kbps(Some(160))],
            vec![
                SubtitleStreamInfo::new(2, "subrip").with_language(Some("eng".into())),
                SubtitleStreamInfo::new(3, "hdmv_pgs_subtitle"),
            ],
        )
        .unwrap()
    }

    pub fn hdr_source() -> SourceMetadata {
        let mut metadata = source();
        metadata.video_streams[0] = VideoStreamInfo::new(0, "hevc", 3840, 2160, 23.976)
            .unwrap()
            .with_color(Some("bt2020".into()), Some("smpte2084".into()));
        metadata
    }

    /// 90 s start, 71 s long, 10 MB
    pub fn clip_options() -> Options {
        Options {
            time: TimeSelection::new(Some(90.0), None, Some(71.0)),
            target_size_mb: Some(10.0),
            ..Options::default()
        }
    }

    pub fn builder() -> EncodePlanBuilder {
        EncodePlanBuilder::new(BitratePolicy::default(), EngineCapabilities::software_only())
    }
}

use test_utils::*;

#[test]
fn test_size_target_worked_example() {
    let plan = builder().plan(&source(), &clip_options()).unwrap();

    assert_eq!(plan.clip_start, 90.0);
    assert_eq!(plan.clip_end, 161.0);
    assert!(plan.trimmed);
    assert!(plan.is_two_pass());

    let bitrate = plan.bitrate.as_ref().unwrap();
    assert_eq!(bitrate.audio_bps, 128_000);
    assert_eq!(bitrate.video_bps, 976_225);

    match &plan.video {
        VideoAction::Encode(encode) => {
            assert_eq!(encode.encoder.encoder, Encoder::X264);
            assert!(!encode.encoder.hardware);
            assert_eq!(encode.target_bitrate_kbps, 976);
            assert_eq!(encode.pass_count, 2);
            assert!(encode.filters.is_empty());
        }
        other => panic!("expected an encode, got {:?}", other),
    }
    assert!(!plan.rationale.is_empty());
}

#[test]
fn test_copy_with_codec_conflicts() {
    let mut options = Options::default();
    options.video.copy = true;
    options.video.codec = Some(VideoCodec::Hevc);

    match builder().plan(&source(), &options) {
        Err(PlanError::ConflictingModeOptions { fields }) => {
            assert_eq!(fields, vec!["video.codec"]);
        }
        other => panic!("expected ConflictingModeOptions, got {:?}", other),
    }
}

#[test]
fn test_tiny_target_is_rejected() {
    let options = Options {
        target_size_mb: Some(0.1),
        ..Options::default()
    };
    assert!(matches!(
        builder().plan(&source(), &options),
        Err(PlanError::TargetSizeTooSmall { .. })
    ));
}

#[test]
fn test_missing_burn_index() {
    let mut options = clip_options();
    options.subtitles.burn = Some(2);
    assert_eq!(
        builder().plan(&source(), &options),
        Err(PlanError::SubtitleIndexNotFound {
            ordinal: 2,
            available: 2
        })
    );
}

#[test]
fn test_bitrate_grows_with_target_size() {
    let mut previous = 0;
    for size in [5.0, 7.5, 10.0, 25.0, 50.0, 200.0] {
        let options = Options {
            target_size_mb: Some(size),
            ..clip_options()
        };
        let plan = builder().plan(&source(), &options).unwrap();
        let video_bps = plan.bitrate.unwrap().video_bps;
        assert!(video_bps >= previous, "{} MB gave {} bps", size, video_bps);
        previous = video_bps;
    }
}

#[test]
fn test_tonemap_only_for_hdr() {
    let sdr = builder().plan(&source(), &clip_options()).unwrap();
    let hdr = builder().plan(&hdr_source(), &clip_options()).unwrap();

    let stages = |plan: &EncodePlan| match &plan.video {
        VideoAction::Encode(encode) => encode.filters.clone(),
        VideoAction::Copy { .. } => vec![],
    };
    assert!(!stages(&sdr)
        .iter()
        .any(|s| matches!(s, FilterStage::Tonemap { .. })));
    assert_eq!(
        stages(&hdr),
        vec![FilterStage::Tonemap {
            method: TonemapMethod::Zscale
        }]
    );
}

#[test]
fn test_copied_hdr_is_not_tonemapped() {
    let mut options = Options::default();
    options.video.copy = true;
    let plan = builder().plan(&hdr_source(), &options).unwrap();
    assert!(matches!(plan.video, VideoAction::Copy { .. }));
    assert!(plan.bitrate.is_none());
    assert!(!plan.is_two_pass());
}

#[test]
fn test_hardware_encoder_when_available() {
    let capabilities = EngineCapabilities {
        hardware_encoders: vec![Encoder::H264Nvenc],
        libplacebo: false,
    };
    let plan = EncodePlanBuilder::new(BitratePolicy::default(), capabilities)
        .plan(&source(), &clip_options())
        .unwrap();

    match plan.video {
        VideoAction::Encode(encode) => {
            assert_eq!(encode.encoder.encoder, Encoder::H264Nvenc);
            assert!(encode.encoder.hardware);
        }
        other => panic!("expected an encode, got {:?}", other),
    }
}

#[test]
fn test_unavailable_explicit_encoder() {
    let mut options = clip_options();
    options.video.encoder = EncoderPreference::Explicit(Encoder::HevcNvenc);
    assert_eq!(
        builder().plan(&source(), &options),
        Err(PlanError::EncoderUnavailable {
            encoder: Encoder::HevcNvenc
        })
    );
}

#[test]
fn test_webm_rejects_h264() {
    let mut options = clip_options();
    options.container = Container::Webm;
    assert!(matches!(
        builder().plan(&source(), &options),
        Err(PlanError::UnsupportedContainerCodec { .. })
    ));
}

#[test]
fn test_no_video_stream() {
    let mut metadata = source();
    metadata.video_streams.clear();
    assert_eq!(
        builder().plan(&metadata, &clip_options()),
        Err(PlanError::NoVideoStream)
    );
}

#[test]
fn test_mp4_mux_drops_graphic_track_with_warning() {
    let mut options = clip_options();
    options.subtitles.include = true;
    let plan = builder().plan(&source(), &options).unwrap();

    assert_eq!(plan.subtitles.action(), SubtitleAction::MuxTracks(vec![0]));
    assert_eq!(plan.subtitles.mux, vec![0]);
    assert_eq!(plan.warnings.len(), 1);
    assert!(matches!(
        plan.warnings[0],
        PlanWarning::UnsupportedContainerTrack { ordinal: 1, .. }
    ));
}

#[test]
fn test_audio_drop_frees_budget() {
    let mut options = clip_options();
    options.audio.include = false;
    let plan = builder().plan(&source(), &options).unwrap();

    assert_eq!(plan.audio, AudioAction::Drop);
    assert_eq!(plan.bitrate.unwrap().video_bps, 1_104_225);
}

#[test]
fn test_plan_through_emitter() {
    let plan = builder().plan(&source(), &clip_options()).unwrap();
    let ctx = EmitContext::new("/media/movie.mkv", "/media/out.mp4", "/tmp", "run1");
    let emitted = CommandEmitter::new().emit(&plan, &ctx);

    assert_eq!(emitted.stages(), vec![Stage::FirstPass, Stage::FinalPass]);
    let last = &emitted.command(Stage::FinalPass).unwrap().args;
    assert_eq!(last.last().map(String::as_str), Some("/media/out.mp4"));
    assert!(last.iter().any(|a| a == "976k"));
}

#[test]
fn test_planning_is_deterministic() {
    let first = builder().plan(&hdr_source(), &clip_options()).unwrap();
    let second = builder().plan(&hdr_source(), &clip_options()).unwrap();
    assert_eq!(first, second);
}
