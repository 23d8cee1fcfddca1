//! Encoder selection for re-encoded video

use tracing::debug;

use crate::domain::errors::PlanError;
use crate::domain::model::{EncoderPreference, EngineCapabilities, VideoCodec};
use crate::domain::options::VideoOptions;
use crate::domain::plan::EncoderChoice;

/// Codec used when neither a codec nor an explicit encoder is given
pub const DEFAULT_VIDEO_CODEC: VideoCodec = VideoCodec::H264;

/// Pick the encoder for a re-encode; copy plans never get here
pub fn select_encoder(
    video: &VideoOptions,
    capabilities: &EngineCapabilities,
) -> Result<EncoderChoice, PlanError> {
    let codec = match (video.codec, video.encoder) {
        (Some(codec), _) => codec,
        (None, EncoderPreference::Explicit(encoder)) => encoder.codec(),
        (None, EncoderPreference::Auto) => DEFAULT_VIDEO_CODEC,
    };

    let encoder = match video.encoder {
        EncoderPreference::Explicit(encoder) => {
            if encoder.codec() != codec {
                return Err(PlanError::IncompatibleEncoder { encoder, codec });
            }
            if !capabilities.supports(encoder) {
                return Err(PlanError::EncoderUnavailable { encoder });
            }
            encoder
        }
        EncoderPreference::Auto => codec
            .hardware_encoder()
            .filter(|hw| capabilities.supports(*hw))
            .unwrap_or_else(|| codec.software_encoder()),
    };

    debug!("Selected encoder {} for {}", encoder, codec);
    Ok(EncoderChoice::new(encoder))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Encoder;

    fn with_nvenc() -> EngineCapabilities {
        EngineCapabilities {
            hardware_encoders: vec![Encoder::H264Nvenc, Encoder::HevcNvenc],
            libplacebo: false,
        }
    }

    fn options(codec: Option<VideoCodec>, encoder: EncoderPreference) -> VideoOptions {
        VideoOptions {
            codec,
            encoder,
            ..VideoOptions::default()
        }
    }

    #[test]
    fn test_defaults_to_h264_software() {
        let choice = select_encoder(&VideoOptions::default(), &EngineCapabilities::software_only()).unwrap();
        assert_eq!(choice.encoder, Encoder::X264);
        assert!(!choice.hardware);
    }

    #[test]
    fn test_auto_prefers_hardware_when_available() {
        let choice = select_encoder(&options(Some(VideoCodec::Hevc), EncoderPreference::Auto), &with_nvenc()).unwrap();
        assert_eq!(choice.encoder, Encoder::HevcNvenc);
        assert!(choice.hardware);
    }

    #[test]
    fn test_auto_av1_and_vp9_stay_software() {
        let av1 = select_encoder(&options(Some(VideoCodec::Av1), EncoderPreference::Auto), &with_nvenc()).unwrap();
        let vp9 = select_encoder(&options(Some(VideoCodec::Vp9), EncoderPreference::Auto), &with_nvenc()).unwrap();
        assert_eq!(av1.encoder, Encoder::SvtAv1);
        assert_eq!(vp9.encoder, Encoder::Vp9);
    }

    #[test]
    fn test_explicit_encoder_implies_codec() {
        let choice = select_encoder(
            &options(None, EncoderPreference::Explicit(Encoder::X265)),
            &EngineCapabilities::software_only(),
        )
        .unwrap();
        assert_eq!(choice.encoder.codec(), VideoCodec::Hevc);
    }

    #[test]
    fn test_explicit_encoder_must_match_codec() {
        let err = select_encoder(
            &options(Some(VideoCodec::H264), EncoderPreference::Explicit(Encoder::X265)),
            &EngineCapabilities::software_only(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            PlanError::IncompatibleEncoder {
                encoder: Encoder::X265,
                codec: VideoCodec::H264
            }
        );
    }

    #[test]
    fn test_explicit_hardware_requires_capability() {
        let err = select_encoder(
            &options(None, EncoderPreference::Explicit(Encoder::H264Nvenc)),
            &EngineCapabilities::software_only(),
        )
        .unwrap_err();
        assert!(matches!(err, PlanError::EncoderUnavailable { .. }));
    }
}
