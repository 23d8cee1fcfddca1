//! Subtitle burn and mux strategy

use tracing::{info, warn};

use crate::domain::errors::{PlanError, PlanWarning};
use crate::domain::model::{Container, SourceMetadata, SubtitleFormat};
use crate::domain::options::{BurnMethod, SubtitleOptions};
use crate::domain::plan::{ResolvedBurnMethod, SubtitleBurn, SubtitlePlan};
use crate::domain::rules::{ContainerRules, SubtitleCarriage};

/// Resolve burn and mux choices; rationale and warnings are appended in place
pub fn resolve_subtitles(
    metadata: &SourceMetadata,
    options: &SubtitleOptions,
    container: Container,
    rationale: &mut Vec<String>,
    warnings: &mut Vec<PlanWarning>,
) -> Result<SubtitlePlan, PlanError> {
    let burn = match options.burn {
        Some(ordinal) => Some(resolve_burn(metadata, options, ordinal, rationale)?),
        None => None,
    };

    let mut plan = SubtitlePlan {
        burn,
        ..SubtitlePlan::default()
    };

    if options.include {
        for (ordinal, stream) in metadata.subtitle_streams.iter().enumerate() {
            match ContainerRules::subtitle_carriage(container, stream.format()) {
                SubtitleCarriage::Carried(action) => {
                    plan.mux.push(ordinal);
                    plan.mux_codec = Some(action);
                }
                SubtitleCarriage::Unsupported => {
                    warn!(
                        "Dropping subtitle {}: {} cannot carry {}",
                        stream.label(),
                        container,
                        stream.codec
                    );
                    rationale.push(format!(
                        "Subtitle stream {} ({}) left out: {} cannot carry it",
                        ordinal, stream.codec, container
                    ));
                    warnings.push(PlanWarning::UnsupportedContainerTrack {
                        ordinal,
                        codec: stream.codec.clone(),
                        container,
                    });
                }
            }
        }

        if !plan.mux.is_empty() {
            rationale.push(format!(
                "Muxing {} subtitle stream(s) into {}",
                plan.mux.len(),
                container
            ));
        }
    }

    Ok(plan)
}

fn resolve_burn(
    metadata: &SourceMetadata,
    options: &SubtitleOptions,
    ordinal: usize,
    rationale: &mut Vec<String>,
) -> Result<SubtitleBurn, PlanError> {
    let stream = metadata
        .subtitle_stream(ordinal)
        .ok_or(PlanError::SubtitleIndexNotFound {
            ordinal,
            available: metadata.subtitle_streams.len(),
        })?;

    let format = stream.format();
    let requested = options.burn_method.unwrap_or_default();
    let method = match (requested, format) {
        (BurnMethod::Extract, _) => ResolvedBurnMethod::Extract,
        (BurnMethod::Inline, SubtitleFormat::Graphic) => {
            return Err(PlanError::UnsupportedBurnMethod {
                ordinal,
                codec: stream.codec.clone(),
                method: BurnMethod::Inline.as_str(),
            });
        }
        (BurnMethod::Inline, _) => ResolvedBurnMethod::Inline,
        (BurnMethod::Auto, SubtitleFormat::PlainText) => ResolvedBurnMethod::Inline,
        (BurnMethod::Auto, SubtitleFormat::StyledText | SubtitleFormat::Graphic) => {
            ResolvedBurnMethod::Extract
        }
    };

    let delay_ms = options.delay_ms.unwrap_or(0);

    info!(
        "Burning subtitle {} via {:?} (delay {} ms)",
        stream.label(),
        method,
        delay_ms
    );
    rationale.push(match requested {
        BurnMethod::Auto => format!(
            "Burning subtitle stream {} ({}): auto picked {} for {:?} subtitles",
            ordinal,
            stream.codec,
            method_name(method),
            format
        ),
        _ => format!(
            "Burning subtitle stream {} ({}) with the {} method",
            ordinal,
            stream.codec,
            method_name(method)
        ),
    });
    if delay_ms != 0 {
        rationale.push(format!("Subtitle timing shifted by {} ms", delay_ms));
    }

    Ok(SubtitleBurn {
        ordinal,
        stream_index: stream.index,
        codec: stream.codec.clone(),
        format,
        method,
        delay_ms,
    })
}

fn method_name(method: ResolvedBurnMethod) -> &'static str {
    match method {
        ResolvedBurnMethod::Extract => "extract",
        ResolvedBurnMethod::Inline => "inline",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{SubtitleStreamInfo, VideoStreamInfo};
    use crate::domain::plan::{SubtitleAction, SubtitleCodecAction};

    fn metadata() -> SourceMetadata {
        SourceMetadata::new(
            "matroska,webm",
            120.0,
            vec![VideoStreamInfo::new(0, "h264", 1920, 1080, 24.0).unwrap()],
            vec![],
            vec![
                SubtitleStreamInfo::new(2, "subrip"),
                SubtitleStreamInfo::new(3, "ass"),
                SubtitleStreamInfo::new(4, "hdmv_pgs_subtitle"),
            ],
        )
        .unwrap()
    }

    fn resolve(options: SubtitleOptions, container: Container) -> (Result<SubtitlePlan, PlanError>, Vec<PlanWarning>) {
        let mut rationale = Vec::new();
        let mut warnings = Vec::new();
        let result = resolve_subtitles(&metadata(), &options, container, &mut rationale, &mut warnings);
        (result, warnings)
    }

    fn burn(ordinal: usize, method: Option<BurnMethod>) -> SubtitleOptions {
        SubtitleOptions {
            burn: Some(ordinal),
            burn_method: method,
            ..SubtitleOptions::default()
        }
    }

    #[test]
    fn test_auto_method_by_format() {
        let (plain, _) = resolve(burn(0, None), Container::Mp4);
        let (styled, _) = resolve(burn(1, None), Container::Mp4);
        let (graphic, _) = resolve(burn(2, Some(BurnMethod::Auto)), Container::Mp4);

        assert_eq!(plain.unwrap().burn.unwrap().method, ResolvedBurnMethod::Inline);
        assert_eq!(styled.unwrap().burn.unwrap().method, ResolvedBurnMethod::Extract);
        assert_eq!(graphic.unwrap().burn.unwrap().method, ResolvedBurnMethod::Extract);
    }

    #[test]
    fn test_inline_graphic_is_rejected() {
        let (result, _) = resolve(burn(2, Some(BurnMethod::Inline)), Container::Mkv);
        assert!(matches!(result, Err(PlanError::UnsupportedBurnMethod { ordinal: 2, .. })));
    }

    #[test]
    fn test_extract_handles_plain_text() {
        let (result, _) = resolve(burn(0, Some(BurnMethod::Extract)), Container::Mp4);
        assert_eq!(result.unwrap().burn.unwrap().method, ResolvedBurnMethod::Extract);
    }

    #[test]
    fn test_missing_ordinal() {
        let (result, _) = resolve(burn(3, None), Container::Mkv);
        assert_eq!(
            result.unwrap_err(),
            PlanError::SubtitleIndexNotFound {
                ordinal: 3,
                available: 3
            }
        );
    }

    #[test]
    fn test_mux_all_into_mkv() {
        let options = SubtitleOptions {
            include: true,
            ..SubtitleOptions::default()
        };
        let (result, warnings) = resolve(options, Container::Mkv);
        let plan = result.unwrap();
        assert_eq!(plan.mux, vec![0, 1, 2]);
        assert_eq!(plan.mux_codec, Some(SubtitleCodecAction::Copy));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_mp4_drops_graphic_with_warning() {
        let options = SubtitleOptions {
            include: true,
            ..SubtitleOptions::default()
        };
        let (result, warnings) = resolve(options, Container::Mp4);
        let plan = result.unwrap();
        assert_eq!(plan.mux, vec![0, 1]);
        assert_eq!(plan.mux_codec, Some(SubtitleCodecAction::MovText));
        assert_eq!(
            warnings,
            vec![PlanWarning::UnsupportedContainerTrack {
                ordinal: 2,
                codec: "hdmv_pgs_subtitle".into(),
                container: Container::Mp4,
            }]
        );
    }

    #[test]
    fn test_webm_carries_nothing() {
        let options = SubtitleOptions {
            include: true,
            ..SubtitleOptions::default()
        };
        let (result, warnings) = resolve(options, Container::Webm);
        assert!(result.unwrap().mux.is_empty());
        assert_eq!(warnings.len(), 3);
    }

    #[test]
    fn test_burned_track_not_muxed_without_include() {
        let (result, _) = resolve(burn(1, None), Container::Mkv);
        let plan = result.unwrap();
        assert!(plan.mux.is_empty());
        assert!(matches!(plan.action(), SubtitleAction::BurnExtracted { ordinal: 1, delay_ms: 0 }));
    }

    #[test]
    fn test_burn_and_mux_are_independent() {
        let options = SubtitleOptions {
            include: true,
            burn: Some(0),
            delay_ms: Some(500),
            ..SubtitleOptions::default()
        };
        let (result, _) = resolve(options, Container::Mkv);
        let plan = result.unwrap();
        assert_eq!(plan.burn.as_ref().map(|b| b.delay_ms), Some(500));
        assert!(plan.mux.contains(&0));
    }
}
