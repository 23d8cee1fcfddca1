//! Video filter chain decisions: tonemap, subtitle burn, scale

use tracing::info;

use crate::domain::model::{EngineCapabilities, Resolution, VideoStreamInfo};
use crate::domain::plan::{FilterStage, TonemapMethod};

/// Build the ordered filter list for a re-encode
pub fn build_filters(
    video: &VideoStreamInfo,
    resolution: Option<Resolution>,
    burn_subtitles: bool,
    capabilities: &EngineCapabilities,
    rationale: &mut Vec<String>,
) -> Vec<FilterStage> {
    let mut filters = Vec::new();

    if video.is_hdr() {
        let method = if capabilities.libplacebo {
            TonemapMethod::Libplacebo
        } else {
            TonemapMethod::Zscale
        };
        info!(
            "HDR source ({}), tonemapping with {:?}",
            video.color_transfer.as_deref().unwrap_or("unknown"),
            method
        );
        rationale.push(format!(
            "Source is HDR ({}); tonemapping to SDR BT.709 with {}",
            video.color_transfer.as_deref().unwrap_or("unknown"),
            match method {
                TonemapMethod::Libplacebo => "libplacebo",
                TonemapMethod::Zscale => "zscale + hable",
            }
        ));
        filters.push(FilterStage::Tonemap { method });
    }

    if burn_subtitles {
        filters.push(FilterStage::BurnSubtitles);
    }

    if let Some(height) = resolution.and_then(|r| r.height()) {
        if height != video.height {
            rationale.push(format!("Scaling from {}p to {}p", video.height, height));
            filters.push(FilterStage::Scale { height });
        }
    }

    filters
}
