//! Filter expression rendering for the video chain

use crate::domain::plan::{FilterStage, TonemapMethod};

pub const TONEMAP_ZSCALE: &str =
    "zscale=t=linear:npl=100,tonemap=tonemap=hable,zscale=t=bt709:m=bt709:r=tv";

pub const TONEMAP_LIBPLACEBO: &str =
    "libplacebo=tonemapping=bt.2446a:colorspace=bt709:color_trc=bt709:color_primaries=bt709";

/// Rendered video filters, either a plain `-vf` chain or a two-input overlay graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoFilters {
    None,
    Chain(String),
    /// Output is labelled `[vout]`
    Complex(String),
}

/// How the burn stage renders
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BurnRender {
    /// `subtitles` filter expression, already escaped
    Filter(String),
    /// Bitmap subtitles arriving as input 1
    Overlay,
}

/// Render one non-burn stage
pub fn render_stage(stage: &FilterStage) -> Option<String> {
    match stage {
        FilterStage::Tonemap {
            method: TonemapMethod::Zscale,
        } => Some(TONEMAP_ZSCALE.to_string()),
        FilterStage::Tonemap {
            method: TonemapMethod::Libplacebo,
        } => Some(TONEMAP_LIBPLACEBO.to_string()),
        FilterStage::Scale { height } => Some(format!("scale=-2:{}", height)),
        FilterStage::BurnSubtitles => None,
    }
}

/// Render the ordered stages; `burn` is required when the stages include a burn
pub fn render(stages: &[FilterStage], video_index: usize, burn: Option<&BurnRender>) -> VideoFilters {
    if stages.is_empty() {
        return VideoFilters::None;
    }

    let burn_at = stages
        .iter()
        .position(|s| matches!(s, FilterStage::BurnSubtitles));

    match (burn_at, burn) {
        (Some(at), Some(BurnRender::Overlay)) => {
            let pre: Vec<String> = stages[..at].iter().filter_map(render_stage).collect();
            let post: Vec<String> = stages[at + 1..].iter().filter_map(render_stage).collect();
            VideoFilters::Complex(overlay_graph(video_index, &pre, &post))
        }
        (Some(_), Some(BurnRender::Filter(expr))) => {
            let chain: Vec<String> = stages
                .iter()
                .map(|s| render_stage(s).unwrap_or_else(|| expr.clone()))
                .collect();
            VideoFilters::Chain(chain.join(","))
        }
        _ => {
            let chain: Vec<String> = stages.iter().filter_map(render_stage).collect();
            if chain.is_empty() {
                VideoFilters::None
            } else {
                VideoFilters::Chain(chain.join(","))
            }
        }
    }
}

fn overlay_graph(video_index: usize, pre: &[String], post: &[String]) -> String {
    let mut parts = Vec::new();
    let mut label = format!("0:{}", video_index);

    if !pre.is_empty() {
        parts.push(format!("[{}]{}[base]", label, pre.join(",")));
        label = "base".to_string();
    }

    if post.is_empty() {
        parts.push(format!("[{}][1:s:0]overlay[vout]", label));
    } else {
        parts.push(format!("[{}][1:s:0]overlay[burned]", label));
        parts.push(format!("[burned]{}[vout]", post.join(",")));
    }

    parts.join(";")
}

/// Inline burn from the source; timestamps are moved onto the source timeline and back
pub fn inline_subtitles(escaped_source: &str, ordinal: usize, offset_seconds: f64) -> String {
    let filter = format!("subtitles='{}':si={}", escaped_source, ordinal);
    let offset_ms = (offset_seconds * 1000.0).round() as i64;
    if offset_ms == 0 {
        return filter;
    }

    let sign = if offset_ms < 0 { '-' } else { '+' };
    let abs = offset_ms.unsigned_abs();
    format!(
        "setpts=PTS{}{}.{:03}/TB,{},setpts=PTS-STARTPTS",
        sign,
        abs / 1000,
        abs % 1000,
        filter
    )
}

/// Burn from an extracted text file
pub fn extracted_subtitles(escaped_path: &str) -> String {
    format!("subtitles='{}'", escaped_path)
}
