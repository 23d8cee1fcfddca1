// Inspect interactor - Orchestrates media file inspection use case

use std::fmt::Write as _;
use std::sync::Arc;

use tracing::info;

use crate::domain::model::*;
use crate::error::{ClipPlanError, ClipPlanResult};
use crate::ports::*;

/// Summary layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InspectFormat {
    #[default]
    Text,
    Json,
}

/// Interactor for media file inspection use case
pub struct InspectInteractor {
    probe_port: Arc<dyn ProbePort>,
    capability_port: Arc<dyn CapabilityPort>,
}

impl InspectInteractor {
    /// Create new inspect interactor with injected ports
    pub fn new(probe_port: Arc<dyn ProbePort>, capability_port: Arc<dyn CapabilityPort>) -> Self {
        Self {
            probe_port,
            capability_port,
        }
    }

    /// Execute media file inspection
    pub fn execute(&self, request: InspectRequest) -> ClipPlanResult<InspectResponse> {
        info!("Starting media file inspection for: {}", request.probe_path);

        let metadata = self.probe_port.probe_media(&request.probe_path)?;
        info!(
            "Media file probed successfully: {} streams",
            metadata.total_streams()
        );

        let summary = match request.format {
            InspectFormat::Json => serde_json::to_string_pretty(&metadata).map_err(|e| {
                ClipPlanError::OutputError {
                    message: format!("JSON serialization failed: {}", e),
                }
            })?,
            InspectFormat::Text => self.format_as_text(&metadata),
        };

        Ok(InspectResponse { metadata, summary })
    }

    /// Format metadata as human-readable text
    fn format_as_text(&self, metadata: &SourceMetadata) -> String {
        let capabilities = self.capability_port.capabilities();
        let mut output = String::new();

        let _ = writeln!(output, "Media File Information:");
        let _ = writeln!(output, "  Container: {}", metadata.container);
        let _ = writeln!(output, "  Duration: {:.3}s", metadata.duration_seconds);
        let _ = writeln!(output, "  Total Streams: {}", metadata.total_streams());

        if !metadata.video_streams.is_empty() {
            let _ = writeln!(output, "\nVideo Streams ({}):", metadata.video_streams.len());
            for stream in &metadata.video_streams {
                let _ = writeln!(
                    output,
                    "  Stream #{}: {}x{} @ {:.3}fps, {}{}",
                    stream.index,
                    stream.width,
                    stream.height,
                    stream.frame_rate,
                    stream.codec,
                    if stream.is_hdr() { ", HDR" } else { "" }
                );
            }
        }

        if !metadata.audio_streams.is_empty() {
            let _ = writeln!(output, "\nAudio Streams ({}):", metadata.audio_streams.len());
            for stream in &metadata.audio_streams {
                let _ = writeln!(
                    output,
                    "  Stream #{}: {} channels, {}, {}",
                    stream.index,
                    stream.channels,
                    stream
                        .bitrate_kbps
                        .map(|k| format!("{} kbps", k))
                        .unwrap_or_else(|| "unknown bitrate".to_string()),
                    stream.codec
                );
            }
        }

        if !metadata.subtitle_streams.is_empty() {
            let _ = writeln!(
                output,
                "\nSubtitle Streams ({}):",
                metadata.subtitle_streams.len()
            );
            for (ordinal, stream) in metadata.subtitle_streams.iter().enumerate() {
                let _ = writeln!(
                    output,
                    "  Burn index {}: {} ({}){}",
                    ordinal,
                    stream.label(),
                    if stream.is_text_based { "text" } else { "graphic" },
                    stream
                        .title
                        .as_deref()
                        .map(|t| format!(" \"{}\"", t))
                        .unwrap_or_default()
                );
            }
        }

        let hardware: Vec<&str> = capabilities
            .hardware_encoders
            .iter()
            .map(|e| e.as_str())
            .collect();
        let _ = writeln!(output, "\nEngine:");
        let _ = writeln!(
            output,
            "  Hardware encoders: {}",
            if hardware.is_empty() {
                "none".to_string()
            } else {
                hardware.join(", ")
            }
        );
        let _ = writeln!(
            output,
            "  Tonemapping: {}",
            if capabilities.libplacebo { "libplacebo" } else { "zscale" }
        );

        output
    }
}

/// Request for media file inspection
#[derive(Debug, Clone)]
pub struct InspectRequest {
    pub probe_path: String,
    pub format: InspectFormat,
}

impl InspectRequest {
    /// Create new inspect request
    pub fn new(probe_path: impl Into<String>) -> Self {
        Self {
            probe_path: probe_path.into(),
            format: InspectFormat::Text,
        }
    }

    /// Create new inspect request with format
    pub fn with_format(probe_path: impl Into<String>, format: InspectFormat) -> Self {
        Self {
            probe_path: probe_path.into(),
            format,
        }
    }
}

/// Response from media file inspection
#[derive(Debug, Clone)]
pub struct InspectResponse {
    pub metadata: SourceMetadata,
    pub summary: String,
}
