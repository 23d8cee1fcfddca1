//! Size-targeted bitrate allocation

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::errors::PlanError;
use crate::domain::plan::{AudioAction, BitrateAllocation};

const BASIS_POINTS: u64 = 10_000;

/// Tunable constants for allocation and audio defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BitratePolicy {
    /// Share of the target reserved for container overhead, in basis points
    pub overhead_margin_bp: u32,
    /// Smallest video bitrate worth encoding
    pub min_video_bps: u64,
    /// Assumed rate for copied audio with no reported bitrate
    pub fallback_audio_kbps: u32,
    pub default_target_size_mb: f64,
    pub default_audio_kbps: u32,
}

impl Default for BitratePolicy {
    fn default() -> Self {
        Self {
            overhead_margin_bp: 200,
            min_video_bps: 50_000,
            fallback_audio_kbps: 128,
            default_target_size_mb: 10.0,
            default_audio_kbps: 128,
        }
    }
}

/// Bits per second the audio stream will consume
pub fn audio_budget_bps(audio: &AudioAction) -> u64 {
    match audio {
        AudioAction::Copy { budget_kbps } => u64::from(*budget_kbps) * 1000,
        AudioAction::Encode { bitrate_kbps, .. } => u64::from(*bitrate_kbps) * 1000,
        AudioAction::Drop => 0,
    }
}

/// Split a size budget into a video bitrate; integer math throughout
pub fn allocate(
    target_size_mb: f64,
    duration_seconds: f64,
    audio_bps: u64,
    policy: &BitratePolicy,
) -> Result<BitrateAllocation, PlanError> {
    let target_bits = (target_size_mb * 8_000_000.0).round() as u64;
    let duration_ms = ((duration_seconds * 1000.0).round() as u64).max(1);

    let margin = u64::from(policy.overhead_margin_bp).min(BASIS_POINTS);
    let usable_bits = saturate(
        u128::from(target_bits) * u128::from(BASIS_POINTS - margin) / u128::from(BASIS_POINTS),
    );
    let total_bps = saturate(u128::from(usable_bits) * 1000 / u128::from(duration_ms));

    let video_bps = i128::from(total_bps) - i128::from(audio_bps);

    debug!(
        "Allocation: target {} bits, usable {} bits over {} ms, total {} bps, audio {} bps, video {} bps",
        target_bits, usable_bits, duration_ms, total_bps, audio_bps, video_bps
    );

    if video_bps < i128::from(policy.min_video_bps) {
        return Err(PlanError::TargetSizeTooSmall {
            target_size_mb,
            duration_seconds,
            video_bps: i64::try_from(video_bps).unwrap_or(i64::MIN),
            min_video_bps: policy.min_video_bps,
        });
    }

    Ok(BitrateAllocation {
        target_bits,
        usable_bits,
        duration_ms,
        audio_bps,
        video_bps: u64::try_from(video_bps).unwrap_or(u64::MAX),
    })
}

fn saturate(value: u128) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}
