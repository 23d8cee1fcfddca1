//! Clip range resolution from any combination of start, end and duration

use tracing::debug;

use crate::domain::errors::PlanError;

/// Tolerance when checking start + duration against end
pub const TIME_EPSILON_SECONDS: f64 = 0.001;

/// A validated clip range inside the source
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedRange {
    pub start: f64,
    pub end: f64,
    pub trimmed: bool,
    /// The requested end ran past the source and was pulled back
    pub clamped: bool,
}

impl ResolvedRange {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Resolve the clip range; two given fields derive the third
pub fn resolve_time_range(
    start: Option<f64>,
    end: Option<f64>,
    duration: Option<f64>,
    source_duration: f64,
) -> Result<ResolvedRange, PlanError> {
    let trimmed = start.is_some() || end.is_some() || duration.is_some();

    let (clip_start, clip_end) = match (start, end, duration) {
        (None, None, None) => (0.0, source_duration),
        (Some(s), None, None) => (s, source_duration),
        (None, Some(e), None) => (0.0, e),
        (None, None, Some(d)) => (0.0, d),
        (Some(s), Some(e), None) => (s, e),
        (Some(s), None, Some(d)) => (s, s + d),
        (None, Some(e), Some(d)) => (e - d, e),
        (Some(s), Some(e), Some(d)) => {
            if (s + d - e).abs() > TIME_EPSILON_SECONDS {
                return Err(PlanError::ConflictingTimeRange {
                    start: s,
                    end: e,
                    duration: d,
                });
            }
            (s, e)
        }
    };

    if clip_start < 0.0 {
        return Err(PlanError::InvalidTimeRange {
            reason: format!("start {:.3}s is before the beginning of the source", clip_start),
        });
    }
    if clip_end <= clip_start {
        return Err(PlanError::InvalidTimeRange {
            reason: format!(
                "end {:.3}s must be after start {:.3}s",
                clip_end, clip_start
            ),
        });
    }
    if clip_start >= source_duration {
        return Err(PlanError::InvalidTimeRange {
            reason: format!(
                "start {:.3}s is at or past the source duration {:.3}s",
                clip_start, source_duration
            ),
        });
    }

    let clamped = clip_end > source_duration;
    let clip_end = clip_end.min(source_duration);

    // Whole milliseconds, matching the emitted `-t` and the bitrate math
    if ((clip_end - clip_start) * 1000.0).round() < 1.0 {
        return Err(PlanError::InvalidTimeRange {
            reason: format!(
                "clip {:.3}s - {:.3}s is shorter than a millisecond",
                clip_start, clip_end
            ),
        });
    }

    debug!(
        "Resolved clip range {:.3}s - {:.3}s (trimmed: {}, clamped: {})",
        clip_start, clip_end, trimmed, clamped
    );

    Ok(ResolvedRange {
        start: clip_start,
        end: clip_end,
        trimmed,
        clamped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: f64 = 600.0;

    fn resolve(s: Option<f64>, e: Option<f64>, d: Option<f64>) -> Result<ResolvedRange, PlanError> {
        resolve_time_range(s, e, d, SOURCE)
    }

    #[test]
    fn test_no_fields_selects_whole_source() {
        let range = resolve(None, None, None).unwrap();
        assert_eq!((range.start, range.end), (0.0, SOURCE));
        assert!(!range.trimmed);
    }

    #[test]
    fn test_single_fields() {
        let start_only = resolve(Some(30.0), None, None).unwrap();
        assert_eq!((start_only.start, start_only.end), (30.0, SOURCE));
        assert!(start_only.trimmed);

        let end_only = resolve(None, Some(45.0), None).unwrap();
        assert_eq!((end_only.start, end_only.end), (0.0, 45.0));

        let duration_only = resolve(None, None, Some(12.0)).unwrap();
        assert_eq!((duration_only.start, duration_only.end), (0.0, 12.0));
    }

    #[test]
    fn test_two_fields_derive_third() {
        let range = resolve(Some(90.0), None, Some(71.0)).unwrap();
        assert_eq!((range.start, range.end), (90.0, 161.0));

        let range = resolve(None, Some(100.0), Some(40.0)).unwrap();
        assert_eq!((range.start, range.end), (60.0, 100.0));
    }

    #[test]
    fn test_three_fields_must_agree() {
        assert!(resolve(Some(10.0), Some(20.0), Some(10.0)).is_ok());
        assert!(resolve(Some(10.0), Some(20.0005), Some(10.0)).is_ok());
        assert!(matches!(
            resolve(Some(10.0), Some(20.0), Some(5.0)),
            Err(PlanError::ConflictingTimeRange { .. })
        ));
    }

    #[test]
    fn test_invalid_ranges() {
        assert!(matches!(
            resolve(Some(-1.0), None, None),
            Err(PlanError::InvalidTimeRange { .. })
        ));
        assert!(matches!(
            resolve(Some(20.0), Some(20.0), None),
            Err(PlanError::InvalidTimeRange { .. })
        ));
        assert!(matches!(
            resolve(Some(SOURCE), None, Some(5.0)),
            Err(PlanError::InvalidTimeRange { .. })
        ));
        assert!(matches!(
            resolve(None, Some(30.0), Some(40.0)),
            Err(PlanError::InvalidTimeRange { .. })
        ));
    }

    #[test]
    fn test_start_end_pairs_do_not_drift() {
        for step in 0..2000u32 {
            let start = f64::from(step) * 0.2917;
            let end = start + 0.001 + f64::from(step % 37) * 1.013;
            if end > SOURCE {
                continue;
            }
            let range = resolve(Some(start), Some(end), None).unwrap();
            assert_eq!(range.start, start);
            assert_eq!(range.end, end);
        }
    }

    #[test]
    fn test_each_field_perturbed_past_tolerance() {
        let nudge = TIME_EPSILON_SECONDS * 2.0;
        for (s, e, d) in [
            (10.0 + nudge, 20.0, 10.0),
            (10.0 - nudge, 20.0, 10.0),
            (10.0, 20.0 + nudge, 10.0),
            (10.0, 20.0 - nudge, 10.0),
            (10.0, 20.0, 10.0 + nudge),
            (10.0, 20.0, 10.0 - nudge),
        ] {
            assert!(
                matches!(
                    resolve(Some(s), Some(e), Some(d)),
                    Err(PlanError::ConflictingTimeRange { .. })
                ),
                "({}, {}, {}) should conflict",
                s,
                e,
                d
            );
        }
    }

    #[test]
    fn test_sub_millisecond_clip_is_rejected() {
        assert!(matches!(
            resolve(Some(599.9996), None, None),
            Err(PlanError::InvalidTimeRange { .. })
        ));
        let range = resolve(Some(599.999), None, None).unwrap();
        assert_eq!(range.end, SOURCE);
    }

    #[test]
    fn test_end_past_source_is_clamped() {
        let range = resolve(Some(590.0), None, Some(30.0)).unwrap();
        assert_eq!(range.end, SOURCE);
        assert!(range.clamped);
        assert_eq!(range.duration(), 10.0);
    }
}
