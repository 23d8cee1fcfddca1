// Domain options - Resolved user intent handed to the plan builder

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::errors::OptionsError;
use crate::domain::model::{Container, EncoderPreference, Resolution, VideoCodec};

/// Largest subtitle delay accepted in either direction, in milliseconds
pub const MAX_SUBTITLE_DELAY_MS: i64 = 10_000;

/// Optional start/end/duration triple, all in seconds
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TimeSelection {
    pub start: Option<f64>,
    pub end: Option<f64>,
    pub duration: Option<f64>,
}

impl TimeSelection {
    pub fn new(start: Option<f64>, end: Option<f64>, duration: Option<f64>) -> Self {
        Self { start, end, duration }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct VideoOptions {
    pub copy: bool,
    pub codec: Option<VideoCodec>,
    pub encoder: EncoderPreference,
    pub resolution: Option<Resolution>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AudioOptions {
    pub include: bool,
    pub copy: bool,
    pub downmix_to_stereo: bool,
    pub kbps: Option<u32>,
}

impl Default for AudioOptions {
    fn default() -> Self {
        Self {
            include: true,
            copy: false,
            downmix_to_stereo: false,
            kbps: None,
        }
    }
}

/// How a burned subtitle reaches the frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BurnMethod {
    #[default]
    Auto,
    /// Extract the track to a scratch file first, then render it
    Extract,
    /// Render straight from the source file
    Inline,
}

impl BurnMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            BurnMethod::Auto => "auto",
            BurnMethod::Extract => "extract",
            BurnMethod::Inline => "inline",
        }
    }
}

impl fmt::Display for BurnMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BurnMethod {
    type Err = OptionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(BurnMethod::Auto),
            "extract" => Ok(BurnMethod::Extract),
            "inline" => Ok(BurnMethod::Inline),
            other => Err(OptionsError::InvalidValue {
                field: "subtitles.burn_method",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SubtitleOptions {
    pub include: bool,
    /// Ordinal within the source subtitle streams
    pub burn: Option<usize>,
    pub burn_method: Option<BurnMethod>,
    /// Positive values show subtitles later
    pub delay_ms: Option<i64>,
}

/// Flags for the surrounding shell; the builder ignores them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RuntimeFlags {
    pub dry_run: bool,
    pub verbosity: u8,
}

/// Fully resolved clipping options
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Options {
    pub time: TimeSelection,
    pub container: Container,
    pub video: VideoOptions,
    pub audio: AudioOptions,
    pub subtitles: SubtitleOptions,
    pub target_size_mb: Option<f64>,
    pub runtime: RuntimeFlags,
}

impl Options {
    /// Field-level checks; cross-field rules are left to the plan builder
    pub fn validate(&self) -> Result<(), OptionsError> {
        for (field, value) in [
            ("time.start", self.time.start),
            ("time.end", self.time.end),
            ("time.duration", self.time.duration),
        ] {
            if let Some(v) = value {
                if !v.is_finite() {
                    return Err(OptionsError::OutOfRange {
                        field,
                        value: v.to_string(),
                        expected: "a finite number of seconds",
                    });
                }
            }
        }

        if let Some(size) = self.target_size_mb {
            if !size.is_finite() || size <= 0.0 {
                return Err(OptionsError::OutOfRange {
                    field: "target_size_mb",
                    value: size.to_string(),
                    expected: "a positive size in MB",
                });
            }
        }

        if self.audio.kbps == Some(0) {
            return Err(OptionsError::OutOfRange {
                field: "audio.kbps",
                value: "0".to_string(),
                expected: "a positive bitrate",
            });
        }

        if let Some(delay) = self.subtitles.delay_ms {
            if delay.abs() > MAX_SUBTITLE_DELAY_MS {
                return Err(OptionsError::OutOfRange {
                    field: "subtitles.delay_ms",
                    value: delay.to_string(),
                    expected: "-10000..=10000 ms",
                });
            }
        }

        if self.subtitles.burn.is_none() {
            if self.subtitles.burn_method.is_some() {
                return Err(OptionsError::RequiresBurn {
                    field: "subtitles.burn_method",
                });
            }
            if self.subtitles.delay_ms.is_some() {
                return Err(OptionsError::RequiresBurn {
                    field: "subtitles.delay_ms",
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let options = Options::default();
        assert!(options.validate().is_ok());
        assert!(options.audio.include);
        assert!(!options.subtitles.include);
        assert_eq!(options.time, TimeSelection::default());
    }

    #[test]
    fn test_rejects_non_positive_target_size() {
        let options = Options {
            target_size_mb: Some(0.0),
            ..Options::default()
        };
        assert!(matches!(
            options.validate(),
            Err(OptionsError::OutOfRange { field: "target_size_mb", .. })
        ));
    }

    #[test]
    fn test_rejects_zero_audio_bitrate() {
        let mut options = Options::default();
        options.audio.kbps = Some(0);
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_delay_bounds() {
        let mut options = Options::default();
        options.subtitles.burn = Some(0);
        options.subtitles.delay_ms = Some(-10_000);
        assert!(options.validate().is_ok());

        options.subtitles.delay_ms = Some(10_001);
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_burn_fields_require_burn() {
        let mut options = Options::default();
        options.subtitles.burn_method = Some(BurnMethod::Inline);
        assert_eq!(
            options.validate(),
            Err(OptionsError::RequiresBurn {
                field: "subtitles.burn_method"
            })
        );

        options.subtitles.burn_method = None;
        options.subtitles.delay_ms = Some(250);
        assert_eq!(
            options.validate(),
            Err(OptionsError::RequiresBurn {
                field: "subtitles.delay_ms"
            })
        );
    }

    #[test]
    fn test_rejects_non_finite_time() {
        let mut options = Options::default();
        options.time.start = Some(f64::INFINITY);
        assert!(options.validate().is_err());
    }
}
