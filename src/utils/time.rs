//! Time parsing and formatting utilities

use crate::error::{ClipPlanError, ClipPlanResult};

/// Time parser for various time formats
pub struct TimeParser;

impl TimeParser {
    /// Create a new time parser
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self
    }
}

impl Default for TimeParser {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeParser {
    /// Parse `SS[.ms]`, `MM:SS[.ms]`, `HH:MM:SS[.ms]` or unit forms like `1m20s`
    pub fn parse_time(&self, time_str: &str) -> ClipPlanResult<f64> {
        let time_str = time_str.trim();
        let invalid = || ClipPlanError::InvalidTimeFormat {
            time: time_str.to_string(),
        };

        if time_str.is_empty() {
            return Err(invalid());
        }

        // Plain seconds
        if let Ok(seconds) = time_str.parse::<f64>() {
            return if seconds.is_finite() && seconds >= 0.0 {
                Ok(seconds)
            } else {
                Err(invalid())
            };
        }

        if time_str.contains(':') {
            return self.parse_clock(time_str).ok_or_else(invalid);
        }

        self.parse_units(time_str).ok_or_else(invalid)
    }

    /// `MM:SS.ms` or `HH:MM:SS.ms`; minutes and seconds must stay below 60
    fn parse_clock(&self, time_str: &str) -> Option<f64> {
        let parts: Vec<&str> = time_str.split(':').collect();
        let (hours, minutes, seconds) = match parts.as_slice() {
            [m, s] => (0u64, m.parse::<u64>().ok()?, s.parse::<f64>().ok()?),
            [h, m, s] => (
                h.parse::<u64>().ok()?,
                m.parse::<u64>().ok()?,
                s.parse::<f64>().ok()?,
            ),
            _ => return None,
        };

        if parts.len() == 3 && minutes >= 60 {
            return None;
        }
        if !seconds.is_finite() || !(0.0..60.0).contains(&seconds) {
            return None;
        }

        Some((hours * 3600 + minutes * 60) as f64 + seconds)
    }

    /// `1h2m3.5s`, `90s`, `2m`
    fn parse_units(&self, time_str: &str) -> Option<f64> {
        let mut total = 0.0;
        let mut number = String::new();
        let mut seen_unit = false;

        for c in time_str.chars() {
            match c {
                '0'..='9' | '.' => number.push(c),
                'h' | 'm' | 's' => {
                    let value: f64 = number.parse().ok()?;
                    let scale = match c {
                        'h' => 3600.0,
                        'm' => 60.0,
                        _ => 1.0,
                    };
                    total += value * scale;
                    number.clear();
                    seen_unit = true;
                }
                _ => return None,
            }
        }

        if !number.is_empty() || !seen_unit {
            return None;
        }
        Some(total)
    }
}

/// Format seconds as `HH:MM:SS.mmm`, rounded to the millisecond
pub fn format_timestamp(seconds: f64) -> String {
    let total_ms = (seconds.max(0.0) * 1000.0).round() as u64;
    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let secs = (total_ms % 60_000) / 1000;
    let millis = total_ms % 1000;
    format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, secs, millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seconds() {
        let parser = TimeParser::new();
        assert_eq!(parser.parse_time("90").unwrap(), 90.0);
        assert_eq!(parser.parse_time("12.5").unwrap(), 12.5);
    }

    #[test]
    fn test_parse_clock_forms() {
        let parser = TimeParser::new();
        assert_eq!(parser.parse_time("01:30.5").unwrap(), 90.5);
        assert_eq!(parser.parse_time("01:02:03.456").unwrap(), 3723.456);
    }

    #[test]
    fn test_parse_unit_forms() {
        let parser = TimeParser::new();
        assert_eq!(parser.parse_time("1m11s").unwrap(), 71.0);
        assert_eq!(parser.parse_time("90s").unwrap(), 90.0);
        assert_eq!(parser.parse_time("1h").unwrap(), 3600.0);
    }

    #[test]
    fn test_parse_invalid() {
        let parser = TimeParser::new();
        assert!(parser.parse_time("").is_err());
        assert!(parser.parse_time("abc").is_err());
        assert!(parser.parse_time("-10").is_err());
        assert!(parser.parse_time("00:60").is_err());
        assert!(parser.parse_time("01:60:00").is_err());
        assert!(parser.parse_time("5x").is_err());
        assert!(parser.parse_time("12").is_ok());
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0.0), "00:00:00.000");
        assert_eq!(format_timestamp(90.0), "00:01:30.000");
        assert_eq!(format_timestamp(3723.4567), "01:02:03.457");
        assert_eq!(format_timestamp(71.0), "00:01:11.000");
    }
}
