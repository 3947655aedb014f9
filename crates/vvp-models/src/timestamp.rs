//! Timestamp and duration parsing.
//!
//! Handles the clock formats that appear in AI responses and comments
//! (`HH:MM:SS`, `MM:SS`, `SS`, with optional milliseconds) and the ISO 8601
//! durations the YouTube Data API reports (`PT1H2M3S`).

/// Parse a clock timestamp string to total seconds.
///
/// # Examples
/// ```
/// use vvp_models::timestamp::parse_timestamp;
/// assert_eq!(parse_timestamp("01:30:00").unwrap(), 5400.0);
/// assert_eq!(parse_timestamp("05:30").unwrap(), 330.0);
/// assert_eq!(parse_timestamp("90").unwrap(), 90.0);
/// ```
pub fn parse_timestamp(ts: &str) -> Result<f64, TimestampError> {
    let ts = ts.trim();
    if ts.is_empty() {
        return Err(TimestampError::Empty);
    }

    let parts: Vec<&str> = ts.split(':').collect();
    if parts.len() > 3 {
        return Err(TimestampError::InvalidFormat(ts.to_string()));
    }

    const NAMES: [&str; 3] = ["hours", "minutes", "seconds"];
    let offset = 3 - parts.len();
    let mut total = 0.0;
    for (i, part) in parts.iter().enumerate() {
        let name = NAMES[offset + i];
        let value: f64 = part
            .trim()
            .parse()
            .map_err(|_| TimestampError::InvalidValue(name, part.to_string()))?;
        if value < 0.0 {
            return Err(TimestampError::Negative);
        }
        total = total * 60.0 + value;
    }
    Ok(total)
}

/// Format seconds into `HH:MM:SS` (or `HH:MM:SS.mmm` with a fractional part).
pub fn format_seconds(total_secs: f64) -> String {
    let hours = (total_secs / 3600.0).floor() as u32;
    let mins = ((total_secs % 3600.0) / 60.0).floor() as u32;
    let secs = total_secs % 60.0;

    if (secs - secs.floor()).abs() > 0.0001 {
        format!("{:02}:{:02}:{:06.3}", hours, mins, secs)
    } else {
        format!("{:02}:{:02}:{:02}", hours, mins, secs.floor() as u32)
    }
}

/// Format whole seconds as `MM:SS`, or `HH:MM:SS` past the hour.
pub fn format_clock(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let mins = (total_secs % 3600) / 60;
    let secs = total_secs % 60;
    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, mins, secs)
    } else {
        format!("{:02}:{:02}", mins, secs)
    }
}

/// Convert an ISO 8601 time duration (`PT#H#M#S`) to seconds.
///
/// Anything that is not a `PT` duration yields 0, matching how the API
/// reports live streams (`P0D`).
pub fn parse_iso8601_duration(duration: &str) -> u64 {
    let Some(rest) = duration.trim().strip_prefix("PT") else {
        return 0;
    };

    let mut total = 0u64;
    let mut number = String::new();
    let mut in_fraction = false;
    for c in rest.chars() {
        if c.is_ascii_digit() {
            // Fractional seconds are truncated
            if !in_fraction {
                number.push(c);
            }
            continue;
        }
        if c == '.' {
            in_fraction = true;
            continue;
        }
        let value: u64 = number.parse().unwrap_or(0);
        number.clear();
        in_fraction = false;
        match c {
            'H' => total += value * 3600,
            'M' => total += value * 60,
            'S' => total += value,
            _ => return 0,
        }
    }
    total
}

/// Timestamp parsing error.
#[derive(Debug, Clone, PartialEq)]
pub enum TimestampError {
    /// Timestamp string is empty
    Empty,
    /// Timestamp contains negative values
    Negative,
    /// Invalid numeric value for a component
    InvalidValue(&'static str, String),
    /// Too many components
    InvalidFormat(String),
}

impl std::fmt::Display for TimestampError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "Timestamp cannot be empty"),
            Self::Negative => write!(f, "Timestamp cannot be negative"),
            Self::InvalidValue(component, value) => {
                write!(f, "Invalid {} value: {}", component, value)
            }
            Self::InvalidFormat(ts) => write!(
                f,
                "Invalid timestamp format '{}'. Use HH:MM:SS, MM:SS or SS",
                ts
            ),
        }
    }
}

impl std::error::Error for TimestampError {}
