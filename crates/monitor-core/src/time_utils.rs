use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use crate::error::{MonitorError, Result};
use crate::models::NormalizedTime;

// ── Label normalization ───────────────────────────────────────────────────────

/// `H:MM AM|PM` with `H` in 1–12 (an optional leading zero is accepted).
fn label_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(0?[1-9]|1[0-2]):([0-5][0-9]) (AM|PM)$").expect("regex is valid")
    })
}

/// `HH:MM` on the 24-hour clock.
fn clock_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^([01]?[0-9]|2[0-3]):([0-5][0-9])$").expect("regex is valid"))
}

/// Convert a reading label such as `"9:03 AM"` into a [`NormalizedTime`].
///
/// `12:xx AM` folds to hour 0 and `12:xx PM` to hour 12. Seconds are always
/// zero and the date is the shared reference day, so equal labels always
/// produce equal values.
///
/// # Errors
///
/// [`MonitorError::MalformedTimeLabel`] for anything that is not
/// `H:MM AM|PM`.
pub fn normalize(label: &str) -> Result<NormalizedTime> {
    let malformed = || MonitorError::MalformedTimeLabel(label.to_string());

    let caps = label_pattern().captures(label.trim()).ok_or_else(malformed)?;
    let hours: u32 = caps[1].parse().map_err(|_| malformed())?;
    let minutes: u32 = caps[2].parse().map_err(|_| malformed())?;

    let hour = if &caps[3] == "PM" {
        (hours % 12) + 12
    } else {
        hours % 12
    };

    NormalizedTime::from_hm(hour, minutes).ok_or_else(malformed)
}

/// Render a [`NormalizedTime`] back into canonical label form (`"9:03 AM"`).
pub fn format_label(time: NormalizedTime) -> String {
    let hour = time.hour();
    let period = if hour >= 12 { "PM" } else { "AM" };
    let display_hour = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{}:{:02} {}", display_hour, time.minute(), period)
}

/// Parse a user-supplied window bound.
///
/// Accepts either a reading label (`"9:02 AM"`) or a 24-hour clock time
/// (`"09:02"`, `"21:30"`). Both land on the same reference day as
/// [`normalize`].
pub fn parse_window_bound(text: &str) -> Result<NormalizedTime> {
    let trimmed = text.trim();

    if let Some(caps) = clock_pattern().captures(trimmed) {
        let hour: u32 = caps[1]
            .parse()
            .map_err(|_| MonitorError::MalformedTimeLabel(text.to_string()))?;
        let minute: u32 = caps[2]
            .parse()
            .map_err(|_| MonitorError::MalformedTimeLabel(text.to_string()))?;
        debug!("window bound {:?} parsed as 24-hour time", text);
        return NormalizedTime::from_hm(hour, minute)
            .ok_or_else(|| MonitorError::MalformedTimeLabel(text.to_string()));
    }

    normalize(&trimmed.to_uppercase())
}

// ── Tests ──────────────────────────────────────────────────────────────────────
