use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

use crate::error::{Error, Result};

const SECS_PER_MINUTE: u64 = 60;
const SECS_PER_HOUR: u64 = 60 * SECS_PER_MINUTE;
const SECS_PER_DAY: u64 = 24 * SECS_PER_HOUR;
const SECS_PER_WEEK: u64 = 7 * SECS_PER_DAY;
const SECS_PER_MONTH: u64 = 30 * SECS_PER_DAY;
const SECS_PER_YEAR: u64 = 365 * SECS_PER_DAY;

static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^P(?:(\d+)Y)?(?:(\d+)M)?(?:(\d+)W)?(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)(?:[.,](\d+))?S)?)?$",
    )
    .expect("duration pattern is valid")
});

/// Parse a YouTube `contentDetails.duration` value (e.g. `PT1H2M3S`, `P1DT5M`, `P0D`).
///
/// Calendar units use fixed lengths: a year is 365 days, a month 30 days.
pub fn parse(text: &str) -> Result<Duration> {
    let malformed = || Error::MalformedDuration(text.to_string());

    let caps = DURATION_RE.captures(text.trim()).ok_or_else(malformed)?;

    // "P" and "PT" alone match the pattern but carry no component
    if caps.iter().skip(1).all(|c| c.is_none()) || text.trim().ends_with('T') {
        return Err(malformed());
    }

    let unit_secs = [
        SECS_PER_YEAR,
        SECS_PER_MONTH,
        SECS_PER_WEEK,
        SECS_PER_DAY,
        SECS_PER_HOUR,
        SECS_PER_MINUTE,
        1,
    ];

    let mut secs: u64 = 0;
    for (group, unit) in (1..=7).zip(unit_secs) {
        if let Some(m) = caps.get(group) {
            let value: u64 = m.as_str().parse().map_err(|_| malformed())?;
            secs = value
                .checked_mul(unit)
                .and_then(|v| secs.checked_add(v))
                .ok_or_else(malformed)?;
        }
    }

    let nanos = match caps.get(8) {
        Some(frac) => fraction_to_nanos(frac.as_str()),
        None => 0,
    };

    Ok(Duration::new(secs, nanos))
}

fn fraction_to_nanos(digits: &str) -> u32 {
    // Keep nanosecond precision, drop anything finer
    let mut padded: String = digits.chars().take(9).collect();
    while padded.len() < 9 {
        padded.push('0');
    }
    padded.parse().unwrap_or(0)
}

/// Format as `H:MM:SS`; hours are not wrapped into days.
pub fn format_hms(duration: Duration) -> String {
    let total = duration.as_secs();
    let hours = total / SECS_PER_HOUR;
    let minutes = (total % SECS_PER_HOUR) / SECS_PER_MINUTE;
    let seconds = total % SECS_PER_MINUTE;
    format!("{}:{:02}:{:02}", hours, minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_time_components() {
        assert_eq!(parse("PT1H2M3S").unwrap(), Duration::from_secs(3723));
        assert_eq!(parse("PT5M30S").unwrap(), Duration::from_secs(330));
        assert_eq!(parse("PT45S").unwrap(), Duration::from_secs(45));
        assert_eq!(parse("PT2H").unwrap(), Duration::from_secs(7200));
        assert_eq!(parse("PT1H30S").unwrap(), Duration::from_secs(3630));
    }

    #[test]
    fn parses_zero_lengths() {
        assert_eq!(parse("PT0S").unwrap(), Duration::ZERO);
        assert_eq!(parse("P0D").unwrap(), Duration::ZERO);
    }

    #[test]
    fn parses_date_components() {
        assert_eq!(parse("P1DT1S").unwrap(), Duration::from_secs(86_401));
        assert_eq!(parse("P2W").unwrap(), Duration::from_secs(14 * 86_400));
        assert_eq!(parse("P1Y").unwrap(), Duration::from_secs(365 * 86_400));
        assert_eq!(parse("P1M").unwrap(), Duration::from_secs(30 * 86_400));
        assert_eq!(parse("P1MT1M").unwrap(), Duration::from_secs(30 * 86_400 + 60));
    }

    #[test]
    fn keeps_fractional_seconds() {
        assert_eq!(parse("PT1.5S").unwrap(), Duration::from_millis(1500));
        assert_eq!(parse("PT0,25S").unwrap(), Duration::from_millis(250));
    }

    #[test]
    fn rejects_malformed_input() {
        for bad in ["", "P", "PT", "P1DT", "1H2M", "PT1X", "PT-5S", "PTS", "PT1S2M"] {
            assert!(
                matches!(parse(bad), Err(Error::MalformedDuration(_))),
                "expected {bad:?} to be rejected"
            );
        }
    }

    #[test]
    fn format_hms_pads_minutes_and_seconds() {
        assert_eq!(format_hms(Duration::ZERO), "0:00:00");
        assert_eq!(format_hms(Duration::from_secs(3723)), "1:02:03");
        assert_eq!(format_hms(Duration::from_secs(100 * 3600 + 59)), "100:00:59");
        assert_eq!(format_hms(Duration::from_millis(61_999)), "0:01:01");
    }
}
