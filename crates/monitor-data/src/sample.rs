//! Demo reading series used when no readings file is supplied.

use monitor_core::models::Reading;

/// The fourteen-reading morning series from the LPG station demo.
///
/// Returns a fresh vector on every call.
pub fn sample_series() -> Vec<Reading> {
    [
        ("8:59 AM", 9_500.0),
        ("9:00 AM", 9_400.0),
        ("9:01 AM", 9_300.0),
        ("9:02 AM", 9_300.0),
        ("9:03 AM", 9_200.0),
        ("9:10 AM", 9_600.0),
        ("9:15 AM", 9_600.0),
        ("9:30 AM", 9_400.0),
        ("10:00 AM", 9_300.0),
        ("10:15 AM", 9_300.0),
        ("11:00 AM", 8_700.0),
        ("11:30 AM", 8_600.0),
        ("12:00 PM", 8_500.0),
        ("12:01 PM", 8_500.0),
    ]
    .into_iter()
    .map(|(label, level)| Reading::new(label, level))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use monitor_core::time_utils::normalize;

    #[test]
    fn test_sample_series_has_fourteen_readings() {
        assert_eq!(sample_series().len(), 14);
    }

    #[test]
    fn test_sample_series_is_chronological() {
        let times: Vec<_> = sample_series()
            .iter()
            .map(|r| normalize(&r.label).unwrap())
            .collect();
        assert!(times.windows(2).all(|w| w[0] <= w[1]));
    }
}
