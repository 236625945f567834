use chrono::{DateTime, Utc};

/// Human-readable timestamp for parcel cards and request lists.
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.format("%d %b %Y, %H:%M").to_string()
}

pub fn format_optional_datetime(dt: &Option<DateTime<Utc>>) -> String {
    match dt {
        Some(dt) => format_datetime(dt),
        None => "-".to_string(),
    }
}

/// Truncates long free-text fields for list rows. Full text stays available
/// on the detail card.
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn formats_datetime() {
        let dt = Utc.with_ymd_and_hms(2025, 3, 7, 14, 30, 0).unwrap();
        assert_eq!(format_datetime(&dt), "07 Mar 2025, 14:30");
    }

    #[test]
    fn optional_datetime_dash_when_missing() {
        assert_eq!(format_optional_datetime(&None), "-");
    }

    #[test]
    fn truncate_keeps_short_text() {
        assert_eq!(truncate("small box", 20), "small box");
    }

    #[test]
    fn truncate_cuts_long_text() {
        let out = truncate("a very long parcel description indeed", 12);
        assert!(out.chars().count() <= 12);
        assert!(out.ends_with('…'));
    }
}
