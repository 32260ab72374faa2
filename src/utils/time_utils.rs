use {
    crate::config::COINBASE,
    chrono::{DateTime, NaiveDate, NaiveDateTime, Utc},
};

pub struct TimeUtils;

impl TimeUtils {
    pub const S_IN_MIN: i64 = 60;
    pub const S_IN_H: i64 = Self::S_IN_MIN * 60;

    /// Layouts seen in exchange exports, in the order they are tried.
    /// `%.f` also matches when there is no fractional part. All of them are read as UTC.
    pub const LEDGER_TIME_FORMATS: [&'static str; 5] = [
        "%Y-%m-%d %H:%M:%S+00",
        "%Y-%m-%dT%H:%M:%S%.fZ",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%SZ",
        "%Y-%m-%d %H:%M:%S%.f+00",
    ];
}

/// Parses a ledger timestamp against every known layout, first match wins.
/// Literal `"` characters are stripped first. Returns `None` if nothing matches.
pub fn parse_ledger_time(raw: &str) -> Option<DateTime<Utc>> {
    let cleaned = raw.replace('"', "");
    TimeUtils::LEDGER_TIME_FORMATS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(&cleaned, layout).ok())
        .map(|naive| naive.and_utc())
}

/// Midnight of 0001-01-01 UTC, the "no time" placeholder some exports write for a missing date.
pub fn is_zero_instant(instant: &DateTime<Utc>) -> bool {
    NaiveDate::from_ymd_opt(1, 1, 1)
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .is_some_and(|zero| instant.naive_utc() == zero)
}

/// Formats an instant the way the candles API expects it, and the way `price-date` is written.
pub fn format_request_time(instant: &DateTime<Utc>) -> String {
    instant.format(COINBASE.api.request_time_format).to_string()
}

pub fn epoch_sec_to_utc(epoch_sec: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(epoch_sec, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    fn known_instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 1, 2, 3, 4, 5)
            .single()
            .and_then(|t| t.with_nanosecond(123_456_000))
            .unwrap()
    }

    #[test]
    fn every_layout_round_trips() {
        let at = known_instant();
        let whole_second = at.with_nanosecond(0).unwrap();
        for layout in TimeUtils::LEDGER_TIME_FORMATS {
            // The +00 and Z-only layouts have no fractional field
            let expected = if layout.contains("%.f") { at } else { whole_second };
            let text = expected.format(layout).to_string();
            assert_eq!(parse_ledger_time(&text), Some(expected), "layout {layout}: {text}");
        }
    }

    #[test]
    fn recognised_shapes() {
        let base = Utc.with_ymd_and_hms(2021, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(parse_ledger_time("2021-01-02 03:04:05+00"), Some(base));
        assert_eq!(parse_ledger_time("2021-01-02T03:04:05Z"), Some(base));
        assert_eq!(parse_ledger_time("2021-01-02 03:04:05"), Some(base));
        assert_eq!(
            parse_ledger_time("2021-01-02T03:04:05.5Z"),
            base.with_nanosecond(500_000_000)
        );
        assert_eq!(
            parse_ledger_time("2021-01-02 03:04:05.000123+00"),
            base.with_nanosecond(123_000)
        );
    }

    #[test]
    fn quotes_are_stripped() {
        assert_eq!(
            parse_ledger_time("\"2021-01-02T03:04:05Z\""),
            Utc.with_ymd_and_hms(2021, 1, 2, 3, 4, 5).single()
        );
    }

    #[test]
    fn garbage_is_rejected() {
        assert_eq!(parse_ledger_time("not-a-date"), None);
        assert_eq!(parse_ledger_time(""), None);
        assert_eq!(parse_ledger_time("2021-01-02T03:04:05+02:00"), None);
    }

    #[test]
    fn zero_instant_is_recognised() {
        let zero = parse_ledger_time("0001-01-01 00:00:00").unwrap();
        assert!(is_zero_instant(&zero));
        assert!(!is_zero_instant(&parse_ledger_time("0001-01-01 00:00:01").unwrap()));
        assert!(!is_zero_instant(&known_instant()));
    }

    #[test]
    fn request_format_drops_fraction() {
        assert_eq!(format_request_time(&known_instant()), "2021-01-02T03:04:05");
    }

    #[test]
    fn epoch_conversion() {
        let t = epoch_sec_to_utc(1_609_556_400).unwrap();
        assert_eq!(format_request_time(&t), "2021-01-02T03:00:00");
    }
}
