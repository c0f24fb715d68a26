use crate::types::FeaturedItem;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parses the date formats the backend has been seen to emit.
///
/// Offset-less date-times are read in `tz`; bare dates are UTC midnight.
pub fn parse_instant<Tz: TimeZone>(raw: &str, tz: &Tz) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return tz
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc));
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Milliseconds since the epoch, with missing or unreadable dates at 0.
pub fn sort_timestamp<Tz: TimeZone>(date: Option<&str>, tz: &Tz) -> i64 {
    date.and_then(|raw| parse_instant(raw, tz))
        .map(|dt| dt.timestamp_millis())
        .unwrap_or(0)
}

/// The viewer's current calendar day, captured at a single instant.
#[derive(Debug, Clone)]
pub struct CalendarDay<Tz: TimeZone> {
    today: NaiveDate,
    tz: Tz,
}

impl CalendarDay<Local> {
    pub fn local_now() -> Self {
        Self::at(Local::now())
    }
}

impl<Tz: TimeZone> CalendarDay<Tz> {
    pub fn new(today: NaiveDate, tz: Tz) -> Self {
        Self { today, tz }
    }

    pub fn at(now: DateTime<Tz>) -> Self {
        Self {
            today: now.date_naive(),
            tz: now.timezone(),
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn timezone(&self) -> &Tz {
        &self.tz
    }

    pub fn day_of(&self, raw: &str) -> Option<NaiveDate> {
        parse_instant(raw, &self.tz).map(|instant| instant.with_timezone(&self.tz).date_naive())
    }

    pub fn contains(&self, date: Option<&str>) -> bool {
        date.and_then(|raw| self.day_of(raw)) == Some(self.today)
    }

    pub fn is_today(&self, item: &FeaturedItem) -> bool {
        self.contains(item.date.as_deref())
    }

    /// Short label for card headers, in the viewer's zone.
    pub fn date_label(&self, raw: &str) -> Option<String> {
        self.day_of(raw).map(|day| day.format("%d %b %Y").to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_instant_formats() {
        let utc = Utc;
        let expected = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(parse_instant("2024-01-01T00:00:00Z", &utc), Some(expected));
        assert_eq!(parse_instant("2024-01-01T03:00:00+03:00", &utc), Some(expected));
        assert_eq!(parse_instant("Mon, 1 Jan 2024 00:00:00 +0000", &utc), Some(expected));
        assert_eq!(parse_instant("2024-01-01", &utc), Some(expected));
        assert_eq!(parse_instant("2024-01-01T00:00:00", &utc), Some(expected));
        assert_eq!(parse_instant("not a date", &utc), None);
        assert_eq!(parse_instant("  ", &utc), None);
    }

    #[test]
    fn test_naive_datetime_uses_viewer_zone() {
        let istanbul = FixedOffset::east_opt(3 * 3600).unwrap();
        let parsed = parse_instant("2024-01-01T03:00:00", &istanbul).unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_day_boundary_follows_viewer_zone() {
        let istanbul = FixedOffset::east_opt(3 * 3600).unwrap();
        let today = CalendarDay::new(day(2024, 1, 2), istanbul);
        // 22:30 UTC on the 1st is already the 2nd in UTC+3.
        assert!(today.contains(Some("2024-01-01T22:30:00Z")));
        assert!(!today.contains(Some("2024-01-01T20:00:00Z")));
        assert!(!today.contains(None));
        assert!(!today.contains(Some("garbage")));
    }

    #[test]
    fn test_sort_timestamp_defaults_to_epoch() {
        assert_eq!(sort_timestamp(None, &Utc), 0);
        assert_eq!(sort_timestamp(Some("nope"), &Utc), 0);
        assert_eq!(
            sort_timestamp(Some("1970-01-01T00:00:01Z"), &Utc),
            1_000
        );
    }

    #[test]
    fn test_date_label() {
        let today = CalendarDay::new(day(2024, 3, 5), Utc);
        assert_eq!(
            today.date_label("2024-03-05T10:00:00Z").as_deref(),
            Some("05 Mar 2024")
        );
        assert_eq!(today.date_label("??"), None);
    }
}
