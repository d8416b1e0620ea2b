use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};

/// Shown in place of a date that is missing or cannot be parsed
pub const UNKNOWN_DATE: &str = "日付不明";

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
];

/// Renders source timestamps as Japanese-style calendar dates (`2024/1/15`)
/// in a fixed UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateFormatter {
    offset: FixedOffset,
}

impl DateFormatter {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Returns `None` when the offset is outside ±23 hours
    pub fn from_offset_hours(hours: i32) -> Option<Self> {
        FixedOffset::east_opt(hours * 3600).map(Self::new)
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Parse a raw source timestamp into an instant
    pub fn parse(&self, raw: &str) -> Option<DateTime<FixedOffset>> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt);
        }

        // Timestamps without an offset are read in the display offset
        for format in NAIVE_DATETIME_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
                return self.offset.from_local_datetime(&naive).single();
            }
        }

        // Bare dates are midnight UTC
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| Utc.from_utc_datetime(&naive).with_timezone(&Utc.fix()))
    }

    /// Format an optional raw timestamp, falling back to [`UNKNOWN_DATE`]
    pub fn format(&self, raw: Option<&str>) -> String {
        raw.and_then(|r| self.parse(r))
            .map(|dt| {
                dt.with_timezone(&self.offset)
                    .format("%Y/%-m/%-d")
                    .to_string()
            })
            .unwrap_or_else(|| UNKNOWN_DATE.to_string())
    }
}

impl Default for DateFormatter {
    fn default() -> Self {
        Self::from_offset_hours(9).unwrap_or_else(|| Self::new(Utc.fix()))
    }
}
