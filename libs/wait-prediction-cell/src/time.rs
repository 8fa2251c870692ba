use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

const NAIVE_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Parses an ISO-8601 instant. Offsets are honoured; naive date-times are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// 00:00 UTC of the day containing `instant`.
pub fn start_of_day(instant: DateTime<Utc>) -> DateTime<Utc> {
    instant
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .map(|midnight| Utc.from_utc_datetime(&midnight))
        .unwrap_or(instant)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_parse_zulu_and_offset() {
        let zulu = parse_timestamp("2024-01-01T09:15:00Z").unwrap();
        assert_eq!(zulu.hour(), 9);

        let offset = parse_timestamp("2024-01-01T09:15:00+02:00").unwrap();
        assert_eq!(offset.hour(), 7);
    }

    #[test]
    fn test_parse_naive_as_utc() {
        let naive = parse_timestamp("2024-01-01T09:15:00").unwrap();
        assert_eq!(naive, parse_timestamp("2024-01-01T09:15:00Z").unwrap());

        let spaced = parse_timestamp("2024-01-01 09:15:00.250").unwrap();
        assert_eq!(spaced.minute(), 15);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_timestamp("not-a-time").is_none());
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("2024-13-01T09:15:00Z").is_none());
    }

    #[test]
    fn test_start_of_day() {
        let instant = parse_timestamp("2024-03-05T17:42:11Z").unwrap();
        assert_eq!(start_of_day(instant), parse_timestamp("2024-03-05T00:00:00Z").unwrap());
    }
}
