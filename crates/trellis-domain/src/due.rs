//! Parsing for the due-date prompt.
//!
//! Accepted forms: `today`, `tomorrow`, `+3d`, `+2w`, `2024-05-01`,
//! `2024-05-01 17:30`, RFC 3339, and `none`/`clear`/empty to remove the date.
//! Dates without a time are due at noon UTC.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use trellis_core::{TrellisError, TrellisResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueInput {
    Clear,
    At(DateTime<Utc>),
}

impl DueInput {
    pub fn into_option(self) -> Option<DateTime<Utc>> {
        match self {
            DueInput::Clear => None,
            DueInput::At(due) => Some(due),
        }
    }
}

pub fn parse_due(input: &str, now: DateTime<Utc>) -> TrellisResult<DueInput> {
    let input = input.trim();
    let lower = input.to_lowercase();

    match lower.as_str() {
        "" | "none" | "clear" | "-" => return Ok(DueInput::Clear),
        "today" => return Ok(DueInput::At(at_noon(now.date_naive()))),
        "tomorrow" => {
            return Ok(DueInput::At(at_noon(now.date_naive() + Duration::days(1))));
        }
        _ => {}
    }

    if let Some(rest) = lower.strip_prefix('+') {
        return parse_relative(rest, now).map(DueInput::At);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(DueInput::At(dt.with_timezone(&Utc)));
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M") {
        return Ok(DueInput::At(Utc.from_utc_datetime(&dt)));
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(DueInput::At(at_noon(date)));
    }

    Err(TrellisError::Validation(format!(
        "Unrecognised date '{}' (try YYYY-MM-DD, +3d or none)",
        input
    )))
}

pub fn format_due(due: &DateTime<Utc>) -> String {
    due.format("%Y-%m-%d %H:%M").to_string()
}

fn parse_relative(rest: &str, now: DateTime<Utc>) -> TrellisResult<DateTime<Utc>> {
    let invalid = || TrellisError::Validation(format!("Unrecognised offset '+{}'", rest));
    let unit_start = rest.char_indices().last().map(|(i, _)| i).unwrap_or(0);
    let (amount, unit) = rest.split_at(unit_start);
    let amount: i64 = amount.parse().map_err(|_| invalid())?;
    let offset = match unit {
        "d" => Duration::try_days(amount),
        "w" => Duration::try_weeks(amount),
        "h" => Duration::try_hours(amount),
        _ => return Err(invalid()),
    };
    offset
        .and_then(|offset| now.checked_add_signed(offset))
        .ok_or_else(invalid)
}

fn at_noon(date: NaiveDate) -> DateTime<Utc> {
    let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default();
    Utc.from_utc_datetime(&date.and_time(noon))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_clear_keywords() {
        for input in ["", "  ", "none", "CLEAR", "-"] {
            assert_eq!(parse_due(input, now()).unwrap(), DueInput::Clear);
        }
    }

    #[test]
    fn test_named_days() {
        let today = parse_due("today", now()).unwrap().into_option().unwrap();
        assert_eq!(format_due(&today), "2024-05-01 12:00");
        let tomorrow = parse_due("Tomorrow", now()).unwrap().into_option().unwrap();
        assert_eq!(format_due(&tomorrow), "2024-05-02 12:00");
    }

    #[test]
    fn test_relative_offsets() {
        let due = parse_due("+3d", now()).unwrap().into_option().unwrap();
        assert_eq!(format_due(&due), "2024-05-04 09:30");
        let due = parse_due("+1w", now()).unwrap().into_option().unwrap();
        assert_eq!(format_due(&due), "2024-05-08 09:30");
        assert!(parse_due("+xd", now()).is_err());
        assert!(parse_due("+3y", now()).is_err());
    }

    #[test]
    fn test_absolute_formats() {
        let due = parse_due("2024-12-24", now()).unwrap().into_option().unwrap();
        assert_eq!(format_due(&due), "2024-12-24 12:00");
        let due = parse_due("2024-12-24 18:45", now()).unwrap().into_option().unwrap();
        assert_eq!(format_due(&due), "2024-12-24 18:45");
        let due = parse_due("2024-12-24T18:45:00+02:00", now())
            .unwrap()
            .into_option()
            .unwrap();
        assert_eq!(format_due(&due), "2024-12-24 16:45");
    }

    #[test]
    fn test_garbage_is_validation_error() {
        let err = parse_due("next tuesday-ish", now()).unwrap_err();
        assert!(matches!(err, TrellisError::Validation(_)));
    }
}
