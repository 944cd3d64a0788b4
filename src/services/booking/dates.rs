use chrono::NaiveDate;

use crate::services::booking::BookingError;

/// Gate for advancing past the dates step. Pure: compares calendar dates
/// only, no clock access — the caller supplies `today`.
pub fn validate_date_range(
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<(), BookingError> {
    let (start, end) = match (start_date, end_date) {
        (Some(start), Some(end)) => (start, end),
        _ => return Err(BookingError::MissingDate),
    };

    if start < today {
        return Err(BookingError::PastStartDate);
    }
    if end <= start {
        return Err(BookingError::InvalidRange);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        date(2024, 6, 15)
    }

    #[test]
    fn accepts_a_valid_future_range() {
        assert_eq!(
            validate_date_range(Some(date(2024, 6, 20)), Some(date(2024, 6, 23)), today()),
            Ok(())
        );
    }

    #[test]
    fn pickup_today_is_allowed() {
        assert_eq!(
            validate_date_range(Some(today()), Some(date(2024, 6, 16)), today()),
            Ok(())
        );
    }

    #[test]
    fn missing_either_date_blocks() {
        assert_eq!(
            validate_date_range(None, Some(date(2024, 6, 23)), today()),
            Err(BookingError::MissingDate)
        );
        assert_eq!(
            validate_date_range(Some(date(2024, 6, 20)), None, today()),
            Err(BookingError::MissingDate)
        );
        assert_eq!(
            validate_date_range(None, None, today()),
            Err(BookingError::MissingDate)
        );
    }

    #[test]
    fn past_start_date_blocks() {
        assert_eq!(
            validate_date_range(Some(date(2024, 6, 14)), Some(date(2024, 6, 23)), today()),
            Err(BookingError::PastStartDate)
        );
    }

    #[test]
    fn same_day_and_reversed_ranges_block() {
        assert_eq!(
            validate_date_range(Some(date(2024, 6, 20)), Some(date(2024, 6, 20)), today()),
            Err(BookingError::InvalidRange)
        );
        assert_eq!(
            validate_date_range(Some(date(2024, 6, 23)), Some(date(2024, 6, 20)), today()),
            Err(BookingError::InvalidRange)
        );
    }
}
