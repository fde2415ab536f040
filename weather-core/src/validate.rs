use chrono::NaiveDate;

use crate::error::{Result, WeatherError};
use crate::provider::WeatherProvider;

/// Check a date range for consistency and bound it to the supported span.
///
/// A no-op when either bound is absent. There is no lower bound on how far
/// in the past `start` may be; the forecast provider serves historical data.
pub fn validate_date_range(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<()> {
    let (Some(start), Some(end)) = (start, end) else {
        return Ok(());
    };

    if start > end {
        return Err(WeatherError::InvalidRange);
    }
    if end - start > chrono::Duration::days(7) {
        return Err(WeatherError::RangeTooLong);
    }

    Ok(())
}

/// True iff a current-weather lookup for `location` succeeds.
///
/// Failures are not errors here; callers turn a `false` result into
/// [`WeatherError::InvalidLocation`].
pub async fn validate_location(provider: &dyn WeatherProvider, location: &str) -> bool {
    provider.check_location_exists(location).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> Option<NaiveDate> {
        Some(s.parse().expect("valid test date"))
    }

    #[test]
    fn absent_bounds_are_accepted() {
        assert!(validate_date_range(None, None).is_ok());
        assert!(validate_date_range(date("2024-01-01"), None).is_ok());
        assert!(validate_date_range(None, date("2024-01-01")).is_ok());
    }

    #[test]
    fn start_equal_to_end_is_accepted() {
        assert!(validate_date_range(date("2024-01-01"), date("2024-01-01")).is_ok());
    }

    #[test]
    fn start_after_end_is_rejected() {
        let err = validate_date_range(date("2024-01-02"), date("2024-01-01")).unwrap_err();
        assert!(matches!(err, WeatherError::InvalidRange));
    }

    #[test]
    fn exactly_seven_days_is_accepted() {
        assert!(validate_date_range(date("2024-01-01"), date("2024-01-08")).is_ok());
    }

    #[test]
    fn more_than_seven_days_is_rejected() {
        // 2024-01-01 .. 2024-01-10 spans 9 days.
        let err = validate_date_range(date("2024-01-01"), date("2024-01-10")).unwrap_err();
        assert!(matches!(err, WeatherError::RangeTooLong));
    }

    #[test]
    fn four_day_span_is_accepted() {
        assert!(validate_date_range(date("2024-01-01"), date("2024-01-05")).is_ok());
    }

    #[test]
    fn historical_ranges_are_accepted() {
        assert!(validate_date_range(date("1962-03-01"), date("1962-03-04")).is_ok());
    }
}
