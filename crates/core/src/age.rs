//! Age arithmetic.
//!
//! Two different age computations exist in the dataset pipeline and both are
//! kept on purpose:
//!
//! - [`whole_years_floor365`] decides coupon eligibility while generating sales;
//! - [`exact_years`] mirrors the validator's SQL cross-check
//!   (`julianday` difference / 365.25).
//!
//! Near the 60/61 boundary they can disagree.

use chrono::NaiveDate;

/// Average year length used by the validator.
pub const DAYS_PER_YEAR_EXACT: f64 = 365.25;

/// Whole years between `birth` and `today` as `floor(days / 365)`.
///
/// Ignores leap days. Returns a negative number for future birth dates.
pub fn whole_years_floor365(birth: NaiveDate, today: NaiveDate) -> i64 {
    (today - birth).num_days().div_euclid(365)
}

/// Fractional years between `birth` and `today` as `days / 365.25`.
pub fn exact_years(birth: NaiveDate, today: NaiveDate) -> f64 {
    (today - birth).num_days() as f64 / DAYS_PER_YEAR_EXACT
}

/// Approximate birth date for someone `age` years old with `extra_days` on top.
///
/// Subtracts `age * 365 + extra_days` days from `today`; this is not calendar
/// exact.
pub fn birth_date_for_age(today: NaiveDate, age: u32, extra_days: u32) -> NaiveDate {
    today - chrono::Duration::days(i64::from(age) * 365 + i64::from(extra_days))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn floor365_counts_whole_365_day_blocks() {
        let today = date(2026, 10, 18);
        let birth = birth_date_for_age(today, 61, 0);
        assert_eq!(whole_years_floor365(birth, today), 61);
        let birth = birth_date_for_age(today, 61, 364);
        assert_eq!(whole_years_floor365(birth, today), 61);
        let birth = birth_date_for_age(today, 61, 365);
        assert_eq!(whole_years_floor365(birth, today), 62);
    }

    #[test]
    fn the_two_age_measures_disagree_near_the_boundary() {
        let today = date(2026, 10, 18);
        // 60 * 365 + 100 days: not over 60 in 365-day blocks, over 60 by day fraction.
        let birth = birth_date_for_age(today, 60, 100);
        assert_eq!(whole_years_floor365(birth, today), 60);
        assert!(exact_years(birth, today) > 60.0);

        // 61 * 365 days: both measures agree the customer is over 60.
        let birth = birth_date_for_age(today, 61, 0);
        assert_eq!(whole_years_floor365(birth, today), 61);
        assert!(exact_years(birth, today) > 60.0);
        assert!(exact_years(birth, today) < 61.0);
    }

    #[test]
    fn future_birth_dates_yield_negative_ages() {
        let today = date(2026, 1, 1);
        assert_eq!(whole_years_floor365(date(2026, 1, 2), today), -1);
    }
}
