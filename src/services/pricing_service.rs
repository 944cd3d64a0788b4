use chrono::NaiveDate;

use crate::models::rental::AddOns;

pub const INSURANCE_PER_DAY: f64 = 15.0;
pub const GPS_PER_DAY: f64 = 5.0;
pub const CHILD_SEAT_PER_DAY: f64 = 8.0;
pub const ADDITIONAL_DRIVER_FEE: f64 = 25.0;

pub struct PricingService;

impl PricingService {
    /// Whole billable days between pick-up and return.
    ///
    /// Pre-condition: the range has passed `validate_date_range`. A same-day
    /// or reversed range is clamped to one billable day, so callers that skip
    /// the validator can never see a zero or negative day count.
    pub fn rental_days(start_date: NaiveDate, end_date: NaiveDate) -> i64 {
        (end_date - start_date).num_days().max(1)
    }

    /// Add-on charges for a rental of `total_days` days. Insurance, GPS and
    /// the child seat bill per day; the additional driver is a one-time fee.
    pub fn add_on_cost(add_ons: &AddOns, total_days: i64) -> f64 {
        let days = total_days as f64;
        let mut cost = 0.0;
        if add_ons.insurance {
            cost += INSURANCE_PER_DAY * days;
        }
        if add_ons.gps {
            cost += GPS_PER_DAY * days;
        }
        if add_ons.child_seat {
            cost += CHILD_SEAT_PER_DAY * days;
        }
        if add_ons.additional_driver {
            cost += ADDITIONAL_DRIVER_FEE;
        }
        cost
    }

    /// Total rental price, clamped to a minimum of 0.
    pub fn calculate_total(daily_rate: f64, total_days: i64, add_ons: &AddOns) -> f64 {
        (daily_rate * total_days as f64 + Self::add_on_cost(add_ons, total_days)).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn rental_days_from_date_range() {
        assert_eq!(PricingService::rental_days(date(2024, 1, 1), date(2024, 1, 4)), 3);
        assert_eq!(PricingService::rental_days(date(2024, 1, 1), date(2024, 1, 2)), 1);
        // Month boundary
        assert_eq!(PricingService::rental_days(date(2024, 1, 30), date(2024, 2, 2)), 3);
    }

    #[test]
    fn rental_days_clamps_degenerate_ranges() {
        // Same-day and reversed ranges are rejected upstream by the date
        // validator; the calculator still never bills less than one day.
        assert_eq!(PricingService::rental_days(date(2024, 1, 1), date(2024, 1, 1)), 1);
        assert_eq!(PricingService::rental_days(date(2024, 1, 4), date(2024, 1, 1)), 1);
    }

    #[test]
    fn base_price_without_add_ons() {
        // Scenario A: $40/day for 3 days
        let total = PricingService::calculate_total(40.0, 3, &AddOns::none());
        assert_eq!(total, 120.0);
    }

    #[test]
    fn per_day_add_ons_scale_with_days() {
        // Scenario B: insurance + GPS over 3 days
        let add_ons = AddOns {
            insurance: true,
            gps: true,
            ..AddOns::none()
        };
        let total = PricingService::calculate_total(40.0, 3, &add_ons);
        assert_eq!(total, 120.0 + 3.0 * 15.0 + 3.0 * 5.0);
    }

    #[test]
    fn additional_driver_is_one_time() {
        // Scenario C: 1 day at $50 plus the flat driver fee
        let add_ons = AddOns {
            additional_driver: true,
            ..AddOns::none()
        };
        assert_eq!(PricingService::calculate_total(50.0, 1, &add_ons), 75.0);
        // Same fee over a week
        assert_eq!(PricingService::calculate_total(50.0, 7, &add_ons), 350.0 + 25.0);
    }

    #[test]
    fn each_add_on_contributes_its_defined_amount() {
        let days = 4;
        let base = PricingService::calculate_total(40.0, days, &AddOns::none());
        let cases = [
            (AddOns { insurance: true, ..AddOns::none() }, INSURANCE_PER_DAY * days as f64),
            (AddOns { gps: true, ..AddOns::none() }, GPS_PER_DAY * days as f64),
            (AddOns { child_seat: true, ..AddOns::none() }, CHILD_SEAT_PER_DAY * days as f64),
            (AddOns { additional_driver: true, ..AddOns::none() }, ADDITIONAL_DRIVER_FEE),
        ];
        for (add_ons, expected_delta) in cases {
            let total = PricingService::calculate_total(40.0, days, &add_ons);
            assert_eq!(total - base, expected_delta, "wrong delta for {:?}", add_ons);
        }
    }

    #[test]
    fn total_is_never_negative() {
        // A zeroed or bogus negative rate must not surface a negative total
        assert_eq!(PricingService::calculate_total(0.0, 3, &AddOns::none()), 0.0);
        assert_eq!(PricingService::calculate_total(-10.0, 3, &AddOns::none()), 0.0);
    }
}
