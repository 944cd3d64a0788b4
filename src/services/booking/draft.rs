use chrono::NaiveDate;

use crate::models::car::CarSnapshot;
use crate::models::checkout::CheckoutPayload;
use crate::models::rental::{AddOn, AddOns, PaymentMethod};
use crate::services::booking::{dates::validate_date_range, BookingError};
use crate::services::pricing_service::PricingService;

/// The in-progress reservation held by the booking wizard. Every field edit
/// goes through `apply`, so the whole flow can be unit tested as a plain
/// value without any HTTP or rendering in sight. Totals are derived on read,
/// never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingDraft {
    pub car_id: String,
    pub car: CarSnapshot,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub pickup_location: Option<String>,
    pub dropoff_location: Option<String>,
    pub add_ons: AddOns,
    pub payment_method: PaymentMethod,
    pub special_requests: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BookingAction {
    SetDates {
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    },
    ToggleAddOn(AddOn),
    SetLocations {
        pickup: Option<String>,
        dropoff: Option<String>,
    },
    SetPaymentMethod(PaymentMethod),
    SetSpecialRequests(Option<String>),
}

impl BookingDraft {
    pub fn new(car_id: impl Into<String>, car: CarSnapshot) -> Self {
        BookingDraft {
            car_id: car_id.into(),
            car,
            start_date: None,
            end_date: None,
            pickup_location: None,
            dropoff_location: None,
            add_ons: AddOns::none(),
            payment_method: PaymentMethod::default(),
            special_requests: None,
        }
    }

    pub fn apply(mut self, action: BookingAction) -> Self {
        match action {
            BookingAction::SetDates {
                start_date,
                end_date,
            } => {
                self.start_date = start_date;
                self.end_date = end_date;
            }
            BookingAction::ToggleAddOn(add_on) => self.add_ons.toggle(add_on),
            BookingAction::SetLocations { pickup, dropoff } => {
                self.pickup_location = pickup;
                self.dropoff_location = dropoff;
            }
            BookingAction::SetPaymentMethod(method) => self.payment_method = method,
            BookingAction::SetSpecialRequests(requests) => self.special_requests = requests,
        }
        self
    }

    /// Billable days, once both dates are picked.
    pub fn total_days(&self) -> Option<i64> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => Some(PricingService::rental_days(start, end)),
            _ => None,
        }
    }

    /// Running total shown next to the form; recomputed from scratch on
    /// every read so it can never drift from the inputs.
    pub fn total_price(&self) -> Option<f64> {
        self.total_days()
            .map(|days| PricingService::calculate_total(self.car.daily_rate, days, &self.add_ons))
    }

    /// Checks for the dates-and-options step: a coherent date range and a
    /// pickup location.
    pub fn validate_details(&self, today: NaiveDate) -> Result<(), BookingError> {
        validate_date_range(self.start_date, self.end_date, today)?;
        if self
            .pickup_location
            .as_deref()
            .map(str::trim)
            .filter(|loc| !loc.is_empty())
            .is_none()
        {
            return Err(BookingError::MissingPickupLocation);
        }
        Ok(())
    }

    /// Check for the payment step.
    pub fn validate_payment(&self) -> Result<(), BookingError> {
        if !self.payment_method.is_supported() {
            return Err(BookingError::UnsupportedPaymentMethod(
                self.payment_method.label(),
            ));
        }
        Ok(())
    }

    /// Full validation pass over the draft, in the order the wizard surfaces
    /// the steps: dates, pickup location, then payment method.
    pub fn validate(&self, today: NaiveDate) -> Result<(), BookingError> {
        self.validate_details(today)?;
        self.validate_payment()
    }

    /// Freeze the draft into the payload the checkout provider receives.
    /// Never skips validation, so a payload always carries a coherent range
    /// and a server-computed total.
    pub fn finalize(&self, today: NaiveDate) -> Result<CheckoutPayload, BookingError> {
        self.validate(today)?;

        // validate() guarantees both dates are present
        let start_date = self.start_date.ok_or(BookingError::MissingDate)?;
        let end_date = self.end_date.ok_or(BookingError::MissingDate)?;
        let total_days = PricingService::rental_days(start_date, end_date);
        let total_price =
            PricingService::calculate_total(self.car.daily_rate, total_days, &self.add_ons);

        Ok(CheckoutPayload {
            car_id: self.car_id.clone(),
            car: self.car.clone(),
            start_date,
            end_date,
            total_days,
            total_price,
            add_ons: self.add_ons,
            pickup_location: self
                .pickup_location
                .clone()
                .ok_or(BookingError::MissingPickupLocation)?,
            dropoff_location: self.dropoff_location.clone(),
            special_requests: self.special_requests.clone(),
        })
    }
}
