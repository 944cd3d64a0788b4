use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::car::CarSnapshot;
use crate::models::rental::{AddOns, PaymentMethod};

/// The finalized booking handed to the checkout provider. Built only by
/// `BookingDraft::finalize`, which re-runs every validation first.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct CheckoutPayload {
    pub car_id: String,
    pub car: CarSnapshot,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_days: i64,
    pub total_price: f64,
    pub add_ons: AddOns,
    pub pickup_location: String,
    pub dropoff_location: Option<String>,
    pub special_requests: Option<String>,
}

/// What the hosted checkout provider answers with. At least one of the two
/// fields must be present for the client to have somewhere to go.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CheckoutSession {
    pub session_id: Option<String>,
    pub url: Option<String>,
}

impl CheckoutSession {
    pub fn redirect_target(&self) -> Option<&str> {
        self.url.as_deref().or(self.session_id.as_deref())
    }
}

/// Wire input for `POST /api/checkout/session`.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CheckoutRequest {
    pub car_id: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub add_ons: AddOns,
    pub pickup_location: Option<String>,
    pub dropoff_location: Option<String>,
    pub special_requests: Option<String>,
    #[serde(default)]
    pub payment_method: PaymentMethod,
}
