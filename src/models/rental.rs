use chrono::{DateTime, NaiveDate, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::models::car::CarSnapshot;

/// One optional extra on a booking. Insurance, GPS and the child seat bill
/// per rental day; the additional driver is a flat fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOn {
    Insurance,
    Gps,
    ChildSeat,
    AdditionalDriver,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq)]
pub struct AddOns {
    #[serde(default)]
    pub insurance: bool,
    #[serde(default)]
    pub gps: bool,
    #[serde(default)]
    pub child_seat: bool,
    #[serde(default)]
    pub additional_driver: bool,
}

impl AddOns {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self, add_on: AddOn) {
        match add_on {
            AddOn::Insurance => self.insurance = !self.insurance,
            AddOn::Gps => self.gps = !self.gps,
            AddOn::ChildSeat => self.child_seat = !self.child_seat,
            AddOn::AdditionalDriver => self.additional_driver = !self.additional_driver,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Card,
    MobileMoney,
}

impl PaymentMethod {
    /// Mobile money is still a placeholder in the payment step.
    pub fn is_supported(&self) -> bool {
        matches!(self, PaymentMethod::Card)
    }

    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "Card",
            PaymentMethod::MobileMoney => "Mobile money",
        }
    }
}

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_CONFIRMED: &str = "confirmed";
pub const STATUS_CANCELLED: &str = "cancelled";
pub const STATUS_PAYMENT_FAILED: &str = "payment_failed";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RentalDetails {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    pub car_id: ObjectId,
    pub car: CarSnapshot,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_days: i64,
    pub total_price: f64,
    pub add_ons: AddOns,
    pub pickup_location: String,
    pub dropoff_location: Option<String>,
    pub special_requests: Option<String>,
    pub status: String,
    pub checkout_session_id: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// What the customer dashboard posts to open a rental. Totals are never
/// accepted from the client; they are recomputed server-side.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RentalInput {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_is_an_involution() {
        let mut add_ons = AddOns::none();
        add_ons.toggle(AddOn::Gps);
        assert!(add_ons.gps);
        add_ons.toggle(AddOn::Gps);
        assert_eq!(add_ons, AddOns::none());
    }

    #[test]
    fn payment_method_support() {
        assert!(PaymentMethod::Card.is_supported());
        assert!(!PaymentMethod::MobileMoney.is_supported());
    }

    #[test]
    fn payment_method_wire_format() {
        let method: PaymentMethod = serde_json::from_str("\"mobile_money\"").unwrap();
        assert_eq!(method, PaymentMethod::MobileMoney);
        assert_eq!(serde_json::to_string(&PaymentMethod::Card).unwrap(), "\"card\"");
    }
}
