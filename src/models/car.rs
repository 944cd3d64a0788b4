use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Car {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub brand: String,
    pub model: String,
    pub year: i32,
    // Older catalog documents carry the rate under different names. The
    // aliases fold them all into `daily_rate` at deserialization time so
    // nothing downstream has to branch on document shape.
    #[serde(alias = "price_per_day", alias = "pricePerDay", alias = "rate")]
    pub daily_rate: f64,
    #[serde(default = "default_available")]
    pub is_available: bool,
    pub image_url: Option<String>,
    pub owner_id: Option<ObjectId>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_available() -> bool {
    true
}

/// The car fields a checkout session and rental record keep a copy of,
/// frozen at booking time so later catalog edits don't rewrite history.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CarSnapshot {
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub daily_rate: f64,
    pub image_url: Option<String>,
}

impl CarSnapshot {
    pub fn display_name(&self) -> String {
        format!("{} {} {}", self.year, self.brand, self.model)
    }
}

impl From<&Car> for CarSnapshot {
    fn from(car: &Car) -> Self {
        CarSnapshot {
            brand: car.brand.clone(),
            model: car.model.clone(),
            year: car.year,
            daily_rate: car.daily_rate,
            image_url: car.image_url.clone(),
        }
    }
}
