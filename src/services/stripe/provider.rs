use serde::Deserialize;
use uuid::Uuid;

use crate::models::checkout::{CheckoutPayload, CheckoutSession};
use crate::services::payment::interface::{CheckoutError, CheckoutOperations};

/// Hosted-checkout provider backed by Stripe Checkout. Session creation goes
/// through the REST API directly; webhook verification uses the stripe crate
/// in the checkout routes.
pub struct StripeCheckoutProvider {
    secret_key: String,
    success_url: String,
    cancel_url: String,
    http: reqwest::Client,
}

#[derive(Deserialize, Debug)]
struct SessionResponse {
    id: Option<String>,
    url: Option<String>,
}

pub fn dollars_to_cents(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

fn session_params(payload: &CheckoutPayload, success_url: &str, cancel_url: &str) -> Vec<(String, String)> {
    let mut params = vec![
        ("mode".to_string(), "payment".to_string()),
        ("success_url".to_string(), success_url.to_string()),
        ("cancel_url".to_string(), cancel_url.to_string()),
        (
            "client_reference_id".to_string(),
            Uuid::new_v4().to_string(),
        ),
        ("line_items[0][quantity]".to_string(), "1".to_string()),
        (
            "line_items[0][price_data][currency]".to_string(),
            "usd".to_string(),
        ),
        (
            "line_items[0][price_data][unit_amount]".to_string(),
            dollars_to_cents(payload.total_price).to_string(),
        ),
        (
            "line_items[0][price_data][product_data][name]".to_string(),
            format!(
                "{} rental ({} days)",
                payload.car.display_name(),
                payload.total_days
            ),
        ),
        ("metadata[car_id]".to_string(), payload.car_id.clone()),
        (
            "metadata[start_date]".to_string(),
            payload.start_date.to_string(),
        ),
        (
            "metadata[end_date]".to_string(),
            payload.end_date.to_string(),
        ),
        (
            "metadata[total_days]".to_string(),
            payload.total_days.to_string(),
        ),
        (
            "metadata[pickup_location]".to_string(),
            payload.pickup_location.clone(),
        ),
    ];

    if let Some(dropoff) = &payload.dropoff_location {
        params.push(("metadata[dropoff_location]".to_string(), dropoff.clone()));
    }
    if let Some(requests) = &payload.special_requests {
        params.push(("metadata[special_requests]".to_string(), requests.clone()));
    }
    if let Ok(add_ons) = serde_json::to_string(&payload.add_ons) {
        params.push(("metadata[add_ons]".to_string(), add_ons));
    }

    params
}

impl StripeCheckoutProvider {
    pub fn new(
        secret_key: impl Into<String>,
        success_url: impl Into<String>,
        cancel_url: impl Into<String>,
    ) -> Self {
        StripeCheckoutProvider {
            secret_key: secret_key.into(),
            success_url: success_url.into(),
            cancel_url: cancel_url.into(),
            http: reqwest::Client::new(),
        }
    }

    pub fn from_env() -> Self {
        let secret_key = std::env::var("STRIPE_SECRET_KEY").expect("STRIPE_SECRET_KEY must be set");
        let success_url = std::env::var("CHECKOUT_SUCCESS_URL")
            .unwrap_or_else(|_| "http://localhost:3000/rentals?checkout=success".to_string());
        let cancel_url = std::env::var("CHECKOUT_CANCEL_URL")
            .unwrap_or_else(|_| "http://localhost:3000/cars?checkout=cancelled".to_string());
        Self::new(secret_key, success_url, cancel_url)
    }
}

impl CheckoutOperations for StripeCheckoutProvider {
    async fn create_checkout_session(
        &self,
        payload: &CheckoutPayload,
    ) -> Result<CheckoutSession, CheckoutError> {
        let params = session_params(payload, &self.success_url, &self.cancel_url);

        let res = match self
            .http
            .post("https://api.stripe.com/v1/checkout/sessions")
            .header("Authorization", format!("Bearer {}", self.secret_key))
            .form(&params)
            .send()
            .await
        {
            Ok(res) => res,
            Err(err) => {
                eprintln!("Checkout session request error: {:?}", err);
                return Err(CheckoutError::SessionCreationFailed);
            }
        };

        let status = res.status();
        let body = match res.text().await {
            Ok(body) => body,
            Err(err) => {
                eprintln!("Failed to read checkout session response: {:?}", err);
                return Err(CheckoutError::SessionCreationFailed);
            }
        };

        if !status.is_success() {
            eprintln!("Stripe error ({}): {}", status, body);
            return Err(CheckoutError::SessionCreationFailed);
        }

        let session = serde_json::from_str::<SessionResponse>(&body)
            .map_err(|_| CheckoutError::SessionCreationFailed)?;

        let session = CheckoutSession {
            session_id: session.id,
            url: session.url,
        };
        if session.redirect_target().is_none() {
            return Err(CheckoutError::NoRedirectTarget);
        }
        Ok(session)
    }
}
