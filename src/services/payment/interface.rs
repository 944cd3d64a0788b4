use thiserror::Error;

use crate::models::checkout::{CheckoutPayload, CheckoutSession};
use crate::services::booking::BookingError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("failed to create a checkout session")]
    SessionCreationFailed,
    #[error("checkout session carried neither a redirect url nor a session id")]
    NoRedirectTarget,
}

impl From<CheckoutError> for BookingError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::SessionCreationFailed => BookingError::SessionCreationFailed,
            CheckoutError::NoRedirectTarget => BookingError::NoRedirectTarget,
        }
    }
}

/// Boundary to the hosted checkout provider. The booking flow only ever sees
/// this trait; the Stripe implementation lives in `services::stripe`.
pub trait CheckoutOperations {
    async fn create_checkout_session(
        &self,
        payload: &CheckoutPayload,
    ) -> Result<CheckoutSession, CheckoutError>;
}
