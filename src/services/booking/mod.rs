pub mod dates;
pub mod draft;
pub mod wizard;

use thiserror::Error;

/// Everything that can interrupt the booking flow. All of these are
/// recoverable: the user stays on the current step with the draft intact and
/// the message is shown as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookingError {
    #[error("Please select both a pick-up and a return date")]
    MissingDate,
    #[error("The pick-up date cannot be in the past")]
    PastStartDate,
    #[error("The return date must be after the pick-up date")]
    InvalidRange,
    #[error("Please choose a pick-up location")]
    MissingPickupLocation,
    #[error("{0} payments are coming soon. Please pay by card for now")]
    UnsupportedPaymentMethod(&'static str),
    #[error("Could not start the payment session. Please try again")]
    SessionCreationFailed,
    #[error("The payment provider did not return a redirect target")]
    NoRedirectTarget,
    #[error("Could not submit the reservation. Please try again")]
    SubmissionFailed,
}

impl BookingError {
    /// Validation failures come from the user's own input and map to 400s;
    /// the rest are provider or network trouble. The split only affects how
    /// the error is reported, never the flow itself.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            BookingError::MissingDate
                | BookingError::PastStartDate
                | BookingError::InvalidRange
                | BookingError::MissingPickupLocation
                | BookingError::UnsupportedPaymentMethod(_)
        )
    }
}
