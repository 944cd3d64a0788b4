use chrono::NaiveDate;

use crate::models::checkout::CheckoutSession;
use crate::services::booking::draft::{BookingAction, BookingDraft};
use crate::services::booking::BookingError;
use crate::services::payment::interface::CheckoutOperations;

/// The two steps of the booking flow. A successful submission from the
/// payment step ends in an external checkout redirect, which is terminal for
/// the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStep {
    DatesAndOptions,
    Payment,
}

/// Drives a single booking flow for one car: owns the draft, tracks the
/// current step, and gates submission so only one checkout request can be in
/// flight. Dropping the wizard discards the draft.
#[derive(Debug)]
pub struct BookingWizard {
    draft: BookingDraft,
    step: BookingStep,
    submitting: bool,
    last_error: Option<BookingError>,
    redirect: Option<CheckoutSession>,
}

impl BookingWizard {
    pub fn new(draft: BookingDraft) -> Self {
        BookingWizard {
            draft,
            step: BookingStep::DatesAndOptions,
            submitting: false,
            last_error: None,
            redirect: None,
        }
    }

    pub fn step(&self) -> BookingStep {
        self.step
    }

    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn last_error(&self) -> Option<&BookingError> {
        self.last_error.as_ref()
    }

    /// Where the flow ended up after a successful submission.
    pub fn redirect(&self) -> Option<&CheckoutSession> {
        self.redirect.as_ref()
    }

    /// Routes a field edit through the draft reducer. Edits clear the last
    /// validation message so stale errors don't linger under a fixed form.
    pub fn dispatch(&mut self, action: BookingAction) {
        self.draft = self.draft.clone().apply(action);
        self.last_error = None;
    }

    /// Advance from the dates step once it validates. Leaving the payment
    /// step is `submit`, not `next`.
    pub fn next(&mut self, today: NaiveDate) -> Result<BookingStep, BookingError> {
        let checked = match self.step {
            BookingStep::DatesAndOptions => self
                .draft
                .validate_details(today)
                .map(|()| BookingStep::Payment),
            BookingStep::Payment => self.draft.validate_payment().map(|()| BookingStep::Payment),
        };

        match checked {
            Ok(step) => {
                self.step = step;
                self.last_error = None;
                Ok(step)
            }
            Err(err) => {
                self.last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Return to the previous step. The draft is untouched.
    pub fn back(&mut self) {
        if self.step == BookingStep::Payment && !self.submitting {
            self.step = BookingStep::DatesAndOptions;
            self.last_error = None;
        }
    }

    /// Cancelling is only offered on the first step, and never while a
    /// checkout request is outstanding.
    pub fn can_cancel(&self) -> bool {
        self.step == BookingStep::DatesAndOptions && !self.submitting
    }

    /// Abandon the flow, discarding the draft.
    pub fn cancel(self) {}

    /// The payment-step submit: re-validates everything, then asks the
    /// checkout provider for a session. The submitting flag blocks a second
    /// click while the request is in flight; on failure it resets, the error
    /// is kept for display, and the draft is untouched so the user can retry.
    pub async fn submit<P: CheckoutOperations>(
        &mut self,
        today: NaiveDate,
        provider: &P,
    ) -> Result<CheckoutSession, BookingError> {
        if self.submitting {
            return Err(BookingError::SubmissionFailed);
        }

        let payload = match self.draft.finalize(today) {
            Ok(payload) => payload,
            Err(err) => {
                self.last_error = Some(err.clone());
                return Err(err);
            }
        };

        self.submitting = true;
        let result = provider.create_checkout_session(&payload).await;
        self.submitting = false;

        match result {
            Ok(session) => {
                self.last_error = None;
                self.redirect = Some(session.clone());
                Ok(session)
            }
            Err(err) => {
                let err = BookingError::from(err);
                self.last_error = Some(err.clone());
                Err(err)
            }
        }
    }
}
