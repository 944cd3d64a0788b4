use actix_web::{web, HttpRequest, HttpResponse, Responder};
use bson::{doc, oid::ObjectId, Document};
use chrono::Utc;
use mongodb::Client;
use std::sync::Arc;
use stripe::{EventObject, EventType, Webhook};

use crate::{
    middleware::auth::Claims,
    models::{
        car::{Car, CarSnapshot},
        checkout::{CheckoutRequest, CheckoutSession},
        rental::{RentalDetails, STATUS_CONFIRMED, STATUS_PAYMENT_FAILED, STATUS_PENDING},
    },
    services::{
        booking::draft::{BookingAction, BookingDraft},
        booking::BookingError,
        payment::interface::CheckoutOperations,
        stripe::provider::StripeCheckoutProvider,
    },
};

#[derive(Clone)]
pub struct StripeConfig {
    pub webhook_secret: String,
}

/// 400 for problems with the customer's own input, 502 when the payment
/// provider is at fault.
fn booking_error_response(err: &BookingError) -> HttpResponse {
    if err.is_validation() {
        HttpResponse::BadRequest().body(err.to_string())
    } else {
        HttpResponse::BadGateway().body(err.to_string())
    }
}

fn attach_session_update(session: &CheckoutSession) -> Document {
    doc! {
        "$set": {
            "checkout_session_id": session.session_id.clone(),
            "updated_at": Utc::now().to_rfc3339(),
        }
    }
}

/*
    POST /api/checkout/session

    Runs the booking draft through the same validation and pricing the
    wizard uses, then asks Stripe for a hosted checkout session. The client
    only learns the redirect target; totals are computed here.

    The pending rental is written before Stripe is asked for a session, so
    a live session always has a record for the webhook to confirm.
*/
pub async fn create_checkout_session(
    claims: Claims,
    data: web::Data<Arc<Client>>,
    provider: web::Data<StripeCheckoutProvider>,
    input: web::Json<CheckoutRequest>,
) -> impl Responder {
    println!("Creating checkout session...");

    let input = input.into_inner();
    let client = data.into_inner();

    let user_oid = match ObjectId::parse_str(&claims.user_id) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid user ID"),
    };
    let car_oid = match ObjectId::parse_str(&input.car_id) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid car ID"),
    };

    let cars: mongodb::Collection<Car> = client.database("Rentals").collection("Cars");
    let car = match cars.find_one(doc! { "_id": car_oid }).await {
        Ok(Some(car)) => car,
        Ok(None) => return HttpResponse::NotFound().body("Car not found"),
        Err(err) => {
            eprintln!("Failed to look up car: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to look up car");
        }
    };
    if !car.is_available {
        return HttpResponse::Conflict().body("Car is not available");
    }

    let mut booking_draft = BookingDraft::new(input.car_id.clone(), CarSnapshot::from(&car))
        .apply(BookingAction::SetDates {
            start_date: input.start_date,
            end_date: input.end_date,
        })
        .apply(BookingAction::SetLocations {
            pickup: input.pickup_location,
            dropoff: input.dropoff_location,
        })
        .apply(BookingAction::SetPaymentMethod(input.payment_method))
        .apply(BookingAction::SetSpecialRequests(input.special_requests));
    booking_draft.add_ons = input.add_ons;

    let payload = match booking_draft.finalize(Utc::now().date_naive()) {
        Ok(payload) => payload,
        Err(err) => return booking_error_response(&err),
    };

    // One live rental per user and car, checked before we touch Stripe
    let rentals: mongodb::Collection<RentalDetails> =
        client.database("Rentals").collection("Rentals");
    let duplicate_filter = doc! {
        "user_id": user_oid,
        "car_id": car_oid,
        "status": { "$in": [STATUS_PENDING, STATUS_CONFIRMED] },
    };
    match rentals.find_one(duplicate_filter).await {
        Ok(Some(_)) => return HttpResponse::Conflict().body("Rental already exists for this car"),
        Ok(None) => {}
        Err(err) => {
            eprintln!("Failed to check for existing rental: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to check for existing rental");
        }
    }

    // The pending rental goes in first; the session id is attached below
    let time = Utc::now();
    let rental = RentalDetails {
        id: None,
        user_id: user_oid,
        car_id: car_oid,
        car: payload.car.clone(),
        start_date: payload.start_date,
        end_date: payload.end_date,
        total_days: payload.total_days,
        total_price: payload.total_price,
        add_ons: payload.add_ons,
        pickup_location: payload.pickup_location.clone(),
        dropoff_location: payload.dropoff_location.clone(),
        special_requests: payload.special_requests.clone(),
        status: STATUS_PENDING.to_string(),
        checkout_session_id: None,
        created_at: Some(time),
        updated_at: Some(time),
    };

    let rental_id = match rentals.insert_one(&rental).await {
        Ok(result) => match result.inserted_id.as_object_id() {
            Some(id) => id,
            None => {
                return HttpResponse::InternalServerError().body("Failed to record pending rental")
            }
        },
        Err(err) => {
            eprintln!("Failed to record pending rental: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to record pending rental");
        }
    };

    let session = match provider.create_checkout_session(&payload).await {
        Ok(session) => session,
        Err(err) => {
            eprintln!("Checkout session error: {:?}", err);
            // No session opened, so the placeholder rental can go
            if let Err(err) = rentals.delete_one(doc! { "_id": rental_id }).await {
                eprintln!(
                    "Failed to remove rental {} after checkout error: {:?}",
                    rental_id, err
                );
            }
            return booking_error_response(&BookingError::from(err));
        }
    };

    match rentals
        .update_one(doc! { "_id": rental_id }, attach_session_update(&session))
        .await
    {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "rental_id": rental_id.to_string(),
            "session_id": session.session_id,
            "url": session.url,
            "total_days": payload.total_days,
            "total_price": payload.total_price,
        })),
        Err(err) => {
            // The hosted session is live. Keep its id in the log so the
            // rental can be reconciled by hand.
            eprintln!(
                "Failed to attach session {:?} to rental {}: {:?}",
                session.session_id, rental_id, err
            );
            HttpResponse::InternalServerError().body("Failed to record checkout session")
        }
    }
}

async fn set_rental_status_by_session(
    client: &Client,
    session_id: &str,
    status: &str,
) -> Result<(), String> {
    let rentals: mongodb::Collection<RentalDetails> =
        client.database("Rentals").collection("Rentals");
    let update = doc! {
        "$set": {
            "status": status,
            "updated_at": Utc::now().to_rfc3339(),
        }
    };
    match rentals
        .update_one(doc! { "checkout_session_id": session_id }, update)
        .await
    {
        Ok(result) if result.matched_count == 0 => {
            Err(format!("No rental found for session {}", session_id))
        }
        Ok(_) => Ok(()),
        Err(err) => Err(format!(
            "Failed to mark rental {} for session {}: {:?}",
            status, session_id, err
        )),
    }
}

/// 200 tells Stripe the event is handled. Anything else makes it redeliver,
/// which is what we want when the status update did not land.
fn acknowledge(outcome: Result<(), String>) -> HttpResponse {
    match outcome {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "received": true })),
        Err(err) => {
            eprintln!("Webhook update failed: {}", err);
            HttpResponse::InternalServerError().body("Failed to update rental status")
        }
    }
}

/*
    POST /stripe/webhook
*/
pub async fn handle_stripe_webhook(
    req: HttpRequest,
    payload: web::Bytes,
    stripe_config: web::Data<StripeConfig>,
    data: web::Data<Arc<Client>>,
) -> impl Responder {
    let signature = match req.headers().get("stripe-signature") {
        Some(sig) => sig.to_str().unwrap_or(""),
        None => {
            return HttpResponse::BadRequest().body("Missing stripe-signature header");
        }
    };

    let payload_str = match String::from_utf8(payload.to_vec()) {
        Ok(s) => s,
        Err(_) => {
            return HttpResponse::BadRequest().body("Invalid payload encoding");
        }
    };

    let event =
        match Webhook::construct_event(&payload_str, signature, &stripe_config.webhook_secret) {
            Ok(event) => event,
            Err(e) => {
                println!("Webhook error: {:?}", e);
                return HttpResponse::BadRequest().body(format!("Webhook error: {}", e));
            }
        };

    let client = data.into_inner();

    match event.type_ {
        EventType::CheckoutSessionCompleted => {
            if let EventObject::CheckoutSession(session) = event.data.object {
                println!("Checkout completed: {}", session.id);
                acknowledge(
                    set_rental_status_by_session(&client, session.id.as_str(), STATUS_CONFIRMED)
                        .await,
                )
            } else {
                HttpResponse::BadRequest().body("Invalid checkout session object")
            }
        }

        EventType::CheckoutSessionAsyncPaymentFailed | EventType::CheckoutSessionExpired => {
            if let EventObject::CheckoutSession(session) = event.data.object {
                println!("Checkout failed or expired: {}", session.id);
                acknowledge(
                    set_rental_status_by_session(
                        &client,
                        session.id.as_str(),
                        STATUS_PAYMENT_FAILED,
                    )
                    .await,
                )
            } else {
                HttpResponse::BadRequest().body("Invalid checkout session object")
            }
        }

        // Acknowledge everything else so Stripe stops retrying
        _ => {
            println!("Unhandled event type: {:?}", event.type_);
            HttpResponse::Ok().json(serde_json::json!({ "received": true }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn failed_status_update_is_not_acknowledged() {
        let response = acknowledge(Err("No rental found for session cs_test_123".to_string()));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn successful_status_update_is_acknowledged() {
        assert_eq!(acknowledge(Ok(())).status(), StatusCode::OK);
    }

    #[test]
    fn booking_errors_split_into_client_and_gateway_responses() {
        assert_eq!(
            booking_error_response(&BookingError::MissingDate).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            booking_error_response(&BookingError::UnsupportedPaymentMethod("Mobile money"))
                .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            booking_error_response(&BookingError::SessionCreationFailed).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            booking_error_response(&BookingError::NoRedirectTarget).status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn attach_update_carries_the_session_id() {
        let session = CheckoutSession {
            session_id: Some("cs_test_123".to_string()),
            url: None,
        };
        let update = attach_session_update(&session);
        let set = update.get_document("$set").unwrap();
        assert_eq!(set.get_str("checkout_session_id").unwrap(), "cs_test_123");
    }
}
