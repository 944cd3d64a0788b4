use actix_web::{web, HttpResponse, Responder};
use bson::{doc, oid::ObjectId};
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::Client;
use std::sync::Arc;

use crate::{
    middleware::auth::Claims,
    models::{
        car::{Car, CarSnapshot},
        rental::{RentalDetails, RentalInput, STATUS_CANCELLED, STATUS_CONFIRMED, STATUS_PENDING},
    },
    services::booking::draft::{BookingAction, BookingDraft},
};

fn rentals_collection(client: &Client) -> mongodb::Collection<RentalDetails> {
    client.database("Rentals").collection("Rentals")
}

// The dashboard posts the same shape the wizard holds, so the draft reducer
// handles both
fn draft_from_input(car_id: String, car: CarSnapshot, input: RentalInput) -> BookingDraft {
    let mut draft = BookingDraft::new(car_id, car)
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
    draft.add_ons = input.add_ons;
    draft
}

/*
    POST /api/account/{id}/rentals/car/{car_id}

    Opens a rental record for the signed-in customer. Dates and totals are
    validated and recomputed here; whatever the client thinks the price was
    is ignored.
*/
pub async fn create_rental(
    data: web::Data<Arc<Client>>,
    input: web::Json<RentalInput>,
    path: web::Path<(String, String)>,
    claims: Claims,
) -> impl Responder {
    let (user_id, car_id) = path.into_inner();
    if user_id != claims.user_id {
        return HttpResponse::Forbidden().body("Forbidden");
    }

    let user_oid = match ObjectId::parse_str(&claims.user_id) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid user ID"),
    };
    let car_oid = match ObjectId::parse_str(&car_id) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid car ID"),
    };

    let client = data.into_inner();
    let input = input.into_inner();

    // The car must exist and still be listed as available
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

    // Full draft validation, payment method included, with recomputed totals
    let booking_draft = draft_from_input(car_id.clone(), CarSnapshot::from(&car), input);
    let payload = match booking_draft.finalize(Utc::now().date_naive()) {
        Ok(payload) => payload,
        Err(err) => return HttpResponse::BadRequest().body(err.to_string()),
    };

    let collection = rentals_collection(&client);

    // A customer keeps at most one live rental per car. Same find-then-insert
    // the rest of the API uses; there is no cross-request locking here.
    let duplicate_filter = doc! {
        "user_id": user_oid,
        "car_id": car_oid,
        "status": { "$in": [STATUS_PENDING, STATUS_CONFIRMED] },
    };

    match collection.find_one(duplicate_filter).await {
        Ok(Some(_)) => HttpResponse::Conflict().body("Rental already exists for this car"),
        Ok(None) => {
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

            match collection.insert_one(&rental).await {
                Ok(result) => HttpResponse::Ok().json(serde_json::json!({
                    "rental_id": result.inserted_id.as_object_id().map(|id| id.to_string()),
                    "total_days": payload.total_days,
                    "total_price": payload.total_price,
                    "status": STATUS_PENDING,
                })),
                Err(err) => {
                    eprintln!("Failed to create rental: {:?}", err);
                    HttpResponse::InternalServerError().body("Failed to create rental")
                }
            }
        }
        Err(err) => {
            eprintln!("Failed to check for existing rental: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to check for existing rental")
        }
    }
}

/*
    GET /api/account/{id}/rentals
*/
pub async fn get_all_rentals(
    data: web::Data<Arc<Client>>,
    path: web::Path<(String,)>,
    claims: Claims,
) -> impl Responder {
    if path.into_inner().0 != claims.user_id {
        return HttpResponse::Forbidden().body("Forbidden");
    }

    let user_oid = match ObjectId::parse_str(&claims.user_id) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid user ID"),
    };

    let client = data.into_inner();
    match rentals_collection(&client)
        .find(doc! { "user_id": user_oid })
        .sort(doc! { "created_at": -1 })
        .await
    {
        Ok(cursor) => match cursor.try_collect::<Vec<RentalDetails>>().await {
            Ok(rentals) => HttpResponse::Ok().json(rentals),
            Err(err) => {
                eprintln!("Error retrieving rentals: {:?}", err);
                HttpResponse::InternalServerError().body("Failed to retrieve rentals")
            }
        },
        Err(err) => {
            eprintln!("Error fetching rentals: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to fetch rentals")
        }
    }
}

/*
    GET /api/account/{id}/rentals/{rental_id}
*/
pub async fn get_rental_by_id(
    data: web::Data<Arc<Client>>,
    path: web::Path<(String, String)>,
    claims: Claims,
) -> impl Responder {
    let (user_id, rental_id) = path.into_inner();
    if user_id != claims.user_id {
        return HttpResponse::Forbidden().body("Forbidden");
    }

    let rental_oid = match ObjectId::parse_str(&rental_id) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid rental ID format"),
    };
    let user_oid = match ObjectId::parse_str(&claims.user_id) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid user ID"),
    };

    let client = data.into_inner();
    let filter = doc! { "_id": rental_oid, "user_id": user_oid };

    match rentals_collection(&client).find_one(filter).await {
        Ok(Some(rental)) => HttpResponse::Ok().json(rental),
        Ok(None) => HttpResponse::NotFound().body("Rental not found"),
        Err(err) => {
            eprintln!("Error fetching rental: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to fetch rental")
        }
    }
}

/*
    DELETE /api/account/{id}/rentals/{rental_id}

    Cancels rather than deletes, so the dashboard history survives.
*/
pub async fn cancel_rental(
    data: web::Data<Arc<Client>>,
    path: web::Path<(String, String)>,
    claims: Claims,
) -> impl Responder {
    let (user_id, rental_id) = path.into_inner();
    if user_id != claims.user_id {
        return HttpResponse::Forbidden().body("Forbidden");
    }

    let rental_oid = match ObjectId::parse_str(&rental_id) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid rental ID format"),
    };
    let user_oid = match ObjectId::parse_str(&claims.user_id) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid user ID"),
    };

    let client = data.into_inner();
    let filter = doc! { "_id": rental_oid, "user_id": user_oid };
    let update = doc! {
        "$set": {
            "status": STATUS_CANCELLED,
            // Matches the RFC 3339 strings chrono's serde impl writes
            "updated_at": Utc::now().to_rfc3339(),
        }
    };

    match rentals_collection(&client).update_one(filter, update).await {
        Ok(result) => {
            if result.matched_count == 0 {
                return HttpResponse::NotFound().body("Rental not found");
            }
            HttpResponse::Ok().body("Rental cancelled")
        }
        Err(err) => {
            eprintln!("Error cancelling rental: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to cancel rental")
        }
    }
}
