use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpResponse, Responder};
use chrono::NaiveDate;

use rentride_api::models::car::CarSnapshot;
use rentride_api::models::checkout::CheckoutRequest;
use rentride_api::services::booking::draft::{BookingAction, BookingDraft};

/// Route harness for the integration tests. Handlers that would hit MongoDB
/// or Stripe are stubbed; the checkout handler runs the real draft
/// validation and pricing so the flow-level behavior is the production one.
pub struct TestApp;

pub fn test_car() -> CarSnapshot {
    CarSnapshot {
        brand: "Toyota".to_string(),
        model: "Corolla".to_string(),
        year: 2022,
        daily_rate: 40.0,
        image_url: None,
    }
}

/// Fixed clock for the handlers, so the tests are not flaky around midnight.
pub fn test_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

impl TestApp {
    pub fn new() -> Self {
        TestApp
    }

    pub fn create_app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .route("/", web::get().to(|| async { "RentRide API is running" }))
            .route("/health", web::get().to(health_check))
            .route("/api/cars", web::get().to(get_cars))
            .route("/api/cars/{id}", web::get().to(get_car_by_id))
            .service(
                web::scope("/api/auth")
                    .route("/signin", web::post().to(signin))
                    .route("/signup", web::post().to(signup))
                    .route("/session", web::get().to(unauthorized_handler)),
            )
            .route(
                "/api/checkout/session",
                web::post().to(checkout_session_with_real_validation),
            )
            .service(
                web::scope("/api/account/{id}/rentals")
                    .route("", web::get().to(unauthorized_handler))
                    .route("/car/{car_id}", web::post().to(unauthorized_handler))
                    .route("/{rental_id}", web::get().to(unauthorized_handler))
                    .route("/{rental_id}", web::delete().to(unauthorized_handler)),
            )
            .route("/stripe/webhook", web::post().to(stripe_webhook))
    }
}

// Mock handler functions for testing
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({"status": "ok"}))
}

async fn get_cars() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!([]))
}

async fn get_car_by_id() -> impl Responder {
    HttpResponse::NotFound().json(serde_json::json!({"error": "Car not found"}))
}

async fn signin() -> impl Responder {
    HttpResponse::Unauthorized().json(serde_json::json!({"error": "Invalid credentials"}))
}

async fn signup() -> impl Responder {
    HttpResponse::BadRequest().json(serde_json::json!({"error": "Invalid input"}))
}

// The real validation and pricing path, with the car catalog and the
// checkout provider replaced by fixtures
async fn checkout_session_with_real_validation(
    input: web::Json<CheckoutRequest>,
) -> impl Responder {
    let input = input.into_inner();

    let mut draft = BookingDraft::new(input.car_id.clone(), test_car())
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

    match draft.finalize(test_today()) {
        Ok(payload) => HttpResponse::Ok().json(serde_json::json!({
            "session_id": "cs_test_123",
            "url": "https://checkout.example/cs_test_123",
            "total_days": payload.total_days,
            "total_price": payload.total_price,
        })),
        Err(err) => HttpResponse::BadRequest().body(err.to_string()),
    }
}

async fn stripe_webhook() -> impl Responder {
    HttpResponse::BadRequest().json(serde_json::json!({"error": "Invalid webhook"}))
}

async fn unauthorized_handler() -> impl Responder {
    HttpResponse::Unauthorized().json(serde_json::json!({"error": "Unauthorized"}))
}
