use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use rentride_api::routes::checkout::StripeConfig;
use rentride_api::services::stripe::provider::StripeCheckoutProvider;
use rentride_api::{db, middleware, routes};

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    println!("Application starting...");

    env_logger::init_from_env(Env::default().default_filter_or("info"));

    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    } else {
        println!("Release mode");
    }

    let host = std::env::var("HOST").unwrap_or_else(|_| HOST.to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| PORT.to_string())
        .parse()
        .unwrap_or(PORT);
    println!("Attempting to bind to {}:{}", host, port);

    let mongo_uri = std::env::var("MONGODB_URI").expect("MONGODB_URI must be set");
    let client = db::mongo::create_mongo_client(&mongo_uri).await;
    println!("MongoDB connection established");

    let checkout_provider = web::Data::new(StripeCheckoutProvider::from_env());
    let stripe_config = web::Data::new(StripeConfig {
        webhook_secret: std::env::var("STRIPE_WEBHOOK_SECRET")
            .unwrap_or_else(|_| String::new()),
    });

    println!("Starting HTTP server...");

    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .route("/health", web::get().to(routes::health::health_check))
            .app_data(web::Data::new(client.clone()))
            .app_data(checkout_provider.clone())
            .app_data(stripe_config.clone())
            .route(
                "/stripe/webhook",
                web::post().to(routes::checkout::handle_stripe_webhook),
            )
            .service(
                web::scope("/api")
                    // Public routes
                    .service(
                        web::scope("/auth")
                            .route("/signup", web::post().to(routes::account::signup))
                            .route("/signin", web::post().to(routes::account::signin))
                            .service(
                                web::scope("").wrap(middleware::auth::AuthMiddleware).route(
                                    "/session",
                                    web::get().to(routes::account::user_session),
                                ),
                            ),
                    )
                    .service(
                        web::scope("/cars")
                            .route("", web::get().to(routes::car::get_all))
                            .route("/{id}", web::get().to(routes::car::get_by_id)),
                    )
                    // Protected routes
                    .service(
                        web::scope("/checkout")
                            .wrap(middleware::auth::AuthMiddleware)
                            .route(
                                "/session",
                                web::post().to(routes::checkout::create_checkout_session),
                            ),
                    )
                    .service(
                        web::scope("/account/{id}/rentals")
                            .wrap(middleware::auth::AuthMiddleware)
                            .route("", web::get().to(routes::rental::get_all_rentals))
                            .route(
                                "/car/{car_id}",
                                web::post().to(routes::rental::create_rental),
                            )
                            .route(
                                "/{rental_id}",
                                web::get().to(routes::rental::get_rental_by_id),
                            )
                            .route(
                                "/{rental_id}",
                                web::delete().to(routes::rental::cancel_rental),
                            ),
                    ),
            )
    })
    .bind((host, port))?
    .run()
    .await
}
