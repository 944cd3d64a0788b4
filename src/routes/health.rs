use actix_web::{web, HttpResponse, Responder};
use mongodb::{bson::doc, Client};
use serde::Serialize;
use std::collections::HashMap;
use std::env;
use std::sync::Arc;

#[derive(Serialize)]
struct HealthStatus {
    status: String,
    services: HashMap<String, ServiceStatus>,
    environment: String,
    version: String,
}

#[derive(Serialize, Clone)]
struct ServiceStatus {
    status: String,
    details: Option<String>,
}

pub async fn health_check(client: web::Data<Arc<Client>>) -> impl Responder {
    let mut health = HealthStatus {
        status: "ok".to_string(),
        services: HashMap::new(),
        environment: env::var("RUST_ENV").unwrap_or("development".to_string()),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    let mongo_result = check_mongodb(&client).await;
    health
        .services
        .insert("mongodb".to_string(), mongo_result.clone());

    let stripe_result = check_stripe_config();
    health
        .services
        .insert("stripe".to_string(), stripe_result.clone());

    // Any unhealthy dependency degrades the overall status
    if mongo_result.status != "ok" || stripe_result.status != "ok" {
        health.status = "degraded".to_string();
    }

    HttpResponse::Ok().json(health)
}

async fn check_mongodb(client: &web::Data<Arc<Client>>) -> ServiceStatus {
    match client
        .database("Rentals")
        .run_command(doc! {"ping": 1})
        .await
    {
        Ok(_) => ServiceStatus {
            status: "ok".to_string(),
            details: None,
        },
        Err(e) => ServiceStatus {
            status: "error".to_string(),
            details: Some(format!("MongoDB ping failed: {}", e)),
        },
    }
}

// Key existence only; we never call Stripe from the health probe
fn check_stripe_config() -> ServiceStatus {
    match env::var("STRIPE_SECRET_KEY") {
        Ok(key) if !key.is_empty() => ServiceStatus {
            status: "ok".to_string(),
            details: None,
        },
        _ => ServiceStatus {
            status: "error".to_string(),
            details: Some("STRIPE_SECRET_KEY is not set".to_string()),
        },
    }
}
