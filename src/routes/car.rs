use actix_web::{web, HttpResponse, Responder};
use bson::doc;
use futures::TryStreamExt;
use mongodb::{bson::oid::ObjectId, Client};
use std::sync::Arc;

use crate::models::car::Car;

/*
    /api/cars/{id}
*/
pub async fn get_by_id(path: web::Path<String>, data: web::Data<Arc<Client>>) -> impl Responder {
    let client = data.into_inner();
    let collection: mongodb::Collection<Car> = client.database("Rentals").collection("Cars");
    let id: ObjectId = match ObjectId::parse_str(path.into_inner().as_str()) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid car ID"),
    };

    // Legacy rate field names are folded into daily_rate by the Car model,
    // so the canonical shape is what goes out on the wire
    match collection.find_one(doc! { "_id": id }).await {
        Ok(Some(car)) => HttpResponse::Ok().json(car),
        Ok(None) => HttpResponse::NotFound().body("Car not found"),
        Err(err) => {
            eprintln!("Failed to retrieve car: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to retrieve car")
        }
    }
}

/*
    /api/cars (Get available cars - public endpoint)
*/
pub async fn get_all(data: web::Data<Arc<Client>>) -> impl Responder {
    let client = data.into_inner();
    let collection = client.database("Rentals").collection::<Car>("Cars");

    let cursor = collection
        .find(doc! { "is_available": true })
        .sort(doc! { "created_at": -1 })
        .limit(100)
        .await;

    match cursor {
        Ok(cursor) => match cursor.try_collect::<Vec<Car>>().await {
            Ok(cars) => HttpResponse::Ok().json(cars),
            Err(err) => {
                eprintln!("Failed to collect cars: {:?}", err);
                HttpResponse::InternalServerError().body("Failed to process cars")
            }
        },
        Err(err) => {
            eprintln!("Failed to retrieve cars: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to retrieve cars")
        }
    }
}
