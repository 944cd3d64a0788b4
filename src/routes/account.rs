use actix_web::{web, HttpResponse, Responder};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use mongodb::bson::doc;
use mongodb::bson::oid::ObjectId;
use mongodb::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::middleware::auth::Claims;
use crate::models::user::{UserAccount, UserSession, ROLE_CUSTOMER};

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    auth_token: String,
}

#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub role: Option<String>,
}

fn users_collection(client: &Client) -> mongodb::Collection<UserAccount> {
    client.database("Accounts").collection("Users")
}

pub async fn signup(data: web::Data<Arc<Client>>, input: web::Json<Credentials>) -> impl Responder {
    let client = data.into_inner();
    let collection = users_collection(&client);

    let input = input.into_inner();

    // Reject duplicate emails up front
    match collection.find_one(doc! { "email": &input.email }).await {
        Ok(Some(_)) => return HttpResponse::Conflict().body("Email already registered"),
        Ok(None) => {}
        Err(err) => {
            eprintln!("Database error: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to create account.");
        }
    }

    let hashed = match bcrypt::hash(&input.password, bcrypt::DEFAULT_COST) {
        Ok(hashed) => hashed,
        Err(err) => {
            eprintln!("Failed to hash password: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to create account.");
        }
    };

    let curr_time = Utc::now();
    let role = input.role.unwrap_or_else(|| ROLE_CUSTOMER.to_string());
    let user = UserAccount {
        id: None,
        email: input.email.clone(),
        password: hashed,
        first_name: input.first_name,
        last_name: input.last_name,
        phone_number: input.phone_number,
        role: Some(role.clone()),
        last_signin: None,
        failed_signins: None,
        created_at: Some(curr_time),
        updated_at: Some(curr_time),
    };

    match collection.insert_one(&user).await {
        Ok(result) => {
            let user_id = match result.inserted_id.as_object_id() {
                Some(id) => id,
                None => {
                    return HttpResponse::InternalServerError().body("Failed to create account.")
                }
            };
            match generate_token(&user.email, user_id, &role) {
                Ok(token) => HttpResponse::Ok().json(TokenResponse { auth_token: token }),
                Err(_) => HttpResponse::InternalServerError().body("Token generation failed"),
            }
        }
        Err(err) => {
            eprintln!("Failed to insert document: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to create account.")
        }
    }
}

pub async fn signin(data: web::Data<Arc<Client>>, input: web::Json<Credentials>) -> impl Responder {
    let client = data.into_inner();
    let collection = users_collection(&client);

    let input = input.into_inner();
    let filter = doc! { "email": &input.email };

    match collection.find_one(filter).await {
        Ok(Some(user)) => {
            if bcrypt::verify(&input.password, &user.password).unwrap_or(false) {
                let update = doc! {
                    "$set": {
                        "last_signin": Utc::now().to_rfc3339(),
                        "failed_signins": 0
                    }
                };

                if let Err(err) = collection
                    .update_one(doc! { "email": &input.email }, update)
                    .await
                {
                    eprintln!("Failed to update document: {:?}", err);
                    return HttpResponse::InternalServerError().body("Failed to sign in.");
                }

                let user_id = match user.id {
                    Some(id) => id,
                    None => return HttpResponse::InternalServerError().body("Failed to sign in."),
                };
                let role = user.role.as_deref().unwrap_or(ROLE_CUSTOMER);
                match generate_token(&input.email, user_id, role) {
                    Ok(token) => HttpResponse::Ok().json(TokenResponse { auth_token: token }),
                    Err(_) => HttpResponse::InternalServerError().body("Token generation failed"),
                }
            } else {
                let failed_signins = user.failed_signins.unwrap_or(0) + 1;
                let update = doc! {
                    "$set": { "failed_signins": failed_signins }
                };

                match collection
                    .update_one(doc! { "email": &input.email }, update)
                    .await
                {
                    Ok(_) => HttpResponse::Unauthorized().body("Invalid credentials"),
                    Err(err) => {
                        eprintln!("Failed to update failed signins: {:?}", err);
                        HttpResponse::InternalServerError().body("Failed to process signin")
                    }
                }
            }
        }
        Ok(None) => HttpResponse::NotFound().body("User not found"),
        Err(err) => {
            eprintln!("Database error: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to process signin")
        }
    }
}

pub async fn user_session(claims: Claims, data: web::Data<Arc<Client>>) -> impl Responder {
    let client = data.into_inner();
    let collection = users_collection(&client);

    let user_id = match ObjectId::parse_str(&claims.user_id) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid user ID"),
    };

    match collection.find_one(doc! { "_id": user_id }).await {
        Ok(Some(user)) => {
            let user_session = UserSession {
                id: user.id.unwrap_or_default(),
                email: user.email,
                first_name: user.first_name.unwrap_or_default(),
                last_name: user.last_name.unwrap_or_default(),
                role: user.role.unwrap_or_else(|| ROLE_CUSTOMER.to_string()),
                created_at: user.created_at.unwrap_or_default(),
            };
            HttpResponse::Ok().json(user_session)
        }
        Ok(None) => HttpResponse::NotFound().body("User not found"),
        Err(err) => {
            eprintln!("Failed to fetch user: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to fetch user")
        }
    }
}

fn generate_token(
    email: &str,
    user_id: ObjectId,
    role: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let secret = std::env::var("JWT_SECRET").expect("JWT_SECRET must be set");
    let now = Utc::now();

    let claims = Claims {
        sub: email.to_string(),
        iat: now.timestamp() as usize,
        exp: (now + Duration::hours(24)).timestamp() as usize,
        user_id: user_id.to_string(),
        role: role.to_string(),
    };

    let header = Header::new(Algorithm::HS256);
    encode(&header, &claims, &EncodingKey::from_secret(secret.as_ref()))
}
