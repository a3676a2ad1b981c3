//! Signup / signin endpoints

use actix_web::{web, HttpResponse, Responder};

use super::internal_error;
use crate::models::{Credentials, JwtResponse};
use crate::users::AuthError;
use crate::AppState;

/// Register a new account
async fn signup(data: web::Data<AppState>, body: web::Json<Credentials>) -> impl Responder {
    match data.users.register(&body.email, &body.password) {
        Ok(user) => HttpResponse::Created().json(user),
        Err(e @ AuthError::EmailTaken(_)) => HttpResponse::BadRequest().json(serde_json::json!({
            "error": e.to_string()
        })),
        Err(e) => internal_error("Signup failed", e),
    }
}

/// Verify credentials and hand out a bearer token
async fn signin(data: web::Data<AppState>, body: web::Json<Credentials>) -> impl Responder {
    match data.users.login(&body.email, &body.password) {
        Ok(token) => HttpResponse::Ok().json(JwtResponse::new(token)),
        Err(e @ AuthError::InvalidCredentials) => {
            HttpResponse::Unauthorized().json(serde_json::json!({
                "error": e.to_string()
            }))
        }
        Err(e @ AuthError::NotFound(_)) => HttpResponse::NotFound().json(serde_json::json!({
            "error": e.to_string()
        })),
        Err(e) => internal_error("Signin failed", e),
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/auth")
            .route("/signup", web::post().to(signup))
            .route("/signin", web::post().to(signin)),
    );
}
