pub mod auth;
pub mod health;
pub mod notes;
pub mod users;

use actix_web::HttpResponse;

/// Generic 500 body. Internal detail goes to the log, never to the caller.
pub(crate) fn internal_error(context: &str, err: impl std::fmt::Display) -> HttpResponse {
    log::error!("{}: {}", context, err);
    HttpResponse::InternalServerError().json(serde_json::json!({
        "error": "Something went wrong on the server"
    }))
}
