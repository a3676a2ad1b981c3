//! User administration endpoints
//!
//! Deleting an account is ADMIN-only; everything else here requires any
//! authenticated identity.

use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde::Deserialize;

use super::internal_error;
use crate::auth::require_identity;
use crate::models::{Role, UpdateUserRequest};
use crate::users::AuthError;
use crate::AppState;

fn auth_error_response(context: &str, e: AuthError) -> HttpResponse {
    match e {
        AuthError::NotFound(_) => HttpResponse::NotFound().json(serde_json::json!({
            "error": e.to_string()
        })),
        e => internal_error(context, e),
    }
}

async fn list_users(data: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    if let Err(resp) = require_identity(&data, &req) {
        return resp;
    }

    match data.users.list_all() {
        Ok(users) => HttpResponse::Ok().json(users),
        Err(e) => auth_error_response("Failed to list users", e),
    }
}

/// The account behind the caller's token
async fn get_current_user(data: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    let identity = match require_identity(&data, &req) {
        Ok(identity) => identity,
        Err(resp) => return resp,
    };

    match data.users.find_by_email(&identity.email) {
        Ok(user) => HttpResponse::Ok().json(user),
        Err(e) => auth_error_response("Failed to get current user", e),
    }
}

/// Update the caller's own email and/or password
async fn update_current_user(
    data: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<UpdateUserRequest>,
) -> impl Responder {
    let identity = match require_identity(&data, &req) {
        Ok(identity) => identity,
        Err(resp) => return resp,
    };

    match data.users.update_current(
        &identity.email,
        body.email.as_deref(),
        body.password.as_deref(),
    ) {
        Ok(user) => HttpResponse::Ok().json(user),
        Err(e) => auth_error_response("Failed to update current user", e),
    }
}

async fn get_user(
    data: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> impl Responder {
    if let Err(resp) = require_identity(&data, &req) {
        return resp;
    }

    match data.users.find_by_id(path.into_inner()) {
        Ok(user) => HttpResponse::Ok().json(user),
        Err(e) => auth_error_response("Failed to get user", e),
    }
}

#[derive(Deserialize)]
struct EmailQuery {
    email: String,
}

async fn get_user_by_email(
    data: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<EmailQuery>,
) -> impl Responder {
    if let Err(resp) = require_identity(&data, &req) {
        return resp;
    }

    match data.users.find_by_email(&query.email) {
        Ok(user) => HttpResponse::Ok().json(user),
        Err(e) => auth_error_response("Failed to get user", e),
    }
}

/// Delete an account and, by cascade, all of its notes. ADMIN only.
async fn delete_user(
    data: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> impl Responder {
    let identity = match require_identity(&data, &req) {
        Ok(identity) => identity,
        Err(resp) => return resp,
    };

    if !identity.roles.contains(&Role::Admin) {
        return HttpResponse::Forbidden().json(serde_json::json!({
            "error": "Admin role required"
        }));
    }

    match data.users.delete(path.into_inner()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => auth_error_response("Failed to delete user", e),
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/users")
            .route("/all", web::get().to(list_users))
            .route("/me", web::get().to(get_current_user))
            .route("/me", web::put().to(update_current_user))
            .route("", web::get().to(get_user_by_email))
            .route("/{id}", web::get().to(get_user))
            .route("/{id}", web::delete().to(delete_user)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{test, App};

    use crate::auth::TokenProvider;
    use crate::db::Database;
    use crate::notes::NoteStore;
    use crate::users::UserDirectory;

    const SECRET: &str = "test-secret";

    fn state_with_db() -> (Arc<Database>, AppState) {
        let db = Arc::new(Database::open_in_memory().expect("Failed to open database"));
        let tokens = TokenProvider::new(SECRET.to_string(), 60_000);
        let state = AppState {
            db: Arc::clone(&db),
            tokens: tokens.clone(),
            users: Arc::new(UserDirectory::new(Arc::clone(&db), tokens)),
            notes: Arc::new(NoteStore::new(Arc::clone(&db))),
        };
        (db, state)
    }

    fn bearer(email: &str) -> (&'static str, String) {
        let token = TokenProvider::new(SECRET.to_string(), 60_000)
            .issue(email)
            .unwrap();
        ("Authorization", format!("Bearer {}", token))
    }

    #[actix_web::test]
    async fn test_delete_requires_admin_role() {
        let (db, state) = state_with_db();
        let alice = db.create_user("alice@x.com", "hash", &[Role::User]).unwrap();
        db.create_user("bob@x.com", "hash", &[Role::User]).unwrap();

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(config),
        )
        .await;

        // Bob holds only the USER role and must not be able to delete Alice
        let req = test::TestRequest::delete()
            .uri(&format!("/api/users/{}", alice.id))
            .insert_header(bearer("bob@x.com"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        // Alice's account (and therefore her notes) survives
        assert!(db.find_user_by_id(alice.id).unwrap().is_some());
    }

    #[actix_web::test]
    async fn test_admin_can_delete_account() {
        let (db, state) = state_with_db();
        let alice = db.create_user("alice@x.com", "hash", &[Role::User]).unwrap();
        db.create_user("admin@x.com", "hash", &[Role::User, Role::Admin])
            .unwrap();

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(config),
        )
        .await;

        let req = test::TestRequest::delete()
            .uri(&format!("/api/users/{}", alice.id))
            .insert_header(bearer("admin@x.com"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);

        assert!(db.find_user_by_id(alice.id).unwrap().is_none());
    }

    #[actix_web::test]
    async fn test_me_returns_calling_account() {
        let (db, state) = state_with_db();
        db.create_user("alice@x.com", "hash", &[Role::User]).unwrap();

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(config),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/users/me")
            .insert_header(bearer("alice@x.com"))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["email"], "alice@x.com");

        // No token, no account
        let req = test::TestRequest::get().uri("/api/users/me").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_lookup_by_email() {
        let (db, state) = state_with_db();
        db.create_user("alice@x.com", "hash", &[Role::User]).unwrap();

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(config),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/users?email=alice@x.com")
            .insert_header(bearer("alice@x.com"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri("/api/users?email=ghost@x.com")
            .insert_header(bearer("alice@x.com"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_update_me() {
        let (db, state) = state_with_db();
        let users = Arc::clone(&state.users);
        users.register("alice@x.com", "pw").unwrap();
        drop(db);

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(config),
        )
        .await;

        let req = test::TestRequest::put()
            .uri("/api/users/me")
            .insert_header(bearer("alice@x.com"))
            .set_json(serde_json::json!({"password": "new-pw"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        users.login("alice@x.com", "new-pw").expect("Failed to login");
        assert!(users.login("alice@x.com", "pw").is_err());
    }
}
