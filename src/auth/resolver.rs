//! Per-request identity resolution
//!
//! Reads the `Authorization: Bearer <token>` header, validates the token,
//! and looks up the account behind its subject. Resolution fails open to
//! anonymous: any failure along the way (missing header, bad token, unknown
//! user, store error) is logged and yields no identity, and the endpoint
//! decides whether anonymous access is acceptable. This keeps public
//! endpoints reachable without a token.

use actix_web::{HttpRequest, HttpResponse};

use crate::models::Role;
use crate::AppState;

/// The authenticated caller for the duration of one request.
/// Derived from a validated token; never persisted.
#[derive(Debug, Clone)]
pub struct Identity {
    pub email: String,
    pub roles: Vec<Role>,
}

/// Pull the bearer token out of the Authorization header, if any
pub fn bearer_token(req: &HttpRequest) -> Option<String> {
    let header = req.headers().get("Authorization")?.to_str().ok()?;
    header
        .strip_prefix("Bearer ")
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
}

/// Resolve the request's identity, or None for anonymous
pub fn resolve_identity(state: &AppState, req: &HttpRequest) -> Option<Identity> {
    let token = bearer_token(req)?;

    if !state.tokens.validate(&token) {
        return None;
    }

    let email = match state.tokens.extract_subject(&token) {
        Ok(email) => email,
        Err(e) => {
            log::error!("Cannot set user authentication: {}", e);
            return None;
        }
    };

    match state.db.find_user_by_email(&email) {
        Ok(Some(user)) => Some(Identity {
            email: user.email,
            roles: user.roles,
        }),
        Ok(None) => {
            log::warn!("Token subject {} has no matching account", email);
            None
        }
        Err(e) => {
            log::error!("Cannot set user authentication: {}", e);
            None
        }
    }
}

/// Resolve the identity or produce the 401 response for protected endpoints
pub fn require_identity(state: &AppState, req: &HttpRequest) -> Result<Identity, HttpResponse> {
    resolve_identity(state, req).ok_or_else(|| {
        HttpResponse::Unauthorized().json(serde_json::json!({
            "error": "Authentication required"
        }))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_bearer_token_extraction() {
        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer abc.def.ghi"))
            .to_http_request();
        assert_eq!(bearer_token(&req).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn test_missing_or_malformed_header() {
        let req = TestRequest::default().to_http_request();
        assert!(bearer_token(&req).is_none());

        let req = TestRequest::default()
            .insert_header(("Authorization", "Basic dXNlcjpwdw=="))
            .to_http_request();
        assert!(bearer_token(&req).is_none());

        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer "))
            .to_http_request();
        assert!(bearer_token(&req).is_none());
    }
}
