pub mod note;
pub mod user;

pub use note::{CreateNoteRequest, Note, NoteResponse, UpdateNoteRequest};
pub use user::{Role, User};

use serde::{Deserialize, Serialize};

/// Signup / signin request body
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Body for updating the current account; absent/empty fields keep their
/// stored value
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Signin response body
#[derive(Debug, Serialize)]
pub struct JwtResponse {
    pub token: String,
    #[serde(rename = "type")]
    pub token_type: &'static str,
}

impl JwtResponse {
    pub fn new(token: String) -> Self {
        Self {
            token,
            token_type: "Bearer",
        }
    }
}
