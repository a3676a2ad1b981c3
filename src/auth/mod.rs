//! Stateless authentication
//!
//! Session tokens are signed JWTs (HS256) carrying the user's email; no
//! server-side session state exists. Identity resolution happens once per
//! request and fails open to anonymous — protected endpoints reject the
//! request downstream when no identity was resolved.

pub mod password;
pub mod resolver;
pub mod token;

pub use resolver::{require_identity, Identity};
pub use token::{TokenError, TokenProvider};
