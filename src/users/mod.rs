//! User directory — account registration, login, and lookups
//!
//! Owns the credential hasher: plaintext passwords come in, only argon2
//! PHC hashes touch the database. Login is the only place session tokens
//! are issued.

use std::sync::Arc;

use crate::auth::{password, TokenError, TokenProvider};
use crate::db::Database;
use crate::models::{Role, User};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("user with email {0} already exists")]
    EmailTaken(String),
    #[error("invalid password")]
    InvalidCredentials,
    #[error("user {0} not found")]
    NotFound(String),
    #[error("password hashing failed: {0}")]
    Hash(String),
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error(transparent)]
    Db(#[from] rusqlite::Error),
}

pub struct UserDirectory {
    db: Arc<Database>,
    tokens: TokenProvider,
}

impl UserDirectory {
    pub fn new(db: Arc<Database>, tokens: TokenProvider) -> Self {
        Self { db, tokens }
    }

    /// Register a new account with the default USER role.
    /// The duplicate check is an exact, case-sensitive email match.
    pub fn register(&self, email: &str, password: &str) -> Result<User, AuthError> {
        if self.db.email_exists(email)? {
            return Err(AuthError::EmailTaken(email.to_string()));
        }

        let hash = password::hash_password(password).map_err(|e| AuthError::Hash(e.to_string()))?;
        let user = self.db.create_user(email, &hash, &[Role::User])?;
        Ok(user)
    }

    /// Verify credentials and issue a session token for the email.
    /// Unknown email and wrong password fail differently: NotFound vs
    /// InvalidCredentials.
    pub fn login(&self, email: &str, password: &str) -> Result<String, AuthError> {
        let user = self
            .db
            .find_user_by_email(email)?
            .ok_or_else(|| AuthError::NotFound(email.to_string()))?;

        if !password::verify_password(password, &user.password) {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(self.tokens.issue(&user.email)?)
    }

    pub fn find_by_email(&self, email: &str) -> Result<User, AuthError> {
        self.db
            .find_user_by_email(email)?
            .ok_or_else(|| AuthError::NotFound(email.to_string()))
    }

    pub fn find_by_id(&self, id: i64) -> Result<User, AuthError> {
        self.db
            .find_user_by_id(id)?
            .ok_or_else(|| AuthError::NotFound(id.to_string()))
    }

    pub fn list_all(&self) -> Result<Vec<User>, AuthError> {
        Ok(self.db.list_users()?)
    }

    /// Update the calling account's email and/or password. Absent or empty
    /// fields keep their stored value; a new password is hashed before it
    /// touches the database.
    pub fn update_current(
        &self,
        current_email: &str,
        new_email: Option<&str>,
        new_password: Option<&str>,
    ) -> Result<User, AuthError> {
        let user = self.find_by_email(current_email)?;

        let email = match new_email {
            Some(email) if !email.is_empty() => email,
            _ => &user.email,
        };
        let password = match new_password {
            Some(password) if !password.is_empty() => {
                password::hash_password(password).map_err(|e| AuthError::Hash(e.to_string()))?
            }
            _ => user.password.clone(),
        };

        self.db.update_user(user.id, email, &password)?;
        self.find_by_id(user.id)
    }

    /// Delete an account; its notes are removed with it
    pub fn delete(&self, id: i64) -> Result<(), AuthError> {
        if self.db.delete_user(id)? {
            Ok(())
        } else {
            Err(AuthError::NotFound(id.to_string()))
        }
    }
}
