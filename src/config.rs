use std::env;

/// Environment variable names - single source of truth
pub mod env_vars {
    pub const PORT: &str = "PORT";
    pub const DATABASE_URL: &str = "DATABASE_URL";
    /// Symmetric secret used to sign and verify session tokens.
    pub const JWT_SECRET: &str = "JWT_SECRET";
    /// Token validity window in milliseconds.
    pub const JWT_EXPIRATION_MS: &str = "JWT_EXPIRATION_MS";
}

/// Default values
pub mod defaults {
    pub const PORT: u16 = 8080;
    pub const DATABASE_URL: &str = "./.db/noteapp.db";
    pub const JWT_EXPIRATION_MS: i64 = 3_600_000;
    /// Development-only fallback. Set JWT_SECRET in any real deployment.
    pub const JWT_SECRET: &str = "noteapp-dev-secret-change-me";
}

/// Get the HTTP port to bind
pub fn port() -> u16 {
    env::var(env_vars::PORT)
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(defaults::PORT)
}

/// Get the SQLite database path
pub fn database_url() -> String {
    env::var(env_vars::DATABASE_URL).unwrap_or_else(|_| defaults::DATABASE_URL.to_string())
}

/// Get the token signing secret
pub fn jwt_secret() -> String {
    match env::var(env_vars::JWT_SECRET) {
        Ok(secret) if !secret.is_empty() => secret,
        _ => {
            log::warn!(
                "{} not set, using the built-in development secret",
                env_vars::JWT_SECRET
            );
            defaults::JWT_SECRET.to_string()
        }
    }
}

/// Get the token validity window in milliseconds
pub fn jwt_expiration_ms() -> i64 {
    env::var(env_vars::JWT_EXPIRATION_MS)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(defaults::JWT_EXPIRATION_MS)
}
