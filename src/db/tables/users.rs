//! User table operations

use rusqlite::{Connection, OptionalExtension, Result as SqliteResult};

use super::super::Database;
use crate::models::{Role, User};

impl Database {
    /// Insert a new user with the given (already hashed) password and roles
    pub fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        roles: &[Role],
    ) -> SqliteResult<User> {
        let conn = self.lock();

        conn.execute(
            "INSERT INTO users (email, password) VALUES (?1, ?2)",
            [email, password_hash],
        )?;
        let id = conn.last_insert_rowid();

        for role in roles {
            conn.execute(
                "INSERT OR IGNORE INTO user_roles (user_id, role) VALUES (?1, ?2)",
                rusqlite::params![id, role.as_str()],
            )?;
        }

        Ok(User {
            id,
            email: email.to_string(),
            password: password_hash.to_string(),
            roles: roles.to_vec(),
        })
    }

    /// Exact, case-sensitive email existence check
    pub fn email_exists(&self, email: &str) -> SqliteResult<bool> {
        let conn = self.lock();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM users WHERE email = ?1",
            [email],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    pub fn find_user_by_email(&self, email: &str) -> SqliteResult<Option<User>> {
        let conn = self.lock();
        let user = conn
            .query_row(
                "SELECT id, email, password FROM users WHERE email = ?1",
                [email],
                Self::row_to_user,
            )
            .optional()?;

        match user {
            Some(mut user) => {
                user.roles = Self::load_roles(&conn, user.id)?;
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }

    pub fn find_user_by_id(&self, id: i64) -> SqliteResult<Option<User>> {
        let conn = self.lock();
        let user = conn
            .query_row(
                "SELECT id, email, password FROM users WHERE id = ?1",
                [id],
                Self::row_to_user,
            )
            .optional()?;

        match user {
            Some(mut user) => {
                user.roles = Self::load_roles(&conn, user.id)?;
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }

    pub fn list_users(&self) -> SqliteResult<Vec<User>> {
        let conn = self.lock();
        let mut stmt = conn.prepare("SELECT id, email, password FROM users")?;
        let mut users: Vec<User> = stmt
            .query_map([], Self::row_to_user)?
            .filter_map(|r| r.ok())
            .collect();

        for user in &mut users {
            user.roles = Self::load_roles(&conn, user.id)?;
        }

        Ok(users)
    }

    /// Replace a user's email and password hash
    pub fn update_user(&self, id: i64, email: &str, password_hash: &str) -> SqliteResult<bool> {
        let conn = self.lock();
        let rows_affected = conn.execute(
            "UPDATE users SET email = ?1, password = ?2 WHERE id = ?3",
            rusqlite::params![email, password_hash, id],
        )?;
        Ok(rows_affected > 0)
    }

    /// Delete a user; roles and notes go with it via ON DELETE CASCADE
    pub fn delete_user(&self, id: i64) -> SqliteResult<bool> {
        let conn = self.lock();
        let rows_affected = conn.execute("DELETE FROM users WHERE id = ?1", [id])?;
        Ok(rows_affected > 0)
    }

    fn load_roles(conn: &Connection, user_id: i64) -> SqliteResult<Vec<Role>> {
        let mut stmt = conn.prepare("SELECT role FROM user_roles WHERE user_id = ?1")?;
        let roles = stmt
            .query_map([user_id], |row| row.get::<_, String>(0))?
            .filter_map(|r| r.ok())
            .filter_map(|s| Role::from_str(&s))
            .collect();
        Ok(roles)
    }

    fn row_to_user(row: &rusqlite::Row) -> rusqlite::Result<User> {
        Ok(User {
            id: row.get(0)?,
            email: row.get(1)?,
            password: row.get(2)?,
            roles: Vec::new(),
        })
    }
}
