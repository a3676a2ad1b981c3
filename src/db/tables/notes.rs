//! Note table operations
//!
//! Ownership checks live in the note store, not here; these are plain
//! record-level queries. `find_note_by_id` also returns the owner's email
//! so the store can compare it against the caller's identity.

use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension, Result as SqliteResult};

use super::super::Database;
use crate::models::Note;

impl Database {
    /// Insert a note; creation and modified timestamps are set equal
    pub fn create_note(&self, user_id: i64, title: &str, content: &str) -> SqliteResult<Note> {
        let conn = self.lock();
        let now = Utc::now();
        let now_str = now.to_rfc3339();

        conn.execute(
            "INSERT INTO notes (user_id, title, content, creation_date, modified_date)
             VALUES (?1, ?2, ?3, ?4, ?4)",
            rusqlite::params![user_id, title, content, &now_str],
        )?;
        let id = conn.last_insert_rowid();

        Ok(Note {
            id,
            user_id,
            title: title.to_string(),
            content: content.to_string(),
            creation_date: now,
            modified_date: now,
        })
    }

    /// All notes owned by a user, in scan order
    pub fn list_notes_for_user(&self, user_id: i64) -> SqliteResult<Vec<Note>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(
            "SELECT id, user_id, title, content, creation_date, modified_date
             FROM notes WHERE user_id = ?1",
        )?;

        let notes = stmt
            .query_map([user_id], Self::row_to_note)?
            .filter_map(|r| r.ok())
            .collect();

        Ok(notes)
    }

    /// Look up a note together with its owner's email
    pub fn find_note_by_id(&self, id: i64) -> SqliteResult<Option<(Note, String)>> {
        let conn = self.lock();
        conn.query_row(
            "SELECT n.id, n.user_id, n.title, n.content, n.creation_date, n.modified_date, u.email
             FROM notes n JOIN users u ON n.user_id = u.id
             WHERE n.id = ?1",
            [id],
            |row| {
                let note = Self::row_to_note(row)?;
                let owner_email: String = row.get(6)?;
                Ok((note, owner_email))
            },
        )
        .optional()
    }

    /// Replace title/content and refresh the modified timestamp only
    pub fn update_note(&self, id: i64, title: &str, content: &str) -> SqliteResult<Option<Note>> {
        let conn = self.lock();
        let now = Utc::now();

        let rows_affected = conn.execute(
            "UPDATE notes SET title = ?1, content = ?2, modified_date = ?3 WHERE id = ?4",
            rusqlite::params![title, content, now.to_rfc3339(), id],
        )?;
        if rows_affected == 0 {
            return Ok(None);
        }

        conn.query_row(
            "SELECT id, user_id, title, content, creation_date, modified_date
             FROM notes WHERE id = ?1",
            [id],
            Self::row_to_note,
        )
        .optional()
    }

    pub fn delete_note(&self, id: i64) -> SqliteResult<bool> {
        let conn = self.lock();
        let rows_affected = conn.execute("DELETE FROM notes WHERE id = ?1", [id])?;
        Ok(rows_affected > 0)
    }

    fn row_to_note(row: &rusqlite::Row) -> rusqlite::Result<Note> {
        let creation_str: String = row.get(4)?;
        let modified_str: String = row.get(5)?;

        Ok(Note {
            id: row.get(0)?,
            user_id: row.get(1)?,
            title: row.get(2)?,
            content: row.get(3)?,
            creation_date: DateTime::parse_from_rfc3339(&creation_str)
                .unwrap()
                .with_timezone(&Utc),
            modified_date: DateTime::parse_from_rfc3339(&modified_str)
                .unwrap()
                .with_timezone(&Utc),
        })
    }
}
