//! Note model and request/response shapes
//!
//! The JSON wire shape capitalizes `Title` and `Content` to stay compatible
//! with previously exported note files; all other fields are camelCase.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored note, exclusively owned by one user
#[derive(Debug, Clone)]
pub struct Note {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub content: String,
    pub creation_date: DateTime<Utc>,
    pub modified_date: DateTime<Utc>,
}

/// Note as returned by the REST API
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteResponse {
    pub note_id: i64,
    pub user_id: i64,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Content")]
    pub content: String,
    pub creation_date: DateTime<Utc>,
    pub modified_date: DateTime<Utc>,
}

impl From<Note> for NoteResponse {
    fn from(note: Note) -> Self {
        Self {
            note_id: note.id,
            user_id: note.user_id,
            title: note.title,
            content: note.content,
            creation_date: note.creation_date,
            modified_date: note.modified_date,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateNoteRequest {
    pub title: String,
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateNoteRequest {
    pub title: String,
    pub content: Option<String>,
}
