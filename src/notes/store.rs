//! Ownership-gated note CRUD, plus file export/import through the codec
//!
//! Every operation takes the resolved request identity explicitly — there is
//! no ambient "current user". A note that exists but belongs to someone else
//! is reported exactly like a note that does not exist, so callers cannot
//! enumerate other users' note ids.

use std::sync::Arc;

use chrono::Utc;

use crate::auth::Identity;
use crate::codec::{self, FormatError, NoteDocument, NoteFormat};
use crate::db::Database;
use crate::models::Note;

/// Maximum allowed content length, in characters
pub const MAX_CONTENT_LEN: usize = 1000;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("note {0} not found")]
    NotFound(i64),
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("content exceeds 1000 characters")]
    ContentTooLong,
    #[error("no account for {0}")]
    UnknownUser(String),
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(transparent)]
    Db(#[from] rusqlite::Error),
}

/// An encoded note ready to be sent as a file attachment
pub struct FileDownload {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub content_type: &'static str,
}

pub struct NoteStore {
    db: Arc<Database>,
}

impl NoteStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// All notes owned by the caller, in storage scan order
    pub fn list_for_user(&self, identity: &Identity) -> Result<Vec<Note>, StoreError> {
        let user = self.owner(identity)?;
        Ok(self.db.list_notes_for_user(user)?)
    }

    /// Create a note owned by the caller
    pub fn create(
        &self,
        identity: &Identity,
        title: &str,
        content: &str,
    ) -> Result<Note, StoreError> {
        if title.trim().is_empty() {
            return Err(StoreError::EmptyTitle);
        }
        if content.chars().count() > MAX_CONTENT_LEN {
            return Err(StoreError::ContentTooLong);
        }

        let user = self.owner(identity)?;
        Ok(self.db.create_note(user, title, content)?)
    }

    /// Replace a note's title and content; the creation timestamp is left
    /// untouched
    pub fn update(
        &self,
        identity: &Identity,
        id: i64,
        title: &str,
        content: &str,
    ) -> Result<Note, StoreError> {
        self.find_owned(identity, id)?;
        self.db
            .update_note(id, title, content)?
            .ok_or(StoreError::NotFound(id))
    }

    pub fn delete(&self, identity: &Identity, id: i64) -> Result<(), StoreError> {
        self.find_owned(identity, id)?;
        if self.db.delete_note(id)? {
            Ok(())
        } else {
            Err(StoreError::NotFound(id))
        }
    }

    /// Encode an owned note for download. The filename is the current
    /// timestamp plus the format's extension.
    pub fn export_as_file(
        &self,
        identity: &Identity,
        id: i64,
        format: NoteFormat,
    ) -> Result<FileDownload, StoreError> {
        let note = self.find_owned(identity, id)?;

        let doc = NoteDocument::new(note.title, note.content);
        let bytes = codec::encode(format, &doc)?;
        let filename = format!(
            "{}.{}",
            Utc::now().format("%Y-%m-%dT%H:%M:%S%.3f"),
            format.extension()
        );

        Ok(FileDownload {
            bytes,
            filename,
            content_type: format.mime_type(),
        })
    }

    /// Decode an uploaded file and persist it as a new note owned by the
    /// caller. A malformed payload creates nothing.
    pub fn import_from_file(
        &self,
        identity: &Identity,
        bytes: &[u8],
        format: NoteFormat,
    ) -> Result<Note, StoreError> {
        let doc = codec::decode(format, bytes)?;
        let user = self.owner(identity)?;
        Ok(self.db.create_note(user, &doc.title, &doc.content)?)
    }

    /// Fetch a note iff it is owned by the caller. An ownership mismatch is
    /// indistinguishable from a missing note.
    fn find_owned(&self, identity: &Identity, id: i64) -> Result<Note, StoreError> {
        match self.db.find_note_by_id(id)? {
            Some((note, owner_email)) if owner_email == identity.email => Ok(note),
            _ => Err(StoreError::NotFound(id)),
        }
    }

    fn owner(&self, identity: &Identity) -> Result<i64, StoreError> {
        self.db
            .find_user_by_email(&identity.email)?
            .map(|user| user.id)
            .ok_or_else(|| StoreError::UnknownUser(identity.email.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn store_with_users() -> (NoteStore, Identity, Identity) {
        let db = Arc::new(Database::open_in_memory().expect("Failed to open database"));
        db.create_user("a@x.com", "hash-a", &[Role::User]).unwrap();
        db.create_user("b@x.com", "hash-b", &[Role::User]).unwrap();

        let alice = Identity {
            email: "a@x.com".to_string(),
            roles: vec![Role::User],
        };
        let bob = Identity {
            email: "b@x.com".to_string(),
            roles: vec![Role::User],
        };

        (NoteStore::new(db), alice, bob)
    }

    #[test]
    fn test_create_and_list() {
        let (store, alice, bob) = store_with_users();

        let note = store.create(&alice, "T", "C").expect("Failed to create");
        assert_eq!(note.title, "T");
        assert_eq!(note.content, "C");
        assert_eq!(note.creation_date, note.modified_date);

        assert_eq!(store.list_for_user(&alice).unwrap().len(), 1);
        assert!(store.list_for_user(&bob).unwrap().is_empty());
    }

    #[test]
    fn test_create_validation() {
        let (store, alice, _) = store_with_users();

        assert!(matches!(
            store.create(&alice, "  ", "C"),
            Err(StoreError::EmptyTitle)
        ));
        let long = "x".repeat(MAX_CONTENT_LEN + 1);
        assert!(matches!(
            store.create(&alice, "T", &long),
            Err(StoreError::ContentTooLong)
        ));
        // Exactly at the limit is fine
        let max = "x".repeat(MAX_CONTENT_LEN);
        assert!(store.create(&alice, "T", &max).is_ok());
    }

    #[test]
    fn test_update_refreshes_modified_only() {
        let (store, alice, _) = store_with_users();
        let note = store.create(&alice, "T", "C").unwrap();

        let updated = store
            .update(&alice, note.id, "T2", "C2")
            .expect("Failed to update");
        assert_eq!(updated.title, "T2");
        assert_eq!(updated.content, "C2");
        assert_eq!(updated.creation_date, note.creation_date);
        assert!(updated.modified_date >= note.modified_date);
    }

    #[test]
    fn test_cross_user_access_is_notfound() {
        let (store, alice, bob) = store_with_users();
        let note = store.create(&alice, "T", "C").unwrap();

        assert!(matches!(
            store.update(&bob, note.id, "X", "Y"),
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            store.delete(&bob, note.id),
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            store.export_as_file(&bob, note.id, NoteFormat::Txt),
            Err(StoreError::NotFound(_))
        ));

        // Alice's note is untouched
        let notes = store.list_for_user(&alice).unwrap();
        assert_eq!(notes[0].title, "T");
    }

    #[test]
    fn test_missing_note_is_notfound() {
        let (store, alice, _) = store_with_users();
        assert!(matches!(
            store.delete(&alice, 9999),
            Err(StoreError::NotFound(9999))
        ));
    }

    #[test]
    fn test_export_txt() {
        let (store, alice, _) = store_with_users();
        let note = store.create(&alice, "T", "C").unwrap();

        let file = store
            .export_as_file(&alice, note.id, NoteFormat::Txt)
            .expect("Failed to export");
        assert_eq!(file.bytes, b"T\nC");
        assert!(file.filename.ends_with(".txt"));
        assert_eq!(file.content_type, "text/plain");
    }

    #[test]
    fn test_import_json_file() {
        let (store, alice, _) = store_with_users();

        let note = store
            .import_from_file(&alice, br#"{"Title":"X","Content":"Y"}"#, NoteFormat::Json)
            .expect("Failed to import");
        assert_eq!(note.title, "X");
        assert_eq!(note.content, "Y");

        let notes = store.list_for_user(&alice).unwrap();
        assert_eq!(notes.len(), 1);
    }

    #[test]
    fn test_import_malformed_creates_nothing() {
        let (store, alice, _) = store_with_users();

        let result = store.import_from_file(&alice, b"{broken", NoteFormat::Json);
        assert!(matches!(result, Err(StoreError::Format(_))));
        assert!(store.list_for_user(&alice).unwrap().is_empty());
    }
}
