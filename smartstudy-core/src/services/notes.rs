//! Note repository - the signed-in user's note collection
//!
//! Every mutation works on a staged copy of the collection. The copy is
//! persisted first and only then becomes the in-memory view, so a failed
//! write leaves the repository exactly as it was last persisted.

use std::collections::HashMap;

use serde::Serialize;

use crate::domain::result::{Error, Result};
use crate::domain::{Note, User};
use crate::services::storage::Storage;

/// All users' collections as stored under the notes key
type NoteCollections = HashMap<String, Vec<Note>>;

/// Outcome of a delete that passed the lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "note", rename_all = "snake_case")]
pub enum DeleteOutcome {
    Deleted(Note),
    Declined,
}

/// Notes owned by one user, newest first
pub struct NoteRepository {
    storage: Storage,
    owner_id: String,
    notes: Vec<Note>,
}

impl NoteRepository {
    /// Load `owner`'s collection; an unreadable store yields an empty one
    pub fn load(storage: Storage, owner: &User) -> Self {
        let mut all: NoteCollections = storage.load_or(&storage.keys().notes, HashMap::new());
        let notes = all.remove(&owner.id).unwrap_or_default();
        Self {
            storage,
            owner_id: owner.id.clone(),
            notes,
        }
    }

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    /// Notes in stored order
    pub fn list(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn get_by_id(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    /// Create a note at the front of the collection
    pub fn add(&mut self, title: &str, content: &str) -> Result<Note> {
        let note = Note::new(title, content);

        let mut staged = Vec::with_capacity(self.notes.len() + 1);
        staged.push(note.clone());
        staged.extend(self.notes.iter().cloned());

        self.commit(staged)?;
        Ok(note)
    }

    /// Replace a note's title and content in place
    pub fn update(&mut self, id: &str, title: &str, content: &str) -> Result<Note> {
        let index = self.position(id)?;

        let mut staged = self.notes.clone();
        staged[index].apply_edit(title, content);
        let updated = staged[index].clone();

        self.commit(staged)?;
        Ok(updated)
    }

    /// Delete a note once `confirm` agrees
    ///
    /// `confirm` is only asked after the note is found; declining leaves
    /// both the collection and the store untouched.
    pub fn delete<F>(&mut self, id: &str, confirm: F) -> Result<DeleteOutcome>
    where
        F: FnOnce(&Note) -> bool,
    {
        let index = self.position(id)?;

        if !confirm(&self.notes[index]) {
            return Ok(DeleteOutcome::Declined);
        }

        let mut staged = self.notes.clone();
        let removed = staged.remove(index);

        self.commit(staged)?;
        Ok(DeleteOutcome::Deleted(removed))
    }

    fn position(&self, id: &str) -> Result<usize> {
        self.notes
            .iter()
            .position(|n| n.id == id)
            .ok_or_else(|| Error::not_found(format!("note {}", id)))
    }

    /// Persist `staged` as this user's collection, then adopt it
    ///
    /// Other users' collections are re-read strictly so a bad read can't be
    /// written back as an empty mapping.
    fn commit(&mut self, staged: Vec<Note>) -> Result<()> {
        let key = &self.storage.keys().notes;
        let mut all: NoteCollections = self.storage.try_load(key)?.unwrap_or_default();
        all.insert(self.owner_id.clone(), staged);
        self.storage.save(key, &all)?;

        if let Some(persisted) = all.remove(&self.owner_id) {
            self.notes = persisted;
        }
        Ok(())
    }
}
