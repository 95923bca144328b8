//! Note domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::now;

/// Number of content characters shown in a note preview
pub const PREVIEW_CHARS: usize = 150;

/// A study note owned by a single user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// Create a note with trimmed fields and equal timestamps
    ///
    /// Empty titles and contents are accepted.
    pub fn new(title: &str, content: &str) -> Self {
        let created = now();
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.trim().to_string(),
            content: content.trim().to_string(),
            created_at: created,
            updated_at: created,
        }
    }

    /// Replace title and content, refreshing `updated_at`
    pub fn apply_edit(&mut self, title: &str, content: &str) {
        self.title = title.trim().to_string();
        self.content = content.trim().to_string();
        // Never move backwards, even if the wall clock does
        self.updated_at = now().max(self.updated_at);
    }

    /// Content shortened to `max_chars` characters, with "..." when cut
    pub fn preview(&self, max_chars: usize) -> String {
        if self.content.chars().count() > max_chars {
            let head: String = self.content.chars().take(max_chars).collect();
            format!("{}...", head)
        } else {
            self.content.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_note_is_trimmed() {
        let note = Note::new("  Title ", "\n body \t");
        assert_eq!(note.title, "Title");
        assert_eq!(note.content, "body");
        assert_eq!(note.created_at, note.updated_at);
    }

    #[test]
    fn test_empty_fields_allowed() {
        let note = Note::new("   ", "");
        assert_eq!(note.title, "");
        assert_eq!(note.content, "");
    }

    #[test]
    fn test_apply_edit_keeps_identity() {
        let mut note = Note::new("Old", "old body");
        let id = note.id.clone();
        let created = note.created_at;

        note.apply_edit(" New ", " new body ");

        assert_eq!(note.id, id);
        assert_eq!(note.created_at, created);
        assert_eq!(note.title, "New");
        assert_eq!(note.content, "new body");
        assert!(note.updated_at >= created);
    }

    #[test]
    fn test_preview() {
        let mut note = Note::new("T", "short");
        assert_eq!(note.preview(PREVIEW_CHARS), "short");

        note.content = "é".repeat(PREVIEW_CHARS + 10);
        let preview = note.preview(PREVIEW_CHARS);
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), PREVIEW_CHARS + 3);
    }

    #[test]
    fn test_timestamps_survive_json() {
        let note = Note::new("T", "C");
        let json = serde_json::to_string(&note).unwrap();
        assert!(json.contains("\"updatedAt\""));
        let back: Note = serde_json::from_str(&json).unwrap();
        assert_eq!(back, note);
    }
}
