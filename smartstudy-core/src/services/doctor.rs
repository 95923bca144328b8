//! Doctor service - store health checks

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;
use serde_json::json;

use crate::domain::result::Result;
use crate::domain::{Note, User};
use crate::services::storage::Storage;

/// Doctor service for health checks
pub struct DoctorService {
    storage: Storage,
}

impl DoctorService {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// Run all health checks
    ///
    /// Reads are strict: a store that can't be read fails the whole run
    /// instead of reporting an empty, healthy-looking directory.
    pub fn run_checks(&self) -> Result<DoctorResult> {
        let keys = self.storage.keys();
        let users: Vec<User> = self.storage.try_load(&keys.users)?.unwrap_or_default();
        let session: Option<User> = self.storage.try_load(&keys.current_user)?;
        let notes: HashMap<String, Vec<Note>> =
            self.storage.try_load(&keys.notes)?.unwrap_or_default();

        let mut checks = BTreeMap::new();

        // Duplicate emails
        let mut seen = HashSet::new();
        let duplicates: Vec<&str> = users
            .iter()
            .filter(|u| !seen.insert(u.email.as_str()))
            .map(|u| u.email.as_str())
            .collect();
        checks.insert(
            "duplicate_emails".to_string(),
            if duplicates.is_empty() {
                CheckResult::pass(format!("{} user(s), all emails unique", users.len()))
            } else {
                CheckResult::error(
                    format!("{} duplicate email(s) in the directory", duplicates.len()),
                    duplicates.iter().map(|e| json!({ "email": e })).collect(),
                )
            },
        );

        // Session pointer
        checks.insert(
            "session_pointer".to_string(),
            match &session {
                None => CheckResult::pass("No active session".to_string()),
                Some(s) if users.iter().any(|u| u.same_identity(s)) => {
                    CheckResult::pass(format!("Session belongs to {}", s.email))
                }
                Some(s) => CheckResult::warning(
                    "Session points at a user missing from the directory".to_string(),
                    vec![json!({ "user_id": s.id, "email": s.email })],
                ),
            },
        );

        // Orphaned note collections
        let user_ids: HashSet<&str> = users.iter().map(|u| u.id.as_str()).collect();
        let mut orphaned: Vec<serde_json::Value> = notes
            .iter()
            .filter(|(owner, _)| !user_ids.contains(owner.as_str()))
            .map(|(owner, list)| json!({ "user_id": owner, "notes": list.len() }))
            .collect();
        orphaned.sort_by(|a, b| a["user_id"].as_str().cmp(&b["user_id"].as_str()));
        checks.insert(
            "orphaned_notes".to_string(),
            if orphaned.is_empty() {
                CheckResult::pass("Every note collection has an owner".to_string())
            } else {
                CheckResult::warning(
                    format!("{} note collection(s) belong to unknown users", orphaned.len()),
                    orphaned,
                )
            },
        );

        // Duplicate note ids within a collection
        let mut dup_notes = Vec::new();
        for (owner, list) in &notes {
            let mut ids = HashSet::new();
            for note in list {
                if !ids.insert(note.id.as_str()) {
                    dup_notes.push(json!({ "user_id": owner, "note_id": note.id }));
                }
            }
        }
        let total_notes: usize = notes.values().map(Vec::len).sum();
        checks.insert(
            "duplicate_note_ids".to_string(),
            if dup_notes.is_empty() {
                CheckResult::pass(format!("{} note(s), all ids unique", total_notes))
            } else {
                CheckResult::error(
                    format!("{} duplicate note id(s)", dup_notes.len()),
                    dup_notes,
                )
            },
        );

        // Keys the current configuration never reads, e.g. after a prefix change
        let known = [&keys.users, &keys.current_user, &keys.notes];
        let unknown: Vec<serde_json::Value> = self
            .storage
            .stored_keys()?
            .into_iter()
            .filter(|k| !known.contains(&k))
            .map(|k| json!({ "key": k }))
            .collect();
        checks.insert(
            "store_keys".to_string(),
            if unknown.is_empty() {
                CheckResult::pass("Every stored key is in use".to_string())
            } else {
                CheckResult::warning(
                    format!("{} stored key(s) not used by this configuration", unknown.len()),
                    unknown,
                )
            },
        );

        let passed = checks.values().filter(|c| c.status == "pass").count() as i64;
        let warnings = checks.values().filter(|c| c.status == "warning").count() as i64;
        let errors = checks.values().filter(|c| c.status == "error").count() as i64;

        Ok(DoctorResult {
            checks,
            summary: DoctorSummary { passed, warnings, errors },
        })
    }
}

#[derive(Debug, Serialize)]
pub struct DoctorResult {
    pub checks: BTreeMap<String, CheckResult>,
    pub summary: DoctorSummary,
}

#[derive(Debug, Serialize)]
pub struct CheckResult {
    pub status: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<serde_json::Value>>,
}

impl CheckResult {
    fn pass(message: String) -> Self {
        Self {
            status: "pass".to_string(),
            message,
            details: None,
        }
    }

    fn warning(message: String, details: Vec<serde_json::Value>) -> Self {
        Self {
            status: "warning".to_string(),
            message,
            details: Some(details),
        }
    }

    fn error(message: String, details: Vec<serde_json::Value>) -> Self {
        Self {
            status: "error".to_string(),
            message,
            details: Some(details),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DoctorSummary {
    pub passed: i64,
    pub warnings: i64,
    pub errors: i64,
}
