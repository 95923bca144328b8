//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. Each service
//! focuses on a specific use case or feature area.

mod accounts;
mod doctor;
pub mod logging;
pub mod migration;
mod notes;
mod quiz;
mod storage;

pub use accounts::AccountService;
pub use doctor::{CheckResult, DoctorResult, DoctorService, DoctorSummary};
pub use logging::{LogEntry, LogEvent, LoggingService};
pub use migration::{MigrationResult, MigrationService};
pub use notes::{DeleteOutcome, NoteRepository};
pub use quiz::QuizEngine;
pub use storage::{Storage, StorageKeys};
