//! SmartStudy Core - study notes, accounts and quizzes
//!
//! This crate implements the core domain logic following hexagonal architecture:
//!
//! - **domain**: Core records (User, Note, Question, etc.)
//! - **ports**: Trait definitions for external dependencies (KeyValueStore)
//! - **services**: Business logic orchestration
//! - **adapters**: Concrete implementations (DuckDB, in-memory)

pub mod adapters;
pub mod config;
pub mod domain;
mod log_migrations;
pub mod migrations;
pub mod ports;
pub mod services;

use std::path::Path;
use std::sync::Arc;

use adapters::duckdb::DuckDbStore;
use config::Config;
use ports::KeyValueStore;
use services::*;

// Re-export commonly used types at crate root
pub use domain::result::{Error, OperationResult, Result};
pub use domain::{Note, Question, QuizResult, QuizState, ScoreTier, User};
pub use services::{DeleteOutcome, LogEntry, LogEvent, LoggingService};

/// File name of the on-disk store inside the data directory
pub const STORE_FILE: &str = "smartstudy.duckdb";

/// The signed-in user together with their loaded notes
pub struct Session {
    pub user: User,
    pub notes: NoteRepository,
}

/// Main context for SmartStudy operations
///
/// Owns the whole application state: configuration, storage, the active
/// session and the quiz. Created at startup (which restores any persisted
/// session) and updated only through its methods.
pub struct StudyContext {
    pub config: Config,
    pub storage: Storage,
    pub accounts: AccountService,
    pub doctor_service: DoctorService,
    quiz: QuizEngine,
    session: Option<Session>,
    logger: Option<Arc<LoggingService>>,
}

impl StudyContext {
    /// Create a context over `STORE_FILE` in the data directory
    pub fn new(data_dir: &Path, logger: Option<Arc<LoggingService>>) -> anyhow::Result<Self> {
        let config = Config::load(data_dir)?;

        let store = DuckDbStore::new(&data_dir.join(STORE_FILE))?;
        store.ensure_schema()?;

        Ok(Self::with_store(config, Arc::new(store), logger)?)
    }

    /// Create a context over an existing store and restore the session
    pub fn with_store(
        config: Config,
        store: Arc<dyn KeyValueStore>,
        logger: Option<Arc<LoggingService>>,
    ) -> Result<Self> {
        let mut storage = Storage::new(store, config.storage_keys());
        if let Some(l) = &logger {
            storage = storage.with_logger(Arc::clone(l));
        }

        let mut ctx = Self {
            accounts: AccountService::new(storage.clone()),
            doctor_service: DoctorService::new(storage.clone()),
            quiz: QuizEngine::new(),
            storage,
            config,
            session: None,
            logger,
        };
        ctx.restore_session()?;
        Ok(ctx)
    }

    fn log(&self, event: LogEvent) {
        if let Some(l) = &self.logger {
            let _ = l.log(event);
        }
    }

    /// Re-read the persisted session pointer
    pub fn restore_session(&mut self) -> Result<Option<&User>> {
        let had_pointer = self.accounts.session_pointer().is_some();
        let restored = self
            .accounts
            .restore_session(self.config.validate_session_on_restore)?;

        if had_pointer && restored.is_none() {
            self.log(LogEvent::new("session_invalidated"));
        }

        self.session = restored.map(|user| self.open_session(user));
        Ok(self.current_user())
    }

    fn open_session(&self, user: User) -> Session {
        let notes = NoteRepository::load(self.storage.clone(), &user);
        Session { user, notes }
    }

    pub fn current_user(&self) -> Option<&User> {
        self.session.as_ref().map(|s| &s.user)
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn register(&mut self, name: &str, email: &str, password: &str) -> Result<User> {
        let user = self.accounts.register(name, email, password)?;
        self.log(LogEvent::new("user_registered"));
        Ok(user)
    }

    /// Log in and load the user's notes
    pub fn login(&mut self, email: &str, password: &str) -> Result<&User> {
        let user = self.accounts.login(email, password)?;
        let session = self.open_session(user);
        self.log(LogEvent::new("login"));
        Ok(&self.session.insert(session).user)
    }

    /// End the session; the in-memory session is gone even if clearing the
    /// persisted pointer fails
    pub fn logout(&mut self) -> Result<()> {
        self.session = None;
        self.quiz = QuizEngine::new();
        self.accounts.logout()?;
        self.log(LogEvent::new("logout"));
        Ok(())
    }

    /// The quiz, readable whether or not anyone is logged in
    pub fn quiz(&self) -> &QuizEngine {
        &self.quiz
    }

    /// The quiz for playing; only a logged-in user can take it
    pub fn quiz_mut(&mut self) -> Result<&mut QuizEngine> {
        if self.session.is_none() {
            return Err(Error::NoActiveSession);
        }
        Ok(&mut self.quiz)
    }

    pub fn notes(&self) -> Result<&NoteRepository> {
        self.session
            .as_ref()
            .map(|s| &s.notes)
            .ok_or(Error::NoActiveSession)
    }

    pub fn notes_mut(&mut self) -> Result<&mut NoteRepository> {
        self.session
            .as_mut()
            .map(|s| &mut s.notes)
            .ok_or(Error::NoActiveSession)
    }
}
