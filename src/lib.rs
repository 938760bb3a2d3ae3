//! Core library surface for the Student Records Manager.
//!
//! The domain layer (`models`, `roster`, `registry`, `records`) holds students,
//! their subjects and grades, and named groups. `gradebook` applies changes and
//! persists them through `storage`, `query` produces the read-only reports, and
//! `ui` drives the terminal front-end.
pub mod config;
pub mod error;
pub mod gradebook;
pub mod logging;
pub mod models;
pub mod query;
pub mod records;
pub mod registry;
pub mod roster;
pub mod storage;
pub mod ui;

pub use config::Config;
pub use error::{RecordsError, Result};
pub use gradebook::{Committed, Gradebook};
pub use models::{NameField, SortDirection, Student, SubjectGrade};
pub use query::SortKey;
pub use records::Records;
pub use registry::{Group, GroupRegistry};
pub use roster::Roster;
pub use storage::{KeyValueStore, LoadOutcome, MemoryStore, SqliteStore};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
