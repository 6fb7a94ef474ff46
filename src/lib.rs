//! # `omnifocus_logbook`
//!
//! Incrementally imports completed OmniFocus tasks into a note logbook.
//!
//! The sync walks OmniFocus' completion log from the last sync time in
//! bounded pages, then folds the flat rows (one per task/tag pair, plus
//! checklist items) into [`Task`]s with tags and subtasks.
//!
//! # Example
//!
//! ```no_run
//! use omnifocus_logbook::{Logbook, SqliteLogbook};
//!
//! let logbook = Logbook::new(SqliteLogbook::new("/path/to/OmniFocusDatabase2"));
//! let tasks = logbook.sync(1_700_000_000).unwrap();
//! for task in &tasks {
//!     println!("{} ({} subtasks)", task.title, task.subtasks.len());
//! }
//! ```

pub mod aggregate;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod epoch;
pub mod error;
pub mod logbook;
pub mod models;
pub mod paths;
pub mod storage;
pub mod testing;
pub mod traits;

pub use aggregate::build_tasks_from_records;
pub use config::Settings;
pub use error::{Error, Result};
pub use logbook::{Logbook, TASK_FETCH_LIMIT};
pub use models::{ChecklistItemRow, SubTask, Task, TaskRow};
pub use storage::SqliteLogbook;
pub use traits::LogbookSource;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
