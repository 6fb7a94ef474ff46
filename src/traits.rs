//! Core traits for testability and abstraction.

use crate::error::Result;
use crate::models::{ChecklistItemRow, TaskRow};

/// Trait for querying the OmniFocus completion logs.
///
/// Each method runs one bounded page query: rows completed strictly after
/// `after` (an OmniFocus timestamp), ordered by completion date ascending,
/// at most `limit` rows. Implementations must never write to the source.
///
/// The production implementation reads the OmniFocus `SQLite` cache, while
/// tests use a scripted mock.
pub trait LogbookSource {
    /// Fetch one page of completed or dropped tasks, one row per tag.
    ///
    /// # Errors
    ///
    /// Returns an error if the query cannot be executed.
    fn fetch_tasks(&self, after: f64, limit: usize) -> Result<Vec<TaskRow>>;

    /// Fetch one page of completed checklist items.
    ///
    /// # Errors
    ///
    /// Returns an error if the query cannot be executed.
    fn fetch_checklist_items(&self, after: f64, limit: usize) -> Result<Vec<ChecklistItemRow>>;
}

impl<S: LogbookSource + ?Sized> LogbookSource for &S {
    fn fetch_tasks(&self, after: f64, limit: usize) -> Result<Vec<TaskRow>> {
        (**self).fetch_tasks(after, limit)
    }

    fn fetch_checklist_items(&self, after: f64, limit: usize) -> Result<Vec<ChecklistItemRow>> {
        (**self).fetch_checklist_items(after, limit)
    }
}
