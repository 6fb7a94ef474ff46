//! Incremental reads of the OmniFocus completion logs.
//!
//! Both logs only ever grow, ordered by completion date. A drain walks a log
//! page by page from a cursor until a short page comes back, so a sync never
//! issues an unbounded query and never re-reads rows older than the cursor.

use crate::aggregate::build_tasks_from_records;
use crate::epoch::{start_of_day, unix_to_core_data};
use crate::error::{Error, Result};
use crate::models::{ChecklistItemRow, CompletedRow, Task, TaskRow};
use crate::traits::LogbookSource;
use chrono::{Local, TimeZone};

/// Maximum number of rows requested per page.
pub const TASK_FETCH_LIMIT: usize = 1000;

/// Fetch every row completed after `cursor`, one page at a time.
///
/// `fetch_page` is called with the current cursor and must return rows
/// completed strictly after it, ordered by completion date ascending, at
/// most [`TASK_FETCH_LIMIT`] of them. After each page the cursor moves to the
/// completion date of the page's last row. The drain stops after the first
/// page shorter than the limit.
///
/// Rows tied with the last completion date of a full page are skipped: the
/// next request asks for rows strictly after that date, so tied rows that did
/// not fit on the page are never returned. With the task log's one row per
/// tag this drops the remaining tags of a task that straddles the boundary.
/// A full page ending in such a tie is logged at `warn`.
///
/// # Errors
///
/// Returns the first error from `fetch_page`. Rows from earlier pages are
/// discarded.
pub fn drain<R, F>(mut cursor: f64, label: &str, mut fetch_page: F) -> Result<Vec<R>>
where
    R: CompletedRow,
    F: FnMut(f64) -> Result<Vec<R>>,
{
    let mut rows = Vec::new();

    loop {
        tracing::debug!(cursor, "[OmniFocus Logbook] fetching {label} from sqlite db...");
        let page = fetch_page(cursor)?;
        tracing::debug!("[OmniFocus Logbook] fetched {} {label} from sqlite db", page.len());

        let is_complete = page.len() < TASK_FETCH_LIMIT;
        if let Some(last) = page.last() {
            cursor = last.date_completed();
            if !is_complete && ends_in_tie(&page) {
                tracing::warn!(
                    cursor,
                    "[OmniFocus Logbook] page of {label} ends in rows sharing one completion \
                     date; later rows with that date are skipped"
                );
            }
        }
        rows.extend(page);

        if is_complete {
            return Ok(rows);
        }
    }
}

/// Whether the last two rows of `page` share a completion date.
fn ends_in_tie<R: CompletedRow>(page: &[R]) -> bool {
    match page {
        [.., before, last] => before.date_completed() >= last.date_completed(),
        _ => false,
    }
}

/// Entry point for syncing the OmniFocus logbook.
///
/// Holds the query source for the lifetime of the process. Every method
/// takes the persisted sync time (a unix timestamp) as input and never
/// modifies it; advancing it after a successful sync is up to the caller.
#[derive(Debug, Clone)]
pub struct Logbook<S> {
    source: S,
}

impl<S: LogbookSource> Logbook<S> {
    /// Create a logbook over the given source.
    pub const fn new(source: S) -> Self {
        Self { source }
    }

    /// Fetch every task row completed since the start of the local day
    /// containing `latest_sync_time`.
    ///
    /// Snapping to the day boundary re-imports the whole day, so a daily note
    /// that was partially synced is rewritten completely.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Sync`] if any page query fails.
    pub fn tasks_since(&self, latest_sync_time: i64) -> Result<Vec<TaskRow>> {
        self.tasks_since_in(latest_sync_time, &Local)
    }

    /// [`Self::tasks_since`] with an explicit time zone for the day boundary.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Sync`] if any page query fails.
    pub fn tasks_since_in<Tz: TimeZone>(&self, latest_sync_time: i64, tz: &Tz) -> Result<Vec<TaskRow>> {
        let cursor = unix_cursor(start_of_day(latest_sync_time, tz));
        drain(cursor, "tasks", |after| self.source.fetch_tasks(after, TASK_FETCH_LIMIT))
            .map_err(|e| sync_failure("tasks", e))
    }

    /// Fetch every checklist item completed after `latest_sync_time`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Sync`] if any page query fails.
    pub fn checklist_items_since(&self, latest_sync_time: i64) -> Result<Vec<ChecklistItemRow>> {
        let cursor = unix_cursor(latest_sync_time);
        drain(cursor, "checklist items", |after| {
            self.source.fetch_checklist_items(after, TASK_FETCH_LIMIT)
        })
        .map_err(|e| sync_failure("checklist items", e))
    }

    /// Fetch both logs and build the resulting tasks.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Sync`] if either drain fails.
    pub fn sync(&self, latest_sync_time: i64) -> Result<Vec<Task>> {
        self.sync_in(latest_sync_time, &Local)
    }

    /// [`Self::sync`] with an explicit time zone for the day boundary.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Sync`] if either drain fails.
    pub fn sync_in<Tz: TimeZone>(&self, latest_sync_time: i64, tz: &Tz) -> Result<Vec<Task>> {
        let task_rows = self.tasks_since_in(latest_sync_time, tz)?;
        let checklist_rows = self.checklist_items_since(latest_sync_time)?;
        let tasks = build_tasks_from_records(&task_rows, &checklist_rows);
        tracing::info!(
            rows = task_rows.len(),
            checklist_items = checklist_rows.len(),
            tasks = tasks.len(),
            "[OmniFocus Logbook] sync fetched completed tasks"
        );
        Ok(tasks)
    }
}

#[allow(clippy::cast_precision_loss)]
fn unix_cursor(unix_timestamp: i64) -> f64 {
    unix_to_core_data(unix_timestamp as f64)
}

fn sync_failure(stage: &'static str, source: Error) -> Error {
    tracing::error!(error = %source, "[OmniFocus Logbook] Failed to query the OmniFocus SQLite DB");
    Error::Sync { stage, source: Box::new(source) }
}
