//! Testing utilities and mock implementations.
//!
//! These types are provided for use in tests. They may appear unused in
//! the library itself but are consumed by unit and integration tests.

#![allow(dead_code)]
#![allow(clippy::missing_panics_doc)]

use crate::error::{Error, Result};
use crate::models::{task_state, ChecklistItemRow, TaskRow};
use crate::traits::LogbookSource;
use rusqlite::{params, Connection};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

/// One scripted response of the mock source.
#[derive(Debug)]
enum Page<R> {
    Rows(Vec<R>),
    Fail(String),
}

/// A scripted page sequence plus a record of the cursors it was asked for.
#[derive(Debug)]
struct Script<R> {
    pages: RefCell<VecDeque<Page<R>>>,
    cursors: RefCell<Vec<f64>>,
}

impl<R> Default for Script<R> {
    fn default() -> Self {
        Self { pages: RefCell::new(VecDeque::new()), cursors: RefCell::new(Vec::new()) }
    }
}

impl<R: Clone> Script<R> {
    fn next(&self, after: f64, limit: usize) -> Result<Vec<R>> {
        self.cursors.borrow_mut().push(after);
        match self.pages.borrow_mut().pop_front() {
            Some(Page::Rows(mut rows)) => {
                rows.truncate(limit);
                Ok(rows)
            }
            Some(Page::Fail(message)) => Err(Error::Config(message)),
            None => Ok(Vec::new()),
        }
    }
}

/// A mock logbook source for testing.
///
/// Pages are returned in the order they were pushed. Once the script runs
/// out, every further request gets an empty page.
#[derive(Debug, Default)]
pub struct MockLogbookSource {
    tasks: Script<TaskRow>,
    checklist_items: Script<ChecklistItemRow>,
}

impl MockLogbookSource {
    /// Create a new mock source with no scripted pages.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a page of task rows.
    pub fn push_task_page(&self, rows: Vec<TaskRow>) {
        self.tasks.pages.borrow_mut().push_back(Page::Rows(rows));
    }

    /// Queue a failing task query.
    pub fn push_task_failure(&self, message: &str) {
        self.tasks.pages.borrow_mut().push_back(Page::Fail(message.to_string()));
    }

    /// Queue a page of checklist item rows.
    pub fn push_checklist_page(&self, rows: Vec<ChecklistItemRow>) {
        self.checklist_items.pages.borrow_mut().push_back(Page::Rows(rows));
    }

    /// Queue a failing checklist item query.
    pub fn push_checklist_failure(&self, message: &str) {
        self.checklist_items.pages.borrow_mut().push_back(Page::Fail(message.to_string()));
    }

    /// Cursors passed to each task query, in call order.
    #[must_use]
    pub fn task_cursors(&self) -> Vec<f64> {
        self.tasks.cursors.borrow().clone()
    }

    /// Cursors passed to each checklist item query, in call order.
    #[must_use]
    pub fn checklist_cursors(&self) -> Vec<f64> {
        self.checklist_items.cursors.borrow().clone()
    }
}

impl LogbookSource for MockLogbookSource {
    fn fetch_tasks(&self, after: f64, limit: usize) -> Result<Vec<TaskRow>> {
        self.tasks.next(after, limit)
    }

    fn fetch_checklist_items(&self, after: f64, limit: usize) -> Result<Vec<ChecklistItemRow>> {
        self.checklist_items.next(after, limit)
    }
}

/// Build a completed task row with an empty note.
#[must_use]
pub fn task_row(uuid: &str, date_completed: f64, tag: Option<&str>) -> TaskRow {
    TaskRow {
        uuid: uuid.to_string(),
        title: Some(format!("Task {uuid}")),
        notes: String::new(),
        folder: None,
        date_completed,
        state: task_state::COMPLETED,
        tag: tag.map(str::to_string),
    }
}

/// Build a completed checklist item row.
#[must_use]
pub fn checklist_row(uuid: &str, task_id: &str, title: &str, date_completed: f64) -> ChecklistItemRow {
    ChecklistItemRow {
        uuid: uuid.to_string(),
        task_id: task_id.to_string(),
        title: title.to_string(),
        state: task_state::COMPLETED,
        date_completed,
    }
}

/// The subset of the OmniFocus cache schema read by the logbook queries.
pub const OMNIFOCUS_FIXTURE_SCHEMA: &str = r"
    CREATE TABLE Task (
        persistentIdentifier TEXT PRIMARY KEY,
        name TEXT,
        note TEXT,
        dateCompleted REAL,
        taskState INTEGER NOT NULL DEFAULT 0,
        parent TEXT,
        containingProjectInfo INTEGER
    );
    CREATE TABLE Tag (
        persistentIdentifier TEXT PRIMARY KEY,
        name TEXT
    );
    CREATE TABLE TaskTag (
        task TEXT NOT NULL,
        tag TEXT NOT NULL
    );
    CREATE TABLE ProjectInfo (
        pk INTEGER PRIMARY KEY,
        folder TEXT
    );
    CREATE TABLE Folder (
        persistentIdentifier TEXT PRIMARY KEY,
        name TEXT
    );
";

/// A scratch database laid out like the OmniFocus cache.
///
/// Insert helpers panic on failure; this type is only meant for tests.
#[derive(Debug)]
pub struct FixtureDb {
    path: PathBuf,
    conn: Connection,
}

impl FixtureDb {
    /// Create the fixture database at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be created.
    pub fn create(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA synchronous = OFF;")?;
        conn.execute_batch(OMNIFOCUS_FIXTURE_SCHEMA)?;
        Ok(Self { path: path.to_path_buf(), conn })
    }

    /// Path of the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Insert a top-level task completed at `date_completed`.
    pub fn add_task(&self, id: &str, name: Option<&str>, date_completed: f64, state: i64) {
        self.conn
            .execute(
                "INSERT INTO Task (persistentIdentifier, name, dateCompleted, taskState)
                 VALUES (?1, ?2, ?3, ?4)",
                params![id, name, date_completed, state],
            )
            .expect("insert task");
    }

    /// Insert a task that has not been completed.
    pub fn add_incomplete_task(&self, id: &str, name: &str) {
        self.conn
            .execute(
                "INSERT INTO Task (persistentIdentifier, name) VALUES (?1, ?2)",
                params![id, name],
            )
            .expect("insert incomplete task");
    }

    /// Insert a checklist item under `parent`.
    pub fn add_child(
        &self,
        id: &str,
        parent: &str,
        name: Option<&str>,
        date_completed: f64,
        state: i64,
    ) {
        self.conn
            .execute(
                "INSERT INTO Task (persistentIdentifier, parent, name, dateCompleted, taskState)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![id, parent, name, date_completed, state],
            )
            .expect("insert checklist item");
    }

    /// Set the note body of a task.
    pub fn set_note(&self, id: &str, note: &str) {
        self.conn
            .execute(
                "UPDATE Task SET note = ?2 WHERE persistentIdentifier = ?1",
                params![id, note],
            )
            .expect("update note");
    }

    /// Insert a tag.
    pub fn add_tag(&self, id: &str, name: &str) {
        self.conn
            .execute(
                "INSERT INTO Tag (persistentIdentifier, name) VALUES (?1, ?2)",
                params![id, name],
            )
            .expect("insert tag");
    }

    /// Attach a tag to a task.
    pub fn tag_task(&self, task: &str, tag: &str) {
        self.conn
            .execute("INSERT INTO TaskTag (task, tag) VALUES (?1, ?2)", params![task, tag])
            .expect("insert task tag");
    }

    /// Insert a folder.
    pub fn add_folder(&self, id: &str, name: &str) {
        self.conn
            .execute(
                "INSERT INTO Folder (persistentIdentifier, name) VALUES (?1, ?2)",
                params![id, name],
            )
            .expect("insert folder");
    }

    /// Insert a project info row pointing at `folder`.
    pub fn add_project_info(&self, pk: i64, folder: &str) {
        self.conn
            .execute("INSERT INTO ProjectInfo (pk, folder) VALUES (?1, ?2)", params![pk, folder])
            .expect("insert project info");
    }

    /// Place a task inside the project identified by `project_info`.
    pub fn set_project_info(&self, id: &str, project_info: i64) {
        self.conn
            .execute(
                "UPDATE Task SET containingProjectInfo = ?2 WHERE persistentIdentifier = ?1",
                params![id, project_info],
            )
            .expect("update project info");
    }
}
