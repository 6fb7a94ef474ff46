//! `SQLite`-based access to the OmniFocus completion logs.
//!
//! OmniFocus keeps a `SQLite` cache of its database. Two fixed queries are run
//! against it: one over completed or dropped tasks (joined with tags and
//! folders), one over completed checklist items. The file is always opened
//! read-only.

use crate::error::Result;
use crate::models::{ChecklistItemRow, TaskRow};
use crate::traits::LogbookSource;
use rusqlite::{params, Connection, OpenFlags, Row};
use std::path::{Path, PathBuf};

/// Completed or dropped tasks, one row per tag, oldest completion first.
const TASKS_QUERY: &str = r"
    SELECT
        Task.persistentIdentifier AS uuid,
        Task.name AS title,
        Task.note AS notes,
        Task.dateCompleted AS dateCompleted,
        Task.taskState AS state,
        Folder.name AS folder,
        Tag.name AS tag
    FROM
        Task
    LEFT JOIN TaskTag
        ON TaskTag.task = Task.persistentIdentifier
    LEFT JOIN Tag
        ON Tag.persistentIdentifier = TaskTag.tag
    LEFT JOIN ProjectInfo
        ON Task.containingProjectInfo = ProjectInfo.pk
    LEFT JOIN Folder
        ON ProjectInfo.folder = Folder.persistentIdentifier
    WHERE
        Task.dateCompleted IS NOT NULL
        AND Task.dateCompleted > ?1
        AND Task.taskState IN (1, 2)
    ORDER BY
        Task.dateCompleted
    LIMIT ?2
";

/// Named checklist items that have a parent, oldest completion first.
const CHECKLIST_ITEMS_QUERY: &str = r"
    SELECT
        Task.persistentIdentifier AS uuid,
        Task.parent AS taskId,
        Task.name AS title,
        Task.taskState AS state,
        Task.dateCompleted AS dateCompleted
    FROM
        Task
    WHERE
        Task.parent IS NOT NULL
        AND Task.dateCompleted IS NOT NULL
        AND Task.dateCompleted > ?1
        AND Task.name IS NOT NULL
        AND Task.name != ''
    ORDER BY
        Task.dateCompleted
    LIMIT ?2
";

/// Read-only view of an OmniFocus `SQLite` database.
///
/// Each query opens a new connection. Syncs are infrequent and OmniFocus may
/// rewrite the file between them.
#[derive(Debug, Clone)]
pub struct SqliteLogbook {
    /// Path to the database file.
    db_path: PathBuf,
}

impl SqliteLogbook {
    /// Create a logbook reader for the database at `db_path`.
    ///
    /// The file is not touched until the first query.
    #[must_use]
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self { db_path: db_path.into() }
    }

    /// Get the database path.
    #[must_use]
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Open a read-only connection to the database.
    fn open(&self) -> Result<Connection> {
        let conn = Connection::open_with_flags(
            &self.db_path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(conn)
    }

    fn parse_task_row(row: &Row<'_>) -> rusqlite::Result<TaskRow> {
        Ok(TaskRow {
            uuid: row.get("uuid")?,
            title: row.get("title")?,
            notes: row.get::<_, Option<String>>("notes")?.unwrap_or_default(),
            folder: row.get("folder")?,
            date_completed: row.get("dateCompleted")?,
            state: row.get("state")?,
            tag: row.get("tag")?,
        })
    }

    fn parse_checklist_item_row(row: &Row<'_>) -> rusqlite::Result<ChecklistItemRow> {
        Ok(ChecklistItemRow {
            uuid: row.get("uuid")?,
            task_id: row.get("taskId")?,
            title: row.get("title")?,
            state: row.get("state")?,
            date_completed: row.get("dateCompleted")?,
        })
    }
}

fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

impl LogbookSource for SqliteLogbook {
    fn fetch_tasks(&self, after: f64, limit: usize) -> Result<Vec<TaskRow>> {
        let conn = self.open()?;
        let mut stmt = conn.prepare(TASKS_QUERY)?;
        let rows = stmt
            .query_map(params![after, sql_limit(limit)], Self::parse_task_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    fn fetch_checklist_items(&self, after: f64, limit: usize) -> Result<Vec<ChecklistItemRow>> {
        let conn = self.open()?;
        let mut stmt = conn.prepare(CHECKLIST_ITEMS_QUERY)?;
        let rows = stmt
            .query_map(params![after, sql_limit(limit)], Self::parse_checklist_item_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::models::task_state;
    use crate::testing::FixtureDb;
    use tempfile::TempDir;

    fn create_fixture() -> (TempDir, FixtureDb) {
        let dir = TempDir::new().unwrap();
        let fixture = FixtureDb::create(&dir.path().join("OmniFocusDatabase2")).unwrap();
        (dir, fixture)
    }

    #[test]
    fn test_fetch_tasks_fans_out_by_tag() {
        let (_dir, db) = create_fixture();
        db.add_tag("t-work", "work");
        db.add_tag("t-home", "home");
        db.add_task("A", Some("Plan week"), 10.0, task_state::COMPLETED);
        db.tag_task("A", "t-work");
        db.tag_task("A", "t-home");

        let logbook = SqliteLogbook::new(db.path());
        let rows = logbook.fetch_tasks(0.0, 1000).unwrap();

        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.uuid == "A"));
        let mut tags: Vec<_> = rows.iter().map(|r| r.tag.clone().unwrap()).collect();
        tags.sort();
        assert_eq!(tags, vec!["home", "work"]);
    }

    #[test]
    fn test_fetch_tasks_untagged_row_has_no_tag() {
        let (_dir, db) = create_fixture();
        db.add_task("A", Some("Untagged"), 10.0, task_state::COMPLETED);

        let rows = SqliteLogbook::new(db.path()).fetch_tasks(0.0, 1000).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].tag, None);
        assert_eq!(rows[0].notes, "");
    }

    #[test]
    fn test_fetch_tasks_resolves_folder() {
        let (_dir, db) = create_fixture();
        db.add_folder("f1", "Personal");
        db.add_project_info(7, "f1");
        db.add_task("A", Some("Filed"), 10.0, task_state::COMPLETED);
        db.set_project_info("A", 7);

        let rows = SqliteLogbook::new(db.path()).fetch_tasks(0.0, 1000).unwrap();
        assert_eq!(rows[0].folder.as_deref(), Some("Personal"));
    }

    #[test]
    fn test_fetch_tasks_filters_state_and_date() {
        let (_dir, db) = create_fixture();
        db.add_task("available", Some("Open"), 10.0, 0);
        db.add_task("old", Some("Old"), 5.0, task_state::COMPLETED);
        db.add_task("dropped", Some("Dropped"), 11.0, task_state::DROPPED);
        db.add_task("done", Some("Done"), 12.0, task_state::COMPLETED);
        db.add_incomplete_task("pending", "Pending");

        let rows = SqliteLogbook::new(db.path()).fetch_tasks(5.0, 1000).unwrap();
        let ids: Vec<_> = rows.iter().map(|r| r.uuid.as_str()).collect();
        assert_eq!(ids, vec!["dropped", "done"]);
        assert_eq!(rows[0].state, task_state::DROPPED);
    }

    #[test]
    fn test_fetch_tasks_orders_and_limits() {
        let (_dir, db) = create_fixture();
        db.add_task("c", Some("C"), 30.0, task_state::COMPLETED);
        db.add_task("a", Some("A"), 10.0, task_state::COMPLETED);
        db.add_task("b", Some("B"), 20.0, task_state::COMPLETED);

        let rows = SqliteLogbook::new(db.path()).fetch_tasks(0.0, 2).unwrap();
        let ids: Vec<_> = rows.iter().map(|r| r.uuid.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_fetch_checklist_items_requires_parent_and_name() {
        let (_dir, db) = create_fixture();
        db.add_task("P", Some("Parent"), 10.0, task_state::COMPLETED);
        db.add_child("c1", "P", Some("First"), 11.0, task_state::COMPLETED);
        db.add_child("c2", "P", Some(""), 12.0, task_state::COMPLETED);
        db.add_child("c3", "P", None, 13.0, task_state::COMPLETED);
        db.add_child("c4", "P", Some("Dropped"), 14.0, task_state::DROPPED);

        let rows = SqliteLogbook::new(db.path()).fetch_checklist_items(0.0, 1000).unwrap();
        let ids: Vec<_> = rows.iter().map(|r| r.uuid.as_str()).collect();
        assert_eq!(ids, vec!["c1", "c4"]);
        assert_eq!(rows[0].task_id, "P");
        assert_eq!(rows[1].state, task_state::DROPPED);
    }

    #[test]
    fn test_missing_database_is_an_error() {
        let dir = TempDir::new().unwrap();
        let logbook = SqliteLogbook::new(dir.path().join("missing.db"));

        let err = logbook.fetch_tasks(0.0, 10).unwrap_err();
        assert!(matches!(err, Error::Database(_)));
        assert!(!logbook.db_path().exists());
    }

    #[test]
    fn test_sql_limit_saturates() {
        assert_eq!(sql_limit(1000), 1000);
        assert_eq!(sql_limit(usize::MAX), i64::MAX);
    }
}
