//! Folding flat logbook rows into [`Task`]s.
//!
//! The task query fans out one row per tag, and checklist items arrive from a
//! separate query keyed by their parent. Both are merged here by task
//! identifier.

use crate::epoch::core_data_to_unix;
use crate::models::{task_state, ChecklistItemRow, SubTask, Task, TaskRow};
use std::collections::HashMap;

/// Build tasks from task rows and checklist item rows.
///
/// The first row seen for an identifier fixes every field except the tag
/// list; later rows with the same identifier only contribute their tag, which
/// is appended verbatim (including `None` and repeats). Checklist items whose
/// parent was not fetched are dropped. Tasks come out in order of first
/// appearance, and subtasks in checklist row order.
#[must_use]
pub fn build_tasks_from_records(
    task_rows: &[TaskRow],
    checklist_rows: &[ChecklistItemRow],
) -> Vec<Task> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut tasks: Vec<Task> = Vec::new();

    for row in task_rows {
        if let Some(&i) = index.get(row.uuid.as_str()) {
            tasks[i].tags.push(row.tag.clone());
        } else {
            index.insert(&row.uuid, tasks.len());
            tasks.push(task_from_row(row));
        }
    }

    for item in checklist_rows {
        // A checklist item can complete before its parent task.
        let Some(&i) = index.get(item.task_id.as_str()) else {
            continue;
        };
        tasks[i].subtasks.push(SubTask {
            completed: item.state == task_state::COMPLETED,
            title: item.title.trim_end().to_string(),
        });
    }

    tasks
}

fn task_from_row(row: &TaskRow) -> Task {
    Task {
        uuid: row.uuid.clone(),
        title: row.title.as_deref().unwrap_or_default().trim_end().to_string(),
        notes: row.notes.clone(),
        folder: row.folder.clone(),
        tags: vec![row.tag.clone()],
        start_date: 0.0,
        stop_date: core_data_to_unix(row.date_completed),
        cancelled: row.state == task_state::DROPPED,
        subtasks: Vec::new(),
    }
}
