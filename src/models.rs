//! Row and task types for the OmniFocus logbook.
//!
//! Rows come straight out of the OmniFocus database, one per task/tag pairing.
//! [`Task`] and [`SubTask`] are the aggregated shape handed to the renderer.

use serde::{Deserialize, Serialize};

/// OmniFocus `taskState` codes that appear in the completion log.
pub mod task_state {
    /// The task was completed.
    pub const COMPLETED: i64 = 1;
    /// The task was dropped (cancelled).
    pub const DROPPED: i64 = 2;
}

/// A completed or dropped task, denormalized by tag.
///
/// A task with several tags yields one row per tag. A task without tags
/// yields a single row with `tag == None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRow {
    /// Persistent identifier of the task.
    pub uuid: String,
    /// Task name, if any.
    pub title: Option<String>,
    /// Task note body.
    pub notes: String,
    /// Name of the folder containing the task's project.
    pub folder: Option<String>,
    /// Completion date as an OmniFocus timestamp.
    pub date_completed: f64,
    /// `taskState` code.
    pub state: i64,
    /// One tag of the task, or `None` when the task has no tags.
    pub tag: Option<String>,
}

/// A completed checklist item (an OmniFocus action with a parent).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItemRow {
    /// Persistent identifier of the item.
    pub uuid: String,
    /// Identifier of the parent task.
    pub task_id: String,
    /// Item name.
    pub title: String,
    /// `taskState` code.
    pub state: i64,
    /// Completion date as an OmniFocus timestamp.
    pub date_completed: f64,
}

/// A row ordered by completion date in one of the completion logs.
pub trait CompletedRow {
    /// Completion date as an OmniFocus timestamp.
    fn date_completed(&self) -> f64;
}

impl CompletedRow for TaskRow {
    fn date_completed(&self) -> f64 {
        self.date_completed
    }
}

impl CompletedRow for ChecklistItemRow {
    fn date_completed(&self) -> f64 {
        self.date_completed
    }
}

/// A checklist item under a [`Task`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubTask {
    /// Whether the item was completed (as opposed to dropped).
    pub completed: bool,
    /// Item name with trailing whitespace removed.
    pub title: String,
}

/// A completed task ready to be written to the logbook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Persistent identifier of the task.
    pub uuid: String,
    /// Task name with trailing whitespace removed.
    pub title: String,
    /// Task note body.
    pub notes: String,
    /// Name of the folder containing the task's project.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
    /// One entry per contributing row. `None` marks a row without a tag.
    pub tags: Vec<Option<String>>,
    /// Always zero; OmniFocus does not expose a start date in the log.
    pub start_date: f64,
    /// Completion date as a unix timestamp.
    pub stop_date: f64,
    /// Whether the task was dropped rather than completed.
    pub cancelled: bool,
    /// Checklist items in completion order.
    pub subtasks: Vec<SubTask>,
}

impl Task {
    /// Iterate over the tag names that are actually present.
    pub fn tag_names(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().filter_map(Option::as_deref)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_task() -> Task {
        Task {
            uuid: "A".to_string(),
            title: "Buy milk".to_string(),
            notes: String::new(),
            folder: None,
            tags: vec![Some("errand".to_string()), None, Some("home".to_string())],
            start_date: 0.0,
            stop_date: 978_307_300.0,
            cancelled: false,
            subtasks: vec![SubTask { completed: true, title: "2% milk".to_string() }],
        }
    }

    #[test]
    fn test_tag_names_skips_placeholders() {
        let task = sample_task();
        let names: Vec<&str> = task.tag_names().collect();
        assert_eq!(names, vec!["errand", "home"]);
        assert_eq!(task.tags.len(), 3);
    }

    #[test]
    fn test_task_serializes_camel_case() {
        let json = serde_json::to_value(sample_task()).unwrap();
        assert_eq!(json["stopDate"], 978_307_300.0);
        assert_eq!(json["startDate"], 0.0);
        assert_eq!(json["tags"][1], serde_json::Value::Null);
        assert_eq!(json["subtasks"][0]["title"], "2% milk");
        assert!(json.get("folder").is_none());
    }

    #[test]
    fn test_completed_row_reports_date() {
        let row = ChecklistItemRow {
            uuid: "c1".to_string(),
            task_id: "A".to_string(),
            title: "item".to_string(),
            state: task_state::COMPLETED,
            date_completed: 42.5,
        };
        assert!((row.date_completed() - 42.5).abs() < f64::EPSILON);
    }
}
