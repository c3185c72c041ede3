//! Task records.
//!
//! Tasks are stored as a single JSON array under the `tf-tasks` key. Field
//! names are camelCase and timestamps are epoch milliseconds so records stay
//! readable by earlier builds of the app.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::id::{new_id, timestamp};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    Pending,
    Done,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Done => "done",
        }
    }

    /// The other status.
    pub fn toggled(self) -> Self {
        match self {
            TaskStatus::Pending => TaskStatus::Done,
            TaskStatus::Done => TaskStatus::Pending,
        }
    }

    pub fn is_done(self) -> bool {
        self == TaskStatus::Done
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(TaskStatus::Pending),
            "done" => Ok(TaskStatus::Done),
            _ => Err(Error::InvalidArgument(format!(
                "invalid status '{}': must be pending or done",
                s
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category_id: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// A new pending task stamped with the current time.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        category_id: impl Into<String>,
    ) -> Self {
        Self {
            id: new_id(),
            title: title.into(),
            description: description.into(),
            category_id: category_id.into(),
            status: TaskStatus::Pending,
            created_at: timestamp(),
        }
    }

    pub fn is_done(&self) -> bool {
        self.status.is_done()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_json_uses_browser_field_names() {
        let raw = r#"{"id":"m1abc","title":"Buy milk","description":"","categoryId":"c1","status":"done","createdAt":1700000000000}"#;
        let task: Task = serde_json::from_str(raw).expect("parse");
        assert_eq!(task.category_id, "c1");
        assert_eq!(task.status, TaskStatus::Done);
        assert_eq!(task.created_at.timestamp_millis(), 1_700_000_000_000);

        let back = serde_json::to_value(&task).expect("serialize");
        assert_eq!(back["categoryId"], "c1");
        assert_eq!(back["createdAt"], 1_700_000_000_000i64);
        assert_eq!(back["status"], "done");
    }

    #[test]
    fn missing_description_decodes_as_empty() {
        let raw = r#"{"id":"t","title":"x","categoryId":"c","status":"pending","createdAt":0}"#;
        let task: Task = serde_json::from_str(raw).expect("parse");
        assert!(task.description.is_empty());
    }

    #[test]
    fn status_toggles_and_parses() {
        assert_eq!(TaskStatus::Pending.toggled(), TaskStatus::Done);
        assert_eq!(TaskStatus::Done.toggled(), TaskStatus::Pending);
        assert_eq!("DONE".parse::<TaskStatus>().expect("parse"), TaskStatus::Done);
        assert!("closed".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn new_task_is_pending() {
        let task = Task::new("Write report", "", "c1");
        assert_eq!(task.status, TaskStatus::Pending);
        assert!(!task.is_done());
        assert!(!task.id.is_empty());
    }
}
