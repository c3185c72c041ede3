//! Task query pipeline: category filter, text search, sort.
//!
//! Queries never touch storage order. They work on a copy of the list and
//! return a fresh vector.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::task::Task;

/// Display order for a task listing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum SortMode {
    #[default]
    #[serde(rename = "newest")]
    Newest,
    #[serde(rename = "oldest")]
    Oldest,
    #[serde(rename = "az")]
    TitleAsc,
    #[serde(rename = "za")]
    TitleDesc,
    #[serde(rename = "pending")]
    PendingFirst,
    #[serde(rename = "done")]
    DoneFirst,
}

impl SortMode {
    pub const ALL: [SortMode; 6] = [
        SortMode::Newest,
        SortMode::Oldest,
        SortMode::TitleAsc,
        SortMode::TitleDesc,
        SortMode::PendingFirst,
        SortMode::DoneFirst,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortMode::Newest => "newest",
            SortMode::Oldest => "oldest",
            SortMode::TitleAsc => "az",
            SortMode::TitleDesc => "za",
            SortMode::PendingFirst => "pending",
            SortMode::DoneFirst => "done",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortMode {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        SortMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == wanted)
            .ok_or_else(|| {
                Error::InvalidArgument(format!(
                    "invalid sort '{}': must be newest, oldest, az, za, pending, or done",
                    s
                ))
            })
    }
}

/// Filter and order settings for one listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskQuery {
    /// `None` lists every category.
    pub category: Option<String>,
    pub search: String,
    pub sort: SortMode,
}

impl TaskQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: Option<&str>) -> Self {
        self.category = category.map(str::to_string);
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn sort(mut self, sort: SortMode) -> Self {
        self.sort = sort;
        self
    }

    /// Narrow by category, then by search term, then sort.
    pub fn run(&self, tasks: &[Task]) -> Vec<Task> {
        let needle = normalize_search(&self.search);
        let mut matched: Vec<Task> = tasks
            .iter()
            .filter(|task| match &self.category {
                Some(category_id) => &task.category_id == category_id,
                None => true,
            })
            .filter(|task| match &needle {
                Some(needle) => matches_search(task, needle),
                None => true,
            })
            .cloned()
            .collect();
        sort_tasks(&mut matched, self.sort);
        matched
    }
}

/// Trimmed, lowercased search term, or `None` when there is nothing to match.
pub fn normalize_search(search: &str) -> Option<String> {
    let needle = search.trim().to_lowercase();
    if needle.is_empty() {
        None
    } else {
        Some(needle)
    }
}

/// `needle` must already be lowercased.
pub fn matches_search(task: &Task, needle: &str) -> bool {
    task.title.to_lowercase().contains(needle)
        || (!task.description.is_empty() && task.description.to_lowercase().contains(needle))
}

/// Stable in-place sort.
pub fn sort_tasks(tasks: &mut [Task], mode: SortMode) {
    match mode {
        SortMode::Newest => tasks.sort_by(|left, right| right.created_at.cmp(&left.created_at)),
        SortMode::Oldest => tasks.sort_by(|left, right| left.created_at.cmp(&right.created_at)),
        SortMode::TitleAsc => tasks.sort_by(|left, right| compare_titles(&left.title, &right.title)),
        SortMode::TitleDesc => {
            tasks.sort_by(|left, right| compare_titles(&right.title, &left.title))
        }
        SortMode::PendingFirst => tasks.sort_by_key(|task| task.is_done()),
        SortMode::DoneFirst => tasks.sort_by_key(|task| !task.is_done()),
    }
}

fn compare_titles(left: &str, right: &str) -> Ordering {
    left.to_lowercase()
        .cmp(&right.to_lowercase())
        .then_with(|| left.cmp(right))
}

/// Completion counters.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
pub struct Progress {
    pub done: usize,
    pub total: usize,
    pub percent: u32,
}

impl Progress {
    pub fn of<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        let (done, total) = tasks.into_iter().fold((0, 0), |(done, total), task| {
            (done + usize::from(task.is_done()), total + 1)
        });
        Self {
            done,
            total,
            percent: percent(done, total),
        }
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} ({}%)", self.done, self.total, self.percent)
    }
}

/// Progress over every task.
pub fn progress(tasks: &[Task]) -> Progress {
    Progress::of(tasks)
}

/// Progress over the tasks of one category.
pub fn category_progress(tasks: &[Task], category_id: &str) -> Progress {
    Progress::of(tasks.iter().filter(|task| task.category_id == category_id))
}

fn percent(done: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((done as f64 / total as f64) * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskStatus;
    use chrono::{TimeZone, Utc};

    fn task(id: &str, title: &str, category: &str, millis: i64, status: TaskStatus) -> Task {
        Task {
            id: id.to_string(),
            title: title.to_string(),
            description: String::new(),
            category_id: category.to_string(),
            status,
            created_at: Utc.timestamp_millis_opt(millis).unwrap(),
        }
    }

    fn ids(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|task| task.id.as_str()).collect()
    }

    #[test]
    fn sort_mode_parses_wire_names() {
        for mode in SortMode::ALL {
            assert_eq!(mode.as_str().parse::<SortMode>().unwrap(), mode);
        }
        assert_eq!(" AZ ".parse::<SortMode>().unwrap(), SortMode::TitleAsc);
        assert!("priority".parse::<SortMode>().is_err());
    }

    #[test]
    fn newest_and_oldest_order_by_creation() {
        let tasks = vec![
            task("a", "A", "c", 2, TaskStatus::Pending),
            task("b", "B", "c", 3, TaskStatus::Pending),
            task("c", "C", "c", 1, TaskStatus::Pending),
        ];
        let newest = TaskQuery::new().run(&tasks);
        assert_eq!(ids(&newest), vec!["b", "a", "c"]);
        let oldest = TaskQuery::new().sort(SortMode::Oldest).run(&tasks);
        assert_eq!(ids(&oldest), vec!["c", "a", "b"]);
        // input untouched
        assert_eq!(ids(&tasks), vec!["a", "b", "c"]);
    }

    #[test]
    fn title_sort_ignores_case() {
        let tasks = vec![
            task("1", "banana", "c", 0, TaskStatus::Pending),
            task("2", "Apple", "c", 0, TaskStatus::Pending),
            task("3", "cherry", "c", 0, TaskStatus::Pending),
        ];
        let az = TaskQuery::new().sort(SortMode::TitleAsc).run(&tasks);
        assert_eq!(ids(&az), vec!["2", "1", "3"]);
        let za = TaskQuery::new().sort(SortMode::TitleDesc).run(&tasks);
        assert_eq!(ids(&za), vec!["3", "1", "2"]);
    }

    #[test]
    fn pending_first_is_stable_partition() {
        let tasks = vec![
            task("d1", "x", "c", 5, TaskStatus::Done),
            task("p1", "x", "c", 1, TaskStatus::Pending),
            task("d2", "x", "c", 9, TaskStatus::Done),
            task("p2", "x", "c", 7, TaskStatus::Pending),
        ];
        let pending = TaskQuery::new().sort(SortMode::PendingFirst).run(&tasks);
        assert_eq!(ids(&pending), vec!["p1", "p2", "d1", "d2"]);
        let done = TaskQuery::new().sort(SortMode::DoneFirst).run(&tasks);
        assert_eq!(ids(&done), vec!["d1", "d2", "p1", "p2"]);
    }

    #[test]
    fn category_then_search_filters() {
        let mut with_desc = task("3", "Call", "home", 3, TaskStatus::Pending);
        with_desc.description = "ask about the MILK delivery".to_string();
        let tasks = vec![
            task("1", "Buy milk", "home", 1, TaskStatus::Pending),
            task("2", "Milk report", "work", 2, TaskStatus::Pending),
            with_desc,
        ];

        let query = TaskQuery::new()
            .category(Some("home"))
            .search("  Milk ")
            .sort(SortMode::Oldest);
        assert_eq!(ids(&query.run(&tasks)), vec!["1", "3"]);

        let blank = TaskQuery::new().search("   ").sort(SortMode::Oldest);
        assert_eq!(ids(&blank.run(&tasks)), vec!["1", "2", "3"]);
    }

    #[test]
    fn progress_rounds_and_handles_empty() {
        assert_eq!(progress(&[]), Progress::default());

        let tasks = vec![
            task("1", "a", "x", 0, TaskStatus::Done),
            task("2", "b", "x", 0, TaskStatus::Pending),
            task("3", "c", "y", 0, TaskStatus::Pending),
        ];
        let all = progress(&tasks);
        assert_eq!((all.done, all.total, all.percent), (1, 3, 33));
        let x = category_progress(&tasks, "x");
        assert_eq!((x.done, x.total, x.percent), (1, 2, 50));
        assert_eq!(category_progress(&tasks, "missing").percent, 0);
        assert_eq!(x.to_string(), "1/2 (50%)");
    }
}
