//! tf task and tf progress command implementations.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cli::SessionArgs;
use crate::error::{Error, Result};
use crate::output::{emit_success, time_ago, HumanOutput, OutputOptions};
use crate::query::SortMode;
use crate::session::{Confirmed, ScopeSummary, ALL_TASKS_LABEL};
use crate::task::Task;

pub struct AddOptions {
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub session: SessionArgs,
    pub json: bool,
    pub quiet: bool,
}

pub struct ListOptions {
    pub category: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
    pub session: SessionArgs,
    pub json: bool,
    pub quiet: bool,
}

pub struct EditOptions {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub session: SessionArgs,
    pub json: bool,
    pub quiet: bool,
}

pub struct ToggleOptions {
    pub id: String,
    pub session: SessionArgs,
    pub json: bool,
    pub quiet: bool,
}

pub struct RmOptions {
    pub id: String,
    pub yes: bool,
    pub session: SessionArgs,
    pub json: bool,
    pub quiet: bool,
}

pub struct ProgressOptions {
    pub category: Option<String>,
    pub session: SessionArgs,
    pub json: bool,
    pub quiet: bool,
}

#[derive(Debug, Serialize)]
struct TaskListOutput {
    total: usize,
    sort: SortMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    search: String,
    tasks: Vec<Task>,
}

#[derive(Debug, Serialize)]
struct TaskMissOutput {
    id: String,
    found: bool,
}

#[derive(Debug, Serialize)]
struct TaskAddMissOutput {
    category: String,
    created: bool,
}

#[derive(Debug, Serialize)]
struct TaskRemoveOutput {
    id: String,
    removed: bool,
}

pub fn run_add(options: AddOptions) -> Result<()> {
    let mut session = options.session.sign_in()?;
    let created = session.add_task(
        &options.title,
        options.description.as_deref().unwrap_or_default(),
        options.category.as_deref(),
    )?;
    let output = OutputOptions {
        json: options.json,
        quiet: options.quiet,
    };

    let Some(task) = created else {
        let category = options.category.unwrap_or_default();
        let mut human = HumanOutput::new("Nothing created");
        human.push_warning(format!("no category with id {category}"));
        human.push_next_step("tf category list");
        return emit_success(
            output,
            "task add",
            &TaskAddMissOutput {
                category,
                created: false,
            },
            Some(&human),
        );
    };

    let mut human = HumanOutput::new("Task created");
    push_task_summary(&mut human, &task);
    human.push_next_step(format!("tf task toggle {}", task.id));

    emit_success(output, "task add", &task, Some(&human))
}

pub fn run_list(options: ListOptions) -> Result<()> {
    let mut session = options.session.sign_in()?;
    let mut human = HumanOutput::new("Tasks");

    if let Some(category) = options.category.as_deref() {
        if !session.select_category(category)? {
            human.push_warning(format!("no category with id {category}; showing all tasks"));
        }
    }
    if let Some(search) = options.search {
        session.set_search(search);
    }
    if let Some(sort) = options.sort.as_deref() {
        session.set_sort(sort.parse()?);
    }

    let tasks = session.visible_tasks()?;
    let labels: HashMap<String, String> = session
        .categories()?
        .into_iter()
        .map(|category| (category.id.clone(), category.label()))
        .collect();

    human.push_summary("Total", tasks.len().to_string());
    human.push_summary("Sort", session.sort().to_string());
    if let Some(summary) = session.scope_summary()? {
        human.push_summary(summary.label, summary.progress.to_string());
    }
    if !session.search().trim().is_empty() {
        human.push_summary("Search", session.search().to_string());
    }

    let now = Utc::now();
    for task in &tasks {
        let category = labels
            .get(&task.category_id)
            .map(String::as_str)
            .unwrap_or("?");
        human.push_detail(format_task_line(task, category, now));
    }

    let output = TaskListOutput {
        total: tasks.len(),
        sort: session.sort(),
        category: session.active_category().map(str::to_string),
        search: session.search().to_string(),
        tasks,
    };

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "task list",
        &output,
        Some(&human),
    )
}

pub fn run_edit(options: EditOptions) -> Result<()> {
    let mut session = options.session.sign_in()?;
    let updated = session.edit_task(
        &options.id,
        &options.title,
        options.description.as_deref(),
    )?;
    emit_task_change(
        updated,
        &options.id,
        "Task updated",
        "task edit",
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
    )
}

pub fn run_toggle(options: ToggleOptions) -> Result<()> {
    let mut session = options.session.sign_in()?;
    let toggled = session.toggle_task(&options.id)?;
    emit_task_change(
        toggled,
        &options.id,
        "Task status changed",
        "task toggle",
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
    )
}

pub fn run_rm(options: RmOptions) -> Result<()> {
    let mut session = options.session.sign_in()?;
    let staged = session.request_delete_task(&options.id)?;
    if staged && !options.yes {
        session.cancel_pending();
        return Err(Error::ConfirmationRequired(format!(
            "delete task {}",
            options.id
        )));
    }

    let removed = matches!(session.confirm()?, Confirmed::TaskDeleted(_));
    let mut human = HumanOutput::new(if removed {
        "Task deleted"
    } else {
        "Nothing deleted"
    });
    if removed {
        human.push_summary("ID", options.id.clone());
    } else {
        human.push_warning(format!("no task with id {}", options.id));
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "task rm",
        &TaskRemoveOutput {
            id: options.id,
            removed,
        },
        Some(&human),
    )
}

pub fn run_progress(options: ProgressOptions) -> Result<()> {
    let mut session = options.session.sign_in()?;
    let mut human = HumanOutput::new("Progress");

    if let Some(category) = options.category.as_deref() {
        if !session.select_category(category)? {
            human.push_warning(format!("no category with id {category}; showing all tasks"));
        }
    }

    let summary = match session.scope_summary()? {
        Some(summary) => summary,
        None => ScopeSummary {
            label: ALL_TASKS_LABEL.to_string(),
            category_id: None,
            progress: session.progress()?,
        },
    };
    human.push_summary("Scope", summary.label.clone());
    human.push_summary("Done", summary.progress.done.to_string());
    human.push_summary("Total", summary.progress.total.to_string());
    human.push_summary("Percent", format!("{}%", summary.progress.percent));

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "progress",
        &summary,
        Some(&human),
    )
}

fn emit_task_change(
    task: Option<Task>,
    id: &str,
    header: &str,
    command: &str,
    output: OutputOptions,
) -> Result<()> {
    match task {
        Some(task) => {
            let mut human = HumanOutput::new(header);
            push_task_summary(&mut human, &task);
            emit_success(output, command, &task, Some(&human))
        }
        None => {
            let mut human = HumanOutput::new("Nothing changed");
            human.push_warning(format!("no task with id {id}"));
            emit_success(
                output,
                command,
                &TaskMissOutput {
                    id: id.to_string(),
                    found: false,
                },
                Some(&human),
            )
        }
    }
}

fn push_task_summary(human: &mut HumanOutput, task: &Task) {
    human.push_summary("ID", task.id.clone());
    human.push_summary("Title", task.title.clone());
    if !task.description.is_empty() {
        human.push_summary("Description", task.description.clone());
    }
    human.push_summary("Status", task.status.to_string());
    human.push_summary("Category", task.category_id.clone());
}

fn format_task_line(task: &Task, category: &str, now: DateTime<Utc>) -> String {
    let mut line = format!(
        "[{}] {} {} ({}, {})",
        task.status,
        task.id,
        task.title,
        category,
        time_ago(task.created_at, now)
    );
    if !task.description.is_empty() {
        line.push_str(&format!(" - {}", task.description));
    }
    line
}
