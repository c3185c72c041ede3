//! tf category command implementations.

use serde::Serialize;

use crate::category::{Category, EMOJI_PALETTE};
use crate::cli::SessionArgs;
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::query::{category_progress, Progress};
use crate::session::Confirmed;

pub struct AddOptions {
    pub name: String,
    pub emoji: Option<String>,
    pub session: SessionArgs,
    pub json: bool,
    pub quiet: bool,
}

pub struct ListOptions {
    pub session: SessionArgs,
    pub json: bool,
    pub quiet: bool,
}

pub struct EmojisOptions {
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

#[derive(Debug, Serialize)]
struct CategoryEntry {
    #[serde(flatten)]
    category: Category,
    progress: Progress,
}

#[derive(Debug, Serialize)]
struct CategoryListOutput {
    total: usize,
    categories: Vec<CategoryEntry>,
}

#[derive(Debug, Serialize)]
struct CategoryRemoveOutput {
    id: String,
    removed: bool,
    removed_tasks: usize,
}

pub fn run_add(options: AddOptions) -> Result<()> {
    let mut session = options.session.sign_in()?;
    let category = session.add_category(&options.name, options.emoji.as_deref())?;

    let mut human = HumanOutput::new("Category created");
    human.push_summary("ID", category.id.clone());
    human.push_summary("Name", category.label());
    human.push_next_step(format!("tf task add \"...\" --category {}", category.id));

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "category add",
        &category,
        Some(&human),
    )
}

pub fn run_list(options: ListOptions) -> Result<()> {
    let session = options.session.sign_in()?;
    let tasks = session.repository().list_tasks()?;
    let categories: Vec<CategoryEntry> = session
        .categories()?
        .into_iter()
        .map(|category| CategoryEntry {
            progress: category_progress(&tasks, &category.id),
            category,
        })
        .collect();

    let mut human = HumanOutput::new("Categories");
    human.push_summary("Total", categories.len().to_string());
    for entry in &categories {
        human.push_detail(format!(
            "{} {} {}",
            entry.category.id,
            entry.category.label(),
            entry.progress
        ));
    }
    if categories.is_empty() {
        human.push_next_step("tf category add <name>");
    }

    let output = CategoryListOutput {
        total: categories.len(),
        categories,
    };

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "category list",
        &output,
        Some(&human),
    )
}

pub fn run_emojis(options: EmojisOptions) -> Result<()> {
    let mut human = HumanOutput::new("Emoji palette");
    human.push_detail(EMOJI_PALETTE.join(" "));
    human.push_next_step("tf category add <name> --emoji <emoji>");

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "category emojis",
        &EMOJI_PALETTE,
        Some(&human),
    )
}

pub fn run_rm(options: RmOptions) -> Result<()> {
    let mut session = options.session.sign_in()?;
    let staged = session.request_delete_category(&options.id)?;
    if staged && !options.yes {
        session.cancel_pending();
        return Err(Error::ConfirmationRequired(format!(
            "delete category {} and its tasks",
            options.id
        )));
    }

    let removed_tasks = match session.confirm()? {
        Confirmed::CategoryDeleted(removal) => Some(removal.removed_tasks),
        _ => None,
    };

    let human = match removed_tasks {
        Some(count) => {
            let mut human = HumanOutput::new("Category deleted");
            human.push_summary("ID", options.id.clone());
            human.push_summary("Tasks removed", count.to_string());
            human
        }
        None => {
            let mut human = HumanOutput::new("Nothing deleted");
            human.push_warning(format!("no category with id {}", options.id));
            human
        }
    };

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "category rm",
        &CategoryRemoveOutput {
            id: options.id,
            removed: removed_tasks.is_some(),
            removed_tasks: removed_tasks.unwrap_or(0),
        },
        Some(&human),
    )
}
