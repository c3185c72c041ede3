//! tf register / login / clear command implementations.

use serde::Serialize;

use crate::category::Category;
use crate::cli::SessionArgs;
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::query::Progress;
use crate::session::Confirmed;

pub struct RegisterOptions {
    pub email: String,
    pub session: SessionArgs,
    pub json: bool,
    pub quiet: bool,
}

pub struct LoginOptions {
    pub session: SessionArgs,
    pub json: bool,
    pub quiet: bool,
}

pub struct ClearOptions {
    pub yes: bool,
    pub session: SessionArgs,
    pub json: bool,
    pub quiet: bool,
}

#[derive(Debug, Serialize)]
struct RegisterOutput {
    username: String,
    email: String,
    categories: Vec<Category>,
}

#[derive(Debug, Serialize)]
struct LoginOutput {
    username: String,
    categories: usize,
    progress: Progress,
}

#[derive(Debug, Serialize)]
struct ClearOutput {
    cleared: bool,
}

pub fn run_register(options: RegisterOptions) -> Result<()> {
    let (username, password) = options.session.credentials()?;
    let mut session = options.session.open()?;
    let categories = session.sign_up(username, &options.email, password)?;

    let output = RegisterOutput {
        username: session.username().unwrap_or(username).to_string(),
        email: options.email.trim().to_string(),
        categories,
    };

    let mut human = HumanOutput::new("Account created");
    human.push_summary("Username", output.username.clone());
    human.push_summary("Email", output.email.clone());
    for category in &output.categories {
        human.push_detail(format!("{} {}", category.id, category.label()));
    }
    human.push_next_step("tf task add \"...\"");

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "register",
        &output,
        Some(&human),
    )
}

pub fn run_login(options: LoginOptions) -> Result<()> {
    let session = options.session.sign_in()?;

    let output = LoginOutput {
        username: session.username().unwrap_or_default().to_string(),
        categories: session.categories()?.len(),
        progress: session.progress()?,
    };

    let mut human = HumanOutput::new(format!("Signed in as {}", output.username));
    human.push_summary("Categories", output.categories.to_string());
    human.push_summary("Progress", output.progress.to_string());

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "login",
        &output,
        Some(&human),
    )
}

pub fn run_clear(options: ClearOptions) -> Result<()> {
    let mut session = options.session.sign_in()?;
    session.request_clear_all()?;
    if !options.yes {
        session.cancel_pending();
        return Err(Error::ConfirmationRequired("clear all data".to_string()));
    }
    let cleared = session.confirm()? == Confirmed::DataCleared;

    let mut human = HumanOutput::new("All data cleared");
    human.push_summary("Account", "removed");
    human.push_next_step("tf register --email <email>");

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "clear",
        &ClearOutput { cleared },
        Some(&human),
    )
}
