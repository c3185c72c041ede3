//! tf theme command implementations.
//!
//! The theme is a device preference, so these commands never sign in.

use serde::Serialize;

use crate::cli::SessionArgs;
use crate::error::Result;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::storage::Theme;

pub struct ShowOptions {
    pub session: SessionArgs,
    pub json: bool,
    pub quiet: bool,
}

pub struct SetOptions {
    pub theme: String,
    pub session: SessionArgs,
    pub json: bool,
    pub quiet: bool,
}

pub struct ToggleOptions {
    pub session: SessionArgs,
    pub json: bool,
    pub quiet: bool,
}

#[derive(Debug, Serialize)]
struct ThemeOutput {
    theme: Theme,
}

pub fn run_show(options: ShowOptions) -> Result<()> {
    let session = options.session.open()?;
    emit_theme(
        session.theme()?,
        "Theme",
        "theme show",
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
    )
}

pub fn run_set(options: SetOptions) -> Result<()> {
    let theme: Theme = options.theme.parse()?;
    let mut session = options.session.open()?;
    session.set_theme(theme)?;
    emit_theme(
        theme,
        "Theme saved",
        "theme set",
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
    )
}

pub fn run_toggle(options: ToggleOptions) -> Result<()> {
    let mut session = options.session.open()?;
    let theme = session.toggle_theme()?;
    emit_theme(
        theme,
        "Theme switched",
        "theme toggle",
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
    )
}

fn emit_theme(theme: Theme, header: &str, command: &str, output: OutputOptions) -> Result<()> {
    let mut human = HumanOutput::new(header);
    human.push_summary("Theme", theme.to_string());
    emit_success(output, command, &ThemeOutput { theme }, Some(&human))
}
