//! Command-line interface for tf
//!
//! This module defines the CLI structure using clap derive macros.
//! Each command group is implemented in its own submodule.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{default_data_dir, Config};
use crate::error::{Error, Result};
use crate::session::Session;
use crate::storage::FileStore;

mod account;
mod category;
mod task;
mod theme;

/// tf - TaskFlow
///
/// A single-account task manager: emoji categories, tasks with a
/// pending/done status, search, sorting, and progress.
#[derive(Parser, Debug)]
#[command(name = "tf")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding the records (defaults to the platform data dir)
    #[arg(long, global = true, env = "TF_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Path to a taskflow.toml (defaults to <data-dir>/taskflow.toml)
    #[arg(long, global = true, env = "TF_CONFIG")]
    pub config: Option<PathBuf>,

    /// Account username
    #[arg(long, global = true, env = "TF_USERNAME")]
    pub username: Option<String>,

    /// Account password
    #[arg(long, global = true, env = "TF_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the account, replacing any existing one and all its data
    Register {
        /// Contact email
        #[arg(long)]
        email: String,
    },

    /// Check credentials and show an overview
    Login,

    /// Category management
    #[command(subcommand)]
    Category(CategoryCommands),

    /// Task management
    #[command(subcommand)]
    Task(TaskCommands),

    /// Show completion progress
    Progress {
        /// Limit to one category
        #[arg(long)]
        category: Option<String>,
    },

    /// Light/dark theme preference
    #[command(subcommand)]
    Theme(ThemeCommands),

    /// Delete the account and every record
    Clear {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

/// Category subcommands
#[derive(Subcommand, Debug)]
pub enum CategoryCommands {
    /// Create a category
    Add {
        /// Category name
        name: String,

        /// Emoji shown next to the name
        #[arg(long)]
        emoji: Option<String>,
    },

    /// List categories with their progress
    List,

    /// Show the emoji palette offered for new categories
    Emojis,

    /// Delete a category and all of its tasks
    Rm {
        /// Category ID
        id: String,

        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

/// Task subcommands
#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// Create a task
    Add {
        /// Task title
        title: String,

        /// Longer description
        #[arg(short, long)]
        description: Option<String>,

        /// Category ID (defaults to the first category)
        #[arg(long)]
        category: Option<String>,
    },

    /// List tasks
    List {
        /// Only tasks in this category
        #[arg(long)]
        category: Option<String>,

        /// Case-insensitive text to find in title or description
        #[arg(short, long)]
        search: Option<String>,

        /// Sort order: newest, oldest, az, za, pending, done
        #[arg(long)]
        sort: Option<String>,
    },

    /// Change a task's title and description
    Edit {
        /// Task ID
        id: String,

        /// New title
        #[arg(long)]
        title: String,

        /// New description (unchanged when omitted)
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Flip a task between pending and done
    Toggle {
        /// Task ID
        id: String,
    },

    /// Delete a task
    Rm {
        /// Task ID
        id: String,

        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

/// Theme subcommands
#[derive(Subcommand, Debug)]
pub enum ThemeCommands {
    /// Print the stored theme
    Show,

    /// Store a theme: light or dark
    Set { theme: String },

    /// Switch between light and dark
    Toggle,
}

/// Data location and credentials shared by every command.
#[derive(Debug, Clone, Default)]
pub struct SessionArgs {
    pub data_dir: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl SessionArgs {
    /// Open the store without signing in.
    pub fn open(&self) -> Result<Session<FileStore>> {
        let data_dir = self.data_dir.clone().unwrap_or_else(default_data_dir);
        let config = match self.config.as_deref() {
            Some(path) => Config::load(path)?,
            None => Config::load_from_dir(&data_dir),
        };
        tracing::debug!(data_dir = %data_dir.display(), "opening store");
        let store = FileStore::with_lock_timeout(data_dir, config.storage.lock_timeout_ms)?;
        Ok(Session::open(store, &config))
    }

    /// Open the store and sign in with the given credentials.
    pub fn sign_in(&self) -> Result<Session<FileStore>> {
        let (username, password) = self.credentials()?;
        let mut session = self.open()?;
        session.sign_in(username, password)?;
        Ok(session)
    }

    fn credentials(&self) -> Result<(&str, &str)> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(username), Some(password)) => Ok((username, password)),
            _ => Err(Error::NotSignedIn),
        }
    }
}

impl Commands {
    /// Name reported in the `command` field of JSON output.
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Register { .. } => "register",
            Commands::Login => "login",
            Commands::Progress { .. } => "progress",
            Commands::Clear { .. } => "clear",
            Commands::Category(cmd) => match cmd {
                CategoryCommands::Add { .. } => "category add",
                CategoryCommands::List => "category list",
                CategoryCommands::Emojis => "category emojis",
                CategoryCommands::Rm { .. } => "category rm",
            },
            Commands::Task(cmd) => match cmd {
                TaskCommands::Add { .. } => "task add",
                TaskCommands::List { .. } => "task list",
                TaskCommands::Edit { .. } => "task edit",
                TaskCommands::Toggle { .. } => "task toggle",
                TaskCommands::Rm { .. } => "task rm",
            },
            Commands::Theme(cmd) => match cmd {
                ThemeCommands::Show => "theme show",
                ThemeCommands::Set { .. } => "theme set",
                ThemeCommands::Toggle => "theme toggle",
            },
        }
    }
}

impl Cli {
    pub fn command_name(&self) -> &'static str {
        self.command.name()
    }

    fn session_args(&self) -> SessionArgs {
        SessionArgs {
            data_dir: self.data_dir.clone(),
            config: self.config.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
        }
    }

    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let session = self.session_args();
        let (json, quiet) = (self.json, self.quiet);

        match self.command {
            Commands::Register { email } => account::run_register(account::RegisterOptions {
                email,
                session,
                json,
                quiet,
            }),
            Commands::Login => account::run_login(account::LoginOptions {
                session,
                json,
                quiet,
            }),
            Commands::Clear { yes } => account::run_clear(account::ClearOptions {
                yes,
                session,
                json,
                quiet,
            }),
            Commands::Progress { category } => task::run_progress(task::ProgressOptions {
                category,
                session,
                json,
                quiet,
            }),
            Commands::Category(cmd) => match cmd {
                CategoryCommands::Add { name, emoji } => {
                    category::run_add(category::AddOptions {
                        name,
                        emoji,
                        session,
                        json,
                        quiet,
                    })
                }
                CategoryCommands::List => category::run_list(category::ListOptions {
                    session,
                    json,
                    quiet,
                }),
                CategoryCommands::Emojis => category::run_emojis(category::EmojisOptions {
                    json,
                    quiet,
                }),
                CategoryCommands::Rm { id, yes } => category::run_rm(category::RmOptions {
                    id,
                    yes,
                    session,
                    json,
                    quiet,
                }),
            },
            Commands::Task(cmd) => match cmd {
                TaskCommands::Add {
                    title,
                    description,
                    category,
                } => task::run_add(task::AddOptions {
                    title,
                    description,
                    category,
                    session,
                    json,
                    quiet,
                }),
                TaskCommands::List {
                    category,
                    search,
                    sort,
                } => task::run_list(task::ListOptions {
                    category,
                    search,
                    sort,
                    session,
                    json,
                    quiet,
                }),
                TaskCommands::Edit {
                    id,
                    title,
                    description,
                } => task::run_edit(task::EditOptions {
                    id,
                    title,
                    description,
                    session,
                    json,
                    quiet,
                }),
                TaskCommands::Toggle { id } => task::run_toggle(task::ToggleOptions {
                    id,
                    session,
                    json,
                    quiet,
                }),
                TaskCommands::Rm { id, yes } => task::run_rm(task::RmOptions {
                    id,
                    yes,
                    session,
                    json,
                    quiet,
                }),
            },
            Commands::Theme(cmd) => match cmd {
                ThemeCommands::Show => theme::run_show(theme::ShowOptions {
                    session,
                    json,
                    quiet,
                }),
                ThemeCommands::Set { theme } => theme::run_set(theme::SetOptions {
                    theme,
                    session,
                    json,
                    quiet,
                }),
                ThemeCommands::Toggle => theme::run_toggle(theme::ToggleOptions {
                    session,
                    json,
                    quiet,
                }),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn missing_credentials_mean_not_signed_in() {
        let args = SessionArgs {
            username: Some("alice".to_string()),
            ..SessionArgs::default()
        };
        assert!(matches!(args.credentials(), Err(Error::NotSignedIn)));
    }

    #[test]
    fn command_name_ignores_global_flag_values() {
        let cli = Cli::try_parse_from([
            "tf",
            "--data-dir",
            "/tmp/tf-data",
            "--username",
            "alice",
            "--password",
            "hunter22",
            "--json",
            "login",
        ])
        .unwrap();
        assert_eq!(cli.command_name(), "login");

        let cli = Cli::try_parse_from([
            "tf",
            "--password=hunter22",
            "task",
            "--data-dir",
            "/tmp/tf-data",
            "edit",
            "t1",
            "--title",
            "New",
        ])
        .unwrap();
        assert_eq!(cli.command_name(), "task edit");

        let cli = Cli::try_parse_from(["tf", "-q", "theme", "set", "dark"]).unwrap();
        assert_eq!(cli.command_name(), "theme set");
    }
}
