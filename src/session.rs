//! Authentication state machine and per-session application state.
//!
//! A [`Session`] always opens logged out, whatever the store holds: the
//! account record persists, a sign-in does not. Everything the presentation
//! layer needs to remember between actions (active category, search text,
//! sort order, the action awaiting confirmation) lives here as plain fields.

use serde::Serialize;

use crate::category::{Category, CategorySeed};
use crate::config::{AuthConfig, Config};
use crate::error::{Error, Result};
use crate::query::{category_progress, progress, Progress, SortMode, TaskQuery};
use crate::repository::{CategoryRemoval, Repository};
use crate::storage::{KeyValueStore, Theme};
use crate::task::Task;
use crate::user::User;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AuthState {
    LoggedOut,
    LoggedIn { username: String },
}

/// A destructive action waiting for the user to confirm it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "id", rename_all = "snake_case")]
pub enum PendingAction {
    DeleteCategory(String),
    DeleteTask(String),
    ClearAll,
}

/// What [`Session::confirm`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirmed {
    CategoryDeleted(CategoryRemoval),
    TaskDeleted(Task),
    DataCleared,
    /// Nothing was pending, or the target vanished in the meantime.
    Nothing,
}

/// Header for the current listing: which scope, and how far along it is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScopeSummary {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    pub progress: Progress,
}

pub const ALL_TASKS_LABEL: &str = "📋 All tasks";

#[derive(Debug)]
pub struct Session<S> {
    repo: Repository<S>,
    auth: AuthConfig,
    seeds: Vec<CategorySeed>,
    state: AuthState,
    active_category: Option<String>,
    search: String,
    sort: SortMode,
    pending: Option<PendingAction>,
}

impl<S: KeyValueStore> Session<S> {
    pub fn open(store: S, config: &Config) -> Self {
        Self {
            repo: Repository::new(store).with_default_emoji(config.categories.default_emoji.clone()),
            auth: config.auth.clone(),
            seeds: config.categories.defaults.clone(),
            state: AuthState::LoggedOut,
            active_category: None,
            search: String::new(),
            sort: config.tasks.default_sort,
            pending: None,
        }
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn is_logged_in(&self) -> bool {
        matches!(self.state, AuthState::LoggedIn { .. })
    }

    pub fn username(&self) -> Option<&str> {
        match &self.state {
            AuthState::LoggedIn { username } => Some(username),
            AuthState::LoggedOut => None,
        }
    }

    pub fn repository(&self) -> &Repository<S> {
        &self.repo
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Register a new account, replacing any existing one and all its data.
    ///
    /// Returns the seeded default categories.
    pub fn sign_up(&mut self, username: &str, email: &str, password: &str) -> Result<Vec<Category>> {
        let username = self.validate_credentials(username, password)?;
        let email = email.trim();
        if email.is_empty() {
            return Err(Error::Validation("email is required".to_string()));
        }

        let user = User::register(username, email, password);
        let categories = self.repo.install_account(&user, &self.seeds)?;
        tracing::info!(username, "account registered");
        self.enter(username);
        Ok(categories)
    }

    pub fn sign_in(&mut self, username: &str, password: &str) -> Result<()> {
        let username = self.validate_credentials(username, password)?;
        let Some(stored) = self.repo.load_user()? else {
            return Err(Error::AccountNotFound);
        };
        if !stored.matches(username, password) {
            tracing::info!(username, "sign-in rejected");
            return Err(Error::IncorrectCredentials);
        }
        tracing::info!(username, "signed in");
        self.enter(username);
        Ok(())
    }

    pub fn logout(&mut self) {
        self.state = AuthState::LoggedOut;
        self.reset_view();
    }

    /// Purge every record (account, categories, tasks, theme) and log out.
    pub fn clear_all_data(&mut self) -> Result<()> {
        self.require_login()?;
        self.repo.clear_all()?;
        self.logout();
        tracing::info!("all data cleared");
        Ok(())
    }

    fn validate_credentials<'a>(&self, username: &'a str, password: &str) -> Result<&'a str> {
        let username = username.trim();
        if username.encode_utf16().count() < self.auth.min_username_len {
            return Err(Error::Validation(format!(
                "username must be at least {} characters",
                self.auth.min_username_len
            )));
        }
        if password.encode_utf16().count() < self.auth.min_password_len {
            return Err(Error::Validation(format!(
                "password must be at least {} characters",
                self.auth.min_password_len
            )));
        }
        Ok(username)
    }

    fn enter(&mut self, username: &str) {
        self.state = AuthState::LoggedIn {
            username: username.to_string(),
        };
        self.reset_view();
    }

    fn reset_view(&mut self) {
        self.active_category = None;
        self.pending = None;
    }

    fn require_login(&self) -> Result<()> {
        if self.is_logged_in() {
            Ok(())
        } else {
            Err(Error::NotSignedIn)
        }
    }

    // =========================================================================
    // Categories
    // =========================================================================

    pub fn categories(&self) -> Result<Vec<Category>> {
        self.require_login()?;
        self.repo.list_categories()
    }

    /// Create a category and make it the active one.
    pub fn add_category(&mut self, name: &str, emoji: Option<&str>) -> Result<Category> {
        self.require_login()?;
        let category = self.repo.create_category(name, emoji)?;
        self.active_category = Some(category.id.clone());
        Ok(category)
    }

    /// Returns false (and keeps the current selection) for an unknown id.
    pub fn select_category(&mut self, id: &str) -> Result<bool> {
        self.require_login()?;
        if self.repo.find_category(id)?.is_none() {
            return Ok(false);
        }
        self.active_category = Some(id.to_string());
        Ok(true)
    }

    pub fn select_all(&mut self) {
        self.active_category = None;
    }

    pub fn active_category(&self) -> Option<&str> {
        self.active_category.as_deref()
    }

    // =========================================================================
    // Tasks
    // =========================================================================

    /// Add a task to `category_id`, else the active category, else the
    /// first category.
    pub fn add_task(
        &mut self,
        title: &str,
        description: &str,
        category_id: Option<&str>,
    ) -> Result<Option<Task>> {
        self.require_login()?;
        let target = category_id.or(self.active_category.as_deref());
        self.repo.create_task(title, description, target)
    }

    /// Retitle a task. `None` for `description` keeps the stored one.
    pub fn edit_task(
        &mut self,
        id: &str,
        title: &str,
        description: Option<&str>,
    ) -> Result<Option<Task>> {
        self.require_login()?;
        self.repo.update_task(id, title, description)
    }

    pub fn toggle_task(&mut self, id: &str) -> Result<Option<Task>> {
        self.require_login()?;
        self.repo.toggle_task(id)
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_sort(&mut self, sort: SortMode) {
        self.sort = sort;
    }

    pub fn sort(&self) -> SortMode {
        self.sort
    }

    /// Tasks in the active scope, filtered by the search text and sorted.
    pub fn visible_tasks(&self) -> Result<Vec<Task>> {
        self.require_login()?;
        let query = TaskQuery::new()
            .category(self.active_category.as_deref())
            .search(self.search.clone())
            .sort(self.sort);
        Ok(query.run(&self.repo.list_tasks()?))
    }

    /// Progress over every task, regardless of the active scope.
    pub fn progress(&self) -> Result<Progress> {
        self.require_login()?;
        Ok(progress(&self.repo.list_tasks()?))
    }

    /// Label and progress for the active scope. `None` when the active
    /// category no longer exists.
    pub fn scope_summary(&self) -> Result<Option<ScopeSummary>> {
        self.require_login()?;
        let tasks = self.repo.list_tasks()?;
        let Some(category_id) = self.active_category.as_deref() else {
            return Ok(Some(ScopeSummary {
                label: ALL_TASKS_LABEL.to_string(),
                category_id: None,
                progress: progress(&tasks),
            }));
        };
        Ok(self.repo.find_category(category_id)?.map(|category| ScopeSummary {
            label: category.label(),
            category_id: Some(category.id.clone()),
            progress: category_progress(&tasks, &category.id),
        }))
    }

    // =========================================================================
    // Confirmation
    // =========================================================================

    /// Stage a category delete. Unknown ids stage nothing and return false.
    pub fn request_delete_category(&mut self, id: &str) -> Result<bool> {
        self.require_login()?;
        if self.repo.find_category(id)?.is_none() {
            return Ok(false);
        }
        self.pending = Some(PendingAction::DeleteCategory(id.to_string()));
        Ok(true)
    }

    /// Stage a task delete. Unknown ids stage nothing and return false.
    pub fn request_delete_task(&mut self, id: &str) -> Result<bool> {
        self.require_login()?;
        if self.repo.find_task(id)?.is_none() {
            return Ok(false);
        }
        self.pending = Some(PendingAction::DeleteTask(id.to_string()));
        Ok(true)
    }

    pub fn request_clear_all(&mut self) -> Result<()> {
        self.require_login()?;
        self.pending = Some(PendingAction::ClearAll);
        Ok(())
    }

    pub fn pending(&self) -> Option<&PendingAction> {
        self.pending.as_ref()
    }

    pub fn cancel_pending(&mut self) {
        self.pending = None;
    }

    /// Run the staged action, if any, and clear it.
    pub fn confirm(&mut self) -> Result<Confirmed> {
        let Some(action) = self.pending.take() else {
            return Ok(Confirmed::Nothing);
        };
        self.require_login()?;

        match action {
            PendingAction::DeleteCategory(id) => {
                let Some(removal) = self.repo.delete_category(&id)? else {
                    return Ok(Confirmed::Nothing);
                };
                if self.active_category.as_deref() == Some(id.as_str()) {
                    self.active_category = None;
                }
                Ok(Confirmed::CategoryDeleted(removal))
            }
            PendingAction::DeleteTask(id) => Ok(self
                .repo
                .delete_task(&id)?
                .map(Confirmed::TaskDeleted)
                .unwrap_or(Confirmed::Nothing)),
            PendingAction::ClearAll => {
                self.clear_all_data()?;
                Ok(Confirmed::DataCleared)
            }
        }
    }

    // =========================================================================
    // Theme
    // =========================================================================

    /// The theme is device-wide and readable without signing in.
    pub fn theme(&self) -> Result<Theme> {
        self.repo.theme()
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<()> {
        self.repo.set_theme(theme)
    }

    pub fn toggle_theme(&mut self) -> Result<Theme> {
        self.repo.toggle_theme()
    }
}
