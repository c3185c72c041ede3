//! Typed CRUD over the record store.
//!
//! Every mutation follows the same shape: take the store lock, load the whole
//! list, change it in memory, write the whole list back. Lookups that miss
//! (stale ids, double deletes) return `Ok(None)` and change nothing.

use serde::Serialize;

use crate::category::{Category, CategorySeed, DEFAULT_EMOJI};
use crate::error::{Error, Result};
use crate::storage::{KeyValueStore, RecordKey, Storage, Theme};
use crate::task::Task;
use crate::user::User;

/// Result of deleting a category together with its tasks.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CategoryRemoval {
    pub category: Category,
    pub removed_tasks: usize,
}

#[derive(Debug, Clone)]
pub struct Repository<S> {
    storage: Storage<S>,
    default_emoji: String,
}

impl<S: KeyValueStore> Repository<S> {
    pub fn new(store: S) -> Self {
        Self {
            storage: Storage::new(store),
            default_emoji: DEFAULT_EMOJI.to_string(),
        }
    }

    /// Emoji used by [`create_category`](Self::create_category) when none is given.
    pub fn with_default_emoji(mut self, emoji: impl Into<String>) -> Self {
        self.default_emoji = emoji.into();
        self
    }

    pub fn storage(&self) -> &Storage<S> {
        &self.storage
    }

    fn transaction<T>(&mut self, f: impl FnOnce(&mut Storage<S>) -> Result<T>) -> Result<T> {
        let _guard = self.storage.lock()?;
        f(&mut self.storage)
    }

    // =========================================================================
    // Categories
    // =========================================================================

    pub fn list_categories(&self) -> Result<Vec<Category>> {
        self.storage.load_categories()
    }

    pub fn find_category(&self, id: &str) -> Result<Option<Category>> {
        Ok(self
            .storage
            .load_categories()?
            .into_iter()
            .find(|category| category.id == id))
    }

    pub fn create_category(&mut self, name: &str, emoji: Option<&str>) -> Result<Category> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Validation("category name cannot be empty".to_string()));
        }
        let emoji = match emoji.map(str::trim) {
            Some(emoji) if !emoji.is_empty() => emoji.to_string(),
            _ => self.default_emoji.clone(),
        };

        let category = Category::new(name, emoji);
        self.transaction(|storage| {
            let mut categories = storage.load_categories()?;
            categories.push(category.clone());
            storage.save_categories(&categories)
        })?;
        tracing::debug!(id = %category.id, name = %category.name, "category created");
        Ok(category)
    }

    /// Delete a category and every task filed under it.
    ///
    /// Both lists are rewritten; there is no rollback if the second write
    /// fails.
    pub fn delete_category(&mut self, id: &str) -> Result<Option<CategoryRemoval>> {
        let removal = self.transaction(|storage| {
            let mut categories = storage.load_categories()?;
            let Some(index) = categories.iter().position(|category| category.id == id) else {
                return Ok(None);
            };
            let category = categories.remove(index);
            storage.save_categories(&categories)?;

            let mut tasks = storage.load_tasks()?;
            let removed_tasks = remove_tasks_in_category(&mut tasks, id);
            storage.save_tasks(&tasks)?;

            Ok(Some(CategoryRemoval {
                category,
                removed_tasks,
            }))
        })?;

        match &removal {
            Some(removal) => tracing::debug!(
                id,
                removed_tasks = removal.removed_tasks,
                "category deleted"
            ),
            None => tracing::debug!(id, "category delete: no such category"),
        }
        Ok(removal)
    }

    // =========================================================================
    // Tasks
    // =========================================================================

    pub fn list_tasks(&self) -> Result<Vec<Task>> {
        self.storage.load_tasks()
    }

    pub fn find_task(&self, id: &str) -> Result<Option<Task>> {
        Ok(self.storage.load_tasks()?.into_iter().find(|task| task.id == id))
    }

    /// Append a pending task.
    ///
    /// Without `category_id` the task goes to the first category. An explicit
    /// id that matches no category is a no-op.
    pub fn create_task(
        &mut self,
        title: &str,
        description: &str,
        category_id: Option<&str>,
    ) -> Result<Option<Task>> {
        let title = title.trim();
        if title.is_empty() {
            return Err(Error::Validation("task title cannot be empty".to_string()));
        }
        let description = description.trim();

        let created = self.transaction(|storage| {
            let categories = storage.load_categories()?;
            let category_id = match category_id {
                Some(id) => match categories.iter().find(|category| category.id == id) {
                    Some(category) => category.id.clone(),
                    None => return Ok(None),
                },
                None => match categories.first() {
                    Some(category) => category.id.clone(),
                    None => return Err(Error::NoCategories),
                },
            };

            let task = Task::new(title, description, category_id);
            let mut tasks = storage.load_tasks()?;
            tasks.push(task.clone());
            storage.save_tasks(&tasks)?;
            Ok(Some(task))
        })?;

        match &created {
            Some(task) => tracing::debug!(id = %task.id, category = %task.category_id, "task created"),
            None => tracing::debug!(?category_id, "task create: no such category"),
        }
        Ok(created)
    }

    /// Replace a task's title, and its description unless that is `None`.
    /// The title is checked before the task is looked up.
    pub fn update_task(
        &mut self,
        id: &str,
        title: &str,
        description: Option<&str>,
    ) -> Result<Option<Task>> {
        let title = title.trim();
        if title.is_empty() {
            return Err(Error::Validation("task title cannot be empty".to_string()));
        }
        let description = description.map(str::trim);

        self.modify_task(id, |task| {
            task.title = title.to_string();
            if let Some(description) = description {
                task.description = description.to_string();
            }
        })
    }

    /// Flip a task between pending and done.
    pub fn toggle_task(&mut self, id: &str) -> Result<Option<Task>> {
        self.modify_task(id, |task| task.status = task.status.toggled())
    }

    pub fn delete_task(&mut self, id: &str) -> Result<Option<Task>> {
        let removed = self.transaction(|storage| {
            let mut tasks = storage.load_tasks()?;
            let Some(index) = tasks.iter().position(|task| task.id == id) else {
                return Ok(None);
            };
            let task = tasks.remove(index);
            storage.save_tasks(&tasks)?;
            Ok(Some(task))
        })?;
        tracing::debug!(id, found = removed.is_some(), "task delete");
        Ok(removed)
    }

    fn modify_task(&mut self, id: &str, mutator: impl FnOnce(&mut Task)) -> Result<Option<Task>> {
        let updated = self.transaction(|storage| {
            let mut tasks = storage.load_tasks()?;
            let Some(task) = tasks.iter_mut().find(|task| task.id == id) else {
                return Ok(None);
            };
            mutator(task);
            let task = task.clone();
            storage.save_tasks(&tasks)?;
            Ok(Some(task))
        })?;
        tracing::debug!(id, found = updated.is_some(), "task updated");
        Ok(updated)
    }

    // =========================================================================
    // Account
    // =========================================================================

    pub fn load_user(&self) -> Result<Option<User>> {
        self.storage.load_user()
    }

    /// Replace the account: wipe user, categories and tasks, then store the
    /// new user, the seeded categories and an empty task list.
    pub fn install_account(&mut self, user: &User, seeds: &[CategorySeed]) -> Result<Vec<Category>> {
        let categories: Vec<Category> = seeds.iter().map(CategorySeed::build).collect();
        self.transaction(|storage| {
            storage.remove(RecordKey::User)?;
            storage.remove(RecordKey::Categories)?;
            storage.remove(RecordKey::Tasks)?;

            storage.save_user(user)?;
            storage.save_categories(&categories)?;
            storage.save_tasks(&[])
        })?;
        tracing::debug!(username = %user.username, categories = categories.len(), "account installed");
        Ok(categories)
    }

    /// Remove every record, theme included.
    pub fn clear_all(&mut self) -> Result<()> {
        self.transaction(|storage| storage.clear())?;
        tracing::debug!("all records cleared");
        Ok(())
    }

    // =========================================================================
    // Theme
    // =========================================================================

    pub fn theme(&self) -> Result<Theme> {
        self.storage.load_theme()
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<()> {
        self.transaction(|storage| storage.save_theme(theme))
    }

    pub fn toggle_theme(&mut self) -> Result<Theme> {
        self.transaction(|storage| {
            let next = storage.load_theme()?.toggled();
            storage.save_theme(next)?;
            Ok(next)
        })
    }
}

/// Drop every task filed under `category_id`; returns how many went.
pub fn remove_tasks_in_category(tasks: &mut Vec<Task>, category_id: &str) -> usize {
    let before = tasks.len();
    tasks.retain(|task| task.category_id != category_id);
    before - tasks.len()
}
