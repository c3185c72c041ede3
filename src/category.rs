//! Categories group tasks under a name and an emoji.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::{new_id, timestamp};

/// Emoji used when a category is created without one.
pub const DEFAULT_EMOJI: &str = "📁";

/// Emoji offered by the category picker.
pub const EMOJI_PALETTE: [&str; 24] = [
    "📁", "🏠", "💼", "🛒", "📚", "🎯", "💡", "🎨", "🏃", "✈️", "🎮", "🎵", "📱", "🔧", "❤️", "⭐",
    "🍕", "🌱", "💰", "🧠", "🎬", "📝", "🔬", "🏖️",
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub emoji: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl Category {
    pub fn new(name: impl Into<String>, emoji: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            emoji: emoji.into(),
            created_at: timestamp(),
        }
    }

    /// `"<emoji> <name>"`, as shown in listings and panel headers.
    pub fn label(&self) -> String {
        format!("{} {}", self.emoji, self.name)
    }
}

/// Name and emoji of a category installed for every new account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategorySeed {
    pub name: String,
    pub emoji: String,
}

impl CategorySeed {
    pub fn new(name: impl Into<String>, emoji: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            emoji: emoji.into(),
        }
    }

    pub fn build(&self) -> Category {
        Category::new(self.name.clone(), self.emoji.clone())
    }
}

/// Personal, Work and Shopping.
pub fn default_seeds() -> Vec<CategorySeed> {
    vec![
        CategorySeed::new("Personal", "🏠"),
        CategorySeed::new("Work", "💼"),
        CategorySeed::new("Shopping", "🛒"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_seeds_are_personal_work_shopping() {
        let names: Vec<_> = default_seeds().into_iter().map(|seed| seed.name).collect();
        assert_eq!(names, vec!["Personal", "Work", "Shopping"]);
    }

    #[test]
    fn palette_starts_with_default_emoji() {
        assert_eq!(EMOJI_PALETTE[0], DEFAULT_EMOJI);
    }

    #[test]
    fn label_joins_emoji_and_name() {
        let category = Category::new("Work", "💼");
        assert_eq!(category.label(), "💼 Work");
    }
}
