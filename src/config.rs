use crate::charset::Category;
use std::collections::BTreeSet;
use std::path::PathBuf;

pub const DEFAULT_LENGTH: usize = 16;
pub const DEFAULT_COUNT: usize = 1;
pub const DEFAULT_HISTORY_FILE: &str = "password_history.json";
pub const MAX_HISTORY: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationConfig {
    pub length: usize,
    pub categories: BTreeSet<Category>,
    pub exclude_chars: BTreeSet<char>,
    pub exclude_similar: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            length: DEFAULT_LENGTH,
            categories: Category::ALL.into_iter().collect(),
            exclude_chars: BTreeSet::new(),
            exclude_similar: false,
        }
    }
}

impl GenerationConfig {
    pub fn with_length(mut self, length: usize) -> Self {
        self.length = length;
        self
    }

    pub fn without(mut self, category: Category) -> Self {
        self.categories.remove(&category);
        self
    }

    pub fn exclude(mut self, chars: &str) -> Self {
        self.exclude_chars.extend(chars.chars());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryConfig {
    pub path: PathBuf,
    pub max_entries: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_HISTORY_FILE),
            max_entries: MAX_HISTORY,
        }
    }
}
