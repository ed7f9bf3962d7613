use crate::config::GenerationConfig;
use crate::error::ConfigError;
use std::fmt;

pub const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
pub const DIGITS: &str = "0123456789";
pub const PUNCTUATION: &str = r##"!"#$%&'()*+,-./:;<=>?@[\]^_`{|}~"##;

/// Glyphs that are easy to misread for one another.
pub const SIMILAR: &str = "Il1O0o";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Upper,
    Lower,
    Digit,
    Symbol,
}

impl Category {
    /// Sampling and repair order.
    pub const ALL: [Category; 4] = [
        Category::Upper,
        Category::Lower,
        Category::Digit,
        Category::Symbol,
    ];

    pub fn alphabet(self) -> &'static str {
        match self {
            Category::Upper => UPPERCASE,
            Category::Lower => LOWERCASE,
            Category::Digit => DIGITS,
            Category::Symbol => PUNCTUATION,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Upper => "uppercase",
            Category::Lower => "lowercase",
            Category::Digit => "digit",
            Category::Symbol => "symbol",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Filtered alphabets of the enabled categories and their concatenation.
#[derive(Debug, Clone)]
pub struct CharacterPool {
    alphabets: Vec<(Category, Vec<char>)>,
    pool: Vec<char>,
}

impl CharacterPool {
    pub fn build(config: &GenerationConfig) -> Result<Self, ConfigError> {
        if config.categories.is_empty() {
            return Err(ConfigError::NoCategories);
        }

        let mut alphabets = Vec::with_capacity(config.categories.len());
        let mut pool = Vec::new();

        for category in Category::ALL {
            let filtered: Vec<char> = category
                .alphabet()
                .chars()
                .filter(|c| !(config.exclude_similar && SIMILAR.contains(*c)))
                .filter(|c| !config.exclude_chars.contains(c))
                .collect();

            if config.categories.contains(&category) {
                pool.extend_from_slice(&filtered);
                alphabets.push((category, filtered));
            }
        }

        if pool.is_empty() {
            return Err(ConfigError::EmptyPool);
        }

        if let Some((category, _)) = alphabets.iter().find(|(_, chars)| chars.is_empty()) {
            return Err(ConfigError::EmptyCategory(*category));
        }

        log::debug!(
            "Character pool built: {} chars across {} categories",
            pool.len(),
            alphabets.len()
        );

        Ok(Self { alphabets, pool })
    }

    pub fn sampling_pool(&self) -> &[char] {
        &self.pool
    }

    pub fn alphabet(&self, category: Category) -> Option<&[char]> {
        self.alphabets
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, chars)| chars.as_slice())
    }

    /// Enabled categories in repair order, with their filtered alphabets.
    pub fn categories(&self) -> impl Iterator<Item = (Category, &[char])> {
        self.alphabets.iter().map(|(c, chars)| (*c, chars.as_slice()))
    }
}
