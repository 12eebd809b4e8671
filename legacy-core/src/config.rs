//! Engine configuration.

use crate::question::QuestionCategory;

/// Keywords promoted to story tags when a transcript mentions them.
pub const DEFAULT_TAG_KEYWORDS: [&str; 9] = [
    "family",
    "love",
    "happy",
    "celebration",
    "friends",
    "home",
    "special",
    "first",
    "memory",
];

/// Tunables for question selection and story synthesis.
///
/// The defaults are the behavior stories are expected to have; tests and
/// alternate front ends may narrow them.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Categories drawn from (one random question each) when a session opens.
    pub opening_categories: Vec<QuestionCategory>,

    /// Category of the deterministic follow-up asked for categorized photos.
    pub detail_category: QuestionCategory,

    /// Descriptions shorter than this many characters become the title.
    pub max_title_chars: usize,

    /// Reading pace used for the duration estimate.
    pub words_per_minute: u32,

    /// Keywords promoted to tags.
    pub tag_keywords: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            opening_categories: vec![
                QuestionCategory::People,
                QuestionCategory::Events,
                QuestionCategory::Feelings,
                QuestionCategory::Significance,
                QuestionCategory::Legacy,
            ],
            detail_category: QuestionCategory::Details,
            max_title_chars: 50,
            words_per_minute: 150,
            tag_keywords: DEFAULT_TAG_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the opening categories.
    pub fn with_opening_categories(mut self, categories: Vec<QuestionCategory>) -> Self {
        self.opening_categories = categories;
        self
    }

    /// Set the follow-up category.
    pub fn with_detail_category(mut self, category: QuestionCategory) -> Self {
        self.detail_category = category;
        self
    }

    /// Set the description length limit for titles.
    pub fn with_max_title_chars(mut self, chars: usize) -> Self {
        self.max_title_chars = chars;
        self
    }

    /// Set the reading pace. Zero is clamped to one.
    pub fn with_words_per_minute(mut self, wpm: u32) -> Self {
        self.words_per_minute = wpm.max(1);
        self
    }

    /// Replace the tag keywords.
    pub fn with_tag_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tag_keywords = keywords
            .into_iter()
            .map(|k| k.into().to_lowercase())
            .collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.opening_categories.len(), 5);
        assert_eq!(config.detail_category, QuestionCategory::Details);
        assert_eq!(config.max_title_chars, 50);
        assert_eq!(config.words_per_minute, 150);
        assert!(config.tag_keywords.iter().any(|k| k == "memory"));
    }

    #[test]
    fn test_builder() {
        let config = EngineConfig::new()
            .with_opening_categories(vec![QuestionCategory::People])
            .with_words_per_minute(0)
            .with_tag_keywords(["Garden", "dog"]);

        assert_eq!(config.opening_categories, vec![QuestionCategory::People]);
        assert_eq!(config.words_per_minute, 1);
        assert_eq!(config.tag_keywords, vec!["garden", "dog"]);
    }
}
