//! Interview questions and the question bank they are drawn from.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tokio::fs;

use crate::persist::PersistError;

/// Thematic grouping of interview questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionCategory {
    /// Who is in the photo and who mattered.
    People,
    /// What was happening.
    Events,
    /// How it felt.
    Feelings,
    /// Why the moment mattered.
    Significance,
    /// What should be passed on.
    Legacy,
    /// Concrete follow-up details.
    Details,
    /// Where it happened.
    Places,
    /// Sounds, smells and textures.
    Senses,
    /// Any category this crate does not know. Never selected by the engine.
    #[serde(other)]
    Other,
}

impl QuestionCategory {
    /// Get the lowercase name used in question banks.
    pub fn name(&self) -> &'static str {
        match self {
            QuestionCategory::People => "people",
            QuestionCategory::Events => "events",
            QuestionCategory::Feelings => "feelings",
            QuestionCategory::Significance => "significance",
            QuestionCategory::Legacy => "legacy",
            QuestionCategory::Details => "details",
            QuestionCategory::Places => "places",
            QuestionCategory::Senses => "senses",
            QuestionCategory::Other => "other",
        }
    }
}

impl fmt::Display for QuestionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for QuestionCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "people" => Ok(QuestionCategory::People),
            "events" => Ok(QuestionCategory::Events),
            "feelings" => Ok(QuestionCategory::Feelings),
            "significance" => Ok(QuestionCategory::Significance),
            "legacy" => Ok(QuestionCategory::Legacy),
            "details" => Ok(QuestionCategory::Details),
            "places" => Ok(QuestionCategory::Places),
            "senses" => Ok(QuestionCategory::Senses),
            "other" => Ok(QuestionCategory::Other),
            other => Err(format!("unknown question category: {other}")),
        }
    }
}

/// A single interview prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub category: QuestionCategory,
    pub prompt: String,
}

impl Question {
    pub fn new(
        id: impl Into<String>,
        category: QuestionCategory,
        prompt: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            category,
            prompt: prompt.into(),
        }
    }
}

/// Read-only, ordered catalog of candidate questions.
///
/// Lookups against a category with no questions simply come back empty;
/// the engine treats that as "skip this category".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    /// The bank bundled with the crate.
    pub fn builtin() -> Self {
        Self::new(DEFAULT_QUESTIONS.clone())
    }

    /// Parse a bank from a JSON array of `{id, category, prompt}` objects.
    ///
    /// Unknown categories load as [`QuestionCategory::Other`].
    pub fn from_json(json: &str) -> Result<Self, PersistError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a bank from a JSON file.
    pub async fn load_json(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        let content = fs::read_to_string(path).await?;
        Self::from_json(&content)
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    /// All questions in a category, in bank order.
    pub fn in_category(&self, category: QuestionCategory) -> Vec<&Question> {
        self.questions
            .iter()
            .filter(|q| q.category == category)
            .collect()
    }

    /// The first question in a category, in bank order.
    pub fn first_in(&self, category: QuestionCategory) -> Option<&Question> {
        self.questions.iter().find(|q| q.category == category)
    }
}

lazy_static::lazy_static! {
    /// Questions shipped with the crate.
    pub static ref DEFAULT_QUESTIONS: Vec<Question> = {
        use QuestionCategory::*;
        vec![
            Question::new("people-1", People, "Who is in this photo, and what were they like?"),
            Question::new("people-2", People, "Who took this picture, or who do you wish had been there?"),
            Question::new("people-3", People, "Which person here would you most like to talk to again?"),
            Question::new("events-1", Events, "What was happening on the day this photo was taken?"),
            Question::new("events-2", Events, "What happened just before or just after this moment?"),
            Question::new("events-3", Events, "How did everyone come to be together here?"),
            Question::new("feelings-1", Feelings, "How did you feel at this moment?"),
            Question::new("feelings-2", Feelings, "What makes you smile when you look at this photo now?"),
            Question::new("feelings-3", Feelings, "Was there anything bittersweet about this time?"),
            Question::new("significance-1", Significance, "Why is this moment important to you?"),
            Question::new("significance-2", Significance, "How did this day change things for you or your family?"),
            Question::new("legacy-1", Legacy, "What would you like your grandchildren to know about this moment?"),
            Question::new("legacy-2", Legacy, "What lesson from this time would you pass on?"),
            Question::new("details-1", Details, "Can you describe the place where this was taken?"),
            Question::new("details-2", Details, "What were people wearing, eating or listening to?"),
            Question::new("places-1", Places, "What did the neighborhood look like back then?"),
            Question::new("senses-1", Senses, "What sounds or smells do you remember from that day?"),
        ]
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trip_names() {
        for category in [
            QuestionCategory::People,
            QuestionCategory::Events,
            QuestionCategory::Feelings,
            QuestionCategory::Significance,
            QuestionCategory::Legacy,
            QuestionCategory::Details,
        ] {
            assert_eq!(category.name().parse::<QuestionCategory>(), Ok(category));
        }
        assert!("weather".parse::<QuestionCategory>().is_err());
    }

    #[test]
    fn test_builtin_bank_covers_opening_categories() {
        let bank = QuestionBank::builtin();
        for category in [
            QuestionCategory::People,
            QuestionCategory::Events,
            QuestionCategory::Feelings,
            QuestionCategory::Significance,
            QuestionCategory::Legacy,
            QuestionCategory::Details,
        ] {
            assert!(
                !bank.in_category(category).is_empty(),
                "builtin bank has no {category} questions"
            );
        }
    }

    #[test]
    fn test_first_in_follows_bank_order() {
        let bank = QuestionBank::builtin();
        assert_eq!(bank.first_in(QuestionCategory::Details).unwrap().id, "details-1");
        assert!(QuestionBank::default().first_in(QuestionCategory::Details).is_none());
    }

    #[test]
    fn test_from_json() {
        let bank = QuestionBank::from_json(
            r#"[{"id": "q1", "category": "people", "prompt": "Who is this?"},
                {"id": "q2", "category": "details", "prompt": "Where?"}]"#,
        )
        .unwrap();

        assert_eq!(bank.len(), 2);
        assert_eq!(bank.get("q2").unwrap().category, QuestionCategory::Details);
        assert!(bank.get("missing").is_none());
    }

    #[test]
    fn test_from_json_keeps_unknown_categories() {
        let bank = QuestionBank::from_json(
            r#"[{"id": "p1", "category": "people", "prompt": "Who is this?"},
                {"id": "w1", "category": "weather", "prompt": "Was it sunny?"}]"#,
        )
        .unwrap();

        assert_eq!(bank.len(), 2);
        assert_eq!(bank.get("w1").unwrap().category, QuestionCategory::Other);
        assert_eq!(bank.in_category(QuestionCategory::People).len(), 1);
    }
}
