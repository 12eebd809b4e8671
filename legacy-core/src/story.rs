//! Legacy stories and the rules that assemble them from an interview.
//!
//! Nothing here is generative: titles come from a fixed template table,
//! narratives are concatenated from the answers in a fixed layout, and
//! tags are a keyword scan. Given the same session, clock and RNG seed
//! the output is byte-for-byte identical.

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use uuid::Uuid;

use crate::photo::Photo;
use crate::session::Response;

/// Sentence every narrative closes on.
pub const CLOSING_REFLECTION: &str = "This memory remains a precious part of my story, a moment I cherish and want to share with those I love.";

const PARAGRAPH_BREAK: &str = "\n\n";

/// Unique identifier for a legacy story.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StoryId(Uuid);

impl StoryId {
    /// Create a new unique story ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Draw a story ID from the given RNG.
    pub fn from_rng<R: Rng>(rng: &mut R) -> Self {
        Self(uuid::Builder::from_random_bytes(rng.gen()).into_uuid())
    }
}

impl Default for StoryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for StoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "story-{}", self.0)
    }
}

/// Derived facts about a story, for listing and search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub word_count: usize,
    /// Estimated time to read the narrative aloud.
    pub duration_secs: u32,
    pub tags: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub people: Option<Vec<String>>,
}

/// The durable artifact of a completed interview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyStory {
    pub id: StoryId,
    pub title: String,
    pub photo: Photo,
    pub narrative: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub metadata: StoryMetadata,
    /// Reading pace the duration was estimated at.
    #[serde(default = "default_words_per_minute")]
    pub words_per_minute: u32,
}

fn default_words_per_minute() -> u32 {
    150
}

impl LegacyStory {
    /// Replace the narrative, refreshing the word count and duration.
    pub fn with_narrative(mut self, narrative: impl Into<String>, now: DateTime<Utc>) -> Self {
        self.narrative = narrative.into();
        self.metadata.word_count = word_count(&self.narrative);
        self.metadata.duration_secs =
            estimate_duration_secs(self.metadata.word_count, self.words_per_minute);
        self.updated_at = now;
        self
    }

    /// Replace the title.
    pub fn with_title(mut self, title: impl Into<String>, now: DateTime<Utc>) -> Self {
        self.title = title.into();
        self.updated_at = now;
        self
    }

    /// Narrative split into its paragraphs.
    pub fn paragraphs(&self) -> impl Iterator<Item = &str> {
        self.narrative
            .split(PARAGRAPH_BREAK)
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}

/// Pick a title: a short description verbatim, else a category template.
pub fn compose_title<R: Rng>(photo: &Photo, max_chars: usize, rng: &mut R) -> String {
    if let Some(description) = photo.description() {
        if description.chars().count() < max_chars {
            return description.to_string();
        }
    }

    let templates = photo.photo_category().title_templates();
    templates
        .choose(rng)
        .copied()
        .unwrap_or("A Precious Memory")
        .to_string()
}

/// Stitch the photo context and answers into a first-person narrative.
///
/// Layout: optional year sentence, optional description sentence, a
/// paragraph break, then each non-empty answer in order, with an extra
/// paragraph break ahead of every answer at an even index past the first.
/// Answers lacking terminal punctuation get a period. The closing
/// reflection follows its own paragraph break.
pub fn compose_narrative(photo: &Photo, responses: &[Response]) -> String {
    let mut narrative = String::new();

    if let Some(year) = photo.year() {
        narrative.push_str(&format!("This memory takes us back to {year}. "));
    }

    if let Some(description) = photo.description() {
        narrative.push_str(description);
        narrative.push_str(". ");
    }

    narrative.push_str(PARAGRAPH_BREAK);

    for (index, response) in responses.iter().enumerate() {
        let transcript = response.transcript.as_str();
        if transcript.is_empty() {
            continue;
        }

        if index > 0 && index % 2 == 0 {
            narrative.push_str(PARAGRAPH_BREAK);
        }

        narrative.push_str(transcript);

        if transcript.ends_with(['.', '!', '?']) {
            narrative.push(' ');
        } else {
            narrative.push_str(". ");
        }
    }

    narrative.push_str(PARAGRAPH_BREAK);
    narrative.push_str(CLOSING_REFLECTION);

    narrative.trim().to_string()
}

/// Whitespace-delimited token count.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Seconds needed to read `words` aloud at `words_per_minute`, rounded up.
pub fn estimate_duration_secs(words: usize, words_per_minute: u32) -> u32 {
    let wpm = u64::from(words_per_minute.max(1));
    let secs = (words as u64 * 60).div_ceil(wpm);
    u32::try_from(secs).unwrap_or(u32::MAX)
}

/// Searchable tags: the photo category, the people pictured, and any
/// keyword that appears in an answer.
pub fn extract_tags(photo: &Photo, responses: &[Response], keywords: &[String]) -> BTreeSet<String> {
    let mut tags = BTreeSet::new();

    if let Some(category) = photo.category_tag() {
        tags.insert(category.to_string());
    }

    for person in &photo.people {
        tags.insert(person.to_lowercase());
    }

    for response in responses {
        let text = response.transcript.to_lowercase();
        for keyword in keywords {
            if text.contains(keyword.as_str()) {
                tags.insert(keyword.clone());
            }
        }
    }

    tags
}
