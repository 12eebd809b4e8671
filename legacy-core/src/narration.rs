//! Handoff of finished stories to a narration service.
//!
//! The engine only produces text. Anything that turns it into speech
//! implements [`Narrator`].

use async_trait::async_trait;
use thiserror::Error;

use crate::story::{LegacyStory, StoryId};

/// Errors from narration backends.
#[derive(Debug, Error)]
pub enum NarrationError {
    #[error("Narration unavailable: {0}")]
    Unavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Text to be read aloud.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NarrationRequest {
    pub story_id: StoryId,
    pub title: String,
    pub paragraphs: Vec<String>,
}

impl NarrationRequest {
    pub fn from_story(story: &LegacyStory) -> Self {
        Self {
            story_id: story.id,
            title: story.title.clone(),
            paragraphs: story.paragraphs().map(str::to_string).collect(),
        }
    }

    /// Title and paragraphs as a single script, separated by blank lines.
    pub fn script(&self) -> String {
        std::iter::once(self.title.as_str())
            .chain(self.paragraphs.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Converts story text to speech out of band.
#[async_trait]
pub trait Narrator: Send + Sync {
    async fn narrate(&self, request: &NarrationRequest) -> Result<(), NarrationError>;
}

/// Narrator that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentNarrator;

#[async_trait]
impl Narrator for SilentNarrator {
    async fn narrate(&self, _request: &NarrationRequest) -> Result<(), NarrationError> {
        Ok(())
    }
}
