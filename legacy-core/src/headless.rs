//! Headless interview driver for programmatic use.
//!
//! Wraps the engine, the current session snapshot and a story library so
//! that scripts, tests and the command-line runner can conduct a whole
//! interview with a handful of calls.
//!
//! # Example
//!
//! ```ignore
//! use legacy_core::headless::HeadlessInterview;
//! use legacy_core::persist::{JsonDirStore, StoryLibrary};
//! use legacy_core::{InterviewEngine, Photo};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let library = StoryLibrary::new(JsonDirStore::new("legacy-data"));
//!     let mut interview = HeadlessInterview::new(InterviewEngine::default(), library);
//!
//!     interview.start(Photo::new("p1", "beach.jpg").with_description("Beach day"));
//!     while let Some(question) = interview.current_question() {
//!         println!("{}", question.prompt);
//!         interview.answer("We built a sandcastle", None)?;
//!     }
//!
//!     let story = interview.finish().await?;
//!     println!("{}", story.narrative);
//!     Ok(())
//! }
//! ```

use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;

use crate::engine::InterviewEngine;
use crate::error::InterviewError;
use crate::narration::{NarrationError, NarrationRequest, Narrator, SilentNarrator};
use crate::persist::{KeyValueStore, PersistError, StoryLibrary};
use crate::photo::Photo;
use crate::question::Question;
use crate::session::InterviewSession;
use crate::story::LegacyStory;

/// Errors from the headless driver.
#[derive(Debug, Error)]
pub enum HeadlessError {
    #[error("Interview error: {0}")]
    Interview(#[from] InterviewError),

    #[error("Storage error: {0}")]
    Persist(#[from] PersistError),

    #[error("Narration error: {0}")]
    Narration(#[from] NarrationError),

    #[error("No interview in progress - start one with a photo first")]
    NoActiveSession,
}

/// Outcome of answering one question.
#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    /// The question to ask next, if any remain.
    pub next_question: Option<Question>,
    /// Percentage of questions answered.
    pub progress: f64,
    pub complete: bool,
}

/// A single-user interview driver.
pub struct HeadlessInterview<S: KeyValueStore> {
    engine: InterviewEngine,
    library: StoryLibrary<S>,
    narrator: Box<dyn Narrator>,
    rng: StdRng,
    session: Option<InterviewSession>,
}

impl<S: KeyValueStore> HeadlessInterview<S> {
    pub fn new(engine: InterviewEngine, library: StoryLibrary<S>) -> Self {
        Self {
            engine,
            library,
            narrator: Box::new(SilentNarrator),
            rng: StdRng::from_entropy(),
            session: None,
        }
    }

    /// Make question and title selection reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Hand finished stories to a narrator.
    pub fn with_narrator(mut self, narrator: impl Narrator + 'static) -> Self {
        self.narrator = Box::new(narrator);
        self
    }

    pub fn engine(&self) -> &InterviewEngine {
        &self.engine
    }

    pub fn library(&self) -> &StoryLibrary<S> {
        &self.library
    }

    /// The current session snapshot.
    pub fn session(&self) -> Option<&InterviewSession> {
        self.session.as_ref()
    }

    /// Begin a new interview, discarding any unfinished one.
    pub fn start(&mut self, photo: Photo) -> Option<&Question> {
        if let Some(previous) = self.session.take() {
            if !self.engine.is_complete(&previous) {
                tracing::warn!(session = %previous.id(), "Discarding unfinished interview");
            }
        }

        let session = self.engine.create_session_with_rng(photo, &mut self.rng);
        self.session = Some(session);
        self.current_question()
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.session
            .as_ref()
            .and_then(|s| self.engine.next_question(s))
    }

    pub fn progress(&self) -> f64 {
        self.session
            .as_ref()
            .map(|s| self.engine.progress(s))
            .unwrap_or(0.0)
    }

    pub fn is_complete(&self) -> bool {
        self.session
            .as_ref()
            .map(|s| self.engine.is_complete(s))
            .unwrap_or(false)
    }

    /// Answer the current question.
    pub fn answer(
        &mut self,
        transcript: &str,
        audio_ref: Option<String>,
    ) -> Result<Turn, HeadlessError> {
        let session = self.session.as_ref().ok_or(HeadlessError::NoActiveSession)?;
        let next = self.engine.add_response(session, transcript, audio_ref)?;

        let turn = Turn {
            next_question: self.engine.next_question(&next).cloned(),
            progress: self.engine.progress(&next),
            complete: self.engine.is_complete(&next),
        };
        self.session = Some(next);
        Ok(turn)
    }

    /// Generate the story, save it and hand it to the narrator.
    ///
    /// The session is only discarded once the story is saved, so a failed
    /// save can be retried.
    pub async fn finish(&mut self) -> Result<LegacyStory, HeadlessError> {
        let session = self.session.as_ref().ok_or(HeadlessError::NoActiveSession)?;
        let story = self.engine.generate_story_with_rng(session, &mut self.rng)?;

        self.library.save_story(&story).await?;
        self.session = None;

        if let Err(e) = self
            .narrator
            .narrate(&NarrationRequest::from_story(&story))
            .await
        {
            tracing::warn!(story = %story.id, error = %e, "Narration failed");
        }

        Ok(story)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::persist::MemoryStore;

    fn interview() -> HeadlessInterview<MemoryStore> {
        let engine = InterviewEngine::default().with_clock(FixedClock::at_secs(0));
        HeadlessInterview::new(engine, StoryLibrary::new(MemoryStore::new())).with_seed(11)
    }

    #[test]
    fn test_answer_without_session() {
        let mut interview = interview();
        assert!(matches!(
            interview.answer("hello", None),
            Err(HeadlessError::NoActiveSession)
        ));
        assert_eq!(interview.progress(), 0.0);
    }

    #[tokio::test]
    async fn test_full_interview() {
        let mut interview = interview();
        let first = interview
            .start(Photo::new("p", "p.jpg").with_category("wedding"))
            .cloned();
        assert!(first.is_some());

        let mut turns = 0;
        while interview.current_question().is_some() {
            let turn = interview.answer("It was a happy day", None).unwrap();
            turns += 1;
            assert_eq!(turn.complete, turn.next_question.is_none());
        }
        assert_eq!(turns, 6);
        assert!(interview.is_complete());

        let story = interview.finish().await.unwrap();
        assert!(interview.session().is_none());
        assert!(story.metadata.tags.contains("happy"));
        assert!(story.metadata.tags.contains("wedding"));

        let saved = interview.library().list_stories().await.unwrap();
        assert_eq!(saved, vec![story]);
    }

    #[tokio::test]
    async fn test_finish_early_keeps_session() {
        let mut interview = interview();
        interview.start(Photo::new("p", "p.jpg"));
        interview.answer("Only one answer", None).unwrap();

        let err = interview.finish().await.unwrap_err();
        assert!(matches!(
            err,
            HeadlessError::Interview(InterviewError::IncompleteSession { answered: 1, .. })
        ));
        assert!(interview.session().is_some());
        assert!(interview.library().list_stories().await.unwrap().is_empty());
    }
}
