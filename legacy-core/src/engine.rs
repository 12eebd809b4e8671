//! The interview engine.
//!
//! [`InterviewEngine`] holds no session state of its own. Every operation
//! takes a session snapshot and either inspects it or derives a new value
//! from it, so callers decide which snapshot is current. Randomness can be
//! supplied per call (`*_with_rng`) and time comes from an injected
//! [`Clock`], which makes the engine fully reproducible in tests.

use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::config::EngineConfig;
use crate::error::InterviewError;
use crate::photo::Photo;
use crate::question::{Question, QuestionBank, QuestionCategory};
use crate::session::{InterviewSession, SessionId, SessionStatus};
use crate::story::{
    compose_narrative, compose_title, estimate_duration_secs, extract_tags, word_count,
    LegacyStory, StoryId, StoryMetadata,
};

/// Runs interviews over a question bank.
#[derive(Clone)]
pub struct InterviewEngine {
    bank: Arc<QuestionBank>,
    clock: Arc<dyn Clock>,
    config: EngineConfig,
}

impl InterviewEngine {
    /// Create an engine over a question bank, using the system clock.
    pub fn new(bank: QuestionBank) -> Self {
        Self {
            bank: Arc::new(bank),
            clock: Arc::new(SystemClock),
            config: EngineConfig::default(),
        }
    }

    /// Engine over the built-in question bank.
    pub fn with_builtin_questions() -> Self {
        Self::new(QuestionBank::builtin())
    }

    /// Use a different time source.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Use a different configuration.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Start an interview about `photo`.
    pub fn create_session(&self, photo: impl Into<Arc<Photo>>) -> InterviewSession {
        self.create_session_with_rng(photo, &mut rand::thread_rng())
    }

    /// Start an interview, drawing questions and the session id from `rng`.
    pub fn create_session_with_rng<R: Rng>(
        &self,
        photo: impl Into<Arc<Photo>>,
        rng: &mut R,
    ) -> InterviewSession {
        let photo = photo.into();
        let questions = self.select_questions(&photo, rng);
        let id = SessionId::from_rng(rng);

        tracing::info!(
            session = %id,
            photo = %photo.id,
            questions = questions.len(),
            "Interview session created"
        );

        InterviewSession::open(id, photo, questions, self.clock.now())
    }

    /// One random question per opening category, then the first detail
    /// question if the photo is categorized.
    fn select_questions<R: Rng>(&self, photo: &Photo, rng: &mut R) -> Vec<Question> {
        let mut selected = Vec::with_capacity(self.config.opening_categories.len() + 1);

        for &category in &self.config.opening_categories {
            if category == QuestionCategory::Other {
                continue;
            }
            let candidates = self.bank.in_category(category);
            match candidates.choose(rng) {
                Some(question) => selected.push((*question).clone()),
                None => tracing::debug!(%category, "No questions in category, skipping"),
            }
        }

        if photo.category_tag().is_some() && self.config.detail_category != QuestionCategory::Other {
            if let Some(question) = self.bank.first_in(self.config.detail_category) {
                selected.push(question.clone());
            }
        }

        selected
    }

    /// Record the answer to the current question, returning the next snapshot.
    ///
    /// Fails with [`InterviewError::SessionComplete`] if every question has
    /// already been answered.
    pub fn add_response(
        &self,
        session: &InterviewSession,
        transcript: impl Into<String>,
        audio_ref: Option<String>,
    ) -> Result<InterviewSession, InterviewError> {
        let next = session.advance(transcript.into(), audio_ref, self.clock.now())?;

        tracing::debug!(
            session = %next.id(),
            answered = next.current_question_index(),
            total = next.questions().len(),
            "Response recorded"
        );
        if next.status() == SessionStatus::Completed {
            tracing::info!(session = %next.id(), "Interview completed");
        }

        Ok(next)
    }

    /// The question awaiting an answer, if any.
    pub fn next_question<'a>(&self, session: &'a InterviewSession) -> Option<&'a Question> {
        session.current_question()
    }

    /// Percentage of questions answered, in `[0, 100]`.
    ///
    /// A session without questions reports 0.
    pub fn progress(&self, session: &InterviewSession) -> f64 {
        let total = session.questions().len();
        if total == 0 {
            return 0.0;
        }
        session.current_question_index() as f64 / total as f64 * 100.0
    }

    pub fn is_complete(&self, session: &InterviewSession) -> bool {
        session.status() == SessionStatus::Completed
    }

    /// Turn a completed interview into a legacy story.
    pub fn generate_story(&self, session: &InterviewSession) -> Result<LegacyStory, InterviewError> {
        self.generate_story_with_rng(session, &mut rand::thread_rng())
    }

    /// Turn a completed interview into a legacy story, drawing the title
    /// template and story id from `rng`.
    ///
    /// The session itself is not modified.
    pub fn generate_story_with_rng<R: Rng>(
        &self,
        session: &InterviewSession,
        rng: &mut R,
    ) -> Result<LegacyStory, InterviewError> {
        if !self.is_complete(session) {
            return Err(InterviewError::IncompleteSession {
                answered: session.current_question_index(),
                total: session.questions().len(),
            });
        }

        let photo = session.photo();
        let title = compose_title(photo, self.config.max_title_chars, rng);
        let narrative = compose_narrative(photo, session.responses());
        let words = word_count(&narrative);
        let duration_secs = estimate_duration_secs(words, self.config.words_per_minute);
        let tags = extract_tags(photo, session.responses(), &self.config.tag_keywords);
        let now = self.clock.now();

        let story = LegacyStory {
            id: StoryId::from_rng(rng),
            title,
            photo: photo.clone(),
            narrative,
            created_at: now,
            updated_at: now,
            metadata: StoryMetadata {
                category: photo.category.clone(),
                word_count: words,
                duration_secs,
                tags,
                people: (!photo.people.is_empty()).then(|| photo.people.clone()),
            },
            words_per_minute: self.config.words_per_minute,
        };

        tracing::info!(
            session = %session.id(),
            story = %story.id,
            words,
            duration_secs,
            "Story generated"
        );

        Ok(story)
    }
}

impl Default for InterviewEngine {
    fn default() -> Self {
        Self::with_builtin_questions()
    }
}

impl std::fmt::Debug for InterviewEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterviewEngine")
            .field("questions", &self.bank.len())
            .field("config", &self.config)
            .finish()
    }
}
