//! Testing utilities for interviews.
//!
//! This module provides tools for deterministic tests:
//! - `TestHarness` for scripted interviews with a seeded RNG and fixed time
//! - `StepClock` for clocks that tick forward on every reading
//! - Assertion helpers for verifying session state

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::clock::{Clock, FixedClock};
use crate::config::EngineConfig;
use crate::engine::InterviewEngine;
use crate::error::InterviewError;
use crate::photo::Photo;
use crate::question::QuestionBank;
use crate::session::{InterviewSession, SessionStatus};
use crate::story::LegacyStory;

/// Instant all harness clocks start at (2024-01-01T00:00:00Z).
pub const TEST_EPOCH_SECS: i64 = 1_704_067_200;

/// A clock that advances by a fixed step every time it is read.
#[derive(Debug)]
pub struct StepClock {
    next_secs: AtomicI64,
    step_secs: i64,
}

impl StepClock {
    pub fn new(start_secs: i64, step_secs: i64) -> Self {
        Self {
            next_secs: AtomicI64::new(start_secs),
            step_secs,
        }
    }
}

impl Clock for StepClock {
    fn now(&self) -> DateTime<Utc> {
        let secs = self.next_secs.fetch_add(self.step_secs, Ordering::SeqCst);
        DateTime::from_timestamp(secs, 0).unwrap_or_default()
    }
}

/// Test harness for running interview scenarios.
pub struct TestHarness {
    /// The engine under test.
    pub engine: InterviewEngine,
    /// Seeded RNG shared by question and title selection.
    pub rng: StdRng,
    /// Answers handed out by [`TestHarness::answer_next`], in order.
    script: Vec<String>,
    script_index: usize,
}

impl TestHarness {
    /// Builtin questions, a fixed clock at [`TEST_EPOCH_SECS`] and seed 0.
    pub fn new() -> Self {
        Self::with_bank(QuestionBank::builtin())
    }

    pub fn with_bank(bank: QuestionBank) -> Self {
        Self {
            engine: InterviewEngine::new(bank).with_clock(FixedClock::at_secs(TEST_EPOCH_SECS)),
            rng: StdRng::seed_from_u64(0),
            script: Vec::new(),
            script_index: 0,
        }
    }

    /// Reseed the RNG.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Replace the engine's clock.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.engine = self.engine.with_clock(clock);
        self
    }

    /// Replace the engine's configuration.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.engine = self.engine.with_config(config);
        self
    }

    /// Queue an answer.
    pub fn expect_answer(&mut self, text: impl Into<String>) -> &mut Self {
        self.script.push(text.into());
        self
    }

    /// Start an interview.
    pub fn start(&mut self, photo: Photo) -> InterviewSession {
        self.engine.create_session_with_rng(photo, &mut self.rng)
    }

    /// Answer the current question with the next scripted answer.
    pub fn answer_next(
        &mut self,
        session: &InterviewSession,
    ) -> Result<InterviewSession, InterviewError> {
        let text = match self.script.get(self.script_index) {
            Some(text) => {
                self.script_index += 1;
                text.clone()
            }
            None => "I don't remember much more than that.".to_string(),
        };
        self.engine.add_response(session, text, None)
    }

    /// Answer every remaining question from the script.
    pub fn answer_all(
        &mut self,
        mut session: InterviewSession,
    ) -> Result<InterviewSession, InterviewError> {
        while self.engine.next_question(&session).is_some() {
            session = self.answer_next(&session)?;
        }
        Ok(session)
    }

    /// Run a whole interview with the given answers and generate its story.
    pub fn run_interview(
        &mut self,
        photo: Photo,
        answers: &[&str],
    ) -> Result<(InterviewSession, LegacyStory), InterviewError> {
        for answer in answers {
            self.expect_answer(*answer);
        }
        let session = self.start(photo);
        let session = self.answer_all(session)?;
        let story = self.engine.generate_story_with_rng(&session, &mut self.rng)?;
        Ok((session, story))
    }

    /// Generate a story from a session.
    pub fn story(&mut self, session: &InterviewSession) -> Result<LegacyStory, InterviewError> {
        self.engine.generate_story_with_rng(session, &mut self.rng)
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// A photo with every optional field filled in.
pub fn sample_photo() -> Photo {
    Photo::new("test-photo", "test/photo.jpg")
        .with_description("A sunny afternoon")
        .with_category("family")
        .with_date("1975-06-01")
        .with_people(["Grandma June", "Uncle Ray"])
}

/// The harness epoch shifted by `secs` seconds.
pub fn epoch_plus(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(TEST_EPOCH_SECS, 0).unwrap_or_default() + Duration::seconds(secs)
}

// ============================================================================
// Assertion Helpers
// ============================================================================

/// Assert that the session invariants hold.
#[track_caller]
pub fn assert_consistent(session: &InterviewSession) {
    let cursor = session.current_question_index();
    let total = session.questions().len();
    assert!(cursor <= total, "cursor {cursor} past {total} questions");
    assert_eq!(
        session.responses().len(),
        cursor,
        "responses out of step with cursor"
    );
    assert_eq!(
        session.status() == SessionStatus::Completed,
        cursor == total,
        "status {:?} disagrees with cursor {cursor}/{total}",
        session.status()
    );
    assert_eq!(
        session.completed_at().is_some(),
        session.status() == SessionStatus::Completed,
        "completion time set without completion (or vice versa)"
    );
}

/// Assert the session is complete.
#[track_caller]
pub fn assert_completed(session: &InterviewSession) {
    assert_eq!(
        session.status(),
        SessionStatus::Completed,
        "Expected interview to be complete"
    );
}

/// Assert the session is still in progress.
#[track_caller]
pub fn assert_in_progress(session: &InterviewSession) {
    assert_eq!(
        session.status(),
        SessionStatus::InProgress,
        "Expected interview to be in progress"
    );
}

/// Assert progress is the expected percentage.
#[track_caller]
pub fn assert_progress(engine: &InterviewEngine, session: &InterviewSession, expected: f64) {
    let actual = engine.progress(session);
    assert!(
        (actual - expected).abs() < 1e-9,
        "Expected progress {expected}%, got {actual}%"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_answers_in_order() {
        let mut harness = TestHarness::new();
        harness.expect_answer("First").expect_answer("Second");

        let session = harness.start(Photo::new("p", "p.jpg"));
        let session = harness.answer_next(&session).unwrap();
        let session = harness.answer_next(&session).unwrap();
        let session = harness.answer_next(&session).unwrap();

        let transcripts: Vec<_> = session
            .responses()
            .iter()
            .map(|r| r.transcript.as_str())
            .collect();
        assert_eq!(
            transcripts,
            vec!["First", "Second", "I don't remember much more than that."]
        );
        assert_consistent(&session);
        assert_in_progress(&session);
    }

    #[test]
    fn test_step_clock() {
        let clock = StepClock::new(TEST_EPOCH_SECS, 5);
        assert_eq!(clock.now(), epoch_plus(0));
        assert_eq!(clock.now(), epoch_plus(5));
    }

    #[test]
    fn test_run_interview() {
        let mut harness = TestHarness::new().with_seed(3);
        let (session, story) = harness
            .run_interview(sample_photo(), &["We had cake"])
            .unwrap();

        assert_completed(&session);
        assert_consistent(&session);
        assert_progress(&harness.engine, &session, 100.0);
        assert_eq!(story.title, "A sunny afternoon");
        assert_eq!(story.created_at, epoch_plus(0));
    }
}
