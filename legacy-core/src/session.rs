//! Interview session snapshots.
//!
//! An [`InterviewSession`] is an immutable value. Recording an answer never
//! touches the existing snapshot; it derives the next one. Only the engine
//! can open or advance a session, which keeps these invariants intact:
//!
//! - `responses().len() == current_question_index()`
//! - `current_question_index() <= questions().len()`
//! - the session is completed exactly when every question is answered,
//!   and only then carries a completion time.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::InterviewError;
use crate::photo::Photo;
use crate::question::Question;

/// Unique identifier for an interview session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Create a new unique session ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Draw a session ID from the given RNG.
    pub fn from_rng<R: Rng>(rng: &mut R) -> Self {
        Self(uuid::Builder::from_random_bytes(rng.gen()).into_uuid())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

/// Where an interview stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    InProgress,
    Completed,
}

/// An answer to one interview question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// Id of the question this answers.
    pub question_id: String,
    pub transcript: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_ref: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// One interview over a single photo.
#[derive(Debug, Clone)]
pub struct InterviewSession {
    id: SessionId,
    photo: Arc<Photo>,
    questions: Arc<[Question]>,
    responses: Vec<Response>,
    current_question_index: usize,
    status: SessionStatus,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl InterviewSession {
    /// Open a session with no answers yet.
    ///
    /// A session with no questions has nothing left to ask, so it opens
    /// already completed.
    pub(crate) fn open(
        id: SessionId,
        photo: Arc<Photo>,
        questions: Vec<Question>,
        started_at: DateTime<Utc>,
    ) -> Self {
        let (status, completed_at) = if questions.is_empty() {
            (SessionStatus::Completed, Some(started_at))
        } else {
            (SessionStatus::InProgress, None)
        };

        Self {
            id,
            photo,
            questions: questions.into(),
            responses: Vec::new(),
            current_question_index: 0,
            status,
            started_at,
            completed_at,
        }
    }

    /// Derive the snapshot that follows answering the current question.
    pub(crate) fn advance(
        &self,
        transcript: String,
        audio_ref: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Self, InterviewError> {
        let question = self
            .current_question()
            .ok_or(InterviewError::SessionComplete {
                total: self.questions.len(),
            })?;

        let mut responses = Vec::with_capacity(self.responses.len() + 1);
        responses.extend(self.responses.iter().cloned());
        responses.push(Response {
            question_id: question.id.clone(),
            transcript,
            audio_ref,
            timestamp: now,
        });

        let current_question_index = self.current_question_index + 1;
        let finished = current_question_index == self.questions.len();

        Ok(Self {
            id: self.id,
            photo: Arc::clone(&self.photo),
            questions: Arc::clone(&self.questions),
            responses,
            current_question_index,
            status: if finished {
                SessionStatus::Completed
            } else {
                SessionStatus::InProgress
            },
            started_at: self.started_at,
            completed_at: finished.then_some(now),
        })
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn photo(&self) -> &Photo {
        &self.photo
    }

    /// Shared handle to the photo, for callers that outlive the session.
    pub fn photo_handle(&self) -> Arc<Photo> {
        Arc::clone(&self.photo)
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn responses(&self) -> &[Response] {
        &self.responses
    }

    pub fn current_question_index(&self) -> usize {
        self.current_question_index
    }

    /// The question at the cursor, if any remain.
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_question_index)
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Number of questions still unanswered.
    pub fn remaining(&self) -> usize {
        self.questions.len() - self.current_question_index
    }

    /// Look up a question asked in this session by id.
    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }
}
