//! Guided reminiscence interviews that become legacy stories.
//!
//! This crate provides:
//! - Question selection for a photo from a static question bank
//! - Interview sessions as immutable snapshots with a small state machine
//! - Story synthesis: title, narrative, reading time and tags
//! - Story and photo persistence over a key-value store
//!
//! # Quick Start
//!
//! ```ignore
//! use legacy_core::{InterviewEngine, Photo};
//!
//! let engine = InterviewEngine::default();
//! let photo = Photo::new("p1", "wedding.jpg")
//!     .with_description("Our wedding at St. Mary's")
//!     .with_category("wedding")
//!     .with_date("1975-06-01");
//!
//! let mut session = engine.create_session(photo);
//! while let Some(question) = engine.next_question(&session) {
//!     println!("{}", question.prompt);
//!     session = engine.add_response(&session, "It rained all day.", None)?;
//! }
//!
//! let story = engine.generate_story(&session)?;
//! println!("{}\n\n{}", story.title, story.narrative);
//! ```

pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod headless;
pub mod narration;
pub mod persist;
pub mod photo;
pub mod question;
pub mod session;
pub mod story;
pub mod testing;

// Primary public API
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::EngineConfig;
pub use engine::InterviewEngine;
pub use error::InterviewError;
pub use headless::{HeadlessError, HeadlessInterview, Turn};
pub use photo::{Photo, PhotoCategory};
pub use question::{Question, QuestionBank, QuestionCategory};
pub use session::{InterviewSession, Response, SessionId, SessionStatus};
pub use story::{LegacyStory, StoryId, StoryMetadata};
pub use testing::TestHarness;
