//! Onboarding — the conversational intake flow.
//!
//! A fixed question sequence collects user attributes; on completion the
//! answers are classified into a tier, an access credential is minted, and
//! the resulting profile and marketing lead are handed to the persistence
//! gateway.

pub mod manager;
pub mod model;
pub mod questions;
pub mod routes;
pub mod session;

pub use manager::{OnboardingManager, OnboardingStatus, SubmitOutcome};
pub use model::{AnswerSet, AnswerValue, Lead, Profile, QuestionId};
pub use questions::{AnswerType, Question, QuestionCatalog, QuestionOption};
pub use routes::{OnboardingRouteState, onboarding_routes};
pub use session::{OnboardingSession, Sequencer};
