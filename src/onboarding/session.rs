//! Onboarding session state machine.
//!
//! States are the integers `1..=N+1` where `N` is the question count and
//! `N+1` is terminal. `submit` moves forward one step, `back` moves backward
//! one step and discards the trailing answer. No skipping.

use serde::{Deserialize, Serialize};

use crate::error::SequencerError;
use crate::onboarding::model::{AnswerSet, AnswerValue};
use crate::onboarding::questions::{Question, QuestionCatalog};

/// The in-progress state of a user stepping through the question sequence.
///
/// Purely in-memory; nothing is durably written until the flow completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnboardingSession {
    /// Current 1-based step; `N+1` means the flow is complete.
    pub current_step: u32,
    /// Answers collected so far, keyed by question id.
    pub answers: AnswerSet,
}

impl OnboardingSession {
    /// A fresh session at step 1 with no answers.
    pub fn new() -> Self {
        Self {
            current_step: 1,
            answers: AnswerSet::new(),
        }
    }
}

impl Default for OnboardingSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Drives an `OnboardingSession` through the fixed question catalog.
pub struct Sequencer {
    catalog: QuestionCatalog,
}

impl Sequencer {
    pub fn new(catalog: QuestionCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &QuestionCatalog {
        &self.catalog
    }

    /// Whether the session has answered every question.
    pub fn is_complete(&self, session: &OnboardingSession) -> bool {
        session.current_step > self.catalog.len()
    }

    /// The question at the session's current step.
    pub fn current<'a>(&'a self, session: &OnboardingSession) -> Result<&'a Question, SequencerError> {
        self.catalog
            .question_at(session.current_step)
            .ok_or(SequencerError::OutOfRange {
                step: session.current_step,
                total: self.catalog.len(),
            })
    }

    /// Validate and store an answer for the current question, then advance.
    ///
    /// On any error the session is left exactly as it was.
    pub fn submit(
        &self,
        session: &mut OnboardingSession,
        answer: AnswerValue,
    ) -> Result<(), SequencerError> {
        if self.is_complete(session) {
            return Err(SequencerError::AlreadyComplete);
        }
        let question = self.current(session)?;
        self.catalog.validate_answer(question, &answer)?;

        session.answers.insert(question.id, answer);
        session.current_step += 1;
        Ok(())
    }

    /// Step back one question, discarding its answer.
    ///
    /// The exact inverse of `submit`: `back(submit(s, a)) == s`. Terminal
    /// sessions are immutable and reject this with `AlreadyComplete`.
    pub fn back(&self, session: &mut OnboardingSession) -> Result<(), SequencerError> {
        if self.is_complete(session) {
            return Err(SequencerError::AlreadyComplete);
        }
        if session.current_step <= 1 {
            return Err(SequencerError::NoPriorStep);
        }
        session.current_step -= 1;
        session.answers.remove(session.current_step);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::onboarding::questions;

    fn sequencer() -> Sequencer {
        Sequencer::new(QuestionCatalog::standard())
    }

    /// Valid answers for the standard catalog, in order.
    fn standard_answers() -> Vec<AnswerValue> {
        vec![
            AnswerValue::Text("Alice".into()),
            AnswerValue::Text("alice@example.com".into()),
            AnswerValue::Text("intermediate, training for a while".into()),
            AnswerValue::MultiSelection(
                ["build-muscle".to_string(), "general-health".to_string()].into(),
            ),
            AnswerValue::MultiSelection(["gym".to_string(), "running".to_string()].into()),
            AnswerValue::Selection("3-4".into()),
        ]
    }

    #[test]
    fn fresh_session_starts_at_step_one() {
        let seq = sequencer();
        let session = OnboardingSession::new();
        assert_eq!(session.current_step, 1);
        assert!(!seq.is_complete(&session));
        assert_eq!(seq.current(&session).unwrap().id, questions::Q_NAME);
    }

    #[test]
    fn submit_walks_all_steps_to_completion() {
        let seq = sequencer();
        let mut session = OnboardingSession::new();

        for (index, answer) in standard_answers().into_iter().enumerate() {
            assert_eq!(session.current_step, index as u32 + 1);
            seq.submit(&mut session, answer).unwrap();
        }

        assert!(seq.is_complete(&session));
        assert_eq!(session.current_step, 7);
        assert_eq!(session.answers.len(), 6);
    }

    #[test]
    fn submit_after_completion_fails() {
        let seq = sequencer();
        let mut session = OnboardingSession::new();
        for answer in standard_answers() {
            seq.submit(&mut session, answer).unwrap();
        }

        let result = seq.submit(&mut session, AnswerValue::Text("extra".into()));
        assert_eq!(result, Err(SequencerError::AlreadyComplete));
        assert_eq!(session.answers.len(), 6);
    }

    #[test]
    fn current_is_out_of_range_after_completion() {
        let seq = sequencer();
        let mut session = OnboardingSession::new();
        for answer in standard_answers() {
            seq.submit(&mut session, answer).unwrap();
        }

        assert_eq!(
            seq.current(&session),
            Err(SequencerError::OutOfRange { step: 7, total: 6 })
        );
    }

    #[test]
    fn invalid_answer_leaves_session_unchanged() {
        let seq = sequencer();
        let mut session = OnboardingSession::new();
        let before = session.clone();

        let result = seq.submit(&mut session, AnswerValue::Text("".into()));
        assert_eq!(
            result,
            Err(SequencerError::Validation(ValidationError::EmptyAnswer))
        );
        assert_eq!(session, before);
    }

    #[test]
    fn back_undoes_submit_exactly() {
        let seq = sequencer();
        let mut session = OnboardingSession::new();
        seq.submit(&mut session, AnswerValue::Text("Alice".into()))
            .unwrap();

        let snapshot = session.clone();
        seq.submit(&mut session, AnswerValue::Text("alice@example.com".into()))
            .unwrap();
        seq.back(&mut session).unwrap();

        assert_eq!(session, snapshot);
        assert_eq!(seq.current(&session).unwrap().id, questions::Q_EMAIL);
    }

    #[test]
    fn back_at_first_step_fails() {
        let seq = sequencer();
        let mut session = OnboardingSession::new();
        assert_eq!(seq.back(&mut session), Err(SequencerError::NoPriorStep));
        assert_eq!(session, OnboardingSession::new());
    }

    #[test]
    fn back_on_terminal_session_fails() {
        let seq = sequencer();
        let mut session = OnboardingSession::new();
        for answer in standard_answers() {
            seq.submit(&mut session, answer).unwrap();
        }

        assert_eq!(seq.back(&mut session), Err(SequencerError::AlreadyComplete));
        assert!(seq.is_complete(&session));
    }

    #[test]
    fn resubmit_after_back_replaces_the_answer() {
        let seq = sequencer();
        let mut session = OnboardingSession::new();
        seq.submit(&mut session, AnswerValue::Text("Alice".into()))
            .unwrap();
        seq.back(&mut session).unwrap();
        seq.submit(&mut session, AnswerValue::Text("Alicia".into()))
            .unwrap();

        assert_eq!(session.answers.text(questions::Q_NAME), Some("Alicia"));
        assert_eq!(session.answers.len(), 1);
        assert_eq!(session.current_step, 2);
    }

    #[test]
    fn session_serde_roundtrip() {
        let seq = sequencer();
        let mut session = OnboardingSession::new();
        seq.submit(&mut session, AnswerValue::Text("Alice".into()))
            .unwrap();

        let json = serde_json::to_string(&session).unwrap();
        let parsed: OnboardingSession = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, session);
    }
}
