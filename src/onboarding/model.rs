//! Answer and profile data models for the intake flow.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::tier::Tier;

/// Stable identifier of a question in the fixed sequence (1-based).
pub type QuestionId = u32;

/// A submitted answer.
///
/// Tagged union so the sequencer and classifier pattern-match exhaustively
/// instead of inspecting runtime shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerValue {
    /// Free text (also used for email answers).
    Text(String),
    /// A single chosen option value.
    Selection(String),
    /// One or more chosen option values.
    MultiSelection(BTreeSet<String>),
}

impl AnswerValue {
    /// The text content, if this answer carries a single string.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) | Self::Selection(s) => Some(s),
            Self::MultiSelection(_) => None,
        }
    }

    /// The selected values, if this is a multi-selection.
    pub fn as_multi(&self) -> Option<&BTreeSet<String>> {
        match self {
            Self::MultiSelection(set) => Some(set),
            _ => None,
        }
    }
}

/// Ordered mapping of question id → answer.
///
/// Grows monotonically as the user answers; only an explicit "go back"
/// removes the trailing entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSet(BTreeMap<QuestionId, AnswerValue>);

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, question: QuestionId, answer: AnswerValue) {
        self.0.insert(question, answer);
    }

    /// Remove and return the answer for `question` (used only by "go back").
    pub fn remove(&mut self, question: QuestionId) -> Option<AnswerValue> {
        self.0.remove(&question)
    }

    pub fn get(&self, question: QuestionId) -> Option<&AnswerValue> {
        self.0.get(&question)
    }

    /// The single-string answer for `question`, if present.
    pub fn text(&self, question: QuestionId) -> Option<&str> {
        self.0.get(&question).and_then(AnswerValue::as_text)
    }

    /// The multi-selection answer for `question`, if present.
    pub fn multi(&self, question: QuestionId) -> Option<&BTreeSet<String>> {
        self.0.get(&question).and_then(AnswerValue::as_multi)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&QuestionId, &AnswerValue)> {
        self.0.iter()
    }
}

/// The current user's profile, created exactly once at onboarding completion.
///
/// Owned by the persistence gateway after handoff; the engine reads it back
/// only for login and status queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub email: String,
    pub tier: Tier,
    pub access_code: String,
    pub goals: BTreeSet<String>,
    pub preferred_activities: BTreeSet<String>,
    pub created_at: DateTime<Utc>,
    pub last_login_at: DateTime<Utc>,
}

/// A marketing lead — append-only projection of a completed onboarding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub tier: Tier,
    pub access_code: String,
    pub created_at: DateTime<Utc>,
    /// Where the lead came from, e.g. "onboarding-chat".
    pub source: String,
    /// Opaque snapshot of the raw answers at completion time.
    pub raw_preferences: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answer_set_grows_and_shrinks_only_at_the_tail() {
        let mut answers = AnswerSet::new();
        answers.insert(1, AnswerValue::Text("Alice".into()));
        answers.insert(2, AnswerValue::Text("alice@example.com".into()));
        assert_eq!(answers.len(), 2);

        let removed = answers.remove(2);
        assert_eq!(removed, Some(AnswerValue::Text("alice@example.com".into())));
        assert_eq!(answers.len(), 1);
        assert!(answers.get(2).is_none());
        assert_eq!(answers.text(1), Some("Alice"));
    }

    #[test]
    fn text_reads_both_text_and_selection() {
        let mut answers = AnswerSet::new();
        answers.insert(1, AnswerValue::Text("free text".into()));
        answers.insert(2, AnswerValue::Selection("3-4".into()));
        answers.insert(3, AnswerValue::MultiSelection(["gym".to_string()].into()));

        assert_eq!(answers.text(1), Some("free text"));
        assert_eq!(answers.text(2), Some("3-4"));
        assert_eq!(answers.text(3), None);
        assert!(answers.multi(3).is_some());
    }

    #[test]
    fn answer_value_serde_roundtrip() {
        let values = [
            AnswerValue::Text("hello".into()),
            AnswerValue::Selection("daily".into()),
            AnswerValue::MultiSelection(["yoga".to_string(), "gym".to_string()].into()),
        ];
        for value in values {
            let json = serde_json::to_string(&value).unwrap();
            let parsed: AnswerValue = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, value);
        }
    }

    #[test]
    fn profile_serde_roundtrip() {
        let profile = Profile {
            name: "Alice".into(),
            email: "alice@example.com".into(),
            tier: Tier::Adv,
            access_code: "FIT-ADV-4821".into(),
            goals: ["build-muscle".to_string(), "general-health".to_string()].into(),
            preferred_activities: ["gym".to_string()].into(),
            created_at: Utc::now(),
            last_login_at: Utc::now(),
        };

        let json = serde_json::to_string(&profile).unwrap();
        let parsed: Profile = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, profile);
        assert_eq!(parsed.tier, Tier::Adv);
    }

    #[test]
    fn lead_serde_roundtrip() {
        let lead = Lead {
            id: Uuid::new_v4(),
            name: "Bob".into(),
            email: "bob@example.com".into(),
            tier: Tier::Vip,
            access_code: "FIT-VIP-1000".into(),
            created_at: Utc::now(),
            source: "onboarding-chat".into(),
            raw_preferences: serde_json::json!({"1": {"text": "Bob"}}),
        };

        let json = serde_json::to_string(&lead).unwrap();
        let parsed: Lead = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, lead);
    }
}
