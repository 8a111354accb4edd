//! The fixed intake question sequence and per-type answer validation.

use regex::Regex;

use crate::error::ValidationError;
use crate::onboarding::model::{AnswerValue, QuestionId};

/// Stable ids of the standard questions. Ids are 1-based and sequential;
/// downstream code (classifier, profile builder) addresses answers by these.
pub const Q_NAME: QuestionId = 1;
pub const Q_EMAIL: QuestionId = 2;
pub const Q_FITNESS_LEVEL: QuestionId = 3;
pub const Q_GOALS: QuestionId = 4;
pub const Q_ACTIVITIES: QuestionId = 5;
pub const Q_FREQUENCY: QuestionId = 6;

/// What kind of answer a question accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerType {
    Text,
    Email,
    SingleSelect,
    MultiSelect,
}

impl AnswerType {
    /// Name of the expected `AnswerValue` variant, for error messages.
    fn expected_kind(self) -> &'static str {
        match self {
            Self::Text | Self::Email => "text",
            Self::SingleSelect => "selection",
            Self::MultiSelect => "multi_selection",
        }
    }
}

/// One selectable option of a select-type question.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct QuestionOption {
    pub value: String,
    pub label: String,
}

impl QuestionOption {
    fn new(value: &str, label: &str) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
        }
    }
}

/// A single question in the intake sequence. Immutable after catalog build.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub prompt: String,
    pub answer_type: AnswerType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<QuestionOption>,
}

impl Question {
    fn text(id: QuestionId, prompt: &str) -> Self {
        Self {
            id,
            prompt: prompt.to_string(),
            answer_type: AnswerType::Text,
            options: Vec::new(),
        }
    }

    fn email(id: QuestionId, prompt: &str) -> Self {
        Self {
            id,
            prompt: prompt.to_string(),
            answer_type: AnswerType::Email,
            options: Vec::new(),
        }
    }

    fn single_select(id: QuestionId, prompt: &str, options: Vec<QuestionOption>) -> Self {
        Self {
            id,
            prompt: prompt.to_string(),
            answer_type: AnswerType::SingleSelect,
            options,
        }
    }

    fn multi_select(id: QuestionId, prompt: &str, options: Vec<QuestionOption>) -> Self {
        Self {
            id,
            prompt: prompt.to_string(),
            answer_type: AnswerType::MultiSelect,
            options,
        }
    }

    fn has_option(&self, value: &str) -> bool {
        self.options.iter().any(|o| o.value == value)
    }
}

/// The ordered, immutable question catalog. Built once at startup.
pub struct QuestionCatalog {
    questions: Vec<Question>,
    email_re: Regex,
}

impl QuestionCatalog {
    /// The standard six-question intake sequence.
    pub fn standard() -> Self {
        let questions = vec![
            Question::text(Q_NAME, "Hey there! What's your name?"),
            Question::email(Q_EMAIL, "Great to meet you! What's your email address?"),
            Question::text(
                Q_FITNESS_LEVEL,
                "How would you describe your current fitness level?",
            ),
            Question::multi_select(
                Q_GOALS,
                "What are your main fitness goals? Pick as many as you like.",
                vec![
                    QuestionOption::new("lose-weight", "Lose weight"),
                    QuestionOption::new("build-muscle", "Build muscle"),
                    QuestionOption::new("improve-endurance", "Improve endurance"),
                    QuestionOption::new("increase-flexibility", "Increase flexibility"),
                    QuestionOption::new("general-health", "General health"),
                ],
            ),
            Question::multi_select(
                Q_ACTIVITIES,
                "Which activities do you enjoy?",
                vec![
                    QuestionOption::new("gym", "Gym workouts"),
                    QuestionOption::new("running", "Running"),
                    QuestionOption::new("yoga", "Yoga"),
                    QuestionOption::new("cycling", "Cycling"),
                    QuestionOption::new("swimming", "Swimming"),
                    QuestionOption::new("home-workouts", "Home workouts"),
                ],
            ),
            Question::single_select(
                Q_FREQUENCY,
                "How often do you train each week?",
                vec![
                    QuestionOption::new("1-2", "1-2 times"),
                    QuestionOption::new("3-4", "3-4 times"),
                    QuestionOption::new("5-6", "5-6 times"),
                    QuestionOption::new("daily", "Every day"),
                ],
            ),
        ];

        Self {
            questions,
            email_re: Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap(),
        }
    }

    /// Number of questions in the sequence.
    pub fn len(&self) -> u32 {
        self.questions.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// The question at 1-based `step`, if within range.
    pub fn question_at(&self, step: u32) -> Option<&Question> {
        if step == 0 {
            return None;
        }
        self.questions.get(step as usize - 1)
    }

    /// All questions in order.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Validate `answer` against `question`'s type and options.
    pub fn validate_answer(
        &self,
        question: &Question,
        answer: &AnswerValue,
    ) -> Result<(), ValidationError> {
        match (question.answer_type, answer) {
            (AnswerType::Text, AnswerValue::Text(value)) => {
                if value.trim().is_empty() {
                    return Err(ValidationError::EmptyAnswer);
                }
                Ok(())
            }
            (AnswerType::Email, AnswerValue::Text(value)) => {
                let value = value.trim();
                if value.is_empty() {
                    return Err(ValidationError::EmptyAnswer);
                }
                if !self.email_re.is_match(value) {
                    return Err(ValidationError::InvalidEmail {
                        value: value.to_string(),
                    });
                }
                Ok(())
            }
            (AnswerType::SingleSelect, AnswerValue::Selection(value)) => {
                if !question.has_option(value) {
                    return Err(ValidationError::UnknownOption {
                        value: value.clone(),
                    });
                }
                Ok(())
            }
            (AnswerType::MultiSelect, AnswerValue::MultiSelection(values)) => {
                if values.is_empty() {
                    return Err(ValidationError::EmptySelection);
                }
                if let Some(unknown) = values.iter().find(|v| !question.has_option(v)) {
                    return Err(ValidationError::UnknownOption {
                        value: unknown.clone(),
                    });
                }
                Ok(())
            }
            (expected, _) => Err(ValidationError::WrongAnswerKind {
                question: question.id,
                expected: expected.expected_kind(),
            }),
        }
    }
}
