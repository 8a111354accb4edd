//! Error types for the onboarding engine.

/// Top-level error type for the engine.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Sequencer error: {0}")]
    Sequencer(#[from] SequencerError),

    #[error("Credential error: {0}")]
    Credential(#[from] CredentialError),

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// State-machine errors from the question sequencer.
///
/// `Validation` is the only variant expected in normal operation — the rest
/// guard against caller misuse of the step machine.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SequencerError {
    #[error("No question at step {step}: the flow has {total} steps")]
    OutOfRange { step: u32, total: u32 },

    #[error("Onboarding is already complete; no further answers are accepted")]
    AlreadyComplete,

    #[error("Onboarding is not complete yet")]
    NotComplete,

    #[error("Cannot go back from the first step")]
    NoPriorStep,

    #[error("Invalid answer: {0}")]
    Validation(#[from] ValidationError),
}

/// Answer validation failures. Surfaced inline to the user; the flow does
/// not advance and the session is left unchanged.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Answer must not be empty")]
    EmptyAnswer,

    #[error("'{value}' is not a valid email address")]
    InvalidEmail { value: String },

    #[error("'{value}' is not one of the offered options")]
    UnknownOption { value: String },

    #[error("Select at least one option")]
    EmptySelection,

    #[error("Question {question} expects a {expected} answer")]
    WrongAnswerKind {
        question: u32,
        expected: &'static str,
    },
}

/// Access-code parse failures. Surfaced as "invalid code" at login; never
/// retried automatically.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("Access code must have the form FIT-<TIER>-<4 digits>, got '{0}'")]
    Malformed(String),

    #[error("Unknown tier segment '{0}' in access code")]
    UnknownTier(String),
}

/// Persistence gateway errors. Transient by contract — callers may retry the
/// same read or write; in-memory session state survives a failed call.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for the engine.
pub type Result<T> = std::result::Result<T, Error>;
