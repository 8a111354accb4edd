//! `Gateway` trait — the engine's single interface to durable storage.
//!
//! The core depends only on this trait, never on a concrete backend. Every
//! call is a potential suspension point; failures are transient and callers
//! may retry the same read or write without losing in-memory session state.

use async_trait::async_trait;

use crate::error::GatewayError;
use crate::onboarding::model::{Lead, Profile};

/// Backend-agnostic persistence for the current-user profile slot and the
/// append-only lead ledger.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Write the current-user profile. Single slot, last write wins.
    async fn save_profile(&self, profile: &Profile) -> Result<(), GatewayError>;

    /// Read the current-user profile, if one has been saved.
    async fn load_profile(&self) -> Result<Option<Profile>, GatewayError>;

    /// Append a lead to the ledger. Leads are never mutated or deleted.
    async fn save_lead(&self, lead: &Lead) -> Result<(), GatewayError>;

    /// All leads, newest first.
    async fn list_leads(&self) -> Result<Vec<Lead>, GatewayError>;

    /// The newest lead carrying `code`, if any. A code is "live" iff some
    /// persisted lead carries it.
    async fn find_lead_by_code(&self, code: &str) -> Result<Option<Lead>, GatewayError>;
}
