//! In-memory gateway — used by tests and ephemeral demo runs.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::GatewayError;
use crate::onboarding::model::{Lead, Profile};
use crate::store::traits::Gateway;

/// Gateway backed by process memory. Nothing survives a restart.
#[derive(Default)]
pub struct MemoryGateway {
    profile: RwLock<Option<Profile>>,
    /// Append order; listing reverses to newest-first.
    leads: RwLock<Vec<Lead>>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Gateway for MemoryGateway {
    async fn save_profile(&self, profile: &Profile) -> Result<(), GatewayError> {
        *self.profile.write().await = Some(profile.clone());
        Ok(())
    }

    async fn load_profile(&self) -> Result<Option<Profile>, GatewayError> {
        Ok(self.profile.read().await.clone())
    }

    async fn save_lead(&self, lead: &Lead) -> Result<(), GatewayError> {
        self.leads.write().await.push(lead.clone());
        Ok(())
    }

    async fn list_leads(&self) -> Result<Vec<Lead>, GatewayError> {
        let leads = self.leads.read().await;
        Ok(leads.iter().rev().cloned().collect())
    }

    async fn find_lead_by_code(&self, code: &str) -> Result<Option<Lead>, GatewayError> {
        let leads = self.leads.read().await;
        Ok(leads.iter().rev().find(|l| l.access_code == code).cloned())
    }
}
