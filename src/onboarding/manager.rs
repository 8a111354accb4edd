//! OnboardingManager — coordinates the session, classification, credential
//! minting, and the durable handoff to the persistence gateway.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::classifier;
use crate::credential;
use crate::error::{Error, SequencerError};
use crate::onboarding::model::{AnswerValue, Lead, Profile};
use crate::onboarding::questions::{self, Question, QuestionCatalog};
use crate::onboarding::session::{OnboardingSession, Sequencer};
use crate::store::Gateway;
use crate::tier::Tier;

/// Credential minted at flow completion. Held in memory so a failed gateway
/// write never re-rolls the code on retry.
#[derive(Debug, Clone)]
struct MintedCredential {
    tier: Tier,
    code: String,
}

/// Result of a submitted answer.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SubmitOutcome {
    /// Whether the flow is now complete.
    pub complete: bool,
    /// The next question to ask, while the flow is still in progress.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_question: Option<Question>,
    /// The persisted profile, once the flow completed and the handoff
    /// succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<Profile>,
}

/// Onboarding status for the downstream UI.
#[derive(Debug, Clone, serde::Serialize)]
pub struct OnboardingStatus {
    pub complete: bool,
    pub current_step: u32,
    pub total_steps: u32,
    pub answered: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<Profile>,
}

/// Coordinates the onboarding flow for the single local session.
pub struct OnboardingManager {
    gateway: Arc<dyn Gateway>,
    sequencer: Sequencer,
    session: RwLock<OnboardingSession>,
    minted: RwLock<Option<MintedCredential>>,
    profile: RwLock<Option<Profile>>,
    lead_source: String,
}

impl OnboardingManager {
    /// Build a manager over the standard question catalog.
    pub fn new(gateway: Arc<dyn Gateway>, lead_source: impl Into<String>) -> Self {
        Self {
            gateway,
            sequencer: Sequencer::new(QuestionCatalog::standard()),
            session: RwLock::new(OnboardingSession::new()),
            minted: RwLock::new(None),
            profile: RwLock::new(None),
            lead_source: lead_source.into(),
        }
    }

    /// Load a previously persisted profile into the in-memory cache.
    /// Called once at startup.
    pub async fn hydrate(&self) -> Result<(), Error> {
        if let Some(profile) = self.gateway.load_profile().await? {
            tracing::info!(tier = %profile.tier, "Existing profile loaded");
            *self.profile.write().await = Some(profile);
        }
        Ok(())
    }

    /// The question at the current step.
    pub async fn current_question(&self) -> Result<Question, Error> {
        let session = self.session.read().await;
        Ok(self.sequencer.current(&session)?.clone())
    }

    /// Submit an answer for the current question.
    ///
    /// On the final answer the flow is finalized: the tier is classified, a
    /// credential minted, and profile + lead handed to the gateway. A gateway
    /// failure is returned as an error while the completed session and the
    /// minted code are preserved — retry with [`finalize`](Self::finalize).
    pub async fn submit_answer(&self, answer: AnswerValue) -> Result<SubmitOutcome, Error> {
        let mut session = self.session.write().await;
        self.sequencer.submit(&mut session, answer)?;

        if !self.sequencer.is_complete(&session) {
            let next = self.sequencer.current(&session)?.clone();
            return Ok(SubmitOutcome {
                complete: false,
                next_question: Some(next),
                profile: None,
            });
        }

        let profile = self.finalize_session(&session).await?;
        Ok(SubmitOutcome {
            complete: true,
            next_question: None,
            profile: Some(profile),
        })
    }

    /// Step back one question. Rejected once the flow is complete.
    pub async fn go_back(&self) -> Result<Question, Error> {
        let mut session = self.session.write().await;
        self.sequencer.back(&mut session)?;
        Ok(self.sequencer.current(&session)?.clone())
    }

    /// Retry the durable handoff after a gateway failure.
    pub async fn finalize(&self) -> Result<Profile, Error> {
        let session = self.session.read().await;
        if !self.sequencer.is_complete(&session) {
            return Err(SequencerError::NotComplete.into());
        }
        self.finalize_session(&session).await
    }

    /// Abandon the in-memory session and start over. Nothing durable is
    /// touched; an unfinished session is garbage.
    pub async fn restart(&self) {
        *self.session.write().await = OnboardingSession::new();
        *self.minted.write().await = None;
    }

    /// Current onboarding status.
    pub async fn status(&self) -> OnboardingStatus {
        let session = self.session.read().await;
        let profile = self.profile.read().await;
        OnboardingStatus {
            complete: self.sequencer.is_complete(&session),
            current_step: session.current_step,
            total_steps: self.sequencer.catalog().len(),
            answered: session.answers.len(),
            profile: profile.clone(),
        }
    }

    /// The cached current-user profile, if onboarding has completed.
    pub async fn profile(&self) -> Option<Profile> {
        self.profile.read().await.clone()
    }

    /// Validate an access code and look up the lead that carries it.
    ///
    /// A malformed code is a `CredentialError`; an unknown code returns
    /// `None`. When the stored profile carries the same code, its last-login
    /// timestamp is bumped and persisted.
    pub async fn login(&self, code: &str) -> Result<Option<Lead>, Error> {
        credential::parse(code)?;

        let lead = self.gateway.find_lead_by_code(code).await?;
        if lead.is_some() {
            let mut cached = self.profile.write().await;
            if let Some(profile) = cached.as_mut() {
                if profile.access_code == code {
                    profile.last_login_at = Utc::now();
                    self.gateway.save_profile(profile).await?;
                }
            }
        }
        Ok(lead)
    }

    /// All recorded leads, newest first.
    pub async fn leads(&self) -> Result<Vec<Lead>, Error> {
        Ok(self.gateway.list_leads().await?)
    }

    /// Classify, mint (once), build profile + lead, and hand both to the
    /// gateway. `session` must be terminal.
    async fn finalize_session(&self, session: &OnboardingSession) -> Result<Profile, Error> {
        let minted = {
            let mut minted = self.minted.write().await;
            minted
                .get_or_insert_with(|| {
                    let tier = classifier::classify(&session.answers);
                    let code = credential::generate(tier);
                    tracing::info!(%tier, code = %code, "Tier classified, credential minted");
                    MintedCredential { tier, code }
                })
                .clone()
        };

        let now = Utc::now();
        let answers = &session.answers;
        let profile = Profile {
            name: answers.text(questions::Q_NAME).unwrap_or_default().to_string(),
            email: answers.text(questions::Q_EMAIL).unwrap_or_default().to_string(),
            tier: minted.tier,
            access_code: minted.code.clone(),
            goals: answers.multi(questions::Q_GOALS).cloned().unwrap_or_default(),
            preferred_activities: answers
                .multi(questions::Q_ACTIVITIES)
                .cloned()
                .unwrap_or_default(),
            created_at: now,
            last_login_at: now,
        };
        let lead = Lead {
            id: Uuid::new_v4(),
            name: profile.name.clone(),
            email: profile.email.clone(),
            tier: minted.tier,
            access_code: minted.code.clone(),
            created_at: now,
            source: self.lead_source.clone(),
            raw_preferences: serde_json::to_value(answers)
                .unwrap_or(serde_json::Value::Null),
        };

        if let Err(e) = self.gateway.save_profile(&profile).await {
            tracing::warn!(error = %e, "Profile write failed; finalization can be retried");
            return Err(e.into());
        }
        if let Err(e) = self.gateway.save_lead(&lead).await {
            tracing::warn!(error = %e, "Lead write failed; finalization can be retried");
            return Err(e.into());
        }

        *self.profile.write().await = Some(profile.clone());
        tracing::info!(tier = %profile.tier, "Onboarding complete, profile persisted");
        Ok(profile)
    }
}
