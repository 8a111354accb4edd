//! libSQL gateway — durable `Gateway` implementation.
//!
//! Supports local file and in-memory databases. Timestamps are stored as
//! RFC 3339 text; goal/activity sets and raw preferences as JSON columns.

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use libsql::{Connection, Database as LibSqlDatabase, params};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::GatewayError;
use crate::onboarding::model::{Lead, Profile};
use crate::store::migrations;
use crate::store::traits::Gateway;
use crate::tier::Tier;

/// Row key of the single current-user profile slot.
const PROFILE_SLOT: &str = "current";

const LEAD_COLUMNS: &str = "id, name, email, tier, access_code, source, raw_preferences, created_at";

/// libSQL database gateway.
///
/// Holds a single connection reused for all operations.
/// `libsql::Connection` is `Send + Sync` and safe for concurrent async use.
pub struct LibSqlGateway {
    #[allow(dead_code)]
    db: Arc<LibSqlDatabase>,
    conn: Connection,
}

impl LibSqlGateway {
    /// Open (or create) a local database file and run migrations.
    pub async fn new_local(path: &Path) -> Result<Self, GatewayError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                GatewayError::Connection(format!("Failed to create database directory: {e}"))
            })?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| GatewayError::Connection(format!("Failed to open database: {e}")))?;
        let conn = db
            .connect()
            .map_err(|e| GatewayError::Connection(format!("Failed to create connection: {e}")))?;

        let gateway = Self {
            db: Arc::new(db),
            conn,
        };
        migrations::run(&gateway.conn).await?;
        info!(path = %path.display(), "Lead store opened");
        Ok(gateway)
    }

    /// Create an in-memory database (for tests).
    pub async fn new_memory() -> Result<Self, GatewayError> {
        let db = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| {
                GatewayError::Connection(format!("Failed to create in-memory database: {e}"))
            })?;
        let conn = db
            .connect()
            .map_err(|e| GatewayError::Connection(format!("Failed to create connection: {e}")))?;

        let gateway = Self {
            db: Arc::new(db),
            conn,
        };
        migrations::run(&gateway.conn).await?;
        Ok(gateway)
    }

    fn conn(&self) -> &Connection {
        &self.conn
    }
}

// ── Helper functions ────────────────────────────────────────────────

/// Parse an RFC 3339 string into `DateTime<Utc>`, tolerating SQLite's
/// `datetime('now')` output.
fn parse_datetime(s: &str) -> DateTime<Utc> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return dt.with_timezone(&Utc);
    }
    if let Ok(ndt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
        return ndt.and_utc();
    }
    DateTime::<Utc>::MIN_UTC
}

fn parse_tier(s: &str) -> Result<Tier, GatewayError> {
    s.parse()
        .map_err(|_| GatewayError::Serialization(format!("unknown tier '{s}' in store")))
}

fn set_to_json(set: &BTreeSet<String>) -> String {
    serde_json::to_string(set).unwrap_or_else(|_| "[]".to_string())
}

fn json_to_set(s: &str) -> BTreeSet<String> {
    serde_json::from_str(s).unwrap_or_default()
}

fn row_to_profile(row: &libsql::Row) -> Result<Profile, GatewayError> {
    let tier_str: String = row
        .get(2)
        .map_err(|e| GatewayError::Query(format!("profile row: {e}")))?;
    let goals_str: String = row
        .get(4)
        .map_err(|e| GatewayError::Query(format!("profile row: {e}")))?;
    let activities_str: String = row
        .get(5)
        .map_err(|e| GatewayError::Query(format!("profile row: {e}")))?;
    let created_str: String = row
        .get(6)
        .map_err(|e| GatewayError::Query(format!("profile row: {e}")))?;
    let last_login_str: String = row
        .get(7)
        .map_err(|e| GatewayError::Query(format!("profile row: {e}")))?;

    Ok(Profile {
        name: row
            .get(0)
            .map_err(|e| GatewayError::Query(format!("profile row: {e}")))?,
        email: row
            .get(1)
            .map_err(|e| GatewayError::Query(format!("profile row: {e}")))?,
        tier: parse_tier(&tier_str)?,
        access_code: row
            .get(3)
            .map_err(|e| GatewayError::Query(format!("profile row: {e}")))?,
        goals: json_to_set(&goals_str),
        preferred_activities: json_to_set(&activities_str),
        created_at: parse_datetime(&created_str),
        last_login_at: parse_datetime(&last_login_str),
    })
}

fn row_to_lead(row: &libsql::Row) -> Result<Lead, GatewayError> {
    let id_str: String = row
        .get(0)
        .map_err(|e| GatewayError::Query(format!("lead row: {e}")))?;
    let tier_str: String = row
        .get(3)
        .map_err(|e| GatewayError::Query(format!("lead row: {e}")))?;
    let prefs_str: String = row
        .get(6)
        .map_err(|e| GatewayError::Query(format!("lead row: {e}")))?;
    let created_str: String = row
        .get(7)
        .map_err(|e| GatewayError::Query(format!("lead row: {e}")))?;

    Ok(Lead {
        id: Uuid::parse_str(&id_str)
            .map_err(|e| GatewayError::Serialization(format!("lead id: {e}")))?,
        name: row
            .get(1)
            .map_err(|e| GatewayError::Query(format!("lead row: {e}")))?,
        email: row
            .get(2)
            .map_err(|e| GatewayError::Query(format!("lead row: {e}")))?,
        tier: parse_tier(&tier_str)?,
        access_code: row
            .get(4)
            .map_err(|e| GatewayError::Query(format!("lead row: {e}")))?,
        source: row
            .get(5)
            .map_err(|e| GatewayError::Query(format!("lead row: {e}")))?,
        raw_preferences: serde_json::from_str(&prefs_str)
            .map_err(|e| GatewayError::Serialization(format!("lead preferences: {e}")))?,
        created_at: parse_datetime(&created_str),
    })
}

// ── Trait implementation ────────────────────────────────────────────

#[async_trait]
impl Gateway for LibSqlGateway {
    async fn save_profile(&self, profile: &Profile) -> Result<(), GatewayError> {
        self.conn()
            .execute(
                "INSERT INTO profiles (slot, name, email, tier, access_code, goals,
                                       preferred_activities, created_at, last_login_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                 ON CONFLICT(slot) DO UPDATE SET
                     name = excluded.name,
                     email = excluded.email,
                     tier = excluded.tier,
                     access_code = excluded.access_code,
                     goals = excluded.goals,
                     preferred_activities = excluded.preferred_activities,
                     created_at = excluded.created_at,
                     last_login_at = excluded.last_login_at",
                params![
                    PROFILE_SLOT,
                    profile.name.as_str(),
                    profile.email.as_str(),
                    profile.tier.code(),
                    profile.access_code.as_str(),
                    set_to_json(&profile.goals),
                    set_to_json(&profile.preferred_activities),
                    profile.created_at.to_rfc3339(),
                    profile.last_login_at.to_rfc3339(),
                ],
            )
            .await
            .map_err(|e| GatewayError::Query(format!("save_profile: {e}")))?;

        debug!(tier = %profile.tier, "Profile saved");
        Ok(())
    }

    async fn load_profile(&self) -> Result<Option<Profile>, GatewayError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT name, email, tier, access_code, goals, preferred_activities,
                        created_at, last_login_at
                 FROM profiles WHERE slot = ?1",
                params![PROFILE_SLOT],
            )
            .await
            .map_err(|e| GatewayError::Query(format!("load_profile: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => Ok(Some(row_to_profile(&row)?)),
            Ok(None) => Ok(None),
            Err(e) => Err(GatewayError::Query(format!("load_profile: {e}"))),
        }
    }

    async fn save_lead(&self, lead: &Lead) -> Result<(), GatewayError> {
        self.conn()
            .execute(
                "INSERT INTO leads (id, name, email, tier, access_code, source,
                                    raw_preferences, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    lead.id.to_string(),
                    lead.name.as_str(),
                    lead.email.as_str(),
                    lead.tier.code(),
                    lead.access_code.as_str(),
                    lead.source.as_str(),
                    lead.raw_preferences.to_string(),
                    lead.created_at.to_rfc3339(),
                ],
            )
            .await
            .map_err(|e| GatewayError::Query(format!("save_lead: {e}")))?;

        debug!(lead_id = %lead.id, tier = %lead.tier, "Lead recorded");
        Ok(())
    }

    async fn list_leads(&self) -> Result<Vec<Lead>, GatewayError> {
        let mut rows = self
            .conn()
            .query(
                &format!("SELECT {LEAD_COLUMNS} FROM leads ORDER BY created_at DESC, rowid DESC"),
                (),
            )
            .await
            .map_err(|e| GatewayError::Query(format!("list_leads: {e}")))?;

        let mut leads = Vec::new();
        loop {
            match rows.next().await {
                Ok(Some(row)) => leads.push(row_to_lead(&row)?),
                Ok(None) => break,
                Err(e) => return Err(GatewayError::Query(format!("list_leads: {e}"))),
            }
        }
        Ok(leads)
    }

    async fn find_lead_by_code(&self, code: &str) -> Result<Option<Lead>, GatewayError> {
        let mut rows = self
            .conn()
            .query(
                &format!(
                    "SELECT {LEAD_COLUMNS} FROM leads WHERE access_code = ?1
                     ORDER BY created_at DESC, rowid DESC LIMIT 1"
                ),
                params![code],
            )
            .await
            .map_err(|e| GatewayError::Query(format!("find_lead_by_code: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => Ok(Some(row_to_lead(&row)?)),
            Ok(None) => Ok(None),
            Err(e) => Err(GatewayError::Query(format!("find_lead_by_code: {e}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_db() -> LibSqlGateway {
        LibSqlGateway::new_memory().await.unwrap()
    }

    fn make_profile(name: &str, tier: Tier, code: &str) -> Profile {
        Profile {
            name: name.into(),
            email: format!("{}@example.com", name.to_lowercase()),
            tier,
            access_code: code.into(),
            goals: ["build-muscle".to_string(), "general-health".to_string()].into(),
            preferred_activities: ["gym".to_string(), "running".to_string()].into(),
            created_at: Utc::now(),
            last_login_at: Utc::now(),
        }
    }

    fn make_lead(name: &str, tier: Tier, code: &str, created_at: DateTime<Utc>) -> Lead {
        Lead {
            id: Uuid::new_v4(),
            name: name.into(),
            email: format!("{}@example.com", name.to_lowercase()),
            tier,
            access_code: code.into(),
            created_at,
            source: "onboarding-chat".into(),
            raw_preferences: serde_json::json!({"3": {"text": "advanced"}}),
        }
    }

    #[tokio::test]
    async fn save_and_load_profile() {
        let db = test_db().await;
        assert!(db.load_profile().await.unwrap().is_none());

        let profile = make_profile("Alice", Tier::Adv, "FIT-ADV-4821");
        db.save_profile(&profile).await.unwrap();

        let loaded = db.load_profile().await.unwrap().unwrap();
        assert_eq!(loaded.name, "Alice");
        assert_eq!(loaded.tier, Tier::Adv);
        assert_eq!(loaded.access_code, "FIT-ADV-4821");
        assert_eq!(loaded.goals, profile.goals);
        assert_eq!(loaded.preferred_activities, profile.preferred_activities);
    }

    #[tokio::test]
    async fn profile_slot_is_last_write_wins() {
        let db = test_db().await;
        db.save_profile(&make_profile("Alice", Tier::Beg, "FIT-BEG-1111"))
            .await
            .unwrap();
        db.save_profile(&make_profile("Bob", Tier::Pro, "FIT-PRO-2222"))
            .await
            .unwrap();

        let loaded = db.load_profile().await.unwrap().unwrap();
        assert_eq!(loaded.name, "Bob");
        assert_eq!(loaded.tier, Tier::Pro);
    }

    #[tokio::test]
    async fn leads_are_listed_newest_first() {
        let db = test_db().await;
        let base = Utc::now();
        db.save_lead(&make_lead("First", Tier::Beg, "FIT-BEG-1111", base))
            .await
            .unwrap();
        db.save_lead(&make_lead(
            "Second",
            Tier::Int,
            "FIT-INT-2222",
            base + chrono::Duration::seconds(1),
        ))
        .await
        .unwrap();
        db.save_lead(&make_lead(
            "Third",
            Tier::Adv,
            "FIT-ADV-3333",
            base + chrono::Duration::seconds(2),
        ))
        .await
        .unwrap();

        let leads = db.list_leads().await.unwrap();
        let names: Vec<&str> = leads.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Third", "Second", "First"]);
    }

    #[tokio::test]
    async fn find_lead_by_code_prefers_newest_duplicate() {
        let db = test_db().await;
        let base = Utc::now();
        db.save_lead(&make_lead("Older", Tier::Int, "FIT-INT-7777", base))
            .await
            .unwrap();
        db.save_lead(&make_lead(
            "Newer",
            Tier::Int,
            "FIT-INT-7777",
            base + chrono::Duration::seconds(5),
        ))
        .await
        .unwrap();

        let found = db.find_lead_by_code("FIT-INT-7777").await.unwrap().unwrap();
        assert_eq!(found.name, "Newer");
    }

    #[tokio::test]
    async fn find_lead_by_unknown_code_is_none() {
        let db = test_db().await;
        assert!(db.find_lead_by_code("FIT-VIP-9999").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn lead_roundtrips_raw_preferences() {
        let db = test_db().await;
        let lead = make_lead("Alice", Tier::Adv, "FIT-ADV-1234", Utc::now());
        db.save_lead(&lead).await.unwrap();

        let loaded = db.find_lead_by_code("FIT-ADV-1234").await.unwrap().unwrap();
        assert_eq!(loaded.id, lead.id);
        assert_eq!(loaded.raw_preferences, lead.raw_preferences);
    }

    #[tokio::test]
    async fn local_file_database_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fitgate.db");

        {
            let db = LibSqlGateway::new_local(&path).await.unwrap();
            db.save_profile(&make_profile("Alice", Tier::Vip, "FIT-VIP-8888"))
                .await
                .unwrap();
        }

        let db = LibSqlGateway::new_local(&path).await.unwrap();
        let loaded = db.load_profile().await.unwrap().unwrap();
        assert_eq!(loaded.tier, Tier::Vip);
    }
}
