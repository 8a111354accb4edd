//! Version-tracked database migrations for the libSQL gateway.
//!
//! Each migration has a version number and SQL. `run()` checks the current
//! version in `_migrations` and applies only the new ones, in order.

use libsql::Connection;

use crate::error::GatewayError;

/// A single migration step.
struct Migration {
    version: i64,
    name: &'static str,
    sql: &'static str,
}

/// All migrations in order. Add new versions to the end.
static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: r#"
        CREATE TABLE IF NOT EXISTS profiles (
            slot TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT NOT NULL,
            tier TEXT NOT NULL,
            access_code TEXT NOT NULL,
            goals TEXT NOT NULL,
            preferred_activities TEXT NOT NULL,
            created_at TEXT NOT NULL,
            last_login_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS leads (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT NOT NULL,
            tier TEXT NOT NULL,
            access_code TEXT NOT NULL,
            source TEXT NOT NULL,
            raw_preferences TEXT NOT NULL,
            created_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_leads_access_code ON leads(access_code);
        CREATE INDEX IF NOT EXISTS idx_leads_created_at ON leads(created_at);
    "#,
}];

/// Apply all pending migrations.
pub async fn run(conn: &Connection) -> Result<(), GatewayError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS _migrations (
            version INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        (),
    )
    .await
    .map_err(|e| GatewayError::Migration(format!("create _migrations: {e}")))?;

    let current = current_version(conn).await?;

    for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
        conn.execute_batch(migration.sql)
            .await
            .map_err(|e| GatewayError::Migration(format!("{}: {e}", migration.name)))?;
        conn.execute(
            "INSERT INTO _migrations (version, name) VALUES (?1, ?2)",
            libsql::params![migration.version, migration.name],
        )
        .await
        .map_err(|e| GatewayError::Migration(format!("record {}: {e}", migration.name)))?;
        tracing::debug!(version = migration.version, name = migration.name, "Migration applied");
    }

    Ok(())
}

async fn current_version(conn: &Connection) -> Result<i64, GatewayError> {
    let mut rows = conn
        .query("SELECT COALESCE(MAX(version), 0) FROM _migrations", ())
        .await
        .map_err(|e| GatewayError::Migration(format!("read version: {e}")))?;

    match rows.next().await {
        Ok(Some(row)) => row
            .get::<i64>(0)
            .map_err(|e| GatewayError::Migration(format!("parse version: {e}"))),
        Ok(None) => Ok(0),
        Err(e) => Err(GatewayError::Migration(format!("read version: {e}"))),
    }
}
