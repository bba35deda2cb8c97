use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result, anyhow};
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};

use crate::league::League;
use crate::model::TeamCandidate;
use crate::usage::UsageEvent;

/// Cached branding for a team outside the static registry.
#[derive(Debug, Clone, PartialEq)]
pub struct BrandingRow {
    pub team_key: String,
    pub sport: String,
    pub primary_hex: String,
    pub secondary_hex: String,
    pub primary_rgb: Option<String>,
    pub secondary_rgb: Option<String>,
    pub pantone: Option<String>,
    pub cmyk: Option<String>,
    pub abbreviation: Option<String>,
    pub logo_url: Option<String>,
    pub updated_at: String,
}

/// Relational store behind the branding cache, alias table and usage log.
pub trait PersistedStore: Send + Sync {
    fn branding(&self, team_key: &str, sport: &str) -> Result<Option<BrandingRow>>;
    fn upsert_branding(&self, row: &BrandingRow) -> Result<()>;
    fn alias(&self, alias_key: &str) -> Result<Option<TeamCandidate>>;
    fn upsert_alias(&self, alias_key: &str, team: &TeamCandidate) -> Result<()>;
    fn record_usage(&self, event: &UsageEvent) -> Result<()>;
}

/// Used when no database is configured: reads miss, writes vanish.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullStore;

impl PersistedStore for NullStore {
    fn branding(&self, _team_key: &str, _sport: &str) -> Result<Option<BrandingRow>> {
        Ok(None)
    }

    fn upsert_branding(&self, _row: &BrandingRow) -> Result<()> {
        Ok(())
    }

    fn alias(&self, _alias_key: &str) -> Result<Option<TeamCandidate>> {
        Ok(None)
    }

    fn upsert_alias(&self, _alias_key: &str, _team: &TeamCandidate) -> Result<()> {
        Ok(())
    }

    fn record_usage(&self, _event: &UsageEvent) -> Result<()> {
        Ok(())
    }
}

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let conn =
            Connection::open(path).with_context(|| format!("open sqlite db {}", path.display()))?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("open in-memory sqlite db")?;
        Self::from_connection(conn)
    }

    pub fn from_connection(conn: Connection) -> Result<Self> {
        init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| anyhow!("sqlite store lock poisoned"))
    }

    pub fn usage_rows(&self, user_id: &str) -> Result<Vec<UsageEvent>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                r#"
                SELECT user_id, operation_type, model_name, input_tokens,
                       output_tokens, search_queries, total_cost_usd
                FROM user_usage WHERE user_id = ?1 ORDER BY id
                "#,
            )
            .context("prepare usage query")?;
        let rows = stmt
            .query_map(params![user_id], |row| {
                Ok(UsageEvent {
                    user_id: row.get(0)?,
                    operation: row.get::<_, String>(1)?,
                    model_name: row.get(2)?,
                    input_tokens: row.get::<_, i64>(3)? as u64,
                    output_tokens: row.get::<_, i64>(4)? as u64,
                    search_queries: row.get::<_, i64>(5)? as u32,
                    total_cost_usd: row.get(6)?,
                })
            })
            .context("query usage rows")?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .context("read usage rows")
    }
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        PRAGMA journal_mode = WAL;
        CREATE TABLE IF NOT EXISTS team_branding (
            team_key TEXT NOT NULL,
            sport TEXT NOT NULL,
            primary_hex TEXT NOT NULL,
            secondary_hex TEXT NOT NULL,
            primary_rgb TEXT NULL,
            secondary_rgb TEXT NULL,
            pantone TEXT NULL,
            cmyk TEXT NULL,
            abbreviation TEXT NULL,
            logo_url TEXT NULL,
            updated_at TEXT NOT NULL,
            PRIMARY KEY (team_key, sport)
        );

        CREATE TABLE IF NOT EXISTS team_aliases (
            alias_key TEXT PRIMARY KEY,
            canonical_name TEXT NOT NULL,
            feed_id TEXT NULL,
            sport TEXT NOT NULL,
            league TEXT NULL,
            primary_color TEXT NOT NULL,
            secondary_color TEXT NOT NULL,
            logo_url TEXT NULL,
            abbreviation TEXT NULL
        );

        CREATE TABLE IF NOT EXISTS user_usage (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            operation_type TEXT NOT NULL,
            model_name TEXT NOT NULL,
            input_tokens INTEGER NOT NULL,
            output_tokens INTEGER NOT NULL,
            search_queries INTEGER NOT NULL,
            total_cost_usd REAL NOT NULL,
            created_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_user_usage_user ON user_usage(user_id);
        "#,
    )
    .context("create sqlite schema")?;
    Ok(())
}

impl PersistedStore for SqliteStore {
    fn branding(&self, team_key: &str, sport: &str) -> Result<Option<BrandingRow>> {
        let conn = self.conn()?;
        conn.query_row(
            r#"
            SELECT team_key, sport, primary_hex, secondary_hex, primary_rgb,
                   secondary_rgb, pantone, cmyk, abbreviation, logo_url, updated_at
            FROM team_branding WHERE team_key = ?1 AND sport = ?2
            "#,
            params![team_key, sport],
            |row| {
                Ok(BrandingRow {
                    team_key: row.get(0)?,
                    sport: row.get(1)?,
                    primary_hex: row.get(2)?,
                    secondary_hex: row.get(3)?,
                    primary_rgb: row.get(4)?,
                    secondary_rgb: row.get(5)?,
                    pantone: row.get(6)?,
                    cmyk: row.get(7)?,
                    abbreviation: row.get(8)?,
                    logo_url: row.get(9)?,
                    updated_at: row.get(10)?,
                })
            },
        )
        .optional()
        .context("query team branding")
    }

    fn upsert_branding(&self, row: &BrandingRow) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO team_branding (
                team_key, sport, primary_hex, secondary_hex, primary_rgb,
                secondary_rgb, pantone, cmyk, abbreviation, logo_url, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            ON CONFLICT(team_key, sport) DO UPDATE SET
                primary_hex = excluded.primary_hex,
                secondary_hex = excluded.secondary_hex,
                primary_rgb = excluded.primary_rgb,
                secondary_rgb = excluded.secondary_rgb,
                pantone = excluded.pantone,
                cmyk = excluded.cmyk,
                abbreviation = excluded.abbreviation,
                logo_url = excluded.logo_url,
                updated_at = excluded.updated_at
            "#,
            params![
                row.team_key,
                row.sport,
                row.primary_hex,
                row.secondary_hex,
                row.primary_rgb,
                row.secondary_rgb,
                row.pantone,
                row.cmyk,
                row.abbreviation,
                row.logo_url,
                row.updated_at,
            ],
        )
        .context("upsert team branding")?;
        Ok(())
    }

    fn alias(&self, alias_key: &str) -> Result<Option<TeamCandidate>> {
        let conn = self.conn()?;
        conn.query_row(
            r#"
            SELECT canonical_name, feed_id, sport, league, primary_color,
                   secondary_color, logo_url, abbreviation
            FROM team_aliases WHERE alias_key = ?1
            "#,
            params![alias_key],
            |row| {
                Ok(TeamCandidate {
                    name: row.get(0)?,
                    feed_id: row.get(1)?,
                    sport: row.get(2)?,
                    league: row
                        .get::<_, Option<String>>(3)?
                        .and_then(|code| League::from_hint(&code)),
                    primary_color: row.get(4)?,
                    secondary_color: row.get(5)?,
                    logo_url: row.get(6)?,
                    abbreviation: row.get(7)?,
                })
            },
        )
        .optional()
        .context("query team alias")
    }

    fn upsert_alias(&self, alias_key: &str, team: &TeamCandidate) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO team_aliases (
                alias_key, canonical_name, feed_id, sport, league,
                primary_color, secondary_color, logo_url, abbreviation
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ON CONFLICT(alias_key) DO UPDATE SET
                canonical_name = excluded.canonical_name,
                feed_id = excluded.feed_id,
                sport = excluded.sport,
                league = excluded.league,
                primary_color = excluded.primary_color,
                secondary_color = excluded.secondary_color,
                logo_url = excluded.logo_url,
                abbreviation = excluded.abbreviation
            "#,
            params![
                alias_key,
                team.name,
                team.feed_id,
                team.sport,
                team.league.map(League::code),
                team.primary_color,
                team.secondary_color,
                team.logo_url,
                team.abbreviation,
            ],
        )
        .context("upsert team alias")?;
        Ok(())
    }

    fn record_usage(&self, event: &UsageEvent) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO user_usage (
                user_id, operation_type, model_name, input_tokens,
                output_tokens, search_queries, total_cost_usd, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                event.user_id,
                event.operation,
                event.model_name,
                event.input_tokens as i64,
                event.output_tokens as i64,
                event.search_queries as i64,
                event.total_cost_usd,
                Utc::now().to_rfc3339(),
            ],
        )
        .context("insert usage row")?;
        Ok(())
    }
}
