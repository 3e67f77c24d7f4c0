use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{Connection, params};
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct GameDocument<'a> {
    pub game_id: &'a str,
    pub season_id: &'a str,
    pub payload: &'a Value,
}

pub trait DocumentSink {
    fn persist(&mut self, doc: &GameDocument<'_>) -> Result<()>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DocumentSink for NullSink {
    fn persist(&mut self, _doc: &GameDocument<'_>) -> Result<()> {
        Ok(())
    }
}

pub struct SqliteSink {
    conn: Connection,
}

impl SqliteSink {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let conn =
            Connection::open(path).with_context(|| format!("open sqlite db {}", path.display()))?;
        Self::with_connection(conn)
    }

    pub fn with_connection(conn: Connection) -> Result<Self> {
        init_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn stored_payload(&self, game_id: &str) -> Result<Option<Value>> {
        let mut stmt = self
            .conn
            .prepare("SELECT payload FROM games WHERE game_id = ?1")
            .context("prepare payload lookup")?;
        let mut rows = stmt.query(params![game_id]).context("query payload")?;
        let Some(row) = rows.next().context("read payload row")? else {
            return Ok(None);
        };
        let raw: String = row.get(0).context("decode payload column")?;
        let value = serde_json::from_str(&raw).context("invalid stored payload json")?;
        Ok(Some(value))
    }

    pub fn count(&self) -> Result<usize> {
        let n = self
            .conn
            .query_row("SELECT COUNT(*) FROM games", [], |row| row.get::<_, i64>(0))
            .context("count stored games")?;
        Ok(usize::try_from(n).unwrap_or_default())
    }
}

impl DocumentSink for SqliteSink {
    fn persist(&mut self, doc: &GameDocument<'_>) -> Result<()> {
        let payload = serde_json::to_string(doc.payload).context("serialize game payload")?;
        self.conn
            .execute(
                r#"
                INSERT INTO games (game_id, season_id, payload, stored_at)
                VALUES (?1, ?2, ?3, ?4)
                ON CONFLICT(game_id) DO UPDATE SET
                    season_id = excluded.season_id,
                    payload = excluded.payload,
                    stored_at = excluded.stored_at
                "#,
                params![doc.game_id, doc.season_id, payload, Utc::now().to_rfc3339()],
            )
            .context("upsert game document")?;
        Ok(())
    }
}

fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS games (
            game_id TEXT PRIMARY KEY,
            season_id TEXT NOT NULL,
            payload TEXT NOT NULL,
            stored_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_games_season ON games(season_id);
        "#,
    )
    .context("create sqlite schema")?;
    Ok(())
}
