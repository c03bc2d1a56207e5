use rusqlite::{Connection, OptionalExtension};
use anyhow::{Context, Result};

/// Key/value repository backing durable client state
pub struct KvRepo;

impl KvRepo {
    /// Get the raw value stored under `key`
    pub fn get(conn: &Connection, key: &str) -> Result<Option<String>> {
        let value = conn
            .query_row("SELECT value FROM kv_store WHERE key = ?1", [key], |row| row.get(0))
            .optional()
            .with_context(|| format!("Failed to read key: {}", key))?;
        Ok(value)
    }

    /// Insert or replace the value under `key`
    pub fn put(conn: &Connection, key: &str, value: &str) -> Result<()> {
        let now = chrono::Utc::now().timestamp();
        conn.execute(
            "INSERT INTO kv_store (key, value, modified_ts) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, modified_ts = excluded.modified_ts",
            rusqlite::params![key, value, now],
        )
        .with_context(|| format!("Failed to write key: {}", key))?;
        Ok(())
    }
}
