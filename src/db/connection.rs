use rusqlite::Connection;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use crate::config::Config;
use crate::db::migrations::MigrationManager;

/// Database connection manager
pub struct DbConnection;

impl DbConnection {
    /// Get the default database path
    pub fn default_path() -> PathBuf {
        Config::config_dir().join("state.db")
    }

    /// Get database path from configuration or default
    pub fn resolve_path(config: &Config) -> PathBuf {
        config
            .data_location
            .clone()
            .unwrap_or_else(Self::default_path)
    }

    /// Connect to the configured database, creating it and parent directories if needed
    pub fn connect(config: &Config) -> Result<Connection> {
        Self::connect_at(&Self::resolve_path(config))
    }

    /// Connect to a database file at an explicit path
    pub fn connect_at(db_path: &Path) -> Result<Connection> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let conn = Connection::open(db_path)
            .with_context(|| format!("Failed to open database: {}", db_path.display()))?;

        MigrationManager::initialize(&conn)
            .context("Failed to initialize database schema")?;

        Ok(conn)
    }

    /// Connect to an in-memory database (for testing)
    pub fn connect_in_memory() -> Result<Connection> {
        let conn = Connection::open_in_memory()
            .context("Failed to open in-memory database")?;

        MigrationManager::initialize(&conn)
            .context("Failed to initialize database schema")?;

        Ok(conn)
    }
}
