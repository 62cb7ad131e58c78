use anyhow::{Context, Result};
use rusqlite::Connection;

use super::schema;

/// Thin wrapper around the client's SQLite connection.
///
/// The database is a local cache only: persisted UI settings plus the
/// per-event participant sessions that let a returning user resume
/// without re-joining.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the database at `path` (`":memory:"` works for
    /// tests) with foreign keys enabled.
    pub fn new(path: &str) -> Result<Self> {
        let conn =
            Connection::open(path).context(format!("Failed to open database at {}", path))?;

        conn.execute("PRAGMA foreign_keys = ON", [])
            .context("Failed to enable foreign keys")?;

        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Create tables and seed the default settings row.
    pub fn initialize_schema(&self) -> Result<()> {
        schema::initialize_schema(self.connection())
    }
}
