//! Per-event participant session cache.
//!
//! The browser original kept `{id, name, slots}` in localStorage keyed
//! by event; here the same record lives in the local SQLite database so
//! reopening an event resumes the previous identity and selection.

use anyhow::{Context, Result};
use rusqlite::{params, OptionalExtension};

use crate::models::participant::ParticipantSession;
use crate::models::slot::TimeSlot;
use crate::services::database::Database;

pub struct SessionService<'a> {
    db: &'a Database,
}

impl<'a> SessionService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Load the cached session for an event, if any.
    pub fn get(&self, event_slug: &str) -> Result<Option<ParticipantSession>> {
        let row = self
            .db
            .connection()
            .query_row(
                "SELECT participant_id, name, slots
                 FROM participant_sessions WHERE event_slug = ?1",
                params![event_slug],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .optional()
            .context("Failed to load participant session")?;

        let Some((participant_id, name, slots_json)) = row else {
            return Ok(None);
        };

        let slots: Vec<TimeSlot> = serde_json::from_str(&slots_json)
            .context("Corrupt slots column in participant session")?;

        Ok(Some(ParticipantSession {
            participant_id,
            name,
            slots,
        }))
    }

    /// Insert or replace the cached session for an event.
    pub fn save(&self, event_slug: &str, session: &ParticipantSession) -> Result<()> {
        let slots_json =
            serde_json::to_string(&session.slots).context("Failed to serialize session slots")?;

        self.db
            .connection()
            .execute(
                "INSERT INTO participant_sessions (event_slug, participant_id, name, slots, updated_at)
                 VALUES (?1, ?2, ?3, ?4, CURRENT_TIMESTAMP)
                 ON CONFLICT(event_slug) DO UPDATE SET
                     participant_id = excluded.participant_id,
                     name = excluded.name,
                     slots = excluded.slots,
                     updated_at = CURRENT_TIMESTAMP",
                params![event_slug, session.participant_id, session.name, slots_json],
            )
            .context("Failed to save participant session")?;

        Ok(())
    }

    /// Drop the cached session for an event.
    pub fn clear(&self, event_slug: &str) -> Result<()> {
        self.db
            .connection()
            .execute(
                "DELETE FROM participant_sessions WHERE event_slug = ?1",
                params![event_slug],
            )
            .context("Failed to clear participant session")?;

        Ok(())
    }
}
