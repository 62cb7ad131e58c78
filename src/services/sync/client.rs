use anyhow::{anyhow, Context, Result};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use chrono::NaiveDate;

use crate::models::event::Event;
use crate::models::participant::Participant;
use crate::models::slot::{SelectionSet, TimeSlot, MINUTES_PER_DAY};
use crate::services::heatmap::AvailabilityIndex;

/// Aggregate event state returned by `GET /api/events/{slug}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSnapshot {
    pub event: Event,
    pub participants: Vec<Participant>,
    /// date -> minutes-from-midnight -> participant ids
    #[serde(default)]
    pub availability: AvailabilityIndex,
    pub total_participants: usize,
}

/// Participant record returned by the join endpoint, including any
/// availability saved under the same name earlier.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinedParticipant {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub availabilities: Vec<AvailabilityRecord>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityRecord {
    pub date: NaiveDate,
    pub start_time: u16,
}

impl JoinedParticipant {
    /// Previously saved slots, dropping any record the service should
    /// not have produced.
    pub fn saved_slots(&self) -> SelectionSet {
        self.availabilities
            .iter()
            .filter(|record| record.start_time < MINUTES_PER_DAY)
            .map(|record| TimeSlot {
                date: record.date,
                time: record.start_time,
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct JoinResponse {
    participant: JoinedParticipant,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct JoinRequest<'a> {
    name: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AvailabilityPayload<'a> {
    participant_id: &'a str,
    slots: Vec<TimeSlot>,
}

/// Blocking HTTP client for the event service's data API.
///
/// Cheap to clone; clones share the underlying connection pool, so one
/// client can be handed to worker threads freely.
#[derive(Debug, Clone)]
pub struct EventApiClient {
    client: Client,
    base_url: String,
}

impl EventApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .context("Failed to build event service HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn event_url(&self, slug: &str) -> String {
        format!("{}/api/events/{}", self.base_url, urlencoding::encode(slug))
    }

    /// Fetch the event definition plus the aggregate availability of all
    /// participants.
    pub fn fetch_event(&self, slug: &str) -> Result<EventSnapshot> {
        let response = self
            .client
            .get(self.event_url(slug))
            .send()
            .context("Network error fetching event")?;

        match response.status() {
            StatusCode::OK => {}
            StatusCode::NOT_FOUND => return Err(anyhow!("Event '{}' was not found", slug)),
            status => return Err(anyhow!("Event fetch failed with HTTP status {}", status)),
        }

        let snapshot: EventSnapshot = response
            .json()
            .context("Malformed event response from the event service")?;

        snapshot
            .event
            .validate()
            .map_err(|reason| anyhow!("Event service returned an invalid event: {}", reason))?;

        Ok(snapshot)
    }

    /// Join the event (or resume the participant previously registered
    /// under the same name; the endpoint is idempotent by name).
    pub fn join(&self, slug: &str, name: &str) -> Result<JoinedParticipant> {
        let response = self
            .client
            .post(format!("{}/participants", self.event_url(slug)))
            .json(&JoinRequest { name })
            .send()
            .context("Network error joining event")?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("Join failed with HTTP status {}", status));
        }

        let body: JoinResponse = response
            .json()
            .context("Malformed join response from the event service")?;
        Ok(body.participant)
    }

    /// Full-replace write of one participant's selection. The service
    /// treats this as delete-all-then-insert, matching the engine's
    /// full-set emission model.
    pub fn put_availability(
        &self,
        slug: &str,
        participant_id: &str,
        slots: &SelectionSet,
    ) -> Result<()> {
        let payload = AvailabilityPayload {
            participant_id,
            slots: slots.iter().copied().collect(),
        };

        let response = self
            .client
            .put(format!("{}/availability", self.event_url(slug)))
            .json(&payload)
            .send()
            .context("Network error writing availability")?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!(
                "Availability write failed with HTTP status {}",
                status
            ));
        }
        Ok(())
    }
}
