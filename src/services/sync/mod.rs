//! Persistence of one participant's availability to the event service.
//!
//! Commits are debounced and versioned locally ([`queue`]); the actual
//! HTTP traffic lives in [`client`] and runs on worker threads.

pub mod client;
pub mod queue;

pub use client::{EventApiClient, EventSnapshot, JoinedParticipant};
pub use queue::{OutboundWrite, Revision, SyncQueue, DEBOUNCE_WINDOW};
