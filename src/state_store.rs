//! # Conversation State Store
//!
//! In-memory, per-participant conversation state. Entries are created lazily
//! as [`Phase::Idle`] and are never removed, only reset. A non-idle entry
//! older than the configured TTL is reset on its next access, and that
//! access reports the phase that expired.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::debug;

use crate::dialogue::{ConversationState, ParticipantId, Phase};

/// Default lifetime of a pending question or reply: one day
pub const DEFAULT_STATE_TTL_SECS: i64 = 24 * 60 * 60;

/// State of one participant as seen by a single access
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub state: ConversationState,
    /// Phase that timed out during this access, if any
    pub expired: Option<Phase>,
}

#[derive(Debug)]
pub struct ConversationStore {
    states: Mutex<HashMap<ParticipantId, ConversationState>>,
    ttl: Option<Duration>,
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new(Some(Duration::seconds(DEFAULT_STATE_TTL_SECS)))
    }
}

impl ConversationStore {
    /// Create a store. `None` keeps waiting states forever.
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            states: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Current state of `id`, creating an idle entry on first access.
    pub async fn get(&self, id: ParticipantId) -> ConversationState {
        self.snapshot(id).await.state
    }

    /// Like [`get`](Self::get), but also reports a phase that expired.
    pub async fn snapshot(&self, id: ParticipantId) -> Snapshot {
        self.update_at(id, Utc::now(), |_| {}).await
    }

    /// Set the phase of `id` and stamp it with the current time.
    pub async fn set(&self, id: ParticipantId, phase: Phase) {
        self.update(id, |state| {
            state.phase = phase;
            state.touched_at = Utc::now();
        })
        .await;
    }

    /// Return `id` to idle, dropping any correlation.
    pub async fn reset(&self, id: ParticipantId) {
        self.set(id, Phase::Idle).await;
    }

    /// Atomic read-modify-write of one participant's state.
    ///
    /// Expired entries are reset before `f` sees them. The timestamp is
    /// refreshed only when `f` changes the phase.
    pub async fn update<F>(&self, id: ParticipantId, f: F) -> Snapshot
    where
        F: FnOnce(&mut ConversationState),
    {
        self.update_at(id, Utc::now(), f).await
    }

    /// [`update`](Self::update) with an explicit clock reading.
    pub async fn update_at<F>(&self, id: ParticipantId, now: DateTime<Utc>, f: F) -> Snapshot
    where
        F: FnOnce(&mut ConversationState),
    {
        let mut states = self.states.lock().await;
        let state = states
            .entry(id)
            .or_insert_with(|| ConversationState::idle(now));

        let mut expired = None;
        if state.is_expired(now, self.ttl) {
            debug!(user_id = %id, phase = ?state.phase, "Conversation state expired, resetting");
            expired = Some(state.phase);
            *state = ConversationState::idle(now);
        }

        let before = state.phase;
        f(state);
        if state.phase != before {
            state.touched_at = now;
        }
        Snapshot {
            state: state.clone(),
            expired,
        }
    }

    /// Number of participants seen so far
    pub async fn len(&self) -> usize {
        self.states.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
