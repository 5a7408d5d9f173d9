use crate::server::{ServerId, ServerStatus};
use crate::transport::OutputStream;
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::broadcast;

const DEFAULT_HISTORY: usize = 1000;

/// Milliseconds since the Unix epoch.
pub(crate) fn unix_millis(at: SystemTime) -> u64 {
    at.duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

/// Event type tag, as exposed to collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Status,
    Log,
    PlayerJoin,
    PlayerLeave,
    Tps,
    Error,
    Crash,
}

/// Why a crash event was raised.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum CrashSignal {
    /// The server printed its crash report banner. The process may still be
    /// alive; the exit code decides the status.
    ReportBanner,
    /// The process exited with a non-zero code outside a requested stop.
    Exit {
        exit_code: i32,
        crash_count: u32,
        /// Delay before the automatic restart, if one was scheduled.
        restart_in_ms: Option<u64>,
    },
}

/// Event payload; serialises as `{"type": ..., "data": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum EventPayload {
    Status {
        status: ServerStatus,
    },
    Log {
        line: String,
        stream: OutputStream,
    },
    PlayerJoin {
        username: String,
        player_count: usize,
    },
    PlayerLeave {
        username: String,
        player_count: usize,
    },
    Tps {
        tps: f64,
    },
    Error {
        message: String,
    },
    Crash(CrashSignal),
}

impl EventPayload {
    /// The type tag of this payload.
    pub fn kind(&self) -> EventKind {
        match self {
            EventPayload::Status { .. } => EventKind::Status,
            EventPayload::Log { .. } => EventKind::Log,
            EventPayload::PlayerJoin { .. } => EventKind::PlayerJoin,
            EventPayload::PlayerLeave { .. } => EventKind::PlayerLeave,
            EventPayload::Tps { .. } => EventKind::Tps,
            EventPayload::Error { .. } => EventKind::Error,
            EventPayload::Crash(_) => EventKind::Crash,
        }
    }
}

/// A single event published by a supervisor
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerEvent {
    /// Server the event belongs to
    pub server_id: ServerId,
    /// Event type and data
    #[serde(flatten)]
    pub payload: EventPayload,
    /// Unix timestamp in milliseconds
    pub timestamp: u64,
}

impl ServerEvent {
    /// Creates an event stamped with the current time.
    pub fn new(server_id: ServerId, payload: EventPayload) -> Self {
        Self {
            server_id,
            payload,
            timestamp: unix_millis(SystemTime::now()),
        }
    }

    /// The type tag of this event.
    pub fn kind(&self) -> EventKind {
        self.payload.kind()
    }
}

/// Consumer of supervisor events.
///
/// Each occurrence is delivered at most once. Implementations are called
/// from the supervisor's output readers and must not block for long.
///
/// Events of one server arrive in the order its state changed. While an
/// event is being delivered that server's transitions wait, so `emit` may
/// query the supervisor but must not call its commands.
pub trait EventSink: Send + Sync {
    /// Receives one event.
    fn emit(&self, event: ServerEvent);
}

/// Fans events out to any number of subscribers.
///
/// Subscribers that fall behind lose the oldest events; nothing is
/// replayed to late subscribers.
pub struct BroadcastSink {
    sender: broadcast::Sender<ServerEvent>,
}

impl BroadcastSink {
    /// Creates a sink buffering up to `capacity` undelivered events per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Get a new receiver for the broadcast channel
    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.sender.subscribe()
    }
}

impl EventSink for BroadcastSink {
    fn emit(&self, event: ServerEvent) {
        // No subscribers is fine.
        let _ = self.sender.send(event);
    }
}

/// In-memory event history with a bounded size.
///
/// Meant for audit views and tests; the oldest events are dropped once the
/// history is full.
pub struct EventLog {
    events: Mutex<VecDeque<ServerEvent>>,
    max_events: usize,
}

impl EventLog {
    /// Creates an event log keeping the last 1000 events.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY)
    }

    /// Creates an event log keeping the last `max_events` events.
    pub fn with_capacity(max_events: usize) -> Self {
        Self {
            events: Mutex::new(VecDeque::new()),
            max_events: max_events.max(1),
        }
    }

    fn events(&self) -> std::sync::MutexGuard<'_, VecDeque<ServerEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Events of one server, oldest first; `limit` keeps only the most recent.
    pub fn server_events(&self, id: &ServerId, limit: Option<usize>) -> Vec<ServerEvent> {
        let events = self.events();
        let mut matching: Vec<ServerEvent> =
            events.iter().filter(|e| &e.server_id == id).cloned().collect();

        if let Some(limit) = limit {
            let skip = matching.len().saturating_sub(limit);
            matching.drain(..skip);
        }

        matching
    }

    /// Events of one server and kind, oldest first.
    pub fn events_of_kind(&self, id: &ServerId, kind: EventKind) -> Vec<ServerEvent> {
        self.events()
            .iter()
            .filter(|e| &e.server_id == id && e.kind() == kind)
            .cloned()
            .collect()
    }

    /// The sequence of statuses a server has reported, oldest first.
    pub fn status_history(&self, id: &ServerId) -> Vec<ServerStatus> {
        self.events()
            .iter()
            .filter(|e| &e.server_id == id)
            .filter_map(|e| match e.payload {
                EventPayload::Status { status } => Some(status),
                _ => None,
            })
            .collect()
    }

    /// All recorded events, oldest first.
    pub fn all_events(&self) -> Vec<ServerEvent> {
        self.events().iter().cloned().collect()
    }

    /// Clear events
    pub fn clear(&self) {
        self.events().clear();
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for EventLog {
    fn emit(&self, event: ServerEvent) {
        let mut events = self.events();
        events.push_back(event);

        // Limit event history
        while events.len() > self.max_events {
            events.pop_front();
        }
    }
}
