use crate::config::ServerConfig;
use crate::server::lifecycle::unix_millis;
use crate::server::logs::LogBuffer;
use crate::server::recovery::{CrashRecovery, RecoveryConfig};
use crate::server::{ServerId, ServerStatus};
use crate::transport::ConsoleInput;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};
use tokio::sync::{oneshot, watch};

/// TPS reported before the server has published a sample.
pub const NOMINAL_TPS: f64 = 20.0;

/// A player currently online.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerInfo {
    /// Account UUID, once the server has reported it.
    pub uuid: Option<String>,
    /// When the join line was seen.
    pub joined_at: SystemTime,
}

/// Serializable view of one online player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSnapshot {
    pub name: String,
    pub uuid: Option<String>,
    pub joined_at: u64,
}

/// Point-in-time view of a managed server.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerSnapshot {
    pub id: ServerId,
    pub status: ServerStatus,
    pub pid: Option<u32>,
    /// Unix milliseconds of the transition into running.
    pub started_at: Option<u64>,
    pub uptime_secs: Option<u64>,
    pub players: Vec<PlayerSnapshot>,
    pub tps: f64,
    pub crash_count: u32,
}

/// The live child of a server and the handles to reach it.
pub(crate) struct ChildSlot {
    /// Distinguishes this child from earlier ones of the same server.
    pub(crate) generation: u64,
    pub(crate) pid: u32,
    pub(crate) console: Option<Arc<ConsoleInput>>,
    /// Asks the waiter task to kill the child. Dropping it has the same effect.
    pub(crate) kill_tx: Option<oneshot::Sender<()>>,
    /// Flips to `true` once the child has exited and its exit was handled.
    pub(crate) exit_rx: watch::Receiver<bool>,
}

/// Mutable state of one managed server, guarded by the supervisor's lock.
pub(crate) struct ServerState {
    pub(crate) config: ServerConfig,
    pub(crate) status: ServerStatus,
    pub(crate) started_at: Option<SystemTime>,
    pub(crate) started_instant: Option<Instant>,
    pub(crate) players: BTreeMap<String, PlayerInfo>,
    /// UUIDs reported before the matching join line.
    pub(crate) pending_uuids: HashMap<String, String>,
    pub(crate) tps: f64,
    pub(crate) logs: LogBuffer,
    pub(crate) recovery: CrashRecovery,
    pub(crate) graceful_stop: bool,
    /// A `start()` is between its checks and installing the child.
    pub(crate) launching: bool,
    pub(crate) disposed: bool,
    pub(crate) child: Option<ChildSlot>,
    /// Exit signal of a killed child that may not have been reaped yet.
    pub(crate) reaping: Option<watch::Receiver<bool>>,
    pub(crate) next_generation: u64,
}

impl ServerState {
    pub(crate) fn new(config: ServerConfig, recovery: RecoveryConfig) -> Self {
        let logs = LogBuffer::new(config.log_buffer_lines);
        Self {
            config,
            status: ServerStatus::Stopped,
            started_at: None,
            started_instant: None,
            players: BTreeMap::new(),
            pending_uuids: HashMap::new(),
            tps: NOMINAL_TPS,
            logs,
            recovery: CrashRecovery::new(recovery),
            graceful_stop: false,
            launching: false,
            disposed: false,
            child: None,
            reaping: None,
            next_generation: 1,
        }
    }

    pub(crate) fn pid(&self) -> Option<u32> {
        self.child.as_ref().map(|c| c.pid)
    }

    pub(crate) fn is_current(&self, generation: u64) -> bool {
        self.child
            .as_ref()
            .is_some_and(|c| c.generation == generation)
    }

    /// Forgets everything tied to the process that just went away.
    pub(crate) fn clear_process_state(&mut self) {
        self.child = None;
        self.clear_players();
        self.started_at = None;
        self.started_instant = None;
    }

    pub(crate) fn clear_players(&mut self) {
        self.players.clear();
        self.pending_uuids.clear();
    }

    /// The exit signal of a killed child that is still being reaped.
    pub(crate) fn unreaped(&self) -> Option<watch::Receiver<bool>> {
        self.reaping.as_ref().filter(|exit_rx| !*exit_rx.borrow()).cloned()
    }

    pub(crate) fn uptime(&self) -> Option<Duration> {
        match self.status {
            ServerStatus::Running | ServerStatus::Stopping => {
                self.started_instant.map(|at| at.elapsed())
            }
            _ => None,
        }
    }

    pub(crate) fn snapshot(&self, id: &ServerId) -> ServerSnapshot {
        ServerSnapshot {
            id: id.clone(),
            status: self.status,
            pid: self.pid(),
            started_at: self.started_at.map(unix_millis),
            uptime_secs: self.uptime().map(|d| d.as_secs()),
            players: self
                .players
                .iter()
                .map(|(name, info)| PlayerSnapshot {
                    name: name.clone(),
                    uuid: info.uuid.clone(),
                    joined_at: unix_millis(info.joined_at),
                })
                .collect(),
            tps: self.tps,
            crash_count: self.recovery.crash_count(),
        }
    }
}
