/// Server management module for the game server supervisor.
///
/// This module owns the lifecycle of server processes: launching the
/// runtime, following the console, reacting to exits and restarting after
/// crashes. All public operations are instrumented with `tracing` spans.
///
/// # Components
///
/// * `supervisor` - The per-server state machine and its command surface
/// * `lifecycle` - Events published by supervisors and the sinks receiving them
/// * `recovery` - Crash counting, backoff and automatic restarts
/// * `process` - Identifiers, statuses and process spawning
///
/// # Examples
///
/// Supervising a server and recording its events:
///
/// ```no_run
/// use gameserver_supervisor::config::ServerConfig;
/// use gameserver_supervisor::runtime::JavaDiscovery;
/// use gameserver_supervisor::server::{EventLog, ServerSupervisor};
/// use std::sync::Arc;
///
/// # async fn run() -> gameserver_supervisor::Result<()> {
/// let events = Arc::new(EventLog::new());
/// let config = ServerConfig::new("survival", "/srv/minecraft/survival");
/// let supervisor = ServerSupervisor::new(config, events.clone(), Arc::new(JavaDiscovery::new()))?;
///
/// supervisor.start().await?;
/// supervisor.send_command("say Back online").await?;
/// supervisor.stop().await?;
///
/// println!("{:?}", events.status_history(supervisor.id()));
/// # Ok(())
/// # }
/// ```
pub mod lifecycle;
mod logs;
mod process;
pub mod recovery;
mod state;
mod supervisor;

pub use lifecycle::{
    BroadcastSink, CrashSignal, EventKind, EventLog, EventPayload, EventSink, ServerEvent,
};
pub use process::{ServerId, ServerStatus};
pub use recovery::{CrashRecovery, RecoveryConfig, RecoveryDecision};
pub use state::{NOMINAL_TPS, PlayerInfo, PlayerSnapshot, ServerSnapshot};
pub use supervisor::{ServerSupervisor, SupervisorBuilder, SupervisorOptions};
