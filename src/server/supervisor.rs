// src/server/supervisor.rs
use crate::classifier::{LogClassifier, LogEvent};
use crate::config::{ServerConfig, validate_server_config};
use crate::error::{Error, Result};
use crate::launch::{accept_eula, jvm_args_for};
use crate::runtime::{RuntimeResolver, resolve_runtime};
use crate::server::lifecycle::{CrashSignal, EventPayload, EventSink, ServerEvent};
use crate::server::process::spawn_server_process;
use crate::server::recovery::{RecoveryConfig, RecoveryDecision};
use crate::server::state::{ChildSlot, NOMINAL_TPS, PlayerInfo, ServerSnapshot, ServerState};
use crate::server::{ServerId, ServerStatus};
use crate::transport::{ConsoleInput, OutputStream, spawn_line_reader};
use std::collections::BTreeMap;
use std::process::ExitStatus;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::{Duration, Instant, SystemTime};
use tokio::sync::{oneshot, watch};

/// Timing knobs of a supervisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupervisorOptions {
    /// How long `stop()` waits for a clean shutdown before killing.
    pub stop_grace: Duration,
    /// Pause between the stop and the start of `restart()`.
    pub restart_settle: Duration,
    /// How long the exit handler waits for buffered output to be read.
    pub reader_drain: Duration,
    /// How long to wait for a killed process to be reaped.
    pub kill_wait: Duration,
    /// Crash recovery tuning.
    pub recovery: RecoveryConfig,
}

impl Default for SupervisorOptions {
    fn default() -> Self {
        Self {
            stop_grace: Duration::from_secs(30),
            restart_settle: Duration::from_secs(2),
            reader_drain: Duration::from_secs(2),
            kill_wait: Duration::from_secs(10),
            recovery: RecoveryConfig::default(),
        }
    }
}

/// Builder for [`ServerSupervisor`] with optional timing and classifier overrides.
pub struct SupervisorBuilder {
    config: ServerConfig,
    sink: Arc<dyn EventSink>,
    resolver: Arc<dyn RuntimeResolver>,
    options: SupervisorOptions,
    classifier: Option<Arc<LogClassifier>>,
}

impl SupervisorBuilder {
    /// Overrides the default timings.
    pub fn options(mut self, options: SupervisorOptions) -> Self {
        self.options = options;
        self
    }

    /// Uses a custom rule table instead of the default one.
    pub fn classifier(mut self, classifier: Arc<LogClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Validates the configuration and creates the supervisor.
    pub fn build(self) -> Result<ServerSupervisor> {
        validate_server_config(&self.config)?;

        let id = self.config.id.clone();
        let (status_tx, _) = watch::channel(ServerStatus::Stopped);
        let state = ServerState::new(self.config, self.options.recovery);

        Ok(ServerSupervisor {
            inner: Arc::new(Inner {
                id,
                options: self.options,
                sink: self.sink,
                resolver: self.resolver,
                classifier: self.classifier.unwrap_or_default(),
                status_tx,
                emit_order: Mutex::new(()),
                state: Mutex::new(state),
            }),
        })
    }
}

/// Owns the process of one game server and drives its lifecycle.
///
/// Cloning is cheap; clones control the same server. Dropping the last
/// clone kills the child and cancels every timer.
///
/// All public methods are instrumented with `tracing` spans.
#[derive(Clone)]
pub struct ServerSupervisor {
    inner: Arc<Inner>,
}

struct Inner {
    id: ServerId,
    options: SupervisorOptions,
    sink: Arc<dyn EventSink>,
    resolver: Arc<dyn RuntimeResolver>,
    classifier: Arc<LogClassifier>,
    status_tx: watch::Sender<ServerStatus>,
    /// Taken before `state` so events leave in the order the state changed.
    emit_order: Mutex<()>,
    state: Mutex<ServerState>,
}

/// Clears the in-flight flag however `start()` returns.
struct LaunchGuard<'a>(&'a Inner);

impl Drop for LaunchGuard<'_> {
    fn drop(&mut self) {
        self.0.lock().launching = false;
    }
}

async fn wait_exited(mut exit_rx: watch::Receiver<bool>) {
    // A dropped sender also means the waiter is gone.
    let _ = exit_rx.wait_for(|exited| *exited).await;
}

impl ServerSupervisor {
    /// Creates a supervisor with default timings and classifier.
    pub fn new(
        config: ServerConfig,
        sink: Arc<dyn EventSink>,
        resolver: Arc<dyn RuntimeResolver>,
    ) -> Result<Self> {
        Self::builder(config, sink, resolver).build()
    }

    /// Starts building a supervisor.
    pub fn builder(
        config: ServerConfig,
        sink: Arc<dyn EventSink>,
        resolver: Arc<dyn RuntimeResolver>,
    ) -> SupervisorBuilder {
        SupervisorBuilder {
            config,
            sink,
            resolver,
            options: SupervisorOptions::default(),
            classifier: None,
        }
    }

    /// Get the server ID
    pub fn id(&self) -> &ServerId {
        &self.inner.id
    }

    /// Get the server status
    pub fn status(&self) -> ServerStatus {
        self.inner.lock().status
    }

    /// Watches status changes without going through the event sink.
    pub fn subscribe_status(&self) -> watch::Receiver<ServerStatus> {
        self.inner.status_tx.subscribe()
    }

    /// OS process id of the live child.
    pub fn pid(&self) -> Option<u32> {
        self.inner.lock().pid()
    }

    /// Launches the server.
    ///
    /// Returns once the process is spawned; readiness is reported later
    /// through a `running` status event. Cancels a pending automatic
    /// restart.
    ///
    /// # Errors
    ///
    /// - [`Error::AlreadyRunning`] if a process exists or another start is in flight
    /// - [`Error::ConfigValidation`] if the working directory or artifact is missing
    /// - [`Error::Process`] if the runtime could not be launched
    /// - [`Error::Disposed`] after [`dispose`](Self::dispose)
    #[tracing::instrument(skip(self), fields(server_id = %self.id()))]
    pub async fn start(&self) -> Result<()> {
        self.inner.start(true).await
    }

    /// Asks the server to shut down and waits for the process to exit.
    ///
    /// Sends the configured stop command, then kills the process if it is
    /// still alive after the grace period. A slow shutdown is not an error.
    #[tracing::instrument(skip(self), fields(server_id = %self.id()))]
    pub async fn stop(&self) -> Result<()> {
        let inner = &self.inner;
        let (console, exit_rx, generation, stop_command) = inner.transition(|state, events| {
            if state.recovery.cancel_pending_restart() {
                tracing::debug!("Cancelled pending automatic restart");
            }

            if !matches!(state.status, ServerStatus::Starting | ServerStatus::Running) {
                return Err(Error::NotRunning);
            }
            let Some(slot) = state.child.as_ref() else {
                return Err(Error::NotRunning);
            };
            let console = slot.console.clone();
            let exit_rx = slot.exit_rx.clone();
            let generation = slot.generation;

            state.graceful_stop = true;
            // Nobody is online once the server is going down
            state.clear_players();
            events.extend(inner.set_status(state, ServerStatus::Stopping));
            Ok((console, exit_rx, generation, state.config.stop_command.clone()))
        })?;

        tracing::info!(command = %stop_command, "Requesting graceful shutdown");
        let sent = match console {
            Some(console) => match console.write_line(&stop_command).await {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to send stop command");
                    false
                }
            },
            None => false,
        };

        if sent {
            let grace = inner.options.stop_grace;
            if tokio::time::timeout(grace, wait_exited(exit_rx.clone()))
                .await
                .is_ok()
            {
                tracing::info!("Server stopped");
                return Ok(());
            }
            tracing::warn!(grace_secs = grace.as_secs(), "Server did not stop in time, killing");
        }

        inner.request_kill(generation);
        if tokio::time::timeout(inner.options.kill_wait, wait_exited(exit_rx))
            .await
            .is_err()
        {
            tracing::error!("Killed server process has not exited");
        }

        Ok(())
    }

    /// Stops the server if it is up, waits the settle delay, then starts it.
    ///
    /// A failed stop prevents the start.
    #[tracing::instrument(skip(self), fields(server_id = %self.id()))]
    pub async fn restart(&self) -> Result<()> {
        if matches!(
            self.status(),
            ServerStatus::Starting | ServerStatus::Running
        ) {
            self.stop().await?;
            tokio::time::sleep(self.inner.options.restart_settle).await;
        }

        self.inner.start(true).await
    }

    /// Kills the process immediately.
    ///
    /// Bookkeeping happens before returning: the pid and players are
    /// cleared and the status is `stopped`, whatever it was. Cancels a
    /// pending automatic restart.
    #[tracing::instrument(skip(self), fields(server_id = %self.id()))]
    pub fn kill(&self) {
        self.inner.kill();
    }

    /// Writes one command line to the server console.
    ///
    /// # Errors
    ///
    /// [`Error::NotWritable`] if no process is alive or its input is closed.
    #[tracing::instrument(skip(self), fields(server_id = %self.id()))]
    pub async fn send_command(&self, command: &str) -> Result<()> {
        let console = self
            .inner
            .lock()
            .child
            .as_ref()
            .and_then(|slot| slot.console.clone());

        match console {
            Some(console) => console.write_line(command).await,
            None => Err(Error::NotWritable(format!(
                "Server {} has no live process",
                self.id()
            ))),
        }
    }

    /// Shuts the supervisor down for good.
    ///
    /// Cancels all timers, kills the process and waits briefly for it to be
    /// reaped. Later calls to `start()` fail with [`Error::Disposed`].
    #[tracing::instrument(skip(self), fields(server_id = %self.id()))]
    pub async fn dispose(&self) {
        let exit_rx = {
            let mut state = self.inner.lock();
            state.disposed = true;
            state.recovery.cancel_all();
            state.child.as_ref().map(|slot| slot.exit_rx.clone())
        };

        self.inner.kill();

        if let Some(exit_rx) = exit_rx {
            let _ = tokio::time::timeout(self.inner.options.kill_wait, wait_exited(exit_rx)).await;
        }
        tracing::debug!("Supervisor disposed");
    }

    /// Up to `count` most recent console lines, oldest first.
    pub fn get_logs(&self, count: usize) -> Vec<String> {
        self.inner.lock().logs.recent(count)
    }

    /// Time since the server became ready, while it is up.
    pub fn get_uptime(&self) -> Option<Duration> {
        self.inner.lock().uptime()
    }

    pub fn get_player_count(&self) -> usize {
        self.inner.lock().players.len()
    }

    /// Players currently online, by name.
    pub fn players(&self) -> BTreeMap<String, PlayerInfo> {
        self.inner.lock().players.clone()
    }

    /// Last reported ticks per second.
    pub fn tps(&self) -> f64 {
        self.inner.lock().tps
    }

    pub fn crash_count(&self) -> u32 {
        self.inner.lock().recovery.crash_count()
    }

    /// Whether an automatic restart is scheduled.
    pub fn has_pending_restart(&self) -> bool {
        self.inner.lock().recovery.has_pending_restart()
    }

    pub fn get_config(&self) -> ServerConfig {
        self.inner.lock().config.clone()
    }

    /// Replaces the configuration used by the next start.
    ///
    /// # Errors
    ///
    /// [`Error::ConfigInvalid`] if the configuration does not validate or
    /// names a different server.
    #[tracing::instrument(skip(self, config), fields(server_id = %self.id()))]
    pub fn update_config(&self, config: ServerConfig) -> Result<()> {
        validate_server_config(&config)?;
        if config.id != self.inner.id {
            return Err(Error::ConfigInvalid(format!(
                "Cannot change server id from {} to {}",
                self.inner.id, config.id
            )));
        }

        let mut state = self.inner.lock();
        state.logs.set_max_lines(config.log_buffer_lines);
        state.config = config;
        tracing::debug!("Configuration updated");
        Ok(())
    }

    /// Point-in-time view of the server.
    pub fn snapshot(&self) -> ServerSnapshot {
        self.inner.lock().snapshot(&self.inner.id)
    }
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, ServerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `f` under the state lock and emits what it collected.
    ///
    /// Emission happens after the state lock is released but before any
    /// other transition can emit, so subscribers see events in state order.
    fn transition<T>(&self, f: impl FnOnce(&mut ServerState, &mut Vec<EventPayload>) -> T) -> T {
        let _order = self.emit_order.lock().unwrap_or_else(PoisonError::into_inner);
        let mut events = Vec::new();
        let result = {
            let mut state = self.lock();
            f(&mut *state, &mut events)
        };
        for payload in events {
            self.sink.emit(ServerEvent::new(self.id.clone(), payload));
        }
        result
    }

    /// Emits an event that carries no state change.
    fn emit(&self, payload: EventPayload) {
        self.transition(|_, events| events.push(payload));
    }

    /// Moves to `status`, returning the event to emit once the lock is released.
    fn set_status(&self, state: &mut ServerState, status: ServerStatus) -> Vec<EventPayload> {
        if state.status == status {
            return Vec::new();
        }
        tracing::debug!(from = %state.status, to = %status, "Status change");
        state.status = status;
        self.status_tx.send_replace(status);
        vec![EventPayload::Status { status }]
    }

    async fn start(self: &Arc<Self>, manual: bool) -> Result<()> {
        let (config, unreaped) = {
            let mut guard = self.lock();
            let state = &mut *guard;
            if state.disposed {
                return Err(Error::Disposed);
            }
            if state.launching || state.status.has_process() {
                return Err(Error::AlreadyRunning);
            }
            if manual && state.recovery.cancel_pending_restart() {
                tracing::debug!("Manual start cancelled pending automatic restart");
            }
            state.launching = true;
            (state.config.clone(), state.unreaped())
        };
        let _launching = LaunchGuard(self.as_ref());

        // A killed child may still hold the world directory
        if let Some(exit_rx) = unreaped {
            tracing::debug!("Waiting for the killed process to exit");
            if tokio::time::timeout(self.options.kill_wait, wait_exited(exit_rx))
                .await
                .is_err()
            {
                tracing::error!("Killed server process has not exited, refusing to start");
                return Err(Error::AlreadyRunning);
            }
        }

        if let Err(e) = check_server_files(&config) {
            tracing::error!(error = %e, "Server files are not launchable");
            self.emit(EventPayload::Error {
                message: e.to_string(),
            });
            return Err(e);
        }

        let resolver = Arc::clone(&self.resolver);
        let configured = config.runtime_path.clone();
        let runtime = tokio::task::spawn_blocking(move || {
            resolve_runtime(&configured, resolver.as_ref())
        })
        .await
        .map_err(|e| Error::Other(format!("Runtime resolution task failed: {}", e)))?;

        if config.accept_eula {
            accept_eula(&config.working_directory)?;
        }

        let args = jvm_args_for(&config);
        tracing::info!(runtime = %runtime, args = ?args, "Launching server");

        let mut child = match spawn_server_process(&runtime, &args, &config) {
            Ok(child) => child,
            Err(e) => {
                tracing::error!(error = %e, "Failed to spawn server process");
                self.transition(|state, events| {
                    events.push(EventPayload::Error {
                        message: e.to_string(),
                    });
                    state.clear_process_state();
                    events.extend(self.set_status(state, ServerStatus::Crashed));
                });
                return Err(e);
            }
        };

        let pid = child.id();
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let console = child
            .stdin
            .take()
            .map(|stdin| Arc::new(ConsoleInput::new(self.id.to_string(), stdin)));
        let (kill_tx, kill_rx) = oneshot::channel();
        let (exit_tx, exit_rx) = watch::channel(false);

        let installed = self.transition(|state, events| {
            if state.disposed {
                return None;
            }

            let generation = state.next_generation;
            state.next_generation += 1;
            state.clear_process_state();
            state.reaping = None;
            state.child = Some(ChildSlot {
                generation,
                pid,
                console,
                kill_tx: Some(kill_tx),
                exit_rx,
            });
            state.tps = NOMINAL_TPS;
            state.graceful_stop = false;
            let max_lines = state.config.log_buffer_lines;
            state.logs.set_max_lines(max_lines);
            events.extend(self.set_status(state, ServerStatus::Starting));
            Some(generation)
        });
        let Some(generation) = installed else {
            if let Err(e) = child.kill() {
                tracing::debug!(error = %e, "Failed to kill process launched during dispose");
            }
            return Err(Error::Disposed);
        };
        tracing::info!(pid, "Server process started");

        let mut readers = Vec::with_capacity(2);
        if let Some(stdout) = stdout {
            readers.push(self.spawn_reader(stdout, OutputStream::Stdout, generation));
        }
        if let Some(stderr) = stderr {
            readers.push(self.spawn_reader(stderr, OutputStream::Stderr, generation));
        }

        let weak = Arc::downgrade(self);
        let drain = self.options.reader_drain;
        tokio::spawn(async move {
            let result = tokio::select! {
                status = child.status() => status,
                _ = kill_rx => {
                    if let Err(e) = child.kill() {
                        tracing::debug!(pid, error = %e, "Kill failed, process may have exited");
                    }
                    child.status().await
                }
            };

            let drained = tokio::time::timeout(drain, async {
                for reader in readers {
                    let _ = reader.await;
                }
            })
            .await;
            if drained.is_err() {
                tracing::debug!(pid, "Output readers still open after exit");
            }

            if let Some(inner) = weak.upgrade() {
                inner.handle_exit(generation, result);
            }
            exit_tx.send_replace(true);
        });

        Ok(())
    }

    fn spawn_reader<R>(
        self: &Arc<Self>,
        reader: R,
        stream: OutputStream,
        generation: u64,
    ) -> tokio::task::JoinHandle<()>
    where
        R: futures_lite::io::AsyncRead + Unpin + Send + 'static,
    {
        let weak: Weak<Inner> = Arc::downgrade(self);
        spawn_line_reader(reader, stream, move |line| {
            if let Some(inner) = weak.upgrade() {
                inner.handle_line(generation, stream, line);
            }
        })
    }

    fn handle_line(&self, generation: u64, stream: OutputStream, line: String) {
        let classified = self.classifier.classify(&line);
        let line = match stream {
            OutputStream::Stdout => line,
            OutputStream::Stderr => format!("[stderr] {}", line),
        };

        self.transition(|state, events| {
            // Output of a killed or replaced process
            if !state.is_current(generation) {
                tracing::trace!(generation, line = %line, "Dropping output of a replaced process");
                return;
            }

            state.logs.push_line(line.clone());
            events.push(EventPayload::Log { line, stream });
            if let Some(classified) = classified {
                self.apply_log_event(state, classified, events);
            }
        });
    }

    fn apply_log_event(
        &self,
        state: &mut ServerState,
        event: LogEvent,
        events: &mut Vec<EventPayload>,
    ) {
        match event {
            LogEvent::Ready => {
                if state.status == ServerStatus::Starting {
                    state.started_at = Some(SystemTime::now());
                    state.started_instant = Some(Instant::now());
                    events.extend(self.set_status(state, ServerStatus::Running));
                    tracing::info!("Server is ready");
                }
            }
            LogEvent::PlayerJoin { username } => {
                if state.status == ServerStatus::Running {
                    let uuid = state.pending_uuids.remove(&username);
                    state.players.insert(
                        username.clone(),
                        PlayerInfo {
                            uuid,
                            joined_at: SystemTime::now(),
                        },
                    );
                }
                tracing::debug!(player = %username, "Player joined");
                events.push(EventPayload::PlayerJoin {
                    username,
                    player_count: state.players.len(),
                });
            }
            LogEvent::PlayerLeave { username } => {
                state.players.remove(&username);
                state.pending_uuids.remove(&username);
                tracing::debug!(player = %username, "Player left");
                events.push(EventPayload::PlayerLeave {
                    username,
                    player_count: state.players.len(),
                });
            }
            LogEvent::PlayerUuid { username, uuid } => match state.players.get_mut(&username) {
                Some(player) => player.uuid = Some(uuid),
                None => {
                    state.pending_uuids.insert(username, uuid);
                }
            },
            LogEvent::TpsReport { tps } => {
                state.tps = tps;
                events.push(EventPayload::Tps { tps });
            }
            LogEvent::CrashMarker => {
                tracing::warn!("Server printed a crash report");
                events.push(EventPayload::Crash(CrashSignal::ReportBanner));
            }
        }
    }

    fn handle_exit(self: &Arc<Self>, generation: u64, result: std::io::Result<ExitStatus>) {
        self.transition(|state, events| {
            if !state.is_current(generation) {
                tracing::debug!(generation, "Ignoring exit of a replaced process");
                return;
            }

            state.clear_process_state();
            let graceful = std::mem::take(&mut state.graceful_stop);

            match result {
                Err(e) => {
                    tracing::error!(error = %e, "Failed to wait for server process");
                    events.push(EventPayload::Error {
                        message: format!("Failed to wait for server process: {}", e),
                    });
                    events.extend(self.set_status(state, ServerStatus::Crashed));
                }
                Ok(_) if graceful => {
                    tracing::info!("Server exited after stop request");
                    events.extend(self.set_status(state, ServerStatus::Stopped));
                }
                Ok(status) => match status.code().filter(|code| *code != 0) {
                    Some(exit_code) => {
                        tracing::warn!(exit_code, "Server crashed");
                        events.extend(self.set_status(state, ServerStatus::Crashed));
                        self.recover(state, exit_code, events);
                    }
                    None => {
                        tracing::info!(exit_status = %status, "Server exited");
                        events.extend(self.set_status(state, ServerStatus::Stopped));
                    }
                },
            }
        });
    }

    fn recover(self: &Arc<Self>, state: &mut ServerState, exit_code: i32, events: &mut Vec<EventPayload>) {
        let decision = if state.disposed {
            RecoveryDecision::Disabled
        } else {
            let auto_restart = state.config.auto_restart;
            state.recovery.on_crash(auto_restart)
        };

        let restart_in = match decision {
            RecoveryDecision::Restart { crash_count, delay } => {
                tracing::info!(crash_count, delay_ms = delay.as_millis() as u64, "Scheduling automatic restart");
                let weak = Arc::downgrade(self);
                state.recovery.schedule_restart(delay, async move {
                    let Some(inner) = weak.upgrade() else {
                        return;
                    };
                    inner.lock().recovery.detach_restart_timer();
                    if let Err(e) = inner.start(false).await {
                        tracing::warn!(server_id = %inner.id, error = %e, "Automatic restart failed");
                        inner.emit(EventPayload::Error {
                            message: format!("Automatic restart failed: {}", e),
                        });
                    }
                });
                Some(delay)
            }
            _ => None,
        };

        events.push(EventPayload::Crash(CrashSignal::Exit {
            exit_code,
            crash_count: state.recovery.crash_count(),
            restart_in_ms: restart_in.map(|d| d.as_millis() as u64),
        }));

        if let RecoveryDecision::Exhausted { crash_count } = decision {
            tracing::error!(crash_count, "Crash limit reached, automatic restart abandoned");
            events.push(EventPayload::Error {
                message: format!(
                    "Server crashed {} times in a row; automatic restart abandoned until started manually",
                    crash_count
                ),
            });
        }
    }

    /// Sends the kill request to the waiter of `generation` without touching state.
    fn request_kill(&self, generation: u64) {
        let mut state = self.lock();
        if let Some(slot) = state.child.as_mut().filter(|slot| slot.generation == generation) {
            if let Some(kill_tx) = slot.kill_tx.take() {
                let _ = kill_tx.send(());
            }
        }
    }

    fn kill(&self) {
        self.transition(|state, events| {
            if state.recovery.cancel_pending_restart() {
                tracing::debug!("Cancelled pending automatic restart");
            }

            if let Some(mut slot) = state.child.take() {
                if let Some(kill_tx) = slot.kill_tx.take() {
                    let _ = kill_tx.send(());
                }
                tracing::info!(pid = slot.pid, "Server process killed");
                // The next start waits for this one to be reaped
                state.reaping = Some(slot.exit_rx);
            }
            state.clear_process_state();
            state.graceful_stop = false;
            events.extend(self.set_status(state, ServerStatus::Stopped));
        });
    }
}

fn check_server_files(config: &ServerConfig) -> Result<()> {
    if !config.working_directory.is_dir() {
        return Err(Error::ConfigValidation(format!(
            "Working directory does not exist: {}",
            config.working_directory.display()
        )));
    }

    let artifact = config.entry_artifact_path();
    if !artifact.is_file() {
        return Err(Error::ConfigValidation(format!(
            "Server artifact not found: {}",
            artifact.display()
        )));
    }

    Ok(())
}
