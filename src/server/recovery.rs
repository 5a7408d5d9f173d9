use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Crash recovery tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoveryConfig {
    /// Delay per accumulated crash
    pub base_delay: Duration,
    /// Upper bound of the restart delay
    pub max_delay: Duration,
    /// Crashes tolerated before recovery is abandoned
    pub max_crashes: u32,
    /// Crash-free time after which the crash count resets
    pub stability_window: Duration,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_millis(5000),
            max_delay: Duration::from_millis(30_000),
            max_crashes: 5,
            stability_window: Duration::from_secs(10 * 60),
        }
    }
}

impl RecoveryConfig {
    /// Delay before restarting after the `crash_count`th consecutive crash:
    /// `min(base_delay * crash_count, max_delay)`.
    pub fn restart_delay(&self, crash_count: u32) -> Duration {
        self.base_delay
            .checked_mul(crash_count)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }
}

/// Outcome of recording a crash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryDecision {
    /// Auto-restart is off for this server.
    Disabled,
    /// Too many crashes in a row; waiting for an operator.
    Exhausted { crash_count: u32 },
    /// Restart after `delay`.
    Restart { crash_count: u32, delay: Duration },
}

/// Crash counter plus the timers that act on it.
///
/// The stability timer resets the counter once no crash has happened for
/// the configured window. The restart timer runs a caller-supplied future
/// after the backoff delay. Both are tokio tasks and are aborted when the
/// policy is cancelled or dropped.
#[derive(Debug)]
pub struct CrashRecovery {
    config: RecoveryConfig,
    crash_count: Arc<AtomicU32>,
    stability_timer: Option<JoinHandle<()>>,
    restart_timer: Option<JoinHandle<()>>,
}

impl CrashRecovery {
    pub fn new(config: RecoveryConfig) -> Self {
        Self {
            config,
            crash_count: Arc::new(AtomicU32::new(0)),
            stability_timer: None,
            restart_timer: None,
        }
    }

    pub fn config(&self) -> &RecoveryConfig {
        &self.config
    }

    /// Consecutive crashes since the last stability reset.
    pub fn crash_count(&self) -> u32 {
        self.crash_count.load(Ordering::SeqCst)
    }

    /// Records an unrequested crash and decides what to do about it.
    ///
    /// Must be called from within a tokio runtime: it (re)arms the stability
    /// timer.
    pub fn on_crash(&mut self, auto_restart: bool) -> RecoveryDecision {
        if !auto_restart {
            return RecoveryDecision::Disabled;
        }

        let crash_count = self
            .crash_count
            .fetch_add(1, Ordering::SeqCst)
            .saturating_add(1);
        self.arm_stability_timer();

        if crash_count > self.config.max_crashes {
            RecoveryDecision::Exhausted { crash_count }
        } else {
            RecoveryDecision::Restart {
                crash_count,
                delay: self.config.restart_delay(crash_count),
            }
        }
    }

    fn arm_stability_timer(&mut self) {
        if let Some(timer) = self.stability_timer.take() {
            timer.abort();
        }

        let counter = Arc::clone(&self.crash_count);
        let window = self.config.stability_window;
        self.stability_timer = Some(tokio::spawn(async move {
            tokio::time::sleep(window).await;
            let previous = counter.swap(0, Ordering::SeqCst);
            tracing::debug!(previous, "Stability window elapsed, crash count reset");
        }));
    }

    /// Runs `restart` after `delay`, replacing any restart already pending.
    pub fn schedule_restart<F>(&mut self, delay: Duration, restart: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel_pending_restart();
        self.restart_timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            restart.await;
        }));
    }

    /// Whether a restart is scheduled and has not fired yet.
    pub fn has_pending_restart(&self) -> bool {
        self.restart_timer
            .as_ref()
            .is_some_and(|timer| !timer.is_finished())
    }

    /// Aborts a pending restart. Returns whether one was pending.
    pub fn cancel_pending_restart(&mut self) -> bool {
        match self.restart_timer.take() {
            Some(timer) if !timer.is_finished() => {
                timer.abort();
                true
            }
            _ => false,
        }
    }

    /// Forgets the restart timer without aborting it.
    ///
    /// Called by the restart task itself once it fires, so the start it
    /// performs cannot cancel its own task.
    pub(crate) fn detach_restart_timer(&mut self) {
        self.restart_timer = None;
    }

    /// Aborts every timer. The crash count is kept.
    pub fn cancel_all(&mut self) {
        self.cancel_pending_restart();
        if let Some(timer) = self.stability_timer.take() {
            timer.abort();
        }
    }
}

impl Drop for CrashRecovery {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
