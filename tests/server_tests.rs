#![cfg(unix)]

use assert_fs::TempDir;
use assert_fs::prelude::*;
use gameserver_supervisor::config::ServerConfig;
use gameserver_supervisor::error::{Error, Result};
use gameserver_supervisor::runtime::NoDiscovery;
use gameserver_supervisor::server::{
    CrashSignal, EventKind, EventLog, EventPayload, RecoveryConfig, ServerStatus,
    ServerSupervisor, SupervisorOptions,
};
use gameserver_supervisor::transport::OutputStream;
use std::os::unix::fs::PermissionsExt;
use std::sync::Arc;
use std::time::{Duration, Instant};

// Server that becomes ready and then echoes commands until told to stop
const CONSOLE_SERVER: &str = r#"
echo "Starting minecraft server version 1.21"
echo "Done (1.5s)! For help, type \"help\""
while read -r line; do
  echo "got $line"
  if [ "$line" = "stop" ]; then
    echo "Stopping the server"
    exit 0
  fi
done
"#;

// Server that never reacts to its console
const DEAF_SERVER: &str = r#"
echo "Done (1.0s)!"
while read -r line; do :; done
"#;

/// A server directory holding a fake runtime script and an empty server.jar.
struct TestServer {
    dir: TempDir,
    events: Arc<EventLog>,
}

impl TestServer {
    fn new(script: &str) -> Self {
        let dir = TempDir::new().unwrap();
        dir.child("server.jar").touch().unwrap();

        let runtime = dir.child("fake-java.sh");
        runtime.write_str(&format!("#!/bin/sh\n{}", script)).unwrap();
        let mut permissions = std::fs::metadata(runtime.path()).unwrap().permissions();
        permissions.set_mode(0o755);
        std::fs::set_permissions(runtime.path(), permissions).unwrap();

        Self {
            dir,
            events: Arc::new(EventLog::new()),
        }
    }

    fn config(&self) -> ServerConfig {
        let mut config = ServerConfig::new("test-server", self.dir.path());
        config.runtime_path = self
            .dir
            .child("fake-java.sh")
            .path()
            .to_string_lossy()
            .into_owned();
        config
    }

    fn supervisor(&self, config: ServerConfig, options: SupervisorOptions) -> ServerSupervisor {
        ServerSupervisor::builder(config, self.events.clone(), Arc::new(NoDiscovery))
            .options(options)
            .build()
            .unwrap()
    }

    fn statuses(&self, supervisor: &ServerSupervisor) -> Vec<ServerStatus> {
        self.events.status_history(supervisor.id())
    }

    fn payloads(&self, supervisor: &ServerSupervisor, kind: EventKind) -> Vec<EventPayload> {
        self.events
            .events_of_kind(supervisor.id(), kind)
            .into_iter()
            .map(|e| e.payload)
            .collect()
    }
}

fn fast_options() -> SupervisorOptions {
    SupervisorOptions {
        stop_grace: Duration::from_secs(5),
        restart_settle: Duration::from_millis(100),
        reader_drain: Duration::from_secs(2),
        kill_wait: Duration::from_secs(5),
        recovery: RecoveryConfig::default(),
    }
}

async fn eventually(what: &str, check: impl Fn() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(10);
    while !check() {
        assert!(Instant::now() < deadline, "timed out waiting for {}", what);
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

#[tokio::test]
async fn test_ready_join_then_crash_schedules_restart() -> Result<()> {
    let server = TestServer::new(
        r#"
echo "Done (12.3s)!"
echo "Steve joined the game"
exit 1
"#,
    );
    let supervisor = server.supervisor(server.config(), fast_options());
    assert_eq!(supervisor.status(), ServerStatus::Stopped);

    supervisor.start().await?;
    assert!(supervisor.pid().is_some());

    eventually("crash event", || {
        !server.payloads(&supervisor, EventKind::Crash).is_empty()
    })
    .await;

    assert_eq!(
        server.statuses(&supervisor),
        vec![
            ServerStatus::Starting,
            ServerStatus::Running,
            ServerStatus::Crashed
        ]
    );
    assert_eq!(supervisor.status(), ServerStatus::Crashed);
    assert_eq!(supervisor.get_player_count(), 0);
    assert_eq!(supervisor.pid(), None);
    assert_eq!(supervisor.get_uptime(), None);
    assert_eq!(supervisor.crash_count(), 1);

    assert_eq!(
        server.payloads(&supervisor, EventKind::PlayerJoin),
        vec![EventPayload::PlayerJoin {
            username: "Steve".to_string(),
            player_count: 1,
        }]
    );
    assert_eq!(
        server.payloads(&supervisor, EventKind::Crash),
        vec![EventPayload::Crash(CrashSignal::Exit {
            exit_code: 1,
            crash_count: 1,
            restart_in_ms: Some(5000),
        })]
    );
    assert!(supervisor.has_pending_restart());

    supervisor.dispose().await;
    assert!(!supervisor.has_pending_restart());
    Ok(())
}

#[tokio::test]
async fn test_graceful_stop() -> Result<()> {
    let server = TestServer::new(CONSOLE_SERVER);
    let supervisor = server.supervisor(server.config(), fast_options());

    supervisor.start().await?;
    eventually("running", || supervisor.status() == ServerStatus::Running).await;
    assert!(supervisor.get_uptime().is_some());
    assert_eq!(
        std::fs::read_to_string(server.dir.path().join("eula.txt")).unwrap(),
        "eula=true\n"
    );

    supervisor.send_command("list").await?;
    eventually("command echo", || {
        supervisor.get_logs(10).contains(&"got list".to_string())
    })
    .await;

    supervisor.stop().await?;

    assert_eq!(supervisor.status(), ServerStatus::Stopped);
    assert_eq!(supervisor.pid(), None);
    assert_eq!(
        server.statuses(&supervisor),
        vec![
            ServerStatus::Starting,
            ServerStatus::Running,
            ServerStatus::Stopping,
            ServerStatus::Stopped
        ]
    );
    assert!(server.payloads(&supervisor, EventKind::Crash).is_empty());
    assert_eq!(supervisor.crash_count(), 0);
    assert!(
        supervisor
            .get_logs(10)
            .contains(&"Stopping the server".to_string())
    );
    Ok(())
}

#[tokio::test]
async fn test_stop_with_nonzero_exit_is_not_a_crash() -> Result<()> {
    let server = TestServer::new(
        r#"
echo "Done (1.0s)!"
read -r line
exit 130
"#,
    );
    let supervisor = server.supervisor(server.config(), fast_options());

    supervisor.start().await?;
    eventually("running", || supervisor.status() == ServerStatus::Running).await;
    supervisor.stop().await?;

    assert_eq!(supervisor.status(), ServerStatus::Stopped);
    assert!(server.payloads(&supervisor, EventKind::Crash).is_empty());
    assert!(!supervisor.has_pending_restart());
    Ok(())
}

#[tokio::test]
async fn test_stop_kills_after_grace_period() -> Result<()> {
    let server = TestServer::new(DEAF_SERVER);
    let mut options = fast_options();
    options.stop_grace = Duration::from_millis(300);
    let supervisor = server.supervisor(server.config(), options);

    supervisor.start().await?;
    eventually("running", || supervisor.status() == ServerStatus::Running).await;

    let began = Instant::now();
    supervisor.stop().await?;

    assert!(began.elapsed() >= Duration::from_millis(300));
    assert_eq!(supervisor.status(), ServerStatus::Stopped);
    assert_eq!(supervisor.pid(), None);
    assert!(server.payloads(&supervisor, EventKind::Crash).is_empty());
    Ok(())
}

#[tokio::test]
async fn test_players_cleared_while_stopping() -> Result<()> {
    let server = TestServer::new(
        r#"
echo "Done (1.0s)!"
echo "UUID of player Alex is 0f6c2f5e-5a41-4c2b-9a55-a4c1f1c0d7a2"
echo "Steve joined the game"
read -r line
sleep 1
exit 0
"#,
    );
    let supervisor = server.supervisor(server.config(), fast_options());

    supervisor.start().await?;
    eventually("player", || supervisor.get_player_count() == 1).await;

    let stopping = tokio::spawn({
        let supervisor = supervisor.clone();
        async move { supervisor.stop().await }
    });
    eventually("stopping", || supervisor.status() == ServerStatus::Stopping).await;

    assert_eq!(supervisor.get_player_count(), 0);
    assert!(supervisor.players().is_empty());
    assert!(supervisor.snapshot().players.is_empty());

    stopping.await.expect("stop task panicked")?;
    assert_eq!(supervisor.status(), ServerStatus::Stopped);
    Ok(())
}

#[tokio::test]
async fn test_stop_racing_ready_line_keeps_event_order() -> Result<()> {
    for _ in 0..10 {
        let server = TestServer::new(CONSOLE_SERVER);
        let supervisor = server.supervisor(server.config(), fast_options());

        supervisor.start().await?;
        supervisor.stop().await?;

        let statuses = server.statuses(&supervisor);
        assert!(
            statuses
                == [
                    ServerStatus::Starting,
                    ServerStatus::Running,
                    ServerStatus::Stopping,
                    ServerStatus::Stopped
                ]
                || statuses
                    == [
                        ServerStatus::Starting,
                        ServerStatus::Stopping,
                        ServerStatus::Stopped
                    ],
            "statuses out of order: {:?}",
            statuses
        );
    }
    Ok(())
}

#[tokio::test]
async fn test_commands_need_a_process() {
    let server = TestServer::new(DEAF_SERVER);
    let supervisor = server.supervisor(server.config(), fast_options());

    assert!(matches!(
        supervisor.send_command("say hi").await,
        Err(Error::NotWritable(_))
    ));
    assert!(matches!(supervisor.stop().await, Err(Error::NotRunning)));
}

#[tokio::test]
async fn test_missing_artifact_is_not_a_crash() {
    let server = TestServer::new(DEAF_SERVER);
    let mut config = server.config();
    config.entry_artifact = "paper.jar".to_string();
    let supervisor = server.supervisor(config, fast_options());

    let result = supervisor.start().await;

    assert!(matches!(result, Err(Error::ConfigValidation(_))));
    assert_eq!(supervisor.status(), ServerStatus::Stopped);
    assert_eq!(supervisor.crash_count(), 0);
    assert!(server.statuses(&supervisor).is_empty());
    assert_eq!(server.payloads(&supervisor, EventKind::Error).len(), 1);
}

#[tokio::test]
async fn test_missing_working_directory() {
    let server = TestServer::new(DEAF_SERVER);
    let mut config = server.config();
    config.working_directory = server.dir.path().join("gone");
    let supervisor = server.supervisor(config, fast_options());

    assert!(matches!(
        supervisor.start().await,
        Err(Error::ConfigValidation(_))
    ));
    assert_eq!(supervisor.status(), ServerStatus::Stopped);
}

#[tokio::test]
async fn test_second_start_fails_fast() -> Result<()> {
    let server = TestServer::new("while read -r line; do :; done\n");
    let supervisor = server.supervisor(server.config(), fast_options());

    supervisor.start().await?;
    assert_eq!(supervisor.status(), ServerStatus::Starting);

    assert!(matches!(
        supervisor.start().await,
        Err(Error::AlreadyRunning)
    ));

    supervisor.kill();
    assert_eq!(supervisor.status(), ServerStatus::Stopped);
    assert_eq!(supervisor.pid(), None);
    Ok(())
}

#[tokio::test]
async fn test_concurrent_starts_spawn_one_process() {
    let server = TestServer::new("while read -r line; do :; done\n");
    let supervisor = server.supervisor(server.config(), fast_options());

    let (first, second) = tokio::join!(supervisor.start(), supervisor.start());

    let failures = [&first, &second]
        .iter()
        .filter(|r| matches!(r, Err(Error::AlreadyRunning)))
        .count();
    assert!(first.is_ok() || second.is_ok());
    assert_eq!(failures, 1);
    assert_eq!(server.statuses(&supervisor), vec![ServerStatus::Starting]);

    supervisor.kill();
}

#[tokio::test]
async fn test_player_tracking() -> Result<()> {
    let server = TestServer::new(
        r#"
echo "[12:00:00] [Server thread/INFO]: Done (2.0s)!"
echo "[12:00:01] [User Authenticator #1/INFO]: UUID of player Steve is 8667ba71-b85a-4004-af54-457a9734eed7"
echo "[12:00:01] [Server thread/INFO]: Steve joined the game"
echo "[12:00:02] [Server thread/INFO]: Alex joined the game"
echo "[12:00:03] [Server thread/INFO]: Alex left the game"
echo "[12:00:04] [Server thread/INFO]: Ghost left the game"
echo "[12:00:05] [Server thread/INFO]: TPS from last 1m, 5m, 15m: 19.5, 20.0, 20.0"
echo "end of script"
while read -r line; do :; done
"#,
    );
    let supervisor = server.supervisor(server.config(), fast_options());
    assert_eq!(supervisor.tps(), 20.0);

    supervisor.start().await?;
    eventually("all lines", || {
        supervisor.get_logs(1) == vec!["end of script".to_string()]
    })
    .await;

    let players = supervisor.players();
    assert_eq!(players.len(), 1);
    assert_eq!(
        players["Steve"].uuid.as_deref(),
        Some("8667ba71-b85a-4004-af54-457a9734eed7")
    );
    assert_eq!(supervisor.get_player_count(), 1);
    assert_eq!(supervisor.tps(), 19.5);

    assert_eq!(
        server.payloads(&supervisor, EventKind::PlayerLeave),
        vec![
            EventPayload::PlayerLeave {
                username: "Alex".to_string(),
                player_count: 1,
            },
            EventPayload::PlayerLeave {
                username: "Ghost".to_string(),
                player_count: 1,
            },
        ]
    );
    assert_eq!(
        server.payloads(&supervisor, EventKind::Tps),
        vec![EventPayload::Tps { tps: 19.5 }]
    );

    let snapshot = supervisor.snapshot();
    assert_eq!(snapshot.status, ServerStatus::Running);
    assert_eq!(snapshot.players.len(), 1);
    assert_eq!(snapshot.players[0].name, "Steve");
    assert!(snapshot.started_at.is_some());
    assert_eq!(snapshot.pid, supervisor.pid());

    supervisor.kill();
    assert!(supervisor.players().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_repeated_ready_line_is_ignored() -> Result<()> {
    let server = TestServer::new(
        r#"
echo "Done (1.0s)!"
echo "Done (1.0s)!"
echo "end of script"
while read -r line; do :; done
"#,
    );
    let supervisor = server.supervisor(server.config(), fast_options());

    supervisor.start().await?;
    eventually("all lines", || {
        supervisor.get_logs(1) == vec!["end of script".to_string()]
    })
    .await;

    assert_eq!(
        server.statuses(&supervisor),
        vec![ServerStatus::Starting, ServerStatus::Running]
    );

    supervisor.kill();
    Ok(())
}

#[tokio::test]
async fn test_crash_without_auto_restart() -> Result<()> {
    let server = TestServer::new("exit 3\n");
    let mut config = server.config();
    config.auto_restart = false;
    let supervisor = server.supervisor(config, fast_options());

    supervisor.start().await?;
    eventually("crashed", || supervisor.status() == ServerStatus::Crashed).await;
    eventually("crash event", || {
        !server.payloads(&supervisor, EventKind::Crash).is_empty()
    })
    .await;

    assert_eq!(
        server.payloads(&supervisor, EventKind::Crash),
        vec![EventPayload::Crash(CrashSignal::Exit {
            exit_code: 3,
            crash_count: 0,
            restart_in_ms: None,
        })]
    );
    assert_eq!(supervisor.crash_count(), 0);
    assert!(!supervisor.has_pending_restart());
    Ok(())
}

#[tokio::test]
async fn test_clean_exit_is_stopped() -> Result<()> {
    let server = TestServer::new("echo \"Done (1.0s)!\"\nexit 0\n");
    let supervisor = server.supervisor(server.config(), fast_options());

    supervisor.start().await?;
    eventually("stopped", || {
        server.statuses(&supervisor).last() == Some(&ServerStatus::Stopped)
    })
    .await;

    assert_eq!(
        server.statuses(&supervisor),
        vec![
            ServerStatus::Starting,
            ServerStatus::Running,
            ServerStatus::Stopped
        ]
    );
    assert!(server.payloads(&supervisor, EventKind::Crash).is_empty());
    assert_eq!(supervisor.crash_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_crash_report_banner_is_reported() -> Result<()> {
    let server = TestServer::new(
        r#"
echo "Done (1.0s)!"
echo "---- Minecraft Crash Report ----"
echo "end of script"
while read -r line; do :; done
"#,
    );
    let supervisor = server.supervisor(server.config(), fast_options());

    supervisor.start().await?;
    eventually("all lines", || {
        supervisor.get_logs(1) == vec!["end of script".to_string()]
    })
    .await;

    assert_eq!(
        server.payloads(&supervisor, EventKind::Crash),
        vec![EventPayload::Crash(CrashSignal::ReportBanner)]
    );
    // The banner alone does not change the status
    assert_eq!(supervisor.status(), ServerStatus::Running);

    supervisor.kill();
    Ok(())
}

#[tokio::test]
async fn test_kill_is_immediate() -> Result<()> {
    let server = TestServer::new(
        r#"
echo "Done (1.0s)!"
echo "Steve joined the game"
while read -r line; do :; done
"#,
    );
    let supervisor = server.supervisor(server.config(), fast_options());

    supervisor.start().await?;
    eventually("player", || supervisor.get_player_count() == 1).await;

    supervisor.kill();

    assert_eq!(supervisor.status(), ServerStatus::Stopped);
    assert_eq!(supervisor.pid(), None);
    assert_eq!(supervisor.get_player_count(), 0);

    // The reaped process must not produce another transition
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(
        server.statuses(&supervisor),
        vec![
            ServerStatus::Starting,
            ServerStatus::Running,
            ServerStatus::Stopped
        ]
    );
    assert!(server.payloads(&supervisor, EventKind::Crash).is_empty());
    Ok(())
}

fn process_alive(pid: u32) -> bool {
    std::process::Command::new("sh")
        .arg("-c")
        .arg(format!("kill -0 {} 2>/dev/null", pid))
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

#[tokio::test]
async fn test_start_after_kill_waits_for_old_process() -> Result<()> {
    let server = TestServer::new(
        r#"
trap '' TERM
echo "Done (1.0s)!"
while read -r line; do :; done
"#,
    );
    let supervisor = server.supervisor(server.config(), fast_options());

    supervisor.start().await?;
    eventually("running", || supervisor.status() == ServerStatus::Running).await;
    let old_pid = supervisor.pid().unwrap();

    supervisor.kill();
    supervisor.start().await?;

    // Only one process may own the server directory
    assert!(!process_alive(old_pid));
    let new_pid = supervisor.pid().unwrap();
    assert_ne!(new_pid, old_pid);
    assert!(process_alive(new_pid));

    supervisor.kill();
    Ok(())
}

#[tokio::test]
async fn test_output_after_kill_is_dropped() -> Result<()> {
    let server = TestServer::new(
        r#"
echo "Done (1.0s)!"
(sleep 0.3; echo "late line"; echo "Alex joined the game") &
while read -r line; do :; done
"#,
    );
    let supervisor = server.supervisor(server.config(), fast_options());

    supervisor.start().await?;
    eventually("running", || supervisor.status() == ServerStatus::Running).await;
    supervisor.kill();

    // The background writer outlives the killed shell
    tokio::time::sleep(Duration::from_millis(800)).await;

    assert!(!supervisor.get_logs(100).contains(&"late line".to_string()));
    let logged: Vec<EventPayload> = server.payloads(&supervisor, EventKind::Log);
    assert!(!logged.iter().any(|payload| matches!(
        payload,
        EventPayload::Log { line, .. } if line == "late line"
    )));
    assert!(server.payloads(&supervisor, EventKind::PlayerJoin).is_empty());
    Ok(())
}

#[tokio::test]
async fn test_restart() -> Result<()> {
    let server = TestServer::new(CONSOLE_SERVER);
    let supervisor = server.supervisor(server.config(), fast_options());

    supervisor.start().await?;
    eventually("running", || supervisor.status() == ServerStatus::Running).await;
    let first_pid = supervisor.pid();

    supervisor.restart().await?;
    eventually("running again", || {
        supervisor.status() == ServerStatus::Running
    })
    .await;

    assert_ne!(supervisor.pid(), first_pid);
    assert_eq!(
        server.statuses(&supervisor),
        vec![
            ServerStatus::Starting,
            ServerStatus::Running,
            ServerStatus::Stopping,
            ServerStatus::Stopped,
            ServerStatus::Starting,
            ServerStatus::Running
        ]
    );

    supervisor.stop().await?;
    Ok(())
}

#[tokio::test]
async fn test_spawn_error() {
    let server = TestServer::new(DEAF_SERVER);
    let mut config = server.config();
    config.runtime_path = server
        .dir
        .path()
        .join("no-such-java")
        .to_string_lossy()
        .into_owned();
    let supervisor = server.supervisor(config, fast_options());

    let result = supervisor.start().await;

    assert!(matches!(result, Err(Error::Process(_))));
    assert_eq!(supervisor.status(), ServerStatus::Crashed);
    assert_eq!(supervisor.pid(), None);
    assert_eq!(server.statuses(&supervisor), vec![ServerStatus::Crashed]);
    assert_eq!(server.payloads(&supervisor, EventKind::Error).len(), 1);
    assert!(server.payloads(&supervisor, EventKind::Crash).is_empty());
    assert_eq!(supervisor.crash_count(), 0);
    assert!(!supervisor.has_pending_restart());
}

#[tokio::test]
async fn test_log_buffer_and_stderr() -> Result<()> {
    let server = TestServer::new(
        r#"
echo "one"
echo "two"
echo "oops" >&2
echo "three"
echo "four"
sleep 0.2
echo "end of script"
while read -r line; do :; done
"#,
    );
    let mut config = server.config();
    config.log_buffer_lines = 3;
    let supervisor = server.supervisor(config, fast_options());

    supervisor.start().await?;
    eventually("all lines", || {
        supervisor.get_logs(1) == vec!["end of script".to_string()]
    })
    .await;

    let logs = supervisor.get_logs(100);
    assert_eq!(logs.len(), 3);
    assert_eq!(logs.last().unwrap(), "end of script");

    let stderr_lines: Vec<EventPayload> = server
        .payloads(&supervisor, EventKind::Log)
        .into_iter()
        .filter(|p| {
            matches!(
                p,
                EventPayload::Log {
                    stream: OutputStream::Stderr,
                    ..
                }
            )
        })
        .collect();
    assert_eq!(
        stderr_lines,
        vec![EventPayload::Log {
            line: "[stderr] oops".to_string(),
            stream: OutputStream::Stderr,
        }]
    );

    supervisor.kill();
    Ok(())
}

#[tokio::test]
async fn test_automatic_restart_until_exhausted() -> Result<()> {
    let server = TestServer::new("exit 1\n");
    let mut options = fast_options();
    options.recovery = RecoveryConfig {
        base_delay: Duration::from_millis(100),
        max_delay: Duration::from_millis(100),
        max_crashes: 1,
        stability_window: Duration::from_secs(600),
    };
    let supervisor = server.supervisor(server.config(), options);

    supervisor.start().await?;
    eventually("exhaustion", || {
        !server.payloads(&supervisor, EventKind::Error).is_empty()
    })
    .await;

    assert_eq!(
        server.statuses(&supervisor),
        vec![
            ServerStatus::Starting,
            ServerStatus::Crashed,
            ServerStatus::Starting,
            ServerStatus::Crashed
        ]
    );
    assert_eq!(
        server.payloads(&supervisor, EventKind::Crash),
        vec![
            EventPayload::Crash(CrashSignal::Exit {
                exit_code: 1,
                crash_count: 1,
                restart_in_ms: Some(100),
            }),
            EventPayload::Crash(CrashSignal::Exit {
                exit_code: 1,
                crash_count: 2,
                restart_in_ms: None,
            }),
        ]
    );
    assert!(!supervisor.has_pending_restart());

    // A manual start is still allowed and keeps the count
    supervisor.start().await?;
    eventually("third crash", || {
        server.payloads(&supervisor, EventKind::Crash).len() == 3
    })
    .await;
    assert_eq!(supervisor.crash_count(), 3);
    Ok(())
}

#[tokio::test]
async fn test_stop_cancels_pending_restart() -> Result<()> {
    let server = TestServer::new("exit 1\n");
    let mut options = fast_options();
    options.recovery.base_delay = Duration::from_secs(60);
    let supervisor = server.supervisor(server.config(), options);

    supervisor.start().await?;
    eventually("pending restart", || supervisor.has_pending_restart()).await;

    assert!(matches!(supervisor.stop().await, Err(Error::NotRunning)));
    assert!(!supervisor.has_pending_restart());
    assert_eq!(supervisor.status(), ServerStatus::Crashed);
    Ok(())
}

#[tokio::test]
async fn test_dispose() -> Result<()> {
    let server = TestServer::new(DEAF_SERVER);
    let supervisor = server.supervisor(server.config(), fast_options());

    supervisor.start().await?;
    eventually("running", || supervisor.status() == ServerStatus::Running).await;

    supervisor.dispose().await;

    assert_eq!(supervisor.status(), ServerStatus::Stopped);
    assert_eq!(supervisor.pid(), None);
    assert!(matches!(supervisor.start().await, Err(Error::Disposed)));
    Ok(())
}

#[tokio::test]
async fn test_update_config() -> Result<()> {
    let server = TestServer::new(DEAF_SERVER);
    let supervisor = server.supervisor(server.config(), fast_options());

    let mut config = server.config();
    config.max_heap_mb = 4096;
    supervisor.update_config(config)?;
    assert_eq!(supervisor.get_config().max_heap_mb, 4096);

    let mut renamed = server.config();
    renamed.id = "other".into();
    assert!(matches!(
        supervisor.update_config(renamed),
        Err(Error::ConfigInvalid(_))
    ));

    let mut inverted = server.config();
    inverted.min_heap_mb = 8192;
    assert!(matches!(
        supervisor.update_config(inverted),
        Err(Error::ConfigInvalid(_))
    ));
    Ok(())
}

#[tokio::test]
async fn test_status_watch() -> Result<()> {
    let server = TestServer::new(DEAF_SERVER);
    let supervisor = server.supervisor(server.config(), fast_options());
    let mut status = supervisor.subscribe_status();
    assert_eq!(*status.borrow(), ServerStatus::Stopped);

    supervisor.start().await?;
    tokio::time::timeout(
        Duration::from_secs(10),
        status.wait_for(|s| *s == ServerStatus::Running),
    )
    .await
    .expect("timed out")
    .expect("supervisor dropped");

    supervisor.kill();
    assert_eq!(*status.borrow_and_update(), ServerStatus::Stopped);
    Ok(())
}
