use anyhow::Context;
use gameserver_supervisor::ServerRegistry;
use gameserver_supervisor::runtime::JavaDiscovery;
use gameserver_supervisor::server::{BroadcastSink, EventPayload};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Log through a background writer so console bursts never block the runtime.
    // `RUST_LOG` selects the level, e.g. `RUST_LOG=gameserver_supervisor=debug`.
    let (writer, _guard) = tracing_appender::non_blocking(std::io::stdout());
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(writer)
        .with_target(true)
        .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "demos/servers.yaml".to_string());
    tracing::info!(config = %config_path, "Starting run_server demo");

    let sink = Arc::new(BroadcastSink::new(1024));
    let mut events = sink.subscribe();

    let discovery = JavaDiscovery::new();
    for install in discovery.installs() {
        println!("Found Java {} at {}", install.major, install.path.display());
    }

    let registry = ServerRegistry::from_config_file(&config_path, sink, Arc::new(discovery))
        .with_context(|| format!("loading {}", config_path))?;

    let printer = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => match &event.payload {
                    EventPayload::Log { line, .. } => println!("[{}] {}", event.server_id, line),
                    other => println!(
                        "[{}] {}",
                        event.server_id,
                        serde_json::to_string(other).unwrap_or_default()
                    ),
                },
                Err(RecvError::Lagged(skipped)) => {
                    println!("(skipped {} events)", skipped);
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    let started = registry.start_all().await?;
    println!("Started {} server(s); press Ctrl+C to stop", started.len());

    tokio::signal::ctrl_c().await?;
    println!("Stopping...");
    registry.stop_all().await?;

    for id in registry.server_ids() {
        let snapshot = registry.get(&id)?.snapshot();
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    }

    drop(registry);
    printer.abort();
    Ok(())
}
