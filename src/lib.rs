/*!
 # Game Server Supervisor

 A Rust library for running and babysitting Java game server processes
 (Minecraft and its forks) on the local host.

 ## Overview

 Game Server Supervisor provides functionality to:
 - Resolve the Java runtime to launch, falling back to discovered installs
 - Build JVM arguments from heap sizes and tuning flags
 - Start, stop, kill and restart server processes
 - Follow the console and turn known lines into events (ready, joins,
   leaves, TPS, crash reports)
 - Restart crashed servers with a bounded, backed-off retry policy

 ## Basic Usage

 ```no_run
 use gameserver_supervisor::runtime::JavaDiscovery;
 use gameserver_supervisor::server::BroadcastSink;
 use gameserver_supervisor::{Result, ServerRegistry};
 use std::sync::Arc;

 #[tokio::main]
 async fn main() -> Result<()> {
     let sink = Arc::new(BroadcastSink::new(256));
     let mut events = sink.subscribe();

     // Create a registry from config file
     let registry = ServerRegistry::from_config_file(
         "servers.yaml",
         sink,
         Arc::new(JavaDiscovery::new()),
     )?;

     // Start every configured server
     registry.start_all().await?;

     while let Ok(event) = events.recv().await {
         println!("{}: {:?}", event.server_id, event.payload);
     }

     registry.stop_all().await
 }
 ```

 ## Features

 - **Server Management**: Start, stop, kill and restart servers, with a
   grace period before a forced kill
 - **Console**: Send commands and read back a bounded log history
 - **Log Classification**: Extensible, regex-based rule table
 - **Crash Recovery**: Linear backoff capped at 30 s, five retries, reset
   after ten stable minutes
 - **Configuration**: JSON or YAML config files
 - **Async Support**: Built on tokio; every supervisor is independent
*/

pub mod classifier;
pub mod config;
pub mod error;
pub mod launch;
pub mod runtime;
pub mod server;
pub mod transport;

pub use classifier::{LogClassifier, LogEvent};
pub use config::{Config, ServerConfig};
pub use error::{Error, Result};
pub use server::{
    EventSink, ServerEvent, ServerId, ServerStatus, ServerSupervisor, SupervisorOptions,
};

use runtime::RuntimeResolver;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Owns the supervisors of every server managed by this host.
///
/// Every supervisor shares the registry's event sink and runtime resolver.
/// All public methods are instrumented with `tracing` spans.
pub struct ServerRegistry {
    /// Shared event sink
    sink: Arc<dyn EventSink>,
    /// Shared runtime resolver
    resolver: Arc<dyn RuntimeResolver>,
    /// Timings applied to new supervisors
    options: SupervisorOptions,
    /// Supervisors by id
    servers: HashMap<ServerId, ServerSupervisor>,
    /// Ids in the order they were added
    order: Vec<ServerId>,
}

impl ServerRegistry {
    /// Create an empty registry
    pub fn new(sink: Arc<dyn EventSink>, resolver: Arc<dyn RuntimeResolver>) -> Self {
        Self::with_options(sink, resolver, SupervisorOptions::default())
    }

    /// Create an empty registry whose supervisors use `options`
    pub fn with_options(
        sink: Arc<dyn EventSink>,
        resolver: Arc<dyn RuntimeResolver>,
        options: SupervisorOptions,
    ) -> Self {
        Self {
            sink,
            resolver,
            options,
            servers: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Create a registry from a configuration file path
    ///
    /// The whole file is validated before any supervisor is created.
    #[tracing::instrument(skip(path, sink, resolver), fields(config_path = ?path.as_ref()))]
    pub fn from_config_file(
        path: impl AsRef<Path>,
        sink: Arc<dyn EventSink>,
        resolver: Arc<dyn RuntimeResolver>,
    ) -> Result<Self> {
        tracing::info!("Loading configuration from file");
        let config = Config::from_file(path)?;
        Self::from_config(config, sink, resolver)
    }

    /// Create a registry holding one supervisor per configured server
    #[tracing::instrument(skip_all, fields(num_servers = config.servers.len()))]
    pub fn from_config(
        config: Config,
        sink: Arc<dyn EventSink>,
        resolver: Arc<dyn RuntimeResolver>,
    ) -> Result<Self> {
        crate::config::validate_config(&config)?;

        let mut registry = Self::new(sink, resolver);
        for server in config.servers {
            registry.add_server(server)?;
        }
        Ok(registry)
    }

    /// Add a server; it stays stopped until started
    ///
    /// # Errors
    ///
    /// [`Error::ConfigInvalid`] if the configuration is invalid or the id is
    /// already registered.
    #[tracing::instrument(skip(self, config), fields(server_id = %config.id))]
    pub fn add_server(&mut self, config: ServerConfig) -> Result<ServerId> {
        if self.servers.contains_key(&config.id) {
            tracing::warn!("Server id already registered");
            return Err(Error::ConfigInvalid(format!(
                "Duplicate server id: {}",
                config.id
            )));
        }

        let supervisor = ServerSupervisor::builder(
            config,
            Arc::clone(&self.sink),
            Arc::clone(&self.resolver),
        )
        .options(self.options)
        .build()?;

        let id = supervisor.id().clone();
        self.servers.insert(id.clone(), supervisor);
        self.order.push(id.clone());
        tracing::info!("Server registered");
        Ok(id)
    }

    /// Remove a server, killing its process and cancelling its timers
    #[tracing::instrument(skip(self), fields(server_id = %id))]
    pub async fn remove_server(&mut self, id: &ServerId) -> Result<()> {
        let supervisor = self.servers.remove(id).ok_or_else(|| {
            tracing::warn!("Removal requested for unknown server");
            Error::ServerNotFound(id.to_string())
        })?;
        self.order.retain(|existing| existing != id);

        supervisor.dispose().await;
        tracing::info!("Server removed");
        Ok(())
    }

    /// Get the supervisor of a server
    pub fn get(&self, id: &ServerId) -> Result<&ServerSupervisor> {
        self.servers
            .get(id)
            .ok_or_else(|| Error::ServerNotFound(id.to_string()))
    }

    /// Registered server ids, in the order they were added
    pub fn server_ids(&self) -> Vec<ServerId> {
        self.order.clone()
    }

    /// Number of registered servers
    pub fn len(&self) -> usize {
        self.servers.len()
    }

    /// Whether no server is registered
    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }

    /// Start a specific server
    #[tracing::instrument(skip(self), fields(server_id = %id))]
    pub async fn start_server(&self, id: &ServerId) -> Result<()> {
        self.get(id)?.start().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to start server");
            e
        })
    }

    /// Stop a specific server
    #[tracing::instrument(skip(self), fields(server_id = %id))]
    pub async fn stop_server(&self, id: &ServerId) -> Result<()> {
        self.get(id)?.stop().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to stop server");
            e
        })
    }

    /// Start every stopped or crashed server
    ///
    /// Servers that already have a process are skipped. Failures do not stop
    /// the remaining servers from starting; they are returned together.
    #[tracing::instrument(skip(self))]
    pub async fn start_all(&self) -> Result<Vec<ServerId>> {
        tracing::info!("Starting all registered servers");
        let mut started = Vec::new();
        let mut errors = Vec::new();

        for id in &self.order {
            let Some(supervisor) = self.servers.get(id) else {
                continue;
            };
            if supervisor.status().has_process() {
                tracing::debug!(server_id = %id, "Server already up");
                continue;
            }

            match supervisor.start().await {
                Ok(()) => started.push(id.clone()),
                Err(e) => {
                    tracing::error!(server_id = %id, error = %e, "Failed to start server");
                    errors.push((id.clone(), e));
                }
            }
        }

        aggregate(errors, "start")?;
        tracing::info!(num_started = started.len(), "Finished starting all servers");
        Ok(started)
    }

    /// Stop every server that is starting or running
    #[tracing::instrument(skip(self))]
    pub async fn stop_all(&self) -> Result<()> {
        tracing::info!("Stopping all servers");
        let mut errors = Vec::new();

        for id in &self.order {
            let Some(supervisor) = self.servers.get(id) else {
                continue;
            };
            if !matches!(
                supervisor.status(),
                ServerStatus::Starting | ServerStatus::Running
            ) {
                continue;
            }

            if let Err(e) = supervisor.stop().await {
                tracing::error!(server_id = %id, error = %e, "Failed to stop server");
                errors.push((id.clone(), e));
            }
        }

        aggregate(errors, "stop")?;
        tracing::info!("All servers stopped");
        Ok(())
    }
}

/// Folds per-server failures into one error, keeping a lone error as is.
fn aggregate(mut errors: Vec<(ServerId, Error)>, action: &str) -> Result<()> {
    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0).1),
        _ => {
            let error_msg = errors
                .iter()
                .map(|(id, e)| format!("{}: {}", id, e))
                .collect::<Vec<_>>()
                .join("; ");
            Err(Error::Other(format!(
                "Multiple servers failed to {}: {}",
                action, error_msg
            )))
        }
    }
}
