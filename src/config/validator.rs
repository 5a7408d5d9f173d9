use crate::config::{Config, ServerConfig};
use crate::error::{Error, Result};
use std::collections::HashSet;

/// Smallest heap a server is allowed to run with.
pub const MIN_HEAP_FLOOR_MB: u32 = 256;

/// Validates a single server configuration.
///
/// Only static properties are checked here; whether the working directory
/// and jar exist is decided at start time, since files can appear or vanish
/// between loading and launching.
pub fn validate_server_config(config: &ServerConfig) -> Result<()> {
    let id = config.id.as_str();

    if id.trim().is_empty() {
        return Err(Error::ConfigInvalid("Server has empty id".to_string()));
    }

    if config.entry_artifact.trim().is_empty() {
        return Err(Error::ConfigInvalid(format!(
            "Server '{}' has empty entry artifact",
            id
        )));
    }

    if config.max_heap_mb < MIN_HEAP_FLOOR_MB {
        return Err(Error::ConfigInvalid(format!(
            "Server '{}' max heap must be at least {} MiB (got {})",
            id, MIN_HEAP_FLOOR_MB, config.max_heap_mb
        )));
    }

    if config.min_heap_mb > config.max_heap_mb {
        return Err(Error::ConfigInvalid(format!(
            "Server '{}' min heap ({} MiB) exceeds max heap ({} MiB)",
            id, config.min_heap_mb, config.max_heap_mb
        )));
    }

    if config.log_buffer_lines == 0 {
        return Err(Error::ConfigInvalid(format!(
            "Server '{}' log buffer must hold at least one line",
            id
        )));
    }

    Ok(())
}

/// Validates every server and checks that ids are unique.
pub fn validate_config(config: &Config) -> Result<()> {
    let mut seen = HashSet::new();

    for server in &config.servers {
        validate_server_config(server)?;

        if !seen.insert(server.id.as_str()) {
            return Err(Error::ConfigInvalid(format!(
                "Duplicate server id '{}'",
                server.id
            )));
        }
    }

    Ok(())
}
