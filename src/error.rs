/// Error handling module for the game server supervisor.
///
/// This module defines the error types used throughout the library. Errors
/// returned synchronously from an operation are the ones that need a caller
/// or an operator to act; transient conditions (in-ceiling crashes, failed
/// automatic restarts) are reported through the event sink instead.
///
/// # Example
///
/// ```
/// use gameserver_supervisor::error::{Error, Result};
///
/// fn handle_error(result: Result<()>) {
///     match result {
///         Ok(_) => println!("Operation succeeded"),
///         Err(Error::AlreadyRunning) => println!("Server is already up"),
///         Err(Error::ConfigValidation(msg)) => println!("Fix the server files: {}", msg),
///         Err(Error::NotWritable(msg)) => println!("Console is closed: {}", msg),
///         Err(e) => println!("Other error: {}", e),
///     }
/// }
/// ```
use thiserror::Error;

/// Errors that can occur in the gameserver-supervisor library.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to read or parse a configuration file or string.
    ///
    /// This error occurs when:
    /// - The file cannot be read
    /// - The JSON or YAML is malformed
    /// - Field types are incorrect
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(String),

    /// Configuration parsed but contains values that make no sense.
    ///
    /// This error occurs when:
    /// - Two servers share an id
    /// - Heap sizes are inverted or too small
    /// - A classifier rule is missing a required capture group
    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),

    /// The server's files on disk do not allow a launch.
    ///
    /// This error occurs when:
    /// - The working directory does not exist
    /// - The entry artifact (server jar) is missing
    /// - The license acceptance file cannot be written
    ///
    /// It is never retried and never counts as a crash.
    #[error("Config validation error: {0}")]
    ConfigValidation(String),

    /// The operating system refused to launch the runtime.
    #[error("Server process error: {0}")]
    Process(String),

    /// The server is already starting, running or still shutting down.
    #[error("Already running")]
    AlreadyRunning,

    /// The server has no live process to act on.
    #[error("Not running")]
    NotRunning,

    /// A console command was sent while no process input is open.
    #[error("Console not writable: {0}")]
    NotWritable(String),

    /// Requested server was not found in the registry.
    #[error("Server not found: {0}")]
    ServerNotFound(String),

    /// The supervisor was disposed and accepts no further commands.
    #[error("Supervisor disposed")]
    Disposed,

    /// Any other error not covered by the above categories.
    #[error("Other error: {0}")]
    Other(String),
}

/// Result type for gameserver-supervisor operations.
pub type Result<T> = std::result::Result<T, Error>;
