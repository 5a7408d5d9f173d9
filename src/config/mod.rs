//! Configuration module for the game server supervisor.
//!
//! This module handles parsing and validation of the server definitions the
//! host application hands to the supervisor. Configurations can be loaded
//! from JSON or YAML files, or built programmatically.
//!
//! # Examples
//!
//! Loading a configuration from a file:
//!
//! ```no_run
//! use gameserver_supervisor::config::{Config, validate_config};
//!
//! let config = Config::from_file("servers.yaml").unwrap();
//! validate_config(&config).unwrap();
//! println!("Loaded configuration with {} servers", config.servers.len());
//! ```
mod parser;
pub mod validator;

pub use parser::{Config, ServerConfig};
pub use validator::{validate_config, validate_server_config};
