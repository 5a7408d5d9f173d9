//! Java runtime resolution.
//!
//! A server's configuration names the Java executable to launch. The value
//! may be the [`SYSTEM_DEFAULT_RUNTIME`] sentinel, or a concrete path that
//! no longer exists after a JDK upgrade. [`resolve_runtime`] turns either
//! into the best executable it can find, consulting an injected
//! [`RuntimeResolver`] for discovered installations.
//!
//! # Examples
//!
//! ```no_run
//! use gameserver_supervisor::runtime::{JavaDiscovery, resolve_runtime};
//!
//! let discovery = JavaDiscovery::new();
//! let java = resolve_runtime("java", &discovery);
//! println!("launching with {}", java);
//! ```
mod discovery;

pub use discovery::{JavaDiscovery, JavaInstall, parse_java_major};

use std::path::{Path, PathBuf};

/// Configured runtime value meaning "whatever `java` the system provides".
pub const SYSTEM_DEFAULT_RUNTIME: &str = "java";

/// Source of discovered runtime installations.
///
/// The supervisor receives an implementation at construction time; hosts
/// that manage their own JDKs can supply one that knows about them.
pub trait RuntimeResolver: Send + Sync {
    /// Returns the preferred discovered executable, if any was found.
    fn best_available(&self) -> Option<PathBuf>;
}

/// Resolver that never discovers anything.
///
/// Useful when the configured runtime must be used verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDiscovery;

impl RuntimeResolver for NoDiscovery {
    fn best_available(&self) -> Option<PathBuf> {
        None
    }
}

/// Resolves the executable to launch for a configured runtime path.
///
/// - The sentinel (or an empty value) prefers a discovered install and
///   otherwise stays as the sentinel, leaving lookup to `PATH`.
/// - A concrete path that exists is used as is.
/// - A concrete path that is gone falls back to a discovered install.
///
/// Never fails: when nothing better is known the configured value is
/// returned and a bad path surfaces later as a spawn error.
pub fn resolve_runtime(configured: &str, resolver: &dyn RuntimeResolver) -> String {
    let configured = configured.trim();

    if configured.is_empty() || configured == SYSTEM_DEFAULT_RUNTIME {
        return match resolver.best_available() {
            Some(found) => {
                tracing::debug!(runtime = %found.display(), "Using discovered runtime for system default");
                found.to_string_lossy().into_owned()
            }
            None => SYSTEM_DEFAULT_RUNTIME.to_string(),
        };
    }

    if Path::new(configured).exists() {
        return configured.to_string();
    }

    match resolver.best_available() {
        Some(found) => {
            tracing::warn!(
                configured = %configured,
                fallback = %found.display(),
                "Configured runtime is missing, falling back to discovered install"
            );
            found.to_string_lossy().into_owned()
        }
        None => {
            tracing::warn!(configured = %configured, "Configured runtime is missing and no install was discovered");
            configured.to_string()
        }
    }
}
