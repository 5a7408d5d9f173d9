//! Launch preparation: JVM arguments and the files a server expects on disk.
pub mod args;
pub mod eula;

pub use args::{DEFAULT_JVM_FLAGS, build_jvm_args, entry_args_for, jvm_args_for};
pub use eula::{EULA_FILE, accept_eula};
