pub mod stdio;

pub use stdio::{ConsoleInput, OutputStream, spawn_line_reader};
