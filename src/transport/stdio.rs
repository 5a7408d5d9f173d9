use crate::error::{Error, Result};
use async_process::ChildStdin;
use futures_lite::io::{AsyncBufReadExt, AsyncRead, AsyncWriteExt, BufReader};
use serde::Serialize;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// Which output pipe a console line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputStream {
    /// Standard output.
    Stdout,
    /// Standard error.
    Stderr,
}

/// Writable side of a server console.
///
/// Wraps the child's stdin so commands from different tasks are written
/// whole, one line at a time.
pub struct ConsoleInput {
    /// Server name, for diagnostics
    name: String,
    /// Child process stdin
    stdin: Mutex<ChildStdin>,
}

impl ConsoleInput {
    /// Takes ownership of a child's stdin.
    pub fn new(name: impl Into<String>, stdin: ChildStdin) -> Self {
        Self {
            name: name.into(),
            stdin: Mutex::new(stdin),
        }
    }

    /// Gets the name of the server this console belongs to.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Writes `text` followed by a newline and flushes.
    ///
    /// # Errors
    ///
    /// [`Error::NotWritable`] if the pipe is closed, typically because the
    /// process already exited.
    pub async fn write_line(&self, text: &str) -> Result<()> {
        let mut data = Vec::with_capacity(text.len() + 1);
        data.extend_from_slice(text.as_bytes());
        data.push(b'\n');

        let mut stdin = self.stdin.lock().await;
        stdin
            .write_all(&data)
            .await
            .map_err(|e| Error::NotWritable(format!("Failed to write to {} stdin: {}", self.name, e)))?;
        stdin
            .flush()
            .await
            .map_err(|e| Error::NotWritable(format!("Failed to flush {} stdin: {}", self.name, e)))?;

        Ok(())
    }
}

/// Spawns a task that feeds every line of `reader` to `on_line`.
///
/// Line terminators are stripped and invalid UTF-8 is replaced rather than
/// ending the stream. The task ends at EOF or on a read error.
pub fn spawn_line_reader<R, F>(reader: R, stream: OutputStream, mut on_line: F) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
    F: FnMut(String) + Send + 'static,
{
    tokio::spawn(async move {
        let mut reader = BufReader::new(reader);
        let mut buffer = Vec::new();

        loop {
            buffer.clear();
            match reader.read_until(b'\n', &mut buffer).await {
                Ok(0) => break,
                Ok(_) => {
                    let line = String::from_utf8_lossy(&buffer);
                    on_line(line.trim_end_matches(['\n', '\r']).to_string());
                }
                Err(e) => {
                    tracing::debug!(stream = ?stream, error = %e, "Console reader stopped");
                    break;
                }
            }
        }
    })
}
