use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Name of the license acceptance file read by the server on boot.
pub const EULA_FILE: &str = "eula.txt";

/// Records acceptance of the server EULA in `working_dir`.
///
/// The file is rewritten on every launch; the server refuses to start
/// without it.
pub fn accept_eula(working_dir: &Path) -> Result<PathBuf> {
    let path = working_dir.join(EULA_FILE);
    std::fs::write(&path, b"eula=true\n").map_err(|e| {
        Error::ConfigValidation(format!(
            "Failed to write {}: {}",
            path.display(),
            e
        ))
    })?;
    Ok(path)
}
