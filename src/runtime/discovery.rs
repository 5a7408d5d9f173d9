use super::RuntimeResolver;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;

#[cfg(windows)]
const JAVA_EXE: &str = "java.exe";
#[cfg(not(windows))]
const JAVA_EXE: &str = "java";

/// A Java installation found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JavaInstall {
    /// Path of the `java` executable.
    pub path: PathBuf,
    /// Major feature version (8, 17, 21, ...).
    pub major: u32,
}

/// Parses the major version from the first line of `java -version`.
///
/// Handles the formats seen in the wild:
/// - `openjdk version "21.0.2" 2024-01-16`
/// - `java version "1.8.0_402"` (legacy `1.x` numbering)
/// - `openjdk 21.0.2 2024-01-16` (no quotes)
pub fn parse_java_major(first_line: &str) -> Option<u32> {
    let version = match first_line.split('"').nth(1) {
        Some(quoted) => quoted,
        // The version token comes before the release date, so the first
        // digit-led token is the right one.
        None => first_line
            .split_whitespace()
            .find(|t| t.starts_with(|c: char| c.is_ascii_digit()))?,
    };

    let leading_number = |s: &str| -> Option<u32> {
        let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
        s[..end].parse().ok()
    };

    let mut parts = version.split('.');
    let first = parts.next()?;
    if first == "1" {
        leading_number(parts.next()?)
    } else {
        leading_number(first)
    }
}

/// Probes an executable with `-version` and returns its major version.
fn probe_major(java: &Path) -> Option<u32> {
    let out = Command::new(java).arg("-version").output().ok()?;
    // The JDK prints its banner on stderr; some wrappers use stdout.
    let text = if out.stderr.is_empty() {
        String::from_utf8_lossy(&out.stdout).into_owned()
    } else {
        String::from_utf8_lossy(&out.stderr).into_owned()
    };
    parse_java_major(text.lines().next().unwrap_or_default())
}

fn default_roots() -> Vec<PathBuf> {
    let mut roots = Vec::new();

    if let Some(home) = std::env::var_os("JAVA_HOME") {
        roots.push(PathBuf::from(home));
    }

    for dir in [
        "/usr/lib/jvm",
        "/usr/java",
        "/opt/java",
        "/Library/Java/JavaVirtualMachines",
        r"C:\Program Files\Java",
        r"C:\Program Files\Eclipse Adoptium",
    ] {
        roots.push(PathBuf::from(dir));
    }

    if let Some(user_home) = std::env::var_os("HOME") {
        roots.push(
            PathBuf::from(user_home)
                .join(".sdkman")
                .join("candidates")
                .join("java"),
        );
    }

    roots
}

/// Candidate executables below a root: the root itself as a JDK home, and
/// every direct child as one (including the macOS bundle layout).
fn candidates_under(root: &Path) -> Vec<PathBuf> {
    let mut out = Vec::new();

    let direct = root.join("bin").join(JAVA_EXE);
    if direct.is_file() {
        out.push(direct);
    }

    let Ok(entries) = std::fs::read_dir(root) else {
        return out;
    };
    for entry in entries.flatten() {
        let home = entry.path();
        for exe in [
            home.join("bin").join(JAVA_EXE),
            home.join("Contents").join("Home").join("bin").join(JAVA_EXE),
        ] {
            if exe.is_file() {
                out.push(exe);
            }
        }
    }

    out
}

/// Discovers Java installations in the usual install locations.
///
/// Scanning runs once per value, on first use; the newest major version
/// wins, with the shorter path breaking ties.
#[derive(Debug)]
pub struct JavaDiscovery {
    roots: Vec<PathBuf>,
    installs: OnceLock<Vec<JavaInstall>>,
}

impl JavaDiscovery {
    /// Discovery over `JAVA_HOME`, the platform JVM directories and SDKMAN.
    pub fn new() -> Self {
        Self::with_roots(default_roots())
    }

    /// Discovery over an explicit set of root directories.
    pub fn with_roots(roots: Vec<PathBuf>) -> Self {
        Self {
            roots,
            installs: OnceLock::new(),
        }
    }

    /// All installations found, best first.
    pub fn installs(&self) -> &[JavaInstall] {
        self.installs.get_or_init(|| {
            let mut found: Vec<JavaInstall> = Vec::new();
            for root in &self.roots {
                for path in candidates_under(root) {
                    if found.iter().any(|i| i.path == path) {
                        continue;
                    }
                    match probe_major(&path) {
                        Some(major) => found.push(JavaInstall { path, major }),
                        None => {
                            tracing::debug!(path = %path.display(), "Skipping java candidate with unreadable version")
                        }
                    }
                }
            }
            found.sort_by(|a, b| {
                b.major.cmp(&a.major).then_with(|| {
                    a.path
                        .components()
                        .count()
                        .cmp(&b.path.components().count())
                })
            });
            tracing::debug!(count = found.len(), "Java discovery finished");
            found
        })
    }
}

impl Default for JavaDiscovery {
    fn default() -> Self {
        Self::new()
    }
}

impl RuntimeResolver for JavaDiscovery {
    fn best_available(&self) -> Option<PathBuf> {
        self.installs().first().map(|i| i.path.clone())
    }
}
