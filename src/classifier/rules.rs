use super::LogEvent;
use crate::error::{Error, Result};
use regex::Regex;
use std::sync::LazyLock;

/// What a rule recognises, and therefore which named groups it needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    /// Startup finished.
    Ready,
    /// A player joined; needs `name`.
    PlayerJoin,
    /// A player left; needs `name`.
    PlayerLeave,
    /// A player's UUID was reported; needs `name` and `uuid`.
    PlayerUuid,
    /// A ticks-per-second sample; needs `tps`.
    TpsReport,
    /// The crash report banner.
    CrashMarker,
}

impl RuleKind {
    /// Named capture groups a pattern for this kind must define.
    pub fn required_groups(self) -> &'static [&'static str] {
        match self {
            RuleKind::Ready | RuleKind::CrashMarker => &[],
            RuleKind::PlayerJoin | RuleKind::PlayerLeave => &["name"],
            RuleKind::PlayerUuid => &["name", "uuid"],
            RuleKind::TpsReport => &["tps"],
        }
    }
}

/// One entry of the classifier table: a kind and the pattern that detects it.
#[derive(Debug, Clone)]
pub struct ClassifierRule {
    kind: RuleKind,
    regex: Regex,
}

impl ClassifierRule {
    /// Compiles a rule, checking the pattern defines the groups `kind` reads.
    ///
    /// # Errors
    ///
    /// [`Error::ConfigInvalid`] if the pattern does not compile or lacks a
    /// required named group.
    pub fn new(kind: RuleKind, pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|e| {
            Error::ConfigInvalid(format!("Invalid classifier pattern '{}': {}", pattern, e))
        })?;

        for group in kind.required_groups() {
            if !regex.capture_names().flatten().any(|n| n == *group) {
                return Err(Error::ConfigInvalid(format!(
                    "Classifier pattern for {:?} must define a named group '{}'",
                    kind, group
                )));
            }
        }

        Ok(Self { kind, regex })
    }

    /// The kind of event this rule produces.
    pub fn kind(&self) -> RuleKind {
        self.kind
    }

    /// The source pattern.
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// Applies the rule to a line.
    ///
    /// A TPS capture that does not parse as a number is treated as no match
    /// so later rules still get a chance.
    pub fn apply(&self, line: &str) -> Option<LogEvent> {
        let caps = self.regex.captures(line)?;
        let group = |name: &str| caps.name(name).map(|m| m.as_str().to_string());

        match self.kind {
            RuleKind::Ready => Some(LogEvent::Ready),
            RuleKind::CrashMarker => Some(LogEvent::CrashMarker),
            RuleKind::PlayerJoin => Some(LogEvent::PlayerJoin {
                username: group("name")?,
            }),
            RuleKind::PlayerLeave => Some(LogEvent::PlayerLeave {
                username: group("name")?,
            }),
            RuleKind::PlayerUuid => Some(LogEvent::PlayerUuid {
                username: group("name")?,
                uuid: group("uuid")?,
            }),
            RuleKind::TpsReport => {
                let raw = group("tps")?.replace(',', ".");
                let tps = raw.parse::<f64>().ok().filter(|v| v.is_finite())?;
                Some(LogEvent::TpsReport { tps })
            }
        }
    }
}

const PLAYER_NAME: &str = r"\.?[A-Za-z0-9_]{1,16}";
const DECIMAL: &str = r"\d+(?:[.,]\d+)?";

/// Built-in patterns, in match order.
fn default_patterns() -> Vec<(RuleKind, String)> {
    vec![
        (RuleKind::Ready, format!(r"Done \({DECIMAL}s\)!")),
        (
            RuleKind::PlayerJoin,
            format!(r"(?:^|: )(?P<name>{PLAYER_NAME}) joined the game\s*$"),
        ),
        (
            RuleKind::PlayerLeave,
            format!(r"(?:^|: )(?P<name>{PLAYER_NAME}) left the game\s*$"),
        ),
        (
            RuleKind::PlayerUuid,
            format!(
                r"UUID of player (?P<name>{PLAYER_NAME}) is (?P<uuid>[0-9a-fA-F]{{8}}-?[0-9a-fA-F]{{4}}-?[0-9a-fA-F]{{4}}-?[0-9a-fA-F]{{4}}-?[0-9a-fA-F]{{12}})"
            ),
        ),
        // Paper/Spigot `/tps`; the first value is the one-minute average.
        (
            RuleKind::TpsReport,
            format!(r"TPS from last 1m, 5m, 15m:\s*[^\d]*?(?P<tps>{DECIMAL})"),
        ),
        // Forge `/forge tps` overall line.
        (
            RuleKind::TpsReport,
            format!(r"Mean TPS:\s*(?P<tps>{DECIMAL})"),
        ),
        (
            RuleKind::CrashMarker,
            r"---- Minecraft Crash Report ----".to_string(),
        ),
    ]
}

static DEFAULT_RULES: LazyLock<Vec<ClassifierRule>> = LazyLock::new(|| {
    default_patterns()
        .into_iter()
        .filter_map(|(kind, pattern)| match ClassifierRule::new(kind, &pattern) {
            Ok(rule) => Some(rule),
            Err(e) => {
                tracing::error!(error = %e, "Dropping built-in classifier rule");
                None
            }
        })
        .collect()
});

/// The built-in rule table.
pub fn default_rules() -> Vec<ClassifierRule> {
    DEFAULT_RULES.clone()
}
