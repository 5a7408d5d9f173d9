//! Console line classification.
//!
//! Game servers announce their state only through free-form console text.
//! [`LogClassifier`] maps a single line to at most one [`LogEvent`] by
//! running an ordered table of [`ClassifierRule`]s; the first rule that
//! matches wins.
//!
//! Classification is best-effort. Vanilla servers and their forks word the
//! same event differently, so the table can be extended, and a line that no
//! rule recognises is not an error. Two TPS report formats are known (the
//! Paper/Spigot `/tps` line and the Forge mean-TPS line); other forks need
//! an extra rule.
//!
//! # Examples
//!
//! ```
//! use gameserver_supervisor::classifier::{ClassifierRule, LogClassifier, LogEvent, RuleKind};
//!
//! let mut classifier = LogClassifier::new();
//! assert_eq!(
//!     classifier.classify("[12:00:01] [Server thread/INFO]: Steve joined the game"),
//!     Some(LogEvent::PlayerJoin { username: "Steve".to_string() })
//! );
//!
//! // A proxy fork with its own wording
//! classifier.push_rule(ClassifierRule::new(RuleKind::PlayerJoin, r"\[\+\] (?P<name>\w+)$").unwrap());
//! assert!(classifier.classify("[+] Alex").is_some());
//! ```
mod rules;

pub use rules::{ClassifierRule, RuleKind, default_rules};

use serde::Serialize;

/// A semantic event recovered from one console line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LogEvent {
    /// The server finished starting.
    Ready,
    /// A named player joined.
    PlayerJoin { username: String },
    /// A named player left.
    PlayerLeave { username: String },
    /// The server reported the UUID of a player.
    PlayerUuid { username: String, uuid: String },
    /// A recent ticks-per-second sample.
    TpsReport { tps: f64 },
    /// The crash report banner was printed.
    CrashMarker,
}

/// Ordered, stateless rule table.
#[derive(Debug, Clone)]
pub struct LogClassifier {
    rules: Vec<ClassifierRule>,
}

impl LogClassifier {
    /// Classifier with the built-in rules.
    pub fn new() -> Self {
        Self::with_rules(default_rules())
    }

    /// Classifier with an explicit rule table, in match order.
    pub fn with_rules(rules: Vec<ClassifierRule>) -> Self {
        Self { rules }
    }

    /// Appends a rule; it is consulted after every existing rule.
    pub fn push_rule(&mut self, rule: ClassifierRule) {
        self.rules.push(rule);
    }

    /// The rule table in match order.
    pub fn rules(&self) -> &[ClassifierRule] {
        &self.rules
    }

    /// Maps a line to the event of the first matching rule.
    pub fn classify(&self, line: &str) -> Option<LogEvent> {
        self.rules.iter().find_map(|rule| rule.apply(line))
    }
}

impl Default for LogClassifier {
    fn default() -> Self {
        Self::new()
    }
}
