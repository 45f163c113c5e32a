//! Session state: active graph and version pin

use std::fmt;

use crate::error::{Result, TuringError};

/// Graph selected by a fresh session
pub const DEFAULT_GRAPH: &str = "default";

/// `checkout` sentinel meaning "no change pinned"
pub const MAIN: &str = "main";

/// `checkout` sentinel meaning "no commit pinned"
pub const HEAD: &str = "HEAD";

/// What version of the graph queries run against.
///
/// A change and a commit are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Pin {
    #[default]
    Default,
    Change(String),
    Commit(String),
}

impl fmt::Display for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pin::Default => write!(f, "{}@{}", MAIN, HEAD),
            Pin::Change(id) => write!(f, "change {}", id),
            Pin::Commit(id) => write!(f, "commit {}", id),
        }
    }
}

/// Change identifier as sent to the server.
///
/// Numeric ids are rendered in lowercase hexadecimal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeId(String);

impl ChangeId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<u64> for ChangeId {
    fn from(id: u64) -> Self {
        ChangeId(format!("{:x}", id))
    }
}

impl From<&str> for ChangeId {
    fn from(id: &str) -> Self {
        ChangeId(id.to_string())
    }
}

impl From<String> for ChangeId {
    fn from(id: String) -> Self {
        ChangeId(id)
    }
}

impl fmt::Display for ChangeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    graph: String,
    pin: Pin,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            graph: DEFAULT_GRAPH.to_string(),
            pin: Pin::Default,
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn graph(&self) -> &str {
        &self.graph
    }

    pub fn set_graph(&mut self, name: impl Into<String>) {
        self.graph = name.into();
    }

    pub fn pin(&self) -> &Pin {
        &self.pin
    }

    /// Pin a change, replacing any pinned commit
    pub fn set_change(&mut self, change: impl Into<ChangeId>) {
        self.pin = Pin::Change(change.into().into_string());
    }

    /// Pin a commit, replacing any pinned change
    pub fn set_commit(&mut self, commit: impl Into<String>) {
        self.pin = Pin::Commit(commit.into());
    }

    /// Move the session to a change, a commit, or back to the default.
    ///
    /// `MAIN` and `HEAD` mean "unpinned" on their axis, so
    /// `checkout(MAIN, HEAD)` always lands on `Pin::Default`.
    pub fn checkout(&mut self, change: impl Into<ChangeId>, commit: &str) -> Result<()> {
        let change = change.into();
        let pin_change = change.as_str() != MAIN;
        let pin_commit = commit != HEAD;

        self.pin = match (pin_change, pin_commit) {
            (false, false) => Pin::Default,
            (true, false) => Pin::Change(change.into_string()),
            (false, true) => Pin::Commit(commit.to_string()),
            (true, true) => {
                return Err(TuringError::InvalidState(format!(
                    "cannot pin change {} and commit {} at the same time",
                    change, commit
                )))
            }
        };

        Ok(())
    }

    /// Fail unless no change or commit is pinned
    pub fn ensure_unpinned(&self) -> Result<()> {
        match &self.pin {
            Pin::Default => Ok(()),
            pinned => Err(TuringError::InvalidState(format!(
                "a new change can only be opened from {}@{}, session is on {}",
                MAIN, HEAD, pinned
            ))),
        }
    }

    /// Query-string parameters for the current state
    pub fn params(&self) -> Vec<(String, String)> {
        let mut params = vec![("graph".to_string(), self.graph.clone())];
        match &self.pin {
            Pin::Default => {}
            Pin::Change(id) => params.push(("change".to_string(), id.clone())),
            Pin::Commit(id) => params.push(("commit".to_string(), id.clone())),
        }
        params
    }
}
