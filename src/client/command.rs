//! Textual commands understood by the query endpoint

use std::fmt;

/// A command sent as query text.
///
/// `Display` renders the exact wire form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Register object-store credentials with the service
    S3Connect {
        access_key: String,
        secret_key: String,
        region: String,
    },
    /// Service copies `src` from its storage to the object store at `dst`
    S3Push { src: String, dst: String },
    /// Service copies `src` from the object store into its storage at `dst`
    S3Pull { src: String, dst: String },
    /// Open a new change on the current graph
    ChangeNew,
    CreateGraph(String),
    ListGraph,
}

impl Command {
    /// Short name used in log events; never includes credentials
    pub fn kind(&self) -> &'static str {
        match self {
            Command::S3Connect { .. } => "S3 CONNECT",
            Command::S3Push { .. } => "S3 PUSH",
            Command::S3Pull { .. } => "S3 PULL",
            Command::ChangeNew => "CHANGE NEW",
            Command::CreateGraph(_) => "create graph",
            Command::ListGraph => "LIST GRAPH",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::S3Connect {
                access_key,
                secret_key,
                region,
            } => write!(
                f,
                "S3 CONNECT \"{}\" \"{}\" \"{}\"",
                access_key, secret_key, region
            ),
            Command::S3Push { src, dst } => write!(f, "S3 PUSH \"{}\" \"{}\"", src, dst),
            Command::S3Pull { src, dst } => write!(f, "S3 PULL \"{}\" \"{}\"", src, dst),
            Command::ChangeNew => write!(f, "CHANGE NEW"),
            Command::CreateGraph(name) => write!(f, "create graph {}", name),
            Command::ListGraph => write!(f, "LIST GRAPH"),
        }
    }
}
