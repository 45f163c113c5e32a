/*!
 * TuringDB client
 *
 * A client library for the TuringDB graph database service:
 * - Sessions bound to a graph, optionally pinned to a change or commit
 * - Queries decoded into typed, column-oriented tables
 * - Data transfer between local files, S3 and TuringDB's own storage,
 *   relayed through scratch objects when no direct path exists
 *
 * ```no_run
 * use turingdb::{ClientConfig, TuringDB};
 *
 * #[tokio::main]
 * async fn main() -> turingdb::Result<()> {
 *     let mut client = TuringDB::new(&ClientConfig::default())?;
 *     client.set_graph("reactome");
 *     let table = client.query("MATCH (n) RETURN n.displayName").await?;
 *     println!("{} rows", table.num_rows());
 *     Ok(())
 * }
 * ```
 */

pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod protocol;
pub mod table;
pub mod transfer;

// Re-export commonly used types
pub use client::{Command, Pin, QueryChannel, QueryResult, QueryTiming, Session, TuringDB};
pub use config::{ClientConfig, LogLevel};
pub use error::{ErrorCategory, Result, TuringError};
pub use protocol::s3::{ObjectStore, S3Config, S3Error, StoreCredentials};
pub use protocol::{classify, StorageDomain, TransferPath};
pub use table::{Column, ColumnData, ColumnType, ResultTable, Value};
pub use transfer::{CleanupScope, TransferOptions, TransferRouter, TransferStrategy};

#[cfg(feature = "s3-native")]
pub use protocol::s3::S3Client;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
