/*!
 * In-memory doubles for the request channel and the object store
 *
 * Both record every call so tests can assert on exactly what went over the
 * wire and which blob operations ran.
 */

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use turingdb::client::{ChannelRequest, QueryChannel};
use turingdb::protocol::s3::{ObjectStore, S3Error, S3Result, StoreCredentials};
use turingdb::{ClientConfig, Result, TuringDB, TuringError};

pub const BUCKET: &str = "bucket";

/// Empty successful query result
pub fn empty_table() -> Value {
    json!({"header": {"column_names": [], "column_types": []}, "data": []})
}

/// Single-cell result, as returned by commands like `CHANGE NEW`
pub fn single_value(column_type: &str, value: Value) -> Value {
    json!({
        "header": {"column_names": ["value"], "column_types": [column_type]},
        "data": [[[value]]]
    })
}

#[derive(Clone)]
enum Reply {
    Json(Value),
    Transport(String),
}

/// Request channel that answers from a rule table.
///
/// A rule matches when its key equals the endpoint or prefixes the query
/// text. Unmatched requests get an empty table.
#[derive(Default)]
pub struct MockChannel {
    requests: Mutex<Vec<ChannelRequest>>,
    rules: Mutex<Vec<(String, Reply)>>,
}

impl MockChannel {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, matcher: &str, response: Value) {
        self.rules
            .lock()
            .push((matcher.to_string(), Reply::Json(response)));
    }

    pub fn fail(&self, matcher: &str, message: &str) {
        self.rules
            .lock()
            .push((matcher.to_string(), Reply::Transport(message.to_string())));
    }

    pub fn requests(&self) -> Vec<ChannelRequest> {
        self.requests.lock().clone()
    }

    /// Text of every query sent, in order
    pub fn queries(&self) -> Vec<String> {
        self.requests
            .lock()
            .iter()
            .filter_map(|r| r.text().map(str::to_string))
            .collect()
    }

    pub fn clear(&self) {
        self.requests.lock().clear();
    }
}

#[async_trait]
impl QueryChannel for MockChannel {
    async fn send(&self, request: ChannelRequest) -> Result<Value> {
        let reply = {
            let rules = self.rules.lock();
            rules
                .iter()
                .find(|(matcher, _)| {
                    request.endpoint == *matcher
                        || request.text().is_some_and(|t| t.starts_with(matcher.as_str()))
                })
                .map(|(_, reply)| reply.clone())
        };
        self.requests.lock().push(request);

        match reply {
            Some(Reply::Json(value)) => Ok(value),
            Some(Reply::Transport(message)) => Err(TuringError::Transport(message)),
            None => Ok(empty_table()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Put { path: PathBuf, key: String },
    Get { key: String, path: PathBuf },
    DeleteByPrefix(String),
}

/// Object store that only records calls
pub struct MockStore {
    credentials: StoreCredentials,
    calls: Mutex<Vec<StoreCall>>,
    fail_put: bool,
    fail_get: bool,
    fail_delete: bool,
    hang_put: bool,
}

impl MockStore {
    pub fn new() -> Self {
        Self {
            credentials: StoreCredentials::new("AK", "SK", "eu-west-2"),
            calls: Mutex::new(Vec::new()),
            fail_put: false,
            fail_get: false,
            fail_delete: false,
            hang_put: false,
        }
    }

    pub fn failing_put(mut self) -> Self {
        self.fail_put = true;
        self
    }

    pub fn failing_get(mut self) -> Self {
        self.fail_get = true;
        self
    }

    pub fn failing_delete(mut self) -> Self {
        self.fail_delete = true;
        self
    }

    /// `put` never completes
    pub fn hanging_put(mut self) -> Self {
        self.hang_put = true;
        self
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().clone()
    }

    pub fn deletes(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                StoreCall::DeleteByPrefix(prefix) => Some(prefix),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl ObjectStore for MockStore {
    fn bucket(&self) -> &str {
        BUCKET
    }

    fn credentials(&self) -> &StoreCredentials {
        &self.credentials
    }

    async fn put(&self, local_path: &Path, key: &str) -> S3Result<()> {
        self.calls.lock().push(StoreCall::Put {
            path: local_path.to_path_buf(),
            key: key.to_string(),
        });

        if self.hang_put {
            std::future::pending::<()>().await;
        }
        if self.fail_put {
            return Err(S3Error::AccessDenied("put denied".to_string()));
        }
        Ok(())
    }

    async fn get(&self, key: &str, local_path: &Path) -> S3Result<()> {
        self.calls.lock().push(StoreCall::Get {
            key: key.to_string(),
            path: local_path.to_path_buf(),
        });

        if self.fail_get {
            return Err(S3Error::NotFound {
                bucket: BUCKET.to_string(),
                key: key.to_string(),
            });
        }
        Ok(())
    }

    async fn delete_by_prefix(&self, prefix: &str) -> S3Result<usize> {
        self.calls
            .lock()
            .push(StoreCall::DeleteByPrefix(prefix.to_string()));

        if self.fail_delete {
            return Err(S3Error::Network("connection reset".to_string()));
        }
        Ok(1)
    }
}

/// Client over a mock channel, with default config
pub fn client(channel: &Arc<MockChannel>) -> TuringDB {
    TuringDB::with_channel(channel.clone(), &ClientConfig::default())
}
