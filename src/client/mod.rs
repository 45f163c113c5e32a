/*!
 * Connection to a TuringDB service
 *
 * [`TuringDB`] owns the request channel and the session state (active graph,
 * change or commit pin), decodes query responses into [`ResultTable`]s and,
 * once an object store is attached, routes data transfers.
 */

pub mod channel;
pub mod command;
pub mod session;
pub mod timing;

use parking_lot::Mutex;
use serde_json::Value as Json;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub use channel::{ChannelRequest, HttpChannel, QueryChannel, RequestBody};
pub use command::Command;
pub use session::{ChangeId, Pin, Session, DEFAULT_GRAPH, HEAD, MAIN};
pub use timing::{QueryResult, QueryTiming};

use crate::config::ClientConfig;
use crate::error::{Result, TuringError, GRAPH_ALREADY_EXISTS};
use crate::protocol::s3::ObjectStore;
use crate::table::{self, ResultTable, Value};
use crate::transfer::{RemoteGateway, TransferOptions, TransferRouter};

const QUERY_ENDPOINT: &str = "query";
const LIST_AVAILABLE_ENDPOINT: &str = "list_avail_graphs";
const LIST_LOADED_ENDPOINT: &str = "list_loaded_graphs";
const LOAD_GRAPH_ENDPOINT: &str = "load_graph";

/// Client for one TuringDB session
pub struct TuringDB {
    channel: Arc<dyn QueryChannel>,
    session: Session,
    timeout: Mutex<Duration>,
    probe_timeout: Duration,
    last_timing: Mutex<Option<QueryTiming>>,
    #[cfg(feature = "s3-native")]
    transfer_options: TransferOptions,
    router: Option<TransferRouter>,
}

impl TuringDB {
    /// Connect over HTTP using `config`
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let channel = HttpChannel::new(config)?;
        Ok(Self::with_channel(Arc::new(channel), config))
    }

    /// Use an existing channel
    pub fn with_channel(channel: Arc<dyn QueryChannel>, config: &ClientConfig) -> Self {
        Self {
            channel,
            session: Session::new(),
            timeout: Mutex::new(config.timeout()),
            probe_timeout: config.probe_timeout(),
            last_timing: Mutex::new(None),
            #[cfg(feature = "s3-native")]
            transfer_options: config.transfer.clone(),
            router: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn graph(&self) -> &str {
        self.session.graph()
    }

    pub fn set_graph(&mut self, name: impl Into<String>) {
        self.session.set_graph(name);
        info!(graph = %self.session.graph(), "graph selected");
    }

    pub fn set_change(&mut self, change: impl Into<ChangeId>) {
        self.session.set_change(change);
        info!(pin = %self.session.pin(), "session pinned");
    }

    pub fn set_commit(&mut self, commit: impl Into<String>) {
        self.session.set_commit(commit);
        info!(pin = %self.session.pin(), "session pinned");
    }

    /// See [`Session::checkout`]
    pub fn checkout(&mut self, change: impl Into<ChangeId>, commit: &str) -> Result<()> {
        self.session.checkout(change, commit)?;
        info!(pin = %self.session.pin(), "checked out");
        Ok(())
    }

    /// Open a new change and pin the session to it.
    ///
    /// Only allowed when neither a change nor a commit is pinned.
    pub async fn new_change(&mut self) -> Result<String> {
        self.session.ensure_unpinned()?;

        let table = self.run_command(&Command::ChangeNew).await?.table;
        let id = match table.first_value() {
            Some(Value::String(id)) => id.to_string(),
            Some(Value::Int64(id)) if id >= 0 => ChangeId::from(id as u64).into_string(),
            Some(Value::UInt64(id)) => ChangeId::from(id).into_string(),
            other => {
                return Err(TuringError::MalformedResponse(format!(
                    "CHANGE NEW returned {:?} instead of a change id",
                    other
                )))
            }
        };

        self.session.set_change(id.as_str());
        info!(change = %id, "new change opened");
        Ok(id)
    }

    /// Run a query and decode its result
    pub async fn query(&self, text: &str) -> Result<ResultTable> {
        Ok(self.query_with_timing(text).await?.table)
    }

    /// Run a query, returning the table with the timing of this call
    pub async fn query_with_timing(&self, text: &str) -> Result<QueryResult> {
        debug!(graph = %self.session.graph(), query = text, "query");
        self.execute(text).await
    }

    pub async fn create_graph(&self, name: &str) -> Result<ResultTable> {
        Ok(self
            .run_command(&Command::CreateGraph(name.to_string()))
            .await?
            .table)
    }

    /// Graphs the service can load
    pub async fn list_available_graphs(&self) -> Result<Vec<String>> {
        let response = self
            .request(ChannelRequest::new(LIST_AVAILABLE_ENDPOINT, self.timeout()))
            .await?;
        string_list(response.get("data"), "data")
    }

    /// Graphs currently loaded on the service
    pub async fn list_loaded_graphs(&self) -> Result<Vec<String>> {
        let response = self
            .request(ChannelRequest::new(LIST_LOADED_ENDPOINT, self.timeout()))
            .await?;
        let names = response
            .get("data")
            .and_then(|data| data.get(0))
            .and_then(|chunk| chunk.get(0));
        string_list(names, "data[0][0]")
    }

    /// Whether the session's graph is loaded
    pub async fn is_graph_loaded(&self) -> Result<bool> {
        let loaded = self.list_loaded_graphs().await?;
        Ok(loaded.iter().any(|name| name == self.session.graph()))
    }

    /// Ask the service to load `name`.
    ///
    /// With `raise_if_loaded` unset, an already-loaded graph is not an error.
    pub async fn load_graph(&self, name: &str, raise_if_loaded: bool) -> Result<()> {
        let request = ChannelRequest::new(LOAD_GRAPH_ENDPOINT, self.timeout())
            .with_params(vec![("graph".to_string(), name.to_string())]);

        match self.request(request).await {
            Ok(_) => {
                info!(graph = name, "graph loaded");
                Ok(())
            }
            Err(TuringError::Remote { ref message, .. })
                if !raise_if_loaded && message == GRAPH_ALREADY_EXISTS =>
            {
                debug!(graph = name, "graph already loaded");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Active global request timeout
    pub fn timeout(&self) -> Duration {
        *self.timeout.lock()
    }

    pub fn set_timeout(&self, timeout: Duration) {
        *self.timeout.lock() = timeout;
    }

    /// Whether the service answers within the probe timeout
    pub async fn try_reach(&self) -> bool {
        let _bound = TimeoutOverride::new(&self.timeout, self.probe_timeout);

        match self
            .request(ChannelRequest::new(LIST_AVAILABLE_ENDPOINT, self.timeout()))
            .await
        {
            Ok(_) => true,
            Err(e) => {
                debug!(error = %e, "service not reachable");
                false
            }
        }
    }

    /// Issue a cheap query so the service is ready for real work
    pub async fn warmup(&self) -> Result<()> {
        let _bound = TimeoutOverride::new(&self.timeout, self.probe_timeout);
        self.run_command(&Command::ListGraph).await.map(|_| ())
    }

    /// Timing of the most recent query
    pub fn last_timing(&self) -> Option<QueryTiming> {
        *self.last_timing.lock()
    }

    /// Wall-clock time of the most recent query, in milliseconds
    pub fn total_exec_time_ms(&self) -> Option<f64> {
        self.last_timing().map(|t| t.total_ms())
    }

    /// Server-side execution time of the most recent query, in milliseconds
    pub fn query_exec_time_ms(&self) -> Option<f64> {
        self.last_timing().and_then(|t| t.execution_ms())
    }

    /// Register `store`'s credentials with the service and route transfers through it
    pub async fn attach_object_store(
        &mut self,
        store: Arc<dyn ObjectStore>,
        options: TransferOptions,
    ) -> Result<()> {
        options.validate()?;

        let credentials = store.credentials();
        let connect = Command::S3Connect {
            access_key: credentials.access_key.clone(),
            secret_key: credentials.secret_key.clone(),
            region: credentials.region.clone(),
        };
        self.run_command(&connect).await?;

        info!(bucket = %store.bucket(), use_scratch = options.use_scratch, "object store attached");
        self.router = Some(TransferRouter::new(store, options));
        Ok(())
    }

    /// Build an S3 client from `config` and attach it with the configured transfer options
    #[cfg(feature = "s3-native")]
    pub async fn s3_connect(&mut self, config: crate::protocol::s3::S3Config) -> Result<()> {
        config.validate()?;
        let client = crate::protocol::s3::S3Client::new(config).await?;
        let options = self.transfer_options.clone();
        self.attach_object_store(Arc::new(client), options).await
    }

    pub fn router(&self) -> Option<&TransferRouter> {
        self.router.as_ref()
    }

    /// Copy `src` to `dst`; see [`TransferRouter::transfer`]
    pub async fn transfer(&self, src: &str, dst: &str) -> Result<()> {
        let router = self.router.as_ref().ok_or_else(|| {
            TuringError::NotConnected("no object store attached".to_string())
        })?;
        router.transfer(self, src, dst).await
    }

    async fn run_command(&self, command: &Command) -> Result<QueryResult> {
        debug!(graph = %self.session.graph(), command = command.kind(), "command");
        self.execute(&command.to_string()).await
    }

    async fn execute(&self, text: &str) -> Result<QueryResult> {
        let request = ChannelRequest::new(QUERY_ENDPOINT, self.timeout())
            .with_text(text)
            .with_params(self.session.params());

        // A failed query has no timing
        *self.last_timing.lock() = None;

        let start = Instant::now();
        let response = self.request(request).await?;

        if !response.is_object() {
            return Err(TuringError::MalformedResponse(
                "query response is not an object".to_string(),
            ));
        }

        let table = table::decode(&response)?;
        let timing = QueryTiming {
            total: start.elapsed(),
            execution: table::execution_time(&response),
        };
        *self.last_timing.lock() = Some(timing);

        Ok(QueryResult { table, timing })
    }

    /// Send a request and surface payload-level errors
    async fn request(&self, request: ChannelRequest) -> Result<Json> {
        let response = self.channel.send(request).await?;
        check_error(&response)?;
        Ok(response)
    }
}

#[async_trait::async_trait]
impl RemoteGateway for TuringDB {
    async fn submit(&self, command: &Command) -> Result<()> {
        self.run_command(command).await.map(|_| ())
    }
}

/// Swaps in a timeout and puts the previous one back when dropped
struct TimeoutOverride<'a> {
    slot: &'a Mutex<Duration>,
    previous: Duration,
}

impl<'a> TimeoutOverride<'a> {
    fn new(slot: &'a Mutex<Duration>, timeout: Duration) -> Self {
        let previous = std::mem::replace(&mut *slot.lock(), timeout);
        Self { slot, previous }
    }
}

impl Drop for TimeoutOverride<'_> {
    fn drop(&mut self) {
        *self.slot.lock() = self.previous;
    }
}

fn check_error(response: &Json) -> Result<()> {
    let Some(error) = response.get("error") else {
        return Ok(());
    };
    if error.is_null() {
        return Ok(());
    }

    let message = match error {
        Json::String(s) => s.clone(),
        other => other.to_string(),
    };
    let details = response
        .get("error_details")
        .filter(|d| !d.is_null())
        .map(|d| match d {
            Json::String(s) => s.clone(),
            other => other.to_string(),
        });

    Err(TuringError::remote(message, details))
}

fn string_list(value: Option<&Json>, field: &str) -> Result<Vec<String>> {
    let items = value
        .and_then(Json::as_array)
        .ok_or_else(|| TuringError::MalformedResponse(format!("'{}' is not a list", field)))?;

    items
        .iter()
        .map(|item| {
            item.as_str().map(str::to_string).ok_or_else(|| {
                TuringError::MalformedResponse(format!("'{}' contains a non-string", field))
            })
        })
        .collect()
}
