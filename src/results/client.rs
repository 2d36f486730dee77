//! Results manager implementation

use reqwest::Client as HttpClient;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use url::Url;
use crate::config::{self, Config, ConfigProvider, RESULTS_CONNECT_TIMEOUT_SECS};
use crate::error::{Result, SdkError};
use super::retry::{poll_until_terminal, RetryPolicy};
use super::wait::{bool_query, Wait};
use super::{CANCEL_PATH, RESULT_PATH};

/// Identifiers of tasks within a dispatch
///
/// An empty set addresses the whole dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct TaskIds(Vec<usize>);

impl TaskIds {
    /// Every task of the dispatch
    pub fn all() -> Self {
        Self(Vec::new())
    }

    pub fn single(task_id: usize) -> Self {
        Self(vec![task_id])
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<usize> for TaskIds {
    fn from(task_id: usize) -> Self {
        Self::single(task_id)
    }
}

impl From<Vec<usize>> for TaskIds {
    fn from(task_ids: Vec<usize>) -> Self {
        Self(task_ids)
    }
}

impl From<&[usize]> for TaskIds {
    fn from(task_ids: &[usize]) -> Self {
        Self(task_ids.to_vec())
    }
}

impl<const N: usize> From<[usize; N]> for TaskIds {
    fn from(task_ids: [usize; N]) -> Self {
        Self(task_ids.to_vec())
    }
}

/// Cancellation request body
#[derive(Serialize, Debug)]
pub struct CancelRequest<'a> {
    pub dispatch_id: &'a str,
    pub task_ids: &'a TaskIds,
}

/// Options of a result query
#[derive(Debug, Clone, Default)]
pub struct ResultQuery {
    pub wait: Wait,
    /// Ask only for the dispatch status instead of the full result
    pub status_only: bool,
    /// Dispatcher to query instead of the configured one
    pub dispatcher_addr: Option<String>,
}

impl ResultQuery {
    pub fn new(wait: Wait) -> Self {
        Self {
            wait,
            ..Self::default()
        }
    }

    pub fn status_only(mut self, status_only: bool) -> Self {
        self.status_only = status_only;
        self
    }

    pub fn dispatcher_addr(mut self, addr: impl Into<String>) -> Self {
        self.dispatcher_addr = Some(addr.into());
        self
    }
}

/// Client for retrieving and cancelling dispatches
#[derive(Clone)]
pub struct ResultsManager {
    config: Arc<dyn ConfigProvider>,
    http_client: HttpClient,
    retry_policy: RetryPolicy,
}

impl ResultsManager {
    /// Creates a results manager reading its settings from `config`
    ///
    /// # Example
    ///
    /// ```rust
    /// use covalent_rust_sdk::config::Config;
    /// use covalent_rust_sdk::results::ResultsManager;
    ///
    /// let manager = ResultsManager::new(Config::default()).unwrap();
    /// ```
    pub fn new(config: impl ConfigProvider + 'static) -> Result<Self> {
        Self::with_provider(Arc::new(config))
    }

    /// Creates a results manager from a shared configuration provider
    pub fn with_provider(provider: Arc<dyn ConfigProvider>) -> Result<Self> {
        let retry_policy = RetryPolicy::from_provider(provider.as_ref())?;
        let connect_timeout =
            config::parse_or(provider.as_ref(), RESULTS_CONNECT_TIMEOUT_SECS, 10u64)?;
        let http_client = HttpClient::builder()
            .connect_timeout(Duration::from_secs(connect_timeout))
            .build()?;

        Ok(Self {
            config: provider,
            http_client,
            retry_policy,
        })
    }

    /// Creates a results manager from `covalent.conf` and the environment
    pub fn from_env() -> Result<Self> {
        Self::new(Config::load()?)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry_policy
    }

    /// Retrieves the result of a dispatch without waiting for completion
    ///
    /// Returns `Ok(None)` when the dispatcher cannot be reached.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use covalent_rust_sdk::config::Config;
    /// use covalent_rust_sdk::results::ResultsManager;
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let manager = ResultsManager::new(Config::default())?;
    /// match manager.get_result("9d1b308b-4763-4990-ae7f-6a6e36d35893").await? {
    ///     Some(result) => println!("Result: {}", result),
    ///     None => println!("Dispatcher is not running"),
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get_result(&self, dispatch_id: &str) -> Result<Option<Value>> {
        self.get_result_with(dispatch_id, &ResultQuery::default()).await
    }

    /// Retrieves the result of a dispatch using explicit query options
    ///
    /// Like [`get_result`](Self::get_result), an unreachable dispatcher
    /// yields `Ok(None)`; every other failure is returned.
    pub async fn get_result_with(
        &self,
        dispatch_id: &str,
        query: &ResultQuery,
    ) -> Result<Option<Value>> {
        match self
            .get_result_from_dispatcher(
                dispatch_id,
                query.wait,
                query.dispatcher_addr.as_deref(),
                query.status_only,
            )
            .await
        {
            Ok(result) => Ok(Some(result)),
            Err(e) if e.is_unreachable() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Queries the dispatcher for a result, honoring `Retry-After` on busy answers
    ///
    /// # Arguments
    ///
    /// * `dispatch_id` - The dispatch to query
    /// * `wait` - Whether the dispatcher should hold the request until completion
    /// * `dispatcher_addr` - Dispatcher to query, the configured one if `None`
    /// * `status_only` - Ask only for the status of the dispatch
    ///
    /// # Errors
    ///
    /// An unreachable dispatcher is logged once and returned as
    /// [`SdkError::Unreachable`].
    pub async fn get_result_from_dispatcher(
        &self,
        dispatch_id: &str,
        wait: Wait,
        dispatcher_addr: Option<&str>,
        status_only: bool,
    ) -> Result<Value> {
        check_dispatch_id(dispatch_id)?;
        let address = match dispatcher_addr {
            Some(addr) => addr.to_string(),
            None => config::dispatcher_url(self.config.as_ref())?,
        };
        let url = result_url(&address, dispatch_id, wait, status_only)?;
        let retries = self.retry_policy.retries(wait);

        match poll_until_terminal(&self.http_client, &url, dispatch_id, retries).await? {
            Ok(result) => Ok(result),
            Err(source) => {
                let err = SdkError::Unreachable { address, source };
                log::error!("{}", err);
                Err(err)
            }
        }
    }

    /// Requests cancellation of tasks of a dispatch on the configured dispatcher
    ///
    /// `task_ids` accepts a single id or a collection; [`TaskIds::all`]
    /// cancels the whole dispatch. Returns the dispatcher's response message.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use covalent_rust_sdk::config::Config;
    /// use covalent_rust_sdk::results::{ResultsManager, TaskIds};
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let manager = ResultsManager::new(Config::default())?;
    /// let message = manager.cancel("my-dispatch", TaskIds::single(1)).await?;
    /// println!("{}", message);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn cancel(&self, dispatch_id: &str, task_ids: impl Into<TaskIds>) -> Result<String> {
        let address = config::dispatcher_url(self.config.as_ref())?;
        self.cancel_at(dispatch_id, task_ids, &address).await
    }

    /// Requests cancellation against an explicit dispatcher address
    pub async fn cancel_at(
        &self,
        dispatch_id: &str,
        task_ids: impl Into<TaskIds>,
        dispatcher_addr: &str,
    ) -> Result<String> {
        check_dispatch_id(dispatch_id)?;
        let task_ids = task_ids.into();
        let url = endpoint(dispatcher_addr, CANCEL_PATH)?;
        let request = CancelRequest {
            dispatch_id,
            task_ids: &task_ids,
        };

        log::info!("Cancelling dispatch {} tasks {:?}", dispatch_id, task_ids.as_slice());
        let response = self.http_client
            .post(url)
            .json(&request)
            .send()
            .await?
            .error_for_status()?;

        let message = response.text().await?;
        Ok(message.trim().replace('"', ""))
    }
}

fn check_dispatch_id(dispatch_id: &str) -> Result<()> {
    if dispatch_id.trim().is_empty() {
        return Err(SdkError::InvalidArgument("dispatch id must not be empty".to_string()));
    }
    Ok(())
}

/// Joins `segments` onto a dispatcher address, defaulting the scheme to http
pub(crate) fn endpoint(dispatcher_addr: &str, segments: &[&str]) -> Result<Url> {
    let mut url = if dispatcher_addr.contains("://") {
        Url::parse(dispatcher_addr)?
    } else {
        Url::parse(&format!("http://{}", dispatcher_addr))?
    };
    url.path_segments_mut()
        .map_err(|_| {
            let message = format!("'{}' cannot be a dispatcher address", dispatcher_addr);
            SdkError::InvalidArgument(message)
        })?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Builds `/api/result/{dispatch_id}?wait=..&status_only=..`
pub(crate) fn result_url(
    dispatcher_addr: &str,
    dispatch_id: &str,
    wait: Wait,
    status_only: bool,
) -> Result<Url> {
    let mut segments: Vec<&str> = RESULT_PATH.to_vec();
    segments.push(dispatch_id);
    let mut url = endpoint(dispatcher_addr, &segments)?;
    url.query_pairs_mut()
        .append_pair("wait", wait.as_query())
        .append_pair("status_only", bool_query(status_only));
    Ok(url)
}
