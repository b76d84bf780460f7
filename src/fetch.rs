use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use reqwest::Method;
use serde_json::Value;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::{ClientError, Result};
use crate::gateway::Gateway;

/// The dependency tuple a fetch binding is driven by.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestKey {
    /// The API path to fetch.
    pub url: String,
    /// The HTTP method.
    pub method: Method,
    /// An optional JSON body (ignored for GET by the gateway).
    pub body: Option<Value>,
}

impl RequestKey {
    /// A GET key for the given path.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: Method::GET,
            body: None,
        }
    }
}

/// The error half of a settled request state.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestError {
    /// Human-readable message.
    pub message: String,
    /// HTTP status, absent for network failures and local errors.
    pub status: Option<u16>,
    /// The parsed error body, when the API sent one.
    pub data: Option<Value>,
}

impl From<&ClientError> for RequestError {
    fn from(err: &ClientError) -> Self {
        Self {
            message: err.to_string(),
            status: err.status(),
            data: err.data().cloned(),
        }
    }
}

/// The live state of one fetch binding.
///
/// Exactly one of `data` / `error` is set once a request settles; both are
/// absent while idle or loading.
#[derive(Debug, Clone, Default)]
pub struct RequestState {
    /// The response body of the most recent successful request.
    pub data: Option<Value>,
    /// Whether a request is in flight.
    pub loading: bool,
    /// The failure of the most recent settled request.
    pub error: Option<RequestError>,
}

struct Inner {
    gateway: Gateway,
    tx: watch::Sender<RequestState>,
    // Keeps the channel alive when no consumer is subscribed yet.
    _rx: watch::Receiver<RequestState>,
    epoch: AtomicU64,
    key: Mutex<Option<RequestKey>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

/// Binds a `(url, method, body)` tuple to a live [`RequestState`].
///
/// Rebinding to a new key aborts the in-flight request and bumps an epoch
/// counter; a superseded request's result is discarded even if it settles, so
/// rapid rebinds A → B → C always end in C's response. Cancellation is silent:
/// it publishes neither data nor error.
#[derive(Clone)]
pub struct FetchBinding {
    inner: Arc<Inner>,
}

impl FetchBinding {
    /// Creates an idle binding over the given gateway.
    pub fn new(gateway: Gateway) -> Self {
        let (tx, rx) = watch::channel(RequestState::default());
        Self {
            inner: Arc::new(Inner {
                gateway,
                tx,
                _rx: rx,
                epoch: AtomicU64::new(0),
                key: Mutex::new(None),
                task: Mutex::new(None),
            }),
        }
    }

    /// Subscribes to state updates.
    pub fn subscribe(&self) -> watch::Receiver<RequestState> {
        self.inner.tx.subscribe()
    }

    /// A snapshot of the current state.
    pub fn state(&self) -> RequestState {
        self.inner.tx.borrow().clone()
    }

    /// Drives the binding with a new dependency tuple.
    ///
    /// `None` supports conditional fetching ("don't fetch until an id is
    /// known"): the state resolves immediately to idle with no network call.
    /// `Some(key)` publishes a loading state and issues the gateway call.
    pub fn bind(&self, key: Option<RequestKey>) {
        *self.inner.key.lock().expect("fetch key lock poisoned") = key.clone();
        self.launch(key);
    }

    /// Re-issues the currently bound request under a fresh cancellation scope.
    ///
    /// A no-op when no key is bound.
    pub fn refetch(&self) {
        let key = self
            .inner
            .key
            .lock()
            .expect("fetch key lock poisoned")
            .clone();
        if key.is_some() {
            self.launch(key);
        }
    }

    /// Issues a one-off gateway call outside the bound state.
    ///
    /// Used for create/update/delete actions triggered by user interaction
    /// rather than by a dependency change; the bound `RequestState` is not
    /// touched.
    pub async fn one_shot(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
    ) -> Result<Value> {
        self.inner.gateway.send(method, url, body, None).await
    }

    fn launch(&self, key: Option<RequestKey>) {
        // The task lock doubles as the publish lock: the epoch bump and the
        // state publish happen under it, and a settling task re-checks the
        // epoch under the same lock, so a superseded result can never land
        // after a newer launch has published its loading state.
        let mut task = self.inner.task.lock().expect("fetch task lock poisoned");

        let epoch = self.inner.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(previous) = task.take() {
            previous.abort();
        }

        let key = match key {
            Some(key) => key,
            None => {
                self.inner.tx.send_replace(RequestState::default());
                return;
            }
        };

        self.inner.tx.send_replace(RequestState {
            data: None,
            loading: true,
            error: None,
        });

        let inner = self.inner.clone();
        *task = Some(tokio::spawn(async move {
            let result = inner
                .gateway
                .send(key.method.clone(), &key.url, key.body.as_ref(), None)
                .await;

            let state = match result {
                Ok(data) => RequestState {
                    data: Some(data),
                    loading: false,
                    error: None,
                },
                Err(err) => RequestState {
                    data: None,
                    loading: false,
                    error: Some(RequestError::from(&err)),
                },
            };

            // A newer bind() or refetch() has superseded this request; its
            // result must not overwrite the newer state. No awaits happen
            // while the lock is held.
            let _guard = inner.task.lock().expect("fetch task lock poisoned");
            if inner.epoch.load(Ordering::SeqCst) != epoch {
                tracing::debug!("🚫 Dropping stale response for {}", key.url);
                return;
            }
            inner.tx.send_replace(state);
        }));
    }
}
