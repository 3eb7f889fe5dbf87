use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use pagecheck::digest::DigestFunction;
use pagecheck::errors::{FetchError, HashError, NotifyError};
use pagecheck::fetch::{BoxFuture, ResourceFetcher};
use pagecheck::notify::Notifier;
use pagecheck::types::{ChangeSet, HashAlgorithm};

/// What the fake fetcher does for one url.
#[derive(Debug, Clone)]
pub enum FakeResponse {
    Body(Vec<u8>),
    Fail(FetchError),
    /// Never completes; only the engine's fetch timeout ends it.
    Hang,
    Panic,
}

/// A fake fetcher that:
/// - serves canned bodies or failures per url
/// - counts fetches per url
/// - tracks the peak number of concurrent fetches
#[derive(Debug, Clone, Default)]
pub struct FakeFetcher {
    responses: Arc<Mutex<HashMap<String, FakeResponse>>>,
    calls: Arc<Mutex<HashMap<String, usize>>>,
    delay: Option<Duration>,
    in_flight: Arc<AtomicUsize>,
    peak_in_flight: Arc<AtomicUsize>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn serve(self, url: &str, body: impl Into<Vec<u8>>) -> Self {
        self.respond(url, FakeResponse::Body(body.into()));
        self
    }

    pub fn fail(self, url: &str, error: FetchError) -> Self {
        self.respond(url, FakeResponse::Fail(error));
        self
    }

    pub fn hang(self, url: &str) -> Self {
        self.respond(url, FakeResponse::Hang);
        self
    }

    pub fn panic_on(self, url: &str) -> Self {
        self.respond(url, FakeResponse::Panic);
        self
    }

    /// Sleep this long inside every fetch.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Replace the response for `url`, e.g. between two runs.
    pub fn respond(&self, url: &str, response: FakeResponse) {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), response);
    }

    pub fn calls(&self, url: &str) -> usize {
        self.calls.lock().unwrap().get(url).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

struct InFlight(Arc<AtomicUsize>);

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl ResourceFetcher for FakeFetcher {
    fn fetch<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<Vec<u8>, FetchError>> {
        Box::pin(async move {
            *self.calls.lock().unwrap().entry(id.to_string()).or_insert(0) += 1;

            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
            let _guard = InFlight(Arc::clone(&self.in_flight));

            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            let response = self.responses.lock().unwrap().get(id).cloned();
            match response {
                Some(FakeResponse::Body(body)) => Ok(body),
                Some(FakeResponse::Fail(err)) => Err(err),
                Some(FakeResponse::Hang) => std::future::pending().await,
                Some(FakeResponse::Panic) => panic!("fake fetcher told to panic for {id}"),
                None => Err(FetchError::Transport(format!("no fake response for {id}"))),
            }
        })
    }
}

/// Digest that is the body itself, so tests can say "hashes to deadbeef"
/// by serving `deadbeef`.
#[derive(Debug, Clone, Default)]
pub struct PlainDigest {
    reject: Option<Vec<u8>>,
}

impl PlainDigest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail with a `HashError` whenever the body equals `body`.
    pub fn rejecting(body: impl Into<Vec<u8>>) -> Self {
        Self {
            reject: Some(body.into()),
        }
    }
}

impl DigestFunction for PlainDigest {
    fn algorithm(&self) -> HashAlgorithm {
        HashAlgorithm::default()
    }

    fn hash(&self, bytes: &[u8]) -> Result<String, HashError> {
        if self.reject.as_deref() == Some(bytes) {
            return Err(HashError {
                algorithm: self.algorithm(),
                reason: "rejected by test".to_string(),
            });
        }
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }
}

/// A notifier that records every change set it receives and can be told to
/// fail.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    received: Arc<Mutex<Vec<ChangeSet>>>,
    fail: Arc<AtomicBool>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let n = Self::default();
        n.fail.store(true, Ordering::SeqCst);
        n
    }

    pub fn received(&self) -> Vec<ChangeSet> {
        self.received.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn name(&self) -> &'static str {
        "recording"
    }

    fn notify<'a>(&'a self, changes: &'a ChangeSet) -> BoxFuture<'a, Result<(), NotifyError>> {
        Box::pin(async move {
            self.received.lock().unwrap().push(changes.clone());
            if self.fail.load(Ordering::SeqCst) {
                return Err(NotifyError::Transport("simulated SMTP outage".to_string()));
            }
            Ok(())
        })
    }
}
