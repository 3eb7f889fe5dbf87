// src/engine/check.rs

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::digest::DigestFunction;
use crate::errors::{FetchError, ResourceError, Result};
use crate::fetch::ResourceFetcher;
use crate::notify::Notifier;
use crate::state::StateStore;
use crate::types::{DigestRecord, DigestState, ResourceId};

use super::diff::{apply_record, diff_digests};
use super::{CheckPhase, CheckReport, EngineOptions, Evaluation, ResourceFailure};

/// Fetches, hashes and compares every tracked resource, then notifies and
/// persists.
///
/// The fetcher, digest function and notifier are injected, so the same
/// engine runs against real HTTP in production and fakes in tests.
pub struct CheckEngine {
    fetcher: Arc<dyn ResourceFetcher>,
    digest: Arc<dyn DigestFunction>,
    notifier: Option<Box<dyn Notifier>>,
    options: EngineOptions,
}

impl fmt::Debug for CheckEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckEngine")
            .field("algorithm", &self.digest.algorithm())
            .field("notifier", &self.notifier.as_ref().map(|n| n.name()))
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl CheckEngine {
    pub fn new(
        fetcher: Arc<dyn ResourceFetcher>,
        digest: Arc<dyn DigestFunction>,
        options: EngineOptions,
    ) -> Self {
        Self {
            fetcher,
            digest,
            notifier: None,
            options,
        }
    }

    pub fn with_notifier(mut self, notifier: Box<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Load the state from `store` and run a full check against it.
    ///
    /// A load failure aborts the run; use [`run_with_state`] together with
    /// [`StateStore::load_or_empty`] to opt into starting from nothing.
    ///
    /// [`run_with_state`]: CheckEngine::run_with_state
    pub async fn run<S>(&self, store: &mut S) -> Result<CheckReport>
    where
        S: StateStore + ?Sized,
    {
        let prior = store.load()?;
        self.run_with_state(prior, store).await
    }

    /// Run a full check against an already loaded `prior` state.
    ///
    /// Per-resource failures and notifier failures end up in the report.
    /// Only a failure to save the new state is returned as an error.
    pub async fn run_with_state<S>(&self, prior: DigestState, store: &mut S) -> Result<CheckReport>
    where
        S: StateStore + ?Sized,
    {
        let evaluation = self.evaluate(&prior).await;

        let mut notify_error = None;
        if !evaluation.changes.is_empty() {
            if let Some(notifier) = &self.notifier {
                enter(CheckPhase::Notifying);
                info!(notifier = notifier.name(), "sending notifications");
                if let Err(e) = notifier.notify(&evaluation.changes).await {
                    warn!(notifier = notifier.name(), error = %e, "notification failed");
                    notify_error = Some(e);
                }
            }
        }

        enter(CheckPhase::Persisting);
        let checked = prior.len();
        let mut next = prior;
        apply_record(&mut next, &evaluation.record);
        store.save(&next)?;

        enter(CheckPhase::Done);
        Ok(CheckReport {
            changes: evaluation.changes,
            failures: evaluation.failures,
            notify_error,
            checked,
            persisted: true,
        })
    }

    /// Fetch, hash and compare without notifying or persisting anything.
    pub async fn evaluate(&self, prior: &DigestState) -> Evaluation {
        enter(CheckPhase::Idle);
        let (record, failures) = self.collect_digests(prior).await;

        enter(CheckPhase::Diffing);
        let changes = diff_digests(prior, &record);
        info!(
            compared = record.len(),
            failed = failures.len(),
            changed = changes.len(),
            "comparison finished"
        );

        Evaluation {
            record,
            changes,
            failures,
        }
    }

    /// Fan out one fetch+hash task per tracked resource and join them all.
    ///
    /// Each task owns its resource id and hands back `(id, outcome)`; only
    /// this function writes into the record, so every key is written once.
    async fn collect_digests(&self, prior: &DigestState) -> (DigestRecord, Vec<ResourceFailure>) {
        enter(CheckPhase::Fetching);
        info!(
            pages = prior.len(),
            workers = self.options.workers,
            "starting to hash pages"
        );

        let mut record = DigestRecord::new();
        let mut failures = Vec::new();
        let timeout = self.options.fetch_timeout;

        if self.options.workers <= 1 {
            // Still one task per resource, awaited in turn, so a panic is
            // contained exactly as in the pooled path.
            for id in prior.keys().cloned() {
                let fetcher = Arc::clone(&self.fetcher);
                let digest = Arc::clone(&self.digest);
                let task_id = id.clone();
                let task = tokio::spawn(async move {
                    fetch_and_hash(fetcher.as_ref(), digest.as_ref(), &task_id, timeout).await
                });
                let outcome = match task.await {
                    Ok(outcome) => outcome,
                    Err(e) => {
                        warn!(error = %e, "check task did not complete");
                        Err(ResourceError::TaskAborted)
                    }
                };
                record_outcome(id, outcome, &mut record, &mut failures);
            }
        } else {
            let permits = Arc::new(Semaphore::new(self.options.workers));
            let mut tasks = JoinSet::new();

            for id in prior.keys().cloned() {
                let fetcher = Arc::clone(&self.fetcher);
                let digest = Arc::clone(&self.digest);
                let permits = Arc::clone(&permits);

                tasks.spawn(async move {
                    let outcome = match permits.acquire_owned().await {
                        Ok(_permit) => {
                            fetch_and_hash(fetcher.as_ref(), digest.as_ref(), &id, timeout).await
                        }
                        Err(_) => Err(ResourceError::TaskAborted),
                    };
                    (id, outcome)
                });
            }

            while let Some(joined) = tasks.join_next().await {
                match joined {
                    Ok((id, outcome)) => record_outcome(id, outcome, &mut record, &mut failures),
                    Err(e) => warn!(error = %e, "check task did not complete"),
                }
            }

            // A task that panicked never reported its id; account for it here
            // so the report still names every resource left out of the record.
            for id in prior.keys() {
                if !record.contains_key(id) && !failures.iter().any(|f| &f.id == id) {
                    warn!(url = %id, "no result for resource; keeping previous digest");
                    failures.push(ResourceFailure {
                        id: id.clone(),
                        error: ResourceError::TaskAborted,
                    });
                }
            }
        }

        failures.sort_by(|a, b| a.id.cmp(&b.id));
        info!(hashed = record.len(), failed = failures.len(), "hashing finished");
        (record, failures)
    }
}

async fn fetch_and_hash(
    fetcher: &dyn ResourceFetcher,
    digest: &dyn DigestFunction,
    id: &str,
    timeout: Duration,
) -> std::result::Result<String, ResourceError> {
    debug!(url = %id, "downloading page");
    let bytes = match tokio::time::timeout(timeout, fetcher.fetch(id)).await {
        Ok(fetched) => fetched?,
        Err(_) => return Err(FetchError::Timeout { after: timeout }.into()),
    };

    debug!(url = %id, phase = %CheckPhase::Hashing, bytes = bytes.len(), "hashing page");
    let hex = digest.hash(&bytes)?;
    Ok(hex)
}

fn record_outcome(
    id: ResourceId,
    outcome: std::result::Result<String, ResourceError>,
    record: &mut DigestRecord,
    failures: &mut Vec<ResourceFailure>,
) {
    match outcome {
        Ok(hex) => {
            debug!(url = %id, digest = %hex, "page hashed");
            record.insert(id, hex);
        }
        Err(error) => {
            warn!(url = %id, error = %error, "skipping page this run");
            failures.push(ResourceFailure { id, error });
        }
    }
}

fn enter(phase: CheckPhase) {
    debug!(%phase, "check phase");
}
