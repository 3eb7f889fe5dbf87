// tests/properties.rs

use std::sync::Arc;
use std::time::Duration;

use proptest::prelude::*;

use pagecheck::engine::{CheckEngine, EngineOptions, diff_digests};
use pagecheck::errors::FetchError;
use pagecheck::state::MemoryStateStore;
use pagecheck::types::DigestState;

use pagecheck_test_utils::builders::page_url;
use pagecheck_test_utils::fakes::{FakeFetcher, FakeResponse, PlainDigest};

/// Per page: the stored digest, and what this run's fetch yields
/// (`None` = the fetch fails).
fn pages_strategy() -> impl Strategy<Value = Vec<(String, Option<String>)>> {
    let digest = prop_oneof![Just(String::new()), "[a-c]{1,2}"];
    proptest::collection::vec((digest, proptest::option::weighted(0.8, "[a-c]{1,2}")), 0..12)
}

fn setup(pages: &[(String, Option<String>)]) -> (DigestState, FakeFetcher) {
    let mut prior = DigestState::new();
    let fetcher = FakeFetcher::new();
    for (n, (stored, fetched)) in pages.iter().enumerate() {
        let url = page_url(n);
        prior.insert(url.clone(), stored.clone());
        match fetched {
            Some(body) => fetcher.respond(
                &url,
                FakeResponse::Body(body.clone().into_bytes()),
            ),
            None => fetcher.respond(
                &url,
                FakeResponse::Fail(FetchError::Status { code: 500 }),
            ),
        }
    }
    (prior, fetcher)
}

fn run_once(prior: &DigestState, fetcher: &FakeFetcher, workers: usize) -> (DigestState, DigestState) {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap();

    rt.block_on(async {
        let engine = CheckEngine::new(
            Arc::new(fetcher.clone()),
            Arc::new(PlainDigest::new()),
            EngineOptions {
                workers,
                fetch_timeout: Duration::from_secs(1),
            },
        );
        let mut store = MemoryStateStore::with_state(prior.clone());
        let report = engine.run(&mut store).await.unwrap();
        (report.changes, store.state().cloned().unwrap())
    })
}

proptest! {
    #[test]
    fn worker_count_does_not_change_the_outcome(
        pages in pages_strategy(),
        workers in 2usize..6,
    ) {
        let (prior, fetcher) = setup(&pages);

        let sequential = run_once(&prior, &fetcher, 1);
        let concurrent = run_once(&prior, &fetcher, workers);

        prop_assert_eq!(sequential, concurrent);
    }

    #[test]
    fn changes_are_exactly_the_successful_differing_pages(pages in pages_strategy()) {
        let (prior, fetcher) = setup(&pages);

        let (changes, persisted) = run_once(&prior, &fetcher, 3);

        for (n, (stored, fetched)) in pages.iter().enumerate() {
            let url = page_url(n);
            match fetched {
                Some(body) if body != stored => {
                    prop_assert_eq!(changes.get(&url), Some(body));
                    prop_assert_eq!(persisted.get(&url), Some(body));
                }
                Some(body) => {
                    prop_assert!(!changes.contains_key(&url));
                    prop_assert_eq!(persisted.get(&url), Some(body));
                }
                None => {
                    prop_assert!(!changes.contains_key(&url));
                    prop_assert_eq!(persisted.get(&url), Some(stored));
                }
            }
        }
        prop_assert_eq!(persisted.len(), prior.len());
    }

    #[test]
    fn rerunning_on_the_new_state_finds_nothing(pages in pages_strategy()) {
        let (prior, fetcher) = setup(&pages);

        let (_, persisted) = run_once(&prior, &fetcher, 4);
        let (changes, again) = run_once(&persisted, &fetcher, 4);

        prop_assert!(changes.is_empty());
        prop_assert_eq!(again, persisted);
    }

    #[test]
    fn diff_never_reports_an_unchanged_digest(pages in pages_strategy()) {
        let (prior, _) = setup(&pages);
        let record: DigestState = pages
            .iter()
            .enumerate()
            .filter_map(|(n, (_, fetched))| fetched.clone().map(|d| (page_url(n), d)))
            .collect();

        let changes = diff_digests(&prior, &record);

        for (url, digest) in &changes {
            prop_assert_ne!(prior.get(url), Some(digest));
            prop_assert_eq!(record.get(url), Some(digest));
        }
    }
}
