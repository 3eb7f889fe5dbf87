#![allow(dead_code)]

use pagecheck::types::DigestState;

/// Build a `DigestState` from `(url, digest)` pairs.
pub fn digest_state(entries: &[(&str, &str)]) -> DigestState {
    entries
        .iter()
        .map(|(url, digest)| (url.to_string(), digest.to_string()))
        .collect()
}

/// Builder for `DigestState` to simplify test setup.
#[derive(Debug, Default)]
pub struct StateBuilder {
    state: DigestState,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track `url` with the empty "never hashed" placeholder.
    pub fn tracked(mut self, url: &str) -> Self {
        self.state.insert(url.to_string(), String::new());
        self
    }

    pub fn with_digest(mut self, url: &str, digest: &str) -> Self {
        self.state.insert(url.to_string(), digest.to_string());
        self
    }

    /// Track `count` generated urls (`http://page-<n>.example`).
    pub fn many(mut self, count: usize) -> Self {
        for n in 0..count {
            self.state.insert(page_url(n), String::new());
        }
        self
    }

    pub fn build(self) -> DigestState {
        self.state
    }
}

pub fn page_url(n: usize) -> String {
    format!("http://page-{n}.example")
}
