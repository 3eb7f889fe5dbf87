// src/fetch/http.rs

use std::time::Duration;

use reqwest::{Client, Url};
use tracing::debug;

use crate::errors::{FetchError, PagecheckError, Result};

use super::{BoxFuture, ResourceFetcher};

pub const DEFAULT_USER_AGENT: &str = concat!("pagecheck/", env!("CARGO_PKG_VERSION"));

/// Fetches resources over HTTP(S) with `reqwest`.
///
/// Any non-2xx status counts as a failure. The body is returned as raw bytes;
/// no charset decoding happens here.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| PagecheckError::ConfigError(format!("building HTTP client: {e}")))?;
        Ok(Self { client, timeout })
    }

    fn classify(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout {
                after: self.timeout,
            }
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}

impl ResourceFetcher for HttpFetcher {
    fn fetch<'a>(&'a self, id: &'a str) -> BoxFuture<'a, std::result::Result<Vec<u8>, FetchError>> {
        Box::pin(async move {
            let url = Url::parse(id).map_err(|e| FetchError::InvalidUrl(format!("{id}: {e}")))?;

            debug!(url = %id, "downloading page");
            let response = self
                .client
                .get(url)
                .send()
                .await
                .map_err(|e| self.classify(e))?;

            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::Status {
                    code: status.as_u16(),
                });
            }

            let body = response.bytes().await.map_err(|e| self.classify(e))?;
            debug!(url = %id, bytes = body.len(), "downloaded page");
            Ok(body.to_vec())
        })
    }
}
