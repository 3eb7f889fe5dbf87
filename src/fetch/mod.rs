// src/fetch/mod.rs

//! Resource retrieval.
//!
//! The engine talks to a [`ResourceFetcher`] instead of an HTTP client
//! directly, so tests can swap in a fake that serves canned bodies or
//! failures while production uses [`HttpFetcher`].

pub mod http;

use std::future::Future;
use std::pin::Pin;

use crate::errors::FetchError;

pub use http::{DEFAULT_USER_AGENT, HttpFetcher};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Trait abstracting how a resource's raw bytes are retrieved.
///
/// A failure is a per-resource event: the engine records it and carries on
/// with the other resources.
pub trait ResourceFetcher: Send + Sync {
    fn fetch<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<Vec<u8>, FetchError>>;
}
