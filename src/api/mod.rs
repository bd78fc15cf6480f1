//! REST client for the indexing backend.
//!
//! One method per endpoint, grouped by router. Nothing here retries; every
//! failure is returned to the caller as an [`ApiError`].

mod client;
mod error;
mod matching;
mod nas;
mod pattern;
mod udm;

pub use client::ApiClient;
pub use error::{ApiError, ErrorBody};
