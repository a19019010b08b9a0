//! HTTP client module with retry policy and error handling.

mod client;
mod retry;

pub use client::HttpClient;
pub use retry::{
    NonRetryableError, RETRY_DELAY_MS, RetryPolicy, check_retryable, classify_error,
};
