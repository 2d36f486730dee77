//! Result retrieval and cancellation against the Covalent dispatcher

mod client;
mod retry;
mod wait;

pub use client::{CancelRequest, ResultQuery, ResultsManager, TaskIds};
pub use retry::{PollOutcome, RetryPolicy, RETRYABLE_STATUSES};
pub use wait::Wait;

/// Path segments of the result endpoint, followed by the dispatch id
pub const RESULT_PATH: &[&str] = &["api", "result"];
/// Path segments of the cancellation endpoint
pub const CANCEL_PATH: &[&str] = &["api", "cancel"];
