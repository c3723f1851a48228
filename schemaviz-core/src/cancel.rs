//! Cancellation of in-flight work.

use crate::{Result, error::SchemaVizError};
use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Runs `future` until it completes or `token` fires.
///
/// On cancellation the future is dropped, which aborts any pending connect,
/// query or HTTP request it owns, and [`SchemaVizError::Cancelled`] is returned.
pub(crate) async fn run<F, T>(token: &CancellationToken, stage: &'static str, future: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::select! {
        biased;
        () = token.cancelled() => {
            tracing::debug!(stage, "Operation cancelled");
            Err(SchemaVizError::Cancelled { stage })
        }
        result = future => result,
    }
}
