//! Timeout guard and first-to-settle race.

use std::convert::Infallible;
use std::future::Future;
use std::time::Duration;

use tracing::debug;

use crate::error::LookupError;

/// Sleep for `duration`, then fail with [`LookupError::Timeout`].
///
/// There is no success path; the `Ok` type is uninhabited.
pub async fn timeout_after(duration: Duration) -> Result<Infallible, LookupError> {
    tokio::time::sleep(duration).await;
    debug!(?duration, "Timeout guard fired");
    Err(LookupError::Timeout { after: duration })
}

/// Race `operation` against [`timeout_after`]`(limit)`.
///
/// Whichever settles first decides the outcome. The loser is dropped
/// without being polled again, so its result is never observed.
pub async fn race_timeout<F, V>(operation: F, limit: Duration) -> Result<V, LookupError>
where
    F: Future<Output = Result<V, LookupError>>,
{
    tokio::select! {
        // Ties go to the operation.
        biased;

        outcome = operation => outcome,
        guard = timeout_after(limit) => guard.map(|never| match never {}),
    }
}
