use std::future::Future;
use std::time::Duration;

use crate::error::Failure;

/// Await `fut` for at most `limit`.
pub(crate) async fn bounded<T, E, F>(limit: Duration, fut: F) -> Result<T, Failure<E>>
where
    F: Future<Output = Result<T, E>>,
    E: std::error::Error + 'static,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(Failure::Call(e)),
        Err(_) => Err(Failure::TimedOut(limit)),
    }
}
