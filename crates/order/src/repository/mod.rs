pub mod order;
pub mod user;

use shared::errors::RepositoryError;
use std::{future::Future, time::Duration};

/// Bounds a store call. Expiry is a hard failure for the calling operation.
pub(crate) async fn bounded<T, F>(timeout: Duration, fut: F) -> Result<T, RepositoryError>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result.map_err(RepositoryError::from),
        Err(_) => Err(RepositoryError::Timeout(timeout.as_millis() as u64)),
    }
}
