//! Bounded retries for single-object transfers
//!
//! Attempts run back to back with no delay. Only the first failure of an
//! operation is logged as a warning; later failures go to debug.

use std::future::Future;

use crate::error::Result;

/// Attempts per object when the caller has no preference
pub const DEFAULT_RETRIES: u32 = 3;

/// Run `operation` up to `attempts` times, returning the first success
///
/// The closure receives the 1-based attempt number. A budget of zero is
/// treated as one attempt. When the budget is exhausted the error of the
/// final attempt is returned unchanged.
///
/// # Example
/// ```ignore
/// let data = retry_transfer(3, "obs://b/k", |_| async { store.get_object(&path).await }).await?;
/// ```
pub async fn retry_transfer<T, F, Fut>(attempts: u32, label: &str, mut operation: F) -> Result<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let attempts = attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;

        match operation(attempt).await {
            Ok(result) => return Ok(result),
            Err(e) => {
                if attempt >= attempts {
                    return Err(e);
                }

                if attempt == 1 {
                    tracing::warn!(
                        target_path = label,
                        attempt,
                        attempts,
                        error = %e,
                        "Transfer failed, retrying"
                    );
                } else {
                    tracing::debug!(
                        target_path = label,
                        attempt,
                        attempts,
                        error = %e,
                        "Retrying transfer"
                    );
                }
            }
        }
    }
}
