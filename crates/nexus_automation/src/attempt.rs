//! Best-effort platform calls.

use nexus_error::PlatformResult;
use std::future::Future;

/// Await a platform call, logging and discarding its failure.
///
/// ```
/// use nexus_automation::attempt;
/// use nexus_error::{PlatformError, PlatformErrorKind, PlatformResult};
///
/// # async fn example() {
/// let ok = attempt("ok", async { PlatformResult::Ok(1) }).await;
/// assert_eq!(ok, Some(1));
///
/// let failed: Option<()> = attempt("fail", async {
///     Err(PlatformError::new(PlatformErrorKind::Api("Missing Access".into())))
/// })
/// .await;
/// assert!(failed.is_none());
/// # }
/// ```
pub async fn attempt<T, F>(action: &'static str, call: F) -> Option<T>
where
    F: Future<Output = PlatformResult<T>>,
{
    match call.await {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(action, error = %e, "Platform call failed");
            None
        }
    }
}

/// Return the first item matching `predicate`, or create one with `create`.
///
/// A created item is appended to `existing` so later lookups see it.
pub async fn find_or_create<T, M, C, Fut>(
    existing: &mut Vec<T>,
    predicate: M,
    create: C,
) -> Option<T>
where
    T: Clone,
    M: Fn(&T) -> bool,
    C: FnOnce() -> Fut,
    Fut: Future<Output = Option<T>>,
{
    if let Some(found) = existing.iter().find(|item| predicate(item)) {
        return Some(found.clone());
    }
    let created = create().await?;
    existing.push(created.clone());
    Some(created)
}
