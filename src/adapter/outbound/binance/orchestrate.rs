//! Concurrent fan-out of independent vendor calls.

use std::future::Future;

use futures_util::future::join_all;

/// Outcome of a fan-out in which at least one call failed.
#[derive(Debug)]
pub struct JoinFailure<T, E> {
    /// Successful results, in input order.
    pub completed: Vec<T>,
    /// Number of failed calls.
    pub failed: usize,
    /// Failure of the earliest failing call in input order.
    pub first: E,
}

/// Run every future concurrently and wait for all of them.
///
/// Results keep input order, not completion order. Calls are never
/// cancelled early: a failure is reported only once every call has settled,
/// so `completed` lists everything that actually took effect.
///
/// # Errors
///
/// Returns a [`JoinFailure`] when any future fails.
pub async fn join_all_or_first_error<I, F, T, E>(futures: I) -> Result<Vec<T>, JoinFailure<T, E>>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = Result<T, E>>,
{
    let results = join_all(futures).await;

    let mut completed = Vec::with_capacity(results.len());
    let mut failed = 0;
    let mut first = None;
    for result in results {
        match result {
            Ok(value) => completed.push(value),
            Err(err) => {
                failed += 1;
                first.get_or_insert(err);
            }
        }
    }

    match first {
        None => Ok(completed),
        Some(first) => Err(JoinFailure {
            completed,
            failed,
            first,
        }),
    }
}
