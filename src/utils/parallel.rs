//! Parallel execution utilities for running independent operations concurrently.
//!
//! These helpers are generic over the error type so that callers keep their
//! own error values untouched.

use std::future::Future;

use tokio::try_join;

/// Execute two independent async operations in parallel.
///
/// Both operations run concurrently and the function returns when both complete.
/// If either operation fails, the error is returned immediately.
///
/// # Example
/// ```ignore
/// let (total, items) = parallel::join2(source.count(), source.fetch(window)).await?;
/// ```
pub async fn join2<F1, F2, T1, T2, E>(f1: F1, f2: F2) -> Result<(T1, T2), E>
where
    F1: Future<Output = Result<T1, E>>,
    F2: Future<Output = Result<T2, E>>,
{
    try_join!(f1, f2)
}

/// Execute a collection of homogeneous async operations in parallel.
///
/// Results are returned in the same order as the input futures. The first
/// error (in input order) is returned if any operation fails.
pub async fn join_all<I, F, T, E>(futures: I) -> Result<Vec<T>, E>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = Result<T, E>>,
{
    futures::future::join_all(futures)
        .await
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_parallel_join2() {
        async fn op1() -> Result<i32, String> {
            Ok(1)
        }
        async fn op2() -> Result<i32, String> {
            Ok(2)
        }

        let (a, b) = join2(op1(), op2()).await.unwrap();
        assert_eq!(a, 1);
        assert_eq!(b, 2);
    }

    #[tokio::test]
    async fn test_join2_propagates_error() {
        let result: Result<(i32, i32), &str> = join2(async { Ok(1) }, async { Err("down") }).await;
        assert_eq!(result.unwrap_err(), "down");
    }

    #[tokio::test]
    async fn test_join_all_preserves_order() {
        // Later items finish first.
        let futures = (0..5u64).map(|i| async move {
            tokio::time::sleep(Duration::from_millis(25 - i * 5)).await;
            Ok::<_, String>(i)
        });

        let results = join_all(futures).await.unwrap();
        assert_eq!(results, vec![0, 1, 2, 3, 4]);
    }
}
