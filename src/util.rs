//! Utility functions for consuming stage output.

use futures_core::Stream;
use tokio_stream::StreamExt;

/// Drain a stream into a vector, waiting until it closes.
///
/// Only use this on streams that are finite or bounded by a token that will
/// fire.
pub async fn collect<S>(stream: S) -> Vec<S::Item>
where
    S: Stream,
{
    let mut vec = Vec::new();
    tokio::pin!(stream);
    while let Some(item) = stream.next().await {
        vec.push(item);
    }
    vec
}

/// Drain at most `n` items from a stream.
pub async fn collect_n<S>(stream: S, n: usize) -> Vec<S::Item>
where
    S: Stream,
{
    collect(stream.take(n)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_collect_iter_stream() {
        let items = collect(tokio_stream::iter(vec![3, 1, 2])).await;
        assert_eq!(items, vec![3, 1, 2]);
    }

    #[tokio::test]
    async fn test_collect_n_stops_early() {
        let items = collect_n(tokio_stream::iter(0..), 4).await;
        assert_eq!(items, vec![0, 1, 2, 3]);
    }
}
