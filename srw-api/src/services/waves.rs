//! Bounded fan-out in sequential waves
//!
//! Work items are split into contiguous chunks of at most `width` items. All
//! items of a chunk run concurrently; the next chunk starts only after every
//! item of the current one has settled. Outcomes come back in input order.
//!
//! Also provides [`with_deadline`], which races a future against a timer and
//! drops the loser.

use futures::future::join_all;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

use crate::types::FetchError;

/// Number of waves needed for `len` items at `width` items per wave
pub fn wave_count(len: usize, width: usize) -> usize {
    len.div_ceil(width.max(1))
}

/// Run `work` over `items`, at most `width` at a time, wave by wave
///
/// A `width` of zero is treated as one.
pub async fn run_in_waves<'a, T, R, F, Fut>(items: &'a [T], width: usize, mut work: F) -> Vec<R>
where
    F: FnMut(&'a T) -> Fut,
    Fut: Future<Output = R>,
{
    let width = width.max(1);
    let total_waves = wave_count(items.len(), width);
    let mut outcomes = Vec::with_capacity(items.len());

    for (wave_index, wave) in items.chunks(width).enumerate() {
        debug!(
            wave = wave_index + 1,
            total_waves,
            size = wave.len(),
            "Starting wave"
        );
        let results = join_all(wave.iter().map(&mut work)).await;
        outcomes.extend(results);
    }

    outcomes
}

/// Race `fut` against a `deadline` timer
///
/// If the timer wins, `fut` is dropped (cancelling any in-flight request it
/// owns) and [`FetchError::Timeout`] is returned.
pub async fn with_deadline<T, Fut>(deadline: Duration, fut: Fut) -> Result<T, FetchError>
where
    Fut: Future<Output = Result<T, FetchError>>,
{
    match tokio::time::timeout(deadline, fut).await {
        Ok(result) => result,
        Err(_) => Err(FetchError::Timeout(deadline)),
    }
}
