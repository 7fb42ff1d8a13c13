use std::sync::mpsc;
use std::thread;

use log::trace;

use crate::data::example::LabeledExample;
use crate::error::{NetError, Result};
use crate::grad::engine::NetworkGradient;
use crate::network::network::Network;

/// Bounds of worker `index`'s share of a batch of `len` examples split
/// across `workers` workers. Shares are contiguous, disjoint and may be empty.
pub fn partition(len: usize, workers: usize, index: usize) -> (usize, usize) {
    (index * len / workers, (index + 1) * len / workers)
}

/// Runs `job` on each worker's share of `batch` in parallel and returns the
/// non-empty results in worker order.
///
/// Workers only see their own slice and report back over a channel; nothing
/// is combined until every worker has finished. A job error or a panicking
/// worker fails the whole call with `NetError::WorkerFailed`.
pub fn fan_out<T, F>(batch: &[LabeledExample], worker_count: usize, job: F) -> Result<Vec<T>>
where
    T: Send,
    F: Fn(&[LabeledExample]) -> Result<Option<T>> + Sync,
{
    let workers = worker_count.max(1);
    let (tx, rx) = mpsc::channel::<(usize, Result<Option<T>>)>();
    let job = &job;

    let panicked = thread::scope(|scope| {
        let handles: Vec<_> = (0..workers)
            .map(|index| {
                let (first, last) = partition(batch.len(), workers, index);
                let slice = &batch[first..last];
                let tx = tx.clone();
                scope.spawn(move || {
                    let partial = if slice.is_empty() { Ok(None) } else { job(slice) };
                    // The receiver outlives the scope, so this cannot fail.
                    let _ = tx.send((index, partial));
                })
            })
            .collect();
        drop(tx);

        handles
            .into_iter()
            .map(|h| h.join())
            .filter(|joined| joined.is_err())
            .count()
    });

    if panicked > 0 {
        return Err(NetError::WorkerFailed(format!("{} worker(s) panicked", panicked)));
    }

    let mut partials: Vec<(usize, Result<Option<T>>)> = rx.into_iter().collect();
    partials.sort_by_key(|(index, _)| *index);

    let mut results = Vec::with_capacity(partials.len());
    for (index, partial) in partials {
        match partial {
            Ok(Some(value)) => results.push(value),
            Ok(None) => trace!("worker {} had no examples", index),
            Err(e) => return Err(NetError::WorkerFailed(format!("worker {}: {}", index, e))),
        }
    }
    Ok(results)
}

/// Sum of the per-example gradients of `batch`, computed by `worker_count`
/// parallel workers against a shared read-only `network`.
///
/// Returns `None` for an empty batch.
pub fn batch_gradient(
    network: &Network,
    batch: &[LabeledExample],
    worker_count: usize,
) -> Result<Option<NetworkGradient>> {
    let partials = fan_out(batch, worker_count, |slice| NetworkGradient::sum_over(network, slice))?;

    let mut iter = partials.into_iter();
    let mut total = match iter.next() {
        Some(first) => first,
        None => return Ok(None),
    };
    for partial in iter {
        total.accumulate(&partial);
    }
    Ok(Some(total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn batch(n: usize) -> Vec<LabeledExample> {
        (0..n)
            .map(|i| {
                let x = i as f64 / n as f64;
                LabeledExample::new(vec![x, 1.0 - x, 0.5], vec![x, 0.0])
            })
            .collect()
    }

    #[test]
    fn test_partition_covers_batch() {
        let shares: Vec<_> = (0..8).map(|p| partition(5, 8, p)).collect();
        assert_eq!(shares.first().unwrap().0, 0);
        assert_eq!(shares.last().unwrap().1, 5);
        for w in shares.windows(2) {
            assert_eq!(w[0].1, w[1].0);
        }
        assert_eq!(shares.iter().filter(|(a, b)| a == b).count(), 3);
    }

    #[test]
    fn test_parallel_sum_matches_sequential_sum() {
        let net = Network::new(3, 2, &[4, 3], &mut StdRng::seed_from_u64(6)).unwrap();
        let examples = batch(11);

        let sequential = NetworkGradient::sum_over(&net, &examples).unwrap().unwrap();
        let parallel = batch_gradient(&net, &examples, 4).unwrap().unwrap();

        for (a, b) in sequential.weights.iter().zip(parallel.weights.iter()) {
            assert!((a - b).abs() < 1e-12);
        }
        for (a, b) in sequential.biases.iter().zip(parallel.biases.iter()) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn test_more_workers_than_examples() {
        let net = Network::new(3, 2, &[2], &mut StdRng::seed_from_u64(6)).unwrap();
        let examples = batch(2);

        let single = batch_gradient(&net, &examples, 1).unwrap().unwrap();
        let many = batch_gradient(&net, &examples, 8).unwrap().unwrap();
        for (a, b) in single.weights.iter().zip(many.weights.iter()) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn test_empty_batch_is_none() {
        let net = Network::new(3, 2, &[2], &mut StdRng::seed_from_u64(6)).unwrap();
        assert!(batch_gradient(&net, &[], 4).unwrap().is_none());
    }

    #[test]
    fn test_job_error_fails_the_batch() {
        let result: Result<Vec<()>> = fan_out(&batch(6), 3, |slice| {
            if slice[0].input[0] > 0.3 {
                Err(NetError::EmptyTestSet)
            } else {
                Ok(Some(()))
            }
        });
        assert!(matches!(result, Err(NetError::WorkerFailed(_))));
    }

    #[test]
    fn test_worker_panic_fails_the_batch() {
        let result: Result<Vec<usize>> = fan_out(&batch(4), 2, |slice| {
            if slice[0].input[0] > 0.0 {
                panic!("bad slice");
            }
            Ok(Some(slice.len()))
        });
        assert_eq!(
            result.unwrap_err(),
            NetError::WorkerFailed("1 worker(s) panicked".to_string())
        );
    }

    #[test]
    fn test_results_keep_worker_order() {
        let starts = fan_out(&batch(8), 4, |slice| Ok(Some(slice[0].input[0]))).unwrap();
        assert_eq!(starts, vec![0.0, 0.25, 0.5, 0.75]);
    }
}
