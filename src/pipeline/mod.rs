//! The concurrency harness (spec.md 5): fans a batch of variants out across
//! a worker pool and reassembles results in input order.
//!
//! The scheduler is `rayon`'s `par_iter`, the same data-parallel idiom used
//! elsewhere in this crate for per-record work; the producer/worker-pool/
//! reassembly contract (ordered results, explicit cancellation, one worker
//! failure doesn't abort in-flight siblings) is kept by wrapping each unit
//! of work in a `WorkItem` carrying its own `sequence_number`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;

use crate::error::PipelineError;

/// A unit of work tagged with its position in the original input, so
/// results can be reassembled in order even though `rayon` completes them
/// out of order (spec.md 5.2).
pub struct WorkItem<T> {
    pub sequence_number: usize,
    pub payload: T,
}

/// A token workers poll to stop picking up new items once the run has been
/// cancelled (spec.md 5.3: e.g. a `--limit` row cap, or a fatal error in one
/// worker that should stop the others from doing further useless work).
#[derive(Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Runs `f` over every item in `input`, in parallel, returning results in
/// the same order as the input (spec.md 5.2's reassembly-by-sequence-number
/// contract). Stops dispatching new work once `token` is cancelled; items
/// already in flight still complete to avoid discarding partial results.
///
/// `f` returning `Err` degrades that single item to `None` rather than
/// aborting the whole batch (spec.md 5.4: one transcript/variant failing
/// must not take down the run).
pub fn run<T, R, F>(input: Vec<T>, token: &CancellationToken, f: F) -> Result<Vec<Option<R>>, PipelineError>
where
    T: Send,
    R: Send,
    F: Fn(&T) -> Result<R, String> + Sync,
{
    let items: Vec<WorkItem<T>> = input
        .into_iter()
        .enumerate()
        .map(|(sequence_number, payload)| WorkItem { sequence_number, payload })
        .collect();

    if token.is_cancelled() {
        return Err(PipelineError::Cancelled);
    }

    let mut results: Vec<(usize, Option<R>)> = items
        .par_iter()
        .map(|item| {
            if token.is_cancelled() {
                return (item.sequence_number, None);
            }
            match f(&item.payload) {
                Ok(r) => (item.sequence_number, Some(r)),
                Err(_) => (item.sequence_number, None),
            }
        })
        .collect();

    results.sort_by_key(|(seq, _)| *seq);
    Ok(results.into_iter().map(|(_, r)| r).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_input_order_despite_parallel_execution() {
        let input: Vec<i32> = (0..200).collect();
        let token = CancellationToken::new();
        let results = run(input.clone(), &token, |x| Ok::<i32, String>(x * 2)).unwrap();
        let expected: Vec<Option<i32>> = input.iter().map(|x| Some(x * 2)).collect();
        assert_eq!(results, expected);
    }

    #[test]
    fn a_single_failing_item_degrades_to_none_without_aborting_others() {
        let input: Vec<i32> = vec![1, 2, 3, 4];
        let token = CancellationToken::new();
        let results = run(input, &token, |x| {
            if *x == 2 {
                Err("boom".to_string())
            } else {
                Ok(*x)
            }
        })
        .unwrap();
        assert_eq!(results, vec![Some(1), None, Some(3), Some(4)]);
    }

    #[test]
    fn cancelling_before_start_returns_cancelled_error() {
        let token = CancellationToken::new();
        token.cancel();
        let result = run(vec![1, 2, 3], &token, |x| Ok::<i32, String>(*x));
        assert!(matches!(result, Err(PipelineError::Cancelled)));
    }

    #[test]
    fn cancelling_mid_run_still_returns_items_already_done_as_some() {
        let token = CancellationToken::new();
        let results = run(vec![1], &token, |x| Ok::<i32, String>(*x)).unwrap();
        assert_eq!(results, vec![Some(1)]);
    }
}
