//! Query drivers: reduce a set of input values or spans to the minimum
//! terminal value reachable through a chain.
//!
//! The sequential drivers are plain folds. The `par_` variants fan the
//! independent inputs out over scoped worker threads: each worker pulls
//! work from a shared channel, folds a local minimum, and reports one
//! partial result back. The chain itself is frozen after construction,
//! so workers share it by reference with no locking.

use crossbeam_channel::{bounded, unbounded};
use std::thread;

use loam_core::Interval;

use crate::chain::{Chain, ChainError};

/// Minimum terminal value over individual input values.
///
/// Each value enters the chain at its entry tag. Returns `Ok(None)` for
/// an empty input set; an empty input has no minimum, which is distinct
/// from any computed one.
pub fn min_of_values(chain: &Chain, values: &[i64]) -> Result<Option<i64>, ChainError> {
    let mut best: Option<i64> = None;
    for &value in values {
        let mapped = chain.remap_value(value, chain.entry())?;
        best = Some(fold_min(best, mapped));
    }
    Ok(best)
}

/// Minimum terminal value over whole input spans, without enumerating
/// their values.
///
/// Each non-empty span is propagated through the chain and the minimum is
/// read off the lower bounds of the terminal intervals. That shortcut is
/// sound because every rule is an order-preserving affine shift and
/// passthrough is the identity: the smallest value of any terminal
/// interval sits at its start. A rule set with a non-monotonic mapping
/// would break this; the engine does not admit one.
///
/// Empty spans carry no values and are skipped. Returns `Ok(None)` when
/// the input is empty or all spans are.
pub fn min_of_spans(chain: &Chain, spans: &[Interval]) -> Result<Option<i64>, ChainError> {
    let mut best: Option<i64> = None;
    for &span in spans {
        if span.is_empty() {
            continue;
        }
        for out in chain.propagate(span, chain.entry())? {
            best = Some(fold_min(best, out.start()));
        }
    }
    Ok(best)
}

/// Data-parallel [`min_of_values`].
///
/// `workers = None` auto-detects a worker count from the machine's
/// available parallelism. Falls back to the sequential driver when the
/// input is too small to be worth fanning out.
pub fn par_min_of_values(
    chain: &Chain,
    values: &[i64],
    workers: Option<usize>,
) -> Result<Option<i64>, ChainError> {
    if values.len() <= 1 {
        return min_of_values(chain, values);
    }
    let workers = resolve_workers(workers).min(values.len());
    if workers <= 1 {
        return min_of_values(chain, values);
    }
    par_fold(values.to_vec(), workers, |value| {
        chain.remap_value(value, chain.entry()).map(Some)
    })
}

/// Data-parallel [`min_of_spans`].
///
/// Same minimum-at-lower-bound reasoning as the sequential driver; the
/// parallelism is purely across independent input spans.
pub fn par_min_of_spans(
    chain: &Chain,
    spans: &[Interval],
    workers: Option<usize>,
) -> Result<Option<i64>, ChainError> {
    let live: Vec<Interval> = spans.iter().copied().filter(|s| !s.is_empty()).collect();
    if live.len() <= 1 {
        return min_of_spans(chain, &live);
    }
    let workers = resolve_workers(workers).min(live.len());
    if workers <= 1 {
        return min_of_spans(chain, &live);
    }
    par_fold(live, workers, |span| {
        let out = chain.propagate(span, chain.entry())?;
        Ok(out.into_iter().map(|iv| iv.start()).min())
    })
}

fn fold_min(best: Option<i64>, candidate: i64) -> i64 {
    match best {
        Some(current) => current.min(candidate),
        None => candidate,
    }
}

/// Resolve the worker count: explicit request, or half the available
/// parallelism clamped to `[2, 16]`.
fn resolve_workers(requested: Option<usize>) -> usize {
    match requested {
        Some(n) => n.max(1),
        None => thread::available_parallelism()
            .map(|n| (n.get() / 2).clamp(2, 16))
            .unwrap_or(2),
    }
}

/// Scatter `items` over `workers` scoped threads, fold the per-item
/// minima locally, and reduce the partial results on the calling thread.
///
/// The first error from any worker wins; remaining workers drain the
/// queue and exit on their own before the scope closes.
fn par_fold<T, F>(items: Vec<T>, workers: usize, eval: F) -> Result<Option<i64>, ChainError>
where
    T: Send,
    F: Fn(T) -> Result<Option<i64>, ChainError> + Sync,
{
    let (work_tx, work_rx) = unbounded();
    for item in items {
        let _ = work_tx.send(item);
    }
    drop(work_tx);

    let (done_tx, done_rx) = bounded(workers);
    let eval = &eval;
    thread::scope(|scope| {
        for _ in 0..workers {
            let work_rx = work_rx.clone();
            let done_tx = done_tx.clone();
            scope.spawn(move || {
                let mut local: Result<Option<i64>, ChainError> = Ok(None);
                for item in work_rx.iter() {
                    match eval(item) {
                        Ok(Some(candidate)) => {
                            if let Ok(best) = &mut local {
                                *best = Some(fold_min(*best, candidate));
                            }
                        }
                        Ok(None) => {}
                        Err(err) => {
                            local = Err(err);
                            break;
                        }
                    }
                }
                let _ = done_tx.send(local);
            });
        }
        drop(done_tx);

        let mut best: Option<i64> = None;
        for outcome in done_rx.iter() {
            if let Some(candidate) = outcome? {
                best = Some(fold_min(best, candidate));
            }
        }
        Ok(best)
    })
}
