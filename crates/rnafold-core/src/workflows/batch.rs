use crate::core::sequence::Sequence;
use crate::core::structure::FoldResult;
use crate::engine::context::FoldContext;
use crate::engine::error::FoldError;
use crate::engine::progress::{Progress, ProgressReporter};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, instrument, warn};

/// Folds every sequence through the async invoker, with at most `concurrency`
/// tool processes alive at once (`0` is treated as `1`).
///
/// Results are returned in input order. A failure for one sequence does not
/// affect the others.
#[instrument(skip_all, name = "batch_workflow", fields(count = sequences.len(), concurrency = concurrency))]
pub async fn fold_all(
    context: &FoldContext,
    sequences: Vec<Sequence>,
    concurrency: usize,
    reporter: &ProgressReporter<'_>,
) -> Vec<Result<FoldResult, FoldError>> {
    let total = sequences.len();
    reporter.report(Progress::TaskStart {
        total_steps: total as u64,
    });
    info!("Folding {} sequences.", total);

    let permits = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut tasks = JoinSet::new();
    for (index, sequence) in sequences.into_iter().enumerate() {
        let context = context.clone();
        let permits = Arc::clone(&permits);
        tasks.spawn(async move {
            // The semaphore is never closed, so acquisition only waits.
            let _permit = permits.acquire_owned().await.ok();
            (index, context.fold(&sequence).await)
        });
    }

    let mut results: Vec<Option<Result<FoldResult, FoldError>>> =
        (0..total).map(|_| None).collect();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, result)) => {
                if let Err(e) = &result {
                    reporter.report(Progress::Message(format!(
                        "Sequence #{} failed: {}",
                        index + 1,
                        e
                    )));
                }
                results[index] = Some(result);
            }
            Err(e) => warn!("Fold task did not complete: {}", e),
        }
        reporter.report(Progress::TaskIncrement);
    }
    reporter.report(Progress::TaskFinish);

    results
        .into_iter()
        .map(|slot| {
            slot.unwrap_or_else(|| {
                Err(FoldError::Execution {
                    message: "Fold task was aborted".to_string(),
                    exit_code: None,
                    stderr: String::new(),
                })
            })
        })
        .collect()
}
