//! The Insert Batcher task (§4.4): drains queued bundles on a timer and
//! hands each drained batch to the Batch Inserter on a blocking task.
//!
//! Mirrors `InsertManagerPostgres::alarm()`: a timer that starts at 1s,
//! re-arms to 1ms whenever the queue still has work after a drain, and
//! falls back to 1s once it runs dry.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{interval, Interval, MissedTickBehavior};

use super::stats::Stats;
use super::{insert, Bundle, InsertJob, PgPool};

const IDLE_TICK: Duration = Duration::from_secs(1);
const DRAINING_TICK: Duration = Duration::from_millis(1);

pub fn spawn(pool: PgPool, mut rx: mpsc::UnboundedReceiver<InsertJob>, batch_size: usize, stats: Arc<Stats>) {
    tokio::spawn(async move {
        let mut pending: Vec<InsertJob> = Vec::new();
        let mut timer = new_timer(IDLE_TICK);
        let mut closed = false;

        loop {
            if !closed {
                tokio::select! {
                    job = rx.recv() => {
                        match job {
                            Some(job) => pending.push(job),
                            None => closed = true, // Store dropped; flush what's left then stop.
                        }
                    }
                    _ = timer.tick() => {}
                }

                // Greedily absorb whatever else is already queued without
                // waiting for another tick.
                while let Ok(job) = rx.try_recv() {
                    pending.push(job);
                }
            }

            if !pending.is_empty() {
                let batch: Vec<InsertJob> = pending.drain(..batch_size.min(pending.len()).max(1)).collect();
                run_batch(&pool, &stats, batch).await;
            }

            if closed && pending.is_empty() {
                break;
            }

            stats.maybe_report(pending.len());
            timer = new_timer(if pending.is_empty() { IDLE_TICK } else { DRAINING_TICK });
        }
    });
}

fn new_timer(period: Duration) -> Interval {
    let mut timer = interval(period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    timer
}

async fn run_batch(pool: &PgPool, stats: &Arc<Stats>, batch: Vec<InsertJob>) {
    let (bundles, handles): (Vec<Bundle>, Vec<_>) = batch.into_iter().map(|(b, h)| (b, h)).unzip();

    let pool = pool.clone();
    let stats = Arc::clone(stats);
    let result = tokio::task::spawn_blocking(move || -> Result<usize, crate::error::StoreError> {
        let mut conn = pool.get()?;
        let committed = insert::insert_batch(&mut conn, &bundles)?;
        stats.record_committed(committed as u64);
        Ok(committed)
    })
    .await;

    let outcome = match result {
        Ok(Ok(_)) => Ok(()),
        Ok(Err(e)) => Err(e),
        Err(join_err) => Err(crate::error::StoreError::db(format!("batch insert task panicked: {join_err}"))),
    };

    for handle in handles {
        // The receiver may have been dropped (caller stopped waiting); that's
        // not this task's problem.
        let _ = handle.send(match &outcome {
            Ok(()) => Ok(()),
            Err(e) => Err(crate::error::StoreError::db(e.to_string())),
        });
    }
}
