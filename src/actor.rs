//! A tokio task that owns an [`AgreementDriver`], serializing votes, blocks,
//! ticks, and termination requests arriving from multiple producers into the
//! single-threaded entry points the driver requires.
//!
//! This is the concrete realization of the concurrency model's "serialized…
//! either by design — one goroutine/task — or by a mutex": the driver's own
//! methods stay plain `async fn`s callable from a single owner, and this
//! module is that owner for callers who'd rather hand votes/blocks/ticks
//! across a channel than hold the driver directly.

use crate::driver::AgreementDriver;
use crate::types::{Block, Vote};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time;
use tracing::{info, warn};

enum Input {
    Vote(Vote),
    Block(Block),
    Terminate,
}

/// A cloneable handle for submitting input to a running agreement actor.
#[derive(Clone)]
pub struct AgreementHandle {
    tx: mpsc::Sender<Input>,
}

impl AgreementHandle {
    pub async fn submit_vote(&self, vote: Vote) {
        let _ = self.tx.send(Input::Vote(vote)).await;
    }

    pub async fn submit_block(&self, block: Block) {
        let _ = self.tx.send(Input::Block(block)).await;
    }

    pub async fn terminate(&self) {
        let _ = self.tx.send(Input::Terminate).await;
    }
}

const INPUT_CAPACITY: usize = 64;

/// Spawns the actor task, taking ownership of `driver`. Clock ticks fire
/// every `tick_period` from an internal `tokio::time::interval`; votes and
/// blocks arrive via the returned [`AgreementHandle`]. The task exits once
/// `tick` observes termination or the handle (and every clone of it) is
/// dropped.
pub fn spawn(mut driver: AgreementDriver, tick_period: Duration) -> AgreementHandle {
    let (tx, mut rx) = mpsc::channel(INPUT_CAPACITY);

    tokio::spawn(async move {
        let mut ticker = time::interval(tick_period);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = driver.tick().await {
                        warn!(error = %e, "agreement driver terminated on tick");
                        break;
                    }
                }
                input = rx.recv() => {
                    match input {
                        Some(Input::Vote(vote)) => {
                            if let Err(e) = driver.process_vote(vote).await {
                                warn!(error = %e, "agreement driver terminated on vote");
                                break;
                            }
                        }
                        Some(Input::Block(block)) => {
                            if let Err(e) = driver.process_block(block).await {
                                warn!(error = %e, "agreement driver terminated on block");
                                break;
                            }
                        }
                        Some(Input::Terminate) => driver.terminate(),
                        None => break,
                    }
                }
            }
        }
        info!("agreement actor exiting");
    });

    AgreementHandle { tx }
}
