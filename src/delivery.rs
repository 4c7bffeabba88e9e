//! Non-blocking delivery: decouples the agreement hot path from a downstream
//! application that may be slow, by handing callbacks to a single ordered
//! worker instead of invoking them inline.
//!
//! Grounded on `nonblocking_test.go` / `nonblocking-application_test.go`'s
//! `slowApp` fixture: every enqueue method must return immediately even
//! while the application sleeps, and `wait()` must block until every
//! previously-enqueued callback has actually *run*, not merely been
//! dequeued — which is why `wait()` enqueues its own barrier event rather
//! than inspecting the channel's length.

use crate::types::{Block, Hash, Position, WitnessAck};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::warn;

/// The downstream application boundary this core drives. `prepare_payload`
/// and `verify_payload` are synchronous and are not routed through the
/// queue — callers invoke them directly on the `Arc<dyn Application>`.
pub trait Application: Send + Sync {
    fn strongly_acked(&self, hash: Hash);
    fn total_ordering_delivered(&self, hashes: Vec<Hash>, early: bool);
    fn block_confirmed(&self, hash: Hash);
    fn block_delivered(&self, block: Block);
    fn witness_ack_delivered(&self, ack: WitnessAck);
    fn prepare_payload(&self, position: Position) -> Vec<u8>;
    fn verify_payload(&self, payload: &[u8]) -> bool;
}

enum Event {
    StronglyAcked(Hash),
    TotalOrderingDelivered(Vec<Hash>, bool),
    BlockConfirmed(Hash),
    BlockDelivered(Block),
    WitnessAckDelivered(WitnessAck),
    Barrier(oneshot::Sender<()>),
}

/// Enqueues application callbacks onto an unbounded FIFO and runs them, in
/// enqueue order, on a single background worker. Multiple producers may call
/// the enqueue methods concurrently; exactly one consumer exists, so the
/// application always sees a serial schedule.
#[derive(Clone)]
pub struct NonBlockingDelivery {
    tx: mpsc::UnboundedSender<Event>,
}

impl NonBlockingDelivery {
    pub fn new(app: Arc<dyn Application>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(Self::run(app, rx));
        Self { tx }
    }

    async fn run(app: Arc<dyn Application>, mut rx: mpsc::UnboundedReceiver<Event>) {
        while let Some(event) = rx.recv().await {
            match event {
                Event::StronglyAcked(hash) => app.strongly_acked(hash),
                Event::TotalOrderingDelivered(hashes, early) => {
                    app.total_ordering_delivered(hashes, early)
                }
                Event::BlockConfirmed(hash) => app.block_confirmed(hash),
                Event::BlockDelivered(block) => app.block_delivered(block),
                Event::WitnessAckDelivered(ack) => app.witness_ack_delivered(ack),
                Event::Barrier(done) => {
                    let _ = done.send(());
                }
            }
        }
    }

    fn enqueue(&self, event: Event) {
        if self.tx.send(event).is_err() {
            warn!("non-blocking delivery worker is gone, event dropped");
        }
    }

    pub fn strongly_acked(&self, hash: Hash) {
        self.enqueue(Event::StronglyAcked(hash));
    }

    pub fn total_ordering_delivered(&self, hashes: Vec<Hash>, early: bool) {
        self.enqueue(Event::TotalOrderingDelivered(hashes, early));
    }

    pub fn block_confirmed(&self, hash: Hash) {
        self.enqueue(Event::BlockConfirmed(hash));
    }

    pub fn block_delivered(&self, block: Block) {
        self.enqueue(Event::BlockDelivered(block));
    }

    pub fn witness_ack_delivered(&self, ack: WitnessAck) {
        self.enqueue(Event::WitnessAckDelivered(ack));
    }

    /// Blocks until every event enqueued before this call has actually run.
    pub async fn wait(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.tx.send(Event::Barrier(done_tx)).is_ok() {
            let _ = done_rx.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::{Duration, Instant};

    struct SlowApp {
        sleep: Duration,
        strongly_acked: Mutex<Vec<Hash>>,
        total_ordering_delivered: Mutex<Vec<Hash>>,
        block_delivered: Mutex<Vec<Hash>>,
        witness_ack: Mutex<Vec<Hash>>,
    }

    impl SlowApp {
        fn new(sleep: Duration) -> Self {
            Self {
                sleep,
                strongly_acked: Mutex::new(Vec::new()),
                total_ordering_delivered: Mutex::new(Vec::new()),
                block_delivered: Mutex::new(Vec::new()),
                witness_ack: Mutex::new(Vec::new()),
            }
        }
    }

    impl Application for SlowApp {
        fn strongly_acked(&self, hash: Hash) {
            std::thread::sleep(self.sleep);
            self.strongly_acked.lock().unwrap().push(hash);
        }
        fn total_ordering_delivered(&self, hashes: Vec<Hash>, _early: bool) {
            std::thread::sleep(self.sleep);
            self.total_ordering_delivered.lock().unwrap().extend(hashes);
        }
        fn block_confirmed(&self, _hash: Hash) {}
        fn block_delivered(&self, block: Block) {
            std::thread::sleep(self.sleep);
            self.block_delivered.lock().unwrap().push(block.hash);
        }
        fn witness_ack_delivered(&self, ack: WitnessAck) {
            std::thread::sleep(self.sleep);
            self.witness_ack.lock().unwrap().push(ack.hash);
        }
        fn prepare_payload(&self, _position: Position) -> Vec<u8> {
            Vec::new()
        }
        fn verify_payload(&self, _payload: &[u8]) -> bool {
            true
        }
    }

    #[tokio::test]
    async fn enqueueing_does_not_block_even_with_a_slow_application() {
        let app = Arc::new(SlowApp::new(Duration::from_millis(50)));
        let delivery = NonBlockingDelivery::new(app.clone());
        let hashes: Vec<Hash> = (0..10u8).map(|b| Hash([b; 32])).collect();

        let started = Instant::now();
        for hash in &hashes {
            delivery.strongly_acked(*hash);
            delivery.block_delivered(Block::new(*hash, crate::types::NodeId(*hash), vec![]));
            delivery.witness_ack_delivered(WitnessAck::new(*hash, 1));
        }
        delivery.total_ordering_delivered(hashes.clone(), true);
        assert!(started.elapsed() < Duration::from_millis(100));

        delivery.wait().await;
        for hash in &hashes {
            assert!(app.strongly_acked.lock().unwrap().contains(hash));
            assert!(app.block_delivered.lock().unwrap().contains(hash));
            assert!(app.witness_ack.lock().unwrap().contains(hash));
            assert!(app.total_ordering_delivered.lock().unwrap().contains(hash));
        }
    }

    #[tokio::test]
    async fn wait_with_an_empty_queue_returns_immediately() {
        let app = Arc::new(SlowApp::new(Duration::from_millis(1)));
        let delivery = NonBlockingDelivery::new(app);
        delivery.wait().await;
    }

    /// Poll-based variant of the timing assertion above: a `wait()` future
    /// stays `Pending` while an enqueued callback has not yet run, and
    /// becomes `Ready` only once the worker has drained it — checked at the
    /// `Future` level with `tokio_test`'s single-poll harness rather than by
    /// racing a wall-clock sleep.
    #[tokio::test]
    async fn wait_future_is_pending_until_the_worker_catches_up() {
        let app = Arc::new(SlowApp::new(Duration::from_millis(200)));
        let delivery = NonBlockingDelivery::new(app);
        delivery.strongly_acked(Hash([1; 32]));

        let mut wait_fut = tokio_test::task::spawn(delivery.wait());
        tokio_test::assert_pending!(wait_fut.poll());

        delivery.wait().await;
    }
}
