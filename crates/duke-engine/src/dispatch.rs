//! Background execution of reply requests.
//!
//! The dispatcher runs each [`PendingTurn`] on the tokio runtime and queues
//! the outcome as a [`Settlement`]. The owner of the controller drains the
//! queue on its own schedule, so the controller is only ever mutated from
//! one place.
//!
//! Dropping the dispatcher aborts outstanding requests. A task that finishes
//! after its dispatcher is gone has nowhere to deliver, and its result is
//! discarded.

use crate::controller::{PendingTurn, TurnId};
use crate::reply::{ReplyError, ReplyService};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Outcome of one reply request, ready for
/// [`ConversationController::settle`](crate::ConversationController::settle).
#[derive(Debug)]
pub struct Settlement {
    pub turn: TurnId,
    pub outcome: Result<String, ReplyError>,
}

/// Runs reply requests in the background and collects their outcomes.
pub struct ReplyDispatcher {
    service: Arc<dyn ReplyService>,
    tx: mpsc::UnboundedSender<Settlement>,
    rx: mpsc::UnboundedReceiver<Settlement>,
    tasks: Vec<JoinHandle<()>>,
}

impl ReplyDispatcher {
    /// Create a dispatcher for `service`.
    pub fn new(service: Arc<dyn ReplyService>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            service,
            tx,
            rx,
            tasks: Vec::new(),
        }
    }

    /// Start the request for `pending`. Must be called inside a tokio runtime.
    pub fn dispatch(&mut self, pending: PendingTurn) {
        self.tasks.retain(|t| !t.is_finished());

        let service = Arc::clone(&self.service);
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            let outcome = service.reply(&pending.request).await;
            if tx
                .send(Settlement {
                    turn: pending.turn,
                    outcome,
                })
                .is_err()
            {
                debug!(turn = %pending.turn, "settlement dropped: receiver gone");
            }
        });
        self.tasks.push(handle);
    }

    /// Take the next settlement without waiting.
    pub fn try_next(&mut self) -> Option<Settlement> {
        self.rx.try_recv().ok()
    }

    /// Wait for the next settlement.
    pub async fn next(&mut self) -> Option<Settlement> {
        self.rx.recv().await
    }

    /// Number of requests that have not finished yet.
    pub fn in_flight(&self) -> usize {
        self.tasks.iter().filter(|t| !t.is_finished()).count()
    }

    /// Abort every outstanding request.
    pub fn abort_all(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}

impl Drop for ReplyDispatcher {
    fn drop(&mut self) {
        self.abort_all();
    }
}

impl std::fmt::Debug for ReplyDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReplyDispatcher")
            .field("tasks", &self.tasks.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::fakes::ScriptedService;
    use crate::controller::ConversationController;
    use crate::reply::ReplyRequest;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tokio::sync::Notify;

    /// Service that blocks until released.
    struct GatedService {
        gate: Arc<Notify>,
        finished: Arc<AtomicBool>,
    }

    #[async_trait]
    impl ReplyService for GatedService {
        async fn reply(&self, _request: &ReplyRequest) -> Result<String, ReplyError> {
            self.gate.notified().await;
            self.finished.store(true, Ordering::SeqCst);
            Ok("late".into())
        }
    }

    #[tokio::test]
    async fn test_dispatch_delivers_settlement() {
        let service = Arc::new(ScriptedService::new(vec![Ok("Get well soon".into())]));
        let mut dispatcher = ReplyDispatcher::new(service);
        let mut controller = ConversationController::default();

        let pending = controller.submit("I'm sick").unwrap();
        dispatcher.dispatch(pending);

        // Still pending until the settlement is applied.
        assert!(controller.is_pending());
        assert_eq!(controller.conversation().len(), 2);

        let settlement = dispatcher.next().await.unwrap();
        assert!(controller.settle(settlement.turn, settlement.outcome));
        assert!(!controller.is_pending());
        assert_eq!(controller.conversation().last().unwrap().text, "Get well soon");
    }

    #[tokio::test]
    async fn test_try_next_empty_while_in_flight() {
        let gate = Arc::new(Notify::new());
        let finished = Arc::new(AtomicBool::new(false));
        let service = Arc::new(GatedService {
            gate: Arc::clone(&gate),
            finished: Arc::clone(&finished),
        });
        let mut dispatcher = ReplyDispatcher::new(service);
        let mut controller = ConversationController::default();

        dispatcher.dispatch(controller.submit("hi").unwrap());
        tokio::task::yield_now().await;
        assert!(dispatcher.try_next().is_none());
        assert_eq!(dispatcher.in_flight(), 1);

        gate.notify_one();
        let settlement = dispatcher.next().await.unwrap();
        assert_eq!(settlement.outcome.unwrap(), "late");
        assert!(finished.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_drop_aborts_outstanding_request() {
        let gate = Arc::new(Notify::new());
        let finished = Arc::new(AtomicBool::new(false));
        let service = Arc::new(GatedService {
            gate: Arc::clone(&gate),
            finished: Arc::clone(&finished),
        });

        let mut dispatcher = ReplyDispatcher::new(service);
        let mut controller = ConversationController::default();
        dispatcher.dispatch(controller.submit("hi").unwrap());
        tokio::task::yield_now().await;

        drop(dispatcher);
        gate.notify_one();
        tokio::task::yield_now().await;

        assert!(!finished.load(Ordering::SeqCst));
        assert!(controller.is_pending());
        assert_eq!(controller.conversation().len(), 2);
    }
}
