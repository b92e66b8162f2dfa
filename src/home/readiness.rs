use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast::error::RecvError;
use tokio::sync::watch;
use tokio::time::Instant;

use crate::assistant::ReadyRx;
use crate::error::{Error, Result};
use crate::home::consts::READY_MESSAGE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadinessState {
    Pending,
    Ready,
    TimedOut,
}

/// Races the assistant's ready notification against an optional deadline.
/// Whichever happens first is final.
pub(crate) struct ReadinessGate {
    state: watch::Sender<ReadinessState>,
    log_on_ready: bool,
}

impl ReadinessGate {
    /// The deadline starts counting now, not when the task is first polled.
    pub(crate) fn spawn(ready_rx: ReadyRx, timeout: Option<Duration>, log_on_ready: bool) -> Arc<Self> {
        let (state, _) = watch::channel(ReadinessState::Pending);
        let gate = Arc::new(Self { state, log_on_ready });

        // A deadline past what `Instant` can represent is the same as none.
        let deadline = timeout.and_then(|timeout| Instant::now().checked_add(timeout));
        let task_gate = gate.clone();
        tokio::spawn(async move {
            task_gate.run(ready_rx, deadline).await;
        });

        gate
    }

    async fn run(&self, ready_rx: ReadyRx, deadline: Option<Instant>) {
        let Some(deadline) = deadline else {
            if wait_for_ready(ready_rx).await {
                self.settle(ReadinessState::Ready);
            } else {
                tracing::debug!("assistant dropped its ready channel before becoming ready");
            }
            return;
        };

        // A closed ready channel leaves the outcome to the timer.
        let ready = async {
            if !wait_for_ready(ready_rx).await {
                std::future::pending::<()>().await;
            }
        };

        tokio::select! {
            _ = ready => {
                self.settle(ReadinessState::Ready);
            }
            _ = tokio::time::sleep_until(deadline) => {
                if self.settle(ReadinessState::TimedOut) {
                    tracing::debug!("assistant was not ready before the deadline");
                }
            }
        }
    }

    /// Moves out of `Pending` exactly once. Returns whether this call did it.
    pub(crate) fn settle(&self, outcome: ReadinessState) -> bool {
        let settled = self.state.send_if_modified(|state| {
            if *state == ReadinessState::Pending {
                *state = outcome;
                true
            } else {
                false
            }
        });

        if settled && outcome == ReadinessState::Ready && self.log_on_ready {
            tracing::info!("{}", READY_MESSAGE);
        }
        settled
    }

    pub(crate) fn state(&self) -> ReadinessState {
        *self.state.borrow()
    }

    pub(crate) fn wait(&self) -> impl Future<Output = Result<()>> + Send + 'static {
        let mut rx = self.state.subscribe();
        async move {
            let settled = rx
                .wait_for(|state| *state != ReadinessState::Pending)
                .await
                .map(|state| *state);
            let state = settled.map_err(|_| Error::AssistantClosed)?;

            if state == ReadinessState::TimedOut {
                Err(Error::InitializationTimeout)
            } else {
                Ok(())
            }
        }
    }
}

/// `false` if the channel closed without a notification. A lagged receiver
/// has missed at least one notification, so it counts as ready.
async fn wait_for_ready(mut ready_rx: ReadyRx) -> bool {
    match ready_rx.recv().await {
        Ok(()) | Err(RecvError::Lagged(_)) => true,
        Err(RecvError::Closed) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::broadcast;
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    /// Counts events at INFO or above.
    struct CountLogs(Arc<AtomicUsize>);

    impl<S: tracing::Subscriber> Layer<S> for CountLogs {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() <= tracing::Level::INFO {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    fn count_logs() -> (Arc<AtomicUsize>, tracing::subscriber::DefaultGuard) {
        let count = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(CountLogs(count.clone()));
        (count, tracing::subscriber::set_default(subscriber))
    }

    #[tokio::test]
    async fn resolves_once_ready_without_timeout() {
        let (ready_tx, _) = broadcast::channel(4);
        let gate = ReadinessGate::spawn(ready_tx.subscribe(), None, false);
        assert_eq!(gate.state(), ReadinessState::Pending);

        ready_tx.send(()).expect("gate should be listening");
        assert_eq!(gate.wait().await, Ok(()));

        // Extra notifications change nothing.
        let _ = ready_tx.send(());
        assert_eq!(gate.wait().await, Ok(()));
        assert_eq!(gate.state(), ReadinessState::Ready);
    }

    #[tokio::test(start_paused = true)]
    async fn ready_before_timeout_wins() {
        let (ready_tx, _) = broadcast::channel(4);
        let gate = ReadinessGate::spawn(ready_tx.subscribe(), Some(Duration::from_millis(5000)), false);

        ready_tx.send(()).expect("gate should be listening");
        assert_eq!(gate.wait().await, Ok(()));

        tokio::time::advance(Duration::from_millis(10_000)).await;
        let _ = ready_tx.send(());
        assert_eq!(gate.wait().await, Ok(()));
        assert_eq!(gate.state(), ReadinessState::Ready);
    }

    #[tokio::test(start_paused = true)]
    async fn times_out_and_ignores_late_ready() {
        let (count, _guard) = count_logs();
        let (ready_tx, _) = broadcast::channel(4);
        let gate = ReadinessGate::spawn(ready_tx.subscribe(), Some(Duration::from_millis(20)), true);

        tokio::time::advance(Duration::from_millis(50)).await;
        assert_eq!(gate.wait().await, Err(Error::InitializationTimeout));

        let _ = ready_tx.send(());
        tokio::task::yield_now().await;
        assert_eq!(gate.wait().await, Err(Error::InitializationTimeout));
        assert_eq!(gate.state(), ReadinessState::TimedOut);
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn closed_ready_channel_leaves_it_to_the_timer() {
        let (ready_tx, ready_rx) = broadcast::channel::<()>(4);
        let gate = ReadinessGate::spawn(ready_rx, Some(Duration::from_millis(20)), false);
        drop(ready_tx);

        assert_eq!(gate.wait().await, Err(Error::InitializationTimeout));
    }

    #[tokio::test]
    async fn huge_timeout_still_waits_for_ready() {
        let (ready_tx, _) = broadcast::channel(4);
        let gate = ReadinessGate::spawn(ready_tx.subscribe(), Some(Duration::from_millis(u64::MAX)), false);

        ready_tx.send(()).expect("gate should be listening");
        assert_eq!(gate.wait().await, Ok(()));
    }

    #[tokio::test]
    async fn lagged_receiver_counts_as_ready() {
        let (ready_tx, ready_rx) = broadcast::channel(1);
        ready_tx.send(()).expect("receiver exists");
        ready_tx.send(()).expect("receiver exists");

        let gate = ReadinessGate::spawn(ready_rx, None, false);
        assert_eq!(gate.wait().await, Ok(()));
    }

    #[test]
    fn settles_only_once() {
        let (state, _) = watch::channel(ReadinessState::Pending);
        let gate = ReadinessGate { state, log_on_ready: false };

        assert!(gate.settle(ReadinessState::TimedOut));
        assert!(!gate.settle(ReadinessState::Ready));
        assert_eq!(gate.state(), ReadinessState::TimedOut);
    }

    #[tokio::test]
    async fn logs_exactly_once_when_asked() {
        let (count, _guard) = count_logs();
        let (ready_tx, _) = broadcast::channel(4);
        let gate = ReadinessGate::spawn(ready_tx.subscribe(), None, true);

        ready_tx.send(()).expect("gate should be listening");
        gate.wait().await.expect("gate should resolve");
        let _ = ready_tx.send(());
        tokio::task::yield_now().await;

        assert!(!gate.settle(ReadinessState::Ready));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn stays_quiet_by_default() {
        let (count, _guard) = count_logs();
        let (ready_tx, _) = broadcast::channel(4);
        let gate = ReadinessGate::spawn(ready_tx.subscribe(), None, false);

        ready_tx.send(()).expect("gate should be listening");
        gate.wait().await.expect("gate should resolve");

        assert_eq!(count.load(Ordering::SeqCst), 0);
    }
}
