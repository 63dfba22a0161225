//! Action handlers: UpdateAction dispatch and background task spawning

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tracing::{debug, warn};

use baseconnect_camera::CameraHandle;
use baseconnect_core::LookupOutcome;

use crate::handler::UpdateAction;
use crate::lookup::EquipmentLookup;
use crate::message::Message;

/// Retry policy for transient lookup failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupRetry {
    /// Extra attempts after the first failure
    pub transient_retries: u32,
    pub base_backoff_ms: u64,
}

impl Default for LookupRetry {
    fn default() -> Self {
        Self {
            transient_retries: 0,
            base_backoff_ms: 250,
        }
    }
}

/// Everything an action needs to reach the outside world
pub struct ActionContext<L> {
    pub msg_tx: mpsc::Sender<Message>,
    pub camera: CameraHandle,
    pub lookup: Arc<L>,
    pub retry: LookupRetry,
    pub shutdown_rx: watch::Receiver<bool>,
}

/// Execute an action.
///
/// Camera commands are queued synchronously so their order matches the order
/// the state machine issued them in.
pub fn handle_action<L>(action: UpdateAction, ctx: &ActionContext<L>)
where
    L: EquipmentLookup + Sync + 'static,
{
    match action {
        UpdateAction::AcquireCamera { generation, facing } => {
            if let Err(e) = ctx.camera.acquire(generation, facing) {
                warn!("Failed to queue camera acquisition: {}", e);
                let _ = ctx.msg_tx.try_send(Message::CameraFailed {
                    generation,
                    reason: e.to_string(),
                });
            }
        }

        UpdateAction::ReleaseCamera => {
            if let Err(e) = ctx.camera.release() {
                debug!("Camera release not queued: {}", e);
            }
        }

        UpdateAction::LookupEquipment { generation, code } => {
            spawn_lookup(
                generation,
                code,
                ctx.lookup.clone(),
                ctx.retry,
                ctx.msg_tx.clone(),
                ctx.shutdown_rx.clone(),
            );
        }
    }
}

/// Look `code` up in the background and report `LookupCompleted`.
///
/// Failures are retried `retry.transient_retries` times with linear backoff.
/// Shutdown abandons the lookup without reporting.
pub fn spawn_lookup<L>(
    generation: u64,
    code: String,
    lookup: Arc<L>,
    retry: LookupRetry,
    msg_tx: mpsc::Sender<Message>,
    mut shutdown_rx: watch::Receiver<bool>,
) -> tokio::task::JoinHandle<()>
where
    L: EquipmentLookup + Sync + 'static,
{
    tokio::spawn(async move {
        let mut attempt: u32 = 0;
        let outcome = loop {
            attempt += 1;
            let result = tokio::select! {
                result = lookup.find_by_code(&code) => result,
                _ = shutdown_rx.changed() => {
                    debug!("Lookup for {:?} abandoned on shutdown", code);
                    return;
                }
            };

            match result {
                Err(e) if attempt <= retry.transient_retries && e.is_recoverable() => {
                    warn!(
                        "Lookup for {:?} failed (attempt {}): {}, retrying",
                        code, attempt, e
                    );
                    let backoff = retry.base_backoff_ms.saturating_mul(u64::from(attempt));
                    tokio::select! {
                        _ = tokio::time::sleep(Duration::from_millis(backoff)) => {}
                        _ = shutdown_rx.changed() => return,
                    }
                }
                result => break LookupOutcome::from_result(result),
            }
        };

        let _ = msg_tx
            .send(Message::LookupCompleted {
                generation,
                code,
                outcome,
            })
            .await;
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use baseconnect_core::prelude::*;
    use baseconnect_core::Equipment;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Fails `failures` times, then reports no record
    struct FlakyLookup {
        failures: usize,
        calls: AtomicUsize,
    }

    impl EquipmentLookup for FlakyLookup {
        async fn find_by_code(&self, _code: &str) -> Result<Option<Equipment>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                Err(Error::lookup("timeout"))
            } else {
                Ok(None)
            }
        }
    }

    fn flaky(failures: usize) -> Arc<FlakyLookup> {
        Arc::new(FlakyLookup {
            failures,
            calls: AtomicUsize::new(0),
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_lookup_without_retries_reports_failure() {
        let (tx, mut rx) = mpsc::channel(4);
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);
        let lookup = flaky(1);

        spawn_lookup(7, "C".into(), lookup.clone(), LookupRetry::default(), tx, shutdown_rx)
            .await
            .unwrap();

        assert_eq!(
            rx.recv().await,
            Some(Message::LookupCompleted {
                generation: 7,
                code: "C".into(),
                outcome: LookupOutcome::Failed("timeout".into()),
            })
        );
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_failure_is_retried() {
        let (tx, mut rx) = mpsc::channel(4);
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);
        let lookup = flaky(2);
        let retry = LookupRetry {
            transient_retries: 2,
            base_backoff_ms: 100,
        };

        spawn_lookup(1, "C".into(), lookup.clone(), retry, tx, shutdown_rx)
            .await
            .unwrap();

        match rx.recv().await {
            Some(Message::LookupCompleted { outcome, .. }) => {
                assert_eq!(outcome, LookupOutcome::NotFound)
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_abandons_lookup() {
        let (tx, mut rx) = mpsc::channel(4);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let retry = LookupRetry {
            transient_retries: 5,
            base_backoff_ms: 10_000,
        };

        let task = spawn_lookup(1, "C".into(), flaky(10), retry, tx, shutdown_rx);
        tokio::task::yield_now().await;
        shutdown_tx.send(true).unwrap();
        task.await.unwrap();

        assert!(rx.try_recv().is_err());
    }
}
