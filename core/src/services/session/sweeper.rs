//! Background sweeper for expired sessions and stale revocations

use std::sync::Arc;
use std::time::Duration;
use tg_shared::config::SessionConfig;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::errors::DomainError;
use crate::repositories::RevocationRepository;

use super::registry::SessionRegistry;

/// Timing of the sweeper loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweeperConfig {
    /// Pause between successful cycles
    pub interval: Duration,
    /// Pause after a failed cycle
    pub error_backoff: Duration,
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(300),
            error_backoff: Duration::from_secs(60),
        }
    }
}

impl SweeperConfig {
    /// Both pauses must be non-zero, otherwise the loop never yields to the timer
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.interval.is_zero() || self.error_backoff.is_zero() {
            return Err(DomainError::Validation {
                message: "sweep interval and error backoff must be at least one second".to_string(),
            });
        }
        Ok(())
    }
}

impl TryFrom<&SessionConfig> for SweeperConfig {
    type Error = DomainError;

    fn try_from(config: &SessionConfig) -> Result<Self, Self::Error> {
        let sweeper = Self {
            interval: Duration::from_secs(config.sweep_interval_seconds),
            error_backoff: Duration::from_secs(config.sweep_error_backoff_seconds),
        };
        sweeper.validate()?;
        Ok(sweeper)
    }
}

/// Outcome of one sweep cycle
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    pub sessions_removed: usize,
    pub revocations_pruned: usize,
}

impl<R: RevocationRepository + ?Sized> SessionRegistry<R> {
    /// Runs one sweep cycle
    ///
    /// Expired sessions are always evicted; an error means pruning the
    /// revocation store failed.
    pub fn sweep(&self) -> Result<SweepReport, DomainError> {
        let sessions_removed = self.sweep_expired();
        let revocations_pruned = self.revocations().cleanup()?;

        Ok(SweepReport {
            sessions_removed,
            revocations_pruned,
        })
    }
}

/// Handle to a running sweeper task
pub struct SweeperHandle {
    shutdown_tx: watch::Sender<()>,
    handle: JoinHandle<()>,
}

impl SweeperHandle {
    /// Signals the sweeper to stop and waits for it to finish
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(());
        if let Err(e) = self.handle.await {
            error!(error = %e, "Session sweeper task ended abnormally");
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Spawns the sweeper on the current tokio runtime
///
/// The first cycle runs immediately. A failed cycle is logged and followed
/// by the shorter back-off pause; the loop only ends on shutdown.
pub fn spawn_sweeper<R>(registry: Arc<SessionRegistry<R>>, config: SweeperConfig) -> SweeperHandle
where
    R: RevocationRepository + ?Sized + 'static,
{
    let (shutdown_tx, mut shutdown_rx) = watch::channel(());

    let handle = tokio::spawn(async move {
        info!(
            interval_secs = config.interval.as_secs(),
            backoff_secs = config.error_backoff.as_secs(),
            "Session sweeper started"
        );

        loop {
            // Pruning rewrites the revocation file, so keep it off the async workers
            let cycle = {
                let registry = Arc::clone(&registry);
                tokio::task::spawn_blocking(move || registry.sweep())
            };

            let pause = match cycle.await {
                Ok(Ok(report)) => {
                    if report.sessions_removed > 0 || report.revocations_pruned > 0 {
                        info!(
                            sessions_removed = report.sessions_removed,
                            revocations_pruned = report.revocations_pruned,
                            "Sweep completed"
                        );
                    } else {
                        debug!("Sweep completed, nothing to remove");
                    }
                    config.interval
                }
                Ok(Err(e)) => {
                    error!(error = %e, "Sweep cycle failed");
                    config.error_backoff
                }
                Err(e) => {
                    error!(error = %e, "Sweep cycle aborted");
                    config.error_backoff
                }
            };

            tokio::select! {
                _ = shutdown_rx.changed() => {
                    info!("Session sweeper received shutdown signal");
                    break;
                }
                _ = tokio::time::sleep(pause) => {}
            }
        }

        info!("Session sweeper stopped");
    });

    SweeperHandle {
        shutdown_tx,
        handle,
    }
}
