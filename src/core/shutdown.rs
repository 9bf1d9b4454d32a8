//! Shutdown Coordination
//!
//! Turns Ctrl-C / SIGTERM into a cooperative stop request. Blocking workers
//! cannot await a channel, so the request is published two ways: an
//! `AtomicBool` that producer threads poll between pushes, and a broadcast
//! channel the async orchestrator can `select!` on.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Coordinates graceful shutdown across the application
#[derive(Clone)]
pub struct ShutdownCoordinator {
    shutdown_tx: broadcast::Sender<()>,
    shutdown_requested: Arc<AtomicBool>,
}

impl ShutdownCoordinator {
    pub fn new() -> Self {
        let (shutdown_tx, _) = broadcast::channel(8);
        Self {
            shutdown_tx,
            shutdown_requested: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Subscribe to shutdown notifications
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Flag shared with blocking workers
    pub fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown_requested)
    }

    pub fn trigger_shutdown(&self) {
        // Release pairs with the Acquire loads in is_shutdown_requested and worker polls
        self.shutdown_requested.store(true, Ordering::Release);
        let _ = self.shutdown_tx.send(());
    }

    pub fn is_shutdown_requested(&self) -> bool {
        self.shutdown_requested.load(Ordering::Acquire)
    }

    /// Install signal handlers that request shutdown
    ///
    /// Must be called from within a tokio runtime. A second signal exits the
    /// process immediately with status 130.
    pub fn install_signal_handlers(&self) {
        #[cfg(unix)]
        {
            unsafe {
                libc::signal(libc::SIGPIPE, libc::SIG_DFL);
            }

            use tokio::signal::unix::{signal, SignalKind};
            let signal_count = Arc::new(AtomicUsize::new(0));
            let signals = [
                SignalKind::interrupt(),
                SignalKind::terminate(),
                SignalKind::hangup(),
            ];

            for kind in signals {
                let coordinator = self.clone();
                let sig_ctr = Arc::clone(&signal_count);

                tokio::spawn(async move {
                    if let Ok(mut sig) = signal(kind) {
                        while sig.recv().await.is_some() {
                            let prev = sig_ctr.fetch_add(1, Ordering::AcqRel);
                            if prev >= 1 {
                                log::warn!("Second shutdown signal received; exiting");
                                std::process::exit(130);
                            }
                            log::warn!("Shutdown requested; stopping producers");
                            coordinator.trigger_shutdown();
                        }
                    }
                });
            }
        }

        #[cfg(not(unix))]
        {
            let coordinator = self.clone();
            let signal_count = Arc::new(AtomicUsize::new(0));
            tokio::spawn(async move {
                while tokio::signal::ctrl_c().await.is_ok() {
                    if signal_count.fetch_add(1, Ordering::AcqRel) >= 1 {
                        std::process::exit(130);
                    }
                    log::warn!("Shutdown requested; stopping producers");
                    coordinator.trigger_shutdown();
                }
            });
        }
    }
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new()
    }
}
