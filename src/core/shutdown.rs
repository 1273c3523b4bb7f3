//! Generic Shutdown Coordination
//!
//! Provides a root lifecycle token for an application, optional signal
//! handling, and child tokens for components (such as queues) whose lifetime
//! must end when the application shuts down.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Coordinates graceful shutdown across the application
///
/// Cancelling the root token cancels every child token handed out by
/// [`ShutdownCoordinator::child_token`], so every queue built from a child
/// observes the shutdown on its next check.
#[derive(Debug, Clone, Default)]
pub struct ShutdownCoordinator {
    root: CancellationToken,
}

impl ShutdownCoordinator {
    /// Create a new shutdown coordinator
    pub fn new() -> Self {
        Self {
            root: CancellationToken::new(),
        }
    }

    /// Clone of the root token
    pub fn token(&self) -> CancellationToken {
        self.root.clone()
    }

    /// Derive a token that is cancelled with the root, but can also be
    /// cancelled on its own without affecting the root
    pub fn child_token(&self) -> CancellationToken {
        self.root.child_token()
    }

    /// Trigger shutdown
    pub fn trigger_shutdown(&self) {
        self.root.cancel();
    }

    /// Check if shutdown has been requested
    pub fn is_shutdown_requested(&self) -> bool {
        self.root.is_cancelled()
    }

    /// Wait until shutdown has been requested
    pub async fn wait_for_shutdown(&self) {
        self.root.cancelled().await
    }

    /// Cancel the root token when the process receives a termination signal
    ///
    /// A second signal exits the process immediately with status 130.
    /// Must be called from within a tokio runtime.
    pub fn listen_for_signals(&self) {
        setup_signal_handlers(self.root.clone());
    }

    /// Guard execution of a future with shutdown coordination
    ///
    /// Sets up signal handlers and hands the closure the root token, so the
    /// guarded code can derive child tokens or race its work against shutdown.
    pub async fn guard<F, Fut, R, E>(future_fn: F) -> Result<R, E>
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: std::future::Future<Output = Result<R, E>>,
    {
        let coordinator = Self::new();
        coordinator.listen_for_signals();

        future_fn(coordinator.token()).await
    }
}

/// Set up signal handlers for graceful shutdown
fn setup_signal_handlers(root: CancellationToken) {
    let signal_count = Arc::new(AtomicUsize::new(0));

    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let signals = [
            SignalKind::interrupt(),
            SignalKind::terminate(),
            SignalKind::hangup(),
        ];

        for kind in signals {
            let token = root.clone();
            let sig_ctr = signal_count.clone();

            tokio::spawn(async move {
                if let Ok(mut sig) = signal(kind) {
                    // One shutdown per signal kind; repeats go through the counter
                    while sig.recv().await.is_some() {
                        on_signal(&token, &sig_ctr);
                    }
                }
            });
        }
    }

    // SIGINT is already covered above on unix; listening twice would count
    // one Ctrl-C as two signals
    #[cfg(not(unix))]
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_signal(&root, &signal_count);
        }
    });
}

fn on_signal(token: &CancellationToken, signal_count: &AtomicUsize) {
    let prev = signal_count.fetch_add(1, Ordering::AcqRel);
    if prev >= 1 {
        log::warn!("Second termination signal received; exiting");
        std::process::exit(130);
    }
    log::info!("Termination signal received; shutting down");
    token.cancel();
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tokio::time::{timeout, Duration};

    #[tokio::test]
    async fn test_shutdown_coordinator_creation() {
        let coordinator = ShutdownCoordinator::new();

        // Should start with shutdown not requested
        assert!(!coordinator.is_shutdown_requested());
    }

    #[tokio::test]
    async fn test_shutdown_coordinator_trigger() {
        let coordinator = ShutdownCoordinator::new();
        let token = coordinator.token();

        coordinator.trigger_shutdown();

        assert!(coordinator.is_shutdown_requested());
        let signal_received = timeout(Duration::from_millis(100), token.cancelled()).await;
        assert!(signal_received.is_ok(), "Should observe shutdown");
    }

    #[tokio::test]
    async fn test_child_tokens_follow_root() {
        let coordinator = ShutdownCoordinator::new();
        let child1 = coordinator.child_token();
        let child2 = coordinator.child_token();

        // Cancelling a child leaves the root and siblings alone
        child1.cancel();
        assert!(!coordinator.is_shutdown_requested());
        assert!(!child2.is_cancelled());

        coordinator.trigger_shutdown();

        let observed = timeout(Duration::from_millis(100), child2.cancelled()).await;
        assert!(observed.is_ok(), "Child should observe root shutdown");
        assert!(
            timeout(Duration::from_millis(100), coordinator.wait_for_shutdown())
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    #[serial]
    async fn test_guard_functionality() {
        let result = ShutdownCoordinator::guard(|token| async move {
            // Simulate some work
            tokio::select! {
                _ = tokio::time::sleep(Duration::from_millis(50)) => {
                    Ok::<i32, &str>(42)
                }
                _ = token.cancelled() => {
                    Ok(-1)
                }
            }
        })
        .await;

        assert_eq!(result, Ok(42));
    }

    #[cfg(unix)]
    #[tokio::test]
    #[serial]
    async fn test_single_interrupt_cancels_without_exiting() {
        let coordinator = ShutdownCoordinator::new();
        let child = coordinator.child_token();
        coordinator.listen_for_signals();

        // Let the handler tasks register before the signal arrives
        tokio::time::sleep(Duration::from_millis(100)).await;

        let status = std::process::Command::new("kill")
            .args(["-INT", &std::process::id().to_string()])
            .status()
            .unwrap();
        assert!(status.success());

        let observed = timeout(Duration::from_secs(2), coordinator.wait_for_shutdown()).await;
        assert!(observed.is_ok(), "SIGINT should cancel the root token");
        assert!(child.is_cancelled());

        // Still running: one signal is a graceful shutdown, not an exit
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(coordinator.is_shutdown_requested());
    }
}
