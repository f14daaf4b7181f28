// Worker Shutdown Token

use crate::error::{AppError, Result};
use std::future::Future;
use tokio::sync::watch;

/// Cooperative cancellation signal observed at worker suspension points
#[derive(Clone)]
pub struct ShutdownToken {
    rx: watch::Receiver<bool>,
}

impl ShutdownToken {
    /// Check if shutdown was requested
    pub fn is_shutdown(&self) -> bool {
        *self.rx.borrow()
    }

    /// Wait for shutdown signal.
    ///
    /// Never resolves if the sender is dropped without signalling.
    pub async fn wait(&mut self) {
        let signalled = self.rx.wait_for(|requested| *requested).await.is_ok();
        if !signalled {
            std::future::pending::<()>().await;
        }
    }

    /// Drive `fut` unless shutdown is requested first.
    ///
    /// A pending shutdown wins over a ready future, and `fut` is dropped
    /// unpolled in that case, so it must be cancel-safe.
    pub async fn guard<F: Future>(&mut self, fut: F) -> Result<F::Output> {
        tokio::select! {
            biased;
            _ = self.wait() => Err(AppError::CancellationRequested),
            out = fut => Ok(out),
        }
    }
}

/// Shutdown sender
pub struct ShutdownSender {
    tx: watch::Sender<bool>,
}

impl ShutdownSender {
    /// Signal shutdown to every token cloned from this channel
    pub fn shutdown(&self) {
        self.tx.send_replace(true);
    }
}

/// Create a shutdown channel
pub fn shutdown_channel() -> (ShutdownSender, ShutdownToken) {
    let (tx, rx) = watch::channel(false);
    (ShutdownSender { tx }, ShutdownToken { rx })
}
