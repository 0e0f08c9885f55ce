//! Context - Deadlines and Cancellation
//!
//! TigerStyle: Every backing-store call runs under an explicit context.
//!
//! A `Context` carries an optional deadline and an optional cancellation
//! signal. Backends wrap their I/O in [`Context::run`], so an expired
//! deadline or a cancelled caller drops the in-flight future instead of
//! leaking it.

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;

use crate::document::{DocumentError, DocumentResult};

// =============================================================================
// Context
// =============================================================================

/// Deadline and cancellation scope for a single operation.
#[derive(Debug, Clone, Default)]
pub struct Context {
    deadline: Option<Instant>,
    cancel: Option<watch::Receiver<bool>>,
}

/// Cancels every context derived from [`Context::with_cancel`].
///
/// Dropping the handle without calling [`CancelHandle::cancel`] leaves the
/// contexts live.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    /// Signal cancellation.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

impl Context {
    /// A context with no deadline that is never cancelled.
    #[must_use]
    pub fn background() -> Self {
        Self::default()
    }

    /// Derive a context that expires `timeout` from now.
    ///
    /// A timeout too large to represent as an instant adds no deadline.
    #[must_use]
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => self.clone(),
        }
    }

    /// Derive a context that expires at `deadline`.
    ///
    /// An earlier deadline inherited from `self` wins.
    #[must_use]
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let deadline = match self.deadline {
            Some(existing) if existing <= deadline => existing,
            _ => deadline,
        };
        Self {
            deadline: Some(deadline),
            cancel: self.cancel.clone(),
        }
    }

    /// Derive a cancellable context.
    ///
    /// The deadline is inherited; the new handle replaces any inherited
    /// cancellation signal.
    #[must_use]
    pub fn with_cancel(&self) -> (Self, CancelHandle) {
        let (tx, rx) = watch::channel(false);
        let ctx = Self {
            deadline: self.deadline,
            cancel: Some(rx),
        };
        (ctx, CancelHandle { tx })
    }

    /// The deadline, if any.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Whether the context is already cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// Whether the context is already expired or cancelled.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.check().is_err()
    }

    fn check(&self) -> DocumentResult<()> {
        if self.is_cancelled() {
            return Err(DocumentError::Cancelled);
        }
        if self
            .deadline
            .is_some_and(|deadline| deadline <= Instant::now())
        {
            return Err(DocumentError::DeadlineExceeded);
        }
        Ok(())
    }

    /// Run `fut` under this context.
    ///
    /// Fails immediately without polling `fut` when the context is already
    /// done. Otherwise `fut` is dropped as soon as the deadline passes or
    /// cancellation is signalled.
    pub async fn run<F, T>(&self, fut: F) -> DocumentResult<T>
    where
        F: Future<Output = DocumentResult<T>>,
    {
        self.check()?;

        tokio::select! {
            biased;
            () = cancelled(self.cancel.clone()) => Err(DocumentError::Cancelled),
            () = expired(self.deadline) => Err(DocumentError::DeadlineExceeded),
            result = fut => result,
        }
    }
}

async fn cancelled(rx: Option<watch::Receiver<bool>>) {
    if let Some(mut rx) = rx {
        if rx.wait_for(|cancelled| *cancelled).await.is_ok() {
            return;
        }
    }
    // Sender dropped without cancelling, or no signal at all.
    std::future::pending::<()>().await;
}

async fn expired(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending::<()>().await,
    }
}

// =============================================================================
// Tests
// =============================================================================
