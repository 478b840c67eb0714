//! Cancellation utilities
//!
//! Provides first-class abort handles for session creation, blocking requests
//! and streams.

use tokio_util::sync::CancellationToken;

/// A handle that can be used to request cancellation.
///
/// Handles form a tree: cancelling a handle also cancels every handle derived
/// from it with [`AbortHandle::child`], but never its parent.
#[derive(Clone, Debug, Default)]
pub struct AbortHandle {
    token: CancellationToken,
}

impl AbortHandle {
    /// Create a new, independent abort handle.
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
        }
    }

    /// Derive a handle that is cancelled whenever `self` is.
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
        }
    }

    /// Request cancellation. Any wrapped streams/futures observing this handle
    /// will stop as soon as possible.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Check if cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// A future that resolves when cancellation is requested.
    pub fn cancelled(&self) -> tokio_util::sync::WaitForCancellationFuture<'_> {
        self.token.cancelled()
    }
}
