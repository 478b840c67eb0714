//! Facade lifecycle state

use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::AiError;
use crate::utils::cancel::AbortHandle;

/// `Uninitialized -> Initializing -> Ready -> (Busy -> Ready)* -> Destroyed`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FacadeState {
    Uninitialized,
    Initializing,
    Ready,
    Busy,
    Destroyed,
}

impl FacadeState {
    pub(crate) fn not_ready(&self) -> AiError {
        let reason = match self {
            Self::Uninitialized => "initialize() has not completed",
            Self::Initializing => "initialization is still in progress",
            Self::Busy => "a request is already in flight",
            Self::Destroyed => "the facade has been destroyed",
            Self::Ready => "unexpected state",
        };
        AiError::NotReady(reason.to_string())
    }
}

#[derive(Debug)]
struct Lifecycle {
    state: FacadeState,
    /// Abort handle of the request currently holding the Busy state.
    in_flight: Option<AbortHandle>,
}

/// Shared lifecycle cell. Cloning shares the state.
#[derive(Debug, Clone)]
pub(crate) struct StateCell {
    inner: Arc<Mutex<Lifecycle>>,
}

impl StateCell {
    pub(crate) fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Lifecycle {
                state: FacadeState::Uninitialized,
                in_flight: None,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Lifecycle> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn get(&self) -> FacadeState {
        self.lock().state
    }

    /// Move `from -> to`. Returns the state actually observed on mismatch.
    pub(crate) fn transition(&self, from: FacadeState, to: FacadeState) -> Result<(), FacadeState> {
        let mut lifecycle = self.lock();
        if lifecycle.state == from {
            lifecycle.state = to;
            Ok(())
        } else {
            Err(lifecycle.state)
        }
    }

    /// Enter Busy from Ready for one request.
    pub(crate) fn begin_request(&self, abort: AbortHandle) -> Result<BusyGuard, AiError> {
        let mut lifecycle = self.lock();
        if lifecycle.state != FacadeState::Ready {
            return Err(lifecycle.state.not_ready());
        }
        lifecycle.state = FacadeState::Busy;
        lifecycle.in_flight = Some(abort);
        Ok(BusyGuard { cell: self.clone() })
    }

    /// Abort the in-flight request, if any.
    pub(crate) fn cancel_in_flight(&self) -> bool {
        match self.lock().in_flight.as_ref() {
            Some(abort) => {
                abort.cancel();
                true
            }
            None => false,
        }
    }

    /// Enter Destroyed. Returns `false` if already destroyed.
    pub(crate) fn mark_destroyed(&self) -> bool {
        let mut lifecycle = self.lock();
        if lifecycle.state == FacadeState::Destroyed {
            return false;
        }
        lifecycle.state = FacadeState::Destroyed;
        if let Some(abort) = lifecycle.in_flight.take() {
            abort.cancel();
        }
        true
    }
}

/// Holds the Busy state for one request and returns the facade to Ready
/// when dropped, unless it was destroyed in the meantime.
#[derive(Debug)]
pub(crate) struct BusyGuard {
    cell: StateCell,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        let mut lifecycle = self.cell.lock();
        lifecycle.in_flight = None;
        if lifecycle.state == FacadeState::Busy {
            lifecycle.state = FacadeState::Ready;
        }
    }
}
