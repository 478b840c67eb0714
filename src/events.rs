//! Facade event bus
//!
//! A typed publish/subscribe surface, one instance per facade. Delivery is
//! synchronous and follows registration order. Handlers are snapshotted
//! before delivery, so a handler may subscribe or unsubscribe without
//! affecting the emission in progress.

use serde::Serialize;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::AiError;
use crate::types::{Capability, ExecutionRequest, SessionConfig};

/// Event names. The string forms are part of the consumer contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Initialized,
    SessionCreated,
    Started,
    Progress,
    StreamingChunk,
    Completed,
    Error,
    SessionDestroyed,
}

impl EventKind {
    pub const ALL: [EventKind; 8] = [
        Self::Initialized,
        Self::SessionCreated,
        Self::Started,
        Self::Progress,
        Self::StreamingChunk,
        Self::Completed,
        Self::Error,
        Self::SessionDestroyed,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Initialized => "initialized",
            Self::SessionCreated => "sessionCreated",
            Self::Started => "started",
            Self::Progress => "progress",
            Self::StreamingChunk => "streamingChunk",
            Self::Completed => "completed",
            Self::Error => "error",
            Self::SessionDestroyed => "sessionDestroyed",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = AiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| AiError::InvalidInput(format!("unknown event kind: {s}")))
    }
}

/// Event payloads. `R` is the shaped result type of the facade's operation kind.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FacadeEvent<R> {
    Initialized { capabilities: Capability },
    SessionCreated { config: SessionConfig },
    Started { request: ExecutionRequest },
    Progress { loaded: f64, total: f64 },
    StreamingChunk { chunk: String },
    Completed { result: R },
    Error { message: String },
    SessionDestroyed {},
}

impl<R> FacadeEvent<R> {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Initialized { .. } => EventKind::Initialized,
            Self::SessionCreated { .. } => EventKind::SessionCreated,
            Self::Started { .. } => EventKind::Started,
            Self::Progress { .. } => EventKind::Progress,
            Self::StreamingChunk { .. } => EventKind::StreamingChunk,
            Self::Completed { .. } => EventKind::Completed,
            Self::Error { .. } => EventKind::Error,
            Self::SessionDestroyed {} => EventKind::SessionDestroyed,
        }
    }
}

pub type EventHandler<R> = Arc<dyn Fn(&FacadeEvent<R>) + Send + Sync>;

/// Token returned by [`EventBus::on`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Subscription<R> {
    id: SubscriptionId,
    /// `None` subscribes to every kind.
    kind: Option<EventKind>,
    handler: EventHandler<R>,
}

struct Registry<R> {
    next_id: u64,
    subscriptions: Vec<Subscription<R>>,
}

/// Typed observer registry. Cloning shares the registry.
pub struct EventBus<R> {
    registry: Arc<Mutex<Registry<R>>>,
}

impl<R> Clone for EventBus<R> {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
        }
    }
}

impl<R> Default for EventBus<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> EventBus<R> {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry {
                next_id: 0,
                subscriptions: Vec::new(),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Registry<R>> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn subscribe(&self, kind: Option<EventKind>, handler: EventHandler<R>) -> SubscriptionId {
        let mut registry = self.lock();
        let id = SubscriptionId(registry.next_id);
        registry.next_id += 1;
        registry.subscriptions.push(Subscription { id, kind, handler });
        id
    }

    /// Register `handler` for one event kind.
    pub fn on<F>(&self, kind: EventKind, handler: F) -> SubscriptionId
    where
        F: Fn(&FacadeEvent<R>) + Send + Sync + 'static,
    {
        self.subscribe(Some(kind), Arc::new(handler))
    }

    /// Register `handler` for every event kind.
    pub fn on_any<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&FacadeEvent<R>) + Send + Sync + 'static,
    {
        self.subscribe(None, Arc::new(handler))
    }

    /// Remove a subscription made with [`EventBus::on`] for `kind`.
    /// Returns whether anything was removed.
    pub fn off(&self, kind: EventKind, id: SubscriptionId) -> bool {
        self.remove(|s| s.id == id && s.kind == Some(kind))
    }

    /// Remove a subscription regardless of the kind it was registered for.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.remove(|s| s.id == id)
    }

    fn remove(&self, pred: impl Fn(&Subscription<R>) -> bool) -> bool {
        let mut registry = self.lock();
        let before = registry.subscriptions.len();
        registry.subscriptions.retain(|s| !pred(s));
        registry.subscriptions.len() != before
    }

    /// Deliver `event` to every matching handler, in registration order.
    pub fn emit(&self, event: FacadeEvent<R>) {
        let kind = event.kind();
        let handlers: Vec<EventHandler<R>> = self
            .lock()
            .subscriptions
            .iter()
            .filter(|s| s.kind.is_none_or(|k| k == kind))
            .map(|s| s.handler.clone())
            .collect();
        tracing::trace!(event = kind.as_str(), handlers = handlers.len(), "emit");
        for handler in handlers {
            handler(&event);
        }
    }

    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.lock()
            .subscriptions
            .iter()
            .filter(|s| s.kind.is_none_or(|k| k == kind))
            .count()
    }

    pub fn clear(&self) {
        self.lock().subscriptions.clear();
    }
}
