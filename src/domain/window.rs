// src/domain/window.rs

//! Window messaging domain abstractions.
//!
//! This module defines the minimal contract the sender and receiver need from
//! the ambient window messaging transport. It intentionally avoids any
//! reference to a concrete environment (browser, webview, test harness).
//!
//! The transport is split into two capabilities:
//!
//! - [`MessageTarget`]: something a message can be posted *to* (a frame's
//!   content window, a parent or opener window).
//! - [`EventTarget`]: something message listeners are registered *on* (the
//!   current window).
//!
//! The transport is responsible only for delivering [`MessageEvent`]s to
//! registered listeners. Origin filtering and type dispatch are handled by the
//! receiver.
//!
//! Concrete implementations live under `src/transport/`.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use uuid::Uuid;

use crate::{Origin, Result};

/// A delivered message, as seen by listeners on the destination window.
#[derive(Clone, Debug, PartialEq)]
pub struct MessageEvent {
    // ---
    /// Origin of the window that posted the message.
    ///
    /// Stamped by the transport, never by the sender.
    pub origin: Origin,

    /// Structured message data, exactly as posted.
    pub data: Value,
}

impl MessageEvent {
    /// Create a message event.
    pub fn new(origin: impl Into<Origin>, data: Value) -> Self {
        Self {
            origin: origin.into(),
            data,
        }
    }
}

/// Identifier of a registered message listener.
///
/// Returned by [`EventTarget::add_message_listener`] and used to remove
/// exactly that listener again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(Uuid);

impl ListenerId {
    /// Generate a new unique listener id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A listener for incoming message events.
///
/// Listeners are invoked synchronously by the transport, one event at a time.
/// An error returned from [`handle_event`](MessageListener::handle_event) is
/// handed back to whatever context dispatched the event; it never prevents
/// other listeners on the same window from seeing the event.
pub trait MessageListener: Send + Sync {
    /// Handle a single incoming message event.
    fn handle_event(&self, event: &MessageEvent) -> Result<()>;
}

impl<F> MessageListener for F
where
    F: Fn(&MessageEvent) -> Result<()> + Send + Sync,
{
    fn handle_event(&self, event: &MessageEvent) -> Result<()> {
        self(event)
    }
}

/// Shared listener pointer.
pub type ListenerPtr = Arc<dyn MessageListener>;

/// Wrap a closure as a shared [`MessageListener`].
pub fn listener_fn<F>(f: F) -> ListenerPtr
where
    F: Fn(&MessageEvent) -> Result<()> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// A window that messages can be posted to.
///
/// Implementations must ensure that:
/// - `post_message()` never waits for the message to be delivered or handled.
/// - Messages posted through the same target are delivered in posting order.
/// - A target-origin mismatch is not an error; the message is simply not
///   delivered.
pub trait MessageTarget: Send + Sync {
    /// Post structured data to this window.
    ///
    /// `target_origin` is `*`, `/` or a URL whose origin the destination
    /// window must share for the message to be delivered.
    ///
    /// # Errors
    ///
    /// Fails with the transport's own errors (closed window, malformed target
    /// origin). Callers must not expect any other validation.
    fn post_message(&self, data: Value, target_origin: &str) -> Result<()>;
}

/// A window on which message listeners are registered.
pub trait EventTarget: Send + Sync {
    /// Origin of this window.
    fn origin(&self) -> &Origin;

    /// Register a listener for message events.
    ///
    /// Every call registers an additional, independent listener.
    fn add_message_listener(&self, listener: ListenerPtr) -> ListenerId;

    /// Remove a previously registered listener.
    ///
    /// Returns `true` if the listener was registered. Removing an unknown or
    /// already removed listener is a no-op.
    fn remove_message_listener(&self, id: ListenerId) -> bool;
}

/// Shared pointer to a postable window.
pub type MessageTargetPtr = Arc<dyn MessageTarget>;

/// Shared pointer to a listenable window.
pub type EventTargetPtr = Arc<dyn EventTarget>;
