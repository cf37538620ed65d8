//! In-memory window transport.
//!
//! This module provides a pure in-process implementation of the domain-level
//! [`MessageTarget`] and [`EventTarget`] capabilities. It is intended for
//! testing, for embedding in non-browser hosts, and as a reference for
//! transport semantics.
//!
//! ## Reference Semantics
//!
//! - `post_message()` only queues the event on the destination window; it never
//!   runs listeners. Delivery happens later, either through
//!   [`MemoryWindow::dispatch_pending`] or a task started with
//!   [`spawn_event_loop`](crate::spawn_event_loop).
//! - Events posted to the same window are delivered in posting order.
//! - The event's origin is always the origin of the posting window.
//! - A target origin that does not match the destination is a silent drop.
//! - Posting to a closed or dropped window fails with [`Error::WindowClosed`].
//! - A listener removed while an event is being dispatched is not invoked for
//!   that event if it had not run yet.
//!
//! ## Non-Goals
//!
//! This transport does not emulate browser security policy beyond the
//! target-origin check, nor structured-clone restrictions beyond what
//! `serde_json::Value` can hold.

use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use serde_json::Value;
use tokio::sync::Notify;
use uuid::Uuid;

use crate::{
    // ---
    log_debug,
    log_warn,
    Error,
    EventTarget,
    ListenerId,
    ListenerPtr,
    MessageEvent,
    MessageTarget,
    Origin,
    Result,
    TargetOrigin,
    WindowConfig,
};

/// Acquire mutex guard, ignoring poisoning
fn lock_ignore_poison<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    match m.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// An in-process window.
///
/// Owns a listener registry and a queue of posted-but-undelivered events.
/// Other windows post to it through a [`WindowProxy`] obtained with
/// [`proxy_to`](MemoryWindow::proxy_to); the window can also post to itself
/// directly.
pub struct MemoryWindow {
    // ---
    id: String,
    origin: Origin,
    listeners: Mutex<Vec<(ListenerId, ListenerPtr)>>,
    queue: Mutex<VecDeque<MessageEvent>>,
    notify: Notify,
    closed: AtomicBool,
}

impl MemoryWindow {
    // ---
    fn new(config: WindowConfig) -> Self {
        Self {
            id: config
                .window_id
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            origin: config.origin,
            listeners: Mutex::new(Vec::new()),
            queue: Mutex::new(VecDeque::new()),
            notify: Notify::new(),
            closed: AtomicBool::new(false),
        }
    }

    /// Window id used in log output.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Obtain a reference to `target` that posts messages as this window.
    ///
    /// This is the analogue of a frame's content window held by its host (or
    /// the parent window held by a frame). The proxy does not keep `target`
    /// alive.
    pub fn proxy_to(&self, target: &Arc<MemoryWindow>) -> WindowProxy {
        WindowProxy {
            source_origin: self.origin.clone(),
            target: Arc::downgrade(target),
        }
    }

    /// Returns `true` once [`close`](MemoryWindow::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Close the window.
    ///
    /// Drops undelivered events and all listeners, and stops an event loop
    /// started with [`spawn_event_loop`](crate::spawn_event_loop). Further
    /// posts fail with [`Error::WindowClosed`].
    pub fn close(&self) {
        // ---
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }

        let _dropped = {
            let mut queue = lock_ignore_poison(&self.queue);
            let n = queue.len();
            queue.clear();
            n
        };
        lock_ignore_poison(&self.listeners).clear();

        log_debug!("{}: closed, dropped {_dropped} undelivered events", self.id);

        // wake every event loop, not just one
        self.notify.notify_waiters();
    }

    /// Number of currently registered message listeners.
    pub fn listener_count(&self) -> usize {
        lock_ignore_poison(&self.listeners).len()
    }

    /// Number of posted events waiting for delivery.
    pub fn pending_count(&self) -> usize {
        lock_ignore_poison(&self.queue).len()
    }

    /// Deliver every queued event to the registered listeners.
    ///
    /// Returns the number of events delivered.
    ///
    /// # Errors
    ///
    /// If a listener fails, the event is still offered to the remaining
    /// listeners, then the first error is returned unchanged. Events queued
    /// behind the failing one stay queued for the next call.
    pub fn dispatch_pending(&self) -> Result<usize> {
        // ---
        let mut delivered = 0;

        while let Some(event) = self.pop_event() {
            delivered += 1;
            self.dispatch_event(&event)?;
        }

        Ok(delivered)
    }

    /// Deliver a single event synchronously to every registered listener.
    ///
    /// Listeners run in registration order, with no lock held. Every listener
    /// sees the event even if an earlier one fails; the first error is
    /// returned unchanged.
    pub fn dispatch_event(&self, event: &MessageEvent) -> Result<()> {
        // ---
        let snapshot: Vec<(ListenerId, ListenerPtr)> = lock_ignore_poison(&self.listeners).clone();

        log_debug!(
            "{}: dispatching event from {} to {} listeners",
            self.id,
            event.origin,
            snapshot.len()
        );

        let mut first_error = None;

        for (id, listener) in snapshot {
            if !self.has_listener(id) {
                continue;
            }

            if let Err(err) = listener.handle_event(event) {
                if first_error.is_none() {
                    first_error = Some(err);
                }
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn has_listener(&self, id: ListenerId) -> bool {
        lock_ignore_poison(&self.listeners)
            .iter()
            .any(|(registered, _)| *registered == id)
    }

    fn pop_event(&self) -> Option<MessageEvent> {
        lock_ignore_poison(&self.queue).pop_front()
    }

    /// Wait until an event is queued or the window is closed.
    ///
    /// Returns immediately if the window is already closed. A close racing
    /// with this call is never missed: the waiter is registered before the
    /// closed flag is checked.
    pub(crate) async fn notified(&self) {
        // ---
        let mut notified = std::pin::pin!(self.notify.notified());
        notified.as_mut().enable();

        if self.is_closed() {
            return;
        }

        notified.await;
    }

    /// Queue a message posted from `source_origin`, honoring `target_origin`.
    fn enqueue(&self, source_origin: &Origin, data: Value, target_origin: &str) -> Result<()> {
        // ---
        let target_origin = TargetOrigin::parse(target_origin)?;

        if self.is_closed() {
            return Err(Error::WindowClosed(self.id.clone()));
        }

        if !target_origin.permits(source_origin, &self.origin) {
            log_debug!(
                "{}: dropped message from {source_origin}, target origin {target_origin} does not match {}",
                self.id,
                self.origin
            );
            return Ok(());
        }

        lock_ignore_poison(&self.queue).push_back(MessageEvent {
            origin: source_origin.clone(),
            data,
        });
        self.notify.notify_one();

        log_debug!("{}: queued message from {source_origin}", self.id);
        Ok(())
    }
}

impl EventTarget for MemoryWindow {
    // ---
    fn origin(&self) -> &Origin {
        &self.origin
    }

    fn add_message_listener(&self, listener: ListenerPtr) -> ListenerId {
        // ---
        let id = ListenerId::generate();
        lock_ignore_poison(&self.listeners).push((id, listener));
        log_debug!("{}: added listener {id}", self.id);
        id
    }

    fn remove_message_listener(&self, id: ListenerId) -> bool {
        // ---
        let mut listeners = lock_ignore_poison(&self.listeners);
        let before = listeners.len();
        listeners.retain(|(registered, _)| *registered != id);
        before != listeners.len()
    }
}

impl MessageTarget for MemoryWindow {
    /// Post a message to this window from itself.
    fn post_message(&self, data: Value, target_origin: &str) -> Result<()> {
        self.enqueue(&self.origin, data, target_origin)
    }
}

impl fmt::Debug for MemoryWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryWindow")
            .field("id", &self.id)
            .field("origin", &self.origin)
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

/// A posting reference to a [`MemoryWindow`], held by another window.
///
/// Messages posted through the proxy carry the holder's origin.
#[derive(Clone, Debug)]
pub struct WindowProxy {
    source_origin: Origin,
    target: Weak<MemoryWindow>,
}

impl WindowProxy {
    /// Returns `true` if the target window was closed or dropped.
    pub fn is_closed(&self) -> bool {
        self.target
            .upgrade()
            .map_or(true, |window| window.is_closed())
    }
}

impl MessageTarget for WindowProxy {
    fn post_message(&self, data: Value, target_origin: &str) -> Result<()> {
        // ---
        match self.target.upgrade() {
            Some(window) => window.enqueue(&self.source_origin, data, target_origin),
            None => Err(Error::WindowClosed("<dropped>".into())),
        }
    }
}

/// Create a new in-memory window.
///
/// The window's origin is not validated, but a malformed one is logged since
/// no exact target origin can ever match it.
pub fn create_memory_window(config: WindowConfig) -> Arc<MemoryWindow> {
    // ---
    if !Origin::is_valid(config.origin.as_str()) {
        log_warn!("creating window with malformed origin {:?}", config.origin.as_str());
    }

    let window = MemoryWindow::new(config);
    log_debug!("{}: created window for {}", window.id, window.origin);

    Arc::new(window)
}
