//! Message receiver.
//!
//! Installs one listener on a window. For each incoming message event the
//! listener:
//!
//! 1. drops the event unless its origin equals the allowed origin exactly,
//! 2. destructures `type` and `payload` from the event data,
//! 3. drops the event unless the live handler table has an entry for `type`,
//! 4. calls that handler synchronously with the payload and returns its result
//!    unchanged.
//!
//! Drops are silent: they are neither errors nor logged. Handler errors are
//! not caught; they surface in whatever context dispatched the event.

mod handlers;
mod registration;

pub use handlers::MessageHandlers;
pub use registration::Registration;

use std::sync::Arc;

use crate::domain::{EventTargetPtr, MessageEvent, MessageListener};
use crate::{log_debug, Envelope, Origin, Result};

/// Listener applying the origin gate and type dispatch for one registration.
pub(crate) struct OriginFilteredListener {
    allowed_origin: Origin,
    handlers: MessageHandlers,
}

impl OriginFilteredListener {
    pub(crate) fn new(allowed_origin: Origin, handlers: MessageHandlers) -> Self {
        Self {
            allowed_origin,
            handlers,
        }
    }
}

impl MessageListener for OriginFilteredListener {
    fn handle_event(&self, event: &MessageEvent) -> Result<()> {
        // ---
        if event.origin != self.allowed_origin {
            return Ok(());
        }

        let Some((message_type, payload)) = Envelope::destructure(&event.data) else {
            return Ok(());
        };

        self.handlers.dispatch(message_type, payload).map(|_| ())
    }
}

/// Listen for messages from `allowed_origin` on `window`.
///
/// `allowed_origin` must be the literal origin of the expected sender
/// (`scheme://host[:port]`); it is compared by strict equality and is never
/// derived or normalized. `handlers` is read live on every event.
///
/// Each call installs an additional, independent listener. The returned
/// [`Registration`] removes exactly that listener.
///
/// # Example
///
/// ```
/// # use window_messaging::{create_memory_window, receive_messages_from_window, MessageHandlers, WindowConfig};
/// let frame = create_memory_window(WindowConfig::new("https://app.example"));
///
/// let handlers = MessageHandlers::new();
/// handlers.on_value("PING", |payload| {
///     println!("ping {payload}");
///     Ok(())
/// });
///
/// let registration = receive_messages_from_window(frame.clone(), "https://host.example", &handlers);
/// assert!(registration.is_registered());
///
/// registration.unregister();
/// assert!(!registration.is_registered());
/// ```
pub fn receive_messages_from_window(
    window: EventTargetPtr,
    allowed_origin: &str,
    handlers: &MessageHandlers,
) -> Registration {
    // ---
    let listener = OriginFilteredListener::new(Origin::from(allowed_origin), handlers.clone());
    let listener_id = window.add_message_listener(Arc::new(listener));

    log_debug!(
        "{}: registered listener {listener_id} for messages from {allowed_origin}",
        window.origin()
    );

    Registration::new(window, listener_id)
}
