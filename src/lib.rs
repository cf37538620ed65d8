//! Origin-scoped message passing between windows
//!
//! This library provides a thin abstraction for exchanging typed messages
//! between a host window and an embedded frame (or vice versa). A sender wraps
//! a payload in a `{ type, payload }` envelope and posts it to a target window
//! restricted to a destination origin; a receiver installs one listener that
//! drops messages from any other origin and dispatches the rest by type to a
//! caller-supplied handler table.
//!
//! The window messaging transport itself is an injectable capability
//! ([`MessageTarget`], [`EventTarget`]). An in-process reference transport
//! ([`MemoryWindow`]) is always available.
//!
//! ```
//! use serde::{Deserialize, Serialize};
//! use std::sync::{Arc, Mutex};
//! use window_messaging::{
//!     create_memory_window, receive_messages_from_window, send_message_to_window,
//!     MessageHandlers, WindowConfig,
//! };
//!
//! #[derive(Serialize, Deserialize)]
//! struct Ping { n: u32 }
//!
//! # fn main() -> window_messaging::Result<()> {
//! let host = create_memory_window(WindowConfig::new("https://host.example"));
//! let frame = create_memory_window(WindowConfig::new("https://app.example"));
//!
//! let received = Arc::new(Mutex::new(Vec::new()));
//! let sink = received.clone();
//!
//! let handlers = MessageHandlers::new();
//! handlers.on("PING", move |ping: Ping| {
//!     sink.lock().unwrap().push(ping.n);
//!     Ok(())
//! });
//! let registration = receive_messages_from_window(frame.clone(), "https://host.example", &handlers);
//!
//! send_message_to_window(&host.proxy_to(&frame), "PING", Ping { n: 1 }, "https://app.example")?;
//! frame.dispatch_pending()?;
//!
//! assert_eq!(*received.lock().unwrap(), vec![1]);
//! registration.unregister();
//! # Ok(())
//! # }
//! ```

// Import all sub modules once...
mod domain;
mod protocol;
mod receiver;
mod sender;
mod transport;

mod origin;
mod window_config;

mod error;
mod macros;

pub(crate) use macros::{log_debug, log_info, log_warn};

pub use error::{BoxError, Error, Result};
pub use origin::{Origin, TargetOrigin, ANY_ORIGIN, SAME_ORIGIN};
pub use protocol::Envelope;
pub use window_config::WindowConfig;

pub use receiver::{receive_messages_from_window, MessageHandlers, Registration};
pub use sender::{send_envelope, send_message_to_window};

pub use transport::{create_memory_window, spawn_event_loop, MemoryWindow, WindowProxy};

// --- public re-exports
pub use domain::{
    //
    listener_fn,
    EventTarget,
    EventTargetPtr,
    ListenerId,
    ListenerPtr,
    MessageEvent,
    MessageListener,
    MessageTarget,
    MessageTargetPtr,
};
