//! Domain layer public interface.
//!
//! This module defines the window messaging abstractions shared by the sender,
//! the receiver and the transports. None of them depend on a concrete
//! environment.
//!
//! All domain consumers must import symbols via this module, not by
//! referencing individual files directly.

mod window;

// --- Window domain re-exports ---

pub use window::{
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
