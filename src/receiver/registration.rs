use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::domain::{EventTargetPtr, ListenerId};
use crate::log_debug;

/// Handle for a listener installed by
/// [`receive_messages_from_window`](crate::receive_messages_from_window).
///
/// The listener stays installed until [`unregister`](Registration::unregister)
/// is called. Dropping the handle does **not** remove the listener.
pub struct Registration {
    window: EventTargetPtr,
    listener_id: ListenerId,
    registered: AtomicBool,
}

impl Registration {
    pub(crate) fn new(window: EventTargetPtr, listener_id: ListenerId) -> Self {
        Self {
            window,
            listener_id,
            registered: AtomicBool::new(true),
        }
    }

    /// Remove the listener from its window.
    ///
    /// Messages not yet dispatched are no longer delivered to this
    /// registration's handler table. Other registrations are unaffected.
    /// Calling this more than once is harmless.
    pub fn unregister(&self) {
        // ---
        if self.registered.swap(false, Ordering::AcqRel) {
            let _removed = self.window.remove_message_listener(self.listener_id);
            log_debug!(
                "{}: unregistered listener {} (present: {_removed})",
                self.window.origin(),
                self.listener_id
            );
        }
    }

    /// Returns `true` until [`unregister`](Registration::unregister) is called.
    pub fn is_registered(&self) -> bool {
        self.registered.load(Ordering::Acquire)
    }

    /// Id of the installed listener.
    pub fn listener_id(&self) -> ListenerId {
        self.listener_id
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("origin", self.window.origin())
            .field("listener_id", &self.listener_id)
            .field("registered", &self.is_registered())
            .finish()
    }
}
