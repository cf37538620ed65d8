use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{Error, Result};

/// Type-erased message handler.
///
/// Takes the envelope payload by reference; typed handlers deserialize from
/// it, raw handlers clone it.
pub(crate) type BoxedHandler = Arc<dyn Fn(&Value) -> Result<()> + Send + Sync>;

/// Live table of message handlers, keyed by message type.
///
/// Cloning is cheap and every clone refers to the same table. A receiver keeps
/// one clone and reads it on every incoming message, so handlers added or
/// removed after registration take effect for the next message.
///
/// # Example
///
/// ```
/// # use window_messaging::MessageHandlers;
/// # use serde::Deserialize;
/// #[derive(Deserialize)]
/// struct Resize { height: u32 }
///
/// let handlers = MessageHandlers::new();
/// handlers
///     .on("RESIZE", |msg: Resize| {
///         println!("new height {}", msg.height);
///         Ok(())
///     })
///     .on_value("LOG", |payload| {
///         println!("{payload}");
///         Ok(())
///     });
///
/// assert!(handlers.contains("RESIZE"));
/// assert_eq!(handlers.len(), 2);
/// ```
#[derive(Clone, Default)]
pub struct MessageHandlers {
    table: Arc<RwLock<HashMap<String, BoxedHandler>>>,
}

fn read_ignore_poison<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    match lock.read() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

fn write_ignore_poison<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    match lock.write() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

impl MessageHandlers {
    // ---
    /// Create an empty handler table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a typed handler for `message_type`.
    ///
    /// The payload is deserialized into `T` before the handler runs. A payload
    /// that does not fit `T` is reported as
    /// [`Error::Serialization`](crate::Error::Serialization) from the dispatch
    /// and the handler is not called.
    ///
    /// Replaces any handler previously registered for the same type.
    pub fn on<T, F>(&self, message_type: impl Into<String>, handler: F) -> &Self
    where
        T: DeserializeOwned + 'static,
        F: Fn(T) -> Result<()> + Send + Sync + 'static,
    {
        // ---
        let wrapped: BoxedHandler = Arc::new(move |payload: &Value| {
            let msg = T::deserialize(payload).map_err(Error::from)?;
            handler(msg)
        });
        self.insert(message_type.into(), wrapped)
    }

    /// Register a handler receiving the raw payload value.
    ///
    /// Replaces any handler previously registered for the same type.
    pub fn on_value<F>(&self, message_type: impl Into<String>, handler: F) -> &Self
    where
        F: Fn(Value) -> Result<()> + Send + Sync + 'static,
    {
        // ---
        let wrapped: BoxedHandler = Arc::new(move |payload: &Value| handler(payload.clone()));
        self.insert(message_type.into(), wrapped)
    }

    fn insert(&self, message_type: String, handler: BoxedHandler) -> &Self {
        write_ignore_poison(&self.table).insert(message_type, handler);
        self
    }

    /// Remove the handler for `message_type`. Returns `true` if one was present.
    pub fn remove(&self, message_type: &str) -> bool {
        write_ignore_poison(&self.table)
            .remove(message_type)
            .is_some()
    }

    /// Remove every handler.
    pub fn clear(&self) {
        write_ignore_poison(&self.table).clear();
    }

    /// Returns `true` if a handler is registered for `message_type`.
    pub fn contains(&self, message_type: &str) -> bool {
        read_ignore_poison(&self.table).contains_key(message_type)
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        read_ignore_poison(&self.table).len()
    }

    /// Returns `true` if no handlers are registered.
    pub fn is_empty(&self) -> bool {
        read_ignore_poison(&self.table).is_empty()
    }

    /// Look up the current handler for `message_type`.
    ///
    /// The handler is cloned out so the table lock is released before it runs;
    /// a handler may therefore modify the table itself.
    pub(crate) fn get(&self, message_type: &str) -> Option<BoxedHandler> {
        read_ignore_poison(&self.table).get(message_type).cloned()
    }

    /// Invoke the handler for `message_type`, if any, with `payload`.
    ///
    /// Returns `Ok(false)` when no handler is registered. Errors returned by the
    /// handler are passed through unchanged.
    pub fn dispatch(&self, message_type: &str, payload: &Value) -> Result<bool> {
        // ---
        match self.get(message_type) {
            Some(handler) => handler(payload).map(|()| true),
            None => Ok(false),
        }
    }
}

impl fmt::Debug for MessageHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let table = read_ignore_poison(&self.table);
        let mut types: Vec<&str> = table.keys().map(String::as_str).collect();
        types.sort_unstable();
        f.debug_struct("MessageHandlers")
            .field("types", &types)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use serde::Deserialize;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Ping {
        n: u32,
    }

    #[test]
    fn test_typed_dispatch() {
        // ---
        let seen = Arc::new(Mutex::new(Vec::new()));
        let handlers = MessageHandlers::new();

        let sink = seen.clone();
        handlers.on("PING", move |ping: Ping| {
            sink.lock().unwrap().push(ping);
            Ok(())
        });

        assert!(handlers.dispatch("PING", &json!({ "n": 1 })).unwrap());
        assert_eq!(*seen.lock().unwrap(), vec![Ping { n: 1 }]);
    }

    #[test]
    fn test_typed_payload_mismatch() {
        // ---
        let handlers = MessageHandlers::new();
        handlers.on("PING", |_: Ping| panic!("must not be called"));

        let err = handlers.dispatch("PING", &json!("oops")).unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }

    #[test]
    fn test_missing_handler() {
        // ---
        let handlers = MessageHandlers::new();
        assert!(!handlers.dispatch("PING", &json!(null)).unwrap());
    }

    #[test]
    fn test_handler_error_passes_through() {
        // ---
        let handlers = MessageHandlers::new();
        handlers.on_value("FAIL", |_| Err(Error::handler("boom")));

        let err = handlers.dispatch("FAIL", &json!(null)).unwrap_err();
        assert_eq!(err.to_string(), "handler error: boom");
    }

    #[test]
    fn test_clones_share_table() {
        // ---
        let handlers = MessageHandlers::new();
        let clone = handlers.clone();

        clone.on_value("A", |_| Ok(()));
        assert!(handlers.contains("A"));

        assert!(handlers.remove("A"));
        assert!(!clone.contains("A"));
        assert!(!handlers.remove("A"));
    }

    #[test]
    fn test_handler_may_mutate_table() {
        // ---
        let handlers = MessageHandlers::new();
        let table = handlers.clone();
        handlers.on_value("ONCE", move |_| {
            table.remove("ONCE");
            Ok(())
        });

        assert!(handlers.dispatch("ONCE", &json!(null)).unwrap());
        assert!(!handlers.dispatch("ONCE", &json!(null)).unwrap());
        assert!(handlers.is_empty());
    }

    #[test]
    fn test_reserved_looking_keys_are_plain_keys() {
        // ---
        let handlers = MessageHandlers::new();
        assert!(!handlers.dispatch("constructor", &json!(null)).unwrap());
        assert!(!handlers.dispatch("__proto__", &json!(null)).unwrap());

        handlers.on_value("__proto__", |_| Ok(()));
        assert!(handlers.dispatch("__proto__", &json!(null)).unwrap());
    }

    #[test]
    fn test_debug_lists_types() {
        // ---
        let handlers = MessageHandlers::new();
        handlers.on_value("B", |_| Ok(())).on_value("A", |_| Ok(()));
        assert_eq!(
            format!("{handlers:?}"),
            r#"MessageHandlers { types: ["A", "B"] }"#
        );
    }
}
