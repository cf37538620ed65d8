use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A message envelope.
///
/// The wire form is `{ "type": <string>, "payload": <any> }`. This is the
/// entire contract a peer must match to interoperate.
///
/// `message_type` is a caller-defined key with no global registry; keeping it
/// unique between a communicating pair is the caller's responsibility.
///
/// # Example
///
/// ```
/// # use window_messaging::Envelope;
/// # use serde_json::json;
/// let envelope = Envelope::new("PING", json!({ "n": 1 }));
/// assert_eq!(
///     envelope.to_value(),
///     json!({ "type": "PING", "payload": { "n": 1 } })
/// );
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    // ---
    /// Message type used to select a handler.
    #[serde(rename = "type")]
    pub message_type: String,

    /// Arbitrary payload, handed to the handler as-is.
    #[serde(default)]
    pub payload: Value,
}

impl Envelope {
    // ---
    /// Create an envelope.
    pub fn new(message_type: impl Into<String>, payload: Value) -> Self {
        Self {
            message_type: message_type.into(),
            payload,
        }
    }

    /// Convert into the structured value handed to the transport.
    pub fn to_value(&self) -> Value {
        Value::from(self.clone())
    }

    /// Destructure `type` and `payload` out of delivered message data.
    ///
    /// Returns `None` when there is no usable type: `data` is not an object,
    /// `type` is missing, or `type` is not a string. A missing `payload` is
    /// read as `Value::Null`. Unknown extra fields are ignored.
    ///
    /// Borrows from `data`; nothing is cloned.
    pub fn destructure(data: &Value) -> Option<(&str, &Value)> {
        // ---
        static NULL: Value = Value::Null;

        let fields = data.as_object()?;
        let message_type = fields.get("type")?.as_str()?;
        let payload = fields.get("payload").unwrap_or(&NULL);

        Some((message_type, payload))
    }
}

impl From<Envelope> for Value {
    fn from(envelope: Envelope) -> Self {
        // ---
        let mut fields = serde_json::Map::with_capacity(2);
        fields.insert("type".into(), Value::String(envelope.message_type));
        fields.insert("payload".into(), envelope.payload);
        Value::Object(fields)
    }
}
