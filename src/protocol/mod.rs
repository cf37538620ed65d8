/// Message envelope wire format
///
/// This module defines the `{ "type": ..., "payload": ... }` structure
/// exchanged between sender and receiver.
mod envelope;

pub use envelope::Envelope;
