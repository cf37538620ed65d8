//! Transport implementations.
//!
//! This module provides concrete implementations of the domain-level
//! `MessageTarget` and `EventTarget` capabilities, exposed through
//! constructor functions.
//!
//! Domain code must not depend on transport-specific types.

mod memory;
mod runner;

pub use memory::{create_memory_window, MemoryWindow, WindowProxy};
pub use runner::spawn_event_loop;
