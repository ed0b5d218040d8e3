//! Event delivery from simulation threads to the presentation thread.
//!
//! Packets are handed over one at a time through a blocking handshake, while
//! phase notices are fire-and-forget.

mod pump;

pub use pump::{EventPublisher, EventPump, PendingEvent, event_pump};
