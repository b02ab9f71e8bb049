//! Relay streaming: upstream fragments out to an event sink

mod forward;
mod sink;

pub use forward::{relay, RelayOutcome, RelayState};
pub use sink::{EventSink, SinkClosed};
