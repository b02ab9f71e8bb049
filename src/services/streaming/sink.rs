use crate::types::events::StreamEvent;
use std::future::Future;
use tokio::sync::mpsc;

/// The downstream side of a relay session went away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkClosed;

/// Where a relay session writes its events. Every event is delivered
/// immediately; nothing is held back for batching.
pub trait EventSink: Send {
    fn emit(&mut self, event: StreamEvent) -> impl Future<Output = Result<(), SinkClosed>> + Send;
}

impl EventSink for mpsc::Sender<StreamEvent> {
    fn emit(&mut self, event: StreamEvent) -> impl Future<Output = Result<(), SinkClosed>> + Send {
        async move { self.send(event).await.map_err(|_| SinkClosed) }
    }
}

/// Collects events in memory.
impl EventSink for Vec<StreamEvent> {
    fn emit(&mut self, event: StreamEvent) -> impl Future<Output = Result<(), SinkClosed>> + Send {
        self.push(event);
        async { Ok(()) }
    }
}
