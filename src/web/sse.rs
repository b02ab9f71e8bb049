use crate::types::StreamEvent;
use axum::response::sse::{Event, KeepAlive, KeepAliveStream, Sse};
use futures::stream::Stream;
use std::convert::Infallible;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::DropGuard;

const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(15);

/// SSE body fed by a relay session.
///
/// Holds the session's cancellation guard: when axum drops the body because
/// the client went away, the guard fires and the relay stops reading upstream.
pub struct RelayEventStream {
    events: ReceiverStream<StreamEvent>,
    _cancel_on_drop: DropGuard,
}

impl RelayEventStream {
    pub fn new(receiver: mpsc::Receiver<StreamEvent>, cancel_on_drop: DropGuard) -> Self {
        Self {
            events: ReceiverStream::new(receiver),
            _cancel_on_drop: cancel_on_drop,
        }
    }

    pub fn into_sse(self) -> Sse<KeepAliveStream<Self>> {
        Sse::new(self).keep_alive(
            KeepAlive::new()
                .interval(KEEP_ALIVE_INTERVAL)
                .text("keep-alive"),
        )
    }
}

impl Stream for RelayEventStream {
    type Item = Result<Event, Infallible>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.events)
            .poll_next(cx)
            .map(|event| event.map(|event| Ok(event.into_sse())))
    }
}
