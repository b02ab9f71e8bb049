//! Upstream NDJSON -> downstream event forwarding loop

use super::sink::EventSink;
use crate::services::ollama::{parse_fragment, LineDecoder, OllamaClient};
use crate::types::{RelayError, StreamEvent};
use futures::StreamExt;
use std::fmt;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayState {
    Idle,
    Connecting,
    Streaming,
    Closed,
    Failed,
    Cancelled,
}

impl fmt::Display for RelayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Connecting => "connecting",
            Self::Streaming => "streaming",
            Self::Closed => "closed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelayOutcome {
    pub state: RelayState,
    pub fragments: usize,
}

struct Session {
    state: RelayState,
    fragments: usize,
}

impl Session {
    fn new() -> Self {
        Self {
            state: RelayState::Idle,
            fragments: 0,
        }
    }

    fn enter(&mut self, next: RelayState) {
        tracing::debug!("relay {} -> {}", self.state, next);
        self.state = next;
    }

    fn finish(mut self, terminal: RelayState) -> RelayOutcome {
        self.enter(terminal);
        RelayOutcome {
            state: self.state,
            fragments: self.fragments,
        }
    }

    /// Returns false once the downstream is gone.
    async fn forward<S: EventSink>(&mut self, sink: &mut S, line: &str) -> bool {
        match parse_fragment(line) {
            Some(text) => {
                if sink.emit(StreamEvent::fragment(text)).await.is_err() {
                    return false;
                }
                self.fragments += 1;
                true
            }
            None => true,
        }
    }

    async fn fail<S: EventSink>(self, sink: &mut S, err: RelayError) -> RelayOutcome {
        tracing::warn!("Relay failed after {} fragments: {}", self.fragments, err);
        if sink.emit(StreamEvent::diagnostic(err.to_string())).await.is_ok() {
            let _ = sink.emit(StreamEvent::done()).await;
        }
        self.finish(RelayState::Failed)
    }
}

/// Run one relay session: stream `prompt` through `upstream` and write every
/// text fragment to `sink` in arrival order.
///
/// Never returns an error. Failures become a single diagnostic event
/// followed by the terminal marker. Cancellation is checked before every
/// upstream read and dropping out of the loop releases the upstream body.
pub async fn relay<S: EventSink>(
    upstream: &OllamaClient,
    prompt: &str,
    sink: &mut S,
    cancel: &CancellationToken,
) -> RelayOutcome {
    let mut session = Session::new();
    session.enter(RelayState::Connecting);

    let connected = tokio::select! {
        biased;
        _ = cancel.cancelled() => return session.finish(RelayState::Cancelled),
        connected = upstream.generate_stream(prompt) => connected,
    };

    let mut body = match connected {
        Ok(body) => body,
        Err(err) => return session.fail(sink, err).await,
    };

    session.enter(RelayState::Streaming);
    let mut decoder = LineDecoder::new();

    loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => return session.finish(RelayState::Cancelled),
            next = body.next() => next,
        };

        match next {
            Some(Ok(chunk)) => {
                for line in decoder.push(&chunk) {
                    if !session.forward(sink, &line).await {
                        return session.finish(RelayState::Cancelled);
                    }
                }
            }
            Some(Err(e)) => {
                let err = RelayError::from_upstream(&upstream.generate_url(), e);
                return session.fail(sink, err).await;
            }
            None => {
                if let Some(line) = decoder.finish() {
                    if !session.forward(sink, &line).await {
                        return session.finish(RelayState::Cancelled);
                    }
                }
                if sink.emit(StreamEvent::done()).await.is_err() {
                    return session.finish(RelayState::Cancelled);
                }
                return session.finish(RelayState::Closed);
            }
        }
    }
}
