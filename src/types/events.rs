use axum::response::sse::Event;

/// Name of the terminal SSE event sent after the last fragment.
pub const DONE_EVENT: &str = "done";
pub const DONE_DATA: &str = "[DONE]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    Fragment { content: String },
    Diagnostic { message: String },
    Done,
}

impl StreamEvent {
    pub fn fragment(content: impl Into<String>) -> Self {
        Self::Fragment { content: content.into() }
    }

    pub fn diagnostic(message: impl Into<String>) -> Self {
        Self::Diagnostic { message: message.into() }
    }

    pub fn done() -> Self {
        Self::Done
    }

    /// Payload written after `data: `.
    pub fn to_sse_data(&self) -> String {
        match self {
            Self::Fragment { content } => normalize_line_breaks(content),
            Self::Diagnostic { message } => format!("Error: {}", normalize_line_breaks(message)),
            Self::Done => DONE_DATA.to_string(),
        }
    }

    /// Fragments and diagnostics stay unnamed so `EventSource.onmessage` sees them.
    pub fn into_sse(self) -> Event {
        let data = self.to_sse_data();
        match self {
            Self::Done => Event::default().event(DONE_EVENT).data(data),
            _ => Event::default().data(data),
        }
    }
}

// SSE field values may not carry a bare `\r`.
fn normalize_line_breaks(text: &str) -> String {
    if text.contains('\r') {
        text.replace("\r\n", "\n").replace('\r', "\n")
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_is_prefixed() {
        let event = StreamEvent::diagnostic("upstream went away");
        assert_eq!(event.to_sse_data(), "Error: upstream went away");
    }

    #[test]
    fn carriage_returns_become_newlines() {
        let event = StreamEvent::fragment("a\r\nb\rc");
        assert_eq!(event.to_sse_data(), "a\nb\nc");
    }
}
