//! NDJSON framing for the upstream body (Bytes -> lines -> fragments)

use bytes::Bytes;
use serde::Deserialize;

/// One record of Ollama's streamed generate response.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateChunk {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Splits a chunked byte stream into complete lines.
///
/// Bytes are buffered until a `\n` arrives, so multi-byte characters and
/// records split across chunks come out whole.
#[derive(Debug, Default)]
pub struct LineDecoder {
    buf: Vec<u8>,
}

impl LineDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk, returning every line it completed. Blank lines are dropped.
    pub fn push(&mut self, chunk: &Bytes) -> Vec<String> {
        self.buf.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(idx) = self.buf.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buf.drain(..=idx).collect();
            if let Some(line) = to_line(&line[..idx]) {
                lines.push(line);
            }
        }
        lines
    }

    /// Whatever is left once the stream has ended.
    pub fn finish(&mut self) -> Option<String> {
        let rest = std::mem::take(&mut self.buf);
        to_line(&rest)
    }
}

fn to_line(raw: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(raw);
    let text = text.trim_end_matches('\r');
    if text.trim().is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Extract the text fragment from one line. Malformed lines yield `None`.
pub fn parse_fragment(line: &str) -> Option<String> {
    let chunk: GenerateChunk = match serde_json::from_str(line) {
        Ok(chunk) => chunk,
        Err(e) => {
            tracing::trace!(error = %e, line, "Skipping malformed upstream line");
            return None;
        }
    };

    if let Some(error) = &chunk.error {
        tracing::warn!("Upstream reported error in stream: {}", error);
    }

    chunk.response.filter(|text| !text.is_empty())
}
