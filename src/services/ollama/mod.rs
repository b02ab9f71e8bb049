//! Ollama inference backend

mod client;
mod decode;

pub use client::{ByteStream, GenerateRequest, OllamaClient};
pub use decode::{parse_fragment, GenerateChunk, LineDecoder};
