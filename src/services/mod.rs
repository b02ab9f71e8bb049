pub mod ollama;
pub mod streaming;
pub mod template;

pub use ollama::OllamaClient;
pub use streaming::{relay, EventSink, RelayOutcome, RelayState};
pub use template::TemplateEngine;
