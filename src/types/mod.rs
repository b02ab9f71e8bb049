pub mod errors;
pub mod events;
pub mod query;

pub use errors::RelayError;
pub use events::StreamEvent;
pub use query::{Query, QueryParams};
