mod client;
mod error;
mod ollama;
pub mod parser;

pub use client::{GenerationClient, RetryPolicy, TextBackend};
pub use error::GenerationError;
pub use ollama::OllamaBackend;

#[cfg(test)]
pub(crate) use client::testing;
