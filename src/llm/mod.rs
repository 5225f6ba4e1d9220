//! LLM: upstream forwarding for the AI proxy endpoint.
//!
//! DESIGN
//! ======
//! The proxy never interprets chat payloads, so there are no message types
//! here: `ChatUpstream::forward` takes and returns raw JSON. Anthropic is the
//! only provider; handlers depend on the trait so tests can swap in mocks.

pub mod anthropic;
pub mod types;

pub use anthropic::AnthropicClient;
pub use types::{ChatUpstream, RequestSummary, UpstreamError};
