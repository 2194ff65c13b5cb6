//! These models represent the objects passed around by the chat core
//!
//! There are a few related formats in play:
//! - the transport-facing request/response bodies, handled by the server crate
//! - openai-style messages/tools, sent from the orchestrator to the LLM
//! - registry definitions, describing the tools the orchestrator can dispatch
//!
//! Wire formats are converted at the edges (providers::wire, tools::schema);
//! everything in between uses the internal structs below.
pub mod message;
pub mod role;
pub mod tool;
