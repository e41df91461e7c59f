// Analysis pipeline: selection -> per-request assistant session -> aggregated reply.
// All remote calls go through assistant_client; nothing here talks HTTP to the platform.

pub mod aggregator;
pub mod handlers;
pub mod prompts;
pub mod selection;
pub mod session;
