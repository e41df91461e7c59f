//! Assistant Client: the single point of entry for the hosted assistant platform.
//!
//! ARCHITECTURAL RULE: No other module may call the remote assistant API directly.
//! Everything goes through an `AssistantBackend`, so sessions can run against a
//! fake in tests and against Azure in production.

use async_trait::async_trait;
use futures::stream::BoxStream;
use thiserror::Error;

use crate::files::store::StoreError;
use crate::models::analysis::Citation;
use crate::models::file::FileReference;

pub mod azure;
pub mod events;
#[cfg(test)]
pub mod fake;

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{0}")]
    LocalFile(#[from] StoreError),

    #[error("Vector store {id} still processing after {checks} checks")]
    VectorStoreNotReady { id: String, checks: u32 },

    #[error("Run {status}: {message}")]
    RunFailed { status: String, message: String },

    #[error("Stream error: {0}")]
    Stream(String),
}

/// How a remote agent is provisioned.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentConfig {
    pub name: String,
    pub model: String,
    pub instructions: String,
    pub temperature: f32,
    pub seed: u64,
    pub file_search: bool,
}

/// Remote resources backing one provisioned agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentHandle {
    pub id: String,
    pub vector_store_id: Option<String>,
    /// Remote ids of the uploaded files, in upload order.
    pub file_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadHandle {
    pub id: String,
}

/// One piece of a streamed reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    Text(String),
    Citation(Citation),
}

/// Reply fragments in arrival order. Ends when the remote side closes the stream.
pub type FragmentStream = BoxStream<'static, Result<Fragment, AssistantError>>;

/// The remote assistant platform. Carried in `AppState` as `Arc<dyn AssistantBackend>`.
#[async_trait]
pub trait AssistantBackend: Send + Sync {
    /// Provisions an agent whose searchable corpus is exactly `files`.
    async fn create_agent(
        &self,
        config: &AgentConfig,
        files: &[FileReference],
    ) -> Result<AgentHandle, AssistantError>;

    async fn create_thread(&self, agent: &AgentHandle) -> Result<ThreadHandle, AssistantError>;

    /// Posts `message` as a single user turn and streams the agent's reply.
    async fn submit_query(
        &self,
        agent: &AgentHandle,
        thread: &ThreadHandle,
        message: &str,
    ) -> Result<FragmentStream, AssistantError>;

    async fn delete_thread(&self, thread: &ThreadHandle) -> Result<(), AssistantError>;

    /// Removes the agent together with its corpus.
    async fn delete_agent(&self, agent: &AgentHandle) -> Result<(), AssistantError>;
}
