//! Assistant Session Manager: one remote agent and thread per analysis request.
//!
//! Every request provisions a fresh agent whose corpus is exactly the caller's
//! selection, asks one question on a fresh thread, then tears both down.
//! Nothing is pooled or shared between requests.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::analysis::aggregator::aggregate;
use crate::analysis::prompts::{
    build_query, ANALYZER_INSTRUCTIONS, ANALYZER_NAME, ANALYZER_SEED, ANALYZER_TEMPERATURE,
};
use crate::analysis::selection::resolve;
use crate::assistant_client::{
    AgentConfig, AgentHandle, AssistantBackend, AssistantError, ThreadHandle,
};
use crate::files::store::FileStore;
use crate::models::analysis::AnalysisResult;
use crate::models::file::FileReference;

/// Per-request lifecycle. Every request starts at `Uninitialized`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Provisioning,
    Ready,
    Streaming,
    Completed,
    Failed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Uninitialized => "uninitialized",
            SessionState::Provisioning => "provisioning",
            SessionState::Ready => "ready",
            SessionState::Streaming => "streaming",
            SessionState::Completed => "completed",
            SessionState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// A live agent + thread pair. `bound_files` is exactly the selection it was built for.
#[derive(Debug)]
pub struct AssistantSession {
    pub agent: AgentHandle,
    pub thread: ThreadHandle,
    pub bound_files: Vec<FileReference>,
}

struct Lifecycle {
    state: SessionState,
}

impl Lifecycle {
    fn new() -> Self {
        Self {
            state: SessionState::Uninitialized,
        }
    }

    fn advance(&mut self, next: SessionState) {
        debug!("Assistant session {} -> {}", self.state, next);
        self.state = next;
    }
}

pub struct SessionManager {
    backend: Arc<dyn AssistantBackend>,
    store: FileStore,
    model: String,
}

impl SessionManager {
    pub fn new(backend: Arc<dyn AssistantBackend>, store: FileStore, model: String) -> Self {
        Self {
            backend,
            store,
            model,
        }
    }

    pub fn agent_config(&self) -> AgentConfig {
        AgentConfig {
            name: ANALYZER_NAME.to_string(),
            model: self.model.clone(),
            instructions: ANALYZER_INSTRUCTIONS.to_string(),
            temperature: ANALYZER_TEMPERATURE,
            seed: ANALYZER_SEED,
            file_search: true,
        }
    }

    /// Answers `query_text` over the selected resumes and job descriptions.
    ///
    /// An empty selection still goes to the remote agent. Remote resources are
    /// released whether or not the run succeeds; release failures are only logged.
    pub async fn analyze(
        &self,
        query_text: &str,
        resume_names: &[String],
        job_names: &[String],
    ) -> Result<AnalysisResult, AssistantError> {
        let mut lifecycle = Lifecycle::new();

        let files = resolve(&self.store, resume_names, job_names);
        let message = build_query(query_text, !job_names.is_empty());

        lifecycle.advance(SessionState::Provisioning);
        let session = match self.open_session(files).await {
            Ok(session) => session,
            Err(e) => {
                lifecycle.advance(SessionState::Failed);
                return Err(e);
            }
        };
        lifecycle.advance(SessionState::Ready);
        info!(
            "Analyzing with assistant {} over {} file(s) ({} job description(s))",
            session.agent.id,
            session.bound_files.len(),
            job_names.len()
        );

        lifecycle.advance(SessionState::Streaming);
        let outcome = self.ask(&session, &message).await;
        lifecycle.advance(match outcome {
            Ok(_) => SessionState::Completed,
            Err(_) => SessionState::Failed,
        });

        self.close_session(session).await;
        outcome
    }

    async fn open_session(
        &self,
        files: Vec<FileReference>,
    ) -> Result<AssistantSession, AssistantError> {
        let agent = self
            .backend
            .create_agent(&self.agent_config(), &files)
            .await?;

        let thread = match self.backend.create_thread(&agent).await {
            Ok(thread) => thread,
            Err(e) => {
                self.release_agent(&agent).await;
                return Err(e);
            }
        };

        Ok(AssistantSession {
            agent,
            thread,
            bound_files: files,
        })
    }

    async fn ask(
        &self,
        session: &AssistantSession,
        message: &str,
    ) -> Result<AnalysisResult, AssistantError> {
        let fragments = self
            .backend
            .submit_query(&session.agent, &session.thread, message)
            .await?;
        aggregate(fragments).await
    }

    async fn close_session(&self, session: AssistantSession) {
        if let Err(e) = self.backend.delete_thread(&session.thread).await {
            warn!("Failed to delete thread {}: {e}", session.thread.id);
        }
        self.release_agent(&session.agent).await;
    }

    async fn release_agent(&self, agent: &AgentHandle) {
        if let Err(e) = self.backend.delete_agent(agent).await {
            warn!("Failed to delete assistant {}: {e}", agent.id);
        }
    }
}
