//! In-memory `AssistantBackend` that records every call and replays a scripted reply.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use futures::{stream, StreamExt};

use crate::assistant_client::{
    AgentConfig, AgentHandle, AssistantBackend, AssistantError, Fragment, FragmentStream,
    ThreadHandle,
};
use crate::models::analysis::Citation;
use crate::models::file::FileReference;

#[derive(Debug, Clone)]
pub enum Step {
    Text(&'static str),
    Cite(&'static str, &'static str),
    Fail(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateAgent {
        config: AgentConfig,
        files: Vec<FileReference>,
    },
    CreateThread {
        agent_id: String,
    },
    SubmitQuery {
        agent_id: String,
        thread_id: String,
        message: String,
    },
    DeleteThread(String),
    DeleteAgent(String),
}

#[derive(Default)]
pub struct FakeBackend {
    script: Vec<Step>,
    fail_create_agent: Option<&'static str>,
    fail_delete: bool,
    calls: Mutex<Vec<Call>>,
    next_id: AtomicUsize,
}

impl FakeBackend {
    pub fn replying(script: Vec<Step>) -> Self {
        Self {
            script,
            ..Default::default()
        }
    }

    pub fn failing_provisioning(message: &'static str) -> Self {
        Self {
            fail_create_agent: Some(message),
            ..Default::default()
        }
    }

    pub fn with_failing_teardown(mut self) -> Self {
        self.fail_delete = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn mint(&self, prefix: &str) -> String {
        format!("{prefix}_{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
    }

    fn teardown_result(&self) -> Result<(), AssistantError> {
        if self.fail_delete {
            return Err(AssistantError::Api {
                status: 404,
                message: "No assistant found".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl AssistantBackend for FakeBackend {
    async fn create_agent(
        &self,
        config: &AgentConfig,
        files: &[FileReference],
    ) -> Result<AgentHandle, AssistantError> {
        self.record(Call::CreateAgent {
            config: config.clone(),
            files: files.to_vec(),
        });
        if let Some(message) = self.fail_create_agent {
            return Err(AssistantError::Api {
                status: 401,
                message: message.to_string(),
            });
        }
        Ok(AgentHandle {
            id: self.mint("asst"),
            vector_store_id: (!files.is_empty()).then(|| self.mint("vs")),
            file_ids: files.iter().map(|_| self.mint("file")).collect(),
        })
    }

    async fn create_thread(&self, agent: &AgentHandle) -> Result<ThreadHandle, AssistantError> {
        self.record(Call::CreateThread {
            agent_id: agent.id.clone(),
        });
        Ok(ThreadHandle {
            id: self.mint("thread"),
        })
    }

    async fn submit_query(
        &self,
        agent: &AgentHandle,
        thread: &ThreadHandle,
        message: &str,
    ) -> Result<FragmentStream, AssistantError> {
        self.record(Call::SubmitQuery {
            agent_id: agent.id.clone(),
            thread_id: thread.id.clone(),
            message: message.to_string(),
        });

        let items: Vec<Result<Fragment, AssistantError>> = self
            .script
            .iter()
            .map(|step| match step {
                Step::Text(text) => Ok(Fragment::Text(text.to_string())),
                Step::Cite(file, quote) => Ok(Fragment::Citation(Citation {
                    source_file_id: file.to_string(),
                    quoted_text: quote.to_string(),
                })),
                Step::Fail(message) => Err(AssistantError::Stream(message.to_string())),
            })
            .collect();
        Ok(stream::iter(items).boxed())
    }

    async fn delete_thread(&self, thread: &ThreadHandle) -> Result<(), AssistantError> {
        self.record(Call::DeleteThread(thread.id.clone()));
        self.teardown_result()
    }

    async fn delete_agent(&self, agent: &AgentHandle) -> Result<(), AssistantError> {
        self.record(Call::DeleteAgent(agent.id.clone()));
        self.teardown_result()
    }
}
