//! Azure OpenAI Assistants (v2) backend.
//!
//! Provisioning an agent means: upload every selected file, gather them into a
//! vector store, then create an assistant with file search over that store.
//! Nothing is retried; the first failing call ends the operation.

use std::time::Duration;

use async_trait::async_trait;
use eventsource_stream::Eventsource;
use futures::{stream, StreamExt};
use reqwest::{multipart, Client, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info, warn};

use crate::assistant_client::events::fragments_from_event;
use crate::assistant_client::{
    AgentConfig, AgentHandle, AssistantBackend, AssistantError, FragmentStream, ThreadHandle,
};
use crate::config::AzureConfig;
use crate::files::store::FileStore;
use crate::models::file::FileReference;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
const VECTOR_STORE_POLL_INTERVAL: Duration = Duration::from_millis(500);
const VECTOR_STORE_MAX_CHECKS: u32 = 120;

#[derive(Debug, Serialize)]
struct VectorStoreRequest<'a> {
    name: &'a str,
    file_ids: &'a [String],
}

#[derive(Debug, Serialize)]
struct AssistantRequest<'a> {
    model: &'a str,
    name: &'a str,
    instructions: &'a str,
    tools: Vec<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_resources: Option<serde_json::Value>,
    temperature: f32,
    metadata: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct MessageRequest<'a> {
    role: &'a str,
    content: &'a str,
}

/// Sampling settings are not repeated here; the run inherits them from the assistant.
#[derive(Debug, Serialize)]
struct RunRequest<'a> {
    assistant_id: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct Created {
    id: String,
}

#[derive(Debug, Deserialize)]
struct VectorStore {
    id: String,
    status: String,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

#[derive(Clone)]
pub struct AzureAssistantClient {
    client: Client,
    config: AzureConfig,
    /// Source of the bytes uploaded for each selected file.
    store: FileStore,
}

impl AzureAssistantClient {
    pub fn new(config: AzureConfig, store: FileStore) -> Result<Self, AssistantError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            config,
            store,
        })
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/openai/{}?api-version={}",
            self.config.endpoint, path, self.config.api_version
        )
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, AssistantError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.url(path))
            .header("api-key", &self.config.api_key)
            .json(body)
            .send()
            .await?;
        Ok(check_status(response).await?.json().await?)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, AssistantError> {
        let response = self
            .client
            .get(self.url(path))
            .header("api-key", &self.config.api_key)
            .send()
            .await?;
        Ok(check_status(response).await?.json().await?)
    }

    async fn delete(&self, path: &str) -> Result<(), AssistantError> {
        let response = self
            .client
            .delete(self.url(path))
            .header("api-key", &self.config.api_key)
            .send()
            .await?;
        check_status(response).await?;
        debug!("Deleted remote resource {path}");
        Ok(())
    }

    async fn upload_file(&self, file: &FileReference) -> Result<String, AssistantError> {
        debug!("Uploading {} from {}", file.stored_name, file.path.display());
        let bytes = self.store.read(file.category, &file.stored_name).await?;

        let form = multipart::Form::new().text("purpose", "assistants").part(
            "file",
            multipart::Part::bytes(bytes).file_name(file.stored_name.clone()),
        );

        let response = self
            .client
            .post(self.url("files"))
            .header("api-key", &self.config.api_key)
            .multipart(form)
            .send()
            .await?;
        let created: Created = check_status(response).await?.json().await?;

        debug!("Uploaded {} as {}", file.stored_name, created.id);
        Ok(created.id)
    }

    /// Polls until file ingestion is no longer `in_progress`.
    async fn wait_for_vector_store(&self, mut store: VectorStore) -> Result<(), AssistantError> {
        let mut checks = 0;
        while store.status == "in_progress" {
            if checks >= VECTOR_STORE_MAX_CHECKS {
                return Err(AssistantError::VectorStoreNotReady {
                    id: store.id,
                    checks,
                });
            }
            tokio::time::sleep(VECTOR_STORE_POLL_INTERVAL).await;
            store = self.get_json(&format!("vector_stores/{}", store.id)).await?;
            checks += 1;
        }

        if store.status != "completed" {
            warn!("Vector store {} finished with status '{}'", store.id, store.status);
        }
        Ok(())
    }

    async fn create_assistant(
        &self,
        config: &AgentConfig,
        vector_store_id: Option<&str>,
    ) -> Result<String, AssistantError> {
        let tools = if config.file_search {
            vec![json!({ "type": "file_search" })]
        } else {
            Vec::new()
        };
        let tool_resources = vector_store_id
            .filter(|_| config.file_search)
            .map(|id| json!({ "file_search": { "vector_store_ids": [id] } }));

        let created: Created = self
            .post_json(
                "assistants",
                &AssistantRequest {
                    model: &config.model,
                    name: &config.name,
                    instructions: &config.instructions,
                    tools,
                    tool_resources,
                    temperature: config.temperature,
                    metadata: json!({ "seed": config.seed.to_string() }),
                },
            )
            .await?;
        Ok(created.id)
    }

    async fn provision(
        &self,
        config: &AgentConfig,
        files: &[FileReference],
        handle: &mut AgentHandle,
    ) -> Result<(), AssistantError> {
        for file in files {
            let file_id = self.upload_file(file).await?;
            handle.file_ids.push(file_id);
        }

        if !handle.file_ids.is_empty() {
            let name = format!("{}_files", config.name);
            let store: VectorStore = self
                .post_json(
                    "vector_stores",
                    &VectorStoreRequest {
                        name: &name,
                        file_ids: &handle.file_ids,
                    },
                )
                .await?;
            handle.vector_store_id = Some(store.id.clone());
            self.wait_for_vector_store(store).await?;
        }

        handle.id = self
            .create_assistant(config, handle.vector_store_id.as_deref())
            .await?;
        Ok(())
    }

    /// Removes the corpus of an agent; the assistant itself is deleted only if it exists.
    async fn release(&self, agent: &AgentHandle) -> Result<(), AssistantError> {
        let mut first_error = None;
        let mut paths = Vec::new();
        if !agent.id.is_empty() {
            paths.push(format!("assistants/{}", agent.id));
        }
        if let Some(store_id) = &agent.vector_store_id {
            paths.push(format!("vector_stores/{store_id}"));
        }
        paths.extend(agent.file_ids.iter().map(|id| format!("files/{id}")));

        for path in paths {
            if let Err(e) = self.delete(&path).await {
                warn!("Failed to delete {path}: {e}");
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl AssistantBackend for AzureAssistantClient {
    async fn create_agent(
        &self,
        config: &AgentConfig,
        files: &[FileReference],
    ) -> Result<AgentHandle, AssistantError> {
        let mut handle = AgentHandle {
            id: String::new(),
            vector_store_id: None,
            file_ids: Vec::with_capacity(files.len()),
        };

        if let Err(e) = self.provision(config, files, &mut handle).await {
            // Nothing references the partial resources yet
            if let Err(rollback) = self.release(&handle).await {
                warn!("Rollback of partial assistant incomplete: {rollback}");
            }
            return Err(e);
        }

        info!(
            "Provisioned assistant {} over {} file(s)",
            handle.id,
            handle.file_ids.len()
        );
        Ok(handle)
    }

    async fn create_thread(&self, _agent: &AgentHandle) -> Result<ThreadHandle, AssistantError> {
        let created: Created = self.post_json("threads", &json!({})).await?;
        Ok(ThreadHandle { id: created.id })
    }

    async fn submit_query(
        &self,
        agent: &AgentHandle,
        thread: &ThreadHandle,
        message: &str,
    ) -> Result<FragmentStream, AssistantError> {
        let _: Created = self
            .post_json(
                &format!("threads/{}/messages", thread.id),
                &MessageRequest {
                    role: "user",
                    content: message,
                },
            )
            .await?;

        let response = self
            .client
            .post(self.url(&format!("threads/{}/runs", thread.id)))
            .header("api-key", &self.config.api_key)
            .json(&RunRequest {
                assistant_id: &agent.id,
                stream: true,
            })
            .send()
            .await?;
        let response = check_status(response).await?;

        let fragments = response
            .bytes_stream()
            .eventsource()
            .flat_map(|event| {
                let batch = match event {
                    Ok(event) => match fragments_from_event(&event.event, &event.data) {
                        Ok(fragments) => fragments.into_iter().map(Ok).collect(),
                        Err(e) => vec![Err(e)],
                    },
                    Err(e) => vec![Err(AssistantError::Stream(e.to_string()))],
                };
                stream::iter(batch)
            });

        Ok(fragments.boxed())
    }

    async fn delete_thread(&self, thread: &ThreadHandle) -> Result<(), AssistantError> {
        self.delete(&format!("threads/{}", thread.id)).await
    }

    async fn delete_agent(&self, agent: &AgentHandle) -> Result<(), AssistantError> {
        self.release(agent).await
    }
}

/// Turns a non-2xx response into `AssistantError::Api`, preferring the platform's message.
async fn check_status(response: Response) -> Result<Response, AssistantError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    warn!("Assistant API returned {}: {}", status, body);
    Err(AssistantError::Api {
        status: status.as_u16(),
        message: parse_error_message(&body),
    })
}

fn parse_error_message(body: &str) -> String {
    serde_json::from_str::<ApiError>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string())
}
