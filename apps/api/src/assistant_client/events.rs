//! Decoding of the Assistants run stream (server-sent events) into [`Fragment`]s.
//!
//! Only `thread.message.delta` carries content. Terminal failure events turn
//! into errors; every other event (run/step lifecycle, `done`) is ignored.

use serde::Deserialize;

use crate::assistant_client::{AssistantError, Fragment};
use crate::models::analysis::Citation;

pub const MESSAGE_DELTA: &str = "thread.message.delta";
pub const ERROR: &str = "error";

const RUN_FAILURES: [&str; 4] = [
    "thread.run.failed",
    "thread.run.cancelled",
    "thread.run.expired",
    "thread.run.incomplete",
];

#[derive(Debug, Deserialize)]
struct MessageDelta {
    delta: DeltaBody,
}

#[derive(Debug, Deserialize)]
struct DeltaBody {
    #[serde(default)]
    content: Vec<DeltaContent>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum DeltaContent {
    Text { text: TextDelta },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct TextDelta {
    #[serde(default)]
    value: Option<String>,
    #[serde(default)]
    annotations: Vec<Annotation>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Annotation {
    FileCitation {
        #[serde(default)]
        text: String,
        file_citation: FileCitationRef,
    },
    FilePath {
        #[serde(default)]
        text: String,
        file_path: FilePathRef,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct FileCitationRef {
    file_id: String,
    #[serde(default)]
    quote: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FilePathRef {
    file_id: String,
}

#[derive(Debug, Deserialize)]
struct RunEvent {
    status: String,
    #[serde(default)]
    last_error: Option<RunError>,
    #[serde(default)]
    incomplete_details: Option<IncompleteDetails>,
}

#[derive(Debug, Deserialize)]
struct RunError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct IncompleteDetails {
    reason: String,
}

/// Turns one SSE event into zero or more fragments.
///
/// Within a delta part the narrative text comes first, then one citation per
/// annotation in the order the platform listed them.
pub fn fragments_from_event(event: &str, data: &str) -> Result<Vec<Fragment>, AssistantError> {
    if event == MESSAGE_DELTA {
        let delta: MessageDelta = serde_json::from_str(data)?;
        return Ok(fragments_from_delta(delta));
    }

    if RUN_FAILURES.contains(&event) {
        return Err(run_failure(event, data));
    }

    if event == ERROR {
        return Err(AssistantError::Stream(error_message(data)));
    }

    Ok(Vec::new())
}

fn fragments_from_delta(delta: MessageDelta) -> Vec<Fragment> {
    let mut fragments = Vec::new();

    for part in delta.delta.content {
        let DeltaContent::Text { text } = part else {
            continue;
        };

        if let Some(value) = text.value.filter(|v| !v.is_empty()) {
            fragments.push(Fragment::Text(value));
        }

        for annotation in text.annotations {
            let citation = match annotation {
                Annotation::FileCitation {
                    text,
                    file_citation,
                } => Citation {
                    source_file_id: file_citation.file_id,
                    quoted_text: file_citation.quote.unwrap_or(text),
                },
                Annotation::FilePath { text, file_path } => Citation {
                    source_file_id: file_path.file_id,
                    quoted_text: text,
                },
                Annotation::Other => continue,
            };
            fragments.push(Fragment::Citation(citation));
        }
    }

    fragments
}

fn run_failure(event: &str, data: &str) -> AssistantError {
    let fallback_status = event.trim_start_matches("thread.run.").to_string();

    match serde_json::from_str::<RunEvent>(data) {
        Ok(run) => {
            let message = run
                .last_error
                .map(|e| e.message)
                .or(run.incomplete_details.map(|d| d.reason))
                .unwrap_or_else(|| "no details provided".to_string());
            AssistantError::RunFailed {
                status: run.status,
                message,
            }
        }
        Err(_) => AssistantError::RunFailed {
            status: fallback_status,
            message: data.to_string(),
        },
    }
}

fn error_message(data: &str) -> String {
    serde_json::from_str::<serde_json::Value>(data)
        .ok()
        .and_then(|v| {
            v.pointer("/error/message")
                .or_else(|| v.get("message"))
                .and_then(|m| m.as_str())
                .map(String::from)
        })
        .unwrap_or_else(|| data.to_string())
}
