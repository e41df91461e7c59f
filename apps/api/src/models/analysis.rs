use serde::{Deserialize, Serialize};

/// A citation marker emitted by the assistant while it answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    /// Remote identifier of the source file the excerpt came from.
    #[serde(rename = "file")]
    pub source_file_id: String,
    #[serde(rename = "quote")]
    pub quoted_text: String,
}

/// Consolidated answer for one analysis request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(rename = "analysis")]
    pub analysis_text: String,
    /// Arrival order, duplicates kept.
    pub citations: Vec<Citation>,
}
