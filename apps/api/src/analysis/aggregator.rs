//! Response Aggregator: drains a fragment stream into one [`AnalysisResult`].

use futures::{Stream, StreamExt};

use crate::assistant_client::{AssistantError, Fragment};
use crate::models::analysis::AnalysisResult;

/// Concatenates text fragments and collects citations, both in arrival order.
///
/// The first error ends aggregation and is returned as-is; text gathered
/// before it is dropped rather than passed off as a complete answer.
pub async fn aggregate<S>(fragments: S) -> Result<AnalysisResult, AssistantError>
where
    S: Stream<Item = Result<Fragment, AssistantError>>,
{
    futures::pin_mut!(fragments);
    let mut result = AnalysisResult::default();

    while let Some(fragment) = fragments.next().await {
        match fragment? {
            Fragment::Text(text) => result.analysis_text.push_str(&text),
            Fragment::Citation(citation) => result.citations.push(citation),
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::analysis::Citation;
    use futures::stream;

    fn text(s: &str) -> Result<Fragment, AssistantError> {
        Ok(Fragment::Text(s.to_string()))
    }

    fn cite(file: &str, quote: &str) -> Result<Fragment, AssistantError> {
        Ok(Fragment::Citation(Citation {
            source_file_id: file.to_string(),
            quoted_text: quote.to_string(),
        }))
    }

    #[tokio::test]
    async fn test_interleaved_fragments() {
        let fragments = vec![
            text("John "),
            cite("f2", "Go"),
            text("knows "),
            cite("f1", "Kubernetes"),
            cite("f2", "Go"),
            text("Go."),
        ];
        let result = aggregate(stream::iter(fragments)).await.unwrap();

        assert_eq!(result.analysis_text, "John knows Go.");
        let order: Vec<_> = result
            .citations
            .iter()
            .map(|c| (c.source_file_id.as_str(), c.quoted_text.as_str()))
            .collect();
        assert_eq!(order, vec![("f2", "Go"), ("f1", "Kubernetes"), ("f2", "Go")]);
    }

    #[tokio::test]
    async fn test_empty_stream_is_empty_result() {
        let result = aggregate(stream::empty()).await.unwrap();
        assert_eq!(result, AnalysisResult::default());
    }

    #[tokio::test]
    async fn test_mid_stream_failure_is_not_swallowed() {
        let fragments = vec![
            text("partial answer"),
            Err(AssistantError::Stream("connection reset".to_string())),
            text("never seen"),
        ];
        let err = aggregate(stream::iter(fragments)).await.unwrap_err();
        assert_eq!(err.to_string(), "Stream error: connection reset");
    }
}
