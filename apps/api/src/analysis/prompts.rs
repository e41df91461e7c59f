// Persona and query fragments for the resume analyzer agent.

pub const ANALYZER_NAME: &str = "HR_Resume_Analyzer";

pub const ANALYZER_INSTRUCTIONS: &str = "\
    You are an expert HR assistant specialized in analyzing resumes and providing \
    detailed candidate evaluations. Always analyze the resumes thoroughly and \
    provide specific evidence for your conclusions. When job descriptions are \
    available, ground every comparison in their stated requirements.";

/// Prepended to the user's query whenever job descriptions are selected.
pub const COMPARISON_CLAUSE: &str = "\
    Compare the provided resumes against the provided job descriptions. \
    For each candidate, assess how well they match the job requirements, \
    citing the relevant resume and job description passages. ";

/// Sampling is pinned so the same question over the same files answers the same way.
pub const ANALYZER_TEMPERATURE: f32 = 0.0;
pub const ANALYZER_SEED: u64 = 42;

/// The user turn actually sent to the agent.
pub fn build_query(query_text: &str, has_jobs: bool) -> String {
    if has_jobs {
        format!("{COMPARISON_CLAUSE}{query_text}")
    } else {
        query_text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_unchanged_without_jobs() {
        assert_eq!(build_query("Who knows Go?", false), "Who knows Go?");
    }

    #[test]
    fn test_comparison_clause_prepended_with_jobs() {
        let query = build_query("Who fits best?", true);
        assert!(query.starts_with(COMPARISON_CLAUSE));
        assert!(query.ends_with("Who fits best?"));
        assert_eq!(query.len(), COMPARISON_CLAUSE.len() + "Who fits best?".len());
    }
}
