//! Demo resumes written into the resume directory when `SEED_SAMPLE_RESUMES` is set.

use tracing::info;

use crate::files::store::{FileStore, StoreError};
use crate::models::file::FileCategory;

pub const SAMPLE_RESUMES: [(&str, &str); 2] = [
    (
        "john_doe.txt",
        "John Doe
Senior Software Engineer

Experience:
- Lead Developer at TechCorp (2019-Present)
  * Led team of 5 developers on cloud migration project
  * Implemented MLOps pipeline reducing deployment time by 60%
  * Mentored junior developers and conducted code reviews

Skills:
- Programming: Python, Java, Go
- Cloud & DevOps: Kubernetes, Docker, AWS
- Machine Learning: TensorFlow, PyTorch, MLOps
",
    ),
    (
        "jane_smith.txt",
        "Jane Smith
AI Research Engineer

Experience:
- AI Research Lead at DataMinds (2020-Present)
  * Published 3 papers on NLP architectures
  * Developed novel attention mechanism improving accuracy by 25%
  * Led research team of 3 PhD candidates

Skills:
- Deep Learning: PyTorch, TensorFlow
- NLP: Transformers, BERT, GPT
- Research: Paper Writing, Experimentation
",
    ),
];

/// Writes the sample resumes under their plain names, replacing earlier copies.
pub async fn seed_sample_resumes(store: &FileStore) -> Result<usize, StoreError> {
    for (name, content) in SAMPLE_RESUMES {
        let path = store.path_of(FileCategory::Resume, name);
        tokio::fs::write(&path, content).await?;
    }
    info!("Seeded {} sample resumes", SAMPLE_RESUMES.len());
    Ok(SAMPLE_RESUMES.len())
}
