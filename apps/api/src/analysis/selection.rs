use crate::files::store::FileStore;
use crate::models::file::{FileCategory, FileReference};

/// Maps the client's selection to file references: resumes first, then jobs,
/// each in the order given. Existence is not checked here; a missing file
/// surfaces when the backend tries to upload it.
pub fn resolve(
    store: &FileStore,
    resume_names: &[String],
    job_names: &[String],
) -> Vec<FileReference> {
    let resumes = resume_names
        .iter()
        .map(|name| (FileCategory::Resume, name));
    let jobs = job_names.iter().map(|name| (FileCategory::Job, name));

    resumes
        .chain(jobs)
        .map(|(category, name)| FileReference {
            category,
            stored_name: name.clone(),
            path: store.path_of(category, name),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_resumes_precede_jobs_in_input_order() {
        let store = FileStore::new("/data/resumes", "/data/jobs");
        let refs = resolve(&store, &names(&["r2.txt", "r1.txt"]), &names(&["j1.txt"]));

        let summary: Vec<_> = refs
            .iter()
            .map(|r| (r.category, r.stored_name.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (FileCategory::Resume, "r2.txt"),
                (FileCategory::Resume, "r1.txt"),
                (FileCategory::Job, "j1.txt"),
            ]
        );
        assert_eq!(refs[0].path, PathBuf::from("/data/resumes/r2.txt"));
        assert_eq!(refs[2].path, PathBuf::from("/data/jobs/j1.txt"));
    }

    #[test]
    fn test_missing_files_and_duplicates_pass_through() {
        let store = FileStore::new("/nowhere/r", "/nowhere/j");
        let refs = resolve(&store, &names(&["a.txt", "a.txt"]), &[]);
        assert_eq!(refs.len(), 2);
        assert!(!refs[0].path.exists());
    }

    #[test]
    fn test_empty_selection() {
        let store = FileStore::new("r", "j");
        assert!(resolve(&store, &[], &[]).is_empty());
    }
}
