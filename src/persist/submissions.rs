//! Log of values submitted through shared forms.

use super::{SharedStorage, StorageError};
use crate::model::{timestamp, Submission};
use crate::state::ids::{self, SUBMISSION_ID_LEN};
use log::*;
use std::collections::BTreeMap;

pub const SUBMISSIONS_KEY: &str = "form-builder-submissions";

/// Append-only list of submissions, stored as one JSON array.
///
#[derive(Clone)]
pub struct SubmissionLog {
    storage: SharedStorage,
}

impl SubmissionLog {
    pub fn new(storage: SharedStorage) -> SubmissionLog {
        SubmissionLog { storage }
    }

    /// Every stored submission. Malformed data is logged and read as empty.
    ///
    pub fn all(&self) -> Vec<Submission> {
        match self.load() {
            Ok(submissions) => submissions,
            Err(e) => {
                error!("Error loading submissions: {}", e);
                vec![]
            }
        }
    }

    /// Submissions for one form, oldest first.
    ///
    pub fn for_form(&self, form_id: &str) -> Vec<Submission> {
        self.all()
            .into_iter()
            .filter(|submission| submission.form_id == form_id)
            .collect()
    }

    /// Store a new submission and return it.
    ///
    pub fn record(
        &self,
        form_id: &str,
        data: BTreeMap<String, serde_json::Value>,
    ) -> Result<Submission, StorageError> {
        let mut submissions = self.load()?;
        let mut rng = rand::thread_rng();
        let id = ids::generate_unique(&mut rng, SUBMISSION_ID_LEN, |id| {
            submissions.iter().any(|submission| submission.id == id)
        });
        let submission = Submission {
            id,
            form_id: form_id.to_string(),
            data,
            submitted_at: timestamp::now_millis(),
        };
        submissions.push(submission.clone());
        let raw = serde_json::to_string(&submissions)
            .map_err(|e| StorageError::SerializationFailed(e.to_string()))?;
        self.storage.set_item(SUBMISSIONS_KEY, &raw)?;
        info!("Recorded submission {} for form {}", submission.id, form_id);
        Ok(submission)
    }

    fn load(&self) -> Result<Vec<Submission>, StorageError> {
        match self.storage.get_item(SUBMISSIONS_KEY)? {
            Some(raw) => serde_json::from_str(&raw)
                .map_err(|e| StorageError::DeserializationFailed(e.to_string())),
            None => Ok(vec![]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::{MemoryStorage, Storage};
    use serde_json::json;
    use std::sync::Arc;

    fn data(pairs: &[(&str, serde_json::Value)]) -> BTreeMap<String, serde_json::Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn records_and_filters_by_form() {
        let log = SubmissionLog::new(Arc::new(MemoryStorage::new()));
        let first = log.record("form-a", data(&[("f1", json!("Ada"))])).unwrap();
        log.record("form-b", data(&[("f1", json!("Grace"))])).unwrap();
        log.record("form-a", data(&[("f1", json!("Linus"))])).unwrap();

        let for_a = log.for_form("form-a");
        assert_eq!(for_a.len(), 2);
        assert_eq!(for_a[0], first);
        assert_eq!(for_a[1].data["f1"], json!("Linus"));
        assert_eq!(log.for_form("form-b").len(), 1);
        assert!(log.for_form("form-c").is_empty());
        assert_eq!(log.all().len(), 3);
    }

    #[test]
    fn submission_ids_are_unique() {
        let log = SubmissionLog::new(Arc::new(MemoryStorage::new()));
        let a = log.record("form-a", BTreeMap::new()).unwrap();
        let b = log.record("form-a", BTreeMap::new()).unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(a.id.len(), SUBMISSION_ID_LEN);
    }

    #[test]
    fn malformed_log_reads_as_empty() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set_item(SUBMISSIONS_KEY, "not json").unwrap();
        let log = SubmissionLog::new(storage);
        assert!(log.all().is_empty());
        assert!(log.record("form-a", BTreeMap::new()).is_err());
    }

    #[test]
    fn accepts_iso_submission_dates() {
        let storage = Arc::new(MemoryStorage::new());
        storage
            .set_item(
                SUBMISSIONS_KEY,
                r#"[{"id":"s1","formId":"form-a","data":{"f1":true},"submittedAt":"2024-01-01T00:00:00Z"}]"#,
            )
            .unwrap();
        let log = SubmissionLog::new(storage);
        let submissions = log.for_form("form-a");
        assert_eq!(submissions.len(), 1);
        assert_eq!(submissions[0].data["f1"], json!(true));
    }
}
