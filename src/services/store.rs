//! Insertion-ordered record storage.

use chrono::{SecondsFormat, Utc};
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::services::ServiceError;

/// A record type a CRUD service manages.
pub trait Resource: Clone + Serialize + Send + Sync + 'static {
    /// Body of a create request.
    type Create: DeserializeOwned + Default + Send;
    /// Body of an update request.
    type Update: DeserializeOwned + Default + Send;

    /// Error message for an unknown id.
    const NOT_FOUND: &'static str;

    fn id(&self) -> &str;

    /// Validate a create payload against the current records and build the record.
    fn create(payload: Self::Create, existing: &[Self]) -> Result<Self, ServiceError>;

    /// Validate an update payload, then apply it. Nothing changes on error.
    fn apply_update(&mut self, payload: Self::Update) -> Result<(), ServiceError>;
}

/// Fresh record id (UUID v4).
pub fn new_record_id() -> String {
    Uuid::new_v4().to_string()
}

/// Creation timestamp, RFC 3339 UTC with milliseconds.
pub fn created_at() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// In-memory collection of `R`, shared by a service's handlers.
#[derive(Debug)]
pub struct RecordStore<R> {
    records: RwLock<Vec<R>>,
}

impl<R: Resource> RecordStore<R> {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    pub async fn list(&self) -> Vec<R> {
        self.records.read().await.clone()
    }

    pub async fn get(&self, id: &str) -> Result<R, ServiceError> {
        self.records
            .read()
            .await
            .iter()
            .find(|r| r.id() == id)
            .cloned()
            .ok_or(ServiceError::NotFound(R::NOT_FOUND))
    }

    pub async fn create(&self, payload: R::Create) -> Result<R, ServiceError> {
        let mut records = self.records.write().await;
        let record = R::create(payload, &records)?;
        records.push(record.clone());
        Ok(record)
    }

    pub async fn update(&self, id: &str, payload: R::Update) -> Result<R, ServiceError> {
        let mut records = self.records.write().await;
        let record = records
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or(ServiceError::NotFound(R::NOT_FOUND))?;
        record.apply_update(payload)?;
        Ok(record.clone())
    }

    pub async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        let mut records = self.records.write().await;
        let index = records
            .iter()
            .position(|r| r.id() == id)
            .ok_or(ServiceError::NotFound(R::NOT_FOUND))?;
        records.remove(index);
        Ok(())
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl<R: Resource> Default for RecordStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, Serialize)]
    struct Note {
        id: String,
        text: String,
    }

    #[derive(Debug, Default, Deserialize)]
    struct NoteBody {
        text: Option<String>,
    }

    impl Resource for Note {
        type Create = NoteBody;
        type Update = NoteBody;
        const NOT_FOUND: &'static str = "Note not found";

        fn id(&self) -> &str {
            &self.id
        }

        fn create(payload: NoteBody, _existing: &[Self]) -> Result<Self, ServiceError> {
            let text = payload
                .text
                .ok_or_else(|| ServiceError::BadRequest("Text is required".into()))?;
            Ok(Note { id: new_record_id(), text })
        }

        fn apply_update(&mut self, payload: NoteBody) -> Result<(), ServiceError> {
            if let Some(text) = payload.text {
                self.text = text;
            }
            Ok(())
        }
    }

    fn body(text: &str) -> NoteBody {
        NoteBody {
            text: Some(text.to_string()),
        }
    }

    #[tokio::test]
    async fn crud_cycle_keeps_insertion_order() {
        let store = RecordStore::<Note>::new();
        assert!(store.is_empty().await);

        let first = store.create(body("a")).await.unwrap();
        let second = store.create(body("b")).await.unwrap();
        assert_ne!(first.id, second.id);

        let texts: Vec<_> = store.list().await.into_iter().map(|n| n.text).collect();
        assert_eq!(texts, ["a", "b"]);

        let updated = store.update(&first.id, body("c")).await.unwrap();
        assert_eq!(updated.text, "c");
        assert_eq!(store.get(&first.id).await.unwrap().text, "c");

        store.delete(&first.id).await.unwrap();
        assert_eq!(store.len().await, 1);
        assert_eq!(
            store.get(&first.id).await.unwrap_err(),
            ServiceError::NotFound("Note not found")
        );
    }

    #[tokio::test]
    async fn rejected_create_stores_nothing() {
        let store = RecordStore::<Note>::new();
        assert!(store.create(NoteBody::default()).await.is_err());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        let store = RecordStore::<Note>::new();
        assert!(matches!(store.update("x", body("a")).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(store.delete("x").await, Err(ServiceError::NotFound(_))));
    }

    #[test]
    fn timestamps_are_rfc3339_utc() {
        let ts = created_at();
        assert!(ts.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok());
    }
}
