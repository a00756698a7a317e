use async_trait::async_trait;
use citypulse_core::{Entity, FailurePolicy, ItemOutcome};
use uuid::Uuid;

use super::{EnrichError, Enrichment};
use crate::ner::{EntityRecognizer, RecognizerError};
use crate::retry::RetryPolicy;
use crate::store::{Store, StoreError};

/// Geopolitical entities: countries, cities, states.
pub const DEFAULT_ENTITY_LABELS: &[&str] = &["GPE"];

/// Named-entity extraction over stored comment bodies.
///
/// A comment leaves the frontier once any run of the same model has scanned
/// it, including scans that found no entity.
pub struct EntityExtraction<R> {
    recognizer: R,
    model: String,
    description: Option<String>,
    labels: Vec<String>,
}

impl<R: EntityRecognizer> EntityExtraction<R> {
    pub fn new(recognizer: R, model: impl Into<String>) -> Self {
        Self {
            recognizer,
            model: model.into(),
            description: None,
            labels: DEFAULT_ENTITY_LABELS.iter().map(|l| l.to_string()).collect(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Entity labels kept; an empty list keeps every label.
    pub fn with_labels(mut self, labels: Vec<String>) -> Self {
        self.labels = labels;
        self
    }

    fn keeps(&self, entity: &Entity) -> bool {
        self.labels.is_empty() || self.labels.iter().any(|label| *label == entity.label)
    }
}

#[async_trait(?Send)]
impl<R: EntityRecognizer> Enrichment for EntityExtraction<R> {
    type Item = String;
    type Output = Vec<Entity>;
    type Error = RecognizerError;

    fn label(&self) -> &'static str {
        "entities"
    }

    fn failure_policy(&self) -> FailurePolicy {
        FailurePolicy::Abort
    }

    async fn begin_run(
        &mut self,
        store: &Store,
        retry: &RetryPolicy,
    ) -> Result<Option<Uuid>, StoreError> {
        let model = self.model.as_str();
        let description = self.description.as_deref();
        let run = retry
            .run("create ner run", || async move {
                store.create_ner_run(model, description)
            })
            .await?;
        Ok(Some(run))
    }

    fn frontier(&self, store: &Store) -> Result<Vec<String>, StoreError> {
        store.unscanned_comment_ids(&self.model)
    }

    fn load(&self, store: &Store, key: &str) -> Result<Option<String>, StoreError> {
        store.comment_body(key)
    }

    async fn compute(&mut self, body: &String) -> ItemOutcome<Vec<Entity>, RecognizerError> {
        match self.recognizer.annotate(body).await {
            Ok(entities) => {
                ItemOutcome::Ok(entities.into_iter().filter(|e| self.keeps(e)).collect())
            }
            Err(err) => ItemOutcome::Failed(err),
        }
    }

    async fn write(
        &self,
        store: &Store,
        retry: &RetryPolicy,
        run: Option<&Uuid>,
        key: &str,
        entities: Vec<Entity>,
    ) -> Result<u64, EnrichError> {
        let run = run.ok_or(EnrichError::MissingRun { task: self.label() })?;
        for entity in &entities {
            retry
                .run("insert entity", || async move {
                    store.insert_entity(run, key, entity)
                })
                .await?;
        }
        retry
            .run("mark comment scanned", || async move { store.mark_scanned(run, key) })
            .await?;
        Ok(entities.len() as u64)
    }
}
