use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use super::domain::{ApplicantId, ApplicantRecord};
use super::repository::{ApplicantRepository, QuestionRepository, RepositoryError};
use crate::question::{QuestionDefinition, QuestionId};

/// Process-local applicant store.
#[derive(Debug, Default, Clone)]
pub struct InMemoryApplicantRepository {
    records: Arc<Mutex<HashMap<ApplicantId, ApplicantRecord>>>,
}

impl ApplicantRepository for InMemoryApplicantRepository {
    fn insert(&self, record: ApplicantRecord) -> Result<ApplicantRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: ApplicantRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        match guard.get_mut(&record.id) {
            Some(existing) if existing.version != record.version => Err(RepositoryError::Conflict),
            Some(existing) => {
                *existing = ApplicantRecord {
                    version: record.version + 1,
                    ..record
                };
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, id: &ApplicantId) -> Result<Option<ApplicantRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

/// Process-local question catalog, ordered by id.
#[derive(Debug, Default, Clone)]
pub struct InMemoryQuestionRepository {
    definitions: Arc<Mutex<BTreeMap<QuestionId, QuestionDefinition>>>,
}

impl InMemoryQuestionRepository {
    pub fn with_definitions(
        definitions: impl IntoIterator<Item = QuestionDefinition>,
    ) -> Result<Self, RepositoryError> {
        let repository = Self::default();
        for definition in definitions {
            repository.insert(definition)?;
        }
        Ok(repository)
    }
}

impl QuestionRepository for InMemoryQuestionRepository {
    fn insert(&self, definition: QuestionDefinition) -> Result<(), RepositoryError> {
        let mut guard = self.definitions.lock().expect("question mutex poisoned");
        if guard.contains_key(&definition.id()) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(definition.id(), definition);
        Ok(())
    }

    fn fetch(&self, id: QuestionId) -> Result<Option<QuestionDefinition>, RepositoryError> {
        let guard = self.definitions.lock().expect("question mutex poisoned");
        Ok(guard.get(&id).cloned())
    }

    fn list(&self) -> Result<Vec<QuestionDefinition>, RepositoryError> {
        let guard = self.definitions.lock().expect("question mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}
