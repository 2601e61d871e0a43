// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Idea repository.
//!
//! Each idea is stored as a separate JSON file under `ideas/`. The stored
//! shape is also the API shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::super::{DocumentStore, OwnedResource, StorageError, StorageResult};

/// An idea owned by a single account.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Idea {
    /// Unique idea identifier (UUID)
    pub id: String,
    /// Owner account ID. Set at creation and never changed.
    #[serde(rename = "user")]
    pub owner_id: String,
    pub title: String,
    pub summary: String,
    pub description: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Idea {
    /// Build a new idea for `owner_id`. Title and summary are trimmed.
    pub fn new(
        owner_id: impl Into<String>,
        title: &str,
        summary: &str,
        description: impl Into<String>,
        tags: Vec<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id: owner_id.into(),
            title: title.trim().to_string(),
            summary: summary.trim().to_string(),
            description: description.into(),
            tags,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the editable fields and bump `updated_at`. The owner is kept.
    pub fn apply_edit(
        &mut self,
        title: &str,
        summary: &str,
        description: String,
        tags: Vec<String>,
    ) {
        self.title = title.trim().to_string();
        self.summary = summary.trim().to_string();
        self.description = description;
        self.tags = tags;
        self.updated_at = Utc::now();
    }
}

impl OwnedResource for Idea {
    fn owner_user_id(&self) -> &str {
        &self.owner_id
    }

    fn resource_name(&self) -> String {
        format!("idea {}", self.id)
    }
}

/// Repository for idea operations.
pub struct IdeaRepository<'a> {
    storage: &'a DocumentStore,
}

impl<'a> IdeaRepository<'a> {
    /// Create a new IdeaRepository.
    pub fn new(storage: &'a DocumentStore) -> Self {
        Self { storage }
    }

    /// Check if an idea exists.
    pub fn exists(&self, idea_id: &str) -> bool {
        self.storage.exists(self.storage.paths().idea(idea_id))
    }

    /// Get an idea by ID.
    pub fn get(&self, idea_id: &str) -> StorageResult<Idea> {
        if uuid::Uuid::parse_str(idea_id).is_err() || !self.exists(idea_id) {
            return Err(StorageError::NotFound(format!("Idea {idea_id}")));
        }
        self.storage.read_json(self.storage.paths().idea(idea_id))
    }

    /// Create a new idea.
    pub fn create(&self, idea: &Idea) -> StorageResult<()> {
        self.storage
            .write_json_new(self.storage.paths().idea(&idea.id), idea)
            .map_err(|e| match e {
                StorageError::AlreadyExists(_) => {
                    StorageError::AlreadyExists(format!("Idea {}", idea.id))
                }
                other => other,
            })
    }

    /// Update an existing idea. An idea deleted in the meantime stays deleted.
    pub fn update(&self, idea: &Idea) -> StorageResult<()> {
        self.storage
            .replace_json(self.storage.paths().idea(&idea.id), idea)
            .map_err(|e| not_found_as_idea(e, &idea.id))
    }

    /// Delete an idea.
    pub fn delete(&self, idea_id: &str) -> StorageResult<()> {
        self.storage
            .delete(self.storage.paths().idea(idea_id))
            .map_err(|e| not_found_as_idea(e, idea_id))
    }

    /// List ideas newest first, optionally capped at `limit` entries.
    ///
    /// Unreadable documents are skipped with a warning.
    pub fn list_recent(&self, limit: Option<usize>) -> StorageResult<Vec<Idea>> {
        let idea_ids = self
            .storage
            .list_files(self.storage.paths().ideas_dir(), "json")?;

        let mut ideas = Vec::with_capacity(idea_ids.len());
        for id in idea_ids {
            match self.storage.read_json::<Idea>(self.storage.paths().idea(&id)) {
                Ok(idea) => ideas.push(idea),
                Err(e) => tracing::warn!(idea_id = %id, error = %e, "Skipping unreadable idea"),
            }
        }

        ideas.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        if let Some(limit) = limit {
            ideas.truncate(limit);
        }

        Ok(ideas)
    }
}

fn not_found_as_idea(e: StorageError, idea_id: &str) -> StorageError {
    match e {
        StorageError::NotFound(_) => StorageError::NotFound(format!("Idea {idea_id}")),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StoragePaths;
    use chrono::Duration;
    use tempfile::TempDir;

    fn test_storage() -> (DocumentStore, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut storage = DocumentStore::new(StoragePaths::new(temp_dir.path()));
        storage.initialize().expect("Failed to initialize");
        (storage, temp_dir)
    }

    fn test_idea(owner: &str, title: &str) -> Idea {
        Idea::new(owner, title, "A summary", "Longer description", vec!["rust".into()])
    }

    #[test]
    fn new_idea_trims_title_and_summary() {
        let idea = Idea::new("owner", "  Title  ", "\tSummary\n", "  kept  ", vec![]);
        assert_eq!(idea.title, "Title");
        assert_eq!(idea.summary, "Summary");
        assert_eq!(idea.description, "  kept  ");
        assert_eq!(idea.created_at, idea.updated_at);
    }

    #[test]
    fn serializes_with_api_field_names() {
        let idea = test_idea("owner-1", "Title");
        let json = serde_json::to_value(&idea).unwrap();

        assert_eq!(json["user"], "owner-1");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert!(json.get("owner_id").is_none());
    }

    #[test]
    fn create_get_update_delete() {
        let (storage, _dir) = test_storage();
        let repo = IdeaRepository::new(&storage);

        let mut idea = test_idea("owner-1", "First");
        repo.create(&idea).unwrap();
        assert_eq!(repo.get(&idea.id).unwrap(), idea);

        idea.apply_edit(" Second ", "New summary", "New description".into(), vec![]);
        repo.update(&idea).unwrap();
        let loaded = repo.get(&idea.id).unwrap();
        assert_eq!(loaded.title, "Second");
        assert_eq!(loaded.owner_id, "owner-1");
        assert!(loaded.tags.is_empty());

        repo.delete(&idea.id).unwrap();
        assert!(matches!(repo.get(&idea.id), Err(StorageError::NotFound(_))));
        assert!(matches!(repo.delete(&idea.id), Err(StorageError::NotFound(_))));
    }

    #[test]
    fn get_rejects_non_uuid_ids() {
        let (storage, _dir) = test_storage();
        let repo = IdeaRepository::new(&storage);

        assert!(matches!(repo.get("not-a-uuid"), Err(StorageError::NotFound(_))));
        assert!(matches!(repo.get("../accounts/x"), Err(StorageError::NotFound(_))));
    }

    #[test]
    fn update_missing_idea_is_not_found() {
        let (storage, _dir) = test_storage();
        let repo = IdeaRepository::new(&storage);

        let idea = test_idea("owner", "Ghost");
        assert!(matches!(repo.update(&idea), Err(StorageError::NotFound(_))));
    }

    #[test]
    fn update_racing_delete_never_restores_the_idea() {
        use std::sync::Barrier;

        let (storage, _dir) = test_storage();
        let repo = IdeaRepository::new(&storage);

        for round in 0..200 {
            let mut idea = test_idea("owner", &format!("Round {round}"));
            repo.create(&idea).unwrap();
            idea.apply_edit("Edited", "Edited summary", String::new(), vec![]);

            let barrier = Barrier::new(2);
            let (updated, deleted) = std::thread::scope(|scope| {
                let update = scope.spawn(|| {
                    barrier.wait();
                    repo.update(&idea)
                });
                let delete = scope.spawn(|| {
                    barrier.wait();
                    repo.delete(&idea.id)
                });
                (update.join().unwrap(), delete.join().unwrap())
            });

            assert!(deleted.is_ok(), "round {round}: delete failed: {deleted:?}");
            assert!(
                matches!(updated, Ok(()) | Err(StorageError::NotFound(_))),
                "round {round}: unexpected update result: {updated:?}"
            );
            assert!(!repo.exists(&idea.id), "round {round}: deleted idea came back");
        }
    }

    #[test]
    fn list_recent_is_newest_first_and_limited() {
        let (storage, _dir) = test_storage();
        let repo = IdeaRepository::new(&storage);

        let base = Utc::now();
        let mut created = Vec::new();
        for i in 0..4 {
            let mut idea = test_idea("owner", &format!("Idea {i}"));
            idea.created_at = base + Duration::seconds(i);
            repo.create(&idea).unwrap();
            created.push(idea);
        }

        let all = repo.list_recent(None).unwrap();
        let titles: Vec<_> = all.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Idea 3", "Idea 2", "Idea 1", "Idea 0"]);

        let limited = repo.list_recent(Some(2)).unwrap();
        assert_eq!(limited.len(), 2);
        assert_eq!(limited[0].id, created[3].id);
        assert_eq!(limited[1].id, created[2].id);
    }
}
