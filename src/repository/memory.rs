//! In-memory implementation of `PortalRepository`.
//!
//! All state is held in one `RwLock` and lost on restart. Each write
//! operation holds the write lock for its whole duration, which gives the
//! same all-or-nothing behaviour the Postgres transactions provide.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{ListScope, PortalRepository, RepositoryError};
use crate::workflow::query::SubmissionFilter;
use crate::workflow::record::{
    NewReviewEntry, NewSubmission, ReviewDecision, ReviewEntry, SubmissionRecord,
};
use crate::workflow::role::Actor;
use crate::workflow::status::SubmissionStatus;

#[derive(Default)]
struct Tables {
    actors: HashMap<i64, Actor>,
    submissions: HashMap<i64, SubmissionRecord>,
    entries: Vec<ReviewEntry>,
    next_submission_id: i64,
    next_entry_id: i64,
}

impl Tables {
    fn push_entry(&mut self, entry: NewReviewEntry) -> ReviewEntry {
        self.next_entry_id += 1;
        let stored = ReviewEntry {
            id: self.next_entry_id,
            submission_id: entry.submission_id,
            reviewer_id: entry.reviewer_id,
            action: entry.action,
            comments: entry.comments,
            created_at: entry.created_at,
        };
        self.entries.push(stored.clone());
        stored
    }
}

pub struct InMemoryRepository {
    tables: RwLock<Tables>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
        }
    }

    /// Insert or replace a user profile.
    pub async fn put_actor(&self, actor: Actor) {
        let mut tables = self.tables.write().await;
        tables.actors.insert(actor.id, actor);
    }
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PortalRepository for InMemoryRepository {
    async fn get_actor(&self, id: i64) -> Result<Option<Actor>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.actors.get(&id).cloned())
    }

    async fn get_actors(&self, ids: &[i64]) -> Result<Vec<Actor>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| tables.actors.get(id).cloned())
            .collect())
    }

    async fn insert_submission(
        &self,
        submission: NewSubmission,
    ) -> Result<SubmissionRecord, RepositoryError> {
        let mut tables = self.tables.write().await;
        tables.next_submission_id += 1;
        let record = SubmissionRecord {
            id: tables.next_submission_id,
            owner_id: submission.owner_id,
            submission_type: submission.submission_type,
            title: submission.title,
            description: submission.description,
            content: submission.content,
            department: submission.department,
            school: submission.school,
            status: SubmissionStatus::Pending,
            review: None,
            review_comments: String::new(),
            submitted_at: submission.submitted_at,
        };
        tables.submissions.insert(record.id, record.clone());
        Ok(record)
    }

    async fn get_submission(&self, id: i64) -> Result<Option<SubmissionRecord>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.submissions.get(&id).cloned())
    }

    async fn list_submissions(
        &self,
        scope: &ListScope,
        filter: &SubmissionFilter,
    ) -> Result<Vec<SubmissionRecord>, RepositoryError> {
        let tables = self.tables.read().await;
        let mut found: Vec<SubmissionRecord> = tables
            .submissions
            .values()
            .filter(|s| scope.permits(s) && filter.matches(s))
            .cloned()
            .collect();
        found.sort_by(|a, b| {
            b.submitted_at
                .cmp(&a.submitted_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(found)
    }

    async fn review_entries(&self, submission_id: i64) -> Result<Vec<ReviewEntry>, RepositoryError> {
        let tables = self.tables.read().await;
        let mut entries: Vec<ReviewEntry> = tables
            .entries
            .iter()
            .filter(|e| e.submission_id == submission_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(entries)
    }

    async fn apply_review(
        &self,
        decision: &ReviewDecision,
        entry: NewReviewEntry,
    ) -> Result<(SubmissionRecord, ReviewEntry), RepositoryError> {
        let mut tables = self.tables.write().await;
        let id = entry.submission_id;
        let updated = {
            let submission = tables
                .submissions
                .get_mut(&id)
                .ok_or(RepositoryError::MissingSubmission(id))?;
            submission.status = decision.status;
            submission.review_comments = decision.comments.clone();
            submission.review = Some(decision.stamp);
            submission.clone()
        };
        let stored = tables.push_entry(entry);
        Ok((updated, stored))
    }

    async fn append_entry(
        &self,
        entry: NewReviewEntry,
        status: SubmissionStatus,
    ) -> Result<(SubmissionRecord, ReviewEntry), RepositoryError> {
        let mut tables = self.tables.write().await;
        let id = entry.submission_id;
        let updated = {
            let submission = tables
                .submissions
                .get_mut(&id)
                .ok_or(RepositoryError::MissingSubmission(id))?;
            submission.status = status;
            submission.clone()
        };
        let stored = tables.push_entry(entry);
        Ok((updated, stored))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::role::Role;

    fn actor(id: i64) -> Actor {
        Actor {
            id,
            username: format!("user{id}"),
            full_name: format!("User {id}"),
            email: format!("user{id}@example.edu"),
            department: Some("CS".into()),
            school: Some("Engineering".into()),
            role: Role::Faculty,
        }
    }

    #[tokio::test]
    async fn batch_lookup_skips_unknown_ids() {
        let repo = InMemoryRepository::new();
        repo.put_actor(actor(1)).await;
        repo.put_actor(actor(2)).await;

        let mut found: Vec<i64> = repo
            .get_actors(&[2, 1, 99])
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.id)
            .collect();
        found.sort_unstable();
        assert_eq!(found, vec![1, 2]);
        assert!(repo.get_actors(&[]).await.unwrap().is_empty());
    }
}
