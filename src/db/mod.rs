mod models;

pub use models::*;

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::sync::Arc;

use crate::repository::{ListScope, PortalRepository, RepositoryError};
use crate::workflow::query::SubmissionFilter;
use crate::workflow::record::{
    NewReviewEntry, NewSubmission, ReviewDecision, ReviewEntry, SubmissionRecord,
};
use crate::workflow::role::Actor;
use crate::workflow::status::SubmissionStatus;
use crate::workflow::visibility::ReviewScope;

pub type DbPool = Arc<PgPool>;

pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    Ok(Arc::new(pool))
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// `PortalRepository` backed by Postgres.
#[derive(Clone)]
pub struct PgRepository {
    pool: DbPool,
}

impl PgRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Escape `%`, `_` and `\` so user input matches literally inside ILIKE.
fn like_pattern(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len() + 2);
    escaped.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

fn push_scope(qb: &mut QueryBuilder<'_, Postgres>, scope: &ListScope) {
    match scope {
        ListScope::Review(ReviewScope::Department(department)) => {
            qb.push(" AND department = ").push_bind(department.clone());
        }
        ListScope::Review(ReviewScope::School(school)) => {
            qb.push(" AND school = ").push_bind(school.clone());
        }
        ListScope::Review(ReviewScope::All) => {}
        ListScope::Owner(owner_id) => {
            qb.push(" AND owner_id = ").push_bind(*owner_id);
        }
    }
}

fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &SubmissionFilter) {
    if let Some(status) = filter.status {
        qb.push(" AND status = ").push_bind(status.as_str());
    }
    if let Some(kind) = filter.submission_type {
        qb.push(" AND submission_type = ").push_bind(kind.as_str());
    }
    if let Some(department) = &filter.department {
        qb.push(" AND department ILIKE ")
            .push_bind(like_pattern(department));
    }
    if let Some(from) = filter.date_from {
        qb.push(" AND (submitted_at AT TIME ZONE 'UTC')::date >= ")
            .push_bind(from);
    }
    if let Some(to) = filter.date_to {
        qb.push(" AND (submitted_at AT TIME ZONE 'UTC')::date <= ")
            .push_bind(to);
    }
}

#[async_trait]
impl PortalRepository for PgRepository {
    async fn get_actor(&self, id: i64) -> Result<Option<Actor>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, full_name, email, department, school, role FROM portal_users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;
        Ok(row.map(Actor::from))
    }

    async fn get_actors(&self, ids: &[i64]) -> Result<Vec<Actor>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, full_name, email, department, school, role FROM portal_users WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(self.pool.as_ref())
        .await?;
        Ok(rows.into_iter().map(Actor::from).collect())
    }

    async fn insert_submission(
        &self,
        submission: NewSubmission,
    ) -> Result<SubmissionRecord, RepositoryError> {
        let row = sqlx::query_as::<_, SubmissionRow>(
            r#"
            INSERT INTO submissions (owner_id, submission_type, title, description, content, department, school, status, submitted_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'pending', $8)
            RETURNING *
            "#,
        )
        .bind(submission.owner_id)
        .bind(submission.submission_type.as_str())
        .bind(&submission.title)
        .bind(&submission.description)
        .bind(&submission.content)
        .bind(&submission.department)
        .bind(&submission.school)
        .bind(submission.submitted_at)
        .fetch_one(self.pool.as_ref())
        .await?;
        row.try_into()
    }

    async fn get_submission(&self, id: i64) -> Result<Option<SubmissionRecord>, RepositoryError> {
        sqlx::query_as::<_, SubmissionRow>("SELECT * FROM submissions WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?
            .map(SubmissionRecord::try_from)
            .transpose()
    }

    async fn list_submissions(
        &self,
        scope: &ListScope,
        filter: &SubmissionFilter,
    ) -> Result<Vec<SubmissionRecord>, RepositoryError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM submissions WHERE TRUE");
        push_scope(&mut qb, scope);
        push_filter(&mut qb, filter);
        qb.push(" ORDER BY submitted_at DESC, id DESC");

        let rows = qb
            .build_query_as::<SubmissionRow>()
            .fetch_all(self.pool.as_ref())
            .await?;
        rows.into_iter().map(SubmissionRecord::try_from).collect()
    }

    async fn review_entries(&self, submission_id: i64) -> Result<Vec<ReviewEntry>, RepositoryError> {
        let rows = sqlx::query_as::<_, ReviewEntryRow>(
            "SELECT * FROM review_entries WHERE submission_id = $1 ORDER BY created_at, id",
        )
        .bind(submission_id)
        .fetch_all(self.pool.as_ref())
        .await?;
        rows.into_iter().map(ReviewEntry::try_from).collect()
    }

    async fn apply_review(
        &self,
        decision: &ReviewDecision,
        entry: NewReviewEntry,
    ) -> Result<(SubmissionRecord, ReviewEntry), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, SubmissionRow>(
            r#"
            UPDATE submissions
            SET status = $2, review_comments = $3, reviewed_by = $4, reviewed_at = $5
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(entry.submission_id)
        .bind(decision.status.as_str())
        .bind(&decision.comments)
        .bind(decision.stamp.reviewed_by)
        .bind(decision.stamp.reviewed_at)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepositoryError::MissingSubmission(entry.submission_id))?;

        let entry_row = insert_entry(&mut tx, &entry).await?;
        tx.commit().await?;

        Ok((row.try_into()?, entry_row.try_into()?))
    }

    async fn append_entry(
        &self,
        entry: NewReviewEntry,
        status: SubmissionStatus,
    ) -> Result<(SubmissionRecord, ReviewEntry), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let entry_row = insert_entry(&mut tx, &entry).await?;
        let row = sqlx::query_as::<_, SubmissionRow>(
            "UPDATE submissions SET status = $2 WHERE id = $1 RETURNING *",
        )
        .bind(entry.submission_id)
        .bind(status.as_str())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepositoryError::MissingSubmission(entry.submission_id))?;

        tx.commit().await?;

        Ok((row.try_into()?, entry_row.try_into()?))
    }
}

async fn insert_entry(
    tx: &mut sqlx::Transaction<'_, Postgres>,
    entry: &NewReviewEntry,
) -> Result<ReviewEntryRow, sqlx::Error> {
    sqlx::query_as::<_, ReviewEntryRow>(
        r#"
        INSERT INTO review_entries (submission_id, reviewer_id, action, comments, created_at)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(entry.submission_id)
    .bind(entry.reviewer_id)
    .bind(entry.action.as_str())
    .bind(&entry.comments)
    .bind(entry.created_at)
    .fetch_one(&mut **tx)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("CS"), "%CS%");
        assert_eq!(like_pattern("50%_a\\b"), "%50\\%\\_a\\\\b%");
    }

    #[test]
    fn scoped_query_binds_unit() {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM submissions WHERE TRUE");
        push_scope(
            &mut qb,
            &ListScope::Review(ReviewScope::Department("CS".into())),
        );
        push_filter(
            &mut qb,
            &SubmissionFilter::only_status(Some(SubmissionStatus::Pending)),
        );
        assert_eq!(
            qb.sql(),
            "SELECT * FROM submissions WHERE TRUE AND department = $1 AND status = $2"
        );
    }

    #[test]
    fn unrestricted_scope_adds_nothing() {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM submissions WHERE TRUE");
        push_scope(&mut qb, &ListScope::Review(ReviewScope::All));
        push_filter(&mut qb, &SubmissionFilter::default());
        assert_eq!(qb.sql(), "SELECT * FROM submissions WHERE TRUE");
    }
}
