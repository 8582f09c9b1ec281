use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tera::Context;

use super::auth::CurrentActor;
use super::error::{notice, AppError};
use crate::state::AppState;
use crate::workflow::engine::{self, ReviewForm};
use crate::workflow::{
    Actor, FilterParams, Page, ReviewEntry, SubmissionFilter, SubmissionRecord, SubmissionStatus,
    SubmissionType, WorkflowError,
};

#[derive(Serialize)]
struct SubmissionView {
    id: i64,
    title: String,
    description: String,
    submission_type: &'static str,
    type_label: &'static str,
    department: String,
    school: String,
    status: &'static str,
    status_label: &'static str,
    review_comments: String,
    reviewed_by: Option<String>,
    reviewed_at: Option<String>,
    submitted_at: String,
    content: String,
}

#[derive(Serialize)]
struct EntryView {
    action: &'static str,
    reviewer: String,
    comments: String,
    created_at: String,
}

#[derive(Serialize)]
struct Choice {
    value: &'static str,
    label: &'static str,
}

fn format_time(at: DateTime<Utc>) -> String {
    at.format("%b %d, %Y %H:%M").to_string()
}

fn submission_view(record: &SubmissionRecord, names: &HashMap<i64, String>) -> SubmissionView {
    SubmissionView {
        id: record.id,
        title: record.title.clone(),
        description: record.description.clone(),
        submission_type: record.submission_type.as_str(),
        type_label: record.submission_type.label(),
        department: record.department.clone().unwrap_or_default(),
        school: record.school.clone().unwrap_or_default(),
        status: record.status.as_str(),
        status_label: record.status.label(),
        review_comments: record.review_comments.clone(),
        reviewed_by: record.review.map(|stamp| reviewer_name(names, stamp.reviewed_by)),
        reviewed_at: record.review.map(|stamp| format_time(stamp.reviewed_at)),
        submitted_at: format_time(record.submitted_at),
        content: serde_json::to_string_pretty(&record.content).unwrap_or_default(),
    }
}

fn reviewer_name(names: &HashMap<i64, String>, id: i64) -> String {
    names
        .get(&id)
        .cloned()
        .unwrap_or_else(|| format!("User #{}", id))
}

fn status_choices() -> Vec<Choice> {
    SubmissionStatus::ALL
        .into_iter()
        .map(|s| Choice {
            value: s.as_str(),
            label: s.label(),
        })
        .collect()
}

fn type_choices() -> Vec<Choice> {
    SubmissionType::ALL
        .into_iter()
        .map(|t| Choice {
            value: t.as_str(),
            label: t.label(),
        })
        .collect()
}

/// Display names for everyone who appears on a submission page.
async fn resolve_names(
    state: &AppState,
    submission: &SubmissionRecord,
    history: &[ReviewEntry],
) -> HashMap<i64, String> {
    let mut ids: Vec<i64> = history.iter().map(|e| e.reviewer_id).collect();
    ids.extend(submission.review.map(|stamp| stamp.reviewed_by));
    ids.push(submission.owner_id);
    ids.sort_unstable();
    ids.dedup();

    match state.repo.get_actors(&ids).await {
        Ok(actors) => actors
            .into_iter()
            .map(|actor| (actor.id, actor.display_name().to_string()))
            .collect(),
        Err(e) => {
            tracing::warn!("Failed to resolve {} users: {}", ids.len(), e);
            HashMap::new()
        }
    }
}

fn base_context(actor: &Actor, notice_code: Option<&str>) -> Context {
    let mut ctx = Context::new();
    ctx.insert("user_name", actor.display_name());
    ctx.insert("can_review", &actor.can_review_submissions());
    ctx.insert("notice", notice_code.and_then(notice::message).unwrap_or(""));
    ctx.insert("error_field", "");
    ctx.insert("error_message", "");
    ctx
}

fn page_context<T>(ctx: &mut Context, page: &Page<T>, views: Vec<SubmissionView>) {
    ctx.insert("submissions", &views);
    ctx.insert("page_number", &page.number);
    ctx.insert("total_pages", &page.total_pages);
    ctx.insert("total_items", &page.total_items);
    ctx.insert("has_previous", &page.has_previous);
    ctx.insert("has_next", &page.has_next);
}

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    #[serde(flatten)]
    filters: FilterParams,
    notice: Option<String>,
}

pub async fn review_dashboard(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, AppError> {
    let fail = AppError::for_actor(&actor);
    let page_number = query.filters.page_number();

    let (filter, field_error) = match query.filters.to_filter() {
        Ok(filter) => (filter, None),
        Err(WorkflowError::Validation { field, message }) => {
            (SubmissionFilter::default(), Some((field, message)))
        }
        Err(e) => return Err(fail(e)),
    };

    let dashboard =
        match engine::review_dashboard(state.repo.as_ref(), &actor, &filter, page_number).await {
            Ok(d) => d,
            Err(e) => return Err(fail(e)),
        };

    let names = HashMap::new();
    let views = dashboard
        .page
        .items
        .iter()
        .map(|s| submission_view(s, &names))
        .collect();

    let mut ctx = base_context(&actor, query.notice.as_deref());
    page_context(&mut ctx, &dashboard.page, views);
    ctx.insert("counts", &dashboard.counts);
    ctx.insert("filters", &query.filters);
    ctx.insert("status_choices", &status_choices());
    ctx.insert("type_choices", &type_choices());

    let status = match field_error {
        Some((field, message)) => {
            ctx.insert("error_field", field);
            ctx.insert("error_message", &message);
            StatusCode::UNPROCESSABLE_ENTITY
        }
        None => StatusCode::OK,
    };

    Ok((status, render_template(&state, "review_dashboard.html", ctx)).into_response())
}

#[derive(Debug, Default, Deserialize)]
pub struct NoticeQuery {
    notice: Option<String>,
}

async fn render_detail(
    state: &AppState,
    actor: &Actor,
    submission: &SubmissionRecord,
    history: &[ReviewEntry],
    form: &ReviewForm,
    field_error: Option<(&'static str, String)>,
    notice_code: Option<&str>,
) -> Html<String> {
    let names = resolve_names(state, submission, history).await;
    let entries: Vec<EntryView> = history
        .iter()
        .map(|e| EntryView {
            action: e.action.as_str(),
            reviewer: reviewer_name(&names, e.reviewer_id),
            comments: e.comments.clone(),
            created_at: format_time(e.created_at),
        })
        .collect();

    let mut ctx = base_context(actor, notice_code);
    ctx.insert("submission", &submission_view(submission, &names));
    ctx.insert("owner", &reviewer_name(&names, submission.owner_id));
    ctx.insert("history", &entries);
    ctx.insert("form", form);
    ctx.insert("status_choices", &status_choices());
    if let Some((field, message)) = field_error {
        ctx.insert("error_field", field);
        ctx.insert("error_message", &message);
    }
    render_template(state, "submission_detail.html", ctx)
}

pub async fn submission_detail(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    Path(submission_id): Path<i64>,
    Query(query): Query<NoticeQuery>,
) -> Result<Html<String>, AppError> {
    let (submission, history) =
        engine::open_for_review(state.repo.as_ref(), &actor, submission_id)
            .await
            .map_err(AppError::for_actor(&actor))?;

    let form = ReviewForm {
        status: submission.status.as_str().to_string(),
        review_comments: submission.review_comments.clone(),
    };
    let notice_code = query.notice.as_deref();
    Ok(render_detail(&state, &actor, &submission, &history, &form, None, notice_code).await)
}

pub async fn review_submission(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    Path(submission_id): Path<i64>,
    Form(form): Form<ReviewForm>,
) -> Result<Response, AppError> {
    let fail = AppError::for_actor(&actor);
    match engine::submit_review(state.repo.as_ref(), &actor, submission_id, form.clone()).await {
        Ok(_) => {
            let target = format!("/review-dashboard?notice={}", notice::REVIEW_SAVED);
            Ok(Redirect::to(&target).into_response())
        }
        Err(WorkflowError::Validation { field, message }) => {
            let (submission, history) =
                match engine::open_for_review(state.repo.as_ref(), &actor, submission_id).await {
                    Ok(loaded) => loaded,
                    Err(e) => return Err(fail(e)),
                };
            let page = render_detail(
                &state,
                &actor,
                &submission,
                &history,
                &form,
                Some((field, message)),
                None,
            )
            .await;
            Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response())
        }
        Err(e) => Err(fail(e)),
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ResubmitForm {
    #[serde(default)]
    comments: String,
}

pub async fn resubmit_submission(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    Path(submission_id): Path<i64>,
    Form(form): Form<ResubmitForm>,
) -> Result<Redirect, AppError> {
    engine::resubmit(state.repo.as_ref(), &actor, submission_id, &form.comments)
        .await
        .map_err(AppError::for_actor(&actor))?;
    Ok(Redirect::to(&format!(
        "/my-submissions?notice={}",
        notice::RESUBMITTED
    )))
}

#[derive(Debug, Default, Deserialize)]
pub struct MySubmissionsQuery {
    status: Option<String>,
    page: Option<String>,
    notice: Option<String>,
}

pub async fn my_submissions(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    Query(query): Query<MySubmissionsQuery>,
) -> Result<Response, AppError> {
    let fail = AppError::for_actor(&actor);
    let params = FilterParams {
        status: query.status.clone(),
        page: query.page.clone(),
        ..FilterParams::default()
    };

    let (status_filter, field_error) = match params.to_filter() {
        Ok(filter) => (filter.status, None),
        Err(WorkflowError::Validation { field, message }) => (None, Some((field, message))),
        Err(e) => return Err(fail(e)),
    };

    let page = match engine::my_submissions(
        state.repo.as_ref(),
        &actor,
        status_filter,
        params.page_number(),
    )
    .await
    {
        Ok(page) => page,
        Err(e) => return Err(fail(e)),
    };

    let names = HashMap::new();
    let views = page.items.iter().map(|s| submission_view(s, &names)).collect();

    let mut ctx = base_context(&actor, query.notice.as_deref());
    page_context(&mut ctx, &page, views);
    ctx.insert("selected_status", &query.status.unwrap_or_default());
    ctx.insert("status_choices", &status_choices());

    let status = match field_error {
        Some((field, message)) => {
            ctx.insert("error_field", field);
            ctx.insert("error_message", &message);
            StatusCode::UNPROCESSABLE_ENTITY
        }
        None => StatusCode::OK,
    };

    Ok((status, render_template(&state, "my_submissions.html", ctx)).into_response())
}

fn render_template(state: &AppState, name: &str, ctx: Context) -> Html<String> {
    let tera = crate::templates::get_tera(&state.config.template_dir);
    let rendered = tera.render(name, &ctx).unwrap_or_else(|e| {
        tracing::error!("Template {} failed to render: {}", name, e);
        format!("Template error: {}", name)
    });
    Html(rendered)
}
