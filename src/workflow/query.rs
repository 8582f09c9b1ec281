use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::{WorkflowError, WorkflowResult};
use super::record::SubmissionRecord;
use super::status::{SubmissionStatus, SubmissionType};

/// Listings show this many submissions per page.
pub const PAGE_SIZE: usize = 10;

/// Optional narrowing applied to a scoped listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SubmissionFilter {
    pub status: Option<SubmissionStatus>,
    pub submission_type: Option<SubmissionType>,
    /// Case-insensitive substring of the submission's department.
    pub department: Option<String>,
    /// Inclusive lower bound on the submission date (UTC).
    pub date_from: Option<NaiveDate>,
    /// Inclusive upper bound on the submission date (UTC).
    pub date_to: Option<NaiveDate>,
}

impl SubmissionFilter {
    pub fn only_status(status: Option<SubmissionStatus>) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }

    pub fn matches(&self, submission: &SubmissionRecord) -> bool {
        if self.status.is_some_and(|s| s != submission.status) {
            return false;
        }
        if self
            .submission_type
            .is_some_and(|t| t != submission.submission_type)
        {
            return false;
        }
        if let Some(needle) = &self.department {
            let needle = needle.to_lowercase();
            let hit = submission
                .department
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }
        let day = submission.submitted_at.date_naive();
        if self.date_from.is_some_and(|from| day < from) {
            return false;
        }
        if self.date_to.is_some_and(|to| day > to) {
            return false;
        }
        true
    }
}

/// Raw filter fields as they arrive from the dashboard's query string.
/// Empty strings mean the field was left blank.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FilterParams {
    pub status: Option<String>,
    pub submission_type: Option<String>,
    pub department: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub page: Option<String>,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_date(field: &'static str, raw: Option<&str>) -> WorkflowResult<Option<NaiveDate>> {
    raw.map(|value| {
        NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map_err(|_| WorkflowError::validation(field, "Enter a valid date."))
    })
    .transpose()
}

impl FilterParams {
    pub fn page_number(&self) -> usize {
        parse_page_number(self.page.as_deref())
    }

    pub fn to_filter(&self) -> WorkflowResult<SubmissionFilter> {
        let status = non_blank(&self.status)
            .map(|s| {
                s.parse::<SubmissionStatus>()
                    .map_err(|_| WorkflowError::validation("status", "Select a valid choice."))
            })
            .transpose()?;
        let submission_type = non_blank(&self.submission_type)
            .map(|s| {
                s.parse::<SubmissionType>().map_err(|_| {
                    WorkflowError::validation("submission_type", "Select a valid choice.")
                })
            })
            .transpose()?;
        let date_from = parse_date("date_from", non_blank(&self.date_from))?;
        let date_to = parse_date("date_to", non_blank(&self.date_to))?;

        Ok(SubmissionFilter {
            status,
            submission_type,
            department: non_blank(&self.department).map(str::to_string),
            date_from,
            date_to,
        })
    }
}

/// Per-status totals shown above the review dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub total: usize,
    pub pending: usize,
    pub under_review: usize,
    pub approved: usize,
    pub rejected: usize,
    pub needs_revision: usize,
}

impl StatusCounts {
    pub fn tally<'a, I>(submissions: I) -> Self
    where
        I: IntoIterator<Item = &'a SubmissionRecord>,
    {
        let mut counts = StatusCounts::default();
        for submission in submissions {
            counts.total += 1;
            match submission.status {
                SubmissionStatus::Pending => counts.pending += 1,
                SubmissionStatus::UnderReview => counts.under_review += 1,
                SubmissionStatus::Approved => counts.approved += 1,
                SubmissionStatus::Rejected => counts.rejected += 1,
                SubmissionStatus::NeedsRevision => counts.needs_revision += 1,
            }
        }
        counts
    }
}

/// One page of an ordered listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: usize,
    pub total_items: usize,
    pub total_pages: usize,
    pub has_previous: bool,
    pub has_next: bool,
}

impl<T> Page<T> {
    /// Cut page `number` (1-based) out of `items`. Numbers below 1 are
    /// treated as 1; numbers past the end yield an empty page.
    pub fn paginate(items: Vec<T>, number: usize) -> Self {
        let number = number.max(1);
        let total_items = items.len();
        let total_pages = total_items.div_ceil(PAGE_SIZE);
        let start = (number - 1).saturating_mul(PAGE_SIZE);

        let items: Vec<T> = items.into_iter().skip(start).take(PAGE_SIZE).collect();

        Page {
            items,
            number,
            total_items,
            total_pages,
            has_previous: number > 1,
            has_next: number < total_pages,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            total_items: self.total_items,
            total_pages: self.total_pages,
            has_previous: self.has_previous,
            has_next: self.has_next,
        }
    }
}

/// Parse a `page` query value the way the listing links produce it.
pub fn parse_page_number(raw: Option<&str>) -> usize {
    raw.and_then(|value| value.trim().parse::<usize>().ok())
        .filter(|n| *n >= 1)
        .unwrap_or(1)
}
