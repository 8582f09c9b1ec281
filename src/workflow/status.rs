use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle stage of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Pending,
    UnderReview,
    Approved,
    Rejected,
    NeedsRevision,
}

impl SubmissionStatus {
    pub const ALL: [SubmissionStatus; 5] = [
        SubmissionStatus::Pending,
        SubmissionStatus::UnderReview,
        SubmissionStatus::Approved,
        SubmissionStatus::Rejected,
        SubmissionStatus::NeedsRevision,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SubmissionStatus::Pending => "pending",
            SubmissionStatus::UnderReview => "under_review",
            SubmissionStatus::Approved => "approved",
            SubmissionStatus::Rejected => "rejected",
            SubmissionStatus::NeedsRevision => "needs_revision",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SubmissionStatus::Pending => "Pending Review",
            SubmissionStatus::UnderReview => "Under Review",
            SubmissionStatus::Approved => "Approved",
            SubmissionStatus::Rejected => "Rejected",
            SubmissionStatus::NeedsRevision => "Needs Revision",
        }
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubmissionStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SubmissionStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownVariant::new("status", s))
    }
}

/// Action recorded in a submission's review history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewAction {
    Reviewed,
    Approved,
    Rejected,
    RevisionRequested,
    Resubmitted,
}

impl ReviewAction {
    pub const ALL: [ReviewAction; 5] = [
        ReviewAction::Reviewed,
        ReviewAction::Approved,
        ReviewAction::Rejected,
        ReviewAction::RevisionRequested,
        ReviewAction::Resubmitted,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ReviewAction::Reviewed => "reviewed",
            ReviewAction::Approved => "approved",
            ReviewAction::Rejected => "rejected",
            ReviewAction::RevisionRequested => "revision_requested",
            ReviewAction::Resubmitted => "resubmitted",
        }
    }

    /// Status a submission takes on when an entry with this action is
    /// recorded through [`crate::workflow::engine::record_action`].
    pub fn resulting_status(self) -> SubmissionStatus {
        match self {
            ReviewAction::Reviewed => SubmissionStatus::UnderReview,
            ReviewAction::Approved => SubmissionStatus::Approved,
            ReviewAction::Rejected => SubmissionStatus::Rejected,
            ReviewAction::RevisionRequested => SubmissionStatus::NeedsRevision,
            ReviewAction::Resubmitted => SubmissionStatus::Pending,
        }
    }
}

impl fmt::Display for ReviewAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReviewAction {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReviewAction::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| UnknownVariant::new("action", s))
    }
}

/// The contribution kinds a faculty member can submit for review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionType {
    JournalPublication,
    ConferencePublication,
    ResearchProjects,
    Patents,
    Copyrights,
    PhdGuidance,
    BookChapter,
    Book,
    ConsultancyProjects,
    EditorialRoles,
    ReviewerRoles,
    Awards,
    IndustryCollaboration,
}

impl SubmissionType {
    pub const ALL: [SubmissionType; 13] = [
        SubmissionType::JournalPublication,
        SubmissionType::ConferencePublication,
        SubmissionType::ResearchProjects,
        SubmissionType::Patents,
        SubmissionType::Copyrights,
        SubmissionType::PhdGuidance,
        SubmissionType::BookChapter,
        SubmissionType::Book,
        SubmissionType::ConsultancyProjects,
        SubmissionType::EditorialRoles,
        SubmissionType::ReviewerRoles,
        SubmissionType::Awards,
        SubmissionType::IndustryCollaboration,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SubmissionType::JournalPublication => "journal_publication",
            SubmissionType::ConferencePublication => "conference_publication",
            SubmissionType::ResearchProjects => "research_projects",
            SubmissionType::Patents => "patents",
            SubmissionType::Copyrights => "copyrights",
            SubmissionType::PhdGuidance => "phd_guidance",
            SubmissionType::BookChapter => "book_chapter",
            SubmissionType::Book => "book",
            SubmissionType::ConsultancyProjects => "consultancy_projects",
            SubmissionType::EditorialRoles => "editorial_roles",
            SubmissionType::ReviewerRoles => "reviewer_roles",
            SubmissionType::Awards => "awards",
            SubmissionType::IndustryCollaboration => "industry_collaboration",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SubmissionType::JournalPublication => "Journal Publication",
            SubmissionType::ConferencePublication => "Conference Publication",
            SubmissionType::ResearchProjects => "Research Projects",
            SubmissionType::Patents => "Patents",
            SubmissionType::Copyrights => "Copyrights",
            SubmissionType::PhdGuidance => "PhD Guidance",
            SubmissionType::BookChapter => "Book Chapter",
            SubmissionType::Book => "Book",
            SubmissionType::ConsultancyProjects => "Consultancy Projects",
            SubmissionType::EditorialRoles => "Editorial Roles",
            SubmissionType::ReviewerRoles => "Reviewer Roles",
            SubmissionType::Awards => "Awards",
            SubmissionType::IndustryCollaboration => "Industry Collaboration",
        }
    }
}

impl fmt::Display for SubmissionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubmissionType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SubmissionType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownVariant::new("submission_type", s))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {field} value: {value:?}")]
pub struct UnknownVariant {
    pub field: &'static str,
    pub value: String,
}

impl UnknownVariant {
    fn new(field: &'static str, value: &str) -> Self {
        Self {
            field,
            value: value.to_string(),
        }
    }
}
