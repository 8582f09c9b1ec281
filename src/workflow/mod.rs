//! The submission review workflow: records, roles, visibility and the
//! status transition engine.

pub mod engine;
pub mod error;
pub mod query;
pub mod record;
pub mod role;
pub mod status;
pub mod visibility;

pub use engine::{Dashboard, ReviewForm, SubmissionDraft};
pub use error::{WorkflowError, WorkflowResult};
pub use query::{FilterParams, Page, StatusCounts, SubmissionFilter, PAGE_SIZE};
pub use record::{ReviewEntry, ReviewStamp, SubmissionRecord};
pub use role::{Actor, Role};
pub use status::{ReviewAction, SubmissionStatus, SubmissionType};
pub use visibility::{can_be_reviewed_by, visible_to, ReviewScope};
