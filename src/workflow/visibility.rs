//! Role-scoped visibility.
//!
//! A [`ReviewScope`] is resolved from the actor's role and then applied
//! either here, as a predicate over records, or by the Postgres repository
//! as a `WHERE` clause. Both paths match units exactly.

use serde::Serialize;

use super::record::SubmissionRecord;
use super::role::Actor;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "unit", rename_all = "snake_case")]
pub enum ReviewScope {
    Department(String),
    School(String),
    All,
}

impl ReviewScope {
    pub fn permits(&self, submission: &SubmissionRecord) -> bool {
        match self {
            ReviewScope::Department(department) => {
                submission.department.as_deref() == Some(department.as_str())
            }
            ReviewScope::School(school) => submission.school.as_deref() == Some(school.as_str()),
            ReviewScope::All => true,
        }
    }
}

/// Whether `actor` may open the review view of `submission` and act on it.
pub fn can_be_reviewed_by(submission: &SubmissionRecord, actor: &Actor) -> bool {
    actor
        .review_scope()
        .is_some_and(|scope| scope.permits(submission))
}

/// The subset of `submissions` the actor may review, in input order.
pub fn visible_to<'a, I>(actor: &Actor, submissions: I) -> Vec<&'a SubmissionRecord>
where
    I: IntoIterator<Item = &'a SubmissionRecord>,
{
    let Some(scope) = actor.review_scope() else {
        return Vec::new();
    };
    submissions
        .into_iter()
        .filter(|submission| scope.permits(submission))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::role::Role;
    use crate::workflow::status::{SubmissionStatus, SubmissionType};
    use chrono::Utc;

    fn submission(id: i64, department: &str, school: &str) -> SubmissionRecord {
        SubmissionRecord {
            id,
            owner_id: 1,
            submission_type: SubmissionType::Patents,
            title: format!("Submission {id}"),
            description: String::new(),
            content: serde_json::json!({}),
            department: Some(department.to_string()),
            school: Some(school.to_string()),
            status: SubmissionStatus::Pending,
            review: None,
            review_comments: String::new(),
            submitted_at: Utc::now(),
        }
    }

    fn actor(role: Role) -> Actor {
        Actor {
            id: 99,
            username: "reviewer".into(),
            full_name: "Reviewer".into(),
            email: "reviewer@example.edu".into(),
            department: None,
            school: None,
            role,
        }
    }

    fn universe() -> Vec<SubmissionRecord> {
        vec![
            submission(1, "CS", "Engineering"),
            submission(2, "EE", "Engineering"),
            submission(3, "Finance", "Management"),
        ]
    }

    #[test]
    fn cluster_head_sees_own_department() {
        let head = actor(Role::ClusterHead {
            department: "CS".into(),
        });
        let all = universe();
        let ids: Vec<i64> = visible_to(&head, &all).iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1]);
        assert!(can_be_reviewed_by(&all[0], &head));
        assert!(!can_be_reviewed_by(&all[1], &head));
    }

    #[test]
    fn dean_sees_whole_school() {
        let dean = actor(Role::Dean {
            school: "Engineering".into(),
        });
        let all = universe();
        let ids: Vec<i64> = visible_to(&dean, &all).iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn admin_sees_everything_and_faculty_nothing() {
        let all = universe();
        assert_eq!(visible_to(&actor(Role::Admin), &all).len(), 3);
        assert!(visible_to(&actor(Role::Faculty), &all).is_empty());
        assert!(!can_be_reviewed_by(&all[0], &actor(Role::Faculty)));
    }

    #[test]
    fn predicate_agrees_with_filter() {
        let all = universe();
        let actors = [
            actor(Role::Faculty),
            actor(Role::Admin),
            actor(Role::ClusterHead {
                department: "EE".into(),
            }),
            actor(Role::Dean {
                school: "Management".into(),
            }),
        ];
        for a in &actors {
            let visible = visible_to(a, &all);
            for s in &all {
                assert_eq!(
                    can_be_reviewed_by(s, a),
                    visible.iter().any(|v| v.id == s.id),
                    "actor {:?} submission {}",
                    a.role,
                    s.id
                );
            }
        }
    }

    #[test]
    fn missing_unit_never_matches() {
        let mut orphan = submission(4, "CS", "Engineering");
        orphan.department = None;
        let head = actor(Role::ClusterHead {
            department: "CS".into(),
        });
        assert!(!can_be_reviewed_by(&orphan, &head));
    }
}
