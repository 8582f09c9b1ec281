//! End-to-end workflow behaviour over the in-memory repository.

use faculty_portal::repository::{InMemoryRepository, PortalRepository};
use faculty_portal::workflow::engine::{
    create_submission, my_submissions, open_for_review, record_action, resubmit,
    review_dashboard, submit_review, ReviewForm, SubmissionDraft,
};
use faculty_portal::workflow::{
    Actor, ReviewAction, Role, SubmissionFilter, SubmissionRecord, SubmissionStatus,
    SubmissionType, WorkflowError,
};

fn user(id: i64, department: &str, school: &str, role: Role) -> Actor {
    Actor {
        id,
        username: format!("user{id}"),
        full_name: format!("User {id}"),
        email: format!("user{id}@example.edu"),
        department: Some(department.to_string()),
        school: Some(school.to_string()),
        role,
    }
}

fn faculty(id: i64, department: &str, school: &str) -> Actor {
    user(id, department, school, Role::Faculty)
}

fn cluster_head(id: i64, department: &str, school: &str) -> Actor {
    user(
        id,
        department,
        school,
        Role::ClusterHead {
            department: department.to_string(),
        },
    )
}

fn dean(id: i64, school: &str) -> Actor {
    user(
        id,
        "Office of the Dean",
        school,
        Role::Dean {
            school: school.to_string(),
        },
    )
}

fn draft(kind: SubmissionType, title: &str) -> SubmissionDraft {
    SubmissionDraft {
        submission_type: kind.as_str().to_string(),
        title: title.to_string(),
        description: "Submitted through the contribution form".to_string(),
        content: serde_json::json!({ "title_of_paper": title, "volume": "12" }),
    }
}

async fn submit(repo: &InMemoryRepository, owner: &Actor, title: &str) -> SubmissionRecord {
    create_submission(repo, owner, draft(SubmissionType::JournalPublication, title))
        .await
        .unwrap()
}

fn review(status: &str, comments: &str) -> ReviewForm {
    ReviewForm {
        status: status.to_string(),
        review_comments: comments.to_string(),
    }
}

#[tokio::test]
async fn approval_by_cluster_head_of_same_department() {
    let repo = InMemoryRepository::new();
    let f = faculty(1, "CS", "Engineering");
    let r = cluster_head(2, "CS", "Engineering");

    let submission = submit(&repo, &f, "Deep Graph Kernels").await;
    assert_eq!(submission.status, SubmissionStatus::Pending);

    let (updated, entry) = submit_review(&repo, &r, submission.id, review("approved", "Good"))
        .await
        .unwrap();

    assert_eq!(updated.status, SubmissionStatus::Approved);
    assert_eq!(updated.review_comments, "Good");
    let stamp = updated.review.expect("review stamp");
    assert_eq!(stamp.reviewed_by, r.id);

    assert_eq!(entry.action, ReviewAction::Reviewed);
    assert_eq!(entry.comments, "Good");
    assert_eq!(entry.reviewer_id, r.id);

    let stored = repo.get_submission(submission.id).await.unwrap().unwrap();
    assert_eq!(stored.status, SubmissionStatus::Approved);
    let history = repo.review_entries(submission.id).await.unwrap();
    assert_eq!(history.len(), 1);
}

#[tokio::test]
async fn cluster_head_is_limited_to_department() {
    let repo = InMemoryRepository::new();
    let cs = faculty(1, "CS", "Engineering");
    let ee = faculty(2, "EE", "Engineering");
    let head = cluster_head(3, "CS", "Engineering");

    let mine = submit(&repo, &cs, "CS paper").await;
    let theirs = submit(&repo, &ee, "EE paper").await;

    let dashboard = review_dashboard(&repo, &head, &SubmissionFilter::default(), 1)
        .await
        .unwrap();
    let ids: Vec<i64> = dashboard.page.items.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![mine.id]);
    assert_eq!(dashboard.counts.total, 1);

    let err = open_for_review(&repo, &head, theirs.id).await.unwrap_err();
    assert!(matches!(err, WorkflowError::PermissionDenied(_)));

    let err = submit_review(&repo, &head, theirs.id, review("rejected", "no"))
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::PermissionDenied(_)));
    let untouched = repo.get_submission(theirs.id).await.unwrap().unwrap();
    assert_eq!(untouched.status, SubmissionStatus::Pending);
    assert!(untouched.review.is_none());
    assert!(repo.review_entries(theirs.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn dean_sees_every_department_in_school() {
    let repo = InMemoryRepository::new();
    submit(&repo, &faculty(1, "CS", "Engineering"), "A").await;
    submit(&repo, &faculty(2, "EE", "Engineering"), "B").await;
    submit(&repo, &faculty(3, "ME", "Engineering"), "C").await;
    submit(&repo, &faculty(4, "Finance", "Management"), "D").await;

    let dashboard = review_dashboard(&repo, &dean(10, "Engineering"), &SubmissionFilter::default(), 1)
        .await
        .unwrap();
    let mut departments: Vec<String> = dashboard
        .page
        .items
        .iter()
        .filter_map(|s| s.department.clone())
        .collect();
    departments.sort();
    assert_eq!(departments, vec!["CS", "EE", "ME"]);
}

#[tokio::test]
async fn admin_sees_everything() {
    let repo = InMemoryRepository::new();
    submit(&repo, &faculty(1, "CS", "Engineering"), "A").await;
    submit(&repo, &faculty(2, "Finance", "Management"), "B").await;

    let admin = user(9, "IT", "Administration", Role::Admin);
    let dashboard = review_dashboard(&repo, &admin, &SubmissionFilter::default(), 1)
        .await
        .unwrap();
    assert_eq!(dashboard.counts.total, 2);
}

#[tokio::test]
async fn department_is_stamped_at_creation() {
    let repo = InMemoryRepository::new();
    let mut owner = faculty(1, "CS", "Engineering");
    repo.put_actor(owner.clone()).await;

    let submission = submit(&repo, &owner, "Before the move").await;
    assert_eq!(submission.department.as_deref(), Some("CS"));
    assert_eq!(submission.school.as_deref(), Some("Engineering"));
    assert!(repo.review_entries(submission.id).await.unwrap().is_empty());

    owner.department = Some("Data Science".to_string());
    owner.school = Some("Computing".to_string());
    repo.put_actor(owner.clone()).await;

    let stored = repo.get_submission(submission.id).await.unwrap().unwrap();
    assert_eq!(stored.department.as_deref(), Some("CS"));
    assert_eq!(stored.school.as_deref(), Some("Engineering"));

    let later = submit(&repo, &owner, "After the move").await;
    assert_eq!(later.department.as_deref(), Some("Data Science"));
}

#[tokio::test]
async fn recorded_actions_drive_status() {
    let repo = InMemoryRepository::new();
    let owner = faculty(1, "CS", "Engineering");
    let head = cluster_head(2, "CS", "Engineering");

    for action in ReviewAction::ALL {
        let submission = submit(&repo, &owner, action.as_str()).await;
        let (updated, entry) = record_action(&repo, &head, submission.id, action, "auto")
            .await
            .unwrap();
        assert_eq!(entry.action, action);
        assert_eq!(updated.status, action.resulting_status(), "{action}");

        let stored = repo.get_submission(submission.id).await.unwrap().unwrap();
        assert_eq!(stored.status, action.resulting_status());
        assert!(stored.review.is_none(), "mapping writes status only");
    }
}

#[tokio::test]
async fn revision_cycle_returns_to_pending() {
    let repo = InMemoryRepository::new();
    let owner = faculty(1, "CS", "Engineering");
    let head = cluster_head(2, "CS", "Engineering");
    let submission = submit(&repo, &owner, "Needs work").await;

    submit_review(&repo, &head, submission.id, review("needs_revision", "Add related work"))
        .await
        .unwrap();

    let (updated, entry) = resubmit(&repo, &owner, submission.id, "Added section 2")
        .await
        .unwrap();
    assert_eq!(updated.status, SubmissionStatus::Pending);
    assert_eq!(entry.action, ReviewAction::Resubmitted);
    assert_eq!(entry.reviewer_id, owner.id);

    let history = repo.review_entries(submission.id).await.unwrap();
    let actions: Vec<ReviewAction> = history.iter().map(|e| e.action).collect();
    assert_eq!(actions, vec![ReviewAction::Reviewed, ReviewAction::Resubmitted]);
}

#[tokio::test]
async fn resubmission_rules() {
    let repo = InMemoryRepository::new();
    let owner = faculty(1, "CS", "Engineering");
    let stranger = faculty(3, "CS", "Engineering");
    let submission = submit(&repo, &owner, "Fresh").await;

    let err = resubmit(&repo, &owner, submission.id, "").await.unwrap_err();
    assert!(matches!(err, WorkflowError::Validation { field: "status", .. }));

    let err = resubmit(&repo, &stranger, submission.id, "").await.unwrap_err();
    assert!(matches!(err, WorkflowError::PermissionDenied(_)));

    let err = resubmit(&repo, &owner, 404, "").await.unwrap_err();
    assert!(matches!(err, WorkflowError::NotFound(404)));
}

#[tokio::test]
async fn invalid_decision_changes_nothing() {
    let repo = InMemoryRepository::new();
    let owner = faculty(1, "CS", "Engineering");
    let head = cluster_head(2, "CS", "Engineering");
    let submission = submit(&repo, &owner, "Paper").await;

    for bad in ["", "accepted"] {
        let err = submit_review(&repo, &head, submission.id, review(bad, "x"))
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::Validation { field: "status", .. }));
    }
    let stored = repo.get_submission(submission.id).await.unwrap().unwrap();
    assert_eq!(stored.status, SubmissionStatus::Pending);
    assert!(repo.review_entries(submission.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn dashboard_paginates_filtered_results() {
    let repo = InMemoryRepository::new();
    let owner = faculty(1, "CS", "Engineering");
    let admin = user(9, "IT", "Administration", Role::Admin);

    for i in 0..25 {
        submit(&repo, &owner, &format!("Paper {i}")).await;
    }
    create_submission(&repo, &owner, draft(SubmissionType::Patents, "Widget"))
        .await
        .unwrap();

    let filter = SubmissionFilter {
        submission_type: Some(SubmissionType::JournalPublication),
        ..Default::default()
    };
    let sizes = [(1, 10), (2, 10), (3, 5), (4, 0)];
    for (page, expected) in sizes {
        let dashboard = review_dashboard(&repo, &admin, &filter, page).await.unwrap();
        assert_eq!(dashboard.page.items.len(), expected, "page {page}");
        assert_eq!(dashboard.page.total_items, 25);
        assert_eq!(dashboard.counts.total, 26);
    }
}

#[tokio::test]
async fn dashboard_counts_track_statuses() {
    let repo = InMemoryRepository::new();
    let owner = faculty(1, "CS", "Engineering");
    let head = cluster_head(2, "CS", "Engineering");

    let a = submit(&repo, &owner, "A").await;
    let b = submit(&repo, &owner, "B").await;
    submit(&repo, &owner, "C").await;

    submit_review(&repo, &head, a.id, review("approved", "")).await.unwrap();
    submit_review(&repo, &head, b.id, review("rejected", "")).await.unwrap();

    let dashboard = review_dashboard(&repo, &head, &SubmissionFilter::default(), 1)
        .await
        .unwrap();
    assert_eq!(dashboard.counts.total, 3);
    assert_eq!(dashboard.counts.pending, 1);
    assert_eq!(dashboard.counts.approved, 1);
    assert_eq!(dashboard.counts.rejected, 1);
    assert_eq!(dashboard.counts.under_review, 0);

    let pending_only = SubmissionFilter::only_status(Some(SubmissionStatus::Pending));
    let dashboard = review_dashboard(&repo, &head, &pending_only, 1).await.unwrap();
    assert_eq!(dashboard.page.items.len(), 1);
    assert_eq!(dashboard.counts.total, 3);
}

#[tokio::test]
async fn my_submissions_are_owner_scoped() {
    let repo = InMemoryRepository::new();
    let me = faculty(1, "CS", "Engineering");
    let colleague = faculty(2, "CS", "Engineering");
    let head = cluster_head(3, "CS", "Engineering");

    let first = submit(&repo, &me, "Mine 1").await;
    submit(&repo, &me, "Mine 2").await;
    submit(&repo, &colleague, "Theirs").await;
    submit_review(&repo, &head, first.id, review("approved", "")).await.unwrap();

    let page = my_submissions(&repo, &me, None, 1).await.unwrap();
    assert_eq!(page.total_items, 2);
    assert!(page.items.iter().all(|s| s.owner_id == me.id));

    let approved = my_submissions(&repo, &me, Some(SubmissionStatus::Approved), 1)
        .await
        .unwrap();
    assert_eq!(approved.items.len(), 1);
    assert_eq!(approved.items[0].id, first.id);
}

#[tokio::test]
async fn later_review_overwrites_earlier_one() {
    let repo = InMemoryRepository::new();
    let owner = faculty(1, "CS", "Engineering");
    let head = cluster_head(2, "CS", "Engineering");
    let dean = dean(3, "Engineering");
    let submission = submit(&repo, &owner, "Contested").await;

    submit_review(&repo, &head, submission.id, review("approved", "fine"))
        .await
        .unwrap();
    let (updated, _) = submit_review(&repo, &dean, submission.id, review("rejected", "not fine"))
        .await
        .unwrap();

    assert_eq!(updated.status, SubmissionStatus::Rejected);
    assert_eq!(updated.review.map(|s| s.reviewed_by), Some(dean.id));
    assert_eq!(repo.review_entries(submission.id).await.unwrap().len(), 2);
}
