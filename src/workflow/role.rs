use serde::{Deserialize, Serialize};

use super::visibility::ReviewScope;

/// Portal role of an authenticated user.
///
/// Scoped roles carry the unit they review, so a cluster head without a
/// department cannot be represented. Profiles that lack the unit resolve
/// to [`Role::Faculty`] when loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Role {
    Faculty,
    ClusterHead { department: String },
    Dean { school: String },
    Admin,
}

impl Role {
    /// Resolve a stored role tag together with the profile's unit fields.
    pub fn resolve(tag: &str, department: Option<&str>, school: Option<&str>) -> Role {
        let unit = |value: Option<&str>| {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        match tag {
            "cluster_head" => match unit(department) {
                Some(department) => Role::ClusterHead { department },
                None => {
                    tracing::warn!("cluster_head profile without department, treating as faculty");
                    Role::Faculty
                }
            },
            "dean" => match unit(school) {
                Some(school) => Role::Dean { school },
                None => {
                    tracing::warn!("dean profile without school, treating as faculty");
                    Role::Faculty
                }
            },
            "admin" => Role::Admin,
            _ => Role::Faculty,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Role::Faculty => "faculty",
            Role::ClusterHead { .. } => "cluster_head",
            Role::Dean { .. } => "dean",
            Role::Admin => "admin",
        }
    }

    pub fn can_review_submissions(&self) -> bool {
        !matches!(self, Role::Faculty)
    }

    /// The set of submissions this role may review, or `None` when the role
    /// has no review capability at all.
    pub fn review_scope(&self) -> Option<ReviewScope> {
        match self {
            Role::Faculty => None,
            Role::ClusterHead { department } => Some(ReviewScope::Department(department.clone())),
            Role::Dean { school } => Some(ReviewScope::School(school.clone())),
            Role::Admin => Some(ReviewScope::All),
        }
    }
}

/// An authenticated portal user acting on submissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: i64,
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub department: Option<String>,
    pub school: Option<String>,
    pub role: Role,
}

impl Actor {
    pub fn can_review_submissions(&self) -> bool {
        self.role.can_review_submissions()
    }

    pub fn review_scope(&self) -> Option<ReviewScope> {
        self.role.review_scope()
    }

    pub fn display_name(&self) -> &str {
        if self.full_name.trim().is_empty() {
            &self.username
        } else {
            &self.full_name
        }
    }
}
