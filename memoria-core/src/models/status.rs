use serde::{Deserialize, Serialize};

/// Item lifecycle status (§3). Orthogonal to ghosting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Active,
    Archived,
    Deleted,
}

impl Status {
    /// Only `active` items may surface from retrieval (§3 invariants).
    pub fn is_retrievable(self) -> bool {
        matches!(self, Status::Active)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Active => "active",
            Status::Archived => "archived",
            Status::Deleted => "deleted",
        }
    }
}
