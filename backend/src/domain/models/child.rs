use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Domain model for a child profile within a family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildProfile {
    pub id: String,
    pub name: String,
    pub avatar_id: String,
    pub age: Option<u32>,
    pub created_at: DateTime<Utc>,
}

impl ChildProfile {
    /// Generate a unique ID for a child profile
    pub fn generate_id(timestamp_millis: u64) -> String {
        format!("profile::{}", timestamp_millis)
    }
}

/// Domain model for a family: the top-level grouping of child profiles
/// sharing one calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Family {
    pub id: String,
    pub parent_name: String,
    pub children: Vec<ChildProfile>,
    pub created_at: DateTime<Utc>,
}

impl Family {
    pub fn child(&self, child_id: &str) -> Option<&ChildProfile> {
        self.children.iter().find(|c| c.id == child_id)
    }
}
