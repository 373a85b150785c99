use serde::{Deserialize, Serialize};

/// Per-child reward accumulator, persisted across sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardPoints {
    pub child_id: String,
    pub child_name: String,
    pub total_points: u32,
    pub daily_points: u32,
    pub tasks_completed: u32,
}

impl RewardPoints {
    pub fn new(child_id: impl Into<String>, child_name: impl Into<String>) -> Self {
        Self {
            child_id: child_id.into(),
            child_name: child_name.into(),
            total_points: 0,
            daily_points: 0,
            tasks_completed: 0,
        }
    }
}
