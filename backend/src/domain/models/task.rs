use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// How often a template recurs when expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Repeat {
    #[default]
    None,
    Daily,
    Weekly,
}

impl Repeat {
    /// Step size in days between occurrences, when recurring.
    pub fn step_days(self) -> Option<i64> {
        match self {
            Repeat::None => None,
            Repeat::Daily => Some(1),
            Repeat::Weekly => Some(7),
        }
    }
}

/// Time-of-day grouping for the settings screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Morning,
    Afternoon,
    Evening,
    Custom,
}

/// Domain model for a recurring or one-off activity definition.
///
/// `start`/`end` are local wall-clock timestamps. Templates are immutable
/// with respect to expansion: instances are recomputed per query, never
/// stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskTemplate {
    pub id: String,
    pub child_id: String,
    pub title: String,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub description: Option<String>,
    pub category: Category,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub repeat: Repeat,
    /// Reminder offsets in minutes before start; stored but never scheduled
    /// here (notification delivery is a platform concern)
    pub reminders: Vec<u32>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TaskTemplate {
    /// Generate a unique ID for a template
    pub fn generate_id(timestamp_millis: u64) -> String {
        format!("template::{}", timestamp_millis)
    }
}

/// A concrete occurrence of a template on a specific calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskInstance {
    /// Template ID for one-off tasks, `<template_id>@<YYYY-MM-DD>` for
    /// synthesized recurring occurrences
    pub id: String,
    pub template_id: String,
    /// Resolved assignee; None = unassigned, visible in every view but
    /// never matching a specific child filter
    pub assignee_id: Option<String>,
    pub title: String,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub done: bool,
    pub done_at: Option<NaiveDateTime>,
}

impl TaskInstance {
    /// Signed duration in minutes (`end - start`).
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

/// Persisted record of a completed instance. Instances themselves are
/// recomputed per query, so this overlay is the source of truth for done
/// state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRecord {
    /// Assignee at completion time, when one was resolvable
    pub child_id: Option<String>,
    pub done_at: NaiveDateTime,
}
