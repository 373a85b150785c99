use serde::{Deserialize, Serialize};
use std::fmt;

/// A recurring or one-off activity definition created by a parent.
///
/// Timestamps are local wall-clock time with minute precision
/// (`YYYY-MM-DDTHH:MM:00`), never UTC-normalized. Day bucketing depends on
/// this contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskTemplate {
    /// Template ID in format: "template::<epoch_millis>"
    pub id: String,
    /// ID of the child this activity is assigned to
    pub child_id: String,
    pub title: String,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub description: Option<String>,
    pub category: TaskCategory,
    /// Local-time start (`YYYY-MM-DDTHH:MM:00`)
    pub start: String,
    /// Local-time end (`YYYY-MM-DDTHH:MM:00`)
    pub end: String,
    pub repeat: RepeatRule,
    /// Reminder offsets in minutes before start
    pub reminders: Vec<u32>,
    pub is_active: bool,
    /// RFC 3339 timestamp
    pub created_at: String,
    /// RFC 3339 timestamp
    pub updated_at: String,
}

/// How a task template recurs when expanded into dated instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RepeatRule {
    #[default]
    None,
    Daily,
    Weekly,
}

/// Coarse time-of-day grouping used by the settings screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskCategory {
    Morning,
    Afternoon,
    Evening,
    Custom,
}

/// A display-ready task occurrence on a specific calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarTask {
    /// Instance ID: the template ID for one-off tasks, or
    /// "<template_id>@<YYYY-MM-DD>" for synthesized recurring occurrences
    pub id: String,
    pub task_id: String,
    pub title: String,
    pub color: Option<String>,
    pub icon: Option<String>,
    /// Local-time start (`YYYY-MM-DDTHH:MM:00`)
    pub start: String,
    /// Local-time end (`YYYY-MM-DDTHH:MM:00`)
    pub end: String,
    pub done: bool,
    pub done_at: Option<String>,
    /// Resolved assignee; None means the task is visible to every view
    pub assignee_profile_id: Option<String>,
}

/// A single day in a calendar response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarDay {
    /// YYYY-MM-DD
    pub date: String,
    /// 0 = Sunday, 1 = Monday, ..., 6 = Saturday
    pub day_of_week: u32,
    pub is_today: bool,
    pub tasks: Vec<CalendarTask>,
}

/// A Monday-started week of day buckets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarWeek {
    /// YYYY-MM-DD (Monday)
    pub week_start: String,
    /// YYYY-MM-DD (Sunday)
    pub week_end: String,
    pub week_number: u32,
    pub days: Vec<CalendarDay>,
}

/// A month of weeks, padded to full Monday-started weeks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarMonth {
    pub month: u32,
    pub year: u32,
    pub total_days: u32,
    pub weeks: Vec<CalendarWeek>,
}

/// Classification of a task relative to the caller-supplied "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeStatus {
    Past,
    Current,
    Upcoming,
}

/// A task annotated for the "current time window" view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeWindowTask {
    #[serde(flatten)]
    pub task: CalendarTask,
    pub time_status: TimeStatus,
    /// Signed minutes from "now" to the task's start (negative when started)
    pub minutes_from_now: i64,
}

/// Aggregate counts for the time-window view header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeWindowSummary {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub current: usize,
    pub upcoming: usize,
}

/// Response for the "current time window" view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentTimeWindowResponse {
    /// Local-time timestamp the classification was computed against
    pub current_time: String,
    /// YYYY-MM-DD
    pub current_date: String,
    pub window_start: String,
    pub window_end: String,
    pub tasks: Vec<TimeWindowTask>,
    pub summary: TimeWindowSummary,
    /// True when the primary source was unavailable and demo data was served
    pub degraded: bool,
}

/// Raw task occurrence as received at the calendar boundary, before
/// normalization. Field names differ between producers: some carry a full
/// `start`/`end` timestamp, others a `date` plus `start_time`/`end_time`
/// pair; the assignee may arrive as `assignee_profile_id` or `child_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawInstance {
    pub id: String,
    #[serde(default)]
    pub task_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    /// YYYY-MM-DD; authoritative for bucketing when present
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    /// HH:MM, combined with `date` when no full timestamp is given
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub done_at: Option<String>,
    #[serde(default)]
    pub assignee_profile_id: Option<String>,
    #[serde(default)]
    pub child_id: Option<String>,
}

/// One day of a nested calendar payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPayload {
    /// YYYY-MM-DD
    pub date: String,
    pub tasks: Vec<RawInstance>,
}

/// Nested week/day calendar payload shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekPayload {
    #[serde(default)]
    pub week_start: Option<String>,
    pub days: Vec<DayPayload>,
}

/// The two payload shapes the calendar boundary accepts: a flat instance
/// list, or a week/day nested structure. Resolved once at the boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CalendarPayload {
    Flat(Vec<RawInstance>),
    Nested(WeekPayload),
}

/// Request body for PATCH /calendar/:instance_id/done
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetDoneRequest {
    pub done: bool,
}

/// Response after toggling a task instance's done state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetDoneResponse {
    /// YYYY-MM-DD of the affected instance
    pub date: String,
    pub instance: CalendarTask,
    /// Updated balance for the assignee, when one could be resolved
    pub points: Option<RewardPoints>,
    /// False when the write only reached in-memory state for this session
    pub persisted: bool,
}

/// A child profile within a family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildProfile {
    /// Profile ID in format: "profile::<epoch_millis>"
    pub id: String,
    pub name: String,
    pub avatar_id: String,
    pub age: Option<u32>,
    /// RFC 3339 timestamp
    pub created_at: String,
}

/// The top-level grouping of child profiles sharing a calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Family {
    pub id: String,
    pub parent_name: String,
    pub children: Vec<ChildProfile>,
    /// RFC 3339 timestamp
    pub created_at: String,
}

/// Request for creating a new family during setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateFamilyRequest {
    pub parent_name: String,
    pub number_of_children: u32,
}

/// Request for adding a child to the active family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddChildRequest {
    pub name: String,
    pub age: Option<u32>,
    pub avatar_id: Option<String>,
}

/// Request for updating an existing child profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateChildRequest {
    pub name: Option<String>,
    pub age: Option<u32>,
    pub avatar_id: Option<String>,
}

/// Request for selecting the active child (None = parent mode, all visible).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectChildRequest {
    pub child_id: Option<String>,
}

/// Response after selecting the active child.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectChildResponse {
    pub selected_child: Option<ChildProfile>,
}

/// Per-child reward accumulator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardPoints {
    pub child_id: String,
    pub child_name: String,
    pub total_points: u32,
    pub daily_points: u32,
    pub tasks_completed: u32,
}

/// Reward balance plus derived star tiering for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardSummary {
    pub points: RewardPoints,
    pub stars: u32,
    pub points_to_next_star: u32,
}

/// A color palette belonging to an avatar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorPalette {
    pub name: String,
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub background: String,
    pub surface: String,
    pub text: String,
    pub gradient: String,
    pub shadow: String,
}

/// A selectable kid avatar with its palette.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KidAvatar {
    pub id: String,
    pub name: String,
    pub emoji: String,
    pub category: AvatarCategory,
    pub palette: ColorPalette,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AvatarCategory {
    Animals,
    Fantasy,
    Classic,
    Nature,
}

/// Theme values derived from a profile's avatar palette. Applying these to
/// any given UI is the rendering layer's responsibility; activating a
/// profile only produces this descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeDescriptor {
    pub profile_id: Option<String>,
    pub avatar_id: String,
    pub palette: ColorPalette,
}

/// Response after activating a kid profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivateProfileResponse {
    pub profile: ChildProfile,
    pub theme: ThemeDescriptor,
}

/// Request for creating a task template via the settings screens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTemplateRequest {
    pub child_id: String,
    pub title: String,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub description: Option<String>,
    pub category: TaskCategory,
    pub start: String,
    pub end: String,
    #[serde(default)]
    pub repeat: RepeatRule,
    #[serde(default)]
    pub reminders: Vec<u32>,
}

/// Request for updating a task template; absent fields are left unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateTemplateRequest {
    pub title: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub description: Option<String>,
    pub category: Option<TaskCategory>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub repeat: Option<RepeatRule>,
    pub reminders: Option<Vec<u32>>,
    pub is_active: Option<bool>,
}

impl TaskTemplate {
    /// Generate a template ID from a timestamp
    pub fn generate_id(epoch_millis: u64) -> String {
        format!("template::{}", epoch_millis)
    }
}

impl ChildProfile {
    /// Generate a profile ID from a timestamp
    pub fn generate_id(epoch_millis: u64) -> String {
        format!("profile::{}", epoch_millis)
    }
}

/// Build the synthesized ID of a recurring occurrence:
/// `<template_id>@<YYYY-MM-DD>`.
pub fn instance_id(template_id: &str, day: &str) -> String {
    format!("{}@{}", template_id, day)
}

/// Split an instance ID back into (template_id, day).
///
/// One-off instances reuse the template ID verbatim, so an ID without a
/// separator yields the whole ID and no day.
pub fn split_instance_id(id: &str) -> (&str, Option<&str>) {
    match id.rsplit_once('@') {
        Some((template_id, day)) => (template_id, Some(day)),
        None => (id, None),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InstanceIdError {
    InvalidFormat,
    InvalidDate,
}

impl fmt::Display for InstanceIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstanceIdError::InvalidFormat => write!(f, "Invalid instance ID format"),
            InstanceIdError::InvalidDate => write!(f, "Invalid date in instance ID"),
        }
    }
}

impl std::error::Error for InstanceIdError {}

/// Parse an instance ID, validating the date half when present.
pub fn parse_instance_id(id: &str) -> Result<(String, Option<String>), InstanceIdError> {
    if id.is_empty() {
        return Err(InstanceIdError::InvalidFormat);
    }
    match id.rsplit_once('@') {
        Some((template_id, day)) => {
            if template_id.is_empty() {
                return Err(InstanceIdError::InvalidFormat);
            }
            if chrono::NaiveDate::parse_from_str(day, "%Y-%m-%d").is_err() {
                return Err(InstanceIdError::InvalidDate);
            }
            Ok((template_id.to_string(), Some(day.to_string())))
        }
        None => Ok((id.to_string(), None)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_template_id() {
        assert_eq!(
            TaskTemplate::generate_id(1702516122000),
            "template::1702516122000"
        );
    }

    #[test]
    fn test_generate_profile_id() {
        assert_eq!(
            ChildProfile::generate_id(1702516122000),
            "profile::1702516122000"
        );
    }

    #[test]
    fn test_instance_id_round_trip() {
        let id = instance_id("template::123", "2025-09-15");
        assert_eq!(id, "template::123@2025-09-15");

        let (template_id, day) = split_instance_id(&id);
        assert_eq!(template_id, "template::123");
        assert_eq!(day, Some("2025-09-15"));
    }

    #[test]
    fn test_split_one_off_instance_id() {
        // One-off instances carry the template ID unchanged
        let (template_id, day) = split_instance_id("template::123");
        assert_eq!(template_id, "template::123");
        assert_eq!(day, None);
    }

    #[test]
    fn test_parse_instance_id() {
        let (template_id, day) = parse_instance_id("template::123@2025-09-15").unwrap();
        assert_eq!(template_id, "template::123");
        assert_eq!(day.as_deref(), Some("2025-09-15"));

        // Whole-ID form is valid
        let (template_id, day) = parse_instance_id("template::123").unwrap();
        assert_eq!(template_id, "template::123");
        assert_eq!(day, None);

        // Invalid date half
        assert_eq!(
            parse_instance_id("template::123@not-a-date"),
            Err(InstanceIdError::InvalidDate)
        );

        // Empty template half
        assert_eq!(
            parse_instance_id("@2025-09-15"),
            Err(InstanceIdError::InvalidFormat)
        );

        assert_eq!(parse_instance_id(""), Err(InstanceIdError::InvalidFormat));
    }

    #[test]
    fn test_calendar_payload_shape_detection() {
        // Flat shape: a bare array of instances
        let flat = serde_json::json!([
            { "id": "template::1@2025-09-15", "date": "2025-09-15", "done": false }
        ]);
        let payload: CalendarPayload = serde_json::from_value(flat).unwrap();
        assert!(matches!(payload, CalendarPayload::Flat(ref v) if v.len() == 1));

        // Nested shape: an object wrapping per-day task arrays
        let nested = serde_json::json!({
            "week_start": "2025-09-15",
            "days": [
                { "date": "2025-09-15", "tasks": [ { "id": "a", "done": true } ] }
            ]
        });
        let payload: CalendarPayload = serde_json::from_value(nested).unwrap();
        match payload {
            CalendarPayload::Nested(week) => {
                assert_eq!(week.days.len(), 1);
                assert!(week.days[0].tasks[0].done);
            }
            _ => panic!("expected nested payload"),
        }
    }

    #[test]
    fn test_repeat_rule_wire_format() {
        assert_eq!(
            serde_json::to_string(&RepeatRule::Daily).unwrap(),
            "\"daily\""
        );
        let rule: RepeatRule = serde_json::from_str("\"weekly\"").unwrap();
        assert_eq!(rule, RepeatRule::Weekly);
    }
}
