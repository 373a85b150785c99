//! View narrowing: deriving the subset of loaded buckets to display for
//! the active view mode and child selection.
//!
//! Parent mode (no active child) sees everything, including unassigned
//! instances; a specific child filter passes only instances whose resolved
//! assignee matches, so unassigned instances can never appear in child
//! mode.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::domain::calendar_service::DayBuckets;
use crate::domain::dates;
use crate::domain::models::task::TaskInstance;

/// Half-width of the "current time window" reported alongside the now
/// view.
const WINDOW_HOURS: i64 = 2;

/// The active display mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Day,
    Week,
    Now,
}

/// Classification of an instance relative to "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeStatus {
    Past,
    Current,
    Upcoming,
}

/// An instance annotated for the now view.
#[derive(Debug, Clone, PartialEq)]
pub struct NowTask {
    pub instance: TaskInstance,
    pub time_status: TimeStatus,
    /// Signed minutes from now to the instance's start
    pub minutes_from_now: i64,
}

/// Aggregate counts for the now view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WindowSummary {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub current: usize,
    pub upcoming: usize,
}

/// The now view: a flat annotated list, not day-bucketed.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentTimeWindow {
    pub now: NaiveDateTime,
    pub window_start: NaiveDateTime,
    pub window_end: NaiveDateTime,
    pub tasks: Vec<NowTask>,
    pub summary: WindowSummary,
}

/// Result of narrowing: day/week keep the bucket shape, the now view is a
/// flat time-ordered list.
#[derive(Debug, Clone, PartialEq)]
pub enum VisibleTasks {
    Buckets(DayBuckets),
    Window(CurrentTimeWindow),
}

/// Service deriving display subsets from loaded buckets.
#[derive(Clone)]
pub struct ViewService;

impl ViewService {
    pub fn new() -> Self {
        Self
    }

    /// Narrow loaded buckets to the active view.
    ///
    /// `Week` returns every loaded day; `Day` returns only the bucket for
    /// `active_date`, synthesizing an empty one when absent; `Now` ignores
    /// day boundaries and classifies every loaded instance against `now`.
    /// When `active_child` is set every returned collection is filtered to
    /// that child's instances.
    pub fn select_visible_days(
        &self,
        buckets: &DayBuckets,
        view_mode: ViewMode,
        active_date: NaiveDate,
        now: NaiveDateTime,
        active_child: Option<&str>,
    ) -> VisibleTasks {
        match view_mode {
            ViewMode::Week => {
                let narrowed = buckets
                    .iter()
                    .map(|(key, list)| (key.clone(), filter_child(list, active_child)))
                    .collect();
                VisibleTasks::Buckets(narrowed)
            }
            ViewMode::Day => {
                let key = dates::date_key(active_date);
                let list = buckets
                    .get(&key)
                    .map(|list| filter_child(list, active_child))
                    .unwrap_or_default();
                let mut narrowed = DayBuckets::new();
                narrowed.insert(key, list);
                VisibleTasks::Buckets(narrowed)
            }
            ViewMode::Now => VisibleTasks::Window(self.now_window(buckets, now, active_child)),
        }
    }

    /// Classify every loaded instance against `now`, returning a flat list
    /// ordered by start plus summary counts. The reported window is
    /// presentational: classification itself scans all loaded days.
    pub fn now_window(
        &self,
        buckets: &DayBuckets,
        now: NaiveDateTime,
        active_child: Option<&str>,
    ) -> CurrentTimeWindow {
        let mut tasks: Vec<NowTask> = buckets
            .values()
            .flatten()
            .filter(|i| matches_child(i, active_child))
            .map(|instance| {
                let time_status = classify(instance, now);
                NowTask {
                    minutes_from_now: (instance.start - now).num_minutes(),
                    time_status,
                    instance: instance.clone(),
                }
            })
            .collect();
        tasks.sort_by_key(|t| t.instance.start);

        let summary = WindowSummary {
            total: tasks.len(),
            completed: tasks.iter().filter(|t| t.instance.done).count(),
            pending: tasks.iter().filter(|t| !t.instance.done).count(),
            current: tasks
                .iter()
                .filter(|t| t.time_status == TimeStatus::Current)
                .count(),
            upcoming: tasks
                .iter()
                .filter(|t| t.time_status == TimeStatus::Upcoming)
                .count(),
        };

        CurrentTimeWindow {
            now,
            window_start: now - Duration::hours(WINDOW_HOURS),
            window_end: now + Duration::hours(WINDOW_HOURS),
            tasks,
            summary,
        }
    }

    /// Group now-view tasks by resolved assignee for parent-mode display.
    /// Unassigned instances land under "unassigned".
    pub fn group_by_child(&self, tasks: &[NowTask]) -> BTreeMap<String, Vec<NowTask>> {
        let mut groups: BTreeMap<String, Vec<NowTask>> = BTreeMap::new();
        for task in tasks {
            let key = task
                .instance
                .assignee_id
                .clone()
                .unwrap_or_else(|| "unassigned".to_string());
            groups.entry(key).or_default().push(task.clone());
        }
        groups
    }
}

impl Default for ViewService {
    fn default() -> Self {
        Self::new()
    }
}

fn matches_child(instance: &TaskInstance, active_child: Option<&str>) -> bool {
    match active_child {
        None => true,
        Some(child_id) => instance.assignee_id.as_deref() == Some(child_id),
    }
}

fn filter_child(list: &[TaskInstance], active_child: Option<&str>) -> Vec<TaskInstance> {
    list.iter()
        .filter(|i| matches_child(i, active_child))
        .cloned()
        .collect()
}

/// Done instances always classify as past; otherwise the instance is
/// current when now lies within [start, end], upcoming when its start is
/// still ahead, past otherwise.
fn classify(instance: &TaskInstance, now: NaiveDateTime) -> TimeStatus {
    if instance.done {
        TimeStatus::Past
    } else if instance.start <= now && now <= instance.end {
        TimeStatus::Current
    } else if instance.start > now {
        TimeStatus::Upcoming
    } else {
        TimeStatus::Past
    }
}
