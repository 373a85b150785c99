//! Calendar assembly: normalizing heterogeneous task payloads into
//! day-keyed buckets and building week/month views from them.
//!
//! Two payload shapes reach the boundary: a flat instance list and a
//! week/day nested structure. Both are resolved into the same flat form
//! here, once, rather than branching throughout the business logic. Day
//! buckets are derived state: they are rebuilt from templates and the
//! completion overlay on every query and are never the source of truth.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::{Datelike, Duration, NaiveDate};
use log::{info, warn};

use shared::{CalendarPayload, RawInstance};

use crate::domain::dates;
use crate::domain::errors::CalendarError;
use crate::domain::mock_calendar;
use crate::domain::models::task::{CompletionRecord, TaskInstance};
use crate::domain::scheduler_service::SchedulerService;
use crate::storage::csv::{CsvConnection, FamilyRepository, TemplateRepository};
use crate::storage::traits::{FamilyStorage, TemplateStorage};

/// Day-keyed (`YYYY-MM-DD`) map of instances, each day ascending by start.
pub type DayBuckets = BTreeMap<String, Vec<TaskInstance>>;

/// Buckets for a queried range, with a flag noting whether the primary
/// source was unavailable and demo data was served instead.
#[derive(Debug, Clone)]
pub struct RangeAssembly {
    pub buckets: DayBuckets,
    pub degraded: bool,
}

/// Maps domain instances to the display-ready DTO form.
pub struct InstanceMapper;

impl InstanceMapper {
    pub fn to_dto(instance: &TaskInstance) -> shared::CalendarTask {
        shared::CalendarTask {
            id: instance.id.clone(),
            task_id: instance.template_id.clone(),
            title: instance.title.clone(),
            color: instance.color.clone(),
            icon: instance.icon.clone(),
            start: dates::format_iso(instance.start),
            end: dates::format_iso(instance.end),
            done: instance.done,
            done_at: instance.done_at.map(dates::format_iso),
            assignee_profile_id: instance.assignee_id.clone(),
        }
    }
}

/// Calendar service that assembles day buckets and calendar views.
#[derive(Clone)]
pub struct CalendarService {
    template_repository: TemplateRepository,
    family_repository: FamilyRepository,
    scheduler: SchedulerService,
}

impl CalendarService {
    pub fn new(csv_conn: Arc<CsvConnection>) -> Self {
        Self {
            template_repository: TemplateRepository::new((*csv_conn).clone()),
            family_repository: FamilyRepository::new((*csv_conn).clone()),
            scheduler: SchedulerService::new(),
        }
    }

    /// Load and assemble the buckets for `[start, end]` inclusive.
    ///
    /// The primary source is the template store plus the recurrence
    /// expander. When it cannot be read the failure is logged and demo
    /// buckets are generated instead; callers never see a hard error.
    pub fn load_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        overlay: &HashMap<String, CompletionRecord>,
    ) -> RangeAssembly {
        match self.try_load(start, end, overlay) {
            Ok(buckets) => RangeAssembly {
                buckets,
                degraded: false,
            },
            Err(e) => {
                warn!(
                    "🗓️ Calendar source unavailable ({}), serving demo data for {}..{}",
                    e, start, end
                );
                let children = match self.family_repository.load_family() {
                    Ok(Some(family)) => family.children,
                    _ => mock_calendar::placeholder_children(),
                };
                RangeAssembly {
                    buckets: mock_calendar::demo_buckets(&children, start, end),
                    degraded: true,
                }
            }
        }
    }

    fn try_load(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        overlay: &HashMap<String, CompletionRecord>,
    ) -> Result<DayBuckets, CalendarError> {
        let templates = self
            .template_repository
            .list_templates()
            .map_err(|e| CalendarError::SourceUnavailable(e.to_string()))?;
        let (range_start, range_end) = dates::day_span_bounds(start, end);

        let mut instances = self.scheduler.expand_all(&templates, range_start, range_end);
        for instance in &mut instances {
            if let Some(record) = overlay.get(&instance.id) {
                instance.done = true;
                instance.done_at = Some(record.done_at);
            }
        }

        info!(
            "🗓️ Assembled {} instances from {} templates for {}..{}",
            instances.len(),
            templates.len(),
            start,
            end
        );

        Ok(bucket_instances(instances, start, end))
    }

    /// Build the week view containing `anchor` from already-loaded buckets.
    pub fn assemble_week(
        &self,
        buckets: &DayBuckets,
        anchor: NaiveDate,
        today: NaiveDate,
    ) -> shared::CalendarWeek {
        let monday = dates::week_start(anchor);
        let days = dates::week_days(anchor)
            .into_iter()
            .map(|date| self.assemble_day(buckets, &date, today))
            .collect();

        shared::CalendarWeek {
            week_start: dates::date_key(monday),
            week_end: dates::date_key(monday + Duration::days(6)),
            week_number: monday.iso_week().week(),
            days,
        }
    }

    /// Build a single day's view; a missing day yields an empty task list,
    /// never an error.
    pub fn assemble_day(
        &self,
        buckets: &DayBuckets,
        date: &str,
        today: NaiveDate,
    ) -> shared::CalendarDay {
        let tasks = buckets
            .get(date)
            .map(|list| list.iter().map(InstanceMapper::to_dto).collect())
            .unwrap_or_default();
        let day_of_week = dates::parse_day_key(date)
            .map(|d| d.weekday().num_days_from_sunday())
            .unwrap_or(0);

        shared::CalendarDay {
            date: date.to_string(),
            day_of_week,
            is_today: dates::parse_day_key(date) == Some(today),
            tasks,
        }
    }

    /// Build the month view from already-loaded buckets, padded to full
    /// Monday-started weeks.
    pub fn assemble_month(
        &self,
        buckets: &DayBuckets,
        month: u32,
        year: u32,
        today: NaiveDate,
    ) -> Option<shared::CalendarMonth> {
        let total_days = dates::days_in_month(month, year);
        let first = NaiveDate::from_ymd_opt(year as i32, month, 1)?;
        let last = NaiveDate::from_ymd_opt(year as i32, month, total_days)?;

        let mut weeks = Vec::new();
        let mut monday = dates::week_start(first);
        while monday <= last {
            weeks.push(self.assemble_week(buckets, monday, today));
            monday += Duration::days(7);
        }

        Some(shared::CalendarMonth {
            month,
            year,
            total_days,
            weeks,
        })
    }
}

/// Bucket locally produced instances by the local calendar day of their
/// start, keeping only days within `[start, end]`.
pub fn bucket_instances(instances: Vec<TaskInstance>, start: NaiveDate, end: NaiveDate) -> DayBuckets {
    let mut buckets = DayBuckets::new();

    for instance in instances {
        let key = dates::day_key(instance.start);
        match dates::parse_day_key(&key) {
            Some(day) if day >= start && day <= end => {
                buckets.entry(key).or_insert_with(Vec::new).push(instance);
            }
            _ => {}
        }
    }

    sort_buckets(&mut buckets);
    buckets
}

/// Normalize a payload of either shape into day buckets for `[start, end]`.
///
/// The bucket key comes from an instance's own `date` field when present;
/// otherwise it is derived from the start timestamp by local field
/// extraction. Instances with no resolvable assignee are kept as
/// unassigned. Re-bucketing an already-bucketed set yields the same keys
/// and per-day ordering.
pub fn build_day_buckets(payload: CalendarPayload, start: NaiveDate, end: NaiveDate) -> DayBuckets {
    let mut buckets = DayBuckets::new();

    let pairs: Vec<(String, TaskInstance)> = match payload {
        CalendarPayload::Flat(raw) => raw
            .iter()
            .filter_map(|r| normalize_raw(r, None))
            .collect(),
        CalendarPayload::Nested(week) => week
            .days
            .iter()
            .flat_map(|day| {
                day.tasks
                    .iter()
                    .filter_map(move |r| normalize_raw(r, Some(day.date.as_str())))
            })
            .collect(),
    };

    for (key, instance) in pairs {
        match dates::parse_day_key(&key) {
            Some(day) if day >= start && day <= end => {
                buckets.entry(key).or_insert_with(Vec::new).push(instance);
            }
            Some(_) => {}
            None => warn!("🗓️ Dropping instance {} with bad day key {}", instance.id, key),
        }
    }

    sort_buckets(&mut buckets);
    buckets
}

fn sort_buckets(buckets: &mut DayBuckets) {
    for list in buckets.values_mut() {
        // sort_by_key is stable, so same-start ties keep arrival order
        list.sort_by_key(|t| t.start);
    }
}

/// Resolve one raw instance into its bucket key and normalized form.
///
/// Start is taken from the full `start` timestamp when parseable, else
/// combined from the date (own field or the enclosing day) and
/// `start_time`, defaulting to 00:00/00:30 like the upstream producers.
/// Returns None when no date information resolves at all.
fn normalize_raw(raw: &RawInstance, day_hint: Option<&str>) -> Option<(String, TaskInstance)> {
    let date_field = raw.date.as_deref().or(day_hint);

    let start = raw
        .start
        .as_deref()
        .and_then(dates::parse_iso)
        .or_else(|| {
            date_field.and_then(|d| dates::combine(d, raw.start_time.as_deref().unwrap_or("00:00")))
        })?;
    let end = raw
        .end
        .as_deref()
        .and_then(dates::parse_iso)
        .or_else(|| {
            date_field.and_then(|d| dates::combine(d, raw.end_time.as_deref().unwrap_or("00:30")))
        })
        .unwrap_or_else(|| start + Duration::minutes(30));

    let key = match date_field {
        Some(d) => d.to_string(),
        None => dates::day_key(start),
    };

    // Assignee resolution order: assignee_profile_id, then child_id;
    // neither present leaves the instance unassigned but included
    let assignee_id = raw
        .assignee_profile_id
        .clone()
        .or_else(|| raw.child_id.clone());

    let template_id = raw
        .task_id
        .clone()
        .unwrap_or_else(|| shared::split_instance_id(&raw.id).0.to_string());

    Some((
        key,
        TaskInstance {
            id: raw.id.clone(),
            template_id,
            assignee_id,
            title: raw.title.clone().unwrap_or_else(|| "Untitled task".to_string()),
            color: raw.color.clone(),
            icon: raw.icon.clone(),
            start,
            end,
            done: raw.done,
            done_at: raw.done_at.as_deref().and_then(dates::parse_iso),
        },
    ))
}
