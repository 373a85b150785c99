//! Recurrence expansion: turning task templates into concrete dated
//! instances for a queried range.
//!
//! Instances are derived state. They are recomputed for every query and
//! never stored; only the completion overlay (see `completion_service`)
//! survives across queries.

use chrono::NaiveDateTime;
use log::debug;

use crate::domain::dates;
use crate::domain::models::task::{Repeat, TaskInstance, TaskTemplate};

/// Hard cap on how far past its start a template is expanded, bounding
/// output size regardless of the queried range.
pub const RECURRENCE_HORIZON_DAYS: i64 = 90;

/// Service that expands task templates into dated instances.
#[derive(Clone)]
pub struct SchedulerService;

impl SchedulerService {
    pub fn new() -> Self {
        Self
    }

    /// Expand a single template over `[range_start, range_end]` (inclusive).
    ///
    /// Non-repeating templates are emitted unchanged as a single instance,
    /// keeping the template's own ID, when their start lies in range by
    /// plain timestamp comparison (not day-boundary aware). Recurring
    /// templates step forward from `template.start` by 1 or 7 days, bounded
    /// by `min(range_end, start + 90 days)`; each occurrence preserves the
    /// template's duration and gets the ID `<template_id>@<YYYY-MM-DD>`.
    ///
    /// Output is not sorted; ordering within a day is the bucketing step's
    /// responsibility. An inverted template (end before start) flows
    /// through as a negative-duration instance.
    pub fn expand(
        &self,
        template: &TaskTemplate,
        range_start: NaiveDateTime,
        range_end: NaiveDateTime,
    ) -> Vec<TaskInstance> {
        let step = match template.repeat.step_days() {
            None => {
                if template.start >= range_start && template.start <= range_end {
                    return vec![self.instance_at(template, template.start, template.id.clone())];
                }
                return Vec::new();
            }
            Some(step) => step,
        };

        let horizon = dates::add_days(template.start, RECURRENCE_HORIZON_DAYS);
        let limit = horizon.min(range_end);
        let mut out = Vec::new();
        let mut cursor = template.start;

        while cursor <= limit {
            if cursor >= range_start {
                let id = shared::instance_id(&template.id, &dates::day_key(cursor));
                out.push(self.instance_at(template, cursor, id));
            }
            cursor = dates::add_days(cursor, step);
        }

        debug!(
            "Expanded template {} ({:?}) into {} instances",
            template.id,
            template.repeat,
            out.len()
        );
        out
    }

    /// Expand every active template in the slice over the range.
    pub fn expand_all(
        &self,
        templates: &[TaskTemplate],
        range_start: NaiveDateTime,
        range_end: NaiveDateTime,
    ) -> Vec<TaskInstance> {
        templates
            .iter()
            .filter(|t| t.is_active)
            .flat_map(|t| self.expand(t, range_start, range_end))
            .collect()
    }

    fn instance_at(&self, template: &TaskTemplate, start: NaiveDateTime, id: String) -> TaskInstance {
        let span = template.end - template.start;
        TaskInstance {
            id,
            template_id: template.id.clone(),
            assignee_id: Some(template.child_id.clone()),
            title: template.title.clone(),
            color: template.color.clone(),
            icon: template.icon.clone(),
            start,
            end: start + span,
            done: false,
            done_at: None,
        }
    }
}

impl Default for SchedulerService {
    fn default() -> Self {
        Self::new()
    }
}
