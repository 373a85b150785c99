//! Completion tracking: toggling an instance's done state, stamping
//! completion times, and feeding the rewards accounting.
//!
//! Because instances are recomputed per query, done state lives in a
//! persisted overlay keyed by instance ID. The overlay row is written
//! before in-memory state and rewards are touched; when the write fails
//! the update still applies in-memory for the session and the outcome is
//! marked unpersisted.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::NaiveDateTime;
use log::{error, info};

use crate::domain::commands::completion::SetDoneCommand;
use crate::domain::dates;
use crate::domain::errors::CalendarError;
use crate::domain::models::rewards::RewardPoints;
use crate::domain::models::task::{CompletionRecord, TaskInstance, TaskTemplate};
use crate::domain::rewards_service::RewardsService;
use crate::storage::csv::{CompletionRepository, CsvConnection, FamilyRepository, TemplateRepository};
use crate::storage::traits::{CompletionStorage, FamilyStorage, TemplateStorage};

/// Result of a done-state toggle.
#[derive(Debug, Clone)]
pub struct SetDoneOutcome {
    /// YYYY-MM-DD of the affected occurrence
    pub date: String,
    /// The occurrence with the new done state applied
    pub instance: TaskInstance,
    /// Updated balance when an assignee could be resolved
    pub points: Option<RewardPoints>,
    /// False when the overlay write failed and state is session-only
    pub persisted: bool,
    /// False when the call was a no-op (state already as requested)
    pub changed: bool,
}

/// Service owning the completion overlay.
#[derive(Clone)]
pub struct CompletionService {
    completion_repository: CompletionRepository,
    template_repository: TemplateRepository,
    family_repository: FamilyRepository,
    rewards_service: RewardsService,
    overlay: Arc<Mutex<HashMap<String, CompletionRecord>>>,
}

impl CompletionService {
    pub fn new(csv_conn: Arc<CsvConnection>, rewards_service: RewardsService) -> Self {
        let completion_repository = CompletionRepository::new((*csv_conn).clone());
        let overlay = completion_repository.load_completions().unwrap_or_else(|e| {
            error!("Could not load completion overlay, starting empty: {}", e);
            HashMap::new()
        });
        Self {
            completion_repository,
            template_repository: TemplateRepository::new((*csv_conn).clone()),
            family_repository: FamilyRepository::new((*csv_conn).clone()),
            rewards_service,
            overlay: Arc::new(Mutex::new(overlay)),
        }
    }

    /// Snapshot of the overlay for calendar assembly.
    pub fn snapshot(&self) -> HashMap<String, CompletionRecord> {
        self.overlay.lock().unwrap().clone()
    }

    /// Toggle an instance's done state.
    ///
    /// Idempotent with respect to rewards: a second call with the same
    /// requested state is a no-op and cannot double-award or double-revoke
    /// points.
    pub fn set_done(
        &self,
        command: SetDoneCommand,
        now: NaiveDateTime,
    ) -> Result<SetDoneOutcome, CalendarError> {
        let (template_id, day) = shared::parse_instance_id(&command.instance_id)
            .map_err(|e| CalendarError::validation(e.to_string()))?;

        let template = self
            .template_repository
            .get_template(&template_id)
            .map_err(|e| CalendarError::Persistence(e.to_string()))?
            .ok_or_else(|| CalendarError::NotFound(format!("task instance {}", command.instance_id)))?;

        let mut instance = occurrence(&template, day.as_deref(), &command.instance_id);
        let date = day.unwrap_or_else(|| dates::day_key(instance.start));

        let (changed, done_at) = {
            let overlay = self.overlay.lock().unwrap();
            let existing = overlay.get(&command.instance_id);
            (
                existing.is_some() != command.done,
                existing.map(|r| r.done_at),
            )
        };

        if !changed {
            instance.done = command.done;
            instance.done_at = done_at;
            info!(
                "Instance {} already {}; nothing to do",
                command.instance_id,
                if command.done { "done" } else { "not done" }
            );
            return Ok(SetDoneOutcome {
                date,
                instance,
                points: None,
                persisted: true,
                changed: false,
            });
        }

        let persisted = {
            let mut overlay = self.overlay.lock().unwrap();
            if command.done {
                overlay.insert(
                    command.instance_id.clone(),
                    CompletionRecord {
                        child_id: instance.assignee_id.clone(),
                        done_at: now,
                    },
                );
            } else {
                overlay.remove(&command.instance_id);
            }
            match self.completion_repository.save_completions(&overlay) {
                Ok(()) => true,
                Err(e) => {
                    // Degrade to session-only state rather than failing the
                    // user's action
                    error!("Failed to persist completion overlay: {}", e);
                    false
                }
            }
        };

        instance.done = command.done;
        instance.done_at = command.done.then_some(now);

        let points = instance.assignee_id.as_deref().map(|child_id| {
            if command.done {
                let child_name = self.child_name(child_id);
                self.rewards_service.add_points_for_task(child_id, &child_name)
            } else {
                self.rewards_service
                    .remove_points_for_task(child_id)
                    .unwrap_or_else(|| RewardPoints::new(child_id, self.child_name(child_id)))
            }
        });

        info!(
            "Marked instance {} done={} (persisted={})",
            command.instance_id, command.done, persisted
        );

        Ok(SetDoneOutcome {
            date,
            instance,
            points,
            persisted,
            changed: true,
        })
    }

    fn child_name(&self, child_id: &str) -> String {
        match self.family_repository.load_family() {
            Ok(Some(family)) => family
                .child(child_id)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| child_id.to_string()),
            _ => child_id.to_string(),
        }
    }
}

/// Reconstruct the occurrence an instance ID refers to: the template's own
/// timing for one-off tasks, or the template's time-of-day shifted onto the
/// occurrence date for recurring ones. The template's duration is carried
/// either way.
fn occurrence(template: &TaskTemplate, day: Option<&str>, instance_id: &str) -> TaskInstance {
    let start = day
        .and_then(dates::parse_day_key)
        .map(|d| d.and_time(template.start.time()))
        .unwrap_or(template.start);
    let span = template.end - template.start;

    TaskInstance {
        id: instance_id.to_string(),
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::task::{Category, Repeat};
    use chrono::Utc;
    use tempfile::tempdir;

    fn dt(s: &str) -> NaiveDateTime {
        dates::parse_iso(s).unwrap()
    }

    fn setup() -> (CompletionService, RewardsService, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let conn = Arc::new(CsvConnection::new(dir.path()).unwrap());

        let template = TaskTemplate {
            id: "template::1".to_string(),
            child_id: "kid1".to_string(),
            title: "Breakfast".to_string(),
            color: None,
            icon: None,
            description: None,
            category: Category::Morning,
            start: dt("2025-09-15T08:00"),
            end: dt("2025-09-15T08:30"),
            repeat: Repeat::Daily,
            reminders: vec![],
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        TemplateRepository::new((*conn).clone())
            .store_template(&template)
            .unwrap();

        let rewards = RewardsService::new(conn.clone());
        let completion = CompletionService::new(conn, rewards.clone());
        (completion, rewards, dir)
    }

    fn done_cmd(instance_id: &str, done: bool) -> SetDoneCommand {
        SetDoneCommand {
            instance_id: instance_id.to_string(),
            done,
        }
    }

    #[test]
    fn test_set_done_stamps_completion() {
        let (service, _rewards, _dir) = setup();

        let outcome = service
            .set_done(done_cmd("template::1@2025-09-17", true), dt("2025-09-17T08:35"))
            .unwrap();

        assert!(outcome.changed);
        assert!(outcome.persisted);
        assert_eq!(outcome.date, "2025-09-17");
        assert!(outcome.instance.done);
        assert_eq!(outcome.instance.done_at, Some(dt("2025-09-17T08:35")));
        // The occurrence keeps the template's time-of-day on its own date
        assert_eq!(outcome.instance.start, dt("2025-09-17T08:00"));
        assert_eq!(outcome.instance.duration_minutes(), 30);
    }

    #[test]
    fn test_set_done_awards_points_once() {
        let (service, rewards, _dir) = setup();

        let first = service
            .set_done(done_cmd("template::1@2025-09-17", true), dt("2025-09-17T08:35"))
            .unwrap();
        assert_eq!(first.points.as_ref().unwrap().total_points, 10);

        // Marking the same instance done again must not award another 10
        let second = service
            .set_done(done_cmd("template::1@2025-09-17", true), dt("2025-09-17T09:00"))
            .unwrap();
        assert!(!second.changed);
        assert!(second.points.is_none());
        assert_eq!(rewards.points_for_child("kid1").unwrap().total_points, 10);
    }

    #[test]
    fn test_set_done_round_trip_restores_everything() {
        let (service, rewards, _dir) = setup();

        service
            .set_done(done_cmd("template::1@2025-09-16", true), dt("2025-09-16T09:00"))
            .unwrap();
        let before = rewards.points_for_child("kid1").unwrap();

        service
            .set_done(done_cmd("template::1@2025-09-17", true), dt("2025-09-17T09:00"))
            .unwrap();
        let undone = service
            .set_done(done_cmd("template::1@2025-09-17", false), dt("2025-09-17T09:05"))
            .unwrap();

        assert!(!undone.instance.done);
        assert_eq!(undone.instance.done_at, None);
        assert_eq!(rewards.points_for_child("kid1").unwrap(), before);
    }

    #[test]
    fn test_overlay_survives_reload() {
        let dir = tempdir().unwrap();
        let conn = Arc::new(CsvConnection::new(dir.path()).unwrap());
        let template = TaskTemplate {
            id: "template::1".to_string(),
            child_id: "kid1".to_string(),
            title: "Breakfast".to_string(),
            color: None,
            icon: None,
            description: None,
            category: Category::Morning,
            start: dt("2025-09-15T08:00"),
            end: dt("2025-09-15T08:30"),
            repeat: Repeat::Daily,
            reminders: vec![],
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        TemplateRepository::new((*conn).clone())
            .store_template(&template)
            .unwrap();

        let rewards = RewardsService::new(conn.clone());
        let service = CompletionService::new(conn.clone(), rewards.clone());
        service
            .set_done(done_cmd("template::1@2025-09-17", true), dt("2025-09-17T08:35"))
            .unwrap();
        drop(service);

        let reloaded = CompletionService::new(conn, rewards);
        let overlay = reloaded.snapshot();
        assert!(overlay.contains_key("template::1@2025-09-17"));
        assert_eq!(
            overlay["template::1@2025-09-17"].done_at,
            dt("2025-09-17T08:35")
        );
    }

    #[test]
    fn test_unknown_instance_is_not_found() {
        let (service, _rewards, _dir) = setup();

        let err = service
            .set_done(done_cmd("template::9@2025-09-17", true), dt("2025-09-17T08:35"))
            .unwrap_err();
        assert!(matches!(err, CalendarError::NotFound(_)));
    }

    #[test]
    fn test_malformed_instance_id_is_validation_error() {
        let (service, _rewards, _dir) = setup();

        let err = service
            .set_done(done_cmd("template::1@yesterday", true), dt("2025-09-17T08:35"))
            .unwrap_err();
        assert!(matches!(err, CalendarError::Validation(_)));
    }

    #[test]
    fn test_one_off_instance_uses_template_timing() {
        let (service, _rewards, _dir) = setup();

        let outcome = service
            .set_done(done_cmd("template::1", true), dt("2025-09-15T09:00"))
            .unwrap();
        assert_eq!(outcome.date, "2025-09-15");
        assert_eq!(outcome.instance.start, dt("2025-09-15T08:00"));
    }
}
