//! Task template management for the settings screens.
//!
//! Start/end arrive as local-time strings and must parse; an inverted
//! pair (end before start) is stored as-is, matching what the expander
//! passes through.

use chrono::Utc;
use log::{info, warn};
use std::sync::Arc;

use crate::domain::commands::tasks::{CreateTemplateCommand, UpdateTemplateCommand};
use crate::domain::dates;
use crate::domain::errors::CalendarError;
use crate::domain::models::task::{Category, TaskTemplate};
use crate::storage::csv::{CsvConnection, TemplateRepository};
use crate::storage::traits::TemplateStorage;

const MAX_TITLE_LENGTH: usize = 120;

/// Service for creating and maintaining task templates.
#[derive(Clone)]
pub struct TemplateService {
    template_repository: TemplateRepository,
}

impl TemplateService {
    pub fn new(csv_conn: Arc<CsvConnection>) -> Self {
        Self {
            template_repository: TemplateRepository::new((*csv_conn).clone()),
        }
    }

    pub fn create_template(
        &self,
        command: CreateTemplateCommand,
    ) -> Result<TaskTemplate, CalendarError> {
        let title = command.title.trim();
        if title.is_empty() {
            return Err(CalendarError::validation("Task title cannot be empty"));
        }
        if title.len() > MAX_TITLE_LENGTH {
            return Err(CalendarError::validation(format!(
                "Task title too long ({} characters, max {})",
                title.len(),
                MAX_TITLE_LENGTH
            )));
        }

        let start = dates::parse_iso(&command.start)
            .ok_or_else(|| CalendarError::validation(format!("Invalid start time: {}", command.start)))?;
        let end = dates::parse_iso(&command.end)
            .ok_or_else(|| CalendarError::validation(format!("Invalid end time: {}", command.end)))?;

        let now = Utc::now();
        let template = TaskTemplate {
            id: TaskTemplate::generate_id(now.timestamp_millis() as u64),
            child_id: command.child_id,
            title: title.to_string(),
            color: command.color,
            icon: command.icon,
            description: command.description,
            category: command.category,
            start,
            end,
            repeat: command.repeat,
            reminders: command.reminders,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        self.template_repository
            .store_template(&template)
            .map_err(|e| CalendarError::Persistence(e.to_string()))?;

        info!("Created template {} ({})", template.id, template.title);
        Ok(template)
    }

    pub fn get_template(&self, template_id: &str) -> Result<TaskTemplate, CalendarError> {
        self.template_repository
            .get_template(template_id)
            .map_err(|e| CalendarError::Persistence(e.to_string()))?
            .ok_or_else(|| CalendarError::NotFound(format!("template {}", template_id)))
    }

    /// List templates, optionally narrowed to one category.
    pub fn list_templates(
        &self,
        category: Option<Category>,
    ) -> Result<Vec<TaskTemplate>, CalendarError> {
        let mut templates = self
            .template_repository
            .list_templates()
            .map_err(|e| CalendarError::Persistence(e.to_string()))?;
        if let Some(category) = category {
            templates.retain(|t| t.category == category);
        }
        Ok(templates)
    }

    pub fn update_template(
        &self,
        command: UpdateTemplateCommand,
    ) -> Result<TaskTemplate, CalendarError> {
        let mut template = self.get_template(&command.template_id)?;

        if let Some(title) = command.title {
            let title = title.trim().to_string();
            if title.is_empty() {
                return Err(CalendarError::validation("Task title cannot be empty"));
            }
            template.title = title;
        }
        if let Some(start) = command.start {
            template.start = dates::parse_iso(&start)
                .ok_or_else(|| CalendarError::validation(format!("Invalid start time: {}", start)))?;
        }
        if let Some(end) = command.end {
            template.end = dates::parse_iso(&end)
                .ok_or_else(|| CalendarError::validation(format!("Invalid end time: {}", end)))?;
        }
        if let Some(color) = command.color {
            template.color = Some(color);
        }
        if let Some(icon) = command.icon {
            template.icon = Some(icon);
        }
        if let Some(description) = command.description {
            template.description = Some(description);
        }
        if let Some(category) = command.category {
            template.category = category;
        }
        if let Some(repeat) = command.repeat {
            template.repeat = repeat;
        }
        if let Some(reminders) = command.reminders {
            template.reminders = reminders;
        }
        if let Some(is_active) = command.is_active {
            template.is_active = is_active;
        }
        template.updated_at = Utc::now();

        self.template_repository
            .update_template(&template)
            .map_err(|e| CalendarError::Persistence(e.to_string()))?;
        Ok(template)
    }

    pub fn delete_template(&self, template_id: &str) -> Result<(), CalendarError> {
        let deleted = self
            .template_repository
            .delete_template(template_id)
            .map_err(|e| CalendarError::Persistence(e.to_string()))?;
        if !deleted {
            warn!("No template found to delete: {}", template_id);
            return Err(CalendarError::NotFound(format!("template {}", template_id)));
        }
        info!("Deleted template {}", template_id);
        Ok(())
    }
}
