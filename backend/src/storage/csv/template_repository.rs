use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;

use super::connection::{write_atomic, CsvConnection};
use crate::domain::dates;
use crate::domain::models::task::{Category, Repeat, TaskTemplate};
use crate::storage::traits::TemplateStorage;

/// Intermediate struct for YAML serialization with string date fields
#[derive(Debug, Clone, Serialize, Deserialize)]
struct YamlTemplate {
    id: String,
    child_id: String,
    title: String,
    color: Option<String>,
    icon: Option<String>,
    description: Option<String>,
    category: Category,
    start: String,
    end: String,
    repeat: Repeat,
    reminders: Vec<u32>,
    is_active: bool,
    created_at: String,
    updated_at: String,
}

/// YAML-backed template repository: all templates in one `tasks.yaml`
/// list document.
#[derive(Clone)]
pub struct TemplateRepository {
    connection: CsvConnection,
}

impl TemplateRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn read_all(&self) -> Result<Vec<TaskTemplate>> {
        let path = self.connection.templates_file();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let contents = fs::read_to_string(&path)?;
        let yaml: Vec<YamlTemplate> =
            serde_yaml::from_str(&contents).context("Could not parse templates file")?;
        yaml.into_iter().map(from_yaml).collect()
    }

    fn write_all(&self, templates: &[TaskTemplate]) -> Result<()> {
        let yaml: Vec<YamlTemplate> = templates.iter().map(to_yaml).collect();
        let contents = serde_yaml::to_string(&yaml)?;
        write_atomic(&self.connection.templates_file(), contents.as_bytes())?;
        debug!("Wrote {} templates", templates.len());
        Ok(())
    }
}

fn to_yaml(template: &TaskTemplate) -> YamlTemplate {
    YamlTemplate {
        id: template.id.clone(),
        child_id: template.child_id.clone(),
        title: template.title.clone(),
        color: template.color.clone(),
        icon: template.icon.clone(),
        description: template.description.clone(),
        category: template.category,
        start: dates::format_iso(template.start),
        end: dates::format_iso(template.end),
        repeat: template.repeat,
        reminders: template.reminders.clone(),
        is_active: template.is_active,
        created_at: template.created_at.to_rfc3339(),
        updated_at: template.updated_at.to_rfc3339(),
    }
}

fn from_yaml(yaml: YamlTemplate) -> Result<TaskTemplate> {
    Ok(TaskTemplate {
        start: dates::parse_iso(&yaml.start)
            .with_context(|| format!("Invalid start in templates file: {}", yaml.start))?,
        end: dates::parse_iso(&yaml.end)
            .with_context(|| format!("Invalid end in templates file: {}", yaml.end))?,
        created_at: parse_rfc3339(&yaml.created_at)?,
        updated_at: parse_rfc3339(&yaml.updated_at)?,
        id: yaml.id,
        child_id: yaml.child_id,
        title: yaml.title,
        color: yaml.color,
        icon: yaml.icon,
        description: yaml.description,
        category: yaml.category,
        repeat: yaml.repeat,
        reminders: yaml.reminders,
        is_active: yaml.is_active,
    })
}

fn parse_rfc3339(s: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(s)
        .with_context(|| format!("Invalid timestamp in templates file: {}", s))?
        .with_timezone(&Utc))
}

impl TemplateStorage for TemplateRepository {
    fn store_template(&self, template: &TaskTemplate) -> Result<()> {
        let mut templates = self.read_all()?;
        templates.push(template.clone());
        self.write_all(&templates)
    }

    fn get_template(&self, template_id: &str) -> Result<Option<TaskTemplate>> {
        Ok(self
            .read_all()?
            .into_iter()
            .find(|t| t.id == template_id))
    }

    fn list_templates(&self) -> Result<Vec<TaskTemplate>> {
        let mut templates = self.read_all()?;
        templates.sort_by_key(|t| t.start);
        Ok(templates)
    }

    fn update_template(&self, template: &TaskTemplate) -> Result<()> {
        let mut templates = self.read_all()?;
        match templates.iter_mut().find(|t| t.id == template.id) {
            Some(existing) => *existing = template.clone(),
            None => anyhow::bail!("Template not found: {}", template.id),
        }
        self.write_all(&templates)
    }

    fn delete_template(&self, template_id: &str) -> Result<bool> {
        let mut templates = self.read_all()?;
        let before = templates.len();
        templates.retain(|t| t.id != template_id);
        if templates.len() == before {
            return Ok(false);
        }
        self.write_all(&templates)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample(id: &str, start: &str) -> TaskTemplate {
        TaskTemplate {
            id: id.to_string(),
            child_id: "kid1".to_string(),
            title: "Breakfast".to_string(),
            color: Some("#9AD7FF".to_string()),
            icon: Some("🍎".to_string()),
            description: None,
            category: Category::Morning,
            start: dates::parse_iso(start).unwrap(),
            end: dates::parse_iso(start).unwrap() + chrono::Duration::minutes(30),
            repeat: Repeat::Daily,
            reminders: vec![10, 30],
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn repo() -> (TemplateRepository, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let repo = TemplateRepository::new(CsvConnection::new(dir.path()).unwrap());
        (repo, dir)
    }

    #[test]
    fn test_store_and_round_trip() {
        let (repo, _dir) = repo();
        let template = sample("template::1", "2025-09-15T08:00");

        repo.store_template(&template).unwrap();
        let loaded = repo.get_template("template::1").unwrap().unwrap();

        assert_eq!(loaded.title, template.title);
        assert_eq!(loaded.start, template.start);
        assert_eq!(loaded.repeat, Repeat::Daily);
        assert_eq!(loaded.reminders, vec![10, 30]);
    }

    #[test]
    fn test_list_sorted_by_start() {
        let (repo, _dir) = repo();
        repo.store_template(&sample("template::2", "2025-09-15T14:00"))
            .unwrap();
        repo.store_template(&sample("template::1", "2025-09-15T08:00"))
            .unwrap();

        let all = repo.list_templates().unwrap();
        assert_eq!(all[0].id, "template::1");
        assert_eq!(all[1].id, "template::2");
    }

    #[test]
    fn test_update_and_delete() {
        let (repo, _dir) = repo();
        let mut template = sample("template::1", "2025-09-15T08:00");
        repo.store_template(&template).unwrap();

        template.title = "Late breakfast".to_string();
        repo.update_template(&template).unwrap();
        assert_eq!(
            repo.get_template("template::1").unwrap().unwrap().title,
            "Late breakfast"
        );

        assert!(repo.delete_template("template::1").unwrap());
        assert!(!repo.delete_template("template::1").unwrap());
        assert!(repo.get_template("template::1").unwrap().is_none());
    }

    #[test]
    fn test_update_missing_fails() {
        let (repo, _dir) = repo();
        let template = sample("template::9", "2025-09-15T08:00");
        assert!(repo.update_template(&template).is_err());
    }
}
