use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;

use super::connection::{write_atomic, CsvConnection};
use crate::domain::models::child::{ChildProfile, Family};
use crate::storage::traits::FamilyStorage;

/// Intermediate struct for YAML serialization with string date fields
#[derive(Debug, Clone, Serialize, Deserialize)]
struct YamlChild {
    id: String,
    name: String,
    avatar_id: String,
    age: Option<u32>,
    created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct YamlFamily {
    id: String,
    parent_name: String,
    children: Vec<YamlChild>,
    created_at: String,
}

/// YAML-backed family repository: one `family.yaml` document.
#[derive(Clone)]
pub struct FamilyRepository {
    connection: CsvConnection,
}

impl FamilyRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn to_yaml(family: &Family) -> YamlFamily {
        YamlFamily {
            id: family.id.clone(),
            parent_name: family.parent_name.clone(),
            children: family
                .children
                .iter()
                .map(|c| YamlChild {
                    id: c.id.clone(),
                    name: c.name.clone(),
                    avatar_id: c.avatar_id.clone(),
                    age: c.age,
                    created_at: c.created_at.to_rfc3339(),
                })
                .collect(),
            created_at: family.created_at.to_rfc3339(),
        }
    }

    fn from_yaml(yaml: YamlFamily) -> Result<Family> {
        let children = yaml
            .children
            .into_iter()
            .map(|c| {
                Ok(ChildProfile {
                    created_at: parse_rfc3339(&c.created_at)?,
                    id: c.id,
                    name: c.name,
                    avatar_id: c.avatar_id,
                    age: c.age,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Family {
            created_at: parse_rfc3339(&yaml.created_at)?,
            id: yaml.id,
            parent_name: yaml.parent_name,
            children,
        })
    }
}

fn parse_rfc3339(s: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(s)
        .with_context(|| format!("Invalid timestamp in family file: {}", s))?
        .with_timezone(&Utc))
}

impl FamilyStorage for FamilyRepository {
    fn store_family(&self, family: &Family) -> Result<()> {
        let yaml = serde_yaml::to_string(&Self::to_yaml(family))?;
        write_atomic(&self.connection.family_file(), yaml.as_bytes())?;
        debug!("Stored family {} to {}", family.id, self.connection.family_file().display());
        Ok(())
    }

    fn load_family(&self) -> Result<Option<Family>> {
        let path = self.connection.family_file();
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&path)?;
        let yaml: YamlFamily =
            serde_yaml::from_str(&contents).context("Could not parse family file")?;
        Ok(Some(Self::from_yaml(yaml)?))
    }

    fn clear_family(&self) -> Result<()> {
        let path = self.connection.family_file();
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }
}
