//! Family setup and child-profile management.
//!
//! The family document is the persisted source of truth; the active child
//! selection is session state only (a restart comes back in parent mode).

use std::sync::{Arc, Mutex};

use chrono::Utc;
use log::{info, warn};
use uuid::Uuid;

use crate::domain::avatars;
use crate::domain::commands::family::{AddChildCommand, CreateFamilyCommand, UpdateChildCommand};
use crate::domain::errors::CalendarError;
use crate::domain::models::child::{ChildProfile, Family};
use crate::storage::csv::{CsvConnection, FamilyRepository};
use crate::storage::traits::FamilyStorage;

const MAX_CHILDREN: u32 = 8;
const MAX_CHILD_AGE: u32 = 18;

/// Service for managing the family and its child profiles.
#[derive(Clone)]
pub struct FamilyService {
    family_repository: FamilyRepository,
    selected_child: Arc<Mutex<Option<String>>>,
}

impl FamilyService {
    pub fn new(csv_conn: Arc<CsvConnection>) -> Self {
        Self {
            family_repository: FamilyRepository::new((*csv_conn).clone()),
            selected_child: Arc::new(Mutex::new(None)),
        }
    }

    /// Create a new family with default-named children and cycled avatars.
    /// Replaces any existing family.
    pub fn create_family(&self, command: CreateFamilyCommand) -> Result<Family, CalendarError> {
        let parent_name = command.parent_name.trim();
        if parent_name.is_empty() {
            return Err(CalendarError::validation("Parent name cannot be empty"));
        }
        if command.number_of_children == 0 || command.number_of_children > MAX_CHILDREN {
            return Err(CalendarError::validation(format!(
                "Number of children must be between 1 and {}",
                MAX_CHILDREN
            )));
        }

        let now = Utc::now();
        let base_millis = now.timestamp_millis() as u64;
        let children = (0..command.number_of_children)
            .map(|i| ChildProfile {
                id: ChildProfile::generate_id(base_millis + i as u64),
                name: format!("Child {}", i + 1),
                avatar_id: avatars::avatar_for_index(i as usize).id.clone(),
                age: None,
                created_at: now,
            })
            .collect();

        let family = Family {
            id: Uuid::new_v4().to_string(),
            parent_name: parent_name.to_string(),
            children,
            created_at: now,
        };

        self.family_repository
            .store_family(&family)
            .map_err(|e| CalendarError::Persistence(e.to_string()))?;
        *self.selected_child.lock().unwrap() = None;

        info!(
            "Created family {} with {} children",
            family.id,
            family.children.len()
        );
        Ok(family)
    }

    /// The current family, if one has been set up.
    pub fn family(&self) -> Result<Option<Family>, CalendarError> {
        self.family_repository
            .load_family()
            .map_err(|e| CalendarError::Persistence(e.to_string()))
    }

    /// Add a child to the active family.
    pub fn add_child(&self, command: AddChildCommand) -> Result<ChildProfile, CalendarError> {
        self.validate_child_fields(Some(&command.name), command.age, command.avatar_id.as_deref())?;

        let mut family = self.require_family()?;
        let now = Utc::now();
        let child = ChildProfile {
            id: ChildProfile::generate_id(now.timestamp_millis() as u64),
            name: command.name.trim().to_string(),
            avatar_id: command
                .avatar_id
                .unwrap_or_else(|| avatars::avatar_for_index(family.children.len()).id.clone()),
            age: command.age,
            created_at: now,
        };

        family.children.push(child.clone());
        self.family_repository
            .store_family(&family)
            .map_err(|e| CalendarError::Persistence(e.to_string()))?;

        info!("Added child {} ({})", child.name, child.id);
        Ok(child)
    }

    /// Update an existing child profile; absent fields are left unchanged.
    pub fn update_child(&self, command: UpdateChildCommand) -> Result<ChildProfile, CalendarError> {
        self.validate_child_fields(command.name.as_deref(), command.age, command.avatar_id.as_deref())?;

        let mut family = self.require_family()?;
        let child = family
            .children
            .iter_mut()
            .find(|c| c.id == command.child_id)
            .ok_or_else(|| CalendarError::NotFound(format!("child {}", command.child_id)))?;

        if let Some(name) = command.name {
            child.name = name.trim().to_string();
        }
        if let Some(age) = command.age {
            child.age = Some(age);
        }
        if let Some(avatar_id) = command.avatar_id {
            child.avatar_id = avatar_id;
        }
        let updated = child.clone();

        self.family_repository
            .store_family(&family)
            .map_err(|e| CalendarError::Persistence(e.to_string()))?;
        Ok(updated)
    }

    /// Remove a child from the family. A removed child that was selected
    /// drops the session back to parent mode.
    pub fn remove_child(&self, child_id: &str) -> Result<(), CalendarError> {
        let mut family = self.require_family()?;
        let before = family.children.len();
        family.children.retain(|c| c.id != child_id);
        if family.children.len() == before {
            return Err(CalendarError::NotFound(format!("child {}", child_id)));
        }

        self.family_repository
            .store_family(&family)
            .map_err(|e| CalendarError::Persistence(e.to_string()))?;

        let mut selected = self.selected_child.lock().unwrap();
        if selected.as_deref() == Some(child_id) {
            *selected = None;
        }
        Ok(())
    }

    /// Select the active child; None switches back to parent mode.
    pub fn select_child(
        &self,
        child_id: Option<String>,
    ) -> Result<Option<ChildProfile>, CalendarError> {
        let selected = match child_id {
            None => {
                *self.selected_child.lock().unwrap() = None;
                None
            }
            Some(id) => {
                let family = self.require_family()?;
                let child = family
                    .child(&id)
                    .cloned()
                    .ok_or_else(|| CalendarError::NotFound(format!("child {}", id)))?;
                *self.selected_child.lock().unwrap() = Some(id);
                Some(child)
            }
        };
        Ok(selected)
    }

    /// The active child ID, when in child mode.
    pub fn selected_child(&self) -> Option<String> {
        self.selected_child.lock().unwrap().clone()
    }

    /// Drop the family and all selection state.
    pub fn clear_family(&self) -> Result<(), CalendarError> {
        self.family_repository
            .clear_family()
            .map_err(|e| CalendarError::Persistence(e.to_string()))?;
        *self.selected_child.lock().unwrap() = None;
        info!("Family cleared");
        Ok(())
    }

    fn require_family(&self) -> Result<Family, CalendarError> {
        self.family()?.ok_or_else(|| {
            warn!("No family set up yet");
            CalendarError::NotFound("family".to_string())
        })
    }

    fn validate_child_fields(
        &self,
        name: Option<&str>,
        age: Option<u32>,
        avatar_id: Option<&str>,
    ) -> Result<(), CalendarError> {
        if let Some(name) = name {
            if name.trim().is_empty() {
                return Err(CalendarError::validation("Child name cannot be empty"));
            }
        }
        if let Some(age) = age {
            if age > MAX_CHILD_AGE {
                return Err(CalendarError::validation(format!(
                    "Child age must be between 0 and {}",
                    MAX_CHILD_AGE
                )));
            }
        }
        if let Some(avatar_id) = avatar_id {
            if avatars::avatar_by_id(avatar_id).is_none() {
                return Err(CalendarError::validation(format!(
                    "Unknown avatar: {}",
                    avatar_id
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn service() -> (FamilyService, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let conn = CsvConnection::new(dir.path()).unwrap();
        (FamilyService::new(Arc::new(conn)), dir)
    }

    fn setup_family(service: &FamilyService) -> Family {
        service
            .create_family(CreateFamilyCommand {
                parent_name: "Dana".to_string(),
                number_of_children: 2,
            })
            .unwrap()
    }

    #[test]
    fn test_create_family_defaults() {
        let (service, _dir) = service();
        let family = setup_family(&service);

        assert_eq!(family.parent_name, "Dana");
        assert_eq!(family.children.len(), 2);
        assert_eq!(family.children[0].name, "Child 1");
        // Avatars cycle through the registry
        assert_ne!(family.children[0].avatar_id, family.children[1].avatar_id);
    }

    #[test]
    fn test_create_family_validation() {
        let (service, _dir) = service();

        let err = service
            .create_family(CreateFamilyCommand {
                parent_name: "   ".to_string(),
                number_of_children: 1,
            })
            .unwrap_err();
        assert!(matches!(err, CalendarError::Validation(_)));

        let err = service
            .create_family(CreateFamilyCommand {
                parent_name: "Dana".to_string(),
                number_of_children: 0,
            })
            .unwrap_err();
        assert!(matches!(err, CalendarError::Validation(_)));
    }

    #[test]
    fn test_add_child_validation() {
        let (service, _dir) = service();
        setup_family(&service);

        let err = service
            .add_child(AddChildCommand {
                name: "".to_string(),
                age: None,
                avatar_id: None,
            })
            .unwrap_err();
        assert!(matches!(err, CalendarError::Validation(_)));

        let err = service
            .add_child(AddChildCommand {
                name: "Mia".to_string(),
                age: Some(42),
                avatar_id: None,
            })
            .unwrap_err();
        assert!(matches!(err, CalendarError::Validation(_)));

        let child = service
            .add_child(AddChildCommand {
                name: "  Mia  ".to_string(),
                age: Some(7),
                avatar_id: Some("dragon".to_string()),
            })
            .unwrap();
        assert_eq!(child.name, "Mia");
        assert_eq!(child.avatar_id, "dragon");
    }

    #[test]
    fn test_select_child_round_trip() {
        let (service, _dir) = service();
        let family = setup_family(&service);
        let child_id = family.children[0].id.clone();

        let selected = service.select_child(Some(child_id.clone())).unwrap();
        assert_eq!(selected.unwrap().id, child_id);
        assert_eq!(service.selected_child(), Some(child_id));

        // Back to parent mode
        assert!(service.select_child(None).unwrap().is_none());
        assert_eq!(service.selected_child(), None);

        let err = service.select_child(Some("nope".to_string())).unwrap_err();
        assert!(matches!(err, CalendarError::NotFound(_)));
    }

    #[test]
    fn test_remove_child_clears_selection() {
        let (service, _dir) = service();
        let family = setup_family(&service);
        let child_id = family.children[0].id.clone();

        service.select_child(Some(child_id.clone())).unwrap();
        service.remove_child(&child_id).unwrap();

        assert_eq!(service.selected_child(), None);
        assert_eq!(service.family().unwrap().unwrap().children.len(), 1);
    }

    #[test]
    fn test_clear_family() {
        let (service, _dir) = service();
        setup_family(&service);

        service.clear_family().unwrap();
        assert!(service.family().unwrap().is_none());
    }
}
