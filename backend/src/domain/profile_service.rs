//! Kid profile activation and theming.
//!
//! Activating a profile switches the session into child mode and yields a
//! theme descriptor derived from the child's avatar palette. Applying the
//! descriptor to any given UI is a collaborator's responsibility; nothing
//! global is mutated here.

use log::info;
use shared::ThemeDescriptor;

use crate::domain::avatars;
use crate::domain::commands::family::UpdateChildCommand;
use crate::domain::errors::CalendarError;
use crate::domain::family_service::FamilyService;
use crate::domain::models::child::ChildProfile;

/// Service for kid profile selection and theming.
#[derive(Clone)]
pub struct ProfileService {
    family_service: FamilyService,
}

impl ProfileService {
    pub fn new(family_service: FamilyService) -> Self {
        Self { family_service }
    }

    /// The selectable avatar registry.
    pub fn available_avatars(&self) -> &'static [shared::KidAvatar] {
        &avatars::PREDEFINED_AVATARS
    }

    /// Assign an avatar to a child profile.
    pub fn select_avatar_for_child(
        &self,
        child_id: &str,
        avatar_id: &str,
    ) -> Result<ChildProfile, CalendarError> {
        self.family_service.update_child(UpdateChildCommand {
            child_id: child_id.to_string(),
            avatar_id: Some(avatar_id.to_string()),
            ..Default::default()
        })
    }

    /// Activate a kid profile: switch the session into that child's mode
    /// and return the profile together with its theme descriptor.
    pub fn activate_profile(
        &self,
        child_id: &str,
    ) -> Result<(ChildProfile, ThemeDescriptor), CalendarError> {
        let profile = self
            .family_service
            .select_child(Some(child_id.to_string()))?
            .ok_or_else(|| CalendarError::NotFound(format!("child {}", child_id)))?;

        let theme = self.theme_for(&profile);
        info!(
            "Activated profile {} with theme {}",
            profile.id, theme.palette.name
        );
        Ok((profile, theme))
    }

    /// Leave child mode, returning the neutral theme.
    pub fn deactivate(&self) -> Result<ThemeDescriptor, CalendarError> {
        self.family_service.select_child(None)?;
        Ok(Self::default_theme())
    }

    /// Theme descriptor for a profile's avatar; unknown avatars fall back
    /// to the neutral palette.
    pub fn theme_for(&self, profile: &ChildProfile) -> ThemeDescriptor {
        let palette = avatars::avatar_by_id(&profile.avatar_id)
            .map(|a| a.palette.clone())
            .unwrap_or_else(avatars::default_palette);
        ThemeDescriptor {
            profile_id: Some(profile.id.clone()),
            avatar_id: profile.avatar_id.clone(),
            palette,
        }
    }

    /// The theme used when no kid profile is active.
    pub fn default_theme() -> ThemeDescriptor {
        ThemeDescriptor {
            profile_id: None,
            avatar_id: String::new(),
            palette: avatars::default_palette(),
        }
    }
}
