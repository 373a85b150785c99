//! # Storage Traits
//!
//! Storage abstraction traits that let different backends be used
//! interchangeably by the domain layer. All operations are synchronous;
//! repositories are cheap to clone and safe to share.

use anyhow::Result;
use std::collections::HashMap;

use crate::domain::models::child::Family;
use crate::domain::models::rewards::RewardPoints;
use crate::domain::models::task::{CompletionRecord, TaskTemplate};

/// Interface for family persistence. A single family document holds the
/// parent and every child profile.
pub trait FamilyStorage: Send + Sync {
    /// Store (or replace) the family document
    fn store_family(&self, family: &Family) -> Result<()>;

    /// Load the family document, if one exists
    fn load_family(&self) -> Result<Option<Family>>;

    /// Delete the family document
    fn clear_family(&self) -> Result<()>;
}

/// Interface for task template persistence.
pub trait TemplateStorage: Send + Sync {
    /// Store a new template
    fn store_template(&self, template: &TaskTemplate) -> Result<()>;

    /// Retrieve a specific template by ID
    fn get_template(&self, template_id: &str) -> Result<Option<TaskTemplate>>;

    /// List all templates ordered by start time
    fn list_templates(&self) -> Result<Vec<TaskTemplate>>;

    /// Update an existing template
    fn update_template(&self, template: &TaskTemplate) -> Result<()>;

    /// Delete a template by ID
    /// Returns true if the template was found and deleted, false otherwise
    fn delete_template(&self, template_id: &str) -> Result<bool>;
}

/// Interface for the completion overlay: the done state of synthesized
/// instances, keyed by instance ID.
pub trait CompletionStorage: Send + Sync {
    /// Load every completion record
    fn load_completions(&self) -> Result<HashMap<String, CompletionRecord>>;

    /// Replace the stored overlay with the given records
    fn save_completions(&self, completions: &HashMap<String, CompletionRecord>) -> Result<()>;
}

/// Interface for reward balance persistence.
pub trait RewardsStorage: Send + Sync {
    /// Load every child's balance
    fn load_points(&self) -> Result<Vec<RewardPoints>>;

    /// Replace the stored balances with the given list
    fn save_points(&self, points: &[RewardPoints]) -> Result<()>;
}
