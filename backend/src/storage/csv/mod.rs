//! File-backed storage: YAML documents for the family and task templates,
//! CSV files for row-shaped data (completions, reward balances). All
//! writes go through a temp file followed by an atomic rename.

mod completion_repository;
mod connection;
mod family_repository;
mod rewards_repository;
mod template_repository;

pub use completion_repository::CompletionRepository;
pub use connection::CsvConnection;
pub use family_repository::FamilyRepository;
pub use rewards_repository::RewardsRepository;
pub use template_repository::TemplateRepository;
