//! Business logic for the family calendar: recurrence expansion, calendar
//! assembly, view narrowing, completion tracking, rewards, and family
//! management. The UI-facing REST layer maps DTOs in and out; storage
//! backends live behind the traits in `crate::storage`.

pub mod avatars;
pub mod calendar_service;
pub mod commands;
pub mod completion_service;
pub mod dates;
pub mod errors;
pub mod family_service;
pub mod mock_calendar;
pub mod models;
pub mod profile_service;
pub mod rewards_service;
pub mod scheduler_service;
pub mod template_service;
pub mod view_service;

pub use calendar_service::CalendarService;
pub use completion_service::CompletionService;
pub use errors::CalendarError;
pub use family_service::FamilyService;
pub use profile_service::ProfileService;
pub use rewards_service::RewardsService;
pub use scheduler_service::SchedulerService;
pub use template_service::TemplateService;
pub use view_service::ViewService;
