//! Domain-level command and query types
//! These structs are used by services inside the domain layer and are **not**
//! exposed over the public API. The REST layer is responsible for mapping the
//! public DTOs defined in the `shared` crate to these internal types.

pub mod family {
    /// Input for creating a new family during setup.
    #[derive(Debug, Clone)]
    pub struct CreateFamilyCommand {
        pub parent_name: String,
        pub number_of_children: u32,
    }

    /// Input for adding a child to the active family.
    #[derive(Debug, Clone)]
    pub struct AddChildCommand {
        pub name: String,
        pub age: Option<u32>,
        pub avatar_id: Option<String>,
    }

    /// Input for updating an existing child profile.
    #[derive(Debug, Clone, Default)]
    pub struct UpdateChildCommand {
        pub child_id: String,
        pub name: Option<String>,
        pub age: Option<u32>,
        pub avatar_id: Option<String>,
    }
}

pub mod tasks {
    use crate::domain::models::task::{Category, Repeat};

    /// Input for creating a task template. Start/end arrive as local-time
    /// strings and are parsed (and validated) by the service.
    #[derive(Debug, Clone)]
    pub struct CreateTemplateCommand {
        pub child_id: String,
        pub title: String,
        pub color: Option<String>,
        pub icon: Option<String>,
        pub description: Option<String>,
        pub category: Category,
        pub start: String,
        pub end: String,
        pub repeat: Repeat,
        pub reminders: Vec<u32>,
    }

    /// Input for updating a task template; absent fields are left unchanged.
    #[derive(Debug, Clone, Default)]
    pub struct UpdateTemplateCommand {
        pub template_id: String,
        pub title: Option<String>,
        pub color: Option<String>,
        pub icon: Option<String>,
        pub description: Option<String>,
        pub category: Option<Category>,
        pub start: Option<String>,
        pub end: Option<String>,
        pub repeat: Option<Repeat>,
        pub reminders: Option<Vec<u32>>,
        pub is_active: Option<bool>,
    }
}

pub mod completion {
    /// Input for toggling a task instance's done state.
    #[derive(Debug, Clone)]
    pub struct SetDoneCommand {
        pub instance_id: String,
        pub done: bool,
    }
}
