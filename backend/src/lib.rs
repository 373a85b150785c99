//! # Calendar Kids Backend
//!
//! Non-UI logic for the family task calendar.
//!
//! The crate is layered:
//! ```text
//! IO Layer (REST API, handlers)
//!     ↓
//! Domain Layer (Business logic, services)
//!     ↓
//! Storage Layer (File-backed persistence)
//! ```
//!
//! Parents define recurring task templates for their children; the domain
//! layer expands them into dated instances, buckets them by day, narrows
//! them per view and active child, and tracks completion and reward
//! points. The REST layer exposes this to any frontend.

pub mod domain;
pub mod io;
pub mod storage;

use std::sync::Arc;

use anyhow::Result;
use axum::http::{HeaderValue, Method};
use axum::Router;
use log::info;
use tower_http::cors::{Any, CorsLayer};

use crate::domain::{
    CalendarService, CompletionService, FamilyService, ProfileService, RewardsService,
    TemplateService, ViewService,
};
use crate::io::rest;
use crate::storage::csv::CsvConnection;

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub family_service: FamilyService,
    pub profile_service: ProfileService,
    pub template_service: TemplateService,
    pub calendar_service: CalendarService,
    pub view_service: ViewService,
    pub completion_service: CompletionService,
    pub rewards_service: RewardsService,
}

/// Build the application state on top of a storage connection.
pub fn build_state(csv_conn: Arc<CsvConnection>) -> AppState {
    let family_service = FamilyService::new(csv_conn.clone());
    let profile_service = ProfileService::new(family_service.clone());
    let rewards_service = RewardsService::new(csv_conn.clone());
    let completion_service = CompletionService::new(csv_conn.clone(), rewards_service.clone());

    AppState {
        template_service: TemplateService::new(csv_conn.clone()),
        calendar_service: CalendarService::new(csv_conn),
        view_service: ViewService::new(),
        family_service,
        profile_service,
        completion_service,
        rewards_service,
    }
}

/// Initialize the backend with all required services
pub async fn initialize_backend() -> Result<AppState> {
    info!("Setting up storage");
    let csv_conn = Arc::new(CsvConnection::new_default()?);

    info!("Setting up domain services");
    Ok(build_state(csv_conn))
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router {
    // CORS setup to allow frontend to make requests
    let cors = CorsLayer::new()
        .allow_origin("http://localhost:8080".parse::<HeaderValue>().unwrap())
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers(Any);

    Router::new()
        .nest("/api/calendar", rest::calendar_apis::router())
        .nest("/api/settings", rest::settings_apis::router())
        .nest("/api/rewards", rest::rewards_apis::router())
        .nest("/api/family", rest::family_apis::router())
        .nest("/api/profiles", rest::profile_apis::router())
        .layer(cors)
        .with_state(app_state)
}
