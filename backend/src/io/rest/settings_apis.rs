use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use log::info;
use serde::Deserialize;

use crate::domain::commands::family::{AddChildCommand, UpdateChildCommand};
use crate::domain::commands::tasks::{CreateTemplateCommand, UpdateTemplateCommand};
use crate::io::rest::{error_response, mappers};
use crate::AppState;

/// Create a router for the settings APIs (children and task templates)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/children", get(list_children).post(add_child))
        .route(
            "/children/:child_id",
            axum::routing::put(update_child).delete(delete_child),
        )
        .route("/tasks", get(list_templates).post(create_template))
        .route(
            "/tasks/:template_id",
            axum::routing::put(update_template).delete(delete_template),
        )
}

/// Query parameters for the template list endpoint
#[derive(Debug, Deserialize)]
pub struct TemplateListQuery {
    pub category: Option<shared::TaskCategory>,
}

async fn list_children(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/settings/children");

    match state.family_service.family() {
        Ok(Some(family)) => {
            let children: Vec<shared::ChildProfile> =
                family.children.iter().map(mappers::profile_to_dto).collect();
            (StatusCode::OK, Json(children)).into_response()
        }
        Ok(None) => (StatusCode::OK, Json(Vec::<shared::ChildProfile>::new())).into_response(),
        Err(e) => error_response(e),
    }
}

async fn add_child(
    State(state): State<AppState>,
    Json(request): Json<shared::AddChildRequest>,
) -> impl IntoResponse {
    info!("POST /api/settings/children - name: {}", request.name);

    let command = AddChildCommand {
        name: request.name,
        age: request.age,
        avatar_id: request.avatar_id,
    };

    match state.family_service.add_child(command) {
        Ok(child) => (StatusCode::CREATED, Json(mappers::profile_to_dto(&child))).into_response(),
        Err(e) => error_response(e),
    }
}

async fn update_child(
    State(state): State<AppState>,
    Path(child_id): Path<String>,
    Json(request): Json<shared::UpdateChildRequest>,
) -> impl IntoResponse {
    info!("PUT /api/settings/children/{}", child_id);

    let command = UpdateChildCommand {
        child_id,
        name: request.name,
        age: request.age,
        avatar_id: request.avatar_id,
    };

    match state.family_service.update_child(command) {
        Ok(child) => (StatusCode::OK, Json(mappers::profile_to_dto(&child))).into_response(),
        Err(e) => error_response(e),
    }
}

async fn delete_child(
    State(state): State<AppState>,
    Path(child_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/settings/children/{}", child_id);

    match state.family_service.remove_child(&child_id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

async fn list_templates(
    State(state): State<AppState>,
    Query(query): Query<TemplateListQuery>,
) -> impl IntoResponse {
    info!("GET /api/settings/tasks - query: {:?}", query);

    let category = query.category.map(mappers::category_from_dto);
    match state.template_service.list_templates(category) {
        Ok(templates) => {
            let dtos: Vec<shared::TaskTemplate> =
                templates.iter().map(mappers::template_to_dto).collect();
            (StatusCode::OK, Json(dtos)).into_response()
        }
        Err(e) => error_response(e),
    }
}

async fn create_template(
    State(state): State<AppState>,
    Json(request): Json<shared::CreateTemplateRequest>,
) -> impl IntoResponse {
    info!("POST /api/settings/tasks - title: {}", request.title);

    let command = CreateTemplateCommand {
        child_id: request.child_id,
        title: request.title,
        color: request.color,
        icon: request.icon,
        description: request.description,
        category: mappers::category_from_dto(request.category),
        start: request.start,
        end: request.end,
        repeat: mappers::repeat_from_dto(request.repeat),
        reminders: request.reminders,
    };

    match state.template_service.create_template(command) {
        Ok(template) => {
            (StatusCode::CREATED, Json(mappers::template_to_dto(&template))).into_response()
        }
        Err(e) => error_response(e),
    }
}

async fn update_template(
    State(state): State<AppState>,
    Path(template_id): Path<String>,
    Json(request): Json<shared::UpdateTemplateRequest>,
) -> impl IntoResponse {
    info!("PUT /api/settings/tasks/{}", template_id);

    let command = UpdateTemplateCommand {
        template_id,
        title: request.title,
        color: request.color,
        icon: request.icon,
        description: request.description,
        category: request.category.map(mappers::category_from_dto),
        start: request.start,
        end: request.end,
        repeat: request.repeat.map(mappers::repeat_from_dto),
        reminders: request.reminders,
        is_active: request.is_active,
    };

    match state.template_service.update_template(command) {
        Ok(template) => (StatusCode::OK, Json(mappers::template_to_dto(&template))).into_response(),
        Err(e) => error_response(e),
    }
}

async fn delete_template(
    State(state): State<AppState>,
    Path(template_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/settings/tasks/{}", template_id);

    match state.template_service.delete_template(&template_id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}
