use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use log::info;

use crate::domain::commands::family::CreateFamilyCommand;
use crate::io::rest::{error_response, mappers};
use crate::AppState;

/// Create a router for family setup and selection APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_family).post(create_family).delete(clear_family))
        .route("/select-child", post(select_child))
}

async fn get_family(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/family");

    match state.family_service.family() {
        Ok(Some(family)) => (StatusCode::OK, Json(mappers::family_to_dto(&family))).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "No family set up").into_response(),
        Err(e) => error_response(e),
    }
}

async fn create_family(
    State(state): State<AppState>,
    Json(request): Json<shared::CreateFamilyRequest>,
) -> impl IntoResponse {
    info!(
        "POST /api/family - parent: {}, children: {}",
        request.parent_name, request.number_of_children
    );

    let command = CreateFamilyCommand {
        parent_name: request.parent_name,
        number_of_children: request.number_of_children,
    };

    match state.family_service.create_family(command) {
        Ok(family) => (StatusCode::CREATED, Json(mappers::family_to_dto(&family))).into_response(),
        Err(e) => error_response(e),
    }
}

async fn clear_family(State(state): State<AppState>) -> impl IntoResponse {
    info!("DELETE /api/family");

    match state.family_service.clear_family() {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

async fn select_child(
    State(state): State<AppState>,
    Json(request): Json<shared::SelectChildRequest>,
) -> impl IntoResponse {
    info!("POST /api/family/select-child - child: {:?}", request.child_id);

    match state.family_service.select_child(request.child_id) {
        Ok(selected) => {
            let response = shared::SelectChildResponse {
                selected_child: selected.as_ref().map(mappers::profile_to_dto),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response(e),
    }
}
