use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use log::info;

use crate::io::rest::{error_response, mappers};
use crate::AppState;

/// Create a router for kid profile and theming APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/avatars", get(list_avatars))
        .route("/:child_id/activate", post(activate_profile))
        .route("/deactivate", post(deactivate_profile))
}

async fn list_avatars(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/profiles/avatars");

    let avatars = state.profile_service.available_avatars().to_vec();
    (StatusCode::OK, Json(avatars)).into_response()
}

async fn activate_profile(
    State(state): State<AppState>,
    Path(child_id): Path<String>,
) -> impl IntoResponse {
    info!("POST /api/profiles/{}/activate", child_id);

    match state.profile_service.activate_profile(&child_id) {
        Ok((profile, theme)) => {
            let response = shared::ActivateProfileResponse {
                profile: mappers::profile_to_dto(&profile),
                theme,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response(e),
    }
}

async fn deactivate_profile(State(state): State<AppState>) -> impl IntoResponse {
    info!("POST /api/profiles/deactivate");

    match state.profile_service.deactivate() {
        Ok(theme) => (StatusCode::OK, Json(theme)).into_response(),
        Err(e) => error_response(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::commands::family::CreateFamilyCommand;
    use crate::storage::csv::CsvConnection;
    use crate::{build_state, create_router};
    use axum::body::Body;
    use axum::http::{Method, Request};
    use std::sync::Arc;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_activate_profile_returns_theme() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let state = build_state(Arc::new(CsvConnection::new(dir.path())?));
        state.family_service.create_family(CreateFamilyCommand {
            parent_name: "Dana".to_string(),
            number_of_children: 1,
        })?;
        let child_id = state.family_service.family()?.unwrap().children[0].id.clone();
        let app = create_router(state.clone());

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/api/profiles/{}/activate", child_id))
                    .method(Method::POST)
                    .body(Body::empty())?,
            )
            .await?;

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let activated: shared::ActivateProfileResponse = serde_json::from_slice(&body)?;

        assert_eq!(activated.profile.id, child_id);
        assert_eq!(activated.theme.profile_id.as_deref(), Some(child_id.as_str()));
        assert!(!activated.theme.palette.primary.is_empty());
        // Activation also switches the session into child mode
        assert_eq!(state.family_service.selected_child(), Some(child_id));

        Ok(())
    }

    #[tokio::test]
    async fn test_list_avatars() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let state = build_state(Arc::new(CsvConnection::new(dir.path())?));
        let app = create_router(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/profiles/avatars")
                    .method(Method::GET)
                    .body(Body::empty())?,
            )
            .await?;

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let avatars: Vec<shared::KidAvatar> = serde_json::from_slice(&body)?;
        assert!(!avatars.is_empty());

        Ok(())
    }
}
