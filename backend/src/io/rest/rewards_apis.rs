use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use log::info;

use crate::io::rest::mappers;
use crate::AppState;

/// Create a router for rewards APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_rewards))
        .route("/reset-daily", post(reset_daily_points))
        .route("/:child_id", get(get_child_rewards))
}

async fn list_rewards(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/rewards");

    let summaries: Vec<shared::RewardSummary> = state
        .rewards_service
        .all_points()
        .iter()
        .map(mappers::reward_summary_to_dto)
        .collect();
    (StatusCode::OK, Json(summaries)).into_response()
}

async fn get_child_rewards(
    State(state): State<AppState>,
    Path(child_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/rewards/{}", child_id);

    match state.rewards_service.points_for_child(&child_id) {
        Some(points) => {
            (StatusCode::OK, Json(mappers::reward_summary_to_dto(&points))).into_response()
        }
        None => (StatusCode::NOT_FOUND, "No points recorded for child").into_response(),
    }
}

async fn reset_daily_points(State(state): State<AppState>) -> impl IntoResponse {
    info!("POST /api/rewards/reset-daily");

    state.rewards_service.reset_daily_points();
    let summaries: Vec<shared::RewardSummary> = state
        .rewards_service
        .all_points()
        .iter()
        .map(mappers::reward_summary_to_dto)
        .collect();
    (StatusCode::OK, Json(summaries)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::csv::CsvConnection;
    use crate::{build_state, create_router};
    use axum::body::Body;
    use axum::http::{Method, Request};
    use std::sync::Arc;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_rewards_lifecycle() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let state = build_state(Arc::new(CsvConnection::new(dir.path())?));
        // 12 completions: 120 points, two full star tiers
        for _ in 0..12 {
            state.rewards_service.add_points_for_task("kid1", "Alice");
        }
        let app = create_router(state);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/rewards/kid1")
                    .method(Method::GET)
                    .body(Body::empty())?,
            )
            .await?;
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let summary: shared::RewardSummary = serde_json::from_slice(&body)?;
        assert_eq!(summary.points.total_points, 120);
        assert_eq!(summary.stars, 2);
        assert_eq!(summary.points_to_next_star, 30);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/rewards/reset-daily")
                    .method(Method::POST)
                    .body(Body::empty())?,
            )
            .await?;
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let summaries: Vec<shared::RewardSummary> = serde_json::from_slice(&body)?;
        assert_eq!(summaries[0].points.daily_points, 0);
        assert_eq!(summaries[0].points.total_points, 120);

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_child_rewards() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let state = build_state(Arc::new(CsvConnection::new(dir.path())?));
        let app = create_router(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/rewards/ghost")
                    .method(Method::GET)
                    .body(Body::empty())?,
            )
            .await?;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        Ok(())
    }
}
