use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, patch},
    Router,
};
use chrono::{Duration, Local, NaiveDate, NaiveDateTime};
use log::info;
use serde::Deserialize;

use crate::domain::calendar_service::DayBuckets;
use crate::domain::commands::completion::SetDoneCommand;
use crate::domain::dates;
use crate::domain::view_service::{ViewMode, VisibleTasks};
use crate::io::rest::{error_response, mappers};
use crate::AppState;

/// Query parameters shared by the calendar views. `household_id` is
/// accepted for wire compatibility; this backend serves a single
/// household.
#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    #[allow(dead_code)]
    pub household_id: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NowQuery {
    #[allow(dead_code)]
    pub household_id: Option<String>,
    pub datetime: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    #[allow(dead_code)]
    pub household_id: Option<String>,
    pub year: u32,
    pub month: u32,
}

/// Create a router for calendar related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/week", get(get_week))
        .route("/day", get(get_day))
        .route("/now", get(get_now))
        .route("/month", get(get_month))
        .route("/:instance_id/done", patch(set_instance_done))
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

fn parse_date_or_today(date: &Option<String>) -> Result<NaiveDate, String> {
    match date {
        None => Ok(today()),
        Some(s) => dates::parse_day_key(s).ok_or_else(|| format!("Invalid date: {}", s)),
    }
}

fn narrowed_buckets(state: &AppState, buckets: &DayBuckets, mode: ViewMode, anchor: NaiveDate) -> DayBuckets {
    let active_child = state.family_service.selected_child();
    match state.view_service.select_visible_days(
        buckets,
        mode,
        anchor,
        local_now(),
        active_child.as_deref(),
    ) {
        VisibleTasks::Buckets(buckets) => buckets,
        // Day/week narrowing always yields buckets
        VisibleTasks::Window(_) => DayBuckets::new(),
    }
}

/// Get the week view containing the anchor date
async fn get_week(
    State(state): State<AppState>,
    Query(query): Query<CalendarQuery>,
) -> impl IntoResponse {
    info!("GET /api/calendar/week - query: {:?}", query);

    let anchor = match parse_date_or_today(&query.date) {
        Ok(anchor) => anchor,
        Err(msg) => return (StatusCode::BAD_REQUEST, msg).into_response(),
    };

    let monday = dates::week_start(anchor);
    let overlay = state.completion_service.snapshot();
    let assembly = state
        .calendar_service
        .load_range(monday, monday + Duration::days(6), &overlay);

    let visible = narrowed_buckets(&state, &assembly.buckets, ViewMode::Week, anchor);
    let week = state.calendar_service.assemble_week(&visible, anchor, today());
    (StatusCode::OK, Json(week)).into_response()
}

/// Get a single day's task list
async fn get_day(
    State(state): State<AppState>,
    Query(query): Query<CalendarQuery>,
) -> impl IntoResponse {
    info!("GET /api/calendar/day - query: {:?}", query);

    let date = match parse_date_or_today(&query.date) {
        Ok(date) => date,
        Err(msg) => return (StatusCode::BAD_REQUEST, msg).into_response(),
    };

    let overlay = state.completion_service.snapshot();
    let assembly = state.calendar_service.load_range(date, date, &overlay);

    let visible = narrowed_buckets(&state, &assembly.buckets, ViewMode::Day, date);
    let day = state
        .calendar_service
        .assemble_day(&visible, &dates::date_key(date), today());
    (StatusCode::OK, Json(day)).into_response()
}

/// Get the current-time-window view: every loaded task classified
/// relative to "now"
async fn get_now(
    State(state): State<AppState>,
    Query(query): Query<NowQuery>,
) -> impl IntoResponse {
    info!("GET /api/calendar/now - query: {:?}", query);

    let now = match &query.datetime {
        None => local_now(),
        Some(s) => match dates::parse_iso(s) {
            Some(now) => now,
            None => {
                return (StatusCode::BAD_REQUEST, format!("Invalid datetime: {}", s))
                    .into_response()
            }
        },
    };

    // Load the surrounding days so a window near midnight sees both sides
    let date = now.date();
    let overlay = state.completion_service.snapshot();
    let assembly = state
        .calendar_service
        .load_range(date - Duration::days(1), date + Duration::days(1), &overlay);

    let active_child = state.family_service.selected_child();
    let window = state
        .view_service
        .now_window(&assembly.buckets, now, active_child.as_deref());

    let response = shared::CurrentTimeWindowResponse {
        current_time: dates::format_iso(window.now),
        current_date: dates::day_key(window.now),
        window_start: dates::format_iso(window.window_start),
        window_end: dates::format_iso(window.window_end),
        tasks: window.tasks.iter().map(mappers::now_task_to_dto).collect(),
        summary: shared::TimeWindowSummary {
            total: window.summary.total,
            completed: window.summary.completed,
            pending: window.summary.pending,
            current: window.summary.current,
            upcoming: window.summary.upcoming,
        },
        degraded: assembly.degraded,
    };
    (StatusCode::OK, Json(response)).into_response()
}

/// Get the month view
async fn get_month(
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> impl IntoResponse {
    info!("GET /api/calendar/month - query: {:?}", query);

    let total_days = dates::days_in_month(query.month, query.year);
    let (first, last) = match (
        NaiveDate::from_ymd_opt(query.year as i32, query.month, 1),
        NaiveDate::from_ymd_opt(query.year as i32, query.month, total_days),
    ) {
        (Some(first), Some(last)) => (first, last),
        _ => return (StatusCode::BAD_REQUEST, "Invalid month/year").into_response(),
    };

    let overlay = state.completion_service.snapshot();
    let assembly = state.calendar_service.load_range(first, last, &overlay);
    let visible = narrowed_buckets(&state, &assembly.buckets, ViewMode::Week, first);

    match state
        .calendar_service
        .assemble_month(&visible, query.month, query.year, today())
    {
        Some(month) => (StatusCode::OK, Json(month)).into_response(),
        None => (StatusCode::BAD_REQUEST, "Invalid month/year").into_response(),
    }
}

/// Toggle a task instance's done state
async fn set_instance_done(
    State(state): State<AppState>,
    Path(instance_id): Path<String>,
    Json(request): Json<shared::SetDoneRequest>,
) -> impl IntoResponse {
    info!(
        "PATCH /api/calendar/{}/done - done: {}",
        instance_id, request.done
    );

    let command = SetDoneCommand {
        instance_id,
        done: request.done,
    };

    match state.completion_service.set_done(command, local_now()) {
        Ok(outcome) => {
            let response = shared::SetDoneResponse {
                date: outcome.date,
                instance: mappers::InstanceMapper::to_dto(&outcome.instance),
                points: outcome.points.as_ref().map(mappers::points_to_dto),
                persisted: outcome.persisted,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response(e),
    }
}
