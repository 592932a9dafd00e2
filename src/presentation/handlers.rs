// HTTP request handlers
use crate::application::analytics_service::process_series;
use crate::application::data_context::DataContext;
use crate::application::host::PushTarget;
use crate::application::registry::Registration;
use crate::application::selector::{ApplyOutcome, RenderScope, TimewindowSelector, Transition};
use crate::application::settings::WidgetSettings;
use crate::domain::telemetry::TimeSeriesPoint;
use crate::domain::timewindow::{Aggregation, Direction, SelectorMode, Timewindow};
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::presentation::app_state::AppState;
use crate::presentation::error::ApiError;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::TimeZone;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct InitWidgetRequest {
    pub settings: WidgetSettings,
    pub context: Option<DataContext>,
}

#[derive(Debug, Deserialize)]
pub struct ModeRequest {
    pub mode: String,
}

#[derive(Debug, Deserialize)]
pub struct NavigateRequest {
    pub direction: i64,
}

#[derive(Debug, Deserialize)]
pub struct CustomRangeRequest {
    pub start: i64,
    pub end: i64,
}

#[derive(Debug, Deserialize)]
pub struct ProcessSeriesRequest {
    pub series: Vec<TimeSeriesPoint>,
    #[serde(default)]
    pub settings: WidgetSettings,
}

#[derive(Debug, Serialize)]
pub struct WidgetView {
    pub id: String,
    pub mode: SelectorMode,
    pub label: String,
    pub reference_date_ms: i64,
    pub custom_start_ms: Option<i64>,
    pub custom_end_ms: Option<i64>,
    pub aggregation: Aggregation,
}

impl WidgetView {
    fn of<Tz: TimeZone>(id: &str, selector: &TimewindowSelector<Tz>) -> Self {
        let state = selector.state();
        Self {
            id: id.to_string(),
            mode: selector.mode(),
            label: selector.label().to_string(),
            reference_date_ms: state.reference_date.timestamp_millis(),
            custom_start_ms: state.custom_start(),
            custom_end_ms: state.custom_end(),
            aggregation: selector.settings().aggregation,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TransitionResponse {
    pub widget: WidgetView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<bool>,
    pub render: Option<RenderScope>,
    pub pushed_to: Option<PushTarget>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host_unavailable: Option<PushTarget>,
    pub timewindow: Option<Timewindow>,
}

impl TransitionResponse {
    fn new(widget: WidgetView, outcome: Option<ApplyOutcome>, render: Option<RenderScope>) -> Self {
        let (pushed_to, host_unavailable) = match outcome {
            Some(ApplyOutcome::Pushed { target, .. }) => (Some(target), None),
            Some(ApplyOutcome::HostUnavailable { target, .. }) => (None, Some(target)),
            _ => (None, None),
        };
        Self {
            widget,
            created: None,
            render,
            pushed_to,
            host_unavailable,
            timewindow: outcome.and_then(|o| o.timewindow()),
        }
    }

    fn from_transition(widget: WidgetView, transition: Option<Transition>) -> Self {
        Self::new(
            widget,
            transition.map(|t| t.outcome),
            transition.map(|t| t.render),
        )
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Initialize a widget's selector, or return the existing one unchanged
pub async fn init_widget(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(request): Json<InitWidgetRequest>,
) -> Result<Json<TransitionResponse>, ApiError> {
    let settings = state.widget_defaults.clone().overlay(request.settings);
    let use_dashboard = state.use_dashboard_timewindow;

    let mut sessions = state.sessions()?;
    let sessions = &mut *sessions;
    if let Some(context) = request.context {
        sessions.contexts.insert(id.clone(), context);
    }

    let empty = DataContext::default();
    let context = sessions.contexts.get(&id).unwrap_or(&empty);
    let (selector, registration) = sessions.selectors.get_or_init(&id, || settings.resolve().selector);

    // only a fresh selector pushes its initial range
    let outcome = match registration {
        Registration::Created => Some(selector.apply(&mut sessions.host.for_widget(&id, use_dashboard), context)),
        Registration::Existing => None,
    };

    let render = outcome.map(|_| RenderScope::Full);
    let mut response = TransitionResponse::new(WidgetView::of(&id, selector), outcome, render);
    response.created = Some(registration == Registration::Created);
    Ok(Json(response))
}

pub async fn get_widget(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<WidgetView>, ApiError> {
    let sessions = state.sessions()?;
    let selector = sessions
        .selectors
        .get(&id)
        .ok_or_else(|| ApiError::UnknownWidget(id.clone()))?;
    Ok(Json(WidgetView::of(&id, selector)))
}

/// Widget teardown: drops the selector, its data context and its timewindow
pub async fn destroy_widget(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<StatusCode, ApiError> {
    let mut sessions = state.sessions()?;
    sessions
        .selectors
        .remove(&id)
        .ok_or_else(|| ApiError::UnknownWidget(id.clone()))?;
    sessions.contexts.remove(&id);
    sessions.host.forget_widget(&id);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn select_mode(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(request): Json<ModeRequest>,
) -> Result<Json<TransitionResponse>, ApiError> {
    let mode: SelectorMode = request.mode.parse()?;
    let use_dashboard = state.use_dashboard_timewindow;

    let mut sessions = state.sessions()?;
    let sessions = &mut *sessions;
    let empty = DataContext::default();
    let context = sessions.contexts.get(&id).unwrap_or(&empty);
    let selector = sessions
        .selectors
        .get_mut(&id)
        .ok_or_else(|| ApiError::UnknownWidget(id.clone()))?;

    let transition = selector.select_mode(mode, &mut sessions.host.for_widget(&id, use_dashboard), context);
    Ok(Json(TransitionResponse::from_transition(
        WidgetView::of(&id, selector),
        Some(transition),
    )))
}

/// Step the calendar period; a no-op in custom mode
pub async fn navigate(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(request): Json<NavigateRequest>,
) -> Result<Json<TransitionResponse>, ApiError> {
    let direction = Direction::try_from(request.direction)?;
    let use_dashboard = state.use_dashboard_timewindow;

    let mut sessions = state.sessions()?;
    let sessions = &mut *sessions;
    let empty = DataContext::default();
    let context = sessions.contexts.get(&id).unwrap_or(&empty);
    let selector = sessions
        .selectors
        .get_mut(&id)
        .ok_or_else(|| ApiError::UnknownWidget(id.clone()))?;

    let transition = selector.navigate(direction, &mut sessions.host.for_widget(&id, use_dashboard), context);
    Ok(Json(TransitionResponse::from_transition(
        WidgetView::of(&id, selector),
        transition,
    )))
}

/// Date-picker apply
pub async fn apply_custom_range(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(request): Json<CustomRangeRequest>,
) -> Result<Json<TransitionResponse>, ApiError> {
    let use_dashboard = state.use_dashboard_timewindow;

    let mut sessions = state.sessions()?;
    let sessions = &mut *sessions;
    let selector = sessions
        .selectors
        .get_mut(&id)
        .ok_or_else(|| ApiError::UnknownWidget(id.clone()))?;

    let transition = selector.apply_custom_range(
        request.start,
        request.end,
        &mut sessions.host.for_widget(&id, use_dashboard),
    );
    Ok(Json(TransitionResponse::from_transition(
        WidgetView::of(&id, selector),
        Some(transition),
    )))
}

/// Data-update notification: replace the context used for ${attribute} lookups
pub async fn update_context(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(context): Json<DataContext>,
) -> Result<StatusCode, ApiError> {
    let mut sessions = state.sessions()?;
    if sessions.selectors.get(&id).is_none() {
        return Err(ApiError::UnknownWidget(id));
    }
    sessions.contexts.insert(id, context);
    Ok(StatusCode::NO_CONTENT)
}

/// Run outlier removal, smoothing and statistics over one series
pub async fn process_series_handler(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(request): Json<ProcessSeriesRequest>,
) -> impl IntoResponse {
    let settings = state.widget_defaults.clone().overlay(request.settings).resolve();
    let processed = process_series(&request.series, &settings.analytics);

    match json_response(&processed, accepts_brotli(&headers)).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

pub async fn dashboard_timewindow(State(state): State<Arc<AppState>>) -> Result<Json<Timewindow>, ApiError> {
    let sessions = state.sessions()?;
    sessions.host.dashboard().copied().map(Json).ok_or(ApiError::NoTimewindow)
}

pub async fn widget_timewindow(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Timewindow>, ApiError> {
    let sessions = state.sessions()?;
    sessions.host.widget(&id).copied().map(Json).ok_or(ApiError::NoTimewindow)
}
