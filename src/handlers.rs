use crate::errors::AppError;
use crate::navigator::{DispatchOutcome, Snapshot};
use crate::state::AppState;
use crate::ui::render_index;
use crate::views::UiEvent;
use axum::{
    extract::{Form, State},
    response::{Html, Redirect},
    Json,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
pub struct ClickForm {
    pub target: String,
}

#[derive(Debug, Serialize)]
pub struct EventResponse {
    pub outcome: DispatchOutcome,
    pub snapshot: Snapshot,
}

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let snapshot = state.navigator.snapshot().await;
    Html(render_index(&today_string(), &snapshot))
}

pub async fn click(State(state): State<AppState>, Form(form): Form<ClickForm>) -> Redirect {
    state.navigator.dispatch(UiEvent::click(form.target)).await;
    Redirect::to("/")
}

pub async fn submit(
    State(state): State<AppState>,
    Form(mut fields): Form<BTreeMap<String, String>>,
) -> Result<Redirect, AppError> {
    let target = fields
        .remove("target")
        .ok_or_else(|| AppError::bad_request("missing event target"))?;
    state.navigator.dispatch(UiEvent::submit(target, fields)).await;
    Ok(Redirect::to("/"))
}

pub async fn get_view(State(state): State<AppState>) -> Json<Snapshot> {
    Json(state.navigator.snapshot().await)
}

pub async fn post_event(
    State(state): State<AppState>,
    Json(event): Json<UiEvent>,
) -> Json<EventResponse> {
    let outcome = state.navigator.dispatch(event).await;
    let snapshot = state.navigator.snapshot().await;
    Json(EventResponse { outcome, snapshot })
}

fn today_string() -> String {
    Local::now().format("%A, %B %-d, %Y").to_string()
}
