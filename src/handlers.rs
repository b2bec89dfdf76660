use crate::dates::{format_key, today};
use crate::errors::AppError;
use crate::models::{
    GridView, NewTaskRequest, NotifyRequest, Task, ToggleRequest, ToggleResponse,
};
use crate::session::{Session, ToggleOutcome};
use crate::state::AppState;
use crate::storage::save_document;
use crate::ui::{self, render_index, TaskForm};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use tokio::time::Instant;
use tracing::{debug, info};

pub async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let mut session = state.session.lock().await;
    ensure_today(&state, &mut session).await?;
    Ok(Html(render_page(&session, &TaskForm::default())))
}

pub async fn get_grid(State(state): State<AppState>) -> Result<Json<GridView>, AppError> {
    let mut session = state.session.lock().await;
    ensure_today(&state, &mut session).await?;
    Ok(Json(session.grid(today())))
}

pub async fn toggle(
    State(state): State<AppState>,
    Form(payload): Form<ToggleRequest>,
) -> Result<Redirect, AppError> {
    apply_toggle(&state, payload).await?;
    Ok(Redirect::to("/"))
}

pub async fn api_toggle(
    State(state): State<AppState>,
    Json(payload): Json<ToggleRequest>,
) -> Result<Json<ToggleResponse>, AppError> {
    Ok(Json(apply_toggle(&state, payload).await?))
}

pub async fn add_task(
    State(state): State<AppState>,
    Form(payload): Form<NewTaskRequest>,
) -> Result<Response, AppError> {
    let mut session = state.session.lock().await;
    match session.register(&payload.name, &payload.emoji) {
        Ok(task) => {
            save_document(&state.data_path, &session.document).await?;
            info!(task_id = %task.id, "registered task");
            Ok(Redirect::to("/").into_response())
        }
        Err(err) => {
            debug!(field = err.field(), "rejected task registration");
            let form = TaskForm::rejected(&payload.name, &payload.emoji, err.to_string());
            Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                Html(render_page(&session, &form)),
            )
                .into_response())
        }
    }
}

pub async fn api_add_task(
    State(state): State<AppState>,
    Json(payload): Json<NewTaskRequest>,
) -> Result<Json<Task>, AppError> {
    let mut session = state.session.lock().await;
    let task = session.register(&payload.name, &payload.emoji)?;
    save_document(&state.data_path, &session.document).await?;
    info!(task_id = %task.id, "registered task");
    Ok(Json(task))
}

pub async fn notify(
    State(state): State<AppState>,
    Form(payload): Form<NotifyRequest>,
) -> Redirect {
    let mut session = state.session.lock().await;
    session.notify(payload.name, Instant::now());
    Redirect::to("/")
}

pub async fn toggle_view_mode(State(state): State<AppState>) -> Redirect {
    let mut session = state.session.lock().await;
    let mode = session.toggle_view_mode();
    debug!(mode = mode.as_str(), "switched view mode");
    Redirect::to("/")
}

pub async fn styles() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], ui::STYLES_CSS)
}

pub async fn app_js() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/javascript; charset=utf-8")],
        ui::APP_JS,
    )
}

pub async fn manifest() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/manifest+json")], ui::MANIFEST)
}

pub async fn icon_192() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "image/svg+xml")], ui::ICON_192)
}

pub async fn icon_512() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "image/svg+xml")], ui::ICON_512)
}

async fn apply_toggle(state: &AppState, payload: ToggleRequest) -> Result<ToggleResponse, AppError> {
    let today = format_key(today());
    let mut session = state.session.lock().await;
    let outcome = session.toggle(&today, &payload.date, &payload.task_id);

    let (checked, applied) = match outcome {
        ToggleOutcome::Toggled(checked) => {
            save_document(&state.data_path, &session.document).await?;
            (checked, true)
        }
        ToggleOutcome::Ignored => {
            debug!(date = %payload.date, "ignored toggle outside today");
            (
                session.document.is_checked(&payload.date, &payload.task_id),
                false,
            )
        }
    };

    Ok(ToggleResponse {
        date: payload.date,
        task_id: payload.task_id,
        checked,
        applied,
    })
}

async fn ensure_today(state: &AppState, session: &mut Session) -> Result<(), AppError> {
    if session.ensure_today(&format_key(today())) {
        save_document(&state.data_path, &session.document).await?;
    }
    Ok(())
}

fn render_page(session: &Session, form: &TaskForm) -> String {
    let grid = session.grid(today());
    render_index(
        &grid,
        session.view_mode,
        session.notification.visible_text(Instant::now()),
        form,
    )
}
