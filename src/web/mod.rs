//! Web host: the router and the handlers behind the page's three controls.
//!
//! One controller lives for the whole process. Its lock is released while the
//! model call runs; the Loading state keeps a second attempt out.

pub mod page;
pub mod view;

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::header,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::MAX_UPLOAD_BYTES;
use crate::controller::{Controller, ImageSlot, SourceImage};
use crate::error::ApiError;
use crate::gateway::Gateway;

pub use view::{ViewSnapshot, WebView};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<Mutex<Controller<WebView>>>,
    pub gateway: Gateway,
}

impl AppState {
    pub fn new(gateway: Gateway) -> Self {
        Self {
            session: Arc::new(Mutex::new(Controller::new(WebView::new()))),
            gateway,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(page::index))
        .route("/health", get(|| async { "OK" }))
        .route("/api/view", get(handle_view))
        .route("/api/source", post(handle_source))
        .route("/api/enhance", post(handle_enhance))
        .route("/api/image/:slot", get(handle_image))
        .route("/api/download", get(handle_download))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
}

fn snapshot(session: &mut Controller<WebView>) -> ViewSnapshot {
    let phase = session.phase();
    session.ui_mut().snapshot(phase)
}

async fn handle_view(State(state): State<AppState>) -> Json<ViewSnapshot> {
    let mut session = state.session.lock().await;
    Json(snapshot(&mut session))
}

/// File selection: the first field carrying data becomes the photo.
async fn handle_source(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ViewSnapshot>, ApiError> {
    while let Some(field) = multipart.next_field().await? {
        let name = field
            .file_name()
            .or_else(|| field.name())
            .unwrap_or("upload")
            .to_string();
        let declared = field.content_type().map(str::to_string);
        let bytes = field.bytes().await?;
        if bytes.is_empty() {
            continue;
        }

        let source = SourceImage::new(name, declared.as_deref(), bytes.to_vec());
        let mut session = state.session.lock().await;
        session.on_file_selected(source);
        return Ok(Json(snapshot(&mut session)));
    }

    Err(ApiError::BadRequest("upload contained no file".to_string()))
}

/// Enhance click. Answers with the Loading view; the request finishes in
/// the background.
async fn handle_enhance(State(state): State<AppState>) -> Json<ViewSnapshot> {
    let mut session = state.session.lock().await;

    if let Some(job) = session.begin_enhance() {
        let shared = Arc::clone(&state.session);
        let gateway = state.gateway.clone();
        tokio::spawn(async move {
            let outcome = job.run(&gateway).await;
            shared.lock().await.finish_enhance(job.attempt, outcome);
        });
    }

    Json(snapshot(&mut session))
}

async fn handle_image(
    State(state): State<AppState>,
    Path(slot): Path<String>,
) -> Result<Response, ApiError> {
    let slot = ImageSlot::parse(&slot).ok_or(ApiError::NotFound)?;
    let session = state.session.lock().await;
    let image = session.ui().image(slot).ok_or(ApiError::NotFound)?;

    Ok((
        [
            (header::CONTENT_TYPE, image.media_type.clone()),
            (header::CACHE_CONTROL, "no-store".to_string()),
        ],
        image.bytes.to_vec(),
    )
        .into_response())
}

async fn handle_download(State(state): State<AppState>) -> Result<Response, ApiError> {
    let mut session = state.session.lock().await;
    session.on_download_clicked();
    let download = session
        .ui_mut()
        .take_download()
        .ok_or(ApiError::DownloadUnavailable)?;

    Ok((
        [
            (header::CONTENT_TYPE, download.media_type),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", download.file_name),
            ),
        ],
        download.bytes,
    )
        .into_response())
}
