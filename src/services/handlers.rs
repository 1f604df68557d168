//! Generic CRUD handlers over a `RecordStore`.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tower_http::trace::TraceLayer;

use crate::services::{parse_body, RecordStore, Resource, ServiceError};

type Store<R> = State<Arc<RecordStore<R>>>;

/// Build a CRUD router for `R` mounted at `base_path`.
///
/// ```text
/// GET    {base}       list
/// POST   {base}       create  → 201
/// GET    {base}/{id}  get
/// PUT    {base}/{id}  update
/// DELETE {base}/{id}  delete  → 204
/// GET    /            liveness banner (when base is not the root)
/// ```
pub fn crud_router<R: Resource>(base_path: &str, banner: &'static str) -> Router {
    let trimmed = base_path.trim_matches('/');
    let base = if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    };
    let store = Arc::new(RecordStore::<R>::new());

    let mut router = Router::new().route(
        &format!("{base}/{{id}}"),
        get(get_one::<R>).put(update::<R>).delete(delete::<R>),
    );

    if base.is_empty() {
        router = router.route("/", get(list::<R>).post(create::<R>));
    } else {
        router = router
            .route(&base, get(list::<R>).post(create::<R>))
            .route(&format!("{base}/"), get(list::<R>).post(create::<R>))
            .route("/", get(move || async move { banner }));
    }

    tracing::debug!(base = %base, "CRUD routes registered");

    router.with_state(store).layer(TraceLayer::new_for_http())
}

async fn list<R: Resource>(State(store): Store<R>) -> Json<Vec<R>> {
    Json(store.list().await)
}

async fn create<R: Resource>(
    State(store): Store<R>,
    body: Bytes,
) -> Result<(StatusCode, Json<R>), ServiceError> {
    let payload = parse_body::<R::Create>(&body)?;
    let record = store.create(payload).await?;
    tracing::info!(id = %record.id(), "Record created");
    Ok((StatusCode::CREATED, Json(record)))
}

async fn get_one<R: Resource>(
    State(store): Store<R>,
    Path(id): Path<String>,
) -> Result<Json<R>, ServiceError> {
    Ok(Json(store.get(&id).await?))
}

async fn update<R: Resource>(
    State(store): Store<R>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<R>, ServiceError> {
    let payload = parse_body::<R::Update>(&body)?;
    let record = store.update(&id, payload).await?;
    tracing::info!(id = %id, "Record updated");
    Ok(Json(record))
}

async fn delete<R: Resource>(
    State(store): Store<R>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServiceError> {
    store.delete(&id).await?;
    tracing::info!(id = %id, "Record deleted");
    Ok(StatusCode::NO_CONTENT)
}
