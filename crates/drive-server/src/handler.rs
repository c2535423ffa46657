use std::sync::Arc;

use axum::extract::{Multipart, Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use bytes::Bytes;
use serde::Deserialize;
use serde_json::json;

use drive_sdk::CatalogService;
use drive_store::StoreError;
use drive_types::{CatalogStats, FileRecord};

use crate::error::{ServerError, ServerResult};

/// Shared state of every handler.
#[derive(Clone, Debug)]
pub struct AppState {
    pub service: Arc<CatalogService>,
}

impl AppState {
    pub fn new(service: Arc<CatalogService>) -> Self {
        Self { service }
    }

    /// Run a synchronous service call on the blocking pool.
    async fn call<T, F>(&self, f: F) -> ServerResult<T>
    where
        F: FnOnce(&CatalogService) -> T + Send + 'static,
        T: Send + 'static,
    {
        let service = Arc::clone(&self.service);
        tokio::task::spawn_blocking(move || f(&service))
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}

/// Health check handler.
pub async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Info handler.
pub async fn info_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "name": "drive-server",
        "version": env!("CARGO_PKG_VERSION"),
        "bucket": state.service.blobs().bucket(),
        "collection": state.service.collection(),
        "max_file_size_bytes": state.service.max_file_size_bytes(),
    }))
}

struct UploadForm {
    name: String,
    content_type: Option<String>,
    data: Bytes,
}

async fn read_upload(mut multipart: Multipart) -> ServerResult<UploadForm> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let name = field
            .file_name()
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .ok_or_else(|| ServerError::BadRequest("file field has no filename".into()))?;
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await?;
        return Ok(UploadForm {
            name,
            content_type,
            data,
        });
    }
    Err(ServerError::BadRequest("missing multipart field: file".into()))
}

/// `POST /v1/files`: store the `file` field and return its new record.
pub async fn upload_handler(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ServerResult<(StatusCode, Json<FileRecord>)> {
    let form = read_upload(multipart).await?;
    let record = state
        .call(move |service| {
            service.upload(&form.data, &form.name, form.content_type.as_deref())
        })
        .await??;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn list_handler(State(state): State<AppState>) -> ServerResult<Json<Vec<FileRecord>>> {
    Ok(Json(state.call(|service| service.list()).await?))
}

pub async fn get_file_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServerResult<Json<FileRecord>> {
    let lookup = id.clone();
    state
        .call(move |service| service.find(&lookup))
        .await?
        .map(Json)
        .ok_or_else(|| ServerError::NotFound(format!("file {id}")))
}

#[derive(Debug, Deserialize)]
pub struct DeleteParams {
    pub storage_path: String,
}

/// `DELETE /v1/files/:id?storage_path=...`
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<DeleteParams>,
) -> ServerResult<StatusCode> {
    state
        .call(move |service| service.delete(&id, &params.storage_path))
        .await??;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn stats_handler(State(state): State<AppState>) -> ServerResult<Json<CatalogStats>> {
    Ok(Json(state.call(|service| service.stats()).await?))
}

/// `GET /v1/blobs/:bucket/*key`: the target of every public download URL.
///
/// Blobs never granted public access answer 404, same as absent ones.
pub async fn blob_handler(
    State(state): State<AppState>,
    Path((bucket, key)): Path<(String, String)>,
) -> ServerResult<Response> {
    if bucket != state.service.blobs().bucket() {
        return Err(ServerError::NotFound(format!("bucket {bucket}")));
    }
    let lookup = key.clone();
    let read = state
        .call(move |service| {
            let blobs = service.blobs();
            if !blobs.is_public(&lookup)? {
                return Ok(None);
            }
            blobs.read(&lookup)
        })
        .await?;
    let blob = match read {
        Ok(Some(blob)) => blob,
        Ok(None) | Err(StoreError::InvalidKey { .. }) => {
            return Err(ServerError::NotFound(format!("blob {key}")))
        }
        Err(e) => return Err(ServerError::Store(e.into())),
    };
    let content_type = blob
        .content_type
        .unwrap_or_else(|| "application/octet-stream".to_string());
    Ok(([(header::CONTENT_TYPE, content_type)], blob.data).into_response())
}
