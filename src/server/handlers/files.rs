//! File handlers: upload form, listing, upload, download and inline view.
//!
//! Every handler that takes a name runs it through `sanitize` and then
//! `confine` before touching the gateway. Failures on that path surface as a
//! bare 404.

use axum::body::Body;
use axum::extract::multipart::MultipartError;
use axum::extract::{Extension, Multipart, Path, State};
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Redirect, Response};
use log::{info, warn};
use tokio::io::AsyncReadExt;
use tokio_util::io::ReaderStream;

use crate::error::{AppError, RejectReason, StorageError};
use crate::html::pages;
use crate::server::AppState;
use crate::session::{AuthContext, Flash};
use crate::storage::policy::extension_of;
use crate::storage::{confine, sanitize};

/// Name of the multipart field carrying the upload.
pub const UPLOAD_FIELD: &str = "file";

pub async fn index(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Html<String> {
    let pending = state.sessions.take_flashes(&auth.token).await;
    Html(pages::index(&auth.username, &pending, &state.policy))
}

/// Lists stored files sorted by name. A missing storage root reads as empty.
pub async fn list_files(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let mut files = match state.gateway.list().await {
        Ok(listing) => listing.collect().await?,
        Err(StorageError::NotFound(root)) => {
            warn!("Storage root {} is missing; listing no files", root);
            Vec::new()
        }
        Err(e) => return Err(e.into()),
    };

    // Only names that survive sanitization unchanged can be fetched back.
    files.retain(|file| matches!(sanitize(&file.name), Ok(name) if name == file.name));
    files.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(Html(pages::file_list(&files)))
}

/// What the multipart body turned out to contain.
enum Received {
    NoFilePart,
    NoSelectedFile,
    File {
        raw_name: String,
        bytes: Vec<u8>,
        size: u64,
    },
}

/// Reads the upload field, stopping as soon as more than `max_size` bytes
/// have arrived. An oversize upload is returned with its bytes discarded.
async fn receive_file(multipart: &mut Multipart, max_size: u64) -> Result<Received, MultipartError> {
    while let Some(mut field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let raw_name = field.file_name().unwrap_or_default().to_string();
        if raw_name.is_empty() {
            return Ok(Received::NoSelectedFile);
        }

        let mut bytes = Vec::new();
        let mut size = 0u64;
        while let Some(chunk) = field.chunk().await? {
            size += chunk.len() as u64;
            if size > max_size {
                return Ok(Received::File {
                    raw_name,
                    bytes: Vec::new(),
                    size,
                });
            }
            bytes.extend_from_slice(&chunk);
        }

        return Ok(Received::File {
            raw_name,
            bytes,
            size,
        });
    }

    Ok(Received::NoFilePart)
}

fn rejection_message(reason: &RejectReason) -> String {
    match reason {
        RejectReason::TooLarge { max, .. } => {
            format!("File too large! Maximum size is {}MB", max / (1024 * 1024))
        }
        RejectReason::BadExtension(_) => "File type not allowed!".to_string(),
    }
}

/// Runs sanitizer, policy and boundary check, then stores the upload.
///
/// Every outcome except a storage failure redirects to `/` with a flash.
pub async fn upload(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    mut multipart: Multipart,
) -> Result<Redirect, AppError> {
    let max_size = state.policy.max_size_bytes();

    let flash = match receive_file(&mut multipart, max_size).await {
        Err(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            warn!("Upload body exceeded transport limit: {}", e);
            let reason = RejectReason::TooLarge {
                size: max_size + 1,
                max: max_size,
            };
            Flash::error(rejection_message(&reason))
        }
        Err(e) => {
            warn!("Malformed upload from {}: {}", auth.username, e);
            Flash::error("Upload failed: malformed request")
        }
        Ok(Received::NoFilePart) => Flash::error("No file part"),
        Ok(Received::NoSelectedFile) => Flash::error("No selected file"),
        Ok(Received::File {
            raw_name,
            bytes,
            size,
        }) => store_upload(&state, &raw_name, &bytes, size).await?,
    };

    state.sessions.push_flash(&auth.token, flash).await;
    Ok(Redirect::to("/"))
}

async fn store_upload(
    state: &AppState,
    raw_name: &str,
    bytes: &[u8],
    size: u64,
) -> Result<Flash, AppError> {
    let name = match sanitize(raw_name) {
        Ok(name) => name,
        Err(e) => {
            warn!("Rejected upload name {:?}: {}", raw_name, e);
            return Ok(Flash::error("Invalid filename!"));
        }
    };

    if let Err(reason) = state.policy.accept(&name, size) {
        warn!("Rejected upload {}: {}", name, reason);
        return Ok(Flash::error(rejection_message(&reason)));
    }

    if let Err(e) = confine(state.storage_root(), &name) {
        warn!("Rejected upload {}: {}", name, e);
        return Ok(Flash::error("Invalid file path!"));
    }

    let stored = state.gateway.store(&name, bytes).await?;
    info!("Uploaded {} ({} bytes)", stored.name, stored.size);
    Ok(Flash::success(format!(
        "File {} uploaded successfully!",
        stored.name
    )))
}

/// Sends a stored file as an attachment.
pub async fn download(
    State(state): State<AppState>,
    Path(raw_name): Path<String>,
) -> Result<Response, AppError> {
    let name = sanitize(&raw_name)?;
    confine(state.storage_root(), &name)?;

    let retrieved = state.gateway.retrieve(&name).await?;
    let headers = [
        (header::CONTENT_TYPE, "application/octet-stream".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", name),
        ),
        (header::CONTENT_LENGTH, retrieved.stored.size.to_string()),
    ];
    let body = Body::from_stream(ReaderStream::new(retrieved.file));

    Ok((headers, body).into_response())
}

/// Renders `.txt` files inline; any other existing file gets the
/// "cannot view" page. A missing file is a 404 whatever its extension.
pub async fn view(
    State(state): State<AppState>,
    Path(raw_name): Path<String>,
) -> Result<Response, AppError> {
    let name = sanitize(&raw_name)?;
    confine(state.storage_root(), &name)?;

    let mut retrieved = state.gateway.retrieve(&name).await?;
    if extension_of(&name).as_deref() != Some("txt") {
        return Ok(Html(pages::cannot_view(&name)).into_response());
    }

    let mut bytes = Vec::new();
    retrieved
        .file
        .read_to_end(&mut bytes)
        .await
        .map_err(StorageError::Io)?;
    let content = String::from_utf8_lossy(&bytes);

    Ok(Html(pages::view(&name, &content)).into_response())
}

/// Fallback for unmatched routes.
pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Html(pages::not_found()))
}
