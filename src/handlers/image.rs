//! Image handlers
//!
//! Upload, listing and guarded deletion of person images. An image referenced
//! by any person record cannot be deleted. The file removal and the list
//! update are not atomic; the list is rebuilt from disk at startup.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

use crate::entity::person;
use crate::error::{AppError, AppResult};
use crate::handlers::db_err;
use crate::images::is_image_filename;
use crate::state::AppState;

/// GET /api/images
pub async fn get_images(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.images.list().await)
}

/// DELETE /api/image/:filename
pub async fn delete_image(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> AppResult<StatusCode> {
    if filename.trim().is_empty() {
        return Err(AppError::Validation("missing filename parameter".to_string()));
    }

    // Make sure the image file is not associated with any person.
    let in_use = person::Entity::find()
        .filter(person::Column::ImagePath.eq(filename.as_str()))
        .one(&state.db)
        .await
        .map_err(|e| db_err("delete_image", e))?;
    if in_use.is_some() {
        return Err(AppError::Conflict("image is in use; cannot delete".to_string()));
    }

    tokio::fs::remove_file(state.images.path_of(&filename))
        .await
        .map_err(|e| {
            tracing::error!("failed to delete image file {}: {}", filename, e);
            AppError::Internal("failed to delete file".to_string())
        })?;

    state.images.remove(&filename).await;

    tracing::info!("image deleted: {}", filename);

    Ok(StatusCode::NO_CONTENT)
}

/// POST /upload
///
/// Multipart image upload. Accepts .png/.jpg/.jpeg, rejects duplicates and
/// appends the filename to the shared image list. Body size is bounded by the
/// route layer.
pub async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<StatusCode> {
    let mut uploaded = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };

        if !is_image_filename(&filename) {
            return Err(AppError::Validation(
                "only .png, .jpg and .jpeg files are accepted".to_string(),
            ));
        }

        let path = state.images.path_of(&filename);
        if tokio::fs::try_exists(&path).await? {
            return Err(AppError::BadRequest(
                "an image with the same name already exists".to_string(),
            ));
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        tokio::fs::write(&path, &data).await?;

        state.images.push(filename.clone()).await;
        tracing::info!("image uploaded: {}", filename);
        uploaded = Some(filename);
    }

    match uploaded {
        Some(_) => Ok(StatusCode::CREATED),
        None => Err(AppError::Validation("no image file in request".to_string())),
    }
}
