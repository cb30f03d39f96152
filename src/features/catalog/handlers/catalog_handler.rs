use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Redirect,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, AppQuery};
use crate::features::auth::guards::RequireAdmin;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::catalog::dtos::{
    CatalogViewDto, DeleteFileQuery, DeleteFileResponseDto, FileFormDto, FileRecordResponseDto,
    FormDraftDto, ListFilesQuery,
};
use crate::features::catalog::services::CatalogService;
use crate::shared::types::{ApiResponse, Meta};

/// List catalog records
///
/// Returns the records matching the search term and category, ordered and
/// split into two partitions according to `layout`.
#[utoipa::path(
    get,
    path = "/api/catalog/files",
    params(ListFilesQuery),
    responses(
        (status = 200, description = "Partitioned catalog view", body = ApiResponse<CatalogViewDto>),
        (status = 400, description = "Invalid query parameters"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "catalog",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_files(
    user: AuthenticatedUser,
    State(service): State<Arc<CatalogService>>,
    AppQuery(query): AppQuery<ListFilesQuery>,
) -> Result<Json<ApiResponse<CatalogViewDto>>> {
    let view = service.list(query, user.is_admin()).await;
    let total = view.matched;
    Ok(Json(ApiResponse::success(
        Some(view),
        None,
        Some(Meta { total }),
    )))
}

/// Get a catalog record
#[utoipa::path(
    get,
    path = "/api/catalog/files/{id}",
    params(
        ("id" = Uuid, Path, description = "Record id")
    ),
    responses(
        (status = 200, description = "Record found", body = ApiResponse<FileRecordResponseDto>),
        (status = 404, description = "Record not found")
    ),
    tag = "catalog",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_file(
    _user: AuthenticatedUser,
    State(service): State<Arc<CatalogService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<FileRecordResponseDto>>> {
    let record = service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(record), None, None)))
}

/// Open the linked spreadsheet
///
/// Redirects to the record's spreadsheet URL.
#[utoipa::path(
    get,
    path = "/api/catalog/files/{id}/open",
    params(
        ("id" = Uuid, Path, description = "Record id")
    ),
    responses(
        (status = 307, description = "Redirect to the spreadsheet"),
        (status = 404, description = "Record not found")
    ),
    tag = "catalog",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn open_file(
    _user: AuthenticatedUser,
    State(service): State<Arc<CatalogService>>,
    Path(id): Path<Uuid>,
) -> Result<Redirect> {
    let url = service.sheet_url(id).await?;
    Ok(Redirect::temporary(&url))
}

/// Initial values for the create form
#[utoipa::path(
    get,
    path = "/api/catalog/form",
    responses(
        (status = 200, description = "Blank form with default category", body = ApiResponse<FormDraftDto>),
        (status = 403, description = "Forbidden - Admin access required")
    ),
    tag = "catalog",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_draft(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<CatalogService>>,
) -> Result<Json<ApiResponse<FormDraftDto>>> {
    let draft = service.create_draft()?;
    Ok(Json(ApiResponse::success(Some(draft), None, None)))
}

/// Current values of a record for the edit form
#[utoipa::path(
    get,
    path = "/api/catalog/files/{id}/form",
    params(
        ("id" = Uuid, Path, description = "Record id")
    ),
    responses(
        (status = 200, description = "Form pre-filled from the record", body = ApiResponse<FormDraftDto>),
        (status = 403, description = "Forbidden - Admin access required"),
        (status = 404, description = "Record not found")
    ),
    tag = "catalog",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn edit_draft(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<CatalogService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<FormDraftDto>>> {
    let draft = service.edit_draft(id).await?;
    Ok(Json(ApiResponse::success(Some(draft), None, None)))
}

/// Create a catalog record
#[utoipa::path(
    post,
    path = "/api/catalog/files",
    request_body = FileFormDto,
    responses(
        (status = 201, description = "Record created", body = ApiResponse<FileRecordResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden - Admin access required")
    ),
    tag = "catalog",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_file(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<CatalogService>>,
    AppJson(dto): AppJson<FileFormDto>,
) -> Result<(StatusCode, Json<ApiResponse<FileRecordResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let record = service.create(dto.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(record), None, None)),
    ))
}

/// Edit a catalog record
#[utoipa::path(
    put,
    path = "/api/catalog/files/{id}",
    params(
        ("id" = Uuid, Path, description = "Record id")
    ),
    request_body = FileFormDto,
    responses(
        (status = 200, description = "Record updated", body = ApiResponse<FileRecordResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden - Admin access required"),
        (status = 404, description = "Record not found")
    ),
    tag = "catalog",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_file(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<CatalogService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<FileFormDto>,
) -> Result<Json<ApiResponse<FileRecordResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let record = service.update(id, dto.into()).await?;
    Ok(Json(ApiResponse::success(Some(record), None, None)))
}

/// Delete a catalog record
///
/// The record is only removed when `confirm=true`; otherwise nothing
/// changes and `deleted` is false.
#[utoipa::path(
    delete,
    path = "/api/catalog/files/{id}",
    params(
        ("id" = Uuid, Path, description = "Record id"),
        DeleteFileQuery
    ),
    responses(
        (status = 200, description = "Delete outcome", body = ApiResponse<DeleteFileResponseDto>),
        (status = 403, description = "Forbidden - Admin access required"),
        (status = 404, description = "Record not found")
    ),
    tag = "catalog",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_file(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<CatalogService>>,
    Path(id): Path<Uuid>,
    AppQuery(query): AppQuery<DeleteFileQuery>,
) -> Result<Json<ApiResponse<DeleteFileResponseDto>>> {
    let result = service.delete(id, query.confirmed()).await?;
    let message = if result.deleted {
        "File record deleted"
    } else {
        "Deletion cancelled"
    };
    Ok(Json(ApiResponse::success(
        Some(result),
        Some(message.to_string()),
        None,
    )))
}

/// Pin or unpin a catalog record
#[utoipa::path(
    post,
    path = "/api/catalog/files/{id}/pin",
    params(
        ("id" = Uuid, Path, description = "Record id")
    ),
    responses(
        (status = 200, description = "Pin flag toggled", body = ApiResponse<FileRecordResponseDto>),
        (status = 403, description = "Forbidden - Admin access required"),
        (status = 404, description = "Record not found")
    ),
    tag = "catalog",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn toggle_pin(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<CatalogService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<FileRecordResponseDto>>> {
    let record = service.toggle_pin(id).await?;
    Ok(Json(ApiResponse::success(Some(record), None, None)))
}
