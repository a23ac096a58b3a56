use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_macros::debug_handler;
use serde_json::Value;
use utoipa::OpenApi;

use std::sync::Arc;

use crate::{
    dto::{
        CreateNoteRequest, ErrorResponse, FieldErrorResponse, ListNotesQuery, NoteResponse,
        UpdateNoteRequest,
    },
    service::{NoteError, NoteService},
    validation::{self, FieldError, ValidationErrors},
};

#[derive(OpenApi)]
#[openapi(
    paths(create_note, get_all_notes, get_one_note, update_note, delete_note),
    components(schemas(
        NoteResponse,
        CreateNoteRequest,
        UpdateNoteRequest,
        ErrorResponse,
        FieldErrorResponse
    )),
    tags(
        (name = "notes", description = "Notes management API")
    )
)]
pub struct ApiDoc;

fn error_body(error: &str, message: String) -> ErrorResponse {
    ErrorResponse {
        error: error.to_string(),
        message,
        fields: Vec::new(),
    }
}

impl IntoResponse for NoteError {
    fn into_response(self) -> Response {
        match self {
            Self::MalformedIdentifier(e) => {
                tracing::debug!("rejected note id: {}", e.0);
                (
                    StatusCode::BAD_REQUEST,
                    Json(error_body("malformed_identifier", e.to_string())),
                )
                    .into_response()
            }
            Self::InvalidPayload(e) => {
                tracing::debug!("rejected payload: {}", e);
                let message = e.to_string();
                let body = ErrorResponse {
                    fields: e.0.into_iter().map(Into::into).collect(),
                    ..error_body("invalid_payload", message)
                };
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            Self::NotFound(ref id) => {
                tracing::debug!("note {} not found", id);
                (
                    StatusCode::NOT_FOUND,
                    Json(error_body("not_found", self.to_string())),
                )
                    .into_response()
            }
            Self::Store(e) => {
                tracing::error!("note store failure: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(error_body("internal", "Internal server error".to_string())),
                )
                    .into_response()
            }
        }
    }
}

fn rejected(field: &str, message: String) -> NoteError {
    ValidationErrors(vec![FieldError {
        field: field.to_string(),
        message,
    }])
    .into()
}

fn json_body(body: Result<Json<Value>, JsonRejection>) -> Result<Value, NoteError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| rejected("body", rejection.body_text()))
}

fn list_query(
    query: Result<Query<ListNotesQuery>, QueryRejection>,
) -> Result<ListNotesQuery, NoteError> {
    query
        .map(|Query(query)| query)
        .map_err(|rejection| rejected("query", rejection.body_text()))
}

#[utoipa::path(
    post,
    path = "/notes",
    request_body = CreateNoteRequest,
    responses(
        (status = 201, description = "Note created successfully", body = NoteResponse),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn create_note(
    State(service): State<Arc<NoteService>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<NoteResponse>), NoteError> {
    let note = validation::validate_create(&json_body(body)?)?;
    let note = service.create_note(note).await?;

    Ok((StatusCode::CREATED, Json(note.into())))
}

#[utoipa::path(
    get,
    path = "/notes",
    params(ListNotesQuery),
    responses(
        (status = 200, description = "List of notes", body = Vec<NoteResponse>),
        (status = 400, description = "Invalid query string", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn get_all_notes(
    State(service): State<Arc<NoteService>>,
    query: Result<Query<ListNotesQuery>, QueryRejection>,
) -> Result<Json<Vec<NoteResponse>>, NoteError> {
    let query = list_query(query)?;
    // `?tag=` with no value lists everything
    let tag = query.tag.as_deref().filter(|tag| !tag.is_empty());
    let notes = service.list_notes(tag).await?;

    Ok(Json(notes.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/notes/{id}",
    params(
        ("id" = String, Path, description = "Note ID")
    ),
    responses(
        (status = 200, description = "Note found", body = NoteResponse),
        (status = 400, description = "Malformed note ID", body = ErrorResponse),
        (status = 404, description = "Note not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn get_one_note(
    State(service): State<Arc<NoteService>>,
    Path(id): Path<String>,
) -> Result<Json<NoteResponse>, NoteError> {
    let id = validation::parse_note_id(&id)?;
    let note = service.get_note(&id).await?;

    Ok(Json(note.into()))
}

#[utoipa::path(
    put,
    path = "/notes/{id}",
    params(
        ("id" = String, Path, description = "Note ID")
    ),
    request_body = UpdateNoteRequest,
    responses(
        (status = 200, description = "Note updated successfully", body = NoteResponse),
        (status = 400, description = "Malformed note ID or invalid payload", body = ErrorResponse),
        (status = 404, description = "Note not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn update_note(
    State(service): State<Arc<NoteService>>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<NoteResponse>, NoteError> {
    let id = validation::parse_note_id(&id)?;
    let patch = validation::validate_update(&json_body(body)?)?;
    let note = service.update_note(&id, patch).await?;

    Ok(Json(note.into()))
}

#[utoipa::path(
    delete,
    path = "/notes/{id}",
    params(
        ("id" = String, Path, description = "Note ID")
    ),
    responses(
        (status = 200, description = "Note deleted, last state returned", body = NoteResponse),
        (status = 400, description = "Malformed note ID", body = ErrorResponse),
        (status = 404, description = "Note not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn delete_note(
    State(service): State<Arc<NoteService>>,
    Path(id): Path<String>,
) -> Result<Json<NoteResponse>, NoteError> {
    let id = validation::parse_note_id(&id)?;
    let note = service.delete_note(&id).await?;

    Ok(Json(note.into()))
}
