//! Notes REST API: CRUD over the injected `NoteStore`.
//!
//! Every route sits under `/notes` and behind the per-client rate limiter.

use actix_web::http::header;
use actix_web::middleware::from_fn;
use actix_web::{web, HttpRequest, HttpResponse};
use notes_types::{CreateNoteRequest, UpdateNoteRequest};
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::middleware::rate_limit;
use crate::notes::{NewNote, NoteChanges};
use crate::AppState;

/// Ids that are not integers can never match a row, so they are "not found".
fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.trim().parse().map_err(|_| ApiError::NotFound)
}

/// Read a request body leniently.
///
/// A missing or blank body, or one not declared as JSON, reads as `{}`.
/// Only a declared JSON body that fails to parse is rejected.
fn read_body<T: DeserializeOwned + Default>(
    req: &HttpRequest,
    payload: &web::Bytes,
) -> Result<T, ApiError> {
    let is_json = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|ct| ct.to_ascii_lowercase().contains("json"))
        .unwrap_or(false);

    if !is_json || payload.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }

    serde_json::from_slice(payload).map_err(|e| ApiError::InvalidBody(e.to_string()))
}

// GET /notes
async fn list_notes(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let notes = state.store.list()?;
    Ok(HttpResponse::Ok().json(notes))
}

// GET /notes/{id}
async fn get_note(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_id(&path)?;
    let note = state.store.get_by_id(id)?.ok_or(ApiError::NotFound)?;
    Ok(HttpResponse::Ok().json(note))
}

// POST /notes
async fn create_note(
    state: web::Data<AppState>,
    req: HttpRequest,
    payload: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let request: CreateNoteRequest = read_body(&req, &payload)?;

    let title = match request.title {
        Some(title) if !title.is_empty() => title,
        _ => return Err(ApiError::TitleRequired),
    };

    let note = state.store.insert(NewNote {
        title,
        body: request.body.unwrap_or_default(),
    })?;

    log::debug!("[NOTES] Created note {}", note.id);
    Ok(HttpResponse::Created().json(note))
}

// PUT /notes/{id}
async fn update_note(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: HttpRequest,
    payload: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let id = parse_id(&path)?;
    if state.store.get_by_id(id)?.is_none() {
        return Err(ApiError::NotFound);
    }

    let request: UpdateNoteRequest = read_body(&req, &payload)?;
    // A supplied title replaces the old one, so it has to be a real title
    if request.title.as_deref() == Some("") {
        return Err(ApiError::TitleRequired);
    }

    let note = state
        .store
        .update_by_id(
            id,
            NoteChanges {
                title: request.title,
                body: request.body,
            },
        )?
        .ok_or(ApiError::NotFound)?;

    log::debug!("[NOTES] Updated note {}", note.id);
    Ok(HttpResponse::Ok().json(note))
}

// DELETE /notes/{id}
async fn delete_note(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_id(&path)?;
    if !state.store.delete_by_id(id)? {
        return Err(ApiError::NotFound);
    }

    log::debug!("[NOTES] Deleted note {}", id);
    Ok(HttpResponse::NoContent().finish())
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/notes")
            .wrap(from_fn(rate_limit::enforce))
            .route("", web::get().to(list_notes))
            .route("", web::post().to(create_note))
            .route("/{id}", web::get().to(get_note))
            .route("/{id}", web::put().to(update_note))
            .route("/{id}", web::delete().to(delete_note)),
    );
}
