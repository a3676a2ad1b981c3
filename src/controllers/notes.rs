//! Notes REST API — ownership-gated CRUD plus file upload/download
//!
//! Every handler resolves the request identity first; a missing or invalid
//! bearer token yields 401 before any store call. Ownership mismatches come
//! back from the store as NotFound and surface as 404.

use actix_multipart::Multipart;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use futures_util::StreamExt;
use serde::Deserialize;

use super::internal_error;
use crate::auth::require_identity;
use crate::codec::{FormatError, NoteFormat};
use crate::models::{CreateNoteRequest, NoteResponse, UpdateNoteRequest};
use crate::notes::StoreError;
use crate::AppState;

fn store_error_response(context: &str, e: StoreError) -> HttpResponse {
    match e {
        StoreError::NotFound(id) => HttpResponse::NotFound().json(serde_json::json!({
            "error": format!("Note {} not found", id)
        })),
        StoreError::EmptyTitle | StoreError::ContentTooLong => {
            HttpResponse::BadRequest().json(serde_json::json!({
                "error": e.to_string()
            }))
        }
        StoreError::Format(FormatError::Unsupported(tag)) => HttpResponse::UnsupportedMediaType()
            .json(serde_json::json!({
                "error": format!("Unsupported format: {}", tag)
            })),
        e => internal_error(context, e),
    }
}

/// List the caller's notes
async fn list_notes(data: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    let identity = match require_identity(&data, &req) {
        Ok(identity) => identity,
        Err(resp) => return resp,
    };

    match data.notes.list_for_user(&identity) {
        Ok(notes) => {
            let body: Vec<NoteResponse> = notes.into_iter().map(NoteResponse::from).collect();
            HttpResponse::Ok().json(body)
        }
        Err(e) => store_error_response("Failed to list notes", e),
    }
}

/// Create a note
async fn create_note(
    data: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<CreateNoteRequest>,
) -> impl Responder {
    let identity = match require_identity(&data, &req) {
        Ok(identity) => identity,
        Err(resp) => return resp,
    };

    let content = body.content.as_deref().unwrap_or("");
    match data.notes.create(&identity, &body.title, content) {
        Ok(note) => HttpResponse::Created().json(NoteResponse::from(note)),
        Err(e) => store_error_response("Failed to create note", e),
    }
}

/// Update an existing note
async fn update_note(
    data: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<UpdateNoteRequest>,
) -> impl Responder {
    let identity = match require_identity(&data, &req) {
        Ok(identity) => identity,
        Err(resp) => return resp,
    };

    let id = path.into_inner();
    let content = body.content.as_deref().unwrap_or("");
    match data.notes.update(&identity, id, &body.title, content) {
        Ok(note) => HttpResponse::Ok().json(NoteResponse::from(note)),
        Err(e) => store_error_response("Failed to update note", e),
    }
}

/// Delete a note
async fn delete_note(
    data: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> impl Responder {
    let identity = match require_identity(&data, &req) {
        Ok(identity) => identity,
        Err(resp) => return resp,
    };

    match data.notes.delete(&identity, path.into_inner()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => store_error_response("Failed to delete note", e),
    }
}

/// Import a note from an uploaded .txt / .json / .xml file
async fn upload_note(
    data: web::Data<AppState>,
    req: HttpRequest,
    mut payload: Multipart,
) -> impl Responder {
    let identity = match require_identity(&data, &req) {
        Ok(identity) => identity,
        Err(resp) => return resp,
    };

    // Drain the multipart stream, capturing the filename and the file bytes
    let mut file_data: Vec<u8> = Vec::new();
    let mut filename: Option<String> = None;

    while let Some(item) = payload.next().await {
        match item {
            Ok(mut field) => {
                if filename.is_none() {
                    filename = field
                        .content_disposition()
                        .get_filename()
                        .map(|s| s.to_string());
                }

                while let Some(chunk) = field.next().await {
                    match chunk {
                        Ok(bytes) => file_data.extend_from_slice(&bytes),
                        Err(e) => {
                            return HttpResponse::BadRequest().json(serde_json::json!({
                                "error": format!("Failed to read upload data: {}", e)
                            }));
                        }
                    }
                }
            }
            Err(e) => {
                return HttpResponse::BadRequest().json(serde_json::json!({
                    "error": format!("Failed to process upload: {}", e)
                }));
            }
        }
    }

    // The extension chooses the codec; unknown extensions are rejected
    // before any decode attempt.
    let extension = filename
        .as_deref()
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext)
        .unwrap_or("");

    let format = match NoteFormat::from_extension(extension) {
        Ok(format) => format,
        Err(FormatError::Unsupported(ext)) => {
            return HttpResponse::UnsupportedMediaType().json(serde_json::json!({
                "error": format!("Unsupported file extension: {:?}", ext)
            }));
        }
        Err(e) => return store_error_response("Failed to parse upload format", e.into()),
    };

    match data.notes.import_from_file(&identity, &file_data, format) {
        Ok(note) => HttpResponse::Ok().json(NoteResponse::from(note)),
        Err(e) => store_error_response("Failed to import note", e),
    }
}

#[derive(Deserialize)]
struct DownloadQuery {
    format: String,
}

/// Export a note as a file attachment in the requested format
async fn download_note(
    data: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i64>,
    query: web::Query<DownloadQuery>,
) -> impl Responder {
    let identity = match require_identity(&data, &req) {
        Ok(identity) => identity,
        Err(resp) => return resp,
    };

    let format = match NoteFormat::from_tag(&query.format) {
        Ok(format) => format,
        Err(_) => {
            return HttpResponse::UnsupportedMediaType().json(serde_json::json!({
                "error": format!("Unsupported format: {}", query.format)
            }));
        }
    };

    match data
        .notes
        .export_as_file(&identity, path.into_inner(), format)
    {
        Ok(file) => HttpResponse::Ok()
            .content_type(file.content_type)
            .insert_header((
                "Content-Disposition",
                format!("attachment; filename=\"{}\"", file.filename),
            ))
            .body(file.bytes),
        Err(e) => store_error_response("Failed to export note", e),
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/notes")
            .route("", web::get().to(list_notes))
            .route("", web::post().to(create_note))
            .route("/upload", web::post().to(upload_note))
            .route("/download/{id}", web::get().to(download_note))
            .route("/{id}", web::put().to(update_note))
            .route("/{id}", web::delete().to(delete_note)),
    );
}
