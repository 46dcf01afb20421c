use axum::{
    body::Bytes,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::resume::{ResumeDocument, ResumePatch, Section, TemplateId};
use crate::render::{render, PresentationTree};
use crate::resumes::autosave::Draft;
use crate::resumes::photo::{photo_key, validate_photo};
use crate::resumes::repository;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ResumeListResponse {
    pub count: usize,
    pub resumes: Vec<ResumeDocument>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftAccepted {
    pub scheduled: bool,
    pub delay_ms: u64,
}

#[derive(Debug, Serialize)]
pub struct PhotoResponse {
    pub photo: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct PreviewQuery {
    pub template: Option<TemplateId>,
}

/// An empty body means "all defaults".
fn parse_patch_body(body: &[u8]) -> Result<ResumePatch, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ResumePatch::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| AppError::Validation(format!("Invalid resume body: {e}")))
}

fn new_document(user_id: Uuid, patch: ResumePatch) -> ResumeDocument {
    let mut doc = ResumeDocument::new(user_id);
    let default_title = doc.title.clone();
    patch.apply_to(&mut doc);
    if doc.title.is_empty() {
        doc.title = default_title;
    }
    doc
}

// ────────────────────────────────────────────────────────────────────────────
// CRUD
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/resumes
pub async fn handle_list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ResumeListResponse>, AppError> {
    let resumes = repository::list_for_user(&state.db, auth.user_id).await?;
    Ok(Json(ResumeListResponse {
        count: resumes.len(),
        resumes,
    }))
}

/// GET /api/resumes/:id
pub async fn handle_get(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ResumeDocument>, AppError> {
    let doc = repository::fetch_owned(&state.db, id, auth.user_id).await?;
    Ok(Json(doc))
}

/// POST /api/resumes
pub async fn handle_create(
    State(state): State<AppState>,
    auth: AuthUser,
    body: Bytes,
) -> Result<(StatusCode, Json<ResumeDocument>), AppError> {
    let patch = parse_patch_body(&body)?;
    let doc = repository::insert(&state.db, &new_document(auth.user_id, patch)).await?;
    info!("Created resume {} for user {}", doc.id, auth.user_id);
    Ok((StatusCode::CREATED, Json(doc)))
}

/// PUT /api/resumes/:id
pub async fn handle_update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(patch): Json<ResumePatch>,
) -> Result<Json<ResumeDocument>, AppError> {
    // drops the waiting draft and lets a flush already under way finish first
    state.autosave.cancel(id).await;
    let doc = repository::apply_patch(&state.db, id, auth.user_id, patch).await?;
    info!("Updated resume {id}");
    Ok(Json(doc))
}

/// PUT /api/resumes/:id/sections/:section
pub async fn handle_replace_section(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, section)): Path<(Uuid, Section)>,
    Json(value): Json<Value>,
) -> Result<Json<ResumeDocument>, AppError> {
    let mut doc = repository::fetch_owned(&state.db, id, auth.user_id).await?;
    doc.content
        .replace_section(section, value)
        .map_err(|e| AppError::Validation(format!("Invalid {} section: {e}", section.heading())))?;
    let doc = repository::save(&state.db, &doc).await?;
    info!("Replaced section {section:?} of resume {id}");
    Ok(Json(doc))
}

/// DELETE /api/resumes/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    repository::delete_owned(&state.db, id, auth.user_id).await?;
    state.autosave.cancel(id).await;
    info!("Deleted resume {id}");
    Ok(Json(json!({ "deleted": true, "id": id })))
}

// ────────────────────────────────────────────────────────────────────────────
// Autosave
// ────────────────────────────────────────────────────────────────────────────

/// PUT /api/resumes/:id/draft
pub async fn handle_save_draft(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(patch): Json<ResumePatch>,
) -> Result<(StatusCode, Json<DraftAccepted>), AppError> {
    repository::ensure_owned(&state.db, id, auth.user_id).await?;
    state
        .autosave
        .schedule(Draft {
            resume_id: id,
            user_id: auth.user_id,
            patch,
        })
        .await;

    Ok((
        StatusCode::ACCEPTED,
        Json(DraftAccepted {
            scheduled: true,
            delay_ms: state.config.autosave_delay.as_millis() as u64,
        }),
    ))
}

// ────────────────────────────────────────────────────────────────────────────
// Photo
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/resumes/:id/photo
pub async fn handle_upload_photo(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<PhotoResponse>, AppError> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some("photo") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
        upload = Some((file_name, content_type, bytes));
        break;
    }

    let Some((file_name, content_type, bytes)) = upload else {
        return Err(AppError::Validation("No file uploaded".to_string()));
    };

    let format = validate_photo(&file_name, &content_type, &bytes).map_err(|e| {
        warn!("Rejected photo upload for resume {id}: {e}");
        e
    })?;

    repository::ensure_owned(&state.db, id, auth.user_id).await?;

    let key = photo_key(id, format);
    let reference = state.photos.put(&key, bytes, format.content_type()).await?;
    if let Err(e) = repository::set_photo(&state.db, id, auth.user_id, &reference).await {
        warn!("Photo object {key} is orphaned: resume {id} was not updated");
        return Err(e);
    }

    info!("Stored photo for resume {id} at {key}");
    Ok(Json(PhotoResponse { photo: reference }))
}

// ────────────────────────────────────────────────────────────────────────────
// Preview
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/resumes/:id/preview?template=<id>
pub async fn handle_preview_stored(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Query(query): Query<PreviewQuery>,
) -> Result<Json<PresentationTree>, AppError> {
    let doc = repository::fetch_owned(&state.db, id, auth.user_id).await?;
    let template_id = query.template.unwrap_or(doc.template_id);
    Ok(Json(render(&doc.content, template_id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::DEFAULT_TITLE;

    #[test]
    fn test_empty_body_is_default_patch() {
        assert_eq!(parse_patch_body(b"").unwrap(), ResumePatch::default());
        assert_eq!(parse_patch_body(b" \n").unwrap(), ResumePatch::default());
    }

    #[test]
    fn test_patch_body_parsed() {
        let patch = parse_patch_body(br#"{"title":"CV","templateId":"classic_left"}"#).unwrap();
        assert_eq!(patch.title.as_deref(), Some("CV"));
        assert_eq!(patch.template_id, Some(TemplateId::ClassicLeft));
    }

    #[test]
    fn test_unknown_template_in_body_rejected() {
        let err = parse_patch_body(br#"{"templateId":"neon_pink"}"#).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_new_document_defaults() {
        let user = Uuid::new_v4();
        let doc = new_document(user, ResumePatch::default());
        assert_eq!(doc.user_id, user);
        assert_eq!(doc.title, DEFAULT_TITLE);
        assert_eq!(doc.template_id, TemplateId::ModernBlue);
        assert!(doc.content.experience.is_empty());
    }

    #[test]
    fn test_new_document_keeps_default_title_when_blank() {
        let patch = ResumePatch {
            title: Some("   ".into()),
            template_id: Some(TemplateId::MinimalBlack),
            ..Default::default()
        };
        let doc = new_document(Uuid::new_v4(), patch);
        assert_eq!(doc.title, DEFAULT_TITLE);
        assert_eq!(doc.template_id, TemplateId::MinimalBlack);
    }

    #[test]
    fn test_preview_query_parses_template() {
        let query: PreviewQuery = query_from("template=minimal_black");
        assert_eq!(query.template, Some(TemplateId::MinimalBlack));
    }

    fn query_from(raw: &str) -> PreviewQuery {
        let uri: axum::http::Uri = format!("/preview?{raw}").parse().unwrap();
        Query::<PreviewQuery>::try_from_uri(&uri).unwrap().0
    }
}
