use axum::{extract::Path, Json};
use serde::{Deserialize, Serialize};

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::resume::{ResumeContent, TemplateId};
use crate::render::templates::{template_info, TemplateInfo, TEMPLATES};
use crate::render::{render, PresentationTree};

#[derive(Debug, Serialize)]
pub struct TemplateListResponse {
    pub count: usize,
    pub templates: &'static [TemplateInfo],
}

/// An unsaved document as the editor currently holds it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewRequest {
    #[serde(default)]
    pub template_id: TemplateId,
    #[serde(flatten)]
    pub content: ResumeContent,
}

/// GET /api/templates
pub async fn handle_list_templates() -> Json<TemplateListResponse> {
    Json(TemplateListResponse {
        count: TEMPLATES.len(),
        templates: &TEMPLATES,
    })
}

/// GET /api/templates/:id
pub async fn handle_get_template(
    Path(id): Path<String>,
) -> Result<Json<&'static TemplateInfo>, AppError> {
    let id: TemplateId = id
        .parse()
        .map_err(|_| AppError::NotFound(format!("Template '{id}' not found")))?;
    Ok(Json(template_info(id)))
}

/// POST /api/preview
pub async fn handle_preview(
    _auth: AuthUser,
    Json(req): Json<PreviewRequest>,
) -> Json<PresentationTree> {
    Json(render(&req.content, req.template_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_preview_request_defaults_template() {
        let req: PreviewRequest = serde_json::from_value(json!({
            "personalInfo": { "fullName": "Ada Lovelace" },
            "skills": [{ "category": "Math", "items": "Analysis" }]
        }))
        .unwrap();
        assert_eq!(req.template_id, TemplateId::ModernBlue);
        assert_eq!(req.content.personal_info.full_name, "Ada Lovelace");
        assert_eq!(req.content.skills.len(), 1);
    }

    #[test]
    fn test_preview_request_tolerates_null_sections() {
        let req: PreviewRequest = serde_json::from_value(json!({
            "templateId": "classic_left",
            "experience": null
        }))
        .unwrap();
        assert_eq!(req.template_id, TemplateId::ClassicLeft);
        assert!(req.content.experience.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_template_is_not_found() {
        let err = handle_get_template(Path("neon_pink".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_template_catalog_lists_all() {
        let Json(list) = handle_list_templates().await;
        assert_eq!(list.count, 3);
        assert_eq!(list.templates[2].id, TemplateId::ClassicLeft);
    }
}
