//! PostgreSQL access for resume documents.
//!
//! Every query is scoped by the owning user: a document that exists but
//! belongs to someone else is indistinguishable from one that does not exist.

use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::{ResumeDocument, ResumePatch, ResumeRow};

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Resume {id} not found"))
}

/// Most recently edited first.
pub async fn list_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<ResumeDocument>, AppError> {
    let rows = sqlx::query_as::<_, ResumeRow>(
        "SELECT * FROM resumes WHERE user_id = $1 ORDER BY updated_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(ResumeDocument::from).collect())
}

pub async fn fetch_owned(
    pool: &PgPool,
    id: Uuid,
    user_id: Uuid,
) -> Result<ResumeDocument, AppError> {
    sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .map(ResumeDocument::from)
        .ok_or_else(|| not_found(id))
}

pub async fn ensure_owned(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<(), AppError> {
    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM resumes WHERE id = $1 AND user_id = $2)",
    )
    .bind(id)
    .bind(user_id)
    .fetch_one(pool)
    .await?;
    if exists {
        Ok(())
    } else {
        Err(not_found(id))
    }
}

pub async fn insert(pool: &PgPool, doc: &ResumeDocument) -> Result<ResumeDocument, AppError> {
    let row = sqlx::query_as::<_, ResumeRow>(
        r#"
        INSERT INTO resumes (id, user_id, template_id, title, content, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(doc.id)
    .bind(doc.user_id)
    .bind(doc.template_id.as_str())
    .bind(&doc.title)
    .bind(Json(&doc.content))
    .bind(doc.created_at)
    .bind(doc.updated_at)
    .fetch_one(pool)
    .await?;
    Ok(row.into())
}

/// Writes the whole document back and refreshes `updated_at`. Last write wins.
pub async fn save(pool: &PgPool, doc: &ResumeDocument) -> Result<ResumeDocument, AppError> {
    sqlx::query_as::<_, ResumeRow>(
        r#"
        UPDATE resumes
        SET template_id = $3, title = $4, content = $5, updated_at = NOW()
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(doc.id)
    .bind(doc.user_id)
    .bind(doc.template_id.as_str())
    .bind(&doc.title)
    .bind(Json(&doc.content))
    .fetch_optional(pool)
    .await?
    .map(ResumeDocument::from)
    .ok_or_else(|| not_found(doc.id))
}

pub async fn apply_patch(
    pool: &PgPool,
    id: Uuid,
    user_id: Uuid,
    patch: ResumePatch,
) -> Result<ResumeDocument, AppError> {
    let mut doc = fetch_owned(pool, id, user_id).await?;
    patch.apply_to(&mut doc);
    save(pool, &doc).await
}

/// Sets only `personalInfo.photo`, leaving concurrent edits to other fields intact.
pub async fn set_photo(
    pool: &PgPool,
    id: Uuid,
    user_id: Uuid,
    reference: &str,
) -> Result<ResumeDocument, AppError> {
    sqlx::query_as::<_, ResumeRow>(
        r#"
        UPDATE resumes
        SET content = jsonb_set(
                jsonb_set(content, '{personalInfo}', COALESCE(content -> 'personalInfo', '{}'::jsonb)),
                '{personalInfo,photo}',
                to_jsonb($3::text)
            ),
            updated_at = NOW()
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(reference)
    .fetch_optional(pool)
    .await?
    .map(ResumeDocument::from)
    .ok_or_else(|| not_found(id))
}

pub async fn delete_owned(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM resumes WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(not_found(id));
    }
    Ok(())
}
