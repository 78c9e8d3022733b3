use sqlx::PgPool;

use super::{artisans, COMMENT_COLUMNS};
use crate::error::AtelierError;
use crate::models::{Comment, CommentPatch, NewComment};
use crate::validation::artisan_missing_message;

const ENTITY: &str = "commentaire";

pub async fn list(pool: &PgPool) -> Result<Vec<Comment>, AtelierError> {
    let comments: Vec<Comment> = sqlx::query_as(&format!(
        "SELECT {COMMENT_COLUMNS} FROM commentaires ORDER BY id"
    ))
    .fetch_all(pool)
    .await?;
    Ok(comments)
}

pub async fn get(pool: &PgPool, id: i64) -> Result<Comment, AtelierError> {
    let comment: Option<Comment> = sqlx::query_as(&format!(
        "SELECT {COMMENT_COLUMNS} FROM commentaires WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    comment.ok_or_else(|| AtelierError::not_found(ENTITY, id))
}

/// Insert a comment; `date` is stamped by the database.
pub async fn create(pool: &PgPool, new: &NewComment) -> Result<Comment, AtelierError> {
    ensure_artisan(pool, new.artisan).await?;

    let comment: Comment = sqlx::query_as(&format!(
        r#"
        INSERT INTO commentaires (artisan_id, contenu)
        VALUES ($1, $2)
        RETURNING {COMMENT_COLUMNS}
        "#
    ))
    .bind(new.artisan)
    .bind(&new.contenu)
    .fetch_one(pool)
    .await
    .map_err(|e| dangling_artisan(e, new.artisan))?;

    tracing::info!(id = comment.id, artisan = comment.artisan, "Comment created");
    Ok(comment)
}

/// Full replacement (PUT). `date` is left untouched.
pub async fn replace(pool: &PgPool, id: i64, new: &NewComment) -> Result<Comment, AtelierError> {
    let patch = CommentPatch {
        contenu: Some(new.contenu.clone()),
        artisan: Some(new.artisan),
    };
    update(pool, id, &patch).await
}

/// Partial update (PATCH). Moving a comment to another artisan is allowed as
/// long as that artisan exists.
pub async fn update(pool: &PgPool, id: i64, patch: &CommentPatch) -> Result<Comment, AtelierError> {
    if let Some(artisan) = patch.artisan {
        ensure_artisan(pool, artisan).await?;
    }

    let comment: Option<Comment> = sqlx::query_as(&format!(
        r#"
        UPDATE commentaires
        SET contenu = COALESCE($2, contenu),
            artisan_id = COALESCE($3, artisan_id)
        WHERE id = $1
        RETURNING {COMMENT_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(&patch.contenu)
    .bind(patch.artisan)
    .fetch_optional(pool)
    .await
    .map_err(|e| dangling_artisan(e, patch.artisan.unwrap_or_default()))?;

    let comment = comment.ok_or_else(|| AtelierError::not_found(ENTITY, id))?;
    tracing::info!(id, "Comment updated");
    Ok(comment)
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<(), AtelierError> {
    let result = sqlx::query("DELETE FROM commentaires WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AtelierError::not_found(ENTITY, id));
    }
    tracing::info!(id, "Comment deleted");
    Ok(())
}

async fn ensure_artisan(pool: &PgPool, artisan: i64) -> Result<(), AtelierError> {
    if artisans::exists(pool, artisan).await? {
        Ok(())
    } else {
        Err(AtelierError::invalid("artisan", artisan_missing_message(artisan)))
    }
}

/// The artisan can vanish between the existence check and the write; the
/// foreign key still catches it, and it is reported as a validation failure.
fn dangling_artisan(err: sqlx::Error, artisan: i64) -> AtelierError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_foreign_key_violation() {
            return AtelierError::invalid("artisan", artisan_missing_message(artisan));
        }
    }
    AtelierError::Database(err)
}
