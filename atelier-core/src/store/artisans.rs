use sqlx::{PgPool, Postgres, QueryBuilder};

use super::{attach_comments, ARTISAN_COLUMNS, COMMENT_COLUMNS};
use crate::error::AtelierError;
use crate::models::{Artisan, ArtisanFilter, ArtisanPatch, ArtisanWithComments, Comment, NewArtisan};

const ENTITY: &str = "artisan";

/// List artisans matching every filter that is set, ordered by id.
pub async fn list(
    pool: &PgPool,
    filter: &ArtisanFilter,
) -> Result<Vec<ArtisanWithComments>, AtelierError> {
    let mut query = QueryBuilder::<Postgres>::new(format!(
        "SELECT {ARTISAN_COLUMNS} FROM artisans WHERE TRUE"
    ));
    if let Some(metier) = &filter.metier {
        query.push(" AND metier = ").push_bind(metier.clone());
    }
    if let Some(ville) = &filter.ville {
        query.push(" AND ville = ").push_bind(ville.clone());
    }
    if let Some(quartier) = &filter.quartier {
        query.push(" AND quartier = ").push_bind(quartier.clone());
    }
    query.push(" ORDER BY id");

    let artisans: Vec<Artisan> = query.build_query_as().fetch_all(pool).await?;
    if artisans.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<i64> = artisans.iter().map(|a| a.id).collect();
    let comments: Vec<Comment> = sqlx::query_as(&format!(
        "SELECT {COMMENT_COLUMNS} FROM commentaires WHERE artisan_id = ANY($1) ORDER BY id"
    ))
    .bind(&ids)
    .fetch_all(pool)
    .await?;

    Ok(attach_comments(artisans, comments))
}

pub async fn get(pool: &PgPool, id: i64) -> Result<ArtisanWithComments, AtelierError> {
    let artisan: Option<Artisan> = sqlx::query_as(&format!(
        "SELECT {ARTISAN_COLUMNS} FROM artisans WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    let artisan = artisan.ok_or_else(|| AtelierError::not_found(ENTITY, id))?;
    with_comments(pool, artisan).await
}

pub async fn create(pool: &PgPool, new: &NewArtisan) -> Result<ArtisanWithComments, AtelierError> {
    let artisan: Artisan = sqlx::query_as(&format!(
        r#"
        INSERT INTO artisans (nom, metier, ville, quartier, contact, whatsapp, note)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {ARTISAN_COLUMNS}
        "#
    ))
    .bind(&new.nom)
    .bind(&new.metier)
    .bind(&new.ville)
    .bind(&new.quartier)
    .bind(&new.contact)
    .bind(new.whatsapp)
    .bind(new.note)
    .fetch_one(pool)
    .await?;

    tracing::info!(id = artisan.id, metier = %artisan.metier, "Artisan created");

    Ok(ArtisanWithComments {
        artisan,
        commentaires: Vec::new(),
    })
}

/// Full replacement (PUT).
pub async fn replace(
    pool: &PgPool,
    id: i64,
    new: &NewArtisan,
) -> Result<ArtisanWithComments, AtelierError> {
    let artisan: Option<Artisan> = sqlx::query_as(&format!(
        r#"
        UPDATE artisans
        SET nom = $2, metier = $3, ville = $4, quartier = $5,
            contact = $6, whatsapp = $7, note = $8
        WHERE id = $1
        RETURNING {ARTISAN_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(&new.nom)
    .bind(&new.metier)
    .bind(&new.ville)
    .bind(&new.quartier)
    .bind(&new.contact)
    .bind(new.whatsapp)
    .bind(new.note)
    .fetch_optional(pool)
    .await?;

    let artisan = artisan.ok_or_else(|| AtelierError::not_found(ENTITY, id))?;
    tracing::info!(id, "Artisan replaced");
    with_comments(pool, artisan).await
}

/// Partial update (PATCH); absent fields keep their stored value.
pub async fn update(
    pool: &PgPool,
    id: i64,
    patch: &ArtisanPatch,
) -> Result<ArtisanWithComments, AtelierError> {
    let artisan: Option<Artisan> = sqlx::query_as(&format!(
        r#"
        UPDATE artisans
        SET nom = COALESCE($2, nom),
            metier = COALESCE($3, metier),
            ville = COALESCE($4, ville),
            quartier = COALESCE($5, quartier),
            contact = COALESCE($6, contact),
            whatsapp = COALESCE($7, whatsapp),
            note = COALESCE($8, note)
        WHERE id = $1
        RETURNING {ARTISAN_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(&patch.nom)
    .bind(&patch.metier)
    .bind(&patch.ville)
    .bind(&patch.quartier)
    .bind(&patch.contact)
    .bind(patch.whatsapp)
    .bind(patch.note)
    .fetch_optional(pool)
    .await?;

    let artisan = artisan.ok_or_else(|| AtelierError::not_found(ENTITY, id))?;
    tracing::info!(id, "Artisan updated");
    with_comments(pool, artisan).await
}

/// Delete an artisan; its comments go with it through `ON DELETE CASCADE`.
pub async fn delete(pool: &PgPool, id: i64) -> Result<(), AtelierError> {
    let result = sqlx::query("DELETE FROM artisans WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AtelierError::not_found(ENTITY, id));
    }
    tracing::info!(id, "Artisan deleted with its comments");
    Ok(())
}

/// Every artisan with every comment, read from one consistent snapshot.
pub async fn export_all(pool: &PgPool) -> Result<Vec<ArtisanWithComments>, AtelierError> {
    let mut tx = pool.begin().await?;
    sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
        .execute(&mut *tx)
        .await?;

    let artisans: Vec<Artisan> = sqlx::query_as(&format!(
        "SELECT {ARTISAN_COLUMNS} FROM artisans ORDER BY id"
    ))
    .fetch_all(&mut *tx)
    .await?;

    let comments: Vec<Comment> = sqlx::query_as(&format!(
        "SELECT {COMMENT_COLUMNS} FROM commentaires ORDER BY id"
    ))
    .fetch_all(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(
        artisans = artisans.len(),
        comments = comments.len(),
        "Export snapshot read"
    );
    Ok(attach_comments(artisans, comments))
}

pub(crate) async fn exists(pool: &PgPool, id: i64) -> Result<bool, AtelierError> {
    let row: (bool,) = sqlx::query_as("SELECT EXISTS (SELECT 1 FROM artisans WHERE id = $1)")
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(row.0)
}

async fn with_comments(
    pool: &PgPool,
    artisan: Artisan,
) -> Result<ArtisanWithComments, AtelierError> {
    let comments: Vec<Comment> = sqlx::query_as(&format!(
        "SELECT {COMMENT_COLUMNS} FROM commentaires WHERE artisan_id = $1 ORDER BY id"
    ))
    .bind(artisan.id)
    .fetch_all(pool)
    .await?;

    Ok(ArtisanWithComments {
        artisan,
        commentaires: comments.into_iter().map(Into::into).collect(),
    })
}
