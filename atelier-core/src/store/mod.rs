//! PostgreSQL access for artisans and their comments.

pub mod artisans;
pub mod comments;

use std::collections::HashMap;

use crate::models::{Artisan, ArtisanWithComments, Comment, CommentSummary};

pub(crate) const ARTISAN_COLUMNS: &str =
    "id, nom, metier, ville, quartier, contact, whatsapp, note";

pub(crate) const COMMENT_COLUMNS: &str = "id, contenu, date, artisan_id AS artisan";

/// Nest comments under their owning artisans.
///
/// Artisan order is preserved; each artisan's comments keep the order they
/// arrive in. Comments whose owner is not in `artisans` are dropped.
pub fn attach_comments(
    artisans: Vec<Artisan>,
    comments: Vec<Comment>,
) -> Vec<ArtisanWithComments> {
    let mut by_owner: HashMap<i64, Vec<CommentSummary>> = HashMap::new();
    for comment in comments {
        by_owner
            .entry(comment.artisan)
            .or_default()
            .push(comment.into());
    }

    artisans
        .into_iter()
        .map(|artisan| {
            let commentaires = by_owner.remove(&artisan.id).unwrap_or_default();
            ArtisanWithComments {
                artisan,
                commentaires,
            }
        })
        .collect()
}
