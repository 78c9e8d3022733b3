use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::comment::CommentSummary;

/// A stored tradesperson row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Artisan {
    pub id: i64,
    pub nom: String,
    pub metier: String,
    pub ville: String,
    pub quartier: String,
    pub contact: String,
    pub whatsapp: bool,
    pub note: f64,
}

/// Outbound representation: the artisan with its comments embedded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtisanWithComments {
    #[serde(flatten)]
    pub artisan: Artisan,
    pub commentaires: Vec<CommentSummary>,
}

/// Inbound body for POST, PUT and PATCH. Fields stay untyped JSON here so that
/// a missing or mistyped field is reported under its own name by validation
/// instead of failing the whole body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArtisanInput {
    pub nom: Option<Value>,
    pub metier: Option<Value>,
    pub ville: Option<Value>,
    pub quartier: Option<Value>,
    pub contact: Option<Value>,
    pub whatsapp: Option<Value>,
    pub note: Option<Value>,
}

/// Validated full artisan, ready to insert or replace.
#[derive(Debug, Clone, PartialEq)]
pub struct NewArtisan {
    pub nom: String,
    pub metier: String,
    pub ville: String,
    pub quartier: String,
    pub contact: String,
    pub whatsapp: bool,
    pub note: f64,
}

/// Validated partial update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArtisanPatch {
    pub nom: Option<String>,
    pub metier: Option<String>,
    pub ville: Option<String>,
    pub quartier: Option<String>,
    pub contact: Option<String>,
    pub whatsapp: Option<bool>,
    pub note: Option<f64>,
}

/// Exact-match list filters (`?metier=&ville=&quartier=`), combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtisanFilter {
    pub metier: Option<String>,
    pub ville: Option<String>,
    pub quartier: Option<String>,
}
