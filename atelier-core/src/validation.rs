//! Input validation for artisan and comment writes.
//!
//! Every check records into a [`FieldErrors`] so a single response reports all
//! offending fields at once. Messages follow the French wording clients of the
//! directory already display.

use crate::error::{AtelierError, FieldErrors};
use crate::models::{
    ArtisanFilter, ArtisanInput, ArtisanPatch, CommentInput, CommentPatch, NewArtisan, NewComment,
};
use crate::trades::{TradeCatalog, METIER_MAX};
use serde_json::Value;

pub const NOM_MAX: usize = 100;
pub const VILLE_MAX: usize = 100;
pub const QUARTIER_MAX: usize = 100;
pub const CONTACT_MAX: usize = 20;

pub const NOTE_MIN: f64 = 0.0;
pub const NOTE_MAX: f64 = 5.0;

const REQUIRED: &str = "Ce champ est obligatoire.";
const BLANK: &str = "Ce champ ne peut être vide.";
const NOT_A_STRING: &str = "Chaîne de caractères non valide.";
const NOT_A_BOOLEAN: &str = "Doit être un booléen valide.";
const NOT_A_NUMBER: &str = "Un nombre valide est requis.";

/// Which body shape the caller expects: full replacement or partial update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Full,
    Partial,
}

/// JSON type name used in type-mismatch messages.
fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "booléen",
        Value::Number(_) => "nombre",
        Value::String(_) => "chaîne",
        Value::Array(_) => "tableau",
        Value::Object(_) => "objet",
    }
}

fn text_field(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<Value>,
    max: Option<usize>,
    mode: Mode,
) -> Option<String> {
    let value = match value {
        None => {
            if mode == Mode::Full {
                errors.add(field, REQUIRED);
            }
            return None;
        }
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        Some(_) => {
            errors.add(field, NOT_A_STRING);
            return None;
        }
    };

    let value = value.trim().to_string();
    if value.is_empty() {
        errors.add(field, BLANK);
        return None;
    }
    if let Some(max) = max {
        if value.chars().count() > max {
            errors.add(
                field,
                format!("Assurez-vous que ce champ comporte au plus {max} caractères."),
            );
            return None;
        }
    }
    Some(value)
}

fn metier_field(
    errors: &mut FieldErrors,
    value: Option<Value>,
    catalog: &TradeCatalog,
    mode: Mode,
) -> Option<String> {
    let metier = text_field(errors, "metier", value, Some(METIER_MAX), mode)?;
    if catalog.contains(&metier) {
        Some(metier)
    } else {
        errors.add("metier", format!("« {metier} » n'est pas un choix valide."));
        None
    }
}

/// Accepts `true`/`false`, `0`/`1` and the usual textual spellings.
fn whatsapp_field(errors: &mut FieldErrors, value: Option<Value>) -> Option<bool> {
    let parsed = match value? {
        Value::Bool(b) => Some(b),
        Value::Number(n) => match n.as_i64() {
            Some(1) => Some(true),
            Some(0) => Some(false),
            _ => None,
        },
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" | "oui" => Some(true),
            "false" | "0" | "no" | "off" | "non" => Some(false),
            _ => None,
        },
        _ => None,
    };
    if parsed.is_none() {
        errors.add("whatsapp", NOT_A_BOOLEAN);
    }
    parsed
}

/// Accepts a JSON number or a numeric string, then checks the range.
fn note_field(errors: &mut FieldErrors, value: Option<Value>) -> Option<f64> {
    let parsed = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    let Some(note) = parsed else {
        errors.add("note", NOT_A_NUMBER);
        return None;
    };
    if note.is_finite() && (NOTE_MIN..=NOTE_MAX).contains(&note) {
        Some(note)
    } else {
        errors.add(
            "note",
            format!("La note doit être comprise entre {NOTE_MIN} et {NOTE_MAX}."),
        );
        None
    }
}

/// Validate a POST/PUT body. `whatsapp` and `note` default to `false` / `0.0`.
pub fn validate_new_artisan(
    input: ArtisanInput,
    catalog: &TradeCatalog,
) -> Result<NewArtisan, AtelierError> {
    let mut errors = FieldErrors::default();

    let nom = text_field(&mut errors, "nom", input.nom, Some(NOM_MAX), Mode::Full);
    let metier = metier_field(&mut errors, input.metier, catalog, Mode::Full);
    let ville = text_field(&mut errors, "ville", input.ville, Some(VILLE_MAX), Mode::Full);
    let quartier = text_field(
        &mut errors,
        "quartier",
        input.quartier,
        Some(QUARTIER_MAX),
        Mode::Full,
    );
    let contact = text_field(
        &mut errors,
        "contact",
        input.contact,
        Some(CONTACT_MAX),
        Mode::Full,
    );
    let whatsapp = whatsapp_field(&mut errors, input.whatsapp);
    let note = note_field(&mut errors, input.note);

    match (nom, metier, ville, quartier, contact) {
        (Some(nom), Some(metier), Some(ville), Some(quartier), Some(contact))
            if errors.is_empty() =>
        {
            Ok(NewArtisan {
                nom,
                metier,
                ville,
                quartier,
                contact,
                whatsapp: whatsapp.unwrap_or(false),
                note: note.unwrap_or(0.0),
            })
        }
        _ => Err(AtelierError::Validation(errors)),
    }
}

/// Validate a PATCH body: only the fields present are checked.
pub fn validate_artisan_patch(
    input: ArtisanInput,
    catalog: &TradeCatalog,
) -> Result<ArtisanPatch, AtelierError> {
    let mut errors = FieldErrors::default();

    let patch = ArtisanPatch {
        nom: text_field(&mut errors, "nom", input.nom, Some(NOM_MAX), Mode::Partial),
        metier: metier_field(&mut errors, input.metier, catalog, Mode::Partial),
        ville: text_field(
            &mut errors,
            "ville",
            input.ville,
            Some(VILLE_MAX),
            Mode::Partial,
        ),
        quartier: text_field(
            &mut errors,
            "quartier",
            input.quartier,
            Some(QUARTIER_MAX),
            Mode::Partial,
        ),
        contact: text_field(
            &mut errors,
            "contact",
            input.contact,
            Some(CONTACT_MAX),
            Mode::Partial,
        ),
        whatsapp: whatsapp_field(&mut errors, input.whatsapp),
        note: note_field(&mut errors, input.note),
    };

    errors.into_result()?;
    Ok(patch)
}

/// Normalise list filters: blank values mean "no constraint"; an unknown
/// `metier` is rejected rather than silently matching nothing.
pub fn validate_filter(
    filter: ArtisanFilter,
    catalog: &TradeCatalog,
) -> Result<ArtisanFilter, AtelierError> {
    fn non_blank(value: Option<String>) -> Option<String> {
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    let normalised = ArtisanFilter {
        metier: non_blank(filter.metier),
        ville: non_blank(filter.ville),
        quartier: non_blank(filter.quartier),
    };

    if let Some(metier) = &normalised.metier {
        if !catalog.contains(metier) {
            return Err(AtelierError::invalid(
                "metier",
                format!("Sélectionnez un choix valide. « {metier} » n'en fait pas partie."),
            ));
        }
    }
    Ok(normalised)
}

/// Primary key of the owning artisan: an integer or a numeric string.
fn artisan_ref_field(errors: &mut FieldErrors, value: Option<Value>, mode: Mode) -> Option<i64> {
    let Some(value) = value else {
        if mode == Mode::Full {
            errors.add("artisan", REQUIRED);
        }
        return None;
    };

    let id = match &value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    match id {
        Some(id) if id > 0 => Some(id),
        Some(id) => {
            errors.add("artisan", artisan_missing_message(id));
            None
        }
        None => {
            errors.add(
                "artisan",
                format!(
                    "Type incorrect. Attendait une clé primaire, a reçu {}.",
                    json_type(&value)
                ),
            );
            None
        }
    }
}

/// Message used when a comment points at an artisan that does not exist.
pub fn artisan_missing_message(id: i64) -> String {
    format!("Clé primaire « {id} » non valide - l'objet n'existe pas.")
}

pub fn validate_new_comment(input: CommentInput) -> Result<NewComment, AtelierError> {
    let mut errors = FieldErrors::default();

    let contenu = text_field(&mut errors, "contenu", input.contenu, None, Mode::Full);
    let artisan = artisan_ref_field(&mut errors, input.artisan, Mode::Full);

    match (contenu, artisan) {
        (Some(contenu), Some(artisan)) if errors.is_empty() => Ok(NewComment { contenu, artisan }),
        _ => Err(AtelierError::Validation(errors)),
    }
}

pub fn validate_comment_patch(input: CommentInput) -> Result<CommentPatch, AtelierError> {
    let mut errors = FieldErrors::default();

    let patch = CommentPatch {
        contenu: text_field(&mut errors, "contenu", input.contenu, None, Mode::Partial),
        artisan: artisan_ref_field(&mut errors, input.artisan, Mode::Partial),
    };

    errors.into_result()?;
    Ok(patch)
}
