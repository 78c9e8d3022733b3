use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AtelierError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("validation failed: {0}")]
    Validation(FieldErrors),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Other error: {0}")]
    Other(String),
}

impl AtelierError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }

    /// Single-field validation failure.
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::default();
        errors.add(field, message);
        Self::Validation(errors)
    }
}

/// Per-field validation messages, keyed by the JSON field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// `Ok(())` when nothing was recorded, otherwise a validation error.
    pub fn into_result(self) -> Result<(), AtelierError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AtelierError::Validation(self))
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = self.fields().collect();
        write!(f, "{}", fields.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_errors_accumulate_per_field() {
        let mut errors = FieldErrors::default();
        errors.add("nom", "Ce champ est obligatoire.");
        errors.add("note", "La note doit être comprise entre 0 et 5.");
        errors.add("nom", "second message");

        assert_eq!(errors.get("nom").map(<[String]>::len), Some(2));
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["nom", "note"]);
        assert_eq!(errors.to_string(), "nom, note");

        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json["note"][0], "La note doit être comprise entre 0 et 5.");
    }

    #[test]
    fn empty_field_errors_are_ok() {
        assert!(FieldErrors::default().into_result().is_ok());
        let err = AtelierError::invalid("artisan", "missing").to_string();
        assert_eq!(err, "validation failed: artisan");
    }

    #[test]
    fn not_found_message_names_entity() {
        assert_eq!(
            AtelierError::not_found("artisan", 42).to_string(),
            "artisan 42 not found"
        );
    }
}
