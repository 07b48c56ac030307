//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Validation messages are the user-facing (Spanish) texts shown next to the
/// form that produced them, so they are carried verbatim and can be rendered
/// through [`DomainError::user_message`]. Backend failures belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. blank name, missing price).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A domain invariant was violated (e.g. subcategory outside its category).
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A referenced record was not found in the snapshot.
    #[error("not found")]
    NotFound,

    /// The acting user lacks the administrator capability.
    #[error("unauthorized")]
    Unauthorized,
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }

    /// Message suitable for direct display under a form.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(msg) | Self::InvariantViolation(msg) => msg.clone(),
            Self::InvalidId(_) => "Identificador inválido.".to_string(),
            Self::NotFound => "No se encontró el registro.".to_string(),
            Self::Unauthorized => "Necesitás permisos de administrador.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_is_shown_verbatim() {
        let err = DomainError::validation("Escribe una categoría.");
        assert_eq!(err.user_message(), "Escribe una categoría.");
        assert_eq!(err.to_string(), "validation failed: Escribe una categoría.");
    }

    #[test]
    fn every_variant_has_a_user_message() {
        let all = [
            DomainError::validation("Escribe un título."),
            DomainError::invariant("La subcategoría no pertenece a la categoría seleccionada."),
            DomainError::invalid_id("ProductId: invalid length"),
            DomainError::not_found(),
            DomainError::Unauthorized,
        ];
        for err in &all {
            let shown = match err {
                DomainError::Validation(msg) | DomainError::InvariantViolation(msg) => msg.as_str(),
                DomainError::InvalidId(_) => "Identificador inválido.",
                DomainError::NotFound => "No se encontró el registro.",
                DomainError::Unauthorized => "Necesitás permisos de administrador.",
            };
            assert_eq!(err.user_message(), shown);
        }
    }

    #[test]
    fn unauthorized_has_a_generic_message() {
        assert_eq!(
            DomainError::Unauthorized.user_message(),
            "Necesitás permisos de administrador."
        );
    }
}
