//! Storefront error model.

use thiserror::Error;

use tiendita_core::DomainError;

use crate::backend::BackendError;
use crate::config::ConfigError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorefrontError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("backend error: {0}")]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("administrator session required")]
    Unauthorized,
}

impl StorefrontError {
    /// Message shown to the user next to the action that failed.
    pub fn user_message(&self) -> String {
        match self {
            StorefrontError::Domain(e) => e.user_message(),
            StorefrontError::Backend(BackendError::Upload { .. }) => {
                "No se pudo guardar. Revisa Storage bucket, RLS y tablas de Supabase.".to_string()
            }
            StorefrontError::Backend(e) => e.to_string(),
            StorefrontError::Config(e) => e.to_string(),
            StorefrontError::Unauthorized => DomainError::Unauthorized.user_message(),
        }
    }
}
