//! Storefront configuration, injected from the environment.

use thiserror::Error;

use tiendita_catalog::Locale;

const URL_VAR: &str = "SUPABASE_URL";
const ANON_KEY_VAR: &str = "SUPABASE_ANON_KEY";
const ADMIN_EMAIL_VAR: &str = "ADMIN_EMAIL";
const LOCALE_VAR: &str = "STOREFRONT_LOCALE";
const BUCKET_VAR: &str = "STOREFRONT_IMAGE_BUCKET";

/// Storage bucket product images are uploaded to.
pub const DEFAULT_IMAGE_BUCKET: &str = "product-images";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Faltan variables de entorno de Supabase: {}", .0.join(", "))]
    MissingBackendEnv(Vec<String>),

    #[error("invalid {var}: {message}")]
    Invalid { var: &'static str, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontConfig {
    pub backend_url: String,
    pub anon_key: String,
    /// Lowercased; empty means nobody is admin.
    pub admin_email: String,
    pub locale: Locale,
    pub image_bucket: String,
}

impl StorefrontConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (tests pass a map).
    ///
    /// Missing backend variables are reported together.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let backend_url = get(URL_VAR);
        let anon_key = get(ANON_KEY_VAR);
        let missing: Vec<String> = [(URL_VAR, &backend_url), (ANON_KEY_VAR, &anon_key)]
            .iter()
            .filter(|(_, value)| value.is_none())
            .map(|(key, _)| key.to_string())
            .collect();
        let (Some(backend_url), Some(anon_key)) = (backend_url, anon_key) else {
            return Err(ConfigError::MissingBackendEnv(missing));
        };

        let admin_email = get(ADMIN_EMAIL_VAR).unwrap_or_default().to_lowercase();
        if admin_email.is_empty() {
            tracing::warn!("{ADMIN_EMAIL_VAR} not set; admin tools will be unavailable");
        }

        let locale = match get(LOCALE_VAR) {
            Some(raw) => raw.parse::<Locale>().map_err(|e| ConfigError::Invalid {
                var: LOCALE_VAR,
                message: e.to_string(),
            })?,
            None => Locale::default(),
        };

        Ok(Self {
            backend_url,
            anon_key,
            admin_email,
            locale,
            image_bucket: get(BUCKET_VAR).unwrap_or_else(|| DEFAULT_IMAGE_BUCKET.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn reads_all_values() {
        let config = StorefrontConfig::from_lookup(lookup(&[
            ("SUPABASE_URL", "https://demo.supabase.co"),
            ("SUPABASE_ANON_KEY", "anon"),
            ("ADMIN_EMAIL", " Diego@Example.com "),
            ("STOREFRONT_LOCALE", "en"),
        ]))
        .unwrap();
        assert_eq!(config.backend_url, "https://demo.supabase.co");
        assert_eq!(config.admin_email, "diego@example.com");
        assert_eq!(config.locale, Locale::En);
        assert_eq!(config.image_bucket, DEFAULT_IMAGE_BUCKET);
    }

    #[test]
    fn reports_every_missing_backend_variable() {
        let err = StorefrontConfig::from_lookup(lookup(&[("SUPABASE_URL", "  ")])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Faltan variables de entorno de Supabase: SUPABASE_URL, SUPABASE_ANON_KEY"
        );
    }

    #[test]
    fn admin_email_is_optional() {
        let config = StorefrontConfig::from_lookup(lookup(&[
            ("SUPABASE_URL", "u"),
            ("SUPABASE_ANON_KEY", "k"),
        ]))
        .unwrap();
        assert_eq!(config.admin_email, "");
        assert_eq!(config.locale, Locale::EsAr);
    }

    #[test]
    fn rejects_unknown_locale() {
        let err = StorefrontConfig::from_lookup(lookup(&[
            ("SUPABASE_URL", "u"),
            ("SUPABASE_ANON_KEY", "k"),
            ("STOREFRONT_LOCALE", "klingon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "STOREFRONT_LOCALE", .. }));
    }
}
