//! Banners ("carteles"): short announcements shown above the public catalog.

use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tiendita_core::{BannerId, DomainError, DomainResult, Entity};

/// Longest message a banner may carry, in characters.
pub const MAX_MESSAGE_CHARS: usize = 140;

/// Visual/semantic category of a banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    /// Informational.
    #[default]
    Info,
    /// Promotional.
    Success,
    /// Urgent.
    Warning,
}

impl Tone {
    pub fn as_str(self) -> &'static str {
        match self {
            Tone::Info => "info",
            Tone::Success => "success",
            Tone::Warning => "warning",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tone::Info => "Informativo",
            Tone::Success => "Promo",
            Tone::Warning => "Urgente",
        }
    }

    /// Unknown or missing tones fall back to `info`.
    pub fn parse_lossy(raw: Option<&str>) -> Self {
        raw.and_then(|s| s.parse().ok()).unwrap_or_default()
    }
}

impl FromStr for Tone {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "info" => Ok(Tone::Info),
            "success" => Ok(Tone::Success),
            "warning" => Ok(Tone::Warning),
            other => Err(DomainError::validation(format!("tono desconocido: '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Banner {
    pub id: BannerId,
    pub message: String,
    pub tone: Tone,
    pub active: bool,
    pub created_at: Option<DateTime<Utc>>,
}

impl Entity for Banner {
    type Id = BannerId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// A validated banner ready to be published (always created active).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BannerDraft {
    pub message: String,
    pub tone: Tone,
}

impl BannerDraft {
    pub fn new(message: &str, tone: Tone) -> DomainResult<Self> {
        let message = message.trim();
        if message.is_empty() {
            return Err(DomainError::validation("Escribe un cartel para publicarlo."));
        }
        if message.chars().count() > MAX_MESSAGE_CHARS {
            return Err(DomainError::validation(format!(
                "El cartel no puede superar los {MAX_MESSAGE_CHARS} caracteres."
            )));
        }
        Ok(Self {
            message: message.to_string(),
            tone,
        })
    }
}

/// Banners visible to customers, in the order given (backend sorts newest first).
pub fn active_banners(banners: &[Banner]) -> Vec<&Banner> {
    banners.iter().filter(|b| b.active).collect()
}

/// Admin list: newest first, undated rows last.
pub fn sorted_for_admin(banners: &[Banner]) -> Vec<&Banner> {
    let mut out: Vec<&Banner> = banners.iter().collect();
    out.sort_by(|a, b| match (a.created_at, b.created_at) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => core::cmp::Ordering::Less,
        (None, Some(_)) => core::cmp::Ordering::Greater,
        (None, None) => core::cmp::Ordering::Equal,
    });
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn banner(message: &str, active: bool, day: Option<u32>) -> Banner {
        Banner {
            id: BannerId::new(),
            message: message.to_string(),
            tone: Tone::Info,
            active,
            created_at: day.map(|d| Utc.with_ymd_and_hms(2024, 5, d, 12, 0, 0).unwrap()),
        }
    }

    #[test]
    fn draft_trims_and_requires_text() {
        let draft = BannerDraft::new("  Envíos gratis  ", Tone::Success).unwrap();
        assert_eq!(draft.message, "Envíos gratis");

        let err = BannerDraft::new("   ", Tone::Info).unwrap_err();
        assert_eq!(err.user_message(), "Escribe un cartel para publicarlo.");
    }

    #[test]
    fn draft_limit_counts_characters_not_bytes() {
        let at_limit = "ñ".repeat(MAX_MESSAGE_CHARS);
        assert!(BannerDraft::new(&at_limit, Tone::Info).is_ok());

        let over = "a".repeat(MAX_MESSAGE_CHARS + 1);
        assert!(matches!(
            BannerDraft::new(&over, Tone::Info),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn unknown_tone_falls_back_to_info() {
        assert_eq!(Tone::parse_lossy(Some("warning")), Tone::Warning);
        assert_eq!(Tone::parse_lossy(Some("danger")), Tone::Info);
        assert_eq!(Tone::parse_lossy(None), Tone::Info);
    }

    #[test]
    fn only_active_banners_are_public() {
        let banners = vec![banner("a", true, Some(3)), banner("b", false, Some(2)), banner("c", true, None)];
        let visible: Vec<&str> = active_banners(&banners).iter().map(|b| b.message.as_str()).collect();
        assert_eq!(visible, vec!["a", "c"]);
    }

    #[test]
    fn admin_list_is_newest_first() {
        let banners = vec![banner("old", true, Some(1)), banner("undated", true, None), banner("new", false, Some(9))];
        let sorted: Vec<&str> = sorted_for_admin(&banners).iter().map(|b| b.message.as_str()).collect();
        assert_eq!(sorted, vec!["new", "old", "undated"]);
    }
}
