//! Locale-dependent presentation rules: digit grouping, unit words and name
//! collation.

use core::cmp::Ordering;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use tiendita_core::DomainError;

/// Display locale of the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Locale {
    /// Argentine Spanish (`1.234.567`, "1 año y 6 meses").
    #[default]
    #[serde(rename = "es-AR")]
    EsAr,
    /// English (`1,234,567`, "1 year and 6 months").
    #[serde(rename = "en")]
    En,
}

impl Locale {
    pub fn tag(self) -> &'static str {
        match self {
            Locale::EsAr => "es-AR",
            Locale::En => "en",
        }
    }

    fn group_separator(self) -> char {
        match self {
            Locale::EsAr => '.',
            Locale::En => ',',
        }
    }

    fn decimal_separator(self) -> char {
        match self {
            Locale::EsAr => ',',
            Locale::En => '.',
        }
    }

    /// Group an integer amount by thousands (`1234567` -> `1.234.567` in es-AR).
    pub fn format_amount(self, amount: u64) -> String {
        let digits = amount.to_string();
        let mut out = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push(self.group_separator());
            }
            out.push(c);
        }
        out
    }

    /// Render a small decimal (e.g. an interest percentage) without trailing zeros.
    pub fn format_decimal(self, value: f64) -> String {
        let rendered = format!("{value}");
        rendered.replace('.', &self.decimal_separator().to_string())
    }

    pub(crate) fn words(self) -> &'static Words {
        match self {
            Locale::EsAr => &ES_AR,
            Locale::En => &EN,
        }
    }
}

impl core::fmt::Display for Locale {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Locale {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "es" | "es-ar" | "es_ar" => Ok(Locale::EsAr),
            "en" | "en-us" | "en_us" => Ok(Locale::En),
            other => Err(DomainError::validation(format!("unsupported locale '{other}'"))),
        }
    }
}

/// Vocabulary used by the duration and pricing labels.
#[derive(Debug)]
pub(crate) struct Words {
    pub year: &'static str,
    pub years: &'static str,
    pub month: &'static str,
    pub months: &'static str,
    pub conjunction: &'static str,
    pub under_one_month: &'static str,
    pub interest_free: &'static str,
    pub interest: &'static str,
    pub total: &'static str,
    pub product: &'static str,
    pub products: &'static str,
    pub more_details: &'static str,
}

static ES_AR: Words = Words {
    year: "año",
    years: "años",
    month: "mes",
    months: "meses",
    conjunction: "y",
    under_one_month: "Menos de 1 mes",
    interest_free: "sin interés",
    interest: "interés",
    total: "total",
    product: "producto",
    products: "productos",
    more_details: "detalles más",
};

static EN: Words = Words {
    year: "year",
    years: "years",
    month: "month",
    months: "months",
    conjunction: "and",
    under_one_month: "Less than 1 month",
    interest_free: "interest-free",
    interest: "interest",
    total: "total",
    product: "product",
    products: "products",
    more_details: "more details",
};

/// Pick the singular form when `count == 1`, the plural otherwise.
pub(crate) fn pluralize(count: u64, singular: &'static str, plural: &'static str) -> String {
    format!("{count} {}", if count == 1 { singular } else { plural })
}

/// Locale-aware, case-aware name comparison used to sort selector options.
///
/// Letters compare by base letter first (accents and case ignored, `ñ` right
/// after `n`), then unaccented before accented, then lowercase before
/// uppercase, with the raw text as the final tie-break.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    let (primary_a, accents_a) = collation_key(a);
    let (primary_b, accents_b) = collation_key(b);

    primary_a
        .cmp(&primary_b)
        .then_with(|| accents_a.cmp(&accents_b))
        .then_with(|| case_key(a).cmp(&case_key(b)))
        .then_with(|| a.cmp(b))
}

fn collation_key(text: &str) -> (Vec<u32>, Vec<bool>) {
    let mut primary = Vec::with_capacity(text.len());
    let mut accents = Vec::with_capacity(text.len());
    for c in text.chars().flat_map(char::to_lowercase) {
        let (base, accented) = fold(c);
        primary.push(primary_weight(base));
        accents.push(accented);
    }
    (primary, accents)
}

fn case_key(text: &str) -> Vec<bool> {
    text.chars().map(char::is_uppercase).collect()
}

fn primary_weight(c: char) -> u32 {
    match c {
        'ñ' => ('n' as u32) * 2 + 1,
        other => (other as u32) * 2,
    }
}

fn fold(c: char) -> (char, bool) {
    match c {
        'à' | 'á' | 'â' | 'ä' | 'ã' | 'å' => ('a', true),
        'è' | 'é' | 'ê' | 'ë' => ('e', true),
        'ì' | 'í' | 'î' | 'ï' => ('i', true),
        'ò' | 'ó' | 'ô' | 'ö' | 'õ' => ('o', true),
        'ù' | 'ú' | 'û' | 'ü' => ('u', true),
        'ç' => ('c', true),
        other => (other, false),
    }
}
