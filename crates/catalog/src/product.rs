use core::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use tiendita_core::{CategoryId, DomainError, Entity, ProductId, SubcategoryId, UserId};

use crate::locale::Locale;
use crate::pricing::InstallmentPlan;
use crate::usage;

/// Product availability (`estado`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductStatus {
    #[serde(rename = "Disponible")]
    Available,
    #[serde(rename = "Vendido")]
    Sold,
    #[serde(rename = "Proximamente")]
    ComingSoon,
}

impl ProductStatus {
    pub const ALL: [ProductStatus; 3] = [
        ProductStatus::Available,
        ProductStatus::ComingSoon,
        ProductStatus::Sold,
    ];

    /// Literal stored by the backend.
    pub fn as_str(self) -> &'static str {
        match self {
            ProductStatus::Available => "Disponible",
            ProductStatus::Sold => "Vendido",
            ProductStatus::ComingSoon => "Proximamente",
        }
    }

    /// Human label (with the accent the stored literal omits).
    pub fn label(self) -> &'static str {
        match self {
            ProductStatus::Available => "Disponible",
            ProductStatus::Sold => "Vendido",
            ProductStatus::ComingSoon => "Próximamente",
        }
    }

    /// Sold and coming-soon products hide prices, financing and contact links.
    pub fn is_unavailable(self) -> bool {
        matches!(self, ProductStatus::Sold | ProductStatus::ComingSoon)
    }
}

impl Default for ProductStatus {
    fn default() -> Self {
        ProductStatus::Available
    }
}

impl core::fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Disponible" => Ok(ProductStatus::Available),
            "Vendido" => Ok(ProductStatus::Sold),
            "Proximamente" | "Próximamente" => Ok(ProductStatus::ComingSoon),
            other => Err(DomainError::validation(format!("estado desconocido: '{other}'"))),
        }
    }
}

/// Currencies a product can be priced in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Ars,
    Usd,
}

impl Currency {
    /// Display order: pesos first.
    pub const ALL: [Currency; 2] = [Currency::Ars, Currency::Usd];

    pub fn code(self) -> &'static str {
        match self {
            Currency::Ars => "ARS",
            Currency::Usd => "USD",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Currency::Ars => "$",
            Currency::Usd => "US$",
        }
    }

    /// `$ 150.000`, `US$ 1.200`.
    pub fn format(self, amount: u64, locale: Locale) -> String {
        format!("{} {}", self.symbol(), locale.format_amount(amount))
    }
}

impl FromStr for Currency {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ARS" => Ok(Currency::Ars),
            "USD" => Ok(Currency::Usd),
            other => Err(DomainError::validation(format!("moneda desconocida: '{other}'"))),
        }
    }
}

/// Price and installment terms of a product in one currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyPricing {
    /// Base price in whole currency units; `None` when not offered in this currency.
    pub base_price: Option<u64>,
    /// Installment count; 1 means no installment plan.
    pub installments: u32,
    /// Interest added to the base price before dividing, in percent.
    pub interest_percent: f64,
}

impl CurrencyPricing {
    pub fn unpriced() -> Self {
        Self {
            base_price: None,
            installments: 1,
            interest_percent: 0.0,
        }
    }

    pub fn cash(base_price: u64) -> Self {
        Self {
            base_price: Some(base_price).filter(|p| *p > 0),
            ..Self::unpriced()
        }
    }

    /// Positive base price, if any.
    pub fn price(&self) -> Option<u64> {
        self.base_price.filter(|p| *p > 0)
    }

    pub fn plan(&self, currency: Currency) -> InstallmentPlan {
        InstallmentPlan::new(currency, self.installments, self.interest_percent)
    }
}

impl Default for CurrencyPricing {
    fn default() -> Self {
        Self::unpriced()
    }
}

/// Snapshot of a catalog product as delivered by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    /// Free text; one spec line per row (see [`crate::specs`]).
    pub description: String,
    /// First-use date (`YYYY-MM-DD`) or legacy free text.
    pub first_use: String,
    pub category_id: Option<CategoryId>,
    pub subcategory_id: Option<SubcategoryId>,
    pub ars: CurrencyPricing,
    pub usd: CurrencyPricing,
    /// Public image URLs; the first one is the cover.
    pub images: Vec<String>,
    pub status: ProductStatus,
    pub buyer_id: Option<UserId>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Product {
    /// A bare available product, mostly useful to build fixtures.
    pub fn new(id: ProductId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: String::new(),
            first_use: String::new(),
            category_id: None,
            subcategory_id: None,
            ars: CurrencyPricing::unpriced(),
            usd: CurrencyPricing::unpriced(),
            images: Vec::new(),
            status: ProductStatus::Available,
            buyer_id: None,
            created_at: None,
        }
    }

    pub fn pricing(&self, currency: Currency) -> &CurrencyPricing {
        match currency {
            Currency::Ars => &self.ars,
            Currency::Usd => &self.usd,
        }
    }

    /// At least one positive base price (required for persisting).
    pub fn has_price(&self) -> bool {
        Currency::ALL.iter().any(|c| self.pricing(*c).price().is_some())
    }

    pub fn is_unavailable(&self) -> bool {
        self.status.is_unavailable()
    }

    pub fn cover_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Cash price labels, pesos first (`$ 150.000`, `US$ 120`).
    pub fn price_labels(&self, locale: Locale) -> Vec<String> {
        Currency::ALL
            .iter()
            .filter_map(|c| self.pricing(*c).price().map(|p| c.format(p, locale)))
            .collect()
    }

    /// "Tiempo de uso" label relative to `today`; empty when no first-use value.
    pub fn usage_label(&self, today: NaiveDate, locale: Locale) -> String {
        usage::format_elapsed_in(&self.first_use, today, locale)
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
