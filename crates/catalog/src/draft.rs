//! Product editing form: raw inputs in, a normalized product payload out.

use serde::{Deserialize, Serialize};

use tiendita_core::{CategoryId, DomainError, DomainResult, ProductId, SubcategoryId};

use crate::locale::Locale;
use crate::pricing::{DEFAULT_PLAN, InstallmentPlan, InstallmentQuote, sanitize_interest};
use crate::product::{Currency, CurrencyPricing, Product, ProductStatus};
use crate::taxonomy::Taxonomy;
use crate::usage;

/// Digits of a grouped number input (`"1.234.567"` -> `1234567`); no digits -> 0.
pub fn parse_formatted_number(formatted: &str) -> u64 {
    formatted
        .chars()
        .filter_map(|c| c.to_digit(10))
        .fold(0u64, |acc, d| acc.saturating_mul(10).saturating_add(u64::from(d)))
}

/// Reformat whatever was typed as a grouped integer (`"12a34"` -> `"1.234"`).
pub fn format_number_input(value: &str, locale: Locale) -> String {
    if !value.chars().any(|c| c.is_ascii_digit()) {
        return String::new();
    }
    locale.format_amount(parse_formatted_number(value))
}

/// Admin form state for creating or editing a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    /// Set when editing an existing product.
    pub product_id: Option<ProductId>,
    pub title: String,
    pub description: String,
    /// `YYYY-MM-DD` from the date input, or empty.
    pub first_use: String,
    pub category_id: Option<CategoryId>,
    pub subcategory_id: Option<SubcategoryId>,
    /// Grouped price inputs as typed (`"150.000"`).
    pub price_ars: String,
    pub price_usd: String,
    pub installments_ars: u32,
    pub interest_ars: f64,
    pub installments_usd: u32,
    pub interest_usd: f64,
    pub status: ProductStatus,
    /// Already-uploaded image URLs kept on save; new files are appended after them.
    pub existing_images: Vec<String>,
}

impl Default for ProductDraft {
    fn default() -> Self {
        Self {
            product_id: None,
            title: String::new(),
            description: String::new(),
            first_use: String::new(),
            category_id: None,
            subcategory_id: None,
            price_ars: String::new(),
            price_usd: String::new(),
            installments_ars: 1,
            interest_ars: 0.0,
            installments_usd: 1,
            interest_usd: 0.0,
            status: ProductStatus::Available,
            existing_images: Vec::new(),
        }
    }
}

impl ProductDraft {
    /// Pre-fill the form from a stored product.
    pub fn from_product(product: &Product, locale: Locale) -> Self {
        let grouped = |p: &CurrencyPricing| {
            p.price()
                .map(|v| locale.format_amount(v))
                .unwrap_or_default()
        };
        Self {
            product_id: Some(product.id),
            title: product.title.clone(),
            description: product.description.clone(),
            first_use: usage::first_use_for_form(&product.first_use),
            category_id: product.category_id,
            subcategory_id: product.subcategory_id,
            price_ars: grouped(&product.ars),
            price_usd: grouped(&product.usd),
            installments_ars: product.ars.installments.max(1),
            interest_ars: sanitize_interest(product.ars.interest_percent),
            installments_usd: product.usd.installments.max(1),
            interest_usd: sanitize_interest(product.usd.interest_percent),
            status: product.status,
            existing_images: product.images.clone(),
        }
    }

    /// Changing the category always clears the subcategory.
    pub fn set_category(&mut self, category: Option<CategoryId>) {
        self.category_id = category;
        self.subcategory_id = None;
    }

    /// Tick the "precio en cuotas" box: default plan size.
    pub fn enable_plan(&mut self, currency: Currency) {
        *self.installments_mut(currency) = DEFAULT_PLAN;
    }

    /// Untick the box: back to a single payment without interest.
    pub fn disable_plan(&mut self, currency: Currency) {
        *self.installments_mut(currency) = 1;
        *self.interest_mut(currency) = 0.0;
    }

    pub fn remove_existing_image(&mut self, index: usize) {
        if index < self.existing_images.len() {
            self.existing_images.remove(index);
        }
    }

    pub fn base_price(&self, currency: Currency) -> u64 {
        match currency {
            Currency::Ars => parse_formatted_number(&self.price_ars),
            Currency::Usd => parse_formatted_number(&self.price_usd),
        }
    }

    /// Live preview under the plan controls; `None` when nothing to show.
    pub fn plan_preview(&self, currency: Currency) -> Option<InstallmentQuote> {
        let (count, interest) = match currency {
            Currency::Ars => (self.installments_ars, self.interest_ars),
            Currency::Usd => (self.installments_usd, self.interest_usd),
        };
        InstallmentPlan::new(currency, count, interest).quote(Some(self.base_price(currency)))
    }

    /// Normalize and validate the form.
    pub fn validate(&self, taxonomy: &Taxonomy) -> DomainResult<ValidatedProduct> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(DomainError::validation("Escribe un título."));
        }
        let description = self.description.trim();
        if description.is_empty() {
            return Err(DomainError::validation("Escribe una descripción."));
        }

        let ars = pricing_for(self.base_price(Currency::Ars), self.installments_ars, self.interest_ars);
        let usd = pricing_for(self.base_price(Currency::Usd), self.installments_usd, self.interest_usd);
        if ars.price().is_none() && usd.price().is_none() {
            return Err(DomainError::validation("Carga al menos un precio: ARS o USD."));
        }

        let subcategory_id = match (self.category_id, self.subcategory_id) {
            (Some(cat), Some(sub)) if taxonomy.subcategory_belongs(sub, cat) => Some(sub),
            _ => None,
        };

        let first_use = Some(self.first_use.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Ok(ValidatedProduct {
            product_id: self.product_id,
            title: title.to_string(),
            description: description.to_string(),
            first_use,
            category_id: self.category_id,
            subcategory_id,
            ars,
            usd,
            status: self.status,
            images: self.existing_images.clone(),
        })
    }

    fn installments_mut(&mut self, currency: Currency) -> &mut u32 {
        match currency {
            Currency::Ars => &mut self.installments_ars,
            Currency::Usd => &mut self.installments_usd,
        }
    }

    fn interest_mut(&mut self, currency: Currency) -> &mut f64 {
        match currency {
            Currency::Ars => &mut self.interest_ars,
            Currency::Usd => &mut self.interest_usd,
        }
    }
}

fn pricing_for(base_price: u64, installments: u32, interest: f64) -> CurrencyPricing {
    if base_price == 0 {
        return CurrencyPricing::unpriced();
    }
    CurrencyPricing {
        base_price: Some(base_price),
        installments: installments.max(1),
        interest_percent: sanitize_interest(interest),
    }
}

/// Normalized product payload, ready to be written by the backend layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatedProduct {
    pub product_id: Option<ProductId>,
    pub title: String,
    pub description: String,
    pub first_use: Option<String>,
    pub category_id: Option<CategoryId>,
    pub subcategory_id: Option<SubcategoryId>,
    pub ars: CurrencyPricing,
    pub usd: CurrencyPricing,
    pub status: ProductStatus,
    /// Images kept from the previous version, in order.
    pub images: Vec<String>,
}

impl ValidatedProduct {
    /// Legacy single-price columns: the ARS price when present, else USD.
    pub fn legacy_base_price(&self) -> (u64, Currency) {
        match (self.ars.price(), self.usd.price()) {
            (Some(ars), _) => (ars, Currency::Ars),
            (None, Some(usd)) => (usd, Currency::Usd),
            (None, None) => (0, Currency::Usd),
        }
    }
}
