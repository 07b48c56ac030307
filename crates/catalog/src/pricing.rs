//! Installment ("cuotas") arithmetic.
//!
//! Amounts are whole currency units; there are no cents. The calculator is
//! total: invalid inputs are coerced with the `sanitize_*` helpers before use,
//! so nothing here returns an error.

use serde::{Deserialize, Serialize};

use tiendita_core::ValueObject;

use crate::locale::Locale;
use crate::product::{Currency, Product};

/// Plan sizes offered by the admin form.
pub const PLAN_OPTIONS: [u32; 5] = [3, 6, 12, 18, 24];

/// Plan size selected when an admin enables installments.
pub const DEFAULT_PLAN: u32 = 3;

/// Result of splitting a price into installments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installment {
    pub per_installment: u64,
    pub total: u64,
}

impl ValueObject for Installment {}

/// Compute the total with interest and the per-installment amount.
///
/// `total = round(base * (1 + interest/100))`, then
/// `per_installment = round(total / count)`, both rounding half up.
pub fn compute_installment(base_price: u64, interest_percent: f64, installment_count: u32) -> Installment {
    let interest = sanitize_interest(interest_percent);
    let count = u64::from(installment_count.max(1));

    // (base * (100 + i)) / 100 keeps x.5 results exact for whole/half percents.
    let total = ((base_price as f64) * (100.0 + interest) / 100.0).round() as u64;
    let per_installment = (2 * total + count) / (2 * count);

    Installment {
        per_installment,
        total,
    }
}

/// Coerce an interest percentage: NaN, infinite and negative values become 0.
pub fn sanitize_interest(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 { value } else { 0.0 }
}

/// Coerce an installment count: anything below 1 becomes 1 (no plan).
pub fn sanitize_installments(value: i64) -> u32 {
    u32::try_from(value.max(1)).unwrap_or(u32::MAX)
}

/// Coerce a raw amount to whole units: NaN, infinite and non-positive values become 0.
pub fn sanitize_amount(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.round() as u64
    } else {
        0
    }
}

/// Installment terms for one currency of a product.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InstallmentPlan {
    pub currency: Currency,
    pub installments: u32,
    pub interest_percent: f64,
}

impl ValueObject for InstallmentPlan {}

impl InstallmentPlan {
    pub fn new(currency: Currency, installments: u32, interest_percent: f64) -> Self {
        Self {
            currency,
            installments: installments.max(1),
            interest_percent: sanitize_interest(interest_percent),
        }
    }

    /// One installment means paying in full.
    pub fn is_enabled(&self) -> bool {
        self.installments > 1
    }

    /// Quote the plan for `base_price`.
    ///
    /// Returns `None` when there is nothing to display: no plan (count 1) or no
    /// positive base price.
    pub fn quote(&self, base_price: Option<u64>) -> Option<InstallmentQuote> {
        let base_price = base_price.filter(|p| *p > 0)?;
        if !self.is_enabled() {
            return None;
        }
        Some(InstallmentQuote {
            plan: *self,
            installment: compute_installment(base_price, self.interest_percent, self.installments),
        })
    }
}

/// A displayable installment offer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InstallmentQuote {
    pub plan: InstallmentPlan,
    pub installment: Installment,
}

impl InstallmentQuote {
    pub fn is_interest_free(&self) -> bool {
        self.plan.interest_percent == 0.0
    }

    /// "sin interés" for 0, otherwise e.g. "15% interés".
    pub fn interest_label(&self, locale: Locale) -> String {
        let words = locale.words();
        if self.is_interest_free() {
            words.interest_free.to_string()
        } else {
            format!(
                "{}% {}",
                locale.format_decimal(self.plan.interest_percent),
                words.interest
            )
        }
    }

    /// Catalog card line: `3x $ 367`, or `6x US$ 50 sin interés`.
    pub fn line(&self, locale: Locale) -> String {
        let base = self.amount_per_installment(locale);
        if self.is_interest_free() {
            format!("{base} {}", locale.words().interest_free)
        } else {
            base
        }
    }

    /// Admin form preview: `3x $ 367 (total: $ 1.100)`, or `3x $ 334 sin interés`.
    pub fn preview(&self, locale: Locale) -> String {
        let base = self.amount_per_installment(locale);
        if self.is_interest_free() {
            format!("{base} {}", locale.words().interest_free)
        } else {
            format!(
                "{base} ({}: {})",
                locale.words().total,
                self.plan.currency.format(self.installment.total, locale)
            )
        }
    }

    fn amount_per_installment(&self, locale: Locale) -> String {
        format!(
            "{}x {}",
            self.plan.installments,
            self.plan
                .currency
                .format(self.installment.per_installment, locale)
        )
    }
}

/// Quotes for every currency the product offers a plan in, pesos first.
pub fn quotes(product: &Product) -> Vec<InstallmentQuote> {
    Currency::ALL
        .iter()
        .filter_map(|c| {
            let pricing = product.pricing(*c);
            pricing.plan(*c).quote(pricing.price())
        })
        .collect()
}

/// Financing lines shown on a catalog card.
pub fn financing_lines(product: &Product, locale: Locale) -> Vec<String> {
    quotes(product).iter().map(|q| q.line(locale)).collect()
}
