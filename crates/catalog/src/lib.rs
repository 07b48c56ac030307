//! Catalog domain module.
//!
//! Business rules for the storefront catalog, implemented purely as
//! deterministic domain logic (no IO, no backend, no rendering):
//!
//! - [`pricing`]: installment totals per currency
//! - [`usage`]: first-use date to elapsed-duration labels
//! - [`filter`]: category/subcategory/status filtering and selector options
//! - [`taxonomy`], [`banner`], [`draft`], [`specs`]: entity rules and form normalization

pub mod banner;
pub mod draft;
pub mod filter;
pub mod locale;
pub mod pricing;
pub mod product;
pub mod specs;
pub mod taxonomy;
pub mod usage;

pub use banner::{Banner, BannerDraft, Tone};
pub use draft::{ProductDraft, ValidatedProduct, format_number_input, parse_formatted_number};
pub use filter::{
    CatalogFilter, CatalogSummary, FilterSelection, category_options, filter_products,
    subcategory_options,
};
pub use locale::{Locale, compare_names};
pub use pricing::{Installment, InstallmentPlan, InstallmentQuote, compute_installment};
pub use product::{Currency, CurrencyPricing, Product, ProductStatus};
pub use specs::{SpecLine, parse_spec_lines};
pub use taxonomy::{Category, Subcategory, SubcategoryView, Taxonomy};
pub use usage::{format_elapsed, format_elapsed_in, is_strict_calendar_date};
