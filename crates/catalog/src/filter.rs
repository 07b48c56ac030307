//! Catalog filtering and the selector options derived from it.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use tiendita_core::{CategoryId, DomainError, DomainResult, SubcategoryId};

use crate::locale::{Locale, compare_names, pluralize};
use crate::product::{Product, ProductStatus};
use crate::taxonomy::{Category, Subcategory};

/// Conjunctive catalog filter; an unset criterion matches everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogFilter {
    pub category_id: Option<CategoryId>,
    pub subcategory_id: Option<SubcategoryId>,
    pub status: Option<ProductStatus>,
}

impl CatalogFilter {
    pub fn is_empty(&self) -> bool {
        self.category_id.is_none() && self.subcategory_id.is_none() && self.status.is_none()
    }

    pub fn matches(&self, product: &Product) -> bool {
        self.category_id.is_none_or(|id| product.category_id == Some(id))
            && self
                .subcategory_id
                .is_none_or(|id| product.subcategory_id == Some(id))
            && self.status.is_none_or(|s| product.status == s)
    }
}

/// Order-preserving subsequence of `products` that pass `filter`.
pub fn filter_products<'a, I>(products: I, filter: &CatalogFilter) -> Vec<&'a Product>
where
    I: IntoIterator<Item = &'a Product>,
{
    products.into_iter().filter(|p| filter.matches(p)).collect()
}

/// Categories referenced by at least one product, sorted by name.
pub fn category_options<'a>(categories: &'a [Category], products: &[Product]) -> Vec<&'a Category> {
    let used: HashSet<CategoryId> = products.iter().filter_map(|p| p.category_id).collect();
    let mut out: Vec<&Category> = categories.iter().filter(|c| used.contains(&c.id)).collect();
    out.sort_by(|a, b| compare_names(&a.name, &b.name));
    out
}

/// Subcategories referenced by at least one product, scoped to `selected`
/// (both the products considered and the subcategory's parent), sorted by name.
pub fn subcategory_options<'a>(
    subcategories: &'a [Subcategory],
    products: &[Product],
    selected: Option<CategoryId>,
) -> Vec<&'a Subcategory> {
    let used: HashSet<SubcategoryId> = products
        .iter()
        .filter(|p| selected.is_none_or(|id| p.category_id == Some(id)))
        .filter_map(|p| p.subcategory_id)
        .collect();
    let mut out: Vec<&Subcategory> = subcategories
        .iter()
        .filter(|s| used.contains(&s.id))
        .filter(|s| selected.is_none_or(|id| s.belongs_to(id)))
        .collect();
    out.sort_by(|a, b| compare_names(&a.name, &b.name));
    out
}

/// Selector state of the public catalog.
///
/// Keeps the consistency rule: when a category is selected, a selected
/// subcategory always belongs to it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterSelection {
    filter: CatalogFilter,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(&self) -> &CatalogFilter {
        &self.filter
    }

    /// Select (or clear) the category, dropping a subcategory that does not
    /// belong to the new one.
    pub fn select_category(&mut self, category: Option<CategoryId>, subcategories: &[Subcategory]) {
        self.filter.category_id = category;
        if let (Some(cat), Some(sub)) = (category, self.filter.subcategory_id) {
            let still_valid = subcategories.iter().any(|s| s.id == sub && s.belongs_to(cat));
            if !still_valid {
                tracing::debug!(%sub, %cat, "subcategory selection reset after category change");
                self.filter.subcategory_id = None;
            }
        }
    }

    /// Select (or clear) the subcategory.
    ///
    /// A subcategory outside the selected category is rejected and the
    /// subcategory selection is cleared.
    pub fn select_subcategory(
        &mut self,
        subcategory: Option<SubcategoryId>,
        subcategories: &[Subcategory],
    ) -> DomainResult<()> {
        let Some(id) = subcategory else {
            self.filter.subcategory_id = None;
            return Ok(());
        };

        let Some(sub) = subcategories.iter().find(|s| s.id == id) else {
            self.filter.subcategory_id = None;
            return Err(DomainError::not_found());
        };

        if let Some(cat) = self.filter.category_id {
            if !sub.belongs_to(cat) {
                self.filter.subcategory_id = None;
                return Err(DomainError::invariant(
                    "La subcategoría no pertenece a la categoría seleccionada.",
                ));
            }
        }

        self.filter.subcategory_id = Some(id);
        Ok(())
    }

    pub fn select_status(&mut self, status: Option<ProductStatus>) {
        self.filter.status = status;
    }

    pub fn clear(&mut self) {
        self.filter = CatalogFilter::default();
    }

    /// Products passing the current selection.
    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        filter_products(products, &self.filter)
    }
}

/// Admin dashboard counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSummary {
    pub total: usize,
    pub sold: usize,
}

impl CatalogSummary {
    pub fn of(products: &[Product]) -> Self {
        Self {
            total: products.len(),
            sold: products
                .iter()
                .filter(|p| p.status == ProductStatus::Sold)
                .count(),
        }
    }
}

/// `"1 producto"`, `"3 productos"`.
pub fn result_count_label(count: usize, locale: Locale) -> String {
    let words = locale.words();
    pluralize(count as u64, words.product, words.products)
}
