//! Two-level category taxonomy (categories and their subcategories).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tiendita_core::{CategoryId, DomainError, DomainResult, Entity, SubcategoryId};

use crate::locale::compare_names;
use crate::product::Product;

/// Label shown for products or subcategories without a (resolvable) category.
pub const NO_CATEGORY: &str = "Sin categoría";

/// Label shown for products without a (resolvable) subcategory.
pub const NO_SUBCATEGORY: &str = "Sin subcategoría";

/// Longest category or subcategory name, in characters.
pub const MAX_NAME_CHARS: usize = 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl Category {
    pub fn new(id: CategoryId, name: &str) -> DomainResult<Self> {
        Ok(Self {
            id,
            name: normalize_name(name, "Escribe una categoría válida.")?,
            created_at: None,
        })
    }

    pub fn rename(&mut self, name: &str) -> DomainResult<()> {
        self.name = normalize_name(name, "Escribe un nombre válido para la categoría.")?;
        Ok(())
    }
}

impl Entity for Category {
    type Id = CategoryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subcategory {
    pub id: SubcategoryId,
    /// `None` once the parent was deleted (orphan) or when never set on a legacy row.
    pub category_id: Option<CategoryId>,
    pub name: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl Subcategory {
    pub fn new(id: SubcategoryId, category_id: Option<CategoryId>, name: &str) -> DomainResult<Self> {
        let category_id = category_id.ok_or_else(|| DomainError::validation("Selecciona una categoría."))?;
        Ok(Self {
            id,
            category_id: Some(category_id),
            name: normalize_name(name, "Escribe una subcategoría válida.")?,
            created_at: None,
        })
    }

    /// Move and/or rename; both values are required.
    pub fn update(&mut self, category_id: Option<CategoryId>, name: &str) -> DomainResult<()> {
        let category_id = category_id.ok_or_else(|| DomainError::validation("Selecciona una categoría."))?;
        self.name = normalize_name(name, "Escribe un nombre válido para la subcategoría.")?;
        self.category_id = Some(category_id);
        Ok(())
    }

    pub fn belongs_to(&self, category_id: CategoryId) -> bool {
        self.category_id == Some(category_id)
    }
}

impl Entity for Subcategory {
    type Id = SubcategoryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

fn normalize_name(raw: &str, blank_message: &str) -> DomainResult<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(DomainError::validation(blank_message));
    }
    if name.chars().count() > MAX_NAME_CHARS {
        return Err(DomainError::validation(format!(
            "El nombre no puede superar los {MAX_NAME_CHARS} caracteres."
        )));
    }
    Ok(name.to_string())
}

/// Which subcategories the taxonomy editor lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubcategoryView {
    #[default]
    All,
    Category(CategoryId),
}

/// Snapshot of all categories and subcategories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Taxonomy {
    pub categories: Vec<Category>,
    pub subcategories: Vec<Subcategory>,
}

impl Taxonomy {
    pub fn new(categories: Vec<Category>, subcategories: Vec<Subcategory>) -> Self {
        Self {
            categories,
            subcategories,
        }
    }

    pub fn category(&self, id: CategoryId) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn subcategory(&self, id: SubcategoryId) -> Option<&Subcategory> {
        self.subcategories.iter().find(|s| s.id == id)
    }

    /// Parent reference must name an existing category.
    pub fn ensure_category_exists(&self, id: CategoryId) -> DomainResult<()> {
        if self.category(id).is_some() {
            Ok(())
        } else {
            Err(DomainError::validation("Selecciona una categoría."))
        }
    }

    /// Subcategory `sub` exists and hangs from `category`.
    pub fn subcategory_belongs(&self, sub: SubcategoryId, category: CategoryId) -> bool {
        self.subcategory(sub).is_some_and(|s| s.belongs_to(category))
    }

    /// Parent name, or "Sin categoría" for orphans.
    pub fn parent_name_or_default(&self, sub: &Subcategory) -> &str {
        sub.category_id
            .and_then(|id| self.category(id))
            .map_or(NO_CATEGORY, |c| c.name.as_str())
    }

    /// Subcategories whose parent is missing or no longer exists.
    pub fn orphaned_subcategories(&self) -> Vec<&Subcategory> {
        self.subcategories
            .iter()
            .filter(|s| s.category_id.and_then(|id| self.category(id)).is_none())
            .collect()
    }

    /// Subcategories that would be orphaned by deleting `category`.
    pub fn dependents_of(&self, category: CategoryId) -> Vec<&Subcategory> {
        self.subcategories
            .iter()
            .filter(|s| s.belongs_to(category))
            .collect()
    }

    pub fn sorted_categories(&self) -> Vec<&Category> {
        let mut out: Vec<&Category> = self.categories.iter().collect();
        out.sort_by(|a, b| compare_names(&a.name, &b.name));
        out
    }

    /// Subcategories listed by the taxonomy editor, sorted by name.
    pub fn sorted_subcategories(&self, view: SubcategoryView) -> Vec<&Subcategory> {
        let mut out: Vec<&Subcategory> = self
            .subcategories
            .iter()
            .filter(|s| match view {
                SubcategoryView::All => true,
                SubcategoryView::Category(id) => s.belongs_to(id),
            })
            .collect();
        out.sort_by(|a, b| compare_names(&a.name, &b.name));
        out
    }

    /// Category and subcategory names of a product; empty when unresolved.
    pub fn product_names(&self, product: &Product) -> (String, String) {
        let category = product
            .category_id
            .and_then(|id| self.category(id))
            .map(|c| c.name.clone())
            .unwrap_or_default();
        let subcategory = product
            .subcategory_id
            .and_then(|id| self.subcategory(id))
            .map(|s| s.name.clone())
            .unwrap_or_default();
        (category, subcategory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiendita_core::ProductId;

    fn category(name: &str) -> Category {
        Category::new(CategoryId::new(), name).unwrap()
    }

    fn sub(parent: &Category, name: &str) -> Subcategory {
        Subcategory::new(SubcategoryId::new(), Some(parent.id), name).unwrap()
    }

    #[test]
    fn category_names_are_trimmed() {
        assert_eq!(category("  Electrónica ").name, "Electrónica");
    }

    #[test]
    fn blank_names_are_rejected_with_form_messages() {
        let err = Category::new(CategoryId::new(), "   ").unwrap_err();
        assert_eq!(err, DomainError::validation("Escribe una categoría válida."));

        let mut c = category("Hogar");
        let err = c.rename("").unwrap_err();
        assert_eq!(
            err,
            DomainError::validation("Escribe un nombre válido para la categoría.")
        );
        assert_eq!(c.name, "Hogar");
    }

    #[test]
    fn names_are_capped_at_sixty_characters() {
        let longest = "ñ".repeat(MAX_NAME_CHARS);
        let too_long = "ñ".repeat(MAX_NAME_CHARS + 1);
        let message = "El nombre no puede superar los 60 caracteres.";

        let mut hogar = Category::new(CategoryId::new(), &format!(" {longest} ")).unwrap();
        assert_eq!(hogar.name, longest);
        assert_eq!(
            Category::new(CategoryId::new(), &too_long).unwrap_err().user_message(),
            message
        );
        assert_eq!(hogar.rename(&too_long).unwrap_err().user_message(), message);
        assert_eq!(hogar.name, longest);

        let mut lamparas = Subcategory::new(SubcategoryId::new(), Some(hogar.id), &longest).unwrap();
        assert_eq!(
            Subcategory::new(SubcategoryId::new(), Some(hogar.id), &too_long)
                .unwrap_err()
                .user_message(),
            message
        );
        assert_eq!(
            lamparas.update(Some(hogar.id), &too_long).unwrap_err().user_message(),
            message
        );
        assert_eq!(lamparas.name, longest);
    }

    #[test]
    fn subcategory_requires_parent_then_name() {
        let err = Subcategory::new(SubcategoryId::new(), None, "Sillas").unwrap_err();
        assert_eq!(err, DomainError::validation("Selecciona una categoría."));

        let err = Subcategory::new(SubcategoryId::new(), Some(CategoryId::new()), " ").unwrap_err();
        assert_eq!(err, DomainError::validation("Escribe una subcategoría válida."));
    }

    #[test]
    fn deleting_parent_orphans_without_cascading() {
        let hogar = category("Hogar");
        let tech = category("Tecnología");
        let sillas = sub(&hogar, "Sillas");
        let notebooks = sub(&tech, "Notebooks");
        let mut taxonomy = Taxonomy::new(
            vec![hogar.clone(), tech.clone()],
            vec![sillas.clone(), notebooks.clone()],
        );
        assert!(taxonomy.orphaned_subcategories().is_empty());
        assert_eq!(taxonomy.dependents_of(hogar.id), vec![&sillas]);

        taxonomy.categories.retain(|c| c.id != hogar.id);

        assert_eq!(taxonomy.subcategories.len(), 2);
        assert_eq!(taxonomy.orphaned_subcategories(), vec![&sillas]);
        assert_eq!(taxonomy.parent_name_or_default(&sillas), NO_CATEGORY);
        assert_eq!(taxonomy.parent_name_or_default(&notebooks), "Tecnología");
    }

    #[test]
    fn editor_lists_sorted_and_scoped() {
        let hogar = category("hogar");
        let audio = category("Audio");
        let mesas = sub(&hogar, "Mesas");
        let camas = sub(&hogar, "camas");
        let parlantes = sub(&audio, "Parlantes");
        let taxonomy = Taxonomy::new(
            vec![hogar.clone(), audio.clone()],
            vec![mesas.clone(), camas.clone(), parlantes.clone()],
        );

        let names: Vec<&str> = taxonomy.sorted_categories().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Audio", "hogar"]);

        let all: Vec<&str> = taxonomy
            .sorted_subcategories(SubcategoryView::All)
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(all, vec!["camas", "Mesas", "Parlantes"]);

        let scoped = taxonomy.sorted_subcategories(SubcategoryView::Category(hogar.id));
        assert_eq!(scoped, vec![&camas, &mesas]);
    }

    #[test]
    fn resolves_product_names() {
        let hogar = category("Hogar");
        let mesas = sub(&hogar, "Mesas");
        let taxonomy = Taxonomy::new(vec![hogar.clone()], vec![mesas.clone()]);

        let mut product = Product::new(ProductId::new(), "Mesa ratona");
        assert_eq!(taxonomy.product_names(&product), (String::new(), String::new()));

        product.category_id = Some(hogar.id);
        product.subcategory_id = Some(mesas.id);
        assert_eq!(
            taxonomy.product_names(&product),
            ("Hogar".to_string(), "Mesas".to_string())
        );
        assert!(taxonomy.subcategory_belongs(mesas.id, hogar.id));
        assert!(!taxonomy.subcategory_belongs(mesas.id, CategoryId::new()));
    }
}
