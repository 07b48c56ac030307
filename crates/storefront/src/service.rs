//! Storefront use cases: one backend round-trip sequence per user action.
//!
//! Every mutating operation follows the same shape:
//!
//! ```text
//! action
//!   ↓
//! 1. Require the admin capability (session email == configured email)
//!   ↓
//! 2. Validate input against the current snapshot (pure, catalog crate)
//!   ↓
//! 3. Issue the backend writes, awaiting each one
//!   ↓
//! 4. Reload the whole marketplace snapshot and return it
//! ```
//!
//! Nothing is cached between actions: the returned [`Marketplace`] is the
//! state callers render until the next action.

use chrono::Utc;

use tiendita_catalog::banner::{active_banners, sorted_for_admin};
use tiendita_catalog::{
    Banner, BannerDraft, CatalogFilter, CatalogSummary, Category, Locale, Product, ProductDraft,
    Subcategory, Taxonomy, Tone, category_options, filter_products, subcategory_options,
};
use tiendita_core::{BannerId, CategoryId, DomainError, ProductId, SubcategoryId};

use crate::backend::{Backend, ImageUpload, Order, Row, Table};
use crate::config::StorefrontConfig;
use crate::error::StorefrontError;
use crate::records::{self, map_rows};
use crate::session::{AdminPolicy, SessionUser};

pub type StorefrontResult<T> = Result<T, StorefrontError>;

/// Snapshot of everything the storefront shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Marketplace {
    /// Newest first.
    pub products: Vec<Product>,
    pub taxonomy: Taxonomy,
    /// Newest first, active and inactive.
    pub banners: Vec<Banner>,
}

impl Marketplace {
    pub fn summary(&self) -> CatalogSummary {
        CatalogSummary::of(&self.products)
    }

    pub fn active_banners(&self) -> Vec<&Banner> {
        active_banners(&self.banners)
    }

    pub fn banners_for_admin(&self) -> Vec<&Banner> {
        sorted_for_admin(&self.banners)
    }

    pub fn category_options(&self) -> Vec<&Category> {
        category_options(&self.taxonomy.categories, &self.products)
    }

    pub fn subcategory_options(&self, selected: Option<CategoryId>) -> Vec<&Subcategory> {
        subcategory_options(&self.taxonomy.subcategories, &self.products, selected)
    }

    pub fn filtered(&self, filter: &CatalogFilter) -> Vec<&Product> {
        filter_products(&self.products, filter)
    }

    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }
}

/// Application service over a [`Backend`].
pub struct Storefront<B> {
    backend: B,
    policy: AdminPolicy,
    image_bucket: String,
    locale: Locale,
}

impl<B: Backend> Storefront<B> {
    pub fn new(backend: B, policy: AdminPolicy, image_bucket: impl Into<String>) -> Self {
        Self {
            backend,
            policy,
            image_bucket: image_bucket.into(),
            locale: Locale::default(),
        }
    }

    pub fn from_config(backend: B, config: &StorefrontConfig) -> Self {
        Self::new(
            backend,
            AdminPolicy::new(&config.admin_email),
            config.image_bucket.clone(),
        )
        .with_locale(config.locale)
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn policy(&self) -> &AdminPolicy {
        &self.policy
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// User of the current backend session, if any.
    pub fn current_user(&self) -> Option<SessionUser> {
        let session = self.backend.on_auth_change();
        let user = session.borrow().clone();
        user
    }

    pub fn is_admin(&self) -> bool {
        self.current_user().is_some_and(|u| self.policy.is_admin(&u))
    }

    fn require_admin(&self) -> StorefrontResult<SessionUser> {
        match self.current_user() {
            Some(user) if self.policy.is_admin(&user) => Ok(user),
            Some(user) => {
                tracing::warn!(email = %user.email, "admin operation rejected");
                Err(StorefrontError::Unauthorized)
            }
            None => Err(StorefrontError::Unauthorized),
        }
    }

    pub async fn sign_in(&self) -> StorefrontResult<()> {
        self.backend.sign_in().await?;
        Ok(())
    }

    pub async fn sign_out(&self) -> StorefrontResult<()> {
        self.backend.sign_out().await?;
        Ok(())
    }

    /// Sign out a session that belongs to anyone but the admin.
    ///
    /// Returns whether a sign-out happened. Sign-out failures are logged and
    /// swallowed; the next auth change triggers another attempt.
    pub async fn enforce_admin_session(&self) -> bool {
        let Some(user) = self.current_user() else {
            return false;
        };
        if !self.policy.must_sign_out(&user) {
            return false;
        }
        tracing::info!(email = %user.email, "signing out non-admin session");
        if let Err(e) = self.backend.sign_out().await {
            tracing::warn!(error = %e, "sign-out of non-admin session failed");
        }
        true
    }

    /// Load products, taxonomy and banners.
    ///
    /// A products failure is fatal; the other tables may not exist yet in a
    /// fresh project and then read as empty.
    pub async fn load_marketplace(&self) -> StorefrontResult<Marketplace> {
        let product_rows = self
            .backend
            .query(Table::Products, Order::desc(Table::Products.created_column()))
            .await
            .inspect_err(|e| tracing::error!(error = %e, "failed to load products"))?;

        let category_rows = self.optional_rows(Table::Categories, Order::asc("name")).await?;
        let subcategory_rows = self.optional_rows(Table::Subcategories, Order::asc("name")).await?;
        let banner_rows = self
            .optional_rows(Table::Announcements, Order::desc("created_at"))
            .await?;

        let marketplace = Marketplace {
            products: map_rows(Table::Products.name(), &product_rows, records::product_from_row),
            taxonomy: Taxonomy::new(
                map_rows(Table::Categories.name(), &category_rows, records::category_from_row),
                map_rows(Table::Subcategories.name(), &subcategory_rows, records::subcategory_from_row),
            ),
            banners: map_rows(Table::Announcements.name(), &banner_rows, records::banner_from_row),
        };
        tracing::debug!(
            products = marketplace.products.len(),
            categories = marketplace.taxonomy.categories.len(),
            subcategories = marketplace.taxonomy.subcategories.len(),
            banners = marketplace.banners.len(),
            "marketplace loaded"
        );
        Ok(marketplace)
    }

    async fn optional_rows(&self, table: Table, order: Order) -> StorefrontResult<Vec<Row>> {
        match self.backend.query(table, order).await {
            Ok(rows) => Ok(rows),
            Err(e) if e.is_missing_table() => {
                tracing::info!(%table, "table not created yet; reading as empty");
                Ok(Vec::new())
            }
            Err(e) => {
                tracing::error!(%table, error = %e, "failed to load table");
                Err(e.into())
            }
        }
    }

    async fn taxonomy(&self) -> StorefrontResult<Taxonomy> {
        Ok(self.load_marketplace().await?.taxonomy)
    }

    /// Create (no `product_id`) or update a product.
    ///
    /// New images are uploaded one by one before any row is written; the
    /// first failed upload aborts the save. Files uploaded before the failure
    /// stay in storage.
    pub async fn save_product(
        &self,
        draft: &ProductDraft,
        uploads: Vec<ImageUpload>,
    ) -> StorefrontResult<Marketplace> {
        let user = self.require_admin()?;
        let product = draft.validate(&self.taxonomy().await?)?;

        let mut images = product.images.clone();
        for upload in uploads {
            let path = format!(
                "{}/{}-{}",
                user.id,
                Utc::now().timestamp_millis(),
                upload.file_name
            );
            let url = self
                .backend
                .upload_file(&self.image_bucket, &path, upload.bytes)
                .await
                .inspect_err(|e| tracing::error!(error = %e, "image upload failed; product not saved"))?;
            tracing::debug!(%path, "image uploaded");
            images.push(url);
        }

        match product.product_id {
            Some(id) => {
                self.backend
                    .update(Table::Products, id.into(), records::product_payload(&product, &images))
                    .await?;
                tracing::info!(product = %id, images = images.len(), "product updated");
            }
            None => {
                let id = ProductId::new();
                self.backend
                    .insert(Table::Products, records::new_product_row(id, &product, &images, user.id))
                    .await?;
                tracing::info!(product = %id, images = images.len(), "product created");
            }
        }

        self.load_marketplace().await
    }

    pub async fn remove_product(&self, id: ProductId) -> StorefrontResult<Marketplace> {
        self.require_admin()?;
        self.backend.delete(Table::Products, id.into()).await?;
        tracing::info!(product = %id, "product removed");
        self.load_marketplace().await
    }

    /// Status `Vendido`, buyer cleared.
    pub async fn mark_product_sold(&self, id: ProductId) -> StorefrontResult<Marketplace> {
        self.require_admin()?;
        self.backend
            .update(Table::Products, id.into(), records::sold_patch())
            .await?;
        tracing::info!(product = %id, "product marked as sold");
        self.load_marketplace().await
    }

    /// Publish a new banner; banners are created active.
    pub async fn create_banner(&self, message: &str, tone: Tone) -> StorefrontResult<Marketplace> {
        let user = self.require_admin()?;
        let draft = BannerDraft::new(message, tone)?;
        let id = BannerId::new();
        self.backend
            .insert(Table::Announcements, records::new_banner_row(id, &draft, user.id))
            .await?;
        tracing::info!(banner = %id, tone = draft.tone.as_str(), "banner published");
        self.load_marketplace().await
    }

    pub async fn toggle_banner(&self, id: BannerId, active: bool) -> StorefrontResult<Marketplace> {
        self.require_admin()?;
        self.backend
            .update(Table::Announcements, id.into(), records::banner_active_patch(active))
            .await?;
        tracing::info!(banner = %id, active, "banner toggled");
        self.load_marketplace().await
    }

    pub async fn delete_banner(&self, id: BannerId) -> StorefrontResult<Marketplace> {
        self.require_admin()?;
        self.backend.delete(Table::Announcements, id.into()).await?;
        tracing::info!(banner = %id, "banner deleted");
        self.load_marketplace().await
    }

    pub async fn create_category(&self, name: &str) -> StorefrontResult<Marketplace> {
        let user = self.require_admin()?;
        let category = Category::new(CategoryId::new(), name)?;
        self.backend
            .insert(Table::Categories, records::new_category_row(&category, user.id))
            .await?;
        tracing::info!(category = %category.id, name = %category.name, "category created");
        self.load_marketplace().await
    }

    pub async fn update_category(&self, id: CategoryId, name: &str) -> StorefrontResult<Marketplace> {
        self.require_admin()?;
        let mut category = self
            .taxonomy()
            .await?
            .category(id)
            .cloned()
            .ok_or_else(DomainError::not_found)?;
        category.rename(name)?;
        self.backend
            .update(Table::Categories, id.into(), records::category_patch(&category))
            .await?;
        tracing::info!(category = %id, name = %category.name, "category renamed");
        self.load_marketplace().await
    }

    /// Delete a category. Its subcategories and products keep their (now
    /// dangling) references and show the "Sin categoría" fallback.
    pub async fn delete_category(&self, id: CategoryId) -> StorefrontResult<Marketplace> {
        self.require_admin()?;
        let orphaned = self.taxonomy().await?.dependents_of(id).len();
        self.backend.delete(Table::Categories, id.into()).await?;
        tracing::info!(category = %id, orphaned_subcategories = orphaned, "category deleted");
        self.load_marketplace().await
    }

    pub async fn create_subcategory(
        &self,
        category_id: Option<CategoryId>,
        name: &str,
    ) -> StorefrontResult<Marketplace> {
        let user = self.require_admin()?;
        let subcategory = Subcategory::new(SubcategoryId::new(), category_id, name)?;
        if let Some(parent) = subcategory.category_id {
            self.taxonomy().await?.ensure_category_exists(parent)?;
        }
        self.backend
            .insert(Table::Subcategories, records::new_subcategory_row(&subcategory, user.id))
            .await?;
        tracing::info!(subcategory = %subcategory.id, name = %subcategory.name, "subcategory created");
        self.load_marketplace().await
    }

    pub async fn update_subcategory(
        &self,
        id: SubcategoryId,
        category_id: Option<CategoryId>,
        name: &str,
    ) -> StorefrontResult<Marketplace> {
        self.require_admin()?;
        let taxonomy = self.taxonomy().await?;
        let mut subcategory = taxonomy
            .subcategory(id)
            .cloned()
            .ok_or_else(DomainError::not_found)?;
        subcategory.update(category_id, name)?;
        if let Some(parent) = subcategory.category_id {
            taxonomy.ensure_category_exists(parent)?;
        }
        self.backend
            .update(Table::Subcategories, id.into(), records::subcategory_patch(&subcategory))
            .await?;
        tracing::info!(subcategory = %id, name = %subcategory.name, "subcategory updated");
        self.load_marketplace().await
    }

    pub async fn delete_subcategory(&self, id: SubcategoryId) -> StorefrontResult<Marketplace> {
        self.require_admin()?;
        self.backend.delete(Table::Subcategories, id.into()).await?;
        tracing::info!(subcategory = %id, "subcategory deleted");
        self.load_marketplace().await
    }
}

impl<B> core::fmt::Debug for Storefront<B> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Storefront")
            .field("policy", &self.policy)
            .field("image_bucket", &self.image_bucket)
            .field("locale", &self.locale)
            .finish_non_exhaustive()
    }
}
