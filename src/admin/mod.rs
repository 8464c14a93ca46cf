//! Admin dashboard data layer
//!
//! [`AdminStore`] holds the last fetched snapshot of each table. Mutations
//! make one remote write and, only when it succeeds, apply a pure transform
//! from [`patch`] to the snapshot. Failures are logged, reported to the
//! [`Operator`] and returned; the snapshot is left as it was.

mod images;
pub mod patch;
mod stats;

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde_json::json;

use crate::config::ClientOptions;
use crate::error::{Error, Result};
use crate::models::{
    tables, Category, ImageFile, NewCategory, NewProduct, Order, Product, ProductPatch, RowId,
    UserProfile,
};
use crate::operator::Operator;
use crate::remote::{insert_as, select_as, Remote, TableQuery};
use crate::storage::{is_inline, ObjectKeys};

pub use stats::Stats;

const CONFIRM_DELETE_PRODUCT: &str = "Are you sure you want to delete this product?";
const CONFIRM_DELETE_CATEGORY: &str = "Are you sure you want to delete this category?";

#[derive(Debug, Default)]
struct Snapshot {
    products: Vec<Product>,
    orders: Vec<Order>,
    categories: Vec<Category>,
    users: Vec<UserProfile>,
    /// Number of [`AdminStore::fetch_all`] calls still running
    fetches: usize,
}

/// A user together with the orders placed under their email
#[derive(Debug, Clone, PartialEq)]
pub struct UserHistory {
    pub user: UserProfile,
    /// Newest first; empty when the user has no email on record
    pub orders: Vec<Order>,
}

/// Snapshots of the four tables plus the operations the dashboard dispatches
pub struct AdminStore<R: Remote> {
    remote: Arc<R>,
    operator: Arc<dyn Operator>,
    keys: ObjectKeys,
    product_bucket: String,
    category_bucket: String,
    state: RwLock<Snapshot>,
}

impl<R: Remote> AdminStore<R> {
    /// An empty store; call [`AdminStore::fetch_all`] to load it
    pub fn new(remote: Arc<R>, operator: Arc<dyn Operator>, options: &ClientOptions) -> Self {
        Self {
            remote,
            operator,
            keys: ObjectKeys::new(),
            product_bucket: options.product_bucket.clone(),
            category_bucket: options.category_bucket.clone(),
            state: RwLock::new(Snapshot::default()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Snapshot> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Snapshot> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Log a failed mutation and show `alert` to the operator
    fn fail(&self, action: &str, err: Error, alert: String) -> Error {
        tracing::error!(action, error = %err, "admin mutation failed");
        self.operator.alert(&alert);
        err
    }

    pub fn operator(&self) -> &dyn Operator {
        self.operator.as_ref()
    }

    pub fn products(&self) -> Vec<Product> {
        self.read().products.clone()
    }

    pub fn orders(&self) -> Vec<Order> {
        self.read().orders.clone()
    }

    pub fn categories(&self) -> Vec<Category> {
        self.read().categories.clone()
    }

    pub fn users(&self) -> Vec<UserProfile> {
        self.read().users.clone()
    }

    /// True while any [`AdminStore::fetch_all`] call is running
    pub fn loading(&self) -> bool {
        self.read().fetches > 0
    }

    pub fn stats(&self) -> Stats {
        let state = self.read();
        Stats::compute(&state.orders, &state.products)
    }

    /// Reload products, orders, categories and users, newest first.
    ///
    /// Stops at the first failing table; tables loaded before it keep their
    /// new contents and the rest keep their old ones. The failure is logged
    /// and returned, not shown to the operator.
    pub async fn fetch_all(&self) -> Result<()> {
        self.write().fetches += 1;
        let result = self.load_tables().await;
        self.write().fetches -= 1;

        if let Err(err) = &result {
            tracing::error!(error = %err, "error fetching data");
        }
        result
    }

    async fn load_tables(&self) -> Result<()> {
        let remote = self.remote.as_ref();
        let newest = || TableQuery::all().newest_first();

        let products: Vec<Product> = select_as(remote, tables::PRODUCTS, newest()).await?;
        self.write().products = products;

        let orders: Vec<Order> = select_as(remote, tables::ORDERS, newest()).await?;
        self.write().orders = orders;

        let categories: Vec<Category> = select_as(remote, tables::CATEGORIES, newest()).await?;
        self.write().categories = categories;

        let users: Vec<UserProfile> = select_as(remote, tables::USERS, newest()).await?;
        self.write().users = users;

        tracing::debug!("admin snapshots loaded");
        Ok(())
    }

    pub async fn update_order_status(&self, order_id: &RowId, status: &str) -> Result<()> {
        let result = self
            .remote
            .update(tables::ORDERS, order_id, json!({ "status": status }))
            .await;

        match result {
            Ok(()) => {
                patch::set_order_status(&mut self.write().orders, order_id, status);
                tracing::info!(order = %order_id, status, "order status updated");
                Ok(())
            }
            Err(err) => Err(self.fail("update order", err, "Failed to update status".to_string())),
        }
    }

    /// Upload the image (if any), insert the row and put it first in the list.
    ///
    /// If the insert fails the uploaded image is removed again.
    pub async fn add_product(
        &self,
        mut product: NewProduct,
        image: Option<ImageFile>,
    ) -> Result<Product> {
        let remote = self.remote.as_ref();

        let stored = match &image {
            Some(file) => match images::upload(remote, &self.keys, &self.product_bucket, file).await
            {
                Ok(stored) => Some(stored),
                Err(err) => {
                    let alert = format!("Failed to add product: {}", err.user_message());
                    return Err(self.fail("add product", err, alert));
                }
            },
            None => None,
        };
        if let Some(stored) = &stored {
            product.image_url = Some(stored.public_url.clone());
        }

        match insert_as::<Product, _, _>(remote, tables::PRODUCTS, &product).await {
            Ok(row) => {
                tracing::info!(product = %row.id, "product added");
                patch::prepend(&mut self.write().products, row.clone());
                Ok(row)
            }
            Err(err) => {
                if let Some(stored) = &stored {
                    images::discard(remote, stored).await;
                }
                let alert = format!("Failed to add product: {}", err.user_message());
                Err(self.fail("add product", err, alert))
            }
        }
    }

    /// Confirm, remove the stored image, delete the row.
    ///
    /// Inline (`data:`) images are not in a bucket and are left alone. If the
    /// row delete fails the removed image is uploaded again.
    pub async fn delete_product(&self, product_id: &RowId) -> Result<()> {
        if !self.operator.confirm(CONFIRM_DELETE_PRODUCT) {
            return Err(Error::Cancelled);
        }

        let image_url = self
            .read()
            .products
            .iter()
            .find(|product| product.id.loosely_eq(product_id))
            .and_then(|product| product.image_url.clone());
        let removed = self.remove_image(&self.product_bucket, image_url).await;

        match self.remote.delete(tables::PRODUCTS, product_id).await {
            Ok(()) => {
                patch::remove_by_id(&mut self.write().products, product_id);
                tracing::info!(product = %product_id, "product deleted");
                Ok(())
            }
            Err(err) => {
                if let Some(removed) = removed {
                    images::restore(self.remote.as_ref(), removed).await;
                }
                Err(self.fail("delete product", err, "Failed to delete product".to_string()))
            }
        }
    }

    /// Write the set fields of `changes` and merge them into the local row.
    /// An empty patch is a no-op.
    pub async fn update_product(&self, product_id: &RowId, changes: ProductPatch) -> Result<()> {
        if changes.is_empty() {
            return Ok(());
        }

        let result = match serde_json::to_value(&changes) {
            Ok(values) => self.remote.update(tables::PRODUCTS, product_id, values).await,
            Err(err) => Err(err.into()),
        };

        match result {
            Ok(()) => {
                patch::merge_product(&mut self.write().products, product_id, &changes);
                tracing::info!(product = %product_id, "product updated");
                Ok(())
            }
            Err(err) => {
                let alert = format!("Failed to update product: {}", err.user_message());
                Err(self.fail("update product", err, alert))
            }
        }
    }

    /// Upload the cover (if any), insert the row and put it first in the list.
    ///
    /// Without a cover the row is stored with an empty `cover_image`. If the
    /// insert fails the uploaded cover is removed again.
    pub async fn add_category(
        &self,
        mut category: NewCategory,
        cover: Option<ImageFile>,
    ) -> Result<Category> {
        let remote = self.remote.as_ref();

        let stored = match &cover {
            Some(file) => {
                match images::upload(remote, &self.keys, &self.category_bucket, file).await {
                    Ok(stored) => Some(stored),
                    Err(err) => {
                        let alert = format!("Failed to add category: {}", err.user_message());
                        return Err(self.fail("add category", err, alert));
                    }
                }
            }
            None => None,
        };
        category.cover_image = stored
            .as_ref()
            .map(|stored| stored.public_url.clone())
            .unwrap_or_default();

        match insert_as::<Category, _, _>(remote, tables::CATEGORIES, &category).await {
            Ok(row) => {
                tracing::info!(category = %row.id, slug = ?row.slug, "category added");
                patch::prepend(&mut self.write().categories, row.clone());
                Ok(row)
            }
            Err(err) => {
                if let Some(stored) = &stored {
                    images::discard(remote, stored).await;
                }
                let alert = format!("Failed to add category: {}", err.user_message());
                Err(self.fail("add category", err, alert))
            }
        }
    }

    /// Confirm, remove the cover image, delete the row; same compensation as
    /// [`AdminStore::delete_product`]
    pub async fn delete_category(&self, category_id: &RowId) -> Result<()> {
        if !self.operator.confirm(CONFIRM_DELETE_CATEGORY) {
            return Err(Error::Cancelled);
        }

        let cover = self
            .read()
            .categories
            .iter()
            .find(|category| category.id.loosely_eq(category_id))
            .and_then(|category| category.cover_image.clone());
        let removed = self.remove_image(&self.category_bucket, cover).await;

        match self.remote.delete(tables::CATEGORIES, category_id).await {
            Ok(()) => {
                patch::remove_by_id(&mut self.write().categories, category_id);
                tracing::info!(category = %category_id, "category deleted");
                Ok(())
            }
            Err(err) => {
                if let Some(removed) = removed {
                    images::restore(self.remote.as_ref(), removed).await;
                }
                Err(self.fail("delete category", err, "Failed to delete category".to_string()))
            }
        }
    }

    async fn remove_image(
        &self,
        bucket: &str,
        url: Option<String>,
    ) -> Option<images::RemovedImage> {
        match url {
            Some(url) if !url.is_empty() && !is_inline(&url) => {
                images::remove(self.remote.as_ref(), bucket, &url).await
            }
            _ => None,
        }
    }

    /// Users whose full name or email contains `term`, ignoring case.
    /// An empty term matches everyone.
    pub fn search_users(&self, term: &str) -> Vec<UserProfile> {
        let needle = term.to_lowercase();
        let contains = |field: &Option<String>| {
            field
                .as_deref()
                .map(|value| value.to_lowercase().contains(&needle))
                .unwrap_or(false)
        };

        self.read()
            .users
            .iter()
            .filter(|user| needle.is_empty() || contains(&user.full_name) || contains(&user.email))
            .cloned()
            .collect()
    }

    /// Load one user and the orders placed under their email.
    ///
    /// Orders are linked by exact email match only; an order whose email
    /// differs in any way does not show up.
    pub async fn user_details(&self, user_id: &RowId) -> Result<UserHistory> {
        let remote = self.remote.as_ref();

        let users: Vec<UserProfile> = select_as(
            remote,
            tables::USERS,
            TableQuery::all().eq("id", user_id).limit(1),
        )
        .await
        .map_err(|err| {
            tracing::error!(user = %user_id, error = %err, "error fetching user details");
            err
        })?;
        let user = users
            .into_iter()
            .next()
            .ok_or_else(|| Error::not_found("User"))?;

        let orders = match user.email.as_deref() {
            Some(email) if !email.is_empty() => {
                select_as(
                    remote,
                    tables::ORDERS,
                    TableQuery::all().eq("email", email).newest_first(),
                )
                .await
                .map_err(|err| {
                    tracing::error!(user = %user_id, error = %err, "error fetching user orders");
                    err
                })?
            }
            _ => Vec::new(),
        };

        Ok(UserHistory { user, orders })
    }

    /// Display name of the category a product points at; the raw reference
    /// when the category is unknown
    pub fn category_name(&self, reference: Option<&RowId>) -> String {
        let Some(reference) = reference else {
            return String::new();
        };
        self.read()
            .categories
            .iter()
            .find(|category| category.id.loosely_eq(reference))
            .map(|category| category.name.clone())
            .unwrap_or_else(|| reference.to_string())
    }
}
