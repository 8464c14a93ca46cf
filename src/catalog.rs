//! Storefront lookups over the loaded snapshots
//!
//! Route parameters are plain text, so ids are compared by their textual form.

use crate::admin::AdminStore;
use crate::error::{Error, Result};
use crate::models::{Category, Product};
use crate::remote::Remote;

/// Category for a route key: a slug match wins, otherwise an id match
pub fn find_category<'a>(categories: &'a [Category], key: &str) -> Result<&'a Category> {
    categories
        .iter()
        .find(|category| category.slug.as_deref() == Some(key))
        .or_else(|| categories.iter().find(|category| category.id.matches_key(key)))
        .ok_or_else(|| Error::not_found("Category"))
}

/// Products filed under `category`, in snapshot order
pub fn products_in_category<'a>(products: &'a [Product], category: &Category) -> Vec<&'a Product> {
    products
        .iter()
        .filter(|product| {
            product
                .category
                .as_ref()
                .map(|reference| reference.loosely_eq(&category.id))
                .unwrap_or(false)
        })
        .collect()
}

pub fn find_product<'a>(products: &'a [Product], key: &str) -> Result<&'a Product> {
    products
        .iter()
        .find(|product| product.id.matches_key(key))
        .ok_or_else(|| Error::not_found("Product"))
}

impl<R: Remote> AdminStore<R> {
    /// Category page data: the category and its products
    pub fn category_page(&self, key: &str) -> Result<(Category, Vec<Product>)> {
        let categories = self.categories();
        let category = find_category(&categories, key)?.clone();
        let products = self.products();
        let listed = products_in_category(&products, &category)
            .into_iter()
            .cloned()
            .collect();
        Ok((category, listed))
    }

    /// Product page data
    pub fn product(&self, key: &str) -> Result<Product> {
        find_product(&self.products(), key).cloned()
    }
}
