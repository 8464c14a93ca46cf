//! Add-product and add-category form state
//!
//! Forms hold raw field input, validate it into insert payloads and hand
//! those to the [`AdminStore`]. Validation never touches the network.

use crate::admin::AdminStore;
use crate::config::ClientOptions;
use crate::error::{Error, Result, ValidationErrors};
use crate::models::{parse_leading_float, Category, ImageFile, NewCategory, NewProduct, Product, RowId};
use crate::remote::Remote;
use crate::slug::slugify;

const DEFAULT_CATEGORY_COLOR: &str = "#ffffff";
const COVER_REQUIRED: &str = "Please select a cover image.";

/// Fields of the add-product form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductField {
    Name,
    Price,
    Stock,
    Category,
    Description,
    Image,
}

impl ProductField {
    /// Key under which the field's validation message is stored
    pub fn key(&self) -> &'static str {
        match self {
            ProductField::Name => "name",
            ProductField::Price => "price",
            ProductField::Stock => "stock",
            ProductField::Category => "category",
            ProductField::Description => "description",
            ProductField::Image => "image",
        }
    }
}

/// Route and form values arrive as text; numeric ids become integer ids
fn row_id_from_input(value: &str) -> RowId {
    value
        .trim()
        .parse::<i64>()
        .map(RowId::Int)
        .unwrap_or_else(|_| RowId::Text(value.to_string()))
}

#[derive(Debug, Clone)]
pub struct ProductForm {
    pub name: String,
    pub price: String,
    pub stock: String,
    pub category: Option<RowId>,
    pub description: String,
    image: Option<ImageFile>,
    errors: ValidationErrors,
    max_image_bytes: usize,
}

impl ProductForm {
    pub fn new(options: &ClientOptions) -> Self {
        Self {
            name: String::new(),
            price: String::new(),
            stock: String::new(),
            category: None,
            description: String::new(),
            image: None,
            errors: ValidationErrors::new(),
            max_image_bytes: options.max_image_bytes,
        }
    }

    /// Set a text field and clear its error. Use [`ProductForm::select_image`]
    /// for the image.
    pub fn set(&mut self, field: ProductField, value: &str) {
        match field {
            ProductField::Name => self.name = value.to_string(),
            ProductField::Price => self.price = value.to_string(),
            ProductField::Stock => self.stock = value.to_string(),
            ProductField::Category => {
                self.category = Some(value)
                    .filter(|v| !v.trim().is_empty())
                    .map(row_id_from_input)
            }
            ProductField::Description => self.description = value.to_string(),
            ProductField::Image => return,
        }
        self.errors.clear_field(field.key());
    }

    /// Pick the first category when none is chosen yet
    pub fn default_category(&mut self, categories: &[Category]) {
        if self.category.is_none() {
            self.category = categories.first().map(|category| category.id.clone());
        }
    }

    /// Attach an image. Files over the size limit are rejected with an inline
    /// error and the previous image is kept.
    pub fn select_image(&mut self, file: ImageFile) -> bool {
        let key = ProductField::Image.key();
        if file.size() > self.max_image_bytes {
            self.errors.add(key, "File size exceeds 5MB");
            return false;
        }
        self.image = Some(file);
        self.errors.clear_field(key);
        true
    }

    pub fn image(&self) -> Option<&ImageFile> {
        self.image.as_ref()
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn error(&self, field: ProductField) -> Option<&str> {
        self.errors.get(field.key())
    }

    /// Check every field, record the messages and build the payload
    pub fn validate(&mut self) -> Result<(NewProduct, ImageFile)> {
        let mut errors = ValidationErrors::new();

        if self.name.trim().is_empty() {
            errors.add(ProductField::Name.key(), "Product Name is required");
        }

        let price = if self.price.trim().is_empty() {
            errors.add(ProductField::Price.key(), "Price is required");
            None
        } else {
            let parsed = parse_leading_float(&self.price);
            if parsed.is_none() {
                errors.add(ProductField::Price.key(), "Price must be a number");
            }
            parsed
        };

        let stock = if self.stock.trim().is_empty() {
            errors.add(ProductField::Stock.key(), "Stock is required");
            None
        } else {
            let parsed = self.stock.trim().parse::<i64>().ok();
            if parsed.is_none() {
                errors.add(ProductField::Stock.key(), "Stock must be a whole number");
            }
            parsed
        };

        if self.image.is_none() {
            errors.add(ProductField::Image.key(), "Product Image is required");
        }
        if self.category.is_none() {
            errors.add(ProductField::Category.key(), "Category is required");
        }

        match (price, stock, &self.category, &self.image) {
            (Some(price), Some(stock), Some(category), Some(image)) if errors.is_empty() => {
                self.errors = errors;
                let product = NewProduct {
                    name: self.name.trim().to_string(),
                    price,
                    stock,
                    category: category.clone(),
                    description: self.description.clone(),
                    image_url: None,
                };
                Ok((product, image.clone()))
            }
            _ => {
                self.errors = errors.clone();
                Err(Error::Validation(errors))
            }
        }
    }

    /// Validate, then add the product through the store
    pub async fn submit<R: Remote>(&mut self, store: &AdminStore<R>) -> Result<Product> {
        let (product, image) = self.validate()?;
        let row = store.add_product(product, Some(image)).await?;
        self.reset();
        Ok(row)
    }

    fn reset(&mut self) {
        *self = Self {
            max_image_bytes: self.max_image_bytes,
            ..Self::new(&ClientOptions::default())
        };
    }
}

/// The add-category form; the slug follows the name
#[derive(Debug, Clone)]
pub struct CategoryForm {
    name: String,
    slug: String,
    pub color: String,
    cover: Option<ImageFile>,
}

impl Default for CategoryForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            slug: String::new(),
            color: DEFAULT_CATEGORY_COLOR.to_string(),
            cover: None,
        }
    }
}

impl CategoryForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn cover(&self) -> Option<&ImageFile> {
        self.cover.as_ref()
    }

    /// Set the name and regenerate the slug
    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
        self.slug = slugify(name);
    }

    pub fn set_color(&mut self, color: &str) {
        self.color = color.to_string();
    }

    pub fn select_cover(&mut self, file: ImageFile) {
        self.cover = Some(file);
    }

    /// Validate, then add the category through the store.
    ///
    /// A missing cover is reported to the operator as a blocking message and
    /// nothing is sent. The form is cleared once the category is stored.
    pub async fn submit<R: Remote>(&mut self, store: &AdminStore<R>) -> Result<Category> {
        let Some(cover) = self.cover.clone() else {
            store.operator().alert(COVER_REQUIRED);
            return Err(Error::validation("cover_image", COVER_REQUIRED));
        };
        if self.name.trim().is_empty() {
            return Err(Error::validation("name", "Category Name is required"));
        }

        let category = NewCategory {
            name: self.name.clone(),
            slug: self.slug.clone(),
            color: self.color.clone(),
            cover_image: String::new(),
        };
        let row = store.add_category(category, Some(cover)).await?;
        *self = Self::default();
        Ok(row)
    }
}
