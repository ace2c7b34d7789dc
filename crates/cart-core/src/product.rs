//! # Product Types
//!
//! Product catalog for the storefront.
//! Products are loaded from `config/products.toml`.

use crate::item::NewCartItem;
use crate::money::Price;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A product in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique product identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Short description
    #[serde(default)]
    pub description: String,

    /// Collection the product is listed under (e.g. "Dresses")
    #[serde(default)]
    pub category: String,

    /// Current price
    pub price: Price,

    /// Price before a sale, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Price>,

    /// Primary image URL
    #[serde(default)]
    pub image: String,

    /// Gallery images for the detail page
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,

    /// Average review rating (0-5)
    #[serde(default)]
    pub rating: f32,

    /// Number of reviews
    #[serde(default)]
    pub reviews: u32,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sizes: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub colors: Vec<String>,

    #[serde(default)]
    pub is_new: bool,

    #[serde(default)]
    pub is_sale: bool,
}

impl Product {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: Price) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            category: String::new(),
            price,
            original_price: None,
            image: String::new(),
            images: Vec::new(),
            rating: 0.0,
            reviews: 0,
            sizes: Vec::new(),
            colors: Vec::new(),
            is_new: false,
            is_sale: false,
        }
    }

    /// Builder: set description
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// Builder: set category
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Builder: set image URL
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image = url.into();
        self
    }

    /// Builder: mark as on sale from `original`
    pub fn with_original_price(mut self, original: Price) -> Self {
        self.original_price = Some(original);
        self.is_sale = true;
        self
    }

    pub fn with_sizes<I, S>(mut self, sizes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sizes = sizes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_colors<I, S>(mut self, colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.colors = colors.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_rating(mut self, rating: f32, reviews: u32) -> Self {
        self.rating = rating;
        self.reviews = reviews;
        self
    }

    pub fn new_arrival(mut self) -> Self {
        self.is_new = true;
        self
    }

    /// Percentage off the original price, rounded; 0 when not discounted
    pub fn discount_percent(&self) -> u32 {
        match self.original_price {
            Some(original) if original.amount > self.price.amount && original.amount > 0 => {
                let off = (original.amount - self.price.amount) as f64 / original.amount as f64;
                (off * 100.0).round() as u32
            }
            _ => 0,
        }
    }

    /// Add-to-cart payload for a chosen variant
    pub fn cart_item(&self, size: Option<&str>, color: Option<&str>) -> NewCartItem {
        NewCartItem {
            id: self.id.clone(),
            name: self.name.clone(),
            price: self.price,
            image: self.image.clone(),
            size: size.map(String::from),
            color: color.map(String::from),
        }
    }

    /// Add-to-cart payload from a product card: first listed size and color
    pub fn default_cart_item(&self) -> NewCartItem {
        self.cart_item(
            self.sizes.first().map(String::as_str),
            self.colors.first().map(String::as_str),
        )
    }

    /// Case-insensitive match on name or description
    pub fn matches_search(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.name.to_lowercase().contains(&query) || self.description.to_lowercase().contains(&query)
    }
}

/// Listing sort orders
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProductSort {
    /// Catalog order
    #[default]
    Featured,
    PriceLow,
    PriceHigh,
    Rating,
    /// New arrivals first, otherwise catalog order
    Newest,
}

/// Filters for a product listing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductQuery {
    /// Category name; `None` or "All" lists everything
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
    /// Inclusive lower bound in minor units
    #[serde(default)]
    pub min_price: Option<i64>,
    /// Inclusive upper bound in minor units
    #[serde(default)]
    pub max_price: Option<i64>,
    #[serde(default)]
    pub sort: ProductSort,
}

impl ProductQuery {
    fn accepts(&self, product: &Product) -> bool {
        let category_ok = match self.category.as_deref() {
            None | Some("All") | Some("") => true,
            Some(category) => product.category == category,
        };
        let search_ok = match self.search.as_deref() {
            None | Some("") => true,
            Some(query) => product.matches_search(query),
        };
        let min_ok = self.min_price.map_or(true, |min| product.price.amount >= min);
        let max_ok = self.max_price.map_or(true, |max| product.price.amount <= max);

        category_ok && search_ok && min_ok && max_ok
    }
}

/// Product catalog (loaded from config)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductCatalog {
    #[serde(default)]
    pub products: Vec<Product>,
}

impl ProductCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self {
            products: Vec::new(),
        }
    }

    /// Add a product to the catalog
    pub fn add(&mut self, product: Product) {
        self.products.push(product);
    }

    /// Builder: add a product
    pub fn with_product(mut self, product: Product) -> Self {
        self.add(product);
        self
    }

    /// Find a product by ID
    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Distinct categories in catalog order
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for product in &self.products {
            if !product.category.is_empty() && !seen.contains(&product.category.as_str()) {
                seen.push(&product.category);
            }
        }
        seen
    }

    /// Filter and sort the catalog
    pub fn browse(&self, query: &ProductQuery) -> Vec<&Product> {
        let mut listed: Vec<&Product> = self.products.iter().filter(|p| query.accepts(p)).collect();

        // sort_by is stable, so ties keep catalog order
        match query.sort {
            ProductSort::Featured => {}
            ProductSort::PriceLow => listed.sort_by_key(|p| p.price.amount),
            ProductSort::PriceHigh => listed.sort_by(|a, b| b.price.amount.cmp(&a.price.amount)),
            ProductSort::Rating => listed.sort_by(|a, b| {
                b.rating.partial_cmp(&a.rating).unwrap_or(Ordering::Equal)
            }),
            ProductSort::Newest => listed.sort_by_key(|p| !p.is_new),
        }
        listed
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Load catalog from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }
}
