//! # Cart Items
//!
//! A cart line and the composite key that identifies it.

use crate::money::Price;
use serde::{Deserialize, Serialize};

/// Identity of a cart line: `(id, size, color)`.
///
/// The product id alone is not unique: the same product in two sizes or two
/// colors occupies two lines. `None` matches only `None`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineKey {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl LineKey {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            size: None,
            color: None,
        }
    }

    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// Payload of an add-to-cart: every item field except the quantity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCartItem {
    /// Product ID
    pub id: String,

    /// Product name (denormalized for display)
    pub name: String,

    /// Unit price
    pub price: Price,

    /// Image URL
    #[serde(default)]
    pub image: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl NewCartItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: Price) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            image: String::new(),
            size: None,
            color: None,
        }
    }

    /// Builder: set image URL
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    /// Builder: set size variant
    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }

    /// Builder: set color variant
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Does this payload land on the line identified by `key`?
    pub fn matches(&self, key: &LineKey) -> bool {
        self.id == key.id && self.size == key.size && self.color == key.color
    }

    pub fn key(&self) -> LineKey {
        LineKey {
            id: self.id.clone(),
            size: self.size.clone(),
            color: self.color.clone(),
        }
    }
}

/// A line in the cart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: String,
    pub name: String,
    pub price: Price,
    #[serde(default)]
    pub image: String,
    /// Always >= 1 in any state produced by the reducer
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl CartItem {
    /// Create a line with quantity 1 from an add-to-cart payload
    pub fn from_new(item: NewCartItem) -> Self {
        Self {
            id: item.id,
            name: item.name,
            price: item.price,
            image: item.image,
            quantity: 1,
            size: item.size,
            color: item.color,
        }
    }

    pub fn key(&self) -> LineKey {
        LineKey {
            id: self.id.clone(),
            size: self.size.clone(),
            color: self.color.clone(),
        }
    }

    /// Composite-key comparison without allocating a `LineKey`
    pub fn matches(&self, key: &LineKey) -> bool {
        self.id == key.id && self.size == key.size && self.color == key.color
    }

    /// Calculate the total price for this line
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }

    /// "Size: M • Color: Black" style variant label, empty when neither is set
    pub fn variant_label(&self) -> String {
        let size = self.size.as_ref().map(|s| format!("Size: {s}"));
        let color = self.color.as_ref().map(|c| format!("Color: {c}"));
        size.into_iter().chain(color).collect::<Vec<_>>().join(" • ")
    }
}
