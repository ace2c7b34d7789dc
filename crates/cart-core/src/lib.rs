//! # cart-core
//!
//! Core types for the luxe-cart storefront.
//!
//! This crate provides:
//! - `Price` and `Currency` for integer minor-unit money
//! - `Product` and `ProductCatalog` for browsing
//! - `CartItem`, `CartState`, `CartAction` and the pure `reduce` function
//! - `CartStore` and the `CartConsumer` contract used by storefront surfaces
//! - `CartRegistry` for independent carts keyed by id
//! - `OrderSummary`, form validation and `OrderPlacement` for checkout
//! - `CartError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use cart_core::{CartConsumer, CartStore, Currency, Price, Product};
//!
//! let store = CartStore::new(Currency::USD);
//!
//! let dress = Product::new("1", "Elegance Silk Dress", Price::new(299.99, Currency::USD))
//!     .with_sizes(["S", "M", "L"])
//!     .with_colors(["Black", "Navy"]);
//!
//! // Product card: first size/color, then open the sidebar
//! store.add_to_cart(dress.default_cart_item());
//!
//! let cart = store.snapshot();
//! assert_eq!(cart.item_count, 1);
//! assert_eq!(cart.total.display(), "$299.99");
//! ```

pub mod action;
pub mod checkout;
pub mod consumer;
pub mod error;
pub mod item;
pub mod money;
pub mod placement;
pub mod product;
pub mod reducer;
pub mod registry;
pub mod state;
pub mod store;
pub mod validation;

// Re-exports for convenience
pub use action::CartAction;
pub use checkout::{
    place_order, CheckoutRequest, Order, OrderSummary, PromoCode, ShippingMethod, ShippingOption,
};
pub use consumer::CartConsumer;
pub use error::{CartError, CartResult};
pub use item::{CartItem, LineKey, NewCartItem};
pub use money::{Currency, Price};
pub use placement::{BoxedOrderPlacement, OrderConfirmation, OrderPlacement, SimulatedPlacement};
pub use product::{Product, ProductCatalog, ProductQuery, ProductSort};
pub use reducer::reduce;
pub use registry::CartRegistry;
pub use state::CartState;
pub use store::CartStore;
pub use validation::{FieldErrors, PaymentMethod, PaymentType, ShippingAddress};
