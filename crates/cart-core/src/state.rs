//! # Cart State
//!
//! The snapshot every storefront surface reads. `total` and `item_count` are
//! derived from `items` and are only ever written by [`CartState::recompute`].

use crate::item::CartItem;
use crate::money::{Currency, Price};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartState {
    /// Lines in insertion order, unique by `(id, size, color)`
    pub items: Vec<CartItem>,

    /// Sum of price x quantity over `items`
    pub total: Price,

    /// Sum of quantities over `items` (units, not lines)
    pub item_count: u64,

    /// Cart sidebar visibility
    pub is_open: bool,

    /// Currency every line must be priced in
    pub currency: Currency,
}

impl CartState {
    /// Empty, closed cart
    pub fn new(currency: Currency) -> Self {
        Self {
            items: Vec::new(),
            total: Price::zero(currency),
            item_count: 0,
            is_open: false,
            currency,
        }
    }

    /// Build a state from lines, deriving the aggregates.
    pub fn with_items(items: Vec<CartItem>, is_open: bool, currency: Currency) -> Self {
        let mut state = Self {
            items,
            total: Price::zero(currency),
            item_count: 0,
            is_open,
            currency,
        };
        state.recompute();
        state
    }

    /// Re-derive `total` and `item_count` from `items`.
    pub(crate) fn recompute(&mut self) {
        self.total = sum_total(&self.items, self.currency);
        self.item_count = sum_count(&self.items);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct lines
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    /// Are the derived aggregates consistent with `items`?
    pub fn is_consistent(&self) -> bool {
        self.total == sum_total(&self.items, self.currency)
            && self.item_count == sum_count(&self.items)
    }
}

impl Default for CartState {
    fn default() -> Self {
        Self::new(Currency::default())
    }
}

pub(crate) fn sum_total(items: &[CartItem], currency: Currency) -> Price {
    items
        .iter()
        .fold(Price::zero(currency), |acc, item| acc.plus(item.line_total()))
}

pub(crate) fn sum_count(items: &[CartItem]) -> u64 {
    items.iter().map(|item| u64::from(item.quantity)).sum()
}
