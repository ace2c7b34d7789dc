//! # Cart Actions
//!
//! The closed set of transitions a consumer can request.
//!
//! On the wire an action is `{"type": "ADD_ITEM", "payload": {...}}`;
//! the unit actions carry no payload.

use crate::item::{LineKey, NewCartItem};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CartAction {
    /// Merge into the matching line (+1) or append a new line with quantity 1
    AddItem(NewCartItem),

    /// Set the quantity of a line; zero or less removes it
    UpdateQuantity {
        #[serde(flatten)]
        key: LineKey,
        quantity: i64,
    },

    /// Remove a line
    RemoveItem(LineKey),

    ClearCart,
    ToggleCart,
    OpenCart,
    CloseCart,
}

impl CartAction {
    /// Stable name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            CartAction::AddItem(_) => "ADD_ITEM",
            CartAction::UpdateQuantity { .. } => "UPDATE_QUANTITY",
            CartAction::RemoveItem(_) => "REMOVE_ITEM",
            CartAction::ClearCart => "CLEAR_CART",
            CartAction::ToggleCart => "TOGGLE_CART",
            CartAction::OpenCart => "OPEN_CART",
            CartAction::CloseCart => "CLOSE_CART",
        }
    }

    /// Does this action touch `items` (and therefore the derived totals)?
    pub fn mutates_items(&self) -> bool {
        matches!(
            self,
            CartAction::AddItem(_)
                | CartAction::UpdateQuantity { .. }
                | CartAction::RemoveItem(_)
                | CartAction::ClearCart
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::{Currency, Price};
    use serde_json::json;

    #[test]
    fn test_add_item_wire_format() {
        let action: CartAction = serde_json::from_value(json!({
            "type": "ADD_ITEM",
            "payload": {
                "id": "1",
                "name": "Elegance Silk Dress",
                "price": { "amount": 29999, "currency": "usd" },
                "image": "https://images.example/dress.jpg",
                "size": "M",
                "color": "Black"
            }
        }))
        .unwrap();

        let expected = NewCartItem::new("1", "Elegance Silk Dress", Price::from_cents(29999, Currency::USD))
            .with_image("https://images.example/dress.jpg")
            .with_size("M")
            .with_color("Black");
        assert_eq!(action, CartAction::AddItem(expected));
    }

    #[test]
    fn test_update_quantity_payload_is_flat() {
        let action: CartAction = serde_json::from_value(json!({
            "type": "UPDATE_QUANTITY",
            "payload": { "id": "1", "size": "M", "quantity": 0 }
        }))
        .unwrap();

        assert_eq!(
            action,
            CartAction::UpdateQuantity {
                key: LineKey::new("1").with_size("M"),
                quantity: 0
            }
        );
    }

    #[test]
    fn test_non_integer_quantity_is_rejected() {
        for quantity in [json!(2.5), json!("3"), json!(null)] {
            let result = serde_json::from_value::<CartAction>(json!({
                "type": "UPDATE_QUANTITY",
                "payload": { "id": "1", "quantity": quantity }
            }));
            assert!(result.is_err(), "accepted quantity {quantity}");
        }
    }

    #[test]
    fn test_unit_actions_need_no_payload() {
        let action: CartAction = serde_json::from_value(json!({ "type": "TOGGLE_CART" })).unwrap();
        assert_eq!(action, CartAction::ToggleCart);
        assert_eq!(serde_json::to_value(&CartAction::ClearCart).unwrap(), json!({ "type": "CLEAR_CART" }));
    }

    #[test]
    fn test_unknown_action_is_rejected() {
        let result = serde_json::from_value::<CartAction>(json!({ "type": "EMPTY_TRASH" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_mutates_items() {
        assert!(CartAction::ClearCart.mutates_items());
        assert!(CartAction::RemoveItem(LineKey::new("1")).mutates_items());
        assert!(!CartAction::OpenCart.mutates_items());
        assert_eq!(CartAction::CloseCart.name(), "CLOSE_CART");
    }
}
