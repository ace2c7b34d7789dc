//! # Cart Reducer
//!
//! `reduce` is the only code that produces a new [`CartState`]. It is pure:
//! no I/O, no clock, no logging, and it never fails. Actions that cannot
//! apply (no matching line, wrong currency, negative price) return the state
//! unchanged.
//!
//! ```text
//! (state, action) ──► reduce ──► items' ──► recompute ──► state'
//!                                              │
//!                         total = Σ price × qty, item_count = Σ qty
//! ```

use crate::action::CartAction;
use crate::item::{CartItem, LineKey, NewCartItem};
use crate::state::CartState;

/// Apply one action to a state, returning the next state.
pub fn reduce(state: &CartState, action: &CartAction) -> CartState {
    match action {
        CartAction::AddItem(item) => add_item(state, item),
        CartAction::UpdateQuantity { key, quantity } => update_quantity(state, key, *quantity),
        CartAction::RemoveItem(key) => remove_item(state, key),
        CartAction::ClearCart => with_items(state, Vec::new()),
        CartAction::ToggleCart => CartState {
            is_open: !state.is_open,
            ..state.clone()
        },
        CartAction::OpenCart => CartState {
            is_open: true,
            ..state.clone()
        },
        CartAction::CloseCart => CartState {
            is_open: false,
            ..state.clone()
        },
    }
}

fn add_item(state: &CartState, item: &NewCartItem) -> CartState {
    if item.price.currency != state.currency || item.price.amount < 0 {
        return state.clone();
    }

    let key = item.key();
    let mut items = state.items.clone();
    match items.iter_mut().find(|line| line.matches(&key)) {
        Some(line) => line.quantity = line.quantity.saturating_add(1),
        None => items.push(CartItem::from_new(item.clone())),
    }
    with_items(state, items)
}

fn update_quantity(state: &CartState, key: &LineKey, quantity: i64) -> CartState {
    let Some(index) = state.items.iter().position(|line| line.matches(key)) else {
        return state.clone();
    };

    let mut items = state.items.clone();
    if quantity <= 0 {
        items.remove(index);
    } else if let Some(line) = items.get_mut(index) {
        line.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
    }
    with_items(state, items)
}

fn remove_item(state: &CartState, key: &LineKey) -> CartState {
    if !state.items.iter().any(|line| line.matches(key)) {
        return state.clone();
    }
    let items = state
        .items
        .iter()
        .filter(|line| !line.matches(key))
        .cloned()
        .collect();
    with_items(state, items)
}

/// New items, aggregates re-derived in the same step.
fn with_items(state: &CartState, items: Vec<CartItem>) -> CartState {
    let mut next = CartState {
        items,
        ..state.clone()
    };
    next.recompute();
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::{Currency, Price};
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn dress(size: &str) -> NewCartItem {
        NewCartItem::new("1", "Elegance Silk Dress", Price::new(299.99, Currency::USD))
            .with_size(size)
            .with_color("Black")
    }

    fn apply(state: CartState, actions: &[CartAction]) -> CartState {
        actions.iter().fold(state, |s, a| reduce(&s, a))
    }

    fn scenario_c() -> CartState {
        apply(
            CartState::default(),
            &[
                CartAction::AddItem(dress("M")),
                CartAction::AddItem(dress("M")),
                CartAction::AddItem(dress("L")),
            ],
        )
    }

    #[test]
    fn test_scenario_a_first_add() {
        let state = reduce(&CartState::default(), &CartAction::AddItem(dress("M")));

        assert_eq!(state.items.len(), 1);
        assert_eq!(state.items[0].quantity, 1);
        assert_eq!(state.total.display(), "$299.99");
        assert_eq!(state.item_count, 1);
    }

    #[test]
    fn test_scenario_b_same_line_merges() {
        let state = apply(
            CartState::default(),
            &[CartAction::AddItem(dress("M")), CartAction::AddItem(dress("M"))],
        );

        assert_eq!(state.items.len(), 1);
        assert_eq!(state.items[0].quantity, 2);
        assert_eq!(state.total.amount, 59998);
        assert_eq!(state.item_count, 2);
    }

    #[test]
    fn test_scenario_c_different_size_is_new_line() {
        let state = scenario_c();

        assert_eq!(state.items.len(), 2);
        assert_eq!(state.items[1].size.as_deref(), Some("L"));
        assert_eq!(state.item_count, 3);
        assert_eq!(state.total.amount, 89997);
    }

    #[test]
    fn test_scenario_d_zero_quantity_removes_line() {
        let state = reduce(
            &scenario_c(),
            &CartAction::UpdateQuantity {
                key: dress("M").key(),
                quantity: 0,
            },
        );

        assert_eq!(state.items.len(), 1);
        assert_eq!(state.items[0].size.as_deref(), Some("L"));
        assert_eq!(state.item_count, 1);
        assert_eq!(state.total.amount, 29999);
    }

    #[test]
    fn test_update_quantity_targets_only_the_keyed_variant() {
        let state = reduce(
            &scenario_c(),
            &CartAction::UpdateQuantity {
                key: dress("L").key(),
                quantity: 5,
            },
        );

        assert_eq!(state.items[0].quantity, 2);
        assert_eq!(state.items[1].quantity, 5);
        assert_eq!(state.item_count, 7);
    }

    #[test]
    fn test_negative_quantity_removes_line() {
        let state = reduce(
            &scenario_c(),
            &CartAction::UpdateQuantity {
                key: dress("L").key(),
                quantity: -3,
            },
        );
        assert_eq!(state.items.len(), 1);
        assert!(state.items.iter().all(|i| i.quantity >= 1));
    }

    #[test]
    fn test_oversized_quantity_saturates() {
        let state = reduce(
            &scenario_c(),
            &CartAction::UpdateQuantity {
                key: dress("L").key(),
                quantity: i64::MAX,
            },
        );
        assert_eq!(state.items[1].quantity, u32::MAX);
        assert!(state.is_consistent());
    }

    #[test]
    fn test_scenario_e_remove_nonexistent_is_noop() {
        let before = scenario_c();
        let after = reduce(&before, &CartAction::RemoveItem(LineKey::new("nonexistent")));
        assert_eq!(before, after);

        let empty = reduce(&CartState::default(), &CartAction::RemoveItem(LineKey::new("nonexistent")));
        assert_eq!(empty, CartState::default());
    }

    #[test]
    fn test_remove_item_keeps_other_variants() {
        let state = reduce(&scenario_c(), &CartAction::RemoveItem(dress("M").key()));
        assert_eq!(state.items.len(), 1);
        assert_eq!(state.items[0].size.as_deref(), Some("L"));
        assert_eq!(state.item_count, 1);
    }

    #[test]
    fn test_scenario_f_clear() {
        let mut state = scenario_c();
        state.is_open = true;

        let cleared = reduce(&state, &CartAction::ClearCart);
        assert!(cleared.items.is_empty());
        assert_eq!(cleared.total.amount, 0);
        assert_eq!(cleared.item_count, 0);
        // visibility is independent of items
        assert!(cleared.is_open);
    }

    #[test]
    fn test_visibility_actions() {
        let closed = CartState::default();
        let opened = reduce(&closed, &CartAction::OpenCart);
        assert!(opened.is_open);
        assert!(reduce(&opened, &CartAction::OpenCart).is_open);
        assert!(!reduce(&opened, &CartAction::CloseCart).is_open);

        let toggled_twice = apply(closed.clone(), &[CartAction::ToggleCart, CartAction::ToggleCart]);
        assert_eq!(toggled_twice.is_open, closed.is_open);
    }

    #[test]
    fn test_foreign_currency_add_is_ignored() {
        let euro_item = NewCartItem::new("2", "Handbag", Price::new(459.99, Currency::EUR));
        let state = reduce(&CartState::new(Currency::USD), &CartAction::AddItem(euro_item));
        assert!(state.is_empty());
    }

    #[test]
    fn test_negative_price_add_is_ignored() {
        let refund = NewCartItem::new("x", "Refund", Price::from_cents(-100, Currency::USD));
        let state = reduce(&CartState::default(), &CartAction::AddItem(refund));
        assert!(state.is_empty());
    }

    fn key_strategy() -> impl Strategy<Value = LineKey> {
        let id = prop_oneof![Just("1"), Just("2"), Just("3")];
        let size = prop::option::of(prop_oneof![Just("S"), Just("M")]);
        let color = prop::option::of(Just("Black"));
        (id, size, color).prop_map(|(id, size, color)| {
            let mut key = LineKey::new(id);
            key.size = size.map(String::from);
            key.color = color.map(String::from);
            key
        })
    }

    fn action_strategy() -> impl Strategy<Value = CartAction> {
        prop_oneof![
            3 => (key_strategy(), 1_000i64..50_000).prop_map(|(key, cents)| {
                let mut item = NewCartItem::new(key.id, "Item", Price::from_cents(cents, Currency::USD));
                item.size = key.size;
                item.color = key.color;
                CartAction::AddItem(item)
            }),
            2 => (key_strategy(), -2i64..5).prop_map(|(key, quantity)| CartAction::UpdateQuantity { key, quantity }),
            1 => key_strategy().prop_map(CartAction::RemoveItem),
            1 => Just(CartAction::ClearCart),
            1 => Just(CartAction::ToggleCart),
            1 => Just(CartAction::OpenCart),
            1 => Just(CartAction::CloseCart),
        ]
    }

    fn state_strategy() -> impl Strategy<Value = CartState> {
        prop::collection::vec(action_strategy(), 0..40)
            .prop_map(|actions| apply(CartState::default(), &actions))
    }

    proptest! {
        #![proptest_config(ProptestConfig { cases: 256, .. ProptestConfig::default() })]

        #[test]
        fn test_totals_follow_items(state in state_strategy(), action in action_strategy()) {
            let next = reduce(&state, &action);
            prop_assert!(next.is_consistent(), "after {:?}", action);
        }

        #[test]
        fn test_line_keys_stay_unique(state in state_strategy(), action in action_strategy()) {
            let next = reduce(&state, &action);
            let keys: HashSet<_> = next.items.iter().map(CartItem::key).collect();
            prop_assert_eq!(keys.len(), next.items.len());
        }

        #[test]
        fn test_quantities_stay_positive(state in state_strategy(), action in action_strategy()) {
            let next = reduce(&state, &action);
            prop_assert!(next.items.iter().all(|line| line.quantity >= 1));
        }

        #[test]
        fn test_clear_empties_everything(state in state_strategy()) {
            let cleared = reduce(&state, &CartAction::ClearCart);
            prop_assert!(cleared.items.is_empty());
            prop_assert_eq!(cleared.total.amount, 0);
            prop_assert_eq!(cleared.item_count, 0);
            prop_assert_eq!(cleared.is_open, state.is_open);
        }

        #[test]
        fn test_toggle_twice_is_identity(state in state_strategy()) {
            let once = reduce(&state, &CartAction::ToggleCart);
            prop_assert_eq!(once.is_open, !state.is_open);
            prop_assert_eq!(&once.items, &state.items);
            let twice = reduce(&once, &CartAction::ToggleCart);
            prop_assert_eq!(twice, state);
        }
    }
}
