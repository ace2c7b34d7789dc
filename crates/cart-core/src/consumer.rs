//! # Cart Consumer Contract
//!
//! What every storefront surface (product card, product detail, cart
//! sidebar, cart page, checkout) may do with a cart: read the snapshot and
//! dispatch actions. The provided methods are the interactions those
//! surfaces perform, expressed once so they behave identically everywhere.

use crate::action::CartAction;
use crate::item::{LineKey, NewCartItem};
use crate::reducer::reduce;
use crate::state::CartState;
use crate::store::CartStore;

pub trait CartConsumer {
    /// Current snapshot
    fn snapshot(&self) -> CartState;

    /// Request a transition; returns the snapshot every consumer now sees.
    fn dispatch(&self, action: CartAction) -> CartState;

    /// Request several transitions as one.
    fn dispatch_all(&self, actions: Vec<CartAction>) -> CartState {
        actions
            .into_iter()
            .fold(self.snapshot(), |_, action| self.dispatch(action))
    }

    /// Request transitions computed from the current state. Implementors
    /// that can, run `plan` and the batch as one step.
    fn dispatch_planned(&self, plan: &dyn Fn(&CartState) -> Vec<CartAction>) -> CartState {
        self.dispatch_all(plan(&self.snapshot()))
    }

    /// Product card: add one unit and reveal the sidebar.
    fn add_to_cart(&self, item: NewCartItem) -> CartState {
        self.dispatch_all(vec![CartAction::AddItem(item), CartAction::OpenCart])
    }

    /// Product detail: add `quantity` units of the chosen variant, then
    /// reveal the sidebar. A quantity of zero changes nothing.
    ///
    /// The units land in one step whatever the quantity: the first through
    /// `AddItem` (so a new line is created or an ignored add stays ignored),
    /// the rest as a quantity update on the same line.
    fn add_quantity(&self, item: NewCartItem, quantity: u32) -> CartState {
        if quantity == 0 {
            return self.snapshot();
        }

        let key = item.key();
        let held = |state: &CartState| {
            state
                .items
                .iter()
                .find(|line| line.matches(&key))
                .map_or(0, |line| i64::from(line.quantity))
        };

        self.dispatch_planned(&|state: &CartState| {
            let add = CartAction::AddItem(item.clone());
            let before = held(state);
            if held(&reduce(state, &add)) == before {
                return vec![CartAction::OpenCart];
            }
            vec![
                add,
                CartAction::UpdateQuantity {
                    key: key.clone(),
                    quantity: before + i64::from(quantity),
                },
                CartAction::OpenCart,
            ]
        })
    }

    /// Cart page "+"
    fn increment(&self, key: &LineKey) -> CartState {
        self.step_quantity(key, 1)
    }

    /// Cart page "-"; stepping below one removes the line.
    fn decrement(&self, key: &LineKey) -> CartState {
        self.step_quantity(key, -1)
    }

    fn set_quantity(&self, key: &LineKey, quantity: i64) -> CartState {
        self.dispatch(CartAction::UpdateQuantity {
            key: key.clone(),
            quantity,
        })
    }

    fn remove(&self, key: &LineKey) -> CartState {
        self.dispatch(CartAction::RemoveItem(key.clone()))
    }

    fn clear(&self) -> CartState {
        self.dispatch(CartAction::ClearCart)
    }

    fn toggle(&self) -> CartState {
        self.dispatch(CartAction::ToggleCart)
    }

    fn open(&self) -> CartState {
        self.dispatch(CartAction::OpenCart)
    }

    fn close(&self) -> CartState {
        self.dispatch(CartAction::CloseCart)
    }

    #[doc(hidden)]
    fn step_quantity(&self, key: &LineKey, delta: i64) -> CartState {
        let snapshot = self.snapshot();
        match snapshot.items.iter().find(|line| line.matches(key)) {
            Some(line) => self.set_quantity(key, i64::from(line.quantity) + delta),
            None => snapshot,
        }
    }
}

impl CartConsumer for CartStore {
    fn snapshot(&self) -> CartState {
        CartStore::snapshot(self)
    }

    fn dispatch(&self, action: CartAction) -> CartState {
        CartStore::dispatch(self, action)
    }

    fn dispatch_all(&self, actions: Vec<CartAction>) -> CartState {
        self.dispatch_batch(actions)
    }

    fn dispatch_planned(&self, plan: &dyn Fn(&CartState) -> Vec<CartAction>) -> CartState {
        CartStore::dispatch_planned(self, |state| plan(state))
    }
}
