//! # Cart Store
//!
//! Holds the current [`CartState`] for one cart and publishes every new
//! snapshot to subscribers.
//!
//! ## Thread Safety
//! The state lives inside a `tokio::sync::watch` channel. Each dispatch runs
//! the reducer while holding the channel's write lock, so concurrent
//! dispatches are serialized and a reader never sees a half-applied action.
//!
//! ```text
//! ┌──────────────┐  dispatch(action)  ┌───────────────────────────┐
//! │ product card │ ─────────────────► │ CartStore                 │
//! │ cart page    │                    │  watch::Sender<CartState> │
//! │ checkout     │ ◄───────────────── │   reduce() under lock     │
//! └──────────────┘  snapshot / recv   └───────────────────────────┘
//! ```

use crate::action::CartAction;
use crate::error::{CartError, CartResult};
use crate::money::Currency;
use crate::reducer::reduce;
use crate::state::CartState;
use std::sync::Arc;
use tokio::sync::{watch, Mutex, MutexGuard};
use tracing::{debug, warn};

/// Clonable handle to a single cart. Clones share the same state.
#[derive(Debug, Clone)]
pub struct CartStore {
    tx: Arc<watch::Sender<CartState>>,
    checkout: Arc<Mutex<()>>,
}

impl CartStore {
    /// Create an empty, closed cart
    pub fn new(currency: Currency) -> Self {
        Self::with_state(CartState::new(currency))
    }

    /// Create a store seeded with an existing state
    pub fn with_state(state: CartState) -> Self {
        let (tx, _rx) = watch::channel(state);
        Self {
            tx: Arc::new(tx),
            checkout: Arc::new(Mutex::new(())),
        }
    }

    /// Current snapshot
    pub fn snapshot(&self) -> CartState {
        self.tx.borrow().clone()
    }

    pub fn currency(&self) -> Currency {
        self.tx.borrow().currency
    }

    /// Receiver that observes every published snapshot
    pub fn subscribe(&self) -> watch::Receiver<CartState> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Apply one action and return the resulting snapshot.
    pub fn dispatch(&self, action: CartAction) -> CartState {
        self.dispatch_batch(std::iter::once(action))
    }

    /// Apply several actions as one transition. Subscribers are notified
    /// once, and only if the state actually changed.
    pub fn dispatch_batch<I>(&self, actions: I) -> CartState
    where
        I: IntoIterator<Item = CartAction>,
    {
        self.dispatch_planned(move |_| actions.into_iter().collect())
    }

    /// Build the batch from the state it will be applied to.
    ///
    /// `plan` runs under the write lock, so no other dispatch can land
    /// between reading the state and applying the planned actions.
    pub fn dispatch_planned<F>(&self, plan: F) -> CartState
    where
        F: FnOnce(&CartState) -> Vec<CartAction>,
    {
        let mut published = None;

        self.tx.send_if_modified(|state| {
            let mut next = state.clone();
            for action in plan(state) {
                if let CartAction::AddItem(item) = &action {
                    if item.price.currency != next.currency {
                        warn!(
                            item_id = %item.id,
                            item_currency = %item.price.currency,
                            cart_currency = %next.currency,
                            "Ignoring add of item priced in another currency"
                        );
                    }
                }
                next = reduce(&next, &action);
                debug!(
                    action = action.name(),
                    lines = next.items.len(),
                    item_count = next.item_count,
                    total = %next.total,
                    is_open = next.is_open,
                    "Cart action applied"
                );
            }

            let changed = next != *state;
            *state = next;
            published = Some(state.clone());
            changed
        });

        published.unwrap_or_else(|| self.snapshot())
    }

    /// Claim this cart for checkout. Only one checkout runs per cart; the
    /// claim is released when the guard drops.
    pub fn begin_checkout(&self) -> CartResult<MutexGuard<'_, ()>> {
        self.checkout
            .try_lock()
            .map_err(|_| CartError::CheckoutInProgress)
    }
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new(Currency::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{LineKey, NewCartItem};
    use crate::money::Price;
    use std::thread;

    fn watch_item() -> NewCartItem {
        NewCartItem::new("7", "Luxury Watch", Price::new(899.99, Currency::USD)).with_color("Gold")
    }

    #[test]
    fn test_dispatch_returns_new_snapshot() {
        let store = CartStore::default();
        let snapshot = store.dispatch(CartAction::AddItem(watch_item()));

        assert_eq!(snapshot.item_count, 1);
        assert_eq!(snapshot, store.snapshot());
    }

    #[test]
    fn test_clones_share_state() {
        let store = CartStore::default();
        let sidebar = store.clone();

        store.dispatch(CartAction::AddItem(watch_item()));
        store.dispatch(CartAction::OpenCart);

        let seen = sidebar.snapshot();
        assert_eq!(seen.item_count, 1);
        assert!(seen.is_open);
    }

    #[test]
    fn test_batch_is_single_transition() {
        let store = CartStore::default();
        let rx = store.subscribe();

        let snapshot = store.dispatch_batch(vec![
            CartAction::AddItem(watch_item()),
            CartAction::AddItem(watch_item()),
            CartAction::AddItem(watch_item()),
            CartAction::OpenCart,
        ]);

        assert_eq!(snapshot.items.len(), 1);
        assert_eq!(snapshot.items[0].quantity, 3);
        assert!(snapshot.is_open);
        assert!(rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_subscribers_observe_published_snapshot() {
        let store = CartStore::default();
        let mut cart_page = store.subscribe();
        let mut sidebar = store.subscribe();
        assert_eq!(store.subscriber_count(), 2);

        let published = store.dispatch(CartAction::AddItem(watch_item()));

        cart_page.changed().await.unwrap();
        sidebar.changed().await.unwrap();
        assert_eq!(*cart_page.borrow_and_update(), published);
        assert_eq!(*sidebar.borrow_and_update(), published);
    }

    #[test]
    fn test_noop_does_not_notify() {
        let store = CartStore::default();
        let rx = store.subscribe();

        store.dispatch(CartAction::RemoveItem(LineKey::new("nonexistent")));
        store.dispatch(CartAction::CloseCart);

        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_concurrent_dispatches_are_serialized() {
        let store = CartStore::default();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                thread::spawn(move || {
                    for _ in 0..100 {
                        store.dispatch(CartAction::AddItem(watch_item()));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = store.snapshot();
        assert_eq!(snapshot.items.len(), 1);
        assert_eq!(snapshot.item_count, 800);
        assert_eq!(snapshot.total.amount, 89999 * 800);
        assert!(snapshot.is_consistent());
    }

    #[test]
    fn test_planned_batch_sees_current_state() {
        let store = CartStore::default();
        store.dispatch(CartAction::AddItem(watch_item()));
        store.dispatch(CartAction::AddItem(watch_item()));

        let snapshot = store.dispatch_planned(|state| {
            state
                .items
                .iter()
                .map(|line| CartAction::UpdateQuantity {
                    key: line.key(),
                    quantity: i64::from(line.quantity) * 5,
                })
                .collect()
        });

        assert_eq!(snapshot.items[0].quantity, 10);
        assert!(snapshot.is_consistent());
    }

    #[test]
    fn test_checkout_claim_is_exclusive() {
        let store = CartStore::default();
        let sidebar = store.clone();

        let claim = store.begin_checkout().unwrap();
        assert!(matches!(
            sidebar.begin_checkout(),
            Err(CartError::CheckoutInProgress)
        ));

        drop(claim);
        assert!(sidebar.begin_checkout().is_ok());
        assert!(CartStore::default().begin_checkout().is_ok());
    }

    #[test]
    fn test_independent_stores_do_not_interfere() {
        let first = CartStore::default();
        let second = CartStore::default();

        first.dispatch(CartAction::AddItem(watch_item()));

        assert_eq!(first.snapshot().item_count, 1);
        assert!(second.snapshot().is_empty());
    }
}
