//! # Cart Registry
//!
//! Independent carts keyed by id. Each entry is its own [`CartStore`];
//! nothing is shared between carts.
//!
//! Every lookup marks the cart as seen. Carts nobody has looked up for a
//! while are dropped by [`CartRegistry::evict_idle`], which
//! [`CartRegistry::spawn_sweeper`] runs on an interval.

use crate::error::{CartError, CartResult};
use crate::money::Currency;
use crate::store::CartStore;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, Clone)]
struct Entry {
    store: CartStore,
    last_seen: Instant,
}

#[derive(Debug, Clone, Default)]
pub struct CartRegistry {
    carts: Arc<RwLock<HashMap<Uuid, Entry>>>,
    currency: Currency,
}

impl CartRegistry {
    /// Create an empty registry whose carts are priced in `currency`
    pub fn new(currency: Currency) -> Self {
        Self {
            carts: Arc::new(RwLock::new(HashMap::new())),
            currency,
        }
    }

    /// Create a new empty cart and return its id and handle
    pub fn create(&self) -> (Uuid, CartStore) {
        let id = Uuid::new_v4();
        let store = CartStore::new(self.currency);
        self.carts.write().unwrap_or_else(PoisonError::into_inner).insert(
            id,
            Entry {
                store: store.clone(),
                last_seen: Instant::now(),
            },
        );
        (id, store)
    }

    /// Get a cart by id and mark it as seen
    pub fn get(&self, id: &Uuid) -> Option<CartStore> {
        let mut carts = self.carts.write().unwrap_or_else(PoisonError::into_inner);
        let entry = carts.get_mut(id)?;
        entry.last_seen = Instant::now();
        Some(entry.store.clone())
    }

    /// Parse an id from a path segment and look it up
    pub fn find(&self, id: &str) -> CartResult<CartStore> {
        Uuid::parse_str(id)
            .ok()
            .and_then(|uuid| self.get(&uuid))
            .ok_or_else(|| CartError::CartNotFound {
                cart_id: id.to_string(),
            })
    }

    /// Drop a cart; returns whether it existed
    pub fn remove(&self, id: &Uuid) -> bool {
        self.carts
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id)
            .is_some()
    }

    /// Drop every cart not seen for at least `max_idle`; returns how many
    pub fn evict_idle(&self, max_idle: Duration) -> usize {
        let now = Instant::now();
        let mut carts = self.carts.write().unwrap_or_else(PoisonError::into_inner);
        let before = carts.len();
        carts.retain(|id, entry| {
            let keep = now.saturating_duration_since(entry.last_seen) < max_idle;
            if !keep {
                debug!(cart_id = %id, item_count = entry.store.snapshot().item_count, "Evicting idle cart");
            }
            keep
        });
        before - carts.len()
    }

    /// Run [`evict_idle`](Self::evict_idle) every `every` until the handle
    /// is aborted or the runtime shuts down.
    pub fn spawn_sweeper(&self, max_idle: Duration, every: Duration) -> JoinHandle<()> {
        let registry = self.clone();
        tokio::spawn(async move {
            let mut ticker = time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let evicted = registry.evict_idle(max_idle);
                if evicted > 0 {
                    info!(evicted, remaining = registry.len(), "Evicted idle carts");
                }
            }
        })
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn len(&self) -> usize {
        self.carts.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
