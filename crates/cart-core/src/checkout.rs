//! # Checkout
//!
//! Order summary pricing for the cart and checkout pages, the checkout
//! request/order types, and the placement flow that takes the ordered units
//! out of the cart once an order is accepted.
//!
//! All arithmetic happens in minor units; percentages round half away from
//! zero.

use crate::action::CartAction;
use crate::error::{CartError, CartResult};
use crate::item::CartItem;
use crate::money::{Currency, Price};
use crate::placement::{OrderConfirmation, OrderPlacement};
use crate::state::{sum_count, sum_total, CartState};
use crate::store::CartStore;
use crate::validation::{FieldErrors, PaymentMethod, ShippingAddress};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Sales tax applied to the subtotal
pub const TAX_RATE_PERCENT: u32 = 8;

/// Cart page: subtotals above this ship free ($200.00)
pub const FREE_SHIPPING_THRESHOLD_CENTS: i64 = 20_000;

/// Cart page: flat shipping below the threshold ($19.99)
pub const FLAT_SHIPPING_CENTS: i64 = 1_999;

/// Shipping speed chosen at checkout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShippingMethod {
    #[default]
    Standard,
    Express,
    Overnight,
}

impl ShippingMethod {
    pub const ALL: [ShippingMethod; 3] = [
        ShippingMethod::Standard,
        ShippingMethod::Express,
        ShippingMethod::Overnight,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ShippingMethod::Standard => "standard",
            ShippingMethod::Express => "express",
            ShippingMethod::Overnight => "overnight",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ShippingMethod::Standard => "Standard Shipping",
            ShippingMethod::Express => "Express Shipping",
            ShippingMethod::Overnight => "Overnight Shipping",
        }
    }

    pub fn delivery_time(&self) -> &'static str {
        match self {
            ShippingMethod::Standard => "5-7 business days",
            ShippingMethod::Express => "2-3 business days",
            ShippingMethod::Overnight => "1 business day",
        }
    }

    pub fn price(&self, currency: Currency) -> Price {
        let cents = match self {
            ShippingMethod::Standard => 0,
            ShippingMethod::Express => 1_599,
            ShippingMethod::Overnight => 2_999,
        };
        Price::from_cents(cents, currency)
    }
}

/// A shipping method as offered on the checkout page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingOption {
    pub method: ShippingMethod,
    pub label: String,
    pub delivery_time: String,
    pub price: Price,
}

impl ShippingOption {
    /// Every method, cheapest first, priced in `currency`
    pub fn all(currency: Currency) -> Vec<Self> {
        ShippingMethod::ALL
            .iter()
            .map(|method| Self {
                method: *method,
                label: method.label().to_string(),
                delivery_time: method.delivery_time().to_string(),
                price: method.price(currency),
            })
            .collect()
    }
}

impl FromStr for ShippingMethod {
    type Err = CartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "standard" => Ok(ShippingMethod::Standard),
            "express" => Ok(ShippingMethod::Express),
            "overnight" => Ok(ShippingMethod::Overnight),
            other => Err(CartError::InvalidRequest(format!(
                "Unknown shipping method: {other}"
            ))),
        }
    }
}

/// A recognised promo code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromoCode {
    pub code: String,
    pub percent_off: u32,
}

impl PromoCode {
    /// Look up a code (case-insensitive).
    pub fn parse(code: &str) -> CartResult<Self> {
        match code.trim().to_lowercase().as_str() {
            "luxury10" => Ok(Self {
                code: "LUXURY10".to_string(),
                percent_off: 10,
            }),
            _ => Err(CartError::InvalidPromoCode {
                code: code.to_string(),
            }),
        }
    }
}

/// Price breakdown shown next to the cart or checkout form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub subtotal: Price,
    pub shipping: Price,
    pub tax: Price,
    pub discount: Price,
    pub total: Price,
}

impl OrderSummary {
    fn assemble(subtotal: Price, shipping: Price, discount: Price) -> Self {
        let tax = subtotal.percent(TAX_RATE_PERCENT);
        let total = subtotal.plus(shipping).plus(tax).minus(discount);
        Self {
            subtotal,
            shipping,
            tax,
            discount,
            total,
        }
    }

    /// Cart page: free shipping above $200, otherwise a flat $19.99.
    /// An empty cart costs nothing.
    pub fn for_cart(state: &CartState) -> Self {
        let currency = state.currency;
        let subtotal = state.total;
        let shipping = if state.is_empty() || subtotal.amount > FREE_SHIPPING_THRESHOLD_CENTS {
            Price::zero(currency)
        } else {
            Price::from_cents(FLAT_SHIPPING_CENTS, currency)
        };
        Self::assemble(subtotal, shipping, Price::zero(currency))
    }

    /// Checkout page: shipping by chosen method, optional promo discount.
    pub fn for_checkout(
        items: &[CartItem],
        currency: Currency,
        method: ShippingMethod,
        promo: Option<&PromoCode>,
    ) -> Self {
        let subtotal = sum_total(items, currency);
        let discount = promo
            .map(|p| subtotal.percent(p.percent_off))
            .unwrap_or_else(|| Price::zero(currency));
        Self::assemble(subtotal, method.price(currency), discount)
    }

    /// How much more the cart needs for free shipping, if anything
    pub fn free_shipping_remaining(state: &CartState) -> Option<Price> {
        (state.total.amount < FREE_SHIPPING_THRESHOLD_CENTS).then(|| {
            Price::from_cents(FREE_SHIPPING_THRESHOLD_CENTS - state.total.amount, state.currency)
        })
    }
}

/// Everything the checkout form submits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub shipping_address: ShippingAddress,
    /// `None` means "same as shipping"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_address: Option<ShippingAddress>,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub shipping_method: ShippingMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promo_code: Option<String>,
}

impl CheckoutRequest {
    /// Validate every step, reporting all failing fields together.
    /// Billing fields are prefixed with `billing.`.
    pub fn validate(&self) -> CartResult<()> {
        let mut fields = FieldErrors::new();

        collect(&mut fields, "", self.shipping_address.validate());
        if let Some(billing) = &self.billing_address {
            collect(&mut fields, "billing.", billing.validate());
        }
        collect(&mut fields, "", self.payment_method.validate());

        if fields.is_empty() {
            Ok(())
        } else {
            Err(CartError::Validation { fields })
        }
    }

    /// The promo code, if one was entered
    pub fn promo(&self) -> CartResult<Option<PromoCode>> {
        match self.promo_code.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(code) => PromoCode::parse(code).map(Some),
        }
    }
}

fn collect(into: &mut FieldErrors, prefix: &str, result: CartResult<()>) {
    if let Err(CartError::Validation { fields }) = result {
        for (field, message) in fields {
            into.insert(format!("{prefix}{field}"), message);
        }
    }
}

/// An order built from a cart snapshot at checkout time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Unique order ID (generated)
    pub id: String,

    /// Lines as they were when the order was built
    pub items: Vec<CartItem>,

    pub shipping_address: ShippingAddress,

    pub billing_address: ShippingAddress,

    /// Card details with everything but the last four digits dropped
    pub payment_method: PaymentMethod,

    pub shipping_method: ShippingMethod,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub promo_code: Option<String>,

    pub summary: OrderSummary,

    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Build an order from a cart snapshot and the checkout form
    pub fn from_cart(state: &CartState, request: CheckoutRequest) -> CartResult<Self> {
        if state.is_empty() {
            return Err(CartError::EmptyCart);
        }

        let promo = request.promo()?;
        let summary = OrderSummary::for_checkout(
            &state.items,
            state.currency,
            request.shipping_method,
            promo.as_ref(),
        );
        let billing_address = request
            .billing_address
            .unwrap_or_else(|| request.shipping_address.clone());

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            items: state.items.clone(),
            shipping_address: request.shipping_address,
            billing_address,
            payment_method: request.payment_method.masked(),
            shipping_method: request.shipping_method,
            promo_code: promo.map(|p| p.code),
            summary,
            created_at: Utc::now(),
        })
    }

    /// Units across all lines
    pub fn item_count(&self) -> u64 {
        sum_count(&self.items)
    }

    pub fn customer_email(&self) -> &str {
        &self.shipping_address.email
    }
}

/// Validate the form, place the order, and take the ordered units out of
/// the cart.
///
/// One checkout runs per cart at a time; a second one while the first is
/// in flight fails with [`CartError::CheckoutInProgress`]. Nothing is
/// removed unless the placement backend confirms. Lines added or grown
/// while the order was being placed stay in the cart.
#[instrument(skip_all, fields(shipping = %request.shipping_method.as_str(), placement = placement.name()))]
pub async fn place_order(
    store: &CartStore,
    request: CheckoutRequest,
    placement: &dyn OrderPlacement,
) -> CartResult<OrderConfirmation> {
    let _claim = store.begin_checkout().map_err(|e| {
        warn!("Rejected concurrent checkout");
        e
    })?;

    let snapshot = store.snapshot();
    if snapshot.is_empty() {
        return Err(CartError::EmptyCart);
    }

    request.validate()?;
    let order = Order::from_cart(&snapshot, request)?;

    let confirmation = placement.place(&order).await.map_err(|e| {
        warn!("Order placement failed: {}", e);
        e
    })?;

    let remaining = store.dispatch_planned(|current| settle_actions(current, &order.items));
    info!(
        "Order {} placed: {} items, total={}, {} items left in cart",
        confirmation.confirmation_number,
        order.item_count(),
        order.summary.total,
        remaining.item_count
    );

    Ok(confirmation)
}

/// Reduce each ordered line by the ordered quantity, as it stands now.
fn settle_actions(current: &CartState, ordered: &[CartItem]) -> Vec<CartAction> {
    ordered
        .iter()
        .filter_map(|sold| {
            let key = sold.key();
            current
                .items
                .iter()
                .find(|line| line.matches(&key))
                .map(|line| CartAction::UpdateQuantity {
                    quantity: i64::from(line.quantity) - i64::from(sold.quantity),
                    key,
                })
        })
        .collect()
}
