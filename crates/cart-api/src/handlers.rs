//! # Request Handlers
//!
//! Axum request handlers for the storefront API.
//! Every cart mutation goes through the cart's store as a `CartAction`.

use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use cart_auth::{AuthClient, AuthResponse, AuthSession, LoginRequest, RegisterRequest};
use cart_core::{
    place_order, CartAction, CartConsumer, CartError, CartState, CartStore, CheckoutRequest,
    FieldErrors, OrderConfirmation, OrderSummary, Price, Product, ProductQuery, PromoCode,
    ShippingMethod, ShippingOption,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

// =============================================================================
// Request/Response Types
// =============================================================================

/// Cart id plus its current snapshot
#[derive(Debug, Serialize, Deserialize)]
pub struct CartResponse {
    pub cart_id: Uuid,
    pub cart: CartState,
}

/// Most units one add-to-cart request may carry
pub const MAX_ADD_QUANTITY: u32 = 99;

/// Add a catalog product to a cart
#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub product_id: String,
    /// Defaults to the product's first size
    #[serde(default)]
    pub size: Option<String>,
    /// Defaults to the product's first color
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

impl AddItemRequest {
    /// Requested units, between 1 and [`MAX_ADD_QUANTITY`]
    pub fn units(&self) -> Result<u32, CartError> {
        match self.quantity {
            0 => Err(CartError::InvalidRequest("Quantity must be at least 1".into())),
            n if n > MAX_ADD_QUANTITY => Err(CartError::InvalidRequest(format!(
                "Quantity must be at most {MAX_ADD_QUANTITY}"
            ))),
            n => Ok(n),
        }
    }
}

/// Summary query: no parameters gives the cart-page summary
#[derive(Debug, Default, Deserialize)]
pub struct SummaryQuery {
    #[serde(default)]
    pub shipping: Option<ShippingMethod>,
    #[serde(default)]
    pub promo: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub summary: OrderSummary,
    pub item_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub free_shipping_remaining: Option<Price>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CheckoutResponse {
    pub confirmation: OrderConfirmation,
    pub cart: CartState,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Collection {
    pub name: String,
    pub product_count: usize,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Per-field messages for validation failures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<FieldErrors>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
            details: None,
            fields: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub fn cart_error_to_response(err: CartError) -> ApiError {
    let code = err.status_code();
    let mut response = ErrorResponse::new(err.to_string(), code);
    if err.is_retryable() {
        response = response.with_details("retryable");
    }
    if let CartError::Validation { fields } = err {
        response.fields = Some(fields);
    }
    (
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(response),
    )
}

fn auth_client(state: &AppState) -> Result<&AuthClient, ApiError> {
    state.auth.as_ref().ok_or_else(|| {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(
                ErrorResponse::new("Auth backend not configured", 503)
                    .with_details("set AUTH_API_BASE_URL"),
            ),
        )
    })
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "luxe-storefront",
        "version": env!("CARGO_PKG_VERSION"),
        "carts": state.carts.len(),
        "time": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Browse the catalog
#[instrument(skip(state))]
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> impl IntoResponse {
    let products = state.catalog.browse(&query);
    Json(serde_json::json!({
        "products": products,
        "count": products.len()
    }))
}

/// Get single product
pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    state
        .catalog
        .get(&product_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| cart_error_to_response(CartError::ProductNotFound { product_id }))
}

/// Categories with product counts, in catalog order
pub async fn list_collections(State(state): State<AppState>) -> impl IntoResponse {
    let collections: Vec<Collection> = state
        .catalog
        .categories()
        .into_iter()
        .map(|name| Collection {
            name: name.to_string(),
            product_count: state.catalog.products.iter().filter(|p| p.category == name).count(),
        })
        .collect();

    Json(serde_json::json!({
        "collections": collections,
        "count": collections.len()
    }))
}

/// Shipping methods offered at checkout, priced in the store currency
pub async fn list_shipping_methods(State(state): State<AppState>) -> impl IntoResponse {
    let methods = ShippingOption::all(state.config.currency);
    Json(serde_json::json!({
        "shipping_methods": methods,
        "count": methods.len()
    }))
}

/// Create an empty cart
#[instrument(skip(state))]
pub async fn create_cart(State(state): State<AppState>) -> (StatusCode, Json<CartResponse>) {
    let (cart_id, store) = state.carts.create();
    info!("Created cart {}", cart_id);

    (
        StatusCode::CREATED,
        Json(CartResponse {
            cart_id,
            cart: store.snapshot(),
        }),
    )
}

/// Current cart snapshot
pub async fn get_cart(
    State(state): State<AppState>,
    Path(cart_id): Path<String>,
) -> Result<Json<CartResponse>, ApiError> {
    let (cart_id, store) = find_cart(&state, &cart_id)?;
    Ok(Json(CartResponse {
        cart_id,
        cart: store.snapshot(),
    }))
}

/// Drop a cart
#[instrument(skip(state))]
pub async fn delete_cart(
    State(state): State<AppState>,
    Path(cart_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let (id, _) = find_cart(&state, &cart_id)?;
    state.carts.remove(&id);
    info!("Deleted cart {}", id);
    Ok(StatusCode::NO_CONTENT)
}

/// Dispatch one action against a cart.
///
/// Unknown action types are rejected with 400 before reaching the store.
#[instrument(skip(state, body))]
pub async fn dispatch_action(
    State(state): State<AppState>,
    Path(cart_id): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<CartResponse>, ApiError> {
    let (cart_id, store) = find_cart(&state, &cart_id)?;
    let action: CartAction = serde_json::from_value(body).map_err(|e| {
        cart_error_to_response(CartError::InvalidRequest(format!("Unknown cart action: {e}")))
    })?;

    let cart = store.dispatch(action);
    Ok(Json(CartResponse { cart_id, cart }))
}

/// Add a catalog product, then open the sidebar
#[instrument(skip(state, request), fields(product_id = %request.product_id, quantity = request.quantity))]
pub async fn add_item(
    State(state): State<AppState>,
    Path(cart_id): Path<String>,
    Json(request): Json<AddItemRequest>,
) -> Result<Json<CartResponse>, ApiError> {
    let (cart_id, store) = find_cart(&state, &cart_id)?;
    let quantity = request.units().map_err(cart_error_to_response)?;
    let product = state.catalog.get(&request.product_id).ok_or_else(|| {
        cart_error_to_response(CartError::ProductNotFound {
            product_id: request.product_id.clone(),
        })
    })?;

    let size = pick_option("size", request.size.as_deref(), &product.sizes)?;
    let color = pick_option("color", request.color.as_deref(), &product.colors)?;
    let item = product.cart_item(size, color);

    let cart = store.add_quantity(item, quantity);
    Ok(Json(CartResponse { cart_id, cart }))
}

/// A requested variant must be one the product offers; none requested
/// means the first listed.
fn pick_option<'a>(
    field: &str,
    requested: Option<&'a str>,
    offered: &'a [String],
) -> Result<Option<&'a str>, ApiError> {
    match requested {
        None => Ok(offered.first().map(String::as_str)),
        Some(value) if offered.iter().any(|o| o == value) => Ok(Some(value)),
        Some(value) => Err(cart_error_to_response(CartError::InvalidRequest(format!(
            "Unavailable {field}: {value}"
        )))),
    }
}

/// Cart-page summary, or checkout summary when shipping or promo is given
pub async fn get_summary(
    State(state): State<AppState>,
    Path(cart_id): Path<String>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let cart = find_cart(&state, &cart_id)?.1.snapshot();

    let response = if query.shipping.is_none() && query.promo.is_none() {
        SummaryResponse {
            summary: OrderSummary::for_cart(&cart),
            item_count: cart.item_count,
            free_shipping_remaining: OrderSummary::free_shipping_remaining(&cart),
        }
    } else {
        let promo = match query.promo.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(code) => Some(PromoCode::parse(code).map_err(cart_error_to_response)?),
        };
        SummaryResponse {
            summary: OrderSummary::for_checkout(
                &cart.items,
                cart.currency,
                query.shipping.unwrap_or_default(),
                promo.as_ref(),
            ),
            item_count: cart.item_count,
            free_shipping_remaining: None,
        }
    };

    Ok(Json(response))
}

/// Validate the checkout form, place the order, take the ordered units out
/// of the cart
#[instrument(skip(state, request))]
pub async fn checkout(
    State(state): State<AppState>,
    Path(cart_id): Path<String>,
    Json(request): Json<CheckoutRequest>,
) -> Result<Json<CheckoutResponse>, ApiError> {
    let (_, store) = find_cart(&state, &cart_id)?;

    let confirmation = place_order(&store, request, state.placement.as_ref())
        .await
        .map_err(cart_error_to_response)?;

    Ok(Json(CheckoutResponse {
        confirmation,
        cart: store.snapshot(),
    }))
}

/// Log in against the auth backend
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthSession>, ApiError> {
    let client = auth_client(&state)?;
    client
        .login(&request)
        .await
        .map(Json)
        .map_err(cart_error_to_response)
}

/// Register against the auth backend
#[instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let client = auth_client(&state)?;
    let response = client
        .register(&request)
        .await
        .map_err(cart_error_to_response)?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Malformed ids are reported as unknown carts
fn find_cart(state: &AppState, cart_id: &str) -> Result<(Uuid, CartStore), ApiError> {
    let missing = || {
        cart_error_to_response(CartError::CartNotFound {
            cart_id: cart_id.to_string(),
        })
    };
    let id = Uuid::parse_str(cart_id).map_err(|_| missing())?;
    let store = state.carts.get(&id).ok_or_else(missing)?;
    Ok((id, store))
}
