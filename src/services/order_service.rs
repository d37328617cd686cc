use chrono::Utc;
use uuid::Uuid;

use crate::{
    access::{self, Area},
    dto::orders::{OrderWithItems, PlacedOrder},
    error::{AppError, AppResult},
    models::{MAX_PRICE, Order, OrderItem, OrderStatus},
    pricing::checkout_summary,
    services::cart_service,
    session::Session,
    state::AppState,
    validation::ShippingForm,
};

/// Turns the caller's cart into an order.
///
/// Steps run strictly in order: price the cart snapshot, insert the order as
/// `pending`, insert one item per cart line at the current product price, then
/// clear the cart. If the items cannot be written the order row is deleted
/// again, so a failed checkout never leaves an order without items.
pub async fn place_order(
    state: &AppState,
    session: &Session,
    form: ShippingForm,
) -> AppResult<PlacedOrder> {
    let user = access::require(session, Area::Checkout)?;
    form.check()?;

    let cart = cart_service::load_cart(state, session).await?;
    if cart.is_empty() {
        return Err(AppError::validation("Cart is empty"));
    }

    let summary = checkout_summary(cart.total()?)?;
    if summary.total > MAX_PRICE {
        return Err(AppError::validation(format!(
            "order total must not exceed {MAX_PRICE}"
        )));
    }

    let order = state
        .store
        .insert_order(Order {
            id: Uuid::new_v4(),
            user_id: user.user_id,
            total_amount: summary.total,
            shipping_address: form.address_line(),
            status: OrderStatus::Pending,
            created_at: Utc::now(),
        })
        .await?;

    let items = cart
        .lines()
        .iter()
        .map(|line| {
            OrderItem::new(
                Uuid::new_v4(),
                order.id,
                line.product.id,
                line.quantity,
                line.product.price,
            )
        })
        .collect::<AppResult<Vec<_>>>();

    let written = match items {
        Ok(items) => state.store.insert_order_items(items).await,
        Err(err) => Err(err),
    };
    let items = match written {
        Ok(items) => items,
        Err(err) => {
            compensate(state, order.id).await;
            return Err(err);
        }
    };

    // The order stands even if the cart cannot be emptied.
    let cart_cleared = match cart_service::clear_cart(state, session).await {
        Ok(_) => true,
        Err(err) => {
            tracing::warn!(error = %err, order_id = %order.id, "cart not cleared after checkout");
            false
        }
    };

    tracing::info!(
        order_id = %order.id,
        user_id = %user.user_id,
        items = items.len(),
        total = %summary.total,
        "order placed"
    );

    Ok(PlacedOrder {
        order,
        items,
        summary,
        cart_cleared,
    })
}

async fn compensate(state: &AppState, order_id: Uuid) {
    match state.store.delete_order(order_id).await {
        Ok(_) => tracing::warn!(%order_id, "order items failed, order rolled back"),
        Err(err) => tracing::error!(
            error = %err,
            %order_id,
            "order items failed and the order could not be removed"
        ),
    }
}

pub async fn list_orders(state: &AppState, session: &Session) -> AppResult<Vec<Order>> {
    let user = access::require(session, Area::Orders)?;
    state.store.list_orders(Some(user.user_id)).await
}

pub async fn get_order(state: &AppState, session: &Session, id: Uuid) -> AppResult<OrderWithItems> {
    let user = access::require(session, Area::Orders)?;
    let order = match state.store.find_order(id).await? {
        Some(o) if o.user_id == user.user_id => o,
        _ => return Err(AppError::NotFound),
    };

    let items = state.store.list_order_items(order.id).await?;
    Ok(OrderWithItems { order, items })
}
