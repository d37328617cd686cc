use uuid::Uuid;

use crate::{
    access::{self, Area},
    dto::orders::OrderWithItems,
    error::{AppError, AppResult},
    models::{Order, OrderStatus, Profile},
    services::product_service,
    session::Session,
    state::AppState,
};

pub async fn list_all_orders(
    state: &AppState,
    session: &Session,
    status: Option<OrderStatus>,
) -> AppResult<Vec<Order>> {
    access::require(session, Area::AdminDashboard)?;
    let orders = state.store.list_orders(None).await?;
    Ok(match status {
        Some(status) => orders.into_iter().filter(|o| o.status == status).collect(),
        None => orders,
    })
}

pub async fn get_order_admin(
    state: &AppState,
    session: &Session,
    id: Uuid,
) -> AppResult<OrderWithItems> {
    access::require(session, Area::AdminDashboard)?;
    let order = state.store.find_order(id).await?.ok_or(AppError::NotFound)?;
    let items = state.store.list_order_items(order.id).await?;
    Ok(OrderWithItems { order, items })
}

/// Any stored status may be replaced by any other; there is no transition
/// table.
pub async fn update_order_status(
    state: &AppState,
    session: &Session,
    id: Uuid,
    status: OrderStatus,
) -> AppResult<Order> {
    let user = access::require(session, Area::AdminDashboard)?;
    let order = state
        .store
        .set_order_status(id, status)
        .await?
        .ok_or(AppError::NotFound)?;

    tracing::info!(order_id = %order.id, status = %order.status, admin_id = %user.user_id, "order status updated");
    Ok(order)
}

pub async fn list_profiles(state: &AppState, session: &Session) -> AppResult<Vec<Profile>> {
    access::require(session, Area::AdminDashboard)?;
    state.store.list_profiles().await
}

pub async fn remove_product(state: &AppState, session: &Session, id: Uuid) -> AppResult<()> {
    let user = access::require(session, Area::AdminDashboard)?;
    product_service::remove(state, id).await?;
    tracing::info!(product_id = %id, admin_id = %user.user_id, "product removed by moderator");
    Ok(())
}
