use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    models::{Order, OrderItem},
    pricing::CheckoutSummary,
};

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderWithItems {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PlacedOrder {
    pub order: Order,
    pub items: Vec<OrderItem>,
    pub summary: CheckoutSummary,
    /// False when the order was written but the cart still holds its lines.
    pub cart_cleared: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<Order>,
}
