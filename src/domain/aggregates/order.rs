//! Order Aggregate
//!
//! The ledger materializes checkout input into immutable order records and
//! owns the status state machine. Totals are always recomputed server-side
//! from the line items; a client-claimed total is only compared and flagged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::domain::events::{DomainEvent, OrderEvent};
use crate::domain::value_objects::{PaymentMethod, ShippingInfo, Totals, STANDARD_SHIPPING_FEE};
use crate::{Result, StoreError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    PaymentConfirmed,
    PreparingShipment,
    Shipping,
    Delivered,
    Canceled,
}

impl OrderStatus {
    /// Cancellation is allowed from any state that has not yet left the
    /// warehouse and is not already terminal.
    pub fn cancelable(self) -> bool {
        !matches!(self, Self::Canceled | Self::Shipping | Self::Delivered)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::PaymentConfirmed => "payment confirmed",
            Self::PreparingShipment => "preparing shipment",
            Self::Shipping => "shipping",
            Self::Delivered => "delivered",
            Self::Canceled => "canceled",
        };
        write!(f, "{label}")
    }
}

/// Line-item snapshot frozen at order creation. Later catalog edits never
/// alter historical orders.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: String,
    pub name: String,
    pub option: String,
    pub quantity: u32,
    pub price: i64,
}

impl OrderItem {
    pub fn line_total(&self) -> i64 {
        self.price * i64::from(self.quantity)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: String,
    pub items: Vec<OrderItem>,
    /// Absent on records that predate shipping capture; hydrated on read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_info: Option<ShippingInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
    pub subtotal: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_fee: Option<i64>,
    pub final_total: i64,
    pub date: DateTime<Utc>,
    pub status: OrderStatus,
}

impl Order {
    pub fn recomputed_products_price(&self) -> i64 {
        self.items.iter().map(OrderItem::line_total).sum()
    }
}

/// Detail view returned by `get`: the stored record plus defaults hydrated
/// for fields the record may be missing. The stored record is not modified.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    pub order_id: String,
    pub items: Vec<OrderItem>,
    pub shipping_info: ShippingInfo,
    pub payment_method: PaymentMethod,
    pub total_products_price: i64,
    pub shipping_fee: i64,
    pub final_total: i64,
    pub date: DateTime<Utc>,
    pub status: OrderStatus,
}

#[derive(Clone, Debug, Default)]
pub struct OrderLedger {
    orders: Vec<Order>,
    events: Vec<DomainEvent>,
}

impl OrderLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_orders(orders: Vec<Order>) -> Self {
        Self { orders, events: vec![] }
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Create an order from checkout input. `claimed_total` is the total the
    /// client displayed; the persisted total is always the recomputed one,
    /// and a mismatch is logged rather than rejected.
    pub fn place(&mut self, items: Vec<OrderItem>, shipping_info: ShippingInfo, payment_method: PaymentMethod, claimed_total: Option<i64>) -> Result<Order> {
        if items.is_empty() {
            return Err(StoreError::Validation("order must contain at least one item".to_string()));
        }
        shipping_info.check_required()?;

        let subtotal: i64 = items.iter().map(OrderItem::line_total).sum();
        let totals = Totals::from_subtotal(subtotal);
        if let Some(claimed) = claimed_total {
            if claimed != totals.final_total {
                tracing::warn!(claimed, computed = totals.final_total, "client-submitted final total does not match recomputed total; persisting recomputed value");
            }
        }

        let now = Utc::now();
        let order = Order {
            order_id: format!("ORD-{}-{}", now.format("%Y%m%d"), Uuid::new_v4().simple()),
            items,
            shipping_info: Some(shipping_info),
            payment_method: Some(payment_method),
            subtotal: totals.subtotal,
            shipping_fee: Some(totals.shipping_fee),
            final_total: totals.final_total,
            date: now,
            status: OrderStatus::PaymentConfirmed,
        };
        self.orders.push(order.clone());
        self.raise_event(DomainEvent::Order(OrderEvent::Placed { order_id: order.order_id.clone(), final_total: order.final_total }));
        Ok(order)
    }

    /// All orders, most recent first.
    pub fn list(&self) -> Vec<Order> {
        let mut orders = self.orders.clone();
        orders.sort_by(|a, b| b.date.cmp(&a.date));
        orders
    }

    /// Single order with defaults hydrated on read: missing shipping fee
    /// falls back to the standard fee, missing shipping info and payment
    /// method to documented placeholders.
    pub fn get(&self, order_id: &str) -> Result<OrderDetail> {
        let order = self
            .orders
            .iter()
            .find(|o| o.order_id == order_id)
            .ok_or_else(|| StoreError::NotFound(format!("order {order_id} not found")))?;
        Ok(OrderDetail {
            order_id: order.order_id.clone(),
            items: order.items.clone(),
            shipping_info: order.shipping_info.clone().unwrap_or_else(ShippingInfo::placeholder),
            payment_method: order.payment_method.unwrap_or_default(),
            total_products_price: order.recomputed_products_price(),
            shipping_fee: order.shipping_fee.unwrap_or(STANDARD_SHIPPING_FEE),
            final_total: order.final_total,
            date: order.date,
            status: order.status,
        })
    }

    /// Cancel transition. Valid from any non-terminal state that has not
    /// entered shipping; the rejection message names the blocking status.
    pub fn cancel(&mut self, order_id: &str) -> Result<Order> {
        let order = self
            .orders
            .iter_mut()
            .find(|o| o.order_id == order_id)
            .ok_or_else(|| StoreError::NotFound(format!("order {order_id} not found")))?;
        if !order.status.cancelable() {
            return Err(StoreError::Conflict(format!("order {order_id} cannot be canceled in its current state ({})", order.status)));
        }
        order.status = OrderStatus::Canceled;
        let canceled = order.clone();
        self.raise_event(DomainEvent::Order(OrderEvent::Canceled { order_id: canceled.order_id.clone() }));
        Ok(canceled)
    }

    pub fn take_events(&mut self) -> Vec<DomainEvent> {
        std::mem::take(&mut self.events)
    }

    fn raise_event(&mut self, e: DomainEvent) {
        self.events.push(e);
    }
}
