//! Order command gateway
//!
//! The surface the API layer calls into. Every mutation:
//! 1. checks the caller's auth context before touching persistence,
//! 2. delegates to the order service or line-item ledger,
//! 3. wraps the outcome in the uniform `{type, message, content}` envelope.
//!
//! Query paths (`get_unpaid_orders`, billing, plain reads) return `Result`
//! directly; there is no meaningful partial result to envelope-wrap.

use crate::catalog::CatalogReader;
use crate::config::PosConfig;
use crate::orders::{self, money, LineItemLedger, OrderError, OrderResult, OrderService};
use crate::store::OrderStore;
use shared::models::{
    BillingSnapshot, Order, OrderCreate, OrderItem, OrderItemCreate, OrderItemUpdate, OrderUpdate,
    UnpaidOrder,
};
use shared::{AuthContext, Envelope, ErrorKind};
use std::sync::Arc;
use tracing::{error, warn};

pub struct OrderGateway {
    orders: OrderService,
    ledger: LineItemLedger,
    store: OrderStore,
    catalog: Arc<dyn CatalogReader>,
}

impl OrderGateway {
    pub fn new(store: OrderStore, catalog: Arc<dyn CatalogReader>, config: PosConfig) -> Self {
        Self {
            orders: OrderService::new(store.clone(), catalog.clone(), config.clone()),
            ledger: LineItemLedger::new(store.clone(), catalog.clone(), config),
            store,
            catalog,
        }
    }

    /// Auth short-circuit: a failed context never reaches persistence
    fn auth_guard<T>(&self, ctx: &AuthContext) -> Option<Envelope<T>> {
        ctx.failure().map(|msg| {
            warn!(user_id = ctx.user_id, message = msg, "rejected unauthorized command");
            Envelope::error(ErrorKind::Unauthorized, msg)
        })
    }

    fn envelope<T>(result: OrderResult<T>, success_message: &str) -> Envelope<T> {
        match result {
            Ok(content) => Envelope::success(content, success_message),
            Err(err) => {
                if err.kind() == ErrorKind::PersistenceFailure {
                    error!(error = %err, "persistence failure");
                }
                Envelope::error(err.kind(), err.public_message())
            }
        }
    }

    // ========== Order commands ==========

    pub async fn add_order(&self, order: OrderCreate, ctx: &AuthContext) -> Envelope<Order> {
        if let Some(denied) = self.auth_guard(ctx) {
            return denied;
        }
        Self::envelope(self.orders.place_order(order).await, "Order added")
    }

    pub async fn edit_order(
        &self,
        order_id: i64,
        order: OrderUpdate,
        ctx: &AuthContext,
    ) -> Envelope<Order> {
        if let Some(denied) = self.auth_guard(ctx) {
            return denied;
        }
        Self::envelope(self.orders.edit_order(order_id, order).await, "Order updated")
    }

    pub async fn delete_order(&self, order_id: i64, ctx: &AuthContext) -> Envelope<Order> {
        if let Some(denied) = self.auth_guard(ctx) {
            return denied;
        }
        Self::envelope(self.orders.delete_order(order_id), "Order deleted")
    }

    // ========== Line item commands ==========

    pub async fn add_order_item(
        &self,
        item: OrderItemCreate,
        ctx: &AuthContext,
    ) -> Envelope<OrderItem> {
        if let Some(denied) = self.auth_guard(ctx) {
            return denied;
        }
        Self::envelope(self.ledger.add_line_item(item).await, "Order item added")
    }

    pub async fn edit_order_item(
        &self,
        orderitem_id: i64,
        item: OrderItemUpdate,
        ctx: &AuthContext,
    ) -> Envelope<OrderItem> {
        if let Some(denied) = self.auth_guard(ctx) {
            return denied;
        }
        Self::envelope(
            self.ledger.edit_line_item(orderitem_id, item).await,
            "Order item updated",
        )
    }

    pub async fn delete_order_item(
        &self,
        orderitem_id: i64,
        ctx: &AuthContext,
    ) -> Envelope<OrderItem> {
        if let Some(denied) = self.auth_guard(ctx) {
            return denied;
        }
        Self::envelope(self.ledger.delete_line_item(orderitem_id), "Order item deleted")
    }

    pub async fn mark_item_paid(
        &self,
        orderitem_id: i64,
        paid: bool,
        ctx: &AuthContext,
    ) -> Envelope<OrderItem> {
        if let Some(denied) = self.auth_guard(ctx) {
            return denied;
        }
        Self::envelope(
            self.ledger.mark_paid(orderitem_id, paid).await,
            "Order item payment updated",
        )
    }

    // ========== Queries ==========

    pub fn orders(&self) -> OrderResult<Vec<Order>> {
        self.orders.list_orders()
    }

    /// `None` when the id is unknown, matching the legacy query contract
    pub fn order(&self, order_id: i64) -> OrderResult<Option<Order>> {
        match self.orders.get_order(order_id) {
            Ok(order) => Ok(Some(order)),
            Err(OrderError::OrderNotFound(_)) => Ok(None),
            Err(err) => Err(err),
        }
    }

    pub fn orderitems(&self) -> OrderResult<Vec<OrderItem>> {
        self.ledger.list_items()
    }

    pub fn orderitem(&self, orderitem_id: i64) -> OrderResult<Option<OrderItem>> {
        match self.ledger.get_item(orderitem_id) {
            Ok(item) => Ok(Some(item)),
            Err(OrderError::ItemNotFound(_)) => Ok(None),
            Err(err) => Err(err),
        }
    }

    pub fn get_unpaid_orders(&self) -> OrderResult<Vec<UnpaidOrder>> {
        orders::list_unpaid_orders(&self.store)
    }

    /// Catalog price after its discount percentage, for presentation.
    /// Discounts never alter stored line amounts.
    pub async fn calculate_discounted_price(&self, menu_id: i64) -> OrderResult<f64> {
        let menu = self.catalog.menu_item(menu_id).await?;
        Ok(money::to_f64(money::discounted_price(
            menu.price,
            menu.discount,
        )?))
    }

    pub fn order_billing(&self, order_id: i64) -> OrderResult<BillingSnapshot> {
        self.ledger.billing(order_id)
    }
}
