use crate::error::AppError;
use crate::model::requests::{CallbackEvent, CancelReason, OrderRequest};
use crate::model::responses::{CourierLocation, FeeEstimate, Order, TimeEstimate};
use async_trait::async_trait;
use serde_json::Value;

#[async_trait]
/// Service for estimating, submitting, tracking and cancelling delivery orders
///
/// This trait defines the interface for the pandago order endpoints. Every
/// call is authenticated and retried on token rejection by the implementor.
pub trait OrderService: Send + Sync {
    /// Estimates the delivery fee of an order without creating it
    async fn estimate_fee(&self, order: &OrderRequest) -> Result<FeeEstimate, AppError>;

    /// Estimates pickup and delivery times of an order without creating it
    async fn estimate_time(&self, order: &OrderRequest) -> Result<TimeEstimate, AppError>;

    /// Submits a new order
    ///
    /// Returns `None` when the server accepted the order with an empty body.
    async fn submit_order(&self, order: &OrderRequest) -> Result<Option<Order>, AppError>;

    /// Gets an order by its pandago id
    async fn get_order(&self, order_id: &str) -> Result<Order, AppError>;

    /// Cancels an order, with [`CancelReason::ReasonUnknown`] when no reason is given
    async fn cancel_order(
        &self,
        order_id: &str,
        reason: Option<CancelReason>,
    ) -> Result<Value, AppError>;

    /// Gets the current coordinates of the courier delivering an order
    async fn get_courier_location(&self, order_id: &str) -> Result<CourierLocation, AppError>;

    /// Pushes a webhook callback event
    async fn callback(&self, event: &CallbackEvent) -> Result<Value, AppError>;
}
