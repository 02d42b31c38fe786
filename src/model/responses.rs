/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 19/10/26
******************************************************************************/
use crate::model::requests::{CancelReason, Contact, PaymentMethod};
use pretty_simple_display::{DebugPretty, DisplaySimple};
use serde::{Deserialize, Serialize};

/// Response of `POST /orders/fee`
#[derive(DebugPretty, DisplaySimple, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct FeeEstimate {
    /// Caller side order reference
    #[serde(default)]
    pub client_order_id: Option<String>,
    /// Estimated delivery fee in the outlet currency
    #[serde(default)]
    pub estimated_delivery_fee: Option<f64>,
}

/// Response of `POST /orders/time`
#[derive(DebugPretty, DisplaySimple, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct TimeEstimate {
    /// Caller side order reference
    #[serde(default)]
    pub client_order_id: Option<String>,
    /// Expected pickup time (RFC 3339)
    #[serde(default)]
    pub estimated_pickup_time: Option<String>,
    /// Expected delivery time (RFC 3339)
    #[serde(default)]
    pub estimated_delivery_time: Option<String>,
}

/// Lifecycle status of an order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Order created
    New,
    /// Order received by pandago
    Received,
    /// Looking for a courier
    WaitingForTransport,
    /// Courier assigned
    AssignedToTransport,
    /// Courier accepted the delivery
    CourierAcceptedDelivery,
    /// Courier is close to the pickup point
    NearVendor,
    /// Goods picked up
    PickedUp,
    /// Courier left the pickup point
    CourierLeftVendor,
    /// Courier is close to the drop-off point
    NearCustomer,
    /// Delivered
    Delivered,
    /// Delivery delayed
    Delayed,
    /// Order cancelled
    Cancelled,
    /// Status not known to this client version
    #[default]
    #[serde(other)]
    Unknown,
}

/// Estimated times attached to an order
#[derive(DebugPretty, DisplaySimple, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Timeline {
    /// Expected pickup time (RFC 3339)
    #[serde(default)]
    pub estimated_pickup_time: Option<String>,
    /// Expected delivery time (RFC 3339)
    #[serde(default)]
    pub estimated_delivery_time: Option<String>,
}

/// Courier assigned to an order
#[derive(DebugPretty, DisplaySimple, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Driver {
    /// Courier id
    #[serde(default)]
    pub id: Option<String>,
    /// Courier name
    #[serde(default)]
    pub name: Option<String>,
    /// Courier phone number
    #[serde(default)]
    pub phone_number: Option<String>,
}

/// Cancellation details of a cancelled order
#[derive(DebugPretty, DisplaySimple, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Cancellation {
    /// Who cancelled the order
    #[serde(default)]
    pub source: Option<String>,
    /// Why it was cancelled
    #[serde(default)]
    pub reason: Option<CancelReason>,
}

/// Order as returned by the submit and get endpoints
#[derive(DebugPretty, DisplaySimple, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Order {
    /// pandago order id
    #[serde(default)]
    pub order_id: Option<String>,
    /// Caller side order reference
    #[serde(default)]
    pub client_order_id: Option<String>,
    /// Pickup party
    #[serde(default)]
    pub sender: Option<Contact>,
    /// Drop-off party
    #[serde(default)]
    pub recipient: Option<Contact>,
    /// Distance in meters
    #[serde(default)]
    pub distance: Option<f64>,
    /// Order value
    #[serde(default)]
    pub amount: Option<f64>,
    /// Payment method
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    /// Description of the goods
    #[serde(default)]
    pub description: Option<String>,
    /// Current status
    #[serde(default)]
    pub status: OrderStatus,
    /// Cancellation details
    #[serde(default)]
    pub cancellation: Option<Cancellation>,
    /// Delivery fee charged
    #[serde(default)]
    pub delivery_fee: Option<f64>,
    /// Estimated times
    #[serde(default)]
    pub timeline: Option<Timeline>,
    /// Assigned courier
    #[serde(default)]
    pub driver: Option<Driver>,
    /// Public tracking page
    #[serde(default)]
    pub tracking_link: Option<String>,
}

/// Response of `GET /orders/{order_id}/coordinates`
#[derive(DebugPretty, DisplaySimple, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CourierLocation {
    /// Caller side order reference
    #[serde(default)]
    pub client_order_id: Option<String>,
    /// Latitude in decimal degrees
    #[serde(default)]
    pub latitude: Option<f64>,
    /// Longitude in decimal degrees
    #[serde(default)]
    pub longitude: Option<f64>,
    /// Unix timestamp of the fix
    #[serde(default)]
    pub updated_at: Option<i64>,
}
