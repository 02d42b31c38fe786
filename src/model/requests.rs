/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 19/10/26
******************************************************************************/
use crate::error::AppError;
use crate::utils::id::client_order_id;
use pretty_simple_display::{DebugPretty, DisplaySimple};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Geographic location of a pickup or drop-off point
#[derive(DebugPretty, DisplaySimple, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Location {
    /// Full street address
    pub address: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Postal code, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postalcode: Option<String>,
}

impl Location {
    /// Creates a location from an address and coordinates
    pub fn new(address: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            address: address.into(),
            latitude,
            longitude,
            postalcode: None,
        }
    }
}

/// Sender or recipient of an order
#[derive(DebugPretty, DisplaySimple, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Contact {
    /// Display name
    pub name: String,
    /// Phone number including country prefix
    pub phone_number: String,
    /// Where the courier picks up or drops off
    pub location: Location,
    /// Free text instructions for the courier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Outlet id of the sender, when the pickup is a registered outlet
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_vendor_id: Option<String>,
}

impl Contact {
    /// Creates a contact
    pub fn new(name: impl Into<String>, phone_number: impl Into<String>, location: Location) -> Self {
        Self {
            name: name.into(),
            phone_number: phone_number.into(),
            location,
            notes: None,
            client_vendor_id: None,
        }
    }

    /// Sets courier notes
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Sets the outlet id used as pickup point
    #[must_use]
    pub fn with_client_vendor_id(mut self, id: impl Into<String>) -> Self {
        self.client_vendor_id = Some(id.into());
        self
    }
}

/// How the recipient pays for the order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    /// Already paid
    #[default]
    Paid,
    /// Courier collects the amount on delivery
    CashOnDelivery,
}

/// Optional checks the courier performs on delivery
#[derive(DebugPretty, DisplaySimple, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct DeliveryTasks {
    /// Recipient age must be verified
    pub age_validation_required: bool,
}

/// Body of the estimate-fee, estimate-time and submit-order endpoints
#[derive(DebugPretty, DisplaySimple, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderRequest {
    /// Caller side order reference
    pub client_order_id: String,
    /// Pickup party
    pub sender: Contact,
    /// Drop-off party
    pub recipient: Contact,
    /// Order value
    pub amount: f64,
    /// Payment method
    pub payment_method: PaymentMethod,
    /// Description of the goods
    pub description: String,
    /// Whether an insulated bag is required
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cold_bag_needed: Option<bool>,
    /// Amount to collect from the recipient, cash on delivery only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collect_from_customer: Option<f64>,
    /// Unix timestamp for scheduled orders
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preordered_for: Option<i64>,
    /// Extra delivery checks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_tasks: Option<DeliveryTasks>,
}

impl OrderRequest {
    /// Creates a prepaid order with a freshly generated `client_order_id`
    pub fn new(
        sender: Contact,
        recipient: Contact,
        amount: f64,
        description: impl Into<String>,
    ) -> Self {
        Self {
            client_order_id: client_order_id(),
            sender,
            recipient,
            amount,
            payment_method: PaymentMethod::Paid,
            description: description.into(),
            cold_bag_needed: None,
            collect_from_customer: None,
            preordered_for: None,
            delivery_tasks: None,
        }
    }

    /// Overrides the generated order reference
    #[must_use]
    pub fn with_client_order_id(mut self, id: impl Into<String>) -> Self {
        self.client_order_id = id.into();
        self
    }

    /// Switches to cash on delivery, collecting `amount` from the recipient
    #[must_use]
    pub fn with_cash_on_delivery(mut self, amount: f64) -> Self {
        self.payment_method = PaymentMethod::CashOnDelivery;
        self.collect_from_customer = Some(amount);
        self
    }

    /// Requests an insulated bag
    #[must_use]
    pub fn with_cold_bag(mut self, needed: bool) -> Self {
        self.cold_bag_needed = Some(needed);
        self
    }

    /// Schedules the order for a unix timestamp
    #[must_use]
    pub fn with_preorder(mut self, timestamp: i64) -> Self {
        self.preordered_for = Some(timestamp);
        self
    }
}

/// Reason sent when cancelling an order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CancelReason {
    /// Estimated delivery takes too long
    DeliveryEtaTooLong,
    /// Order was placed by mistake
    MistakeError,
    /// No specific reason
    #[default]
    ReasonUnknown,
}

impl CancelReason {
    /// Wire representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            CancelReason::DeliveryEtaTooLong => "DELIVERY_ETA_TOO_LONG",
            CancelReason::MistakeError => "MISTAKE_ERROR",
            CancelReason::ReasonUnknown => "REASON_UNKNOWN",
        }
    }
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CancelReason {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DELIVERY_ETA_TOO_LONG" => Ok(CancelReason::DeliveryEtaTooLong),
            "MISTAKE_ERROR" => Ok(CancelReason::MistakeError),
            "REASON_UNKNOWN" => Ok(CancelReason::ReasonUnknown),
            other => Err(AppError::InvalidInput(format!(
                "unknown cancel reason '{other}'"
            ))),
        }
    }
}

/// Body of `DELETE /orders/{order_id}`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct CancelOrderRequest {
    /// Cancellation reason
    pub reason: CancelReason,
}

/// Webhook event pushed to `POST /callback`
#[derive(DebugPretty, DisplaySimple, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CallbackEvent {
    /// pandago order id
    pub order_id: String,
    /// Caller side order reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_order_id: Option<String>,
    /// New order status
    pub status: String,
    /// Unix timestamp of the status change
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    /// Human readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Any other fields of the event, forwarded untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Merchant outlet, sent to and returned by the outlet endpoints
#[derive(DebugPretty, DisplaySimple, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Outlet {
    /// Outlet display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Full address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Street name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    /// Street number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street_number: Option<String>,
    /// Building name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub building: Option<String>,
    /// District
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    /// Postal code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    /// City
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// Latitude in decimal degrees
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    /// Longitude in decimal degrees
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    /// Contact phone number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    /// ISO currency code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// Locale, e.g. `zh-TW`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    /// Free text description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Instructions shown to couriers at pickup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rider_instructions: Option<String>,
    /// Whether the outlet serves halal food
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub halal: Option<bool>,
    /// Fields not modelled above
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
