//! Value Objects and the shared pricing rule

use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

use crate::StoreError;

/// Orders at or above this subtotal ship free (smallest currency unit).
pub const FREE_SHIPPING_THRESHOLD: i64 = 50_000;
/// Flat fee charged below the free-shipping threshold.
pub const STANDARD_SHIPPING_FEE: i64 = 3_000;

/// Shipping fee as a pure function of the subtotal. An empty cart
/// (subtotal 0) ships nothing and is charged nothing.
pub fn shipping_fee(subtotal: i64) -> i64 {
    if subtotal == 0 || subtotal >= FREE_SHIPPING_THRESHOLD {
        0
    } else {
        STANDARD_SHIPPING_FEE
    }
}

/// Subtotal, fee, and final total for a set of line items. Cart summary and
/// checkout both derive their figures here so the two can never disagree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub subtotal: i64,
    pub shipping_fee: i64,
    pub final_total: i64,
}

impl Totals {
    pub fn from_subtotal(subtotal: i64) -> Self {
        let fee = shipping_fee(subtotal);
        Self { subtotal, shipping_fee: fee, final_total: subtotal + fee }
    }
}

/// Delivery destination captured at checkout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ShippingInfo {
    #[validate(length(min = 1, message = "receiverName"))]
    pub receiver_name: String,
    #[validate(length(min = 1, message = "address"))]
    pub address: String,
    #[validate(length(min = 1, message = "phone"))]
    pub phone: String,
    /// Optional delivery note ("leave at the door", etc.)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<String>,
}

impl ShippingInfo {
    /// Required-field check, surfacing every missing field in one message.
    pub fn check_required(&self) -> crate::Result<()> {
        if let Err(errors) = self.validate() {
            let mut missing: Vec<&str> = errors
                .field_errors()
                .into_values()
                .flatten()
                .filter_map(|e| e.message.as_deref())
                .collect();
            missing.sort_unstable();
            return Err(StoreError::Validation(format!(
                "shipping info is missing required fields: {}",
                missing.join(", ")
            )));
        }
        Ok(())
    }

    /// Stand-in used when a stored order predates shipping capture.
    pub fn placeholder() -> Self {
        Self {
            receiver_name: "Guest".to_string(),
            address: "address on file".to_string(),
            phone: "010-0000-0000".to_string(),
            request: Some("leave at the door if absent".to_string()),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Card,
    BankTransfer,
    VirtualAccount,
    MobilePay,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Card => "card",
            Self::BankTransfer => "bank transfer",
            Self::VirtualAccount => "virtual account",
            Self::MobilePay => "mobile pay",
        };
        write!(f, "{label}")
    }
}
