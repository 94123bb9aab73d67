//! Provider-side checkout session status.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::CheckoutError;

/// Lifecycle status of a checkout session, as reported by the provider.
///
/// The session is owned by the provider; this layer only reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProviderSessionStatus {
    /// Session created, customer has not started paying.
    Created,

    /// Payment submitted, awaiting confirmation.
    Pending,

    /// Payment confirmed.
    Completed,

    /// Session timed out before payment.
    Expired,

    /// Customer or merchant cancelled the session.
    Cancelled,
}

impl ProviderSessionStatus {
    /// Lowercase form exposed to callers of `get_session`.
    pub fn as_lowercase(&self) -> &'static str {
        match self {
            ProviderSessionStatus::Created => "created",
            ProviderSessionStatus::Pending => "pending",
            ProviderSessionStatus::Completed => "completed",
            ProviderSessionStatus::Expired => "expired",
            ProviderSessionStatus::Cancelled => "cancelled",
        }
    }

    pub fn payment_status(&self) -> PaymentStatus {
        PaymentStatus::from_completed(*self == ProviderSessionStatus::Completed)
    }

    /// Returns true once the session can no longer change.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ProviderSessionStatus::Completed
                | ProviderSessionStatus::Expired
                | ProviderSessionStatus::Cancelled
        )
    }
}

impl FromStr for ProviderSessionStatus {
    type Err = CheckoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "CREATED" => Ok(ProviderSessionStatus::Created),
            "PENDING" => Ok(ProviderSessionStatus::Pending),
            "COMPLETED" => Ok(ProviderSessionStatus::Completed),
            "EXPIRED" => Ok(ProviderSessionStatus::Expired),
            "CANCELLED" | "CANCELED" => Ok(ProviderSessionStatus::Cancelled),
            _ => Err(CheckoutError::UnknownStatus(s.to_string())),
        }
    }
}

/// Whether the customer has paid for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Paid,
    Unpaid,
}

impl PaymentStatus {
    pub fn from_completed(completed: bool) -> Self {
        if completed {
            PaymentStatus::Paid
        } else {
            PaymentStatus::Unpaid
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Paid => "paid",
            PaymentStatus::Unpaid => "unpaid",
        }
    }
}
