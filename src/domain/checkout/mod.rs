//! Checkout domain module.
//!
//! Provider-neutral value types used when translating a checkout request
//! into a provider's wire format and reading sessions back.
//!
//! # Module Structure
//!
//! - `amount` - Rounding to whole or minor currency units
//! - `currency` - Validated ISO 4217 codes
//! - `status` - Provider session status and derived payment status

mod amount;
mod currency;
mod errors;
mod status;

pub use amount::{format_whole_units, to_minor_units};
pub use currency::CurrencyCode;
pub use errors::CheckoutError;
pub use status::{PaymentStatus, ProviderSessionStatus};
