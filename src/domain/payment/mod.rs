//! Payment domain - purchasable services and merchant order numbers.
//!
//! The core never stores or mutates orders; it only knows which services can
//! be bought, which agent each one unlocks, and how order numbers are formed.

mod order;
mod service;

pub use order::{openid_suffix, order_number, OPENID_SUFFIX_LEN};
pub use service::{PaidService, UnknownServiceError};
