//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (response envelope, lenient JSON parsing, upload rules)
//! - `agents` - Specialized agents, their catalog and registry, intent interpretation
//! - `payment` - Purchasable services and merchant order numbers

pub mod agents;
pub mod foundation;
pub mod payment;
