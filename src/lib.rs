//! Medagent - Medical Intent Routing Service
//!
//! This crate classifies free-text medical questions, routes them to a
//! specialized prompt agent, and forwards the composed conversation to a
//! remote language model. Secondary endpoints cover report interpretation,
//! skin photo consultation, and the payment flow for monetized agents.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
