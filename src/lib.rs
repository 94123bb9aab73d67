//! Storefront Payments - Payment provider integration layer
//!
//! This crate connects the storefront backend to external checkout
//! providers (Ping crypto checkout and Stripe). It creates hosted checkout
//! sessions, reads them back, and authenticates inbound webhooks.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
