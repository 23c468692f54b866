//! # Order Enrichment Server
//! This module hosts the HTTP surface of the order enrichment gateway. It is responsible for:
//! Listening for incoming order creation requests and writing them to the primary store.
//! Accepting change-event batches on the stream trigger endpoint and handing them to the stream consumer.
//! Wiring the in-process change feed so that a stored order flows through the enrichment pipeline on its own.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/orders`: The order creation endpoint. POST only; other methods receive a 405.
//! * `/stream/batch`: The stream trigger endpoint for externally delivered change-event batches.
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
