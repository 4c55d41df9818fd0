//! askdb - natural-language query engine over fixed in-memory tables.
//!
//! Turns a free-text question into a typed intent, compiles that intent
//! into an executable plan, and runs the plan against a small read-only
//! table store (`users`, `products`, `orders`).
//!
//! Can be used as:
//! - Library: build a [`engine::QueryEngine`] over a [`store::TableStore`]
//! - CLI: `askdb ask "average price"`
//! - HTTP service: `askdb serve` (see [`server`])

pub mod config;
pub mod engine;
pub mod exec;
pub mod intent;
pub mod plan;
pub mod server;
pub mod store;
pub mod types;
