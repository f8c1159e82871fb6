//! Domain modules organized as vertical slices.
//!
//! Each sub-module contains:
//! - `mod.rs` — Rich domain types (validated, business-logic-ready)
//! - `wire.rs` — Raw serde structs matching relay responses and command bodies
//! - `convert.rs` — `From` conversions with validation
//! - `state.rs` — App-owned state containers with update methods
//! - `client.rs` — HTTP-backed sources

pub mod price;
pub mod transaction;
pub mod wallet;
