//! HTTP client layer — `PriceHttp` for snapshot fetches.
//!
//! No retry policy: a failed fetch is reported to the caller and the next
//! refresh tick is the only retry.

pub mod client;

pub use client::PriceHttp;
