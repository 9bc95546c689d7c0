//! Service layer for business logic
//!
//! Ties catalog building, discovery and ordering into a single call the
//! binary (or any library consumer) can drive with a cluster source.

pub mod ordering_service;

pub use ordering_service::{RestoreOrder, RestoreOrderOptions, RestoreOrderService};
