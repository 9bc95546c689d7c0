//! Ownership graph, rank ordering and projection to resource names

mod ownership;
mod ordering;
mod projection;

pub use ordering::{Direction, OrderingOptions, group_by_rank, order_kinds, rank_kinds};
pub use ownership::OwnershipMap;
pub use projection::project;
