//! Instance discovery
//!
//! Lists every live instance of every catalogued resource type.

mod enumerator;

pub use enumerator::{Enumeration, TypeFailure, enumerate_instances};
