//! Order data model: the entity, its list queries, and ETA helpers.

pub mod eta;
pub mod order;
pub mod query;

pub use eta::*;
pub use order::*;
pub use query::*;
