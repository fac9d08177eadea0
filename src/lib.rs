//! specnav: synchronized outline navigation for API reference documents.
//!
//! An already-resolved API description (tags, operations, parameters,
//! schemas, responses) becomes an arena of menu nodes, flattened into one
//! navigable sequence; a store then keeps scroll position, navigation
//! history and nested disclosure state consistent with a single active item.

pub mod channels;
pub mod config;
pub mod document;
pub mod error;
pub mod flatten;
pub mod node;
pub mod resolved;
pub mod store;
