//! Flow table: the immutable mapping from conversation state to its prompt.
//!
//! - `registry` -- `FlowRegistry` lookup, enumeration and validation
//! - `defaults` -- the built-in menu shipped with the service

pub mod defaults;
pub mod registry;

pub use registry::FlowRegistry;
