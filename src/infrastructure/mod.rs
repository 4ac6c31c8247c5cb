//! Adapters implementing the billing client port.

pub mod in_memory;
pub mod stripe;
