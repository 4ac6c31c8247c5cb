//! Domain layer: the provider's records, the client port, and the safety gate.

pub mod ports;
pub mod price;
pub mod product;
pub mod safety;
