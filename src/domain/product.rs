use serde::{Deserialize, Serialize};

/// A catalog product as returned by the billing provider.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone)]
pub struct Product {
    pub id: String,
    /// Providers may omit the name on some objects.
    #[serde(default)]
    pub name: String,
    pub active: bool,
}

/// Fields sent when updating a product.
#[derive(Debug, Serialize, PartialEq, Eq, Clone, Copy)]
pub struct ProductUpdate {
    pub active: bool,
}

impl ProductUpdate {
    pub const ARCHIVE: Self = Self { active: false };
}
