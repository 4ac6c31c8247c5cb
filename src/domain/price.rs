use serde::{Deserialize, Deserializer, Serialize};

/// A price attached to a product.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone)]
pub struct Price {
    pub id: String,
    pub active: bool,
    /// Product id. The provider returns either a bare id or, when expanded,
    /// the whole product object.
    #[serde(default, deserialize_with = "deserialize_product_ref")]
    pub product: Option<String>,
}

impl Price {
    pub fn needs_deactivation(&self) -> bool {
        self.active
    }
}

/// Fields sent when updating a price.
#[derive(Debug, Serialize, PartialEq, Eq, Clone, Copy)]
pub struct PriceUpdate {
    pub active: bool,
}

impl PriceUpdate {
    pub const DEACTIVATE: Self = Self { active: false };
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ProductRef {
    Id(String),
    Expanded { id: String },
}

fn deserialize_product_ref<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let reference = Option::<ProductRef>::deserialize(deserializer)?;
    Ok(reference.map(|r| match r {
        ProductRef::Id(id) | ProductRef::Expanded { id } => id,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_with_product_id() {
        let json = r#"{"id":"price_1","object":"price","active":true,"product":"prod_1","unit_amount":500}"#;
        let price: Price = serde_json::from_str(json).unwrap();

        assert_eq!(price.product.as_deref(), Some("prod_1"));
        assert!(price.needs_deactivation());
    }

    #[test]
    fn test_price_with_expanded_product() {
        let json = r#"{"id":"price_2","active":false,"product":{"id":"prod_9","name":"Pro"}}"#;
        let price: Price = serde_json::from_str(json).unwrap();

        assert_eq!(price.product.as_deref(), Some("prod_9"));
        assert!(!price.needs_deactivation());
    }
}
