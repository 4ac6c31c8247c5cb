use crate::domain::ports::BillingClient;
use crate::domain::price::{Price, PriceUpdate};
use crate::domain::product::{Product, ProductUpdate};
use crate::error::{BillingError, Result};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A remote call as observed by [`InMemoryBillingClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListProducts { limit: u8 },
    UpdateProduct { id: String, active: bool },
    ListPrices { limit: u8 },
    UpdatePrice { id: String, active: bool },
}

#[derive(Default)]
struct Account {
    products: Vec<Product>,
    prices: Vec<Price>,
    calls: Vec<Call>,
    failing_ids: HashSet<String>,
    fail_product_listing: bool,
    fail_price_listing: bool,
}

/// An in-process billing account.
///
/// Serves listings from its own records, applies updates to them and keeps a
/// log of every call. Clones share the same account, so a test can hand one
/// clone to the cleanup procedure and inspect the other afterwards.
#[derive(Default, Clone)]
pub struct InMemoryBillingClient {
    account: Arc<RwLock<Account>>,
}

impl InMemoryBillingClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(products: Vec<Product>, prices: Vec<Price>) -> Self {
        Self {
            account: Arc::new(RwLock::new(Account {
                products,
                prices,
                ..Account::default()
            })),
        }
    }

    /// Makes every update of the record with this id fail.
    pub async fn fail_updates_for(&self, id: &str) {
        self.account.write().await.failing_ids.insert(id.to_string());
    }

    pub async fn fail_product_listing(&self) {
        self.account.write().await.fail_product_listing = true;
    }

    pub async fn fail_price_listing(&self) {
        self.account.write().await.fail_price_listing = true;
    }

    pub async fn calls(&self) -> Vec<Call> {
        self.account.read().await.calls.clone()
    }

    pub async fn products(&self) -> Vec<Product> {
        self.account.read().await.products.clone()
    }

    pub async fn prices(&self) -> Vec<Price> {
        self.account.read().await.prices.clone()
    }
}

fn not_found(kind: &str, id: &str) -> BillingError {
    BillingError::Api {
        status: 404,
        message: format!("No such {kind}: '{id}'"),
    }
}

#[async_trait]
impl BillingClient for InMemoryBillingClient {
    async fn list_products(&self, limit: u8) -> Result<Vec<Product>> {
        let mut account = self.account.write().await;
        account.calls.push(Call::ListProducts { limit });
        if account.fail_product_listing {
            return Err(BillingError::Rejected("product listing unavailable".to_string()));
        }
        Ok(account.products.iter().take(limit as usize).cloned().collect())
    }

    async fn update_product(&self, id: &str, update: ProductUpdate) -> Result<Product> {
        let mut account = self.account.write().await;
        account.calls.push(Call::UpdateProduct {
            id: id.to_string(),
            active: update.active,
        });
        if account.failing_ids.contains(id) {
            return Err(BillingError::Rejected(format!("update of {id} rejected")));
        }
        let product = account
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| not_found("product", id))?;
        product.active = update.active;
        Ok(product.clone())
    }

    async fn list_prices(&self, limit: u8) -> Result<Vec<Price>> {
        let mut account = self.account.write().await;
        account.calls.push(Call::ListPrices { limit });
        if account.fail_price_listing {
            return Err(BillingError::Rejected("price listing unavailable".to_string()));
        }
        Ok(account.prices.iter().take(limit as usize).cloned().collect())
    }

    async fn update_price(&self, id: &str, update: PriceUpdate) -> Result<Price> {
        let mut account = self.account.write().await;
        account.calls.push(Call::UpdatePrice {
            id: id.to_string(),
            active: update.active,
        });
        if account.failing_ids.contains(id) {
            return Err(BillingError::Rejected(format!("update of {id} rejected")));
        }
        let price = account
            .prices
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| not_found("price", id))?;
        price.active = update.active;
        Ok(price.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, active: bool) -> Product {
        Product {
            id: id.to_string(),
            name: format!("{id} name"),
            active,
        }
    }

    #[tokio::test]
    async fn test_listing_respects_limit() {
        let products = (0..150).map(|i| product(&format!("prod_{i}"), true)).collect();
        let client = InMemoryBillingClient::with_records(products, vec![]);

        let page = client.list_products(100).await.unwrap();
        assert_eq!(page.len(), 100);
        assert_eq!(client.calls().await, vec![Call::ListProducts { limit: 100 }]);
    }

    #[tokio::test]
    async fn test_update_applies_and_records() {
        let client = InMemoryBillingClient::with_records(vec![product("prod_1", true)], vec![]);

        let updated = client
            .update_product("prod_1", ProductUpdate::ARCHIVE)
            .await
            .unwrap();
        assert!(!updated.active);
        assert!(!client.products().await[0].active);
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let client = InMemoryBillingClient::new();
        let err = client
            .update_price("price_missing", PriceUpdate::DEACTIVATE)
            .await
            .unwrap_err();
        assert!(matches!(err, BillingError::Api { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_injected_failure_leaves_record_untouched() {
        let client = InMemoryBillingClient::with_records(vec![product("prod_1", true)], vec![]);
        client.fail_updates_for("prod_1").await;

        assert!(client.update_product("prod_1", ProductUpdate::ARCHIVE).await.is_err());
        assert!(client.products().await[0].active);
    }
}
