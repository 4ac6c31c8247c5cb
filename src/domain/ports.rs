use super::price::{Price, PriceUpdate};
use super::product::{Product, ProductUpdate};
use crate::error::Result;
use async_trait::async_trait;

/// The billing provider as seen by the cleanup procedure.
///
/// Implementations issue exactly one remote call per method invocation and
/// never retry on their own.
#[async_trait]
pub trait BillingClient: Send + Sync {
    /// Returns a single page of at most `limit` products.
    async fn list_products(&self, limit: u8) -> Result<Vec<Product>>;
    async fn update_product(&self, id: &str, update: ProductUpdate) -> Result<Product>;
    /// Returns a single page of at most `limit` prices.
    async fn list_prices(&self, limit: u8) -> Result<Vec<Price>>;
    async fn update_price(&self, id: &str, update: PriceUpdate) -> Result<Price>;
}

pub type BillingClientBox = Box<dyn BillingClient>;
