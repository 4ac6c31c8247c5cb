use crate::config::{CleanupConfig, PAGE_LIMIT};
use crate::domain::ports::BillingClientBox;
use crate::domain::price::PriceUpdate;
use crate::domain::product::ProductUpdate;
use crate::domain::safety::{self, CONFIRMATION_VAR, Clearance};
use crate::error::ConfigError;
use crate::observability::NOTICE_TARGET;
use tracing::{error, info, warn};

/// Result of a single update call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    Updated,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemResult {
    pub id: String,
    pub outcome: ItemOutcome,
}

/// What happened during one phase (products or prices).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhaseReport {
    /// Records returned by the listing call; zero when listing failed.
    pub listed: usize,
    /// Set when the listing call itself failed and no update was attempted.
    pub listing_error: Option<String>,
    /// Records left alone because they needed no change.
    pub skipped: usize,
    pub items: Vec<ItemResult>,
}

impl PhaseReport {
    pub fn updated(&self) -> usize {
        self.items
            .iter()
            .filter(|item| item.outcome == ItemOutcome::Updated)
            .count()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &str)> {
        self.items.iter().filter_map(|item| match &item.outcome {
            ItemOutcome::Failed(reason) => Some((item.id.as_str(), reason.as_str())),
            ItemOutcome::Updated => None,
        })
    }

    pub fn is_clean(&self) -> bool {
        self.listing_error.is_none() && self.failures().next().is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupReport {
    pub products: PhaseReport,
    pub prices: PhaseReport,
}

impl CleanupReport {
    pub fn is_clean(&self) -> bool {
        self.products.is_clean() && self.prices.is_clean()
    }
}

/// Runs the safety gate, logging the production warning when it applies.
pub fn authorize(config: &CleanupConfig) -> Result<Clearance, ConfigError> {
    let clearance = safety::check(
        config.credential.expose(),
        config.confirmation.as_deref(),
    )?;

    if clearance == Clearance::ConfirmedProduction {
        warn!(
            target: NOTICE_TARGET,
            "CAUTION: Running cleanup on what appears to be a PRODUCTION environment"
        );
        warn!(
            target: NOTICE_TARGET,
            "Proceeding because {CONFIRMATION_VAR} is set correctly."
        );
    }

    Ok(clearance)
}

/// Gates on `config`, then archives products and deactivates prices through
/// `client`. When the gate refuses, `client` is never called.
pub async fn cleanup(
    config: &CleanupConfig,
    client: BillingClientBox,
) -> Result<CleanupReport, ConfigError> {
    authorize(config)?;
    Ok(CleanupRunner::new(client).run().await)
}

/// Drives the two cleanup phases against a billing client.
///
/// Calls are strictly sequential: each update is awaited before the next one
/// is issued. No failure is retried and none stops the run.
pub struct CleanupRunner {
    client: BillingClientBox,
}

impl CleanupRunner {
    pub fn new(client: BillingClientBox) -> Self {
        Self { client }
    }

    pub async fn run(&self) -> CleanupReport {
        info!("Starting cleanup of Stripe products and prices...");

        let products = self.archive_products().await;
        let prices = self.deactivate_prices().await;

        let report = CleanupReport { products, prices };
        info!(
            target: NOTICE_TARGET,
            products_archived = report.products.updated(),
            prices_deactivated = report.prices.updated(),
            prices_skipped = report.prices.skipped,
            failures = report.products.failures().count() + report.prices.failures().count(),
            "Cleanup complete!"
        );
        report
    }

    /// Sets `active: false` on every listed product, whatever its current state.
    pub async fn archive_products(&self) -> PhaseReport {
        let mut report = PhaseReport::default();

        info!("Fetching products...");
        let products = match self.client.list_products(PAGE_LIMIT).await {
            Ok(products) => products,
            Err(e) => {
                error!(error = %e, "Error archiving products: could not list products");
                report.listing_error = Some(e.to_string());
                return report;
            }
        };

        report.listed = products.len();
        info!("Found {} products. Archiving...", products.len());

        for product in products {
            info!("Archiving product: {} ({})", product.id, product.name);
            let outcome = match self
                .client
                .update_product(&product.id, ProductUpdate::ARCHIVE)
                .await
            {
                Ok(_) => ItemOutcome::Updated,
                Err(e) => {
                    error!(product_id = %product.id, error = %e, "Error archiving product");
                    ItemOutcome::Failed(e.to_string())
                }
            };
            report.items.push(ItemResult {
                id: product.id,
                outcome,
            });
        }

        if report.is_clean() {
            info!("All products archived successfully.");
        } else {
            error!(
                failed = report.failures().count(),
                "Some products could not be archived"
            );
        }
        report
    }

    /// Sets `active: false` on every listed price that is still active.
    pub async fn deactivate_prices(&self) -> PhaseReport {
        let mut report = PhaseReport::default();

        info!("Fetching prices...");
        let prices = match self.client.list_prices(PAGE_LIMIT).await {
            Ok(prices) => prices,
            Err(e) => {
                error!(error = %e, "Error deactivating prices: could not list prices");
                report.listing_error = Some(e.to_string());
                return report;
            }
        };

        report.listed = prices.len();
        info!("Found {} prices. Deactivating...", prices.len());

        for price in prices {
            if !price.needs_deactivation() {
                report.skipped += 1;
                continue;
            }

            info!("Deactivating price: {}", price.id);
            let outcome = match self
                .client
                .update_price(&price.id, PriceUpdate::DEACTIVATE)
                .await
            {
                Ok(_) => ItemOutcome::Updated,
                Err(e) => {
                    error!(price_id = %price.id, error = %e, "Error deactivating price");
                    ItemOutcome::Failed(e.to_string())
                }
            };
            report.items.push(ItemResult {
                id: price.id,
                outcome,
            });
        }

        if report.is_clean() {
            info!("All prices deactivated successfully.");
        } else {
            error!(
                failed = report.failures().count(),
                "Some prices could not be deactivated"
            );
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Credential;
    use crate::domain::price::Price;
    use crate::domain::product::Product;
    use crate::infrastructure::in_memory::{Call, InMemoryBillingClient};

    fn product(id: &str, active: bool) -> Product {
        Product {
            id: id.to_string(),
            name: id.to_uppercase(),
            active,
        }
    }

    fn price(id: &str, active: bool) -> Price {
        Price {
            id: id.to_string(),
            active,
            product: Some("prod_1".to_string()),
        }
    }

    #[tokio::test]
    async fn test_every_product_is_archived() {
        let client = InMemoryBillingClient::with_records(
            vec![product("prod_1", true), product("prod_2", false), product("prod_3", true)],
            vec![],
        );
        let runner = CleanupRunner::new(Box::new(client.clone()));

        let report = runner.archive_products().await;

        assert_eq!(report.listed, 3);
        assert_eq!(report.updated(), 3);
        let updates: Vec<_> = client
            .calls()
            .await
            .into_iter()
            .filter(|c| matches!(c, Call::UpdateProduct { .. }))
            .collect();
        assert_eq!(
            updates,
            vec![
                Call::UpdateProduct { id: "prod_1".into(), active: false },
                Call::UpdateProduct { id: "prod_2".into(), active: false },
                Call::UpdateProduct { id: "prod_3".into(), active: false },
            ]
        );
    }

    #[tokio::test]
    async fn test_only_active_prices_are_updated() {
        let client = InMemoryBillingClient::with_records(
            vec![],
            vec![price("price_1", true), price("price_2", false), price("price_3", true)],
        );
        let runner = CleanupRunner::new(Box::new(client.clone()));

        let report = runner.deactivate_prices().await;

        assert_eq!(report.listed, 3);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.updated(), 2);
        assert!(!client
            .calls()
            .await
            .contains(&Call::UpdatePrice { id: "price_2".into(), active: false }));
    }

    #[tokio::test]
    async fn test_product_failure_does_not_stop_phase() {
        let client = InMemoryBillingClient::with_records(
            vec![product("prod_1", true), product("prod_2", true), product("prod_3", true)],
            vec![price("price_1", true)],
        );
        client.fail_updates_for("prod_2").await;
        let runner = CleanupRunner::new(Box::new(client.clone()));

        let report = runner.run().await;

        assert_eq!(report.products.updated(), 2);
        assert_eq!(
            report.products.failures().map(|(id, _)| id).collect::<Vec<_>>(),
            vec!["prod_2"]
        );
        assert_eq!(report.prices.updated(), 1);
        assert!(!report.is_clean());
    }

    #[tokio::test]
    async fn test_listing_failure_moves_on_to_prices() {
        let client = InMemoryBillingClient::with_records(
            vec![product("prod_1", true)],
            vec![price("price_1", true)],
        );
        client.fail_product_listing().await;
        let runner = CleanupRunner::new(Box::new(client.clone()));

        let report = runner.run().await;

        assert!(report.products.listing_error.is_some());
        assert!(report.products.items.is_empty());
        assert_eq!(report.prices.updated(), 1);
        assert_eq!(
            client.calls().await,
            vec![
                Call::ListProducts { limit: 100 },
                Call::ListPrices { limit: 100 },
                Call::UpdatePrice { id: "price_1".into(), active: false },
            ]
        );
    }

    #[tokio::test]
    async fn test_blocked_production_key_makes_no_calls() {
        let client = InMemoryBillingClient::with_records(vec![product("prod_1", true)], vec![]);
        let config = CleanupConfig::new(Credential::new("sk_live_abc"), None);

        let result = cleanup(&config, Box::new(client.clone())).await;

        assert_eq!(result, Err(ConfigError::ProductionBlocked));
        assert!(client.calls().await.is_empty());
        assert!(client.products().await[0].active);
    }

    #[tokio::test]
    async fn test_empty_account_is_clean() {
        let runner = CleanupRunner::new(Box::new(InMemoryBillingClient::new()));
        let report = runner.run().await;

        assert!(report.is_clean());
        assert_eq!(report, CleanupReport::default());
    }
}
