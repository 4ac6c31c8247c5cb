use billing_cleanup::domain::price::Price;
use billing_cleanup::domain::product::Product;
use billing_cleanup::infrastructure::in_memory::{Call, InMemoryBillingClient};

pub fn product(id: &str, active: bool) -> Product {
    Product {
        id: id.to_string(),
        name: format!("Product {id}"),
        active,
    }
}

pub fn price(id: &str, active: bool) -> Price {
    Price {
        id: id.to_string(),
        active,
        product: None,
    }
}

/// `prod_1` active, `prod_2` inactive, `price_1` active, `price_2` inactive.
pub fn sample_account() -> InMemoryBillingClient {
    InMemoryBillingClient::with_records(
        vec![product("prod_1", true), product("prod_2", false)],
        vec![price("price_1", true), price("price_2", false)],
    )
}

pub fn update_calls(calls: Vec<Call>) -> Vec<Call> {
    calls
        .into_iter()
        .filter(|c| matches!(c, Call::UpdateProduct { .. } | Call::UpdatePrice { .. }))
        .collect()
}
