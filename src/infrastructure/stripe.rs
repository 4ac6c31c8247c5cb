use crate::config::CleanupConfig;
use crate::domain::ports::BillingClient;
use crate::domain::price::{Price, PriceUpdate};
use crate::domain::product::{Product, ProductUpdate};
use crate::error::{BillingError, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// API version the request and response shapes below are written against.
pub const API_VERSION: &str = "2024-12-18.acacia";

/// Billing client speaking the Stripe REST API over HTTPS.
///
/// One `reqwest::Client` is built up front and shared by every call, so the
/// connection pool and the per-request timeout apply to the whole run.
pub struct StripeClient {
    http: Client,
    base_url: String,
    secret_key: String,
}

#[derive(Deserialize)]
struct ListPage<T> {
    data: Vec<T>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
}

impl StripeClient {
    pub fn new(config: &CleanupConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: config.api_base.clone(),
            secret_key: config.credential.expose().to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .bearer_auth(&self.secret_key)
            .header("Stripe-Version", API_VERSION)
    }

    async fn list<T: DeserializeOwned>(&self, resource: &str, limit: u8) -> Result<Vec<T>> {
        let request = self
            .http
            .get(self.url(resource))
            .query(&[("limit", limit)]);
        let response = self.authorized(request).send().await?;
        let page: ListPage<T> = decode(response).await?;
        Ok(page.data)
    }

    async fn post_form<T, F>(&self, path: &str, form: &F) -> Result<T>
    where
        T: DeserializeOwned,
        F: serde::Serialize + ?Sized,
    {
        let request = self.http.post(self.url(path)).form(form);
        let response = self.authorized(request).send().await?;
        decode(response).await
    }
}

/// Turns a response into `T`, or into `BillingError::Api` for non-2xx.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(BillingError::Api {
            status: status.as_u16(),
            message: error_message(&body),
        });
    }

    Ok(serde_json::from_str(&body)?)
}

fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(ErrorEnvelope { error }) => match (error.kind, error.message) {
            (Some(kind), Some(message)) => format!("{message} ({kind})"),
            (None, Some(message)) => message,
            (Some(kind), None) => kind,
            (None, None) => "unknown error".to_string(),
        },
        Err(_) if body.trim().is_empty() => "empty response body".to_string(),
        Err(_) => body.trim().to_string(),
    }
}

#[async_trait]
impl BillingClient for StripeClient {
    async fn list_products(&self, limit: u8) -> Result<Vec<Product>> {
        self.list("products", limit).await
    }

    async fn update_product(&self, id: &str, update: ProductUpdate) -> Result<Product> {
        self.post_form(&format!("products/{id}"), &update).await
    }

    async fn list_prices(&self, limit: u8) -> Result<Vec<Price>> {
        self.list("prices", limit).await
    }

    async fn update_price(&self, id: &str, update: PriceUpdate) -> Result<Price> {
        self.post_form(&format!("prices/{id}"), &update).await
    }
}
