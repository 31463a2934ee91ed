//! 1inch API client
//!
//! Thin reqwest wrapper over the 1inch developer API (swap v6 and balance
//! endpoints). The base URL is injectable so tests and the testnet
//! environment can point at a local stub. All requests require a bearer
//! API key; components pass it in from their `apiKey` config field.

use std::collections::HashMap;

use serde::Deserialize;

/// Errors from the 1inch client
#[derive(Debug, thiserror::Error)]
pub enum OneInchError {
    /// No API key was configured
    #[error("1inch API key is not configured")]
    MissingApiKey,

    /// Transport-level failure
    #[error("1inch request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("1inch API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

/// Quote for a token pair, as returned by `/swap/v6.0/{chain}/quote`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    /// Amount of destination token, in its smallest unit
    pub dst_amount: String,
    /// Estimated gas for the swap
    #[serde(default)]
    pub gas: Option<u64>,
}

/// Unsigned transaction payload from `/swap/v6.0/{chain}/swap`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapTransaction {
    pub from: String,
    pub to: String,
    pub data: String,
    pub value: String,
    #[serde(default)]
    pub gas: Option<u64>,
}

/// Swap response: the resulting amount plus the transaction to sign
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapResponse {
    pub dst_amount: String,
    pub tx: SwapTransaction,
}

/// Client for the 1inch developer API
pub struct OneInchClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl OneInchClient {
    /// Production API endpoint
    pub const DEFAULT_BASE_URL: &'static str = "https://api.1inch.dev";

    /// Create a client against the production endpoint
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            api_key,
        }
    }

    /// Override the base URL (stub servers in tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetch a quote for swapping `amount` of `src` into `dst`
    pub async fn quote(
        &self,
        chain_id: u64,
        src: &str,
        dst: &str,
        amount: &str,
    ) -> Result<QuoteResponse, OneInchError> {
        let url = format!("{}/swap/v6.0/{}/quote", self.base_url, chain_id);
        let response = self
            .http
            .get(&url)
            .bearer_auth(self.api_key()?)
            .query(&[("src", src), ("dst", dst), ("amount", amount)])
            .send()
            .await?;
        Self::parse(response).await
    }

    /// Build an unsigned swap transaction
    pub async fn swap(
        &self,
        chain_id: u64,
        src: &str,
        dst: &str,
        amount: &str,
        from: &str,
        slippage: f64,
    ) -> Result<SwapResponse, OneInchError> {
        let url = format!("{}/swap/v6.0/{}/swap", self.base_url, chain_id);
        let slippage = slippage.to_string();
        let response = self
            .http
            .get(&url)
            .bearer_auth(self.api_key()?)
            .query(&[
                ("src", src),
                ("dst", dst),
                ("amount", amount),
                ("from", from),
                ("slippage", slippage.as_str()),
            ])
            .send()
            .await?;
        Self::parse(response).await
    }

    /// Token balances for a wallet, keyed by token contract address
    pub async fn balances(
        &self,
        chain_id: u64,
        address: &str,
    ) -> Result<HashMap<String, String>, OneInchError> {
        let url = format!(
            "{}/balance/v1.2/{}/balances/{}",
            self.base_url, chain_id, address
        );
        let response = self
            .http
            .get(&url)
            .bearer_auth(self.api_key()?)
            .send()
            .await?;
        Self::parse(response).await
    }

    fn api_key(&self) -> Result<&str, OneInchError> {
        self.api_key.as_deref().ok_or(OneInchError::MissingApiKey)
    }

    async fn parse<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, OneInchError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(OneInchError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json().await?)
    }
}
