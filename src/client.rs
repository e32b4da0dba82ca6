// 🌐 Bank Client - REST backend
// POST /contas, GET /contas/saldo and GET /transferencias (bearer)
// Every call is a single attempt; failures carry the backend's `message`

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::models::{Balance, ErrorBody, NewAccount, Transaction};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// HTTP client for the banking backend.
#[derive(Debug, Clone)]
pub struct BankClient {
    http: reqwest::Client,
    base_url: Url,
}

impl BankClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ApiError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;

        Ok(Self {
            http,
            base_url: config.api_url.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.as_str().trim_end_matches('/'), path)
    }

    /// Create an account.
    ///
    /// Calls `POST {base_url}/contas` with `{nome, cpf, apelido, senha}`.
    pub async fn create_account(&self, account: &NewAccount) -> Result<(), ApiError> {
        let endpoint = "POST /contas";
        debug!(endpoint, nickname = %account.nickname, "creating account");

        let resp = self
            .http
            .post(self.url("contas"))
            .json(account)
            .send()
            .await
            .map_err(|e| ApiError::Http {
                endpoint: endpoint.into(),
                source: e,
            })?;

        check_status(endpoint, resp).await?;
        info!(nickname = %account.nickname, "account created");
        Ok(())
    }

    /// Current balance of the signed-in account.
    ///
    /// Calls `GET {base_url}/contas/saldo` with the bearer token.
    pub async fn fetch_balance(&self, token: &str) -> Result<f64, ApiError> {
        let balance: Balance = self
            .get_authorized("GET /contas/saldo", "contas/saldo", token)
            .await?;
        Ok(balance.amount)
    }

    /// Transfers in and out of the signed-in account.
    ///
    /// Calls `GET {base_url}/transferencias` with the bearer token.
    pub async fn fetch_transactions(&self, token: &str) -> Result<Vec<Transaction>, ApiError> {
        self.get_authorized("GET /transferencias", "transferencias", token)
            .await
    }

    async fn get_authorized<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        path: &str,
        token: &str,
    ) -> Result<T, ApiError> {
        if token.is_empty() {
            return Err(ApiError::Unauthenticated {
                endpoint: endpoint.into(),
            });
        }

        debug!(endpoint, "fetching");
        let resp = self
            .http
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| ApiError::Http {
                endpoint: endpoint.into(),
                source: e,
            })?;

        let resp = check_status(endpoint, resp).await?;

        resp.json().await.map_err(|e| ApiError::Deserialization {
            endpoint: endpoint.into(),
            source: e,
        })
    }
}

async fn check_status(
    endpoint: &str,
    resp: reqwest::Response,
) -> Result<reqwest::Response, ApiError> {
    if resp.status().is_success() {
        return Ok(resp);
    }

    let status = resp.status().as_u16();
    let body = resp
        .text()
        .await
        .unwrap_or_else(|e| format!("<failed to read response body: {e}>"));
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|b| b.message);

    warn!(endpoint, status, "backend rejected request");
    Err(ApiError::Api {
        endpoint: endpoint.into(),
        status,
        message,
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_for(raw: &str) -> BankClient {
        let config = ClientConfig::default().with_api_url(raw).unwrap();
        BankClient::new(&config).unwrap()
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        assert_eq!(
            client_for("http://127.0.0.1:9000").url("contas"),
            "http://127.0.0.1:9000/contas"
        );
        assert_eq!(
            client_for("http://127.0.0.1:9000/api/").url("contas/saldo"),
            "http://127.0.0.1:9000/api/contas/saldo"
        );
    }

    #[tokio::test]
    async fn test_empty_token_is_rejected_locally() {
        let client = client_for("http://127.0.0.1:9");
        let err = client.fetch_balance("").await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthenticated { .. }));
    }
}
