//! Odoo JSON-RPC client with cookie-based sessions.

use std::sync::atomic::{AtomicU64, Ordering};

use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::{Value, json};
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::erp::{
    ErpError,
    rpc::{RpcRequest, decode, normalize},
};

const AUTHENTICATE_PATH: &str = "/web/session/authenticate";
const CALL_KW_PATH: &str = "/web/dataset/call_kw";

/// Configuration for connecting to an Odoo instance.
#[derive(Debug, Clone)]
pub struct OdooConfig {
    /// Base URL, e.g. `"https://erp.example.com"`.
    pub url: String,

    /// Database name.
    pub database: String,

    /// Login of the acting user.
    pub login: String,

    /// Password or API key.
    pub password: String,
}

/// HTTP client for Odoo's JSON-RPC web controllers.
///
/// The session is established lazily on the first model call and reused
/// through the cookie store.
#[derive(Debug)]
pub struct OdooClient {
    config: OdooConfig,
    http: Client,
    next_id: AtomicU64,
    uid: OnceCell<i64>,
}

impl OdooClient {
    /// Create a new client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be constructed.
    pub fn new(config: OdooConfig) -> Result<Self, ErpError> {
        let http = Client::builder().cookie_store(true).build()?;

        Ok(Self {
            config,
            http,
            next_id: AtomicU64::new(1),
            uid: OnceCell::new(),
        })
    }

    /// Authenticate (once) and return the user id of the session.
    ///
    /// # Errors
    ///
    /// Returns an error on HTTP failure or when the credentials are rejected.
    pub async fn uid(&self) -> Result<i64, ErpError> {
        self.uid
            .get_or_try_init(|| self.authenticate())
            .await
            .copied()
    }

    async fn authenticate(&self) -> Result<i64, ErpError> {
        let params = json!({
            "db": self.config.database,
            "login": self.config.login,
            "password": self.config.password,
        });

        let session: SessionInfo = self.post(AUTHENTICATE_PATH, &params).await?;

        let uid = session
            .uid
            .ok_or_else(|| ErpError::Authentication(self.config.login.clone()))?;

        info!(uid, database = %self.config.database, "authenticated with ERP");

        Ok(uid)
    }

    /// Call `method` on `model` with positional `args` and keyword `kwargs`.
    ///
    /// # Errors
    ///
    /// Returns an error on HTTP failure, an ERP fault, or when the result
    /// does not match `T`.
    pub async fn call_kw<T: DeserializeOwned>(
        &self,
        model: &str,
        method: &str,
        args: Value,
        kwargs: Value,
    ) -> Result<T, ErpError> {
        self.uid().await?;

        let params = json!({
            "model": model,
            "method": method,
            "args": args,
            "kwargs": kwargs,
        });

        debug!(model, method, "ERP call");

        self.post(&format!("{CALL_KW_PATH}/{model}/{method}"), &params)
            .await
    }

    async fn post<T: DeserializeOwned>(&self, path: &str, params: &Value) -> Result<T, ErpError> {
        let url = format!("{}{path}", self.config.url.trim_end_matches('/'));
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        let response = self
            .http
            .post(&url)
            .json(&RpcRequest::call(id, params))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            return Err(ErpError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response.json().await?;

        decode(normalize(body)?)
    }
}

#[derive(Debug, Deserialize)]
struct SessionInfo {
    #[serde(default, deserialize_with = "crate::erp::models::odoo_optional")]
    uid: Option<i64>,
}
