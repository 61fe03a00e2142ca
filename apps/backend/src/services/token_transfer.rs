//! Optional hand-off of credited units to an external token service.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::rewards::TokenTransferConfig;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::logging::pii::Redacted;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferReceipt {
    pub tx_ref: String,
    pub block_explorer_url: Option<String>,
}

/// Sends reward units to a linked wallet. Called only after the ledger commit.
#[async_trait]
pub trait TokenTransfer: Send + Sync + fmt::Debug {
    async fn transfer(&self, wallet: &str, units: u32) -> Result<TransferReceipt, AppError>;
}

#[derive(Debug, Serialize)]
struct TransferRequest<'a> {
    to: &'a str,
    amount: u32,
}

#[derive(Debug, Deserialize)]
struct TransferResponse {
    tx_ref: String,
}

/// JSON-over-HTTP transfer service client.
#[derive(Clone)]
pub struct HttpTokenTransfer {
    client: reqwest::Client,
    url: String,
    block_explorer_url: Option<String>,
}

impl fmt::Debug for HttpTokenTransfer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTokenTransfer")
            .field("url", &self.url)
            .field("block_explorer_url", &self.block_explorer_url)
            .finish()
    }
}

impl HttpTokenTransfer {
    pub fn new(
        url: impl Into<String>,
        block_explorer_url: Option<String>,
    ) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| AppError::config(format!("token transfer client: {e}")))?;
        Ok(Self {
            client,
            url: url.into(),
            block_explorer_url,
        })
    }

    /// `None` when no transfer URL is configured.
    pub fn from_config(cfg: &TokenTransferConfig) -> Result<Option<Self>, AppError> {
        match &cfg.url {
            Some(url) => Self::new(url.clone(), cfg.block_explorer_url.clone()).map(Some),
            None => Ok(None),
        }
    }

    fn explorer_link(&self, tx_ref: &str) -> Option<String> {
        self.block_explorer_url
            .as_ref()
            .map(|base| format!("{}/{}", base.trim_end_matches('/'), tx_ref))
    }
}

#[async_trait]
impl TokenTransfer for HttpTokenTransfer {
    async fn transfer(&self, wallet: &str, units: u32) -> Result<TransferReceipt, AppError> {
        debug!(wallet = %Redacted(wallet), units, "Sending token transfer");

        let failed = |stage: &str, e: reqwest::Error| {
            AppError::internal(ErrorCode::Internal, format!("token transfer {stage}: {e}"))
        };

        let response: TransferResponse = self
            .client
            .post(&self.url)
            .json(&TransferRequest {
                to: wallet,
                amount: units,
            })
            .send()
            .await
            .map_err(|e| failed("request", e))?
            .error_for_status()
            .map_err(|e| failed("rejected", e))?
            .json()
            .await
            .map_err(|e| failed("reply", e))?;

        let block_explorer_url = self.explorer_link(&response.tx_ref);
        Ok(TransferReceipt {
            tx_ref: response.tx_ref,
            block_explorer_url,
        })
    }
}
