//! HTTP client for the merchant update API

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::multipart::{Form, Part};
use std::time::Instant;

use super::constants::{
    UPDATE_MULTIPLE_PATH, UPLOAD_FIELD_NAME, USER_AGENT, endpoint_url, update_merchant_url,
};
use super::models::{MerchantData, UploadFile};
use super::response::{ApiVariant, RequestKind, UploadOutcome};
use crate::config::ApiConfig;

/// Operations the forms need from the merchant backend.
///
/// Both calls always produce an outcome: transport failures are folded into
/// [`UploadOutcome::Failure`] rather than returned as errors.
#[async_trait]
pub trait MerchantApi: Send + Sync {
    /// `PUT /merchant/update/{merchantId}` with a JSON body
    async fn update_merchant(&self, merchant_id: &str, data: &MerchantData) -> UploadOutcome;

    /// `POST /merchant/update-multiple` with the spreadsheet as multipart form data
    async fn update_multiple(&self, file: &UploadFile) -> UploadOutcome;
}

/// reqwest-backed [`MerchantApi`]
#[derive(Debug, Clone)]
pub struct MerchantClient {
    http: reqwest::Client,
    base_url: String,
    variant: ApiVariant,
}

impl MerchantClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .context("API key contains characters not allowed in an HTTP header")?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            variant: config.variant,
        })
    }

    /// Read the reply and decode it, folding transport errors into a failure outcome
    async fn finish(
        &self,
        kind: RequestKind,
        sent: std::result::Result<reqwest::Response, reqwest::Error>,
        started: Instant,
    ) -> UploadOutcome {
        let response = match sent {
            Ok(response) => response,
            Err(e) => {
                warn!("Request failed without a response: {}", e);
                return UploadOutcome::transport_failure();
            }
        };

        let status = response.status().as_u16();
        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => {
                warn!("Failed to read response body (HTTP {}): {}", status, e);
                return UploadOutcome::transport_failure();
            }
        };

        debug!(
            "HTTP {} with {} byte body in {:.2}ms ({} variant)",
            status,
            body.len(),
            started.elapsed().as_secs_f64() * 1000.0,
            self.variant
        );

        let outcome = UploadOutcome::decode(self.variant, kind, status, &body);
        match &outcome {
            UploadOutcome::Success { .. } => info!("Merchant API accepted the request (HTTP {})", status),
            UploadOutcome::Failure { message, .. } => {
                warn!("Merchant API rejected the request (HTTP {}): {}", status, message)
            }
        }
        outcome
    }
}

#[async_trait]
impl MerchantApi for MerchantClient {
    async fn update_merchant(&self, merchant_id: &str, data: &MerchantData) -> UploadOutcome {
        let url = update_merchant_url(&self.base_url, merchant_id);
        info!("Updating merchant {}", merchant_id);
        debug!("PUT {}", url);

        let started = Instant::now();
        let sent = self.http.put(&url).json(data).send().await;
        self.finish(RequestKind::Single, sent, started).await
    }

    async fn update_multiple(&self, file: &UploadFile) -> UploadOutcome {
        let url = endpoint_url(&self.base_url, UPDATE_MULTIPLE_PATH);
        info!(
            "Uploading {} ({} bytes) for bulk update",
            file.file_name,
            file.bytes.len()
        );
        debug!("POST {}", url);

        let part = match Part::bytes(file.bytes.clone())
            .file_name(file.file_name.clone())
            .mime_str(file.mime_type())
        {
            Ok(part) => part,
            Err(e) => {
                warn!("Failed to build multipart body: {}", e);
                return UploadOutcome::transport_failure();
            }
        };
        let form = Form::new().part(UPLOAD_FIELD_NAME, part);

        let started = Instant::now();
        let sent = self.http.post(&url).multipart(form).send().await;
        self.finish(RequestKind::Bulk, sent, started).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    /// Grab a free local port and release it so nothing is listening there
    fn closed_local_url() -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        format!("http://127.0.0.1:{}/api/v1", port)
    }

    fn client_for(url: &str) -> MerchantClient {
        let config = ApiConfig::new(url, "test-key").with_timeout(Duration::from_secs(2));
        MerchantClient::new(&config).unwrap()
    }

    #[test]
    fn test_rejects_api_key_with_newline() {
        let config = ApiConfig::new("https://api.example.com", "bad\nkey");
        assert!(MerchantClient::new(&config).is_err());
    }

    #[tokio::test]
    async fn test_bulk_upload_without_server_is_transport_failure() {
        let client = client_for(&closed_local_url());
        let file = UploadFile::new("merchant-template.xlsx", vec![1, 2, 3]);

        let outcome = client.update_multiple(&file).await;

        assert!(!outcome.is_success());
        assert_eq!(outcome.status_code(), None);
        assert_eq!(
            outcome.failure_message(),
            Some(super::super::response::UNEXPECTED_ERROR_MESSAGE)
        );
    }

    #[tokio::test]
    async fn test_single_update_without_server_is_transport_failure() {
        let client = client_for(&closed_local_url());

        let outcome = client
            .update_merchant("1480000493", &MerchantData::default())
            .await;

        assert!(!outcome.is_success());
        assert_eq!(outcome.status_code(), None);
    }
}
