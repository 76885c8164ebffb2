//! HTTP client for the relay. Never carries the upstream API key.

use reqwest::Url;
use reqwest::header::ACCEPT;

use crate::relay::HealthReport;

use super::error::ChatError;

/// Thin wrapper over `reqwest::Client` bound to the relay chat base URL.
#[derive(Clone, Debug)]
pub struct RelayClient {
    http: reqwest::Client,
    base: Url,
}

impl RelayClient {
    pub fn new(base: Url) -> Self {
        Self {
            http: reqwest::Client::new(),
            base,
        }
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// `{base}/{model}/{prompt}` with both segments percent-encoded.
    pub fn chat_url(&self, model: &str, prompt: &str) -> Result<Url, ChatError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ChatError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .push(model)
            .push(prompt);
        Ok(url)
    }

    /// Health endpoint on the relay origin.
    pub fn health_url(&self) -> Result<Url, ChatError> {
        self.base
            .join("/health")
            .map_err(|_| ChatError::InvalidUrl(self.base.to_string()))
    }

    /// Send `prompt` to `model` through the relay. Non-success statuses become
    /// [`ChatError::Http`] carrying the response body.
    pub async fn chat_get(&self, prompt: &str, model: &str) -> Result<reqwest::Response, ChatError> {
        let url = self.chat_url(model, prompt)?;
        log::debug!("ChatGET URL: {}", url);
        log::debug!("Model being used: {}", model);

        let res = self
            .http
            .get(url)
            .header(ACCEPT, "text/plain, text/event-stream")
            .send()
            .await?;

        log::debug!("Response status: {}", res.status());
        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            log::debug!("Error response body: {}", body);
            return Err(ChatError::Http { status, body });
        }
        Ok(res)
    }

    /// Query the relay health endpoint.
    pub async fn health(&self) -> Result<HealthReport, ChatError> {
        let res = self.http.get(self.health_url()?).send().await?;
        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            return Err(ChatError::Http { status, body });
        }
        Ok(res.json::<HealthReport>().await?)
    }
}
