use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method};
use tracing::debug;

use crate::settings::Settings;

/// Per-request timeout for every Aircall call.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/**
 * Raw access to the team membership endpoints. Returns whatever status and body
 * Aircall answered with; only transport failures are errors.
 */
#[async_trait]
pub trait TeamApi: Send + Sync {
    async fn call(&self, method: Method, path: &str) -> Result<(u16, String), reqwest::Error>;
}

pub fn team_user_path(team_id: &str, user_id: &str) -> String {
    format!("/teams/{}/users/{}", team_id, user_id)
}

#[derive(Debug, Clone)]
pub struct AircallClient {
    client: Client,
    base_url: String,
    api_id: String,
    api_token: String,
}

impl AircallClient {
    pub fn new(settings: &Settings) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            base_url: settings.aircall_base_url.trim_end_matches('/').to_string(),
            api_id: settings.aircall_api_id.clone(),
            api_token: settings.aircall_api_token.clone(),
        })
    }
}

#[async_trait]
impl TeamApi for AircallClient {
    async fn call(&self, method: Method, path: &str) -> Result<(u16, String), reqwest::Error> {
        let url = format!("{}{}", self.base_url, path);
        debug!("Aircall request {} {}", method, url);

        let response = self
            .client
            .request(method, &url)
            .basic_auth(&self.api_id, Some(&self.api_token))
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok((status, body))
    }
}
