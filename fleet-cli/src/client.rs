//! HTTP client for the fleet registry server.

use crate::CliResult;
use fleet_core::{Ship, ShipDraft, ShipId, ShipQuery};
use reqwest::{Client, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// Default base URL of the fleet registry server.
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8080";

/// Error payload returned by the server.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Reqwest-backed client for the `/rest/ships` endpoints.
#[derive(Debug, Clone)]
pub struct FleetClient {
    client: Client,
    base_url: String,
}

impl FleetClient {
    /// Build a client for `server_url`.
    pub fn new(server_url: &str) -> CliResult<Self> {
        let base_url = normalize_server_url(server_url)?;
        let client = Client::builder()
            .user_agent(concat!("fleet-cli/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, base_url })
    }

    fn ships_url(&self) -> String {
        format!("{}/rest/ships", self.base_url)
    }

    fn ship_url(&self, id: ShipId) -> String {
        format!("{}/rest/ships/{id}", self.base_url)
    }

    /// Fetch one page of ships matching `query`.
    pub async fn list(&self, query: &ShipQuery) -> CliResult<Vec<Ship>> {
        let response = self.client.get(self.ships_url()).query(query).send().await?;
        decode(response).await
    }

    /// Count ships matching the filters in `query`.
    pub async fn count(&self, query: &ShipQuery) -> CliResult<u64> {
        let url = format!("{}/count", self.ships_url());
        let response = self.client.get(url).query(query).send().await?;
        decode(response).await
    }

    /// Fetch one ship.
    pub async fn get(&self, id: ShipId) -> CliResult<Ship> {
        let response = self.client.get(self.ship_url(id)).send().await?;
        decode(response).await
    }

    /// Create a ship from `draft`.
    pub async fn create(&self, draft: &ShipDraft) -> CliResult<Ship> {
        let response = self.client.post(self.ships_url()).json(draft).send().await?;
        decode(response).await
    }

    /// Overwrite the fields present in `draft`.
    pub async fn edit(&self, id: ShipId, draft: &ShipDraft) -> CliResult<Ship> {
        let response = self.client.post(self.ship_url(id)).json(draft).send().await?;
        decode(response).await
    }

    /// Delete one ship.
    pub async fn delete(&self, id: ShipId) -> CliResult<()> {
        let response = self.client.delete(self.ship_url(id)).send().await?;
        check_status(response).await?;
        Ok(())
    }
}

/// Normalize the server URL for consistent API requests.
fn normalize_server_url(server_url: &str) -> CliResult<String> {
    let trimmed = server_url.trim();
    if trimmed.is_empty() {
        return Err("server url is required".into());
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

async fn decode<T: DeserializeOwned>(response: Response) -> CliResult<T> {
    let response = check_status(response).await?;
    Ok(response.json::<T>().await?)
}

/// Turn non-success responses into errors carrying the server's message.
async fn check_status(response: Response) -> CliResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|error| error.message)
        .unwrap_or_else(|_| body.trim().to_string());
    if message.is_empty() {
        Err(format!("server returned {status}").into())
    } else {
        Err(format!("server returned {status}: {message}").into())
    }
}
