//! Asynchronous Dashboard client implementation.

use crate::models::{InventoryDevice, Network, NetworkClient, SwitchPort, UpdateSwitchPortRequest};
use crate::Result;
use async_trait::async_trait;
use portsync_core::client::{ClientConfig, RetryPolicy};
use portsync_core::config::DashboardConfig;
use portsync_core::Error;
use reqwest::{Client, ClientBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, trace, warn};
use url::Url;

const USER_AGENT: &str = concat!("portsync-dashboard/", env!("CARGO_PKG_VERSION"));
const API_KEY_HEADER: &str = "X-Cisco-Meraki-API-Key";

/// Default lookback window for the clients endpoint (seconds).
pub const DEFAULT_CLIENT_TIMESPAN: u64 = 86_400;

/// Writer seam for applying one port rename.
///
/// The batch applier depends on this trait rather than on the concrete
/// client, so tests can drive it with a mock.
#[async_trait]
pub trait PortWriter: Send + Sync {
    /// Set the name of one port on one device, changing nothing else.
    async fn set_port_name(&self, serial: &str, port_number: &str, name: &str) -> Result<()>;
}

/// Builder for [`DashboardClient`].
#[derive(Debug, Clone)]
pub struct DashboardClientBuilder {
    config: DashboardConfig,
    http_config: ClientConfig,
}

impl DashboardClientBuilder {
    /// Create a builder from a [`DashboardConfig`].
    #[must_use]
    pub fn new(config: DashboardConfig) -> Self {
        let http_config = ClientConfig::new()
            .with_timeout(config.timeout())
            .with_retry_policy(RetryPolicy::new().with_max_retries(config.max_retries));

        Self {
            config,
            http_config,
        }
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_http_config(mut self, http_config: ClientConfig) -> Self {
        self.http_config = http_config;
        self
    }

    /// Finalise the builder and create the [`DashboardClient`].
    pub fn build(self) -> Result<DashboardClient> {
        let base_url = self.config.parse_base_url()?;

        let mut builder = ClientBuilder::new()
            .user_agent(USER_AGENT)
            .timeout(self.http_config.timeout)
            .pool_idle_timeout(self.http_config.pool_idle_timeout)
            .pool_max_idle_per_host(self.http_config.pool_max_idle_per_host)
            .connect_timeout(Duration::from_secs(10));

        if !self.config.tls_verify {
            warn!("TLS verification disabled for Dashboard client");
            builder = builder.danger_accept_invalid_certs(true);
        }

        let http = builder.build().map_err(|err| {
            Error::ConfigError(format!("Failed to build Dashboard HTTP client: {err}"))
        })?;

        Ok(DashboardClient {
            http,
            base_url,
            api_key: self.config.api_key.clone(),
            retry_policy: self.http_config.retry_policy,
        })
    }
}

/// Asynchronous client for the Dashboard API v0.
///
/// Idempotent reads are retried according to the configured policy;
/// [`DashboardClient::update_switch_port`] makes exactly one attempt.
#[derive(Clone)]
pub struct DashboardClient {
    http: Client,
    base_url: Url,
    api_key: SecretString,
    retry_policy: RetryPolicy,
}

impl DashboardClient {
    /// Construct a client directly from the configuration.
    pub fn from_config(config: &DashboardConfig) -> Result<Self> {
        DashboardClientBuilder::new(config.clone()).build()
    }

    /// Start a builder pre-populated with the provided configuration.
    #[must_use]
    pub fn builder(config: DashboardConfig) -> DashboardClientBuilder {
        DashboardClientBuilder::new(config)
    }

    /// Return the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// List the networks of an organization.
    pub async fn list_networks(&self, org_id: &str) -> Result<Vec<Network>> {
        let path = format!("organizations/{org_id}/networks");
        self.get_json(&path, &[]).await
    }

    /// Fetch the device inventory of an organization.
    pub async fn get_inventory(&self, org_id: &str) -> Result<Vec<InventoryDevice>> {
        let path = format!("organizations/{org_id}/inventory");
        self.get_json(&path, &[]).await
    }

    /// List all ports of a switch.
    pub async fn list_switch_ports(&self, serial: &str) -> Result<Vec<SwitchPort>> {
        let path = format!("devices/{serial}/switchPorts");
        self.get_json(&path, &[]).await
    }

    /// Fetch the configuration of one switch port.
    pub async fn get_switch_port(&self, serial: &str, port_number: &str) -> Result<SwitchPort> {
        let path = format!("devices/{serial}/switchPorts/{port_number}");
        self.get_json(&path, &[]).await
    }

    /// List clients recently seen by a device.
    ///
    /// `timespan_secs` defaults to [`DEFAULT_CLIENT_TIMESPAN`].
    pub async fn list_clients(
        &self,
        serial: &str,
        timespan_secs: Option<u64>,
    ) -> Result<Vec<NetworkClient>> {
        let path = format!("devices/{serial}/clients");
        let timespan = timespan_secs.unwrap_or(DEFAULT_CLIENT_TIMESPAN);
        self.get_json(&path, &[("timespan", timespan.to_string())])
            .await
    }

    /// Update the configuration of one switch port.
    ///
    /// This is a mutating call and is never retried; the caller decides
    /// what a failure means for the rest of its batch.
    pub async fn update_switch_port(
        &self,
        serial: &str,
        port_number: &str,
        request: &UpdateSwitchPortRequest,
    ) -> Result<SwitchPort> {
        let path = format!("devices/{serial}/switchPorts/{port_number}");
        let url = self.build_url(&path)?;

        trace!(path = %path, payload = %serde_json::to_string(request)?, "Sending port update");

        let response = self
            .http
            .put(url)
            .header(API_KEY_HEADER, self.api_key.expose_secret())
            .header("Accept", "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return response.json::<SwitchPort>().await.map_err(|err| {
                Error::ParseError(format!("Undecodable update response for `{path}`: {err}"))
            });
        }

        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(map_status_to_error(status, message))
    }

    fn build_url(&self, path: &str) -> Result<Url> {
        // Url::join would drop the `/api/v0` suffix of the base URL.
        let base = self.base_url.as_str().trim_end_matches('/');
        Url::parse(&format!("{base}/{path}"))
            .map_err(|err| Error::InvalidEndpoint(format!("Invalid path `{path}`: {err}")))
    }

    async fn get_json<T>(&self, path: &str, params: &[(&'static str, String)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let mut attempt = 0;
        let mut last_error: Option<Error>;

        loop {
            let url = self.build_url(path)?;
            let request = self
                .http
                .get(url)
                .query(params)
                .header(API_KEY_HEADER, self.api_key.expose_secret())
                .header("Accept", "application/json");

            debug!(path = %path, ?params, attempt, "Sending Dashboard request");

            match request.send().await {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        return response.json::<T>().await.map_err(|err| {
                            Error::ParseError(format!(
                                "Undecodable Dashboard response for `{path}`: {err}"
                            ))
                        });
                    }

                    let message = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Unknown error".to_string());

                    let error = map_status_to_error(status, message);
                    if !matches!(error, Error::ServiceUnavailable(_)) {
                        return Err(error);
                    }
                    last_error = Some(error);
                }
                Err(err) => {
                    let error = Error::from(err);
                    if !matches!(
                        error,
                        Error::Timeout(_) | Error::ServiceUnavailable(_) | Error::HttpError(_)
                    ) {
                        return Err(error);
                    }
                    last_error = Some(error);
                }
            }

            attempt += 1;
            if attempt > self.retry_policy.max_retries {
                break;
            }

            let delay = self.retry_policy.delay_for_attempt(attempt);
            if delay > Duration::from_millis(0) {
                debug!("Retrying Dashboard request after {:?}", delay);
                sleep(delay).await;
            }
        }

        Err(last_error.unwrap_or_else(|| {
            Error::ServiceUnavailable("Dashboard request failed after retries".to_string())
        }))
    }
}

#[async_trait]
impl PortWriter for DashboardClient {
    async fn set_port_name(&self, serial: &str, port_number: &str, name: &str) -> Result<()> {
        self.update_switch_port(serial, port_number, &UpdateSwitchPortRequest::rename(name))
            .await
            .map(|_| ())
    }
}

fn map_status_to_error(status: StatusCode, text: String) -> Error {
    match status {
        StatusCode::NOT_FOUND => Error::NotFound(text),
        StatusCode::BAD_REQUEST => Error::BadRequest(text),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Error::Unauthorized(format!("Dashboard rejected the API key: {text}"))
        }
        StatusCode::TOO_MANY_REQUESTS
        | StatusCode::BAD_GATEWAY
        | StatusCode::SERVICE_UNAVAILABLE
        | StatusCode::GATEWAY_TIMEOUT => {
            Error::ServiceUnavailable(format!("Dashboard temporarily unavailable: {text}"))
        }
        status if status.is_server_error() => {
            Error::ServiceUnavailable(format!("Dashboard server error {status}: {text}"))
        }
        _ => Error::HttpError(format!("Dashboard error {status}: {text}")),
    }
}
