use std::sync::Arc;

use reqwest::Method;
use tracing::warn;

use crate::config::{self, AvaTaxConfig};
use crate::core::AvaTaxError;
use crate::transport::{ApiRequest, Transport};

/// AvaTax API client.
///
/// Cheap to clone. Configuration is shared read-only, so one client may be
/// used from many tasks at once; every call builds its own headers and
/// buffers.
#[derive(Debug, Clone)]
pub struct AvaTaxClient {
    config: Arc<AvaTaxConfig>,
    transport: Transport,
}

impl AvaTaxClient {
    /// Create a client from configuration.
    ///
    /// An API version newer than [`config::API_VERSION_MAX`] is logged as a
    /// warning and otherwise accepted.
    pub fn new(config: AvaTaxConfig) -> Result<Self, AvaTaxError> {
        if config::version_exceeds_known(config.api_version()) {
            warn!(
                version = config.api_version(),
                known = config::API_VERSION_MAX,
                "AvaTax API version is newer than this library supports; proceeding"
            );
        }
        let transport = Transport::new(config.base_url()?)?;
        Ok(Self {
            config: Arc::new(config),
            transport,
        })
    }

    /// Shorthand for `AvaTaxClient::new(AvaTaxConfig::from_env()?)`.
    pub fn from_env() -> Result<Self, AvaTaxError> {
        Self::new(AvaTaxConfig::from_env()?)
    }

    pub fn config(&self) -> &AvaTaxConfig {
        &self.config
    }

    /// Build a request for `operation` under the configured version prefix.
    pub(crate) fn request<'a>(
        &self,
        method: Method,
        operation: &str,
        query: Vec<(&'a str, &'a str)>,
        body: Option<Vec<u8>>,
    ) -> Result<ApiRequest<'a>, AvaTaxError> {
        Ok(ApiRequest {
            method,
            path: self.config.api_path(operation),
            headers: self.config.request_headers()?,
            query,
            body,
        })
    }

    pub(crate) fn transport(&self) -> &Transport {
        &self.transport
    }
}
