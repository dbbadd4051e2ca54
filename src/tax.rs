//! GetTax: full transactional tax computation.

use reqwest::Method;
use serde_json::Value;
use tracing::debug;

use crate::client::AvaTaxClient;
use crate::core::{AvaTaxError, TaxRequest};

const GET_TAX: &str = "tax/get";

impl AvaTaxClient {
    /// Compute tax for a document.
    ///
    /// The request is completed with defaults (see [`TaxRequest::prepare`])
    /// and validated before anything is sent. The response document is
    /// returned as parsed, without reshaping. `Ok(None)` means the service
    /// answered with a body that is not JSON.
    ///
    /// # Errors
    ///
    /// `AvaTaxError::Validation` (nothing sent) if `CustomerCode` is missing,
    /// `Lines` or `Addresses` is empty, or an entry lacks a required field;
    /// the error's `index` names the first offending entry.
    pub async fn get_tax(&self, request: TaxRequest) -> Result<Option<Value>, AvaTaxError> {
        let document = request.prepare(self.config().default_client())?;
        let body = serde_json::to_vec(&document)
            .map_err(|e| AvaTaxError::InvalidArgument(format!("cannot serialize tax document: {e}")))?;
        debug!(
            lines = document.lines.len(),
            addresses = document.addresses.len(),
            commit = document.commit,
            "sending GetTax document"
        );

        let request = self.request(Method::POST, GET_TAX, Vec::new(), Some(body))?;
        self.transport().send(request).await?.into_document()
    }
}
