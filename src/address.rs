//! Address lookup: normalization of loosely shaped records and the
//! `address/validate` call.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::client::AvaTaxClient;
use crate::core::{Address, AvaTaxError, validate_lookup_address};

// Accepted keys per field, in precedence order.
const LINE1_KEYS: &[&str] = &["Line1", "line1", "street1", "street"];
const LINE2_KEYS: &[&str] = &["Line2", "line2", "street2", "Street2"];
const LINE3_KEYS: &[&str] = &["Line3", "line3", "street3", "Street3"];
const CITY_KEYS: &[&str] = &["City", "city"];
const REGION_KEYS: &[&str] = &["Region", "region", "province", "Province", "state", "State"];
const COUNTRY_KEYS: &[&str] = &["Country", "country"];
const POSTAL_CODE_KEYS: &[&str] = &["PostalCode", "postalCode", "zipCode", "ZipCode", "zip"];

impl Address {
    /// Copy the recognized address fields out of a loosely shaped record.
    ///
    /// Unrecognized keys are discarded. String and number values are kept;
    /// anything else (null, objects, arrays) counts as absent. A blank string
    /// also counts as absent, so the next alias is consulted.
    pub fn from_record(record: &Value) -> Self {
        let empty = Map::new();
        let map = record.as_object().unwrap_or(&empty);
        Self {
            line1: pick(map, LINE1_KEYS),
            line2: pick(map, LINE2_KEYS),
            line3: pick(map, LINE3_KEYS),
            city: pick(map, CITY_KEYS),
            region: pick(map, REGION_KEYS),
            country: pick(map, COUNTRY_KEYS),
            postal_code: pick(map, POSTAL_CODE_KEYS),
        }
    }
}

fn pick(map: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match map.get(*key)? {
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Normalized address returned by the service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ValidatedAddress {
    pub line1: Option<String>,
    pub line2: Option<String>,
    pub line3: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
    pub county: Option<String>,
    pub fips_code: Option<String>,
    pub carrier_route: Option<String>,
    pub post_net: Option<String>,
    /// Single-letter address type ("F" firm, "G" general delivery, ...).
    pub address_type: Option<String>,
    pub latitude: Option<Value>,
    pub longitude: Option<Value>,
    pub tax_region_id: Option<Value>,
}

impl AvaTaxClient {
    /// Validate and normalize a street address.
    ///
    /// Returns `Ok(None)` if the service answered with something other than
    /// a JSON document or without an `Address` member.
    ///
    /// # Errors
    ///
    /// `AvaTaxError::Validation` before any request if the address lacks both
    /// `Line1` + `PostalCode` and `Line1` + `City` + `Region`;
    /// `AvaTaxError::Service` if the service reports `ResultCode: "Error"`.
    pub async fn validate_address(
        &self,
        address: &Address,
    ) -> Result<Option<ValidatedAddress>, AvaTaxError> {
        validate_lookup_address(address)?;

        let request = self.request(Method::GET, "address/validate", address.query_pairs(), None)?;
        let response = self.transport().send(request).await?;
        let status = response.status;
        let document = response.into_document()?;

        let Some(mut document) = document else {
            return Ok(None);
        };
        match document.get_mut("Address").map(Value::take) {
            Some(Value::Null) | None => Ok(None),
            Some(found) => serde_json::from_value(found)
                .map(Some)
                .map_err(|e| AvaTaxError::Service {
                    status,
                    message: format!("unexpected Address document: {e}"),
                }),
        }
    }

    /// [`validate_address`](Self::validate_address) for a loosely shaped record.
    pub async fn validate_address_record(
        &self,
        record: &Value,
    ) -> Result<Option<ValidatedAddress>, AvaTaxError> {
        self.validate_address(&Address::from_record(record)).await
    }
}
