//! Point-of-sale tax estimate for a coordinate pair and sale amount.

use reqwest::Method;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::client::AvaTaxClient;
use crate::core::AvaTaxError;

/// Validated input of an estimate call.
///
/// Construction fails synchronously on values that cannot be sent, so a
/// bad coordinate never reaches the network.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimateRequest {
    latitude: f64,
    longitude: f64,
    sale_amount: Decimal,
}

impl EstimateRequest {
    /// # Errors
    ///
    /// `AvaTaxError::InvalidArgument` if any value is NaN or infinite, or a
    /// coordinate is out of range.
    pub fn new(latitude: f64, longitude: f64, sale_amount: f64) -> Result<Self, AvaTaxError> {
        if !sale_amount.is_finite() {
            return Err(AvaTaxError::InvalidArgument(format!(
                "sale amount must be a finite number, got {sale_amount}"
            )));
        }
        let amount = Decimal::try_from(sale_amount).map_err(|e| {
            AvaTaxError::InvalidArgument(format!("sale amount {sale_amount} out of range: {e}"))
        })?;
        Self::with_amount(latitude, longitude, amount)
    }

    pub fn with_amount(latitude: f64, longitude: f64, sale_amount: Decimal) -> Result<Self, AvaTaxError> {
        check_coordinate("latitude", latitude, 90.0)?;
        check_coordinate("longitude", longitude, 180.0)?;
        Ok(Self {
            latitude,
            longitude,
            sale_amount,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn sale_amount(&self) -> Decimal {
        self.sale_amount
    }

    fn operation(&self) -> String {
        format!("tax/{},{}/get", self.latitude, self.longitude)
    }
}

fn check_coordinate(name: &str, value: f64, limit: f64) -> Result<(), AvaTaxError> {
    if !value.is_finite() {
        return Err(AvaTaxError::InvalidArgument(format!(
            "{name} must be a finite number, got {value}"
        )));
    }
    if value.abs() > limit {
        return Err(AvaTaxError::InvalidArgument(format!(
            "{name} {value} is outside -{limit}..={limit}"
        )));
    }
    Ok(())
}

/// Per-jurisdiction line of an estimate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct TaxDetail {
    pub country: Option<String>,
    pub region: Option<String>,
    /// "State", "County", "City" or "Special".
    pub juris_type: Option<String>,
    pub juris_name: Option<String>,
    pub tax_name: Option<String>,
    #[serde(with = "rust_decimal::serde::arbitrary_precision_option")]
    pub rate: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::arbitrary_precision_option")]
    pub tax: Option<Decimal>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct EstimateResponse {
    #[serde(with = "rust_decimal::serde::arbitrary_precision_option")]
    rate: Option<Decimal>,
    tax_details: Option<Vec<TaxDetail>>,
}

impl AvaTaxClient {
    /// Combined tax rate for a location and sale amount.
    ///
    /// `Ok(None)` means the service returned no parsable document or no rate.
    pub async fn estimate_tax(&self, request: &EstimateRequest) -> Result<Option<Decimal>, AvaTaxError> {
        Ok(self.fetch_estimate(request).await?.and_then(|r| r.rate))
    }

    /// Per-jurisdiction breakdown for a location and sale amount.
    pub async fn estimate_tax_details(
        &self,
        request: &EstimateRequest,
    ) -> Result<Option<Vec<TaxDetail>>, AvaTaxError> {
        Ok(self.fetch_estimate(request).await?.and_then(|r| r.tax_details))
    }

    async fn fetch_estimate(&self, request: &EstimateRequest) -> Result<Option<EstimateResponse>, AvaTaxError> {
        let amount = request.sale_amount.to_string();
        let query = vec![("saleamount", amount.as_str())];
        let api_request = self.request(Method::GET, &request.operation(), query, None)?;

        let response = self.transport().send(api_request).await?;
        let status = response.status;
        match response.into_document()? {
            None => Ok(None),
            Some(doc) => serde_json::from_value(doc)
                .map(Some)
                .map_err(|e| AvaTaxError::Service {
                    status,
                    message: format!("unexpected estimate document: {e}"),
                }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn accepts_ordinary_values() {
        let req = EstimateRequest::new(47.627935, -122.51702, 310.12).unwrap();
        assert_eq!(req.sale_amount(), dec!(310.12));
        assert_eq!(req.operation(), "tax/47.627935,-122.51702/get");
    }

    #[test]
    fn rejects_non_finite_values() {
        assert!(EstimateRequest::new(f64::NAN, 0.0, 1.0).is_err());
        assert!(EstimateRequest::new(0.0, f64::INFINITY, 1.0).is_err());
        assert!(EstimateRequest::new(0.0, 0.0, f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        assert!(EstimateRequest::new(90.5, 0.0, 1.0).is_err());
        assert!(EstimateRequest::new(0.0, -180.5, 1.0).is_err());
        assert!(EstimateRequest::new(-90.0, 180.0, 1.0).is_ok());
    }

    #[test]
    fn parses_estimate_document() {
        let parsed: EstimateResponse = serde_json::from_value(json!({
            "Rate": 0.095,
            "Tax": 29.46,
            "ResultCode": "Success",
            "TaxDetails": [
                {"Country": "US", "Region": "WA", "JurisType": "State",
                 "JurisName": "WASHINGTON", "Rate": 0.065, "Tax": 20.16, "TaxName": "WA STATE TAX"}
            ]
        }))
        .unwrap();
        assert_eq!(parsed.rate, Some(dec!(0.095)));
        let details = parsed.tax_details.unwrap();
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].juris_type.as_deref(), Some("State"));
    }
}
