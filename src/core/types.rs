use chrono::{DateTime, NaiveDate, TimeZone};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use super::error::ValidationError;

/// Postal address in the canonical AvaTax field set.
///
/// This is both the input of the address lookup call and the address part of
/// a [`TaxAddress`]. Use [`Address::from_record`] to build one from a loosely
/// shaped JSON record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Address {
    /// First street line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line1: Option<String>,
    /// Second street line (suite, unit).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    /// Third street line (attention).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line3: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// State or province.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
}

impl Address {
    /// Non-empty fields as `(name, value)` pairs in wire order.
    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        [
            ("Line1", &self.line1),
            ("Line2", &self.line2),
            ("Line3", &self.line3),
            ("City", &self.city),
            ("Region", &self.region),
            ("Country", &self.country),
            ("PostalCode", &self.postal_code),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.as_deref().map(|v| (name, v)))
        .collect()
    }
}

/// Address entry of a GetTax request, referenced from lines by `AddressCode`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", from = "TaxAddressRecord")]
pub struct TaxAddress {
    /// Label tying line origin/destination references to this entry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_code: Option<String>,
    #[serde(flatten)]
    pub address: Address,
    /// Numeric tax region identifier, an alternative to a street address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_region_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

// Flat wire shape of `TaxAddress`. Numbers inside a flattened struct are
// buffered and lose their exact representation, so reading goes through here.
#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TaxAddressRecord {
    address_code: Option<String>,
    line1: Option<String>,
    line2: Option<String>,
    line3: Option<String>,
    city: Option<String>,
    region: Option<String>,
    country: Option<String>,
    postal_code: Option<String>,
    tax_region_id: Option<u64>,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

impl From<TaxAddressRecord> for TaxAddress {
    fn from(record: TaxAddressRecord) -> Self {
        Self {
            address_code: record.address_code,
            address: Address {
                line1: record.line1,
                line2: record.line2,
                line3: record.line3,
                city: record.city,
                region: record.region,
                country: record.country,
                postal_code: record.postal_code,
            },
            tax_region_id: record.tax_region_id,
            latitude: record.latitude,
            longitude: record.longitude,
        }
    }
}

/// Line item of a GetTax request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TaxLine {
    #[serde(
        default,
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub line_no: Option<String>,
    /// `AddressCode` of the ship-to address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_code: Option<String>,
    /// `AddressCode` of the ship-from address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// AvaTax tax code (e.g. "P0000000" for tangible personal property).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_code: Option<String>,
    #[serde(
        default,
        with = "rust_decimal::serde::arbitrary_precision_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub qty: Option<Decimal>,
    /// Extended line amount (quantity * unit price).
    #[serde(
        default,
        with = "rust_decimal::serde::arbitrary_precision_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub amount: Option<Decimal>,
    /// Whether the document-level discount applies to this line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discounted: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_usage_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ref1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ref2: Option<String>,
}

/// Document date of a GetTax request.
///
/// Structured dates are sent as `YYYY-MM-DD`; text is sent unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocDate {
    Date(NaiveDate),
    Text(String),
}

impl From<NaiveDate> for DocDate {
    fn from(date: NaiveDate) -> Self {
        Self::Date(date)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for DocDate {
    fn from(moment: DateTime<Tz>) -> Self {
        Self::Date(moment.date_naive())
    }
}

impl From<&str> for DocDate {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for DocDate {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl Serialize for DocDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::validation::normalize_doc_date(self))
    }
}

impl<'de> Deserialize<'de> for DocDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::Text)
    }
}

/// AvaTax document type. The service treats a missing type as `SalesOrder`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocType {
    SalesOrder,
    SalesInvoice,
    ReturnOrder,
    ReturnInvoice,
    PurchaseOrder,
    PurchaseInvoice,
}

/// Granularity of the tax breakdown returned by GetTax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DetailLevel {
    /// Document-level totals plus per-line tax.
    Tax,
    /// Document-level totals only.
    Document,
    /// Per-line detail without jurisdiction breakdown.
    Line,
    /// Per-jurisdiction summary.
    Summary,
    /// Everything, including diagnostic messages.
    Diagnostic,
}

/// Caller-supplied GetTax field set.
///
/// Every field is optional here; [`TaxRequest::prepare`] fills defaults,
/// validates, and produces the strict [`TaxDocument`] that goes on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TaxRequest {
    pub customer_code: Option<String>,
    pub doc_date: Option<DocDate>,
    pub company_code: Option<String>,
    /// Record the document as final. Defaults to `false`.
    pub commit: Option<bool>,
    /// ISO 4217 code. Defaults to "USD".
    pub currency_code: Option<String>,
    /// Client identifier. `None` uses the configured default,
    /// `Some(None)` sends no identifier at all.
    #[serde(default, deserialize_with = "explicit_null")]
    pub client: Option<Option<String>>,
    pub doc_code: Option<String>,
    pub doc_type: Option<DocType>,
    pub detail_level: Option<DetailLevel>,
    pub customer_usage_type: Option<String>,
    #[serde(default, with = "rust_decimal::serde::arbitrary_precision_option")]
    pub discount: Option<Decimal>,
    pub reference_code: Option<String>,
    pub purchase_order_no: Option<String>,
    pub exemption_no: Option<String>,
    pub origin_code: Option<String>,
    pub destination_code: Option<String>,
    pub lines: Option<Vec<TaxLine>>,
    pub addresses: Option<Vec<TaxAddress>>,
}

impl TaxRequest {
    /// Read a request from a loosely shaped JSON record.
    ///
    /// Unknown keys are dropped. `Lines` and `Addresses` must be arrays when
    /// present; anything else is rejected here rather than coerced. A
    /// malformed entry is reported with its position.
    pub fn from_value(value: Value) -> Result<Self, ValidationError> {
        let Value::Object(mut map) = value else {
            return Err(ValidationError::new(
                "request",
                "request must be a JSON object",
            ));
        };
        let lines = take_entries(&mut map, "Lines")?;
        let addresses = take_entries(&mut map, "Addresses")?;

        let mut request: Self = serde_json::from_value(Value::Object(map))
            .map_err(|e| ValidationError::new("request", e.to_string()))?;
        request.lines = lines;
        request.addresses = addresses;
        Ok(request)
    }
}

fn take_entries<T: DeserializeOwned>(
    map: &mut Map<String, Value>,
    key: &str,
) -> Result<Option<Vec<T>>, ValidationError> {
    match map.remove(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| {
                serde_json::from_value(item)
                    .map_err(|e| ValidationError::entry(key, i, e.to_string()))
            })
            .collect::<Result<Vec<T>, _>>()
            .map(Some),
        Some(_) => Err(ValidationError::new(key, "must be an array")),
    }
}

/// Validated GetTax document, ready to serialize as the request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TaxDocument {
    pub customer_code: String,
    /// Always `YYYY-MM-DD` or caller-supplied text.
    pub doc_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_code: Option<String>,
    pub commit: bool,
    pub currency_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<DocType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail_level: Option<DetailLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_usage_type: Option<String>,
    #[serde(
        with = "rust_decimal::serde::arbitrary_precision_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub discount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_order_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exemption_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_code: Option<String>,
    pub lines: Vec<TaxLine>,
    pub addresses: Vec<TaxAddress>,
}

/// Accepts `"1"` and `1` alike.
fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a string or number, got {other}"
        ))),
    }
}

/// Distinguishes an explicit `null` (`Some(None)`) from a missing key (`None`).
fn explicit_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
