use chrono::Local;
use rust_decimal::Decimal;

use super::error::ValidationError;
use super::types::*;
use super::validation;

/// Currency used when a request does not name one.
pub const DEFAULT_CURRENCY: &str = "USD";

impl TaxRequest {
    /// Fill defaults, normalize the document date, and validate.
    ///
    /// `default_client` is the configured client identifier, used unless the
    /// request names one or explicitly disables it. Defaults: `DocDate` is
    /// today (local time), `Commit` is `false`, `CurrencyCode` is "USD".
    pub fn prepare(self, default_client: Option<&str>) -> Result<TaxDocument, ValidationError> {
        validation::validate_tax_request(&self)?;

        let doc_date = self
            .doc_date
            .unwrap_or_else(|| DocDate::from(Local::now()));
        let client = match self.client {
            Some(explicit) => explicit,
            None => default_client.map(str::to_string),
        };

        Ok(TaxDocument {
            // validated above
            customer_code: self.customer_code.unwrap_or_default(),
            doc_date: validation::normalize_doc_date(&doc_date),
            company_code: self.company_code,
            commit: self.commit.unwrap_or(false),
            currency_code: self
                .currency_code
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            client,
            doc_code: self.doc_code,
            doc_type: self.doc_type,
            detail_level: self.detail_level,
            customer_usage_type: self.customer_usage_type,
            discount: self.discount,
            reference_code: self.reference_code,
            purchase_order_no: self.purchase_order_no,
            exemption_no: self.exemption_no,
            origin_code: self.origin_code,
            destination_code: self.destination_code,
            lines: self.lines.unwrap_or_default(),
            addresses: self.addresses.unwrap_or_default(),
        })
    }
}

/// Builder for GetTax requests.
///
/// ```
/// use avatax::core::*;
/// use rust_decimal_macros::dec;
///
/// let request = TaxRequestBuilder::new("101")
///     .add_line(TaxLineBuilder::new("1", "01", "02", dec!(1), dec!(10)).build())
///     .add_address(
///         TaxAddressBuilder::new("01")
///             .line1("118 N Clark St")
///             .city("Chicago")
///             .region("IL")
///             .build(),
///     )
///     .add_address(TaxAddressBuilder::new("02").tax_region_id(2_109_700).build())
///     .build();
///
/// let doc = request.prepare(None).unwrap();
/// assert_eq!(doc.currency_code, "USD");
/// assert!(!doc.commit);
/// ```
pub struct TaxRequestBuilder {
    request: TaxRequest,
}

impl TaxRequestBuilder {
    pub fn new(customer_code: impl Into<String>) -> Self {
        Self {
            request: TaxRequest {
                customer_code: Some(customer_code.into()),
                ..Default::default()
            },
        }
    }

    pub fn doc_date(mut self, date: impl Into<DocDate>) -> Self {
        self.request.doc_date = Some(date.into());
        self
    }

    pub fn company_code(mut self, code: impl Into<String>) -> Self {
        self.request.company_code = Some(code.into());
        self
    }

    pub fn commit(mut self, commit: bool) -> Self {
        self.request.commit = Some(commit);
        self
    }

    pub fn currency(mut self, code: impl Into<String>) -> Self {
        self.request.currency_code = Some(code.into());
        self
    }

    /// Override the configured client identifier for this request.
    pub fn client(mut self, client: impl Into<String>) -> Self {
        self.request.client = Some(Some(client.into()));
        self
    }

    /// Send no client identifier, even if one is configured.
    pub fn disable_client(mut self) -> Self {
        self.request.client = Some(None);
        self
    }

    pub fn doc_code(mut self, code: impl Into<String>) -> Self {
        self.request.doc_code = Some(code.into());
        self
    }

    pub fn doc_type(mut self, doc_type: DocType) -> Self {
        self.request.doc_type = Some(doc_type);
        self
    }

    pub fn detail_level(mut self, level: DetailLevel) -> Self {
        self.request.detail_level = Some(level);
        self
    }

    pub fn customer_usage_type(mut self, usage: impl Into<String>) -> Self {
        self.request.customer_usage_type = Some(usage.into());
        self
    }

    pub fn discount(mut self, amount: Decimal) -> Self {
        self.request.discount = Some(amount);
        self
    }

    pub fn reference_code(mut self, reference: impl Into<String>) -> Self {
        self.request.reference_code = Some(reference.into());
        self
    }

    pub fn purchase_order_no(mut self, number: impl Into<String>) -> Self {
        self.request.purchase_order_no = Some(number.into());
        self
    }

    pub fn exemption_no(mut self, number: impl Into<String>) -> Self {
        self.request.exemption_no = Some(number.into());
        self
    }

    /// Document-level ship-from `AddressCode`.
    pub fn origin_code(mut self, code: impl Into<String>) -> Self {
        self.request.origin_code = Some(code.into());
        self
    }

    /// Document-level ship-to `AddressCode`.
    pub fn destination_code(mut self, code: impl Into<String>) -> Self {
        self.request.destination_code = Some(code.into());
        self
    }

    pub fn add_line(mut self, line: TaxLine) -> Self {
        self.request.lines.get_or_insert_with(Vec::new).push(line);
        self
    }

    pub fn add_address(mut self, address: TaxAddress) -> Self {
        self.request
            .addresses
            .get_or_insert_with(Vec::new)
            .push(address);
        self
    }

    /// Finish the field set. Defaults and validation happen in
    /// [`TaxRequest::prepare`].
    pub fn build(self) -> TaxRequest {
        self.request
    }
}

/// Builder for TaxLine.
pub struct TaxLineBuilder {
    line: TaxLine,
}

impl TaxLineBuilder {
    pub fn new(
        line_no: impl Into<String>,
        origin_code: impl Into<String>,
        destination_code: impl Into<String>,
        qty: Decimal,
        amount: Decimal,
    ) -> Self {
        Self {
            line: TaxLine {
                line_no: Some(line_no.into()),
                origin_code: Some(origin_code.into()),
                destination_code: Some(destination_code.into()),
                qty: Some(qty),
                amount: Some(amount),
                ..Default::default()
            },
        }
    }

    pub fn item_code(mut self, code: impl Into<String>) -> Self {
        self.line.item_code = Some(code.into());
        self
    }

    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.line.description = Some(desc.into());
        self
    }

    pub fn tax_code(mut self, code: impl Into<String>) -> Self {
        self.line.tax_code = Some(code.into());
        self
    }

    pub fn discounted(mut self, discounted: bool) -> Self {
        self.line.discounted = Some(discounted);
        self
    }

    pub fn customer_usage_type(mut self, usage: impl Into<String>) -> Self {
        self.line.customer_usage_type = Some(usage.into());
        self
    }

    pub fn refs(mut self, ref1: impl Into<String>, ref2: impl Into<String>) -> Self {
        self.line.ref1 = Some(ref1.into());
        self.line.ref2 = Some(ref2.into());
        self
    }

    pub fn build(self) -> TaxLine {
        self.line
    }
}

/// Builder for TaxAddress.
pub struct TaxAddressBuilder {
    entry: TaxAddress,
}

impl TaxAddressBuilder {
    pub fn new(address_code: impl Into<String>) -> Self {
        Self {
            entry: TaxAddress {
                address_code: Some(address_code.into()),
                ..Default::default()
            },
        }
    }

    /// Use a full street address.
    pub fn address(mut self, address: Address) -> Self {
        self.entry.address = address;
        self
    }

    pub fn line1(mut self, line: impl Into<String>) -> Self {
        self.entry.address.line1 = Some(line.into());
        self
    }

    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.entry.address.city = Some(city.into());
        self
    }

    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.entry.address.region = Some(region.into());
        self
    }

    pub fn postal_code(mut self, postal_code: impl Into<String>) -> Self {
        self.entry.address.postal_code = Some(postal_code.into());
        self
    }

    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.entry.address.country = Some(country.into());
        self
    }

    pub fn tax_region_id(mut self, id: u64) -> Self {
        self.entry.tax_region_id = Some(id);
        self
    }

    pub fn coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.entry.latitude = Some(latitude);
        self.entry.longitude = Some(longitude);
        self
    }

    pub fn build(self) -> TaxAddress {
        self.entry
    }
}

/// Builder for Address.
#[derive(Default)]
pub struct AddressBuilder {
    address: Address,
}

impl AddressBuilder {
    pub fn new(line1: impl Into<String>) -> Self {
        Self {
            address: Address {
                line1: Some(line1.into()),
                ..Default::default()
            },
        }
    }

    pub fn line2(mut self, line: impl Into<String>) -> Self {
        self.address.line2 = Some(line.into());
        self
    }

    pub fn line3(mut self, line: impl Into<String>) -> Self {
        self.address.line3 = Some(line.into());
        self
    }

    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.address.city = Some(city.into());
        self
    }

    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.address.region = Some(region.into());
        self
    }

    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.address.country = Some(country.into());
        self
    }

    pub fn postal_code(mut self, postal_code: impl Into<String>) -> Self {
        self.address.postal_code = Some(postal_code.into());
        self
    }

    pub fn build(self) -> Address {
        self.address
    }
}
