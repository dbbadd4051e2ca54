use chrono::Datelike;

use super::error::ValidationError;
use super::types::*;

/// Render a document date in the wire form.
///
/// Structured dates become `YYYY-MM-DD` with zero-padded month and day; the
/// year is written as is. Text passes through unchanged.
pub fn normalize_doc_date(date: &DocDate) -> String {
    match date {
        DocDate::Date(d) => format!("{}-{:02}-{:02}", d.year(), d.month(), d.day()),
        DocDate::Text(text) => text.clone(),
    }
}

/// Check the minimum field combination for the address lookup call:
/// `Line1` + `PostalCode`, or `Line1` + `City` + `Region`.
pub fn validate_lookup_address(address: &Address) -> Result<(), ValidationError> {
    if has_street_address(address) {
        Ok(())
    } else {
        Err(ValidationError::new(
            "address",
            "you must specify at least Line1 and PostalCode, or Line1, City and Region",
        ))
    }
}

/// Validate one GetTax line. All of `LineNo`, `DestinationCode`, `OriginCode`,
/// `Qty` and `Amount` must be present; zero is a present value.
pub fn validate_tax_line(line: &TaxLine, index: usize) -> Result<(), ValidationError> {
    let required: [(&str, bool); 5] = [
        ("LineNo", present(&line.line_no)),
        ("DestinationCode", present(&line.destination_code)),
        ("OriginCode", present(&line.origin_code)),
        ("Qty", line.qty.is_some()),
        ("Amount", line.amount.is_some()),
    ];

    match required.iter().find(|(_, ok)| !ok) {
        Some((field, _)) => Err(ValidationError::at(
            "Lines",
            index,
            field,
            format!("line {index} is missing required field {field}"),
        )),
        None => Ok(()),
    }
}

/// Validate one GetTax address entry.
///
/// An entry needs an `AddressCode` and a way to locate it: a street address
/// (`Line1` + `PostalCode`, or `Line1` + `City` + `Region`), a `TaxRegionId`,
/// or a `Latitude`/`Longitude` pair.
pub fn validate_tax_address(entry: &TaxAddress, index: usize) -> Result<(), ValidationError> {
    if !present(&entry.address_code) {
        return Err(ValidationError::at(
            "Addresses",
            index,
            "AddressCode",
            format!("address {index} is missing required field AddressCode"),
        ));
    }

    for (field, value) in [("Latitude", entry.latitude), ("Longitude", entry.longitude)] {
        if value.is_some_and(|v| !v.is_finite()) {
            return Err(ValidationError::at(
                "Addresses",
                index,
                field,
                format!("address {index} has a non-finite {field}"),
            ));
        }
    }

    let located = has_street_address(&entry.address)
        || entry.tax_region_id.is_some()
        || (entry.latitude.is_some() && entry.longitude.is_some());

    if located {
        Ok(())
    } else {
        Err(ValidationError::at(
            "Addresses",
            index,
            "Line1",
            format!(
                "address {index} needs Line1 and PostalCode, Line1, City and Region, \
                 a TaxRegionId, or Latitude and Longitude"
            ),
        ))
    }
}

/// Validate a GetTax request.
///
/// Checks run in a fixed order and stop at the first failure: `CustomerCode`,
/// presence of `Lines` and `Addresses`, then each line in order, then each
/// address in order.
pub fn validate_tax_request(request: &TaxRequest) -> Result<(), ValidationError> {
    if !present(&request.customer_code) {
        return Err(ValidationError::new("CustomerCode", "customer code is required"));
    }

    let lines = match request.lines.as_deref() {
        Some(lines) if !lines.is_empty() => lines,
        _ => return Err(ValidationError::new("Lines", "at least one line is required")),
    };

    let addresses = match request.addresses.as_deref() {
        Some(addresses) if !addresses.is_empty() => addresses,
        _ => {
            return Err(ValidationError::new(
                "Addresses",
                "at least one address is required",
            ));
        }
    };

    lines
        .iter()
        .enumerate()
        .try_for_each(|(i, line)| validate_tax_line(line, i))?;

    addresses
        .iter()
        .enumerate()
        .try_for_each(|(i, entry)| validate_tax_address(entry, i))
}

fn has_street_address(address: &Address) -> bool {
    present(&address.line1)
        && (present(&address.postal_code) || (present(&address.city) && present(&address.region)))
}

/// Blank text counts as absent.
fn present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|s| !s.trim().is_empty())
}
