//! HTTP behaviour of AvaTaxClient against a mock AvaTax server.
//!
//! ## Endpoints Tested
//!
//! | Method | Path | Test |
//! |--------|------|------|
//! | GET    | `/1.0/address/validate` | `validate_address_*` |
//! | GET    | `/1.0/tax/{lat},{lon}/get` | `estimate_*` |
//! | POST   | `/1.0/tax/get` | `get_tax_*` |

use avatax::core::*;
use avatax::{AvaTaxClient, AvaTaxConfig, Credentials, EstimateRequest};
use rust_decimal_macros::dec;
use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(mock_server: &MockServer) -> AvaTaxClient {
    let config = AvaTaxConfig::new(Credentials::new("user", "pass").unwrap())
        .host(mock_server.uri())
        .client("test-suite,1.0");
    AvaTaxClient::new(config).unwrap()
}

fn two_line_request() -> TaxRequest {
    TaxRequestBuilder::new("101")
        .doc_date(chrono::NaiveDate::from_ymd_opt(2014, 1, 1).unwrap())
        .company_code("APITrialCompany")
        .add_line(
            TaxLineBuilder::new("1", "01", "02", dec!(1), dec!(10))
                .item_code("N543")
                .tax_code("NT")
                .build(),
        )
        .add_line(
            TaxLineBuilder::new("2", "01", "02", dec!(3), dec!(150))
                .description("Red Size 7 Widget")
                .build(),
        )
        .add_address(
            TaxAddressBuilder::new("01")
                .line1("45 Fremont Street")
                .city("San Francisco")
                .region("CA")
                .build(),
        )
        .add_address(
            TaxAddressBuilder::new("02")
                .line1("118 N Clark St")
                .postal_code("60602")
                .build(),
        )
        .build()
}

fn get_tax_response() -> Value {
    json!({
        "DocCode": "INV001",
        "DocDate": "2014-01-01",
        "ResultCode": "Success",
        "TotalAmount": 460,
        "TotalTax": 41.97,
        "TaxLines": [
            {"LineNo": "1", "Tax": 0, "Rate": 0},
            {"LineNo": "2", "Tax": 41.97, "Rate": 0.0925}
        ]
    })
}

// ── POST /1.0/tax/get ────────────────────────────────────────────────

#[tokio::test]
async fn get_tax_sends_document_and_returns_response_unmodified() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/1.0/tax/get"))
        .and(header("authorization", "Basic dXNlcjpwYXNz"))
        .and(header("content-type", "application/json"))
        .and(header("accept", "application/json"))
        .and(body_partial_json(json!({
            "CustomerCode": "101",
            "DocDate": "2014-01-01",
            "Commit": false,
            "CurrencyCode": "USD",
            "Client": "test-suite,1.0",
            "Lines": [
                {"LineNo": "1", "OriginCode": "01", "DestinationCode": "02", "Qty": 1, "Amount": 10},
                {"LineNo": "2", "OriginCode": "01", "DestinationCode": "02", "Qty": 3, "Amount": 150}
            ],
            "Addresses": [
                {"AddressCode": "01", "Line1": "45 Fremont Street", "City": "San Francisco", "Region": "CA"},
                {"AddressCode": "02", "Line1": "118 N Clark St", "PostalCode": "60602"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(get_tax_response()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let result = client.get_tax(two_line_request()).await.unwrap();
    assert_eq!(result, Some(get_tax_response()));
}

#[tokio::test]
async fn get_tax_with_empty_addresses_is_not_dispatched() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(get_tax_response()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut request = two_line_request();
    request.addresses = Some(Vec::new());

    let client = test_client(&mock_server);
    let err = client.get_tax(request).await.unwrap_err();
    let validation = err.validation().expect("validation error");
    assert_eq!(validation.field, "Addresses");
    assert_eq!(validation.index, None);
}

#[tokio::test]
async fn get_tax_reports_first_invalid_line_without_dispatch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut request = two_line_request();
    if let Some(lines) = request.lines.as_mut() {
        lines[1].qty = None;
    }

    let client = test_client(&mock_server);
    let err = client.get_tax(request).await.unwrap_err();
    assert_eq!(err.validation().and_then(|v| v.index), Some(1));
}

#[tokio::test]
async fn get_tax_disabled_client_is_omitted() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/1.0/tax/get"))
        .respond_with(ResponseTemplate::new(200).set_body_json(get_tax_response()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut request = two_line_request();
    request.client = Some(None);

    let client = test_client(&mock_server);
    client.get_tax(request).await.unwrap();

    let received = mock_server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&received[0].body).unwrap();
    assert!(body.get("Client").is_none());
}

#[tokio::test]
async fn get_tax_server_error_uses_first_message_summary() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/1.0/tax/get"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "ResultCode": "Error",
            "Messages": [
                {"Summary": "CompanyCode is not valid.", "Severity": "Error", "RefersTo": "CompanyCode"},
                {"Summary": "second message"}
            ]
        })))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    match client.get_tax(two_line_request()).await {
        Err(AvaTaxError::Service { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "CompanyCode is not valid.");
        }
        other => panic!("expected service error, got {other:?}"),
    }
}

#[tokio::test]
async fn get_tax_error_without_body_uses_fallback_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    match client.get_tax(two_line_request()).await {
        Err(AvaTaxError::Service { status, message }) => {
            assert_eq!(status, 503);
            assert_eq!(message, avatax::transport::SERVER_ERROR);
        }
        other => panic!("expected service error, got {other:?}"),
    }
}

#[tokio::test]
async fn get_tax_non_json_success_yields_no_document() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let result = client.get_tax(two_line_request()).await.unwrap();
    assert_eq!(result, None);
}

#[tokio::test]
async fn concurrent_calls_share_one_client() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/1.0/tax/get"))
        .respond_with(ResponseTemplate::new(200).set_body_json(get_tax_response()))
        .expect(3)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let cloned = client.clone();
    let (a, b, c) = tokio::join!(
        client.get_tax(two_line_request()),
        client.get_tax(two_line_request()),
        cloned.get_tax(two_line_request()),
    );
    assert!(a.unwrap().is_some());
    assert!(b.unwrap().is_some());
    assert!(c.unwrap().is_some());
}

#[tokio::test]
async fn connection_refused_is_transport_error() {
    let config = AvaTaxConfig::new(Credentials::new("user", "pass").unwrap()).host("http://127.0.0.1:1");
    let client = AvaTaxClient::new(config).unwrap();
    let err = client.get_tax(two_line_request()).await.unwrap_err();
    assert!(matches!(err, AvaTaxError::Transport(_)), "got {err:?}");
}

// ── GET /1.0/address/validate ────────────────────────────────────────

#[tokio::test]
async fn validate_address_sends_filtered_query_and_unwraps_address() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/1.0/address/validate"))
        .and(query_param("Line1", "118 N Clark St"))
        .and(query_param("City", "Chicago"))
        .and(query_param("Region", "IL"))
        .and(query_param("PostalCode", "60602"))
        .and(header("authorization", "Basic dXNlcjpwYXNz"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ResultCode": "Success",
            "Address": {
                "Line1": "118 N Clark St Ste 100",
                "City": "Chicago",
                "Region": "IL",
                "PostalCode": "60602-1304",
                "Country": "US",
                "County": "Cook",
                "AddressType": "H"
            }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let record = json!({
        "Line1": "118 N Clark St",
        "City": "Chicago",
        "Region": "IL",
        "PostalCode": "60602",
        "OrderId": "should-not-be-sent"
    });
    let address = client.validate_address_record(&record).await.unwrap().unwrap();
    assert_eq!(address.postal_code.as_deref(), Some("60602-1304"));
    assert_eq!(address.county.as_deref(), Some("Cook"));

    let received = mock_server.received_requests().await.unwrap();
    let query = received[0].url.query().unwrap_or_default();
    assert!(!query.contains("OrderId"));
}

#[tokio::test]
async fn validate_address_error_result_code_is_service_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/1.0/address/validate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ResultCode": "Error",
            "Messages": [{"Summary": "Address not found.", "Severity": "Error"}]
        })))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let address = AddressBuilder::new("1 Nowhere Rd").postal_code("00000").build();
    match client.validate_address(&address).await {
        Err(AvaTaxError::Service { status, message }) => {
            assert_eq!(status, 200);
            assert_eq!(message, "Address not found.");
        }
        other => panic!("expected service error, got {other:?}"),
    }
}

#[tokio::test]
async fn validate_address_incomplete_is_rejected_before_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let address = AddressBuilder::new("118 N Clark St").city("Chicago").build();
    let err = client.validate_address(&address).await.unwrap_err();
    assert!(matches!(err, AvaTaxError::Validation(_)));
}

// ── GET /1.0/tax/{lat},{lon}/get ─────────────────────────────────────

fn estimate_response() -> Value {
    json!({
        "Rate": 0.095,
        "Tax": 29.46,
        "ResultCode": "Success",
        "TaxDetails": [
            {"Country": "US", "Region": "WA", "JurisType": "State", "JurisName": "WASHINGTON",
             "Rate": 0.065, "Tax": 20.16, "TaxName": "WA STATE TAX"},
            {"Country": "US", "Region": "WA", "JurisType": "City", "JurisName": "BAINBRIDGE ISLAND",
             "Rate": 0.03, "Tax": 9.3, "TaxName": "WA CITY TAX"}
        ]
    })
}

#[tokio::test]
async fn estimate_returns_rate_only() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/1.0/tax/47.627935,-122.51702/get"))
        .and(query_param("saleamount", "310.12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(estimate_response()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let request = EstimateRequest::new(47.627935, -122.51702, 310.12).unwrap();
    let rate = client.estimate_tax(&request).await.unwrap();
    assert_eq!(rate, Some(dec!(0.095)));
}

#[tokio::test]
async fn estimate_details_returns_detail_list_only() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/1.0/tax/47.627935,-122.51702/get"))
        .respond_with(ResponseTemplate::new(200).set_body_json(estimate_response()))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let request = EstimateRequest::new(47.627935, -122.51702, 310.12).unwrap();
    let details = client.estimate_tax_details(&request).await.unwrap().unwrap();
    assert_eq!(details.len(), 2);
    assert_eq!(details[1].juris_name.as_deref(), Some("BAINBRIDGE ISLAND"));
    assert_eq!(details[1].rate, Some(dec!(0.03)));
}

#[test]
fn estimate_with_non_finite_input_fails_synchronously() {
    assert!(matches!(
        EstimateRequest::new(f64::NAN, -122.5, 10.0),
        Err(AvaTaxError::InvalidArgument(_))
    ));
    assert!(matches!(
        EstimateRequest::new(47.6, f64::INFINITY, 10.0),
        Err(AvaTaxError::InvalidArgument(_))
    ));
    assert!(matches!(
        EstimateRequest::new(47.6, -122.5, f64::NAN),
        Err(AvaTaxError::InvalidArgument(_))
    ));
}
