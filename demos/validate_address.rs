//! Validate an address and estimate tax at a coordinate.
//!
//! Run with: `AVATAX_USERNAME=... AVATAX_PASSWORD=... AVATAX_ENVIRONMENT=sandbox cargo run --example validate_address`

use avatax::core::AvaTaxError;
use avatax::{AvaTaxClient, EstimateRequest};
use serde_json::json;

#[tokio::main]
async fn main() -> Result<(), AvaTaxError> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let client = AvaTaxClient::from_env()?;

    let record = json!({
        "Line1": "118 N Clark St",
        "Line2": "Suite 100",
        "Line3": "ATTN Accounts Payable",
        "City": "Chicago",
        "Region": "IL",
        "PostalCode": "60602",
        "Country": "US"
    });
    match client.validate_address_record(&record).await {
        Ok(Some(address)) => println!("normalized: {address:?}"),
        Ok(None) => println!("no address in response"),
        Err(e) => println!("validation failed: {e}"),
    }

    let estimate = EstimateRequest::new(47.627935, -122.51702, 310.12)?;
    println!("rate: {:?}", client.estimate_tax(&estimate).await?);
    for detail in client.estimate_tax_details(&estimate).await?.unwrap_or_default() {
        println!(
            "  {:<10} {:<24} {:?}",
            detail.juris_type.unwrap_or_default(),
            detail.juris_name.unwrap_or_default(),
            detail.rate
        );
    }
    Ok(())
}
