//! Compute tax for a two-line sales invoice against the sandbox.
//!
//! Run with: `AVATAX_USERNAME=... AVATAX_PASSWORD=... AVATAX_ENVIRONMENT=sandbox cargo run --example get_tax`

use avatax::AvaTaxClient;
use avatax::core::*;
use rust_decimal_macros::dec;

#[tokio::main]
async fn main() -> Result<(), AvaTaxError> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let client = AvaTaxClient::from_env()?;

    let request = TaxRequestBuilder::new("101")
        .doc_code("INV001")
        .doc_type(DocType::SalesOrder)
        .detail_level(DetailLevel::Tax)
        .add_line(
            TaxLineBuilder::new("1", "01", "02", dec!(1), dec!(10))
                .item_code("N543")
                .tax_code("NT")
                .build(),
        )
        .add_line(
            TaxLineBuilder::new("2", "01", "02", dec!(3), dec!(150))
                .item_code("T345")
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
        .build();

    match client.get_tax(request).await? {
        Some(doc) => println!("{doc:#}"),
        None => println!("service returned a non-JSON body"),
    }
    Ok(())
}
