//! # avatax
//!
//! Typed async client for the AvaTax REST API (v1): address validation,
//! point-of-sale tax estimates, and full GetTax document computation.
//!
//! Requests are built and validated locally; nothing is sent until a
//! document passes its required-field checks. Monetary values use
//! [`rust_decimal::Decimal`].
//!
//! ## Quick Start
//!
//! ```no_run
//! use avatax::core::*;
//! use avatax::{AvaTaxClient, AvaTaxConfig, Credentials, Environment};
//! use rust_decimal_macros::dec;
//!
//! # async fn run() -> Result<(), AvaTaxError> {
//! let config = AvaTaxConfig::new(Credentials::new("account", "license-key")?)
//!     .environment(Environment::Sandbox);
//! let client = AvaTaxClient::new(config)?;
//!
//! let request = TaxRequestBuilder::new("101")
//!     .add_line(TaxLineBuilder::new("1", "01", "02", dec!(1), dec!(100)).build())
//!     .add_address(TaxAddressBuilder::new("01").line1("118 N Clark St").postal_code("60602").build())
//!     .add_address(TaxAddressBuilder::new("02").line1("45 Fremont St").postal_code("94105").build())
//!     .build();
//!
//! let result = client.get_tax(request).await?;
//! println!("{result:?}");
//! # Ok(())
//! # }
//! ```
//!
//! ## Operations
//!
//! | Method | Endpoint | Returns |
//! |--------|----------|---------|
//! | [`AvaTaxClient::validate_address`] | `GET /1.0/address/validate` | normalized address |
//! | [`AvaTaxClient::estimate_tax`] | `GET /1.0/tax/{lat},{lon}/get` | combined rate |
//! | [`AvaTaxClient::estimate_tax_details`] | `GET /1.0/tax/{lat},{lon}/get` | jurisdiction details |
//! | [`AvaTaxClient::get_tax`] | `POST /1.0/tax/get` | response document, unmodified |
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `rustls-tls` (default) | TLS via rustls |
//! | `native-tls` | TLS via the platform library |

pub mod address;
mod client;
pub mod config;
pub mod core;
pub mod estimate;
mod tax;
pub mod transport;

pub use address::ValidatedAddress;
pub use client::AvaTaxClient;
pub use config::{AvaTaxConfig, Credentials, Environment};
pub use estimate::{EstimateRequest, TaxDetail};

// Re-export core types at crate root for convenience
pub use crate::core::*;
