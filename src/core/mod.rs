//! Request types, builders, and client-side validation.
//!
//! Everything here is pure: no I/O, no configuration. The network side lives
//! in [`crate::transport`] and the operation modules.

mod builder;
mod error;
mod types;
mod validation;

pub use builder::*;
pub use error::*;
pub use types::*;
pub use validation::*;
