//! taxbot-client: Tax calculation endpoint client
//!
//! This crate sends completed income/country pairs to the remote calculator
//! and turns whatever comes back into a displayable reply.

pub mod error;
pub mod interpreter;
pub mod transport;
pub mod types;

pub use error::{Error, Result};
pub use interpreter::{Interpretation, interpret};
pub use transport::{DEFAULT_ENDPOINT, HttpTransport, TaxTransport};
pub use types::{TaxReply, TaxRequest};

pub use reqwest::StatusCode;
