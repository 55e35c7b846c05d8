//! Card issuer outbound adapters.
//!
//! Provides a reqwest implementation of the `CardIssuer` port.

mod dto;
mod http_issuer;

pub use http_issuer::HttpCardIssuer;
