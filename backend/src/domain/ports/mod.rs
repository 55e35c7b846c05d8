//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports ([`ClientRepository`], [`CardIssuer`], [`NotificationSink`])
//! are implemented by outbound adapters. Driving ports ([`ClientRegistry`],
//! [`CardIssuance`]) are implemented by domain services and consumed by
//! inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod card_issuance;
mod card_issuer;
mod client_registry;
mod client_repository;
mod notification_sink;

#[cfg(test)]
pub use card_issuance::MockCardIssuance;
pub use card_issuance::CardIssuance;
#[cfg(test)]
pub use card_issuer::MockCardIssuer;
pub use card_issuer::{CardIssuer, FixtureCardIssuer};
#[cfg(test)]
pub use client_registry::MockClientRegistry;
pub use client_registry::{ClientRegistration, ClientRegistry};
#[cfg(test)]
pub use client_repository::MockClientRepository;
pub use client_repository::{ClientRepository, ClientRepositoryError};
#[cfg(test)]
pub use notification_sink::MockNotificationSink;
pub use notification_sink::{NotificationError, NotificationSink, NullNotificationSink};
