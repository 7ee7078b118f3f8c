//! Backend library modules.
//!
//! Layering follows the ports-and-adapters split: `domain` holds the error
//! taxonomy, entities, policy, and use cases; `inbound` adapts HTTP onto the
//! driving ports; `outbound` implements the repository ports over PostgreSQL
//! and an in-memory store; `server` wires everything into an Actix
//! application.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod outbound;
pub mod server;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
