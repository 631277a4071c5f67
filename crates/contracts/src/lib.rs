//! Shared contracts: domain aggregates, DTOs and system types used by the
//! backend and by API clients.

pub mod domain;
pub mod system;
