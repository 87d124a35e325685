//! Application services: use-case implementations.
//!
//! Each service struct accepts port trait implementations via generic parameters
//! (constructor injection), keeping this layer decoupled from concrete adapters.

pub mod acl_service;
pub mod proxy_service;
pub mod script_service;
pub mod service_acl_service;
pub mod service_catalog;

#[cfg(test)]
pub(crate) mod fakes;
