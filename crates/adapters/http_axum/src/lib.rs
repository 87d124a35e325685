//! # controlhub-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve the **JSON control plane API** under `/api`
//!   (`/api/control/script`, `/api/ACL`, `/api/service/{name}/ACL`, `/api/proxy`)
//! - Map HTTP requests into application service calls (driving adapter)
//! - Map application results and errors into `{"message": ...}` responses
//!
//! ## Dependency rule
//! Depends on `controlhub-app` (for port traits and services) and
//! `controlhub-domain` (for domain types used in request/response mapping).
//! Never leaks axum types into the domain.

pub mod api;
pub mod error;
pub mod extract;
pub mod router;
pub mod state;
