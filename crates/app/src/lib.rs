//! # controlhub-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `AclRepository`: CRUD for ACLs
//!   - `ScriptRepository`: CRUD for automation scripts
//!   - `ConfigurationManager`: categories and their parent/child links
//!   - `Scheduler`: schedules and queued tasks
//!   - `ServiceRegistry`: lookup of known services
//! - Define **driving/inbound ports** as use-case structs:
//!   - `AclService`: ACL CRUD
//!   - `ServiceAclService`: attach/detach an ACL to a service
//!   - `ScriptService`: script CRUD and scheduling
//!   - `ProxyService`: register and remove service proxies
//!   - `ServiceCatalog`: bootstrap known services
//! - Provide **in-process infrastructure** (service and proxy registries) that doesn't need IO
//! - Orchestrate domain objects without knowing *how* persistence or IO works
//!
//! ## Dependency rule
//! Depends on `controlhub-domain` only (plus `tokio::sync` for locks).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod proxy_registry;
pub mod service_registry;
pub mod services;
