//! # controlhub-domain
//!
//! Pure domain model for the controlhub IoT control-plane.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **ACLs** (named lists of service/URL patterns used for caller authorisation)
//! - Define **Automation scripts** (ordered control steps) and their step schema
//! - Define **Placeholders** (`$name$` tokens bound into write steps at schedule time)
//! - Define **Schedules** and **Tasks** (how a script is run by the scheduler)
//! - Define **Categories** (named configuration bags with parent/child nesting)
//! - Define **Service records** and **Proxy routes**
//! - Contain all payload validation and invariant enforcement
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod acl;
pub mod category;
pub mod proxy;
pub mod schedule;
pub mod script;
pub mod service;
