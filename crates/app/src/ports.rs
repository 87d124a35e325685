//! Port definitions: traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod acl_repo;
pub mod configuration;
pub mod scheduler;
pub mod script_repo;
pub mod service_registry;

pub use acl_repo::AclRepository;
pub use configuration::ConfigurationManager;
pub use scheduler::Scheduler;
pub use script_repo::ScriptRepository;
pub use service_registry::ServiceRegistry;
