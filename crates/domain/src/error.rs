//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`ControlHubError`] via `#[from]`. The `Display` text of every variant is
//! the human-readable message returned to API callers.

use crate::script::StepKind;

/// Base error for every controlhub use-case.
#[derive(Debug, thiserror::Error)]
pub enum ControlHubError {
    /// The request payload is malformed or violates an invariant.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A referenced resource does not exist.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// The request conflicts with existing state.
    #[error(transparent)]
    Conflict(#[from] ConflictError),

    /// A storage or collaborator call failed.
    #[error("Storage error: {0}")]
    Storage(Box<dyn std::error::Error + Send + Sync>),
}

/// Payload validation failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Malformed JSON payload: {0}")]
    MalformedPayload(String),

    // Scripts
    #[error("Script name is required.")]
    ScriptNameRequired,
    #[error("Script name must be a string.")]
    ScriptNameType,
    #[error("Script name cannot be empty.")]
    ScriptNameEmpty,
    #[error("steps parameter is required.")]
    StepsRequired,
    #[error("steps must be a list.")]
    StepsNotList,
    #[error("Steps should be in list of dictionaries.")]
    InvalidStepsType,
    #[error(
        "{key} is an invalid step. Supported step types are {} with case-sensitive.",
        StepKind::supported()
    )]
    UnsupportedStepKind { key: String },
    #[error("For {kind} step nested elements should be in dictionary.")]
    MalformedStepValue { kind: StepKind },
    #[error("order key is missing for {kind} step.")]
    MissingOrderKey { kind: StepKind },
    #[error("order should be an integer for {kind} step.")]
    InvalidOrderType { kind: StepKind },
    #[error("order {order} is out of range for {kind} step.")]
    OrderOutOfRange { order: u64, kind: StepKind },
    #[error("order with value {order} is also found in {kind}. It should be unique for each step item.")]
    DuplicateOrder { order: i64, kind: StepKind },
    #[error("Nothing to update for the given payload.")]
    NothingToUpdate,
    #[error("ACL name must be a string.")]
    AclNameType,
    #[error("ACL must be a string.")]
    AclType,
    #[error("ACL cannot be empty.")]
    EmptyAclName,

    // Scheduling
    #[error("parameters field is required.")]
    ParametersRequired,
    #[error("parameters must be a dictionary.")]
    ParametersNotMapping,
    #[error("parameters cannot be an empty.")]
    ParametersEmpty,
    #[error("write steps KV pair is missing for {script} script.")]
    WriteStepsMissing { script: String },
    #[error("Schedule name cannot be empty.")]
    ScheduleNameEmpty,
    #[error("Process name cannot be empty.")]
    ProcessNameEmpty,
    #[error("Interval schedule requires a positive repeat.")]
    IntervalWithoutRepeat,

    // ACLs
    #[error("name param is required")]
    AclNameRequired,
    #[error("name must be a string")]
    AclNameNotString,
    #[error("name cannot be empty")]
    AclNameEmpty,
    #[error("{field} param is required")]
    AclFieldRequired { field: &'static str },
    #[error("{field} must be in list")]
    AclFieldNotList { field: &'static str },
    #[error("{field} entries are malformed: {reason}")]
    AclEntryMalformed { field: &'static str, reason: String },
    #[error("Nothing to update in a given payload. Only service and url can be updated")]
    AclNothingToUpdate,
    #[error("acl name is missing in given payload request")]
    AclNameMissing,
    #[error("Nothing to delete as there is no ACL attached with {service} service")]
    NoAclAttached { service: String },

    // Proxy
    #[error("service_name KV pair is required.")]
    ServiceNameRequired,
    #[error("service_name must be in string.")]
    ServiceNameType,
    #[error("service_name cannot be empty.")]
    ServiceNameEmpty,
    #[error(
        "Nothing to add in proxy for {service} service. Pass atleast one {} verb in the given payload.",
        crate::proxy::HttpVerb::supported()
    )]
    NoProxyVerbs { service: String },
    #[error("{key} is not a supported verb. Supported verbs are {}.", crate::proxy::HttpVerb::supported())]
    UnsupportedVerb { key: String },
    #[error("Value cannot be empty for a verb in the given payload.")]
    EmptyVerbValue,
    #[error("Value should be a dictionary object for {verb} key.")]
    VerbValueType { verb: String },
    #[error("Public URL must start with {} prefix for {verb} key.", crate::proxy::PUBLIC_PREFIX.trim_end_matches('/'))]
    PublicPathPrefix { verb: String },
    #[error("Backend URL must be a string for {verb} key.")]
    BackendPathType { verb: String },
    #[error("For {service} service, no proxy operation is configured.")]
    ProxyNotConfigured { service: String },
}

/// A referenced resource could not be found.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotFoundError {
    /// Lookup of a script by name for reading or scheduling.
    #[error("Script with name {name} is not found.")]
    Script { name: String },
    /// Lookup of a script that is the target of a mutation.
    #[error("No such {name} script found.")]
    ScriptTarget { name: String },
    /// ACL referenced by a script.
    #[error("ACL with name {name} is not found.")]
    AclReference { name: String },
    /// ACL addressed directly.
    #[error("No such {name} ACL found")]
    Acl { name: String },
    /// ACL named in a service attach request.
    #[error("{name} ACL does not exist")]
    AttachedAcl { name: String },
    /// Service without a schedule.
    #[error("{name} service does not exist.")]
    ServiceSchedule { name: String },
    /// Service absent from the service registry.
    #[error("{name} service not found.")]
    Service { name: String },
    /// Schedule addressed by id.
    #[error("Schedule with id {id} is not found.")]
    Schedule { id: String },
    /// Configuration category.
    #[error("{name} category does not exist.")]
    Category { name: String },
    /// A write-step placeholder with no matching parameter.
    #[error("{name} param is required by write steps of {script} script.")]
    Placeholder { name: String, script: String },
    /// A supplied parameter that no write-step placeholder references.
    #[error("{name} param is not found in write steps for {script} script.")]
    Parameter { name: String, script: String },
}

/// The request conflicts with existing state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConflictError {
    #[error("Script with name {name} already exists.")]
    DuplicateScript { name: String },
    #[error("{name} name already exists.")]
    DuplicateAcl { name: String },
    #[error("{acl} ACL is in use by {script} script and cannot be deleted.")]
    AclInUse { acl: String, script: String },
    #[error("{name} schedule already exists.")]
    ScheduleAlreadyExists { name: String },
    #[error("{name} category already exists and cannot be used as a script run category.")]
    CategoryAlreadyExists { name: String },
    #[error("A {service} service has already ACL attached")]
    AclAlreadyAttached { service: String },
    #[error("Proxy is already configured for {service} service. Delete it first and then re-create.")]
    ProxyAlreadyConfigured { service: String },
}

impl ConflictError {
    /// Whether this conflict is a duplicate-resource error (as opposed to a
    /// state precondition such as an existing schedule).
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        matches!(
            self,
            Self::DuplicateScript { .. } | Self::DuplicateAcl { .. } | Self::AclInUse { .. }
        )
    }
}
