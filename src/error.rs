//! Errors raised while processing a single logging command.
//!
//! A command error aborts that command only. Whether it fails the step is
//! up to the embedding run.

use std::path::PathBuf;

use uuid::Uuid;

/// Errors a command handler or the dispatcher can return.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{command}: missing required property '{property}'")]
    MissingProperty {
        command: &'static str,
        property: &'static str,
    },

    #[error("{0}: a non-empty data value is required")]
    MissingData(&'static str),

    #[error("logdetail: a non-empty, non-nil timeline record id is required")]
    MissingRecordId,

    #[error("logdetail: a name is required to create timeline record {0}")]
    MissingRecordName(Uuid),

    #[error("logdetail: a type is required to create timeline record {0}")]
    MissingRecordType(Uuid),

    #[error("{command}: invalid value for '{property}': {reason}")]
    InvalidValue {
        command: &'static str,
        property: &'static str,
        reason: String,
    },

    #[error("setendpoint: '{0}' is not a valid endpoint field")]
    InvalidEndpointField(String),

    #[error("logdetail: cannot change the parent of timeline record {id}")]
    ParentChanged { id: Uuid },

    #[error("logdetail: parent timeline record {parent} has not been created")]
    UnknownParent { parent: Uuid },

    #[error("setendpoint: no endpoint with id {0}")]
    UnknownEndpoint(Uuid),

    #[error("{command}: variable '{name}' is read-only")]
    ReadOnlyVariable { command: &'static str, name: String },

    #[error("{0}: secret values cannot span multiple lines")]
    MultilineSecret(&'static str),

    #[error("{command}: attachment file not found: {}", path.display())]
    AttachmentNotFound { command: &'static str, path: PathBuf },

    #[error("'{0}' is not allowed in restricted mode")]
    Restricted(String),
}

/// The broad category of a [`CommandError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required property or payload was absent or empty.
    MissingRequiredField,

    /// A value was present but malformed.
    InvalidValue,

    /// The command contradicts state established earlier in the run.
    InvariantViolation,

    /// The command is well-formed but not permitted.
    PolicyViolation,
}

impl CommandError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingProperty { .. }
            | Self::MissingData(_)
            | Self::MissingRecordId
            | Self::MissingRecordName(_)
            | Self::MissingRecordType(_) => ErrorKind::MissingRequiredField,
            Self::InvalidValue { .. }
            | Self::InvalidEndpointField(_)
            | Self::AttachmentNotFound { .. } => ErrorKind::InvalidValue,
            Self::ParentChanged { .. }
            | Self::UnknownParent { .. }
            | Self::UnknownEndpoint(_)
            | Self::ReadOnlyVariable { .. } => ErrorKind::InvariantViolation,
            Self::MultilineSecret(_) | Self::Restricted(_) => ErrorKind::PolicyViolation,
        }
    }
}

/// Errors building a command registry.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("command name '{0}' is registered more than once")]
    DuplicateName(String),
}

pub type Result<T> = core::result::Result<T, CommandError>;
