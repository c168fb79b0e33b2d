//! Automation-specific error types.

use thiserror::Error;

use crate::key::OwnerKind;

/// Errors from parameter registration and automation mutations.
#[derive(Error, Debug)]
pub enum AutomationError {
    /// A value of the wrong kind was supplied for a parameter.
    #[error("Parameter '{key}' type mismatch: expected {expected}, got {got}")]
    TypeMismatch {
        /// Full `owner::name` id of the parameter.
        key: String,
        /// Declared value kind.
        expected: &'static str,
        /// Kind of the value supplied.
        got: &'static str,
    },

    /// A key registered for one owner kind was assigned to a different owner.
    #[error("Parameter '{key}' is declared for {declared} owners, not {actual}")]
    OwnerMismatch {
        /// Full `owner::name` id of the parameter.
        key: String,
        /// Owner kind the parameter was registered for.
        declared: OwnerKind,
        /// Owner kind of the data it was assigned to.
        actual: OwnerKind,
    },

    /// A mutation addressed a key the owner never declared.
    #[error("Parameter '{key}' is not declared on this owner")]
    NotDeclared {
        /// Full `owner::name` id of the parameter.
        key: String,
    },

    /// A mutation was attempted while a refresh pass was running on the owner.
    #[error("Parameter '{key}' cannot be mutated during a refresh pass")]
    RefreshInProgress {
        /// Full `owner::name` id of the parameter.
        key: String,
    },

    /// A parameter with this owner and name is already registered.
    #[error("Automation parameter already registered: {full_id}")]
    AlreadyRegistered {
        /// The `owner::name` id that collided.
        full_id: String,
    },
}
