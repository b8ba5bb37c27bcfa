//! Error types for registry misuse.
//!
//! These errors signal a bug in the host's setup code (duplicate names,
//! unknown actions, wrong value types, rejected values on direct sets).
//! Malformed end-user input is never reported through this type; see
//! [`ParseFailure`](crate::ParseFailure) instead.

use thiserror::Error;

use crate::flags::Scope;
use crate::value::FlagType;

/// Errors returned by the registry API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A flag with this name already exists in the scope.
    #[error("flag `{name}` is already defined in {scope} scope")]
    DuplicateFlag { name: String, scope: Scope },

    /// An action with this name already exists.
    #[error("action `{0}` is already defined")]
    DuplicateAction(String),

    /// A flag was attached to an action that has not been defined.
    #[error("action `{0}` is not defined")]
    UndefinedAction(String),

    /// No flag with this name is visible from the current scope.
    #[error("flag `{0}` is not defined in the current scope")]
    UndefinedFlag(String),

    /// The caller's type does not match the flag's declared type.
    #[error("flag `{name}` holds {actual} values, not {expected}")]
    TypeMismatch {
        name: String,
        expected: FlagType,
        actual: FlagType,
    },

    /// The flag's validator rejected the value; the flag was left unchanged.
    #[error("value {value} rejected by the validator of flag `{name}`")]
    FlagValidation { name: String, value: String },
}

/// Convenience alias for results with [`RegistryError`].
pub type Result<T> = std::result::Result<T, RegistryError>;
