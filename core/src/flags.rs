//! Flag definitions and the per-scope flag registry.
//!
//! Hosts describe flags with the [`Flag`] builder and hand them to the
//! [`Registry`](crate::Registry), which turns them into type-erased
//! [`FlagDefinition`]s stored in a [`FlagRegistry`] partition: one for global
//! flags and one per action.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{RegistryError, Result};
use crate::value::{FlagKind, FlagType, FlagValue};

/// Visibility of a flag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scope {
    /// Visible regardless of which action is executing.
    Global,
    /// Visible only while the named action is current.
    Action(String),
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => f.write_str("global"),
            Self::Action(name) => write!(f, "action `{name}`"),
        }
    }
}

type Validator = Box<dyn Fn(&FlagValue) -> bool>;

/// Builder for a typed flag.
///
/// Validators must be pure: they may run more than once for the same value
/// (direct sets, every parse) and must not have observable effects.
///
/// # Examples
///
/// ```
/// use chainargs_core::Flag;
///
/// let retries = Flag::integer("retries", 3)
///     .with_description("How often to retry")
///     .with_validator(|n| *n >= 0);
/// assert_eq!(retries.name(), "retries");
/// assert_eq!(*retries.default_value(), 3);
/// ```
pub struct Flag<T: FlagKind> {
    name: String,
    description: String,
    help: String,
    default: T,
    validator: Option<Box<dyn Fn(&T) -> bool>>,
}

impl<T: FlagKind> Flag<T> {
    /// Creates a flag with the given name and default value.
    pub fn new(name: impl Into<String>, default: T) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            help: String::new(),
            default,
            validator: None,
        }
    }

    /// Adds a one-line description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Adds longer help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = help.into();
        self
    }

    /// Attaches a validator that every new value must satisfy.
    pub fn with_validator(mut self, validator: impl Fn(&T) -> bool + 'static) -> Self {
        self.validator = Some(Box::new(validator));
        self
    }

    /// Returns the flag name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the default value.
    pub fn default_value(&self) -> &T {
        &self.default
    }

    pub(crate) fn into_definition(self, scope: Scope) -> FlagDefinition {
        let validator = self.validator.map(|check| -> Validator {
            Box::new(move |value: &FlagValue| T::from_value(value).is_some_and(|v| check(&v)))
        });
        let default = self.default.into_value();
        FlagDefinition {
            name: self.name,
            description: self.description,
            help: self.help,
            current: default.clone(),
            default,
            validator,
            scope,
        }
    }
}

impl Flag<bool> {
    /// Creates a boolean flag.
    pub fn boolean(name: impl Into<String>, default: bool) -> Self {
        Self::new(name, default)
    }
}

impl Flag<i64> {
    /// Creates an integer flag.
    pub fn integer(name: impl Into<String>, default: i64) -> Self {
        Self::new(name, default)
    }
}

impl Flag<f64> {
    /// Creates a floating point flag.
    pub fn double(name: impl Into<String>, default: f64) -> Self {
        Self::new(name, default)
    }
}

impl Flag<String> {
    /// Creates a string flag.
    pub fn string(name: impl Into<String>, default: impl Into<String>) -> Self {
        Self::new(name, default.into())
    }
}

impl<T: FlagKind + fmt::Debug> fmt::Debug for Flag<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Flag")
            .field("name", &self.name)
            .field("default", &self.default)
            .field("validated", &self.validator.is_some())
            .finish()
    }
}

/// A stored flag: metadata, default and current value.
pub struct FlagDefinition {
    name: String,
    description: String,
    help: String,
    default: FlagValue,
    current: FlagValue,
    validator: Option<Validator>,
    scope: Scope,
}

impl FlagDefinition {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    pub fn flag_type(&self) -> FlagType {
        self.default.flag_type()
    }

    pub fn default_value(&self) -> &FlagValue {
        &self.default
    }

    pub fn current_value(&self) -> &FlagValue {
        &self.current
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn is_validated(&self) -> bool {
        self.validator.is_some()
    }

    /// Returns `true` when the validator (if any) accepts `value`.
    pub fn accepts(&self, value: &FlagValue) -> bool {
        self.validator.as_ref().is_none_or(|check| check(value))
    }

    /// Type-checks, validates and stores `value`.
    ///
    /// On any failure the current value is left untouched.
    pub(crate) fn assign(&mut self, value: FlagValue) -> Result<()> {
        if value.flag_type() != self.flag_type() {
            return Err(RegistryError::TypeMismatch {
                name: self.name.clone(),
                expected: value.flag_type(),
                actual: self.flag_type(),
            });
        }
        if !self.accepts(&value) {
            return Err(RegistryError::FlagValidation {
                name: self.name.clone(),
                value: value.to_string(),
            });
        }
        self.current = value;
        Ok(())
    }

    pub(crate) fn restore_default(&mut self) {
        self.current = self.default.clone();
    }
}

impl fmt::Debug for FlagDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlagDefinition")
            .field("name", &self.name)
            .field("scope", &self.scope)
            .field("default", &self.default)
            .field("current", &self.current)
            .field("validated", &self.validator.is_some())
            .finish()
    }
}

/// Flags of a single scope, in definition order.
#[derive(Debug)]
pub struct FlagRegistry {
    scope: Scope,
    flags: Vec<FlagDefinition>,
}

impl FlagRegistry {
    pub fn new(scope: Scope) -> Self {
        Self {
            scope,
            flags: Vec::new(),
        }
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Stores a new flag in this scope.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateFlag`] if the name is taken.
    pub fn define<T: FlagKind>(&mut self, flag: Flag<T>) -> Result<()> {
        if self.contains(flag.name()) {
            return Err(RegistryError::DuplicateFlag {
                name: flag.name,
                scope: self.scope.clone(),
            });
        }
        self.flags.push(flag.into_definition(self.scope.clone()));
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    pub fn lookup(&self, name: &str) -> Option<&FlagDefinition> {
        self.flags.iter().find(|f| f.name == name)
    }

    fn lookup_mut(&mut self, name: &str) -> Option<&mut FlagDefinition> {
        self.flags.iter_mut().find(|f| f.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FlagDefinition> {
        self.flags.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Reads a flag as `T`.
    pub fn get<T: FlagKind>(&self, name: &str) -> Result<T> {
        let flag = self
            .lookup(name)
            .ok_or_else(|| RegistryError::UndefinedFlag(name.to_string()))?;
        T::from_value(&flag.current).ok_or_else(|| RegistryError::TypeMismatch {
            name: name.to_string(),
            expected: T::TYPE,
            actual: flag.flag_type(),
        })
    }

    /// Writes a flag from a typed value.
    pub fn set<T: FlagKind>(&mut self, name: &str, value: T) -> Result<()> {
        self.set_value(name, value.into_value())
    }

    /// Writes a flag from an already tagged value.
    pub fn set_value(&mut self, name: &str, value: FlagValue) -> Result<()> {
        self.lookup_mut(name)
            .ok_or_else(|| RegistryError::UndefinedFlag(name.to_string()))?
            .assign(value)
    }

    pub fn flag_type(&self, name: &str) -> Result<FlagType> {
        self.lookup(name)
            .map(FlagDefinition::flag_type)
            .ok_or_else(|| RegistryError::UndefinedFlag(name.to_string()))
    }

    /// Puts every flag of this scope back to its default value.
    pub fn restore_defaults(&mut self) {
        self.flags.iter_mut().for_each(FlagDefinition::restore_default);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn globals() -> FlagRegistry {
        let mut flags = FlagRegistry::new(Scope::Global);
        flags.define(Flag::boolean("global-get", false)).unwrap();
        flags.define(Flag::integer("retries", 3)).unwrap();
        flags
    }

    #[test]
    fn test_default_value_is_current_after_definition() {
        let flags = globals();
        assert!(!flags.get::<bool>("global-get").unwrap());
        assert_eq!(flags.get::<i64>("retries").unwrap(), 3);
    }

    #[test]
    fn test_duplicate_flag_in_scope() {
        let mut flags = globals();
        let err = flags.define(Flag::integer("retries", 1)).unwrap_err();
        assert_eq!(
            err,
            RegistryError::DuplicateFlag {
                name: "retries".to_string(),
                scope: Scope::Global,
            }
        );
    }

    #[test]
    fn test_set_each_type() {
        let mut flags = globals();
        flags.define(Flag::double("ratio", 1.1)).unwrap();
        flags.define(Flag::string("label", "bar")).unwrap();

        flags.set("global-get", true).unwrap();
        flags.set("retries", 42_i64).unwrap();
        flags.set("ratio", 2.5).unwrap();
        flags.set("label", "foo".to_string()).unwrap();

        assert!(flags.get::<bool>("global-get").unwrap());
        assert_eq!(flags.get::<i64>("retries").unwrap(), 42);
        assert_eq!(flags.get::<f64>("ratio").unwrap(), 2.5);
        assert_eq!(flags.get::<String>("label").unwrap(), "foo");
    }

    #[test]
    fn test_undefined_flag() {
        let mut flags = globals();
        assert_eq!(
            flags.get::<bool>("nope").unwrap_err(),
            RegistryError::UndefinedFlag("nope".to_string())
        );
        assert!(matches!(
            flags.set("nope", true),
            Err(RegistryError::UndefinedFlag(_))
        ));
        assert!(matches!(
            flags.flag_type("nope"),
            Err(RegistryError::UndefinedFlag(_))
        ));
    }

    #[test]
    fn test_type_mismatch_on_get_and_set() {
        let mut flags = globals();
        assert_eq!(
            flags.get::<String>("retries").unwrap_err(),
            RegistryError::TypeMismatch {
                name: "retries".to_string(),
                expected: FlagType::String,
                actual: FlagType::Int,
            }
        );
        assert!(matches!(
            flags.set("retries", true),
            Err(RegistryError::TypeMismatch { .. })
        ));
        assert_eq!(flags.get::<i64>("retries").unwrap(), 3);
    }

    #[test]
    fn test_validation_failure_leaves_value_unchanged() {
        let mut flags = FlagRegistry::new(Scope::Global);
        flags
            .define(Flag::integer("port", 8080).with_validator(|p| (1..=65535).contains(p)))
            .unwrap();

        flags.set("port", 9000_i64).unwrap();
        let err = flags.set("port", 70000_i64).unwrap_err();
        assert!(matches!(err, RegistryError::FlagValidation { .. }));
        assert_eq!(flags.get::<i64>("port").unwrap(), 9000);
    }

    #[test]
    fn test_always_accepting_and_rejecting_validators() {
        let mut flags = FlagRegistry::new(Scope::Global);
        flags
            .define(Flag::boolean("global-success", false).with_validator(|_| true))
            .unwrap();
        flags
            .define(Flag::boolean("global-failure", false).with_validator(|_| false))
            .unwrap();

        assert!(flags.set("global-success", false).is_ok());
        assert!(matches!(
            flags.set("global-failure", false),
            Err(RegistryError::FlagValidation { .. })
        ));
    }

    #[test]
    fn test_restore_defaults() {
        let mut flags = globals();
        flags.set("retries", 9_i64).unwrap();
        flags.set("global-get", true).unwrap();
        flags.restore_defaults();
        assert_eq!(flags.get::<i64>("retries").unwrap(), 3);
        assert!(!flags.get::<bool>("global-get").unwrap());
    }

    #[test]
    fn test_flag_type_and_definition_order() {
        let flags = globals();
        assert_eq!(flags.flag_type("retries").unwrap(), FlagType::Int);
        let names: Vec<&str> = flags.iter().map(FlagDefinition::name).collect();
        assert_eq!(names, vec!["global-get", "retries"]);
    }
}
