//! Action definitions and the action registry.

use std::fmt;

use crate::error::{RegistryError, Result};
use crate::flags::{Flag, FlagRegistry, Scope};
use crate::scope::FlagScope;
use crate::value::FlagKind;

/// Callback run by the dispatcher for each planned invocation of an action.
///
/// Receives the flag scope of the invocation (action flags first, then
/// global) and the positional arguments, and returns a status code.
pub type ActionCallback = Box<dyn FnMut(&mut FlagScope<'_>, &[String]) -> i32>;

/// Builder for an action.
///
/// # Examples
///
/// ```
/// use chainargs_core::Action;
///
/// let copy = Action::new("copy", 2, |_flags, args| {
///     println!("{} -> {}", args[0], args[1]);
///     0
/// })
/// .with_description("Copy a file");
///
/// assert_eq!(copy.name(), "copy");
/// assert!(!copy.is_chainable());
/// ```
pub struct Action {
    name: String,
    required_arguments: usize,
    chainable: bool,
    description: String,
    help: String,
    callback: ActionCallback,
}

impl Action {
    /// Creates a non-chainable action taking exactly `required_arguments`
    /// positional arguments.
    pub fn new<F>(name: impl Into<String>, required_arguments: usize, callback: F) -> Self
    where
        F: FnMut(&mut FlagScope<'_>, &[String]) -> i32 + 'static,
    {
        Self {
            name: name.into(),
            required_arguments,
            chainable: false,
            description: String::new(),
            help: String::new(),
            callback: Box::new(callback),
        }
    }

    /// Allows the action to be followed by further actions.
    pub fn chainable(mut self) -> Self {
        self.chainable = true;
        self
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

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_chainable(&self) -> bool {
        self.chainable
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("name", &self.name)
            .field("required_arguments", &self.required_arguments)
            .field("chainable", &self.chainable)
            .finish_non_exhaustive()
    }
}

/// A stored action together with its own flag partition.
pub struct ActionDefinition {
    pub(crate) name: String,
    pub(crate) required_arguments: usize,
    pub(crate) chainable: bool,
    pub(crate) description: String,
    pub(crate) help: String,
    pub(crate) callback: ActionCallback,
    pub(crate) flags: FlagRegistry,
}

impl ActionDefinition {
    fn from_builder(action: Action) -> Self {
        let flags = FlagRegistry::new(Scope::Action(action.name.clone()));
        Self {
            name: action.name,
            required_arguments: action.required_arguments,
            chainable: action.chainable,
            description: action.description,
            help: action.help,
            callback: action.callback,
            flags,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn required_arguments(&self) -> usize {
        self.required_arguments
    }

    pub fn is_chainable(&self) -> bool {
        self.chainable
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    /// Flags scoped to this action.
    pub fn flags(&self) -> &FlagRegistry {
        &self.flags
    }
}

impl fmt::Debug for ActionDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionDefinition")
            .field("name", &self.name)
            .field("required_arguments", &self.required_arguments)
            .field("chainable", &self.chainable)
            .field("flags", &self.flags)
            .finish_non_exhaustive()
    }
}

/// Defined actions, in definition order.
#[derive(Debug, Default)]
pub struct ActionRegistry {
    actions: Vec<ActionDefinition>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a new action.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateAction`] if the name is taken.
    pub fn define(&mut self, action: Action) -> Result<()> {
        if self.contains(action.name()) {
            return Err(RegistryError::DuplicateAction(action.name));
        }
        self.actions.push(ActionDefinition::from_builder(action));
        Ok(())
    }

    /// Stores a flag in the partition of `action`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UndefinedAction`] if `action` is unknown and
    /// [`RegistryError::DuplicateFlag`] if the action already has the flag.
    pub fn define_flag<T: FlagKind>(&mut self, action: &str, flag: Flag<T>) -> Result<()> {
        self.get_mut(action)
            .ok_or_else(|| RegistryError::UndefinedAction(action.to_string()))?
            .flags
            .define(flag)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&ActionDefinition> {
        self.actions.iter().find(|a| a.name == name)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut ActionDefinition> {
        self.actions.iter_mut().find(|a| a.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActionDefinition> {
        self.actions.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.actions.iter().map(|a| a.name.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
