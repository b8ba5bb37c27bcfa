//! Scoped flag access for running actions.

use crate::error::{RegistryError, Result};
use crate::flags::{FlagRegistry, Scope};
use crate::value::{FlagKind, FlagType};

/// Flag lookups as seen from one action invocation.
///
/// Names resolve against the action's own flags first and fall back to the
/// global flags. The dispatcher builds one scope per planned invocation and
/// drops it when the callback returns.
#[derive(Debug)]
pub struct FlagScope<'a> {
    action: Option<&'a mut FlagRegistry>,
    globals: &'a mut FlagRegistry,
}

impl<'a> FlagScope<'a> {
    /// A scope that only sees global flags.
    pub fn global(globals: &'a mut FlagRegistry) -> Self {
        Self {
            action: None,
            globals,
        }
    }

    /// A scope that sees `action` flags, then global flags.
    pub fn action(action: &'a mut FlagRegistry, globals: &'a mut FlagRegistry) -> Self {
        Self {
            action: Some(action),
            globals,
        }
    }

    /// Name of the action this scope belongs to, if any.
    pub fn action_name(&self) -> Option<&str> {
        match self.action.as_deref()?.scope() {
            Scope::Action(name) => Some(name),
            Scope::Global => None,
        }
    }

    fn resolve(&self, name: &str) -> Option<&FlagRegistry> {
        match self.action.as_deref() {
            Some(action) if action.contains(name) => Some(action),
            _ if self.globals.contains(name) => Some(&*self.globals),
            _ => None,
        }
    }

    fn resolve_mut(&mut self, name: &str) -> Option<&mut FlagRegistry> {
        match self.action.as_deref_mut() {
            Some(action) if action.contains(name) => Some(action),
            _ if self.globals.contains(name) => Some(&mut *self.globals),
            _ => None,
        }
    }

    /// Reads a visible flag as `T`.
    pub fn get<T: FlagKind>(&self, name: &str) -> Result<T> {
        self.resolve(name)
            .ok_or_else(|| RegistryError::UndefinedFlag(name.to_string()))?
            .get(name)
    }

    /// Writes a visible flag; a rejected value leaves the flag unchanged.
    pub fn set<T: FlagKind>(&mut self, name: &str, value: T) -> Result<()> {
        self.resolve_mut(name)
            .ok_or_else(|| RegistryError::UndefinedFlag(name.to_string()))?
            .set(name, value)
    }

    pub fn flag_type(&self, name: &str) -> Result<FlagType> {
        self.resolve(name)
            .ok_or_else(|| RegistryError::UndefinedFlag(name.to_string()))?
            .flag_type(name)
    }
}
