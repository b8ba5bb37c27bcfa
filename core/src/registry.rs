//! The host-facing registry: definitions, parsing and dispatch.

use tracing::debug;

use crate::actions::{Action, ActionRegistry};
use crate::describe::{ActionDescription, FlagDescription, RegistryDescription};
use crate::dispatch::dispatch;
use crate::error::Result;
use crate::flags::{Flag, FlagRegistry, Scope};
use crate::parser::{ParseFailure, ParseStatus, ParsedSegment, Parser, builtin_request};
use crate::settings::Settings;
use crate::value::{FlagKind, FlagType};

/// All state of one command-line surface.
///
/// A registry is populated with `define_*` calls, then fed the argument
/// vector once with [`parse`](Registry::parse) and run with
/// [`start`](Registry::start). Independent registries never share state, and
/// [`reset`](Registry::reset) returns one to its freshly constructed form.
///
/// Host-level flag access ([`get_flag`](Registry::get_flag) and friends) sees
/// global flags only; action-scoped flags are reached through the
/// [`FlagScope`](crate::FlagScope) handed to each callback.
///
/// # Examples
///
/// ```
/// use chainargs_core::{Action, Flag, ParseStatus, Registry};
///
/// let mut registry = Registry::new();
/// registry.define_global_flag(Flag::integer("retries", 3)).unwrap();
/// registry
///     .define_action(Action::new("run", 0, |flags, _args| {
///         flags.get::<i64>("retries").map_or(1, |n| if n == 7 { 0 } else { 1 })
///     }))
///     .unwrap();
///
/// assert_eq!(registry.parse(&["app", "run", "--retries=7"]), ParseStatus::Ok);
/// assert_eq!(registry.get_flag::<i64>("retries").unwrap(), 7);
/// assert_eq!(registry.start(), 0);
/// ```
#[derive(Debug)]
pub struct Registry {
    settings: Settings,
    globals: FlagRegistry,
    actions: ActionRegistry,
    plan: Vec<ParsedSegment>,
    statuses: Vec<i32>,
    failure: Option<ParseFailure>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self {
            settings: Settings::default(),
            globals: FlagRegistry::new(Scope::Global),
            actions: ActionRegistry::new(),
            plan: Vec::new(),
            statuses: Vec::new(),
            failure: None,
        }
    }

    /// Clears every definition, setting and parse result.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn set_app_name(&mut self, name: impl Into<String>) {
        self.settings.app_name = name.into();
    }

    pub fn app_name(&self) -> &str {
        &self.settings.app_name
    }

    pub fn set_version(&mut self, version: impl Into<String>) {
        self.settings.version = Some(version.into());
    }

    pub fn set_help_banner(&mut self, banner: impl Into<String>) {
        self.settings.help_banner = Some(banner.into());
    }

    /// Replaces the set of chain delimiter tokens.
    pub fn set_delimiters<I, S>(&mut self, delimiters: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.settings.delimiters = delimiters.into_iter().map(Into::into).collect();
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Defines a flag visible to every action.
    ///
    /// # Errors
    ///
    /// [`RegistryError::DuplicateFlag`](crate::RegistryError::DuplicateFlag)
    /// if a global flag with this name exists.
    pub fn define_global_flag<T: FlagKind>(&mut self, flag: Flag<T>) -> Result<()> {
        self.globals.define(flag)
    }

    /// Defines a flag visible only while `action` runs.
    ///
    /// # Errors
    ///
    /// [`RegistryError::UndefinedAction`](crate::RegistryError::UndefinedAction)
    /// if `action` has not been defined,
    /// [`RegistryError::DuplicateFlag`](crate::RegistryError::DuplicateFlag)
    /// if the action already has a flag with this name.
    pub fn define_action_flag<T: FlagKind>(&mut self, action: &str, flag: Flag<T>) -> Result<()> {
        self.actions.define_flag(action, flag)
    }

    /// Defines an action.
    ///
    /// # Errors
    ///
    /// [`RegistryError::DuplicateAction`](crate::RegistryError::DuplicateAction)
    /// if the name is taken.
    pub fn define_action(&mut self, action: Action) -> Result<()> {
        self.actions.define(action)
    }

    pub fn actions(&self) -> &ActionRegistry {
        &self.actions
    }

    pub fn global_flags(&self) -> &FlagRegistry {
        &self.globals
    }

    /// Reads a global flag.
    pub fn get_flag<T: FlagKind>(&self, name: &str) -> Result<T> {
        self.globals.get(name)
    }

    /// Writes a global flag; a rejected value leaves the flag unchanged.
    pub fn set_flag<T: FlagKind>(&mut self, name: &str, value: T) -> Result<()> {
        self.globals.set(name, value)
    }

    pub fn flag_type(&self, name: &str) -> Result<FlagType> {
        self.globals.flag_type(name)
    }

    /// Parses a full argument vector, program name first.
    ///
    /// Replaces the previous execution plan, except for `Help` and `Version`
    /// which leave the plan and every flag value as they were. Malformed
    /// input is reported only through the returned status; the reason is
    /// kept in [`parse_failure`](Registry::parse_failure). Flag values
    /// written before a failure are kept.
    pub fn parse<S: AsRef<str>>(&mut self, argv: &[S]) -> ParseStatus {
        let Some((program, tokens)) = argv.split_first() else {
            self.clear_plan();
            return self.fail(ParseFailure::MissingAction);
        };
        self.settings.adopt_program_name(program.as_ref());

        if let Some(status) = builtin_request(tokens) {
            debug!(?status, "Built-in request");
            return status;
        }

        self.clear_plan();

        let parsed = Parser::new(
            &mut self.globals,
            &mut self.actions,
            &self.settings.delimiters,
        )
        .run(tokens);
        match parsed {
            Ok(plan) => {
                self.plan = plan;
                ParseStatus::Ok
            }
            Err(failure) => self.fail(failure),
        }
    }

    fn clear_plan(&mut self) {
        self.plan.clear();
        self.statuses.clear();
        self.failure = None;
    }

    fn fail(&mut self, failure: ParseFailure) -> ParseStatus {
        debug!(error = %failure, "Parse failed");
        let status = failure.status();
        self.failure = Some(failure);
        status
    }

    /// Reason for the last `Error` or `InvalidFlag` status.
    pub fn parse_failure(&self) -> Option<&ParseFailure> {
        self.failure.as_ref()
    }

    /// The execution plan of the last successful parse.
    pub fn plan(&self) -> &[ParsedSegment] {
        &self.plan
    }

    /// Action names of the execution plan, duplicates included.
    pub fn parsed_actions(&self) -> Vec<String> {
        self.plan.iter().map(|s| s.action.clone()).collect()
    }

    /// Runs the execution plan.
    ///
    /// Returns the last non-zero status returned by a callback, or `0`.
    pub fn start(&mut self) -> i32 {
        self.statuses = dispatch(&self.plan, &mut self.actions, &mut self.globals);
        self.statuses
            .iter()
            .rev()
            .copied()
            .find(|&status| status != 0)
            .unwrap_or(0)
    }

    /// Per-segment statuses of the last [`start`](Registry::start).
    pub fn statuses(&self) -> &[i32] {
        &self.statuses
    }

    /// First defined action named in `argv`, for answering `--help`.
    ///
    /// Pure: does not touch the plan or any flag value.
    pub fn help_topic<'a, S: AsRef<str>>(&self, argv: &'a [S]) -> Option<&'a str> {
        argv.iter()
            .skip(1)
            .map(|t| t.as_ref())
            .filter(|t| !self.settings.is_delimiter(t))
            .find(|t| self.actions.contains(t))
    }

    /// Serializable snapshot of settings, flags and actions.
    pub fn describe(&self) -> RegistryDescription {
        RegistryDescription {
            settings: self.settings.clone(),
            global_flags: self.globals.iter().map(FlagDescription::from).collect(),
            actions: self.actions.iter().map(ActionDescription::from).collect(),
        }
    }
}
