//! Action registry, chained argument parser and dispatcher.
//!
//! This crate lets a host program declare named actions (subcommands) and
//! typed flags, parse `argv` into an ordered execution plan, and run it:
//!
//! - [`Registry`]: the host-facing object holding every definition, the
//!   execution plan and the [`Settings`].
//! - [`Flag`]: builder for a typed flag (`bool`, `i64`, `f64` or `String`),
//!   either global or scoped to one action.
//! - [`Action`]: builder for an action with its required argument count,
//!   chainability and callback.
//! - [`FlagScope`]: flag access inside a callback, checking the action's own flags
//!   first, then the global ones.
//! - [`ParseStatus`] / [`ParseFailure`]: how malformed input is reported.
//!   Registry misuse is reported as [`RegistryError`] instead.
//!
//! Chaining: an action marked chainable may be followed by another chainable
//! action, either directly once its arguments are complete or after one of
//! the configured delimiter tokens.
//!
//! # Example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use chainargs_core::{Action, Flag, ParseStatus, Registry};
//!
//! let log = Rc::new(RefCell::new(Vec::new()));
//! let mut registry = Registry::new();
//! registry.set_delimiters(["+"]);
//! registry.define_global_flag(Flag::boolean("verbose", false)).unwrap();
//!
//! let sink = Rc::clone(&log);
//! registry
//!     .define_action(
//!         Action::new("greet", 1, move |flags, args| {
//!             let greeting = flags.get::<String>("greeting").unwrap();
//!             sink.borrow_mut().push(format!("{greeting}, {}", args[0]));
//!             0
//!         })
//!         .chainable(),
//!     )
//!     .unwrap();
//! registry
//!     .define_action_flag("greet", Flag::string("greeting", "hello"))
//!     .unwrap();
//!
//! let argv = ["app", "greet", "ann", "--greeting=hi", "+", "greet", "bob"];
//! assert_eq!(registry.parse(&argv), ParseStatus::Ok);
//! assert_eq!(registry.parsed_actions(), vec!["greet", "greet"]);
//! assert_eq!(registry.start(), 0);
//! assert_eq!(*log.borrow(), vec!["hi, ann", "hello, bob"]);
//! ```

mod actions;
mod describe;
mod dispatch;
mod error;
mod flags;
pub mod help;
mod parser;
mod registry;
mod scope;
mod settings;
mod value;

pub use actions::{Action, ActionCallback, ActionDefinition, ActionRegistry};
pub use describe::{
    ActionDescription, FlagDescription, OutputFormat, RegistryDescription, format_description,
};
pub use error::{RegistryError, Result};
pub use flags::{Flag, FlagDefinition, FlagRegistry, Scope};
pub use parser::{FLAG_PREFIX, HELP_FLAG, ParseFailure, ParseStatus, ParsedSegment, VERSION_FLAG};
pub use registry::Registry;
pub use scope::FlagScope;
pub use settings::Settings;
pub use value::{FlagKind, FlagType, FlagValue};
