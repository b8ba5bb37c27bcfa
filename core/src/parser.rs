//! Tokenizer and parser turning `argv` into an execution plan.
//!
//! The parser walks the tokens after the program name once, left to right.
//! Each token is classified as a delimiter, a flag (`--name` or
//! `--name=value`) or a word. Words either open a new action segment, fill
//! the current segment's positional arguments, or (once those are complete)
//! start an implicit chain link when they name another chainable action.
//!
//! Malformed input never surfaces as a Rust error. Every failure is a
//! [`ParseFailure`] whose [`status`](ParseFailure::status) is the
//! [`ParseStatus`] reported to the host.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::actions::ActionRegistry;
use crate::flags::FlagRegistry;
use crate::value::{FlagType, FlagValue};

/// Prefix that marks a flag token.
pub const FLAG_PREFIX: &str = "--";
/// Token requesting usage output.
pub const HELP_FLAG: &str = "--help";
/// Token requesting the version line.
pub const VERSION_FLAG: &str = "--version";

/// Outcome of a [`Registry::parse`](crate::Registry::parse) call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParseStatus {
    /// The execution plan is ready to [`start`](crate::Registry::start).
    Ok,
    /// `--help` was given; nothing was parsed.
    Help,
    /// `--version` was given; nothing was parsed.
    Version,
    /// Unknown action, wrong argument count or broken chain.
    Error,
    /// Unknown flag, missing or malformed value, or rejected value.
    InvalidFlag,
}

/// Why a parse was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseFailure {
    #[error("no action given")]
    MissingAction,
    #[error("unknown action `{0}`")]
    UnknownAction(String),
    #[error("action `{action}` requires {required} argument(s), got {found}")]
    MissingArguments {
        action: String,
        required: usize,
        found: usize,
    },
    #[error("unexpected argument `{token}` after action `{action}`")]
    UnexpectedArgument { action: String, token: String },
    #[error("action `{0}` cannot be chained")]
    NotChainable(String),
    #[error("delimiter `{0}` must separate two actions")]
    MisplacedDelimiter(String),
    #[error("unknown flag `--{0}`")]
    UnknownFlag(String),
    #[error("flag `--{0}` requires a value")]
    MissingFlagValue(String),
    #[error("invalid {expected} value `{value}` for flag `--{flag}`")]
    InvalidFlagValue {
        flag: String,
        expected: FlagType,
        value: String,
    },
    #[error("value `{value}` rejected for flag `--{flag}`")]
    RejectedFlagValue { flag: String, value: String },
}

impl ParseFailure {
    /// Result code reported for this failure.
    pub fn status(&self) -> ParseStatus {
        match self {
            Self::UnknownFlag(_)
            | Self::MissingFlagValue(_)
            | Self::InvalidFlagValue { .. }
            | Self::RejectedFlagValue { .. } => ParseStatus::InvalidFlag,
            _ => ParseStatus::Error,
        }
    }
}

/// One planned action invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedSegment {
    /// Name of the action to run.
    pub action: String,
    /// Positional arguments, in order.
    pub arguments: Vec<String>,
    /// Action-scoped flag values given for this invocation only.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub flags: BTreeMap<String, FlagValue>,
}

/// Classified command-line token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'t> {
    Delimiter(&'t str),
    Flag { name: &'t str, inline: Option<&'t str> },
    Word(&'t str),
}

impl<'t> Token<'t> {
    fn classify(raw: &'t str, delimiters: &[String]) -> Self {
        if delimiters.iter().any(|d| d == raw) {
            return Self::Delimiter(raw);
        }
        match raw.strip_prefix(FLAG_PREFIX) {
            Some(body) => match body.split_once('=') {
                Some((name, value)) => Self::Flag {
                    name,
                    inline: Some(value),
                },
                None => Self::Flag {
                    name: body,
                    inline: None,
                },
            },
            None => Self::Word(raw),
        }
    }
}

/// Scans for the built-in help and version requests.
///
/// `--help` wins over `--version` wherever either appears.
pub(crate) fn builtin_request<S: AsRef<str>>(tokens: &[S]) -> Option<ParseStatus> {
    if tokens.iter().any(|t| t.as_ref() == HELP_FLAG) {
        Some(ParseStatus::Help)
    } else if tokens.iter().any(|t| t.as_ref() == VERSION_FLAG) {
        Some(ParseStatus::Version)
    } else {
        None
    }
}

/// Segment under construction.
#[derive(Debug)]
struct OpenSegment {
    action: String,
    required: usize,
    chainable: bool,
    arguments: Vec<String>,
    flags: BTreeMap<String, FlagValue>,
    /// Set once a flag follows the positional arguments.
    sealed: bool,
}

impl OpenSegment {
    fn wants_argument(&self) -> bool {
        !self.sealed && self.arguments.len() < self.required
    }

    fn check_arity(&self) -> Result<(), ParseFailure> {
        if self.arguments.len() < self.required {
            return Err(ParseFailure::MissingArguments {
                action: self.action.clone(),
                required: self.required,
                found: self.arguments.len(),
            });
        }
        Ok(())
    }

    fn finish(self) -> Result<ParsedSegment, ParseFailure> {
        self.check_arity()?;
        Ok(ParsedSegment {
            action: self.action,
            arguments: self.arguments,
            flags: self.flags,
        })
    }
}

/// Single-pass parser over one argument vector.
///
/// Flag values are written into the registries as they are parsed, so a
/// failed parse leaves the values of the successfully processed prefix.
pub(crate) struct Parser<'r> {
    globals: &'r mut FlagRegistry,
    actions: &'r mut ActionRegistry,
    delimiters: &'r [String],
}

impl<'r> Parser<'r> {
    pub(crate) fn new(
        globals: &'r mut FlagRegistry,
        actions: &'r mut ActionRegistry,
        delimiters: &'r [String],
    ) -> Self {
        Self {
            globals,
            actions,
            delimiters,
        }
    }

    /// Parses the tokens that follow the program name.
    pub(crate) fn run<S: AsRef<str>>(
        mut self,
        tokens: &[S],
    ) -> Result<Vec<ParsedSegment>, ParseFailure> {
        let mut plan: Vec<ParsedSegment> = Vec::new();
        let mut current: Option<OpenSegment> = None;
        let mut rest = tokens.iter().map(|t| t.as_ref());

        while let Some(raw) = rest.next() {
            match Token::classify(raw, self.delimiters) {
                Token::Delimiter(delimiter) => {
                    let segment = current
                        .take()
                        .ok_or_else(|| ParseFailure::MisplacedDelimiter(delimiter.to_string()))?;
                    plan.push(segment.finish()?);
                    let next = rest
                        .next()
                        .ok_or_else(|| ParseFailure::MisplacedDelimiter(delimiter.to_string()))?;
                    if Token::classify(next, self.delimiters) != Token::Word(next) {
                        return Err(ParseFailure::MisplacedDelimiter(delimiter.to_string()));
                    }
                    current = Some(self.chain(&plan, next)?);
                }
                Token::Flag { name, inline } => {
                    if let Some(segment) = current.as_mut() {
                        segment.check_arity()?;
                        segment.sealed = true;
                    }
                    self.apply_flag(current.as_mut(), name, inline, &mut rest)?;
                }
                Token::Word(word) => match current.take() {
                    None => current = Some(self.open(word)?),
                    Some(mut segment) if segment.wants_argument() => {
                        segment.arguments.push(word.to_string());
                        current = Some(segment);
                    }
                    Some(segment) => {
                        if !segment.chainable || !self.actions.contains(word) {
                            return Err(ParseFailure::UnexpectedArgument {
                                action: segment.action,
                                token: word.to_string(),
                            });
                        }
                        plan.push(segment.finish()?);
                        current = Some(self.chain(&plan, word)?);
                    }
                },
            }
        }

        let segment = current.ok_or(ParseFailure::MissingAction)?;
        plan.push(segment.finish()?);
        debug!(
            actions = ?plan.iter().map(|s| s.action.as_str()).collect::<Vec<_>>(),
            "Parsed execution plan"
        );
        Ok(plan)
    }

    fn open(&self, name: &str) -> Result<OpenSegment, ParseFailure> {
        let action = self
            .actions
            .get(name)
            .ok_or_else(|| ParseFailure::UnknownAction(name.to_string()))?;
        debug!(action = name, "Opening segment");
        Ok(OpenSegment {
            action: action.name().to_string(),
            required: action.required_arguments(),
            chainable: action.is_chainable(),
            arguments: Vec::new(),
            flags: BTreeMap::new(),
            sealed: false,
        })
    }

    /// Opens the segment following `plan`'s last one.
    fn chain(&self, plan: &[ParsedSegment], name: &str) -> Result<OpenSegment, ParseFailure> {
        if let Some(previous) = plan.last() {
            let chainable = self
                .actions
                .get(&previous.action)
                .is_some_and(|a| a.is_chainable());
            if !chainable {
                return Err(ParseFailure::NotChainable(previous.action.clone()));
            }
        }
        let segment = self.open(name)?;
        if !segment.chainable {
            return Err(ParseFailure::NotChainable(segment.action));
        }
        Ok(segment)
    }

    fn lookup_type(&self, segment: Option<&OpenSegment>, name: &str) -> Option<(FlagType, bool)> {
        let scoped = segment
            .and_then(|s| self.actions.get(&s.action))
            .and_then(|a| a.flags().lookup(name));
        match scoped {
            Some(flag) => Some((flag.flag_type(), true)),
            None => self.globals.lookup(name).map(|f| (f.flag_type(), false)),
        }
    }

    fn apply_flag<'t>(
        &mut self,
        segment: Option<&mut OpenSegment>,
        name: &str,
        inline: Option<&str>,
        rest: &mut impl Iterator<Item = &'t str>,
    ) -> Result<(), ParseFailure> {
        let (flag_type, scoped) = self
            .lookup_type(segment.as_deref(), name)
            .ok_or_else(|| ParseFailure::UnknownFlag(name.to_string()))?;

        let text = match (inline, flag_type) {
            (Some(text), _) => text,
            (None, FlagType::Bool) => "true",
            (None, _) => rest
                .next()
                .filter(|t| !self.delimiters.iter().any(|d| d.as_str() == *t))
                .ok_or_else(|| ParseFailure::MissingFlagValue(name.to_string()))?,
        };
        let value = FlagValue::parse_as(flag_type, text).ok_or_else(|| {
            ParseFailure::InvalidFlagValue {
                flag: name.to_string(),
                expected: flag_type,
                value: text.to_string(),
            }
        })?;

        let rejected = || ParseFailure::RejectedFlagValue {
            flag: name.to_string(),
            value: text.to_string(),
        };
        match segment {
            Some(segment) if scoped => {
                self.actions
                    .get_mut(&segment.action)
                    .ok_or_else(|| ParseFailure::UnknownAction(segment.action.clone()))?
                    .flags
                    .set_value(name, value.clone())
                    .map_err(|_| rejected())?;
                segment.flags.insert(name.to_string(), value);
            }
            _ => self
                .globals
                .set_value(name, value)
                .map_err(|_| rejected())?,
        }
        debug!(flag = name, scoped, value = text, "Set flag");
        Ok(())
    }
}
